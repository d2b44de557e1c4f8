//! Interactive host for a virtual camera session.
//!
//! Reads one command per line from stdin. Each line is one refresh tick:
//! gestures and intents are raised, pending intents are applied once, and
//! the completions that arrived are printed.
//!
//! ```text
//! camera-demo [--config session.json] [--preset dual|wide|single|front|none] [--media-dir DIR]
//! ```

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use camera_session_core::{
    CameraEvent, CameraSession, DeliveryContext, DirectoryMediaSink, GestureRouter, Point, SessionConfiguration,
    Size,
};
use camera_session_virtual::{presets, VirtualAuthorization, VirtualCamera};

const PREVIEW: Size = Size {
    width: 390.0,
    height: 844.0,
};

const HELP: &str = "commands: photo | record | rotate | flash | zoom <scale> | pinch <scale> | \
                    tap <x> <y> | doubletap | wait <ms> | state | help | quit";

struct Options {
    config: SessionConfiguration,
    preset: String,
    media_dir: PathBuf,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        config: SessionConfiguration::default(),
        preset: "dual".into(),
        media_dir: env::temp_dir().join("camera-demo-media"),
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{} needs a value", arg));
        match arg.as_str() {
            "--config" => {
                let path = value()?;
                let json = fs::read_to_string(&path).map_err(|e| format!("failed to read {}: {}", path, e))?;
                options.config =
                    serde_json::from_str(&json).map_err(|e| format!("failed to parse {}: {}", path, e))?;
            }
            "--preset" => options.preset = value()?,
            "--media-dir" => options.media_dir = PathBuf::from(value()?),
            other => return Err(format!("unknown argument {}", other)),
        }
    }
    Ok(options)
}

fn print_events(delivery: &DeliveryContext) {
    for event in delivery.drain() {
        match &event {
            CameraEvent::PhotoProcessed(photo) => {
                println!("< {} {}x{}", event.event_type(), photo.width, photo.height)
            }
            other => match other.error() {
                Some(e) => println!("< {} (error: {})", other.event_type(), e),
                None => println!("< {:?}", other),
            },
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(devices) = presets::by_name(&options.preset) else {
        eprintln!("unknown preset {}", options.preset);
        return ExitCode::FAILURE;
    };

    let router = GestureRouter::new(&options.config);
    let camera = Arc::new(VirtualCamera::new(devices));
    let (session, delivery) = match CameraSession::new(
        camera,
        Arc::new(VirtualAuthorization::new()),
        Arc::new(DirectoryMediaSink::new(&options.media_dir)),
        options.config,
    ) {
        Ok(pair) => pair,
        Err(e) => {
            error!("could not create camera session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("saving media to {}", options.media_dir.display());
    session.configure();
    session.activate();
    session.flush();
    print_events(&delivery);
    println!("{}", HELP);

    let intents = Arc::clone(session.intents());
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let words: Vec<&str> = line.split_whitespace().collect();
        let number = |i: usize| words.get(i).and_then(|w| w.parse::<f64>().ok());

        match words.as_slice() {
            [] => {}
            ["photo"] => {
                intents.capture_photo();
            }
            ["record"] => {
                intents.toggle_video_recording();
            }
            ["rotate"] => {
                intents.rotate_camera();
            }
            ["flash"] => {
                intents.change_flash_mode();
            }
            ["doubletap"] => {
                router.double_tap(&intents);
            }
            ["zoom", _] => match number(1) {
                Some(scale) => session.set_zoom(scale),
                None => println!("zoom needs a number"),
            },
            ["pinch", _] => match number(1) {
                Some(scale) => {
                    router.pinch_began(&session);
                    router.pinch_changed(&session, scale);
                }
                None => println!("pinch needs a number"),
            },
            ["tap", _, _] => match (number(1), number(2)) {
                (Some(x), Some(y)) => {
                    router.single_tap(&session, Point::new(x, y), PREVIEW);
                }
                _ => println!("tap needs two numbers"),
            },
            ["wait", ms] => match ms.parse::<u64>() {
                Ok(ms) => std::thread::sleep(Duration::from_millis(ms)),
                Err(_) => println!("wait needs milliseconds"),
            },
            ["state"] => match serde_json::to_string_pretty(&session.state()) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("could not render state: {}", e),
            },
            ["help"] => println!("{}", HELP),
            ["quit"] | ["exit"] => break,
            _ => println!("unknown command, {}", HELP),
        }

        session.apply_pending();
        session.flush();
        print_events(&delivery);
        let _ = io::stdout().flush();
    }

    session.deactivate();
    session.flush();
    print_events(&delivery);
    ExitCode::SUCCESS
}
