//! Device lists modelled on common phone camera layouts.

use camera_session_core::models::device::{DeviceDescriptor, DevicePosition, DeviceType};

/// Dual and wide-angle back cameras plus a TrueDepth front camera.
pub fn dual_back_true_depth_front() -> Vec<DeviceDescriptor> {
    vec![
        DeviceDescriptor::new("back-dual", DevicePosition::Back, DeviceType::Dual).with_max_zoom(16.0),
        DeviceDescriptor::new("back-wide", DevicePosition::Back, DeviceType::WideAngle).with_max_zoom(10.0),
        DeviceDescriptor::new("front-true-depth", DevicePosition::Front, DeviceType::TrueDepth)
            .with_max_zoom(4.0)
            .with_focus_point(false),
    ]
}

/// One wide-angle back camera and a wide-angle front camera.
pub fn wide_back_and_front() -> Vec<DeviceDescriptor> {
    vec![
        DeviceDescriptor::new("back-wide", DevicePosition::Back, DeviceType::WideAngle).with_max_zoom(8.0),
        DeviceDescriptor::new("front-wide", DevicePosition::Front, DeviceType::WideAngle)
            .with_max_zoom(2.0)
            .with_focus_point(false),
    ]
}

/// A single back camera, as on devices without a selfie camera.
pub fn single_back() -> Vec<DeviceDescriptor> {
    vec![DeviceDescriptor::new("back-wide", DevicePosition::Back, DeviceType::WideAngle).with_max_zoom(8.0)]
}

/// Front camera only, as on laptops and some tablets.
pub fn front_only() -> Vec<DeviceDescriptor> {
    vec![DeviceDescriptor::new("front-wide", DevicePosition::Front, DeviceType::WideAngle).with_max_zoom(2.0)]
}

pub fn no_cameras() -> Vec<DeviceDescriptor> {
    Vec::new()
}

/// Look a preset up by the name the demo accepts.
pub fn by_name(name: &str) -> Option<Vec<DeviceDescriptor>> {
    match name {
        "dual" => Some(dual_back_true_depth_front()),
        "wide" => Some(wide_back_and_front()),
        "single" => Some(single_back()),
        "front" => Some(front_only()),
        "none" => Some(no_cameras()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_session_core::DeviceCatalog;

    #[test]
    fn presets_pick_expected_starting_camera() {
        let select = |devices| {
            DeviceCatalog::new(devices)
                .select_device(DeviceType::Dual, DevicePosition::Back)
                .map(|d| d.id)
        };
        assert_eq!(select(dual_back_true_depth_front()), Some("back-dual".to_string()));
        assert_eq!(select(wide_back_and_front()), Some("back-wide".to_string()));
        assert_eq!(select(front_only()), Some("front-wide".to_string()));
        assert_eq!(select(no_cameras()), None);
    }

    #[test]
    fn only_back_cameras_carry_flash() {
        for device in dual_back_true_depth_front() {
            assert_eq!(device.has_flash, device.position == DevicePosition::Back);
        }
    }

    #[test]
    fn unknown_preset_name() {
        assert!(by_name("dual").is_some());
        assert!(by_name("fisheye").is_none());
    }
}
