//! Camera selection over a snapshot of discovered devices.
//!
//! Starting device, first match wins:
//! 1. the configured (type, position)
//! 2. back dual camera
//! 3. back wide-angle camera
//! 4. front wide-angle camera
//!
//! Rotation flips back → front (preferring TrueDepth) and anything else → back
//! (preferring Dual), falling back to any device at the target position.

use crate::models::device::{DeviceDescriptor, DevicePosition, DeviceType};

const FALLBACK_ORDER: [(DeviceType, DevicePosition); 3] = [
    (DeviceType::Dual, DevicePosition::Back),
    (DeviceType::WideAngle, DevicePosition::Back),
    (DeviceType::WideAngle, DevicePosition::Front),
];

#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    devices: Vec<DeviceDescriptor>,
}

impl DeviceCatalog {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self { devices }
    }

    fn find(&self, device_type: DeviceType, position: DevicePosition) -> Option<&DeviceDescriptor> {
        self.devices.iter().find(|d| d.matches(device_type, position))
    }

    /// Pick the starting camera. `None` only when no fallback exists either.
    pub fn select_device(
        &self,
        preferred_type: DeviceType,
        preferred_position: DevicePosition,
    ) -> Option<DeviceDescriptor> {
        std::iter::once((preferred_type, preferred_position))
            .chain(FALLBACK_ORDER)
            .find_map(|(device_type, position)| self.find(device_type, position))
            .cloned()
    }

    /// Where a rotation from `current` should go, and the lens type it prefers there.
    pub fn rotation_target(current: Option<DevicePosition>) -> (DevicePosition, DeviceType) {
        match current {
            Some(DevicePosition::Back) => (DevicePosition::Front, DeviceType::TrueDepth),
            Some(DevicePosition::Front) | Some(DevicePosition::Unspecified) | None => {
                (DevicePosition::Back, DeviceType::Dual)
            }
        }
    }

    /// The device a rotation from `current` switches to, if any exists.
    pub fn device_for_rotation(&self, current: Option<DevicePosition>) -> Option<DeviceDescriptor> {
        let (position, preferred_type) = Self::rotation_target(current);
        self.find(preferred_type, position)
            .or_else(|| self.devices.iter().find(|d| d.position == position))
            .cloned()
    }
}
