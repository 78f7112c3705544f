use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait};
use log::debug;

/// A named cpal input device.
pub struct CpalDeviceInfo {
    pub name: String,
    pub device: cpal::Device,
}

/// Lists the input devices of the default host, skipping unnamed ones.
pub fn list_input_devices() -> Result<Vec<CpalDeviceInfo>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();
    for device in host.input_devices()? {
        match device.name() {
            Ok(name) => devices.push(CpalDeviceInfo { name, device }),
            Err(e) => debug!("skipping input device without a name: {e}"),
        }
    }
    Ok(devices)
}
