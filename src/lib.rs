//! ctlcenter library
//!
//! Status probes for a desktop control center: volume, brightness, battery,
//! Wi-Fi and Bluetooth, read by shelling out to the usual command-line tools
//! and classified into icon tiers.

pub mod collectors;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod panel;
pub mod schedule;
pub mod tier;
pub mod utils;

pub use config::Settings;
pub use data::{
    BatteryReading, BluetoothReading, BrightnessReading, NetworkReading, ProbeResult, VolumeReading,
};
pub use error::{ControlCenterError, Result};
pub use panel::{ControlCenter, Snapshot};
pub use utils::command::{Shell, SystemShell};

/// Load settings from disk and probe the system with a time-bounded shell.
pub fn detect() -> (Settings, ControlCenter) {
    let settings = Settings::load();
    let shell = SystemShell::with_timeout_millis(settings.preferences.command_timeout_millis);
    let center = ControlCenter::detect(&settings, Box::new(shell));
    (settings, center)
}
