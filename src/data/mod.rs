//! Value types produced by the probes

pub mod readings;

pub use readings::{
    BatteryReading, BluetoothReading, BrightnessReading, NetworkReading, ProbeResult, Row,
    VolumeReading,
};
