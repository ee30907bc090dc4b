//! Probes for the individual status rows

pub mod audio;
pub mod battery;
pub mod bluetooth;
pub mod brightness;
pub mod network;
pub mod session;
