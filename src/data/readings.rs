//! Status readings. Every reading is fetched fresh and discarded after display.

use crate::tier::{BatteryTier, BrightnessScheme, BrightnessTier, LinkTier, VolumeTier};

/// Outcome of checking whether a command is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub available: bool,
}

/// Master channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeReading {
    /// 0–100, `None` when the channel could not be read
    pub level: Option<u8>,
    /// Playback switch; `false` means muted whatever the level
    pub unmuted: bool,
}

impl VolumeReading {
    pub fn unknown() -> Self {
        VolumeReading {
            level: None,
            unmuted: false,
        }
    }

    pub fn tier(&self) -> VolumeTier {
        match self.level {
            Some(level) => VolumeTier::classify(level as i64, self.unmuted),
            None => VolumeTier::Muted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessReading {
    /// 0–100, `None` when the backend printed something non-numeric
    pub level: Option<u8>,
}

impl BrightnessReading {
    /// An unreadable level shows as the lowest tier.
    pub fn tier(&self, scheme: BrightnessScheme) -> BrightnessTier {
        scheme.classify(self.level.map_or(0, i64::from))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatteryReading {
    /// Human readable status assembled from the tool's output
    pub summary: String,
    /// 0 together with an empty summary means no usable output
    pub percent: i64,
}

impl BatteryReading {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.percent == 0
    }

    pub fn tier(&self) -> BatteryTier {
        BatteryTier::classify(self.percent)
    }
}

/// Wi-Fi association. "Radio off", "not associated" and "tool missing" all read as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkReading {
    pub ssid: Option<String>,
}

impl NetworkReading {
    pub fn connected(&self) -> bool {
        self.ssid.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn tier(&self) -> LinkTier {
        if self.connected() {
            LinkTier::On
        } else {
            LinkTier::Off
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BluetoothReading {
    pub powered: bool,
    /// Only meaningful while `powered`
    pub adapter_name: Option<String>,
}

impl BluetoothReading {
    pub fn tier(&self) -> LinkTier {
        if self.powered {
            LinkTier::On
        } else {
            LinkTier::Off
        }
    }
}

/// What the polling layer hands back to a widget: display text plus icon key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub icon: &'static str,
}

impl Row {
    pub fn new(text: impl Into<String>, icon: &'static str) -> Self {
        Row {
            text: text.into(),
            icon,
        }
    }
}
