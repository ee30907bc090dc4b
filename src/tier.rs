//! Icon tiers for status readings.
//!
//! Each domain has its own enum and thresholds; they are deliberately not
//! interchangeable. Classifiers are total: out-of-range input (say, a negative
//! percentage from a garbled tool) lands in the lowest bucket.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VolumeTier {
    Muted,
    Low,
    Medium,
    High,
}

impl VolumeTier {
    pub fn classify(level: i64, unmuted: bool) -> Self {
        if !unmuted {
            VolumeTier::Muted
        } else if level > 70 {
            VolumeTier::High
        } else if level > 30 {
            VolumeTier::Medium
        } else {
            VolumeTier::Low
        }
    }

    pub fn icon_key(self) -> &'static str {
        match self {
            VolumeTier::Muted => "volume-muted",
            VolumeTier::Low => "volume-low",
            VolumeTier::Medium => "volume-medium",
            VolumeTier::High => "volume-high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BrightnessTier {
    Low,
    Medium,
    High,
    Full,
}

impl BrightnessTier {
    pub fn icon_key(self) -> &'static str {
        match self {
            BrightnessTier::Low => "brightness-low",
            BrightnessTier::Medium => "brightness-medium",
            BrightnessTier::High => "brightness-high",
            BrightnessTier::Full => "brightness-full",
        }
    }
}

/// The two brightness bucketings in use. Pick one and stick to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessScheme {
    /// low / medium / full, split at 30 and 70
    #[default]
    Three,
    /// low / medium / high / full, split at 20, 50 and 90
    Four,
}

impl BrightnessScheme {
    pub fn classify(self, level: i64) -> BrightnessTier {
        match self {
            BrightnessScheme::Three => {
                if level > 70 {
                    BrightnessTier::Full
                } else if level > 30 {
                    BrightnessTier::Medium
                } else {
                    BrightnessTier::Low
                }
            }
            BrightnessScheme::Four => {
                if level > 90 {
                    BrightnessTier::Full
                } else if level > 50 {
                    BrightnessTier::High
                } else if level > 20 {
                    BrightnessTier::Medium
                } else {
                    BrightnessTier::Low
                }
            }
        }
    }

    /// Icon key for a tier under this scheme. The three-bucket set ships a
    /// "high" icon for its top tier.
    pub fn icon_key(self, tier: BrightnessTier) -> &'static str {
        match (self, tier) {
            (BrightnessScheme::Three, BrightnessTier::Full) => BrightnessTier::High.icon_key(),
            _ => tier.icon_key(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BatteryTier {
    Empty,
    Low,
    Good,
    Full,
}

impl BatteryTier {
    pub fn classify(percent: i64) -> Self {
        if percent > 95 {
            BatteryTier::Full
        } else if percent > 50 {
            BatteryTier::Good
        } else if percent > 20 {
            BatteryTier::Low
        } else {
            BatteryTier::Empty
        }
    }

    pub fn icon_key(self) -> &'static str {
        match self {
            BatteryTier::Empty => "battery-empty",
            BatteryTier::Low => "battery-low",
            BatteryTier::Good => "battery-good",
            BatteryTier::Full => "battery-full",
        }
    }
}

/// On/off state for rows without a percentage (Wi-Fi, Bluetooth)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkTier {
    Off,
    On,
}

impl LinkTier {
    pub fn wifi_icon_key(self) -> &'static str {
        match self {
            LinkTier::On => "wifi-on",
            LinkTier::Off => "wifi-off",
        }
    }

    pub fn bt_icon_key(self) -> &'static str {
        match self {
            LinkTier::On => "bt-on",
            LinkTier::Off => "bt-off",
        }
    }
}
