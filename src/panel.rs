//! Polling boundary for the UI layer.
//!
//! [`ControlCenter::detect`] probes what the system offers once; afterwards the
//! per-row entry points only run the selected strategy. A row that is hidden
//! or unavailable returns `None`.

use crate::collectors::audio::AudioBackend;
use crate::collectors::battery::BatterySource;
use crate::collectors::bluetooth::BluetoothProbe;
use crate::collectors::session::{self, MediaAction, MediaStatus};
use crate::collectors::{brightness, network};
use crate::config::Settings;
use crate::schedule::RefreshGroup;
use crate::tier::{BatteryTier, BrightnessScheme, BrightnessTier, LinkTier, VolumeTier};
use crate::utils::command::{is_available, Shell};
use log::info;

/// Get/set command pair for brightness
#[derive(Debug, Clone)]
struct BrightnessCommands {
    get: String,
    set: String,
}

pub struct ControlCenter {
    shell: Box<dyn Shell>,
    audio: AudioBackend,
    brightness: Option<BrightnessCommands>,
    scheme: BrightnessScheme,
    battery: BatterySource,
    ssid_cmd: Option<String>,
    bluetooth: Option<BluetoothProbe>,
    playerctl: Option<String>,
    /// `user@host`, fixed for the session
    user: Option<String>,
    cli_commands: Vec<String>,
}

/// Whatever one collection pass produced; rows not collected stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub volume: Option<(Option<u8>, VolumeTier)>,
    pub brightness: Option<(Option<u8>, BrightnessTier)>,
    pub wifi: Option<(String, LinkTier)>,
    pub bluetooth: Option<(String, LinkTier)>,
    pub battery: Option<(String, BatteryTier)>,
    pub user: Option<String>,
    pub cli_label: Option<String>,
}

impl ControlCenter {
    /// Pick a strategy for every row the preferences enable.
    pub fn detect(settings: &Settings, shell: Box<dyn Shell>) -> Self {
        let prefs = &settings.preferences;
        let cmds = &settings.commands;
        let sh = shell.as_ref();

        let audio = if prefs.show_volume_slider {
            AudioBackend::detect(sh, cmds.get("get_volume_alt"), cmds.get("set_volume_alt"))
        } else {
            AudioBackend::Unavailable
        };

        let brightness = (prefs.show_brightness_slider
            && is_available(sh, cmds.get("get_brightness"), false))
        .then(|| BrightnessCommands {
            get: cmds.get("get_brightness").to_string(),
            set: cmds.get("set_brightness").to_string(),
        });

        let battery = if prefs.show_battery_line {
            BatterySource::detect(sh, cmds.get("get_battery"), cmds.get("get_battery_alt"))
        } else {
            BatterySource::None
        };

        let ssid_cmd = (prefs.show_wifi_line && is_available(sh, cmds.get("get_ssid"), false))
            .then(|| cmds.get("get_ssid").to_string());

        let bluetooth = if prefs.show_bt_line {
            BluetoothProbe::detect(
                sh,
                cmds.get("systemctl"),
                cmds.get("get_bt_status"),
                cmds.get("get_bt_name"),
                prefs.bt_name_format,
            )
        } else {
            None
        };

        let playerctl = (prefs.show_playerctl
            && audio.is_available()
            && is_available(sh, cmds.get("playerctl"), false))
        .then(|| cmds.get("playerctl").to_string());

        let user = prefs
            .show_user_line
            .then(|| session::user_host(sh, cmds.get("get_user"), cmds.get("get_host")));

        let cli_commands = if prefs.show_cli_label {
            settings.cli_commands.clone()
        } else {
            Vec::new()
        };

        info!(
            "Rows: volume={} brightness={} battery={} wifi={} bluetooth={}",
            audio.is_available(),
            brightness.is_some(),
            battery.is_available(),
            ssid_cmd.is_some(),
            bluetooth.is_some()
        );

        ControlCenter {
            shell,
            audio,
            brightness,
            scheme: prefs.brightness_scheme,
            battery,
            ssid_cmd,
            bluetooth,
            playerctl,
            user,
            cli_commands,
        }
    }

    pub fn shell(&self) -> &dyn Shell {
        self.shell.as_ref()
    }

    pub fn brightness_scheme(&self) -> BrightnessScheme {
        self.scheme
    }

    pub fn volume(&self) -> Option<(Option<u8>, VolumeTier)> {
        if !self.audio.is_available() {
            return None;
        }
        let reading = self.audio.get_volume(self.shell());
        Some((reading.level, reading.tier()))
    }

    pub fn set_volume(&self, level: u8) {
        self.audio.set_volume(self.shell(), level);
    }

    pub fn brightness(&self) -> Option<(Option<u8>, BrightnessTier)> {
        let cmds = self.brightness.as_ref()?;
        let reading = brightness::read(self.shell(), &cmds.get);
        Some((reading.level, reading.tier(self.scheme)))
    }

    pub fn set_brightness(&self, value: u8) {
        if let Some(cmds) = &self.brightness {
            brightness::set_brightness(self.shell(), &cmds.set, value.min(100));
        }
    }

    pub fn battery(&self) -> Option<(String, BatteryTier)> {
        if !self.battery.is_available() {
            return None;
        }
        let reading = self.battery.get_battery(self.shell());
        let tier = reading.tier();
        Some((reading.summary, tier))
    }

    /// SSID or `"disconnected"`
    pub fn wifi(&self) -> Option<(String, LinkTier)> {
        let cmd = self.ssid_cmd.as_ref()?;
        let reading = network::read(self.shell(), cmd);
        let tier = reading.tier();
        Some((reading.ssid.unwrap_or_else(|| "disconnected".to_string()), tier))
    }

    /// Adapter name or `"disabled"`
    pub fn bluetooth(&self) -> Option<(String, LinkTier)> {
        let probe = self.bluetooth.as_ref()?;
        let reading = probe.read(self.shell());
        let tier = reading.tier();
        let text = if reading.powered {
            reading.adapter_name.unwrap_or_default()
        } else {
            "disabled".to_string()
        };
        Some((text, tier))
    }

    pub fn user(&self) -> Option<String> {
        self.user.clone()
    }

    pub fn cli_label(&self) -> Option<String> {
        if self.cli_commands.is_empty() {
            return None;
        }
        Some(session::cli_label(self.shell(), &self.cli_commands))
    }

    pub fn media_status(&self) -> Option<MediaStatus> {
        let playerctl = self.playerctl.as_ref()?;
        Some(session::media_status(self.shell(), playerctl))
    }

    pub fn media_control(&self, action: MediaAction) {
        if let Some(playerctl) = &self.playerctl {
            session::media_control(self.shell(), playerctl, action);
        }
    }

    /// Run a custom row/button/on-click command.
    pub fn launch(&self, cmd: &str) {
        session::launch(self.shell(), cmd);
    }

    /// Collect the rows of the given groups, independent probes in parallel.
    pub fn collect(&self, groups: &[RefreshGroup]) -> Snapshot {
        let fast = groups.contains(&RefreshGroup::Fast);
        let slow = groups.contains(&RefreshGroup::Slow);
        let cli = groups.contains(&RefreshGroup::Cli);

        let (((volume, brightness), (wifi, bluetooth)), (battery, cli_label)) = rayon::join(
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || if fast { self.volume() } else { None },
                            || if fast { self.brightness() } else { None },
                        )
                    },
                    || {
                        rayon::join(
                            || if fast { self.wifi() } else { None },
                            || if fast { self.bluetooth() } else { None },
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || if slow { self.battery() } else { None },
                    || if cli { self.cli_label() } else { None },
                )
            },
        );

        Snapshot {
            volume,
            brightness,
            wifi,
            bluetooth,
            battery,
            user: if fast { self.user() } else { None },
            cli_label,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.collect(&RefreshGroup::ALL)
    }
}
