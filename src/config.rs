use crate::collectors::bluetooth::BtNameFormat;
use crate::error::{ControlCenterError, Result};
use crate::tier::BrightnessScheme;
use crate::utils::file::{read_command_list, read_file_safe};
use dirs::{config_dir, data_dir};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path, path::PathBuf};

/// Directory name shared by the config and data locations
pub const APP_DIR: &str = "nwgcc";
pub const ICON_MISSING: &str = "icon-missing";

/// Built-in command for every logical name; entries in preferences.json override them.
pub const DEFAULT_COMMANDS: &[(&str, &str)] = &[
    ("get_volume_alt", "amixer sget Master"),
    ("set_volume_alt", "amixer sset Master {}%"),
    ("get_battery", "upower -i /org/freedesktop/UPower/devices/battery_BAT0"),
    ("get_battery_alt", "acpi"),
    ("get_brightness", "light -G"),
    ("set_brightness", "light -S"),
    ("get_ssid", "iwgetid -r"),
    ("get_bt_status", "bluetoothctl show | grep Powered"),
    ("get_bt_name", "bluetoothctl show | grep Alias"),
    ("systemctl", "systemctl"),
    ("get_user", "whoami"),
    ("get_host", "uname -n"),
    ("playerctl", "playerctl"),
];

/// $XDG_CONFIG_HOME/nwgcc, usually ~/.config/nwgcc
pub fn user_config_dir() -> Option<PathBuf> {
    config_dir().map(|p| p.join(APP_DIR))
}

/// ~/.local/share/nwgcc
pub fn user_data_dir() -> Option<PathBuf> {
    data_dir().map(|p| p.join(APP_DIR))
}

/// A named command with an icon: custom rows and buttons in config.json.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Launcher {
    pub name: String,
    pub cmd: String,
    pub icon: String,
}

/// config.json
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ControlCenterConfig {
    pub custom_rows: Vec<Launcher>,
    pub buttons: Vec<Launcher>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub icon_set: String,
    pub icon_size_small: u32,
    pub icon_size_large: u32,
    pub refresh_fast_millis: u64,
    pub refresh_slow_seconds: u64,
    pub refresh_cli_seconds: u64,
    pub show_cli_label: bool,
    pub show_brightness_slider: bool,
    pub show_volume_slider: bool,
    pub show_user_line: bool,
    pub show_wifi_line: bool,
    pub show_bt_line: bool,
    pub show_battery_line: bool,
    pub show_user_rows: bool,
    pub show_user_buttons: bool,
    pub show_playerctl: bool,
    pub dont_close: bool,
    pub window_decorations: bool,
    pub custom_styling: bool,
    #[serde(rename = "on-click-user")]
    pub on_click_user: String,
    #[serde(rename = "on-click-wifi")]
    pub on_click_wifi: String,
    #[serde(rename = "on-click-bluetooth")]
    pub on_click_bluetooth: String,
    #[serde(rename = "on-click-battery")]
    pub on_click_battery: String,
    pub brightness_scheme: BrightnessScheme,
    pub bt_name_format: BtNameFormat,
    /// 0 disables the per-command time limit
    pub command_timeout_millis: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            icon_set: "gtk".to_string(),
            icon_size_small: 16,
            icon_size_large: 32,
            refresh_fast_millis: 500,
            refresh_slow_seconds: 5,
            refresh_cli_seconds: 1800,
            show_cli_label: false,
            show_brightness_slider: true,
            show_volume_slider: true,
            show_user_line: true,
            show_wifi_line: true,
            show_bt_line: true,
            show_battery_line: true,
            show_user_rows: true,
            show_user_buttons: true,
            show_playerctl: true,
            dont_close: false,
            window_decorations: false,
            custom_styling: false,
            on_click_user: String::new(),
            on_click_wifi: String::new(),
            on_click_bluetooth: String::new(),
            on_click_battery: String::new(),
            brightness_scheme: BrightnessScheme::default(),
            bt_name_format: BtNameFormat::default(),
            command_timeout_millis: 3000,
        }
    }
}

/// preferences.json
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PreferencesFile {
    pub preferences: Preferences,
    pub icons: HashMap<String, String>,
    pub commands: HashMap<String, String>,
}

/// Logical command names resolved to shell command strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commands {
    overrides: HashMap<String, String>,
}

impl Commands {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Commands { overrides }
    }

    /// Configured command, else the built-in default, else `""`.
    pub fn get(&self, name: &str) -> &str {
        self.overrides
            .get(name)
            .map(String::as_str)
            .or_else(|| {
                DEFAULT_COMMANDS
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, cmd)| *cmd)
            })
            .unwrap_or("")
    }

    /// Every resolved command: defaults first, then extra configured names sorted.
    pub fn all(&self) -> Vec<(&str, &str)> {
        let mut all: Vec<(&str, &str)> = DEFAULT_COMMANDS
            .iter()
            .map(|(name, _)| (*name, self.get(name)))
            .collect();
        let mut extra: Vec<(&str, &str)> = self
            .overrides
            .iter()
            .filter(|(name, _)| !DEFAULT_COMMANDS.iter().any(|(key, _)| *key == name.as_str()))
            .map(|(name, cmd)| (name.as_str(), cmd.as_str()))
            .collect();
        extra.sort();
        all.extend(extra);
        all
    }
}

/// Icon key to icon name or path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Icons {
    map: HashMap<String, String>,
    /// Custom icon directory; `None` means theme icon names are used as-is
    dir: Option<PathBuf>,
}

impl Icons {
    pub fn new(map: HashMap<String, String>, dir: Option<PathBuf>) -> Self {
        Icons { map, dir }
    }

    /// `light` and `dark` use the bundled sets under `data_dir`; anything else the theme.
    pub fn for_icon_set(map: HashMap<String, String>, icon_set: &str, data_dir: Option<&Path>) -> Self {
        let dir = match icon_set {
            "light" | "dark" => data_dir.map(|d| d.join(format!("icons_{}", icon_set))),
            _ => None,
        };
        Icons::new(map, dir)
    }

    pub fn resolve(&self, key: &str) -> String {
        let Some(icon) = self.map.get(key).filter(|i| !i.is_empty()) else {
            return ICON_MISSING.to_string();
        };
        let icon = shellexpand::tilde(icon).to_string();
        match &self.dir {
            Some(dir) if !icon.contains('/') => dir.join(format!("{}.svg", icon)).display().to_string(),
            _ => icon,
        }
    }
}

/// Everything the applet reads from disk.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub config: ControlCenterConfig,
    pub preferences: Preferences,
    pub commands: Commands,
    pub icons: Icons,
    pub cli_commands: Vec<String>,
}

impl Settings {
    /// Load from the user's config and data directories.
    pub fn load() -> Self {
        let config_dir = user_config_dir().unwrap_or_else(|| PathBuf::from("."));
        let data_dir = user_data_dir().unwrap_or_else(|| PathBuf::from("."));
        Settings::load_from(&config_dir, &data_dir)
    }

    /// Missing or broken files fall back to defaults.
    pub fn load_from(config_dir: &Path, data_dir: &Path) -> Self {
        let config: ControlCenterConfig = load_json(config_dir.join("config.json"));
        let prefs: PreferencesFile = load_json(data_dir.join("preferences.json"));
        let cli_commands = read_command_list(config_dir.join("cli_commands")).unwrap_or_default();
        let icons = Icons::for_icon_set(prefs.icons, &prefs.preferences.icon_set, Some(data_dir));

        Settings {
            config,
            preferences: prefs.preferences,
            commands: Commands::new(prefs.commands),
            icons,
            cli_commands,
        }
    }
}

pub fn try_load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let data = read_file_safe(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Parse a JSON file, falling back to the default value with a warning.
pub fn load_json<T: DeserializeOwned + Default, P: AsRef<Path>>(path: P) -> T {
    let path = path.as_ref();
    try_load_json(path).unwrap_or_else(|err| {
        warn!("Couldn't load '{}': {}", path.display(), err);
        T::default()
    })
}

/// Write pretty-printed JSON, creating the parent directory if needed.
pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data + "\n").map_err(|err| {
        ControlCenterError::Config(format!("couldn't write '{}': {}", path.display(), err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_dirs_are_named_nwgcc() {
        if let Some(dir) = user_config_dir() {
            assert!(dir.ends_with("nwgcc"));
        }
        if let Some(dir) = user_data_dir() {
            assert!(dir.ends_with("nwgcc"));
        }
    }

    #[test]
    fn commands_fall_back_to_defaults() {
        let mut map = HashMap::new();
        map.insert("get_ssid".to_string(), "nmcli -t -f active,ssid dev wifi".to_string());
        map.insert("custom".to_string(), "echo hi".to_string());
        let commands = Commands::new(map);
        assert_eq!(commands.get("get_ssid"), "nmcli -t -f active,ssid dev wifi");
        assert_eq!(commands.get("get_battery_alt"), "acpi");
        assert_eq!(commands.get("nope"), "");

        let all = commands.all();
        assert_eq!(all.len(), DEFAULT_COMMANDS.len() + 1);
        assert_eq!(all.last(), Some(&("custom", "echo hi")));
    }

    #[test]
    fn partial_preferences_keep_defaults() {
        let prefs: PreferencesFile = serde_json::from_str(
            r#"{"preferences": {"icon_set": "dark", "refresh_fast_millis": 250,
                "on-click-wifi": "nm-connection-editor", "brightness_scheme": "four"}}"#,
        )
        .unwrap();
        let p = prefs.preferences;
        assert_eq!(p.icon_set, "dark");
        assert_eq!(p.refresh_fast_millis, 250);
        assert_eq!(p.refresh_slow_seconds, 5);
        assert_eq!(p.on_click_wifi, "nm-connection-editor");
        assert_eq!(p.brightness_scheme, BrightnessScheme::Four);
        assert_eq!(p.bt_name_format, BtNameFormat::Auto);
        assert!(prefs.icons.is_empty());
    }

    #[test]
    fn icons_resolve_with_fallback() {
        let mut map = HashMap::new();
        map.insert("wifi-on".to_string(), "network-wireless".to_string());
        map.insert("user".to_string(), "/usr/share/icons/me.png".to_string());

        let themed = Icons::for_icon_set(map.clone(), "gtk", None);
        assert_eq!(themed.resolve("wifi-on"), "network-wireless");
        assert_eq!(themed.resolve("bt-on"), ICON_MISSING);

        let custom = Icons::for_icon_set(map, "light", Some(Path::new("/data")));
        assert_eq!(custom.resolve("wifi-on"), "/data/icons_light/network-wireless.svg");
        assert_eq!(custom.resolve("user"), "/usr/share/icons/me.png");
    }

    #[test]
    fn settings_round_trip_through_files() {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        let data_dir = tmp.path().join("data");

        let config = ControlCenterConfig {
            custom_rows: vec![Launcher {
                name: "Setup".into(),
                cmd: "nwg-look".into(),
                icon: "preferences-desktop".into(),
            }],
            buttons: vec![],
        };
        save_json(&config, config_dir.join("config.json")).unwrap();

        let mut prefs = PreferencesFile::default();
        prefs.preferences.show_cli_label = true;
        prefs.commands.insert("get_brightness".into(), "brightnessctl -m".into());
        save_json(&prefs, data_dir.join("preferences.json")).unwrap();

        fs::write(config_dir.join("cli_commands"), "# status\nuptime -p\n").unwrap();

        let settings = Settings::load_from(&config_dir, &data_dir);
        assert_eq!(settings.config, config);
        assert!(settings.preferences.show_cli_label);
        assert_eq!(settings.commands.get("get_brightness"), "brightnessctl -m");
        assert_eq!(settings.cli_commands, vec!["uptime -p"]);

        let written = fs::read_to_string(data_dir.join("preferences.json")).unwrap();
        assert!(written.contains("\n  \"preferences\""));
    }

    #[test]
    fn broken_files_give_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("config.json"), "{ not json").unwrap();
        let settings = Settings::load_from(tmp.path(), tmp.path());
        assert_eq!(settings.config, ControlCenterConfig::default());
        assert_eq!(settings.preferences, Preferences::default());
        assert!(settings.cli_commands.is_empty());
        assert!(try_load_json::<ControlCenterConfig, _>(tmp.path().join("config.json")).is_err());
    }
}
