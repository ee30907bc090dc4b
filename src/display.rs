use crate::config::Icons;
use crate::panel::Snapshot;
use crate::tier::BrightnessScheme;
use unicode_width::UnicodeWidthStr;

/// One printable status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub key: &'static str,
    pub value: String,
    pub icon: String,
}

fn level_text(level: Option<u8>) -> String {
    level.map_or_else(|| "n/a".to_string(), |l| format!("{}%", l))
}

/// Flatten a snapshot into labelled lines, icons resolved through `icons`.
pub fn status_lines(snapshot: &Snapshot, icons: &Icons, scheme: BrightnessScheme) -> Vec<StatusLine> {
    let mut lines = Vec::new();

    if let Some(label) = &snapshot.cli_label {
        for line in label.lines() {
            lines.push(StatusLine {
                key: "",
                value: line.to_string(),
                icon: String::new(),
            });
        }
    }
    if let Some((level, tier)) = snapshot.brightness {
        lines.push(StatusLine {
            key: "Brightness",
            value: level_text(level),
            icon: icons.resolve(scheme.icon_key(tier)),
        });
    }
    if let Some((level, tier)) = snapshot.volume {
        lines.push(StatusLine {
            key: "Volume",
            value: level_text(level),
            icon: icons.resolve(tier.icon_key()),
        });
    }
    if let Some(user) = &snapshot.user {
        lines.push(StatusLine {
            key: "User",
            value: user.clone(),
            icon: icons.resolve("user"),
        });
    }
    if let Some((ssid, tier)) = &snapshot.wifi {
        lines.push(StatusLine {
            key: "Wi-Fi",
            value: ssid.clone(),
            icon: icons.resolve(tier.wifi_icon_key()),
        });
    }
    if let Some((name, tier)) = &snapshot.bluetooth {
        lines.push(StatusLine {
            key: "Bluetooth",
            value: name.clone(),
            icon: icons.resolve(tier.bt_icon_key()),
        });
    }
    if let Some((summary, tier)) = &snapshot.battery {
        lines.push(StatusLine {
            key: "Battery",
            value: summary.clone(),
            icon: icons.resolve(tier.icon_key()),
        });
    }
    lines
}

/// Render lines with keys padded to a common display width.
pub fn render(lines: &[StatusLine], separator: &str) -> String {
    let width = lines
        .iter()
        .map(|l| UnicodeWidthStr::width(l.key))
        .max()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if line.key.is_empty() {
                return line.value.clone();
            }
            let padding = " ".repeat(width - UnicodeWidthStr::width(line.key));
            let mut out = format!("{}{}{}{}", line.key, padding, separator, line.value);
            if !line.icon.is_empty() {
                out.push_str(&format!("  ({})", line.icon));
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}
