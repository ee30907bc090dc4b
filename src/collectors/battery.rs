//! Battery status from `upower -i` or the legacy `acpi` utility

use crate::data::BatteryReading;
use crate::utils::command::{base_command, is_available, Shell};
use crate::utils::parsing::{nth_token, parse_percent};
use log::{debug, info};

/// Output grammar of a battery tool, picked from the command's program name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryTool {
    Upower,
    Acpi,
}

impl BatteryTool {
    pub fn for_command(cmd: &str) -> Option<Self> {
        match base_command(cmd)? {
            "upower" => Some(BatteryTool::Upower),
            "acpi" => Some(BatteryTool::Acpi),
            _ => None,
        }
    }

    pub fn parse(self, output: &str) -> BatteryReading {
        match self {
            BatteryTool::Upower => parse_upower(output),
            BatteryTool::Acpi => parse_acpi(output),
        }
    }
}

/// Which battery command to query. Only one is ever used per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatterySource {
    Primary(String),
    Legacy(String),
    None,
}

impl BatterySource {
    /// The primary tool if installed, else the legacy one, else nothing.
    pub fn detect(shell: &dyn Shell, primary: &str, legacy: &str) -> Self {
        let source = if is_available(shell, primary, false) {
            BatterySource::Primary(primary.to_string())
        } else if is_available(shell, legacy, false) {
            BatterySource::Legacy(legacy.to_string())
        } else {
            BatterySource::None
        };
        info!("Battery: {:?}", source);
        source
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, BatterySource::None)
    }

    pub fn get_battery(&self, shell: &dyn Shell) -> BatteryReading {
        match self {
            BatterySource::Primary(cmd) | BatterySource::Legacy(cmd) => get_battery(shell, cmd),
            BatterySource::None => BatteryReading::default(),
        }
    }
}

/// Query `cmd` and parse it with the grammar its program name implies.
///
/// Unknown programs and failed invocations give an empty reading.
pub fn get_battery(shell: &dyn Shell, cmd: &str) -> BatteryReading {
    let Some(tool) = BatteryTool::for_command(cmd) else {
        debug!("No battery grammar for '{}'", cmd);
        return BatteryReading::default();
    };
    match shell.run(cmd) {
        Ok(output) => tool.parse(&output),
        Err(err) => {
            debug!("Battery unavailable: {}", err);
            BatteryReading::default()
        }
    }
}

/// `upower -i` output: the last `percentage:`, `state:` and `time to empty:`
/// lines win. The summary keeps empty fields, so a missing state or time
/// leaves a double space, and output without any of them gives `"  "`.
pub fn parse_upower(output: &str) -> BatteryReading {
    let mut percentage = String::new();
    let mut state = String::new();
    let mut time = String::new();
    let mut percent = 0;

    for line in output.lines() {
        let line = line.trim().replace("time to empty", "time_to_empty");
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(key) = parts.first() else {
            continue;
        };

        if key.contains("percentage:") {
            if let Some(value) = parts.get(1) {
                percentage = value.to_string();
                percent = parse_percent(value).unwrap_or(0);
            }
        }
        if key.contains("state:") {
            if let Some(value) = parts.get(1) {
                state = value.to_string();
            }
        }
        if key.contains("time_to_empty:") {
            time = parts[1..].join(" ");
        }
    }

    BatteryReading {
        summary: format!("{} {} {}", percentage, state, time),
        percent,
    }
}

/// First line of `acpi` output, e.g. `Battery 0: Discharging, 58%, 01:30:00 remaining`.
/// The summary is everything from the third token on; the percentage is the fourth.
pub fn parse_acpi(output: &str) -> BatteryReading {
    let Some(line) = output.lines().next().filter(|l| !l.trim().is_empty()) else {
        return BatteryReading::default();
    };
    let tokens: Vec<&str> = line.split_whitespace().collect();
    BatteryReading {
        summary: tokens.get(2..).map(|rest| rest.join(" ")).unwrap_or_default(),
        percent: nth_token(line, 3).and_then(parse_percent).unwrap_or(0),
    }
}
