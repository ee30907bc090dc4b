//! Bluetooth adapter power state and name via `bluetoothctl`

use crate::data::BluetoothReading;
use crate::utils::command::{is_available, Shell};
use crate::utils::parsing::nth_token;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// How the adapter name query prints its answer. Older `bluetoothctl`
/// builds print just the name, newer ones a `Key: value` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BtNameFormat {
    /// Decide per output: `Key: value` lines take the second token, anything else is used whole
    #[default]
    Auto,
    /// The whole trimmed output is the name
    Full,
    /// The second whitespace token is the name
    SecondToken,
}

impl BtNameFormat {
    pub fn extract(self, output: &str) -> String {
        let output = output.trim();
        match self {
            BtNameFormat::Full => output.to_string(),
            BtNameFormat::SecondToken => nth_token(output, 1).unwrap_or_default().to_string(),
            BtNameFormat::Auto => {
                let keyed = nth_token(output, 0).is_some_and(|t| t.ends_with(':'));
                if keyed {
                    BtNameFormat::SecondToken.extract(output)
                } else {
                    BtNameFormat::Full.extract(output)
                }
            }
        }
    }
}

/// `true` iff the service manager reports the bluetooth unit as enabled.
///
/// `systemctl is-enabled` exits non-zero for "disabled"; that, a missing
/// `systemctl` and any other failure read as `false`.
pub fn bt_service_enabled(shell: &dyn Shell, systemctl: &str) -> bool {
    if !is_available(shell, systemctl, false) {
        return false;
    }
    let cmd = format!("{} is-enabled bluetooth.service", systemctl);
    match shell.run(&cmd) {
        Ok(output) => output.trim() == "enabled",
        Err(err) => {
            debug!("bluetooth.service not enabled: {}", err);
            false
        }
    }
}

/// Whether the second token of the status line is exactly `yes`
/// (`Powered: yes`). Failures read as "off".
pub fn bt_on(shell: &dyn Shell, status_cmd: &str) -> bool {
    match shell.run(status_cmd) {
        Ok(output) => nth_token(&output, 1) == Some("yes"),
        Err(err) => {
            debug!("Bluetooth status unavailable: {}", err);
            false
        }
    }
}

pub fn bt_name(shell: &dyn Shell, name_cmd: &str, format: BtNameFormat) -> Option<String> {
    match shell.run(name_cmd) {
        Ok(output) => Some(format.extract(&output)).filter(|n| !n.is_empty()),
        Err(err) => {
            debug!("Bluetooth name unavailable: {}", err);
            None
        }
    }
}

/// Bluetooth probe, gated once at startup.
#[derive(Debug, Clone)]
pub struct BluetoothProbe {
    status_cmd: String,
    name_cmd: String,
    format: BtNameFormat,
}

impl BluetoothProbe {
    /// `None` unless the service is enabled and the status tool is installed.
    pub fn detect(
        shell: &dyn Shell,
        systemctl: &str,
        status_cmd: &str,
        name_cmd: &str,
        format: BtNameFormat,
    ) -> Option<Self> {
        let enabled = bt_service_enabled(shell, systemctl) && is_available(shell, status_cmd, false);
        info!("Bluetooth: {}", if enabled { "enabled" } else { "not available" });
        enabled.then(|| BluetoothProbe {
            status_cmd: status_cmd.to_string(),
            name_cmd: name_cmd.to_string(),
            format,
        })
    }

    pub fn read(&self, shell: &dyn Shell) -> BluetoothReading {
        let powered = bt_on(shell, &self.status_cmd);
        BluetoothReading {
            powered,
            adapter_name: if powered {
                bt_name(shell, &self.name_cmd, self.format)
            } else {
                None
            },
        }
    }
}
