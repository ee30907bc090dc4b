//! Currently associated Wi-Fi network

use crate::data::NetworkReading;
use crate::utils::command::Shell;
use log::debug;

/// Run `cmd` (conventionally `iwgetid -r`) and return the SSID it prints.
///
/// Empty output and any invocation failure both give `None`: a radio that is
/// off, an interface that is not associated and a missing tool all look the same.
pub fn get_ssid(shell: &dyn Shell, cmd: &str) -> Option<String> {
    match shell.run(cmd) {
        Ok(output) => {
            let ssid = output.trim();
            (!ssid.is_empty()).then(|| ssid.to_string())
        }
        Err(err) => {
            debug!("No SSID: {}", err);
            None
        }
    }
}

pub fn read(shell: &dyn Shell, cmd: &str) -> NetworkReading {
    NetworkReading {
        ssid: get_ssid(shell, cmd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::command::fake::FakeShell;
    use crate::utils::command::SystemShell;

    #[test]
    fn associated_network() {
        let shell = FakeShell::new().with("iwgetid -r", "HomeNet\n");
        assert_eq!(get_ssid(&shell, "iwgetid -r").as_deref(), Some("HomeNet"));
        assert!(read(&shell, "iwgetid -r").connected());
    }

    #[test]
    fn empty_and_missing_are_indistinguishable() {
        let shell = FakeShell::new().with("iwgetid -r", "");
        assert_eq!(get_ssid(&shell, "iwgetid -r"), None);
        // iwgetid exits 255 without a wireless interface
        let shell = FakeShell::new().failing("iwgetid -r", 255);
        assert_eq!(get_ssid(&shell, "iwgetid -r"), None);

        let shell = SystemShell::default();
        assert_eq!(get_ssid(&shell, "foo_nonexistent_binary_xyz -r"), None);
        assert_eq!(get_ssid(&shell, "true"), None);
    }
}
