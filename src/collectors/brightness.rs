//! Display brightness through a get/set command pair (`light -G` / `light -S`)

use crate::data::BrightnessReading;
use crate::utils::command::{run_ignored, Shell};
use crate::utils::parsing::round_half_up;
use log::debug;

/// Run `cmd` and read its output as a number, rounded to the nearest integer.
///
/// Non-numeric or empty output and failed invocations give `None`.
pub fn get_brightness(shell: &dyn Shell, cmd: &str) -> Option<i64> {
    let output = match shell.run(cmd) {
        Ok(output) => output,
        Err(err) => {
            debug!("Brightness unavailable: {}", err);
            return None;
        }
    };
    parse_brightness(&output)
}

pub fn parse_brightness(output: &str) -> Option<i64> {
    let value: f64 = output.trim().parse().ok()?;
    value.is_finite().then(|| round_half_up(value))
}

/// Same as [`get_brightness`], clamped into a 0–100 reading.
pub fn read(shell: &dyn Shell, cmd: &str) -> BrightnessReading {
    BrightnessReading {
        level: get_brightness(shell, cmd).map(|v| v.clamp(0, 100) as u8),
    }
}

/// Fire and forget `"{cmd} {value}"`.
pub fn set_brightness(shell: &dyn Shell, cmd: &str, value: u8) {
    run_ignored(shell, &format!("{} {}", cmd, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::command::fake::FakeShell;

    #[test]
    fn float_output_is_rounded() {
        let shell = FakeShell::new()
            .with("light -G", "42.50\n")
            .with("light -G2", "7.49");
        assert_eq!(get_brightness(&shell, "light -G"), Some(43));
        assert_eq!(get_brightness(&shell, "light -G2"), Some(7));
    }

    #[test]
    fn non_numeric_output_is_none() {
        let shell = FakeShell::new()
            .with("light -G", "")
            .with("broken", "No backlight controller");
        assert_eq!(get_brightness(&shell, "light -G"), None);
        assert_eq!(get_brightness(&shell, "broken"), None);
        assert_eq!(get_brightness(&shell, "missing"), None);
        assert_eq!(parse_brightness("NaN"), None);
    }

    #[test]
    fn reading_is_clamped() {
        let shell = FakeShell::new().with("light -G", "100.00");
        assert_eq!(read(&shell, "light -G").level, Some(100));
    }

    #[test]
    fn set_appends_value() {
        let shell = FakeShell::new();
        set_brightness(&shell, "light -S", 35);
        assert_eq!(shell.calls(), vec!["light -S 35"]);
    }

    #[test]
    fn repeated_reads_agree() {
        let shell = FakeShell::new().with("light -G", "66.00");
        assert_eq!(read(&shell, "light -G"), read(&shell, "light -G"));
    }
}
