//! Master channel volume and mute switch

use crate::data::VolumeReading;
use crate::error::Result;
use crate::utils::command::{is_available, run_ignored, Shell};
use crate::utils::parsing::{denormalize, normalize, parse_percent};
use log::{debug, info};
use regex::Regex;
use std::sync::OnceLock;

/// Mixer channel the applet controls
pub const MASTER: &str = "Master";

/// Where volume comes from. Chosen once at startup by [`AudioBackend::detect`].
#[derive(Debug, Clone)]
pub enum AudioBackend {
    /// Direct ALSA mixer element
    #[cfg(feature = "alsa")]
    Mixer(mixer::AlsaMixer),
    /// Command-line mixer tool (`amixer` style output)
    Command { get: String, set: String },
    /// Nothing usable found
    Unavailable,
}

impl AudioBackend {
    /// Prefer the direct mixer binding, fall back to the command pair.
    pub fn detect(shell: &dyn Shell, get_cmd: &str, set_cmd: &str) -> Self {
        #[cfg(feature = "alsa")]
        if let Some(mixer) = mixer::AlsaMixer::open("default", MASTER) {
            info!("Volume: ALSA mixer '{}'", MASTER);
            return AudioBackend::Mixer(mixer);
        }

        if is_available(shell, get_cmd, false) {
            info!("Volume: '{}'", get_cmd);
            AudioBackend::Command {
                get: get_cmd.to_string(),
                set: set_cmd.to_string(),
            }
        } else {
            info!("Volume: no backend available");
            AudioBackend::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, AudioBackend::Unavailable)
    }

    pub fn get_volume(&self, shell: &dyn Shell) -> VolumeReading {
        match self {
            #[cfg(feature = "alsa")]
            AudioBackend::Mixer(mixer) => mixer.read().unwrap_or_else(|err| {
                debug!("Reading mixer failed: {}", err);
                VolumeReading::unknown()
            }),
            AudioBackend::Command { get, .. } => get_volume(shell, get),
            AudioBackend::Unavailable => VolumeReading::unknown(),
        }
    }

    /// Best effort; failures are logged and dropped.
    pub fn set_volume(&self, shell: &dyn Shell, level: u8) {
        let level = level.min(100);
        match self {
            #[cfg(feature = "alsa")]
            AudioBackend::Mixer(mixer) => {
                if let Err(err) = mixer.write(level) {
                    debug!("Writing mixer failed: {}", err);
                }
            }
            AudioBackend::Command { set, .. } => set_volume(shell, set, level),
            AudioBackend::Unavailable => {}
        }
    }
}

/// Read volume through a command-line mixer tool.
pub fn get_volume(shell: &dyn Shell, cmd: &str) -> VolumeReading {
    match shell.run(cmd) {
        Ok(output) => parse_mixer_output(&output),
        Err(err) => {
            debug!("Volume unavailable: {}", err);
            VolumeReading::unknown()
        }
    }
}

pub fn set_volume(shell: &dyn Shell, template: &str, level: u8) {
    run_ignored(shell, &format_set_command(template, level));
}

/// Put the percentage into a set-command template.
///
/// `{}` is replaced by the number; a template without it gets ` <n>%` appended.
pub fn format_set_command(template: &str, level: u8) -> String {
    if template.contains("{}") {
        template.replace("{}", &level.to_string())
    } else {
        format!("{} {}%", template, level)
    }
}

fn percent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(\d+)%\]").expect("valid regex"))
}

fn switch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(on|off)\]").expect("valid regex"))
}

/// Parse `amixer sget` output.
///
/// The first `Playback` line carrying a `[NN%]` field wins, e.g.
/// `  Front Left: Playback 42000 [64%] [-12.00dB] [on]`. A channel without a
/// switch field counts as unmuted.
pub fn parse_mixer_output(output: &str) -> VolumeReading {
    for line in output.lines().filter(|l| l.contains("Playback")) {
        let Some(caps) = percent_re().captures(line) else {
            continue;
        };
        let level = parse_percent(&caps[1]).map(|p| p.clamp(0, 100) as u8);
        let unmuted = switch_re()
            .captures(line)
            .map_or(true, |sw| &sw[1] == "on");
        return VolumeReading { level, unmuted };
    }
    VolumeReading::unknown()
}

/// Raw control value to percentage, see [`normalize`].
pub fn raw_to_percent(raw: i64, max: i64) -> Option<u8> {
    normalize(raw, max).map(|p| p.clamp(0, 100) as u8)
}

/// One playback element of a hardware mixer, in raw control units.
pub trait MixerElement {
    /// Upper end of the playback range
    fn max_volume(&self) -> i64;
    fn raw_volume(&self) -> Result<i64>;
    /// `None` when the element has no mute switch
    fn switch(&self) -> Result<Option<bool>>;
    fn set_raw_volume(&self, raw: i64) -> Result<()>;
}

pub fn read_element(element: &dyn MixerElement) -> Result<VolumeReading> {
    let raw = element.raw_volume()?;
    Ok(VolumeReading {
        level: raw_to_percent(raw, element.max_volume()),
        unmuted: element.switch()?.unwrap_or(true),
    })
}

/// Set every channel to `percent` of the element's range, rounded half up.
pub fn write_element(element: &dyn MixerElement, percent: u8) -> Result<()> {
    element.set_raw_volume(denormalize(percent.min(100), element.max_volume()))
}

#[cfg(feature = "alsa")]
pub mod mixer {
    use super::{read_element, write_element, MixerElement};
    use crate::data::VolumeReading;
    use crate::error::{ControlCenterError, Result};
    use alsa::mixer::{Mixer, Selem, SelemChannelId, SelemId};

    fn mixer_err(err: alsa::Error) -> ControlCenterError {
        ControlCenterError::Mixer(err.to_string())
    }

    struct Element<'a>(Selem<'a>);

    impl MixerElement for Element<'_> {
        fn max_volume(&self) -> i64 {
            self.0.get_playback_volume_range().1
        }

        fn raw_volume(&self) -> Result<i64> {
            self.0
                .get_playback_volume(SelemChannelId::FrontLeft)
                .map_err(mixer_err)
        }

        fn switch(&self) -> Result<Option<bool>> {
            if !self.0.has_playback_switch() {
                return Ok(None);
            }
            let on = self
                .0
                .get_playback_switch(SelemChannelId::FrontLeft)
                .map_err(mixer_err)?;
            Ok(Some(on != 0))
        }

        fn set_raw_volume(&self, raw: i64) -> Result<()> {
            self.0.set_playback_volume_all(raw).map_err(mixer_err)
        }
    }

    /// A simple mixer element, reopened on every access so a card that comes
    /// and goes doesn't leave a stale handle behind.
    #[derive(Debug, Clone)]
    pub struct AlsaMixer {
        card: String,
        channel: String,
    }

    impl AlsaMixer {
        /// `None` if the element can't be read right now.
        pub fn open(card: &str, channel: &str) -> Option<Self> {
            let mixer = AlsaMixer {
                card: card.to_string(),
                channel: channel.to_string(),
            };
            mixer.read().ok().map(|_| mixer)
        }

        fn with_element<T>(&self, f: impl FnOnce(&dyn MixerElement) -> Result<T>) -> Result<T> {
            let mixer = Mixer::new(&self.card, false).map_err(mixer_err)?;
            let selem = mixer
                .find_selem(&SelemId::new(&self.channel, 0))
                .ok_or_else(|| ControlCenterError::Mixer(format!("no element '{}'", self.channel)))?;
            f(&Element(selem))
        }

        pub fn read(&self) -> Result<VolumeReading> {
            self.with_element(read_element)
        }

        pub fn write(&self, percent: u8) -> Result<()> {
            self.with_element(|element| write_element(element, percent))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControlCenterError;
    use crate::utils::command::fake::FakeShell;
    use std::cell::Cell;

    /// Element with a fixed range that remembers the last raw write.
    struct FakeElement {
        max: i64,
        raw: Cell<i64>,
        switch: Option<bool>,
    }

    impl MixerElement for FakeElement {
        fn max_volume(&self) -> i64 {
            self.max
        }

        fn raw_volume(&self) -> Result<i64> {
            Ok(self.raw.get())
        }

        fn switch(&self) -> Result<Option<bool>> {
            Ok(self.switch)
        }

        fn set_raw_volume(&self, raw: i64) -> Result<()> {
            self.raw.set(raw);
            Ok(())
        }
    }

    struct BrokenElement;

    impl MixerElement for BrokenElement {
        fn max_volume(&self) -> i64 {
            100
        }

        fn raw_volume(&self) -> Result<i64> {
            Err(ControlCenterError::Mixer("card gone".into()))
        }

        fn switch(&self) -> Result<Option<bool>> {
            Ok(None)
        }

        fn set_raw_volume(&self, _raw: i64) -> Result<()> {
            Err(ControlCenterError::Mixer("card gone".into()))
        }
    }

    const STEREO: &str = "Simple mixer control 'Master',0
  Capabilities: pvolume pswitch pswitch-joined
  Playback channels: Front Left - Front Right
  Limits: Playback 0 - 65536
  Mono:
  Front Left: Playback 42000 [64%] [on]
  Front Right: Playback 42000 [64%] [on]";

    const MUTED: &str = "Simple mixer control 'Master',0
  Capabilities: pvolume pvolume-joined pswitch pswitch-joined
  Playback channels: Mono
  Limits: Playback 0 - 87
  Mono: Playback 35 [40%] [-39.00dB] [off]";

    #[test]
    fn parses_first_channel_line() {
        let reading = parse_mixer_output(STEREO);
        assert_eq!(reading.level, Some(64));
        assert!(reading.unmuted);
    }

    #[test]
    fn parses_off_switch() {
        let reading = parse_mixer_output(MUTED);
        assert_eq!(reading.level, Some(40));
        assert!(!reading.unmuted);
    }

    #[test]
    fn garbage_output_is_unknown() {
        assert_eq!(parse_mixer_output("no mixer here"), VolumeReading::unknown());
    }

    #[test]
    fn failing_command_is_unknown() {
        let shell = FakeShell::new().failing("amixer sget Master", 1);
        assert_eq!(get_volume(&shell, "amixer sget Master"), VolumeReading::unknown());
    }

    #[test]
    fn set_command_interpolates_level() {
        assert_eq!(format_set_command("amixer sset Master {}%", 40), "amixer sset Master 40%");
        assert_eq!(format_set_command("pamixer --set-volume", 7), "pamixer --set-volume 7%");
    }

    #[test]
    fn command_backend_round_trip() {
        let shell = FakeShell::new()
            .installed("amixer")
            .with("amixer sget Master", MUTED)
            .with("amixer sset Master 55%", "");
        let backend = AudioBackend::detect(&shell, "amixer sget Master", "amixer sset Master {}%");
        assert!(backend.is_available());
        assert_eq!(backend.get_volume(&shell).level, Some(40));
        backend.set_volume(&shell, 55);
        assert!(shell.calls().contains(&"amixer sset Master 55%".to_string()));
    }

    #[cfg(not(feature = "alsa"))]
    #[test]
    fn missing_tool_means_no_backend() {
        let shell = FakeShell::new();
        let backend = AudioBackend::detect(&shell, "amixer sget Master", "amixer sset Master {}%");
        assert!(!backend.is_available());
        assert_eq!(backend.get_volume(&shell), VolumeReading::unknown());
    }

    #[test]
    fn raw_values_scale_by_reported_max() {
        assert_eq!(raw_to_percent(42000, 65536), Some(64));
        assert_eq!(raw_to_percent(35, 87), Some(40));
        assert_eq!(raw_to_percent(1, 0), None);
    }

    #[test]
    fn element_read_scales_and_reports_switch() {
        let element = FakeElement {
            max: 87,
            raw: Cell::new(35),
            switch: Some(false),
        };
        assert_eq!(
            read_element(&element).unwrap(),
            VolumeReading {
                level: Some(40),
                unmuted: false
            }
        );

        let no_switch = FakeElement {
            max: 65536,
            raw: Cell::new(42000),
            switch: None,
        };
        let reading = read_element(&no_switch).unwrap();
        assert_eq!(reading.level, Some(64));
        assert!(reading.unmuted);
    }

    #[test]
    fn element_write_rounds_half_up() {
        let element = FakeElement {
            max: 87,
            raw: Cell::new(0),
            switch: Some(true),
        };
        write_element(&element, 50).unwrap();
        assert_eq!(element.raw.get(), 44);
        write_element(&element, 200).unwrap();
        assert_eq!(element.raw.get(), 87);
        assert_eq!(read_element(&element).unwrap().level, Some(100));
    }

    #[test]
    fn element_errors_propagate() {
        assert!(matches!(read_element(&BrokenElement), Err(ControlCenterError::Mixer(_))));
        assert!(write_element(&BrokenElement, 10).is_err());
    }
}
