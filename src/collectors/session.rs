//! User line, free-form CLI label, media player and command launching

use crate::utils::command::{run_ignored, Shell};
use crate::utils::parsing::truncate_display;
use log::{debug, warn};

/// Columns of CLI output shown per line before truncation
pub const CLI_LINE_WIDTH: usize = 38;

/// `"{user}@{host}"`; a half that can't be determined is left empty.
pub fn user_host(shell: &dyn Shell, get_user: &str, get_host: &str) -> String {
    let user = shell.run(get_user).unwrap_or_default();
    let host = shell.run(get_host).unwrap_or_default();
    format!("{}@{}", user.trim(), host.trim())
}

/// Output of each command on its own line, cut to [`CLI_LINE_WIDTH`] columns.
pub fn cli_label<S: AsRef<str>>(shell: &dyn Shell, commands: &[S]) -> String {
    commands
        .iter()
        .map(|cmd| match shell.run(cmd.as_ref()) {
            Ok(out) => truncate_display(&out, CLI_LINE_WIDTH),
            Err(err) => {
                debug!("CLI label line failed: {}", err);
                String::new()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Launch a user command without waiting for it.
pub fn launch(shell: &dyn Shell, cmd: &str) {
    if cmd.trim().is_empty() {
        debug!("No command assigned");
        return;
    }
    if let Err(err) = shell.spawn_detached(cmd) {
        warn!("Couldn't launch '{}': {}", cmd, err);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStatus {
    Playing,
    Paused,
    Stopped,
    Unknown,
}

impl MediaStatus {
    pub fn parse(output: &str) -> Self {
        match output.trim() {
            "Playing" => MediaStatus::Playing,
            "Paused" => MediaStatus::Paused,
            "Stopped" => MediaStatus::Stopped,
            _ => MediaStatus::Unknown,
        }
    }

    /// The button offers the opposite of what is happening.
    pub fn icon_key(self) -> &'static str {
        match self {
            MediaStatus::Playing => "media-playback-pause",
            _ => "media-playback-start",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    Previous,
    PlayPause,
    Next,
}

impl MediaAction {
    pub fn verb(self) -> &'static str {
        match self {
            MediaAction::Previous => "previous",
            MediaAction::PlayPause => "play-pause",
            MediaAction::Next => "next",
        }
    }

    pub fn icon_key(self) -> &'static str {
        match self {
            MediaAction::Previous => "media-skip-backward",
            MediaAction::PlayPause => "media-playback-start",
            MediaAction::Next => "media-skip-forward",
        }
    }
}

/// `playerctl status`; no player running reads as `Unknown`.
pub fn media_status(shell: &dyn Shell, playerctl: &str) -> MediaStatus {
    shell
        .run(&format!("{} status 2>/dev/null", playerctl))
        .map(|out| MediaStatus::parse(&out))
        .unwrap_or(MediaStatus::Unknown)
}

pub fn media_control(shell: &dyn Shell, playerctl: &str, action: MediaAction) {
    run_ignored(shell, &format!("{} {} >/dev/null 2>&1", playerctl, action.verb()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::command::fake::FakeShell;

    #[test]
    fn user_at_host() {
        let shell = FakeShell::new().with("whoami", "piotr\n").with("uname -n", "box");
        assert_eq!(user_host(&shell, "whoami", "uname -n"), "piotr@box");
        let shell = FakeShell::new().with("whoami", "piotr");
        assert_eq!(user_host(&shell, "whoami", "uname -n"), "piotr@");
    }

    #[test]
    fn cli_label_truncates_and_joins() {
        let long = "x".repeat(50);
        let shell = FakeShell::new()
            .with("uptime -p", "up 2 hours")
            .with("long", &long);
        let label = cli_label(&shell, &["uptime -p", "long", "broken"]);
        let lines: Vec<&str> = label.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "up 2 hours");
        assert_eq!(lines[1], format!("{}…", "x".repeat(38)));
        assert_eq!(lines[2], "");
    }

    #[test]
    fn media_status_parsing() {
        let shell = FakeShell::new().with("playerctl status 2>/dev/null", "Playing");
        assert_eq!(media_status(&shell, "playerctl"), MediaStatus::Playing);
        assert_eq!(media_status(&FakeShell::new(), "playerctl"), MediaStatus::Unknown);
        assert_eq!(MediaStatus::Paused.icon_key(), "media-playback-start");
        assert_eq!(MediaStatus::Playing.icon_key(), "media-playback-pause");
    }

    #[test]
    fn media_control_runs_verb() {
        let shell = FakeShell::new();
        media_control(&shell, "playerctl", MediaAction::Next);
        assert_eq!(shell.calls(), vec!["playerctl next >/dev/null 2>&1"]);
    }

    #[test]
    fn launch_skips_empty_commands() {
        let shell = FakeShell::new();
        launch(&shell, "  ");
        launch(&shell, "foot");
        assert_eq!(shell.calls(), vec!["detached: foot"]);
    }
}
