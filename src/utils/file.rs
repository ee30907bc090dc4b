//! File reading utilities

use crate::error::{ControlCenterError, Result};
use std::fs;
use std::path::Path;

/// Read a file to string with error handling
pub fn read_file_safe<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path).map_err(ControlCenterError::from)
}

/// Non-empty lines that aren't `#` or `//` comments, trimmed
pub fn significant_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .map(String::from)
        .collect()
}

/// Read a plain-text command list, one command per line
pub fn read_command_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    Ok(significant_lines(&read_file_safe(path)?))
}
