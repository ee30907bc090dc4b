//! String parsing utilities

use unicode_width::UnicodeWidthChar;

/// Scale `raw` out of `max` to a 0–100 percentage, rounding half up.
///
/// Returns `None` for a non-positive `max`.
pub fn normalize(raw: i64, max: i64) -> Option<i64> {
    if max <= 0 {
        return None;
    }
    Some(round_half_up(raw as f64 * 100.0 / max as f64))
}

/// Inverse of [`normalize`]: the raw control value for a percentage.
pub fn denormalize(percent: u8, max: i64) -> i64 {
    round_half_up(percent as f64 * max as f64 / 100.0)
}

pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Integer part before the first `%`, e.g. `"73%"` -> 73.
pub fn parse_percent(token: &str) -> Option<i64> {
    token.split('%').next()?.trim().parse().ok()
}

/// The `n`-th whitespace separated token.
pub fn nth_token(text: &str, n: usize) -> Option<&str> {
    text.split_whitespace().nth(n)
}

/// Cut `text` to at most `max_width` display columns, appending `…` if anything was dropped.
pub fn truncate_display(text: &str, max_width: usize) -> String {
    let mut width = 0;
    for (idx, ch) in text.char_indices() {
        width += ch.width().unwrap_or(0);
        if width > max_width {
            return format!("{}…", &text[..idx]);
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rounds_half_up() {
        assert_eq!(normalize(65536, 65536), Some(100));
        assert_eq!(normalize(1, 200), Some(1)); // 0.5
        assert_eq!(normalize(87, 87), Some(100));
        assert_eq!(normalize(0, 87), Some(0));
        assert_eq!(normalize(5, 0), None);
    }

    #[test]
    fn normalize_is_monotonic() {
        for max in [1, 3, 7, 87, 100, 255, 65536, 100_000] {
            let mut last = 0;
            for level in 0..=100 {
                let pct = normalize(level, max).unwrap();
                assert!(pct >= last, "max={} level={}", max, level);
                last = pct;
            }
        }
    }

    #[test]
    fn denormalize_scales_to_max() {
        assert_eq!(denormalize(50, 87), 44); // 43.5
        assert_eq!(denormalize(100, 65536), 65536);
        assert_eq!(denormalize(0, 65536), 0);
    }

    #[test]
    fn percent_tokens() {
        assert_eq!(parse_percent("73%"), Some(73));
        assert_eq!(parse_percent("58%,"), Some(58));
        assert_eq!(parse_percent("abc"), None);
    }

    #[test]
    fn truncation_counts_columns() {
        assert_eq!(truncate_display("short", 38), "short");
        assert_eq!(truncate_display("abcdef", 3), "abc…");
        assert_eq!(truncate_display("日本語テキスト", 4), "日本…");
    }
}
