/// Format a per-guild case number for display (e.g. 12 -> "Case #12").
pub fn case_label(case_number: u64) -> String {
    format!("Case #{case_number}")
}

/// Parse a case reference like "12" or "#12".
pub fn parse_case_reference(raw: &str) -> Option<u64> {
    let trimmed = raw.trim().trim_start_matches('#');
    trimmed.parse::<u64>().ok().filter(|number| *number > 0)
}

/// Neutralize @mentions in user-supplied text before echoing it back.
pub fn sanitize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m,
/// 1h 30m, 1d 2h).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    if hours > 0 {
        let mut parts = vec![format!("{}h", hours)];
        if minutes > 0 {
            parts.push(format!("{}m", minutes));
        }
        if seconds > 0 {
            parts.push(format!("{}s", seconds));
        }
        return parts.join(" ");
    }

    if minutes > 0 {
        return if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        };
    }

    format!("{}s", seconds)
}

#[cfg(test)]
mod tests {
    use super::{case_label, format_compact_duration, parse_case_reference, sanitize_mentions};

    #[test]
    fn case_labels_and_references() {
        assert_eq!(case_label(12), "Case #12");
        assert_eq!(parse_case_reference("12"), Some(12));
        assert_eq!(parse_case_reference("#12"), Some(12));
        assert_eq!(parse_case_reference("  #7 "), Some(7));
        assert_eq!(parse_case_reference("0"), None);
        assert_eq!(parse_case_reference("abc"), None);
        assert_eq!(parse_case_reference(""), None);
    }

    #[test]
    fn mentions_are_neutralized() {
        assert_eq!(sanitize_mentions("hi @everyone"), "hi @\u{200B}everyone");
        assert_eq!(sanitize_mentions("plain"), "plain");
    }

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3660), "1h 1m");
        assert_eq!(format_compact_duration(3670), "1h 1m 10s");
        assert_eq!(format_compact_duration(3605), "1h 5s");
        assert_eq!(format_compact_duration(86400), "1d");
        assert_eq!(format_compact_duration(90000), "1d 1h");
    }
}
