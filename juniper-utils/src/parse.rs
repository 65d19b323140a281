/// Parse a compact duration token like `30s`, `10m`, `2h`, `1d`, `1h30m`,
/// or plain seconds.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let compact: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let bytes = compact.as_bytes();
    let mut cursor = 0;
    let mut total_seconds = 0_u64;
    let mut saw_unit_segment = false;

    while cursor < bytes.len() {
        let number_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if number_start == cursor {
            return None;
        }

        let number = compact[number_start..cursor].parse::<u64>().ok()?;
        if number == 0 {
            return None;
        }

        let saw_unit = cursor < bytes.len();
        let multiplier = if saw_unit {
            let unit = bytes[cursor] as char;
            cursor += 1;

            match unit {
                's' | 'S' => 1_u64,
                'm' | 'M' => 60_u64,
                'h' | 'H' => 60_u64 * 60,
                'd' | 'D' => 60_u64 * 60 * 24,
                _ => return None,
            }
        } else {
            1_u64
        };

        // A bare number is only valid on its own, not trailing a unit
        // segment ("10m5" is ambiguous).
        if !saw_unit && saw_unit_segment {
            return None;
        }

        saw_unit_segment = saw_unit_segment || saw_unit;

        let part_seconds = number.checked_mul(multiplier)?;
        total_seconds = total_seconds.checked_add(part_seconds)?;
    }

    if total_seconds == 0 {
        None
    } else {
        Some(total_seconds)
    }
}

/// Parse a channel reference: `<#id>` or a plain id.
pub fn parse_channel_id(raw: &str) -> Option<u64> {
    parse_snowflake(raw, "<#", ">")
}

/// Parse a role reference: `<@&id>` or a plain id.
pub fn parse_role_id(raw: &str) -> Option<u64> {
    parse_snowflake(raw, "<@&", ">")
}

/// Parse a user reference: `<@id>`, `<@!id>`, or a plain id.
pub fn parse_user_id(raw: &str) -> Option<u64> {
    let value = raw.trim();
    if let Ok(id) = value.parse::<u64>() {
        return Some(id);
    }

    value
        .strip_prefix("<@")?
        .strip_suffix('>')
        .map(|inner| inner.trim_start_matches('!'))?
        .parse::<u64>()
        .ok()
}

fn parse_snowflake(raw: &str, prefix: &str, suffix: &str) -> Option<u64> {
    let value = raw.trim();
    if let Ok(id) = value.parse::<u64>() {
        return Some(id);
    }

    value
        .strip_prefix(prefix)?
        .strip_suffix(suffix)?
        .parse::<u64>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_channel_id, parse_duration_seconds, parse_role_id, parse_user_id};

    #[test]
    fn durations_parse_in_all_supported_shapes() {
        assert_eq!(parse_duration_seconds("30s"), Some(30));
        assert_eq!(parse_duration_seconds("10m"), Some(600));
        assert_eq!(parse_duration_seconds("2h"), Some(7200));
        assert_eq!(parse_duration_seconds("1d"), Some(86_400));
        assert_eq!(parse_duration_seconds("1h30m"), Some(5400));
        assert_eq!(parse_duration_seconds("90"), Some(90));
        assert_eq!(parse_duration_seconds(" 5 m "), Some(300));
    }

    #[test]
    fn bad_durations_are_rejected() {
        assert_eq!(parse_duration_seconds(""), None);
        assert_eq!(parse_duration_seconds("0m"), None);
        assert_eq!(parse_duration_seconds("abc"), None);
        assert_eq!(parse_duration_seconds("10x"), None);
        assert_eq!(parse_duration_seconds("10m5"), None);
    }

    #[test]
    fn snowflake_mentions_parse() {
        assert_eq!(parse_channel_id("<#123>"), Some(123));
        assert_eq!(parse_channel_id("123"), Some(123));
        assert_eq!(parse_channel_id("<@123>"), None);

        assert_eq!(parse_role_id("<@&456>"), Some(456));
        assert_eq!(parse_role_id("456"), Some(456));

        assert_eq!(parse_user_id("<@789>"), Some(789));
        assert_eq!(parse_user_id("<@!789>"), Some(789));
        assert_eq!(parse_user_id("789"), Some(789));
        assert_eq!(parse_user_id("<#789>"), None);
    }
}
