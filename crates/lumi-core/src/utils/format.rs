use chrono::{DateTime, Local, NaiveDate, Utc};

/// Take at most `max_chars` characters without splitting a code point
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        format!("{}...", truncate_chars(s, max_len - 3))
    }
}

/// Uppercase the first character, leave the rest untouched ("aluno" -> "Aluno")
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Local wall-clock time of a chat timestamp, e.g. "14:05:09"
pub fn format_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Date as shown on the daily report, e.g. "18/10/2026"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Olá, turma", 6), "Olá...");
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("çãé", 2), "çã");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("aluno"), "Aluno");
        assert_eq!(capitalize_first("ee"), "Ee");
        assert_eq!(capitalize_first("élia"), "Élia");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date(date), "07/03/2026");
    }
}
