/// Caller key for calls without a usable phone number.
pub const UNKNOWN_CALLER: &str = "unknown";

/// Digits-only caller key keeping the last 10 digits, so `+1 (555) 123-4567`
/// and `555.123.4567` share a key. No digits at all maps to [`UNKNOWN_CALLER`].
#[must_use]
pub fn normalize_phone(raw: Option<&str>) -> String {
    let digits: Vec<char> = raw
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return UNKNOWN_CALLER.to_owned();
    }

    digits[digits.len().saturating_sub(10)..].iter().collect()
}
