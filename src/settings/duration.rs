use chrono::TimeDelta;

use crate::error::ValidationError;

/// Parse a compact duration such as `"1h30m"`, `"45m"` or `"2h30m15s"`.
///
/// Grammar: `(<digits>h)?(<digits>m)?(<digits>s)?`, matched against the whole
/// input. Components must appear in that order and each at most once. An
/// input in which no component matched (including `""`) is rejected even
/// though it would describe a zero duration; an explicit `"0m"` is accepted.
pub fn parse_duration(text: &str) -> Result<TimeDelta, ValidationError> {
    // Index into UNITS of the next unit allowed; enforces h < m < s ordering.
    const UNITS: [(char, i64); 3] = [('h', 3600), ('m', 60), ('s', 1)];

    let mut next_unit = 0;
    let mut digits = String::new();
    let mut total: i64 = 0;
    let mut matched = false;

    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let offset = UNITS[next_unit..]
            .iter()
            .position(|&(unit, _)| unit == c)
            .ok_or(ValidationError::InvalidDuration)?;
        if digits.is_empty() {
            return Err(ValidationError::InvalidDuration);
        }

        let (_, scale) = UNITS[next_unit + offset];
        let value: i64 = digits
            .parse()
            .map_err(|_| ValidationError::InvalidDuration)?;
        total = value
            .checked_mul(scale)
            .and_then(|secs| total.checked_add(secs))
            .ok_or(ValidationError::InvalidDuration)?;

        digits.clear();
        next_unit += offset + 1;
        matched = true;
    }

    // Trailing digits without a unit suffix.
    if !digits.is_empty() || !matched {
        return Err(ValidationError::InvalidDuration);
    }

    TimeDelta::try_seconds(total).ok_or(ValidationError::InvalidDuration)
}
