//! Parser for cron patterns (§4.3 of `SPEC_FULL.md`).
//!
//! Mirrors the teacher parser's overall shape — trim, substitute alpha
//! names, tokenize on whitespace, validate field count, parse each field in
//! turn — but the field grammar itself is this spec's own: ranges/steps/
//! lists plus the `L`/`W`/`LW`/`#` anchor tokens, an optional `WOY:`/`S..`/
//! `E..` seventh token, a `|` alternation operator, and the `EOD:`/`SOD:`
//! bare-modifier top-level forms. There are no `@nicknames`, no `?`
//! wildcard alias, and no configurable parser variants (`dom_and_dow`,
//! `alternative_weekdays`) — the new grammar has exactly one reading of
//! every pattern, so `CronParser`'s builder is gone along with them.

use crate::bitset;
use crate::errors::CronError;
use crate::pattern::{CompiledPattern, DayOfMonthAnchor, DayOfWeekAnchor, Modifier, PeriodUnit};
use std::str::FromStr;

const MONTH_NAMES: [(&str, &str); 12] = [
    ("JAN", "1"), ("FEB", "2"), ("MAR", "3"), ("APR", "4"),
    ("MAY", "5"), ("JUN", "6"), ("JUL", "7"), ("AUG", "8"),
    ("SEP", "9"), ("OCT", "10"), ("NOV", "11"), ("DEC", "12"),
];

const WEEKDAY_NAMES: [(&str, &str); 7] = [
    ("SUN", "0"), ("MON", "1"), ("TUE", "2"), ("WED", "3"),
    ("THU", "4"), ("FRI", "5"), ("SAT", "6"),
];

fn invalid(msg: impl Into<String>) -> CronError {
    CronError::InvalidPattern(msg.into())
}

fn replace_names(field: &str, names: &[(&str, &str)]) -> String {
    let mut replaced = field.to_string();
    for (name, value) in names {
        replaced = replaced.replace(name, value);
    }
    replaced
}

/// Parses a cron pattern string (§4.3). This is the entry point behind
/// [`CompiledPattern`]'s [`FromStr`] impl and the crate's public `parse` fn.
pub fn parse(input: &str) -> Result<CompiledPattern, CronError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("pattern is empty"));
    }

    let upper = trimmed.to_uppercase();

    if let Some(rest) = upper.strip_prefix("EOD:") {
        let modifier = parse_modifier_token(rest.trim(), 'E')?;
        let mut p = CompiledPattern::empty();
        p.is_eod_pattern = true;
        p.eod = Some(modifier);
        return Ok(p);
    }
    if let Some(rest) = upper.strip_prefix("SOD:") {
        let modifier = parse_modifier_token(rest.trim(), 'S')?;
        let mut p = CompiledPattern::empty();
        p.is_sod_pattern = true;
        p.sod = Some(modifier);
        return Ok(p);
    }

    if upper.contains('|') {
        let mut branches = upper.split('|').map(str::trim);
        let first = branches.next().ok_or_else(|| invalid("empty alternation"))?;
        let mut acc = parse_cron_body(first)?;
        for branch in branches {
            let next = parse_cron_body(branch)?;
            acc.minutes |= next.minutes;
            acc.hours |= next.hours;
            acc.days_of_month |= next.days_of_month;
            acc.months |= next.months;
            acc.days_of_week |= next.days_of_week;
            // Anchors/modifiers/WOY are retained from the left-most branch
            // (§4.3's alternation rule); `acc` already carries them.
        }
        return Ok(acc);
    }

    parse_cron_body(&upper)
}

fn parse_cron_body(upper: &str) -> Result<CompiledPattern, CronError> {
    let mut parts: Vec<String> = upper.split_whitespace().map(String::from).collect();
    if parts.len() != 6 && parts.len() != 7 {
        return Err(invalid(
            "pattern must consist of six fields (seconds, minute, hour, day of month, month, \
             day of week) plus an optional seventh WOY/SOD/EOD modifier field",
        ));
    }

    parts[4] = replace_names(&parts[4], &MONTH_NAMES);
    parts[5] = replace_names(&parts[5], &WEEKDAY_NAMES);

    throw_at_illegal_characters(&parts[..6])?;

    // parts[0] (seconds) is tokenized and validated but not retained; §4.1
    // says it is always ignored.
    parse_numeric_field(&parts[0], 0, 59)?;

    let minutes = parse_numeric_field(&parts[1], 0, 59)?;
    let hours = parse_numeric_field(&parts[2], 0, 23)?;
    let (days_of_month, dom_anchor) = parse_dom_field(&parts[3])?;
    let months = parse_numeric_field(&parts[4], 1, 12)?;
    let (days_of_week, dow_anchor) = parse_dow_field(&parts[5])?;

    let mut pattern = CompiledPattern {
        minutes,
        hours,
        days_of_month,
        months,
        days_of_week,
        has_cron: true,
        is_eod_pattern: false,
        is_sod_pattern: false,
        eod: None,
        sod: None,
        woy: Default::default(),
        dom_anchor,
        dow_anchor,
    };

    if let Some(seventh) = parts.get(6) {
        parse_seventh_token(seventh, &mut pattern)?;
    }

    Ok(pattern)
}

fn parse_seventh_token(token: &str, pattern: &mut CompiledPattern) -> Result<(), CronError> {
    if token == "WOY" {
        pattern.woy.enabled = true;
        return Ok(());
    }
    if let Some(rest) = token.strip_prefix("WOY:") {
        pattern.woy.enabled = true;
        for item in rest.split(',') {
            let week: u8 = item
                .parse()
                .map_err(|_| invalid(format!("invalid WOY week number '{item}'")))?;
            if !(1..=53).contains(&week) {
                return Err(invalid(format!("WOY week number {week} out of range 1..=53")));
            }
            if !pattern.woy.push(week) {
                return Err(invalid("WOY accepts at most four week numbers"));
            }
        }
        return Ok(());
    }
    if let Some(c) = token.chars().next() {
        if c == 'S' {
            pattern.sod = Some(parse_modifier_token(token, 'S')?);
            return Ok(());
        }
        if c == 'E' {
            pattern.eod = Some(parse_modifier_token(token, 'E')?);
            return Ok(());
        }
    }
    Err(invalid(format!(
        "seventh field '{token}' must be WOY, WOY:<weeks>, S<amount><unit>, or E<amount><unit>"
    )))
}

/// Parses `S<d><U>` / `E<d><U>` (§4.3, §4.6). `prefix` is `'S'` or `'E'`.
/// `<d>` is exactly one decimal digit, matching the reference C parser
/// (`jcron_parse.c`'s `modifier[1] - '0'`, which consumes a single digit
/// character before checking the next byte as the unit letter) — a
/// multi-digit amount such as `S30M` is rejected outright, not parsed.
fn parse_modifier_token(token: &str, prefix: char) -> Result<Modifier, CronError> {
    let token = token.trim();
    let body = token.strip_prefix(prefix).ok_or_else(|| {
        invalid(format!("modifier '{token}' must start with '{prefix}'"))
    })?;
    let mut chars = body.chars();
    let digit = chars
        .next()
        .ok_or_else(|| invalid(format!("modifier '{token}' is missing an amount and unit")))?;
    if !digit.is_ascii_digit() {
        return Err(invalid(format!(
            "modifier '{token}' must have a single decimal digit amount"
        )));
    }
    let amount = digit.to_digit(10).expect("checked is_ascii_digit above") as u8;

    // A bare digit with no unit letter (`S5`, `E3`) defaults to `D` (§4.3).
    let unit_char = match chars.next() {
        None => return Ok(Modifier { amount, unit: PeriodUnit::Day }),
        Some(c) => c,
    };
    if chars.next().is_some() || unit_char.is_ascii_digit() {
        return Err(invalid(format!(
            "modifier '{token}' must have a single decimal digit amount"
        )));
    }
    let unit = PeriodUnit::from_str(&unit_char.to_string())
        .map_err(|_| invalid(format!("modifier '{token}' has an unknown unit '{unit_char}'")))?;
    Ok(Modifier { amount, unit })
}

fn throw_at_illegal_characters(parts: &[String]) -> Result<(), CronError> {
    let base = ['*', '/', ',', '-', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
    let dom_extra = ['L', 'W'];
    let dow_extra = ['L', '#'];

    for (i, part) in parts.iter().enumerate() {
        let extra: &[char] = match i {
            3 => &dom_extra,
            5 => &dow_extra,
            _ => &[],
        };
        for ch in part.chars() {
            if !base.contains(&ch) && !extra.contains(&ch) {
                return Err(invalid(format!(
                    "illegal character '{ch}' in field '{part}'"
                )));
            }
        }
    }
    Ok(())
}

/// Parses one comma-separated numeric field into a bitmask: `*`, `*/S`, `N`,
/// `N-M`, `N-M/S`, `N/S`, or a comma list of any of the above (§4.3).
fn parse_numeric_field(field: &str, min: u8, max: u8) -> Result<u64, CronError> {
    let mut mask = 0u64;
    for item in field.split(',') {
        mask |= parse_field_item(item, min, max)?;
    }
    if mask == 0 {
        return Err(invalid(format!("field '{field}' matches no values")));
    }
    Ok(mask)
}

fn parse_field_item(item: &str, min: u8, max: u8) -> Result<u64, CronError> {
    let (range_part, step) = match item.split_once('/') {
        Some((r, s)) => {
            let step: u8 = s
                .parse()
                .map_err(|_| invalid(format!("invalid step in '{item}'")))?;
            if step == 0 {
                return Err(invalid(format!("step must be positive in '{item}'")));
            }
            (r, Some(step))
        }
        None => (item, None),
    };

    let (start, end) = if range_part == "*" {
        (min, max)
    } else if let Some((lo, hi)) = range_part.split_once('-') {
        let lo: u8 = lo
            .parse()
            .map_err(|_| invalid(format!("invalid range start in '{item}'")))?;
        let hi: u8 = hi
            .parse()
            .map_err(|_| invalid(format!("invalid range end in '{item}'")))?;
        (lo, hi)
    } else {
        let v: u8 = range_part
            .parse()
            .map_err(|_| invalid(format!("invalid value '{range_part}'")))?;
        match step {
            Some(_) => (v, max),
            None => (v, v),
        }
    };

    if start < min || end > max || start > end {
        return Err(invalid(format!(
            "value '{item}' out of range {min}..={max}"
        )));
    }

    let mut mask = 0u64;
    let step = step.unwrap_or(1);
    let mut v = start;
    while v <= end {
        mask = bitset::set(mask, v);
        match v.checked_add(step) {
            Some(next) => v = next,
            None => break,
        }
    }
    Ok(mask)
}

/// Parses the day-of-month field (§4.3): a comma list whose items each
/// independently read as `L`, `LW`, `<N>W`, or the ordinary numeric grammar
/// (single value, range, or stepped range), accumulating into a plain-day
/// bitmask plus an [`DayOfMonthAnchor`] of OR-combinable flags — `"5,L"`
/// sets bit 5 in the mask and `anchor.last`, not one or the other.
fn parse_dom_field(field: &str) -> Result<(u64, DayOfMonthAnchor), CronError> {
    let mut mask = 0u64;
    let mut anchor = DayOfMonthAnchor::default();

    for item in field.split(',') {
        if item == "L" {
            anchor.last = true;
            continue;
        }
        if item == "LW" {
            anchor.last_weekday = true;
            continue;
        }
        if let Some(prefix) = item.strip_suffix('W') {
            if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
                let day: u8 = prefix
                    .parse()
                    .map_err(|_| invalid(format!("invalid day in '{item}'")))?;
                if !(1..=31).contains(&day) {
                    return Err(invalid(format!("day {day} out of range 1..=31 in '{item}'")));
                }
                anchor.nearest_weekday_days = bitset::set(anchor.nearest_weekday_days, day);
                continue;
            }
        }
        mask |= parse_field_item(item, 1, 31)?;
    }

    if mask == 0 && anchor.is_empty() {
        return Err(invalid(format!("field '{field}' matches no values")));
    }
    Ok((mask, anchor))
}

/// Parses the day-of-week field, recognizing the `L`/`<N>L`/`<N>#<M>`/
/// `<N>#L` anchors before falling back to the ordinary numeric grammar
/// (§4.3). Bare `L` means the last day of the week, Saturday (weekday 6) —
/// the reading the teacher's own OCPS fixtures use for a lone anchor token.
fn parse_dow_field(field: &str) -> Result<(u64, DayOfWeekAnchor), CronError> {
    if field == "L" {
        return Ok((bitset::set(0, 6), DayOfWeekAnchor::LastOccurrence(6)));
    }
    if let Some((dow_part, nth_part)) = field.split_once('#') {
        let dow = parse_weekday_value(dow_part, field)?;
        if nth_part == "L" {
            return Ok((bitset::set(0, dow), DayOfWeekAnchor::LastOccurrence(dow)));
        }
        let n: u8 = nth_part
            .parse()
            .map_err(|_| invalid(format!("invalid occurrence index in '{field}'")))?;
        if !(1..=5).contains(&n) {
            return Err(invalid(format!(
                "occurrence index {n} out of range 1..=5 in '{field}'"
            )));
        }
        // Exclusive anchor: the weekday bitmask is not consulted when
        // `DayOfWeekAnchor::Nth` is present (§4.3).
        return Ok((0, DayOfWeekAnchor::Nth { dow, n }));
    }
    if let Some(prefix) = field.strip_suffix('L') {
        if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
            let dow = parse_weekday_value(prefix, field)?;
            return Ok((bitset::set(0, dow), DayOfWeekAnchor::LastOccurrence(dow)));
        }
    }
    let mask = parse_numeric_field(field, 0, 6)?;
    Ok((mask, DayOfWeekAnchor::None))
}

fn parse_weekday_value(s: &str, field: &str) -> Result<u8, CronError> {
    let v: u8 = s
        .parse()
        .map_err(|_| invalid(format!("invalid weekday in '{field}'")))?;
    if v > 6 {
        return Err(invalid(format!("weekday {v} out of range 0..=6 in '{field}'")));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_every_field() {
        let p = parse("* * * * * *").unwrap();
        assert_eq!(p.minutes, bitset::full_range(0, 59));
        assert_eq!(p.hours, bitset::full_range(0, 23));
        assert_eq!(p.months, bitset::full_range(1, 12));
    }

    #[test]
    fn step_and_list_fields() {
        let p = parse("* */15 9-17 * * MON,WED,FRI").unwrap();
        assert!(bitset::test(p.minutes, 0));
        assert!(bitset::test(p.minutes, 45));
        assert!(!bitset::test(p.minutes, 46));
        for h in 9..=17u8 {
            assert!(bitset::test(p.hours, h));
        }
        assert!(bitset::test(p.days_of_week, 1));
        assert!(bitset::test(p.days_of_week, 3));
        assert!(bitset::test(p.days_of_week, 5));
        assert!(!bitset::test(p.days_of_week, 2));
    }

    #[test]
    fn last_day_of_month_anchor() {
        let p = parse("* 0 0 L * *").unwrap();
        assert!(p.dom_anchor.last);
        assert!(!p.dom_anchor.last_weekday);
        assert_eq!(p.dom_anchor.nearest_weekday_days, 0);
        assert_eq!(p.days_of_month, 0);
    }

    #[test]
    fn last_weekday_of_month_anchor() {
        let p = parse("* 0 0 LW * *").unwrap();
        assert!(p.dom_anchor.last_weekday);
        assert!(!p.dom_anchor.last);
    }

    #[test]
    fn nearest_weekday_anchor() {
        let p = parse("* 0 0 5W 7 *").unwrap();
        assert!(bitset::test(p.dom_anchor.nearest_weekday_days, 5));
        assert!(bitset::test(p.months, 7));
    }

    #[test]
    fn day_of_month_list_combines_numeric_and_anchor_items() {
        // §4.3: "5,L" is a comma list whose items are independently
        // admissible, not a whole-field anchor reading — day 5 OR the last
        // day of the month, both represented on the same compiled pattern.
        let p = parse("* 0 0 5,L * *").unwrap();
        assert!(bitset::test(p.days_of_month, 5));
        assert!(p.dom_anchor.last);
        assert!(!bitset::test(p.days_of_month, 10));
    }

    #[test]
    fn last_friday_of_month_anchor() {
        let p = parse("* 0 0 * * 5L").unwrap();
        assert_eq!(p.dow_anchor, DayOfWeekAnchor::LastOccurrence(5));
        assert!(bitset::test(p.days_of_week, 5));
    }

    #[test]
    fn nth_weekday_anchor() {
        let p = parse("* 0 0 * * 2#2").unwrap();
        assert_eq!(p.dow_anchor, DayOfWeekAnchor::Nth { dow: 2, n: 2 });
        assert_eq!(p.days_of_week, 0, "exclusive anchor leaves the mask empty");
    }

    #[test]
    fn nth_weekday_last_alias() {
        let p = parse("* 0 0 * * 2#L").unwrap();
        assert_eq!(p.dow_anchor, DayOfWeekAnchor::LastOccurrence(2));
    }

    #[test]
    fn woy_list() {
        let p = parse("* 0 0 * * * WOY:1,2,52").unwrap();
        assert!(p.woy.enabled);
        assert_eq!(p.woy.weeks(), &[1, 2, 52]);
    }

    #[test]
    fn bare_woy_flag_has_no_weeks() {
        let p = parse("* 0 0 * * * WOY").unwrap();
        assert!(p.woy.enabled);
        assert!(p.woy.weeks().is_empty());
    }

    #[test]
    fn sod_and_eod_top_level_modifier_patterns() {
        let sod = parse("SOD:S3M").unwrap();
        assert!(sod.is_sod_pattern);
        assert!(!sod.has_cron);
        assert_eq!(sod.sod.unwrap().amount, 3);

        let eod = parse("EOD:E1D").unwrap();
        assert!(eod.is_eod_pattern);
        assert_eq!(eod.eod.unwrap().unit, PeriodUnit::Day);
    }

    #[test]
    fn multi_digit_modifier_amount_is_rejected() {
        // §4.3: the modifier amount is a single decimal digit; "S30M" must
        // be rejected rather than silently parsed as amount 30.
        assert!(parse("SOD:S30M").is_err());
        assert!(parse("* 0 0 * * * E12H").is_err());
    }

    #[test]
    fn bare_digit_modifier_defaults_unit_to_day() {
        let sod = parse("SOD:S5").unwrap();
        let m = sod.sod.unwrap();
        assert_eq!(m.amount, 5);
        assert_eq!(m.unit, PeriodUnit::Day);

        let p = parse("* 0 0 * * * E3").unwrap();
        let m = p.eod.unwrap();
        assert_eq!(m.amount, 3);
        assert_eq!(m.unit, PeriodUnit::Day);
    }

    #[test]
    fn trailing_modifier_token_on_cron_pattern() {
        let p = parse("* 0 0 * * * E2H").unwrap();
        assert!(p.has_cron);
        let m = p.eod.unwrap();
        assert_eq!(m.amount, 2);
        assert_eq!(m.unit, PeriodUnit::Hour);
    }

    #[test]
    fn alternation_ors_masks_and_keeps_left_modifiers() {
        let p = parse("* 0 9 * * * WOY:1 | * 0 17 * * *").unwrap();
        assert!(bitset::test(p.hours, 9));
        assert!(bitset::test(p.hours, 17));
        assert!(p.woy.enabled, "left branch's WOY modifier is retained");
    }

    #[test]
    fn field_count_must_be_six_or_seven() {
        assert!(matches!(parse("* * * *"), Err(CronError::InvalidPattern(_))));
    }

    #[test]
    fn illegal_character_is_rejected() {
        assert!(matches!(parse("* ? * * * *"), Err(CronError::InvalidPattern(_))));
    }

    #[test]
    fn month_and_weekday_alpha_names() {
        let p = parse("* 0 0 * JAN,DEC MON-FRI").unwrap();
        assert!(bitset::test(p.months, 1));
        assert!(bitset::test(p.months, 12));
        assert!(bitset::test(p.days_of_week, 1));
        assert!(bitset::test(p.days_of_week, 5));
    }
}
