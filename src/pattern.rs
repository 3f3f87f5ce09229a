//! The compiled pattern (§3.1 of `SPEC_FULL.md`): an immutable, `Copy`,
//! stack-resident value produced once by [`crate::parser::parse`] and
//! consumed read-only by every other operation.
//!
//! This is a Rust-shaped encoding of the reference `jcron_pattern_t` layout,
//! not a byte-for-byte mirror of it — the spec explicitly says the physical
//! layout is implementation-private (§6, "Compiled-pattern layout"). Where
//! the C struct spends a sentinel triple (`type`/`modifier`/`unit`, `-1` /
//! `\0` meaning absent) this type uses `Option<Modifier>`; where it spends
//! five separate flag-plus-value fields on three mutually exclusive anchors
//! this type uses two small enums. Both encodings are `Copy`, fit on the
//! stack, and need no heap allocation — the only property §5 actually
//! requires.

use crate::bitset;

/// H/D/W/M modifier unit (§4.3, §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum PeriodUnit {
    #[strum(serialize = "H")]
    Hour,
    #[strum(serialize = "D")]
    Day,
    #[strum(serialize = "W")]
    Week,
    #[strum(serialize = "M")]
    Month,
}

/// A parsed `S<d><U>` / `E<d><U>` modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifier {
    pub amount: u8,
    pub unit: PeriodUnit,
}

/// Day-of-month side of the day predicate's anchor handling (§4.3, §4.5).
///
/// The day-of-month field is a comma list whose items independently admit a
/// plain numeric day, `L`, `LW`, or `<N>W`; any one of them being satisfied
/// admits the day (§4.3: `"5,L"` admits day 5 OR the last day of the month).
/// So unlike [`DayOfWeekAnchor`], which is a single mutually-exclusive
/// reading of the whole field, this is a set of independently OR-combinable
/// flags rather than an enum: `nearest_weekday_days` is itself a bitmask
/// since a field can carry more than one `<N>W` item (`"1W,15W"`).
///
/// `LastWeekday` ("LW") is not named in the reference header, but is
/// supplemented from the teacher library's own OCPS test suite
/// (`ocps_1_3_tests::test_last_weekday_lw`), which treats it as a natural
/// generalization of `L` and `NearestWeekday`: the weekday nearest to the
/// last calendar day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DayOfMonthAnchor {
    /// Bare `L` present in the field.
    pub last: bool,
    /// `LW` present in the field.
    pub last_weekday: bool,
    /// Bitmask of `N` for every `<N>W` item present in the field.
    pub nearest_weekday_days: u64,
}

impl DayOfMonthAnchor {
    pub(crate) fn is_empty(&self) -> bool {
        !self.last && !self.last_weekday && self.nearest_weekday_days == 0
    }
}

/// Day-of-week side of the day predicate's anchor handling (§4.3, §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayOfWeekAnchor {
    #[default]
    None,
    /// `<N>#<M>` (or the `<N>#L` alias, folded into [`DayOfWeekAnchor::LastOccurrence`]
    /// during parsing) — the `M`-th occurrence of weekday `N` in the month.
    /// Exclusive: when set, the ordinary weekday bitmask is not consulted.
    Nth { dow: u8, n: u8 },
    /// `<N>L` — the last occurrence of weekday `N` in the month. Unlike
    /// `Nth`, the weekday bitmask still carries bit `N`; this anchor only
    /// narrows the day-of-month side of the conjunction (see §4.3).
    LastOccurrence(u8),
}

/// Week-of-year restriction (§3.1, §4.3.1). Up to four ISO-like week indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekOfYear {
    pub enabled: bool,
    weeks: [u8; 4],
    count: u8,
}

impl WeekOfYear {
    pub fn weeks(&self) -> &[u8] {
        &self.weeks[..self.count as usize]
    }

    pub(crate) fn push(&mut self, week: u8) -> bool {
        if self.count as usize >= self.weeks.len() {
            return false;
        }
        self.weeks[self.count as usize] = week;
        self.count += 1;
        true
    }
}

/// The immutable compiled form of a cron pattern (§3.1).
///
/// Produced atomically by [`crate::parser::parse`]; every other operation in
/// this crate borrows it read-only. `Copy` + no interior mutability makes the
/// `Send`/`Sync`/shared-across-threads guarantee of §5 a property of the
/// type system rather than a convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompiledPattern {
    pub(crate) minutes: u64,
    pub(crate) hours: u64,
    pub(crate) days_of_month: u64,
    pub(crate) months: u64,
    pub(crate) days_of_week: u64,

    pub(crate) has_cron: bool,
    pub(crate) is_eod_pattern: bool,
    pub(crate) is_sod_pattern: bool,

    pub(crate) eod: Option<Modifier>,
    pub(crate) sod: Option<Modifier>,

    pub(crate) woy: WeekOfYear,
    pub(crate) dom_anchor: DayOfMonthAnchor,
    pub(crate) dow_anchor: DayOfWeekAnchor,
}

impl CompiledPattern {
    pub(crate) fn empty() -> Self {
        CompiledPattern {
            minutes: 0,
            hours: 0,
            days_of_month: 0,
            months: 0,
            days_of_week: 0,
            has_cron: false,
            is_eod_pattern: false,
            is_sod_pattern: false,
            eod: None,
            sod: None,
            woy: WeekOfYear::default(),
            dom_anchor: DayOfMonthAnchor::default(),
            dow_anchor: DayOfWeekAnchor::None,
        }
    }

    /// True if this pattern has a cron body (as opposed to being a bare
    /// `EOD:`/`SOD:` modifier pattern).
    pub fn has_cron(&self) -> bool {
        self.has_cron
    }

    pub fn is_eod_pattern(&self) -> bool {
        self.is_eod_pattern
    }

    pub fn is_sod_pattern(&self) -> bool {
        self.is_sod_pattern
    }

    pub fn eod(&self) -> Option<Modifier> {
        self.eod
    }

    pub fn sod(&self) -> Option<Modifier> {
        self.sod
    }

    pub fn week_of_year(&self) -> &WeekOfYear {
        &self.woy
    }

    pub fn minute_is_admissible(&self, minute: u8) -> bool {
        bitset::test(self.minutes, minute)
    }

    pub fn hour_is_admissible(&self, hour: u8) -> bool {
        bitset::test(self.hours, hour)
    }

    pub fn month_is_admissible(&self, month: u8) -> bool {
        bitset::test(self.months, month)
    }

    /// An iterator over successive matches strictly after `from` (§6).
    pub fn occurrences_from(&self, from: i64) -> crate::iterator::OccurrencesIter<'_> {
        crate::iterator::OccurrencesIter::forward(self, from)
    }

    /// An iterator over successive matches strictly before `before`, walking
    /// backward in time (§6).
    pub fn occurrences_before(&self, before: i64) -> crate::iterator::OccurrencesIter<'_> {
        crate::iterator::OccurrencesIter::backward(self, before)
    }

    /// Reconstructs a canonical textual form of the cron body from the
    /// compiled bitmasks. This is *not* a reproduction of the original input
    /// string (which is never retained — keeping it would cost an owned
    /// `String` per pattern, violating the stack-resident, allocation-free
    /// design in §5) but a structurally-equivalent round trip: re-parsing
    /// this string yields a `CompiledPattern` equal to this one in every
    /// field that affects matching. Anchors and modifiers are appended in
    /// the fixed field positions §4.3 defines.
    fn canonical_cron_body(&self) -> String {
        fn list_field(mask: u64, min: u8, max: u8) -> String {
            if mask == bitset::full_range(min, max) {
                return "*".to_string();
            }
            let mut parts = Vec::new();
            let mut v = min;
            while v <= max {
                if bitset::test(mask, v) {
                    parts.push(v.to_string());
                }
                if v == max {
                    break;
                }
                v += 1;
            }
            if parts.is_empty() { "*".to_string() } else { parts.join(",") }
        }

        fn dom_field(mask: u64, anchor: &DayOfMonthAnchor) -> String {
            if mask == bitset::full_range(1, 31) && anchor.is_empty() {
                return "*".to_string();
            }
            let mut parts = Vec::new();
            for v in 1..=31u8 {
                if bitset::test(mask, v) {
                    parts.push(v.to_string());
                }
            }
            for v in 1..=31u8 {
                if bitset::test(anchor.nearest_weekday_days, v) {
                    parts.push(format!("{v}W"));
                }
            }
            if anchor.last {
                parts.push("L".to_string());
            }
            if anchor.last_weekday {
                parts.push("LW".to_string());
            }
            if parts.is_empty() { "*".to_string() } else { parts.join(",") }
        }

        let dom = dom_field(self.days_of_month, &self.dom_anchor);
        let dow = match self.dow_anchor {
            DayOfWeekAnchor::Nth { dow, n } => format!("{dow}#{n}"),
            DayOfWeekAnchor::LastOccurrence(d) => format!("{d}L"),
            DayOfWeekAnchor::None => list_field(self.days_of_week, 0, 6),
        };

        let mut body = format!(
            "* {} {} {} {} {}",
            list_field(self.minutes, 0, 59),
            list_field(self.hours, 0, 23),
            dom,
            list_field(self.months, 1, 12),
            dow,
        );
        if self.woy.enabled {
            if self.woy.weeks().is_empty() {
                body.push_str(" WOY");
            } else {
                let weeks: Vec<String> = self.woy.weeks().iter().map(|w| w.to_string()).collect();
                body.push_str(&format!(" WOY:{}", weeks.join(",")));
            }
        } else if let Some(m) = self.sod {
            body.push_str(&format!(" S{}{}", m.amount, m.unit));
        } else if let Some(m) = self.eod {
            body.push_str(&format!(" E{}{}", m.amount, m.unit));
        }
        body
    }
}

impl std::fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_eod_pattern {
            let m = self.eod.expect("is_eod_pattern implies eod is Some");
            write!(f, "EOD:E{}{}", m.amount, m.unit)
        } else if self.is_sod_pattern {
            let m = self.sod.expect("is_sod_pattern implies sod is Some");
            write!(f, "SOD:S{}{}", m.amount, m.unit)
        } else {
            write!(f, "{}", self.canonical_cron_body())
        }
    }
}

impl std::str::FromStr for CompiledPattern {
    type Err = crate::errors::CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::CompiledPattern;
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for CompiledPattern {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_string())
        }
    }

    impl<'de> Deserialize<'de> for CompiledPattern {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            CompiledPattern::from_str(&s).map_err(D::Error::custom)
        }
    }

}
