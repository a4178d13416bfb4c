//! Monthly quota types: billing periods, usage records, limits, and tiers.

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, ordered chronologically.
///
/// Serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Build a period, returning `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The calendar month containing `at`, in `at`'s own timezone.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid period: '{s}' (expected YYYY-MM)"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid period year: '{year}'"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid period month: '{month}'"))?;
        Period::new(year, month).ok_or_else(|| format!("invalid period month: {month}"))
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// A user's usage counter for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    pub count: u32,
    pub period: Period,
}

impl QuotaRecord {
    /// A zeroed record for `period`.
    pub fn fresh(period: Period) -> Self {
        Self { count: 0, period }
    }
}

/// Per-user monthly limits.
///
/// Either threshold may be absent, which removes that degraded tier. With both
/// absent the quota is a single hard cutoff at `max_turns_per_month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimits {
    pub max_turns_per_month: u32,
    pub warning_threshold: Option<u32>,
    pub exhausted_threshold: Option<u32>,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            max_turns_per_month: 30,
            warning_threshold: Some(15),
            exhausted_threshold: Some(25),
        }
    }
}

/// How a turn is served given the user's current count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Full backend invocation.
    Normal,
    /// Canned "you've talked a lot this month" reply.
    Warning,
    /// Canned "see you next month" reply.
    Exhausted,
    /// No reply at all and no charge.
    Blocked,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Normal => write!(f, "normal"),
            Tier::Warning => write!(f, "warning"),
            Tier::Exhausted => write!(f, "exhausted"),
            Tier::Blocked => write!(f, "blocked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_period_rejects_invalid_month() {
        assert!(Period::new(2025, 0).is_none());
        assert!(Period::new(2025, 13).is_none());
        assert!(Period::new(2025, 12).is_some());
    }

    #[test]
    fn test_period_display_and_parse() {
        let p = Period::new(2025, 7).unwrap();
        assert_eq!(p.to_string(), "2025-07");
        assert_eq!("2025-07".parse::<Period>().unwrap(), p);
        assert!("2025/07".parse::<Period>().is_err());
        assert!("2025-13".parse::<Period>().is_err());
        assert!("abcd-01".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_ordering_crosses_year() {
        let dec = Period::new(2024, 12).unwrap();
        let jan = Period::new(2025, 1).unwrap();
        assert!(dec < jan);
        assert!(jan < Period::new(2025, 2).unwrap());
    }

    #[test]
    fn test_period_from_datetime_respects_timezone() {
        // 2025-06-30 20:00 UTC is already July in UTC+9.
        let utc = Utc.with_ymd_and_hms(2025, 6, 30, 20, 0, 0).unwrap();
        assert_eq!(Period::from_datetime(&utc), Period::new(2025, 6).unwrap());

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let local = utc.with_timezone(&tokyo);
        assert_eq!(Period::from_datetime(&local), Period::new(2025, 7).unwrap());
    }

    #[test]
    fn test_period_serde_as_string() {
        let record = QuotaRecord {
            count: 3,
            period: Period::new(2025, 6).unwrap(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"count":3,"period":"2025-06"}"#);
        let parsed: QuotaRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
