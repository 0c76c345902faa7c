//! Member Model

use serde::{Deserialize, Serialize};

/// Member entity (会员)
///
/// Identity fields are immutable after signup; the profile dates
/// (`birthday`, `relationship_anniversary_date`) are settable by the
/// member only and drive the special-reward claim windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    /// Custodial wallet address for USDC payouts (optional)
    pub wallet_address: Option<String>,
    /// Birthday as "MM-DD" (year withheld by design)
    pub birthday: Option<String>,
    /// Relationship anniversary as "YYYY-MM-DD"
    pub relationship_anniversary_date: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Member profile update payload (member-settable fields only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProfileUpdate {
    pub birthday: Option<String>,
    pub relationship_anniversary_date: Option<String>,
}

/// A month/day pair without a year, the anchor of a claim window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Parse from "MM-DD" or "YYYY-MM-DD" (the year, if present, is dropped).
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        let (month, day) = match parts.as_slice() {
            [m, d] => (m.parse().ok()?, d.parse().ok()?),
            [_, m, d] => (m.parse().ok()?, d.parse().ok()?),
            _ => return None,
        };
        // Validate against a leap year so Feb 29 stays a legal
        // birthday while Feb 30 or Apr 31 are rejected.
        chrono::NaiveDate::from_ymd_opt(2024, month, day)?;
        Some(Self { month, day })
    }

    /// From a Unix-millis timestamp (UTC), used for member anniversaries,
    /// where the anchor is the signup date.
    pub fn from_millis(millis: i64) -> Self {
        use chrono::Datelike;
        let dt = chrono::DateTime::from_timestamp_millis(millis).unwrap_or_default();
        Self {
            month: dt.month(),
            day: dt.day(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_day() {
        assert_eq!(MonthDay::parse("03-10"), Some(MonthDay { month: 3, day: 10 }));
        assert_eq!(MonthDay::parse("2021-12-05"), Some(MonthDay { month: 12, day: 5 }));
        assert_eq!(MonthDay::parse("13-01"), None);
        assert_eq!(MonthDay::parse("02-32"), None);
        assert_eq!(MonthDay::parse("garbage"), None);
    }

    #[test]
    fn rejects_days_the_calendar_does_not_have() {
        // In-range day numbers that don't exist for the month
        assert_eq!(MonthDay::parse("02-30"), None);
        assert_eq!(MonthDay::parse("04-31"), None);
        assert_eq!(MonthDay::parse("06-31"), None);
        // Feb 29 is a real birthday
        assert_eq!(MonthDay::parse("02-29"), Some(MonthDay { month: 2, day: 29 }));
    }
}
