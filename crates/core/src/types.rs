use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubscriptionType {
    Free,
    Pro,
}

impl SubscriptionType {
    pub const ALL: [SubscriptionType; 2] = [SubscriptionType::Free, SubscriptionType::Pro];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Free => "Free",
            SubscriptionType::Pro => "Pro",
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Free" => Ok(SubscriptionType::Free),
            "Pro" => Ok(SubscriptionType::Pro),
            other => Err(format!("unknown subscription type '{other}'")),
        }
    }
}

/// Calendar month label in `YYYY-MM` form, derived from an install date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthKey(String);

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MonthKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for MonthKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MonthKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One user's row in the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub user_id: String,
    pub country: String,
    pub install_date: NaiveDate,
    pub last_active_date: Option<NaiveDate>,
    pub pro_upgrade_date: Option<NaiveDate>,
    pub monthly_revenue: f64,
    pub days_active: u32,
    pub churned: bool,
    pub subscription_type: SubscriptionType,
}

impl Record {
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.install_date)
    }
}

/// Immutable, ordered collection of records loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let key = MonthKey::from_date(date);
        assert_eq!(key.as_str(), "2024-03");
        assert_eq!(key, "2024-03");
    }

    #[test]
    fn test_month_keys_order_chronologically() {
        let jan = MonthKey::from_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let dec = MonthKey::from_date(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert!(dec < jan);
    }

    #[test]
    fn test_subscription_type_parse() {
        assert_eq!("Free".parse::<SubscriptionType>(), Ok(SubscriptionType::Free));
        assert_eq!(" Pro ".parse::<SubscriptionType>(), Ok(SubscriptionType::Pro));
        assert!("Enterprise".parse::<SubscriptionType>().is_err());
        assert_eq!(SubscriptionType::Pro.to_string(), "Pro");
    }
}
