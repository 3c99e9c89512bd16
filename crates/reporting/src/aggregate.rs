//! Aggregation layer — grouped sums and counts over the immutable dataset.
//!
//! Every function here is pure and total: a filter that matches nothing
//! produces an empty vector, never an error.

use chrono::NaiveDate;
use dashboard_core::{Dataset, MonthKey, SubscriptionType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ─── Types ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueByCountryMonth {
    pub month: MonthKey,
    pub country: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyInstalls {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

// ─── Aggregations ───────────────────────────────────────────────────────────

/// Total revenue per (month, country) over the full history, ordered by
/// month then country.
pub fn revenue_by_country_month(dataset: &Dataset) -> Vec<RevenueByCountryMonth> {
    let mut groups: BTreeMap<(MonthKey, &str), f64> = BTreeMap::new();
    for record in dataset {
        *groups
            .entry((record.month(), record.country.as_str()))
            .or_insert(0.0) += record.monthly_revenue;
    }

    groups
        .into_iter()
        .map(|((month, country), revenue)| RevenueByCountryMonth {
            month,
            country: country.to_string(),
            revenue,
        })
        .collect()
}

/// Revenue per country for records installed in `month`.
pub fn revenue_by_country_for_month(dataset: &Dataset, month: &str) -> Vec<RevenueByCountryMonth> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for record in dataset.iter().filter(|r| r.month() == month) {
        *groups.entry(record.country.as_str()).or_insert(0.0) += record.monthly_revenue;
    }

    groups
        .into_iter()
        .map(|(country, revenue)| RevenueByCountryMonth {
            month: MonthKey::from(month),
            country: country.to_string(),
            revenue,
        })
        .collect()
}

/// Distinct months in the order the revenue aggregate discovers them.
pub fn month_keys(dataset: &Dataset) -> Vec<MonthKey> {
    let mut months: Vec<MonthKey> = Vec::new();
    for row in revenue_by_country_month(dataset) {
        if months.last() != Some(&row.month) {
            months.push(row.month);
        }
    }
    months
}

/// New users per install date, ordered by date.
pub fn daily_installs(dataset: &Dataset) -> Vec<DailyInstalls> {
    let mut groups: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in dataset {
        *groups.entry(record.install_date).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|(date, count)| DailyInstalls { date, count })
        .collect()
}

/// User count per country among records with the given subscription type,
/// most frequent country first.
pub fn country_distribution(
    dataset: &Dataset,
    subscription_type: SubscriptionType,
) -> Vec<CountryCount> {
    let mut groups: HashMap<&str, u64> = HashMap::new();
    for record in dataset
        .iter()
        .filter(|r| r.subscription_type == subscription_type)
    {
        *groups.entry(record.country.as_str()).or_insert(0) += 1;
    }

    let mut rows: Vec<CountryCount> = groups
        .into_iter()
        .map(|(country, count)| CountryCount {
            country: country.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
    rows
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dashboard_core::Record;

    pub(crate) fn record(
        country: &str,
        install: (i32, u32, u32),
        revenue: f64,
        subscription_type: SubscriptionType,
    ) -> Record {
        Record {
            user_id: format!("{country}-{}-{}-{}-{revenue}", install.0, install.1, install.2),
            country: country.to_string(),
            install_date: NaiveDate::from_ymd_opt(install.0, install.1, install.2).unwrap(),
            last_active_date: None,
            pro_upgrade_date: None,
            monthly_revenue: revenue,
            days_active: 10,
            churned: false,
            subscription_type,
        }
    }

    pub(crate) fn sample_dataset() -> Dataset {
        use SubscriptionType::{Free, Pro};
        Dataset::new(vec![
            record("United States", (2024, 1, 3), 10.0, Pro),
            record("United States", (2024, 1, 3), 5.0, Free),
            record("Germany", (2024, 1, 15), 20.0, Pro),
            record("Germany", (2024, 2, 1), 7.0, Free),
            record("India", (2024, 2, 1), 0.0, Free),
            record("India", (2024, 3, 9), 3.5, Free),
        ])
    }

    #[test]
    fn test_three_record_example() {
        use SubscriptionType::Free;
        let dataset = Dataset::new(vec![
            record("US", (2024, 1, 1), 10.0, Free),
            record("US", (2024, 1, 20), 5.0, Free),
            record("DE", (2024, 2, 2), 7.0, Free),
        ]);

        let jan = revenue_by_country_for_month(&dataset, "2024-01");
        assert_eq!(jan.len(), 1);
        assert_eq!(jan[0].country, "US");
        assert_eq!(jan[0].revenue, 15.0);

        let feb = revenue_by_country_for_month(&dataset, "2024-02");
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].country, "DE");
        assert_eq!(feb[0].revenue, 7.0);
    }

    #[test]
    fn test_full_history_groups_by_month_and_country() {
        let rows = revenue_by_country_month(&sample_dataset());
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.month.as_str(), r.country.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-01", "Germany"),
                ("2024-01", "United States"),
                ("2024-02", "Germany"),
                ("2024-02", "India"),
                ("2024-03", "India"),
            ]
        );
        assert_eq!(rows[1].revenue, 15.0);
    }

    #[test]
    fn test_month_revenue_matches_record_totals() {
        let dataset = sample_dataset();
        for month in month_keys(&dataset) {
            let aggregated: f64 = revenue_by_country_for_month(&dataset, month.as_str())
                .iter()
                .map(|r| r.revenue)
                .sum();
            let expected: f64 = dataset
                .iter()
                .filter(|r| r.month() == month)
                .map(|r| r.monthly_revenue)
                .sum();
            assert_eq!(aggregated, expected, "month {month}");
        }
    }

    #[test]
    fn test_unknown_month_is_empty() {
        assert!(revenue_by_country_for_month(&sample_dataset(), "1999-12").is_empty());
    }

    #[test]
    fn test_month_keys_are_distinct_and_ordered() {
        let months = month_keys(&sample_dataset());
        let labels: Vec<&str> = months.iter().map(|m| m.as_str()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03"]);
    }

    #[test]
    fn test_daily_installs_sum_to_record_count() {
        let dataset = sample_dataset();
        let installs = daily_installs(&dataset);
        assert_eq!(installs.len(), 4);
        assert_eq!(installs[0].count, 2);
        let total: u64 = installs.iter().map(|d| d.count).sum();
        assert_eq!(total, dataset.len() as u64);
    }

    #[test]
    fn test_country_distribution_counts() {
        let dataset = sample_dataset();
        let free = country_distribution(&dataset, SubscriptionType::Free);
        assert_eq!(free[0], CountryCount { country: "India".into(), count: 2 });
        assert_eq!(free.len(), 3);

        let pro = country_distribution(&dataset, SubscriptionType::Pro);
        let free_total: u64 = free.iter().map(|c| c.count).sum();
        let pro_total: u64 = pro.iter().map(|c| c.count).sum();
        assert_eq!(free_total, 4);
        assert_eq!(pro_total, 2);
        assert_eq!(free_total + pro_total, dataset.len() as u64);
    }

    #[test]
    fn test_country_distribution_without_matches_is_empty() {
        let dataset = Dataset::new(vec![record(
            "Japan",
            (2024, 5, 5),
            1.0,
            SubscriptionType::Free,
        )]);
        assert!(country_distribution(&dataset, SubscriptionType::Pro).is_empty());
    }
}
