//! Dashboard page composition — application state built once at startup and
//! the static page structure derived from it.

use crate::aggregate::{daily_installs, month_keys, revenue_by_country_month};
use crate::builders::{activity_chart, installs_chart, revenue_chart};
use crate::chart::ChartSpec;
use dashboard_core::{Dataset, MonthKey, SubscriptionType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const MONTH_DROPDOWN: &str = "month-dropdown";
pub const SUBSCRIPTION_DROPDOWN: &str = "subscription-dropdown";
pub const REVENUE_CHART: &str = "revenue-chart";
pub const COUNTRY_MAP: &str = "country-map";
pub const INSTALLS_CHART: &str = "installs-chart";
pub const ACTIVITY_CHART: &str = "activity-chart";

/// Default of the subscription filter. Fixed, not derived from the data.
pub const DEFAULT_SUBSCRIPTION: SubscriptionType = SubscriptionType::Free;

/// Immutable application state shared by every request.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub dataset: Arc<Dataset>,
    pub title: String,
    pub logo: String,
    pub months: Vec<MonthKey>,
    pub revenue_overview: ChartSpec,
    pub installs: ChartSpec,
    pub activity: ChartSpec,
}

impl DashboardState {
    /// Precompute the static charts and month options from the dataset.
    pub fn new(dataset: Dataset, title: impl Into<String>, logo: impl Into<String>) -> Self {
        let revenue_rows = revenue_by_country_month(&dataset);
        let revenue_overview = revenue_chart(&revenue_rows, None);
        let installs = installs_chart(&daily_installs(&dataset));
        let activity = activity_chart(&dataset);
        let months = month_keys(&dataset);

        info!(
            records = dataset.len(),
            months = months.len(),
            revenue_groups = revenue_rows.len(),
            "Dashboard state initialized"
        );

        Self {
            dataset: Arc::new(dataset),
            title: title.into(),
            logo: logo.into(),
            months,
            revenue_overview,
            installs,
            activity,
        }
    }

    pub fn default_month(&self) -> Option<&MonthKey> {
        self.months.first()
    }
}

// ─── Page structure ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPage {
    pub header: Header,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub logo: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub items: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum Component {
    Dropdown(Dropdown),
    Graph(Graph),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    fn new(value: &str) -> Self {
        Self {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dropdown {
    pub id: String,
    pub options: Vec<DropdownOption>,
    pub value: Option<String>,
    pub width_px: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub id: String,
    /// `None` until the bound control fires.
    pub figure: Option<ChartSpec>,
}

impl DashboardPage {
    pub fn dropdowns(&self) -> impl Iterator<Item = &Dropdown> {
        self.rows.iter().flat_map(|row| &row.items).filter_map(|item| match item {
            Component::Dropdown(dropdown) => Some(dropdown),
            Component::Graph(_) => None,
        })
    }

    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.rows.iter().flat_map(|row| &row.items).filter_map(|item| match item {
            Component::Graph(graph) => Some(graph),
            Component::Dropdown(_) => None,
        })
    }

    pub fn graph(&self, id: &str) -> Option<&Graph> {
        self.graphs().find(|graph| graph.id == id)
    }
}

/// Assemble the page: header, revenue/installs row, map/activity row.
pub fn compose(state: &DashboardState) -> DashboardPage {
    let month_dropdown = Dropdown {
        id: MONTH_DROPDOWN.to_string(),
        options: state
            .months
            .iter()
            .map(|month| DropdownOption::new(month.as_str()))
            .collect(),
        value: state.default_month().map(|m| m.to_string()),
        width_px: 300,
    };

    let subscription_dropdown = Dropdown {
        id: SUBSCRIPTION_DROPDOWN.to_string(),
        options: SubscriptionType::ALL
            .iter()
            .map(|s| DropdownOption::new(s.as_str()))
            .collect(),
        value: Some(DEFAULT_SUBSCRIPTION.to_string()),
        width_px: 200,
    };

    DashboardPage {
        header: Header {
            logo: state.logo.clone(),
            title: state.title.clone(),
        },
        rows: vec![
            Row {
                items: vec![
                    Component::Dropdown(month_dropdown),
                    Component::Graph(Graph {
                        id: REVENUE_CHART.to_string(),
                        figure: Some(state.revenue_overview.clone()),
                    }),
                    Component::Graph(Graph {
                        id: INSTALLS_CHART.to_string(),
                        figure: Some(state.installs.clone()),
                    }),
                ],
            },
            Row {
                items: vec![
                    Component::Dropdown(subscription_dropdown),
                    Component::Graph(Graph {
                        id: COUNTRY_MAP.to_string(),
                        figure: None,
                    }),
                    Component::Graph(Graph {
                        id: ACTIVITY_CHART.to_string(),
                        figure: Some(state.activity.clone()),
                    }),
                ],
            },
        ],
    }
}
