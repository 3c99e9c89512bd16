//! Reactive bindings — map a control change onto the chart it rebuilds.
//!
//! Handlers are stateless: the control value and the shared
//! [`DashboardState`] are the only inputs, so calling one twice with the same
//! value yields the same spec.

use crate::aggregate::{country_distribution, revenue_by_country_for_month};
use crate::builders::{country_map_chart, revenue_chart};
use crate::chart::ChartSpec;
use crate::dashboard::{
    DashboardState, COUNTRY_MAP, MONTH_DROPDOWN, REVENUE_CHART, SUBSCRIPTION_DROPDOWN,
};
use dashboard_core::{DashboardError, DashboardResult, SubscriptionType};
use serde::{Deserialize, Serialize};
use tracing::debug;

type Handler = fn(&DashboardState, &str) -> ChartSpec;

/// One control → chart wiring.
pub struct Binding {
    pub control: &'static str,
    pub target: &'static str,
    handler: Handler,
}

pub const BINDINGS: &[Binding] = &[
    Binding {
        control: MONTH_DROPDOWN,
        target: REVENUE_CHART,
        handler: on_month_changed,
    },
    Binding {
        control: SUBSCRIPTION_DROPDOWN,
        target: COUNTRY_MAP,
        handler: on_subscription_changed,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEvent {
    pub control: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartUpdate {
    pub target: String,
    pub figure: ChartSpec,
}

/// Revenue bar chart scoped to `month`. Unknown months render empty.
pub fn on_month_changed(state: &DashboardState, month: &str) -> ChartSpec {
    let rows = revenue_by_country_for_month(&state.dataset, month);
    revenue_chart(&rows, Some(month))
}

/// Country map for one subscription type. Values outside {Free, Pro} match
/// no records and render empty.
pub fn on_subscription_changed(state: &DashboardState, value: &str) -> ChartSpec {
    let rows = value
        .parse::<SubscriptionType>()
        .map(|subscription| country_distribution(&state.dataset, subscription))
        .unwrap_or_default();
    country_map_chart(&rows, value)
}

/// Route a control event to its handler and return the replacement spec.
pub fn dispatch(state: &DashboardState, event: &ControlEvent) -> DashboardResult<ChartUpdate> {
    let binding = BINDINGS
        .iter()
        .find(|b| b.control == event.control)
        .ok_or_else(|| DashboardError::UnknownControl(event.control.clone()))?;

    let figure = (binding.handler)(state, &event.value);
    debug!(
        control = binding.control,
        target = binding.target,
        value = %event.value,
        traces = figure.data.len(),
        "Control event dispatched"
    );

    Ok(ChartUpdate {
        target: binding.target.to_string(),
        figure,
    })
}
