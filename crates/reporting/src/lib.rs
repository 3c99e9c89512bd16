//! User analytics reporting — aggregations over the loaded dataset, chart
//! specifications, the dashboard page layout, and the reactive bindings that
//! rebuild charts when a filter control changes.

pub mod aggregate;
pub mod bindings;
pub mod builders;
pub mod chart;
pub mod dashboard;

pub use bindings::{dispatch, ChartUpdate, ControlEvent};
pub use chart::ChartSpec;
pub use dashboard::{compose, DashboardPage, DashboardState};
