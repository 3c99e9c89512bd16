//! Chart builders — map derived tables onto chart specifications.

use crate::aggregate::{CountryCount, DailyInstalls, RevenueByCountryMonth};
use crate::chart::*;
use dashboard_core::Dataset;

/// Revenue per country as a bar chart, one colored trace per country.
/// `month` scopes the title; `None` means the full history.
pub fn revenue_chart(rows: &[RevenueByCountryMonth], month: Option<&str>) -> ChartSpec {
    // Full-history rows repeat a country once per month; keep them in one trace.
    let mut countries: Vec<&str> = Vec::new();
    for row in rows {
        if !countries.contains(&row.country.as_str()) {
            countries.push(&row.country);
        }
    }

    let data = countries
        .iter()
        .enumerate()
        .map(|(index, country)| {
            let (x, y): (Vec<String>, Vec<f64>) = rows
                .iter()
                .filter(|r| r.country == *country)
                .map(|r| (r.country.clone(), r.revenue))
                .unzip();
            Trace::Bar(BarTrace {
                name: country.to_string(),
                legendgroup: country.to_string(),
                x,
                y,
                marker: Marker {
                    color: palette_color(index),
                },
                hovertemplate: "Country=%{x}<br>Total Revenue ($)=%{y}<extra></extra>".to_string(),
            })
        })
        .collect();

    let title = match month {
        Some(month) => format!("Revenue from Each Country for {month}"),
        None => "Revenue from Each Country Filtered by Month".to_string(),
    };

    ChartSpec {
        data,
        layout: ChartLayout {
            title: Title::new(title),
            height: Some(TALL_CHART_HEIGHT),
            xaxis: Some(Axis {
                categoryorder: Some("trace".to_string()),
                ..Axis::titled("Country")
            }),
            yaxis: Some(Axis {
                tickprefix: Some("$".to_string()),
                tickformat: Some(",".to_string()),
                ..Axis::titled("Total Revenue ($)")
            }),
            legend: Some(Legend {
                title: Title::new("Country"),
            }),
            barmode: Some("relative".to_string()),
            ..ChartLayout::default()
        },
    }
}

/// Daily new users as a single continuous line.
pub fn installs_chart(rows: &[DailyInstalls]) -> ChartSpec {
    let (x, y): (Vec<String>, Vec<u64>) = rows
        .iter()
        .map(|r| (r.date.format("%Y-%m-%d").to_string(), r.count))
        .unzip();

    ChartSpec {
        data: vec![Trace::Scatter(ScatterTrace {
            mode: "lines".to_string(),
            x,
            y,
            showlegend: false,
            hovertemplate: "Date=%{x}<br>New Users=%{y}<extra></extra>".to_string(),
        })],
        layout: ChartLayout {
            title: Title::new("Daily User Acquisition"),
            xaxis: Some(Axis::titled("Date")),
            yaxis: Some(Axis::titled("New Users")),
            ..ChartLayout::default()
        },
    }
}

/// Days active split by churn flag, one box per flag value.
pub fn activity_chart(dataset: &Dataset) -> ChartSpec {
    let mut groups: Vec<(bool, Vec<u32>)> = Vec::new();
    for record in dataset {
        match groups.iter_mut().find(|(flag, _)| *flag == record.churned) {
            Some((_, values)) => values.push(record.days_active),
            None => groups.push((record.churned, vec![record.days_active])),
        }
    }

    let data = groups
        .into_iter()
        .enumerate()
        .map(|(index, (churned, y))| {
            let label = churn_label(churned);
            Trace::Box(BoxTrace {
                name: label.to_string(),
                legendgroup: label.to_string(),
                x: vec![label.to_string(); y.len()],
                y,
                marker: Marker {
                    color: palette_color(index),
                },
            })
        })
        .collect();

    ChartSpec {
        data,
        layout: ChartLayout {
            title: Title::new("Activity Duration vs Churn Status"),
            xaxis: Some(Axis::titled("Churned")),
            yaxis: Some(Axis::titled("Days Active")),
            legend: Some(Legend {
                title: Title::new("Churned"),
            }),
            boxmode: Some("overlay".to_string()),
            ..ChartLayout::default()
        },
    }
}

/// User counts per country on a world map. Country names the map backend
/// cannot resolve are left unshaded.
pub fn country_map_chart(rows: &[CountryCount], subscription: &str) -> ChartSpec {
    let (locations, z): (Vec<String>, Vec<u64>) =
        rows.iter().map(|r| (r.country.clone(), r.count)).unzip();

    ChartSpec {
        data: vec![Trace::Choropleth(ChoroplethTrace {
            locations,
            z,
            locationmode: "country names".to_string(),
            coloraxis: "coloraxis".to_string(),
            hovertemplate: "Country=%{location}<br>Users=%{z}<extra></extra>".to_string(),
        })],
        layout: ChartLayout {
            title: Title::new(format!("User Distribution by Country ({subscription} users)")),
            height: Some(TALL_CHART_HEIGHT),
            coloraxis: Some(ColorAxis {
                colorscale: "Plasma".to_string(),
                colorbar: ColorBar {
                    title: Title::new("Users"),
                },
            }),
            geo: Some(Geo {
                showframe: false,
                projection: Projection {
                    kind: "natural earth".to_string(),
                },
            }),
            ..ChartLayout::default()
        },
    }
}

fn churn_label(churned: bool) -> &'static str {
    if churned {
        "True"
    } else {
        "False"
    }
}
