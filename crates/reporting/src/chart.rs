//! Declarative chart specifications, serialized in the Plotly figure JSON
//! shape (`{"data": [...], "layout": {...}}`) so the browser can hand them
//! straight to `Plotly.react`.

use serde::{Deserialize, Serialize};

/// Qualitative palette assigned to categorical traces in order.
pub const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Fixed height of the revenue and map charts.
pub const TALL_CHART_HEIGHT: u32 = 600;

pub fn palette_color(index: usize) -> String {
    PALETTE[index % PALETTE.len()].to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: ChartLayout,
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        &self.layout.title.text
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(Trace::is_empty)
    }
}

// ─── Traces ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Scatter(ScatterTrace),
    Box(BoxTrace),
    Choropleth(ChoroplethTrace),
}

impl Trace {
    pub fn is_empty(&self) -> bool {
        match self {
            Trace::Bar(t) => t.y.is_empty(),
            Trace::Scatter(t) => t.y.is_empty(),
            Trace::Box(t) => t.y.is_empty(),
            Trace::Choropleth(t) => t.z.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub name: String,
    pub legendgroup: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub marker: Marker,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub mode: String,
    pub x: Vec<String>,
    pub y: Vec<u64>,
    pub showlegend: bool,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxTrace {
    pub name: String,
    pub legendgroup: String,
    pub x: Vec<String>,
    pub y: Vec<u32>,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethTrace {
    pub locations: Vec<String>,
    pub z: Vec<u64>,
    pub locationmode: String,
    pub coloraxis: String,
    pub hovertemplate: String,
}

// ─── Layout ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tickprefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tickformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub categoryorder: Option<String>,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Title::new(text),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAxis {
    pub colorscale: String,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub showframe: bool,
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub boxmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub coloraxis: Option<ColorAxis>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub geo: Option<Geo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_serializes_with_plotly_type_tag() {
        let trace = Trace::Bar(BarTrace {
            name: "Germany".into(),
            legendgroup: "Germany".into(),
            x: vec!["Germany".into()],
            y: vec![27.0],
            marker: Marker { color: palette_color(0) },
            hovertemplate: String::new(),
        });
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(value["type"], "bar");
        assert_eq!(value["marker"]["color"], "#636efa");
    }

    #[test]
    fn test_layout_omits_unset_fields() {
        let layout = ChartLayout {
            title: Title::new("Daily User Acquisition"),
            ..ChartLayout::default()
        };
        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value, json!({ "title": { "text": "Daily User Acquisition" } }));
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(PALETTE.len()), palette_color(0));
    }

    #[test]
    fn test_empty_spec() {
        let spec = ChartSpec {
            data: vec![],
            layout: ChartLayout::default(),
        };
        assert!(spec.is_empty());
    }
}
