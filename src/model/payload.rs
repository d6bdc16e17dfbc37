//! Payload types returned by the analytics API
//!
//! Payloads are opaque: they're deserialized into just enough structure to
//! display them, with unknown fields ignored and missing ones defaulted.

use super::view::ViewId;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// HTML
// ═══════════════════════════════════════════════════════════════════════════════

/// A server-rendered HTML fragment or document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct HtmlDocument {
    pub body: String,
}

impl HtmlDocument {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Elevation
// ═══════════════════════════════════════════════════════════════════════════════

/// Metric keys shown as cards, with their display labels
pub const METRIC_CARDS: [(&str, &str); 5] = [
    ("AQUIFER", "Aquifer Type"),
    ("WELL DEPTH", "Well Depth (m)"),
    ("WELL TYPE", "Well Type"),
    ("Ground water level (mbgl)", "Ground Water Level (mbgl)"),
    ("elevation", "Elevation (m)"),
];

/// Per-district metric mapping; values are whatever scalars the API sent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DistrictMetrics(pub BTreeMap<String, serde_json::Value>);

impl DistrictMetrics {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display text for `key`; missing and null values render as "-"
    pub fn display(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(serde_json::Value::Null) => "-".to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ElevationPayload {
    #[serde(default)]
    pub districts: Vec<String>,
    #[serde(default)]
    pub selected_district: Option<String>,
    #[serde(default)]
    pub metrics: DistrictMetrics,
    #[serde(default)]
    pub elevation_map: HtmlDocument,
    #[serde(default)]
    pub fig_well_type_vs_elevation: Option<String>,
    #[serde(default)]
    pub fig_well_depth_vs_elevation: Option<String>,
    #[serde(default)]
    pub aquifer_map: HtmlDocument,
    #[serde(default)]
    pub well_depth_map: HtmlDocument,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Geospatial
// ═══════════════════════════════════════════════════════════════════════════════

/// Plot types offered by the geospatial endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotType {
    #[default]
    GroundwaterHeatmap,
    WellsCluster,
    WellTypeScatter,
    AquiferCircle,
    WellDepth,
}

impl PlotType {
    pub const ALL: [PlotType; 5] = [
        PlotType::GroundwaterHeatmap,
        PlotType::WellsCluster,
        PlotType::WellTypeScatter,
        PlotType::AquiferCircle,
        PlotType::WellDepth,
    ];

    /// Form value the endpoint expects
    pub fn label(&self) -> &'static str {
        match self {
            PlotType::GroundwaterHeatmap => "Groundwater Heatmap",
            PlotType::WellsCluster => "Wells Cluster Plot",
            PlotType::WellTypeScatter => "Well Type Scatter Plot",
            PlotType::AquiferCircle => "Aquifer Circle Plot",
            PlotType::WellDepth => "Well Depth Plot",
        }
    }

    pub fn needs_date(&self) -> bool {
        matches!(self, PlotType::GroundwaterHeatmap)
    }

    pub fn next(&self) -> PlotType {
        let idx = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> PlotType {
        let idx = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Heatmap snapshot columns available server side
pub const HEATMAP_DATES: [&str; 4] = ["Jan-23", "May-22", "Aug-22", "Nov-22"];

// ═══════════════════════════════════════════════════════════════════════════════
// Requests / Responses
// ═══════════════════════════════════════════════════════════════════════════════

/// A request a view asks the fetch runner to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// `GET` elevation overview (districts, maps, figures)
    ElevationOverview,
    /// `POST` elevation filtered by district; empty string means all districts
    ElevationDistrict(String),
    /// `POST` geospatial plot form
    GeospatialPlot {
        plot_type: PlotType,
        heatmap_date: Option<String>,
    },
    /// `GET` the server-rendered page of an embedded view
    Page(ViewId),
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchRequest::ElevationOverview => write!(f, "ElevationOverview"),
            FetchRequest::ElevationDistrict(d) => write!(f, "ElevationDistrict({})", d),
            FetchRequest::GeospatialPlot {
                plot_type,
                heatmap_date,
            } => match heatmap_date {
                Some(date) => write!(f, "GeospatialPlot({}, {})", plot_type, date),
                None => write!(f, "GeospatialPlot({})", plot_type),
            },
            FetchRequest::Page(view) => write!(f, "Page({})", view),
        }
    }
}

/// A decoded response
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResponse {
    Elevation(Box<ElevationPayload>),
    Html(HtmlDocument),
}

impl TryFrom<FetchResponse> for ElevationPayload {
    type Error = String;

    fn try_from(response: FetchResponse) -> Result<Self, Self::Error> {
        match response {
            FetchResponse::Elevation(payload) => Ok(*payload),
            FetchResponse::Html(_) => Err("expected elevation JSON, got HTML".to_string()),
        }
    }
}

impl TryFrom<FetchResponse> for HtmlDocument {
    type Error = String;

    fn try_from(response: FetchResponse) -> Result<Self, Self::Error> {
        match response {
            FetchResponse::Html(doc) => Ok(doc),
            FetchResponse::Elevation(_) => Err("expected HTML, got elevation JSON".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_get_payload_parses() {
        let json = r#"{
            "districts": ["Chennai", "Madurai"],
            "elevation_map": "<div>map</div>",
            "fig_well_type_vs_elevation": "{\"data\": []}",
            "fig_well_depth_vs_elevation": "{\"data\": []}",
            "aquifer_map": "<div>aq</div>",
            "well_depth_map": "<div>wd</div>"
        }"#;
        let payload: ElevationPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.districts, vec!["Chennai", "Madurai"]);
        assert!(payload.metrics.is_empty());
        assert_eq!(payload.elevation_map.body, "<div>map</div>");
        assert!(payload.fig_well_type_vs_elevation.is_some());
    }

    #[test]
    fn test_elevation_post_payload_metrics() {
        let json = r#"{
            "selected_district": "Madurai",
            "metrics": {
                "AQUIFER": "Charnockite",
                "WELL DEPTH": 45.5,
                "WELL TYPE": "Bore Well",
                "Ground water level (mbgl)": null,
                "elevation": 131,
                "District": "Madurai"
            },
            "elevation_map": "",
            "aquifer_map": "",
            "well_depth_map": "",
            "unexpected": [1, 2, 3]
        }"#;
        let payload: ElevationPayload = serde_json::from_str(json).unwrap();
        assert!(payload.districts.is_empty());
        assert_eq!(payload.selected_district.as_deref(), Some("Madurai"));
        assert_eq!(payload.metrics.display("AQUIFER"), "Charnockite");
        assert_eq!(payload.metrics.display("WELL DEPTH"), "45.5");
        assert_eq!(payload.metrics.display("elevation"), "131");
        assert_eq!(payload.metrics.display("Ground water level (mbgl)"), "-");
        assert_eq!(payload.metrics.display("missing"), "-");
    }

    #[test]
    fn test_plot_type_cycles() {
        assert_eq!(PlotType::GroundwaterHeatmap.next(), PlotType::WellsCluster);
        assert_eq!(PlotType::WellDepth.next(), PlotType::GroundwaterHeatmap);
        assert_eq!(PlotType::GroundwaterHeatmap.previous(), PlotType::WellDepth);
        assert!(PlotType::GroundwaterHeatmap.needs_date());
        assert!(!PlotType::AquiferCircle.needs_date());
    }

    #[test]
    fn test_response_conversions() {
        let html = FetchResponse::Html(HtmlDocument::new("<p>x</p>"));
        assert!(ElevationPayload::try_from(html.clone()).is_err());
        assert_eq!(HtmlDocument::try_from(html).unwrap().body, "<p>x</p>");

        let elevation = FetchResponse::Elevation(Box::default());
        assert!(HtmlDocument::try_from(elevation.clone()).is_err());
        assert!(ElevationPayload::try_from(elevation).is_ok());
    }
}
