//! Analysis view identifiers
//!
//! The closed set of views the dashboard can show, plus the navigation
//! groups that nest some of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed analysis panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewId {
    #[default]
    GeospatialAnalysis,
    Hydrogeology,
    RainfallTrendAnalysis,
    RefreshRatePredictor,
    Population,
    Elevation,
    TidalCycleAnalysis,
    TidalCycleImpactPrediction,
}

/// How a view's payload reaches the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStrategy {
    /// JSON payload with HTML fragments and Plotly figures
    InjectAndChart,
    /// HTML document posted back as the response body (iframe `srcdoc`)
    InlineDocument,
    /// Server-rendered page addressed by URL (iframe `src`)
    EmbeddedPage,
}

impl ViewId {
    pub const ALL: [ViewId; 8] = [
        ViewId::GeospatialAnalysis,
        ViewId::Hydrogeology,
        ViewId::RainfallTrendAnalysis,
        ViewId::RefreshRatePredictor,
        ViewId::Population,
        ViewId::Elevation,
        ViewId::TidalCycleAnalysis,
        ViewId::TidalCycleImpactPrediction,
    ];

    /// Stable identifier used in config files, CLI flags and logs
    pub fn key(&self) -> &'static str {
        match self {
            ViewId::GeospatialAnalysis => "GeospatialAnalysis",
            ViewId::Hydrogeology => "Hydrogeology",
            ViewId::RainfallTrendAnalysis => "RainfallTrendAnalysis",
            ViewId::RefreshRatePredictor => "RefreshRatePredictor",
            ViewId::Population => "Population",
            ViewId::Elevation => "Elevation",
            ViewId::TidalCycleAnalysis => "TidalCycleAnalysis",
            ViewId::TidalCycleImpactPrediction => "TidalCycleImpactPrediction",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewId::GeospatialAnalysis => "Geospatial Analysis",
            ViewId::Hydrogeology => "Hydrogeology",
            ViewId::RainfallTrendAnalysis => "Rainfall Trend Analysis",
            ViewId::RefreshRatePredictor => "Refresh Rate Predictor",
            ViewId::Population => "Population",
            ViewId::Elevation => "Elevation",
            ViewId::TidalCycleAnalysis => "Tidal Cycle Analysis",
            ViewId::TidalCycleImpactPrediction => "Tidal Cycle Impact Prediction",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ViewId::GeospatialAnalysis => "◈",
            ViewId::Hydrogeology => "☁",
            ViewId::RainfallTrendAnalysis | ViewId::RefreshRatePredictor => "≈",
            ViewId::Population => "☺",
            ViewId::Elevation => "▲",
            ViewId::TidalCycleAnalysis | ViewId::TidalCycleImpactPrediction => "∿",
        }
    }

    /// The navigation group this view is nested under, if any
    pub fn group(&self) -> Option<NavGroup> {
        match self {
            ViewId::RainfallTrendAnalysis | ViewId::RefreshRatePredictor => {
                Some(NavGroup::Rainfall)
            }
            ViewId::TidalCycleAnalysis | ViewId::TidalCycleImpactPrediction => {
                Some(NavGroup::TidalCycles)
            }
            _ => None,
        }
    }

    pub fn strategy(&self) -> DisplayStrategy {
        match self {
            ViewId::Elevation => DisplayStrategy::InjectAndChart,
            ViewId::GeospatialAnalysis => DisplayStrategy::InlineDocument,
            _ => DisplayStrategy::EmbeddedPage,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ViewId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewId::ALL
            .iter()
            .copied()
            .find(|v| v.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = ViewId::ALL.iter().map(|v| v.key()).collect();
                format!("unknown view '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Expandable group in the navigation panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavGroup {
    Rainfall,
    TidalCycles,
}

impl NavGroup {
    pub fn label(&self) -> &'static str {
        match self {
            NavGroup::Rainfall => "Rainfall",
            NavGroup::TidalCycles => "Tidal Cycles",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NavGroup::Rainfall => "≈",
            NavGroup::TidalCycles => "∿",
        }
    }

    /// Views nested under this group, in display order
    pub fn children(&self) -> [ViewId; 2] {
        match self {
            NavGroup::Rainfall => [ViewId::RainfallTrendAnalysis, ViewId::RefreshRatePredictor],
            NavGroup::TidalCycles => [
                ViewId::TidalCycleAnalysis,
                ViewId::TidalCycleImpactPrediction,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_key_round_trips_through_from_str() {
        for view in ViewId::ALL {
            assert_eq!(view.key().parse::<ViewId>().unwrap(), view);
        }
    }

    #[test]
    fn test_unknown_view_is_rejected() {
        let err = "Weather".parse::<ViewId>().unwrap_err();
        assert!(err.contains("unknown view 'Weather'"));
        assert!(err.contains("Elevation"));
    }

    #[test]
    fn test_default_view_is_geospatial() {
        assert_eq!(ViewId::default(), ViewId::GeospatialAnalysis);
    }

    #[test]
    fn test_group_children_point_back_to_group() {
        for group in [NavGroup::Rainfall, NavGroup::TidalCycles] {
            for child in group.children() {
                assert_eq!(child.group(), Some(group));
            }
        }
    }

    #[test]
    fn test_view_serializes_as_identifier() {
        let json = serde_json::to_string(&ViewId::TidalCycleImpactPrediction).unwrap();
        assert_eq!(json, "\"TidalCycleImpactPrediction\"");
    }

    #[test]
    fn test_strategies() {
        assert_eq!(ViewId::Elevation.strategy(), DisplayStrategy::InjectAndChart);
        assert_eq!(
            ViewId::GeospatialAnalysis.strategy(),
            DisplayStrategy::InlineDocument
        );
        assert_eq!(
            ViewId::RefreshRatePredictor.strategy(),
            DisplayStrategy::EmbeddedPage
        );
    }
}
