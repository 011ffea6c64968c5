use crate::color::{Brush, GradientStop};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlareClusterer {
    pub radius: i32,
    pub maximum_flare_count: i32,
    /// `None` keeps the clusterer's built-in brush.
    pub flare_background: Option<Brush>,
    pub flare_foreground: Option<Brush>,
    /// Cluster size color ramp; empty keeps the built-in ramp.
    pub gradient: Vec<GradientStop>,
}

impl FlareClusterer {
    pub const DEFAULT_RADIUS: i32 = 20;
    pub const DEFAULT_MAXIMUM_FLARE_COUNT: i32 = 10;
}

impl Default for FlareClusterer {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            maximum_flare_count: Self::DEFAULT_MAXIMUM_FLARE_COUNT,
            flare_background: None,
            flare_foreground: None,
            gradient: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clusterer {
    Flare(FlareClusterer),
    /// A clusterer type the document format has no vocabulary for.
    Custom { type_name: String },
}
