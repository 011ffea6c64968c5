use crate::geometry::{Geometry, SpatialReference};
use crate::symbol::Symbol;
use mapbuilder_json::JsonObject;
use serde::{Deserialize, Serialize};

/// Snapshot of one graphic of a feature collection that has no backing
/// service, kept so the collection can be written inline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedGraphic {
    pub geometry: Option<Geometry>,
    pub spatial_reference: Option<SpatialReference>,
    pub attributes: JsonObject,
    pub symbol: Option<Symbol>,
}

impl PersistedGraphic {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Default::default()
        }
    }
}
