use crate::field::{FieldInfo, LayerInformation};
use crate::geometry::GeometryType;
use crate::services::{
    BingMapsLayer, DynamicMapServiceLayer, FeatureLayer, GeoRssLayer, GraphicsSettings,
    HeatMapFeatureLayer, HeatMapLayer, ImageServiceLayer, KmlLayer, TiledMapServiceLayer, WmsLayer,
};
use serde::{Deserialize, Serialize};

/// A popup DataTemplate override for one sublayer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupTemplateOverride {
    pub layer_id: i32,
    pub template: String,
}

/// Builder metadata attached to a layer in addition to its own properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerExtensions {
    pub display_name: Option<String>,
    /// Seconds; zero disables auto refresh.
    pub auto_update_interval: f64,
    pub identify_layer_ids: Vec<i32>,
    pub popup_templates: Vec<PopupTemplateOverride>,
    pub is_reference_layer: bool,
    pub is_basemap: bool,
    pub geometry_type: Option<GeometryType>,
    pub display_field: Option<String>,
    pub use_popup_from_web_map: bool,
    pub fields: Vec<FieldInfo>,
    pub layer_infos: Vec<LayerInformation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerKind {
    DynamicMapService(DynamicMapServiceLayer),
    TiledMapService(TiledMapServiceLayer),
    ImageService(ImageServiceLayer),
    Feature(FeatureLayer),
    Graphics(GraphicsSettings),
    GeoRss(GeoRssLayer),
    HeatMap(HeatMapLayer),
    HeatMapFeature(HeatMapFeatureLayer),
    Kml(KmlLayer),
    Wms(WmsLayer),
    Bing(BingMapsLayer),
}

impl LayerKind {
    pub fn kind_name(&self) -> &str {
        match self {
            LayerKind::DynamicMapService(_) => "DynamicMapService",
            LayerKind::TiledMapService(_) => "TiledMapService",
            LayerKind::ImageService(_) => "ImageService",
            LayerKind::Feature(_) => "Feature",
            LayerKind::Graphics(_) => "Graphics",
            LayerKind::GeoRss(_) => "GeoRss",
            LayerKind::HeatMap(_) => "HeatMap",
            LayerKind::HeatMapFeature(_) => "HeatMapFeature",
            LayerKind::Kml(_) => "Kml",
            LayerKind::Wms(_) => "Wms",
            LayerKind::Bing(_) => "Bing",
        }
    }

    /// Renderer and clusterer state, for the kinds that draw graphics.
    pub fn graphics(&self) -> Option<&GraphicsSettings> {
        match self {
            LayerKind::Feature(f) => Some(&f.graphics),
            LayerKind::Graphics(g) => Some(g),
            LayerKind::GeoRss(g) => Some(&g.graphics),
            _ => None,
        }
    }
}

impl Default for LayerKind {
    fn default() -> Self {
        LayerKind::Graphics(GraphicsSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layer {
    pub id: String,
    pub visible: bool,
    pub opacity: f64,
    pub minimum_resolution: f64,
    pub maximum_resolution: f64,
    pub extensions: LayerExtensions,
    pub kind: LayerKind,
}

impl Layer {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.extensions.display_name = Some(name.into());
        self
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            id: String::new(),
            visible: true,
            opacity: 1.0,
            minimum_resolution: 0.0,
            maximum_resolution: f64::MAX,
            extensions: LayerExtensions::default(),
            kind: LayerKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceConnection;

    #[test]
    fn defaults_match_toolkit_defaults() {
        let layer = Layer::new("roads", LayerKind::Feature(FeatureLayer::default()));
        assert!(layer.visible);
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.maximum_resolution, f64::MAX);
        assert_eq!(layer.kind.kind_name(), "Feature");
        assert!(layer.kind.graphics().is_some_and(|g| g.renderer_takes_precedence));
    }

    #[test]
    fn feature_layer_without_url_is_collection() {
        let mut feature = FeatureLayer::default();
        assert!(feature.is_feature_collection());
        feature.connection = ServiceConnection::new("http://host/arcgis/rest/services/x/FeatureServer/0");
        assert!(!feature.is_feature_collection());
    }

    #[test]
    fn serde_fills_missing_fields_with_defaults() {
        let layer: Layer = serde_json::from_str(
            r#"{"id":"base","kind":{"TiledMapService":{"connection":{"url":"http://t"}}}}"#,
        )
        .unwrap();
        assert_eq!(layer.opacity, 1.0);
        assert!(layer.visible);
        match layer.kind {
            LayerKind::TiledMapService(t) => assert_eq!(t.connection.url.as_deref(), Some("http://t")),
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
