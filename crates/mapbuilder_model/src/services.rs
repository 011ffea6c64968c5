//! Connection and rendering settings for each concrete layer kind.

use crate::clusterer::Clusterer;
use crate::color::GradientStop;
use crate::geometry::MapPoint;
use crate::graphic::PersistedGraphic;
use crate::renderer::Renderer;
use serde::{Deserialize, Serialize};

/// Url, proxy and token shared by the service-backed kinds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConnection {
    pub url: Option<String>,
    pub proxy_url: Option<String>,
    pub token: Option<String>,
}

impl ServiceConnection {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerDefinition {
    pub layer_id: i32,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicMapServiceLayer {
    pub connection: ServiceConnection,
    pub image_format: String,
    pub disable_client_caching: bool,
    pub visible_layers: Option<Vec<i32>>,
    pub layer_definitions: Vec<LayerDefinition>,
}

impl DynamicMapServiceLayer {
    pub const DEFAULT_IMAGE_FORMAT: &'static str = "PNG24";
}

impl Default for DynamicMapServiceLayer {
    fn default() -> Self {
        Self {
            connection: ServiceConnection::default(),
            image_format: Self::DEFAULT_IMAGE_FORMAT.to_string(),
            disable_client_caching: false,
            visible_layers: None,
            layer_definitions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TiledMapServiceLayer {
    pub connection: ServiceConnection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageServiceLayer {
    pub connection: ServiceConnection,
    pub image_format: String,
    pub band_ids: Option<Vec<i32>>,
    pub compression_quality: i32,
    pub no_data: Option<f64>,
    pub interpolation: String,
}

impl ImageServiceLayer {
    pub const DEFAULT_IMAGE_FORMAT: &'static str = "PNG";
    pub const DEFAULT_INTERPOLATION: &'static str = "None";
}

impl Default for ImageServiceLayer {
    fn default() -> Self {
        Self {
            connection: ServiceConnection::default(),
            image_format: Self::DEFAULT_IMAGE_FORMAT.to_string(),
            band_ids: None,
            compression_quality: 0,
            no_data: None,
            interpolation: Self::DEFAULT_INTERPOLATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureLayerMode {
    Snapshot,
    #[default]
    OnDemand,
    SelectionOnly,
}

impl FeatureLayerMode {
    pub fn as_str(&self) -> &str {
        match self {
            FeatureLayerMode::Snapshot => "Snapshot",
            FeatureLayerMode::OnDemand => "OnDemand",
            FeatureLayerMode::SelectionOnly => "SelectionOnly",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Snapshot" => Some(FeatureLayerMode::Snapshot),
            "OnDemand" => Some(FeatureLayerMode::OnDemand),
            "SelectionOnly" => Some(FeatureLayerMode::SelectionOnly),
            _ => None,
        }
    }
}

/// Rendering state shared by every graphics-based layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub renderer: Option<Renderer>,
    pub clusterer: Option<Clusterer>,
    pub renderer_takes_precedence: bool,
    /// Inline graphics, written only for layers without a service url.
    pub graphics: Vec<PersistedGraphic>,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            renderer: None,
            clusterer: None,
            renderer_takes_precedence: true,
            graphics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureLayer {
    pub connection: ServiceConnection,
    pub mode: FeatureLayerMode,
    pub where_clause: Option<String>,
    pub out_fields: Vec<String>,
    pub disable_client_caching: bool,
    pub on_demand_cache_size: i32,
    pub auto_save: bool,
    pub graphics: GraphicsSettings,
}

impl FeatureLayer {
    pub const DEFAULT_ON_DEMAND_CACHE_SIZE: i32 = 1000;

    /// A feature layer without a url holds its features inline.
    pub fn is_feature_collection(&self) -> bool {
        self.connection.url.as_deref().is_none_or(str::is_empty)
    }
}

impl Default for FeatureLayer {
    fn default() -> Self {
        Self {
            connection: ServiceConnection::default(),
            mode: FeatureLayerMode::OnDemand,
            where_clause: None,
            out_fields: Vec::new(),
            disable_client_caching: false,
            on_demand_cache_size: Self::DEFAULT_ON_DEMAND_CACHE_SIZE,
            auto_save: true,
            graphics: GraphicsSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoRssLayer {
    pub url: Option<String>,
    pub proxy_url: Option<String>,
    pub graphics: GraphicsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatMapLayer {
    pub intensity: f64,
    pub gradient: Vec<GradientStop>,
    pub points: Vec<MapPoint>,
}

pub const DEFAULT_HEAT_MAP_INTENSITY: f64 = 10.0;

impl Default for HeatMapLayer {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_HEAT_MAP_INTENSITY,
            gradient: Vec::new(),
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatMapFeatureLayer {
    pub connection: ServiceConnection,
    pub where_clause: Option<String>,
    pub intensity: f64,
    pub gradient: Vec<GradientStop>,
}

impl Default for HeatMapFeatureLayer {
    fn default() -> Self {
        Self {
            connection: ServiceConnection::default(),
            where_clause: None,
            intensity: DEFAULT_HEAT_MAP_INTENSITY,
            gradient: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KmlLayer {
    pub url: Option<String>,
    pub proxy_url: Option<String>,
    pub visible_layers: Option<Vec<String>>,
    /// Seconds; zero disables refreshing.
    pub refresh_interval: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WmsLayer {
    pub url: Option<String>,
    pub proxy_url: Option<String>,
    pub version: String,
    pub layers: Vec<String>,
    pub skip_get_capabilities: bool,
    pub image_format: String,
}

impl WmsLayer {
    pub const DEFAULT_VERSION: &'static str = "1.1.1";
    pub const DEFAULT_IMAGE_FORMAT: &'static str = "image/png";
}

impl Default for WmsLayer {
    fn default() -> Self {
        Self {
            url: None,
            proxy_url: None,
            version: Self::DEFAULT_VERSION.to_string(),
            layers: Vec::new(),
            skip_get_capabilities: false,
            image_format: Self::DEFAULT_IMAGE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BingLayerStyle {
    #[default]
    Road,
    Aerial,
    AerialWithLabels,
}

impl BingLayerStyle {
    pub fn as_str(&self) -> &str {
        match self {
            BingLayerStyle::Road => "Road",
            BingLayerStyle::Aerial => "Aerial",
            BingLayerStyle::AerialWithLabels => "AerialWithLabels",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Road" => Some(BingLayerStyle::Road),
            "Aerial" => Some(BingLayerStyle::Aerial),
            "AerialWithLabels" => Some(BingLayerStyle::AerialWithLabels),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BingServerType {
    #[default]
    Production,
    Staging,
}

impl BingServerType {
    pub fn as_str(&self) -> &str {
        match self {
            BingServerType::Production => "Production",
            BingServerType::Staging => "Staging",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Production" => Some(BingServerType::Production),
            "Staging" => Some(BingServerType::Staging),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BingMapsLayer {
    pub layer_style: BingLayerStyle,
    pub server_type: BingServerType,
    pub token: Option<String>,
    pub culture: String,
}

impl BingMapsLayer {
    pub const DEFAULT_CULTURE: &'static str = "en-US";
}

impl Default for BingMapsLayer {
    fn default() -> Self {
        Self {
            layer_style: BingLayerStyle::Road,
            server_type: BingServerType::Production,
            token: None,
            culture: Self::DEFAULT_CULTURE.to_string(),
        }
    }
}
