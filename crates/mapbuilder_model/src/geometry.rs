use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialReference {
    pub wkid: Option<i32>,
    pub wkt: Option<String>,
}

impl SpatialReference {
    pub fn from_wkid(wkid: i32) -> Self {
        Self {
            wkid: Some(wkid),
            wkt: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub type Path = Vec<[f64; 2]>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(MapPoint),
    MultiPoint { points: Vec<[f64; 2]> },
    Polyline { paths: Vec<Path> },
    Polygon { rings: Vec<Path> },
    Envelope { xmin: f64, ymin: f64, xmax: f64, ymax: f64 },
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::Polyline { .. } => GeometryType::Polyline,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::Envelope { .. } => GeometryType::Envelope,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    MultiPoint,
    Polyline,
    Polygon,
    Envelope,
}

impl GeometryType {
    pub fn as_str(&self) -> &str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::Polyline => "Polyline",
            GeometryType::Polygon => "Polygon",
            GeometryType::Envelope => "Envelope",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "point" => Some(GeometryType::Point),
            "multipoint" => Some(GeometryType::MultiPoint),
            "polyline" => Some(GeometryType::Polyline),
            "polygon" => Some(GeometryType::Polygon),
            "envelope" => Some(GeometryType::Envelope),
            _ => None,
        }
    }
}
