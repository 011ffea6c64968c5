use crate::color::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerStyle {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    X,
}

impl MarkerStyle {
    pub fn as_str(&self) -> &str {
        match self {
            MarkerStyle::Circle => "Circle",
            MarkerStyle::Square => "Square",
            MarkerStyle::Diamond => "Diamond",
            MarkerStyle::Triangle => "Triangle",
            MarkerStyle::Cross => "Cross",
            MarkerStyle::X => "X",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "circle" => Some(MarkerStyle::Circle),
            "square" => Some(MarkerStyle::Square),
            "diamond" => Some(MarkerStyle::Diamond),
            "triangle" => Some(MarkerStyle::Triangle),
            "cross" => Some(MarkerStyle::Cross),
            "x" => Some(MarkerStyle::X),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    DashDot,
    DashDotDot,
    Dot,
    Null,
}

impl LineStyle {
    pub fn as_str(&self) -> &str {
        match self {
            LineStyle::Solid => "Solid",
            LineStyle::Dash => "Dash",
            LineStyle::DashDot => "DashDot",
            LineStyle::DashDotDot => "DashDotDot",
            LineStyle::Dot => "Dot",
            LineStyle::Null => "Null",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "solid" => Some(LineStyle::Solid),
            "dash" => Some(LineStyle::Dash),
            "dashdot" => Some(LineStyle::DashDot),
            "dashdotdot" => Some(LineStyle::DashDotDot),
            "dot" => Some(LineStyle::Dot),
            "null" => Some(LineStyle::Null),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleMarkerSymbol {
    pub color: Color,
    pub size: f64,
    pub style: MarkerStyle,
}

impl SimpleMarkerSymbol {
    pub const DEFAULT_SIZE: f64 = 5.0;
}

impl Default for SimpleMarkerSymbol {
    fn default() -> Self {
        Self {
            color: Color::RED,
            size: Self::DEFAULT_SIZE,
            style: MarkerStyle::Circle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleLineSymbol {
    pub color: Color,
    pub width: f64,
    pub style: LineStyle,
}

impl SimpleLineSymbol {
    pub const DEFAULT_WIDTH: f64 = 1.0;
}

impl Default for SimpleLineSymbol {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: Self::DEFAULT_WIDTH,
            style: LineStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleFillSymbol {
    pub fill: Color,
    pub border_brush: Option<Color>,
    pub border_thickness: f64,
}

impl SimpleFillSymbol {
    pub const DEFAULT_BORDER_THICKNESS: f64 = 1.0;
}

impl Default for SimpleFillSymbol {
    fn default() -> Self {
        Self {
            fill: Color::from_argb(128, 255, 0, 0),
            border_brush: None,
            border_thickness: Self::DEFAULT_BORDER_THICKNESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureMarkerSymbol {
    pub source: String,
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub opacity: f64,
}

impl Default for PictureMarkerSymbol {
    fn default() -> Self {
        Self {
            source: String::new(),
            width: 0.0,
            height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSymbol {
    pub text: String,
    pub font_family: Option<String>,
    pub font_size: f64,
    pub foreground: Color,
}

impl TextSymbol {
    pub const DEFAULT_FONT_SIZE: f64 = 11.0;
}

impl Default for TextSymbol {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: None,
            font_size: Self::DEFAULT_FONT_SIZE,
            foreground: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    SimpleMarker(SimpleMarkerSymbol),
    SimpleLine(SimpleLineSymbol),
    SimpleFill(SimpleFillSymbol),
    PictureMarker(PictureMarkerSymbol),
    Text(TextSymbol),
    /// A symbol built at runtime (control templates, bound resources) that
    /// has no textual form.
    Runtime { type_name: String },
}

impl Symbol {
    pub fn is_serializable(&self) -> bool {
        !matches!(self, Symbol::Runtime { .. })
    }

    pub fn type_name(&self) -> &str {
        match self {
            Symbol::SimpleMarker(_) => "SimpleMarkerSymbol",
            Symbol::SimpleLine(_) => "SimpleLineSymbol",
            Symbol::SimpleFill(_) => "SimpleFillSymbol",
            Symbol::PictureMarker(_) => "PictureMarkerSymbol",
            Symbol::Text(_) => "TextSymbol",
            Symbol::Runtime { type_name } => type_name,
        }
    }
}
