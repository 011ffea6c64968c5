//! Layer writers.
//!
//! Each concrete writer knows one `LayerKind` variant. Writing runs the same
//! pipeline for every kind: base attributes, kind attributes, kind element
//! contents, then the builder extension elements. Choosing the writer for a
//! layer is done by the caller with a `match` (see [`crate::layers`]).

mod base;
mod bing;
mod graphics;
mod heatmap;
mod map_service;
mod ogc;

pub use base::{read_base, read_fields, write_base_attributes, write_extension_elements, write_fields};
pub use bing::BingLayerXamlWriter;
pub use graphics::{FeatureLayerXamlWriter, GeoRssLayerXamlWriter, GraphicsLayerXamlWriter};
pub use heatmap::{HeatMapFeatureLayerXamlWriter, HeatMapLayerXamlWriter};
pub use map_service::{DynamicLayerXamlWriter, ImageServiceLayerXamlWriter, TiledLayerXamlWriter};
pub use ogc::{KmlLayerXamlWriter, WmsLayerXamlWriter};

use crate::document::XamlElement;
use crate::errors::XamlResult;
use mapbuilder_json::JavaScriptSerializer;
use mapbuilder_model::{Layer, ServiceConnection};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum XamlWarningKind {
    /// A renderer symbol had no textual form, so the renderer was left out.
    RendererOmitted,
    GraphicsDatasetOmitted { message: String },
    /// The whole layer failed and was skipped.
    LayerOmitted { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct XamlWarning {
    pub layer_id: String,
    pub kind: XamlWarningKind,
}

impl fmt::Display for XamlWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            XamlWarningKind::RendererOmitted => {
                write!(f, "layer '{}': renderer omitted (unserializable symbol)", self.layer_id)
            }
            XamlWarningKind::GraphicsDatasetOmitted { message } => {
                write!(f, "layer '{}': graphics dataset omitted: {message}", self.layer_id)
            }
            XamlWarningKind::LayerOmitted { message } => {
                write!(f, "layer '{}' omitted: {message}", self.layer_id)
            }
        }
    }
}

/// Per-document write state: the layer being written and the warnings
/// collected so far.
#[derive(Debug, Default)]
pub struct WriteContext {
    layer_id: String,
    warnings: Vec<XamlWarning>,
}

impl WriteContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_layer(&mut self, layer_id: &str) {
        self.layer_id = layer_id.to_string();
    }

    pub fn warn(&mut self, kind: XamlWarningKind) {
        self.warnings.push(XamlWarning {
            layer_id: self.layer_id.clone(),
            kind,
        });
    }

    pub fn warnings(&self) -> &[XamlWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<XamlWarning> {
        self.warnings
    }
}

pub trait LayerXamlWriter {
    type Kind;

    fn element_name(&self) -> &'static str;

    fn write_attributes(&self, kind: &Self::Kind, element: &mut XamlElement, ctx: &mut WriteContext)
    -> XamlResult<()>;

    fn write_element_contents(
        &self,
        _kind: &Self::Kind,
        _element: &mut XamlElement,
        _ctx: &mut WriteContext,
    ) -> XamlResult<()> {
        Ok(())
    }

    fn read(&self, element: &XamlElement, serializer: &JavaScriptSerializer) -> XamlResult<Self::Kind>;

    fn write_layer(&self, layer: &Layer, kind: &Self::Kind, ctx: &mut WriteContext) -> XamlResult<XamlElement> {
        ctx.begin_layer(&layer.id);
        let mut element = XamlElement::new(self.element_name());
        write_base_attributes(layer, &mut element);
        self.write_attributes(kind, &mut element, ctx)?;
        self.write_element_contents(kind, &mut element, ctx)?;
        write_extension_elements(layer, &mut element);
        Ok(element)
    }
}

pub(crate) fn set_opt(element: &mut XamlElement, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        element.set_attr(name, value);
    }
}

pub(crate) fn set_non_empty(element: &mut XamlElement, name: &str, value: Option<&str>) {
    set_opt(element, name, value.filter(|v| !v.is_empty()));
}

pub(crate) fn attr_string(element: &XamlElement, name: &str) -> Option<String> {
    element.attr(name).map(str::to_string)
}

/// The dynamic, tiled and image service elements spell the proxy attribute
/// `ProxyURL`; the others use `ProxyUrl`.
pub(crate) fn write_connection(element: &mut XamlElement, connection: &ServiceConnection, proxy_attr: &str) {
    set_opt(element, "Url", connection.url.as_deref());
    set_opt(element, proxy_attr, connection.proxy_url.as_deref());
    set_opt(element, "Token", connection.token.as_deref());
}

pub(crate) fn read_connection(element: &XamlElement, proxy_attr: &str) -> ServiceConnection {
    ServiceConnection {
        url: attr_string(element, "Url"),
        proxy_url: attr_string(element, proxy_attr),
        token: attr_string(element, "Token"),
    }
}
