//! Layer dispatch and whole-document read/write.

use crate::document::{XamlElement, XmlWriteOptions};
use crate::errors::{XamlError, XamlResult};
use crate::namespaces::DECLARATIONS;
use crate::writer::*;
use mapbuilder_json::JavaScriptSerializer;
use mapbuilder_model::{Layer, LayerKind};
use tracing::warn;

pub const MAP_LAYERS: &str = "esri:Map.Layers";

/// Writes one layer with the writer matching its kind.
pub fn write_layer(layer: &Layer, ctx: &mut WriteContext) -> XamlResult<XamlElement> {
    match &layer.kind {
        LayerKind::DynamicMapService(k) => DynamicLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::TiledMapService(k) => TiledLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::ImageService(k) => ImageServiceLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::Feature(k) => FeatureLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::Graphics(k) => GraphicsLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::GeoRss(k) => GeoRssLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::HeatMap(k) => HeatMapLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::HeatMapFeature(k) => HeatMapFeatureLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::Kml(k) => KmlLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::Wms(k) => WmsLayerXamlWriter.write_layer(layer, k, ctx),
        LayerKind::Bing(k) => BingLayerXamlWriter.write_layer(layer, k, ctx),
    }
}

/// Inverse of [`write_layer`], keyed on the element name.
pub fn read_layer(element: &XamlElement, serializer: &JavaScriptSerializer) -> XamlResult<Layer> {
    let kind = match element.name.as_str() {
        n if n == DynamicLayerXamlWriter.element_name() => {
            LayerKind::DynamicMapService(DynamicLayerXamlWriter.read(element, serializer)?)
        }
        n if n == TiledLayerXamlWriter.element_name() => {
            LayerKind::TiledMapService(TiledLayerXamlWriter.read(element, serializer)?)
        }
        n if n == ImageServiceLayerXamlWriter.element_name() => {
            LayerKind::ImageService(ImageServiceLayerXamlWriter.read(element, serializer)?)
        }
        n if n == FeatureLayerXamlWriter.element_name() => {
            LayerKind::Feature(FeatureLayerXamlWriter.read(element, serializer)?)
        }
        n if n == GraphicsLayerXamlWriter.element_name() => {
            LayerKind::Graphics(GraphicsLayerXamlWriter.read(element, serializer)?)
        }
        n if n == GeoRssLayerXamlWriter.element_name() => {
            LayerKind::GeoRss(GeoRssLayerXamlWriter.read(element, serializer)?)
        }
        n if n == HeatMapLayerXamlWriter.element_name() => {
            LayerKind::HeatMap(HeatMapLayerXamlWriter.read(element, serializer)?)
        }
        n if n == HeatMapFeatureLayerXamlWriter.element_name() => {
            LayerKind::HeatMapFeature(HeatMapFeatureLayerXamlWriter.read(element, serializer)?)
        }
        n if n == KmlLayerXamlWriter.element_name() => LayerKind::Kml(KmlLayerXamlWriter.read(element, serializer)?),
        n if n == WmsLayerXamlWriter.element_name() => LayerKind::Wms(WmsLayerXamlWriter.read(element, serializer)?),
        n if n == BingLayerXamlWriter.element_name() => LayerKind::Bing(BingLayerXamlWriter.read(element, serializer)?),
        other => {
            return Err(XamlError::UnknownLayerElement {
                name: other.to_string(),
            });
        }
    };
    let mut layer = Layer {
        kind,
        ..Default::default()
    };
    read_base(element, &mut layer)?;
    Ok(layer)
}

/// Builds the `esri:Map.Layers` document. A layer that fails to write is
/// logged, reported as a warning and left out; the rest are still written.
pub fn write_layers_element(layers: &[Layer]) -> (XamlElement, Vec<XamlWarning>) {
    let mut root = XamlElement::new(MAP_LAYERS);
    for (attr, uri) in DECLARATIONS {
        root.set_attr(attr, uri);
    }
    let mut ctx = WriteContext::new();
    for layer in layers {
        match write_layer(layer, &mut ctx) {
            Ok(element) => root.push(element),
            Err(err) => {
                warn!(layer = %layer.id, kind = layer.kind.kind_name(), error = %err, "layer could not be written");
                ctx.warn(XamlWarningKind::LayerOmitted {
                    message: err.to_string(),
                });
            }
        }
    }
    (root, ctx.into_warnings())
}

pub fn write_layers(layers: &[Layer], options: &XmlWriteOptions) -> XamlResult<(String, Vec<XamlWarning>)> {
    let (root, warnings) = write_layers_element(layers);
    Ok((root.to_xml_string_with(options)?, warnings))
}

/// Reads a layers document. The root may be `esri:Map.Layers` itself or an
/// `esri:Map` holding it. Unreadable layers are skipped with a warning.
pub fn read_layers(xml: &str, serializer: &JavaScriptSerializer) -> XamlResult<(Vec<Layer>, Vec<XamlWarning>)> {
    let root = XamlElement::parse(xml)?;
    let container = if root.name == MAP_LAYERS {
        &root
    } else {
        root.child(MAP_LAYERS).ok_or_else(|| XamlError::missing(MAP_LAYERS))?
    };

    let mut layers = Vec::new();
    let mut warnings = Vec::new();
    for element in container.elements() {
        match read_layer(element, serializer) {
            Ok(layer) => layers.push(layer),
            Err(err) => {
                let layer_id = element.attr("ID").unwrap_or_default().to_string();
                warn!(layer = %layer_id, element = %element.name, error = %err, "layer could not be read");
                warnings.push(XamlWarning {
                    layer_id,
                    kind: XamlWarningKind::LayerOmitted {
                        message: err.to_string(),
                    },
                });
            }
        }
    }
    Ok((layers, warnings))
}
