use super::{LayerXamlWriter, WriteContext, attr_string, read_connection, write_connection};
use crate::document::XamlElement;
use crate::errors::{XamlError, XamlResult};
use crate::format::{bool_str, fmt_f64, join, split_i32};
use mapbuilder_json::JavaScriptSerializer;
use mapbuilder_model::{DynamicMapServiceLayer, ImageServiceLayer, LayerDefinition, TiledMapServiceLayer};

const PROXY: &str = "ProxyURL";

fn read_i32_list(element: &XamlElement, name: &str) -> XamlResult<Option<Vec<i32>>> {
    element
        .attr(name)
        .map(|v| split_i32(v).ok_or_else(|| XamlError::invalid_attribute(&element.name, name, v)))
        .transpose()
}

pub struct DynamicLayerXamlWriter;

impl LayerXamlWriter for DynamicLayerXamlWriter {
    type Kind = DynamicMapServiceLayer;

    fn element_name(&self) -> &'static str {
        "esri:ArcGISDynamicMapServiceLayer"
    }

    fn write_attributes(
        &self,
        kind: &DynamicMapServiceLayer,
        element: &mut XamlElement,
        _: &mut WriteContext,
    ) -> XamlResult<()> {
        write_connection(element, &kind.connection, PROXY);
        if kind.image_format != DynamicMapServiceLayer::DEFAULT_IMAGE_FORMAT {
            element.set_attr("ImageFormat", &kind.image_format);
        }
        if kind.disable_client_caching {
            element.set_attr("DisableClientCaching", bool_str(true));
        }
        if let Some(visible) = &kind.visible_layers {
            element.set_attr("VisibleLayers", join(visible));
        }
        Ok(())
    }

    fn write_element_contents(
        &self,
        kind: &DynamicMapServiceLayer,
        element: &mut XamlElement,
        _: &mut WriteContext,
    ) -> XamlResult<()> {
        if !kind.layer_definitions.is_empty() {
            let mut list = XamlElement::new(format!("{}.LayerDefinitions", self.element_name()));
            for d in &kind.layer_definitions {
                list.push(
                    XamlElement::new("esri:LayerDefinition")
                        .with_attr("LayerID", d.layer_id.to_string())
                        .with_attr("Definition", &d.definition),
                );
            }
            element.push(list);
        }
        Ok(())
    }

    fn read(&self, element: &XamlElement, _: &JavaScriptSerializer) -> XamlResult<DynamicMapServiceLayer> {
        let mut layer_definitions = Vec::new();
        if let Some(list) = element.child(&format!("{}.LayerDefinitions", self.element_name())) {
            for d in list.elements() {
                layer_definitions.push(LayerDefinition {
                    layer_id: d.attr_i32("LayerID")?.unwrap_or(0),
                    definition: d.attr("Definition").unwrap_or_default().to_string(),
                });
            }
        }
        Ok(DynamicMapServiceLayer {
            connection: read_connection(element, PROXY),
            image_format: attr_string(element, "ImageFormat")
                .unwrap_or_else(|| DynamicMapServiceLayer::DEFAULT_IMAGE_FORMAT.to_string()),
            disable_client_caching: element.attr_bool("DisableClientCaching")?.unwrap_or(false),
            visible_layers: read_i32_list(element, "VisibleLayers")?,
            layer_definitions,
        })
    }
}

pub struct TiledLayerXamlWriter;

impl LayerXamlWriter for TiledLayerXamlWriter {
    type Kind = TiledMapServiceLayer;

    fn element_name(&self) -> &'static str {
        "esri:ArcGISTiledMapServiceLayer"
    }

    fn write_attributes(
        &self,
        kind: &TiledMapServiceLayer,
        element: &mut XamlElement,
        _: &mut WriteContext,
    ) -> XamlResult<()> {
        write_connection(element, &kind.connection, PROXY);
        Ok(())
    }

    fn read(&self, element: &XamlElement, _: &JavaScriptSerializer) -> XamlResult<TiledMapServiceLayer> {
        Ok(TiledMapServiceLayer {
            connection: read_connection(element, PROXY),
        })
    }
}

pub struct ImageServiceLayerXamlWriter;

impl LayerXamlWriter for ImageServiceLayerXamlWriter {
    type Kind = ImageServiceLayer;

    fn element_name(&self) -> &'static str {
        "esri:ArcGISImageServiceLayer"
    }

    fn write_attributes(&self, kind: &ImageServiceLayer, element: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        write_connection(element, &kind.connection, PROXY);
        if kind.image_format != ImageServiceLayer::DEFAULT_IMAGE_FORMAT {
            element.set_attr("ImageFormat", &kind.image_format);
        }
        if let Some(bands) = &kind.band_ids {
            element.set_attr("BandIds", join(bands));
        }
        if kind.compression_quality > 0 {
            element.set_attr("CompressionQuality", kind.compression_quality.to_string());
        }
        if let Some(no_data) = kind.no_data {
            element.set_attr("NoData", fmt_f64(no_data));
        }
        if kind.interpolation != ImageServiceLayer::DEFAULT_INTERPOLATION {
            element.set_attr("Interpolation", &kind.interpolation);
        }
        Ok(())
    }

    fn read(&self, element: &XamlElement, _: &JavaScriptSerializer) -> XamlResult<ImageServiceLayer> {
        Ok(ImageServiceLayer {
            connection: read_connection(element, PROXY),
            image_format: attr_string(element, "ImageFormat")
                .unwrap_or_else(|| ImageServiceLayer::DEFAULT_IMAGE_FORMAT.to_string()),
            band_ids: read_i32_list(element, "BandIds")?,
            compression_quality: element.attr_i32("CompressionQuality")?.unwrap_or(0),
            no_data: element.attr_f64("NoData")?,
            interpolation: attr_string(element, "Interpolation")
                .unwrap_or_else(|| ImageServiceLayer::DEFAULT_INTERPOLATION.to_string()),
        })
    }
}
