//! KML and WMS layers.

use super::{LayerXamlWriter, WriteContext, attr_string, set_opt};
use crate::document::XamlElement;
use crate::errors::XamlResult;
use crate::format::{bool_str, fmt_f64, join, split_strings};
use mapbuilder_json::JavaScriptSerializer;
use mapbuilder_model::{KmlLayer, WmsLayer};

pub struct KmlLayerXamlWriter;

impl LayerXamlWriter for KmlLayerXamlWriter {
    type Kind = KmlLayer;

    fn element_name(&self) -> &'static str {
        "esriToolkitDS:KmlLayer"
    }

    fn write_attributes(&self, kind: &KmlLayer, element: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        set_opt(element, "Url", kind.url.as_deref());
        set_opt(element, "ProxyUrl", kind.proxy_url.as_deref());
        if let Some(visible) = &kind.visible_layers {
            element.set_attr("VisibleLayers", join(visible));
        }
        if kind.refresh_interval > 0.0 {
            element.set_attr("RefreshInterval", fmt_f64(kind.refresh_interval));
        }
        Ok(())
    }

    fn read(&self, element: &XamlElement, _: &JavaScriptSerializer) -> XamlResult<KmlLayer> {
        Ok(KmlLayer {
            url: attr_string(element, "Url"),
            proxy_url: attr_string(element, "ProxyUrl"),
            visible_layers: element.attr("VisibleLayers").map(split_strings),
            refresh_interval: element.attr_f64("RefreshInterval")?.unwrap_or(0.0),
        })
    }
}

pub struct WmsLayerXamlWriter;

impl LayerXamlWriter for WmsLayerXamlWriter {
    type Kind = WmsLayer;

    fn element_name(&self) -> &'static str {
        "esriToolkitDS:WmsLayer"
    }

    fn write_attributes(&self, kind: &WmsLayer, element: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        set_opt(element, "Url", kind.url.as_deref());
        set_opt(element, "ProxyUrl", kind.proxy_url.as_deref());
        if kind.version != WmsLayer::DEFAULT_VERSION {
            element.set_attr("Version", &kind.version);
        }
        if !kind.layers.is_empty() {
            element.set_attr("Layers", join(&kind.layers));
        }
        if kind.skip_get_capabilities {
            element.set_attr("SkipGetCapabilities", bool_str(true));
        }
        if kind.image_format != WmsLayer::DEFAULT_IMAGE_FORMAT {
            element.set_attr("ImageFormat", &kind.image_format);
        }
        Ok(())
    }

    fn read(&self, element: &XamlElement, _: &JavaScriptSerializer) -> XamlResult<WmsLayer> {
        Ok(WmsLayer {
            url: attr_string(element, "Url"),
            proxy_url: attr_string(element, "ProxyUrl"),
            version: attr_string(element, "Version").unwrap_or_else(|| WmsLayer::DEFAULT_VERSION.to_string()),
            layers: element.attr("Layers").map(split_strings).unwrap_or_default(),
            skip_get_capabilities: element.attr_bool("SkipGetCapabilities")?.unwrap_or(false),
            image_format: attr_string(element, "ImageFormat")
                .unwrap_or_else(|| WmsLayer::DEFAULT_IMAGE_FORMAT.to_string()),
        })
    }
}
