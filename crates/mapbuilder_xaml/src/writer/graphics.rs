use super::{
    LayerXamlWriter, WriteContext, XamlWarningKind, attr_string, read_connection, set_non_empty, set_opt,
    write_connection,
};
use crate::clusterer::{read_clusterer, write_clusterer};
use crate::dataset::{read_graphics_dataset, write_graphics_dataset};
use crate::document::XamlElement;
use crate::errors::{XamlError, XamlResult};
use crate::format::{bool_str, join, split_strings};
use crate::namespaces::ext;
use crate::renderer::{read_renderer, write_renderer};
use mapbuilder_json::JavaScriptSerializer;
use mapbuilder_model::{FeatureLayer, FeatureLayerMode, GeoRssLayer, GraphicsSettings};
use tracing::debug;

fn write_graphics_attributes(settings: &GraphicsSettings, element: &mut XamlElement) {
    if !settings.renderer_takes_precedence {
        element.set_attr("RendererTakesPrecedence", bool_str(false));
    }
}

/// Renderer, clusterer and (when `with_dataset`) the inline graphics.
fn write_graphics_contents(
    settings: &GraphicsSettings,
    element: &mut XamlElement,
    ctx: &mut WriteContext,
    with_dataset: bool,
) -> XamlResult<()> {
    if let Some(renderer) = &settings.renderer {
        match write_renderer(renderer)? {
            Some(r) => {
                let property = XamlElement::new(format!("{}.Renderer", element.name)).with_child(r);
                element.push(property);
            }
            None => {
                debug!(layer = %element.attr("ID").unwrap_or_default(), "renderer has unserializable symbols, omitted");
                ctx.warn(XamlWarningKind::RendererOmitted);
            }
        }
    }
    if let Some(clusterer) = &settings.clusterer {
        let c = write_clusterer(clusterer)?;
        let property = XamlElement::new(format!("{}.Clusterer", element.name)).with_child(c);
        element.push(property);
    }
    if with_dataset && !settings.graphics.is_empty() {
        match write_graphics_dataset(&settings.graphics) {
            Ok(json) => element.push(XamlElement::new(ext("GraphicsDataset")).with_text(json)),
            Err(err) => {
                debug!(error = %err, "graphics dataset serialization failed");
                ctx.warn(XamlWarningKind::GraphicsDatasetOmitted {
                    message: err.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn read_graphics(element: &XamlElement, serializer: &JavaScriptSerializer) -> XamlResult<GraphicsSettings> {
    let mut settings = GraphicsSettings {
        renderer_takes_precedence: element.attr_bool("RendererTakesPrecedence")?.unwrap_or(true),
        ..Default::default()
    };
    if let Some(property) = element.child(&format!("{}.Renderer", element.name)) {
        let r = property
            .first_element()
            .ok_or_else(|| XamlError::missing(format!("{}.Renderer content", element.name)))?;
        settings.renderer = Some(read_renderer(r)?);
    }
    if let Some(property) = element.child(&format!("{}.Clusterer", element.name)) {
        let c = property
            .first_element()
            .ok_or_else(|| XamlError::missing(format!("{}.Clusterer content", element.name)))?;
        settings.clusterer = Some(read_clusterer(c)?);
    }
    if let Some(dataset) = element.child(&ext("GraphicsDataset")) {
        let text = dataset.text();
        if !text.trim().is_empty() {
            settings.graphics = read_graphics_dataset(text.trim(), serializer)?;
        }
    }
    Ok(settings)
}

pub struct GraphicsLayerXamlWriter;

impl LayerXamlWriter for GraphicsLayerXamlWriter {
    type Kind = GraphicsSettings;

    fn element_name(&self) -> &'static str {
        "esri:GraphicsLayer"
    }

    fn write_attributes(&self, kind: &GraphicsSettings, element: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        write_graphics_attributes(kind, element);
        Ok(())
    }

    fn write_element_contents(
        &self,
        kind: &GraphicsSettings,
        element: &mut XamlElement,
        ctx: &mut WriteContext,
    ) -> XamlResult<()> {
        write_graphics_contents(kind, element, ctx, true)
    }

    fn read(&self, element: &XamlElement, serializer: &JavaScriptSerializer) -> XamlResult<GraphicsSettings> {
        read_graphics(element, serializer)
    }
}

pub struct FeatureLayerXamlWriter;

impl LayerXamlWriter for FeatureLayerXamlWriter {
    type Kind = FeatureLayer;

    fn element_name(&self) -> &'static str {
        "esri:FeatureLayer"
    }

    fn write_attributes(&self, kind: &FeatureLayer, element: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        write_graphics_attributes(&kind.graphics, element);
        write_connection(element, &kind.connection, "ProxyUrl");
        if kind.mode != FeatureLayerMode::OnDemand {
            element.set_attr("Mode", kind.mode.as_str());
        }
        set_non_empty(element, "Where", kind.where_clause.as_deref());
        if !kind.out_fields.is_empty() {
            element.set_attr("OutFields", join(&kind.out_fields));
        }
        if kind.disable_client_caching {
            element.set_attr("DisableClientCaching", bool_str(true));
        }
        if kind.on_demand_cache_size != FeatureLayer::DEFAULT_ON_DEMAND_CACHE_SIZE {
            element.set_attr("OnDemandCacheSize", kind.on_demand_cache_size.to_string());
        }
        if !kind.auto_save {
            element.set_attr("AutoSave", bool_str(false));
        }
        Ok(())
    }

    fn write_element_contents(
        &self,
        kind: &FeatureLayer,
        element: &mut XamlElement,
        ctx: &mut WriteContext,
    ) -> XamlResult<()> {
        write_graphics_contents(&kind.graphics, element, ctx, kind.is_feature_collection())
    }

    fn read(&self, element: &XamlElement, serializer: &JavaScriptSerializer) -> XamlResult<FeatureLayer> {
        let mode = match element.attr("Mode") {
            Some(v) => FeatureLayerMode::from_name(v).ok_or_else(|| XamlError::invalid_attribute(&element.name, "Mode", v))?,
            None => FeatureLayerMode::OnDemand,
        };
        Ok(FeatureLayer {
            connection: read_connection(element, "ProxyUrl"),
            mode,
            where_clause: attr_string(element, "Where"),
            out_fields: element.attr("OutFields").map(split_strings).unwrap_or_default(),
            disable_client_caching: element.attr_bool("DisableClientCaching")?.unwrap_or(false),
            on_demand_cache_size: element
                .attr_i32("OnDemandCacheSize")?
                .unwrap_or(FeatureLayer::DEFAULT_ON_DEMAND_CACHE_SIZE),
            auto_save: element.attr_bool("AutoSave")?.unwrap_or(true),
            graphics: read_graphics(element, serializer)?,
        })
    }
}

pub struct GeoRssLayerXamlWriter;

impl LayerXamlWriter for GeoRssLayerXamlWriter {
    type Kind = GeoRssLayer;

    fn element_name(&self) -> &'static str {
        "esriToolkitDS:GeoRssLayer"
    }

    fn write_attributes(&self, kind: &GeoRssLayer, element: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        write_graphics_attributes(&kind.graphics, element);
        set_opt(element, "Url", kind.url.as_deref());
        set_opt(element, "ProxyUrl", kind.proxy_url.as_deref());
        Ok(())
    }

    fn write_element_contents(
        &self,
        kind: &GeoRssLayer,
        element: &mut XamlElement,
        ctx: &mut WriteContext,
    ) -> XamlResult<()> {
        write_graphics_contents(&kind.graphics, element, ctx, false)
    }

    fn read(&self, element: &XamlElement, serializer: &JavaScriptSerializer) -> XamlResult<GeoRssLayer> {
        Ok(GeoRssLayer {
            url: attr_string(element, "Url"),
            proxy_url: attr_string(element, "ProxyUrl"),
            graphics: read_graphics(element, serializer)?,
        })
    }
}
