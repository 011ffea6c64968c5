use super::{LayerXamlWriter, WriteContext, attr_string, read_connection, set_non_empty, write_connection};
use crate::clusterer::{read_gradient_stops, write_gradient_stop};
use crate::document::XamlElement;
use crate::errors::XamlResult;
use crate::format::fmt_f64;
use mapbuilder_json::JavaScriptSerializer;
use mapbuilder_model::{DEFAULT_HEAT_MAP_INTENSITY, GradientStop, HeatMapFeatureLayer, HeatMapLayer, MapPoint};

fn write_intensity_and_gradient(owner: &str, intensity: f64, gradient: &[GradientStop], element: &mut XamlElement) {
    if intensity != DEFAULT_HEAT_MAP_INTENSITY {
        element.set_attr("Intensity", fmt_f64(intensity));
    }
    if !gradient.is_empty() {
        let mut collection = XamlElement::new("GradientStopCollection");
        for stop in gradient {
            collection.push(write_gradient_stop(stop));
        }
        element.push(XamlElement::new(format!("{owner}.Gradient")).with_child(collection));
    }
}

fn read_gradient(owner: &str, element: &XamlElement) -> XamlResult<Vec<GradientStop>> {
    match element.child(&format!("{owner}.Gradient")) {
        Some(property) => read_gradient_stops(property),
        None => Ok(Vec::new()),
    }
}

pub struct HeatMapLayerXamlWriter;

impl LayerXamlWriter for HeatMapLayerXamlWriter {
    type Kind = HeatMapLayer;

    fn element_name(&self) -> &'static str {
        "esriToolkitDS:HeatMapLayer"
    }

    fn write_attributes(&self, _: &HeatMapLayer, _: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        Ok(())
    }

    fn write_element_contents(&self, kind: &HeatMapLayer, element: &mut XamlElement, _: &mut WriteContext) -> XamlResult<()> {
        write_intensity_and_gradient(self.element_name(), kind.intensity, &kind.gradient, element);
        if !kind.points.is_empty() {
            let mut points = XamlElement::new(format!("{}.HeatMapPoints", self.element_name()));
            for p in &kind.points {
                points.push(
                    XamlElement::new("esri:MapPoint")
                        .with_attr("X", fmt_f64(p.x))
                        .with_attr("Y", fmt_f64(p.y)),
                );
            }
            element.push(points);
        }
        Ok(())
    }

    fn read(&self, element: &XamlElement, _: &JavaScriptSerializer) -> XamlResult<HeatMapLayer> {
        let mut points = Vec::new();
        if let Some(list) = element.child(&format!("{}.HeatMapPoints", self.element_name())) {
            for p in list.elements() {
                points.push(MapPoint::new(
                    p.attr_f64("X")?.unwrap_or(0.0),
                    p.attr_f64("Y")?.unwrap_or(0.0),
                ));
            }
        }
        Ok(HeatMapLayer {
            intensity: element.attr_f64("Intensity")?.unwrap_or(DEFAULT_HEAT_MAP_INTENSITY),
            gradient: read_gradient(self.element_name(), element)?,
            points,
        })
    }
}

pub struct HeatMapFeatureLayerXamlWriter;

impl LayerXamlWriter for HeatMapFeatureLayerXamlWriter {
    type Kind = HeatMapFeatureLayer;

    fn element_name(&self) -> &'static str {
        "esriMapping:HeatMapFeatureLayer"
    }

    fn write_attributes(
        &self,
        kind: &HeatMapFeatureLayer,
        element: &mut XamlElement,
        _: &mut WriteContext,
    ) -> XamlResult<()> {
        write_connection(element, &kind.connection, "ProxyUrl");
        set_non_empty(element, "Where", kind.where_clause.as_deref());
        Ok(())
    }

    fn write_element_contents(
        &self,
        kind: &HeatMapFeatureLayer,
        element: &mut XamlElement,
        _: &mut WriteContext,
    ) -> XamlResult<()> {
        write_intensity_and_gradient(self.element_name(), kind.intensity, &kind.gradient, element);
        Ok(())
    }

    fn read(&self, element: &XamlElement, _: &JavaScriptSerializer) -> XamlResult<HeatMapFeatureLayer> {
        Ok(HeatMapFeatureLayer {
            connection: read_connection(element, "ProxyUrl"),
            where_clause: attr_string(element, "Where"),
            intensity: element.attr_f64("Intensity")?.unwrap_or(DEFAULT_HEAT_MAP_INTENSITY),
            gradient: read_gradient(self.element_name(), element)?,
        })
    }
}
