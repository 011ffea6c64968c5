use crate::document::XamlElement;
use crate::errors::{XamlError, XamlResult};
use crate::format::{color_str, fmt_f64, parse_point, point_str};
use mapbuilder_model::{Brush, Clusterer, Color, FlareClusterer, GradientStop};

const FLARE: &str = "esri:FlareClusterer";

/// Only the flare clusterer has a document form; anything else is fatal.
pub fn write_clusterer(clusterer: &Clusterer) -> XamlResult<XamlElement> {
    let flare = match clusterer {
        Clusterer::Flare(flare) => flare,
        Clusterer::Custom { type_name } => {
            return Err(XamlError::UnsupportedClusterer {
                type_name: type_name.clone(),
            });
        }
    };

    let mut element = XamlElement::new(FLARE);
    if flare.radius != FlareClusterer::DEFAULT_RADIUS {
        element.set_attr("Radius", flare.radius.to_string());
    }
    if flare.maximum_flare_count != FlareClusterer::DEFAULT_MAXIMUM_FLARE_COUNT {
        element.set_attr("MaximumFlareCount", flare.maximum_flare_count.to_string());
    }
    for (name, brush) in [
        ("FlareBackground", &flare.flare_background),
        ("FlareForeground", &flare.flare_foreground),
    ] {
        match brush {
            Some(Brush::Solid(color)) => element.set_attr(name, color_str(color)),
            Some(gradient) => {
                let property = XamlElement::new(format!("{FLARE}.{name}")).with_child(write_brush(gradient));
                element.push(property);
            }
            None => {}
        }
    }
    if !flare.gradient.is_empty() {
        let brush = Brush::LinearGradient {
            start_point: Brush::LINEAR_DEFAULT_START,
            end_point: Brush::LINEAR_DEFAULT_END,
            stops: flare.gradient.clone(),
        };
        element.push(XamlElement::new(format!("{FLARE}.Gradient")).with_child(write_brush(&brush)));
    }
    Ok(element)
}

pub fn read_clusterer(element: &XamlElement) -> XamlResult<Clusterer> {
    if element.name != FLARE {
        return Ok(Clusterer::Custom {
            type_name: element.local_name().to_string(),
        });
    }
    let mut flare = FlareClusterer {
        radius: element.attr_i32("Radius")?.unwrap_or(FlareClusterer::DEFAULT_RADIUS),
        maximum_flare_count: element
            .attr_i32("MaximumFlareCount")?
            .unwrap_or(FlareClusterer::DEFAULT_MAXIMUM_FLARE_COUNT),
        ..Default::default()
    };
    flare.flare_background = read_brush_property(element, "FlareBackground")?;
    flare.flare_foreground = read_brush_property(element, "FlareForeground")?;
    if let Some(brush) = read_brush_property(element, "Gradient")? {
        flare.gradient = brush.stops().to_vec();
    }
    Ok(Clusterer::Flare(flare))
}

fn read_brush_property(owner: &XamlElement, name: &str) -> XamlResult<Option<Brush>> {
    if let Some(value) = owner.attr(name) {
        let color = Color::parse(value).ok_or_else(|| XamlError::invalid_attribute(&owner.name, name, value))?;
        return Ok(Some(Brush::Solid(color)));
    }
    owner
        .child(&format!("{}.{name}", owner.name))
        .and_then(XamlElement::first_element)
        .map(read_brush)
        .transpose()
}

pub fn write_brush(brush: &Brush) -> XamlElement {
    match brush {
        Brush::Solid(color) => XamlElement::new("SolidColorBrush").with_attr("Color", color_str(color)),
        Brush::LinearGradient {
            start_point,
            end_point,
            stops,
        } => {
            let mut e = XamlElement::new("LinearGradientBrush")
                .with_attr("StartPoint", point_str(start_point))
                .with_attr("EndPoint", point_str(end_point));
            for stop in stops {
                e.push(write_gradient_stop(stop));
            }
            e
        }
        Brush::RadialGradient { stops } => {
            let mut e = XamlElement::new("RadialGradientBrush");
            for stop in stops {
                e.push(write_gradient_stop(stop));
            }
            e
        }
    }
}

pub fn read_brush(element: &XamlElement) -> XamlResult<Brush> {
    match element.local_name() {
        "SolidColorBrush" => {
            let value = element.attr("Color").unwrap_or_default();
            Color::parse(value)
                .map(Brush::Solid)
                .ok_or_else(|| XamlError::invalid_attribute(&element.name, "Color", value))
        }
        "LinearGradientBrush" => {
            let point = |name: &str, fallback| match element.attr(name) {
                Some(v) => parse_point(v).ok_or_else(|| XamlError::invalid_attribute(&element.name, name, v)),
                None => Ok(fallback),
            };
            Ok(Brush::LinearGradient {
                start_point: point("StartPoint", Brush::LINEAR_DEFAULT_START)?,
                end_point: point("EndPoint", Brush::LINEAR_DEFAULT_END)?,
                stops: read_gradient_stops(element)?,
            })
        }
        "RadialGradientBrush" => Ok(Brush::RadialGradient {
            stops: read_gradient_stops(element)?,
        }),
        other => Err(XamlError::invalid_attribute("Brush", "type", other)),
    }
}

pub fn write_gradient_stop(stop: &GradientStop) -> XamlElement {
    XamlElement::new("GradientStop")
        .with_attr("Color", color_str(&stop.color))
        .with_attr("Offset", fmt_f64(stop.offset))
}

/// Reads `GradientStop` children, looking through an optional
/// `GradientStopCollection` wrapper.
pub fn read_gradient_stops(parent: &XamlElement) -> XamlResult<Vec<GradientStop>> {
    let mut stops = Vec::new();
    for child in parent.elements() {
        match child.local_name() {
            "GradientStop" => {
                let value = child.attr("Color").unwrap_or_default();
                let color =
                    Color::parse(value).ok_or_else(|| XamlError::invalid_attribute(&child.name, "Color", value))?;
                stops.push(GradientStop::new(color, child.attr_f64("Offset")?.unwrap_or(0.0)));
            }
            "GradientStopCollection" => stops.extend(read_gradient_stops(child)?),
            _ => {}
        }
    }
    Ok(stops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_clusterer_is_unsupported() {
        let err = write_clusterer(&Clusterer::Custom { type_name: "GridClusterer".into() }).unwrap_err();
        assert!(matches!(err, XamlError::UnsupportedClusterer { type_name } if type_name == "GridClusterer"));
    }

    #[test]
    fn solid_brush_is_attribute_gradient_is_property_element() {
        let flare = FlareClusterer {
            radius: 30,
            flare_background: Some(Brush::Solid(Color::RED)),
            flare_foreground: Some(Brush::RadialGradient {
                stops: vec![GradientStop::new(Color::WHITE, 0.0), GradientStop::new(Color::BLACK, 1.0)],
            }),
            ..Default::default()
        };
        let e = write_clusterer(&Clusterer::Flare(flare.clone())).unwrap();
        assert_eq!(e.attr("Radius"), Some("30"));
        assert_eq!(e.attr("MaximumFlareCount"), None);
        assert_eq!(e.attr("FlareBackground"), Some("#FFFF0000"));
        assert!(e.child("esri:FlareClusterer.FlareForeground").is_some());
        assert_eq!(read_clusterer(&e).unwrap(), Clusterer::Flare(flare));
    }
}
