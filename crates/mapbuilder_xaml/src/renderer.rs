//! Renderer and symbol elements.

use crate::document::XamlElement;
use crate::errors::{XamlError, XamlResult};
use crate::format::{color_str, fmt_f64};
use mapbuilder_model::{
    ClassBreakInfo, ClassBreaksRenderer, Color, LineStyle, MarkerStyle, PictureMarkerSymbol, Renderer,
    SimpleFillSymbol, SimpleLineSymbol, SimpleMarkerSymbol, SimpleRenderer, Symbol, TextSymbol, UniqueValueInfo,
    UniqueValueRenderer,
};

const SIMPLE_RENDERER: &str = "esri:SimpleRenderer";
const UNIQUE_VALUE_RENDERER: &str = "esri:UniqueValueRenderer";
const CLASS_BREAKS_RENDERER: &str = "esri:ClassBreaksRenderer";
const UNIQUE_VALUE_INFO: &str = "esri:UniqueValueInfo";
const CLASS_BREAK_INFO: &str = "esri:ClassBreakInfo";

/// Writes a renderer element, or `None` when any of its symbols has no
/// textual form. The renderer is then dropped as a whole.
pub fn write_renderer(renderer: &Renderer) -> XamlResult<Option<XamlElement>> {
    if !renderer.is_serializable() {
        return Ok(None);
    }
    let element = match renderer {
        Renderer::Simple(r) => {
            let mut e = XamlElement::new(SIMPLE_RENDERER);
            set_opt(&mut e, "Label", r.label.as_deref());
            set_opt(&mut e, "Description", r.description.as_deref());
            if let Some(symbol) = &r.symbol {
                e.push(property(SIMPLE_RENDERER, "Symbol", write_symbol(symbol)?));
            }
            e
        }
        Renderer::UniqueValue(r) => {
            let mut e = XamlElement::new(UNIQUE_VALUE_RENDERER).with_attr("Field", &r.field);
            set_opt(&mut e, "DefaultLabel", r.default_label.as_deref());
            if let Some(symbol) = &r.default_symbol {
                e.push(property(UNIQUE_VALUE_RENDERER, "DefaultSymbol", write_symbol(symbol)?));
            }
            if !r.infos.is_empty() {
                let mut infos = XamlElement::new(format!("{UNIQUE_VALUE_RENDERER}.Infos"));
                for info in &r.infos {
                    let mut i = XamlElement::new(UNIQUE_VALUE_INFO).with_attr("Value", &info.value);
                    set_opt(&mut i, "Label", info.label.as_deref());
                    set_opt(&mut i, "Description", info.description.as_deref());
                    if let Some(symbol) = &info.symbol {
                        i.push(property(UNIQUE_VALUE_INFO, "Symbol", write_symbol(symbol)?));
                    }
                    infos.push(i);
                }
                e.push(infos);
            }
            e
        }
        Renderer::ClassBreaks(r) => {
            let mut e = XamlElement::new(CLASS_BREAKS_RENDERER).with_attr("Field", &r.field);
            set_opt(&mut e, "DefaultLabel", r.default_label.as_deref());
            if let Some(symbol) = &r.default_symbol {
                e.push(property(CLASS_BREAKS_RENDERER, "DefaultSymbol", write_symbol(symbol)?));
            }
            if !r.classes.is_empty() {
                let mut classes = XamlElement::new(format!("{CLASS_BREAKS_RENDERER}.Classes"));
                for class in &r.classes {
                    let mut c = XamlElement::new(CLASS_BREAK_INFO)
                        .with_attr("MinimumValue", fmt_f64(class.minimum_value))
                        .with_attr("MaximumValue", fmt_f64(class.maximum_value));
                    set_opt(&mut c, "Label", class.label.as_deref());
                    set_opt(&mut c, "Description", class.description.as_deref());
                    if let Some(symbol) = &class.symbol {
                        c.push(property(CLASS_BREAK_INFO, "Symbol", write_symbol(symbol)?));
                    }
                    classes.push(c);
                }
                e.push(classes);
            }
            e
        }
    };
    Ok(Some(element))
}

pub fn read_renderer(element: &XamlElement) -> XamlResult<Renderer> {
    match element.name.as_str() {
        SIMPLE_RENDERER => Ok(Renderer::Simple(SimpleRenderer {
            symbol: read_property_symbol(element, "Symbol")?,
            label: element.attr("Label").map(str::to_string),
            description: element.attr("Description").map(str::to_string),
        })),
        UNIQUE_VALUE_RENDERER => {
            let mut infos = Vec::new();
            if let Some(list) = element.child(&format!("{UNIQUE_VALUE_RENDERER}.Infos")) {
                for i in list.elements() {
                    infos.push(UniqueValueInfo {
                        value: i.attr("Value").unwrap_or_default().to_string(),
                        label: i.attr("Label").map(str::to_string),
                        description: i.attr("Description").map(str::to_string),
                        symbol: read_property_symbol(i, "Symbol")?,
                    });
                }
            }
            Ok(Renderer::UniqueValue(UniqueValueRenderer {
                field: element.attr("Field").unwrap_or_default().to_string(),
                default_label: element.attr("DefaultLabel").map(str::to_string),
                default_symbol: read_property_symbol(element, "DefaultSymbol")?,
                infos,
            }))
        }
        CLASS_BREAKS_RENDERER => {
            let mut classes = Vec::new();
            if let Some(list) = element.child(&format!("{CLASS_BREAKS_RENDERER}.Classes")) {
                for c in list.elements() {
                    classes.push(ClassBreakInfo {
                        minimum_value: c.attr_f64("MinimumValue")?.unwrap_or_default(),
                        maximum_value: c.attr_f64("MaximumValue")?.unwrap_or_default(),
                        label: c.attr("Label").map(str::to_string),
                        description: c.attr("Description").map(str::to_string),
                        symbol: read_property_symbol(c, "Symbol")?,
                    });
                }
            }
            Ok(Renderer::ClassBreaks(ClassBreaksRenderer {
                field: element.attr("Field").unwrap_or_default().to_string(),
                default_label: element.attr("DefaultLabel").map(str::to_string),
                default_symbol: read_property_symbol(element, "DefaultSymbol")?,
                classes,
            }))
        }
        other => Err(XamlError::invalid_attribute("Renderer", "type", other)),
    }
}

pub fn write_symbol(symbol: &Symbol) -> XamlResult<XamlElement> {
    let element = match symbol {
        Symbol::SimpleMarker(s) => {
            let mut e = XamlElement::new("esri:SimpleMarkerSymbol").with_attr("Color", color_str(&s.color));
            if s.size != SimpleMarkerSymbol::DEFAULT_SIZE {
                e.set_attr("Size", fmt_f64(s.size));
            }
            if s.style != MarkerStyle::default() {
                e.set_attr("Style", s.style.as_str());
            }
            e
        }
        Symbol::SimpleLine(s) => {
            let mut e = XamlElement::new("esri:SimpleLineSymbol").with_attr("Color", color_str(&s.color));
            if s.width != SimpleLineSymbol::DEFAULT_WIDTH {
                e.set_attr("Width", fmt_f64(s.width));
            }
            if s.style != LineStyle::default() {
                e.set_attr("Style", s.style.as_str());
            }
            e
        }
        Symbol::SimpleFill(s) => {
            let mut e = XamlElement::new("esri:SimpleFillSymbol").with_attr("Fill", color_str(&s.fill));
            if let Some(border) = &s.border_brush {
                e.set_attr("BorderBrush", color_str(border));
            }
            if s.border_thickness != SimpleFillSymbol::DEFAULT_BORDER_THICKNESS {
                e.set_attr("BorderThickness", fmt_f64(s.border_thickness));
            }
            e
        }
        Symbol::PictureMarker(s) => {
            let mut e = XamlElement::new("esri:PictureMarkerSymbol").with_attr("Source", &s.source);
            for (name, value, default) in [
                ("Width", s.width, 0.0),
                ("Height", s.height, 0.0),
                ("OffsetX", s.offset_x, 0.0),
                ("OffsetY", s.offset_y, 0.0),
                ("Opacity", s.opacity, 1.0),
            ] {
                if value != default {
                    e.set_attr(name, fmt_f64(value));
                }
            }
            e
        }
        Symbol::Text(s) => {
            let mut e = XamlElement::new("esri:TextSymbol")
                .with_attr("Text", &s.text)
                .with_attr("Foreground", color_str(&s.foreground));
            set_opt(&mut e, "FontFamily", s.font_family.as_deref());
            if s.font_size != TextSymbol::DEFAULT_FONT_SIZE {
                e.set_attr("FontSize", fmt_f64(s.font_size));
            }
            e
        }
        Symbol::Runtime { type_name } => {
            return Err(XamlError::UnserializableSymbol {
                type_name: type_name.clone(),
            });
        }
    };
    Ok(element)
}

pub fn read_symbol(element: &XamlElement) -> XamlResult<Symbol> {
    let color = |name: &str, fallback: Color| -> XamlResult<Color> {
        match element.attr(name) {
            Some(v) => Color::parse(v).ok_or_else(|| XamlError::invalid_attribute(&element.name, name, v)),
            None => Ok(fallback),
        }
    };
    let symbol = match element.local_name() {
        "SimpleMarkerSymbol" => {
            let defaults = SimpleMarkerSymbol::default();
            Symbol::SimpleMarker(SimpleMarkerSymbol {
                color: color("Color", defaults.color)?,
                size: element.attr_f64("Size")?.unwrap_or(defaults.size),
                style: match element.attr("Style") {
                    Some(v) => MarkerStyle::from_name(v)
                        .ok_or_else(|| XamlError::invalid_attribute(&element.name, "Style", v))?,
                    None => defaults.style,
                },
            })
        }
        "SimpleLineSymbol" => {
            let defaults = SimpleLineSymbol::default();
            Symbol::SimpleLine(SimpleLineSymbol {
                color: color("Color", defaults.color)?,
                width: element.attr_f64("Width")?.unwrap_or(defaults.width),
                style: match element.attr("Style") {
                    Some(v) => LineStyle::from_name(v)
                        .ok_or_else(|| XamlError::invalid_attribute(&element.name, "Style", v))?,
                    None => defaults.style,
                },
            })
        }
        "SimpleFillSymbol" => {
            let defaults = SimpleFillSymbol::default();
            Symbol::SimpleFill(SimpleFillSymbol {
                fill: color("Fill", defaults.fill)?,
                border_brush: match element.attr("BorderBrush") {
                    Some(_) => Some(color("BorderBrush", Color::BLACK)?),
                    None => None,
                },
                border_thickness: element.attr_f64("BorderThickness")?.unwrap_or(defaults.border_thickness),
            })
        }
        "PictureMarkerSymbol" => Symbol::PictureMarker(PictureMarkerSymbol {
            source: element.attr("Source").unwrap_or_default().to_string(),
            width: element.attr_f64("Width")?.unwrap_or(0.0),
            height: element.attr_f64("Height")?.unwrap_or(0.0),
            offset_x: element.attr_f64("OffsetX")?.unwrap_or(0.0),
            offset_y: element.attr_f64("OffsetY")?.unwrap_or(0.0),
            opacity: element.attr_f64("Opacity")?.unwrap_or(1.0),
        }),
        "TextSymbol" => {
            let defaults = TextSymbol::default();
            Symbol::Text(TextSymbol {
                text: element.attr("Text").unwrap_or_default().to_string(),
                font_family: element.attr("FontFamily").map(str::to_string),
                font_size: element.attr_f64("FontSize")?.unwrap_or(defaults.font_size),
                foreground: color("Foreground", defaults.foreground)?,
            })
        }
        other => Symbol::Runtime {
            type_name: other.to_string(),
        },
    };
    Ok(symbol)
}

fn read_property_symbol(owner: &XamlElement, property: &str) -> XamlResult<Option<Symbol>> {
    let name = format!("{}.{property}", owner.name);
    owner
        .child(&name)
        .and_then(XamlElement::first_element)
        .map(read_symbol)
        .transpose()
}

fn property(owner: &str, property: &str, value: XamlElement) -> XamlElement {
    XamlElement::new(format!("{owner}.{property}")).with_child(value)
}

fn set_opt(element: &mut XamlElement, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        element.set_attr(name, value);
    }
}
