//! Inline graphics datasets, stored as a JSON array of features inside the
//! layer element.

use crate::errors::{XamlError, XamlResult};
use mapbuilder_json::{JavaScriptSerializer, JsonObject, JsonValue, JsonWriter};
use mapbuilder_model::{
    Color, Geometry, LineStyle, MapPoint, MarkerStyle, Path, PersistedGraphic, PictureMarkerSymbol,
    SimpleFillSymbol, SimpleLineSymbol, SimpleMarkerSymbol, SpatialReference, Symbol, TextSymbol,
};

pub fn write_graphics_dataset(graphics: &[PersistedGraphic]) -> XamlResult<String> {
    let mut writer = JsonWriter::new();
    writer.start_array();
    for (i, graphic) in graphics.iter().enumerate() {
        if i > 0 {
            writer.append_separator();
        }
        write_graphic(&mut writer, graphic)?;
    }
    writer.end_array()?;
    Ok(writer.into_string())
}

fn write_graphic(writer: &mut JsonWriter, graphic: &PersistedGraphic) -> XamlResult<()> {
    writer.start_object();
    if let Some(geometry) = &graphic.geometry {
        writer.write_property("geometry", &geometry_json(geometry, graphic.spatial_reference.as_ref()))?;
        writer.append_separator();
    }
    writer.write_property("attributes", &JsonValue::Object(graphic.attributes.clone()))?;
    if let Some(symbol) = &graphic.symbol {
        writer.append_property("symbol", &symbol_json(symbol)?)?;
    }
    writer.end_object()?;
    Ok(())
}

fn coords(points: &[[f64; 2]]) -> JsonValue {
    JsonValue::Array(
        points
            .iter()
            .map(|[x, y]| JsonValue::Array(vec![(*x).into(), (*y).into()]))
            .collect(),
    )
}

fn paths(paths: &[Path]) -> JsonValue {
    JsonValue::Array(paths.iter().map(|p| coords(p)).collect())
}

fn geometry_json(geometry: &Geometry, spatial_reference: Option<&SpatialReference>) -> JsonValue {
    let mut object = JsonObject::new();
    match geometry {
        Geometry::Point(p) => {
            object.insert("x", p.x);
            object.insert("y", p.y);
        }
        Geometry::MultiPoint { points } => {
            object.insert("points", coords(points));
        }
        Geometry::Polyline { paths: p } => {
            object.insert("paths", paths(p));
        }
        Geometry::Polygon { rings } => {
            object.insert("rings", paths(rings));
        }
        Geometry::Envelope { xmin, ymin, xmax, ymax } => {
            object.insert("xmin", *xmin);
            object.insert("ymin", *ymin);
            object.insert("xmax", *xmax);
            object.insert("ymax", *ymax);
        }
    }
    if let Some(sr) = spatial_reference {
        let mut sr_object = JsonObject::new();
        if let Some(wkid) = sr.wkid {
            sr_object.insert("wkid", wkid);
        }
        if let Some(wkt) = &sr.wkt {
            sr_object.insert("wkt", wkt.as_str());
        }
        object.insert("spatialReference", sr_object);
    }
    JsonValue::Object(object)
}

fn color_json(color: &Color) -> JsonValue {
    JsonValue::Array(color.to_rgba_array().iter().map(|c| JsonValue::from(*c as i32)).collect())
}

fn symbol_json(symbol: &Symbol) -> XamlResult<JsonValue> {
    let mut o = JsonObject::new();
    match symbol {
        Symbol::SimpleMarker(s) => {
            o.insert("type", "esriSMS");
            o.insert("style", format!("esriSMS{}", s.style.as_str()));
            o.insert("color", color_json(&s.color));
            o.insert("size", s.size);
        }
        Symbol::SimpleLine(s) => {
            o.insert("type", "esriSLS");
            o.insert("style", format!("esriSLS{}", s.style.as_str()));
            o.insert("color", color_json(&s.color));
            o.insert("width", s.width);
        }
        Symbol::SimpleFill(s) => {
            o.insert("type", "esriSFS");
            o.insert("style", "esriSFSSolid");
            o.insert("color", color_json(&s.fill));
            if let Some(border) = &s.border_brush {
                let mut outline = JsonObject::new();
                outline.insert("type", "esriSLS");
                outline.insert("style", "esriSLSSolid");
                outline.insert("color", color_json(border));
                outline.insert("width", s.border_thickness);
                o.insert("outline", outline);
            }
        }
        Symbol::PictureMarker(s) => {
            o.insert("type", "esriPMS");
            o.insert("url", s.source.as_str());
            o.insert("width", s.width);
            o.insert("height", s.height);
            o.insert("xoffset", s.offset_x);
            o.insert("yoffset", s.offset_y);
        }
        Symbol::Text(s) => {
            o.insert("type", "esriTS");
            o.insert("text", s.text.as_str());
            o.insert("color", color_json(&s.foreground));
            let mut font = JsonObject::new();
            if let Some(family) = &s.font_family {
                font.insert("family", family.as_str());
            }
            font.insert("size", s.font_size);
            o.insert("font", font);
        }
        Symbol::Runtime { type_name } => {
            return Err(XamlError::UnserializableSymbol {
                type_name: type_name.clone(),
            });
        }
    }
    Ok(JsonValue::Object(o))
}

pub fn read_graphics_dataset(text: &str, serializer: &JavaScriptSerializer) -> XamlResult<Vec<PersistedGraphic>> {
    let value = serializer.deserialize_object(text)?;
    let items = value.as_array().ok_or_else(|| XamlError::Xml("graphics dataset is not an array".into()))?;
    items.iter().map(read_graphic).collect()
}

fn read_graphic(value: &JsonValue) -> XamlResult<PersistedGraphic> {
    let object = value
        .as_object()
        .ok_or_else(|| XamlError::Xml("graphic is not an object".into()))?;
    let mut graphic = PersistedGraphic::default();
    if let Some(geometry) = object.get("geometry").and_then(JsonValue::as_object) {
        graphic.geometry = read_geometry(geometry);
        graphic.spatial_reference = geometry
            .get("spatialReference")
            .and_then(JsonValue::as_object)
            .map(|sr| SpatialReference {
                wkid: sr.get("wkid").and_then(JsonValue::as_i64).map(|w| w as i32),
                wkt: sr.get("wkt").and_then(JsonValue::as_str).map(str::to_string),
            });
    }
    if let Some(attributes) = object.get("attributes").and_then(JsonValue::as_object) {
        graphic.attributes = attributes.clone();
    }
    graphic.symbol = object
        .get("symbol")
        .and_then(JsonValue::as_object)
        .and_then(read_symbol);
    Ok(graphic)
}

fn read_coords(value: Option<&JsonValue>) -> Vec<[f64; 2]> {
    value
        .and_then(JsonValue::as_array)
        .map(|points| {
            points
                .iter()
                .filter_map(|p| {
                    let p = p.as_array()?;
                    Some([p.first()?.as_f64()?, p.get(1)?.as_f64()?])
                })
                .collect()
        })
        .unwrap_or_default()
}

fn read_paths(value: Option<&JsonValue>) -> Vec<Path> {
    value
        .and_then(JsonValue::as_array)
        .map(|paths| paths.iter().map(|p| read_coords(Some(p))).collect())
        .unwrap_or_default()
}

fn read_geometry(o: &JsonObject) -> Option<Geometry> {
    let num = |key: &str| o.get(key).and_then(JsonValue::as_f64);
    if let (Some(x), Some(y)) = (num("x"), num("y")) {
        return Some(Geometry::Point(MapPoint::new(x, y)));
    }
    if o.contains_key("points") {
        return Some(Geometry::MultiPoint {
            points: read_coords(o.get("points")),
        });
    }
    if o.contains_key("paths") {
        return Some(Geometry::Polyline {
            paths: read_paths(o.get("paths")),
        });
    }
    if o.contains_key("rings") {
        return Some(Geometry::Polygon {
            rings: read_paths(o.get("rings")),
        });
    }
    Some(Geometry::Envelope {
        xmin: num("xmin")?,
        ymin: num("ymin")?,
        xmax: num("xmax")?,
        ymax: num("ymax")?,
    })
}

fn read_color(value: Option<&JsonValue>) -> Option<Color> {
    let parts = value?.as_array()?;
    let byte = |i: usize| parts.get(i).and_then(JsonValue::as_i64).map(|v| v.clamp(0, 255) as u8);
    Some(Color::from_rgba_array([byte(0)?, byte(1)?, byte(2)?, byte(3).unwrap_or(255)]))
}

fn read_symbol(o: &JsonObject) -> Option<Symbol> {
    let num = |key: &str| o.get(key).and_then(JsonValue::as_f64);
    let style = o.get("style").and_then(JsonValue::as_str).unwrap_or_default();
    let symbol = match o.get("type").and_then(JsonValue::as_str)? {
        "esriSMS" => {
            let d = SimpleMarkerSymbol::default();
            Symbol::SimpleMarker(SimpleMarkerSymbol {
                color: read_color(o.get("color")).unwrap_or(d.color),
                size: num("size").unwrap_or(d.size),
                style: style
                    .strip_prefix("esriSMS")
                    .and_then(MarkerStyle::from_name)
                    .unwrap_or(d.style),
            })
        }
        "esriSLS" => {
            let d = SimpleLineSymbol::default();
            Symbol::SimpleLine(SimpleLineSymbol {
                color: read_color(o.get("color")).unwrap_or(d.color),
                width: num("width").unwrap_or(d.width),
                style: style.strip_prefix("esriSLS").and_then(LineStyle::from_name).unwrap_or(d.style),
            })
        }
        "esriSFS" => {
            let d = SimpleFillSymbol::default();
            let outline = o.get("outline").and_then(JsonValue::as_object);
            Symbol::SimpleFill(SimpleFillSymbol {
                fill: read_color(o.get("color")).unwrap_or(d.fill),
                border_brush: outline.and_then(|ol| read_color(ol.get("color"))),
                border_thickness: outline
                    .and_then(|ol| ol.get("width"))
                    .and_then(JsonValue::as_f64)
                    .unwrap_or(d.border_thickness),
            })
        }
        "esriPMS" => Symbol::PictureMarker(PictureMarkerSymbol {
            source: o.get("url").and_then(JsonValue::as_str).unwrap_or_default().to_string(),
            width: num("width").unwrap_or(0.0),
            height: num("height").unwrap_or(0.0),
            offset_x: num("xoffset").unwrap_or(0.0),
            offset_y: num("yoffset").unwrap_or(0.0),
            opacity: 1.0,
        }),
        "esriTS" => {
            let d = TextSymbol::default();
            let font = o.get("font").and_then(JsonValue::as_object);
            Symbol::Text(TextSymbol {
                text: o.get("text").and_then(JsonValue::as_str).unwrap_or_default().to_string(),
                font_family: font
                    .and_then(|f| f.get("family"))
                    .and_then(JsonValue::as_str)
                    .map(str::to_string),
                font_size: font
                    .and_then(|f| f.get("size"))
                    .and_then(JsonValue::as_f64)
                    .unwrap_or(d.font_size),
                foreground: read_color(o.get("color")).unwrap_or(d.foreground),
            })
        }
        _ => return None,
    };
    Some(symbol)
}
