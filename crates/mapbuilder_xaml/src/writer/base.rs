use super::{attr_string, set_opt};
use crate::document::XamlElement;
use crate::errors::{XamlError, XamlResult};
use crate::format::{bool_str, fmt_f64};
use crate::namespaces::ext;
use mapbuilder_model::{
    FieldInfo, FieldType, GeometryType, Layer, LayerExtensions, LayerInformation, PopupTemplateOverride,
};

const FIELD_INFO: &str = "esriMapping:FieldInfo";
const LAYER_INFORMATION: &str = "esriMapping:LayerInformation";
const POPUP_TEMPLATE: &str = "esriMapping:PopupDataTemplate";

/// Identity, visibility and extension attributes, each only when it differs
/// from the toolkit default.
pub fn write_base_attributes(layer: &Layer, element: &mut XamlElement) {
    if !layer.id.is_empty() {
        element.set_attr("ID", &layer.id);
    }
    if !layer.visible {
        element.set_attr("Visible", bool_str(false));
    }
    if layer.opacity < 1.0 {
        element.set_attr("Opacity", fmt_f64(layer.opacity));
    }
    if layer.minimum_resolution > f64::EPSILON {
        element.set_attr("MinimumResolution", fmt_f64(layer.minimum_resolution));
    }
    if layer.maximum_resolution.is_finite() && layer.maximum_resolution < f64::MAX {
        element.set_attr("MaximumResolution", fmt_f64(layer.maximum_resolution));
    }

    let x = &layer.extensions;
    set_opt(element, &ext("DisplayName"), x.display_name.as_deref());
    if x.auto_update_interval > 0.0 {
        element.set_attr(ext("AutoUpdateInterval"), fmt_f64(x.auto_update_interval));
    }
    if x.is_reference_layer {
        element.set_attr(ext("IsReferenceLayer"), bool_str(true));
    }
    if x.is_basemap {
        element.set_attr(ext("IsBaseMapLayer"), bool_str(true));
    }
    if let Some(geometry_type) = x.geometry_type {
        element.set_attr(ext("GeometryType"), geometry_type.as_str());
    }
    set_opt(element, &ext("DisplayField"), x.display_field.as_deref());
    if x.use_popup_from_web_map {
        element.set_attr(ext("UsePopupFromWebMap"), bool_str(true));
    }
}

pub fn write_extension_elements(layer: &Layer, element: &mut XamlElement) {
    let x = &layer.extensions;
    if !x.fields.is_empty() {
        element.push(write_fields(&ext("Fields"), &x.fields));
    }
    if !x.popup_templates.is_empty() {
        let mut templates = XamlElement::new(ext("PopupDataTemplates"));
        for t in &x.popup_templates {
            templates.push(
                XamlElement::new(POPUP_TEMPLATE)
                    .with_attr("LayerId", t.layer_id.to_string())
                    .with_text(&t.template),
            );
        }
        element.push(templates);
    }
    if !x.identify_layer_ids.is_empty() {
        let mut ids = XamlElement::new(ext("IdentifyLayerIds"));
        for id in &x.identify_layer_ids {
            ids.push(XamlElement::new("x:Int32").with_text(id.to_string()));
        }
        element.push(ids);
    }
    if !x.layer_infos.is_empty() {
        let mut infos = XamlElement::new(ext("LayerInfos"));
        for info in &x.layer_infos {
            let mut e = XamlElement::new(LAYER_INFORMATION)
                .with_attr("ID", info.id.to_string())
                .with_attr("Name", &info.name);
            if info.popups_enabled {
                e.set_attr("PopUpsEnabled", bool_str(true));
            }
            set_opt(&mut e, "DisplayField", info.display_field.as_deref());
            if !info.fields.is_empty() {
                e.push(write_fields(&format!("{LAYER_INFORMATION}.Fields"), &info.fields));
            }
            infos.push(e);
        }
        element.push(infos);
    }
}

pub fn write_fields(property: &str, fields: &[FieldInfo]) -> XamlElement {
    let mut list = XamlElement::new(property);
    for field in fields {
        let mut e = XamlElement::new(FIELD_INFO).with_attr("Name", &field.name);
        set_opt(&mut e, "DisplayName", field.display_name.as_deref());
        if field.field_type != FieldType::Text {
            e.set_attr("FieldType", field.field_type.as_str());
        }
        if !field.visible_in_attribute_display {
            e.set_attr("VisibleInAttributeDisplay", bool_str(false));
        }
        if !field.visible_on_map_tip {
            e.set_attr("VisibleOnMapTip", bool_str(false));
        }
        list.push(e);
    }
    list
}

pub fn read_fields(list: &XamlElement) -> XamlResult<Vec<FieldInfo>> {
    list.elements()
        .map(|e| {
            let field_type = match e.attr("FieldType") {
                Some(v) => FieldType::from_name(v).ok_or_else(|| XamlError::invalid_attribute(&e.name, "FieldType", v))?,
                None => FieldType::Text,
            };
            Ok(FieldInfo {
                name: e.attr("Name").unwrap_or_default().to_string(),
                display_name: attr_string(e, "DisplayName"),
                field_type,
                visible_in_attribute_display: e.attr_bool("VisibleInAttributeDisplay")?.unwrap_or(true),
                visible_on_map_tip: e.attr_bool("VisibleOnMapTip")?.unwrap_or(true),
            })
        })
        .collect()
}

/// Reads everything except the kind-specific part into `layer`.
pub fn read_base(element: &XamlElement, layer: &mut Layer) -> XamlResult<()> {
    layer.id = element.attr("ID").unwrap_or_default().to_string();
    layer.visible = element.attr_bool("Visible")?.unwrap_or(true);
    layer.opacity = element.attr_f64("Opacity")?.unwrap_or(1.0);
    layer.minimum_resolution = element.attr_f64("MinimumResolution")?.unwrap_or(0.0);
    layer.maximum_resolution = element.attr_f64("MaximumResolution")?.unwrap_or(f64::MAX);

    let mut x = LayerExtensions {
        display_name: attr_string(element, &ext("DisplayName")),
        auto_update_interval: element.attr_f64(&ext("AutoUpdateInterval"))?.unwrap_or(0.0),
        is_reference_layer: element.attr_bool(&ext("IsReferenceLayer"))?.unwrap_or(false),
        is_basemap: element.attr_bool(&ext("IsBaseMapLayer"))?.unwrap_or(false),
        display_field: attr_string(element, &ext("DisplayField")),
        use_popup_from_web_map: element.attr_bool(&ext("UsePopupFromWebMap"))?.unwrap_or(false),
        ..Default::default()
    };
    let geometry_attr = ext("GeometryType");
    if let Some(v) = element.attr(&geometry_attr) {
        x.geometry_type =
            Some(GeometryType::from_name(v).ok_or_else(|| XamlError::invalid_attribute(&element.name, &geometry_attr, v))?);
    }

    if let Some(list) = element.child(&ext("Fields")) {
        x.fields = read_fields(list)?;
    }
    if let Some(list) = element.child(&ext("PopupDataTemplates")) {
        for t in list.elements() {
            x.popup_templates.push(PopupTemplateOverride {
                layer_id: t.attr_i32("LayerId")?.unwrap_or(0),
                template: t.text(),
            });
        }
    }
    if let Some(list) = element.child(&ext("IdentifyLayerIds")) {
        for id in list.elements() {
            let text = id.text();
            let value = text
                .trim()
                .parse()
                .map_err(|_| XamlError::invalid_attribute(&id.name, "value", &text))?;
            x.identify_layer_ids.push(value);
        }
    }
    if let Some(list) = element.child(&ext("LayerInfos")) {
        for info in list.elements() {
            let fields = match info.child(&format!("{LAYER_INFORMATION}.Fields")) {
                Some(f) => read_fields(f)?,
                None => Vec::new(),
            };
            x.layer_infos.push(LayerInformation {
                id: info.attr_i32("ID")?.unwrap_or(0),
                name: info.attr("Name").unwrap_or_default().to_string(),
                popups_enabled: info.attr_bool("PopUpsEnabled")?.unwrap_or(false),
                display_field: attr_string(info, "DisplayField"),
                fields,
            });
        }
    }
    layer.extensions = x;
    Ok(())
}
