use crate::errors::{PopupError, PopupResult};
use mapbuilder_json::{JavaScriptSerializer, JsonObject, JsonValue};
use std::cell::OnceCell;
use tracing::debug;

/// Largest number of decimal places a popup field is shown with.
pub const MAX_PLACES: u32 = 20;

/// Number and date display settings of a popup field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldFormat {
    /// At most [`MAX_PLACES`].
    pub places: Option<u32>,
    pub digit_separator: bool,
    /// Web map date format name such as `shortDate` or `longMonthDayYear`.
    pub date_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupFieldInfo {
    pub field_name: String,
    pub label: Option<String>,
    pub is_editable: bool,
    pub tooltip: Option<String>,
    pub visible: bool,
    pub format: Option<FieldFormat>,
}

impl PopupFieldInfo {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            label: None,
            is_editable: false,
            tooltip: None,
            visible: true,
            format: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    PieChart,
    BarChart,
    ColumnChart,
    LineChart,
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Image => "image",
            MediaType::PieChart => "piechart",
            MediaType::BarChart => "barchart",
            MediaType::ColumnChart => "columnchart",
            MediaType::LineChart => "linechart",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "image" => Some(MediaType::Image),
            "piechart" => Some(MediaType::PieChart),
            "barchart" => Some(MediaType::BarChart),
            "columnchart" => Some(MediaType::ColumnChart),
            "linechart" => Some(MediaType::LineChart),
            _ => None,
        }
    }

    pub fn is_chart(&self) -> bool {
        !matches!(self, MediaType::Image)
    }
}

/// Type-specific part of a media entry. Charts use `fields` and
/// `normalize_field`, images use the URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaValue {
    pub fields: Vec<String>,
    pub normalize_field: Option<String>,
    pub tooltip_field: Option<String>,
    pub source_url: Option<String>,
    pub link_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub media_type: MediaType,
    pub value: MediaValue,
}

/// How a feature's attributes and media are shown in its info popup.
///
/// Built from a web map `popupInfo` object. The generated DataTemplate is
/// cached after the first [`PopupInfo::get_or_compile`] call.
#[derive(Debug, Clone, Default)]
pub struct PopupInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    /// True when a non-empty description replaces the attribute table.
    pub hide_attributes: bool,
    pub field_infos: Vec<PopupFieldInfo>,
    pub media_infos: Vec<MediaInfo>,
    pub show_attachments: bool,
    pub(crate) template: OnceCell<String>,
}

impl PopupInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str, serializer: &JavaScriptSerializer) -> PopupResult<Self> {
        match serializer.deserialize_object(text)? {
            JsonValue::Object(dict) => Self::from_dictionary(&dict),
            other => Err(PopupError::NotAnObject {
                found: other.kind_name(),
            }),
        }
    }

    pub fn from_dictionary(dict: &JsonObject) -> PopupResult<Self> {
        let description = string_prop(dict, "description")?;
        // An empty description leaves the attribute table in place.
        let hide_attributes = description.as_deref().is_some_and(|d| !d.is_empty());

        let field_infos = objects(dict, "fieldInfos")?
            .into_iter()
            .map(read_field_info)
            .collect::<PopupResult<Vec<_>>>()?;

        let mut media_infos = Vec::new();
        for media in objects(dict, "mediaInfos")? {
            if let Some(info) = read_media_info(media)? {
                media_infos.push(info);
            }
        }

        Ok(PopupInfo {
            title: string_prop(dict, "title")?,
            description,
            hide_attributes,
            field_infos,
            media_infos,
            show_attachments: bool_prop(dict, "showAttachments")?.unwrap_or(false),
            template: OnceCell::new(),
        })
    }

    pub fn field_info(&self, name: &str) -> Option<&PopupFieldInfo> {
        self.field_infos.iter().find(|f| f.field_name.eq_ignore_ascii_case(name))
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &PopupFieldInfo> {
        self.field_infos.iter().filter(|f| f.visible)
    }
}

fn read_field_info(obj: &JsonObject) -> PopupResult<PopupFieldInfo> {
    let format = match obj.get("format") {
        Some(JsonValue::Object(format)) => Some(FieldFormat {
            places: u32_prop(format, "places")?.map(|places| places.min(MAX_PLACES)),
            digit_separator: bool_prop(format, "digitSeparator")?.unwrap_or(false),
            date_format: string_prop(format, "dateFormat")?,
        }),
        None | Some(JsonValue::Null) => None,
        Some(_) => return Err(invalid("format", "object")),
    };
    Ok(PopupFieldInfo {
        field_name: string_prop(obj, "fieldName")?.unwrap_or_default(),
        label: string_prop(obj, "label")?,
        is_editable: bool_prop(obj, "isEditable")?.unwrap_or(false),
        tooltip: string_prop(obj, "tooltip")?,
        visible: bool_prop(obj, "visible")?.unwrap_or(true),
        format,
    })
}

fn read_media_info(obj: &JsonObject) -> PopupResult<Option<MediaInfo>> {
    let type_name = string_prop(obj, "type")?.unwrap_or_default();
    let Some(media_type) = MediaType::from_name(&type_name) else {
        debug!(media_type = %type_name, "skipping unsupported popup media");
        return Ok(None);
    };

    let value = match obj.get("value") {
        Some(JsonValue::Object(value)) => MediaValue {
            fields: strings(value, "fields")?,
            normalize_field: string_prop(value, "normalizeField")?,
            tooltip_field: string_prop(value, "tooltipField")?,
            source_url: string_prop(value, "sourceURL")?,
            link_url: string_prop(value, "linkURL")?,
        },
        None | Some(JsonValue::Null) => MediaValue::default(),
        Some(_) => return Err(invalid("value", "object")),
    };

    Ok(Some(MediaInfo {
        title: string_prop(obj, "title")?,
        caption: string_prop(obj, "caption")?,
        media_type,
        value,
    }))
}

fn invalid(key: &str, expected: &'static str) -> PopupError {
    PopupError::InvalidProperty {
        key: key.to_string(),
        expected,
    }
}

fn string_prop(obj: &JsonObject, key: &str) -> PopupResult<Option<String>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(key, "string")),
    }
}

fn bool_prop(obj: &JsonObject, key: &str) -> PopupResult<Option<bool>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(invalid(key, "boolean")),
    }
}

fn u32_prop(obj: &JsonObject, key: &str) -> PopupResult<Option<u32>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(key, "non-negative integer")),
    }
}

fn objects<'a>(obj: &'a JsonObject, key: &str) -> PopupResult<Vec<&'a JsonObject>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| item.as_object().ok_or_else(|| invalid(key, "array of objects")))
            .collect(),
        Some(_) => Err(invalid(key, "array")),
    }
}

fn strings(obj: &JsonObject, key: &str) -> PopupResult<Vec<String>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(key, "array of strings")))
            .collect(),
        Some(_) => Err(invalid(key, "array")),
    }
}
