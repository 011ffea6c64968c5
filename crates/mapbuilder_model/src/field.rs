use serde::{Deserialize, Serialize};

/// How a layer field is displayed in attribute views and popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldType {
    #[default]
    Text,
    Integer,
    DecimalNumber,
    Currency,
    DateTime,
    Boolean,
    Hyperlink,
    Image,
    Attachment,
    /// Coded-value domain or subtype lookup.
    Entity,
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "Text",
            FieldType::Integer => "Integer",
            FieldType::DecimalNumber => "DecimalNumber",
            FieldType::Currency => "Currency",
            FieldType::DateTime => "DateTime",
            FieldType::Boolean => "Boolean",
            FieldType::Hyperlink => "Hyperlink",
            FieldType::Image => "Image",
            FieldType::Attachment => "Attachment",
            FieldType::Entity => "Entity",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "integer" => Some(FieldType::Integer),
            "decimalnumber" => Some(FieldType::DecimalNumber),
            "currency" => Some(FieldType::Currency),
            "datetime" => Some(FieldType::DateTime),
            "boolean" => Some(FieldType::Boolean),
            "hyperlink" => Some(FieldType::Hyperlink),
            "image" => Some(FieldType::Image),
            "attachment" => Some(FieldType::Attachment),
            "entity" => Some(FieldType::Entity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldInfo {
    pub name: String,
    pub display_name: Option<String>,
    pub field_type: FieldType,
    pub visible_in_attribute_display: bool,
    pub visible_on_map_tip: bool,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            ..Default::default()
        }
    }

    pub fn display_name_or_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

impl Default for FieldInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: None,
            field_type: FieldType::Text,
            visible_in_attribute_display: true,
            visible_on_map_tip: true,
        }
    }
}

/// Per-sublayer information kept for map services (popups, display field,
/// field metadata).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerInformation {
    pub id: i32,
    pub name: String,
    pub popups_enabled: bool,
    pub display_field: Option<String>,
    pub fields: Vec<FieldInfo>,
}
