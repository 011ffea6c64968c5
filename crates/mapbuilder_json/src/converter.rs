use crate::errors::{JsonError, JsonResult};
use crate::serializer::JavaScriptSerializer;
use crate::value::{JsonObject, JsonValue};
use chrono::{DateTime, Utc};

/// Maps between the `__type` ids found in documents and type names known to
/// registered converters.
pub trait TypeResolver {
    fn resolve_type(&self, id: &str) -> Option<String>;
    fn resolve_type_id(&self, type_name: &str) -> Option<String>;
}

/// Uses the type name itself as the id.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTypeResolver;

impl TypeResolver for SimpleTypeResolver {
    fn resolve_type(&self, id: &str) -> Option<String> {
        if id.is_empty() { None } else { Some(id.to_string()) }
    }

    fn resolve_type_id(&self, type_name: &str) -> Option<String> {
        Some(type_name.to_string())
    }
}

/// Per-type hook for dictionaries tagged with `__type`.
pub trait JavaScriptConverter {
    fn supported_types(&self) -> &[&str];

    fn deserialize(
        &self,
        object: JsonObject,
        type_name: &str,
        serializer: &JavaScriptSerializer,
    ) -> JsonResult<JsonValue>;

    /// Optional reverse hook used when serializing a tagged dictionary.
    fn serialize(&self, _object: &JsonObject, _serializer: &JavaScriptSerializer) -> Option<JsonObject> {
        None
    }
}

pub struct ObjectConverter;

impl ObjectConverter {
    pub const TYPE_KEY: &'static str = "__type";

    /// Routes a `__type`-tagged dictionary to its converter. Anything without
    /// a matching converter is returned unchanged; there is no reflective
    /// re-hydration.
    pub fn convert_object_to_type(value: JsonValue, serializer: &JavaScriptSerializer) -> JsonResult<JsonValue> {
        let JsonValue::Object(object) = value else {
            return Ok(value);
        };
        let Some(type_name) = Self::type_name_of(&object, serializer) else {
            return Ok(JsonValue::Object(object));
        };
        match serializer.converter_for(&type_name) {
            Some(converter) => converter.deserialize(object, &type_name, serializer),
            None => Ok(JsonValue::Object(object)),
        }
    }

    pub fn type_name_of(object: &JsonObject, serializer: &JavaScriptSerializer) -> Option<String> {
        let id = object.get(Self::TYPE_KEY)?.as_str()?;
        serializer.type_resolver().resolve_type(id)
    }
}

/// Typed extraction from a deserialized value.
pub trait FromJsonValue: Sized {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self>;
}

fn mismatch(expected: &'static str, value: &JsonValue) -> JsonError {
    JsonError::Conversion {
        expected,
        found: value.kind_name(),
    }
}

impl FromJsonValue for JsonValue {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        Ok(value.clone())
    }
}

impl FromJsonValue for bool {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromJsonValue for String {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        value.as_str().map(str::to_string).ok_or_else(|| mismatch("string", value))
    }
}

impl FromJsonValue for f64 {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        value.as_f64().ok_or_else(|| mismatch("number", value))
    }
}

impl FromJsonValue for i64 {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        value.as_i64().ok_or_else(|| mismatch("integer", value))
    }
}

impl FromJsonValue for i32 {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| mismatch("int32", value))
    }
}

impl FromJsonValue for DateTime<Utc> {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        match value {
            JsonValue::Date(d) => Ok(*d),
            _ => Err(mismatch("date", value)),
        }
    }
}

impl FromJsonValue for JsonObject {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        value.as_object().cloned().ok_or_else(|| mismatch("object", value))
    }
}

impl<T: FromJsonValue> FromJsonValue for Option<T> {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        match value {
            JsonValue::Null => Ok(None),
            other => T::from_json_value(other).map(Some),
        }
    }
}

impl<T: FromJsonValue> FromJsonValue for Vec<T> {
    fn from_json_value(value: &JsonValue) -> JsonResult<Self> {
        value
            .as_array()
            .ok_or_else(|| mismatch("array", value))?
            .iter()
            .map(T::from_json_value)
            .collect()
    }
}
