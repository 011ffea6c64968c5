use crate::converter::{FromJsonValue, JavaScriptConverter, ObjectConverter, SimpleTypeResolver, TypeResolver};
use crate::deserializer::JsonDeserializer;
use crate::errors::{JsonError, JsonResult};
use crate::value::{JsonObject, JsonValue};
use std::fmt::Write;

pub const DEFAULT_RECURSION_LIMIT: usize = 100;

/// Entry point for reading and writing JSON text, holding the recursion
/// limit, the type resolver and the registered converters.
pub struct JavaScriptSerializer {
    recursion_limit: usize,
    type_resolver: Box<dyn TypeResolver>,
    converters: Vec<Box<dyn JavaScriptConverter>>,
}

impl Default for JavaScriptSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JavaScriptSerializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaScriptSerializer")
            .field("recursion_limit", &self.recursion_limit)
            .field("converters", &self.converters.len())
            .finish()
    }
}

impl JavaScriptSerializer {
    pub fn new() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            type_resolver: Box::new(SimpleTypeResolver),
            converters: Vec::new(),
        }
    }

    pub fn with_type_resolver(mut self, resolver: impl TypeResolver + 'static) -> Self {
        self.type_resolver = Box::new(resolver);
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    pub fn type_resolver(&self) -> &dyn TypeResolver {
        self.type_resolver.as_ref()
    }

    pub fn register_converter(&mut self, converter: impl JavaScriptConverter + 'static) {
        self.converters.push(Box::new(converter));
    }

    pub fn converter_for(&self, type_name: &str) -> Option<&dyn JavaScriptConverter> {
        self.converters
            .iter()
            .find(|c| c.supported_types().contains(&type_name))
            .map(|c| c.as_ref())
    }

    pub fn deserialize_object(&self, input: &str) -> JsonResult<JsonValue> {
        JsonDeserializer::new(input, self).deserialize()
    }

    pub fn deserialize<T: FromJsonValue>(&self, input: &str) -> JsonResult<T> {
        let value = self.deserialize_object(input)?;
        self.convert_to_type(&value)
    }

    pub fn convert_to_type<T: FromJsonValue>(&self, value: &JsonValue) -> JsonResult<T> {
        T::from_json_value(value)
    }

    /// Compact serialization; dates use the `"\/Date(ms)\/"` literal.
    pub fn serialize(&self, value: &JsonValue) -> JsonResult<String> {
        let mut out = String::new();
        self.serialize_value(value, &mut out, 0)?;
        Ok(out)
    }

    fn serialize_value(&self, value: &JsonValue, out: &mut String, depth: usize) -> JsonResult<()> {
        let depth = depth + 1;
        if depth > self.recursion_limit {
            return Err(JsonError::DepthLimitExceeded { limit: self.recursion_limit });
        }
        match value {
            JsonValue::Null => out.push_str("null"),
            JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            JsonValue::Number(n) => {
                let _ = write!(out, "{n}");
            }
            JsonValue::String(s) => quote_string(s, out),
            JsonValue::Date(d) => {
                let _ = write!(out, "\"\\/Date({})\\/\"", d.timestamp_millis());
            }
            JsonValue::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.serialize_value(item, out, depth)?;
                }
                out.push(']');
            }
            JsonValue::Object(object) => {
                let converted = ObjectConverter::type_name_of(object, self)
                    .and_then(|name| self.converter_for(&name))
                    .and_then(|c| c.serialize(object, self));
                self.serialize_object(converted.as_ref().unwrap_or(object), out, depth)?;
            }
        }
        Ok(())
    }

    fn serialize_object(&self, object: &JsonObject, out: &mut String, depth: usize) -> JsonResult<()> {
        out.push('{');
        for (i, (key, value)) in object.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            quote_string(key, out);
            out.push(':');
            self.serialize_value(value, out, depth)?;
        }
        out.push('}');
        Ok(())
    }
}

/// Quotes a string the way browser-safe JSON expects: HTML-significant
/// characters and control characters become `\uXXXX`.
pub fn quote_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\'' | '<' | '>' | '&' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
