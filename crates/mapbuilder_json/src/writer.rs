use crate::errors::{JsonError, JsonResult};
use crate::number::JsonNumber;
use crate::value::JsonValue;
use chrono::{DateTime, Utc};
use std::fmt::{Display, Write};

/// .NET ticks (100ns intervals since 0001-01-01) at the Unix epoch.
const UNIX_EPOCH_TICKS: i128 = 621_355_968_000_000_000;

/// Forward-only JSON emitter.
///
/// Nesting is tracked with plain object/array counters, not a stack: an
/// `end_object` is only rejected when no object is open at all, so a
/// sequence such as `start_object, start_array, end_object, end_array`
/// is accepted.
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    out: String,
    pretty: bool,
    indent_unit: String,
    indent: String,
    object_count: usize,
    array_count: usize,
    null_as_empty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(indent_unit: impl Into<String>) -> Self {
        Self {
            pretty: true,
            indent_unit: indent_unit.into(),
            ..Self::default()
        }
    }

    /// Write `null` values as `""`.
    pub fn with_null_as_empty(mut self, null_as_empty: bool) -> Self {
        self.null_as_empty = null_as_empty;
        self
    }

    fn structural_break(&mut self) {
        if self.pretty && !self.out.is_empty() {
            self.out.push('\n');
            self.out.push_str(&self.indent);
        }
    }

    fn push_indent(&mut self) {
        self.indent.push_str(&self.indent_unit);
    }

    fn pop_indent(&mut self) {
        let len = self.indent.len().saturating_sub(self.indent_unit.len());
        self.indent.truncate(len);
    }

    pub fn start_object(&mut self) {
        self.structural_break();
        self.out.push('{');
        self.object_count += 1;
        self.push_indent();
    }

    pub fn end_object(&mut self) -> JsonResult<()> {
        if self.object_count == 0 {
            return Err(JsonError::UnbalancedWriter { token: "EndObject" });
        }
        self.object_count -= 1;
        self.pop_indent();
        self.structural_break();
        self.out.push('}');
        Ok(())
    }

    pub fn start_array(&mut self) {
        self.structural_break();
        self.out.push('[');
        self.array_count += 1;
        self.push_indent();
    }

    pub fn end_array(&mut self) -> JsonResult<()> {
        if self.array_count == 0 {
            return Err(JsonError::UnbalancedWriter { token: "EndArray" });
        }
        self.array_count -= 1;
        self.pop_indent();
        self.structural_break();
        self.out.push(']');
        Ok(())
    }

    pub fn start_property(&mut self, name: &str) {
        self.structural_break();
        escape_into(name, &mut self.out);
        self.out.push(':');
        if self.pretty {
            self.out.push(' ');
        }
    }

    pub fn write_property(&mut self, name: &str, value: &JsonValue) -> JsonResult<()> {
        self.start_property(name);
        self.write_value(value)
    }

    /// Like [`write_property`](Self::write_property) but prefixed with the separating comma.
    pub fn append_property(&mut self, name: &str, value: &JsonValue) -> JsonResult<()> {
        self.append_separator();
        self.write_property(name, value)
    }

    pub fn append_separator(&mut self) {
        self.out.push(',');
    }

    pub fn write_value(&mut self, value: &JsonValue) -> JsonResult<()> {
        match value {
            JsonValue::Null => {
                self.out.push_str(if self.null_as_empty { "\"\"" } else { "null" });
            }
            JsonValue::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            JsonValue::Number(n) => self.write_number(n)?,
            JsonValue::String(s) => escape_into(s, &mut self.out),
            JsonValue::Date(d) => self.write_date_ticks(d),
            JsonValue::Array(items) => {
                self.start_array();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.append_separator();
                    }
                    self.write_value(item)?;
                }
                self.end_array()?;
            }
            JsonValue::Object(object) => {
                self.start_object();
                for (i, (key, item)) in object.iter().enumerate() {
                    if i > 0 {
                        self.append_separator();
                    }
                    self.write_property(key, item)?;
                }
                self.end_object()?;
            }
        }
        Ok(())
    }

    pub fn write_number(&mut self, n: &JsonNumber) -> JsonResult<()> {
        if !n.is_finite() {
            return Err(JsonError::NonFiniteNumber);
        }
        let _ = write!(self.out, "{n}");
        Ok(())
    }

    pub fn write_f64(&mut self, v: f64) -> JsonResult<()> {
        self.write_number(&JsonNumber::Double(v))
    }

    fn write_date_ticks(&mut self, d: &DateTime<Utc>) {
        let ticks = d.timestamp() as i128 * 10_000_000 + (d.timestamp_subsec_nanos() / 100) as i128 + UNIX_EPOCH_TICKS;
        let _ = write!(self.out, "{ticks}");
    }

    /// Writes any displayable value as a quoted, escaped string.
    pub fn write_display(&mut self, value: impl Display) {
        escape_into(&value.to_string(), &mut self.out);
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

fn escape_into(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
