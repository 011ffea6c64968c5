use crate::converter::ObjectConverter;
use crate::errors::{JsonError, JsonResult};
use crate::number::JsonNumber;
use crate::scanner::JsonScanner;
use crate::serializer::JavaScriptSerializer;
use crate::value::{JsonObject, JsonValue};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

const DATE_TIME_PREFIX: &str = "\"\\/Date(";

static DATE_TIME_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"\\/Date\((?P<ticks>-?[0-9]+)(?:[a-zA-Z]|(?:\+|-)[0-9]{4})?\)\\/""#)
        .expect("date literal pattern is valid")
});

/// Single-pass recursive-descent reader producing [`JsonValue`]s.
pub struct JsonDeserializer<'a, 's> {
    scanner: JsonScanner<'a>,
    depth_limit: usize,
    serializer: &'s JavaScriptSerializer,
}

impl<'a, 's> JsonDeserializer<'a, 's> {
    pub fn new(input: &'a str, serializer: &'s JavaScriptSerializer) -> Self {
        Self {
            scanner: JsonScanner::new(input),
            depth_limit: serializer.recursion_limit(),
            serializer,
        }
    }

    /// Parses one complete document. Trailing non-whitespace is an error.
    pub fn deserialize(mut self) -> JsonResult<JsonValue> {
        if self.scanner.rest().trim().is_empty() {
            return Err(JsonError::EmptyInput);
        }
        let value = self.deserialize_internal(0)?;
        if self.scanner.next_non_empty_char().is_some() {
            return Err(self.error("Invalid JSON primitive after end of value"));
        }
        Ok(value)
    }

    fn error(&self, message: &str) -> JsonError {
        JsonError::format(message, self.scanner.position())
    }

    fn deserialize_internal(&mut self, depth: usize) -> JsonResult<JsonValue> {
        let depth = depth + 1;
        if depth > self.depth_limit {
            return Err(JsonError::DepthLimitExceeded { limit: self.depth_limit });
        }

        let Some(c) = self.scanner.next_non_empty_char() else {
            return Err(self.error("Unexpected end of input"));
        };
        self.scanner.move_prev();

        if self.is_next_element_date_time() {
            if let Some(date) = self.deserialize_string_into_date_time()? {
                return Ok(date);
            }
        }

        match c {
            '{' => {
                let dict = self.deserialize_dictionary(depth)?;
                if dict.contains_key(ObjectConverter::TYPE_KEY) {
                    return ObjectConverter::convert_object_to_type(JsonValue::Object(dict), self.serializer);
                }
                Ok(JsonValue::Object(dict))
            }
            '[' => Ok(JsonValue::Array(self.deserialize_list(depth)?)),
            '"' | '\'' => Ok(JsonValue::String(self.deserialize_string()?)),
            _ => self.deserialize_primitive_object(),
        }
    }

    fn deserialize_list(&mut self, depth: usize) -> JsonResult<Vec<JsonValue>> {
        let mut list = Vec::new();
        if self.scanner.move_next() != Some('[') {
            return Err(self.error("Invalid array start"));
        }

        let mut expect_more = false;
        let mut c = self.scanner.next_non_empty_char();
        while let Some(ch) = c {
            if ch == ']' {
                break;
            }
            self.scanner.move_prev();
            list.push(self.deserialize_internal(depth)?);
            expect_more = false;

            c = self.scanner.next_non_empty_char();
            if c == Some(']') {
                break;
            }
            expect_more = true;
            if c != Some(',') {
                return Err(self.error("Invalid array, expected ','"));
            }
            c = self.scanner.next_non_empty_char();
        }

        if expect_more {
            return Err(self.error("Invalid array, extra ','"));
        }
        if c != Some(']') {
            return Err(self.error("Invalid array, expected ']'"));
        }
        Ok(list)
    }

    fn deserialize_dictionary(&mut self, depth: usize) -> JsonResult<JsonObject> {
        let mut dict = JsonObject::new();
        if self.scanner.move_next() != Some('{') {
            return Err(self.error("Invalid object start"));
        }

        let mut c = self.scanner.next_non_empty_char();
        if c == Some('}') {
            return Ok(dict);
        }

        while let Some(ch) = c {
            self.scanner.move_prev();
            if ch == ':' {
                return Err(self.error("Invalid object member name"));
            }

            let member_name = self.deserialize_member_name()?;
            if member_name.is_empty() {
                return Err(self.error("Invalid object member name"));
            }
            if self.scanner.next_non_empty_char() != Some(':') {
                return Err(self.error("Invalid object, expected ':'"));
            }

            let value = self.deserialize_internal(depth)?;
            dict.insert(member_name, value);

            c = self.scanner.next_non_empty_char();
            if c == Some('}') {
                break;
            }
            if c != Some(',') {
                return Err(self.error("Invalid object, expected ',' or '}'"));
            }
            c = self.scanner.next_non_empty_char();
            if c == Some('}') {
                return Err(self.error("Invalid object, extra ','"));
            }
        }

        if c != Some('}') {
            return Err(self.error("Invalid object, expected '}'"));
        }
        Ok(dict)
    }

    fn deserialize_member_name(&mut self) -> JsonResult<String> {
        let Some(c) = self.scanner.next_non_empty_char() else {
            return Err(self.error("Unexpected end of input"));
        };
        self.scanner.move_prev();
        if c == '"' || c == '\'' {
            return self.deserialize_string();
        }

        let token = self.deserialize_primitive_token();
        let valid = token
            .chars()
            .next()
            .is_some_and(|first| first.is_alphabetic() || first == '_' || first == '$')
            && token.chars().all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$');
        if !valid {
            return Err(self.error("Invalid object member name"));
        }
        Ok(token)
    }

    fn deserialize_primitive_object(&mut self) -> JsonResult<JsonValue> {
        let start = self.scanner.position();
        let token = self.deserialize_primitive_token();
        match token.as_str() {
            "null" => return Ok(JsonValue::Null),
            "true" => return Ok(JsonValue::Bool(true)),
            "false" => return Ok(JsonValue::Bool(false)),
            _ => {}
        }
        match JsonNumber::parse(&token) {
            Some(number) => Ok(JsonValue::Number(number)),
            None => Err(JsonError::format(format!("Invalid JSON primitive: {token}"), start)),
        }
    }

    fn deserialize_primitive_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.scanner.move_next() {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' || c == '+' {
                token.push(c);
            } else {
                self.scanner.move_prev();
                break;
            }
        }
        token
    }

    fn deserialize_string(&mut self) -> JsonResult<String> {
        let Some(quote) = self.scanner.move_next() else {
            return Err(self.error("Unterminated string"));
        };

        let mut out = String::new();
        let mut escaped = false;
        loop {
            let Some(c) = self.scanner.move_next() else {
                return Err(self.error("Unterminated string"));
            };
            if escaped {
                self.append_escaped(&mut out, c)?;
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                return Ok(out);
            } else {
                out.push(c);
            }
        }
    }

    fn append_escaped(&mut self, out: &mut String, c: char) -> JsonResult<()> {
        match c {
            '"' | '\'' | '/' | '\\' => out.push(c),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let hex = self
                    .scanner
                    .move_next_n(4)
                    .ok_or_else(|| self.error("Bad \\u escape"))?;
                let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("Bad \\u escape"))?;
                out.push(self.decode_utf16_unit(code)?);
            }
            _ => return Err(self.error("Bad JSON escape sequence")),
        }
        Ok(())
    }

    /// Joins surrogate pairs written as two consecutive `\uXXXX` escapes.
    fn decode_utf16_unit(&mut self, code: u32) -> JsonResult<char> {
        if (0xD800..0xDC00).contains(&code) {
            let checkpoint = self.scanner.clone();
            if self.scanner.move_next_n(2) == Some("\\u") {
                if let Some(low) = self.scanner.move_next_n(4).and_then(|h| u32::from_str_radix(h, 16).ok()) {
                    if (0xDC00..0xE000).contains(&low) {
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        return char::from_u32(combined).ok_or_else(|| self.error("Bad \\u escape"));
                    }
                }
            }
            self.scanner = checkpoint;
            return Ok(char::REPLACEMENT_CHARACTER);
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn is_next_element_date_time(&self) -> bool {
        self.scanner.rest().starts_with(DATE_TIME_PREFIX)
    }

    fn deserialize_string_into_date_time(&mut self) -> JsonResult<Option<JsonValue>> {
        let rest = self.scanner.rest();
        let Some(caps) = DATE_TIME_LITERAL.captures(rest) else {
            return Ok(None);
        };
        let Ok(millis) = caps["ticks"].parse::<i64>() else {
            return Ok(None);
        };
        let Some(date) = DateTime::<Utc>::from_timestamp_millis(millis) else {
            return Ok(None);
        };
        let matched = caps.get(0).map_or(0, |m| m.len());
        self.scanner.advance(matched);
        Ok(Some(JsonValue::Date(date)))
    }
}
