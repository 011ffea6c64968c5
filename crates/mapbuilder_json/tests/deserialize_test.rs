use chrono::{DateTime, Utc};
use mapbuilder_json::{
    JavaScriptConverter, JavaScriptSerializer, JsonError, JsonNumber, JsonObject, JsonResult, JsonValue,
    TypeResolver,
};

fn parse(input: &str) -> JsonResult<JsonValue> {
    JavaScriptSerializer::new().deserialize_object(input)
}

#[test]
fn test_parse_nested_document() {
    let value = parse(r#"{"name": "Cities", "ids": [0, 1, 2], "visible": true, "extent": null}"#).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["name", "ids", "visible", "extent"]);
    assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Cities"));
    assert_eq!(value.get("ids").and_then(|v| v.as_array()).map(|a| a.len()), Some(3));
    assert_eq!(value.get("visible").and_then(|v| v.as_bool()), Some(true));
    assert!(value.get("extent").unwrap().is_null());
}

#[test]
fn test_numeric_narrowing() {
    let value = parse("[1, 2147483648, 0.25, 1e-7, -3]").unwrap();
    let items = value.as_array().unwrap();
    assert!(matches!(items[0], JsonValue::Number(JsonNumber::Int32(1))));
    assert!(matches!(items[1], JsonValue::Number(JsonNumber::Int64(2_147_483_648))));
    assert!(matches!(items[2], JsonValue::Number(JsonNumber::Decimal(_))));
    assert!(matches!(items[3], JsonValue::Number(JsonNumber::Double(_))));
    assert!(matches!(items[4], JsonValue::Number(JsonNumber::Int32(-3))));
}

#[test]
fn test_single_quotes_and_escapes() {
    let value = parse(r#"['it\'s', "tab\tnew\nline", "\u00e9\/", "\ud83d\ude00"]"#).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items[0].as_str(), Some("it's"));
    assert_eq!(items[1].as_str(), Some("tab\tnew\nline"));
    assert_eq!(items[2].as_str(), Some("é/"));
    assert_eq!(items[3].as_str(), Some("😀"));
}

#[test]
fn test_unquoted_member_names() {
    let value = parse("{x: 1, _y: 2}").unwrap();
    assert_eq!(value.get("x").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(value.get("_y").and_then(|v| v.as_i64()), Some(2));
}

#[test]
fn test_duplicate_key_keeps_position() {
    let value = parse(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(obj.get("a").and_then(|v| v.as_i64()), Some(3));
}

#[test]
fn test_date_literal() {
    let value = parse(r#""\/Date(0)\/""#).unwrap();
    let epoch = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
    assert_eq!(value, JsonValue::Date(epoch));

    let serialized = JavaScriptSerializer::new().serialize(&value).unwrap();
    assert_eq!(serialized, r#""\/Date(0)\/""#);

    let with_offset = parse(r#""\/Date(1000+0100)\/""#).unwrap();
    assert_eq!(with_offset, JsonValue::Date(DateTime::<Utc>::from_timestamp(1, 0).unwrap()));
}

#[test]
fn test_unescaped_date_is_plain_string() {
    let value = parse(r#""/Date(0)/""#).unwrap();
    assert_eq!(value.as_str(), Some("/Date(0)/"));
}

#[test]
fn test_format_errors() {
    let cases = [
        "{", "[1,]", "[1 2]", "{\"a\" 1}", "{\"a\":1,}", "\"abc", "\"\\q\"", "tru", "[1] x", "{:1}", "{\"\":1}",
    ];
    for case in cases {
        let err = parse(case).unwrap_err();
        assert!(matches!(err, JsonError::Format { .. }), "{case} -> {err:?}");
    }
}

#[test]
fn test_empty_input_is_distinct() {
    assert_eq!(parse("").unwrap_err(), JsonError::EmptyInput);
    assert_eq!(parse("   \n").unwrap_err(), JsonError::EmptyInput);
}

#[test]
fn test_depth_limit() {
    let ok = format!("{}{}", "[".repeat(100), "]".repeat(100));
    assert!(parse(&ok).is_ok());

    let too_deep = format!("{}{}", "[".repeat(101), "]".repeat(101));
    assert_eq!(parse(&too_deep).unwrap_err(), JsonError::DepthLimitExceeded { limit: 100 });

    let custom = JavaScriptSerializer::new().with_recursion_limit(3);
    assert!(custom.deserialize_object("[[1]]").is_ok());
    assert!(matches!(
        custom.deserialize_object("[[[1]]]"),
        Err(JsonError::DepthLimitExceeded { limit: 3 })
    ));
}

#[test]
fn test_very_deep_input_fails_cleanly() {
    let deep = "[".repeat(50_000);
    assert!(matches!(parse(&deep), Err(JsonError::DepthLimitExceeded { .. })));
}

struct PointConverter;

impl JavaScriptConverter for PointConverter {
    fn supported_types(&self) -> &[&str] {
        &["esriPoint"]
    }

    fn deserialize(&self, object: JsonObject, _type_name: &str, _s: &JavaScriptSerializer) -> JsonResult<JsonValue> {
        let x = object.get("x").and_then(|v| v.as_f64()).unwrap_or_default();
        let y = object.get("y").and_then(|v| v.as_f64()).unwrap_or_default();
        Ok(JsonValue::Array(vec![x.into(), y.into()]))
    }
}

#[test]
fn test_type_hook_uses_registered_converter() {
    let mut serializer = JavaScriptSerializer::new();
    serializer.register_converter(PointConverter);
    let value = serializer
        .deserialize_object(r#"{"pt": {"__type": "esriPoint", "x": 1.5, "y": 2}}"#)
        .unwrap();
    assert_eq!(value.get("pt"), Some(&JsonValue::Array(vec![1.5.into(), 2.0.into()])));
}

#[test]
fn test_type_hook_without_converter_returns_dictionary() {
    let value = parse(r#"{"__type": "Unknown", "a": 1}"#).unwrap();
    assert_eq!(value.get("__type").and_then(|v| v.as_str()), Some("Unknown"));
    assert_eq!(value.get("a").and_then(|v| v.as_i64()), Some(1));
}

struct PrefixResolver;

impl TypeResolver for PrefixResolver {
    fn resolve_type(&self, id: &str) -> Option<String> {
        id.strip_prefix("t:").map(|s| format!("esri{s}"))
    }

    fn resolve_type_id(&self, type_name: &str) -> Option<String> {
        type_name.strip_prefix("esri").map(|s| format!("t:{s}"))
    }
}

#[test]
fn test_custom_type_resolver() {
    let mut serializer = JavaScriptSerializer::new().with_type_resolver(PrefixResolver);
    serializer.register_converter(PointConverter);
    let value = serializer.deserialize_object(r#"{"__type": "t:Point", "x": 3, "y": 4}"#).unwrap();
    assert_eq!(value, JsonValue::Array(vec![3.0.into(), 4.0.into()]));
}

#[test]
fn test_typed_deserialize() {
    let serializer = JavaScriptSerializer::new();
    let ids: Vec<i32> = serializer.deserialize("[1, 2, 3]").unwrap();
    assert_eq!(ids, vec![1, 2, 3]);
    let name: Option<String> = serializer.deserialize("null").unwrap();
    assert_eq!(name, None);
    assert!(matches!(
        serializer.deserialize::<bool>("1"),
        Err(JsonError::Conversion { expected: "bool", found: "number" })
    ));
}

#[test]
fn test_serialize_escapes_and_round_trips() {
    let serializer = JavaScriptSerializer::new();
    let source = r#"{"title":"<b>Parcel</b>","n":[1,2.5,null,false],"q":"say \"hi\""}"#;
    let value = serializer.deserialize_object(source).unwrap();
    let text = serializer.serialize(&value).unwrap();
    assert!(text.contains("\\u003cb\\u003e"));
    assert_eq!(serializer.deserialize_object(&text).unwrap(), value);
}
