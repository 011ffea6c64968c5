use mapbuilder_json::{JavaScriptSerializer, JsonObject, JsonValue};
use mapbuilder_model::{FieldInfo, FieldType};
use mapbuilder_popup::*;
use mapbuilder_xaml::XamlElement;

const WEB_MAP_POPUP: &str = r#"{
    "title": "{NAME}",
    "fieldInfos": [
        {"fieldName": "NAME", "label": "Name", "visible": true},
        {"fieldName": "POP2010", "label": "Population", "visible": true,
         "format": {"places": 0, "digitSeparator": true}},
        {"fieldName": "WEBSITE", "visible": true},
        {"fieldName": "PHOTO", "label": "Photo", "visible": true},
        {"fieldName": "OBJECTID", "visible": false}
    ],
    "mediaInfos": [
        {"title": "Ages", "type": "piechart",
         "value": {"fields": ["AGE_UNDER5", "AGE_5_17"], "normalizeField": "POP2010"}},
        {"title": "Seal", "caption": "City seal", "type": "image",
         "value": {"sourceURL": "http://h/seal.png", "linkURL": "http://h/"}},
        {"type": "hologram"}
    ],
    "showAttachments": true
}"#;

fn parse(json: &str) -> PopupInfo {
    PopupInfo::from_json(json, &JavaScriptSerializer::new()).unwrap()
}

fn layer_fields() -> Vec<FieldInfo> {
    let mut website = FieldInfo::new("WEBSITE", FieldType::Hyperlink);
    website.display_name = Some("Web site".into());
    vec![
        FieldInfo::new("NAME", FieldType::Text),
        FieldInfo::new("POP2010", FieldType::Integer),
        website,
        FieldInfo::new("PHOTO", FieldType::Image),
        FieldInfo::new("OBJECTID", FieldType::Integer),
    ]
}

fn descendants<'a>(element: &'a XamlElement, out: &mut Vec<&'a XamlElement>) {
    for child in element.elements() {
        out.push(child);
        descendants(child, out);
    }
}

fn named<'a>(root: &'a XamlElement, name: &str) -> Vec<&'a XamlElement> {
    let mut all = Vec::new();
    descendants(root, &mut all);
    all.into_iter().filter(|e| e.name == name).collect()
}

#[test]
fn test_hide_attributes_follows_description() {
    assert!(parse(r#"{"description": "x"}"#).hide_attributes);
    assert!(!parse("{}").hide_attributes);
    assert!(!parse(r#"{"description": ""}"#).hide_attributes);
}

#[test]
fn test_from_json_reads_fields_and_media() {
    let info = parse(WEB_MAP_POPUP);
    assert_eq!(info.title.as_deref(), Some("{NAME}"));
    assert_eq!(info.field_infos.len(), 5);
    assert_eq!(info.visible_fields().count(), 4);
    assert_eq!(
        info.field_info("pop2010").and_then(|f| f.format.clone()),
        Some(FieldFormat {
            places: Some(0),
            digit_separator: true,
            date_format: None,
        })
    );
    assert!(info.show_attachments);

    // Unsupported media types are skipped.
    assert_eq!(info.media_infos.len(), 2);
    assert_eq!(info.media_infos[0].media_type, MediaType::PieChart);
    assert_eq!(info.media_infos[0].value.fields, ["AGE_UNDER5", "AGE_5_17"]);
    assert_eq!(info.media_infos[1].value.link_url.as_deref(), Some("http://h/"));
}

#[test]
fn test_from_json_rejects_bad_shapes() {
    let serializer = JavaScriptSerializer::new();
    assert_eq!(
        PopupInfo::from_json("[1, 2]", &serializer).unwrap_err(),
        PopupError::NotAnObject { found: "array" }
    );
    assert!(matches!(
        PopupInfo::from_json(r#"{"title": 5}"#, &serializer).unwrap_err(),
        PopupError::InvalidProperty { key, .. } if key == "title"
    ));
    assert!(matches!(
        PopupInfo::from_json("{", &serializer).unwrap_err(),
        PopupError::Json(_)
    ));
}

#[test]
fn test_template_is_well_formed_with_row_strategies() {
    let info = parse(WEB_MAP_POPUP);
    let template = generate_template(&info, &layer_fields());
    let root = XamlElement::parse(&template).unwrap();
    assert_eq!(root.name, "DataTemplate");

    let borders = named(&root, "Border");
    let backgrounds: Vec<_> = borders.iter().filter_map(|b| b.attr("Background")).collect();
    assert_eq!(
        backgrounds,
        ["Transparent", ALTERNATE_ROW_BACKGROUND, "Transparent", ALTERNATE_ROW_BACKGROUND]
    );

    let hyperlinks = named(&root, "HyperlinkButton");
    assert!(hyperlinks.iter().any(|h| h.attr("NavigateUri") == Some("{Binding Attributes[WEBSITE]}")));
    let images = named(&root, "Image");
    assert!(images.iter().any(|i| i.attr("Source") == Some("{Binding Attributes[PHOTO]}")));

    // Label falls back to the layer display name.
    let labels: Vec<_> = named(&root, "TextBlock")
        .into_iter()
        .filter(|t| t.attr("Grid.Column") == Some("0"))
        .filter_map(|t| t.attr("Text"))
        .collect();
    assert_eq!(labels, ["Name", "Population", "Web site", "Photo"]);

    let pie = named(&root, "esriMapping:PieChart");
    assert_eq!(pie.len(), 1);
    assert_eq!(pie[0].attr("Fields"), Some("AGE_UNDER5,AGE_5_17"));
    assert_eq!(pie[0].attr("NormalizeField"), Some("POP2010"));
    assert_eq!(named(&root, "esriMapping:MediaItem").len(), 2);
    assert_eq!(named(&root, "esriMapping:FeatureAttachments").len(), 1);
    assert!(template.contains("ConverterParameter='POP2010|0;true;'"));
}

#[test]
fn test_description_replaces_attribute_grid() {
    let info = parse(r#"{"title": "Site", "description": "<b>Owner:</b> {OWNER}<br/>Since {YEAR}",
        "fieldInfos": [{"fieldName": "OWNER", "visible": true}]}"#);
    let root = XamlElement::parse(&generate_template(&info, &[])).unwrap();
    assert!(named(&root, "Grid").is_empty());

    let texts: Vec<_> = named(&root, "TextBlock").into_iter().filter_map(|t| t.attr("Text")).collect();
    assert_eq!(texts.len(), 2);
    assert!(texts[1].contains("ConverterParameter='Owner: {OWNER}\nSince {YEAR}'"));
}

#[test]
fn test_empty_description_keeps_attribute_grid() {
    let info = parse(r#"{"description": "", "fieldInfos": [{"fieldName": "OWNER", "visible": true}]}"#);
    let root = XamlElement::parse(&generate_template(&info, &[])).unwrap();
    assert_eq!(named(&root, "Grid").len(), 1);
}

#[test]
fn test_layer_fields_used_without_popup_fields() {
    let mut hidden = FieldInfo::new("SHAPE", FieldType::Text);
    hidden.visible_on_map_tip = false;
    let fields = vec![
        FieldInfo::new("DOCS", FieldType::Attachment),
        FieldInfo::new("ZONE", FieldType::Entity),
        hidden,
    ];
    let root = XamlElement::parse(&generate_template(&PopupInfo::new(), &fields)).unwrap();
    assert_eq!(named(&root, "RowDefinition").len(), 2);
    assert_eq!(
        named(&root, "esriMapping:AttachmentList")[0].attr("ItemsSource"),
        Some("{Binding Attributes[DOCS]}")
    );
    assert!(
        named(&root, "TextBlock")
            .iter()
            .filter_map(|t| t.attr("Text"))
            .any(|text| text.contains(ENTITY_CONVERTER))
    );
}

#[test]
fn test_markup_in_text_is_escaped() {
    let info = parse(r#"{"fieldInfos": [{"fieldName": "A", "label": "<Tom & \"Jerry\">", "visible": true}]}"#);
    let root = XamlElement::parse(&generate_template(&info, &[])).unwrap();
    let label = named(&root, "TextBlock")
        .into_iter()
        .find(|t| t.attr("Grid.Column") == Some("0"))
        .and_then(|t| t.attr("Text").map(str::to_string));
    assert_eq!(label.as_deref(), Some("<Tom & \"Jerry\">"));
}

#[test]
fn test_template_is_memoized_until_invalidated() {
    let mut info = parse(r#"{"title": "First"}"#);
    assert!(!info.is_compiled());
    let first = info.get_or_compile(&[]).to_string();
    assert!(info.is_compiled());

    info.title = Some("Second".into());
    assert_eq!(info.get_or_compile(&[]), first);

    info.invalidate_template();
    assert!(!info.is_compiled());
    assert!(info.get_or_compile(&[]).contains("Second"));

    info.title = Some("Third".into());
    assert!(info.compile(&[]).contains("Third"));

    let entry = info.template_override(3, &[]);
    assert_eq!(entry.layer_id, 3);
    assert!(entry.template.contains("Third"));
}

#[test]
fn test_strip_html() {
    assert_eq!(strip_html("<p>Hello <b>world</b></p><p>Line&nbsp;two &amp; more</p>"), "Hello world\nLine two & more");
    assert_eq!(strip_html("a<br>b<BR />c"), "a\nb\nc");
    assert_eq!(strip_html("plain"), "plain");
}

#[test]
fn test_format_value() {
    let separated = FieldFormat {
        places: Some(2),
        digit_separator: true,
        date_format: None,
    };
    assert_eq!(format_value(&JsonValue::from(1234.5), Some(&separated)), "1,234.50");
    assert_eq!(format_value(&JsonValue::from(1234567), None), "1234567");
    assert_eq!(format_value(&JsonValue::Null, None), "");
    assert_eq!(format_value(&JsonValue::from(true), None), "true");

    let date = FieldFormat {
        date_format: Some("longMonthDayYear".into()),
        ..Default::default()
    };
    let millis = JsonValue::from(1_700_000_000_000_i64);
    assert_eq!(format_value(&millis, Some(&date)), "November 14, 2023");

    let moment = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    assert_eq!(format_value(&JsonValue::Date(moment), None), "11/14/2023");
}

#[test]
fn test_expand_title() {
    let info = parse(r#"{"fieldInfos": [{"fieldName": "POP", "format": {"places": 0, "digitSeparator": true}}]}"#);
    let attributes: JsonObject = [("NAME", JsonValue::from("Springfield")), ("POP", JsonValue::from(30720))]
        .into_iter()
        .collect();
    assert_eq!(
        expand_title("{name} ({POP}) {MISSING}", &attributes, Some(&info)),
        "Springfield (30,720) "
    );
    assert_eq!(expand_title("No tokens", &attributes, None), "No tokens");
}

#[test]
fn test_decimal_places_are_capped() {
    let info = parse(r#"{"fieldInfos": [{"fieldName": "AREA", "format": {"places": 4000000000}}]}"#);
    let format = info.field_info("area").and_then(|f| f.format.as_ref()).unwrap();
    assert_eq!(format.places, Some(MAX_PLACES));

    let attributes: JsonObject = [("AREA", JsonValue::from(1.5))].into_iter().collect();
    assert_eq!(expand_title("{AREA}", &attributes, Some(&info)), "1.50000000000000000000");

    let unchecked = FieldFormat {
        places: Some(u32::MAX),
        ..Default::default()
    };
    assert_eq!(format_value(&JsonValue::from(2), Some(&unchecked)).len(), 2 + MAX_PLACES as usize);
}
