//! DataTemplate markup for popups, built by string concatenation.

use crate::info::{FieldFormat, MediaInfo, MediaType, PopupInfo};
use crate::maptips::strip_html;
use mapbuilder_model::{FieldInfo, FieldType, PopupTemplateOverride};
use mapbuilder_xaml::namespaces::{ESRI_MAPPING, PRESENTATION, XAML};
use quick_xml::escape::escape;
use std::cell::OnceCell;
use tracing::debug;

/// Background of every other attribute row.
pub const ALTERNATE_ROW_BACKGROUND: &str = "#FFF2F2F2";

pub const TITLE_CONVERTER: &str = "PopupTitleConverter";
pub const VALUE_CONVERTER: &str = "PopupFieldValueConverter";
pub const ENTITY_CONVERTER: &str = "PopupEntityConverter";

/// How one attribute value is presented, chosen from the layer field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRenderStrategy {
    Attachment,
    Entity,
    Hyperlink,
    Image,
    Text,
}

impl FieldRenderStrategy {
    pub fn for_field_type(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Attachment => FieldRenderStrategy::Attachment,
            FieldType::Entity => FieldRenderStrategy::Entity,
            FieldType::Hyperlink => FieldRenderStrategy::Hyperlink,
            FieldType::Image => FieldRenderStrategy::Image,
            _ => FieldRenderStrategy::Text,
        }
    }
}

struct FieldRow<'a> {
    name: &'a str,
    label: &'a str,
    strategy: FieldRenderStrategy,
    format: Option<&'a FieldFormat>,
}

impl PopupInfo {
    /// Cached template, generated on first use. Later changes to `self` or
    /// to `fields` are not picked up until [`PopupInfo::invalidate_template`].
    pub fn get_or_compile(&self, fields: &[FieldInfo]) -> &str {
        self.template.get_or_init(|| generate_template(self, fields))
    }

    /// Regenerates the template and replaces the cached one.
    pub fn compile(&mut self, fields: &[FieldInfo]) -> &str {
        self.template = OnceCell::new();
        self.get_or_compile(fields)
    }

    pub fn invalidate_template(&mut self) {
        self.template.take();
    }

    pub fn is_compiled(&self) -> bool {
        self.template.get().is_some()
    }

    /// Template entry for a layer's `PopupDataTemplates` extension.
    pub fn template_override(&self, layer_id: i32, fields: &[FieldInfo]) -> PopupTemplateOverride {
        PopupTemplateOverride {
            layer_id,
            template: self.get_or_compile(fields).to_string(),
        }
    }
}

/// Builds the DataTemplate for `info`. `fields` describes the layer and
/// decides each field's render strategy; when the popup lists no fields, the
/// layer fields shown on map tips are used instead.
pub fn generate_template(info: &PopupInfo, fields: &[FieldInfo]) -> String {
    let mut xaml = String::new();
    xaml.push_str(&format!(
        "<DataTemplate xmlns=\"{PRESENTATION}\" xmlns:x=\"{XAML}\" xmlns:esriMapping=\"{}\">",
        escape(ESRI_MAPPING)
    ));
    xaml.push_str("<StackPanel Orientation=\"Vertical\" MaxWidth=\"300\">");

    if let Some(title) = info.title.as_deref().filter(|t| !t.is_empty()) {
        xaml.push_str(&format!(
            "<TextBlock FontWeight=\"Bold\" TextWrapping=\"Wrap\" Margin=\"0,0,0,4\" Text=\"{}\"/>",
            converter_binding("Attributes", TITLE_CONVERTER, title)
        ));
    }

    if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
        xaml.push_str(&format!(
            "<TextBlock TextWrapping=\"Wrap\" Text=\"{}\"/>",
            converter_binding("Attributes", TITLE_CONVERTER, &strip_html(description))
        ));
    }

    if !info.hide_attributes {
        let rows = field_rows(info, fields);
        if !rows.is_empty() {
            write_field_grid(&mut xaml, &rows);
        }
    }

    if !info.media_infos.is_empty() {
        xaml.push_str("<esriMapping:MediaSelector Margin=\"0,4,0,0\">");
        for media in &info.media_infos {
            write_media(&mut xaml, media);
        }
        xaml.push_str("</esriMapping:MediaSelector>");
    }

    if info.show_attachments {
        xaml.push_str("<esriMapping:FeatureAttachments Margin=\"0,4,0,0\"/>");
    }

    xaml.push_str("</StackPanel></DataTemplate>");
    debug!(length = xaml.len(), "popup template generated");
    xaml
}

fn field_rows<'a>(info: &'a PopupInfo, fields: &'a [FieldInfo]) -> Vec<FieldRow<'a>> {
    let layer_field = move |name: &str| fields.iter().find(|f| f.name.eq_ignore_ascii_case(name));

    if info.field_infos.is_empty() {
        return fields
            .iter()
            .filter(|f| f.visible_on_map_tip)
            .map(|f| FieldRow {
                name: &f.name,
                label: f.display_name_or_name(),
                strategy: FieldRenderStrategy::for_field_type(f.field_type),
                format: None,
            })
            .collect();
    }

    info.visible_fields()
        .map(|popup_field| {
            let layer = layer_field(&popup_field.field_name);
            FieldRow {
                name: &popup_field.field_name,
                label: popup_field
                    .label
                    .as_deref()
                    .or_else(|| layer.map(FieldInfo::display_name_or_name))
                    .unwrap_or(&popup_field.field_name),
                strategy: FieldRenderStrategy::for_field_type(layer.map(|f| f.field_type).unwrap_or_default()),
                format: popup_field.format.as_ref(),
            }
        })
        .collect()
}

fn write_field_grid(xaml: &mut String, rows: &[FieldRow<'_>]) {
    xaml.push_str("<Grid>");
    xaml.push_str(
        "<Grid.ColumnDefinitions><ColumnDefinition Width=\"Auto\"/><ColumnDefinition Width=\"*\"/></Grid.ColumnDefinitions>",
    );
    xaml.push_str("<Grid.RowDefinitions>");
    for _ in rows {
        xaml.push_str("<RowDefinition Height=\"Auto\"/>");
    }
    xaml.push_str("</Grid.RowDefinitions>");

    for (index, row) in rows.iter().enumerate() {
        let background = if index % 2 == 1 { ALTERNATE_ROW_BACKGROUND } else { "Transparent" };
        xaml.push_str(&format!(
            "<Border Grid.Row=\"{index}\" Grid.ColumnSpan=\"2\" Background=\"{background}\"/>"
        ));
        xaml.push_str(&format!(
            "<TextBlock Grid.Row=\"{index}\" Grid.Column=\"0\" Margin=\"2,2,8,2\" FontWeight=\"SemiBold\" Text=\"{}\"/>",
            literal(row.label)
        ));
        write_field_value(xaml, index, row);
    }
    xaml.push_str("</Grid>");
}

fn write_field_value(xaml: &mut String, index: usize, row: &FieldRow<'_>) {
    let cell = format!("Grid.Row=\"{index}\" Grid.Column=\"1\" Margin=\"2\"");
    let path = format!("Attributes[{}]", escape(row.name));
    match row.strategy {
        FieldRenderStrategy::Attachment => xaml.push_str(&format!(
            "<esriMapping:AttachmentList {cell} ItemsSource=\"{{Binding {path}}}\"/>"
        )),
        FieldRenderStrategy::Entity => xaml.push_str(&format!(
            "<TextBlock {cell} TextWrapping=\"Wrap\" Text=\"{}\"/>",
            converter_binding(&path, ENTITY_CONVERTER, row.name)
        )),
        FieldRenderStrategy::Hyperlink => xaml.push_str(&format!(
            "<HyperlinkButton {cell} TargetName=\"_blank\" NavigateUri=\"{{Binding {path}}}\" Content=\"{{Binding {path}}}\"/>"
        )),
        FieldRenderStrategy::Image => xaml.push_str(&format!(
            "<Image {cell} Stretch=\"Uniform\" MaxHeight=\"120\" Source=\"{{Binding {path}}}\"/>"
        )),
        FieldRenderStrategy::Text => {
            let parameter = match row.format {
                Some(format) => format!("{}|{}", row.name, format_parameter(format)),
                None => row.name.to_string(),
            };
            xaml.push_str(&format!(
                "<TextBlock {cell} TextWrapping=\"Wrap\" Text=\"{}\"/>",
                converter_binding(&path, VALUE_CONVERTER, &parameter)
            ));
        }
    }
}

/// `places;separator;dateFormat`, read back by the value converter.
fn format_parameter(format: &FieldFormat) -> String {
    format!(
        "{};{};{}",
        format.places.map(|p| p.to_string()).unwrap_or_default(),
        format.digit_separator,
        format.date_format.as_deref().unwrap_or_default()
    )
}

fn write_media(xaml: &mut String, media: &MediaInfo) {
    xaml.push_str(&format!("<esriMapping:MediaItem MediaType=\"{}\"", media.media_type.as_str()));
    if let Some(title) = &media.title {
        xaml.push_str(&format!(" Title=\"{}\"", literal(title)));
    }
    if let Some(caption) = &media.caption {
        xaml.push_str(&format!(" Caption=\"{}\"", literal(caption)));
    }
    xaml.push('>');

    let value = &media.value;
    match media.media_type {
        MediaType::Image => {
            let source = value.source_url.as_deref().unwrap_or_default();
            let image = format!("<Image Stretch=\"Uniform\" Source=\"{}\"/>", literal(source));
            match value.link_url.as_deref().filter(|l| !l.is_empty()) {
                Some(link) => xaml.push_str(&format!(
                    "<HyperlinkButton TargetName=\"_blank\" NavigateUri=\"{}\">{image}</HyperlinkButton>",
                    literal(link)
                )),
                None => xaml.push_str(&image),
            }
        }
        chart => {
            let element = match chart {
                MediaType::PieChart => "PieChart",
                MediaType::BarChart => "BarChart",
                MediaType::ColumnChart => "ColumnChart",
                _ => "LineChart",
            };
            xaml.push_str(&format!(
                "<esriMapping:{element} Height=\"160\" Fields=\"{}\"",
                escape(&value.fields.join(","))
            ));
            if let Some(normalize) = &value.normalize_field {
                xaml.push_str(&format!(" NormalizeField=\"{}\"", escape(normalize.as_str())));
            }
            if let Some(tooltip) = &value.tooltip_field {
                xaml.push_str(&format!(" TooltipField=\"{}\"", escape(tooltip.as_str())));
            }
            xaml.push_str("/>");
        }
    }
    xaml.push_str("</esriMapping:MediaItem>");
}

/// Attribute text taken literally. A leading `{` would otherwise start a
/// markup extension.
fn literal(text: &str) -> String {
    let escaped = escape(text).replace('\n', "&#10;");
    if escaped.starts_with('{') {
        format!("{{}}{escaped}")
    } else {
        escaped
    }
}

/// `{Binding path, Converter={StaticResource key}, ConverterParameter='...'}`
/// with the parameter quoted and XML-escaped.
fn converter_binding(path: &str, converter: &str, parameter: &str) -> String {
    let quoted = parameter.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "{{Binding {path}, Converter={{StaticResource {converter}}}, ConverterParameter='{}'}}",
        escape(quoted.as_str()).replace('\n', "&#10;")
    )
}
