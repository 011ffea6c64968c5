use crate::command::ClassName;
use crate::item::{GroupKind, ToolDescriptor, ToolGroup, ToolItem, ToolPanelItem, find_item, remove_item};
use crate::registry::CommandRegistry;
use mapbuilder_xaml::{XamlElement, XamlNode, document::parse_fragment};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

pub const TOOL: &str = "Tool";
pub const TOOLS: &str = "Tools";
pub const TOOL_CLASS: &str = "Tool.Class";
pub const TOOL_CONFIG_DATA: &str = "Tool.ConfigData";
pub const SEPARATOR: &str = "Separator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &str {
        match self {
            Orientation::Horizontal => "Horizontal",
            Orientation::Vertical => "Vertical",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Horizontal" => Some(Orientation::Horizontal),
            "Vertical" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolPanelWarningKind {
    Instantiate,
    LoadConfiguration,
    SaveConfiguration,
}

/// A tool that failed to load or save. The surrounding panel carries on
/// without it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPanelWarning {
    pub kind: ToolPanelWarningKind,
    pub class_id: String,
    pub message: String,
}

impl fmt::Display for ToolPanelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.kind {
            ToolPanelWarningKind::Instantiate => "could not create",
            ToolPanelWarningKind::LoadConfiguration => "could not load configuration of",
            ToolPanelWarningKind::SaveConfiguration => "could not save configuration of",
        };
        write!(f, "{action} tool '{}': {}", self.class_id, self.message)
    }
}

#[derive(Debug, Default)]
pub struct ToolPanel {
    pub name: Option<String>,
    pub container_name: Option<String>,
    pub orientation: Option<Orientation>,
    pub items: Vec<ToolPanelItem>,
}

impl ToolPanel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation.unwrap_or_default()
    }

    pub fn find_item(&self, id: Uuid) -> Option<&ToolPanelItem> {
        find_item(&self.items, id)
    }

    pub fn remove_item(&mut self, id: Uuid) -> Option<ToolPanelItem> {
        remove_item(&mut self.items, id)
    }

    /// Tools in document order, nested groups included.
    pub fn tools(&self) -> Vec<&ToolItem> {
        fn collect<'a>(items: &'a [ToolPanelItem], out: &mut Vec<&'a ToolItem>) {
            for item in items {
                match item {
                    ToolPanelItem::Tool(t) => out.push(t),
                    ToolPanelItem::Group(g) => collect(&g.items, out),
                    ToolPanelItem::Separator(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.items, &mut out);
        out
    }
}

/// State shared while building panels from a document.
pub(crate) struct LoadContext<'r> {
    pub registry: &'r CommandRegistry,
    /// prefix -> namespace uri declared on the document root.
    pub namespaces: HashMap<String, String>,
    pub warnings: Vec<ToolPanelWarning>,
}

impl LoadContext<'_> {
    fn warn(&mut self, kind: ToolPanelWarningKind, class_id: String, message: String) {
        warn!(?kind, class = %class_id, error = %message, "tool skipped");
        self.warnings.push(ToolPanelWarning {
            kind,
            class_id,
            message,
        });
    }

    fn class_name_of(&self, element: &XamlElement) -> ClassName {
        let (prefix, name) = match element.name.split_once(':') {
            Some((prefix, name)) => (prefix, name),
            None => ("", element.name.as_str()),
        };
        let namespace = element
            .attr(&xmlns_attribute(prefix))
            .or_else(|| self.namespaces.get(prefix).map(String::as_str))
            .unwrap_or_default();
        ClassName::new(prefix, namespace, name)
    }
}

/// State shared while writing panels to a document.
pub(crate) struct SaveContext<'d> {
    /// prefix -> namespace uri declared on the document root.
    pub namespaces: HashMap<&'d str, &'d str>,
    pub warnings: Vec<ToolPanelWarning>,
}

impl SaveContext<'_> {
    /// The `xmlns` attribute a class element must carry itself because the
    /// root binds its prefix to nothing or to another namespace.
    fn local_declaration(&self, class_name: &ClassName, class_element: &XamlElement) -> Option<String> {
        let key = xmlns_attribute(&class_name.prefix);
        let bound = self.namespaces.get(class_name.prefix.as_str()).copied();
        if class_name.namespace.is_empty()
            || class_element.attr(&key).is_some()
            || bound == Some(class_name.namespace.as_str())
        {
            return None;
        }
        Some(key)
    }
}

pub(crate) fn xmlns_attribute(prefix: &str) -> String {
    if prefix.is_empty() {
        "xmlns".to_string()
    } else {
        format!("xmlns:{prefix}")
    }
}

pub(crate) fn read_panel(element: &XamlElement, ctx: &mut LoadContext<'_>) -> ToolPanel {
    ToolPanel {
        name: element.attr("Name").map(str::to_string),
        container_name: element.attr("ContainerName").map(str::to_string),
        orientation: element.attr("Orientation").and_then(Orientation::from_name),
        items: read_items(element, ctx),
    }
}

fn read_descriptor(element: &XamlElement) -> ToolDescriptor {
    ToolDescriptor {
        label: element.attr("Label").map(str::to_string),
        icon: element.attr("Icon").map(str::to_string),
        description: element.attr("Description").map(str::to_string),
    }
}

fn read_items(parent: &XamlElement, ctx: &mut LoadContext<'_>) -> Vec<ToolPanelItem> {
    let mut items = Vec::new();
    for child in parent.elements() {
        match child.name.as_str() {
            TOOL => {
                if let Some(tool) = read_tool(child, ctx) {
                    items.push(ToolPanelItem::Tool(tool));
                }
            }
            "Menu" | "Group" => {
                let kind = if child.name == "Menu" { GroupKind::Menu } else { GroupKind::Group };
                let mut group = ToolGroup::new(kind, read_descriptor(child));
                group.items = read_items(child, ctx);
                items.push(ToolPanelItem::Group(group));
            }
            SEPARATOR => items.push(ToolPanelItem::separator()),
            TOOLS => items.extend(read_items(child, ctx)),
            other => debug!(element = other, "ignoring unknown tool panel element"),
        }
    }
    items
}

fn read_tool(element: &XamlElement, ctx: &mut LoadContext<'_>) -> Option<ToolItem> {
    let Some(class_element) = element.child(TOOL_CLASS).and_then(XamlElement::first_element) else {
        let label = element.attr("Label").unwrap_or_default().to_string();
        ctx.warn(ToolPanelWarningKind::Instantiate, label, format!("missing {TOOL_CLASS}"));
        return None;
    };
    let class_name = ctx.class_name_of(class_element);

    let mut command = match ctx.registry.instantiate(&class_name) {
        Ok(command) => command,
        Err(err) => {
            ctx.warn(ToolPanelWarningKind::Instantiate, class_name.id(), err.to_string());
            return None;
        }
    };

    if let Some(config) = command.configuration_mut() {
        if let Some(data) = element.child(TOOL_CONFIG_DATA) {
            let blob = if data.has_elements() {
                match data.inner_xml() {
                    Ok(xml) => xml,
                    Err(err) => {
                        ctx.warn(ToolPanelWarningKind::LoadConfiguration, class_name.id(), err.to_string());
                        return None;
                    }
                }
            } else {
                data.text()
            };
            if let Err(err) = config.load_configuration(&blob) {
                ctx.warn(ToolPanelWarningKind::LoadConfiguration, class_name.id(), err.to_string());
                return None;
            }
        }
    }

    let mut tool = ToolItem::new(read_descriptor(element), command);
    tool.class_attributes = class_element.attributes.clone();
    Some(tool)
}

fn write_descriptor(element: &mut XamlElement, descriptor: &ToolDescriptor) {
    for (name, value) in [
        ("Label", &descriptor.label),
        ("Icon", &descriptor.icon),
        ("Description", &descriptor.description),
    ] {
        if let Some(value) = value {
            element.set_attr(name, value);
        }
    }
}

pub(crate) fn write_panel(panel: &ToolPanel, ctx: &mut SaveContext<'_>) -> XamlElement {
    let mut element = XamlElement::new("ToolPanel");
    if let Some(name) = &panel.name {
        element.set_attr("Name", name);
    }
    if let Some(container) = &panel.container_name {
        element.set_attr("ContainerName", container);
    }
    if let Some(orientation) = panel.orientation {
        element.set_attr("Orientation", orientation.as_str());
    }
    let mut tools = XamlElement::new(TOOLS);
    write_items(&mut tools, &panel.items, ctx);
    element.push(tools);
    element
}

fn write_items(parent: &mut XamlElement, items: &[ToolPanelItem], ctx: &mut SaveContext<'_>) {
    for item in items {
        match item {
            ToolPanelItem::Tool(tool) => parent.push(write_tool(tool, ctx)),
            ToolPanelItem::Group(group) => {
                let mut e = XamlElement::new(group.kind.element_name());
                write_descriptor(&mut e, &group.descriptor);
                write_items(&mut e, &group.items, ctx);
                parent.push(e);
            }
            ToolPanelItem::Separator(_) => parent.push(XamlElement::new(SEPARATOR)),
        }
    }
}

fn write_tool(tool: &ToolItem, ctx: &mut SaveContext<'_>) -> XamlElement {
    let mut element = XamlElement::new(TOOL);
    write_descriptor(&mut element, &tool.descriptor);

    let class_name = tool.class_name();
    let mut class_element = XamlElement::new(class_name.qualified_name());
    class_element.attributes = tool.class_attributes.clone();
    if let Some(key) = ctx.local_declaration(class_name, &class_element) {
        debug!(class = %class_name, attribute = %key, "declaring class namespace on the class element");
        class_element.set_attr(key, &class_name.namespace);
    }
    element.push(XamlElement::new(TOOL_CLASS).with_child(class_element));

    if let Some(config) = tool.command.configuration() {
        match config.save_configuration() {
            Ok(blob) if !blob.is_empty() => element.push(config_data_element(&blob)),
            Ok(_) => {}
            Err(err) => {
                warn!(class = %class_name, error = %err, "tool configuration not saved");
                ctx.warnings.push(ToolPanelWarning {
                    kind: ToolPanelWarningKind::SaveConfiguration,
                    class_id: class_name.id(),
                    message: err.to_string(),
                });
            }
        }
    }
    element
}

/// A blob that parses as markup with at least one element is embedded as
/// elements; anything else is written as text. Either way it reads back
/// unchanged.
fn config_data_element(blob: &str) -> XamlElement {
    let mut data = XamlElement::new(TOOL_CONFIG_DATA);
    match parse_fragment(blob) {
        Ok(nodes) if nodes.iter().any(|n| matches!(n, XamlNode::Element(_))) => data.children = nodes,
        _ => data.push_text(blob),
    }
    data
}
