use crate::errors::{ToolError, ToolResult};
use crate::item::ToolPanelItem;
use crate::panel::{LoadContext, SaveContext, TOOL_CONFIG_DATA, ToolPanel, ToolPanelWarning, read_panel, write_panel, xmlns_attribute};
use crate::registry::CommandRegistry;
use mapbuilder_xaml::{XamlElement, XmlWriteOptions};
use std::collections::HashMap;
use tracing::info;

pub const TOOL_PANELS: &str = "ToolPanels";
pub const TOOL_PANEL: &str = "ToolPanel";

/// Content kept byte for byte across load and save.
const VERBATIM: &[&str] = &[TOOL_CONFIG_DATA];

/// Every tool panel of an application together with the namespace prefixes
/// their command classes live in.
#[derive(Debug, Default)]
pub struct ToolPanels {
    /// `(prefix, uri)` in declaration order; the default namespace has an
    /// empty prefix.
    pub namespaces: Vec<(String, String)>,
    pub panels: Vec<ToolPanel>,
}

impl ToolPanels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, name: &str) -> Option<&ToolPanel> {
        self.panels.iter().find(|p| p.name.as_deref() == Some(name))
    }

    pub fn panel_mut(&mut self, name: &str) -> Option<&mut ToolPanel> {
        self.panels.iter_mut().find(|p| p.name.as_deref() == Some(name))
    }

    /// Builds panels from a `ToolPanels` document. Tools that cannot be
    /// created or configured are left out and reported as warnings; only a
    /// malformed document is an error.
    pub fn load(xml: &str, registry: &CommandRegistry) -> ToolResult<(ToolPanels, Vec<ToolPanelWarning>)> {
        let root = XamlElement::parse_preserving(xml, VERBATIM)?;
        if root.name != TOOL_PANELS {
            return Err(ToolError::UnexpectedRoot {
                expected: TOOL_PANELS,
                found: root.name,
            });
        }

        let namespaces: Vec<(String, String)> = root
            .attributes
            .iter()
            .filter_map(|(key, value)| {
                let prefix = if key == "xmlns" { Some("") } else { key.strip_prefix("xmlns:") }?;
                Some((prefix.to_string(), value.clone()))
            })
            .collect();

        let mut ctx = LoadContext {
            registry,
            namespaces: namespaces.iter().cloned().collect::<HashMap<_, _>>(),
            warnings: Vec::new(),
        };
        let panels = root
            .elements()
            .filter(|e| e.name == TOOL_PANEL)
            .map(|e| read_panel(e, &mut ctx))
            .collect::<Vec<_>>();

        info!(panels = panels.len(), warnings = ctx.warnings.len(), "tool panels loaded");
        Ok((ToolPanels { namespaces, panels }, ctx.warnings))
    }

    pub fn to_element(&self) -> (XamlElement, Vec<ToolPanelWarning>) {
        let mut root = XamlElement::new(TOOL_PANELS);
        let declared = self.declared_namespaces();
        for (prefix, uri) in &declared {
            root.set_attr(xmlns_attribute(prefix), uri);
        }
        let mut ctx = SaveContext {
            namespaces: declared.iter().map(|(p, u)| (p.as_str(), u.as_str())).collect(),
            warnings: Vec::new(),
        };
        for panel in &self.panels {
            root.push(write_panel(panel, &mut ctx));
        }
        (root, ctx.warnings)
    }

    /// Writes the document. Configuration save failures are reported as
    /// warnings and the affected tool is written without `Tool.ConfigData`.
    pub fn save(&self) -> ToolResult<(String, Vec<ToolPanelWarning>)> {
        self.save_with(&XmlWriteOptions::default())
    }

    pub fn save_with(&self, options: &XmlWriteOptions) -> ToolResult<(String, Vec<ToolPanelWarning>)> {
        let (root, warnings) = self.to_element();
        let options = XmlWriteOptions {
            preserve_space: VERBATIM,
            ..*options
        };
        Ok((root.to_xml_string_with(&options)?, warnings))
    }

    /// Loaded namespaces first, then any prefix a tool class introduced
    /// since, in first-use order. A prefix already bound to another uri is
    /// declared on the class element instead.
    fn declared_namespaces(&self) -> Vec<(String, String)> {
        let mut declared = self.namespaces.clone();
        for panel in &self.panels {
            collect_class_namespaces(&panel.items, &mut declared);
        }
        declared
    }
}

fn collect_class_namespaces(items: &[ToolPanelItem], declared: &mut Vec<(String, String)>) {
    for item in items {
        match item {
            ToolPanelItem::Tool(tool) => {
                let class = tool.class_name();
                let own_xmlns = tool.class_attributes.iter().any(|(k, _)| k.starts_with("xmlns"));
                if class.namespace.is_empty() || own_xmlns {
                    continue;
                }
                if !declared.iter().any(|(prefix, _)| *prefix == class.prefix) {
                    declared.push((class.prefix.clone(), class.namespace.clone()));
                }
            }
            ToolPanelItem::Group(group) => collect_class_namespaces(&group.items, declared),
            ToolPanelItem::Separator(_) => {}
        }
    }
}
