use mapbuilder_tools::*;
use mapbuilder_xaml::{XamlElement, XamlNode};

const TOOLS_NS: &str = "clr-namespace:Builder.Tools;assembly=Builder.Tools";

const DOC: &str = r#"<ToolPanels xmlns:esri="http://schemas.esri.com/arcgis/client/2009" xmlns:tools="clr-namespace:Builder.Tools;assembly=Builder.Tools">
  <ToolPanel Name="MainToolbar" ContainerName="TopContainer" Orientation="Horizontal">
    <Tools>
      <Tool Label="Open" Icon="/Images/open.png" Description="Open a map">
        <Tool.Class><tools:OpenMapCommand/></Tool.Class>
      </Tool>
      <Separator/>
      <Tool Label="Search">
        <Tool.Class><tools:SearchCommand MaxResults="25"/></Tool.Class>
        <Tool.ConfigData><SearchConfig Url="http://h/GeocodeServer"><Field Name="Address"/></SearchConfig></Tool.ConfigData>
      </Tool>
      <Menu Label="Basemaps" Icon="/Images/basemap.png">
        <Tool Label="Streets"><Tool.Class><tools:BasemapCommand/></Tool.Class><Tool.ConfigData>streets</Tool.ConfigData></Tool>
        <Tool Label="Imagery"><Tool.Class><tools:BasemapCommand/></Tool.Class><Tool.ConfigData>imagery</Tool.ConfigData></Tool>
      </Menu>
      <Group Label="Measure">
        <Tool Label="Distance"><Tool.Class><esri:MeasureAction/></Tool.Class></Tool>
      </Group>
    </Tools>
  </ToolPanel>
  <ToolPanel Name="Sidebar" Orientation="Vertical">
    <Tools/>
  </ToolPanel>
</ToolPanels>"#;

#[derive(Debug)]
struct SearchCommand {
    class: ClassName,
    config: String,
    fail_save: bool,
}

impl Command for SearchCommand {
    fn class_name(&self) -> &ClassName {
        &self.class
    }

    fn configuration(&self) -> Option<&dyn SupportsConfiguration> {
        Some(self)
    }

    fn configuration_mut(&mut self) -> Option<&mut dyn SupportsConfiguration> {
        Some(self)
    }
}

impl SupportsConfiguration for SearchCommand {
    fn load_configuration(&mut self, config: &str) -> ToolResult<()> {
        if !config.starts_with("<SearchConfig") {
            return Err(ToolError::Command("not a search configuration".into()));
        }
        self.config = config.to_string();
        Ok(())
    }

    fn save_configuration(&self) -> ToolResult<String> {
        if self.fail_save {
            return Err(ToolError::Command("locator unavailable".into()));
        }
        Ok(self.config.clone())
    }
}

fn register_search(registry: &mut CommandRegistry, fail_save: bool) {
    registry.register(TOOLS_NS, "SearchCommand", move |class| {
        Ok(Box::new(SearchCommand {
            class: class.clone(),
            config: String::new(),
            fail_save,
        }))
    });
}

fn normalized(xml: &str) -> XamlElement {
    fn sort(e: &mut XamlElement) {
        e.attributes.sort();
        for child in &mut e.children {
            if let XamlNode::Element(c) = child {
                sort(c);
            }
        }
    }
    let mut e = XamlElement::parse(xml).unwrap();
    sort(&mut e);
    e
}

#[test]
fn test_save_of_load_reproduces_document() {
    let (panels, warnings) = ToolPanels::load(DOC, &CommandRegistry::pass_through()).unwrap();
    assert!(warnings.is_empty());
    let (xml, warnings) = panels.save().unwrap();
    assert!(warnings.is_empty());
    assert_eq!(normalized(&xml), normalized(DOC));
}

#[test]
fn test_items_keep_document_order() {
    let (panels, _) = ToolPanels::load(DOC, &CommandRegistry::pass_through()).unwrap();
    let main = panels.panel("MainToolbar").unwrap();
    assert_eq!(main.container_name.as_deref(), Some("TopContainer"));
    assert_eq!(main.orientation(), Orientation::Horizontal);
    assert!(matches!(main.items[0], ToolPanelItem::Tool(_)));
    assert!(matches!(main.items[1], ToolPanelItem::Separator(_)));
    assert!(matches!(&main.items[3], ToolPanelItem::Group(g) if g.kind == GroupKind::Menu && g.items.len() == 2));
    assert!(matches!(&main.items[4], ToolPanelItem::Group(g) if g.kind == GroupKind::Group));

    let labels: Vec<_> = main.tools().iter().filter_map(|t| t.descriptor.label.clone()).collect();
    assert_eq!(labels, ["Open", "Search", "Streets", "Imagery", "Distance"]);
    assert_eq!(
        main.tools()[4].class_name().id(),
        "http://schemas.esri.com/arcgis/client/2009#MeasureAction"
    );
    assert_eq!(panels.panel("Sidebar").unwrap().orientation(), Orientation::Vertical);
}

#[test]
fn test_failing_class_warns_once_and_siblings_load() {
    let mut registry = CommandRegistry::pass_through();
    registry.register(TOOLS_NS, "OpenMapCommand", |_| Err(ToolError::Command("boom".into())));

    let (panels, warnings) = ToolPanels::load(DOC, &registry).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, ToolPanelWarningKind::Instantiate);
    assert_eq!(warnings[0].class_id, format!("{TOOLS_NS}#OpenMapCommand"));

    let main = panels.panel("MainToolbar").unwrap();
    assert_eq!(main.tools().len(), 4);
    assert!(matches!(main.items[0], ToolPanelItem::Separator(_)));
}

#[test]
fn test_strict_registry_rejects_unknown_classes() {
    let mut registry = CommandRegistry::new();
    register_search(&mut registry, false);

    let (panels, warnings) = ToolPanels::load(DOC, &registry).unwrap();
    // OpenMap, two Basemaps and MeasureAction have no factory.
    assert_eq!(warnings.len(), 4);
    assert!(warnings.iter().all(|w| w.kind == ToolPanelWarningKind::Instantiate));
    assert_eq!(panels.panel("MainToolbar").unwrap().tools().len(), 1);
}

#[test]
fn test_config_data_markup_reaches_command() {
    let mut registry = CommandRegistry::pass_through();
    register_search(&mut registry, false);

    let (panels, warnings) = ToolPanels::load(DOC, &registry).unwrap();
    assert!(warnings.is_empty());
    let search = panels.panel("MainToolbar").unwrap().tools()[1];
    let blob = search.command.configuration().unwrap().save_configuration().unwrap();
    assert_eq!(
        blob,
        r#"<SearchConfig Url="http://h/GeocodeServer"><Field Name="Address"/></SearchConfig>"#
    );
    assert_eq!(search.class_attributes, vec![("MaxResults".to_string(), "25".to_string())]);
}

#[test]
fn test_load_configuration_failure_omits_tool() {
    let doc = format!(
        r#"<ToolPanels xmlns:tools="{TOOLS_NS}"><ToolPanel Name="P"><Tools>
            <Tool Label="Bad"><Tool.Class><tools:SearchCommand/></Tool.Class><Tool.ConfigData>plain text</Tool.ConfigData></Tool>
            <Tool Label="Good"><Tool.Class><tools:OpenMapCommand/></Tool.Class></Tool>
        </Tools></ToolPanel></ToolPanels>"#
    );
    let mut registry = CommandRegistry::pass_through();
    register_search(&mut registry, false);

    let (panels, warnings) = ToolPanels::load(&doc, &registry).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, ToolPanelWarningKind::LoadConfiguration);
    let tools = panels.panel("P").unwrap().tools();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].descriptor.label.as_deref(), Some("Good"));
}

#[test]
fn test_save_configuration_failure_keeps_tool_without_config() {
    let mut registry = CommandRegistry::pass_through();
    register_search(&mut registry, true);
    let (panels, _) = ToolPanels::load(DOC, &registry).unwrap();

    let (xml, warnings) = panels.save().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, ToolPanelWarningKind::SaveConfiguration);

    let root = XamlElement::parse(&xml).unwrap();
    let tools = root.first_element().and_then(|p| p.child("Tools")).unwrap();
    let search = tools.elements().find(|t| t.attr("Label") == Some("Search")).unwrap();
    assert!(search.child("Tool.Class").is_some());
    assert!(search.child("Tool.ConfigData").is_none());
}

#[test]
fn test_new_tool_namespace_is_declared_on_save() {
    let mut panels = ToolPanels::new();
    let mut panel = ToolPanel::new("Extras");
    let class = ClassName::new("ext", "clr-namespace:Acme.Tools;assembly=Acme", "PrintCommand");
    let mut print = OpaqueCommand::new(class);
    print.load_configuration("A4 landscape").unwrap();
    panel.items.push(ToolPanelItem::Tool(ToolItem::new(
        ToolDescriptor {
            label: Some("Print".into()),
            ..Default::default()
        },
        Box::new(print),
    )));
    let separator = ToolPanelItem::separator();
    let separator_id = separator.id();
    panel.items.push(separator);
    panels.panels.push(panel);

    let (xml, _) = panels.save().unwrap();
    let root = XamlElement::parse(&xml).unwrap();
    assert_eq!(root.attr("xmlns:ext"), Some("clr-namespace:Acme.Tools;assembly=Acme"));
    assert!(xml.contains("<ext:PrintCommand/>"));
    assert!(xml.contains("<Tool.ConfigData>A4 landscape</Tool.ConfigData>"));

    let panel = panels.panel_mut("Extras").unwrap();
    assert!(panel.find_item(separator_id).is_some());
    assert!(panel.remove_item(separator_id).is_some());
    assert_eq!(panel.items.len(), 1);
}

#[test]
fn test_wrong_root_is_an_error() {
    let err = ToolPanels::load("<Panels/>", &CommandRegistry::pass_through()).unwrap_err();
    assert!(matches!(err, ToolError::UnexpectedRoot { .. }));
}

fn class_ids(panels: &ToolPanels) -> Vec<String> {
    panels.panels.iter().flat_map(|p| p.tools()).map(|t| t.class_name().id()).collect()
}

fn opaque_tool(class: ClassName, config: &str) -> ToolPanelItem {
    let mut command = OpaqueCommand::new(class);
    command.load_configuration(config).unwrap();
    ToolPanelItem::Tool(ToolItem::new(ToolDescriptor::default(), Box::new(command)))
}

fn config_blob(tool: &ToolItem) -> String {
    tool.command.configuration().unwrap().save_configuration().unwrap()
}

#[test]
fn test_prefix_bound_elsewhere_keeps_new_tool_namespace() {
    let doc = r#"<ToolPanels xmlns:local="urn:A"><ToolPanel Name="P"><Tools>
        <Tool Label="Cmd"><Tool.Class><local:Cmd/></Tool.Class></Tool>
    </Tools></ToolPanel></ToolPanels>"#;
    let registry = CommandRegistry::pass_through();
    let (mut panels, _) = ToolPanels::load(doc, &registry).unwrap();
    panels
        .panel_mut("P")
        .unwrap()
        .items
        .push(opaque_tool(ClassName::new("local", "urn:B", "Other"), ""));

    let (xml, warnings) = panels.save().unwrap();
    assert!(warnings.is_empty());
    let root = XamlElement::parse(&xml).unwrap();
    assert_eq!(root.attr("xmlns:local"), Some("urn:A"));
    assert!(xml.contains(r#"<local:Other xmlns:local="urn:B"/>"#));

    let (reloaded, warnings) = ToolPanels::load(&xml, &registry).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(class_ids(&reloaded), ["urn:A#Cmd", "urn:B#Other"]);

    let (again, _) = reloaded.save().unwrap();
    assert_eq!(again, xml);
}

#[test]
fn test_config_data_text_reaches_command_verbatim() {
    let doc = format!(
        "<ToolPanels xmlns:tools=\"{TOOLS_NS}\">\n  <ToolPanel Name=\"P\">\n    <Tools>\n      \
         <Tool Label=\"Mixed\"><Tool.Class><tools:A/></Tool.Class>\
         <Tool.ConfigData><p>Hello <b>big</b> world</p></Tool.ConfigData></Tool>\n      \
         <Tool Label=\"Text\"><Tool.Class><tools:B/></Tool.Class>\
         <Tool.ConfigData>  key = value\n</Tool.ConfigData></Tool>\n      \
         <Tool Label=\"Padded\"><Tool.Class><tools:C/></Tool.Class>\
         <Tool.ConfigData>\n  <Setting Name=\"a\"/> <Setting Name=\"b\"/>\n</Tool.ConfigData></Tool>\n    \
         </Tools>\n  </ToolPanel>\n</ToolPanels>"
    );
    let registry = CommandRegistry::pass_through();
    let (panels, warnings) = ToolPanels::load(&doc, &registry).unwrap();
    assert!(warnings.is_empty());

    let expected = [
        "<p>Hello <b>big</b> world</p>",
        "  key = value\n",
        "\n  <Setting Name=\"a\"/> <Setting Name=\"b\"/>\n",
    ];
    let blobs: Vec<_> = panels.panel("P").unwrap().tools().into_iter().map(config_blob).collect();
    assert_eq!(blobs, expected);

    let (xml, _) = panels.save().unwrap();
    let (reloaded, _) = ToolPanels::load(&xml, &registry).unwrap();
    let blobs: Vec<_> = reloaded.panel("P").unwrap().tools().into_iter().map(config_blob).collect();
    assert_eq!(blobs, expected);
}

#[test]
fn test_new_tool_config_blob_survives_indented_save() {
    let mut panel = ToolPanel::new("P");
    let blob = " <Setting Name=\"a\">x &amp; \"y\"</Setting>\n";
    panel
        .items
        .push(opaque_tool(ClassName::new("tools", TOOLS_NS, "PrintCommand"), blob));
    let mut panels = ToolPanels::new();
    panels.panels.push(panel);

    let (xml, _) = panels.save().unwrap();
    assert!(xml.contains("<Tool.ConfigData> <Setting Name=\"a\">x &amp; \"y\"</Setting>\n</Tool.ConfigData>"));
    let (reloaded, _) = ToolPanels::load(&xml, &CommandRegistry::pass_through()).unwrap();
    assert_eq!(config_blob(reloaded.panel("P").unwrap().tools()[0]), blob);
}
