//! A small owned element tree over quick-xml.
//!
//! Layer writers build `XamlElement`s and readers walk them; quick-xml is
//! only touched when text goes in or out.

use crate::errors::{XamlError, XamlResult};
use crate::format;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

#[derive(Debug, Clone, PartialEq)]
pub enum XamlNode {
    Element(XamlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XamlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XamlNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlWriteOptions {
    /// Spaces per nesting level; zero writes everything on one line.
    pub indent: usize,
    pub xml_declaration: bool,
    /// Elements whose content is written exactly as held, never indented.
    pub preserve_space: &'static [&'static str],
}

impl Default for XmlWriteOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            xml_declaration: false,
            preserve_space: &[],
        }
    }
}

impl XmlWriteOptions {
    pub fn compact() -> Self {
        Self {
            indent: 0,
            ..Default::default()
        }
    }
}

impl XamlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn push(&mut self, child: XamlElement) {
        self.children.push(XamlNode::Element(child));
    }

    pub fn with_child(mut self, child: XamlElement) -> Self {
        self.push(child);
        self
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XamlNode::Text(text.into()));
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn elements(&self) -> impl Iterator<Item = &XamlElement> {
        self.children.iter().filter_map(|node| match node {
            XamlNode::Element(e) => Some(e),
            XamlNode::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&XamlElement> {
        self.elements().find(|e| e.name == name)
    }

    pub fn first_element(&self) -> Option<&XamlElement> {
        self.elements().next()
    }

    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XamlNode::Text(t) => Some(t.as_str()),
                XamlNode::Element(_) => None,
            })
            .collect()
    }

    pub fn attr_f64(&self, name: &str) -> XamlResult<Option<f64>> {
        self.attr(name)
            .map(|v| format::parse_f64(v).ok_or_else(|| XamlError::invalid_attribute(&self.name, name, v)))
            .transpose()
    }

    pub fn attr_i32(&self, name: &str) -> XamlResult<Option<i32>> {
        self.attr(name)
            .map(|v| v.trim().parse().map_err(|_| XamlError::invalid_attribute(&self.name, name, v)))
            .transpose()
    }

    pub fn attr_bool(&self, name: &str) -> XamlResult<Option<bool>> {
        self.attr(name)
            .map(|v| format::parse_bool(v).ok_or_else(|| XamlError::invalid_attribute(&self.name, name, v)))
            .transpose()
    }

    /// Parses a document holding exactly one root element. Whitespace-only
    /// text between elements is dropped; other text is kept as written.
    pub fn parse(xml: &str) -> XamlResult<XamlElement> {
        Self::parse_preserving(xml, &[])
    }

    /// Like [`XamlElement::parse`], but whitespace-only text inside the
    /// named elements is kept too.
    pub fn parse_preserving(xml: &str, preserve_space: &[&str]) -> XamlResult<XamlElement> {
        let nodes = read_nodes(xml, |open| open.iter().any(|e| preserve_space.contains(&e.name.as_str())))?;
        let mut roots = nodes.into_iter().filter_map(|node| match node {
            XamlNode::Element(e) => Some(e),
            XamlNode::Text(_) => None,
        });
        let root = roots.next().ok_or_else(|| XamlError::missing("document root"))?;
        if roots.next().is_some() {
            return Err(XamlError::Xml("more than one root element".to_string()));
        }
        Ok(root)
    }

    pub fn to_xml_string(&self) -> XamlResult<String> {
        self.to_xml_string_with(&XmlWriteOptions::default())
    }

    pub fn to_xml_string_with(&self, options: &XmlWriteOptions) -> XamlResult<String> {
        let mut writer = if options.indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', options.indent)
        } else {
            Writer::new(Vec::new())
        };
        if options.xml_declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        }
        write_element(&mut writer, self, options)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Children serialized compactly, without this element's own tags.
    pub fn inner_xml(&self) -> XamlResult<String> {
        let mut writer = Writer::new(Vec::new());
        let options = XmlWriteOptions::compact();
        for node in &self.children {
            write_node(&mut writer, node, &options)?;
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Parses a fragment that may hold several sibling elements and text.
/// Whitespace-only text between elements is dropped.
pub fn parse_nodes(xml: &str) -> XamlResult<Vec<XamlNode>> {
    read_nodes(xml, |_| false)
}

/// Parses a fragment keeping every text node as written.
pub fn parse_fragment(xml: &str) -> XamlResult<Vec<XamlNode>> {
    read_nodes(xml, |_| true)
}

/// `keep_whitespace` sees the open elements, outermost first, and decides
/// whether a whitespace-only text node at that point is kept.
fn read_nodes(xml: &str, keep_whitespace: impl Fn(&[XamlElement]) -> bool) -> XamlResult<Vec<XamlNode>> {
    let mut reader = Reader::from_str(xml);

    let mut top: Vec<XamlNode> = Vec::new();
    let mut stack: Vec<XamlElement> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from_start(&e)?),
            Event::Empty(e) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut top, XamlNode::Element(element));
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XamlError::Xml("unexpected end tag".to_string()))?;
                attach(&mut stack, &mut top, XamlNode::Element(element));
            }
            Event::Text(t) => {
                let text = t.unescape()?.into_owned();
                let blank = text.chars().all(char::is_whitespace);
                if !text.is_empty() && (!blank || keep_whitespace(&stack[..])) {
                    attach(&mut stack, &mut top, XamlNode::Text(text));
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                attach(&mut stack, &mut top, XamlNode::Text(text));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XamlError::Xml(format!("unclosed element <{}>", open.name)));
    }
    Ok(top)
}

fn attach(stack: &mut [XamlElement], top: &mut Vec<XamlNode>, node: XamlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

fn element_from_start(start: &BytesStart<'_>) -> XamlResult<XamlElement> {
    let mut element = XamlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XamlNode, options: &XmlWriteOptions) -> XamlResult<()> {
    match node {
        XamlNode::Element(e) => write_element(writer, e, options),
        XamlNode::Text(t) => {
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(t))))?;
            Ok(())
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XamlElement, options: &XmlWriteOptions) -> XamlResult<()> {
    let mixed = element.children.iter().any(|n| matches!(n, XamlNode::Text(_))) && element.has_elements();
    if options.indent > 0 && (mixed || options.preserve_space.contains(&element.name.as_str())) {
        // Indentation would become part of the content.
        let mut verbatim = Writer::new(Vec::new());
        write_element(&mut verbatim, element, &XmlWriteOptions::compact())?;
        if !writer.get_ref().is_empty() {
            writer.write_indent()?;
        }
        writer.get_mut().extend_from_slice(&verbatim.into_inner());
        return Ok(());
    }

    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child, options)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_attribute_and_child_order() {
        let root = XamlElement::parse(r#"<a X="1" Y="2"><b/>text<c Z="&lt;"/></a>"#).unwrap();
        assert_eq!(root.attributes, vec![("X".into(), "1".into()), ("Y".into(), "2".into())]);
        let names: Vec<_> = root.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!(root.text(), "text");
        assert_eq!(root.child("c").and_then(|c| c.attr("Z")), Some("<"));
    }

    #[test]
    fn compact_output_round_trips() {
        let root = XamlElement::new("esri:Map")
            .with_attr("xmlns:esri", "http://schemas.esri.com/arcgis/client/2009")
            .with_child(XamlElement::new("esri:GraphicsLayer").with_attr("ID", "g&1"));
        let xml = root.to_xml_string_with(&XmlWriteOptions::compact()).unwrap();
        assert_eq!(
            xml,
            r#"<esri:Map xmlns:esri="http://schemas.esri.com/arcgis/client/2009"><esri:GraphicsLayer ID="g&amp;1"/></esri:Map>"#
        );
        assert_eq!(XamlElement::parse(&xml).unwrap(), root);
    }

    #[test]
    fn rejects_two_roots_and_unclosed() {
        assert!(XamlElement::parse("<a/><b/>").is_err());
        assert!(XamlElement::parse("<a><b></a>").is_err());
        assert!(matches!(XamlElement::parse(""), Err(XamlError::MissingElement { .. })));
    }

    #[test]
    fn text_is_kept_as_written() {
        let root = XamlElement::parse("<a>\n  <p>Hello <b>big</b> world</p>\n  <c>  padded \n</c>\n</a>").unwrap();
        assert_eq!(root.elements().count(), 2);
        assert_eq!(root.inner_xml().unwrap(), "<p>Hello <b>big</b> world</p><c>  padded \n</c>");
    }

    #[test]
    fn preserved_elements_keep_blank_text() {
        let xml = "<a>\n  <cfg>\n  <x/> <y/>\n</cfg>\n</a>";
        let dropped = XamlElement::parse(xml).unwrap();
        assert_eq!(dropped.child("cfg").unwrap().inner_xml().unwrap(), "<x/><y/>");
        let kept = XamlElement::parse_preserving(xml, &["cfg"]).unwrap();
        assert_eq!(kept.elements().count(), 1);
        assert_eq!(kept.child("cfg").unwrap().inner_xml().unwrap(), "\n  <x/> <y/>\n");

        let fragment = parse_fragment("  <x/>\n").unwrap();
        assert_eq!(fragment.len(), 3);
    }

    #[test]
    fn indented_output_leaves_preserved_and_mixed_content_alone() {
        let mut root = XamlElement::new("a").with_child(XamlElement::new("cfg").with_child(XamlElement::new("x")));
        root.push(XamlElement::parse("<p>Hello <b>big</b> world</p>").unwrap());
        let options = XmlWriteOptions {
            preserve_space: &["cfg"],
            ..Default::default()
        };
        assert_eq!(
            root.to_xml_string_with(&options).unwrap(),
            "<a>\n  <cfg><x/></cfg>\n  <p>Hello <b>big</b> world</p>\n</a>"
        );
    }

    #[test]
    fn inner_xml_omits_own_tags() {
        let root = XamlElement::parse("<cfg><Setting Name=\"a\"/><Setting Name=\"b\"/></cfg>").unwrap();
        assert_eq!(root.inner_xml().unwrap(), r#"<Setting Name="a"/><Setting Name="b"/>"#);
    }
}
