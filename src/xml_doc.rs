//! Minimal element tree over xml-rs events.
//!
//! Text is kept exactly as written: the reader does not trim whitespace, so
//! `"dent "` and `"dent"` stay distinct. Elements are matched by local name
//! and in document order regardless of what sits between them.

use xml::reader::{EventReader, ParserConfig, XmlEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Text before the first child element.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// First element reached by a `/`-separated path of child names.
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .try_fold(self, |element, name| element.child(name))
    }

    /// Text of the element at `path`, or `None` if it is absent.
    pub fn find_text(&self, path: &str) -> Option<&str> {
        self.find(path).map(|element| element.text.as_str())
    }

    /// Every descendant named `name`, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }
}

/// Parse a document and return its root element.
pub fn parse_document(xml_content: &str) -> Result<Element, xml::reader::Error> {
    let reader = EventReader::new_with_config(
        xml_content.as_bytes(),
        ParserConfig::new()
            .trim_whitespace(false)
            .whitespace_to_characters(true)
            .cdata_to_characters(true)
            .ignore_comments(true),
    );

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    for event in reader {
        match event? {
            XmlEvent::StartElement { name, .. } => stack.push(Element {
                name: name.local_name,
                ..Default::default()
            }),
            XmlEvent::Characters(text) => {
                if let Some(element) = stack.last_mut() {
                    if element.children.is_empty() {
                        element.text.push_str(&text);
                    }
                }
            }
            XmlEvent::EndElement { .. } => {
                if let Some(element) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
            }
            _ => {}
        }
    }

    // xml-rs reports unbalanced or empty documents as errors, so a root exists here.
    Ok(root.unwrap_or_default())
}
