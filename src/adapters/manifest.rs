//! Read-only element tree for decoded `AndroidManifest.xml` files.

use crate::utils::error::{IconError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestElement {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<ManifestElement>,
}

impl ManifestElement {
    /// First direct child with the given (prefixed) name.
    pub fn child(&self, name: &str) -> Option<&ManifestElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Attribute lookup by its qualified key, e.g. `android:icon`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut attributes = HashMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| manifest_error(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| manifest_error(e.to_string()))?
                .to_string();
            attributes.insert(key, value);
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDocument {
    root: Option<ManifestElement>,
}

impl ManifestDocument {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<ManifestElement> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => stack.push(ManifestElement::from_start(&start)?),
                Ok(Event::Empty(empty)) => {
                    let element = ManifestElement::from_start(&empty)?;
                    attach(&mut stack, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(manifest_error(format!(
                        "at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        if !stack.is_empty() {
            return Err(manifest_error("unexpected end of document".to_string()));
        }

        Ok(Self { root })
    }

    /// The document element, if it carries the expected name.
    pub fn root_element(&self, name: &str) -> Option<&ManifestElement> {
        self.root.as_ref().filter(|r| r.name == name)
    }
}

fn attach(stack: &mut [ManifestElement], root: &mut Option<ManifestElement>, element: ManifestElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

fn manifest_error(message: String) -> IconError {
    IconError::DocumentError {
        document: "AndroidManifest.xml".to_string(),
        message,
    }
}
