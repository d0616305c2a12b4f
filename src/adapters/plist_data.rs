//! Property-list access by key, on top of the `plist` crate.

use crate::utils::error::{IconError, Result};
use plist::{Dictionary, Value};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PlistData {
    dict: Dictionary,
}

/// Borrowed view of a nested dictionary.
#[derive(Debug, Clone, Copy)]
pub struct PlistMap<'a> {
    dict: &'a Dictionary,
}

impl PlistData {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(&path)?;
        Self::from_bytes(&bytes)
    }

    /// XML 或 binary plist 皆可
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value = Value::from_reader(Cursor::new(bytes)).map_err(|e| plist_error(e.to_string()))?;
        match value {
            Value::Dictionary(dict) => Ok(Self { dict }),
            _ => Err(plist_error("top-level value is not a dictionary".to_string())),
        }
    }

    pub fn from_content(content: &str) -> Result<Self> {
        Self::from_bytes(content.as_bytes())
    }

    pub fn root(&self) -> PlistMap<'_> {
        PlistMap { dict: &self.dict }
    }

    pub fn get_map(&self, key: &str) -> Option<PlistMap<'_>> {
        self.root().get_map(key)
    }

    pub fn get_string_array(&self, key: &str) -> Option<Vec<String>> {
        self.root().get_string_array(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.dict.get(key).and_then(Value::as_string)
    }
}

impl<'a> PlistMap<'a> {
    pub fn get_map(&self, key: &str) -> Option<PlistMap<'a>> {
        self.dict
            .get(key)
            .and_then(Value::as_dictionary)
            .map(|dict| PlistMap { dict })
    }

    /// `None` unless the value is an array whose elements are all strings.
    pub fn get_string_array(&self, key: &str) -> Option<Vec<String>> {
        self.dict
            .get(key)?
            .as_array()?
            .iter()
            .map(|v| v.as_string().map(str::to_string))
            .collect()
    }

    pub fn get_string(&self, key: &str) -> Option<&'a str> {
        self.dict.get(key).and_then(Value::as_string)
    }
}

fn plist_error(message: String) -> IconError {
    IconError::DocumentError {
        document: "Info.plist".to_string(),
        message,
    }
}
