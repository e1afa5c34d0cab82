use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

pub type EntityCollection = Map<String, Value>;

pub const ITEM_DATA_KEY: &str = "itemData";
pub const MASS_KEY: &str = "Mass";
pub const ENTITIES_KEY: &str = "entities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSegment {
    ItemData,
    Mass,
    Entities,
}

impl DocumentSegment {
    pub const PATH: [DocumentSegment; 3] = [
        DocumentSegment::ItemData,
        DocumentSegment::Mass,
        DocumentSegment::Entities,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DocumentSegment::ItemData => ITEM_DATA_KEY,
            DocumentSegment::Mass => MASS_KEY,
            DocumentSegment::Entities => ENTITIES_KEY,
        }
    }
}

impl fmt::Display for DocumentSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("'{segment}' not found in save document")]
    Missing { segment: DocumentSegment },
    #[error("'{segment}' in save document is a {found}, expected a map")]
    NotAMap {
        segment: DocumentSegment,
        found: &'static str,
    },
}

impl DocumentError {
    pub fn segment(&self) -> DocumentSegment {
        match self {
            DocumentError::Missing { segment } | DocumentError::NotAMap { segment, .. } => *segment,
        }
    }
}

/// Walks `itemData -> Mass -> entities` and returns the entity map.
///
/// A root that is not a map has no `itemData` and is reported as such.
pub fn locate_entity_collection(document: &Value) -> Result<&EntityCollection, DocumentError> {
    let mut current = document;
    for segment in DocumentSegment::PATH {
        current = child(current, segment)?;
    }
    as_map(current, DocumentSegment::Entities)
}

pub fn locate_entity_collection_mut(
    document: &mut Value,
) -> Result<&mut EntityCollection, DocumentError> {
    let mut current = document;
    for segment in DocumentSegment::PATH {
        current = match current {
            Value::Object(map) => map
                .get_mut(segment.key())
                .ok_or(DocumentError::Missing { segment })?,
            other => return Err(parent_error(segment, value_kind(other))),
        };
    }
    match current {
        Value::Object(map) => Ok(map),
        other => Err(DocumentError::NotAMap {
            segment: DocumentSegment::Entities,
            found: value_kind(other),
        }),
    }
}

fn child(value: &Value, segment: DocumentSegment) -> Result<&Value, DocumentError> {
    match value {
        Value::Object(map) => map
            .get(segment.key())
            .ok_or(DocumentError::Missing { segment }),
        other => Err(parent_error(segment, value_kind(other))),
    }
}

// Reached only when the parent of `segment` was not a map.
fn parent_error(segment: DocumentSegment, found: &'static str) -> DocumentError {
    match segment {
        DocumentSegment::ItemData => DocumentError::Missing { segment },
        DocumentSegment::Mass => DocumentError::NotAMap {
            segment: DocumentSegment::ItemData,
            found,
        },
        DocumentSegment::Entities => DocumentError::NotAMap {
            segment: DocumentSegment::Mass,
            found,
        },
    }
}

fn as_map(value: &Value, segment: DocumentSegment) -> Result<&EntityCollection, DocumentError> {
    value.as_object().ok_or(DocumentError::NotAMap {
        segment,
        found: value_kind(value),
    })
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}
