use std::collections::{BTreeMap, BTreeSet};

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::size::AttributeSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeAccess {
    Read,
    Write,
    SetByCreate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttributeType {
    #[default]
    Unknown,
    Octets,
    String,
    UnsignedInteger,
    Table,
    SignedInteger,
    Pointer,
    BitField,
    Enumeration,
    Counter,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub index: usize,
    pub name: String,
    /// Paragraph indices of the text that describes the attribute.
    #[serde(default)]
    pub description: Vec<usize>,
    #[serde(default)]
    pub access: BTreeSet<AttributeAccess>,
    pub optional: Option<bool>,
    #[serde(default)]
    pub deprecated: bool,
    pub size: Option<AttributeSize>,
    #[serde(default)]
    pub avc: bool,
    #[serde(default)]
    pub tca: bool,
    #[serde(rename = "type", default)]
    pub attribute_type: AttributeType,
    /// Comma separated constraint terms (`n`, `n..m`, `len(n)`, bitmask).
    pub constraint: Option<String>,
    pub default: Option<serde_json::Value>,
}

impl Attribute {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_table(&self) -> bool {
        self.attribute_type == AttributeType::Table
    }

    pub fn is_read_only(&self) -> bool {
        self.access.len() == 1 && self.access.contains(&AttributeAccess::Read)
    }
}

/// Ordered attribute list. Position is the attribute index; index 0 is the
/// managed entity identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeList(Vec<Attribute>);

impl AttributeList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, mut attribute: Attribute) {
        attribute.index = self.0.len();
        self.0.push(attribute);
    }

    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Attribute> {
        self.0.get_mut(index)
    }

    pub fn last_mut(&mut self) -> Option<&mut Attribute> {
        self.0.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Attribute> {
        self.0.iter_mut()
    }

    /// Inserts at `index` (clamped to the list length) and renumbers.
    pub fn insert(&mut self, index: usize, attribute: Attribute) {
        let index = index.min(self.0.len());
        self.0.insert(index, attribute);
        self.reindex();
    }

    pub fn remove(&mut self, index: usize) -> Option<Attribute> {
        if index >= self.0.len() {
            return None;
        }
        let removed = self.0.remove(index);
        self.reindex();
        Some(removed)
    }

    pub fn retain_indices(&mut self, keep: impl Fn(usize) -> bool) {
        let kept = self
            .0
            .drain(..)
            .enumerate()
            .filter(|(index, _)| keep(*index))
            .map(|(_, attribute)| attribute)
            .collect();
        self.0 = kept;
        self.reindex();
    }

    fn reindex(&mut self) {
        for (index, attribute) in self.0.iter_mut().enumerate() {
            attribute.index = index;
        }
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for AttributeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let by_index = self
            .0
            .iter()
            .map(|attribute| (attribute.index, attribute))
            .collect::<BTreeMap<usize, &Attribute>>();
        by_index.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AttributeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let by_index = BTreeMap::<usize, Attribute>::deserialize(deserializer)?;
        let mut list = AttributeList::new();
        for (_, attribute) in by_index {
            list.push(attribute);
        }
        Ok(list)
    }
}
