use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{AttributeType, ClassId};
use crate::util::ascii_only;

/// Provenance of one processing stage (pre-parser, parser, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionHeading {
    pub name: String,
    pub version: String,
    pub create_time: String,
    pub document: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PreParsedDocument {
    #[serde(default)]
    pub versions: Vec<VersionHeading>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl PreParsedDocument {
    pub fn find_section(&self, section_number: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.section_number == section_number)
    }

    /// Finds a section by title ignoring case and spaces, falling back to the
    /// alias table for titles the class-id table abbreviates.
    pub fn find_section_by_name(&self, name: &str) -> Option<&Section> {
        let wanted = squash_title(name);
        if let Some(section) = self
            .sections
            .iter()
            .find(|section| squash_title(&section.title) == wanted)
        {
            return Some(section);
        }

        let alias = SECTION_ALIASES
            .iter()
            .find(|(short, _)| short.eq_ignore_ascii_case(name.trim()))
            .map(|(_, full)| squash_title(full))?;
        self.sections
            .iter()
            .find(|section| squash_title(&section.title) == alias)
    }
}

const SECTION_ALIASES: &[(&str, &str)] = &[(
    "fec performance monitoring history data",
    "Forward error correction performance monitoring history data",
)];

fn squash_title(title: &str) -> String {
    title.replace(' ', "").to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Section {
    pub section_number: String,
    pub title: String,
    #[serde(default)]
    pub style_name: String,
    #[serde(default)]
    pub contents: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph(Paragraph),
    Table(Table),
}

impl ContentBlock {
    /// Short reference used when reporting a failing block.
    pub fn reference(&self) -> String {
        match self {
            ContentBlock::Paragraph(paragraph) => format!("paragraph {}", paragraph.index),
            ContentBlock::Table(table) => format!("table {}", table.doc_table_number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub index: usize,
    pub style_name: String,
    pub text: String,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    pub fn is_bold(&self) -> bool {
        self.runs.first().map(|run| run.bold).unwrap_or(false)
    }

    pub fn bold_text(&self) -> String {
        self.runs
            .iter()
            .filter(|run| run.bold)
            .map(|run| run.text.trim())
            .collect::<Vec<&str>>()
            .join(" ")
    }

    pub fn ascii_text(&self) -> String {
        ascii_only(&self.text)
    }
}

pub type TableRow = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Table {
    pub doc_table_number: usize,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub full_title: Option<String>,
    #[serde(default)]
    pub short_title: Option<String>,
    pub num_columns: usize,
    #[serde(default)]
    pub heading: Vec<String>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn title(&self) -> &str {
        self.full_title.as_deref().unwrap_or_default()
    }

    pub fn short_title_lower(&self) -> String {
        self.short_title.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Cell lookup that tolerates absent columns.
    pub fn cell<'a>(row: &'a TableRow, column: &str) -> Option<&'a str> {
        row.get(column).map(String::as_str)
    }
}

/// Externally curated attribute values, keyed by class id and attribute
/// index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HintsFile {
    #[serde(default)]
    pub managed_entities: Vec<EntityHint>,
}

impl HintsFile {
    pub fn entity(&self, class_id: ClassId) -> Option<&EntityHint> {
        self.managed_entities
            .iter()
            .find(|hint| hint.class_id == class_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHint {
    pub class_id: ClassId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeHint>,
}

impl EntityHint {
    pub fn attribute(&self, index: usize) -> Option<&AttributeHint> {
        self.attributes.iter().find(|hint| hint.index == index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeHint {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<AttributeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
}

/// Aggregate outcome of one `parse` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParseRunSummary {
    pub generated_at: String,
    pub input: String,
    pub entities: usize,
    pub complete: usize,
    pub failed: usize,
    pub attributes: usize,
    pub without_section: Vec<ClassId>,
    pub incomplete: Vec<ClassId>,
    pub no_actions: Vec<ClassId>,
    pub no_attributes: Vec<ClassId>,
    pub too_many_attributes: Vec<ClassId>,
    pub attributes_without_access: Vec<ClassId>,
    pub attributes_without_size: Vec<ClassId>,
    pub attributes_with_zero_size: Vec<ClassId>,
    pub issues: Vec<ClassIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassIssue {
    pub class_id: ClassId,
    pub name: String,
    pub issues: Vec<String>,
}
