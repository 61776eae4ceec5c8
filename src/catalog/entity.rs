use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::attribute::AttributeList;
use super::notification::{AlarmTable, AvcTable, ThresholdAlertTable};

pub type ClassId = u16;

/// Who creates instances of the managed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassAccess {
    #[default]
    Unknown,
    CreatedByOnu,
    CreatedByOlt,
    CreatedByBoth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    #[default]
    Initial,
    Description,
    Relationships,
    Attributes,
    Actions,
    Notifications,
    Alarms,
    Avcs,
    Tests,
    Complete,
    Failure,
    EndOfSection,
}

impl EntityState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failure)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Description => "description",
            Self::Relationships => "relationships",
            Self::Attributes => "attributes",
            Self::Actions => "actions",
            Self::Notifications => "notifications",
            Self::Alarms => "alarms",
            Self::Avcs => "avcs",
            Self::Tests => "tests",
            Self::Complete => "complete",
            Self::Failure => "failure",
            Self::EndOfSection => "end_of_section",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRef {
    pub number: String,
    pub title: String,
}

/// One managed entity class of the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub class_id: ClassId,
    pub name: String,
    pub section: Option<SectionRef>,
    #[serde(default)]
    pub description: Vec<usize>,
    #[serde(default)]
    pub relationships: Vec<usize>,
    #[serde(default)]
    pub access: ClassAccess,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub actions: BTreeSet<Action>,
    #[serde(default)]
    pub optional_actions: BTreeSet<Action>,
    #[serde(default)]
    pub attributes: AttributeList,
    #[serde(default)]
    pub alarms: Option<AlarmTable>,
    #[serde(default)]
    pub tcas: Option<ThresholdAlertTable>,
    #[serde(default)]
    pub avcs: Option<AvcTable>,
    #[serde(default)]
    pub state: EntityState,
    /// Manual corrections already applied, by label.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub corrections: BTreeSet<String>,
}

impl Entity {
    pub fn new(class_id: ClassId, name: impl Into<String>) -> Self {
        Self {
            class_id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == EntityState::Complete
    }

    /// Demotes the entity after a post-extraction check fails.
    pub fn mark_failed(&mut self) {
        self.state = EntityState::Failure;
    }
}
