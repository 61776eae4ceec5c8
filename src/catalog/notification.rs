use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MAX_ALARM_NUMBER: u8 = 223;
pub const MIN_AVC_NUMBER: u8 = 1;
pub const MAX_AVC_NUMBER: u8 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEntry {
    pub name: String,
    pub description: String,
}

/// Defined alarms keyed by alarm number (0..=223).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlarmTable {
    pub alarms: BTreeMap<u8, AlarmEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdAlert {
    pub name: String,
    pub threshold: String,
}

/// Threshold crossing alerts keyed by alarm number (0..=223).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThresholdAlertTable {
    pub alerts: BTreeMap<u8, ThresholdAlert>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvcEntry {
    pub avc: bool,
    pub name: String,
    pub description: String,
}

/// Attribute value change capability keyed by attribute number. Attribute 0
/// (the entity id) never raises an AVC.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvcTable {
    pub attributes: BTreeMap<u8, AvcEntry>,
}

impl AvcTable {
    pub fn has_avc(&self, number: u8) -> bool {
        self.attributes
            .get(&number)
            .map(|entry| entry.avc)
            .unwrap_or(false)
    }

    pub fn avc_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.attributes
            .iter()
            .filter(|(_, entry)| entry.avc)
            .map(|(number, _)| *number)
    }
}
