use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::catalog::{
    Action, AlarmEntry, AlarmTable, Attribute, AttributeAccess, AttributeList, AttributeSize,
    AttributeType, AvcEntry, AvcTable, Catalog, ClassAccess, ClassId, Entity, EntityState,
    MAX_ALARM_NUMBER, MAX_AVC_NUMBER, MIN_AVC_NUMBER, SectionRef, ThresholdAlert,
    ThresholdAlertTable, UNBOUNDED_OCTETS,
};
use crate::cli::ParseArgs;
use crate::model::{
    ClassIssue, ContentBlock, HintsFile, Paragraph, ParseRunSummary, PreParsedDocument, Section,
    Table, TableRow, VersionHeading,
};
use crate::util::{
    ascii_no_control, ascii_only, collapse_whitespace, now_utc_string, read_json, sha256_file,
    title_case, write_json_pretty,
};

mod actions;
mod alarms;
mod attributes;
mod avc;
mod class_id;
mod classifier;
mod errors;
mod hints;
mod inference;
mod lexicon;
mod patches;
mod run;
mod size;
mod state_machine;
mod table_normalize;
#[cfg(test)]
mod tests;
mod validation;

pub use run::run;

use actions::*;
use alarms::*;
use attributes::*;
use avc::*;
use class_id::*;
use classifier::*;
use errors::*;
use hints::*;
use inference::*;
use lexicon::*;
use patches::*;
use run::*;
use size::*;
use state_machine::*;
use table_normalize::*;
use validation::*;
