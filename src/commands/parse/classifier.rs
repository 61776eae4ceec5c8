use super::*;

const DESCRIPTION_STYLES: &[&str] = &["Normal", "Note", "Equation"];
const RELATIONSHIP_STYLES: &[&str] = &["Description", "Relations"];
const ATTRIBUTE_STYLES: &[&str] = &["Attribute", "attribute", "Normal", "Note"];
const ACTION_STYLES: &[&str] = &["Attribute", "toc"];
const NOTIFICATION_STYLES: &[&str] = &["Attribute", "Normal", "Description", "toc"];
const AVC_STYLES: &[&str] = &["Attribute"];
const ALARM_STYLES: &[&str] = &["Attribute", "Note", "Normal"];
const TEST_STYLES: &[&str] = &["Attribute"];

/// Heading paragraphs that introduce content the extractor skips.
const IGNORED_HEADING_PREFIXES: &[&str] = &["fundamental ", "todo - abc"];
/// Heading paragraphs after which nothing in the section describes the entity.
const END_HEADING_PREFIXES: &[&str] = &["vendor-speci", "supplementar"];
const END_NORMAL_PREFIXES: &[&str] = &["supplementar", "table 9.3.13"];

/// Heading-styled paragraphs that are really description text.
const DESCRIPTION_HEADINGS: &[&str] = &["Multicast interworking GEM ", "Discovery of multicast "];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Trigger {
    Normal,
    Description,
    Relationship,
    Attribute,
    Action,
    Notification,
    Alarm,
    Avc,
    Test,
    EndOfSection,
    Complete,
    Failure,
}

/// Classifier verdict for one block: the trigger plus the block's text when
/// the receiving state should act on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Classified {
    pub(crate) trigger: Trigger,
    pub(crate) text: Option<String>,
}

impl Classified {
    fn bare(trigger: Trigger) -> Self {
        Self {
            trigger,
            text: None,
        }
    }

    fn with_text(trigger: Trigger, paragraph: &Paragraph) -> Self {
        Self {
            trigger,
            text: Some(paragraph.ascii_text().trim().to_string()),
        }
    }
}

/// Classifies `block` for an entity currently in `state`. Depends only on the
/// block and the state.
pub(crate) fn classify(state: EntityState, block: &ContentBlock) -> Classified {
    match block {
        ContentBlock::Paragraph(paragraph) => classify_paragraph(state, paragraph),
        ContentBlock::Table(table) => classify_table(state, table),
    }
}

fn classify_paragraph(state: EntityState, p: &Paragraph) -> Classified {
    match state {
        EntityState::Initial => {
            if is_relationships_heading(p) {
                Classified::bare(Trigger::Relationship)
            } else if is_attributes_heading(p) {
                Classified::bare(Trigger::Attribute)
            } else if has_style(p, DESCRIPTION_STYLES) {
                Classified::with_text(Trigger::Description, p)
            } else if is_normal(p) {
                Classified::with_text(Trigger::Normal, p)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::Description => {
            if is_relationships_heading(p) {
                Classified::bare(Trigger::Relationship)
            } else if is_attributes_heading(p) {
                Classified::bare(Trigger::Attribute)
            } else if is_description_text(p) || is_ignored_heading(p) || is_enumeration(p) {
                Classified::with_text(Trigger::Normal, p)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::Relationships => {
            if is_attributes_heading(p) {
                Classified::bare(Trigger::Attribute)
            } else if is_relationships_text(p) || is_figure(p) || is_figure_title(p) {
                Classified::with_text(Trigger::Normal, p)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::Attributes => {
            if is_actions_heading(p) {
                Classified::bare(Trigger::Action)
            } else if is_attribute_text(p) {
                Classified::with_text(Trigger::Normal, p)
            } else if is_normal(p) || is_figure(p) || is_figure_title(p) {
                Classified::bare(Trigger::Normal)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::Actions => {
            if is_notifications_heading(p) {
                Classified::bare(Trigger::Notification)
            } else if !is_actions_heading(p) && has_style(p, ACTION_STYLES) {
                Classified::with_text(Trigger::Normal, p)
            } else if is_normal(p) {
                Classified::bare(Trigger::Normal)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::Notifications => {
            if is_avc_heading(p) {
                Classified::bare(Trigger::Avc)
            } else if is_alarm_heading(p) {
                Classified::with_text(Trigger::Alarm, p)
            } else if is_test_heading(p) {
                Classified::bare(Trigger::Test)
            } else if is_end_of_section(p) {
                Classified::bare(Trigger::EndOfSection)
            } else if !is_notifications_heading(p) && has_style(p, NOTIFICATION_STYLES) {
                Classified::with_text(Trigger::Normal, p)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::Alarms => {
            if is_avc_heading(p) {
                Classified::bare(Trigger::Avc)
            } else if is_test_heading(p) {
                Classified::bare(Trigger::Test)
            } else if is_end_of_section(p) {
                Classified::bare(Trigger::EndOfSection)
            } else if !is_alarm_heading(p) && is_alarm_text_style(p) {
                Classified::with_text(Trigger::Normal, p)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::Avcs => {
            if is_alarm_heading(p) {
                Classified::bare(Trigger::Alarm)
            } else if is_test_heading(p) {
                Classified::bare(Trigger::Test)
            } else if is_end_of_section(p) {
                Classified::bare(Trigger::EndOfSection)
            } else if (!is_avc_heading(p) && has_style(p, AVC_STYLES))
                || is_normal(p)
                || is_enumeration(p)
                || is_ignored_heading(p)
            {
                Classified::with_text(Trigger::Normal, p)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::Tests => {
            if is_avc_heading(p) {
                Classified::bare(Trigger::Avc)
            } else if is_alarm_heading(p) {
                Classified::bare(Trigger::Alarm)
            } else if is_end_of_section(p) {
                Classified::bare(Trigger::EndOfSection)
            } else if !is_test_heading(p) && has_style(p, TEST_STYLES) {
                Classified::with_text(Trigger::Normal, p)
            } else {
                Classified::bare(Trigger::Failure)
            }
        }
        EntityState::EndOfSection => Classified::bare(Trigger::EndOfSection),
        EntityState::Complete => Classified::bare(Trigger::Complete),
        EntityState::Failure => Classified::bare(Trigger::Failure),
    }
}

fn classify_table(state: EntityState, table: &Table) -> Classified {
    let kind = TableKind::of(table);
    let trigger = match state {
        EntityState::Initial | EntityState::Relationships => Trigger::Failure,
        EntityState::Description | EntityState::Attributes | EntityState::Actions => Trigger::Normal,
        EntityState::Notifications => match kind {
            TableKind::Avc => Trigger::Avc,
            TableKind::Alarm | TableKind::ThresholdAlert => Trigger::Alarm,
            TableKind::Other => Trigger::Normal,
        },
        EntityState::Alarms => match kind {
            TableKind::Avc => Trigger::Avc,
            _ => Trigger::Normal,
        },
        EntityState::Avcs => match kind {
            TableKind::Avc => Trigger::Normal,
            TableKind::Alarm | TableKind::ThresholdAlert => Trigger::Alarm,
            TableKind::Other => Trigger::Failure,
        },
        EntityState::Tests => match kind {
            TableKind::Avc => Trigger::Avc,
            TableKind::Alarm | TableKind::ThresholdAlert => Trigger::Alarm,
            TableKind::Other => Trigger::Failure,
        },
        EntityState::EndOfSection => Trigger::EndOfSection,
        EntityState::Complete => Trigger::Complete,
        EntityState::Failure => Trigger::Failure,
    };
    Classified::bare(trigger)
}

/// Notification table families, recognized by the short table title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableKind {
    Avc,
    Alarm,
    ThresholdAlert,
    Other,
}

impl TableKind {
    pub(crate) fn of(table: &Table) -> Self {
        let title = table.short_title_lower();
        if title.starts_with("attribute value change") {
            Self::Avc
        } else if title.starts_with("alarm") {
            Self::Alarm
        } else if title.starts_with("threshold crossing alert") {
            Self::ThresholdAlert
        } else {
            Self::Other
        }
    }
}

fn has_style(p: &Paragraph, prefixes: &[&str]) -> bool {
    prefixes
        .iter()
        .any(|prefix| p.style_name.starts_with(prefix))
}

fn is_heading_style(p: &Paragraph) -> bool {
    p.style_name.to_lowercase().starts_with("heading")
}

fn is_normal(p: &Paragraph) -> bool {
    has_style(p, &["Normal"])
}

fn is_enumeration(p: &Paragraph) -> bool {
    has_style(p, &["enumlev"])
}

fn is_figure_title(p: &Paragraph) -> bool {
    has_style(p, &["Figure_", "Table_"])
}

fn is_figure(p: &Paragraph) -> bool {
    has_style(p, &["Figure"]) && !is_figure_title(p)
}

fn is_alarm_text_style(p: &Paragraph) -> bool {
    has_style(p, ALARM_STYLES) || has_style(p, &["figure"]) || is_figure(p) || is_figure_title(p)
}

fn lead_text(p: &Paragraph, length: usize) -> String {
    p.ascii_text()
        .chars()
        .take(length)
        .collect::<String>()
        .to_lowercase()
}

fn heading_text_is(p: &Paragraph, title: &str) -> bool {
    p.ascii_text().trim() == title
}

fn is_relationships_heading(p: &Paragraph) -> bool {
    heading_text_is(p, "Relationships")
        && (is_heading_style(p) || has_style(p, &["Relationships", "Normal"]))
}

fn is_attributes_heading(p: &Paragraph) -> bool {
    heading_text_is(p, "Attributes") && (is_heading_style(p) || has_style(p, &["Relationships"]))
}

fn is_actions_heading(p: &Paragraph) -> bool {
    heading_text_is(p, "Actions")
        && (is_heading_style(p) || has_style(p, &["Normal", "Relationships", "Attribute"]))
}

fn is_notifications_heading(p: &Paragraph) -> bool {
    heading_text_is(p, "Notifications")
        && (is_heading_style(p) || has_style(p, &["Normal", "Relationships"]))
}

fn is_avc_heading(p: &Paragraph) -> bool {
    heading_text_is(p, "Attribute Value Change") && is_heading_style(p)
}

fn is_alarm_heading(p: &Paragraph) -> bool {
    heading_text_is(p, "Alarm") && is_heading_style(p)
}

fn is_test_heading(p: &Paragraph) -> bool {
    heading_text_is(p, "Test Result") && is_heading_style(p)
}

pub(crate) fn is_ignored_heading(p: &Paragraph) -> bool {
    if !has_style(p, &["Heading"]) {
        return false;
    }
    let lead = lead_text(p, 12);
    IGNORED_HEADING_PREFIXES
        .iter()
        .any(|prefix| lead.contains(prefix))
}

pub(crate) fn is_end_of_section(p: &Paragraph) -> bool {
    let lead = lead_text(p, 12);
    if has_style(p, &["Heading"]) {
        return END_HEADING_PREFIXES.iter().any(|prefix| lead.contains(prefix));
    }
    if is_normal(p) {
        return END_NORMAL_PREFIXES.iter().any(|prefix| lead.contains(prefix));
    }
    false
}

fn is_description_text(p: &Paragraph) -> bool {
    has_style(p, DESCRIPTION_STYLES)
        || has_style(p, &["Attribute follower"])
        || (is_heading_style(p) && DESCRIPTION_HEADINGS.iter().any(|text| p.text.contains(text)))
}

fn is_relationships_text(p: &Paragraph) -> bool {
    !is_relationships_heading(p)
        && (has_style(p, RELATIONSHIP_STYLES) || has_style(p, ATTRIBUTE_STYLES))
}

fn is_attribute_text(p: &Paragraph) -> bool {
    !is_attributes_heading(p)
        && (has_style(p, ATTRIBUTE_STYLES)
            || is_enumeration(p)
            || has_style(p, &["toc"])
            || (is_heading_style(p) && p.text.contains("Value\tINPmin")))
}
