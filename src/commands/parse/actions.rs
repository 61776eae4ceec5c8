use super::*;

/// Actions decoded from one paragraph of the actions clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DecodedActions {
    pub(crate) mandatory: BTreeSet<Action>,
    pub(crate) optional: BTreeSet<Action>,
}

impl DecodedActions {
    fn contains(&self, action: Action) -> bool {
        self.mandatory.contains(&action) || self.optional.contains(&action)
    }
}

/// Decodes an actions paragraph. A bold paragraph is a mandatory keyword
/// list and must decode completely; plain text is read keyword by keyword
/// until the first word outside the vocabulary, with `(optional)` marking
/// optional actions.
pub(crate) fn decode_actions(paragraph: &Paragraph, lexicon: &Lexicon) -> Option<DecodedActions> {
    if paragraph.is_bold() {
        let text = ascii_only(&paragraph.bold_text());
        let decoded = text
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| (name.trim(), lexicon.action(name)))
            .collect::<Vec<_>>();

        if decoded.iter().all(|(_, action)| action.is_none()) {
            return None;
        }
        if let Some((unknown, _)) = decoded.iter().find(|(_, action)| action.is_none()) {
            warn!(
                paragraph = paragraph.index,
                keyword = %unknown,
                text = %text,
                "partially decoded mandatory action list rejected"
            );
            return None;
        }

        return Some(DecodedActions {
            mandatory: decoded.into_iter().filter_map(|(_, action)| action).collect(),
            optional: BTreeSet::new(),
        });
    }

    let text = paragraph.ascii_text();
    let mut decoded = DecodedActions::default();
    for name in text.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let keyword = lexicon.paren_group.replace_all(name, "");
        let Some(action) = lexicon.action(&keyword) else {
            break;
        };
        if name.to_lowercase().contains("optional") {
            decoded.optional.insert(action);
        } else {
            decoded.mandatory.insert(action);
        }
    }

    if decoded.mandatory.is_empty() && decoded.optional.is_empty() {
        return None;
    }
    Some(decoded)
}

/// Applies decoded actions to the entity. Attributes named "... table" can
/// only be read back with get-next, so decoding get-next types them.
pub(crate) fn apply_actions(entity: &mut Entity, decoded: DecodedActions) {
    let get_next = decoded.contains(Action::GetNext);
    entity.actions.extend(decoded.mandatory);
    entity.optional_actions.extend(decoded.optional);

    if get_next {
        mark_table_attributes(&mut entity.attributes);
    }
}

pub(crate) fn mark_table_attributes(attributes: &mut AttributeList) {
    for attribute in attributes.iter_mut() {
        let name = attribute.name.to_lowercase();
        if name.len() > "table".len()
            && name.ends_with("table")
            && attribute.attribute_type == AttributeType::Unknown
        {
            attribute.attribute_type = AttributeType::Table;
        }
    }
}
