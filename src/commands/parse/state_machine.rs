use super::*;

/// Total transition function. Pairs not listed move to `Failure`;
/// `EndOfSection`, `Complete` and `Failure` are accepted from every state.
pub(crate) fn transition(state: EntityState, trigger: Trigger) -> EntityState {
    use EntityState as S;

    match (state, trigger) {
        (_, Trigger::EndOfSection) => S::EndOfSection,
        (_, Trigger::Complete) => S::Complete,
        (_, Trigger::Failure) => S::Failure,

        (S::Initial, Trigger::Normal | Trigger::Description) => S::Description,
        (S::Description, Trigger::Normal) => S::Description,
        (S::Initial | S::Description, Trigger::Relationship) => S::Relationships,
        (S::Relationships, Trigger::Normal) => S::Relationships,
        (S::Initial | S::Description | S::Relationships, Trigger::Attribute) => S::Attributes,
        (S::Attributes, Trigger::Normal) => S::Attributes,
        (S::Attributes, Trigger::Action) => S::Actions,
        (S::Actions, Trigger::Normal) => S::Actions,
        (S::Actions, Trigger::Notification) => S::Notifications,
        (S::Notifications, Trigger::Normal) => S::Notifications,
        (S::Notifications | S::Avcs | S::Tests, Trigger::Alarm) => S::Alarms,
        (S::Alarms, Trigger::Normal) => S::Alarms,
        (S::Notifications | S::Alarms | S::Tests, Trigger::Avc) => S::Avcs,
        (S::Avcs, Trigger::Normal) => S::Avcs,
        (S::Notifications | S::Alarms | S::Avcs, Trigger::Test) => S::Tests,
        (S::Tests, Trigger::Normal) => S::Tests,

        _ => S::Failure,
    }
}

/// Replays one section's blocks through an entity's state machine.
pub(crate) struct EntityExtractor<'a> {
    entity: Entity,
    lexicon: &'a Lexicon,
}

impl<'a> EntityExtractor<'a> {
    pub(crate) fn new(entity: Entity, lexicon: &'a Lexicon) -> Self {
        Self { entity, lexicon }
    }

    pub(crate) fn state(&self) -> EntityState {
        self.entity.state
    }

    /// Consumes one block. Blocks arriving after the entity reached a
    /// terminal state are ignored.
    pub(crate) fn feed(&mut self, block: &ContentBlock) {
        let state = self.entity.state;
        if state.is_terminal() {
            return;
        }

        let classified = classify(state, block);
        let next = transition(state, classified.trigger);
        if next == EntityState::Failure {
            warn!(
                class_id = self.entity.class_id,
                state = state.as_str(),
                trigger = ?classified.trigger,
                block = %block.reference(),
                "content block not valid here"
            );
        }

        self.entity.state = next;
        if let Err(err) = self.enter(next, block, classified.text.as_deref()) {
            warn!(
                class_id = self.entity.class_id,
                state = next.as_str(),
                block = %block.reference(),
                error = %err,
                "extraction failed"
            );
            self.entity.state = EntityState::Failure;
        }
    }

    /// Ends the section, forcing `Complete` unless a terminal state was
    /// already reached.
    pub(crate) fn finish(mut self) -> Entity {
        if !self.entity.state.is_terminal() {
            self.entity.state = transition(self.entity.state, Trigger::Complete);
        }
        self.entity
    }

    fn enter(
        &mut self,
        state: EntityState,
        block: &ContentBlock,
        text: Option<&str>,
    ) -> Result<(), ExtractError> {
        let text = text.filter(|text| !text.is_empty());
        let entity = &mut self.entity;

        match (state, block) {
            (EntityState::Description, ContentBlock::Paragraph(paragraph)) => {
                if text.is_some() {
                    entity.description.push(paragraph.index);
                }
            }
            (EntityState::Relationships, ContentBlock::Paragraph(paragraph)) => {
                if text.is_some() {
                    entity.relationships.push(paragraph.index);
                }
            }
            (EntityState::Attributes, ContentBlock::Paragraph(paragraph)) => {
                if text.is_some() {
                    if let Some(attribute) = create_attribute(paragraph, self.lexicon) {
                        entity.attributes.push(attribute);
                    }
                    let last = entity
                        .attributes
                        .last_mut()
                        .ok_or(ExtractError::NoAttribute)?;
                    apply_attribute_settings(last, paragraph, self.lexicon);
                }
            }
            (EntityState::Attributes, ContentBlock::Table(table)) => {
                let last = entity
                    .attributes
                    .iter().last()
                    .ok_or(ExtractError::NoAttributesForTable { what: "attribute" })?;
                debug!(
                    class_id = entity.class_id,
                    attribute = %last.name,
                    table = table.doc_table_number,
                    "attribute value table skipped"
                );
            }
            (EntityState::Actions, ContentBlock::Paragraph(paragraph)) => {
                if text.is_some() {
                    if let Some(decoded) = decode_actions(paragraph, self.lexicon) {
                        apply_actions(entity, decoded);
                    }
                }
            }
            (EntityState::Notifications, ContentBlock::Paragraph(paragraph)) => {
                if let Some(text) = text {
                    if !text.to_lowercase().contains("none") {
                        debug!(
                            class_id = entity.class_id,
                            paragraph = paragraph.index,
                            "notification text"
                        );
                    }
                }
            }
            (EntityState::Alarms, ContentBlock::Table(table)) => {
                store_notification_table(entity, table);
            }
            (EntityState::Avcs, ContentBlock::Table(table)) => {
                if let Some(avcs) = decode_avc_table(table) {
                    if entity.avcs.is_some() {
                        warn!(
                            class_id = entity.class_id,
                            table = table.doc_table_number,
                            "second avc table ignored"
                        );
                    } else {
                        apply_avc_flags(&mut entity.attributes, &avcs);
                        entity.avcs = Some(avcs);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn store_notification_table(entity: &mut Entity, table: &Table) {
    if !matches!(
        TableKind::of(table),
        TableKind::Alarm | TableKind::ThresholdAlert
    ) {
        return;
    }

    match decode_alarm_table(table) {
        Some(NotificationTable::Alarms(alarms)) => {
            if entity.alarms.is_some() {
                warn!(
                    class_id = entity.class_id,
                    table = table.doc_table_number,
                    "second alarm table ignored"
                );
            } else {
                entity.alarms = Some(alarms);
            }
        }
        Some(NotificationTable::ThresholdAlerts(alerts)) => {
            if entity.tcas.is_some() {
                warn!(
                    class_id = entity.class_id,
                    table = table.doc_table_number,
                    "second threshold crossing alert table ignored"
                );
            } else {
                entity.tcas = Some(alerts);
            }
        }
        None => debug!(
            class_id = entity.class_id,
            table = table.doc_table_number,
            "no alarms decoded from table"
        ),
    }
}

/// Runs the state machine over every block of `section`.
pub(crate) fn extract_entity(entity: Entity, section: &Section, lexicon: &Lexicon) -> Entity {
    let mut extractor = EntityExtractor::new(entity, lexicon);
    for block in &section.contents {
        extractor.feed(block);
        if extractor.state() == EntityState::Failure {
            break;
        }
    }
    extractor.finish()
}
