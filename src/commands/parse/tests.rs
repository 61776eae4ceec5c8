use proptest::prelude::*;

use super::*;
use crate::model::{AttributeHint, EntityHint, TextRun};

fn lexicon() -> Lexicon {
    Lexicon::new().expect("lexicon builds")
}

fn paragraph(index: usize, style: &str, text: &str) -> Paragraph {
    Paragraph {
        index,
        style_name: style.to_string(),
        text: text.to_string(),
        runs: vec![TextRun {
            text: text.to_string(),
            bold: false,
        }],
    }
}

/// Paragraph whose first run (`lead`) is bold.
fn bold(index: usize, style: &str, lead: &str, rest: &str) -> Paragraph {
    let mut runs = vec![TextRun {
        text: lead.to_string(),
        bold: true,
    }];
    if !rest.is_empty() {
        runs.push(TextRun {
            text: rest.to_string(),
            bold: false,
        });
    }
    Paragraph {
        index,
        style_name: style.to_string(),
        text: format!("{lead}{rest}"),
        runs,
    }
}

fn heading(index: usize, text: &str) -> ContentBlock {
    ContentBlock::Paragraph(paragraph(index, "Heading 4", text))
}

fn table(number: usize, short_title: &str, heading: &[&str], rows: &[&[&str]]) -> Table {
    Table {
        doc_table_number: number,
        table_number: None,
        full_title: Some(format!("Table {number} - {short_title}")),
        short_title: Some(short_title.to_string()),
        num_columns: heading.len(),
        heading: heading.iter().map(|cell| cell.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| {
                heading
                    .iter()
                    .zip(row.iter())
                    .map(|(column, cell)| (column.to_string(), cell.to_string()))
                    .collect::<TableRow>()
            })
            .collect(),
    }
}

fn sized_attribute(name: &str, octets: i32, access: &[AttributeAccess]) -> Attribute {
    let mut attribute = Attribute::named(name);
    attribute.size = Some(AttributeSize::from_octets(octets));
    attribute.access = access.iter().copied().collect();
    attribute
}

fn onu_data_section() -> Section {
    Section {
        section_number: "9.1.3".to_string(),
        title: "ONU data".to_string(),
        style_name: "Heading 3".to_string(),
        contents: vec![
            ContentBlock::Paragraph(paragraph(
                100,
                "Normal",
                "This managed entity models the MIB itself.",
            )),
            heading(101, "Relationships"),
            ContentBlock::Paragraph(paragraph(
                102,
                "Normal",
                "One instance of this managed entity is contained in an ONU.",
            )),
            heading(103, "Attributes"),
            ContentBlock::Paragraph(bold(
                104,
                "Attribute",
                "Managed entity id:",
                " This attribute uniquely identifies each instance. (R) (mandatory) (2 bytes)",
            )),
            ContentBlock::Paragraph(bold(
                105,
                "Attribute",
                "MIB data sync:",
                " This attribute is used to check the alignment of the MIB. (R, W) (mandatory) (1 byte)",
            )),
            heading(106, "Actions"),
            ContentBlock::Paragraph(bold(
                107,
                "Attribute",
                "Get, set, get all alarms, get all alarms next, MIB reset, MIB upload, MIB upload next",
                "",
            )),
            heading(108, "Notifications"),
            ContentBlock::Paragraph(paragraph(109, "Normal", "None.")),
        ],
    }
}

fn class_id_document(rows: &[&[&str]]) -> PreParsedDocument {
    PreParsedDocument {
        versions: Vec::new(),
        sections: vec![
            Section {
                section_number: "11.2.4".to_string(),
                title: "Managed entity identifiers".to_string(),
                style_name: "Heading 3".to_string(),
                contents: vec![
                    ContentBlock::Paragraph(paragraph(1, "Normal", "Table 11.2.4-1")),
                    ContentBlock::Table(table(
                        1,
                        "Managed entity identifiers",
                        &["Managed entity class value", "Managed entity"],
                        rows,
                    )),
                ],
            },
            onu_data_section(),
        ],
    }
}

#[test]
fn decode_size_reads_common_forms() {
    let size = decode_size("25 bytes").expect("25 bytes decodes");
    assert_eq!(size.octets, Some(25));
    assert!(!size.getnext_required);

    let size = decode_size("1 byte").expect("1 byte decodes");
    assert_eq!(size.octets, Some(1));

    let size = decode_size("N bytes").expect("N bytes decodes");
    assert_eq!(size.octets, Some(0));
    assert!(size.getnext_required);

    let size = decode_size("2 bit").expect("2 bit decodes");
    assert_eq!(size.octets, None);
    assert_eq!(size.bits, Some(2));
    assert_eq!(size.derived_octets(), Some(1));

    let size = decode_size("N * 20 bytes").expect("row size decodes");
    assert_eq!(size.octets, Some(20));

    let size = decode_size("18N bytes").expect("multiplied size decodes");
    assert_eq!(size.octets, Some(18));

    let size = decode_size("M*N bytes").expect("unbounded size decodes");
    assert!(size.getnext_required);
}

#[test]
fn decode_size_rejects_non_sizes() {
    assert_eq!(decode_size("R, W"), None);
    assert_eq!(decode_size("mandatory"), None);
    assert_eq!(decode_size("4 bytes (note)"), None);
    assert_eq!(decode_size("see the bit map below"), None);
}

#[test]
fn paren_items_returns_group_contents_in_order() {
    let lexicon = lexicon();
    assert_eq!(
        lexicon.paren_items("Port id (R, W) (mandatory) (2 bytes"),
        vec!["R, W", "mandatory", "2 bytes"]
    );
    assert!(lexicon.paren_items("no groups").is_empty());
}

#[test]
fn attribute_name_scrubs_qualifiers_and_title_cases() {
    let lexicon = lexicon();
    assert_eq!(
        attribute_name("Managed entity id:", &lexicon),
        "Managed Entity Id"
    );
    assert_eq!(
        attribute_name("Operational state (note):", &lexicon),
        "Operational State"
    );
    assert_eq!(attribute_name("Total n umber of ports", &lexicon), "Total Number Of Ports");
    assert_eq!(attribute_name("Upstream/downstream", &lexicon), "Upstream_Downstream");
}

#[test]
fn attribute_name_repairs_document_typos() {
    let lexicon = lexicon();
    assert_eq!(
        attribute_name("Errored seconds SD threshold", &lexicon),
        "Errored Seconds Threshold"
    );
    assert_eq!(
        attribute_name("LOF \"leftr\" seconds", &lexicon),
        "Lof Leftr Seconds"
    );
    assert_eq!(attribute_name("Counter c_= 0", &lexicon), "Counter C0");
}

#[test]
fn starts_attribute_honours_paragraph_style() {
    assert!(starts_attribute(&bold(1, "Attribute", "Admin state:", " text")));
    assert!(!starts_attribute(&paragraph(2, "Attribute", "Admin state: text")));
    assert!(!starts_attribute(&bold(3, "Attribute list", "Value 1:", " text")));
    assert!(starts_attribute(&bold(
        4,
        "Attribute follower",
        "Time source:",
        " the clock source"
    )));
    assert!(!starts_attribute(&bold(
        5,
        "Attribute follower",
        "Value 0:",
        " disabled"
    )));
}

#[test]
fn create_attribute_flags_deprecated_names() {
    let lexicon = lexicon();
    let attribute = create_attribute(&bold(7, "Attribute", "Deprecated 1:", " not used"), &lexicon)
        .expect("bold attribute paragraph");
    assert_eq!(attribute.name, "Deprecated 1");
    assert!(attribute.deprecated);
    assert_eq!(attribute.description, vec![7]);
}

#[test]
fn decode_access_reads_keyword_lists() {
    let all = BTreeSet::from([
        AttributeAccess::Read,
        AttributeAccess::Write,
        AttributeAccess::SetByCreate,
    ]);
    assert_eq!(decode_access("R, W, Set-by-create", "x"), Some(all.clone()));
    assert_eq!(decode_access("RWSC", "x"), Some(all));
    assert_eq!(
        decode_access("R", "x"),
        Some(BTreeSet::from([AttributeAccess::Read]))
    );
    assert_eq!(decode_access("mandatory", "x"), None);
    assert_eq!(decode_access("2 bytes", "x"), None);
}

#[test]
fn conflicting_optional_flag_keeps_first_value() {
    let lexicon = lexicon();
    let p = bold(
        9,
        "Attribute",
        "Admin state:",
        " (mandatory) (optional) (R, W) (1 byte)",
    );
    let mut attribute = create_attribute(&p, &lexicon).expect("attribute");
    apply_attribute_settings(&mut attribute, &p, &lexicon);
    assert_eq!(attribute.optional, Some(false));
    assert_eq!(attribute.size.and_then(|size| size.octets), Some(1));
}

#[test]
fn conflicting_access_keeps_first_value() {
    let lexicon = lexicon();
    let first = bold(
        11,
        "Attribute",
        "Admin state:",
        " (mandatory) (R, W) (1 byte)",
    );
    let mut attribute = create_attribute(&first, &lexicon).expect("attribute");
    apply_attribute_settings(&mut attribute, &first, &lexicon);

    let restated = paragraph(12, "Attribute", "Restated here (mandatory) (R) (1 byte)");
    apply_attribute_settings(&mut attribute, &restated, &lexicon);
    assert_eq!(
        attribute.access,
        BTreeSet::from([AttributeAccess::Read, AttributeAccess::Write])
    );
    assert_eq!(attribute.description, vec![11, 12]);
}

#[test]
fn settings_need_three_groups() {
    let lexicon = lexicon();
    let p = bold(10, "Attribute", "Admin state:", " (R, W) (1 byte)");
    let mut attribute = create_attribute(&p, &lexicon).expect("attribute");
    apply_attribute_settings(&mut attribute, &p, &lexicon);
    assert!(attribute.access.is_empty());
    assert_eq!(attribute.size, None);
}

#[test]
fn decode_actions_reads_bold_keyword_list() {
    let lexicon = lexicon();
    let decoded = decode_actions(
        &bold(20, "Attribute", "Create, delete, get, set", ""),
        &lexicon,
    )
    .expect("actions decode");
    assert_eq!(
        decoded.mandatory,
        BTreeSet::from([Action::Create, Action::Delete, Action::Get, Action::Set])
    );
    assert!(decoded.optional.is_empty());
}

#[test]
fn decode_actions_rejects_partial_bold_list() {
    let lexicon = lexicon();
    assert_eq!(
        decode_actions(&bold(21, "Attribute", "Create, frobnicate", ""), &lexicon),
        None
    );
    assert_eq!(
        decode_actions(&bold(22, "Attribute", "Nothing here", ""), &lexicon),
        None
    );
}

#[test]
fn decode_actions_reads_plain_text_with_optional_markers() {
    let lexicon = lexicon();
    let decoded = decode_actions(
        &paragraph(23, "Attribute", "Get, get next (optional), set"),
        &lexicon,
    )
    .expect("actions decode");
    assert_eq!(decoded.mandatory, BTreeSet::from([Action::Get, Action::Set]));
    assert_eq!(decoded.optional, BTreeSet::from([Action::GetNext]));

    let decoded = decode_actions(
        &paragraph(24, "Attribute", "Get, set. Other text follows"),
        &lexicon,
    )
    .expect("leading actions decode");
    assert_eq!(decoded.mandatory, BTreeSet::from([Action::Get]));
}

#[test]
fn get_next_marks_table_attributes() {
    let mut entity = Entity::new(58, "Voice service profile");
    entity.attributes.push(Attribute::named("Managed Entity Id"));
    entity.attributes.push(Attribute::named("Tone Pattern Table"));
    entity.attributes.push(Attribute::named("Table"));

    apply_actions(
        &mut entity,
        DecodedActions {
            mandatory: BTreeSet::from([Action::Get, Action::GetNext]),
            optional: BTreeSet::new(),
        },
    );

    let types = entity
        .attributes
        .iter()
        .map(|attribute| attribute.attribute_type)
        .collect::<Vec<_>>();
    assert_eq!(
        types,
        vec![
            AttributeType::Unknown,
            AttributeType::Table,
            AttributeType::Unknown
        ]
    );
}

#[test]
fn alarm_table_skips_ranges_and_placeholders() {
    let alarms = table(
        5,
        "Alarm number",
        &["Number", "Alarm", "Description"],
        &[
            &["0", "Equipment alarm", "Functional failure on an internal interface"],
            &["1", "Reserved", ""],
            &["2..207", "Reserved", ""],
            &["208..223", "Vendor-specific", ""],
            &["", "", ""],
        ],
    );

    let Some(NotificationTable::Alarms(decoded)) = decode_alarm_table(&alarms) else {
        panic!("expected an alarm table");
    };
    assert_eq!(decoded.alarms.keys().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(decoded.alarms[&0].name, "Equipment alarm");
}

#[test]
fn alarm_table_rejects_duplicates() {
    let alarms = table(
        6,
        "Alarm number",
        &["Number", "Alarm", "Description"],
        &[&["3", "LOS", "a"], &["3", "LOF", "b"]],
    );
    assert_eq!(decode_alarm_table(&alarms), None);
}

#[test]
fn four_column_alarm_table_collapses_merged_cells() {
    let shifted = table(
        14,
        "Alarm number",
        &["Number", "Alarm", "Description", "0"],
        &[
            &["Equipment alarm", "Failure", "Failure", "1"],
            &["Powering alarm", "Lost power", "Lost power", ""],
        ],
    );

    let Some(NotificationTable::Alarms(decoded)) = decode_alarm_table(&shifted) else {
        panic!("expected an alarm table");
    };
    assert_eq!(decoded.alarms.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(decoded.alarms[&0].name, "Equipment alarm");
    assert_eq!(decoded.alarms[&1].description, "Lost power");
}

#[test]
fn four_column_alarm_table_with_short_row_is_rejected() {
    let mut broken = table(
        15,
        "Alarm number",
        &["Number", "Alarm", "Description", "0"],
        &[&["Equipment alarm", "Failure", "Failure", "1"]],
    );
    broken
        .rows
        .push(TableRow::from([("Alarm".to_string(), "2".to_string())]));

    assert_eq!(decode_alarm_table(&broken), None);
}

#[test]
fn threshold_column_selects_tca_decoding() {
    let alerts = table(
        7,
        "Threshold crossing alert",
        &[
            "Number",
            "Threshold crossing alert",
            "Threshold value attribute #",
        ],
        &[&["0", "Code violations", "1"], &["1", "Errored seconds", "2"]],
    );

    let Some(NotificationTable::ThresholdAlerts(decoded)) = decode_alarm_table(&alerts) else {
        panic!("expected a threshold crossing alert table");
    };
    assert_eq!(decoded.alerts.len(), 2);
    assert_eq!(decoded.alerts[&1].name, "Errored seconds");
    assert_eq!(decoded.alerts[&1].threshold, "2");
}

#[test]
fn avc_table_flags_numbered_attributes() {
    let avcs = table(
        8,
        "Attribute value change",
        &["Number", "Attribute value change", "Description"],
        &[
            &["1", "Admin state", "Administrative state changed"],
            &["2", "N/A", ""],
            &["3..16", "Reserved", ""],
        ],
    );

    let decoded = decode_avc_table(&avcs).expect("avc table decodes");
    assert!(decoded.has_avc(1));
    assert!(!decoded.has_avc(2));
    assert!(decoded.attributes.contains_key(&16));
    assert_eq!(decoded.avc_numbers().collect::<Vec<_>>(), vec![1]);

    let mut attributes = AttributeList::new();
    attributes.push(Attribute::named("Managed Entity Id"));
    attributes.push(Attribute::named("Admin State"));
    attributes.push(Attribute::named("Oper State"));
    apply_avc_flags(&mut attributes, &decoded);
    let flags = attributes
        .iter()
        .map(|attribute| attribute.avc)
        .collect::<Vec<_>>();
    assert_eq!(flags, vec![false, true, false]);
}

#[test]
fn avc_table_rejects_out_of_range_numbers() {
    let avcs = table(
        9,
        "Attribute value change",
        &["Number", "Attribute value change", "Description"],
        &[&["1", "Admin state", ""], &["17", "Too far", ""]],
    );
    assert_eq!(decode_avc_table(&avcs), None);

    let zero = table(
        10,
        "Attribute value change",
        &["Number", "Attribute value change", "Description"],
        &[&["0", "Managed entity id", ""]],
    );
    assert_eq!(decode_avc_table(&zero), None);
}

#[test]
fn normalize_collapses_repeated_merged_cells() {
    let merged = table(
        11,
        "Class values",
        &["Value", "Name"],
        &[&["x", "x"], &["y", "z"]],
    );

    let normalized = try_normalize_table(&merged, 2, MergePolicy::CollapseRepeats)
        .expect("merged table normalizes");
    assert_eq!(normalized.rows.len(), 2);
    assert_eq!(normalized.rows[0]["Value"], "x");
    assert_eq!(normalized.rows[0]["Name"], "y");
    assert_eq!(normalized.rows[1]["Value"], "z");
    assert_eq!(normalized.rows[1]["Name"], "");
}

#[test]
fn normalize_recovers_cells_spilled_into_heading() {
    let mut spilled = table(12, "Class values", &["Value", "Name", "2", "ONU data"], &[]);
    spilled.rows.push(TableRow::from([
        ("Value".to_string(), "5".to_string()),
        ("Name".to_string(), "Cardholder".to_string()),
    ]));

    let normalized =
        try_normalize_table(&spilled, 2, MergePolicy::Keep).expect("spilled table normalizes");
    assert_eq!(normalized.heading, vec!["Value", "Name"]);
    assert_eq!(normalized.num_columns, 2);
    assert_eq!(normalized.rows.len(), 2);
    assert_eq!(normalized.rows[0]["Name"], "ONU data");
    assert_eq!(normalized.rows[1]["Value"], "5");
}

#[test]
fn normalize_reports_short_heading() {
    let narrow = table(13, "Narrow", &["Value"], &[&["1"]]);
    let Err((partial, err)) = try_normalize_table(&narrow, 2, MergePolicy::Keep) else {
        panic!("expected a heading error");
    };
    assert_eq!(err, TableError::HeadingTooShort { found: 1, width: 2 });
    assert!(partial.rows.is_empty());
}

#[test]
fn wildcard_triggers_apply_from_every_state() {
    let states = [
        EntityState::Initial,
        EntityState::Description,
        EntityState::Relationships,
        EntityState::Attributes,
        EntityState::Actions,
        EntityState::Notifications,
        EntityState::Alarms,
        EntityState::Avcs,
        EntityState::Tests,
        EntityState::Complete,
        EntityState::Failure,
        EntityState::EndOfSection,
    ];
    for state in states {
        assert_eq!(transition(state, Trigger::Failure), EntityState::Failure);
        assert_eq!(transition(state, Trigger::Complete), EntityState::Complete);
        assert_eq!(
            transition(state, Trigger::EndOfSection),
            EntityState::EndOfSection
        );
    }

    assert_eq!(
        transition(EntityState::Initial, Trigger::Action),
        EntityState::Failure
    );
    assert_eq!(
        transition(EntityState::Avcs, Trigger::Alarm),
        EntityState::Alarms
    );
    assert_eq!(
        transition(EntityState::Alarms, Trigger::Test),
        EntityState::Tests
    );
}

#[test]
fn unmatched_tables_fail_late_notification_states() {
    let values = ContentBlock::Table(table(16, "Values", &["Value", "Meaning"], &[&["0", "off"]]));
    assert_eq!(classify(EntityState::Avcs, &values).trigger, Trigger::Failure);
    assert_eq!(classify(EntityState::Tests, &values).trigger, Trigger::Failure);
    assert_eq!(classify(EntityState::Alarms, &values).trigger, Trigger::Normal);

    let avcs = ContentBlock::Table(table(
        17,
        "Attribute value change",
        &["Number", "Attribute value change", "Description"],
        &[&["1", "Admin state", ""]],
    ));
    assert_eq!(classify(EntityState::Avcs, &avcs).trigger, Trigger::Normal);
    assert_eq!(classify(EntityState::Tests, &avcs).trigger, Trigger::Avc);
}

#[test]
fn single_attribute_section_completes() {
    let lexicon = lexicon();
    let section = Section {
        section_number: "9.99.1".to_string(),
        title: "Example".to_string(),
        style_name: "Heading 3".to_string(),
        contents: vec![
            heading(1, "Attributes"),
            ContentBlock::Paragraph(bold(
                2,
                "Attribute",
                "Foo Bar (mandatory) (r,w) (1 byte)",
                "",
            )),
            ContentBlock::Table(table(3, "Values", &["Value", "Meaning"], &[&["0", "off"]])),
        ],
    };

    let entity = extract_entity(Entity::new(999, "Example"), &section, &lexicon);
    assert_eq!(entity.state, EntityState::Complete);
    assert_eq!(entity.attributes.len(), 1);

    let attribute = entity.attributes.get(0).expect("attribute 0");
    assert_eq!(attribute.name, "Foo Bar");
    assert_eq!(attribute.optional, Some(false));
    assert_eq!(
        attribute.access,
        BTreeSet::from([AttributeAccess::Read, AttributeAccess::Write])
    );
    assert_eq!(
        attribute.size.as_ref().and_then(|size| size.octets),
        Some(1)
    );
}

#[test]
fn full_section_populates_entity() {
    let lexicon = lexicon();
    let entity = extract_entity(Entity::new(2, "ONU data"), &onu_data_section(), &lexicon);

    assert_eq!(entity.state, EntityState::Complete);
    assert_eq!(entity.description, vec![100]);
    assert_eq!(entity.relationships, vec![102]);
    assert_eq!(entity.attributes.len(), 2);
    assert_eq!(
        entity.attributes.get(1).map(|a| a.name.as_str()),
        Some("Mib Data Sync")
    );
    assert_eq!(entity.actions.len(), 7);
    assert!(entity.actions.contains(&Action::MibUploadNext));
}

#[test]
fn notification_tables_are_stored_once() {
    let lexicon = lexicon();
    let mut section = onu_data_section();
    let alarm_rows: &[&[&str]] = &[&["0", "Equipment alarm", "Failure"]];
    section.contents.extend([
        ContentBlock::Paragraph(paragraph(110, "Heading 5", "Alarm")),
        ContentBlock::Table(table(
            20,
            "Alarm number",
            &["Number", "Alarm", "Description"],
            alarm_rows,
        )),
        ContentBlock::Table(table(
            21,
            "Alarm number",
            &["Number", "Alarm", "Description"],
            &[&["1", "Powering alarm", "Second table"]],
        )),
        ContentBlock::Paragraph(paragraph(111, "Heading 5", "Attribute Value Change")),
        ContentBlock::Table(table(
            22,
            "Attribute value change",
            &["Number", "Attribute value change", "Description"],
            &[&["1", "MIB data sync", "Sync changed"]],
        )),
    ]);

    let entity = extract_entity(Entity::new(2, "ONU data"), &section, &lexicon);
    assert_eq!(entity.state, EntityState::Complete);

    let alarms = entity.alarms.as_ref().expect("alarm table stored");
    assert_eq!(alarms.alarms.keys().copied().collect::<Vec<_>>(), vec![0]);
    assert!(entity.avcs.as_ref().is_some_and(|avcs| avcs.has_avc(1)));
    assert!(entity.attributes.get(1).is_some_and(|a| a.avc));
}

#[test]
fn misplaced_block_fails_entity() {
    let lexicon = lexicon();
    let section = Section {
        section_number: "9.99.2".to_string(),
        title: "Broken".to_string(),
        style_name: "Heading 3".to_string(),
        contents: vec![
            ContentBlock::Table(table(30, "Stray", &["A"], &[&["1"]])),
            heading(31, "Attributes"),
        ],
    };

    let entity = extract_entity(Entity::new(998, "Broken"), &section, &lexicon);
    assert_eq!(entity.state, EntityState::Failure);
    assert!(entity.attributes.is_empty());
}

#[test]
fn attribute_text_before_any_attribute_fails() {
    let lexicon = lexicon();
    let section = Section {
        section_number: "9.99.3".to_string(),
        title: "Orphan".to_string(),
        style_name: "Heading 3".to_string(),
        contents: vec![
            heading(40, "Attributes"),
            ContentBlock::Paragraph(paragraph(41, "Attribute", "Orphaned text (R) (1 byte)")),
        ],
    };

    let entity = extract_entity(Entity::new(997, "Orphan"), &section, &lexicon);
    assert_eq!(entity.state, EntityState::Failure);
}

#[test]
fn end_of_section_heading_completes_entity() {
    let lexicon = lexicon();
    let mut section = onu_data_section();
    section.contents.extend([
        ContentBlock::Paragraph(paragraph(120, "Heading 4", "Vendor-specific use")),
        ContentBlock::Table(table(40, "Stray", &["A"], &[&["1"]])),
    ]);

    let entity = extract_entity(Entity::new(2, "ONU data"), &section, &lexicon);
    assert_eq!(entity.state, EntityState::Complete);
}

#[test]
fn read_class_ids_supplements_and_skips_rows() {
    let document = class_id_document(&[
        &["2", "ONU data"],
        &["5", "Cardholder (see note)"],
        &["1", "ONT-B-PON (deprecated)"],
        &["350..399", "Reserved for vendor-specific use"],
    ]);

    let entries = read_class_ids(&document, "11.2.4").expect("class ids decode");
    let ids = entries.iter().map(|entry| entry.class_id).collect::<Vec<_>>();
    assert_eq!(ids, vec![2, 5, 453, 454]);
    assert_eq!(entries[1].name, "Cardholder");
}

#[test]
fn read_class_ids_rejects_duplicates_and_missing_section() {
    let document = class_id_document(&[&["2", "ONU data"], &["2", "ONU data again"]]);
    assert!(read_class_ids(&document, "11.2.4").is_err());
    assert!(read_class_ids(&document, "11.2.5").is_err());
}

#[test]
fn read_class_ids_fails_on_unrecoverable_table() {
    let mut document = class_id_document(&[]);
    let mut wide = table(
        2,
        "Managed entity identifiers",
        &["Managed entity class value", "Managed entity", "Notes"],
        &[&["2", "ONU data", ""]],
    );
    wide.rows.push(TableRow::from([(
        "Managed entity".to_string(),
        "Cardholder".to_string(),
    )]));
    document.sections[0].contents[1] = ContentBlock::Table(wide);

    let err = read_class_ids(&document, "11.2.4").expect_err("malformed table is fatal");
    assert!(err.to_string().contains("cannot be normalized"));
}

#[test]
fn build_catalog_reports_classes_without_section() {
    let lexicon = lexicon();
    let document = class_id_document(&[&["2", "ONU data"], &["7", "Software image"]]);
    let entries = read_class_ids(&document, "11.2.4").expect("class ids decode");

    let BuiltCatalog {
        catalog,
        without_section,
    } = build_catalog(&document, entries.clone(), &[], &lexicon).expect("catalog builds");
    assert_eq!(catalog.class_ids(), vec![2]);
    assert_eq!(without_section, vec![7, 453, 454]);

    let onu = catalog.get(2).expect("ONU data extracted");
    assert_eq!(
        onu.section.as_ref().map(|section| section.number.as_str()),
        Some("9.1.3")
    );

    let selected = build_catalog(&document, entries, &[7], &lexicon).expect("catalog builds");
    assert!(selected.catalog.is_empty());
    assert_eq!(selected.without_section, vec![7]);
}

#[test]
fn inference_fills_unknown_types() {
    let mut catalog = Catalog::default();
    let mut pm = Entity::new(24, "Ethernet performance monitoring history data");
    pm.attributes
        .push(sized_attribute("Managed Entity Id", 2, &[AttributeAccess::Read]));
    pm.attributes
        .push(sized_attribute("Interval End Time", 1, &[AttributeAccess::Read]));
    pm.attributes
        .push(sized_attribute("Fcs Errors", 4, &[AttributeAccess::Read]));
    pm.attributes.push(sized_attribute(
        "Threshold Data Id",
        2,
        &[AttributeAccess::Read, AttributeAccess::Write],
    ));
    pm.attributes.push(sized_attribute(
        "Serial Number",
        8,
        &[AttributeAccess::Read, AttributeAccess::Write],
    ));
    pm.attributes.push(sized_attribute(
        "Password",
        10,
        &[AttributeAccess::Read, AttributeAccess::Write],
    ));
    pm.actions.insert(Action::Create);
    catalog.insert(pm).expect("insert pm");

    let mut onu = Entity::new(256, "ONU-G");
    onu.attributes.push(Attribute::named("Managed Entity Id"));
    onu.actions.insert(Action::Get);
    catalog.insert(onu).expect("insert onu");
    catalog
        .insert(Entity::new(7, "Software image"))
        .expect("insert image");

    infer_class_access(&mut catalog);
    infer_attribute_types(&mut catalog, &HintedTypes::new());

    let pm = catalog.get(24).expect("pm");
    assert_eq!(pm.access, ClassAccess::CreatedByOlt);
    let types = pm
        .attributes
        .iter()
        .map(|attribute| attribute.attribute_type)
        .collect::<Vec<_>>();
    assert_eq!(
        types,
        vec![
            AttributeType::Pointer,
            AttributeType::UnsignedInteger,
            AttributeType::Counter,
            AttributeType::UnsignedInteger,
            AttributeType::UnsignedInteger,
            AttributeType::Octets,
        ]
    );

    let onu = catalog.get(256).expect("onu");
    assert_eq!(onu.access, ClassAccess::CreatedByOnu);
    assert_eq!(
        onu.attributes.get(0).map(|a| a.attribute_type),
        Some(AttributeType::Unknown)
    );
    assert_eq!(
        catalog.get(7).map(|entity| entity.access),
        Some(ClassAccess::Unknown)
    );
}

#[test]
fn hinted_types_block_inference() {
    let mut catalog = Catalog::default();
    let mut entity = Entity::new(2, "ONU data");
    entity
        .attributes
        .push(sized_attribute("Managed Entity Id", 2, &[AttributeAccess::Read]));
    entity
        .attributes
        .push(sized_attribute("Mib Data Sync", 1, &[AttributeAccess::Read]));
    entity
        .attributes
        .push(sized_attribute("Spare", 1, &[AttributeAccess::Read]));
    catalog.insert(entity).expect("insert entity");

    let hints = HintsFile {
        managed_entities: vec![EntityHint {
            class_id: 2,
            name: None,
            attributes: vec![
                AttributeHint {
                    index: 1,
                    name: None,
                    attribute_type: Some(AttributeType::Unknown),
                    default: Some(serde_json::Value::from(0)),
                    constraint: Some("0..255".to_string()),
                },
                AttributeHint {
                    index: 9,
                    name: None,
                    attribute_type: Some(AttributeType::String),
                    default: None,
                    constraint: None,
                },
            ],
        }],
    };

    let hinted = apply_hints(&mut catalog, &hints);
    assert_eq!(hinted, HintedTypes::from([(2, 1)]));
    infer_attribute_types(&mut catalog, &hinted);

    let entity = catalog.get(2).expect("entity");
    let sync = entity.attributes.get(1).expect("attribute 1");
    assert_eq!(sync.attribute_type, AttributeType::Unknown);
    assert_eq!(sync.constraint.as_deref(), Some("0..255"));
    assert_eq!(
        entity.attributes.get(2).map(|a| a.attribute_type),
        Some(AttributeType::UnsignedInteger)
    );
}

#[test]
fn validation_demotes_incomplete_entities() {
    let mut catalog = Catalog::default();

    let mut good = Entity::new(2, "ONU data");
    good.state = EntityState::Complete;
    good.actions.insert(Action::Get);
    good.attributes
        .push(sized_attribute("Managed Entity Id", 2, &[AttributeAccess::Read]));
    catalog.insert(good).expect("insert good");

    let mut no_access = Entity::new(5, "Cardholder");
    no_access.state = EntityState::Complete;
    no_access.actions.insert(Action::Get);
    no_access
        .attributes
        .push(sized_attribute("Managed Entity Id", 2, &[]));
    catalog.insert(no_access).expect("insert cardholder");

    let mut zero = Entity::new(6, "Circuit pack");
    zero.state = EntityState::Complete;
    zero.attributes
        .push(sized_attribute("Managed Entity Id", 0, &[AttributeAccess::Read]));
    catalog.insert(zero).expect("insert circuit pack");

    let summary = validate_catalog(&mut catalog);
    assert_eq!(summary.entities, 3);
    assert_eq!(summary.complete, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.attributes_without_access, vec![5]);
    assert_eq!(summary.attributes_with_zero_size, vec![6]);
    assert_eq!(summary.no_actions, vec![6]);
    assert_eq!(
        catalog.get(5).map(|entity| entity.state),
        Some(EntityState::Failure)
    );
    assert_eq!(summary.issues.len(), 2);
}

#[test]
fn validation_counts_oversized_entities() {
    let mut catalog = Catalog::default();
    let mut wide = Entity::new(9, "Wide");
    wide.state = EntityState::Complete;
    wide.actions.insert(Action::Get);
    for index in 0..=MAX_ATTRIBUTES {
        wide.attributes.push(sized_attribute(
            &format!("Attribute {index}"),
            1,
            &[AttributeAccess::Read],
        ));
    }
    catalog.insert(wide).expect("insert wide");

    let summary = validate_catalog(&mut catalog);
    assert_eq!(summary.too_many_attributes, vec![9]);
    assert_eq!(summary.attributes, 0);
    assert_eq!(summary.failed, 1);
}

const SPLIT_OPS: &[PatchOp] = &[PatchOp::SplitAttribute {
    index: 1,
    first: "Upstream Rate",
    second: "Downstream Rate",
}];

const SPLIT: Patch = Patch {
    class_id: 9,
    label: "split-rates",
    requires: Requires::Exactly(2),
    ops: SPLIT_OPS,
};

#[test]
fn patch_applies_once() {
    let mut entity = Entity::new(9, "Rates");
    entity.attributes.push(Attribute::named("Managed Entity Id"));
    entity.attributes.push(Attribute::named("Rate"));

    assert!(apply_patch(&mut entity, &SPLIT, None));
    let names = entity
        .attributes
        .iter()
        .map(|attribute| attribute.name.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["Managed Entity Id", "Upstream Rate", "Downstream Rate"]
    );
    assert_eq!(entity.attributes.get(2).map(|a| a.index), Some(2));

    let before = entity.clone();
    assert!(!apply_patch(&mut entity, &SPLIT, None));
    assert_eq!(entity, before);
}

#[test]
fn patch_precondition_skips_unexpected_shapes() {
    let mut entity = Entity::new(9, "Rates");
    entity.attributes.push(Attribute::named("Managed Entity Id"));

    assert!(!apply_patch(&mut entity, &SPLIT, None));
    assert!(entity.corrections.is_empty());
    assert_eq!(entity.attributes.len(), 1);
}

#[test]
fn ipv6_table_patch_marks_get_next() {
    let mut entity = Entity::new(287, "IPv6 host config data");
    entity
        .attributes
        .push(sized_attribute("Managed Entity Id", 2, &[AttributeAccess::Read]));
    entity
        .attributes
        .push(sized_attribute("Ipv6 Address Table", 24, &[AttributeAccess::Read]));
    entity
        .attributes
        .push(sized_attribute("Ipv6 Table Size", 2, &[AttributeAccess::Read]));
    let mut catalog = Catalog::default();
    catalog.insert(entity).expect("insert entity");

    apply_patches(&mut catalog, PATCHES);
    let patched = catalog.get(287).expect("entity 287");
    let table = patched.attributes.get(1).and_then(|a| a.size.as_ref()).expect("size");
    assert!(table.getnext_required);
    assert_eq!(table.octets, Some(24));
    let size = patched.attributes.get(2).and_then(|a| a.size.as_ref()).expect("size");
    assert!(size.getnext_required);
    assert_eq!(size.octets, Some(1));
}

#[test]
fn patch_table_is_idempotent_and_copies_last() {
    let mut catalog = Catalog::default();
    catalog
        .insert(Entity::new(6, "Circuit pack"))
        .expect("insert 6");
    catalog
        .insert(Entity::new(58, "Voice service profile"))
        .expect("insert 58");
    catalog
        .insert(Entity::new(113, "TWDM channel PHY/LODS monitoring history data"))
        .expect("insert 113");

    let mut upstream = Entity::new(322, "Ethernet frame performance monitoring history data upstream");
    upstream.state = EntityState::Complete;
    upstream.actions.insert(Action::GetCurrentData);
    upstream
        .attributes
        .push(sized_attribute("Managed Entity Id", 2, &[AttributeAccess::Read]));
    catalog.insert(upstream).expect("insert 322");
    let mut downstream = Entity::new(
        321,
        "Ethernet frame performance monitoring history data downstream",
    );
    downstream.state = EntityState::Failure;
    catalog.insert(downstream).expect("insert 321");

    let applied = apply_patches(&mut catalog, PATCHES);
    assert_eq!(applied, 4);
    assert_eq!(
        catalog.get(6).map(|entity| entity.access),
        Some(ClassAccess::CreatedByOnu)
    );
    assert!(
        catalog
            .get(58)
            .is_some_and(|entity| entity.actions.contains(&Action::GetNext))
    );

    let copied = catalog.get(321).expect("321 present");
    assert_eq!(copied.state, EntityState::Complete);
    assert_eq!(copied.attributes.len(), 1);
    assert!(copied.actions.contains(&Action::GetCurrentData));
    assert!(copied.name.ends_with("downstream"));

    let snapshot = catalog.clone();
    assert_eq!(apply_patches(&mut catalog, PATCHES), 0);
    assert_eq!(catalog, snapshot);
}

const STYLES: &[&str] = &[
    "Normal",
    "Heading 4",
    "Heading 5",
    "Attribute",
    "Attribute follower",
    "Attribute list",
    "Description",
    "Note",
    "toc 1",
    "enumlev1",
    "Figure",
    "Figure_No",
    "Equation",
    "Title",
];

const TEXTS: &[&str] = &[
    "Relationships",
    "Attributes",
    "Actions",
    "Notifications",
    "Alarm",
    "Attribute Value Change",
    "Test Result",
    "Supplementary information",
    "Vendor-specific use",
    "Get, set",
    "Create, delete, get, set",
    "Managed entity id: (R) (mandatory) (2 bytes)",
    "Port table: (R) (optional) (N bytes)",
    "Value 0: (note) (R, W) (1 bit)",
    "None.",
    "",
    "Some descriptive text",
];

const TABLE_TITLES: &[&str] = &[
    "Alarm number",
    "Attribute value change",
    "Threshold crossing alert",
    "Code points",
];

fn block_strategy() -> impl Strategy<Value = ContentBlock> {
    let paragraphs = (
        0usize..500,
        prop::sample::select(STYLES.to_vec()),
        prop::sample::select(TEXTS.to_vec()),
        any::<bool>(),
    )
        .prop_map(|(index, style, text, bold_lead)| {
            ContentBlock::Paragraph(Paragraph {
                index,
                style_name: style.to_string(),
                text: text.to_string(),
                runs: vec![TextRun {
                    text: text.to_string(),
                    bold: bold_lead,
                }],
            })
        });
    let tables = (0usize..50, prop::sample::select(TABLE_TITLES.to_vec())).prop_map(
        |(number, title)| {
            ContentBlock::Table(table(
                number,
                title,
                &["Number", "Alarm", "Description"],
                &[&["0", "Equipment alarm", "Failure"], &["1", "LOS", ""]],
            ))
        },
    );
    prop_oneof![4 => paragraphs, 1 => tables]
}

proptest! {
    #[test]
    fn extraction_always_ends_terminal(blocks in prop::collection::vec(block_strategy(), 0..40)) {
        let lexicon = lexicon();
        let section = Section {
            section_number: "9.0.0".to_string(),
            title: "Generated".to_string(),
            style_name: "Heading 3".to_string(),
            contents: blocks.clone(),
        };

        let entity = extract_entity(Entity::new(1, "Generated"), &section, &lexicon);
        prop_assert!(entity.state.is_terminal());
        for (position, attribute) in entity.attributes.iter().enumerate() {
            prop_assert_eq!(attribute.index, position);
        }

        let mut extractor = EntityExtractor::new(Entity::new(1, "Generated"), &lexicon);
        let mut reached = None;
        for block in &blocks {
            extractor.feed(block);
            match reached {
                Some(terminal) => prop_assert_eq!(extractor.state(), terminal),
                None if extractor.state().is_terminal() => reached = Some(extractor.state()),
                None => {}
            }
        }
        prop_assert!(extractor.finish().state.is_terminal());
    }

    #[test]
    fn normalize_preserves_well_formed_rows(
        width in 1usize..5,
        cells in prop::collection::vec(prop::collection::vec("[a-z]{0,6}", 4), 1..8),
    ) {
        let heading = (0..width).map(|column| format!("Column {column}")).collect::<Vec<_>>();
        let rows = cells
            .iter()
            .map(|row| {
                heading
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<TableRow>()
            })
            .collect::<Vec<_>>();
        let original = Table {
            doc_table_number: 1,
            table_number: None,
            full_title: None,
            short_title: None,
            num_columns: width,
            heading: heading.clone(),
            rows: rows.clone(),
        };

        let normalized = try_normalize_table(&original, width, MergePolicy::Keep)
            .expect("well-formed table normalizes");
        prop_assert_eq!(normalized.heading, heading);
        prop_assert_eq!(normalized.rows, rows);
    }

    #[test]
    fn alarm_numbers_are_all_or_nothing(
        numbers in prop::collection::btree_set(0u8..=MAX_ALARM_NUMBER, 1..12),
        bad in 224i64..100_000,
        position in any::<prop::sample::Index>(),
    ) {
        let mut rows = numbers
            .iter()
            .map(|number| vec![number.to_string(), format!("Alarm {number}"), "text".to_string()])
            .collect::<Vec<_>>();
        let good = Table {
            doc_table_number: 2,
            table_number: None,
            full_title: None,
            short_title: Some("Alarm number".to_string()),
            num_columns: 3,
            heading: vec!["Number".to_string(), "Alarm".to_string(), "Description".to_string()],
            rows: rows.iter().map(|row| alarm_row(row)).collect(),
        };

        let Some(NotificationTable::Alarms(decoded)) = decode_alarm_table(&good) else {
            panic!("in-range alarm table rejected");
        };
        prop_assert_eq!(decoded.alarms.keys().copied().collect::<BTreeSet<_>>(), numbers);

        let at = position.index(rows.len() + 1);
        rows.insert(at, vec![bad.to_string(), "Out of range".to_string(), String::new()]);
        let bad_table = Table {
            rows: rows.iter().map(|row| alarm_row(row)).collect(),
            ..good
        };
        prop_assert_eq!(decode_alarm_table(&bad_table), None);
    }
}

fn alarm_row(cells: &[String]) -> TableRow {
    ["Number", "Alarm", "Description"]
        .iter()
        .map(|column| column.to_string())
        .zip(cells.iter().cloned())
        .collect()
}
