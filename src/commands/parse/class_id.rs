use super::*;

/// Rows the 2017 edition of the class-id table omits.
const MISSING_CLASS_IDS: &[(ClassId, &str)] = &[
    (453, "Enhanced FEC performance monitoring history data"),
    (454, "Enhanced TC performance monitoring history data"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassIdEntry {
    pub(crate) class_id: ClassId,
    pub(crate) name: String,
}

/// Reads the managed entity class table from `section_number`. Range
/// statements and deprecated classes are skipped; a duplicate class id is an
/// error.
pub(crate) fn read_class_ids(
    document: &PreParsedDocument,
    section_number: &str,
) -> Result<Vec<ClassIdEntry>> {
    let section = document
        .find_section(section_number)
        .with_context(|| format!("class-id section {section_number} not found"))?;
    let table = section
        .contents
        .iter()
        .find_map(|block| match block {
            ContentBlock::Table(table) => Some(table),
            ContentBlock::Paragraph(_) => None,
        })
        .with_context(|| format!("class-id section {section_number} has no table"))?;

    let mut table = if table.num_columns == 2 {
        table.clone()
    } else {
        try_normalize_table(table, 2, MergePolicy::Keep).map_err(|(partial, err)| {
            anyhow!(
                "class-id table {} cannot be normalized to 2 columns ({} rows recovered): {err}",
                partial.doc_table_number,
                partial.rows.len()
            )
        })?
    };
    if table.heading.len() < 2 {
        bail!(
            "class-id table {} has {} heading cells, expected 2",
            table.doc_table_number,
            table.heading.len()
        );
    }
    let id_column = table.heading[0].clone();
    let name_column = table.heading[1].clone();

    for (class_id, name) in MISSING_CLASS_IDS {
        let present = table.rows.iter().any(|row| {
            Table::cell(row, &id_column).and_then(|cell| cell.trim().parse::<ClassId>().ok())
                == Some(*class_id)
        });
        if !present {
            debug!(class_id, name, "adding class id missing from table");
            table.rows.push(TableRow::from([
                (id_column.clone(), class_id.to_string()),
                (name_column.clone(), (*name).to_string()),
            ]));
        }
    }

    let mut seen = BTreeSet::new();
    let mut entries = Vec::new();
    for row in &table.rows {
        let Some(class_id) = Table::cell(row, &id_column)
            .and_then(|cell| ascii_only(cell).trim().parse::<ClassId>().ok())
        else {
            continue;
        };
        let Some(name) = Table::cell(row, &name_column) else {
            continue;
        };
        let name = ascii_no_control(name);
        if name.to_lowercase().contains("deprecated") {
            continue;
        }

        if !seen.insert(class_id) {
            bail!("class id {class_id} appears twice in table {}", table.doc_table_number);
        }
        entries.push(ClassIdEntry {
            class_id,
            name: clean_class_name(&name),
        });
    }

    info!(
        section = %section_number,
        table = table.doc_table_number,
        class_ids = entries.len(),
        "class-id table decoded"
    );
    Ok(entries)
}

fn clean_class_name(name: &str) -> String {
    let head = name.split('(').next().unwrap_or_default();
    collapse_whitespace(head)
}

/// Binds class-id rows to their document sections by title.
pub(crate) fn bind_sections<'d>(
    document: &'d PreParsedDocument,
    entries: Vec<ClassIdEntry>,
) -> Vec<(Entity, Option<&'d Section>)> {
    entries
        .into_iter()
        .map(|entry| {
            let section = document.find_section_by_name(&entry.name);
            let mut entity = Entity::new(entry.class_id, entry.name);
            entity.section = section.map(|section| SectionRef {
                number: section.section_number.clone(),
                title: section.title.clone(),
            });
            (entity, section)
        })
        .collect()
}
