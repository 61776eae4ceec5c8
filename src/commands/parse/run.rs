use super::*;

const PARSER_NAME: &str = "g988-catalog";

pub fn run(args: ParseArgs) -> Result<()> {
    info!(input = %args.input.display(), "loading pre-parsed document");
    let document: PreParsedDocument = read_json(&args.input)?;
    let document_hash = sha256_file(&args.input)?;
    let lexicon = Lexicon::new()?;

    let hints = match &args.hints {
        Some(path) => {
            let hints: HintsFile = read_json(path)?;
            info!(
                path = %path.display(),
                entities = hints.managed_entities.len(),
                "loaded attribute hints"
            );
            Some(hints)
        }
        None => None,
    };

    let entries = read_class_ids(&document, &args.class_id_section)?;
    let BuiltCatalog {
        mut catalog,
        without_section,
    } = build_catalog(&document, entries, &args.class_ids, &lexicon)?;

    let applied = apply_patches(&mut catalog, PATCHES);
    info!(applied, "manual corrections applied");

    infer_class_access(&mut catalog);
    let hinted = hints
        .as_ref()
        .map(|hints| apply_hints(&mut catalog, hints))
        .unwrap_or_default();
    infer_attribute_types(&mut catalog, &hinted);

    let mut summary = validate_catalog(&mut catalog);
    summary.generated_at = now_utc_string();
    summary.input = args.input.display().to_string();
    summary.without_section = without_section;

    catalog.versions = document.versions.clone();
    catalog.versions.push(VersionHeading {
        name: PARSER_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        create_time: now_utc_string(),
        document: args.input.display().to_string(),
        sha256: document_hash,
    });

    write_json_pretty(&args.output, &catalog)?;
    verify_round_trip(&args.output, &catalog)?;
    info!(
        path = %args.output.display(),
        entities = catalog.len(),
        "catalog written"
    );

    report_summary(&summary);
    if let Some(path) = &args.summary_path {
        write_json_pretty(path, &summary)?;
        info!(path = %path.display(), "run summary written");
    }

    Ok(())
}

pub(crate) struct BuiltCatalog {
    pub(crate) catalog: Catalog,
    pub(crate) without_section: Vec<ClassId>,
}

/// Runs the state machine for every class id that has a section. Class ids
/// without a section are reported and left out.
pub(crate) fn build_catalog(
    document: &PreParsedDocument,
    entries: Vec<ClassIdEntry>,
    selected: &[ClassId],
    lexicon: &Lexicon,
) -> Result<BuiltCatalog> {
    let mut built = BuiltCatalog {
        catalog: Catalog::default(),
        without_section: Vec::new(),
    };

    let entries = entries
        .into_iter()
        .filter(|entry| selected.is_empty() || selected.contains(&entry.class_id))
        .collect::<Vec<_>>();

    for (entity, section) in bind_sections(document, entries) {
        let Some(section) = section else {
            info!(class_id = entity.class_id, name = %entity.name, "no section for class id");
            built.without_section.push(entity.class_id);
            continue;
        };

        debug!(
            class_id = entity.class_id,
            section = %section.section_number,
            name = %entity.name,
            "extracting entity"
        );
        let entity = extract_entity(entity, section, lexicon);
        if let Err(entity) = built.catalog.insert(entity) {
            bail!("class id {} extracted twice", entity.class_id);
        }
    }

    info!(
        entities = built.catalog.len(),
        without_section = built.without_section.len(),
        "entity extraction finished"
    );
    debug!(class_ids = ?built.catalog.class_ids(), "extracted classes");
    Ok(built)
}

/// Reloads the written catalog and checks it matches what was saved.
fn verify_round_trip(path: &Path, catalog: &Catalog) -> Result<()> {
    let reloaded: Catalog = read_json(path)?;
    let expected = serde_json::to_value(catalog).context("failed to serialize catalog")?;
    let actual = serde_json::to_value(&reloaded).context("failed to serialize reloaded catalog")?;
    if expected != actual {
        bail!("catalog reloaded from {} differs from the one saved", path.display());
    }
    Ok(())
}

fn report_summary(summary: &ParseRunSummary) {
    info!(
        entities = summary.entities,
        complete = summary.complete,
        failed = summary.failed,
        attributes = summary.attributes,
        "catalog validation finished"
    );
    info!(
        no_actions = summary.no_actions.len(),
        no_attributes = summary.no_attributes.len(),
        too_many_attributes = summary.too_many_attributes.len(),
        without_access = summary.attributes_without_access.len(),
        without_size = summary.attributes_without_size.len(),
        zero_size = summary.attributes_with_zero_size.len(),
        "validation issue counts"
    );
    for issue in &summary.issues {
        warn!(
            class_id = issue.class_id,
            name = %issue.name,
            issues = %issue.issues.join(", "),
            "class has issues"
        );
    }
}
