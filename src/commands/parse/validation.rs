use super::*;

/// Attribute 0 counts toward this limit.
pub(crate) const MAX_ATTRIBUTES: usize = 17;

/// Checks every entity, demotes those with missing or implausible content to
/// `failure`, and tallies the findings.
pub(crate) fn validate_catalog(catalog: &mut Catalog) -> ParseRunSummary {
    let mut summary = ParseRunSummary {
        entities: catalog.len(),
        ..ParseRunSummary::default()
    };

    for entity in catalog.iter_mut() {
        let mut issues = Vec::new();

        if !entity.is_complete() {
            summary.incomplete.push(entity.class_id);
            issues.push(format!("parsing ended in state {}", entity.state.as_str()));
        }
        if entity.actions.is_empty() {
            summary.no_actions.push(entity.class_id);
            issues.push("no actions".to_string());
        }

        if entity.attributes.is_empty() {
            summary.no_attributes.push(entity.class_id);
            issues.push("no attributes".to_string());
        } else if entity.attributes.len() > MAX_ATTRIBUTES {
            summary.too_many_attributes.push(entity.class_id);
            issues.push(format!("{} attributes", entity.attributes.len()));
        } else {
            summary.attributes += entity.attributes.len();
            let mut no_access = false;
            let mut no_size = false;
            let mut zero_size = false;

            for attribute in &entity.attributes {
                if attribute.access.is_empty() {
                    no_access = true;
                    debug!(class_id = entity.class_id, attribute = %attribute.name, "no access information");
                }
                match attribute.size.as_ref().map(AttributeSize::derived_octets) {
                    None | Some(None) => {
                        no_size = true;
                        debug!(class_id = entity.class_id, attribute = %attribute.name, "no size information");
                    }
                    Some(Some(0)) => {
                        zero_size = true;
                        debug!(class_id = entity.class_id, attribute = %attribute.name, "zero size");
                    }
                    Some(Some(_)) => {}
                }
            }

            if no_access {
                summary.attributes_without_access.push(entity.class_id);
                issues.push("attribute without access".to_string());
            }
            if no_size {
                summary.attributes_without_size.push(entity.class_id);
                issues.push("attribute without size".to_string());
            }
            if zero_size {
                summary.attributes_with_zero_size.push(entity.class_id);
                issues.push("attribute with zero size".to_string());
            }
        }

        if issues.is_empty() {
            continue;
        }
        if entity.is_complete() {
            entity.mark_failed();
        }
        summary.issues.push(ClassIssue {
            class_id: entity.class_id,
            name: entity.name.clone(),
            issues,
        });
    }

    summary.complete = catalog.iter().filter(|entity| entity.is_complete()).count();
    summary.failed = catalog
        .iter()
        .filter(|entity| entity.state == EntityState::Failure)
        .count();
    summary
}
