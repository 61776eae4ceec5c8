use super::*;

/// Attributes whose type came from a hint, as (class id, attribute index).
pub(crate) type HintedTypes = BTreeSet<(ClassId, usize)>;

/// Copies hinted type, default and constraint values onto matching
/// attributes. Hints for absent entities or attributes are skipped.
pub(crate) fn apply_hints(catalog: &mut Catalog, hints: &HintsFile) -> HintedTypes {
    for entity_hint in &hints.managed_entities {
        if !catalog.contains(entity_hint.class_id) {
            debug!(class_id = entity_hint.class_id, "hint for unknown class id");
        }
    }

    let mut hinted = HintedTypes::new();
    for entity in catalog.iter_mut() {
        let Some(entity_hint) = hints.entity(entity.class_id) else {
            continue;
        };

        for hint in &entity_hint.attributes {
            if hint.index >= entity.attributes.len() {
                warn!(
                    class_id = entity.class_id,
                    index = hint.index,
                    "hint for unknown attribute index"
                );
            }
        }

        for attribute in entity.attributes.iter_mut() {
            let Some(hint) = entity_hint.attribute(attribute.index) else {
                continue;
            };
            if let Some(attribute_type) = hint.attribute_type {
                attribute.attribute_type = attribute_type;
                hinted.insert((entity.class_id, attribute.index));
            }
            if let Some(default) = &hint.default {
                attribute.default = Some(default.clone());
            }
            if let Some(constraint) = &hint.constraint {
                attribute.constraint = Some(constraint.clone());
            }
        }
    }
    hinted
}
