use super::*;

/// Entities with unknown access that support any action are created by the
/// OLT when they support create, otherwise by the ONU.
pub(crate) fn infer_class_access(catalog: &mut Catalog) {
    for entity in catalog.iter_mut() {
        if entity.access != ClassAccess::Unknown || entity.actions.is_empty() {
            continue;
        }
        entity.access = if entity.actions.contains(&Action::Create) {
            ClassAccess::CreatedByOlt
        } else {
            ClassAccess::CreatedByOnu
        };
    }
}

/// Fills in unknown attribute types. Types supplied by hints are left alone.
pub(crate) fn infer_attribute_types(catalog: &mut Catalog, hinted: &HintedTypes) {
    for entity in catalog.iter_mut() {
        let counters = is_counter_entity(&entity.name);
        let class_id = entity.class_id;

        for attribute in entity.attributes.iter_mut() {
            if attribute.attribute_type != AttributeType::Unknown
                || hinted.contains(&(class_id, attribute.index))
            {
                continue;
            }
            if let Some(attribute_type) = infer_attribute_type(attribute, counters) {
                attribute.attribute_type = attribute_type;
            }
        }
    }
}

fn is_counter_entity(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("history data") || name.contains("extended pm")
}

pub(crate) fn infer_attribute_type(attribute: &Attribute, counters: bool) -> Option<AttributeType> {
    let octets = attribute.size.as_ref().and_then(AttributeSize::derived_octets);

    if attribute.index == 0 {
        return (octets == Some(2)).then_some(AttributeType::Pointer);
    }

    if counters
        && !attribute.name.to_lowercase().contains("end time")
        && attribute.is_read_only()
        && !attribute.is_table()
    {
        return Some(AttributeType::Counter);
    }

    let octets = octets?;
    if matches!(octets, 1 | 2 | 4 | 8) {
        Some(AttributeType::UnsignedInteger)
    } else {
        Some(AttributeType::Octets)
    }
}
