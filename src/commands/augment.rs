use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::{Attribute, AttributeType, Catalog, ClassId};
use crate::cli::AugmentArgs;
use crate::model::{AttributeHint, EntityHint, HintsFile};
use crate::util::{read_json, write_json_pretty};

/// Classes most ONU implementations need hand-tuned attribute hints for.
const CLASS_IDS_OF_INTEREST: &[ClassId] = &[
    2, 5, 6, 7, 11, 24, 45, 46, 47, 48, 49, 51, 52, 78, 84, 89, 131, 171, 256, 257, 262, 263, 264,
    266, 268, 272, 273, 274, 276, 277, 278, 280, 281, 287, 296, 309, 310, 311, 312, 321, 322, 329,
    334, 341, 343, 344, 345, 346, 426,
];

pub fn run(args: AugmentArgs) -> Result<()> {
    let catalog: Catalog = read_json(&args.input)?;

    let mut hints = match &args.existing {
        Some(path) if path.exists() => {
            let hints: HintsFile = read_json(path)?;
            info!(
                path = %path.display(),
                entities = hints.managed_entities.len(),
                "loaded existing hints"
            );
            hints
        }
        Some(path) => {
            warn!(path = %path.display(), "existing hints file missing, starting empty");
            HintsFile::default()
        }
        None => HintsFile::default(),
    };

    let selected = if args.class_ids.is_empty() {
        CLASS_IDS_OF_INTEREST
    } else {
        args.class_ids.as_slice()
    };

    let merged = augment_hints(&mut hints, &catalog, selected);
    write_json_pretty(&args.output, &hints)?;
    info!(
        path = %args.output.display(),
        classes = merged,
        entities = hints.managed_entities.len(),
        "augmented hints written"
    );
    Ok(())
}

/// Adds type-derived hints for every selected class present in the catalog.
/// Values already in `hints` are never replaced. Returns the number of classes
/// merged.
pub(crate) fn augment_hints(hints: &mut HintsFile, catalog: &Catalog, selected: &[ClassId]) -> usize {
    let mut merged = 0;

    for entity in catalog.iter() {
        if !selected.contains(&entity.class_id) {
            continue;
        }

        let position = match hints
            .managed_entities
            .iter()
            .position(|hint| hint.class_id == entity.class_id)
        {
            Some(position) => position,
            None => {
                hints.managed_entities.push(EntityHint {
                    class_id: entity.class_id,
                    name: None,
                    attributes: Vec::new(),
                });
                hints.managed_entities.len() - 1
            }
        };

        let class_hint = &mut hints.managed_entities[position];
        class_hint.name = Some(entity.name.clone());
        for attribute in &entity.attributes {
            merge_attribute(class_hint, attribute);
        }
        class_hint.attributes.sort_by_key(|hint| hint.index);
        merged += 1;
    }

    hints.managed_entities.sort_by_key(|hint| hint.class_id);
    merged
}

fn merge_attribute(class_hint: &mut EntityHint, attribute: &Attribute) {
    let derived = AttributeHint {
        index: attribute.index,
        name: Some(attribute.name.clone()),
        attribute_type: match attribute.attribute_type {
            AttributeType::Unknown => None,
            known => Some(known),
        },
        default: type_default(attribute),
        constraint: type_constraint(attribute),
    };

    match class_hint
        .attributes
        .iter_mut()
        .find(|hint| hint.index == attribute.index)
    {
        Some(existing) => {
            existing.name = existing.name.take().or(derived.name);
            existing.attribute_type = existing.attribute_type.or(derived.attribute_type);
            existing.default = existing.default.take().or(derived.default);
            existing.constraint = existing.constraint.take().or(derived.constraint);
        }
        None => class_hint.attributes.push(derived),
    }
}

fn octet_len(attribute: &Attribute) -> Option<usize> {
    attribute
        .size
        .as_ref()
        .and_then(|size| size.derived_octets())
        .and_then(|octets| usize::try_from(octets).ok())
}

fn filled_octets(attribute: &Attribute, fill: u8) -> Option<Value> {
    let len = octet_len(attribute)?;
    Some(Value::String(STANDARD.encode(vec![fill; len])))
}

/// Widest value an integer field of the attribute's size can hold.
fn max_for_size(attribute: &Attribute) -> u64 {
    match octet_len(attribute) {
        Some(1) => 0xFF,
        Some(2) => 0xFFFF,
        Some(4) => 0xFFFF_FFFF,
        _ => u64::MAX,
    }
}

pub(crate) fn type_default(attribute: &Attribute) -> Option<Value> {
    match attribute.attribute_type {
        AttributeType::Unknown => None,
        AttributeType::Octets | AttributeType::Table => filled_octets(attribute, 0),
        AttributeType::String => filled_octets(attribute, b' '),
        AttributeType::UnsignedInteger
        | AttributeType::SignedInteger
        | AttributeType::Pointer
        | AttributeType::BitField
        | AttributeType::Enumeration
        | AttributeType::Counter => Some(Value::from(0)),
    }
}

pub(crate) fn type_constraint(attribute: &Attribute) -> Option<String> {
    match attribute.attribute_type {
        AttributeType::Octets | AttributeType::String => {
            octet_len(attribute).map(|len| format!("len({len})"))
        }
        AttributeType::UnsignedInteger | AttributeType::Enumeration => {
            Some(format!("0..0x{:X}", max_for_size(attribute)))
        }
        AttributeType::Pointer => Some("0..0xFFFF".to_string()),
        AttributeType::BitField => Some(format!("0x{:X}", max_for_size(attribute))),
        AttributeType::Unknown
        | AttributeType::Table
        | AttributeType::SignedInteger
        | AttributeType::Counter => None,
    }
}
