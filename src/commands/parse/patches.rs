use super::*;

/// Size forced onto an attribute by a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PatchSize {
    pub(crate) octets: i32,
    pub(crate) getnext: bool,
}

const fn octets(octets: i32) -> PatchSize {
    PatchSize {
        octets,
        getnext: false,
    }
}

const fn table_octets(octets: i32) -> PatchSize {
    PatchSize {
        octets,
        getnext: true,
    }
}

const READ: &[AttributeAccess] = &[AttributeAccess::Read];
const READ_WRITE: &[AttributeAccess] = &[AttributeAccess::Read, AttributeAccess::Write];
const READ_SET_BY_CREATE: &[AttributeAccess] =
    &[AttributeAccess::Read, AttributeAccess::SetByCreate];

/// One mutation of an entity. Attribute indices refer to the list as it
/// stands when the operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatchOp {
    SetClassAccess(ClassAccess),
    AddAction(Action),
    RemoveAction(Action),
    RenameAlarm {
        number: u8,
        name: &'static str,
    },
    AppendToName(&'static str),
    SetSize {
        index: usize,
        size: PatchSize,
    },
    /// Changes only the octet count, keeping the rest of the size.
    SetOctets {
        index: usize,
        octets: i32,
    },
    CopySize {
        from: usize,
        to: usize,
    },
    /// Keeps the size but marks it as retrieved with get-next.
    RequireGetNext(usize),
    AddAccess {
        index: usize,
        access: &'static [AttributeAccess],
    },
    SetOptional {
        index: usize,
        optional: bool,
    },
    SetType {
        index: usize,
        attribute_type: AttributeType,
    },
    RenameAttribute {
        index: usize,
        name: &'static str,
    },
    /// Two attributes described in one paragraph: duplicates `index` and
    /// names the halves.
    SplitAttribute {
        index: usize,
        first: &'static str,
        second: &'static str,
    },
    /// A repeated part: `index` becomes "Part 1" and copies up to
    /// "Part {parts}" are appended.
    RepeatParts {
        index: usize,
        parts: usize,
        optional_copies: bool,
    },
    RemoveAttribute(usize),
    RetainAttributes(&'static [usize]),
    PrependAttribute {
        name: &'static str,
        access: &'static [AttributeAccess],
        size: PatchSize,
        attribute_type: AttributeType,
    },
    /// Replaces extracted content with that of another, fully resolved
    /// entity. Runs after every other correction.
    CopyFrom(ClassId),
}

/// Attribute count a correction expects before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Requires {
    Any,
    Exactly(usize),
    AtLeast(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Patch {
    pub(crate) class_id: ClassId,
    pub(crate) label: &'static str,
    pub(crate) requires: Requires,
    pub(crate) ops: &'static [PatchOp],
}

const fn patch(class_id: ClassId, label: &'static str, ops: &'static [PatchOp]) -> Patch {
    Patch {
        class_id,
        label,
        requires: Requires::Any,
        ops,
    }
}

const KEEP_309: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 11, 12, 13, 14, 15, 16, 17, 18, 19];
const KEEP_336: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 14];

pub(crate) const PATCHES: &[Patch] = &[
    patch(
        6,
        "circuit-pack-created-by-onu",
        &[PatchOp::SetClassAccess(ClassAccess::CreatedByOnu)],
    ),
    patch(58, "get-next-supported", &[PatchOp::AddAction(Action::GetNext)]),
    patch(
        113,
        "leftr-alarm-name",
        &[PatchOp::RenameAlarm {
            number: 7,
            name: "leftr defect seconds",
        }],
    ),
    patch(134, "test-supported", &[PatchOp::AddAction(Action::Test)]),
    patch(
        149,
        "config-text-table-size",
        &[PatchOp::SetSize {
            index: 1,
            size: octets(25),
        }],
    ),
    patch(150, "get-next-supported", &[PatchOp::AddAction(Action::GetNext)]),
    patch(
        153,
        "username-password-pointer",
        &[
            PatchOp::SetSize {
                index: 3,
                size: octets(25),
            },
            PatchOp::AddAccess {
                index: 3,
                access: READ_WRITE,
            },
            PatchOp::SetSize {
                index: 4,
                size: octets(2),
            },
        ],
    ),
    patch(
        154,
        "config-text-table-size",
        &[PatchOp::SetSize {
            index: 1,
            size: octets(25),
        }],
    ),
    patch(
        157,
        "large-string-parts",
        &[PatchOp::RepeatParts {
            index: 2,
            parts: 15,
            optional_copies: false,
        }],
    ),
    patch(
        158,
        "reply-table-unbounded",
        &[PatchOp::SetOctets {
            index: 3,
            octets: UNBOUNDED_OCTETS,
        }],
    ),
    patch(
        281,
        "ipv4-multicast-address-table",
        &[
            PatchOp::SetSize {
                index: 9,
                size: table_octets(12),
            },
            PatchOp::AddAccess {
                index: 9,
                access: READ_WRITE,
            },
        ],
    ),
    patch(
        287,
        "ipv6-table-size",
        &[
            PatchOp::RequireGetNext(1),
            PatchOp::SetSize {
                index: 2,
                size: table_octets(1),
            },
        ],
    ),
    patch(
        288,
        "managed-entity-tables",
        &[
            PatchOp::AppendToName(" ME"),
            PatchOp::SetSize {
                index: 4,
                size: octets(1),
            },
            PatchOp::SetSize {
                index: 5,
                size: octets(1),
            },
        ],
    ),
    patch(289, "code-points-name", &[PatchOp::AppendToName(" ME")]),
    patch(
        299,
        "md-name-split",
        &[PatchOp::SplitAttribute {
            index: 3,
            first: "MD Name 1",
            second: "MD Name 2",
        }],
    ),
    patch(
        300,
        "short-ma-name-split",
        &[PatchOp::SplitAttribute {
            index: 3,
            first: "Short MA Name 1",
            second: "Short MA Name 2",
        }],
    ),
    patch(
        306,
        "chassis-management-split",
        &[
            PatchOp::SplitAttribute {
                index: 3,
                first: "Chassis ID Part 1",
                second: "Chassis ID Part 2",
            },
            PatchOp::SplitAttribute {
                index: 6,
                first: "Management Address Domain 1",
                second: "Management Address Domain 2",
            },
            PatchOp::SplitAttribute {
                index: 9,
                first: "Management Address 1",
                second: "Management Address 2",
            },
        ],
    ),
    patch(
        307,
        "octet-string-parts",
        &[PatchOp::RepeatParts {
            index: 2,
            parts: 15,
            optional_copies: true,
        }],
    ),
    patch(
        308,
        "buffer-table-unbounded",
        &[PatchOp::SetOctets {
            index: 2,
            octets: UNBOUNDED_OCTETS,
        }],
    ),
    Patch {
        class_id: 309,
        label: "multicast-operations-profile",
        requires: Requires::Exactly(20),
        ops: &[
            PatchOp::RetainAttributes(KEEP_309),
            PatchOp::RenameAttribute {
                index: 16,
                name: "Downstream IGMP and multicast TCI",
            },
            PatchOp::SetType {
                index: 1,
                attribute_type: AttributeType::Enumeration,
            },
            PatchOp::SetType {
                index: 2,
                attribute_type: AttributeType::Enumeration,
            },
            PatchOp::SetType {
                index: 3,
                attribute_type: AttributeType::Enumeration,
            },
            PatchOp::SetSize {
                index: 7,
                size: table_octets(24),
            },
            PatchOp::AddAccess {
                index: 7,
                access: READ_WRITE,
            },
        ],
    },
    Patch {
        class_id: 310,
        label: "multicast-subscriber-config",
        requires: Requires::AtLeast(9),
        ops: &[
            PatchOp::RemoveAttribute(8),
            PatchOp::SetSize {
                index: 7,
                size: table_octets(22),
            },
            PatchOp::AddAccess {
                index: 7,
                access: READ_WRITE,
            },
        ],
    },
    patch(321, "downstream-copies-upstream", &[PatchOp::CopyFrom(322)]),
    patch(325, "no-table-attributes", &[PatchOp::RemoveAction(Action::GetNext)]),
    patch(
        332,
        "readable-attribute-7",
        &[PatchOp::AddAccess {
            index: 7,
            access: READ,
        }],
    ),
    Patch {
        class_id: 336,
        label: "dynamic-power-management",
        requires: Requires::AtLeast(15),
        ops: &[
            PatchOp::RetainAttributes(KEEP_336),
            PatchOp::SetSize {
                index: 10,
                size: octets(1),
            },
            PatchOp::SetOptional {
                index: 10,
                optional: true,
            },
            PatchOp::AddAccess {
                index: 10,
                access: READ,
            },
            PatchOp::SetSize {
                index: 11,
                size: octets(1),
            },
            PatchOp::SetOptional {
                index: 11,
                optional: true,
            },
            PatchOp::AddAccess {
                index: 11,
                access: READ_WRITE,
            },
        ],
    },
    patch(
        408,
        "leftr-alarm-name",
        &[PatchOp::RenameAlarm {
            number: 0,
            name: "leftr defect seconds",
        }],
    ),
    patch(414, "no-table-attributes", &[PatchOp::RemoveAction(Action::GetNext)]),
    patch(
        432,
        "missing-entity-id",
        &[PatchOp::PrependAttribute {
            name: "Managed Entity Id",
            access: READ_SET_BY_CREATE,
            size: octets(2),
            attribute_type: AttributeType::Pointer,
        }],
    ),
    Patch {
        class_id: 441,
        label: "onu3-g-attributes",
        requires: Requires::AtLeast(9),
        ops: &[
            PatchOp::RemoveAttribute(3),
            PatchOp::SetSize {
                index: 2,
                size: octets(1),
            },
            PatchOp::SetOptional {
                index: 2,
                optional: false,
            },
            PatchOp::AddAccess {
                index: 2,
                access: READ,
            },
            PatchOp::SetOctets {
                index: 8,
                octets: 25,
            },
            PatchOp::CopySize { from: 8, to: 6 },
        ],
    },
];

impl Patch {
    fn copies(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, PatchOp::CopyFrom(_)))
    }
}

/// Applies `patches` to the catalog: entity-local corrections first, then
/// cross-entity copies. Each patch runs at most once per entity.
pub(crate) fn apply_patches(catalog: &mut Catalog, patches: &[Patch]) -> usize {
    let (copies, local): (Vec<&Patch>, Vec<&Patch>) = patches.iter().partition(|p| p.copies());

    let mut applied = 0;
    for patch in local.into_iter().chain(copies) {
        let source = patch.ops.iter().find_map(|op| match op {
            PatchOp::CopyFrom(source) => catalog.get(*source).cloned(),
            _ => None,
        });
        let Some(entity) = catalog.get_mut(patch.class_id) else {
            debug!(class_id = patch.class_id, patch = patch.label, "correction target absent");
            continue;
        };
        if apply_patch(entity, patch, source.as_ref()) {
            applied += 1;
        }
    }
    applied
}

/// Applies one patch. Returns false when it was already applied or its
/// precondition does not hold.
pub(crate) fn apply_patch(entity: &mut Entity, patch: &Patch, source: Option<&Entity>) -> bool {
    if entity.corrections.contains(patch.label) {
        return false;
    }

    let count = entity.attributes.len();
    let ready = match patch.requires {
        Requires::Any => true,
        Requires::Exactly(expected) => count == expected,
        Requires::AtLeast(expected) => count >= expected,
    };
    if !ready {
        warn!(
            class_id = entity.class_id,
            patch = patch.label,
            attributes = count,
            requires = ?patch.requires,
            "correction skipped, unexpected attribute count"
        );
        return false;
    }

    for op in patch.ops {
        if !apply_op(entity, op, source) {
            warn!(
                class_id = entity.class_id,
                patch = patch.label,
                op = ?op,
                "correction target missing"
            );
        }
    }
    entity.corrections.insert(patch.label.to_string());
    true
}

/// Returns false when the operation's target does not exist.
fn apply_op(entity: &mut Entity, op: &PatchOp, source: Option<&Entity>) -> bool {
    match *op {
        PatchOp::SetClassAccess(access) => {
            entity.access = access;
        }
        PatchOp::AddAction(action) => {
            entity.actions.insert(action);
        }
        PatchOp::RemoveAction(action) => {
            entity.actions.remove(&action);
        }
        PatchOp::RenameAlarm { number, name } => {
            let Some(alarm) = entity
                .alarms
                .as_mut()
                .and_then(|table| table.alarms.get_mut(&number))
            else {
                return false;
            };
            alarm.name = name.to_string();
        }
        PatchOp::AppendToName(suffix) => {
            if !entity.name.ends_with(suffix) {
                entity.name.push_str(suffix);
            }
        }
        PatchOp::SetSize { index, size } => {
            let Some(attribute) = entity.attributes.get_mut(index) else {
                return false;
            };
            attribute.size = Some(if size.getnext {
                AttributeSize::incremental(size.octets)
            } else {
                AttributeSize::from_octets(size.octets)
            });
        }
        PatchOp::SetOctets { index, octets } => {
            let Some(attribute) = entity.attributes.get_mut(index) else {
                return false;
            };
            attribute
                .size
                .get_or_insert_with(AttributeSize::default)
                .octets = Some(octets);
        }
        PatchOp::CopySize { from, to } => {
            let Some(size) = entity.attributes.get(from).map(|a| a.size.clone()) else {
                return false;
            };
            let Some(attribute) = entity.attributes.get_mut(to) else {
                return false;
            };
            attribute.size = size;
        }
        PatchOp::RequireGetNext(index) => {
            let Some(attribute) = entity.attributes.get_mut(index) else {
                return false;
            };
            attribute
                .size
                .get_or_insert_with(AttributeSize::default)
                .getnext_required = true;
        }
        PatchOp::AddAccess { index, access } => {
            let Some(attribute) = entity.attributes.get_mut(index) else {
                return false;
            };
            attribute.access.extend(access.iter().copied());
        }
        PatchOp::SetOptional { index, optional } => {
            let Some(attribute) = entity.attributes.get_mut(index) else {
                return false;
            };
            attribute.optional = Some(optional);
        }
        PatchOp::SetType {
            index,
            attribute_type,
        } => {
            let Some(attribute) = entity.attributes.get_mut(index) else {
                return false;
            };
            attribute.attribute_type = attribute_type;
        }
        PatchOp::RenameAttribute { index, name } => {
            let Some(attribute) = entity.attributes.get_mut(index) else {
                return false;
            };
            attribute.name = name.to_string();
        }
        PatchOp::SplitAttribute {
            index,
            first,
            second,
        } => {
            let Some(original) = entity.attributes.get(index).cloned() else {
                return false;
            };
            entity.attributes.insert(index + 1, original);
            for (position, name) in [(index, first), (index + 1, second)] {
                if let Some(attribute) = entity.attributes.get_mut(position) {
                    attribute.name = name.to_string();
                }
            }
        }
        PatchOp::RepeatParts {
            index,
            parts,
            optional_copies,
        } => {
            let Some(first) = entity.attributes.get_mut(index) else {
                return false;
            };
            first.name = "Part 1".to_string();
            first.optional = Some(false);
            if let Some(size) = first.size.as_mut() {
                size.repeat_max = 1;
            }
            let template = first.clone();

            for part in 2..=parts {
                let mut copy = template.clone();
                copy.name = format!("Part {part}");
                if optional_copies {
                    copy.optional = Some(true);
                }
                entity.attributes.push(copy);
            }
        }
        PatchOp::RemoveAttribute(index) => {
            if entity.attributes.remove(index).is_none() {
                return false;
            }
        }
        PatchOp::RetainAttributes(keep) => {
            if keep.iter().any(|index| *index >= entity.attributes.len()) {
                return false;
            }
            entity.attributes.retain_indices(|index| keep.contains(&index));
        }
        PatchOp::PrependAttribute {
            name,
            access,
            size,
            attribute_type,
        } => {
            let mut attribute = Attribute::named(name);
            attribute.access = access.iter().copied().collect();
            attribute.optional = Some(false);
            attribute.size = Some(AttributeSize::from_octets(size.octets));
            attribute.attribute_type = attribute_type;
            entity.attributes.insert(0, attribute);
        }
        PatchOp::CopyFrom(_) => {
            let Some(source) = source else {
                return false;
            };
            entity.attributes = source.attributes.clone();
            entity.actions = source.actions.clone();
            entity.optional_actions = source.optional_actions.clone();
            entity.alarms = source.alarms.clone();
            entity.tcas = source.tcas.clone();
            entity.avcs = source.avcs.clone();
            entity.hidden = source.hidden;
            entity.state = source.state;
        }
    }
    true
}
