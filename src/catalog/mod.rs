mod action;
mod attribute;
mod entity;
mod notification;
mod size;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::VersionHeading;

pub use action::Action;
pub use attribute::{Attribute, AttributeAccess, AttributeList, AttributeType};
pub use entity::{ClassAccess, ClassId, Entity, EntityState, SectionRef};
pub use notification::{
    AlarmEntry, AlarmTable, AvcEntry, AvcTable, MAX_ALARM_NUMBER, MAX_AVC_NUMBER, MIN_AVC_NUMBER,
    ThresholdAlert, ThresholdAlertTable,
};
pub use size::{AttributeSize, UNBOUNDED_OCTETS};

/// The extracted record set handed to code generators.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub versions: Vec<VersionHeading>,
    #[serde(default)]
    pub entities: EntityMap,
}

impl Catalog {
    pub fn get(&self, class_id: ClassId) -> Option<&Entity> {
        self.entities.0.get(&class_id)
    }

    pub fn get_mut(&mut self, class_id: ClassId) -> Option<&mut Entity> {
        self.entities.0.get_mut(&class_id)
    }

    pub fn contains(&self, class_id: ClassId) -> bool {
        self.entities.0.contains_key(&class_id)
    }

    /// Adds an entity; returns it back when the class id is already taken.
    pub fn insert(&mut self, entity: Entity) -> Result<(), Entity> {
        if self.contains(entity.class_id) {
            return Err(entity);
        }
        self.entities.0.insert(entity.class_id, entity);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.0.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.0.values_mut()
    }

    pub fn class_ids(&self) -> Vec<ClassId> {
        self.entities.0.keys().copied().collect()
    }
}

/// Entities keyed by class id, serialized as a list ordered by class id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityMap(BTreeMap<ClassId, Entity>);

impl Serialize for EntityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

impl<'de> Deserialize<'de> for EntityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entities = Vec::<Entity>::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for entity in entities {
            if map.contains_key(&entity.class_id) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate class id {}",
                    entity.class_id
                )));
            }
            map.insert(entity.class_id, entity);
        }
        Ok(EntityMap(map))
    }
}
