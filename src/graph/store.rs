use std::ops::Deref;

use tracing::debug;

use crate::error::{DataError, DataResult};
use crate::model::{DogmaType, Entity, EveData, Type};

/// Mutable, indexed view of the entity graph used by the fixup passes
///
/// Queries come from the wrapped [`EveData`] through `Deref`. Every change replaces whole
/// entities and re-checks the references of what is stored, so the graph stays consistent after
/// every pass.
#[derive(Debug, Clone)]
pub struct GraphStore {
    data: EveData,
}

impl GraphStore {
    pub fn new(data: EveData) -> Self {
        Self { data }
    }

    /// Apply `f` to a copy of the stored entity and store the result
    pub fn replace<E: Entity>(&mut self, id: i32, f: impl FnOnce(E) -> E) -> DataResult<()> {
        let current = self.data.get::<E>(id)?.clone();
        let updated = f(current);
        if updated.id() != id {
            return Err(DataError::precondition(format!(
                "replacing {} #{} must not change its id (got #{})",
                E::KIND,
                id,
                updated.id()
            )));
        }
        updated.check_references(&self.data)?;
        self.data.put(updated);
        Ok(())
    }

    /// Store a new entity; its (kind, id) must be unused
    pub fn add<E: Entity>(&mut self, entity: E) -> DataResult<()> {
        if self.data.contains::<E>(entity.id()) {
            return Err(DataError::precondition(format!(
                "duplicate {} #{}",
                E::KIND,
                entity.id()
            )));
        }
        entity.check_references(&self.data)?;
        self.data.put(entity);
        Ok(())
    }

    /// Replace the entity if it exists, otherwise add it
    pub fn upsert<E: Entity>(&mut self, entity: E) -> DataResult<()> {
        if self.data.contains::<E>(entity.id()) {
            self.replace::<E>(entity.id(), |_| entity)
        } else {
            self.add(entity)
        }
    }

    /// Set one attribute on a type's dogma, creating the dogma facet if the type has none
    pub fn set_attribute(&mut self, type_id: i32, attribute_id: i32, value: f64) -> DataResult<()> {
        let dogma = self
            .data
            .dogma_of(type_id)
            .cloned()
            .unwrap_or_else(|| DogmaType::new(type_id));
        self.upsert(dogma.with_attribute(attribute_id, value))
    }

    /// Attach an effect to a type's dogma, creating the dogma facet if the type has none
    pub fn attach_effect(&mut self, type_id: i32, effect_id: i32) -> DataResult<()> {
        let dogma = self
            .data
            .dogma_of(type_id)
            .cloned()
            .unwrap_or_else(|| DogmaType::new(type_id));
        self.upsert(dogma.with_effect(effect_id))
    }

    /// Remove every type matching `predicate`, together with its dogma facet
    ///
    /// Returns the removed type ids in ascending order. References other entities hold to the
    /// removed types are the caller's to clean up.
    pub fn remove_types_and_dogma(
        &mut self,
        predicate: impl Fn(&Type, Option<&DogmaType>) -> bool,
    ) -> Vec<i32> {
        let doomed: Vec<i32> = self
            .data
            .iter::<Type>()
            .filter(|t| predicate(t, self.data.dogma_of(t.id)))
            .map(|t| t.id)
            .collect();
        for id in &doomed {
            self.data.take::<Type>(*id);
            self.data.take::<DogmaType>(*id);
        }
        debug!(count = doomed.len(), "removed types");
        doomed
    }

    /// Finish mutation and hand out the read-only graph
    pub fn freeze(self) -> EveData {
        self.data
    }
}

impl Deref for GraphStore {
    type Target = EveData;

    fn deref(&self) -> &EveData {
        &self.data
    }
}

impl From<EveData> for GraphStore {
    fn from(data: EveData) -> Self {
        Self::new(data)
    }
}
