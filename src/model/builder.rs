use super::data::EveData;
use super::{Entity, EntityKind};
use crate::error::{DataError, DataResult};

/// Assembles an [`EveData`] snapshot and checks it on [`EveDataBuilder::build`]
#[derive(Debug, Default)]
pub struct EveDataBuilder {
    data: EveData,
    duplicates: Vec<(EntityKind, i32)>,
}

impl EveDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<E: Entity>(&mut self, entity: E) -> &mut Self {
        let id = entity.id();
        if self.data.put(entity).is_some() {
            self.duplicates.push((E::KIND, id));
        }
        self
    }

    /// Chaining form of [`EveDataBuilder::insert`]
    pub fn with<E: Entity>(mut self, entity: E) -> Self {
        self.insert(entity);
        self
    }

    pub fn build(self) -> DataResult<EveData> {
        if let Some((kind, id)) = self.duplicates.first() {
            return Err(DataError::precondition(format!(
                "duplicate {} #{} in export",
                kind, id
            )));
        }
        self.data.check_all_references()?;
        Ok(self.data)
    }
}
