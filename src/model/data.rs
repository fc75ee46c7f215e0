//! Indexed snapshot of the entity graph

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::entities::*;
use super::Entity;
use crate::error::{DataError, DataResult};

/// Id-keyed table of one entity kind, with a name index for named kinds
#[derive(Debug, Clone)]
pub struct Table<E> {
    rows: BTreeMap<i32, E>,
    names: HashMap<String, Vec<i32>>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            names: HashMap::new(),
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn get(&self, id: i32) -> Option<&E> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.rows.contains_key(&id)
    }

    /// Ids of all entities with exactly this name, ascending
    pub fn ids_named(&self, name: &str) -> &[i32] {
        self.names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entities in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn insert(&mut self, entity: E) -> Option<E> {
        let id = entity.id();
        if let Some(name) = entity.name() {
            let ids = self.names.entry(name.to_string()).or_default();
            if let Err(pos) = ids.binary_search(&id) {
                ids.insert(pos, id);
            }
        }
        let previous = self.rows.insert(id, entity);
        if let Some(old_name) = previous.as_ref().and_then(|p| p.name()) {
            let still_named = self.rows.get(&id).and_then(|e| e.name()) == Some(old_name);
            if !still_named {
                self.forget_name(old_name, id);
            }
        }
        previous
    }

    pub(crate) fn remove(&mut self, id: i32) -> Option<E> {
        let removed = self.rows.remove(&id)?;
        if let Some(name) = removed.name() {
            self.forget_name(name, id);
        }
        Some(removed)
    }

    fn forget_name(&mut self, name: &str, id: i32) {
        if let Some(ids) = self.names.get_mut(name) {
            ids.retain(|&i| i != id);
            if ids.is_empty() {
                self.names.remove(name);
            }
        }
    }
}

/// Reverse indices from parents to children
#[derive(Debug, Clone, Default)]
pub struct Relations {
    groups_by_category: BTreeMap<i32, BTreeSet<i32>>,
    types_by_group: BTreeMap<i32, BTreeSet<i32>>,
}

impl Relations {
    pub(crate) fn link_group(&mut self, category_id: i32, group_id: i32) {
        self.groups_by_category
            .entry(category_id)
            .or_default()
            .insert(group_id);
    }

    pub(crate) fn unlink_group(&mut self, category_id: i32, group_id: i32) {
        if let Some(groups) = self.groups_by_category.get_mut(&category_id) {
            groups.remove(&group_id);
        }
    }

    pub(crate) fn link_type(&mut self, group_id: i32, type_id: i32) {
        self.types_by_group
            .entry(group_id)
            .or_default()
            .insert(type_id);
    }

    pub(crate) fn unlink_type(&mut self, group_id: i32, type_id: i32) {
        if let Some(types) = self.types_by_group.get_mut(&group_id) {
            types.remove(&type_id);
        }
    }
}

/// The entity graph: one table per kind plus cross-reference indices
///
/// Produced by [`super::EveDataBuilder`] or by freezing a [`crate::graph::GraphStore`].
/// All iteration is in ascending id order, so everything derived from it is deterministic.
#[derive(Debug, Clone, Default)]
pub struct EveData {
    pub(crate) categories: Table<Category>,
    pub(crate) groups: Table<Group>,
    pub(crate) types: Table<Type>,
    pub(crate) attributes: Table<DogmaAttribute>,
    pub(crate) effects: Table<DogmaEffect>,
    pub(crate) dogma_types: Table<DogmaType>,
    pub(crate) meta_groups: Table<MetaGroup>,
    pub(crate) market_groups: Table<MarketGroup>,
    pub(crate) races: Table<Race>,
    pub(crate) mutaplasmids: Table<Mutaplasmid>,
    pub(crate) relations: Relations,
}

impl EveData {
    /// Look up an entity by id; a miss is a referential integrity error
    pub fn get<E: Entity>(&self, id: i32) -> DataResult<&E> {
        E::table(self)
            .get(id)
            .ok_or_else(|| DataError::missing_id(E::KIND, id))
    }

    pub fn find<E: Entity>(&self, id: i32) -> Option<&E> {
        E::table(self).get(id)
    }

    pub fn contains<E: Entity>(&self, id: i32) -> bool {
        E::table(self).contains(id)
    }

    /// Look up the single entity with this exact name
    pub fn by_name<E: Entity>(&self, name: &str) -> DataResult<&E> {
        self.find_by_name::<E>(name)?
            .ok_or_else(|| DataError::missing_name(E::KIND, name))
    }

    /// Like [`EveData::by_name`], but a missing name is not an error
    pub fn find_by_name<E: Entity>(&self, name: &str) -> DataResult<Option<&E>> {
        let table = E::table(self);
        match table.ids_named(name) {
            [] => Ok(None),
            [id] => Ok(table.get(*id)),
            ids => Err(DataError::precondition(format!(
                "{} name {:?} is ambiguous: ids {:?}",
                E::KIND,
                name,
                ids
            ))),
        }
    }

    pub fn iter<E: Entity>(&self) -> impl Iterator<Item = &E> {
        E::table(self).iter()
    }

    pub fn count<E: Entity>(&self) -> usize {
        E::table(self).len()
    }

    /// Groups belonging to a category, ascending id
    pub fn groups_in_category(&self, category_id: i32) -> impl Iterator<Item = &Group> {
        self.relations
            .groups_by_category
            .get(&category_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.groups.get(*id))
    }

    /// Types belonging to any of the groups, ascending id
    pub fn types_in_groups(&self, group_ids: &[i32]) -> Vec<&Type> {
        let ids: BTreeSet<i32> = group_ids
            .iter()
            .filter_map(|g| self.relations.types_by_group.get(g))
            .flatten()
            .copied()
            .collect();
        ids.into_iter().filter_map(|id| self.types.get(id)).collect()
    }

    /// Types whose group belongs to any of the categories, ascending id
    pub fn types_in_categories(&self, category_ids: &[i32]) -> Vec<&Type> {
        let group_ids: Vec<i32> = category_ids
            .iter()
            .flat_map(|c| self.groups_in_category(*c).map(|g| g.id))
            .collect();
        self.types_in_groups(&group_ids)
    }

    pub fn types_in_category(&self, category_id: i32) -> Vec<&Type> {
        self.types_in_categories(&[category_id])
    }

    pub fn types_in_group(&self, group_id: i32) -> Vec<&Type> {
        self.types_in_groups(&[group_id])
    }

    /// The dogma facet of a type, if it has one
    pub fn dogma_of(&self, type_id: i32) -> Option<&DogmaType> {
        self.dogma_types.get(type_id)
    }

    pub fn category_of(&self, item: &Type) -> DataResult<&Category> {
        let group = self.get::<Group>(item.group_id)?;
        self.get::<Category>(group.category_id)
    }

    pub fn attribute_value(&self, type_id: i32, attribute_id: i32) -> Option<f64> {
        self.dogma_of(type_id)?.attribute(attribute_id)
    }

    pub fn has_effect(&self, type_id: i32, effect_id: i32) -> bool {
        self.dogma_of(type_id)
            .is_some_and(|dogma| dogma.has_effect(effect_id))
    }

    /// Effects attached to a type, in attachment order
    pub fn effects_of(&self, type_id: i32) -> DataResult<Vec<&DogmaEffect>> {
        match self.dogma_of(type_id) {
            Some(dogma) => dogma
                .effect_ids
                .iter()
                .map(|id| self.get::<DogmaEffect>(*id))
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    /// Store an entity, replacing any entity of the same kind and id, and keep indices current
    pub(crate) fn put<E: Entity>(&mut self, entity: E) -> Option<E> {
        entity.link(&mut self.relations);
        let previous = E::table_mut(self).insert(entity);
        if let Some(old) = &previous {
            old.unlink(&mut self.relations);
            // Relinking after the unlink keeps an unchanged parent link intact
            if let Some(current) = E::table(self).get(old.id()).cloned() {
                current.link(&mut self.relations);
            }
        }
        previous
    }

    pub(crate) fn take<E: Entity>(&mut self, id: i32) -> Option<E> {
        let removed = E::table_mut(self).remove(id)?;
        removed.unlink(&mut self.relations);
        Some(removed)
    }

    /// Check every reference held by every entity
    pub fn check_all_references(&self) -> DataResult<()> {
        fn check<E: Entity>(data: &EveData) -> DataResult<()> {
            data.iter::<E>().try_for_each(|e| e.check_references(data))
        }
        check::<Category>(self)?;
        check::<Group>(self)?;
        check::<Type>(self)?;
        check::<DogmaAttribute>(self)?;
        check::<DogmaEffect>(self)?;
        check::<DogmaType>(self)?;
        check::<MetaGroup>(self)?;
        check::<MarketGroup>(self)?;
        check::<Race>(self)?;
        check::<Mutaplasmid>(self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    fn sample() -> EveData {
        let mut data = EveData::default();
        data.put(Category::new(6, "Ship"));
        data.put(Category::new(7, "Module"));
        data.put(Group::new(25, "Frigate", 6));
        data.put(Group::new(26, "Cruiser", 6));
        data.put(Group::new(55, "Projectile Weapon", 7));
        data.put(Type::new(587, "Rifter", 25));
        data.put(Type::new(620, "Osprey", 26));
        data.put(Type::new(486, "125mm Gatling AutoCannon I", 55));
        data
    }

    #[test]
    fn test_types_in_category_resolves_through_groups() {
        let data = sample();
        let ships: Vec<i32> = data.types_in_category(6).iter().map(|t| t.id).collect();
        assert_eq!(ships, vec![587, 620]);
        let modules: Vec<i32> = data.types_in_category(7).iter().map(|t| t.id).collect();
        assert_eq!(modules, vec![486]);
    }

    #[test]
    fn test_put_moves_type_between_groups() {
        let mut data = sample();
        let mut osprey = data.get::<Type>(620).unwrap().clone();
        osprey.group_id = 25;
        data.put(osprey);
        assert!(data.types_in_group(26).is_empty());
        assert_eq!(data.types_in_group(25).len(), 2);
    }

    #[test]
    fn test_put_same_parent_keeps_link() {
        let mut data = sample();
        let rifter = data.get::<Type>(587).unwrap().clone().with_volume(27289.0);
        data.put(rifter);
        assert_eq!(data.types_in_group(25).len(), 1);
    }

    #[test]
    fn test_name_lookup() {
        let mut data = sample();
        assert_eq!(data.by_name::<Type>("Rifter").unwrap().id, 587);
        assert_eq!(
            data.by_name::<Type>("Slasher").unwrap_err(),
            DataError::missing_name(EntityKind::Type, "Slasher")
        );

        data.put(Type::new(1000, "Rifter", 25));
        assert!(data
            .by_name::<Type>("Rifter")
            .unwrap_err()
            .is_precondition_violation());
    }

    #[test]
    fn test_rename_updates_name_index() {
        let mut data = sample();
        let mut rifter = data.get::<Type>(587).unwrap().clone();
        rifter.name = "Rifter Renamed".to_string();
        data.put(rifter);
        assert!(data.find_by_name::<Type>("Rifter").unwrap().is_none());
        assert!(data.find_by_name::<Type>("Rifter Renamed").unwrap().is_some());
    }

    #[test]
    fn test_take_unlinks() {
        let mut data = sample();
        assert!(data.take::<Type>(587).is_some());
        assert!(data.types_in_group(25).is_empty());
        assert!(data.find::<Type>(587).is_none());
    }
}
