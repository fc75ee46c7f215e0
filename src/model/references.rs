//! Upward reference checks for each entity kind

use std::collections::HashSet;

use super::data::EveData;
use super::entities::*;
use crate::error::{DataError, DataResult};

fn require<E: super::Entity>(data: &EveData, id: i32) -> DataResult<()> {
    data.get::<E>(id).map(|_| ())
}

/// Optional references into auxiliary tables are only checked when the table was loaded
fn require_if_loaded<E: super::Entity>(data: &EveData, id: Option<i32>) -> DataResult<()> {
    match id {
        Some(id) if !E::table(data).is_empty() => require::<E>(data, id),
        _ => Ok(()),
    }
}

pub(super) fn check_group(group: &Group, data: &EveData) -> DataResult<()> {
    require::<Category>(data, group.category_id)
}

pub(super) fn check_type(item: &Type, data: &EveData) -> DataResult<()> {
    require::<Group>(data, item.group_id)?;
    if let Some(parent) = item.variation_parent_type_id {
        if parent != item.id {
            require::<Type>(data, parent)?;
        }
    }
    require_if_loaded::<MetaGroup>(data, item.meta_group_id)?;
    require_if_loaded::<MarketGroup>(data, item.market_group_id)?;
    require_if_loaded::<Race>(data, item.race_id)?;
    Ok(())
}

pub(super) fn check_effect(effect: &DogmaEffect, data: &EveData) -> DataResult<()> {
    for attribute_id in effect.meta_attribute_ids() {
        require::<DogmaAttribute>(data, attribute_id)?;
    }
    if let Some(condition) = &effect.condition {
        require::<DogmaAttribute>(data, condition.attribute_id)?;
    }
    for modifier in &effect.modifiers {
        for attribute_id in modifier.attribute_ids() {
            require::<DogmaAttribute>(data, attribute_id)?;
        }
        if let Some(group_id) = modifier.group_id {
            require::<Group>(data, group_id)?;
        }
        if let Some(skill_type_id) = modifier.skill_type_id {
            require::<Type>(data, skill_type_id)?;
        }
    }
    Ok(())
}

pub(super) fn check_dogma_type(dogma: &DogmaType, data: &EveData) -> DataResult<()> {
    require::<Type>(data, dogma.id)?;
    let mut seen = HashSet::new();
    for av in &dogma.attribute_values {
        if !seen.insert(av.attribute_id) {
            return Err(DataError::precondition(format!(
                "dogma type #{} lists attribute #{} more than once",
                dogma.id, av.attribute_id
            )));
        }
        require::<DogmaAttribute>(data, av.attribute_id)?;
    }
    for effect_id in &dogma.effect_ids {
        require::<DogmaEffect>(data, *effect_id)?;
    }
    Ok(())
}

pub(super) fn check_market_group(group: &MarketGroup, data: &EveData) -> DataResult<()> {
    match group.parent_group_id {
        Some(parent) => require::<MarketGroup>(data, parent),
        None => Ok(()),
    }
}

pub(super) fn check_mutaplasmid(mutaplasmid: &Mutaplasmid, data: &EveData) -> DataResult<()> {
    for mapping in &mutaplasmid.mappings {
        require::<Type>(data, mapping.resulting_type_id)?;
        for type_id in &mapping.applicable_type_ids {
            require::<Type>(data, *type_id)?;
        }
    }
    for attribute in &mutaplasmid.attributes {
        require::<DogmaAttribute>(data, attribute.attribute_id)?;
    }
    Ok(())
}
