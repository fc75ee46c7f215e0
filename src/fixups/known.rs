//! Names of export entities the fixups rely on, and a cache resolving them to ids.

use std::collections::HashMap;

use crate::error::DataResult;
use crate::graph::GraphStore;
use crate::model::{Category, DogmaAttribute, DogmaEffect, Group};

/// Category names in the export
pub mod categories {
    pub const SHIP: &str = "Ship";
    pub const MODULE: &str = "Module";
    pub const CHARGE: &str = "Charge";
    pub const SKILL: &str = "Skill";
    pub const DRONE: &str = "Drone";
    pub const IMPLANT: &str = "Implant";
    pub const SUBSYSTEM: &str = "Subsystem";
    pub const FIGHTER: &str = "Fighter";
}

/// Names of the entities the fixups synthesize
pub mod synthetic {
    pub const CHARACTER: &str = "Character";
    pub const WARFARE_BUFFS: &str = "Warfare Buffs";
    pub const TACTICAL_MODE: &str = "Tactical Mode";
}

/// Type categories emitted by the compiler, in emission order
pub const TYPE_SECTIONS: &[&str] = &[
    categories::SKILL,
    categories::SHIP,
    categories::MODULE,
    categories::CHARGE,
    categories::DRONE,
    categories::FIGHTER,
    categories::IMPLANT,
    categories::SUBSYSTEM,
    synthetic::TACTICAL_MODE,
];

pub const SHIELD_RESONANCES: [&str; 4] = [
    "shieldEmDamageResonance",
    "shieldThermalDamageResonance",
    "shieldKineticDamageResonance",
    "shieldExplosiveDamageResonance",
];

pub const ARMOR_RESONANCES: [&str; 4] = [
    "armorEmDamageResonance",
    "armorThermalDamageResonance",
    "armorKineticDamageResonance",
    "armorExplosiveDamageResonance",
];

pub const HULL_RESONANCES: [&str; 4] = [
    "emDamageResonance",
    "thermalDamageResonance",
    "kineticDamageResonance",
    "explosiveDamageResonance",
];

pub const CHARGE_GROUP_ATTRIBUTES: [&str; 5] = [
    "chargeGroup1",
    "chargeGroup2",
    "chargeGroup3",
    "chargeGroup4",
    "chargeGroup5",
];

/// Lazily resolved ids of named export entities
///
/// A name is looked up once per pipeline run; a missing name aborts the run.
#[derive(Debug, Default)]
pub struct KnownEntities {
    categories: HashMap<&'static str, i32>,
    groups: HashMap<&'static str, i32>,
    attributes: HashMap<&'static str, i32>,
    effects: HashMap<&'static str, i32>,
}

impl KnownEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&mut self, store: &GraphStore, name: &'static str) -> DataResult<i32> {
        cached(&mut self.categories, name, || {
            store.by_name::<Category>(name).map(|c| c.id)
        })
    }

    pub fn group(&mut self, store: &GraphStore, name: &'static str) -> DataResult<i32> {
        cached(&mut self.groups, name, || store.by_name::<Group>(name).map(|g| g.id))
    }

    pub fn attribute(&mut self, store: &GraphStore, name: &'static str) -> DataResult<i32> {
        cached(&mut self.attributes, name, || {
            store.by_name::<DogmaAttribute>(name).map(|a| a.id)
        })
    }

    pub fn effect(&mut self, store: &GraphStore, name: &'static str) -> DataResult<i32> {
        cached(&mut self.effects, name, || {
            store.by_name::<DogmaEffect>(name).map(|e| e.id)
        })
    }
}

fn cached(
    cache: &mut HashMap<&'static str, i32>,
    name: &'static str,
    resolve: impl FnOnce() -> DataResult<i32>,
) -> DataResult<i32> {
    if let Some(id) = cache.get(name) {
        return Ok(*id);
    }
    let id = resolve()?;
    cache.insert(name, id);
    Ok(id)
}
