//! The fixup pipeline: an ordered, closed list of correction passes over the graph store.
//!
//! Passes are not commutative. Several read state an earlier pass leaves behind, so
//! [`PIPELINE`] is a fixed sequence and is always run front to back.

pub mod known;

mod additive;
mod corrective;
mod security;
mod structural;
mod tactical;
mod variations;
mod warfare;

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::error::{DataError, DataResult};
use crate::graph::{GraphStore, SyntheticIds, SyntheticKind};
use crate::model::{Category, DogmaAttribute, DogmaEffect, Entity, Group, Type};
use known::KnownEntities;

pub use warfare::{WarfareBuff, WARFARE_BUFFS};

/// Algorithmic class of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixupClass {
    /// Invents missing entities and attaches them
    Additive,
    /// Replaces values the export stores incorrectly
    Corrective,
    /// Derives relations between existing types
    Derivational,
    /// Moves or synthesizes categories, groups and types
    Structural,
}

impl fmt::Display for FixupClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixupClass::Additive => write!(f, "additive"),
            FixupClass::Corrective => write!(f, "corrective"),
            FixupClass::Derivational => write!(f, "derivational"),
            FixupClass::Structural => write!(f, "structural"),
        }
    }
}

/// One correction pass
pub struct Fixup {
    pub name: &'static str,
    pub class: FixupClass,
    pub description: &'static str,
    pub run: fn(&mut FixupContext<'_>) -> DataResult<()>,
}

impl fmt::Debug for Fixup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixup")
            .field("name", &self.name)
            .field("class", &self.class)
            .finish()
    }
}

/// A pass that failed, and why
#[derive(Debug, Error)]
#[error("fixup {fixup} failed: {source}")]
pub struct FixupError {
    pub fixup: &'static str,
    #[source]
    pub source: DataError,
}

/// Everything a pass may touch
pub struct FixupContext<'a> {
    pub store: &'a mut GraphStore,
    pub ids: &'a mut SyntheticIds,
    pub known: KnownEntities,
}

impl<'a> FixupContext<'a> {
    pub fn new(store: &'a mut GraphStore, ids: &'a mut SyntheticIds) -> Self {
        Self {
            store,
            ids,
            known: KnownEntities::new(),
        }
    }

    pub fn category(&mut self, name: &'static str) -> DataResult<i32> {
        self.known.category(self.store, name)
    }

    pub fn group(&mut self, name: &'static str) -> DataResult<i32> {
        self.known.group(self.store, name)
    }

    pub fn attribute(&mut self, name: &'static str) -> DataResult<i32> {
        self.known.attribute(self.store, name)
    }

    pub fn effect(&mut self, name: &'static str) -> DataResult<i32> {
        self.known.effect(self.store, name)
    }

    /// Allocate an id for `(kind, name)` and store the entity built for it
    ///
    /// Running the same pass again yields the same id and replaces the entity in place.
    pub fn mint<E: Entity>(
        &mut self,
        kind: SyntheticKind,
        name: &str,
        build: impl FnOnce(i32) -> E,
    ) -> DataResult<i32> {
        let store = &*self.store;
        let id = self
            .ids
            .allocate(kind, name, |id| store.contains::<E>(id));
        debug!(kind = ?kind, name, id, "minted synthetic id");
        self.store.upsert(build(id))?;
        Ok(id)
    }

    pub fn mint_category(&mut self, name: &str) -> DataResult<i32> {
        self.mint(SyntheticKind::Category, name, |id| Category::new(id, name))
    }

    pub fn mint_group(&mut self, name: &str, category_id: i32) -> DataResult<i32> {
        self.mint(SyntheticKind::Group, name, |id| {
            Group::new(id, name, category_id)
        })
    }

    pub fn mint_type(&mut self, name: &str, group_id: i32) -> DataResult<i32> {
        self.mint(SyntheticKind::Type, name, |id| Type::new(id, name, group_id))
    }

    pub fn mint_attribute(
        &mut self,
        name: &str,
        configure: impl FnOnce(DogmaAttribute) -> DogmaAttribute,
    ) -> DataResult<i32> {
        self.mint(SyntheticKind::Attribute, name, |id| {
            configure(DogmaAttribute::new(id, name))
        })
    }

    pub fn mint_effect(
        &mut self,
        name: &str,
        build: impl FnOnce(i32) -> DogmaEffect,
    ) -> DataResult<i32> {
        self.mint(SyntheticKind::Effect, name, build)
    }

    /// Id of a synthetic entity an earlier pass must already have minted
    pub fn synthetic(&self, kind: SyntheticKind, name: &str) -> DataResult<i32> {
        self.ids.get(kind, name).ok_or_else(|| {
            DataError::precondition(format!(
                "synthetic {:?} {:?} does not exist yet; the pass that creates it must run first",
                kind, name
            ))
        })
    }
}

/// Every pass, in the order it must run
pub static PIPELINE: &[Fixup] = &[
    structural::ADD_CHARACTER_ENTITY,
    warfare::ADD_WARFARE_BUFFS_ENTITY,
    tactical::RECLASSIFY_TACTICAL_MODES,
    tactical::PUBLISH_TACTICAL_MODES,
    structural::PRUNE_IRRELEVANT_TYPES,
    tactical::ASSOCIATE_TACTICAL_MODES,
    additive::ADD_HULL_RESONANCES,
    additive::ADD_CHARACTER_ATTRIBUTES,
    security::ADD_SECURITY_STATUS_SCALING,
    warfare::ADD_COMMAND_BURST_MODIFIERS,
    additive::ADD_WEAPON_DAMAGE_ATTRIBUTES,
    corrective::ZERO_PROJECTILE_CAPACITOR_NEED,
    corrective::FIX_MODULE_CHAR_LOCATION_MODIFIERS,
    corrective::FIX_RESONANCE_ATTRIBUTE_FLAGS,
    corrective::INFER_RIG_SIZES,
    variations::CLUSTER_IMPLANT_VARIATIONS,
    variations::CLUSTER_BOOSTER_VARIATIONS,
    corrective::FILL_MISSING_VOLUMES,
];

/// Run the whole pipeline
pub fn run_pipeline(store: &mut GraphStore, ids: &mut SyntheticIds) -> Result<(), FixupError> {
    run_fixups(PIPELINE, store, ids)
}

/// Run the given passes in order, stopping at the first failure
pub fn run_fixups(
    fixups: &[Fixup],
    store: &mut GraphStore,
    ids: &mut SyntheticIds,
) -> Result<(), FixupError> {
    let mut ctx = FixupContext::new(store, ids);
    for fixup in fixups {
        info!(fixup = fixup.name, class = %fixup.class, "running fixup");
        (fixup.run)(&mut ctx).map_err(|source| FixupError {
            fixup: fixup.name,
            source,
        })?;
    }
    Ok(())
}

/// Look a pass up by name
pub fn fixup(name: &str) -> Option<&'static Fixup> {
    PIPELINE.iter().find(|f| f.name == name)
}
