use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::known::{synthetic, TYPE_SECTIONS};
use super::{Fixup, FixupClass, FixupContext};
use crate::error::DataResult;
use crate::graph::SyntheticKind;
use crate::model::{DogmaEffect, DogmaType, Group, Mutaplasmid, Type};

pub const ADD_CHARACTER_ENTITY: Fixup = Fixup {
    name: "add_character_entity",
    class: FixupClass::Structural,
    description: "Synthesize the Character category, group, type and dogma",
    run: add_character_entity,
};

pub const PRUNE_IRRELEVANT_TYPES: Fixup = Fixup {
    name: "prune_irrelevant_types",
    class: FixupClass::Structural,
    description: "Remove types outside the emitted categories and unreferenced unpublished types",
    run: prune_irrelevant_types,
};

/// Mint a category, group and type sharing one name, plus an empty dogma facet.
/// Returns the type id.
pub(super) fn add_aggregate_entity(ctx: &mut FixupContext<'_>, name: &str) -> DataResult<i32> {
    let category_id = ctx.mint_category(name)?;
    let group_id = ctx.mint_group(name, category_id)?;
    let type_id = ctx.mint_type(name, group_id)?;
    if ctx.store.dogma_of(type_id).is_none() {
        ctx.store.add(DogmaType::new(type_id))?;
    }
    Ok(type_id)
}

fn add_character_entity(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let type_id = add_aggregate_entity(ctx, synthetic::CHARACTER)?;
    debug!(type_id, "character entity");
    Ok(())
}

fn prune_irrelevant_types(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let mut kept_categories = HashSet::new();
    for name in TYPE_SECTIONS {
        let id = if *name == synthetic::TACTICAL_MODE {
            ctx.synthetic(SyntheticKind::Category, name)?
        } else {
            ctx.category(name)?
        };
        kept_categories.insert(id);
    }
    kept_categories.insert(ctx.synthetic(SyntheticKind::Category, synthetic::CHARACTER)?);
    kept_categories.insert(ctx.synthetic(SyntheticKind::Category, synthetic::WARFARE_BUFFS)?);

    let store = &*ctx.store;
    let mut referenced: HashSet<i32> = store
        .iter::<DogmaEffect>()
        .flat_map(|e| e.modifiers.iter().filter_map(|m| m.skill_type_id))
        .collect();
    referenced.extend(
        store
            .iter::<Type>()
            .filter(|t| t.published)
            .filter_map(|t| t.variation_parent_type_id),
    );
    referenced.extend(
        store
            .iter::<Mutaplasmid>()
            .flat_map(|m| m.mappings.iter().map(|mapping| mapping.resulting_type_id)),
    );
    let category_of_group: HashMap<i32, i32> = store
        .iter::<Group>()
        .map(|g| (g.id, g.category_id))
        .collect();

    let removed: HashSet<i32> = ctx
        .store
        .remove_types_and_dogma(|t, _| {
            let kept_category = category_of_group
                .get(&t.group_id)
                .is_some_and(|c| kept_categories.contains(c));
            !kept_category || !(t.published || referenced.contains(&t.id))
        })
        .into_iter()
        .collect();

    let orphans: Vec<i32> = ctx
        .store
        .iter::<Type>()
        .filter(|t| {
            t.variation_parent_type_id
                .is_some_and(|parent| removed.contains(&parent))
        })
        .map(|t| t.id)
        .collect();
    for id in orphans {
        ctx.store.replace::<Type>(id, |t| Type {
            variation_parent_type_id: None,
            ..t
        })?;
    }

    let mutaplasmid_ids: Vec<i32> = ctx.store.iter::<Mutaplasmid>().map(|m| m.id).collect();
    for id in mutaplasmid_ids {
        ctx.store.replace::<Mutaplasmid>(id, |mut m| {
            for mapping in &mut m.mappings {
                mapping
                    .applicable_type_ids
                    .retain(|type_id| !removed.contains(type_id));
            }
            m.mappings.retain(|mapping| {
                !mapping.applicable_type_ids.is_empty()
                    && !removed.contains(&mapping.resulting_type_id)
            });
            m
        })?;
    }

    info!(removed = removed.len(), "pruned types");
    Ok(())
}
