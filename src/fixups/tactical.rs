//! Tactical destroyer modes.
//!
//! The export files modes as ships in an unpublished group. They get their own category, are
//! published, and each mode learns which destroyer hull it belongs to.

use tracing::debug;

use super::known::synthetic;
use super::{Fixup, FixupClass, FixupContext};
use crate::error::DataResult;
use crate::graph::SyntheticKind;
use crate::model::{Group, Type};
use crate::precondition;

const MODES_GROUP: &str = "Ship Modifiers";
const DESTROYERS_GROUP: &str = "Tactical Destroyer";
const SHIP_ATTRIBUTE: &str = "tacticalDestroyerShipId";

pub const RECLASSIFY_TACTICAL_MODES: Fixup = Fixup {
    name: "reclassify_tactical_modes",
    class: FixupClass::Structural,
    description: "Move the tactical mode group into its own Tactical Mode category",
    run: reclassify_tactical_modes,
};

pub const PUBLISH_TACTICAL_MODES: Fixup = Fixup {
    name: "publish_tactical_modes",
    class: FixupClass::Corrective,
    description: "Mark every tactical mode as published",
    run: publish_tactical_modes,
};

pub const ASSOCIATE_TACTICAL_MODES: Fixup = Fixup {
    name: "associate_tactical_modes",
    class: FixupClass::Derivational,
    description: "Record on each tactical mode the id of the destroyer it belongs to",
    run: associate_tactical_modes,
};

fn reclassify_tactical_modes(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let category_id = ctx.mint_category(synthetic::TACTICAL_MODE)?;
    let group_id = ctx.group(MODES_GROUP)?;
    ctx.store
        .replace::<Group>(group_id, |g| Group { category_id, ..g })
}

fn publish_tactical_modes(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let category_id = ctx.synthetic(SyntheticKind::Category, synthetic::TACTICAL_MODE)?;
    let hidden: Vec<i32> = ctx
        .store
        .types_in_category(category_id)
        .into_iter()
        .filter(|t| !t.published)
        .map(|t| t.id)
        .collect();
    for id in hidden {
        ctx.store.replace::<Type>(id, |t| Type {
            published: true,
            ..t
        })?;
        debug!(type_id = id, "published tactical mode");
    }
    Ok(())
}

fn associate_tactical_modes(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let category_id = ctx.synthetic(SyntheticKind::Category, synthetic::TACTICAL_MODE)?;
    let destroyers = ctx.group(DESTROYERS_GROUP)?;
    let attribute_id = ctx.mint_attribute(SHIP_ATTRIBUTE, |a| a)?;

    let mut associations = Vec::new();
    let ships = ctx.store.types_in_group(destroyers);
    for mode in ctx.store.types_in_category(category_id) {
        let matches: Vec<&Type> = ships
            .iter()
            .copied()
            .filter(|ship| {
                mode.name
                    .strip_prefix(ship.name.as_str())
                    .is_some_and(|rest| rest.starts_with(' '))
            })
            .collect();
        precondition!(
            matches.len() == 1,
            "tactical mode #{} {:?} matches {} tactical destroyers, expected exactly one",
            mode.id,
            mode.name,
            matches.len()
        );
        associations.push((mode.id, matches[0].id));
    }

    for (mode_id, ship_id) in associations {
        ctx.store
            .set_attribute(mode_id, attribute_id, f64::from(ship_id))?;
        debug!(mode_id, ship_id, "associated tactical mode");
    }
    Ok(())
}
