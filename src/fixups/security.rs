use tracing::debug;

use super::additive::SECURITY_STATUS;
use super::known::{categories, synthetic};
use super::{Fixup, FixupClass, FixupContext};
use crate::error::DataResult;
use crate::graph::SyntheticKind;
use crate::model::{
    DogmaEffect, DogmaModifier, EffectCategory, ModifierDomain, ModifierFunc, Operation,
};

pub const ADD_SECURITY_STATUS_SCALING: Fixup = Fixup {
    name: "add_security_status_scaling",
    class: FixupClass::Structural,
    description: "Scale ship bonuses by the pilot's security status, capped per hull",
    run: add_security_status_scaling,
};

const INVERSE_CAPPED: &str = "inverseCappedSecStatus";
const SHIP_CAP_EFFECT: &str = "inverseSecStatusCap";
const CHARACTER_EFFECT: &str = "inverseSecStatusFromCharacter";

/// Ships whose bonuses grow as the pilot's security status drops carry `secStatusBonusCap`.
///
/// The character subtracts its security status from the ship's `inverseCappedSecStatus`, and
/// the ship caps that value at `secStatusBonusCap`. Bonus modifiers then scale by the capped
/// value.
///
/// The cap is applied once, to the ship-wide inverse security status, not to each bonus
/// attribute. This matches the game only while every security status bonus on a hull scales by
/// the same factor.
fn add_security_status_scaling(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let ship_category = ctx.category(categories::SHIP)?;
    let bonus_cap = ctx.attribute("secStatusBonusCap")?;
    let security_status = ctx.synthetic(SyntheticKind::Attribute, SECURITY_STATUS)?;
    let character = ctx.synthetic(SyntheticKind::Type, synthetic::CHARACTER)?;

    let inverse = ctx.mint_attribute(INVERSE_CAPPED, |a| a.with_range(0.0, 10.0))?;
    let ship_effect = ctx.mint_effect(SHIP_CAP_EFFECT, |id| {
        DogmaEffect::new(id, SHIP_CAP_EFFECT, EffectCategory::Always).with_modifiers(vec![
            DogmaModifier::new(ModifierFunc::ItemModifier, ModifierDomain::Item)
                .with_attributes(inverse, Operation::CoerceAtMost, bonus_cap),
        ])
    })?;
    let character_effect = ctx.mint_effect(CHARACTER_EFFECT, |id| {
        DogmaEffect::new(id, CHARACTER_EFFECT, EffectCategory::Always).with_modifiers(vec![
            DogmaModifier::new(ModifierFunc::ItemModifier, ModifierDomain::Ship)
                .with_attributes(inverse, Operation::Subtract, security_status),
        ])
    })?;

    let store = &*ctx.store;
    let ships: Vec<i32> = store
        .types_in_category(ship_category)
        .into_iter()
        .filter(|t| store.attribute_value(t.id, bonus_cap).is_some())
        .map(|t| t.id)
        .collect();
    for ship_id in &ships {
        ctx.store.set_attribute(*ship_id, inverse, 0.0)?;
        ctx.store.attach_effect(*ship_id, ship_effect)?;
    }
    ctx.store.attach_effect(character, character_effect)?;
    debug!(ships = ships.len(), "security status scaling");
    Ok(())
}
