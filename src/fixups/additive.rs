use tracing::debug;

use super::known::{categories, synthetic, HULL_RESONANCES};
use super::{Fixup, FixupClass, FixupContext};
use crate::error::DataResult;
use crate::graph::SyntheticKind;

pub const ADD_HULL_RESONANCES: Fixup = Fixup {
    name: "add_hull_resonances",
    class: FixupClass::Additive,
    description: "Give ships without hull resonances the neutral value 1.0",
    run: add_hull_resonances,
};

pub const ADD_CHARACTER_ATTRIBUTES: Fixup = Fixup {
    name: "add_character_attributes",
    class: FixupClass::Additive,
    description: "Give the Character entity maxActiveDrones and securityStatus",
    run: add_character_attributes,
};

pub const ADD_WEAPON_DAMAGE_ATTRIBUTES: Fixup = Fixup {
    name: "add_weapon_damage_attributes",
    class: FixupClass::Additive,
    description: "Give weapon modules zeroed damage attributes for each damage type",
    run: add_weapon_damage_attributes,
};

const WEAPON_EFFECTS: [&str; 3] = ["projectileFired", "targetAttack", "useMissiles"];

const WEAPON_DAMAGE_ATTRIBUTES: [&str; 4] = [
    "weaponEmDamage",
    "weaponThermalDamage",
    "weaponKineticDamage",
    "weaponExplosiveDamage",
];

pub(super) const SECURITY_STATUS: &str = "securityStatus";

fn add_hull_resonances(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let ship_category = ctx.category(categories::SHIP)?;
    let mut resonances = Vec::with_capacity(HULL_RESONANCES.len());
    for name in HULL_RESONANCES {
        resonances.push(ctx.attribute(name)?);
    }

    let store = &*ctx.store;
    let mut missing = Vec::new();
    for ship in store.types_in_category(ship_category) {
        for &attribute_id in &resonances {
            if store.attribute_value(ship.id, attribute_id).is_none() {
                missing.push((ship.id, attribute_id));
            }
        }
    }
    for (ship_id, attribute_id) in missing {
        ctx.store.set_attribute(ship_id, attribute_id, 1.0)?;
        debug!(ship_id, attribute_id, "added hull resonance");
    }
    Ok(())
}

fn add_character_attributes(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let character = ctx.synthetic(SyntheticKind::Type, synthetic::CHARACTER)?;
    let max_active_drones = ctx.attribute("maxActiveDrones")?;
    let security_status = ctx.mint_attribute(SECURITY_STATUS, |a| a.with_range(-10.0, 10.0))?;
    ctx.store.set_attribute(character, max_active_drones, 0.0)?;
    ctx.store.set_attribute(character, security_status, 0.0)
}

fn add_weapon_damage_attributes(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let module_category = ctx.category(categories::MODULE)?;
    let mut weapon_effects = Vec::with_capacity(WEAPON_EFFECTS.len());
    for name in WEAPON_EFFECTS {
        weapon_effects.push(ctx.effect(name)?);
    }
    let mut damage_attributes = Vec::with_capacity(WEAPON_DAMAGE_ATTRIBUTES.len());
    for name in WEAPON_DAMAGE_ATTRIBUTES {
        damage_attributes.push(ctx.mint_attribute(name, |a| a)?);
    }

    let store = &*ctx.store;
    let weapons: Vec<i32> = store
        .types_in_category(module_category)
        .into_iter()
        .filter(|t| weapon_effects.iter().any(|e| store.has_effect(t.id, *e)))
        .map(|t| t.id)
        .collect();
    for weapon in &weapons {
        for attribute in &damage_attributes {
            ctx.store.set_attribute(*weapon, *attribute, 0.0)?;
        }
    }
    debug!(count = weapons.len(), "weapon damage attributes");
    Ok(())
}
