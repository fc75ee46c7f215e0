//! The warfare buffs aggregate and the command burst charges that feed it.
//!
//! Command bursts do not modify ships directly. A burst charge writes the strength of each buff
//! it carries into an attribute of the synthetic "Warfare Buffs" entity, and a single passive
//! effect on that entity applies every buff to the ship.

use std::collections::HashMap;

use tracing::debug;

use super::known::{categories, synthetic, ARMOR_RESONANCES, SHIELD_RESONANCES};
use super::structural::add_aggregate_entity;
use super::{Fixup, FixupClass, FixupContext};
use crate::error::{DataError, DataResult};
use crate::graph::SyntheticKind;
use crate::model::{
    DogmaAttribute, DogmaEffect, DogmaModifier, EffectCategory, ModifierDomain, ModifierFunc,
    Operation, Type,
};
use crate::precondition;

/// Which items a buff modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuffTarget {
    Ship,
    /// Fitted modules requiring any of the named skills
    ModulesRequiringSkill(&'static [&'static str]),
}

/// One row of the warfare buff table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarfareBuff {
    /// Value a burst charge stores in `warfareBuff<slot>ID`
    pub buff_id: i32,
    /// Aggregate attribute on the warfare buffs entity
    pub attribute_name: &'static str,
    pub modified_attributes: &'static [&'static str],
    pub target: BuffTarget,
}

pub static WARFARE_BUFFS: &[WarfareBuff] = &[
    WarfareBuff {
        buff_id: 10,
        attribute_name: "shieldResistanceBuff",
        modified_attributes: &SHIELD_RESONANCES,
        target: BuffTarget::Ship,
    },
    WarfareBuff {
        buff_id: 12,
        attribute_name: "shieldHitpointsBuff",
        modified_attributes: &["shieldCapacity"],
        target: BuffTarget::Ship,
    },
    WarfareBuff {
        buff_id: 13,
        attribute_name: "armorResistanceBuff",
        modified_attributes: &ARMOR_RESONANCES,
        target: BuffTarget::Ship,
    },
    WarfareBuff {
        buff_id: 15,
        attribute_name: "armorHitpointsBuff",
        modified_attributes: &["armorHP"],
        target: BuffTarget::Ship,
    },
    WarfareBuff {
        buff_id: 19,
        attribute_name: "signatureRadiusBuff",
        modified_attributes: &["signatureRadius"],
        target: BuffTarget::Ship,
    },
    WarfareBuff {
        buff_id: 21,
        attribute_name: "propulsionSpeedBuff",
        modified_attributes: &["speedFactor"],
        target: BuffTarget::ModulesRequiringSkill(&["Afterburner", "High Speed Maneuvering"]),
    },
];

/// `(warfareBuff<n>ID, warfareBuff<n>Value)` per burst charge slot
const BUFF_SLOTS: [(&str, &str); 4] = [
    ("warfareBuff1ID", "warfareBuff1Value"),
    ("warfareBuff2ID", "warfareBuff2Value"),
    ("warfareBuff3ID", "warfareBuff3Value"),
    ("warfareBuff4ID", "warfareBuff4Value"),
];

const AGGREGATE_EFFECT: &str = "warfareBuffs";

pub fn warfare_buff(buff_id: i32) -> Option<&'static WarfareBuff> {
    WARFARE_BUFFS.iter().find(|b| b.buff_id == buff_id)
}

pub const ADD_WARFARE_BUFFS_ENTITY: Fixup = Fixup {
    name: "add_warfare_buffs_entity",
    class: FixupClass::Structural,
    description: "Synthesize the Warfare Buffs entity and the effect applying each buff",
    run: add_warfare_buffs_entity,
};

pub const ADD_COMMAND_BURST_MODIFIERS: Fixup = Fixup {
    name: "add_command_burst_modifiers",
    class: FixupClass::Additive,
    description: "Give each command burst charge an effect writing its buffs into the aggregate",
    run: add_command_burst_modifiers,
};

fn add_warfare_buffs_entity(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let type_id = add_aggregate_entity(ctx, synthetic::WARFARE_BUFFS)?;

    let mut modifiers = Vec::new();
    for buff in WARFARE_BUFFS {
        let buff_attribute =
            ctx.mint(SyntheticKind::WarfareBuffAttribute, buff.attribute_name, |id| {
                DogmaAttribute::new(id, buff.attribute_name)
            })?;
        ctx.store.set_attribute(type_id, buff_attribute, 0.0)?;

        for &modified in buff.modified_attributes {
            let modified = ctx.attribute(modified)?;
            match buff.target {
                BuffTarget::Ship => modifiers.push(
                    DogmaModifier::new(ModifierFunc::ItemModifier, ModifierDomain::Ship)
                        .with_attributes(modified, Operation::AddPercent, buff_attribute),
                ),
                BuffTarget::ModulesRequiringSkill(skills) => {
                    for skill in skills {
                        let skill_id = ctx.store.by_name::<Type>(skill)?.id;
                        modifiers.push(
                            DogmaModifier::new(
                                ModifierFunc::LocationRequiredSkillModifier,
                                ModifierDomain::Ship,
                            )
                            .with_attributes(modified, Operation::AddPercent, buff_attribute)
                            .with_skill(skill_id),
                        );
                    }
                }
            }
        }
    }

    let effect_id = ctx.mint_effect(AGGREGATE_EFFECT, |id| {
        DogmaEffect::new(id, AGGREGATE_EFFECT, EffectCategory::Passive).with_modifiers(modifiers)
    })?;
    ctx.store.attach_effect(type_id, effect_id)?;
    debug!(type_id, effect_id, "warfare buffs entity");
    Ok(())
}

fn add_command_burst_modifiers(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let charge_category = ctx.category(categories::CHARGE)?;
    let mut slots = Vec::with_capacity(BUFF_SLOTS.len());
    for (id_name, value_name) in BUFF_SLOTS {
        slots.push((ctx.attribute(id_name)?, ctx.attribute(value_name)?));
    }
    let first_slot = slots[0].0;

    let mut aggregate_attributes = HashMap::new();
    for buff in WARFARE_BUFFS {
        let id = ctx.synthetic(SyntheticKind::WarfareBuffAttribute, buff.attribute_name)?;
        aggregate_attributes.insert(buff.buff_id, id);
    }

    // (charge, [(buff id, value attribute)]) in slot order
    let mut bursts = Vec::new();
    for charge in ctx.store.types_in_category(charge_category) {
        let Some(dogma) = ctx.store.dogma_of(charge.id) else {
            continue;
        };
        if !dogma.has_attribute(first_slot) {
            continue;
        }
        let mut carried = Vec::new();
        for &(id_attribute, value_attribute) in &slots {
            let Some(raw) = dogma.attribute(id_attribute) else {
                continue;
            };
            precondition!(
                raw.fract() == 0.0,
                "charge #{} {:?} has non-integral warfare buff id {}",
                charge.id,
                charge.name,
                raw
            );
            let buff_id = raw as i32;
            precondition!(
                warfare_buff(buff_id).is_some(),
                "charge #{} {:?} carries unknown warfare buff {}",
                charge.id,
                charge.name,
                buff_id
            );
            precondition!(
                dogma.has_attribute(value_attribute),
                "charge #{} {:?} carries warfare buff {} without its value attribute",
                charge.id,
                charge.name,
                buff_id
            );
            carried.push((buff_id, value_attribute));
        }
        bursts.push((charge.id, carried));
    }

    for (charge_id, carried) in bursts {
        let name = burst_effect_name(&carried);
        let modifiers = carried
            .iter()
            .map(|(buff_id, value_attribute)| -> DataResult<DogmaModifier> {
                let aggregate = aggregate_attributes.get(buff_id).copied().ok_or_else(|| {
                    DataError::precondition(format!("no aggregate attribute for buff {}", buff_id))
                })?;
                Ok(
                    DogmaModifier::new(ModifierFunc::ItemModifier, ModifierDomain::WarfareBuffs)
                        .with_attributes(aggregate, Operation::SetMaxAbsValue, *value_attribute),
                )
            })
            .collect::<DataResult<Vec<_>>>()?;
        let effect_id = ctx.mint_effect(&name, |id| {
            DogmaEffect::new(id, name.as_str(), EffectCategory::Active).with_modifiers(modifiers)
        })?;
        ctx.store.attach_effect(charge_id, effect_id)?;
        debug!(charge_id, effect = %name, "command burst effect");
    }
    Ok(())
}

/// Charges carrying the same buffs in the same slots share one effect
fn burst_effect_name(carried: &[(i32, i32)]) -> String {
    let ids: Vec<String> = carried.iter().map(|(buff_id, _)| buff_id.to_string()).collect();
    format!("commandBurst_{}", ids.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixups::run_fixups;
    use crate::graph::{GraphStore, SyntheticIds};
    use crate::model::{Category, DogmaType, EveDataBuilder, Group};

    const ATTRIBUTES: &[(i32, &str)] = &[
        (263, "shieldCapacity"),
        (265, "armorHP"),
        (552, "signatureRadius"),
        (20, "speedFactor"),
        (271, "shieldEmDamageResonance"),
        (274, "shieldThermalDamageResonance"),
        (273, "shieldKineticDamageResonance"),
        (272, "shieldExplosiveDamageResonance"),
        (267, "armorEmDamageResonance"),
        (270, "armorThermalDamageResonance"),
        (269, "armorKineticDamageResonance"),
        (268, "armorExplosiveDamageResonance"),
        (2468, "warfareBuff1ID"),
        (2469, "warfareBuff1Value"),
        (2470, "warfareBuff2ID"),
        (2471, "warfareBuff2Value"),
        (2536, "warfareBuff3ID"),
        (2537, "warfareBuff3Value"),
        (2538, "warfareBuff4ID"),
        (2539, "warfareBuff4Value"),
    ];

    fn export(burst: DogmaType) -> GraphStore {
        let mut builder = EveDataBuilder::new()
            .with(Category::new(8, "Charge"))
            .with(Category::new(16, "Skill"))
            .with(Group::new(1771, "Command Burst Charges", 8))
            .with(Group::new(275, "Navigation", 16))
            .with(Type::new(3450, "Afterburner", 275))
            .with(Type::new(3454, "High Speed Maneuvering", 275))
            .with(Type::new(42832, "Shield Harmonizing Charge", 1771))
            .with(Type::new(42833, "Active Shielding Charge", 1771));
        for (id, name) in ATTRIBUTES {
            builder.insert(DogmaAttribute::new(*id, *name));
        }
        builder
            .with(burst)
            .with(
                DogmaType::new(42833)
                    .with_attribute(2468, 12.0)
                    .with_attribute(2469, 8.0),
            )
            .build()
            .map(GraphStore::new)
            .unwrap()
    }

    fn shield_harmonizing() -> DogmaType {
        DogmaType::new(42832)
            .with_attribute(2468, 10.0)
            .with_attribute(2469, -8.0)
            .with_attribute(2470, 12.0)
            .with_attribute(2471, 4.0)
    }

    #[test]
    fn test_aggregate_entity() {
        let mut store = export(shield_harmonizing());
        let mut ids = SyntheticIds::new();
        run_fixups(&[ADD_WARFARE_BUFFS_ENTITY], &mut store, &mut ids).unwrap();

        let aggregate = store.by_name::<Type>("Warfare Buffs").unwrap();
        let dogma = store.dogma_of(aggregate.id).unwrap();
        assert_eq!(dogma.attribute_values.len(), WARFARE_BUFFS.len());
        let effects = store.effects_of(aggregate.id).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].category, EffectCategory::Passive);
        // 4 + 1 + 4 + 1 + 1 ship modifiers, 2 skill-scoped propulsion modifiers
        assert_eq!(effects[0].modifiers.len(), 13);
        assert!(effects[0]
            .modifiers
            .iter()
            .all(|m| m.operation == Some(Operation::AddPercent)));
        assert_eq!(
            ids.get(SyntheticKind::WarfareBuffAttribute, "shieldResistanceBuff"),
            Some(1_000_000)
        );
    }

    #[test]
    fn test_burst_charges_share_effects() {
        let mut store = export(shield_harmonizing());
        let mut ids = SyntheticIds::new();
        run_fixups(
            &[ADD_WARFARE_BUFFS_ENTITY, ADD_COMMAND_BURST_MODIFIERS],
            &mut store,
            &mut ids,
        )
        .unwrap();

        let effects = store.effects_of(42832).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].name, "commandBurst_10_12");
        let shield_buff = ids
            .get(SyntheticKind::WarfareBuffAttribute, "shieldResistanceBuff")
            .unwrap();
        assert_eq!(
            effects[0].modifiers[0],
            DogmaModifier::new(ModifierFunc::ItemModifier, ModifierDomain::WarfareBuffs)
                .with_attributes(shield_buff, Operation::SetMaxAbsValue, 2469)
        );
        assert_eq!(effects[0].modifiers[1].modifying_attribute_id, Some(2471));
        assert_eq!(store.effects_of(42833).unwrap()[0].name, "commandBurst_12");
    }

    #[test]
    fn test_unknown_buff_aborts() {
        let burst = DogmaType::new(42832)
            .with_attribute(2468, 99.0)
            .with_attribute(2469, 1.0);
        let mut store = export(burst);
        let mut ids = SyntheticIds::new();
        let err = run_fixups(
            &[ADD_WARFARE_BUFFS_ENTITY, ADD_COMMAND_BURST_MODIFIERS],
            &mut store,
            &mut ids,
        )
        .unwrap_err();
        assert!(err.source.is_precondition_violation());
        assert!(err.to_string().contains("unknown warfare buff 99"));
    }

    #[test]
    fn test_missing_value_aborts() {
        let burst = DogmaType::new(42832).with_attribute(2468, 10.0);
        let mut store = export(burst);
        let mut ids = SyntheticIds::new();
        let err = run_fixups(
            &[ADD_WARFARE_BUFFS_ENTITY, ADD_COMMAND_BURST_MODIFIERS],
            &mut store,
            &mut ids,
        )
        .unwrap_err();
        assert_eq!(err.fixup, "add_command_burst_modifiers");
    }

    #[test]
    fn test_buff_table_ids_are_unique() {
        let mut seen: Vec<i32> = WARFARE_BUFFS.iter().map(|b| b.buff_id).collect();
        seen.dedup();
        assert_eq!(seen.len(), WARFARE_BUFFS.len());
        assert_eq!(warfare_buff(21).unwrap().attribute_name, "propulsionSpeedBuff");
    }
}
