//! Passes that overwrite values the export gets wrong.

use std::collections::BTreeSet;

use tracing::debug;

use super::known::categories;
use super::{Fixup, FixupClass, FixupContext};
use crate::error::{DataError, DataResult};
use crate::model::{
    DogmaAttribute, DogmaEffect, DogmaModifier, DogmaType, ModifierDomain, ModifierFunc, Type,
};
use crate::precondition;

pub const ZERO_PROJECTILE_CAPACITOR_NEED: Fixup = Fixup {
    name: "zero_projectile_capacitor_need",
    class: FixupClass::Corrective,
    description: "Drop the always-zero capacitorNeed from projectile weapons",
    run: zero_projectile_capacitor_need,
};

pub const FIX_MODULE_CHAR_LOCATION_MODIFIERS: Fixup = Fixup {
    name: "fix_module_char_location_modifiers",
    class: FixupClass::Corrective,
    description: "Retarget skill-filtered character modifiers of module effects to the ship",
    run: fix_module_char_location_modifiers,
};

pub const FIX_RESONANCE_ATTRIBUTE_FLAGS: Fixup = Fixup {
    name: "fix_resonance_attribute_flags",
    class: FixupClass::Corrective,
    description: "Mark damage resonances as low-is-good and not stackable",
    run: fix_resonance_attribute_flags,
};

pub const INFER_RIG_SIZES: Fixup = Fixup {
    name: "infer_rig_sizes",
    class: FixupClass::Corrective,
    description: "Derive a missing rigSize from the rig's name",
    run: infer_rig_sizes,
};

pub const FILL_MISSING_VOLUMES: Fixup = Fixup {
    name: "fill_missing_volumes",
    class: FixupClass::Corrective,
    description: "Copy a missing volume from the type's variation parent",
    run: fill_missing_volumes,
};

const RIG_SIZE_PREFIXES: [(&str, f64); 4] = [
    ("Small ", 1.0),
    ("Medium ", 2.0),
    ("Large ", 3.0),
    ("Capital ", 4.0),
];

fn zero_projectile_capacitor_need(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let module_category = ctx.category(categories::MODULE)?;
    let projectile_fired = ctx.effect("projectileFired")?;
    let capacitor_need = ctx.attribute("capacitorNeed")?;

    let mut weapons = Vec::new();
    for module in ctx.store.types_in_category(module_category) {
        if !ctx.store.has_effect(module.id, projectile_fired) {
            continue;
        }
        if let Some(need) = ctx.store.attribute_value(module.id, capacitor_need) {
            precondition!(
                need == 0.0,
                "projectile weapon #{} {:?} needs {} capacitor, expected 0",
                module.id,
                module.name,
                need
            );
            weapons.push(module.id);
        }
    }
    for id in weapons {
        ctx.store
            .replace::<DogmaType>(id, |dogma| dogma.without_attribute(capacitor_need))?;
        debug!(type_id = id, "dropped capacitorNeed");
    }
    Ok(())
}

fn fix_module_char_location_modifiers(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let module_category = ctx.category(categories::MODULE)?;
    let implant_category = ctx.category(categories::IMPLANT)?;

    let effects_of_category = |category_id: i32| -> BTreeSet<i32> {
        ctx.store
            .types_in_category(category_id)
            .into_iter()
            .filter_map(|t| ctx.store.dogma_of(t.id))
            .flat_map(|dogma| dogma.effect_ids.iter().copied())
            .collect()
    };
    let module_effects = effects_of_category(module_category);
    let implant_effects = effects_of_category(implant_category);

    let mut affected = Vec::new();
    for effect_id in &module_effects {
        let effect = ctx.store.get::<DogmaEffect>(*effect_id)?;
        if !effect.modifiers.iter().any(is_char_location_modifier) {
            continue;
        }
        precondition!(
            !implant_effects.contains(effect_id),
            "effect #{} {:?} is used by modules and implants; \
             its character modifiers cannot be retargeted",
            effect.id,
            effect.name
        );
        affected.push(effect.id);
    }

    for id in affected {
        ctx.store.replace::<DogmaEffect>(id, |mut effect| {
            for modifier in effect.modifiers.iter_mut().filter(|m| is_char_location_modifier(m)) {
                modifier.domain = ModifierDomain::Ship;
            }
            effect
        })?;
        debug!(effect_id = id, "retargeted character modifiers to ship");
    }
    Ok(())
}

fn is_char_location_modifier(modifier: &DogmaModifier) -> bool {
    modifier.func == ModifierFunc::LocationRequiredSkillModifier
        && modifier.domain == ModifierDomain::Char
}

fn fix_resonance_attribute_flags(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let resonances: Vec<i32> = ctx
        .store
        .iter::<DogmaAttribute>()
        .filter(|a| a.name.ends_with("DamageResonance"))
        .map(|a| a.id)
        .collect();
    precondition!(
        !resonances.is_empty(),
        "no damage resonance attributes in the export"
    );
    for id in resonances {
        ctx.store.replace::<DogmaAttribute>(id, |a| {
            a.with_high_is_good(false).unstackable()
        })?;
    }
    Ok(())
}

fn infer_rig_sizes(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let module_category = ctx.category(categories::MODULE)?;
    let rig_slot = ctx.effect("rigSlot")?;
    let rig_size = ctx.attribute("rigSize")?;

    let mut inferred = Vec::new();
    for module in ctx.store.types_in_category(module_category) {
        if !ctx.store.has_effect(module.id, rig_slot)
            || ctx.store.attribute_value(module.id, rig_size).is_some()
        {
            continue;
        }
        let size = RIG_SIZE_PREFIXES
            .iter()
            .find(|(prefix, _)| module.name.starts_with(prefix))
            .map(|(_, size)| *size)
            .ok_or_else(|| {
                DataError::precondition(format!(
                    "rig #{} {:?} has no rigSize and no size in its name",
                    module.id, module.name
                ))
            })?;
        inferred.push((module.id, size));
    }
    for (id, size) in inferred {
        ctx.store.set_attribute(id, rig_size, size)?;
        debug!(type_id = id, size, "inferred rig size");
    }
    Ok(())
}

fn fill_missing_volumes(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    let mut category_ids = Vec::new();
    for name in [
        categories::MODULE,
        categories::CHARGE,
        categories::DRONE,
        categories::IMPLANT,
    ] {
        category_ids.push(ctx.category(name)?);
    }

    let mut filled = Vec::new();
    for item in ctx.store.types_in_categories(&category_ids) {
        if item.volume.is_some() {
            continue;
        }
        let volume = item
            .variation_parent_type_id
            .filter(|parent| *parent != item.id)
            .and_then(|parent| ctx.store.find::<Type>(parent))
            .and_then(|parent| parent.volume)
            .ok_or_else(|| {
                DataError::precondition(format!(
                    "type #{} {:?} has no volume and no variation parent to copy one from",
                    item.id, item.name
                ))
            })?;
        filled.push((item.id, volume));
    }
    for (id, volume) in filled {
        ctx.store.replace::<Type>(id, |t| t.with_volume(volume))?;
        debug!(type_id = id, volume, "copied volume from variation parent");
    }
    Ok(())
}
