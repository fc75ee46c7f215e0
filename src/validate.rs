//! Post-fixup checks of what the runtime relies on.
//!
//! Checks look entities up by name and treat an absent name as "nothing to check", so a graph
//! without rigs passes the rig check. Each failure names the offending type and the check.

use tracing::{debug, info};

use crate::classify::{classify_modifier, AffectedItemsType};
use crate::error::{DataError, DataResult};
use crate::fixups::known::{
    categories, synthetic, ARMOR_RESONANCES, CHARGE_GROUP_ATTRIBUTES, HULL_RESONANCES,
    SHIELD_RESONANCES, TYPE_SECTIONS,
};
use crate::model::{Category, DogmaAttribute, DogmaEffect, DogmaType, EveData, Type};

/// A named validator check
pub struct Check {
    pub name: &'static str,
    pub run: fn(&EveData) -> DataResult<()>,
}

/// Every check, in the order [`validate`] runs them
pub static CHECKS: &[Check] = &[
    Check {
        name: "validate_references",
        run: validate_references,
    },
    Check {
        name: "validate_modules_with_charges_have_capacity",
        run: validate_modules_with_charges_have_capacity,
    },
    Check {
        name: "validate_rig_sizes",
        run: validate_rig_sizes,
    },
    Check {
        name: "validate_charge_sizes",
        run: validate_charge_sizes,
    },
    Check {
        name: "validate_volumes",
        run: validate_volumes,
    },
    Check {
        name: "validate_ship_attributes",
        run: validate_ship_attributes,
    },
    Check {
        name: "validate_module_effects_do_not_target_implants",
        run: validate_module_effects_do_not_target_implants,
    },
    Check {
        name: "validate_referenced_effects_encodable",
        run: validate_referenced_effects_encodable,
    },
    Check {
        name: "validate_all_types_emitted",
        run: validate_all_types_emitted,
    },
];

const VOLUME_CATEGORIES: [&str; 7] = [
    categories::SHIP,
    categories::MODULE,
    categories::CHARGE,
    categories::DRONE,
    categories::FIGHTER,
    categories::IMPLANT,
    categories::SUBSYSTEM,
];

const SIZES: [f64; 4] = [1.0, 2.0, 3.0, 4.0];

/// Run every check, stopping at the first failure
pub fn validate(data: &EveData) -> DataResult<()> {
    for check in CHECKS {
        debug!(check = check.name, "validating");
        (check.run)(data)?;
    }
    info!(checks = CHECKS.len(), "graph is valid");
    Ok(())
}

fn violation(check: &str, item: &Type, detail: impl std::fmt::Display) -> DataError {
    DataError::precondition(format!(
        "{}: type #{} {:?} {}",
        check, item.id, item.name, detail
    ))
}

fn types_in_named_category<'a>(data: &'a EveData, name: &str) -> DataResult<Vec<&'a Type>> {
    Ok(match data.find_by_name::<Category>(name)? {
        Some(category) => data.types_in_category(category.id),
        None => Vec::new(),
    })
}

fn attribute_id(data: &EveData, name: &str) -> DataResult<Option<i32>> {
    Ok(data.find_by_name::<DogmaAttribute>(name)?.map(|a| a.id))
}

fn effect_id(data: &EveData, name: &str) -> DataResult<Option<i32>> {
    Ok(data.find_by_name::<DogmaEffect>(name)?.map(|e| e.id))
}

pub fn validate_references(data: &EveData) -> DataResult<()> {
    data.check_all_references()
}

pub fn validate_modules_with_charges_have_capacity(data: &EveData) -> DataResult<()> {
    let mut charge_groups = Vec::new();
    for name in CHARGE_GROUP_ATTRIBUTES {
        if let Some(id) = attribute_id(data, name)? {
            charge_groups.push((name, id));
        }
    }
    let capacity = attribute_id(data, "capacity")?;

    for module in types_in_named_category(data, categories::MODULE)? {
        let Some((declared, _)) = charge_groups
            .iter()
            .find(|(_, id)| data.attribute_value(module.id, *id).is_some())
        else {
            continue;
        };
        let has_capacity = module.capacity.is_some()
            || capacity.is_some_and(|id| data.attribute_value(module.id, id).is_some());
        if !has_capacity {
            return Err(violation(
                "validate_modules_with_charges_have_capacity",
                module,
                format!("declares {} but has no capacity", declared),
            ));
        }
    }
    Ok(())
}

pub fn validate_rig_sizes(data: &EveData) -> DataResult<()> {
    let Some(rig_slot) = effect_id(data, "rigSlot")? else {
        return Ok(());
    };
    let rig_size = attribute_id(data, "rigSize")?;
    for module in types_in_named_category(data, categories::MODULE)? {
        if !data.has_effect(module.id, rig_slot) {
            continue;
        }
        let size = rig_size.and_then(|id| data.attribute_value(module.id, id));
        match size {
            Some(size) if SIZES.contains(&size) => {}
            Some(size) => {
                return Err(violation(
                    "validate_rig_sizes",
                    module,
                    format!("has rigSize {}, expected 1, 2, 3 or 4", size),
                ))
            }
            None => return Err(violation("validate_rig_sizes", module, "has no rigSize")),
        }
    }
    Ok(())
}

pub fn validate_charge_sizes(data: &EveData) -> DataResult<()> {
    let Some(charge_size) = attribute_id(data, "chargeSize")? else {
        return Ok(());
    };
    for dogma in data.iter::<DogmaType>() {
        let Some(size) = dogma.attribute(charge_size) else {
            continue;
        };
        if !SIZES.contains(&size) {
            let item = data.get::<Type>(dogma.id)?;
            return Err(violation(
                "validate_charge_sizes",
                item,
                format!("has chargeSize {}, expected 1, 2, 3 or 4", size),
            ));
        }
    }
    Ok(())
}

pub fn validate_volumes(data: &EveData) -> DataResult<()> {
    for name in VOLUME_CATEGORIES {
        for item in types_in_named_category(data, name)? {
            if item.volume.is_none() {
                return Err(violation("validate_volumes", item, "has no volume"));
            }
        }
    }
    Ok(())
}

pub fn validate_ship_attributes(data: &EveData) -> DataResult<()> {
    let ships = types_in_named_category(data, categories::SHIP)?;
    if ships.is_empty() {
        return Ok(());
    }
    let mut required: Vec<&str> = Vec::new();
    required.extend(SHIELD_RESONANCES);
    required.extend(ARMOR_RESONANCES);
    required.extend(HULL_RESONANCES);
    required.push("warpCapacitorNeed");
    let mut attributes = Vec::new();
    for name in required {
        attributes.push((name, attribute_id(data, name)?));
    }

    for ship in ships {
        for (name, id) in &attributes {
            let present = id.is_some_and(|id| data.attribute_value(ship.id, id).is_some());
            if !present {
                return Err(violation(
                    "validate_ship_attributes",
                    ship,
                    format!("has no {}", name),
                ));
            }
        }
    }
    Ok(())
}

pub fn validate_module_effects_do_not_target_implants(data: &EveData) -> DataResult<()> {
    for module in types_in_named_category(data, categories::MODULE)? {
        for effect in data.effects_of(module.id)? {
            let targets_implants = effect.modifiers.iter().any(|m| {
                classify_modifier(m).0 == AffectedItemsType::FittedImplantsOrBoosters
            });
            if targets_implants {
                return Err(violation(
                    "validate_module_effects_do_not_target_implants",
                    module,
                    format!(
                        "has effect #{} {:?} modifying implants or boosters",
                        effect.id, effect.name
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn operations_encodable(effect: &DogmaEffect) -> bool {
    effect
        .modifiers
        .iter()
        .all(|m| m.operation.map_or(true, |op| op.code().is_some()))
}

/// Referenced effects need a recognized category, and every effect that gets emitted needs
/// recognized operations
pub fn validate_referenced_effects_encodable(data: &EveData) -> DataResult<()> {
    for dogma in data.iter::<DogmaType>() {
        for effect in data.effects_of(dogma.id)? {
            if effect.category.code().is_none() || !operations_encodable(effect) {
                let item = data.get::<Type>(dogma.id)?;
                return Err(violation(
                    "validate_referenced_effects_encodable",
                    item,
                    format!(
                        "has effect #{} {:?} with an unrecognized category or operation",
                        effect.id, effect.name
                    ),
                ));
            }
        }
    }

    // Unreferenced effects with a recognized category are still written
    for effect in data.iter::<DogmaEffect>() {
        if effect.category.code().is_some() && !operations_encodable(effect) {
            return Err(DataError::precondition(format!(
                "validate_referenced_effects_encodable: effect #{} {:?} has a modifier with an \
                 unrecognized operation",
                effect.id, effect.name
            )));
        }
    }
    Ok(())
}

pub fn validate_all_types_emitted(data: &EveData) -> DataResult<()> {
    for item in data.iter::<Type>() {
        let category = data.category_of(item)?;
        let name = category.name.as_str();
        let emitted = TYPE_SECTIONS.contains(&name)
            || name == synthetic::CHARACTER
            || name == synthetic::WARFARE_BUFFS;
        if !emitted {
            return Err(violation(
                "validate_all_types_emitted",
                item,
                format!("is in category {:?}, which is not emitted", name),
            ));
        }
    }
    Ok(())
}
