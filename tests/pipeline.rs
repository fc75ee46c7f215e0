//! End-to-end tests: fixture export through fixups, validation and the binary round trip.

mod common;

use common::*;
use pretty_assertions::assert_eq;

use eve_dogma_compiler::classify::classify_modifier;
use eve_dogma_compiler::compiler::format::TypeRecord;
use eve_dogma_compiler::compiler::{compile, compile_to_file, decode, CompiledResource};
use eve_dogma_compiler::fixups::run_pipeline;
use eve_dogma_compiler::graph::{GraphStore, SyntheticIds};
use eve_dogma_compiler::model::*;
use eve_dogma_compiler::validate::{validate, validate_modules_with_charges_have_capacity};

// =============================================================================
// Helpers
// =============================================================================

fn fixed_up() -> EveData {
    let mut store = GraphStore::new(export_data());
    let mut ids = SyntheticIds::new();
    run_pipeline(&mut store, &mut ids).unwrap();
    store.freeze()
}

fn compiled(data: &EveData) -> (Vec<u8>, CompiledResource) {
    let mut bytes = Vec::new();
    let stats = compile(data, &mut bytes).unwrap();
    assert_eq!(stats.bytes, bytes.len() as u64);
    let resource = decode(bytes.as_slice()).unwrap();
    (bytes, resource)
}

fn attribute_id(data: &EveData, name: &str) -> i32 {
    data.by_name::<DogmaAttribute>(name).unwrap().id
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn test_fixture_passes_validation_after_fixups() {
    let data = fixed_up();
    validate(&data).unwrap();
}

#[test]
fn test_tactical_modes_resolve_to_their_destroyer() {
    let data = fixed_up();
    let ship_id = attribute_id(&data, "tacticalDestroyerShipId");

    assert_eq!(
        data.attribute_value(JACKDAW_DEFENSE_MODE, ship_id),
        Some(f64::from(JACKDAW))
    );
    assert_eq!(
        data.attribute_value(JACKDAW_PROPULSION_MODE, ship_id),
        Some(f64::from(JACKDAW))
    );
    assert_eq!(
        data.attribute_value(CONFESSOR_SHARPSHOOTER_MODE, ship_id),
        Some(f64::from(CONFESSOR))
    );

    let mode = data.get::<Type>(JACKDAW_DEFENSE_MODE).unwrap();
    assert!(mode.published);
    assert_eq!(data.category_of(mode).unwrap().name, "Tactical Mode");
}

#[test]
fn test_irrelevant_types_are_pruned() {
    let data = fixed_up();
    assert!(!data.contains::<Type>(TRITANIUM));
    assert!(!data.contains::<Type>(QA_MODULE));
    assert!(!data.contains::<Type>(MUTAPLASMID));
    // Unpublished, but the mutaplasmid produces it
    assert!(data.contains::<Type>(ABYSSAL_AFTERBURNER));

    let mutaplasmid = data.get::<Mutaplasmid>(MUTAPLASMID).unwrap();
    assert_eq!(
        mutaplasmid.mappings[0].applicable_type_ids,
        vec![AFTERBURNER_I, AFTERBURNER_II]
    );
}

#[test]
fn test_every_reference_resolves() {
    let data = fixed_up();
    data.check_all_references().unwrap();

    for effect in data.iter::<DogmaEffect>() {
        for modifier in &effect.modifiers {
            if let Some(skill) = modifier.skill_type_id {
                assert!(data.contains::<Type>(skill), "{} -> skill {}", effect.name, skill);
            }
            if let Some(group) = modifier.group_id {
                assert!(data.contains::<Group>(group));
            }
        }
    }
}

#[test]
fn test_repairs_are_applied() {
    let data = fixed_up();

    // Hull resonances default to neutral
    assert_eq!(data.attribute_value(JACKDAW, EM_RESONANCE), Some(1.0));
    assert_eq!(data.attribute_value(RIFTER, EM_RESONANCE), Some(0.67));

    // Projectile weapons lose capacitorNeed and gain damage attributes
    assert_eq!(data.attribute_value(AUTOCANNON, CAPACITOR_NEED), None);
    let em_damage = attribute_id(&data, "weaponEmDamage");
    assert_eq!(data.attribute_value(AUTOCANNON, em_damage), Some(0.0));

    // Rig size from the name
    assert_eq!(data.attribute_value(SMALL_RIG, RIG_SIZE), Some(1.0));
    assert_eq!(data.attribute_value(MEDIUM_RIG, RIG_SIZE), Some(2.0));

    // Volumes from variation parents, including clustered implants and boosters
    assert_eq!(data.get::<Type>(AFTERBURNER_II).unwrap().volume, Some(5.0));
    let mid_grade = data.get::<Type>(MID_GRADE_CRYSTAL_ALPHA).unwrap();
    assert_eq!(mid_grade.variation_parent_type_id, Some(LOW_GRADE_CRYSTAL_ALPHA));
    assert_eq!(mid_grade.volume, Some(1.0));
    let improved = data.get::<Type>(IMPROVED_BLUE_PILL).unwrap();
    assert_eq!(improved.variation_parent_type_id, Some(STANDARD_BLUE_PILL));
    assert_eq!(improved.volume, Some(1.0));

    // Resonances are low-is-good and not stackable
    let resonance = data.get::<DogmaAttribute>(EM_RESONANCE).unwrap();
    assert_eq!(resonance.high_is_good, Some(false));
    assert!(!resonance.stackable);
}

#[test]
fn test_module_character_modifiers_target_the_ship() {
    let data = fixed_up();
    let effect = data.get::<DogmaEffect>(DAMAGE_SKILL_BONUS).unwrap();
    assert_eq!(effect.modifiers[0].domain, ModifierDomain::Ship);
    assert_eq!(
        classify_modifier(&effect.modifiers[0]),
        (
            eve_dogma_compiler::classify::AffectedItemsType::FittedModules,
            eve_dogma_compiler::classify::AffectedItemsFilter::MatchRequiredSkill
        )
    );
}

#[test]
fn test_command_bursts_share_effects_by_buff_set() {
    let data = fixed_up();
    let effects_of = |id| -> Vec<String> {
        data.effects_of(id)
            .unwrap()
            .into_iter()
            .map(|e| e.name.clone())
            .collect()
    };

    assert_eq!(effects_of(SHIELD_HARMONIZING_CHARGE), vec!["commandBurst_10"]);
    assert_eq!(effects_of(SHIELD_EXTENSION_CHARGE), vec!["commandBurst_12"]);
    assert_eq!(effects_of(RAPID_DEPLOYMENT_CHARGE), vec!["commandBurst_21_19"]);
    assert_eq!(
        data.dogma_of(RAPID_DEPLOYMENT_CHARGE).unwrap().effect_ids,
        data.dogma_of(RAPID_DEPLOYMENT_CHARGE_II).unwrap().effect_ids
    );
}

#[test]
fn test_security_status_scaling_only_on_capped_hulls() {
    let data = fixed_up();
    let inverse = attribute_id(&data, "inverseCappedSecStatus");
    assert_eq!(data.attribute_value(GARMUR, inverse), Some(0.0));
    assert_eq!(data.attribute_value(RIFTER, inverse), None);
}

#[test]
fn test_pipeline_is_stable_when_run_twice() {
    let mut store = GraphStore::new(export_data());
    let mut ids = SyntheticIds::new();
    run_pipeline(&mut store, &mut ids).unwrap();
    let (first, _) = compiled(&store.clone().freeze());

    run_pipeline(&mut store, &mut ids).unwrap();
    let (second, _) = compiled(&store.freeze());
    assert_eq!(first, second);
}

// =============================================================================
// Binary resource
// =============================================================================

#[test]
fn test_round_trip_reproduces_every_type() {
    let data = fixed_up();
    validate(&data).unwrap();
    let (_, resource) = compiled(&data);

    let records: Vec<_> = resource.types().collect();
    assert_eq!(records.len(), data.count::<Type>());

    for record in records {
        let item = data.get::<Type>(record.id).unwrap();
        assert_eq!(record, &expected_record(&data, item), "record of {}", item.name);
    }

    // Every optional field is exercised by at least one type
    let rifter = resource.types().find(|r| r.id == RIFTER).unwrap();
    assert_eq!(rifter.mass, Some(1_067_000.0));
    assert_eq!(rifter.radius, Some(31.0));
    assert_eq!(rifter.icon_id, Some(RIFTER_ICON));
    assert_eq!(rifter.traits.as_deref(), Some(RIFTER_TRAITS));
}

fn expected_record(data: &EveData, item: &Type) -> TypeRecord {
    let (attributes, effect_ids) = match data.dogma_of(item.id) {
        Some(dogma) => (
            dogma
                .attribute_values
                .iter()
                .map(|av| (av.attribute_id, av.value))
                .collect(),
            dogma.effect_ids.clone(),
        ),
        None => (Vec::new(), Vec::new()),
    };
    TypeRecord {
        id: item.id,
        group_id: item.group_id,
        name: item.name.clone(),
        published: item.published,
        meta_group_id: item.meta_group_id,
        market_group_id: item.market_group_id,
        race_id: item.race_id,
        variation_parent_type_id: item.variation_parent_type_id,
        icon_id: item.icon_id,
        capacity: item.capacity,
        mass: item.mass,
        radius: item.radius,
        volume: item.volume,
        description: item.description.clone(),
        traits: item.traits.clone(),
        attributes,
        effect_ids,
    }
}

#[test]
fn test_resource_sections() {
    let data = fixed_up();
    let (_, resource) = compiled(&data);

    assert_eq!(resource.character.name, "Character");
    assert_eq!(resource.warfare_buffs.name, "Warfare Buffs");
    assert_eq!(resource.warfare_buffs.attributes.len(), 6);
    assert_eq!(resource.meta_groups.len(), 2);
    assert_eq!(resource.races.len(), 3);
    assert!(resource.market_groups[1].has_types);

    let sections: Vec<&str> = resource
        .type_sections
        .iter()
        .map(|s| {
            resource
                .categories
                .iter()
                .find(|c| c.id == s.category_id)
                .map(|c| c.name.as_str())
                .unwrap()
        })
        .collect();
    assert_eq!(
        sections,
        vec![
            "Skill",
            "Ship",
            "Module",
            "Charge",
            "Drone",
            "Fighter",
            "Implant",
            "Subsystem",
            "Tactical Mode"
        ]
    );

    // Effects with an unrecognized category are not emitted
    assert!(resource.effects.iter().all(|e| e.id != LEGACY_EFFECT));
    assert_eq!(resource.effects.len(), data.count::<DogmaEffect>() - 1);

    assert_eq!(
        resource.abyssal_names,
        vec![(ABYSSAL_AFTERBURNER, "1MN Afterburner".to_string())]
    );
    let mutaplasmid = &resource.mutaplasmids[0];
    assert_eq!(
        mutaplasmid.mappings,
        vec![(vec![AFTERBURNER_I, AFTERBURNER_II], ABYSSAL_AFTERBURNER)]
    );
    assert_eq!(mutaplasmid.attributes, vec![(SPEED_FACTOR, 0.95, 1.1)]);
}

#[test]
fn test_absent_operation_round_trips_as_none() {
    let data = fixed_up();
    let (_, resource) = compiled(&data);
    let projectile = resource
        .effects
        .iter()
        .find(|e| e.id == PROJECTILE_FIRED)
        .unwrap();
    assert!(projectile.is_offensive);
    assert!(projectile.modifiers.is_empty());

    let cap = resource
        .effects
        .iter()
        .find(|e| e.name == "inverseSecStatusCap")
        .unwrap();
    assert_eq!(cap.modifiers[0].operation, Some(Operation::CoerceAtMost));
}

#[test]
fn test_compile_to_file() {
    let data = fixed_up();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dogma.bin");

    let stats = compile_to_file(&data, &output).unwrap();
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(stats.bytes, bytes.len() as u64);
    assert_eq!(stats.types, data.count::<Type>());
    assert!(!dir.path().join("dogma.bin.partial").exists());
}

// =============================================================================
// Failure scenarios
// =============================================================================

#[test]
fn test_module_with_charge_group_but_no_capacity() {
    let data = EveDataBuilder::new()
        .with(Category::new(7, "Module"))
        .with(Group::new(55, "Projectile Weapon", 7))
        .with(DogmaAttribute::new(604, "chargeGroup1"))
        .with(Type::new(486, "125mm Gatling AutoCannon I", 55))
        .with(DogmaType::new(486).with_attribute(604, 83.0))
        .build()
        .unwrap();

    let err = validate_modules_with_charges_have_capacity(&data).unwrap_err();
    assert!(err.is_precondition_violation());
    assert!(err.to_string().contains("#486"));

    let err = validate(&data).unwrap_err();
    assert!(err.to_string().contains("125mm Gatling AutoCannon I"));
}

#[test]
fn test_malformed_rig_fails_validation() {
    let mut store = GraphStore::new(export_data());
    let mut ids = SyntheticIds::new();
    run_pipeline(&mut store, &mut ids).unwrap();
    store.set_attribute(MEDIUM_RIG, RIG_SIZE, 5.0).unwrap();

    let err = validate(&store.freeze()).unwrap_err();
    assert!(err.is_precondition_violation());
    assert!(err.to_string().contains("validate_rig_sizes"));
    assert!(err.to_string().contains("Medium Core Defense Field Extender I"));
}

#[test]
fn test_missing_named_entity_aborts_the_pipeline() {
    let mut store = GraphStore::new(export_data());
    store
        .replace::<Group>(1306, |g| Group {
            name: "Ship Modes".into(),
            ..g
        })
        .unwrap();
    let mut ids = SyntheticIds::new();

    let err = run_pipeline(&mut store, &mut ids).unwrap_err();
    assert_eq!(err.fixup, "reclassify_tactical_modes");
    assert!(err.to_string().contains("reclassify_tactical_modes"));
}

#[test]
fn test_validation_covers_every_emitted_effect() {
    let mut store = GraphStore::new(export_data());
    let mut ids = SyntheticIds::new();
    run_pipeline(&mut store, &mut ids).unwrap();
    store
        .add(
            DogmaEffect::new(777777, "skillLevelBonus", EffectCategory::Passive).with_modifiers(
                vec![DogmaModifier::new(ModifierFunc::ItemModifier, ModifierDomain::Ship)
                    .with_attributes(SPEED_FACTOR, Operation::Unrecognized(9), SPEED_FACTOR)],
            ),
        )
        .unwrap();
    let data = store.freeze();

    let err = validate(&data).unwrap_err();
    assert!(err.to_string().contains("validate_referenced_effects_encodable"));
    assert!(err.to_string().contains("skillLevelBonus"));
}
