//! A small export that exercises every fixup pass and passes every validator check.
//!
//! Ids and names follow the real SDE where one exists.

#![allow(dead_code)]

use eve_dogma_compiler::model::*;

// =============================================================================
// Well-known ids
// =============================================================================

pub const RIFTER: i32 = 587;
pub const GARMUR: i32 = 33816;
pub const JACKDAW: i32 = 34828;
pub const CONFESSOR: i32 = 34317;
pub const JACKDAW_DEFENSE_MODE: i32 = 35676;
pub const JACKDAW_PROPULSION_MODE: i32 = 35677;
pub const CONFESSOR_SHARPSHOOTER_MODE: i32 = 34319;

pub const AUTOCANNON: i32 = 484;
pub const GYROSTABILIZER: i32 = 519;
pub const AFTERBURNER_I: i32 = 439;
pub const AFTERBURNER_II: i32 = 438;
pub const ABYSSAL_AFTERBURNER: i32 = 47740;
pub const SMALL_RIG: i32 = 31724;
pub const MEDIUM_RIG: i32 = 31790;
pub const QA_MODULE: i32 = 9999;

pub const EMP_S: i32 = 185;
pub const SHIELD_HARMONIZING_CHARGE: i32 = 42832;
pub const SHIELD_EXTENSION_CHARGE: i32 = 42833;
pub const RAPID_DEPLOYMENT_CHARGE: i32 = 42836;
pub const RAPID_DEPLOYMENT_CHARGE_II: i32 = 42837;

pub const LOW_GRADE_CRYSTAL_ALPHA: i32 = 20121;
pub const MID_GRADE_CRYSTAL_ALPHA: i32 = 20157;
pub const STANDARD_BLUE_PILL: i32 = 15464;
pub const IMPROVED_BLUE_PILL: i32 = 15465;

pub const AFTERBURNER_SKILL: i32 = 3450;
pub const HIGH_SPEED_MANEUVERING: i32 = 3454;
pub const SMALL_PROJECTILE_TURRET: i32 = 3301;

pub const RIFTER_ICON: i32 = 3334;
pub const RIFTER_TRAITS: &str = "5% bonus to Small Projectile Turret damage per level";

pub const TRITANIUM: i32 = 34;
pub const MUTAPLASMID: i32 = 47749;

pub const CAPACITOR_NEED: i32 = 6;
pub const SPEED_FACTOR: i32 = 20;
pub const DAMAGE_MULTIPLIER: i32 = 64;
pub const EM_RESONANCE: i32 = 113;
pub const RIG_SIZE: i32 = 1547;

pub const PROJECTILE_FIRED: i32 = 34;
pub const RIG_SLOT: i32 = 2663;
pub const DAMAGE_SKILL_BONUS: i32 = 5001;
pub const LEGACY_EFFECT: i32 = 9001;

// =============================================================================
// Attribute sets
// =============================================================================

const SHIELD_RESONANCES: [(i32, &str); 4] = [
    (271, "shieldEmDamageResonance"),
    (274, "shieldThermalDamageResonance"),
    (273, "shieldKineticDamageResonance"),
    (272, "shieldExplosiveDamageResonance"),
];

const ARMOR_RESONANCES: [(i32, &str); 4] = [
    (267, "armorEmDamageResonance"),
    (270, "armorThermalDamageResonance"),
    (269, "armorKineticDamageResonance"),
    (268, "armorExplosiveDamageResonance"),
];

const HULL_RESONANCES: [(i32, &str); 4] = [
    (EM_RESONANCE, "emDamageResonance"),
    (110, "thermalDamageResonance"),
    (109, "kineticDamageResonance"),
    (111, "explosiveDamageResonance"),
];

const OTHER_ATTRIBUTES: [(i32, &str); 22] = [
    (CAPACITOR_NEED, "capacitorNeed"),
    (SPEED_FACTOR, "speedFactor"),
    (38, "capacity"),
    (DAMAGE_MULTIPLIER, "damageMultiplier"),
    (128, "chargeSize"),
    (153, "warpCapacitorNeed"),
    (263, "shieldCapacity"),
    (265, "armorHP"),
    (331, "implantness"),
    (352, "maxActiveDrones"),
    (552, "signatureRadius"),
    (604, "chargeGroup1"),
    (1087, "boosterness"),
    (RIG_SIZE, "rigSize"),
    (2468, "warfareBuff1ID"),
    (2469, "warfareBuff1Value"),
    (2470, "warfareBuff2ID"),
    (2471, "warfareBuff2Value"),
    (2472, "warfareBuff3ID"),
    (2473, "warfareBuff3Value"),
    (2536, "warfareBuff4ID"),
    (2537, "warfareBuff4Value"),
];

const SEC_STATUS_BONUS_CAP: i32 = 3703;

/// Shield, armor and hull resonances plus the rest of what a hull must carry
fn hull_dogma(id: i32, with_hull_resonances: bool) -> DogmaType {
    let mut dogma = DogmaType::new(id)
        .with_attribute(153, 1.0)
        .with_attribute(263, 450.0)
        .with_attribute(265, 400.0)
        .with_attribute(552, 35.0);
    for (attribute_id, _) in SHIELD_RESONANCES.iter().chain(&ARMOR_RESONANCES) {
        dogma = dogma.with_attribute(*attribute_id, 0.8);
    }
    if with_hull_resonances {
        for (attribute_id, _) in HULL_RESONANCES {
            dogma = dogma.with_attribute(attribute_id, 0.67);
        }
    }
    dogma
}

fn with_race(item: Type, race_id: i32, meta_group_id: i32) -> Type {
    Type {
        race_id: Some(race_id),
        meta_group_id: Some(meta_group_id),
        ..item
    }
}

// =============================================================================
// The export
// =============================================================================

pub fn export() -> EveDataBuilder {
    let mut b = EveDataBuilder::new();

    b.insert(MetaGroup { id: 1, name: "Tech I".into() });
    b.insert(MetaGroup { id: 2, name: "Tech II".into() });
    b.insert(Race { id: 1, name: "Caldari".into() });
    b.insert(Race { id: 2, name: "Minmatar".into() });
    b.insert(Race { id: 4, name: "Amarr".into() });
    b.insert(MarketGroup {
        id: 9,
        name: "Ship Equipment".into(),
        parent_group_id: None,
        icon_id: None,
        has_types: false,
    });
    b.insert(MarketGroup {
        id: 542,
        name: "Afterburners".into(),
        parent_group_id: Some(9),
        icon_id: Some(96),
        has_types: true,
    });

    for (id, name) in [
        (4, "Material"),
        (6, "Ship"),
        (7, "Module"),
        (8, "Charge"),
        (16, "Skill"),
        (17, "Commodity"),
        (18, "Drone"),
        (20, "Implant"),
        (32, "Subsystem"),
        (87, "Fighter"),
    ] {
        b.insert(Category::new(id, name));
    }
    for (id, name, category_id) in [
        (18, "Mineral", 4),
        (25, "Frigate", 6),
        (1305, "Tactical Destroyer", 6),
        (1306, "Ship Modifiers", 6),
        (46, "Propulsion Module", 7),
        (55, "Projectile Weapon", 7),
        (59, "Gyrostabilizer", 7),
        (774, "Rig Shield", 7),
        (83, "Projectile Ammo", 8),
        (1769, "Command Burst Charges", 8),
        (255, "Gunnery", 16),
        (275, "Navigation", 16),
        (1964, "Mutaplasmids", 17),
        (100, "Combat Drone", 18),
        (300, "Cyberimplant", 20),
        (303, "Booster", 20),
        (954, "Defensive Subsystem", 32),
        (1652, "Light Fighter", 87),
    ] {
        b.insert(Group::new(id, name, category_id));
    }

    for (id, name) in SHIELD_RESONANCES
        .iter()
        .chain(&ARMOR_RESONANCES)
        .chain(&HULL_RESONANCES)
        .chain(&OTHER_ATTRIBUTES)
    {
        b.insert(DogmaAttribute::new(*id, *name));
    }
    b.insert(
        DogmaAttribute::new(SEC_STATUS_BONUS_CAP, "secStatusBonusCap").with_high_is_good(true),
    );

    b.insert(DogmaEffect::new(10, "targetAttack", EffectCategory::Active));
    b.insert(DogmaEffect {
        is_offensive: true,
        ..DogmaEffect::new(PROJECTILE_FIRED, "projectileFired", EffectCategory::Active)
    });
    b.insert(DogmaEffect::new(101, "useMissiles", EffectCategory::Active));
    b.insert(DogmaEffect::new(RIG_SLOT, "rigSlot", EffectCategory::Passive));
    b.insert(
        DogmaEffect::new(DAMAGE_SKILL_BONUS, "damageMultiplierSkillBonus", EffectCategory::Passive)
            .with_modifiers(vec![DogmaModifier::new(
                ModifierFunc::LocationRequiredSkillModifier,
                ModifierDomain::Char,
            )
            .with_attributes(DAMAGE_MULTIPLIER, Operation::PostMultiply, DAMAGE_MULTIPLIER)
            .with_skill(SMALL_PROJECTILE_TURRET)]),
    );
    b.insert(
        DogmaEffect::new(5100, "implantSpeedBonus", EffectCategory::Passive).with_modifiers(vec![
            DogmaModifier::new(ModifierFunc::ItemModifier, ModifierDomain::Ship)
                .with_attributes(SPEED_FACTOR, Operation::AddPercent, SPEED_FACTOR),
        ]),
    );
    b.insert(DogmaEffect::new(
        LEGACY_EFFECT,
        "legacyDungeonEffect",
        EffectCategory::Unrecognized(7),
    ));

    // Skills
    b.insert(Type::new(AFTERBURNER_SKILL, "Afterburner", 275).with_volume(0.01));
    b.insert(Type::new(HIGH_SPEED_MANEUVERING, "High Speed Maneuvering", 275).with_volume(0.01));
    b.insert(Type::new(SMALL_PROJECTILE_TURRET, "Small Projectile Turret", 255).with_volume(0.01));

    // Ships and tactical modes
    b.insert(with_race(
        Type {
            mass: Some(1_067_000.0),
            radius: Some(31.0),
            icon_id: Some(RIFTER_ICON),
            traits: Some(RIFTER_TRAITS.into()),
            ..Type::new(RIFTER, "Rifter", 25)
                .with_volume(27289.0)
                .with_capacity(140.0)
        },
        2,
        1,
    ));
    b.insert(hull_dogma(RIFTER, true));
    b.insert(Type::new(GARMUR, "Garmur", 25).with_volume(27289.0));
    b.insert(hull_dogma(GARMUR, true).with_attribute(SEC_STATUS_BONUS_CAP, 5.0));
    b.insert(with_race(
        Type::new(JACKDAW, "Jackdaw", 1305).with_volume(47000.0),
        1,
        2,
    ));
    b.insert(hull_dogma(JACKDAW, false));
    b.insert(Type::new(CONFESSOR, "Confessor", 1305).with_volume(47000.0));
    b.insert(hull_dogma(CONFESSOR, true));
    for (id, name) in [
        (JACKDAW_DEFENSE_MODE, "Jackdaw Defense Mode"),
        (JACKDAW_PROPULSION_MODE, "Jackdaw Propulsion Mode"),
        (CONFESSOR_SHARPSHOOTER_MODE, "Confessor Sharpshooter Mode"),
    ] {
        b.insert(Type::new(id, name, 1306).unpublished());
    }

    // Modules
    b.insert(
        Type::new(AUTOCANNON, "125mm Gatling AutoCannon I", 55)
            .with_volume(5.0)
            .with_capacity(0.5),
    );
    b.insert(
        DogmaType::new(AUTOCANNON)
            .with_attribute(CAPACITOR_NEED, 0.0)
            .with_attribute(604, 83.0)
            .with_attribute(128, 1.0)
            .with_attribute(DAMAGE_MULTIPLIER, 2.0)
            .with_effect(PROJECTILE_FIRED),
    );
    b.insert(Type::new(GYROSTABILIZER, "Gyrostabilizer I", 59).with_volume(5.0));
    b.insert(
        DogmaType::new(GYROSTABILIZER)
            .with_attribute(DAMAGE_MULTIPLIER, 1.1)
            .with_effect(DAMAGE_SKILL_BONUS),
    );
    b.insert(Type {
        market_group_id: Some(542),
        description: Some("Gives a boost to the maximum velocity of the ship.".into()),
        ..Type::new(AFTERBURNER_I, "1MN Afterburner I", 46).with_volume(5.0)
    });
    b.insert(DogmaType::new(AFTERBURNER_I).with_attribute(SPEED_FACTOR, 112.5));
    b.insert(
        Type::new(AFTERBURNER_II, "1MN Afterburner II", 46).with_variation_parent(AFTERBURNER_I),
    );
    b.insert(DogmaType::new(AFTERBURNER_II).with_attribute(SPEED_FACTOR, 135.0));
    b.insert(
        Type::new(ABYSSAL_AFTERBURNER, "Abyssal 1MN Afterburner", 46)
            .with_volume(5.0)
            .unpublished(),
    );
    b.insert(
        Type::new(SMALL_RIG, "Small Anti-EM Screen Reinforcer I", 774).with_volume(5.0),
    );
    b.insert(DogmaType::new(SMALL_RIG).with_effect(RIG_SLOT));
    b.insert(
        Type::new(MEDIUM_RIG, "Medium Core Defense Field Extender I", 774).with_volume(10.0),
    );
    b.insert(
        DogmaType::new(MEDIUM_RIG)
            .with_attribute(RIG_SIZE, 2.0)
            .with_effect(RIG_SLOT),
    );
    b.insert(Type::new(QA_MODULE, "QA Damage Module", 59).unpublished());

    // Charges
    b.insert(Type::new(EMP_S, "EMP S", 83).with_volume(0.0025));
    b.insert(DogmaType::new(EMP_S).with_attribute(128, 1.0));
    for (id, name, buffs) in [
        (
            SHIELD_HARMONIZING_CHARGE,
            "Shield Harmonizing Charge",
            &[(10.0, -8.0)][..],
        ),
        (
            SHIELD_EXTENSION_CHARGE,
            "Shield Extension Charge",
            &[(12.0, 10.0)][..],
        ),
        (
            RAPID_DEPLOYMENT_CHARGE,
            "Rapid Deployment Charge",
            &[(21.0, 8.0), (19.0, -4.0)][..],
        ),
        (
            RAPID_DEPLOYMENT_CHARGE_II,
            "Rapid Deployment Charge II",
            &[(21.0, 10.0), (19.0, -5.0)][..],
        ),
    ] {
        b.insert(Type::new(id, name, 1769).with_volume(1.0));
        let slots = [(2468, 2469), (2470, 2471), (2472, 2473), (2536, 2537)];
        let mut dogma = DogmaType::new(id);
        for ((buff_id, value), (id_attribute, value_attribute)) in buffs.iter().zip(slots) {
            dogma = dogma
                .with_attribute(id_attribute, *buff_id)
                .with_attribute(value_attribute, *value);
        }
        b.insert(dogma);
    }

    // Drones, fighters, subsystems
    b.insert(Type::new(2454, "Hobgoblin I", 100).with_volume(5.0));
    b.insert(Type::new(23055, "Templar I", 1652).with_volume(2500.0));
    b.insert(Type::new(45586, "Legion Defensive - Covert Reconfiguration", 954).with_volume(40.0));

    // Implants and boosters
    b.insert(Type::new(LOW_GRADE_CRYSTAL_ALPHA, "Low-grade Crystal Alpha", 300).with_volume(1.0));
    b.insert(
        DogmaType::new(LOW_GRADE_CRYSTAL_ALPHA)
            .with_attribute(331, 1.0)
            .with_effect(5100),
    );
    b.insert(Type::new(MID_GRADE_CRYSTAL_ALPHA, "Mid-grade Crystal Alpha", 300));
    b.insert(
        DogmaType::new(MID_GRADE_CRYSTAL_ALPHA)
            .with_attribute(331, 1.0)
            .with_effect(5100),
    );
    b.insert(Type::new(STANDARD_BLUE_PILL, "Standard Blue Pill Booster", 303).with_volume(1.0));
    b.insert(DogmaType::new(STANDARD_BLUE_PILL).with_attribute(1087, 3.0));
    b.insert(Type::new(IMPROVED_BLUE_PILL, "Improved Blue Pill Booster", 303));
    b.insert(DogmaType::new(IMPROVED_BLUE_PILL).with_attribute(1087, 3.0));

    // Outside the emitted categories
    b.insert(Type::new(TRITANIUM, "Tritanium", 18).with_volume(0.01));
    b.insert(Type::new(MUTAPLASMID, "Decayed 1MN Afterburner Mutaplasmid", 1964).with_volume(1.0));
    b.insert(Mutaplasmid {
        id: MUTAPLASMID,
        name: "Decayed 1MN Afterburner Mutaplasmid".into(),
        mappings: vec![MutaplasmidMapping {
            applicable_type_ids: vec![AFTERBURNER_I, AFTERBURNER_II],
            resulting_type_id: ABYSSAL_AFTERBURNER,
        }],
        attributes: vec![MutaplasmidAttribute {
            attribute_id: SPEED_FACTOR,
            min: 0.95,
            max: 1.1,
        }],
    });

    b
}

/// The export as a checked snapshot
pub fn export_data() -> EveData {
    export().build().expect("fixture export is consistent")
}
