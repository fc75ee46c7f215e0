//! Flag bytes and decoded record types of the compiled resource.
//!
//! Every multi-byte value is big-endian. An optional id is written as an int with 0 for absent.

use bitflags::bitflags;

use crate::classify::{AffectedItemsFilter, AffectedItemsType};
use crate::model::{EffectCategory, Operation};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MarketGroupFlags: u8 {
        const HAS_TYPES = 1;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AttributeFlags: u8 {
        const STACKABLE = 1;
        const HAS_HIGH_IS_GOOD = 1 << 1;
        const HIGH_IS_GOOD = 1 << 2;
        const HAS_DISPLAY_NAME = 1 << 3;
        const HAS_RANGE = 1 << 4;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EffectFlags: u8 {
        const OFFENSIVE = 1;
        const ASSISTIVE = 1 << 1;
        const HAS_CONDITION = 1 << 2;
    }
}

bitflags! {
    /// Which optional fields follow in a type record
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeFlags: u8 {
        const PUBLISHED = 1;
        const CAPACITY = 1 << 1;
        const MASS = 1 << 2;
        const RADIUS = 1 << 3;
        const VOLUME = 1 << 4;
        const DESCRIPTION = 1 << 5;
        const TRAITS = 1 << 6;
    }
}

/// Prefix removed from mutaplasmid result names
pub const ABYSSAL_PREFIX: &str = "Abyssal ";

#[derive(Debug, Clone, PartialEq)]
pub struct NamedRecord {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketGroupRecord {
    pub id: i32,
    pub parent_group_id: Option<i32>,
    pub name: String,
    pub icon_id: Option<i32>,
    pub has_types: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRecord {
    pub id: i32,
    pub name: String,
    pub stackable: bool,
    pub high_is_good: Option<bool>,
    pub display_name: Option<String>,
    pub range: Option<(f64, f64)>,
    pub unit_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifierRecord {
    pub affected_items: AffectedItemsType,
    pub filter: AffectedItemsFilter,
    pub modified_attribute_id: Option<i32>,
    pub modifying_attribute_id: Option<i32>,
    pub attenuating_attribute_id: Option<i32>,
    pub operation: Option<Operation>,
    pub group_id: Option<i32>,
    pub skill_type_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectRecord {
    pub id: i32,
    pub name: String,
    pub category: EffectCategory,
    pub is_offensive: bool,
    pub is_assistive: bool,
    pub duration_attribute_id: Option<i32>,
    pub range_attribute_id: Option<i32>,
    pub falloff_attribute_id: Option<i32>,
    pub tracking_speed_attribute_id: Option<i32>,
    pub condition: Option<(i32, f64)>,
    pub modifiers: Vec<ModifierRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRecord {
    pub id: i32,
    pub group_id: i32,
    pub name: String,
    pub published: bool,
    pub meta_group_id: Option<i32>,
    pub market_group_id: Option<i32>,
    pub race_id: Option<i32>,
    pub variation_parent_type_id: Option<i32>,
    pub icon_id: Option<i32>,
    pub capacity: Option<f64>,
    pub mass: Option<f64>,
    pub radius: Option<f64>,
    pub volume: Option<f64>,
    pub description: Option<String>,
    pub traits: Option<String>,
    pub attributes: Vec<(i32, f64)>,
    pub effect_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSection {
    pub category_id: i32,
    pub types: Vec<TypeRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutaplasmidRecord {
    pub id: i32,
    pub name: String,
    /// (applicable type ids, resulting type id)
    pub mappings: Vec<(Vec<i32>, i32)>,
    /// (attribute id, min, max)
    pub attributes: Vec<(i32, f64, f64)>,
}

/// A decoded compiled resource, section by section in emission order
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledResource {
    pub meta_groups: Vec<NamedRecord>,
    pub market_groups: Vec<MarketGroupRecord>,
    pub races: Vec<NamedRecord>,
    pub attributes: Vec<AttributeRecord>,
    pub effects: Vec<EffectRecord>,
    pub categories: Vec<NamedRecord>,
    pub groups: Vec<GroupRecord>,
    pub character: TypeRecord,
    pub warfare_buffs: TypeRecord,
    pub type_sections: Vec<TypeSection>,
    pub mutaplasmids: Vec<MutaplasmidRecord>,
    /// (resulting type id, base name)
    pub abyssal_names: Vec<(i32, String)>,
}

impl CompiledResource {
    /// Every type record, synthetic entities first
    pub fn types(&self) -> impl Iterator<Item = &TypeRecord> {
        [&self.character, &self.warfare_buffs]
            .into_iter()
            .chain(self.type_sections.iter().flat_map(|s| s.types.iter()))
    }
}
