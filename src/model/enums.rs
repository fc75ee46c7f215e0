//! Closed enumerations decoded from the stringly/numerically typed SDE fields.
//!
//! Every enum carries an `Unrecognized` fallback so that values outside the known set survive
//! loading and are handled explicitly further down the line.

use std::fmt;

/// When an effect is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Applied whenever the item is present
    Always,
    Active,
    Projected,
    /// Applied while the item is online
    Passive,
    Overloaded,
    Unrecognized(i32),
}

impl EffectCategory {
    /// Decode an SDE `effectCategoryID`
    pub fn from_sde(id: i32) -> Self {
        match id {
            0 => EffectCategory::Always,
            1 => EffectCategory::Active,
            // Area effects are applied like targeted ones
            2 | 3 => EffectCategory::Projected,
            4 => EffectCategory::Passive,
            5 => EffectCategory::Overloaded,
            other => EffectCategory::Unrecognized(other),
        }
    }

    /// Byte written to the compiled resource, `None` if the category cannot be encoded
    pub fn code(self) -> Option<u8> {
        match self {
            EffectCategory::Always => Some(0),
            EffectCategory::Active => Some(1),
            EffectCategory::Projected => Some(2),
            EffectCategory::Passive => Some(4),
            EffectCategory::Overloaded => Some(5),
            EffectCategory::Unrecognized(_) => None,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(EffectCategory::Always),
            1 => Some(EffectCategory::Active),
            2 => Some(EffectCategory::Projected),
            4 => Some(EffectCategory::Passive),
            5 => Some(EffectCategory::Overloaded),
            _ => None,
        }
    }
}

/// The item a modifier's location is relative to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModifierDomain {
    Item,
    Ship,
    Char,
    Target,
    WarfareBuffs,
    Other,
    Unrecognized(String),
}

impl ModifierDomain {
    pub fn from_sde(value: &str) -> Self {
        match value {
            "itemID" => ModifierDomain::Item,
            "shipID" => ModifierDomain::Ship,
            "charID" => ModifierDomain::Char,
            "targetID" => ModifierDomain::Target,
            "warfareBuffsID" => ModifierDomain::WarfareBuffs,
            "otherID" => ModifierDomain::Other,
            other => ModifierDomain::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for ModifierDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierDomain::Item => write!(f, "itemID"),
            ModifierDomain::Ship => write!(f, "shipID"),
            ModifierDomain::Char => write!(f, "charID"),
            ModifierDomain::Target => write!(f, "targetID"),
            ModifierDomain::WarfareBuffs => write!(f, "warfareBuffsID"),
            ModifierDomain::Other => write!(f, "otherID"),
            ModifierDomain::Unrecognized(s) => write!(f, "{}", s),
        }
    }
}

/// How a modifier selects the items it applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModifierFunc {
    ItemModifier,
    LocationRequiredSkillModifier,
    LocationGroupModifier,
    LocationModifier,
    OwnerRequiredSkillModifier,
    EffectStopper,
    Unrecognized(String),
}

impl ModifierFunc {
    pub fn from_sde(value: &str) -> Self {
        match value {
            "ItemModifier" => ModifierFunc::ItemModifier,
            "LocationRequiredSkillModifier" => ModifierFunc::LocationRequiredSkillModifier,
            "LocationGroupModifier" => ModifierFunc::LocationGroupModifier,
            "LocationModifier" => ModifierFunc::LocationModifier,
            "OwnerRequiredSkillModifier" => ModifierFunc::OwnerRequiredSkillModifier,
            "EffectStopper" => ModifierFunc::EffectStopper,
            other => ModifierFunc::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for ModifierFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierFunc::ItemModifier => write!(f, "ItemModifier"),
            ModifierFunc::LocationRequiredSkillModifier => {
                write!(f, "LocationRequiredSkillModifier")
            }
            ModifierFunc::LocationGroupModifier => write!(f, "LocationGroupModifier"),
            ModifierFunc::LocationModifier => write!(f, "LocationModifier"),
            ModifierFunc::OwnerRequiredSkillModifier => write!(f, "OwnerRequiredSkillModifier"),
            ModifierFunc::EffectStopper => write!(f, "EffectStopper"),
            ModifierFunc::Unrecognized(s) => write!(f, "{}", s),
        }
    }
}

/// Arithmetic a modifier applies to the modified attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PreMultiply,
    Add,
    Subtract,
    PostMultiply,
    PostDivide,
    AddPercent,
    SetValue,
    SetMaxAbsValue,
    MultiplyPercent,
    CoerceAtLeast,
    CoerceAtMost,
    Unrecognized(i32),
}

impl Operation {
    /// Code written when a modifier has no operation
    pub const ABSENT_CODE: i32 = -255;

    /// Decode an SDE `operation` value
    pub fn from_sde(code: i32) -> Self {
        match code {
            0 => Operation::PreMultiply,
            2 => Operation::Add,
            3 => Operation::Subtract,
            4 => Operation::PostMultiply,
            5 => Operation::PostDivide,
            6 => Operation::AddPercent,
            7 => Operation::SetValue,
            other => Operation::Unrecognized(other),
        }
    }

    pub fn code(self) -> Option<i32> {
        match self {
            Operation::PreMultiply => Some(0),
            Operation::Add => Some(2),
            Operation::Subtract => Some(3),
            Operation::PostMultiply => Some(4),
            Operation::PostDivide => Some(5),
            Operation::AddPercent => Some(6),
            Operation::SetValue => Some(7),
            Operation::SetMaxAbsValue => Some(100),
            Operation::MultiplyPercent => Some(101),
            Operation::CoerceAtLeast => Some(102),
            Operation::CoerceAtMost => Some(103),
            Operation::Unrecognized(_) => None,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            100 => Some(Operation::SetMaxAbsValue),
            101 => Some(Operation::MultiplyPercent),
            102 => Some(Operation::CoerceAtLeast),
            103 => Some(Operation::CoerceAtMost),
            other => match Operation::from_sde(other) {
                Operation::Unrecognized(_) => None,
                op => Some(op),
            },
        }
    }
}
