//! Resolve which items a modifier targets.
//!
//! The compiled resource carries the result so the runtime never re-derives targeting from
//! `(func, domain)` pairs.

use crate::model::{DogmaModifier, ModifierDomain, ModifierFunc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffectedItemsType {
    None,
    AffectingItemItself,
    Ship,
    Character,
    FittedModules,
    FittedImplantsOrBoosters,
    LaunchablesRequiringSkill,
    LauncherModule,
    WarfareBuffsAggregate,
}

impl AffectedItemsType {
    pub fn code(self) -> u8 {
        match self {
            AffectedItemsType::None => 0,
            AffectedItemsType::AffectingItemItself => 1,
            AffectedItemsType::Ship => 2,
            AffectedItemsType::Character => 3,
            AffectedItemsType::FittedModules => 4,
            AffectedItemsType::FittedImplantsOrBoosters => 5,
            AffectedItemsType::LaunchablesRequiringSkill => 6,
            AffectedItemsType::LauncherModule => 7,
            AffectedItemsType::WarfareBuffsAggregate => 100,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => AffectedItemsType::None,
            1 => AffectedItemsType::AffectingItemItself,
            2 => AffectedItemsType::Ship,
            3 => AffectedItemsType::Character,
            4 => AffectedItemsType::FittedModules,
            5 => AffectedItemsType::FittedImplantsOrBoosters,
            6 => AffectedItemsType::LaunchablesRequiringSkill,
            7 => AffectedItemsType::LauncherModule,
            100 => AffectedItemsType::WarfareBuffsAggregate,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffectedItemsFilter {
    All,
    MatchRequiredSkill,
    MatchGroup,
}

impl AffectedItemsFilter {
    pub fn code(self) -> u8 {
        match self {
            AffectedItemsFilter::All => 1,
            AffectedItemsFilter::MatchRequiredSkill => 2,
            AffectedItemsFilter::MatchGroup => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(AffectedItemsFilter::All),
            2 => Some(AffectedItemsFilter::MatchRequiredSkill),
            3 => Some(AffectedItemsFilter::MatchGroup),
            _ => None,
        }
    }
}

/// Classify a `(func, domain)` pair.
///
/// Pairs outside the table resolve to `(None, All)`. Several such pairs occur in the export, but
/// no effect that survives the fixups uses them.
pub fn classify(
    func: &ModifierFunc,
    domain: &ModifierDomain,
) -> (AffectedItemsType, AffectedItemsFilter) {
    use AffectedItemsFilter as Filter;
    use AffectedItemsType as Items;
    use ModifierDomain as D;
    use ModifierFunc as F;

    match (func, domain) {
        (F::ItemModifier, D::Item) => (Items::AffectingItemItself, Filter::All),
        (F::ItemModifier, D::Ship) => (Items::Ship, Filter::All),
        (F::ItemModifier, D::Char) => (Items::Character, Filter::All),
        (F::ItemModifier, D::Other) => (Items::LauncherModule, Filter::All),
        (F::ItemModifier, D::WarfareBuffs) => (Items::WarfareBuffsAggregate, Filter::All),
        (F::LocationRequiredSkillModifier, D::Ship) => {
            (Items::FittedModules, Filter::MatchRequiredSkill)
        }
        (F::LocationRequiredSkillModifier, D::Char) => {
            (Items::FittedImplantsOrBoosters, Filter::MatchRequiredSkill)
        }
        (F::LocationGroupModifier, D::Ship) => (Items::FittedModules, Filter::MatchGroup),
        (F::LocationGroupModifier, D::Char) => {
            (Items::FittedImplantsOrBoosters, Filter::MatchGroup)
        }
        (F::LocationModifier, D::Ship) => (Items::FittedModules, Filter::All),
        (F::OwnerRequiredSkillModifier, D::Char) => {
            (Items::LaunchablesRequiringSkill, Filter::MatchRequiredSkill)
        }
        _ => (Items::None, Filter::All),
    }
}

pub fn classify_modifier(modifier: &DogmaModifier) -> (AffectedItemsType, AffectedItemsFilter) {
    classify(&modifier.func, &modifier.domain)
}
