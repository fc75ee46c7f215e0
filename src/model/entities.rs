//! Entity value types.
//!
//! Entities are plain values. The graph store never mutates one in place; a change is made by
//! building a modified copy and replacing the stored entity with it.

use super::enums::{EffectCategory, ModifierDomain, ModifierFunc, Operation};

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

impl Category {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
}

impl Group {
    pub fn new(id: i32, name: impl Into<String>, category_id: i32) -> Self {
        Self {
            id,
            name: name.into(),
            category_id,
        }
    }
}

/// An item type
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub id: i32,
    pub name: String,
    pub group_id: i32,
    pub meta_group_id: Option<i32>,
    pub capacity: Option<f64>,
    pub mass: Option<f64>,
    pub radius: Option<f64>,
    pub volume: Option<f64>,
    pub variation_parent_type_id: Option<i32>,
    pub market_group_id: Option<i32>,
    pub race_id: Option<i32>,
    pub icon_id: Option<i32>,
    pub description: Option<String>,
    pub traits: Option<String>,
    pub published: bool,
}

impl Type {
    /// A published type with no optional fields set
    pub fn new(id: i32, name: impl Into<String>, group_id: i32) -> Self {
        Self {
            id,
            name: name.into(),
            group_id,
            meta_group_id: None,
            capacity: None,
            mass: None,
            radius: None,
            volume: None,
            variation_parent_type_id: None,
            market_group_id: None,
            race_id: None,
            icon_id: None,
            description: None,
            traits: None,
            published: true,
        }
    }

    pub fn with_volume(self, volume: f64) -> Self {
        Self {
            volume: Some(volume),
            ..self
        }
    }

    pub fn with_capacity(self, capacity: f64) -> Self {
        Self {
            capacity: Some(capacity),
            ..self
        }
    }

    pub fn with_variation_parent(self, parent_id: i32) -> Self {
        Self {
            variation_parent_type_id: Some(parent_id),
            ..self
        }
    }

    pub fn unpublished(self) -> Self {
        Self {
            published: false,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DogmaAttribute {
    pub id: i32,
    pub name: String,
    pub display_name: Option<String>,
    pub stackable: bool,
    /// `None` when the export does not say
    pub high_is_good: Option<bool>,
    pub range: Option<AttributeRange>,
    pub unit_id: Option<i32>,
}

impl DogmaAttribute {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            display_name: None,
            stackable: true,
            high_is_good: None,
            range: None,
            unit_id: None,
        }
    }

    pub fn with_high_is_good(self, high_is_good: bool) -> Self {
        Self {
            high_is_good: Some(high_is_good),
            ..self
        }
    }

    pub fn with_range(self, min: f64, max: f64) -> Self {
        Self {
            range: Some(AttributeRange { min, max }),
            ..self
        }
    }

    pub fn unstackable(self) -> Self {
        Self {
            stackable: false,
            ..self
        }
    }
}

/// Attribute that must hold a given value for an effect to apply
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectCondition {
    pub attribute_id: i32,
    pub value: f64,
}

/// One rule inside an effect
#[derive(Debug, Clone, PartialEq)]
pub struct DogmaModifier {
    pub domain: ModifierDomain,
    pub func: ModifierFunc,
    pub modified_attribute_id: Option<i32>,
    pub modifying_attribute_id: Option<i32>,
    pub attenuating_attribute_id: Option<i32>,
    pub operation: Option<Operation>,
    pub group_id: Option<i32>,
    pub skill_type_id: Option<i32>,
}

impl DogmaModifier {
    pub fn new(func: ModifierFunc, domain: ModifierDomain) -> Self {
        Self {
            domain,
            func,
            modified_attribute_id: None,
            modifying_attribute_id: None,
            attenuating_attribute_id: None,
            operation: None,
            group_id: None,
            skill_type_id: None,
        }
    }

    /// `modified <op>= modifying`
    pub fn with_attributes(self, modified: i32, operation: Operation, modifying: i32) -> Self {
        Self {
            modified_attribute_id: Some(modified),
            modifying_attribute_id: Some(modifying),
            operation: Some(operation),
            ..self
        }
    }

    pub fn with_skill(self, skill_type_id: i32) -> Self {
        Self {
            skill_type_id: Some(skill_type_id),
            ..self
        }
    }

    pub fn with_group(self, group_id: i32) -> Self {
        Self {
            group_id: Some(group_id),
            ..self
        }
    }

    /// Ids of every attribute the modifier mentions
    pub fn attribute_ids(&self) -> impl Iterator<Item = i32> {
        [
            self.modified_attribute_id,
            self.modifying_attribute_id,
            self.attenuating_attribute_id,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DogmaEffect {
    pub id: i32,
    pub name: String,
    pub category: EffectCategory,
    pub is_offensive: bool,
    pub is_assistive: bool,
    pub duration_attribute_id: Option<i32>,
    pub range_attribute_id: Option<i32>,
    pub falloff_attribute_id: Option<i32>,
    pub tracking_speed_attribute_id: Option<i32>,
    pub condition: Option<EffectCondition>,
    pub modifiers: Vec<DogmaModifier>,
}

impl DogmaEffect {
    pub fn new(id: i32, name: impl Into<String>, category: EffectCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            is_offensive: false,
            is_assistive: false,
            duration_attribute_id: None,
            range_attribute_id: None,
            falloff_attribute_id: None,
            tracking_speed_attribute_id: None,
            condition: None,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifiers(self, modifiers: Vec<DogmaModifier>) -> Self {
        Self { modifiers, ..self }
    }

    /// The duration/range/falloff/tracking attributes that are set
    pub fn meta_attribute_ids(&self) -> impl Iterator<Item = i32> {
        [
            self.duration_attribute_id,
            self.range_attribute_id,
            self.falloff_attribute_id,
            self.tracking_speed_attribute_id,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeValue {
    pub attribute_id: i32,
    pub value: f64,
}

/// The dogma facet of the [`Type`] with the same id
#[derive(Debug, Clone, PartialEq)]
pub struct DogmaType {
    pub id: i32,
    pub attribute_values: Vec<AttributeValue>,
    pub effect_ids: Vec<i32>,
}

impl DogmaType {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            attribute_values: Vec::new(),
            effect_ids: Vec::new(),
        }
    }

    pub fn attribute(&self, attribute_id: i32) -> Option<f64> {
        self.attribute_values
            .iter()
            .find(|av| av.attribute_id == attribute_id)
            .map(|av| av.value)
    }

    pub fn has_attribute(&self, attribute_id: i32) -> bool {
        self.attribute(attribute_id).is_some()
    }

    pub fn has_effect(&self, effect_id: i32) -> bool {
        self.effect_ids.contains(&effect_id)
    }

    /// Set an attribute, replacing its value in place or appending it
    pub fn with_attribute(mut self, attribute_id: i32, value: f64) -> Self {
        match self
            .attribute_values
            .iter_mut()
            .find(|av| av.attribute_id == attribute_id)
        {
            Some(existing) => existing.value = value,
            None => self.attribute_values.push(AttributeValue {
                attribute_id,
                value,
            }),
        }
        self
    }

    pub fn without_attribute(mut self, attribute_id: i32) -> Self {
        self.attribute_values
            .retain(|av| av.attribute_id != attribute_id);
        self
    }

    /// Attach an effect unless it is already attached
    pub fn with_effect(mut self, effect_id: i32) -> Self {
        if !self.effect_ids.contains(&effect_id) {
            self.effect_ids.push(effect_id);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaGroup {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketGroup {
    pub id: i32,
    pub name: String,
    pub parent_group_id: Option<i32>,
    pub icon_id: Option<i32>,
    pub has_types: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Race {
    pub id: i32,
    pub name: String,
}

/// Types a mutaplasmid can be applied to, and the type it turns them into
#[derive(Debug, Clone, PartialEq)]
pub struct MutaplasmidMapping {
    pub applicable_type_ids: Vec<i32>,
    pub resulting_type_id: i32,
}

/// Multiplier range a mutaplasmid rolls for one attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutaplasmidAttribute {
    pub attribute_id: i32,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutaplasmid {
    pub id: i32,
    pub name: String,
    pub mappings: Vec<MutaplasmidMapping>,
    pub attributes: Vec<MutaplasmidAttribute>,
}
