//! Raw SDE records as they appear on one JSONL line, and their conversion into model entities.

use serde::Deserialize;

use crate::error::{DataError, DataResult};
use crate::model::{
    AttributeValue, Category, DogmaAttribute, DogmaEffect, DogmaModifier, DogmaType,
    EffectCategory, EffectCondition, EntityKind, Group, MarketGroup, MetaGroup, ModifierDomain,
    ModifierFunc, Mutaplasmid, MutaplasmidAttribute, MutaplasmidMapping, Operation, Race, Type,
};

/// A localized text field; only the English value is used
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Localized {
    #[serde(default)]
    pub en: Option<String>,
}

impl Localized {
    fn english(self, kind: EntityKind, id: i32) -> DataResult<String> {
        self.en.ok_or_else(|| {
            DataError::precondition(format!("{} #{} has no English name", kind, id))
        })
    }

    /// English value, with an empty string treated as absent
    fn english_opt(self) -> Option<String> {
        self.en.filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    pub name: Localized,
}

impl CategoryRecord {
    pub fn into_entity(self) -> DataResult<Category> {
        Ok(Category::new(
            self.id,
            self.name.english(EntityKind::Category, self.id)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct GroupRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    #[serde(rename = "categoryID")]
    pub category_id: i32,
    pub name: Localized,
}

impl GroupRecord {
    pub fn into_entity(self) -> DataResult<Group> {
        Ok(Group::new(
            self.id,
            self.name.english(EntityKind::Group, self.id)?,
            self.category_id,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct TypeRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    #[serde(rename = "groupID")]
    pub group_id: i32,
    pub name: Localized,
    #[serde(default)]
    pub description: Option<Localized>,
    #[serde(default)]
    pub published: bool,
    #[serde(rename = "metaGroupID", default)]
    pub meta_group_id: Option<i32>,
    #[serde(rename = "marketGroupID", default)]
    pub market_group_id: Option<i32>,
    #[serde(rename = "raceID", default)]
    pub race_id: Option<i32>,
    #[serde(rename = "iconID", default)]
    pub icon_id: Option<i32>,
    #[serde(rename = "variationParentTypeID", default)]
    pub variation_parent_type_id: Option<i32>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub mass: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl TypeRecord {
    pub fn into_entity(self) -> DataResult<Type> {
        Ok(Type {
            id: self.id,
            name: self.name.english(EntityKind::Type, self.id)?,
            group_id: self.group_id,
            meta_group_id: self.meta_group_id,
            capacity: self.capacity,
            mass: self.mass,
            radius: self.radius,
            volume: self.volume,
            variation_parent_type_id: self.variation_parent_type_id,
            market_group_id: self.market_group_id,
            race_id: self.race_id,
            icon_id: self.icon_id,
            description: self.description.and_then(Localized::english_opt),
            traits: None,
            published: self.published,
        })
    }
}

fn default_stackable() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AttributeRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<Localized>,
    #[serde(default = "default_stackable")]
    pub stackable: bool,
    #[serde(rename = "highIsGood", default)]
    pub high_is_good: Option<bool>,
    #[serde(rename = "unitID", default)]
    pub unit_id: Option<i32>,
}

impl AttributeRecord {
    pub fn into_entity(self) -> DataResult<DogmaAttribute> {
        Ok(DogmaAttribute {
            id: self.id,
            name: self.name,
            display_name: self.display_name.and_then(Localized::english_opt),
            stackable: self.stackable,
            high_is_good: self.high_is_good,
            range: None,
            unit_id: self.unit_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ModifierRecord {
    pub domain: String,
    pub func: String,
    #[serde(rename = "modifiedAttributeID", default)]
    pub modified_attribute_id: Option<i32>,
    #[serde(rename = "modifyingAttributeID", default)]
    pub modifying_attribute_id: Option<i32>,
    #[serde(rename = "attenuatingAttributeID", default)]
    pub attenuating_attribute_id: Option<i32>,
    #[serde(default)]
    pub operation: Option<i32>,
    #[serde(rename = "groupID", default)]
    pub group_id: Option<i32>,
    #[serde(rename = "skillTypeID", default)]
    pub skill_type_id: Option<i32>,
}

impl From<ModifierRecord> for DogmaModifier {
    fn from(record: ModifierRecord) -> Self {
        DogmaModifier {
            domain: ModifierDomain::from_sde(&record.domain),
            func: ModifierFunc::from_sde(&record.func),
            modified_attribute_id: record.modified_attribute_id,
            modifying_attribute_id: record.modifying_attribute_id,
            attenuating_attribute_id: record.attenuating_attribute_id,
            operation: record.operation.map(Operation::from_sde),
            group_id: record.group_id,
            skill_type_id: record.skill_type_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EffectRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    pub name: String,
    #[serde(rename = "effectCategoryID")]
    pub category_id: i32,
    #[serde(rename = "isOffensive", default)]
    pub is_offensive: bool,
    #[serde(rename = "isAssistance", default)]
    pub is_assistive: bool,
    #[serde(rename = "durationAttributeID", default)]
    pub duration_attribute_id: Option<i32>,
    #[serde(rename = "rangeAttributeID", default)]
    pub range_attribute_id: Option<i32>,
    #[serde(rename = "falloffAttributeID", default)]
    pub falloff_attribute_id: Option<i32>,
    #[serde(rename = "trackingSpeedAttributeID", default)]
    pub tracking_speed_attribute_id: Option<i32>,
    #[serde(rename = "conditionAttributeID", default)]
    pub condition_attribute_id: Option<i32>,
    #[serde(rename = "conditionAttributeValue", default)]
    pub condition_value: Option<f64>,
    #[serde(rename = "modifierInfo", default)]
    pub modifiers: Vec<ModifierRecord>,
}

impl EffectRecord {
    pub fn into_entity(self) -> DataResult<DogmaEffect> {
        let condition = match (self.condition_attribute_id, self.condition_value) {
            (Some(attribute_id), Some(value)) => Some(EffectCondition {
                attribute_id,
                value,
            }),
            (None, None) => None,
            _ => {
                return Err(DataError::precondition(format!(
                    "effect #{} {:?} has only half of its condition",
                    self.id, self.name
                )))
            }
        };
        Ok(DogmaEffect {
            id: self.id,
            name: self.name,
            category: EffectCategory::from_sde(self.category_id),
            is_offensive: self.is_offensive,
            is_assistive: self.is_assistive,
            duration_attribute_id: self.duration_attribute_id,
            range_attribute_id: self.range_attribute_id,
            falloff_attribute_id: self.falloff_attribute_id,
            tracking_speed_attribute_id: self.tracking_speed_attribute_id,
            condition,
            modifiers: self.modifiers.into_iter().map(DogmaModifier::from).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TypeAttributeRecord {
    #[serde(rename = "attributeID")]
    pub attribute_id: i32,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct TypeEffectRecord {
    #[serde(rename = "effectID")]
    pub effect_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct TypeDogmaRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    #[serde(rename = "dogmaAttributes", default)]
    pub attributes: Vec<TypeAttributeRecord>,
    #[serde(rename = "dogmaEffects", default)]
    pub effects: Vec<TypeEffectRecord>,
}

impl TypeDogmaRecord {
    pub fn into_entity(self) -> DataResult<DogmaType> {
        let mut attribute_values: Vec<AttributeValue> = Vec::with_capacity(self.attributes.len());
        for record in self.attributes {
            if attribute_values
                .iter()
                .any(|av| av.attribute_id == record.attribute_id)
            {
                return Err(DataError::precondition(format!(
                    "dogma type #{} lists attribute #{} twice",
                    self.id, record.attribute_id
                )));
            }
            attribute_values.push(AttributeValue {
                attribute_id: record.attribute_id,
                value: record.value,
            });
        }

        let mut effect_ids = Vec::with_capacity(self.effects.len());
        for record in self.effects {
            if !effect_ids.contains(&record.effect_id) {
                effect_ids.push(record.effect_id);
            }
        }

        Ok(DogmaType {
            id: self.id,
            attribute_values,
            effect_ids,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MetaGroupRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    pub name: Localized,
}

impl MetaGroupRecord {
    pub fn into_entity(self) -> DataResult<MetaGroup> {
        Ok(MetaGroup {
            id: self.id,
            name: self.name.english(EntityKind::MetaGroup, self.id)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MarketGroupRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    pub name: Localized,
    #[serde(rename = "parentGroupID", default)]
    pub parent_group_id: Option<i32>,
    #[serde(rename = "iconID", default)]
    pub icon_id: Option<i32>,
    #[serde(rename = "hasTypes", default)]
    pub has_types: bool,
}

impl MarketGroupRecord {
    pub fn into_entity(self) -> DataResult<MarketGroup> {
        Ok(MarketGroup {
            id: self.id,
            name: self.name.english(EntityKind::MarketGroup, self.id)?,
            parent_group_id: self.parent_group_id,
            icon_id: self.icon_id,
            has_types: self.has_types,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RaceRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    pub name: Localized,
}

impl RaceRecord {
    pub fn into_entity(self) -> DataResult<Race> {
        Ok(Race {
            id: self.id,
            name: self.name.english(EntityKind::Race, self.id)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MutaplasmidAttributeRecord {
    #[serde(rename = "_key")]
    pub attribute_id: i32,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Deserialize)]
pub struct MutaplasmidMappingRecord {
    #[serde(rename = "applicableTypes")]
    pub applicable_types: Vec<i32>,
    #[serde(rename = "resultingType")]
    pub resulting_type: i32,
}

/// One line of `dynamicItemAttributes.jsonl`
#[derive(Debug, Deserialize)]
pub struct MutaplasmidRecord {
    #[serde(rename = "_key")]
    pub id: i32,
    #[serde(rename = "attributeIDs", default)]
    pub attributes: Vec<MutaplasmidAttributeRecord>,
    #[serde(rename = "inputOutputMapping", default)]
    pub mappings: Vec<MutaplasmidMappingRecord>,
}

impl MutaplasmidRecord {
    /// The export carries no name; it is the name of the mutaplasmid item type
    pub fn into_entity(self, name: String) -> Mutaplasmid {
        Mutaplasmid {
            id: self.id,
            name,
            mappings: self
                .mappings
                .into_iter()
                .map(|m| MutaplasmidMapping {
                    applicable_type_ids: m.applicable_types,
                    resulting_type_id: m.resulting_type,
                })
                .collect(),
            attributes: self
                .attributes
                .into_iter()
                .map(|a| MutaplasmidAttribute {
                    attribute_id: a.attribute_id,
                    min: a.min,
                    max: a.max,
                })
                .collect(),
        }
    }
}
