use std::collections::BTreeSet;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use tracing::debug;

use super::format::*;
use super::CompileError;
use crate::classify::classify_modifier;
use crate::error::DataError;
use crate::fixups::known::{synthetic, TYPE_SECTIONS};
use crate::model::{
    Category, DogmaAttribute, DogmaEffect, DogmaModifier, EveData, Group, MarketGroup, MetaGroup,
    Mutaplasmid, Operation, Race, Type,
};

type Result<T> = std::result::Result<T, CompileError>;

/// Counts of what one compilation wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub attributes: usize,
    pub effects: usize,
    pub types: usize,
    pub mutaplasmids: usize,
    pub bytes: u64,
}

/// Writes the primitives of the resource format
pub struct Encoder<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> Encoder<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn byte(&mut self, value: u8) -> Result<()> {
        self.out.write_u8(value)?;
        self.written += 1;
        Ok(())
    }

    pub fn int(&mut self, value: i32) -> Result<()> {
        self.out.write_i32::<BigEndian>(value)?;
        self.written += 4;
        Ok(())
    }

    pub fn double(&mut self, value: f64) -> Result<()> {
        self.out.write_f64::<BigEndian>(value)?;
        self.written += 8;
        Ok(())
    }

    pub fn string(&mut self, value: &str) -> Result<()> {
        self.length(value.len())?;
        self.out.write_all(value.as_bytes())?;
        self.written += value.len() as u64;
        Ok(())
    }

    pub fn opt_id(&mut self, id: Option<i32>) -> Result<()> {
        self.int(id.unwrap_or(0))
    }

    pub fn length(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| DataError::precondition(format!("list of {} entries is too long", len)))?;
        self.int(len)
    }

    /// Count followed by one record per item
    pub fn list<T>(
        &mut self,
        items: &[T],
        mut record: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        self.length(items.len())?;
        for item in items {
            record(self, item)?;
        }
        Ok(())
    }
}

/// Write the whole graph in emission order
pub fn encode<W: Write>(data: &EveData, encoder: &mut Encoder<W>) -> Result<CompileStats> {
    let mut stats = CompileStats::default();

    let meta_groups: Vec<&MetaGroup> = data.iter().collect();
    encoder.list(&meta_groups, |e, g| {
        e.int(g.id)?;
        e.string(&g.name)
    })?;

    let market_groups: Vec<&MarketGroup> = data.iter().collect();
    encoder.list(&market_groups, |e, g| market_group(e, g))?;

    let races: Vec<&Race> = data.iter().collect();
    encoder.list(&races, |e, r| {
        e.int(r.id)?;
        e.string(&r.name)
    })?;

    let attributes: Vec<&DogmaAttribute> = data.iter().collect();
    encoder.list(&attributes, |e, a| attribute(e, a))?;
    stats.attributes = attributes.len();

    let effects: Vec<&DogmaEffect> = data
        .iter::<DogmaEffect>()
        .filter(|effect| effect.category.code().is_some())
        .collect();
    encoder.list(&effects, |e, effect| self::effect(e, effect))?;
    stats.effects = effects.len();

    let categories: Vec<&Category> = data.iter().collect();
    encoder.list(&categories, |e, c| {
        e.int(c.id)?;
        e.string(&c.name)
    })?;

    let groups: Vec<&Group> = data.iter().collect();
    encoder.list(&groups, |e, g| {
        e.int(g.id)?;
        e.int(g.category_id)?;
        e.string(&g.name)
    })?;

    for name in [synthetic::CHARACTER, synthetic::WARFARE_BUFFS] {
        let item = synthetic_type(data, name)?;
        type_record(encoder, data, item)?;
        stats.types += 1;
    }

    for name in TYPE_SECTIONS {
        let category = data.by_name::<Category>(name)?;
        let types = data.types_in_category(category.id);
        encoder.int(category.id)?;
        encoder.list(&types, |e, t| type_record(e, data, t))?;
        debug!(section = name, types = types.len(), "encoded type section");
        stats.types += types.len();
    }

    let mutaplasmids: Vec<&Mutaplasmid> = data.iter().collect();
    encoder.list(&mutaplasmids, |e, m| mutaplasmid(e, m))?;
    stats.mutaplasmids = mutaplasmids.len();

    let resulting: BTreeSet<i32> = mutaplasmids
        .iter()
        .flat_map(|m| m.mappings.iter().map(|mapping| mapping.resulting_type_id))
        .collect();
    let mut abyssal_names = Vec::with_capacity(resulting.len());
    for id in resulting {
        let item = data.get::<Type>(id)?;
        let base = item.name.strip_prefix(ABYSSAL_PREFIX).unwrap_or(&item.name);
        abyssal_names.push((id, base));
    }
    encoder.list(&abyssal_names, |e, (id, base)| {
        e.int(*id)?;
        e.string(base)
    })?;

    stats.bytes = encoder.bytes_written();
    Ok(stats)
}

/// The single type of a synthetic category
fn synthetic_type<'a>(data: &'a EveData, name: &str) -> Result<&'a Type> {
    let category = data.by_name::<Category>(name)?;
    match data.types_in_category(category.id).as_slice() {
        [item] => Ok(*item),
        other => Err(DataError::precondition(format!(
            "category {:?} must hold exactly one type, found {}",
            name,
            other.len()
        ))
        .into()),
    }
}

fn market_group<W: Write>(e: &mut Encoder<W>, group: &MarketGroup) -> Result<()> {
    let mut flags = MarketGroupFlags::empty();
    flags.set(MarketGroupFlags::HAS_TYPES, group.has_types);
    e.int(group.id)?;
    e.opt_id(group.parent_group_id)?;
    e.string(&group.name)?;
    e.opt_id(group.icon_id)?;
    e.byte(flags.bits())
}

fn attribute<W: Write>(e: &mut Encoder<W>, attribute: &DogmaAttribute) -> Result<()> {
    let mut flags = AttributeFlags::empty();
    flags.set(AttributeFlags::STACKABLE, attribute.stackable);
    flags.set(AttributeFlags::HAS_HIGH_IS_GOOD, attribute.high_is_good.is_some());
    flags.set(AttributeFlags::HIGH_IS_GOOD, attribute.high_is_good == Some(true));
    flags.set(AttributeFlags::HAS_DISPLAY_NAME, attribute.display_name.is_some());
    flags.set(AttributeFlags::HAS_RANGE, attribute.range.is_some());

    e.int(attribute.id)?;
    e.string(&attribute.name)?;
    e.byte(flags.bits())?;
    if let Some(display_name) = &attribute.display_name {
        e.string(display_name)?;
    }
    if let Some(range) = attribute.range {
        e.double(range.min)?;
        e.double(range.max)?;
    }
    e.opt_id(attribute.unit_id)
}

fn effect<W: Write>(e: &mut Encoder<W>, effect: &DogmaEffect) -> Result<()> {
    let category = effect.category.code().ok_or_else(|| {
        DataError::precondition(format!(
            "effect #{} {:?} has unrecognized category {:?}",
            effect.id, effect.name, effect.category
        ))
    })?;
    let mut flags = EffectFlags::empty();
    flags.set(EffectFlags::OFFENSIVE, effect.is_offensive);
    flags.set(EffectFlags::ASSISTIVE, effect.is_assistive);
    flags.set(EffectFlags::HAS_CONDITION, effect.condition.is_some());

    e.int(effect.id)?;
    e.string(&effect.name)?;
    e.byte(category)?;
    e.byte(flags.bits())?;
    e.opt_id(effect.duration_attribute_id)?;
    e.opt_id(effect.range_attribute_id)?;
    e.opt_id(effect.falloff_attribute_id)?;
    e.opt_id(effect.tracking_speed_attribute_id)?;
    if let Some(condition) = effect.condition {
        e.int(condition.attribute_id)?;
        e.double(condition.value)?;
    }
    e.list(&effect.modifiers, |e, m| modifier(e, effect, m))
}

fn modifier<W: Write>(
    e: &mut Encoder<W>,
    effect: &DogmaEffect,
    modifier: &DogmaModifier,
) -> Result<()> {
    let (affected_items, filter) = classify_modifier(modifier);
    let operation = match modifier.operation {
        None => Operation::ABSENT_CODE,
        Some(op) => op.code().ok_or_else(|| {
            DataError::precondition(format!(
                "effect #{} {:?} has a modifier with unrecognized operation {:?}",
                effect.id, effect.name, op
            ))
        })?,
    };
    e.byte(affected_items.code())?;
    e.byte(filter.code())?;
    e.opt_id(modifier.modified_attribute_id)?;
    e.opt_id(modifier.modifying_attribute_id)?;
    e.opt_id(modifier.attenuating_attribute_id)?;
    e.int(operation)?;
    e.opt_id(modifier.group_id)?;
    e.opt_id(modifier.skill_type_id)
}

fn type_record<W: Write>(e: &mut Encoder<W>, data: &EveData, item: &Type) -> Result<()> {
    let mut flags = TypeFlags::empty();
    flags.set(TypeFlags::PUBLISHED, item.published);
    flags.set(TypeFlags::CAPACITY, item.capacity.is_some());
    flags.set(TypeFlags::MASS, item.mass.is_some());
    flags.set(TypeFlags::RADIUS, item.radius.is_some());
    flags.set(TypeFlags::VOLUME, item.volume.is_some());
    flags.set(TypeFlags::DESCRIPTION, item.description.is_some());
    flags.set(TypeFlags::TRAITS, item.traits.is_some());

    e.int(item.id)?;
    e.int(item.group_id)?;
    e.string(&item.name)?;
    e.byte(flags.bits())?;
    e.opt_id(item.meta_group_id)?;
    e.opt_id(item.market_group_id)?;
    e.opt_id(item.race_id)?;
    e.opt_id(item.variation_parent_type_id)?;
    e.opt_id(item.icon_id)?;
    for value in [item.capacity, item.mass, item.radius, item.volume]
        .into_iter()
        .flatten()
    {
        e.double(value)?;
    }
    for text in [&item.description, &item.traits].into_iter().flatten() {
        e.string(text)?;
    }

    match data.dogma_of(item.id) {
        Some(dogma) => {
            e.list(&dogma.attribute_values, |e, av| {
                e.int(av.attribute_id)?;
                e.double(av.value)
            })?;
            e.list(&dogma.effect_ids, |e, id| e.int(*id))
        }
        None => {
            e.length(0)?;
            e.length(0)
        }
    }
}

fn mutaplasmid<W: Write>(e: &mut Encoder<W>, mutaplasmid: &Mutaplasmid) -> Result<()> {
    e.int(mutaplasmid.id)?;
    e.string(&mutaplasmid.name)?;
    e.list(&mutaplasmid.mappings, |e, mapping| {
        e.list(&mapping.applicable_type_ids, |e, id| e.int(*id))?;
        e.int(mapping.resulting_type_id)
    })?;
    e.list(&mutaplasmid.attributes, |e, a| {
        e.int(a.attribute_id)?;
        e.double(a.min)?;
        e.double(a.max)
    })
}
