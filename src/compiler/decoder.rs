use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};
use thiserror::Error;

use super::format::*;
use crate::classify::{AffectedItemsFilter, AffectedItemsType};
use crate::fixups::known::TYPE_SECTIONS;
use crate::model::{EffectCategory, Operation};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid UTF-8 in string: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("negative length {0}")]
    NegativeLength(i32),

    #[error("unknown {what} code {code}")]
    UnknownCode { what: &'static str, code: i32 },

    #[error("{0} trailing bytes after the last section")]
    TrailingBytes(usize),
}

type Result<T> = std::result::Result<T, DecodeError>;

/// Reads the primitives of the resource format
pub struct Decoder<R: Read> {
    input: R,
}

impl<R: Read> Decoder<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    pub fn byte(&mut self) -> Result<u8> {
        Ok(self.input.read_u8()?)
    }

    pub fn int(&mut self) -> Result<i32> {
        Ok(self.input.read_i32::<BigEndian>()?)
    }

    pub fn double(&mut self) -> Result<f64> {
        Ok(self.input.read_f64::<BigEndian>()?)
    }

    pub fn length(&mut self) -> Result<usize> {
        let len = self.int()?;
        usize::try_from(len).map_err(|_| DecodeError::NegativeLength(len))
    }

    pub fn string(&mut self) -> Result<String> {
        let len = self.length()?;
        let mut buf = vec![0; len];
        self.input.read_exact(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn opt_id(&mut self) -> Result<Option<i32>> {
        Ok(match self.int()? {
            0 => None,
            id => Some(id),
        })
    }

    pub fn list<T>(&mut self, mut record: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let len = self.length()?;
        // Cap the preallocation; a corrupt count should fail on read, not on allocation
        let mut items = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            items.push(record(self)?);
        }
        Ok(items)
    }

    fn named(&mut self) -> Result<NamedRecord> {
        Ok(NamedRecord {
            id: self.int()?,
            name: self.string()?,
        })
    }

    fn market_group(&mut self) -> Result<MarketGroupRecord> {
        let id = self.int()?;
        let parent_group_id = self.opt_id()?;
        let name = self.string()?;
        let icon_id = self.opt_id()?;
        let flags = MarketGroupFlags::from_bits_retain(self.byte()?);
        Ok(MarketGroupRecord {
            id,
            parent_group_id,
            name,
            icon_id,
            has_types: flags.contains(MarketGroupFlags::HAS_TYPES),
        })
    }

    fn attribute(&mut self) -> Result<AttributeRecord> {
        let id = self.int()?;
        let name = self.string()?;
        let flags = AttributeFlags::from_bits_retain(self.byte()?);
        let display_name = if flags.contains(AttributeFlags::HAS_DISPLAY_NAME) {
            Some(self.string()?)
        } else {
            None
        };
        let range = if flags.contains(AttributeFlags::HAS_RANGE) {
            Some((self.double()?, self.double()?))
        } else {
            None
        };
        Ok(AttributeRecord {
            id,
            name,
            stackable: flags.contains(AttributeFlags::STACKABLE),
            high_is_good: flags
                .contains(AttributeFlags::HAS_HIGH_IS_GOOD)
                .then(|| flags.contains(AttributeFlags::HIGH_IS_GOOD)),
            display_name,
            range,
            unit_id: self.opt_id()?,
        })
    }

    fn effect(&mut self) -> Result<EffectRecord> {
        let id = self.int()?;
        let name = self.string()?;
        let code = self.byte()?;
        let category = EffectCategory::from_code(code).ok_or(DecodeError::UnknownCode {
            what: "effect category",
            code: i32::from(code),
        })?;
        let flags = EffectFlags::from_bits_retain(self.byte()?);
        let duration_attribute_id = self.opt_id()?;
        let range_attribute_id = self.opt_id()?;
        let falloff_attribute_id = self.opt_id()?;
        let tracking_speed_attribute_id = self.opt_id()?;
        let condition = if flags.contains(EffectFlags::HAS_CONDITION) {
            Some((self.int()?, self.double()?))
        } else {
            None
        };
        Ok(EffectRecord {
            id,
            name,
            category,
            is_offensive: flags.contains(EffectFlags::OFFENSIVE),
            is_assistive: flags.contains(EffectFlags::ASSISTIVE),
            duration_attribute_id,
            range_attribute_id,
            falloff_attribute_id,
            tracking_speed_attribute_id,
            condition,
            modifiers: self.list(Self::modifier)?,
        })
    }

    fn modifier(&mut self) -> Result<ModifierRecord> {
        let code = self.byte()?;
        let affected_items = AffectedItemsType::from_code(code).ok_or(DecodeError::UnknownCode {
            what: "affected items type",
            code: i32::from(code),
        })?;
        let code = self.byte()?;
        let filter = AffectedItemsFilter::from_code(code).ok_or(DecodeError::UnknownCode {
            what: "affected items filter",
            code: i32::from(code),
        })?;
        let modified_attribute_id = self.opt_id()?;
        let modifying_attribute_id = self.opt_id()?;
        let attenuating_attribute_id = self.opt_id()?;
        let operation = match self.int()? {
            Operation::ABSENT_CODE => None,
            code => Some(
                Operation::from_code(code)
                    .ok_or(DecodeError::UnknownCode {
                        what: "operation",
                        code,
                    })?,
            ),
        };
        Ok(ModifierRecord {
            affected_items,
            filter,
            modified_attribute_id,
            modifying_attribute_id,
            attenuating_attribute_id,
            operation,
            group_id: self.opt_id()?,
            skill_type_id: self.opt_id()?,
        })
    }

    fn group(&mut self) -> Result<GroupRecord> {
        Ok(GroupRecord {
            id: self.int()?,
            category_id: self.int()?,
            name: self.string()?,
        })
    }

    fn type_record(&mut self) -> Result<TypeRecord> {
        let id = self.int()?;
        let group_id = self.int()?;
        let name = self.string()?;
        let flags = TypeFlags::from_bits_retain(self.byte()?);
        let meta_group_id = self.opt_id()?;
        let market_group_id = self.opt_id()?;
        let race_id = self.opt_id()?;
        let variation_parent_type_id = self.opt_id()?;
        let icon_id = self.opt_id()?;

        let mut double_if = |flag: TypeFlags| -> Result<Option<f64>> {
            flags.contains(flag).then(|| self.double()).transpose()
        };
        let capacity = double_if(TypeFlags::CAPACITY)?;
        let mass = double_if(TypeFlags::MASS)?;
        let radius = double_if(TypeFlags::RADIUS)?;
        let volume = double_if(TypeFlags::VOLUME)?;
        let description = flags
            .contains(TypeFlags::DESCRIPTION)
            .then(|| self.string())
            .transpose()?;
        let traits = flags
            .contains(TypeFlags::TRAITS)
            .then(|| self.string())
            .transpose()?;

        Ok(TypeRecord {
            id,
            group_id,
            name,
            published: flags.contains(TypeFlags::PUBLISHED),
            meta_group_id,
            market_group_id,
            race_id,
            variation_parent_type_id,
            icon_id,
            capacity,
            mass,
            radius,
            volume,
            description,
            traits,
            attributes: self.list(|d| Ok((d.int()?, d.double()?)))?,
            effect_ids: self.list(|d| d.int())?,
        })
    }

    fn mutaplasmid(&mut self) -> Result<MutaplasmidRecord> {
        Ok(MutaplasmidRecord {
            id: self.int()?,
            name: self.string()?,
            mappings: self.list(|d| Ok((d.list(|d| d.int())?, d.int()?)))?,
            attributes: self.list(|d| Ok((d.int()?, d.double()?, d.double()?)))?,
        })
    }

    /// Read a whole resource; the input must end after the last section
    pub fn resource(&mut self) -> Result<CompiledResource> {
        let meta_groups = self.list(Self::named)?;
        let market_groups = self.list(Self::market_group)?;
        let races = self.list(Self::named)?;
        let attributes = self.list(Self::attribute)?;
        let effects = self.list(Self::effect)?;
        let categories = self.list(Self::named)?;
        let groups = self.list(Self::group)?;
        let character = self.type_record()?;
        let warfare_buffs = self.type_record()?;
        let mut type_sections = Vec::with_capacity(TYPE_SECTIONS.len());
        for _ in TYPE_SECTIONS {
            type_sections.push(TypeSection {
                category_id: self.int()?,
                types: self.list(Self::type_record)?,
            });
        }
        let mutaplasmids = self.list(Self::mutaplasmid)?;
        let abyssal_names = self.list(|d| Ok((d.int()?, d.string()?)))?;

        let mut rest = Vec::new();
        self.input.read_to_end(&mut rest)?;
        if !rest.is_empty() {
            return Err(DecodeError::TrailingBytes(rest.len()));
        }

        Ok(CompiledResource {
            meta_groups,
            market_groups,
            races,
            attributes,
            effects,
            categories,
            groups,
            character,
            warfare_buffs,
            type_sections,
            mutaplasmids,
            abyssal_names,
        })
    }
}

/// Decode a compiled resource
pub fn decode(input: impl Read) -> Result<CompiledResource> {
    Decoder::new(input).resource()
}
