//! Loader for the JSONL flavour of the SDE.

pub mod record;
pub mod sources;

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::DataResult;
use crate::model::{EntityKind, EveData, EveDataBuilder};
use record::*;
pub use sources::{source_for, SourceFile, SOURCES};

/// Read one source file, converting each line with `convert`
///
/// Errors name the file and the 1-based line number.
fn read_source<R, E>(
    dir: &Path,
    kind: EntityKind,
    mut convert: impl FnMut(R) -> DataResult<E>,
) -> Result<Vec<E>>
where
    R: DeserializeOwned,
{
    let source = source_for(kind);
    let path = dir.join(source.file);
    if !path.exists() {
        if source.required {
            bail!("Required SDE file not found: {:?}", path);
        }
        warn!(file = source.file, "optional SDE file not found, skipping");
        return Ok(Vec::new());
    }

    let reader = BufReader::new(fs_err::File::open(&path)?);
    let mut entities = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line =
            line.with_context(|| format!("Failed to read {} line {}", source.file, line_no))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: R = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse {} line {}", source.file, line_no))?;
        let entity = convert(record)
            .with_context(|| format!("Invalid record in {} line {}", source.file, line_no))?;
        entities.push(entity);
    }
    debug!(file = source.file, records = entities.len(), "read source file");
    Ok(entities)
}

/// Load an SDE export directory into a checked snapshot
pub fn load_sde(dir: &Path) -> Result<EveData> {
    if !dir.is_dir() {
        bail!("SDE directory not found: {:?}", dir);
    }

    let mut builder = EveDataBuilder::new();

    for category in read_source(dir, EntityKind::Category, CategoryRecord::into_entity)? {
        builder.insert(category);
    }
    for group in read_source(dir, EntityKind::Group, GroupRecord::into_entity)? {
        builder.insert(group);
    }

    let types = read_source(dir, EntityKind::Type, TypeRecord::into_entity)?;
    let type_names: HashMap<i32, String> =
        types.iter().map(|t| (t.id, t.name.clone())).collect();
    for item in types {
        builder.insert(item);
    }

    for attribute in read_source(dir, EntityKind::DogmaAttribute, AttributeRecord::into_entity)? {
        builder.insert(attribute);
    }
    for effect in read_source(dir, EntityKind::DogmaEffect, EffectRecord::into_entity)? {
        builder.insert(effect);
    }
    for dogma in read_source(dir, EntityKind::DogmaType, TypeDogmaRecord::into_entity)? {
        builder.insert(dogma);
    }
    for meta_group in read_source(dir, EntityKind::MetaGroup, MetaGroupRecord::into_entity)? {
        builder.insert(meta_group);
    }
    for market_group in read_source(dir, EntityKind::MarketGroup, MarketGroupRecord::into_entity)? {
        builder.insert(market_group);
    }
    for race in read_source(dir, EntityKind::Race, RaceRecord::into_entity)? {
        builder.insert(race);
    }

    let mutaplasmids = read_source(dir, EntityKind::Mutaplasmid, |record: MutaplasmidRecord| {
        let name = type_names.get(&record.id).cloned().ok_or_else(|| {
            crate::error::DataError::missing_id(EntityKind::Type, record.id)
        })?;
        Ok(record.into_entity(name))
    })?;
    for mutaplasmid in mutaplasmids {
        builder.insert(mutaplasmid);
    }

    let data = builder.build().context("SDE export is inconsistent")?;
    info!(
        types = data.count::<crate::model::Type>(),
        attributes = data.count::<crate::model::DogmaAttribute>(),
        effects = data.count::<crate::model::DogmaEffect>(),
        "loaded SDE"
    );
    Ok(data)
}
