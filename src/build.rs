//! The build driver: load, fix up, validate and compile.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use crate::compiler::{compile_to_file, CompileStats};
use crate::fixups::run_pipeline;
use crate::graph::{GraphStore, SyntheticIds};
use crate::model::{DogmaAttribute, DogmaEffect, EveData, Type};
use crate::parser::load_sde;
use crate::validate::validate;

/// Current phase of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    FixingUp,
    Validating,
    Compiling,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Loading => write!(f, "Loading SDE"),
            Phase::FixingUp => write!(f, "Running fixups"),
            Phase::Validating => write!(f, "Validating graph"),
            Phase::Compiling => write!(f, "Compiling resource"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the JSONL export
    pub input_dir: PathBuf,
    /// Resource file to write
    pub output: PathBuf,
}

/// What a build produced
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub types: usize,
    pub attributes: usize,
    pub effects: usize,
    /// Set when a resource was written
    pub compiled: Option<CompileStats>,
    pub elapsed: Duration,
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types, {} attributes, {} effects",
            self.types, self.attributes, self.effects
        )?;
        if let Some(stats) = &self.compiled {
            write!(f, ", {} bytes written", stats.bytes)?;
        }
        write!(f, " in {:.1}s", self.elapsed.as_secs_f64())
    }
}

/// Load, repair and validate an export
pub fn prepare(input_dir: &Path) -> Result<EveData> {
    info!(phase = %Phase::Loading, dir = %input_dir.display());
    let data = load_sde(input_dir)?;

    info!(phase = %Phase::FixingUp);
    let mut store = GraphStore::new(data);
    let mut ids = SyntheticIds::new();
    run_pipeline(&mut store, &mut ids)?;
    let data = store.freeze();

    info!(phase = %Phase::Validating);
    validate(&data).context("Validation failed")?;
    Ok(data)
}

fn summarize(data: &EveData, compiled: Option<CompileStats>, start: Instant) -> BuildSummary {
    BuildSummary {
        types: data.count::<Type>(),
        attributes: data.count::<DogmaAttribute>(),
        effects: data.count::<DogmaEffect>(),
        compiled,
        elapsed: start.elapsed(),
    }
}

/// Everything up to validation; nothing is written
pub fn check(input_dir: &Path) -> Result<BuildSummary> {
    let start = Instant::now();
    let data = prepare(input_dir)?;
    info!(phase = %Phase::Complete);
    Ok(summarize(&data, None, start))
}

/// Full build into `options.output`
pub fn compile(options: &BuildOptions) -> Result<BuildSummary> {
    let start = Instant::now();
    let data = prepare(&options.input_dir)?;

    info!(phase = %Phase::Compiling, output = %options.output.display());
    let stats = compile_to_file(&data, &options.output)?;

    info!(phase = %Phase::Complete);
    Ok(summarize(&data, Some(stats), start))
}
