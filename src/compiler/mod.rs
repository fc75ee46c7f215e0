//! Binary resource compiler.
//!
//! The resource is a flat sequence of length-prefixed sections in a fixed order. See
//! [`format`] for the record layouts and [`decoder`] for the reader used by the `inspect`
//! command and the tests.

pub mod decoder;
pub mod encoder;
pub mod format;

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::DataError;
use crate::model::EveData;

pub use decoder::{decode, DecodeError, Decoder};
pub use encoder::{encode, CompileStats, Encoder};
pub use format::CompiledResource;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to write resource: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Compile a validated graph into `out`
pub fn compile(data: &EveData, out: impl Write) -> std::result::Result<CompileStats, CompileError> {
    let mut encoder = Encoder::new(out);
    let stats = encode(data, &mut encoder)?;
    encoder.into_inner().flush()?;
    Ok(stats)
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

/// Compile into a file; nothing is left at `output` unless compilation succeeds
pub fn compile_to_file(data: &EveData, output: &Path) -> Result<CompileStats> {
    let partial = partial_path(output);
    debug!(path = %partial.display(), "writing partial resource");

    let written = fs_err::File::create(&partial)
        .map_err(anyhow::Error::from)
        .and_then(|file| compile(data, BufWriter::new(file)).map_err(anyhow::Error::from));

    let renamed = written.and_then(|stats| {
        fs_err::rename(&partial, output)?;
        Ok(stats)
    });
    let stats = match renamed {
        Ok(stats) => stats,
        Err(err) => {
            let _ = fs_err::remove_file(&partial);
            return Err(err).with_context(|| format!("Failed to compile {:?}", output));
        }
    };

    info!(path = %output.display(), bytes = stats.bytes, "wrote resource");
    Ok(stats)
}
