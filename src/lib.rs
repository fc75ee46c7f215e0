pub mod build;
pub mod classify;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod fixups;
pub mod graph;
pub mod model;
pub mod parser;
pub mod validate;

pub use build::{BuildOptions, BuildSummary, Phase};
pub use cli::{Cli, Commands};
pub use error::{DataError, DataResult};
