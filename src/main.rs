use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use eve_dogma_compiler::{
    build::{self, BuildOptions},
    cli::{Cli, Commands},
    compiler::decode,
    fixups::PIPELINE,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn inspect(file: &Path) -> Result<()> {
    let reader = BufReader::new(fs_err::File::open(file)?);
    let resource = decode(reader).with_context(|| format!("Failed to decode {:?}", file))?;

    println!("{:?}", file);
    println!("  meta groups:    {}", resource.meta_groups.len());
    println!("  market groups:  {}", resource.market_groups.len());
    println!("  races:          {}", resource.races.len());
    println!("  attributes:     {}", resource.attributes.len());
    println!("  effects:        {}", resource.effects.len());
    println!("  categories:     {}", resource.categories.len());
    println!("  groups:         {}", resource.groups.len());
    for section in &resource.type_sections {
        let name = resource
            .categories
            .iter()
            .find(|c| c.id == section.category_id)
            .map_or("?", |c| c.name.as_str());
        println!("  {:<16}{}", format!("{}:", name), section.types.len());
    }
    println!("  mutaplasmids:   {}", resource.mutaplasmids.len());
    println!("  abyssal names:  {}", resource.abyssal_names.len());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compile { input_dir, output } => {
            let summary = build::compile(&BuildOptions {
                input_dir,
                output: output.clone(),
            })?;
            println!("Created {:?}: {}", output, summary);
        }

        Commands::Check { input_dir } => {
            let summary = build::check(&input_dir)?;
            println!("{:?} is valid: {}", input_dir, summary);
        }

        Commands::Inspect { file } => inspect(&file)?,

        Commands::ListFixups => {
            println!("Fixup pipeline:\n");
            for (index, fixup) in PIPELINE.iter().enumerate() {
                println!(
                    "  {:>2}. {:<40} {:<12} {}",
                    index + 1,
                    fixup.name,
                    fixup.class.to_string(),
                    fixup.description
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse_args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
