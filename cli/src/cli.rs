use std::path::PathBuf;

use anyhow::Result;
use geopop::PipelineConfig;

/// Building population allocation CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "geopop", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON pipeline configuration; omitted keys use the defaults
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Resolve relative dataset paths against this directory
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Pipeline configuration from `--config` and `--root`.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        Ok(match &self.root {
            Some(root) => config.with_root(root),
            None => config,
        })
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Classify raw building footprints by land use and subzone
    Classify,

    /// Allocate census population to residential buildings per age bracket
    Allocate,

    /// Sum allocated population per building over an age window
    Reduce(ReduceArgs),

    /// Compute elderly rates from the elderly and combined reductions
    Rate,

    /// Allocate, reduce (elderly and combined) and compute rates
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct ReduceArgs {
    /// Youngest age included
    #[arg(long, default_value_t = 0)]
    pub min_age: u32,

    /// Oldest age included; unbounded when omitted
    #[arg(long)]
    pub max_age: Option<u32>,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Run the classification stage first instead of reading classified buildings
    #[arg(long)]
    pub classify: bool,
}
