use anyhow::{Result, ensure};
use geopop::{AgeWindow, Pipeline};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ReduceArgs) -> Result<()> {
    if let Some(max_age) = args.max_age {
        ensure!(max_age >= args.min_age, "--max-age ({max_age}) is below --min-age ({})", args.min_age);
    }

    let pipeline = Pipeline::new(cli.pipeline_config()?);
    let reduced = pipeline.reduce(AgeWindow::new(args.min_age, args.max_age), &args.output)?;

    println!("[reduce] {} buildings -> {}", reduced.len(), args.output.display());
    Ok(())
}
