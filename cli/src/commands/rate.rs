use anyhow::Result;
use geopop::Pipeline;

pub fn run(cli: &crate::cli::Cli) -> Result<()> {
    let pipeline = Pipeline::new(cli.pipeline_config()?);
    let rates = pipeline.elderly_rate()?;

    println!("[rate] {} buildings -> {}", rates.len(), pipeline.config().elderly_rate_path.display());
    Ok(())
}
