use anyhow::Result;
use geopop::Pipeline;

pub fn run(cli: &crate::cli::Cli) -> Result<()> {
    let pipeline = Pipeline::new(cli.pipeline_config()?);
    let buildings = pipeline.classify()?;

    println!("[classify] {} buildings -> {}", buildings.len(), pipeline.config().classified_path.display());
    Ok(())
}
