use anyhow::Result;
use geopop::Pipeline;

pub fn run(cli: &crate::cli::Cli) -> Result<()> {
    let pipeline = Pipeline::new(cli.pipeline_config()?);
    let allocated = pipeline.allocate()?;

    let total = allocated.iter().map(|record| record.allocated_population).sum::<f64>();
    println!(
        "[allocate] {} records, {:.0} people -> {}",
        allocated.len(),
        total,
        pipeline.config().allocation_path.display(),
    );
    Ok(())
}
