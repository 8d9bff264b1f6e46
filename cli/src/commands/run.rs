use anyhow::Result;
use geopop::Pipeline;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RunArgs) -> Result<()> {
    let pipeline = Pipeline::new(cli.pipeline_config()?);
    let rates = pipeline.run(args.classify)?;

    let mean = if rates.is_empty() { 0.0 } else {
        rates.iter().map(|rate| rate.elderly_rate).sum::<f64>() / rates.len() as f64
    };
    println!(
        "[run] {} buildings, mean elderly rate {:.3} -> {}",
        rates.len(),
        mean,
        pipeline.config().elderly_rate_path.display(),
    );
    Ok(())
}
