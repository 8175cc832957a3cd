use crate::cli::RunArgs;
use crate::config::build_run_config;
use crate::error::Result;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    info!("Building run configuration from {:?}", &args.config);
    let config = build_run_config(&args)?;

    println!("Starting Monte Carlo simulation...");
    super::execute(&config)?;
    Ok(())
}
