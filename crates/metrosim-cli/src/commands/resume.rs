use crate::cli::ResumeArgs;
use crate::config::build_resume_config;
use crate::error::Result;
use tracing::info;

pub fn run(args: ResumeArgs) -> Result<()> {
    info!("Resuming from state file {:?}", &args.state);
    let config = build_resume_config(&args)?;

    println!("Resuming Monte Carlo simulation from '{}'...", args.state.display());
    super::execute(&config)?;
    Ok(())
}
