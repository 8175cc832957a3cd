use crate::cli::Cli;
use crate::error::{CliError, Result};
use metrosim::engine::config::SimulationConfig;
use std::fs::File;
use std::path::PathBuf;
use tracing::{Span, Subscriber, info_span};
use tracing_subscriber::{
    Layer,
    filter::LevelFilter,
    fmt::{self, MakeWriter},
    prelude::*,
    registry::LookupSpan,
};

/// File name used when `--log-file` points at a directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "metrosim.log";

#[derive(Debug, Clone, PartialEq)]
pub struct LogOptions {
    pub level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl LogOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            level: level_for(cli.verbose, cli.quiet),
            log_file: cli.log_file.clone().map(resolve_log_path),
        }
    }
}

/// `-q` keeps errors only; each `-v` lowers the threshold one level from WARN.
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn resolve_log_path(path: PathBuf) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_LOG_FILE_NAME)
    } else {
        path
    }
}

/// Span that tags every event of a simulation with its run name and backend.
pub fn run_span(config: &SimulationConfig) -> Span {
    info_span!(
        "run",
        name = %config.output.file_stem(),
        backend = %config.run.backend
    )
}

fn file_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
}

pub fn setup_logging(options: LogOptions) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(options.level)
        .with(stderr_layer);

    match options.log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            subscriber.with(file_layer(file)).init();
        }
        None => subscriber.init(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use metrosim::engine::config::SimulationConfigBuilder;
    use metrosim::engine::evaluator::Backend;
    use serial_test::serial;
    use tracing::{debug, info, warn};

    fn resume_config(name: Option<&str>, backend: Backend) -> SimulationConfig {
        SimulationConfigBuilder::new()
            .resume_from(PathBuf::from("run_100.state"))
            .backend(backend)
            .steps(10)
            .status_interval(5)
            .state_interval(0)
            .save_final_state(false)
            .energy_tolerance(1e-3)
            .name(name.map(str::to_string))
            .build()
            .unwrap()
    }

    #[test]
    fn verbosity_flags_map_to_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(7, false), LevelFilter::TRACE);
        assert_eq!(level_for(0, true), LevelFilter::ERROR);
    }

    #[test]
    fn options_follow_global_flags() {
        let cli = Cli::parse_from(["metrosim", "-vv", "resume", "--state", "run_100.state"]);
        let options = LogOptions::from_cli(&cli);
        assert_eq!(options.level, LevelFilter::DEBUG);
        assert_eq!(options.log_file, None);
    }

    #[test]
    fn log_directory_resolves_to_default_file_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_log_path(dir.path().to_path_buf()),
            dir.path().join(DEFAULT_LOG_FILE_NAME)
        );
        let explicit = dir.path().join("water.log");
        assert_eq!(resolve_log_path(explicit.clone()), explicit);
    }

    #[test]
    #[serial]
    fn file_layer_tags_events_with_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join(DEFAULT_LOG_FILE_NAME);
        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry().with(file_layer(file));
        let config = resume_config(Some("water"), Backend::Parallel);

        tracing::subscriber::with_default(subscriber, || {
            let span = run_span(&config);
            let _guard = span.enter();
            info!("Step {}: current energy {:.6}", 10, -42.5);
            debug!(molecule = 3, "Applied rigid-body move.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Step 10: current energy -42.500000"));
        assert!(content.contains("name=water"));
        assert!(content.contains("backend=parallel"));
        assert!(content.contains("molecule=3"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    #[serial]
    fn unnamed_run_uses_default_stem() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.log");
        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry().with(file_layer(file));
        let config = resume_config(None, Backend::Sequential);

        tracing::subscriber::with_default(subscriber, || {
            let _guard = run_span(&config).entered();
            warn!("Checkpoint at step {} failed: {}", 20, "disk full");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("WARN"));
        assert!(content.contains("name=run"));
        assert!(content.contains("backend=sequential"));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = LogOptions {
            level: LevelFilter::WARN,
            log_file: Some(dir.path().join("missing").join("metrosim.log")),
        };
        assert!(matches!(setup_logging(options), Err(CliError::Io(_))));
    }
}
