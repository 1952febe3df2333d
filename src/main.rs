use std::io::BufRead;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use release_monitor::config::{self, ProfileConfig};
use release_monitor::state::planner::{plan_builds, prune_stale};
use release_monitor::state::store::StateStore;
use release_monitor::state::storer::{BuildState, StateStorer};
use release_monitor::version::classifier::{canonical_versions, classify};
use release_monitor::version::comparator::sort_versions;
use release_monitor::version::profile::{ComparisonProfile, load_profile};
use release_monitor::version::sequence::build_natural_sequence;

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser)]
#[command(name = "release-monitor")]
#[command(version, about = "Classify, order and track the releases of a library")]
struct Cli {
    /// Library profile (JSON)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// State database, defaults to the data directory
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the release type of each version
    Classify {
        /// Versions to classify; read from stdin when omitted
        versions: Vec<String>,
    },
    /// Print versions from oldest to newest
    Sort { versions: Vec<String> },
    /// Print the natural sequence of versions worth tracking
    Sequence { versions: Vec<String> },
    /// Plan builds for discovered versions of a library
    Plan {
        /// Library name, defaults to the profile's Name
        #[arg(long)]
        library: Option<String>,
        /// Forget stored versions that dropped out of the sequence
        #[arg(long)]
        prune: bool,
        versions: Vec<String>,
    },
    /// Record the build state of a version
    Record {
        #[arg(long)]
        library: Option<String>,
        #[arg(long)]
        version: String,
        /// discovered, downloaded, installed or failed
        #[arg(long)]
        state: String,
        #[arg(long)]
        install_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let (config, profile) = match &cli.profile {
        Some(path) => load_profile(path)
            .with_context(|| format!("failed to load profile {}", path.display()))?,
        None => (ProfileConfig::default(), ComparisonProfile::default()),
    };

    match cli.command {
        Command::Classify { versions } => {
            for version in read_versions(versions)? {
                println!("{}\t{}", version, classify(&version, &profile));
            }
        }
        Command::Sort { versions } => {
            let mut versions = canonical_versions(&read_versions(versions)?, &profile);
            sort_versions(&mut versions, &profile);
            for version in versions {
                println!("{version}");
            }
        }
        Command::Sequence { versions } => {
            let versions = canonical_versions(&read_versions(versions)?, &profile);
            for version in build_natural_sequence(versions.iter().map(String::as_str), &profile)
            {
                println!("{version}");
            }
        }
        Command::Plan {
            library,
            prune,
            versions,
        } => {
            let library = library_name(library, &config)?;
            let store = open_store(cli.db)?;
            let plan = plan_builds(&store, &library, &profile, &read_versions(versions)?)?;

            for version in &plan.to_build {
                println!("build\t{version}");
            }
            for version in &plan.installed {
                println!("installed\t{version}");
            }
            for version in &plan.stale {
                println!("stale\t{version}");
            }
            if prune {
                prune_stale(&store, &library, &plan.stale)?;
            }
        }
        Command::Record {
            library,
            version,
            state,
            install_dir,
        } => {
            let library = library_name(library, &config)?;
            let state: BuildState = state.parse()?;
            let store = open_store(cli.db)?;

            if store.set_state(&library, &version, state, install_dir)? {
                info!("Recorded {}/{} as {}", library, version, state);
            } else {
                warn!("Version {} of {} is not tracked", version, library);
                bail!("version {version} of {library} is not tracked; run `plan` first");
            }
        }
    }

    Ok(())
}

/// Log to the data directory, or to stderr if it is not writable
fn init_logging() {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    let log_path = config::log_path();
    let file = std::fs::create_dir_all(config::data_dir()).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
    });

    match file {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(non_blocking)
                .init();
            let _ = LOG_GUARD.set(guard);
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
            warn!("Failed to open log file {:?}: {}", log_path, e);
        }
    }
}

/// Versions from the command line, or one per line on stdin
fn read_versions(args: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args);
    }

    let mut versions = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            versions.push(line.to_string());
        }
    }
    Ok(versions)
}

fn library_name(library: Option<String>, config: &ProfileConfig) -> anyhow::Result<String> {
    match library.or_else(|| config.name.clone()) {
        Some(name) => Ok(name),
        None => bail!("library name required: pass --library or set Name in the profile"),
    }
}

fn open_store(db: Option<PathBuf>) -> anyhow::Result<StateStore> {
    let db_path = match db {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(config::data_dir())?;
            config::db_path()
        }
    };
    Ok(StateStore::new(&db_path)?)
}
