//! repowatcher CLI entry point

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use repowatcher::cli::{OpenArgs, RunArgs};
use repowatcher::{
    spawn_signal_reloader, Cli, Commands, ConfigStore, ConfigWatcher, Daemon, Emitter, GitOracle,
    LaunchPlan,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config_path();
    let result = match cli.subcommand() {
        Commands::Run(args) => run_watch(&config_path, args),
        Commands::List => run_list(&config_path),
        Commands::Open(args) => run_open(&config_path, args),
        Commands::Check => run_check(&config_path),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Logs go to stderr; stdout carries only status lines.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "repowatcher=debug"
    } else {
        "repowatcher=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_watch(config_path: &Path, args: RunArgs) -> repowatcher::Result<ExitCode> {
    let store = Arc::new(ConfigStore::open(config_path)?);
    let snapshot = store.snapshot();
    tracing::info!(
        "Loaded {}: {} repositories, interval {}s",
        config_path.display(),
        snapshot.repositories.len(),
        snapshot.interval
    );

    let emitter = Emitter::new(std::io::stdout(), args.tooltip);
    let mut daemon = Daemon::new(Arc::clone(&store), Arc::new(GitOracle::new()), emitter);

    if args.once {
        daemon.run_once();
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let _reloader = spawn_signal_reloader(Arc::clone(&store));
        let _watcher = if args.watch_config {
            match ConfigWatcher::start(Arc::clone(&store)) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!("Config file watching disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        daemon.run(shutdown_signal()).await
    });

    // Don't wait on status commands from an abandoned cycle
    runtime.shutdown_timeout(Duration::from_secs(1));
    outcome?;

    Ok(ExitCode::SUCCESS)
}

fn run_list(config_path: &Path) -> repowatcher::Result<ExitCode> {
    let store = ConfigStore::open(config_path)?;
    for name in store.snapshot().names() {
        println!("{}", name);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_open(config_path: &Path, args: OpenArgs) -> repowatcher::Result<ExitCode> {
    let store = ConfigStore::open(config_path)?;
    let plan = LaunchPlan::resolve(&store.snapshot(), &args.name, &args.tool)?;
    let status = plan.run()?;

    Ok(match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    })
}

fn run_check(config_path: &Path) -> repowatcher::Result<ExitCode> {
    let store = ConfigStore::open(config_path)?;
    let snapshot = store.snapshot();

    println!(
        "{}: {} repositories, interval {}s",
        config_path.display(),
        snapshot.repositories.len(),
        snapshot.interval
    );
    for repo in &snapshot.repositories {
        let marker = if repo.location.is_dir() { "" } else { " (missing)" };
        println!("  {} -> {}{}", repo.name, repo.location.display(), marker);
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
