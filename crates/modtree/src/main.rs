//! Modtree CLI binary.

use colored::Colorize;
use modtree::cli::Cli;
use modtree::source::process::cancellation;
use std::process::ExitCode;
use std::thread;
use tracing_subscriber::EnvFilter;

/// Stack for the command thread. JSON and HTML output serialize trees
/// recursively, and a tree can be as deep as the graph is long.
const COMMAND_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Main entry point for the modtree CLI.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v, e.g. RUST_LOG=modtree_graph=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting modtree CLI");

    let worker = thread::Builder::new()
        .name("modtree".to_string())
        .stack_size(COMMAND_STACK_SIZE)
        .spawn(move || run(&cli));

    match worker {
        Ok(handle) => match handle.join() {
            Ok(code) => code,
            Err(panic) => std::panic::resume_unwind(panic),
        },
        Err(e) => report(&anyhow::Error::from(e).context("failed to start command thread")),
    }
}

/// Run the command on a current-thread runtime; the only concurrency is
/// waiting on external tools and input while watching for Ctrl-C.
fn run(cli: &Cli) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return report(&anyhow::Error::from(e).context("failed to start async runtime")),
    };

    let (cancel_handle, cancel) = cancellation();
    let result = runtime.block_on(async {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupt received, cancelling");
                cancel_handle.cancel();
            }
        });
        cli.execute(cancel).await
    });

    // A cancelled stdin read keeps its blocking thread until input arrives.
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(e: &anyhow::Error) -> ExitCode {
    eprintln!("{}: {e}", "error".red().bold());
    // Show cause chain for nested errors
    for cause in e.chain().skip(1) {
        eprintln!("  {}: {cause}", "caused by".dimmed());
    }
    ExitCode::FAILURE
}
