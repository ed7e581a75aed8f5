//! Solar estimate entry point: CLI wiring and config-driven calculation.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use solar_estimate::cli::CliArgs;
use solar_estimate::io::export::export_items_csv;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = CliArgs::parse();

    let estimate = match cli.load_estimate() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    // Lenient runs exist to show in-progress estimates, so config problems only warn.
    let errors = estimate.validate();
    if !errors.is_empty() {
        if cli.mode().is_strict() {
            for e in &errors {
                eprintln!("{e}");
            }
            process::exit(1);
        }
        for e in &errors {
            tracing::warn!("{e}");
        }
    }

    let calculator = estimate.calculator();

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_estimate::api::AppState { calculator });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(solar_estimate::api::serve(state, addr)) {
            eprintln!("error: server failed: {e}");
            process::exit(1);
        }
        return;
    }

    #[cfg(not(feature = "api"))]
    if cli.serve {
        eprintln!("error: --serve requires building with `--features api`");
        process::exit(1);
    }

    let result = match calculator.calculate(&estimate.to_input(), cli.mode()) {
        Ok(result) => result,
        Err(failure) => {
            eprintln!("error: {failure}");
            process::exit(1);
        }
    };

    println!("{result}");

    if let Some(ref path) = cli.items_out {
        if let Err(e) = export_items_csv(&result.estimate_items, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        tracing::info!(path = %path.display(), "items written");
    }
}
