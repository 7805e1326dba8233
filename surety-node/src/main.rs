use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

use surety_node::{
    cli::{Cli, Commands},
    config::{LogConfig, DEFAULT_LOG_FILTER},
    relay::{EventRelay, EventSink, LogSink, EVENTS_TARGET},
    runtime::script::load_script,
    NodeConfig, NodeError,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitConfig { out } => {
            let _guard = init_tracing(&LogConfig::default());
            let config = NodeConfig::default();
            config.save_to_file(&out)?;
            info!("📝 Default config written to {}", out.display());
        }
        Commands::Run { config, script } => {
            let node_config = NodeConfig::load_from_file(&config)?;
            let _guard = init_tracing(&node_config.log);
            info!("--- STARTING SURETY NODE ---");
            info!("Config: {}", config.display());

            if let Err(e) = run(&node_config, &script).await {
                error!("Run failed: {}", e);
                return Err(e.into());
            }
        }
    }
    Ok(())
}

async fn run(config: &NodeConfig, script: &std::path::Path) -> Result<(), NodeError> {
    let calls = load_script(script)?;
    info!("📜 Replaying {} calls from {}", calls.len(), script.display());

    let sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(LogSink)];
    let relay = EventRelay::spawn(sinks);
    let mut runtime = config.build_runtime()?.with_relay(relay.sender());

    for report in runtime.replay(calls) {
        println!("{}", serde_json::to_string(&report)?);
    }

    drop(runtime);
    relay.shutdown().await;
    Ok(())
}

/// Console layer (stderr) filtered by `RUST_LOG` (or the config filter), plus an
/// optional audit file that receives only the `events` target.
fn init_tracing(log: &LogConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match &log.filter {
        Some(filter) => tracing_subscriber::EnvFilter::new(filter),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let (audit_layer, guard) = match &log.audit_file {
        Some(path) => {
            let file_appender = tracing_appender::rolling::never(".", path);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                    metadata.target() == EVENTS_TARGET
                }));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(audit_layer)
        .with(console_layer)
        .init();
    guard
}
