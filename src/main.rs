// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! sls command-line entry point.
//!
//! Fetches new activities and gear, prints them as a table or JSON, then
//! updates the local caches.

use anyhow::Context;
use clap::Parser;
use sls::{
    cli::Cli,
    config::Config,
    formatter::ActivityFormatter,
    models::DetailedActivity,
    services::Orchestrator,
};
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::from_env().context("Couldn't load configuration")?;
    tracing::debug!(
        token_path = %config.token_path.display(),
        concurrency = config.concurrency,
        per_page = config.per_page,
        "Configuration loaded"
    );

    let orchestrator = Orchestrator::from_config(&config, cli.refresh)?;
    let snapshot = orchestrator.run().await.context("Fetch failed")?;
    let activities = DetailedActivity::join(&snapshot.activities, &snapshot.gear);

    let mut out = std::io::stdout().lock();
    if cli.json {
        serde_json::to_writer(&mut out, &activities)?;
        writeln!(out)?;
    } else {
        for line in ActivityFormatter::new(cli.column_opts()).format(&activities) {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()?;

    orchestrator.persist(&snapshot);
    Ok(())
}

/// Log to stderr so stdout carries only the listing. `SLS_LOG_JSON=1`
/// switches to structured JSON lines.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sls=info,warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("SLS_LOG_JSON").is_ok_and(|v| v == "1") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
