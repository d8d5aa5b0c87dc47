//! peerseek — narrated DHT peer lookups against a running node.

use std::future::Future;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use peerseek_core::config::PeerseekConfig;
use peerseek_core::StatusRecord;
use peerseek_services::{
    Console, KuboClient, LookupSession, PeerRouting, ReadinessMonitor, StatusSink,
};

mod cli;
mod terminal;

use cli::Cli;
use terminal::TerminalSink;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let config = cli.load_config();
    if cli.config.is_none() {
        if let Err(e) = PeerseekConfig::write_default_if_missing() {
            tracing::warn!(error = %e, "failed to write default config");
        }
    }

    let stdout = std::io::stdout();
    let interactive = stdout.is_terminal();
    let mut sink = TerminalSink::new(
        stdout,
        config.console.clear_on_reset && interactive,
        interactive && !cli.no_color,
    );

    sink.append(StatusRecord::neutral(format!(
        "Connecting to node at {}",
        config.node.api_url
    )));
    let routing = KuboClient::connect(&config.node.api_url)
        .await
        .with_context(|| {
            format!(
                "failed to reach node at {}, is it running?",
                config.node.api_url
            )
        })
        .inspect_err(|e| tracing::error!(error = %format!("{e:#}"), "startup failed"))?;

    let session = LookupSession::new(config.lookup.timeout());
    let mut console =
        Console::new(routing, sink, session).with_example(config.console.example_peer_id.clone());
    let mut monitor = ReadinessMonitor::new(config.readiness.poll_interval());
    let peers = console.start(&mut monitor).await;
    tracing::info!(
        peers,
        node = console.routing().node_id(),
        "console ready"
    );

    if let Some(peer_id) = &cli.peer_id {
        return Ok(if run_once(&mut console, peer_id).await {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let lookups = run_interactive(
        &mut console,
        BufReader::new(tokio::io::stdin()),
        interrupted,
        prompt,
    )
    .await?;
    tracing::info!(lookups, "console closed");
    Ok(ExitCode::SUCCESS)
}

/// One-shot mode. True when the peer was found.
async fn run_once<R: PeerRouting, S: StatusSink>(console: &mut Console<R, S>, raw: &str) -> bool {
    matches!(console.submit_lookup(raw).await, Some(Ok(_)))
}

/// Read one peer id per line until EOF, `quit`, `exit` or `interrupted`.
///
/// The next line is only read once the current lookup has resolved, so at
/// most one lookup is ever in flight. Returns the number of lines submitted.
async fn run_interactive<R, S, I>(
    console: &mut Console<R, S>,
    input: I,
    interrupted: impl Future<Output = ()>,
    mut prompt: impl FnMut() -> Result<()>,
) -> Result<usize>
where
    R: PeerRouting,
    S: StatusSink,
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut submitted = 0;
    tokio::pin!(interrupted);

    loop {
        prompt()?;
        let line = tokio::select! {
            biased;
            _ = &mut interrupted => break,
            line = lines.next_line() => line.context("failed to read input")?,
        };

        let Some(line) = line else {
            break;
        };
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        submitted += 1;
        tokio::select! {
            biased;
            _ = &mut interrupted => break,
            _ = console.submit_lookup(&line) => {}
        }
    }

    Ok(submitted)
}

fn prompt() -> Result<()> {
    let mut out = std::io::stdout();
    write!(out, "peer id> ").context("failed to write prompt")?;
    out.flush().context("failed to write prompt")
}

fn setup_logging(debug: bool) {
    // Status lines own stdout; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("peerseek=debug,peerseek_services=debug,peerseek_core=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
