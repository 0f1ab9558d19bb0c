// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Mock LLM streaming server binary

use anyhow::Context;
use clap::Parser;
use mock_stream_logging::CliLoggingArgs;
use mock_stream_server::{CONFIG_ENV_VAR, Server, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Bind address for the server (overrides the config file)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Allow cross-origin requests from any origin
    #[arg(long)]
    cors: bool,

    /// Delay before each streamed chunk, in milliseconds
    #[arg(long)]
    chunk_delay_ms: Option<u64>,

    /// Delay before the first event of a stream, in milliseconds
    #[arg(long)]
    initial_delay_ms: Option<u64>,

    /// Seed for reproducible template and filler selection
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    logging: CliLoggingArgs,
}

impl Args {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if self.cors {
            config.server.enable_cors = true;
        }
        for pacing in [&mut config.chat.pacing, &mut config.lorem.pacing] {
            if let Some(delay) = self.chunk_delay_ms {
                pacing.chunk_delay_ms = delay;
            }
            if let Some(delay) = self.initial_delay_ms {
                pacing.initial_delay_ms = delay;
            }
        }
        if self.seed.is_some() {
            config.generation.seed = self.seed;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    args.logging.clone().init("mock-stream-server")?;

    let mut config =
        ServerConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply(&mut config);

    tracing::info!(
        bind = %config.server.bind_addr,
        cors = config.server.enable_cors,
        collections = config.collections.len(),
        seeded = config.generation.seed.is_some(),
        "Starting mock streaming server"
    );

    let server = Server::new(config)?;
    server.run().await?;

    Ok(())
}
