//! This tool writes the config of a single node of a sleepy consensus cluster,
//! using the key files generated for the cluster beforehand.
use anyhow::Context as _;
use clap::Parser;
use sleepy_consensus_tools::{generate, DocumentOptions, GeneratorInput, RawArgs, Variant};
use std::{io::IsTerminal as _, path::PathBuf};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{prelude::*, Registry};

/// Command line arguments.
#[derive(Debug, Parser)]
struct Args {
    /// Directory of the cluster layout. Node files are read from and the config
    /// is written to `<base_path>/node<node_index>/`.
    base_path: PathBuf,
    /// Index of the node to configure.
    node_index: String,
    /// Number of nodes in the cluster.
    cluster_size: String,
    /// Comma separated `ip:port` addresses of all nodes, ordered by node index.
    peer_addrs: String,
    /// `duration` for the authority layout, `steps` for the keypair layout.
    param1: String,
    /// `hz` for the authority layout, `nps` for the keypair layout.
    param2: String,
    /// Key layout of the cluster.
    #[arg(long, value_enum, default_value_t)]
    variant: Variant,
    /// Epoch length in blocks.
    #[arg(long, default_value_t = 10)]
    epoch_len: u64,
    /// Start time of the chain.
    #[arg(long, default_value_t = 1)]
    start_time: u64,
    /// Network buffer size. Not written to the config if unset.
    #[arg(long)]
    buffer_size: Option<u64>,
    /// Log debug events.
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn input(self) -> GeneratorInput {
        GeneratorInput {
            raw: RawArgs {
                base_path: self.base_path,
                node_index: self.node_index,
                cluster_size: self.cluster_size,
                peer_addrs: self.peer_addrs,
                param1: self.param1,
                param2: self.param2,
            },
            variant: self.variant,
            options: DocumentOptions {
                epoch_len: self.epoch_len,
                start_time: self.start_time,
                buffer_size: self.buffer_size,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    // Logs go to stderr, stdout is left to the caller.
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_filter(level);
    tracing::subscriber::set_global_default(Registry::default().with(stderr_log))
        .context("set_global_default()")?;
    tracing::trace!(?args, "starting");

    let input = args.input();
    let node_index = input.raw.node_index.clone();
    generate(&input).with_context(|| format!("generating config of node {node_index}"))?;
    Ok(())
}
