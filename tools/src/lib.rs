//! Provisioning tools for sleepy consensus clusters.
//!
//! [`generate`] turns the cluster-wide bootstrap inputs (node count, peer
//! addresses, timing parameters and the pre-generated key files) into the
//! config file of a single node.
use std::path::PathBuf;

pub mod args;
pub mod document;
mod error;
pub mod keys;
pub mod peers;


pub use self::{
    args::{ClusterSpec, NodePaths, RawArgs},
    document::{ConfigDocument, Value},
    error::{Error, Result},
    keys::{AuthorityScheme, KeyScheme, KeygroupRecord, KeypairScheme},
    peers::PeerRecord,
};

/// Optional cluster-wide list of NTP servers, already a literal of the output
/// format.
pub const NTP_SERVERS: &str = "ntp_servers";

/// Key layout of the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Variant {
    /// Miner/signer keys with per-role authority lists, see [`AuthorityScheme`].
    #[default]
    Authority,
    /// Signer keys with a shared BLS keypair file, see [`KeypairScheme`].
    Keypair,
}

/// Document settings which are not derived from the cluster layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Length of an epoch, in blocks.
    pub epoch_len: u64,
    /// Start time of the chain.
    pub start_time: u64,
    /// Network buffer size. Omitted from the document if unset.
    pub buffer_size: Option<u64>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            epoch_len: 10,
            start_time: 1,
            buffer_size: None,
        }
    }
}

/// Everything a single generator run needs.
#[derive(Debug, Clone)]
pub struct GeneratorInput {
    /// Positional command line arguments.
    pub raw: RawArgs,
    /// Key layout of the cluster.
    pub variant: Variant,
    /// Additional document settings.
    pub options: DocumentOptions,
}

/// Builds the config document of the node described by `paths`.
pub fn build_document<S: KeyScheme>(
    scheme: &S,
    spec: &ClusterSpec,
    paths: &NodePaths,
    options: &DocumentOptions,
) -> Result<ConfigDocument> {
    let node_index = paths.node_index;
    let own_addr = spec
        .peer_addrs
        .get(node_index)
        .ok_or(Error::IndexOutOfRange {
            index: node_index as i64,
            cluster_size: spec.total_nodes,
        })?;

    let sources = scheme.load(paths)?;
    let ntp_servers = keys::read_optional_file(&paths.cluster_file(NTP_SERVERS))?;

    let (_, port) = peers::split_addr(node_index, own_addr)?;
    let peers = peers::build_peers(spec, node_index)?;
    let keygroups = scheme.keygroups(&sources);
    tracing::debug!(
        peers = peers.len(),
        keygroups = keygroups.len(),
        "built peer set and keygroups"
    );

    let [timing1, timing2] = scheme.timing_fields();
    let mut scalars = vec![
        ("id_card", Value::Int(node_index as u64)),
        ("port", Value::Int(port.into())),
        ("max_peer", Value::Int(spec.max_peer() as u64)),
        (timing1, Value::Int(spec.timing[0])),
        (timing2, Value::Int(spec.timing[1])),
        ("epoch_len", Value::Int(options.epoch_len)),
        ("start_time", Value::Int(options.start_time)),
    ];
    scalars.extend(scheme.secret_keys(&sources));
    if let Some(buffer_size) = options.buffer_size {
        scalars.push(("buffer_size", Value::Int(buffer_size)));
    }
    if let Some(ntp_servers) = ntp_servers {
        scalars.push(("ntp_servers", Value::Raw(ntp_servers.trim().to_owned())));
    }

    Ok(ConfigDocument {
        scalars,
        peers,
        keygroups,
    })
}

/// Generates the config of a single node and writes it to
/// `<basePath>/node<nodeIndex>/config`. Returns the path of the written file.
///
/// Nothing is written unless every input has been read and validated.
pub fn generate(input: &GeneratorInput) -> Result<PathBuf> {
    let (spec, paths) = input.raw.resolve()?;
    tracing::debug!(
        node_index = paths.node_index,
        total_nodes = spec.total_nodes,
        variant = ?input.variant,
        "resolved cluster layout"
    );
    let document = match input.variant {
        Variant::Authority => build_document(&AuthorityScheme, &spec, &paths, &input.options)?,
        Variant::Keypair => build_document(&KeypairScheme, &spec, &paths, &input.options)?,
    };
    let path = paths.config();
    document.write_to(&path)?;
    tracing::info!(
        path = %path.display(),
        peers = document.peers.len(),
        keygroups = document.keygroups.len(),
        "node config written"
    );
    Ok(path)
}
