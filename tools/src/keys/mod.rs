//! Loading of the key material of a node and pairing of the cluster authorities
//! into keygroups.
//!
//! Two key layouts exist, each implemented as a [`KeyScheme`]:
//! - [`AuthorityScheme`]: separate `signer_authorities`/`miner_authorities`
//!   lists, paired line by line.
//! - [`KeypairScheme`]: `signer_authorities` paired with 3-line records of the
//!   `bls.keypairs` file.
use crate::{
    args::NodePaths,
    document::{Field, Value},
    error::{Error, Result},
};
use std::{fs, io, path::Path};

pub use self::{
    authority::{AuthorityScheme, AuthoritySources},
    keypairs::{KeypairScheme, KeypairSources},
};

mod authority;
mod keypairs;

/// Cluster-wide list of signer public keys, one per line.
pub const SIGNER_AUTHORITIES: &str = "signer_authorities";
/// Signer secret key of a node.
pub const SIGNER_PRIVKEY: &str = "signer_privkey";

/// Public keys validating one consensus participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeygroupRecord {
    /// Signer key paired with a miner key.
    Authority {
        /// Miner public key.
        miner_public_key: String,
        /// Signer public key.
        signer_public_key: String,
    },
    /// Signer key paired with a BLS proof key and its generator.
    /// Proof values are literals of the output format, kept verbatim.
    Proof {
        /// Proof public key literal.
        proof_public_key: String,
        /// Proof generator literal.
        proof_public_g: String,
        /// Signer public key.
        signer_public_key: String,
    },
}

impl KeygroupRecord {
    /// Fields of the `[[keygroups]]` table, in output order.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            Self::Authority {
                miner_public_key,
                signer_public_key,
            } => vec![
                ("miner_public_key", Value::Str(miner_public_key.clone())),
                ("signer_public_key", Value::Str(signer_public_key.clone())),
            ],
            Self::Proof {
                proof_public_key,
                proof_public_g,
                signer_public_key,
            } => vec![
                ("proof_public_key", Value::Raw(proof_public_key.clone())),
                ("proof_public_g", Value::Raw(proof_public_g.clone())),
                ("signer_public_key", Value::Str(signer_public_key.clone())),
            ],
        }
    }
}

/// Key layout of a cluster: which files hold the key material and how the
/// authorities are paired.
pub trait KeyScheme {
    /// Key material as read from disk.
    type Sources;

    /// Names of the two timing parameters in the document.
    fn timing_fields(&self) -> [&'static str; 2];

    /// Reads the key material of the node from the cluster layout.
    fn load(&self, paths: &NodePaths) -> Result<Self::Sources>;

    /// Secret key fields of the node, in output order.
    fn secret_keys(&self, sources: &Self::Sources) -> Vec<Field>;

    /// Keygroups of the cluster, in authority order.
    fn keygroups(&self, sources: &Self::Sources) -> Vec<KeygroupRecord>;
}

/// Reads a whole input file.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "reading key file");
    fs::read_to_string(path).map_err(|source| Error::MissingKeyFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an input file which may legitimately be absent.
pub(crate) fn read_optional_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "optional file absent");
            Ok(None)
        }
        Err(source) => Err(Error::MissingKeyFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads a secret key file. The key is the whole file minus one trailing
/// line terminator.
pub(crate) fn read_secret(path: &Path) -> Result<String> {
    let mut key = read_file(path)?;
    if key.ends_with('\n') {
        key.pop();
        if key.ends_with('\r') {
            key.pop();
        }
    }
    Ok(key)
}

/// Lines of a line-oriented source, each keeping its terminator.
/// The source ends at EOF or at the first empty line, whichever comes first.
pub(crate) fn value_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .split_inclusive('\n')
        .take_while(|line| !strip_terminator(line).is_empty())
}

/// Line without its terminator.
pub(crate) fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
