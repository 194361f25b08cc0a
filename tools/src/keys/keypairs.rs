//! Signer authorities paired with BLS proof keypairs.
use super::{
    read_file, read_secret, value_lines, KeyScheme, KeygroupRecord, SIGNER_AUTHORITIES,
    SIGNER_PRIVKEY,
};
use crate::{
    args::NodePaths,
    document::{Field, Value},
    error::{Error, Result},
};

/// Cluster-wide BLS keypairs: one `(private, public, g)` record of 3 lines per
/// node, each line a literal of the output format.
pub(crate) const BLS_KEYPAIRS: &str = "bls.keypairs";
/// Lines per node in [`BLS_KEYPAIRS`].
const RECORD_LINES: usize = 3;

/// Layout with a signer key per node and a shared keypair file holding the
/// proof keys of all nodes. Timing parameters are `steps` and `nps`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeypairScheme;

/// Files read by [`KeypairScheme`].
#[derive(Debug, Clone)]
pub struct KeypairSources {
    proof_private_key: String,
    signer_private_key: String,
    signer_authorities: String,
    keypairs: Vec<String>,
}

impl KeypairSources {
    fn from_parts(
        node_index: usize,
        keypairs_path: &std::path::Path,
        keypairs: &str,
        signer_private_key: String,
        signer_authorities: String,
    ) -> Result<Self> {
        let keypairs: Vec<String> = value_lines(keypairs).map(str::to_owned).collect();
        let private = node_index * RECORD_LINES;
        // The own public key has to be present for the record to be complete.
        for line in [private, private + 1] {
            if line >= keypairs.len() {
                return Err(Error::MalformedKeyData {
                    path: keypairs_path.to_path_buf(),
                    line,
                });
            }
        }
        Ok(Self {
            proof_private_key: keypairs[private].clone(),
            signer_private_key,
            signer_authorities,
            keypairs,
        })
    }
}

impl KeyScheme for KeypairScheme {
    type Sources = KeypairSources;

    fn timing_fields(&self) -> [&'static str; 2] {
        ["steps", "nps"]
    }

    fn load(&self, paths: &NodePaths) -> Result<KeypairSources> {
        let keypairs_path = paths.cluster_file(BLS_KEYPAIRS);
        let keypairs = read_file(&keypairs_path)?;
        let signer_private_key = read_secret(&paths.node_file(SIGNER_PRIVKEY))?;
        let signer_authorities = read_file(&paths.cluster_file(SIGNER_AUTHORITIES))?;
        KeypairSources::from_parts(
            paths.node_index,
            &keypairs_path,
            &keypairs,
            signer_private_key,
            signer_authorities,
        )
    }

    fn secret_keys(&self, sources: &KeypairSources) -> Vec<Field> {
        vec![
            ("proof_private_key", Value::Raw(sources.proof_private_key.clone())),
            ("signer_private_key", Value::Str(sources.signer_private_key.clone())),
        ]
    }

    fn keygroups(&self, sources: &KeypairSources) -> Vec<KeygroupRecord> {
        let records = sources.keypairs.chunks_exact(RECORD_LINES);
        value_lines(&sources.signer_authorities)
            .zip(records)
            .map(|(signer, record)| KeygroupRecord::Proof {
                proof_public_key: record[1].clone(),
                proof_public_g: record[2].clone(),
                signer_public_key: signer.trim_end().to_owned(),
            })
            .collect()
    }
}
