//! Signer/miner authority lists.
use super::{
    read_file, read_secret, strip_terminator, value_lines, KeyScheme, KeygroupRecord,
    SIGNER_AUTHORITIES, SIGNER_PRIVKEY,
};
use crate::{
    args::NodePaths,
    document::{Field, Value},
    error::Result,
};

/// Miner secret key of a node.
pub(crate) const MINER_PRIVKEY: &str = "miner_privkey";
/// Cluster-wide list of miner public keys, one per line.
pub(crate) const MINER_AUTHORITIES: &str = "miner_authorities";

/// Layout with a miner and a signer key per node, and one authority list per
/// role. Timing parameters are `duration` and `hz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorityScheme;

/// Files read by [`AuthorityScheme`].
#[derive(Debug, Clone)]
pub struct AuthoritySources {
    miner_private_key: String,
    signer_private_key: String,
    signer_authorities: String,
    miner_authorities: String,
}

impl KeyScheme for AuthorityScheme {
    type Sources = AuthoritySources;

    fn timing_fields(&self) -> [&'static str; 2] {
        ["duration", "hz"]
    }

    fn load(&self, paths: &NodePaths) -> Result<AuthoritySources> {
        Ok(AuthoritySources {
            miner_private_key: read_secret(&paths.node_file(MINER_PRIVKEY))?,
            signer_private_key: read_secret(&paths.node_file(SIGNER_PRIVKEY))?,
            signer_authorities: read_file(&paths.cluster_file(SIGNER_AUTHORITIES))?,
            miner_authorities: read_file(&paths.cluster_file(MINER_AUTHORITIES))?,
        })
    }

    fn secret_keys(&self, sources: &AuthoritySources) -> Vec<Field> {
        vec![
            ("miner_private_key", Value::Str(sources.miner_private_key.clone())),
            ("signer_private_key", Value::Str(sources.signer_private_key.clone())),
        ]
    }

    fn keygroups(&self, sources: &AuthoritySources) -> Vec<KeygroupRecord> {
        value_lines(&sources.signer_authorities)
            .zip(value_lines(&sources.miner_authorities))
            .map(|(signer, miner)| KeygroupRecord::Authority {
                miner_public_key: strip_terminator(miner).to_owned(),
                signer_public_key: signer.trim_end().to_owned(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(signers: &str, miners: &str) -> AuthoritySources {
        AuthoritySources {
            miner_private_key: "mk".to_owned(),
            signer_private_key: "sk".to_owned(),
            signer_authorities: signers.to_owned(),
            miner_authorities: miners.to_owned(),
        }
    }

    fn group(miner: &str, signer: &str) -> KeygroupRecord {
        KeygroupRecord::Authority {
            miner_public_key: miner.to_owned(),
            signer_public_key: signer.to_owned(),
        }
    }

    #[test]
    fn pairs_line_by_line() {
        let got = AuthorityScheme.keygroups(&sources("s0\ns1\n", "m0\nm1\n"));
        assert_eq!(got, vec![group("m0", "s0"), group("m1", "s1")]);
    }

    #[test]
    fn stops_at_shorter_source() {
        let got = AuthorityScheme.keygroups(&sources("s0\ns1\ns2\n", "m0\nm1\n"));
        assert_eq!(got, vec![group("m0", "s0"), group("m1", "s1")]);
        let got = AuthorityScheme.keygroups(&sources("s0\n", "m0\nm1\nm2"));
        assert_eq!(got, vec![group("m0", "s0")]);
    }

    #[test]
    fn blank_line_ends_source() {
        let got = AuthorityScheme.keygroups(&sources("s0\n\ns2\n", "m0\nm1\nm2\n"));
        assert_eq!(got, vec![group("m0", "s0")]);
    }

    #[test]
    fn strips_trailing_whitespace() {
        let got = AuthorityScheme.keygroups(&sources("s0 \r\n", "m0\r\n"));
        assert_eq!(got, vec![group("m0", "s0")]);
    }

    #[test]
    fn secret_keys_in_order() {
        let got = AuthorityScheme.secret_keys(&sources("", ""));
        assert_eq!(
            got,
            vec![
                ("miner_private_key", Value::Str("mk".to_owned())),
                ("signer_private_key", Value::Str("sk".to_owned())),
            ]
        );
    }
}
