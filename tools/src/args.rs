//! Resolution of the positional command line input into a cluster description
//! and the on-disk layout of the node being configured.
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the generated config file inside of the node directory.
pub const CONFIG_FILE: &str = "config";

/// Positional arguments exactly as they were passed on the command line:
/// `basePath nodeIndex clusterSize peerAddressesCSV param1 param2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgs {
    /// Root directory of the cluster layout.
    pub base_path: PathBuf,
    /// Index of the node to generate the config for.
    pub node_index: String,
    /// Number of nodes in the cluster.
    pub cluster_size: String,
    /// Comma separated `ip:port` list, one entry per node.
    pub peer_addrs: String,
    /// First timing/workload parameter.
    pub param1: String,
    /// Second timing/workload parameter.
    pub param2: String,
}

/// Cluster-wide parameters shared by all nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    /// Number of nodes in the cluster, at least 1.
    pub total_nodes: usize,
    /// `ip:port` of every node, indexed by node index.
    pub peer_addrs: Vec<String>,
    /// The two timing/workload parameters, in command line order.
    pub timing: [u64; 2],
}

impl ClusterSpec {
    /// Number of peers of every node.
    pub fn max_peer(&self) -> usize {
        self.total_nodes - 1
    }
}

/// Locations of the files belonging to the configured node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePaths {
    /// Index of the node.
    pub node_index: usize,
    /// Root directory of the cluster layout (cluster-wide files).
    pub base: PathBuf,
    /// `<base>/node<index>` (files owned by this node).
    pub node_dir: PathBuf,
}

impl NodePaths {
    fn new(base: &Path, node_index: usize) -> Self {
        Self {
            node_index,
            base: base.to_path_buf(),
            node_dir: base.join(format!("node{node_index}")),
        }
    }

    /// Path of a cluster-wide file.
    pub fn cluster_file(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    /// Path of a file owned by this node.
    pub fn node_file(&self, name: &str) -> PathBuf {
        self.node_dir.join(name)
    }

    /// Path the generated config is written to.
    pub fn config(&self) -> PathBuf {
        self.node_file(CONFIG_FILE)
    }
}

fn parse_int<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|err: T::Err| Error::InvalidArgument {
        name,
        reason: format!("`{raw}`: {err}"),
    })
}

impl RawArgs {
    /// Parses the arguments. Pure, the directories are not checked here.
    pub fn resolve(&self) -> Result<(ClusterSpec, NodePaths)> {
        let node_index: i64 = parse_int("nodeIndex", &self.node_index)?;
        let total_nodes: usize = parse_int("clusterSize", &self.cluster_size)?;
        let timing = [
            parse_int("param1", &self.param1)?,
            parse_int("param2", &self.param2)?,
        ];
        if total_nodes == 0 {
            return Err(Error::InvalidArgument {
                name: "clusterSize",
                reason: "cluster must have at least one node".to_owned(),
            });
        }
        let node_index = usize::try_from(node_index)
            .ok()
            .filter(|i| *i < total_nodes)
            .ok_or(Error::IndexOutOfRange {
                index: node_index,
                cluster_size: total_nodes,
            })?;

        let peer_addrs: Vec<String> = self.peer_addrs.split(',').map(str::to_owned).collect();
        if peer_addrs.len() != total_nodes {
            return Err(Error::InvalidArgument {
                name: "peerAddressesCSV",
                reason: format!(
                    "expected {total_nodes} addresses, got {}",
                    peer_addrs.len()
                ),
            });
        }

        Ok((
            ClusterSpec {
                total_nodes,
                peer_addrs,
                timing,
            },
            NodePaths::new(&self.base_path, node_index),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn raw(node_index: &str, cluster_size: &str, peer_addrs: &str) -> RawArgs {
        RawArgs {
            base_path: "/cluster".into(),
            node_index: node_index.to_owned(),
            cluster_size: cluster_size.to_owned(),
            peer_addrs: peer_addrs.to_owned(),
            param1: "6".to_owned(),
            param2: "10".to_owned(),
        }
    }

    #[test]
    fn resolves_layout() {
        let (spec, paths) = raw("1", "2", "10.0.0.1:4000,10.0.0.2:4001")
            .resolve()
            .unwrap();
        assert_eq!(spec.total_nodes, 2);
        assert_eq!(spec.max_peer(), 1);
        assert_eq!(spec.timing, [6, 10]);
        assert_eq!(paths.node_index, 1);
        assert_eq!(paths.node_dir, Path::new("/cluster/node1"));
        assert_eq!(paths.config(), Path::new("/cluster/node1/config"));
        assert_eq!(
            paths.cluster_file("signer_authorities"),
            Path::new("/cluster/signer_authorities")
        );
    }

    #[test]
    fn rejects_non_integers() {
        assert_matches!(
            raw("x", "2", "a:1,b:2").resolve(),
            Err(Error::InvalidArgument { name: "nodeIndex", .. })
        );
        assert_matches!(
            raw("0", "two", "a:1,b:2").resolve(),
            Err(Error::InvalidArgument { name: "clusterSize", .. })
        );
        let mut args = raw("0", "2", "a:1,b:2");
        args.param2 = "fast".to_owned();
        assert_matches!(
            args.resolve(),
            Err(Error::InvalidArgument { name: "param2", .. })
        );
    }

    #[test]
    fn rejects_address_count_mismatch() {
        assert_matches!(
            raw("0", "3", "a:1,b:2").resolve(),
            Err(Error::InvalidArgument {
                name: "peerAddressesCSV",
                ..
            })
        );
    }

    #[test]
    fn rejects_index_out_of_range() {
        assert_matches!(
            raw("5", "3", "a:1,b:2,c:3").resolve(),
            Err(Error::IndexOutOfRange {
                index: 5,
                cluster_size: 3
            })
        );
        assert_matches!(
            raw("-1", "3", "a:1,b:2,c:3").resolve(),
            Err(Error::IndexOutOfRange { index: -1, .. })
        );
    }

    #[test]
    fn rejects_empty_cluster() {
        assert_matches!(
            raw("0", "0", "").resolve(),
            Err(Error::InvalidArgument { name: "clusterSize", .. })
        );
    }
}
