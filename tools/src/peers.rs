//! Construction of the peer set of a node.
use crate::{
    args::ClusterSpec,
    error::{Error, Result},
};

/// Another node of the cluster, as listed in the `[[peers]]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    /// Index of the peer.
    pub node_index: usize,
    /// Host part of the peer address.
    pub ip: String,
    /// Port part of the peer address.
    pub port: u16,
}

/// Splits `ip:port` at its single colon. The port has to be a TCP port
/// number, since it is written to the document as an integer.
pub(crate) fn split_addr(index: usize, addr: &str) -> Result<(&str, u16)> {
    addr.split_once(':')
        .and_then(|(ip, port)| Some((ip, port.parse().ok()?)))
        .ok_or_else(|| Error::MalformedAddress {
            index,
            addr: addr.to_owned(),
        })
}

/// Lists every node except `self_index`, in ascending index order.
pub fn build_peers(spec: &ClusterSpec, self_index: usize) -> Result<Vec<PeerRecord>> {
    spec.peer_addrs
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != self_index)
        .map(|(i, addr)| {
            let (ip, port) = split_addr(i, addr)?;
            Ok(PeerRecord {
                node_index: i,
                ip: ip.to_owned(),
                port,
            })
        })
        .collect()
}
