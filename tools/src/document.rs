//! Serialization of the node config document.
//!
//! The document is a flat TOML file: scalar fields first, then one `[[peers]]`
//! table per peer and one `[[keygroups]]` table per keygroup. Field order is
//! part of the format, so the document is laid out by hand; only string values
//! go through the `toml` encoder.
use crate::{
    error::{Error, Result},
    keys::KeygroupRecord,
    peers::PeerRecord,
};
use std::{
    fmt::Write as _,
    fs,
    io::{self, Write as _},
    path::Path,
};

/// Value of a single `key = value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer.
    Int(u64),
    /// String, written as a TOML string with any escaping it needs.
    Str(String),
    /// Literal already valid in the output format, written verbatim.
    /// A trailing line terminator is kept as read and not duplicated.
    /// Callers check the content, nothing is validated here.
    Raw(String),
}

/// Named value of the document.
pub type Field = (&'static str, Value);

impl Value {
    fn render(&self, out: &mut String) {
        match self {
            Self::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Self::Str(s) => {
                out.push_str(&toml::Value::String(s.clone()).to_string());
            }
            Self::Raw(s) => {
                out.push_str(s.strip_suffix('\n').unwrap_or(s).trim_end_matches('\r'));
            }
        }
    }
}

/// Config of a single node, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Top level `key = value` lines, in output order.
    pub scalars: Vec<Field>,
    /// `[[peers]]` tables, in output order.
    pub peers: Vec<PeerRecord>,
    /// `[[keygroups]]` tables, in output order.
    pub keygroups: Vec<KeygroupRecord>,
}

fn render_field(out: &mut String, (name, value): &Field) {
    out.push_str(name);
    out.push_str(" = ");
    value.render(out);
    out.push('\n');
}

impl ConfigDocument {
    /// Renders the document text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for field in &self.scalars {
            render_field(&mut out, field);
        }
        for peer in &self.peers {
            out.push_str("[[peers]]\n");
            render_field(&mut out, &("id_card", Value::Int(peer.node_index as u64)));
            render_field(&mut out, &("ip", Value::Str(peer.ip.clone())));
            render_field(&mut out, &("port", Value::Int(peer.port.into())));
        }
        for keygroup in &self.keygroups {
            out.push_str("[[keygroups]]\n");
            for field in keygroup.fields() {
                render_field(&mut out, &field);
            }
        }
        out
    }

    /// Writes the document to `path`, replacing any previous content.
    /// A failure half way leaves a truncated file behind.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let write = || -> io::Result<()> {
            let mut file = io::BufWriter::new(fs::File::create(path)?);
            file.write_all(self.render().as_bytes())?;
            file.flush()
        };
        write().map_err(|source| Error::WriteFailure {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(value: Value) -> String {
        let mut out = String::new();
        value.render(&mut out);
        out
    }

    #[test]
    fn values() {
        assert_eq!(rendered(Value::Int(40000)), "40000");
        assert_eq!(rendered(Value::Str("127.0.0.1".into())), "\"127.0.0.1\"");
        assert_eq!(rendered(Value::Raw("\"ab\"\n".into())), "\"ab\"");
        assert_eq!(rendered(Value::Raw("[1, 2]\r\n".into())), "[1, 2]");
        assert_eq!(rendered(Value::Raw("7".into())), "7");
    }

    #[test]
    fn strings_stay_valid_toml() {
        for s in ["a\"b\\c", "mk0\n", "tab\there", "bell\u{7}\u{1}", "it's", "'''\"\"\""] {
            let line = format!("key = {}", rendered(Value::Str(s.into())));
            let table: toml::Table = toml::from_str(&line).unwrap();
            assert_eq!(table["key"].as_str(), Some(s), "{line}");
        }
    }

    #[test]
    fn layout() {
        let doc = ConfigDocument {
            scalars: vec![("id_card", Value::Int(0)), ("port", Value::Int(4000))],
            peers: vec![PeerRecord {
                node_index: 1,
                ip: "10.0.0.2".into(),
                port: 4001,
            }],
            keygroups: vec![KeygroupRecord::Authority {
                miner_public_key: "m0".into(),
                signer_public_key: "s0".into(),
            }],
        };
        assert_eq!(
            doc.render(),
            "id_card = 0\n\
             port = 4000\n\
             [[peers]]\n\
             id_card = 1\n\
             ip = \"10.0.0.2\"\n\
             port = 4001\n\
             [[keygroups]]\n\
             miner_public_key = \"m0\"\n\
             signer_public_key = \"s0\"\n"
        );
    }

    #[test]
    fn write_fails_without_node_dir() {
        let dir = tempfile::tempdir().unwrap();
        let doc = ConfigDocument {
            scalars: vec![],
            peers: vec![],
            keygroups: vec![],
        };
        let path = dir.path().join("node7").join("config");
        assert!(matches!(
            doc.write_to(&path),
            Err(Error::WriteFailure { path: p, .. }) if p == path
        ));
    }
}
