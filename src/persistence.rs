//! Versioned save format shared by the search and Monte Carlo players.
//!
//! Every saved player is a MessagePack map `{version, kind, state}`. The
//! header is decoded and checked before the state, so a file written by the
//! other player family is reported as a kind mismatch rather than as a
//! decoding failure.

use std::{
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Current save format version.
pub const FORMAT_VERSION: u32 = 1;

/// Which player family wrote a save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Search,
    MonteCarlo,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Search => write!(f, "search"),
            AgentKind::MonteCarlo => write!(f, "monte_carlo"),
        }
    }
}

/// Envelope written to disk around a player's durable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Saved<T> {
    pub version: u32,
    pub kind: AgentKind,
    pub state: T,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
    kind: AgentKind,
}

impl<T> Saved<T> {
    pub fn new(kind: AgentKind, state: T) -> Self {
        Saved {
            version: FORMAT_VERSION,
            kind,
            state,
        }
    }
}

impl<T: Serialize> Saved<T> {
    /// Encode the envelope as named MessagePack.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Write the envelope to `path`, replacing any existing file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush {}", path.display()),
            source,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        rmp_serde::encode::write_named(writer, self).map_err(|e| Error::SerializationContext {
            operation: format!("encode {} player", self.kind),
            message: e.to_string(),
        })
    }
}

impl<T: DeserializeOwned> Saved<T> {
    /// Decode an envelope, checking version and kind before the state.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedVersion`] if the format version differs
    /// - [`Error::AgentKindMismatch`] if the file holds another player family
    /// - [`Error::SerializationContext`] if the bytes cannot be decoded
    pub fn from_bytes(bytes: &[u8], expected: AgentKind) -> Result<Self> {
        let header: Header =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "decode save header".to_string(),
                message: e.to_string(),
            })?;

        if header.version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                found: header.version,
                expected: FORMAT_VERSION,
            });
        }
        if header.kind != expected {
            return Err(Error::AgentKindMismatch {
                expected: expected.to_string(),
                found: header.kind.to_string(),
            });
        }

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: format!("decode {expected} player"),
            message: e.to_string(),
        })
    }

    /// Read and decode an envelope from `path`.
    pub fn load_from_file<P: AsRef<Path>>(path: P, expected: AgentKind) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            operation: format!("read {}", path.display()),
            source,
        })?;
        Self::from_bytes(&bytes, expected)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_round_trip() {
        let state: HashMap<String, f64> = [("120".to_string(), 1.5)].into_iter().collect();
        let bytes = Saved::new(AgentKind::MonteCarlo, &state).to_bytes().unwrap();

        let loaded: Saved<HashMap<String, f64>> =
            Saved::from_bytes(&bytes, AgentKind::MonteCarlo).unwrap();
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.version, FORMAT_VERSION);
    }

    #[test]
    fn test_kind_mismatch_is_detected_before_state() {
        let bytes = Saved::new(AgentKind::Search, vec![1u8, 2, 3]).to_bytes().unwrap();

        let err = Saved::<HashMap<String, f64>>::from_bytes(&bytes, AgentKind::MonteCarlo)
            .unwrap_err();
        assert!(matches!(err, Error::AgentKindMismatch { .. }));
    }

    #[test]
    fn test_version_mismatch() {
        let mut saved = Saved::new(AgentKind::Search, 0u32);
        saved.version = FORMAT_VERSION + 1;
        let bytes = saved.to_bytes().unwrap();

        let err = Saved::<u32>::from_bytes(&bytes, AgentKind::Search).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedVersion { found, expected } if found == FORMAT_VERSION + 1 && expected == FORMAT_VERSION
        ));
    }

    #[test]
    fn test_garbage_is_a_decoding_error() {
        let err = Saved::<u32>::from_bytes(b"not msgpack", AgentKind::Search).unwrap_err();
        assert!(matches!(err, Error::SerializationContext { .. }));
    }
}
