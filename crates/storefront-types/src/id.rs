use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a native identifier in bytes.
pub const ID_LEN: usize = 12;

/// Length of the canonical hex form of an identifier.
pub const ID_HEX_LEN: usize = ID_LEN * 2;

/// Native identifier of a stored document.
///
/// Layout follows the usual document-database object id: a 4-byte
/// big-endian Unix timestamp, 5 bytes of per-generator randomness and a
/// 3-byte big-endian counter. The wire form is 24 lowercase hex characters;
/// the native form (what backends persist) is the raw byte array.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId([u8; ID_LEN]);

impl DocumentId {
    /// Create a `DocumentId` from raw bytes.
    pub const fn from_raw(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// The all-zero identifier. Syntactically valid, never generated.
    pub const fn zero() -> Self {
        Self([0u8; ID_LEN])
    }

    /// The raw 12 bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Seconds since the Unix epoch embedded at generation time.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Canonical string form used at the API boundary. Total.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse the canonical string form.
    ///
    /// Fails with [`TypeError::MalformedIdentifier`] unless the input is
    /// exactly 24 hex characters. Whether a document with this id exists is
    /// not this function's concern.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let malformed = |reason: String| TypeError::MalformedIdentifier {
            input: s.to_string(),
            reason,
        };
        if s.len() != ID_HEX_LEN {
            return Err(malformed(format!(
                "expected {ID_HEX_LEN} hex characters, got {}",
                s.len()
            )));
        }
        let bytes = hex::decode(s).map_err(|e| malformed(e.to_string()))?;
        let mut arr = [0u8; ID_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.to_hex())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ID_LEN]> for DocumentId {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<DocumentId> for [u8; ID_LEN] {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

/// Issues fresh [`DocumentId`]s.
///
/// Each generator draws its own 5 random bytes and a random counter start,
/// so ids from one generator never repeat until the 24-bit counter wraps
/// within a single second.
#[derive(Debug)]
pub struct IdGenerator {
    process: [u8; 5],
    counter: AtomicU32,
}

impl IdGenerator {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let mut process = [0u8; 5];
        rng.fill(&mut process);
        // Keep the first id away from the all-zero value.
        if process == [0u8; 5] {
            process[4] = 1;
        }
        Self {
            process,
            counter: AtomicU32::new(rng.gen::<u32>() & 0x00ff_ffff),
        }
    }

    /// Generate the next identifier.
    pub fn next_id(&self) -> DocumentId {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&self.process);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        DocumentId(bytes)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
