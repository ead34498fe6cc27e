use core::fmt;
use std::str::FromStr;

use arbitrary::Arbitrary;
use get_size2::GetSize;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::StandardUniform;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as _;

use crate::error::TryFromDigestError;
use crate::error::TryFromHexDigestError;

/// A node of a Merkle tree: the 32-byte output of a [`MerkleHasher`][hasher],
/// e.g. the Keccak-256 hash of a leaf's pre-image.
///
/// Digests compare byte by byte, most significant byte first. Both the
/// commutative pair hash and [`MerkleTree::new_sorted`][sorted] rely on this
/// order.
///
/// [hasher]: crate::hasher::MerkleHasher
/// [sorted]: crate::merkle_tree::MerkleTree::new_sorted
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, GetSize, Arbitrary,
)]
pub struct Digest(pub [u8; Digest::BYTES]);

impl Digest {
    pub const BYTES: usize = 32;

    pub const fn new(bytes: [u8; Self::BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(self) -> [u8; Self::BYTES] {
        self.0
    }

    /// Lowercase hex without prefix. Same as `format!("{digest:x}")`.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Parse 64 hex digits, optionally prefixed with `0x`.
    pub fn try_from_hex(hex: impl AsRef<[u8]>) -> Result<Self, TryFromHexDigestError> {
        let hex = hex.as_ref();
        let digits = hex.strip_prefix(b"0x").unwrap_or(hex);
        let bytes = hex::decode(digits)?;
        let digest = Self::try_from(bytes.as_slice())?;
        Ok(digest)
    }
}

/// `0x`-prefixed lowercase hex, the way digests usually appear next to
/// Ethereum tooling.
impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::UpperHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Distribution<Digest> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Digest {
        Digest(rng.random())
    }
}

impl FromStr for Digest {
    type Err = TryFromHexDigestError;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        Self::try_from_hex(hex)
    }
}

impl From<[u8; Digest::BYTES]> for Digest {
    fn from(bytes: [u8; Digest::BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; Digest::BYTES] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = TryFromDigestError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; Self::BYTES]>::try_from(bytes)
            .map_err(|_| TryFromDigestError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

// Human-readable formats get a hex string, binary formats the raw byte array.
impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if !deserializer.is_human_readable() {
            return <[u8; Self::BYTES]>::deserialize(deserializer).map(Self);
        }

        let hex = String::deserialize(deserializer)?;
        Self::try_from_hex(&hex).map_err(D::Error::custom)
    }
}
