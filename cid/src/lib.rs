/*!
Content identifiers (CIDs) for content-addressed data.

Only the strict subset used by DAG-CBOR data stores is supported:
CIDv1, the `raw` and `dag-cbor` codecs, and SHA-256 digests. A CID is
encoded as `[version, codec, hash type, digest length] ++ digest` and
rendered as text with the `b` multibase prefix followed by unpadded,
lower-case base32.

See <https://dasl.ing/cid.html>.
*/

use sha2::{Digest, Sha256};

mod error;

#[cfg(feature = "serde")]
mod serde_impl;


pub use error::Error;

/// The only supported CID version.
pub const VERSION: u8 = 1;

/// Multihash code for SHA-256.
pub const SHA256: u8 = 0x12;

/// Length of a SHA-256 digest.
pub const DIGEST_LEN: usize = 32;

/// Length of the header preceding the digest.
pub const HEADER_LEN: usize = 4;

/// Multibase marker for a binary CID with no further prefix.
pub const MULTIBASE_IDENTITY: u8 = 0x00;

/// Multibase marker for unpadded lower-case base32 text.
pub const MULTIBASE_BASE32: char = 'b';

const BASE32: base32::Alphabet = base32::Alphabet::Rfc4648Lower { padding: false };

// 4 bytes in base32 is 7 characters, 36 bytes is 58, plus the multibase marker
const EMPTY_TEXT_LEN: usize = 8;
const FULL_TEXT_LEN: usize = 59;

/// Multicodec identifying how the addressed content is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Codec {
    /// Opaque bytes (0x55).
    Raw,
    /// DAG-CBOR encoded data (0x71).
    DagCbor,
}

impl Codec {
    pub const fn code(self) -> u8 {
        match self {
            Codec::Raw => 0x55,
            Codec::DagCbor => 0x71,
        }
    }
}

impl From<Codec> for u8 {
    fn from(value: Codec) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for Codec {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x55 => Ok(Codec::Raw),
            0x71 => Ok(Codec::DagCbor),
            v => Err(Error::InvalidCodec(v as u64)),
        }
    }
}

impl TryFrom<u64> for Codec {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| Error::InvalidCodec(value))
            .and_then(Codec::try_from)
    }
}

impl core::fmt::Display for Codec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Codec::Raw => f.write_str("raw"),
            Codec::DagCbor => f.write_str("dag-cbor"),
        }
    }
}

/// A CIDv1 with a SHA-256 digest, or the "empty" CID with no digest.
///
/// CIDs are immutable values. The empty CID is a distinct, legal
/// identifier; what it means is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid {
    codec: Codec,
    digest: Option<[u8; DIGEST_LEN]>,
}

impl Cid {
    /// Creates the CID of `content` by hashing it with SHA-256.
    pub fn create(codec: Codec, content: &[u8]) -> Self {
        Self {
            codec,
            digest: Some(Sha256::digest(content).into()),
        }
    }

    /// Creates the empty CID, which carries a zero-length digest.
    pub fn create_empty(codec: Codec) -> Self {
        Self {
            codec,
            digest: None,
        }
    }

    /// Parses the `b`-prefixed base32 text form.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let Some(body) = s.strip_prefix(MULTIBASE_BASE32) else {
            return Err(Error::InvalidPrefix);
        };

        if s.len() != EMPTY_TEXT_LEN && s.len() != FULL_TEXT_LEN {
            return Err(Error::InvalidLength(s.len()));
        }

        let bytes = base32::decode(BASE32, body).ok_or(Error::InvalidBase32)?;

        // Reject upper case and non-zero padding bits
        if base32::encode(BASE32, &bytes) != body {
            return Err(Error::InvalidBase32);
        }

        Self::from_raw_bytes(&bytes)
    }

    /// Parses the binary form carrying the leading `0x00` multibase marker,
    /// as embedded in DAG-CBOR links.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() != HEADER_LEN + 1 && data.len() != HEADER_LEN + DIGEST_LEN + 1 {
            return Err(Error::InvalidLength(data.len()));
        }

        if data[0] != MULTIBASE_IDENTITY {
            return Err(Error::InvalidMultibase(data[0]));
        }

        Self::from_raw_bytes(&data[1..])
    }

    /// Parses the unprefixed binary form `[version, codec, hash, len] ++ digest`.
    pub fn from_raw_bytes(data: &[u8]) -> Result<Self, Error> {
        let Some((header, rest)) = data.split_first_chunk::<HEADER_LEN>() else {
            return Err(Error::TooShort {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        };
        let [version, codec, hash_type, digest_len] = *header;

        if version != VERSION {
            return Err(Error::InvalidVersion(version));
        }

        let codec = Codec::try_from(codec)?;

        if hash_type != SHA256 {
            return Err(Error::InvalidHashType(hash_type));
        }

        let digest = match digest_len as usize {
            0 => None,
            DIGEST_LEN => {
                let Some((digest, _)) = rest.split_first_chunk::<DIGEST_LEN>() else {
                    return Err(Error::TooShort {
                        expected: HEADER_LEN + DIGEST_LEN,
                        actual: data.len(),
                    });
                };
                Some(*digest)
            }
            _ => return Err(Error::InvalidDigestSize(digest_len)),
        };

        let trailing = rest.len() - digest_len as usize;
        if trailing != 0 {
            return Err(Error::TrailingBytes(trailing));
        }

        Ok(Self { codec, digest })
    }

    /// The unprefixed binary encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&[
            VERSION,
            self.codec.code(),
            SHA256,
            self.digest().len() as u8,
        ]);
        bytes.extend_from_slice(self.digest());
        bytes
    }

    /// The binary encoding with the leading `0x00` multibase marker,
    /// the inverse of [`Cid::from_bytes`].
    pub fn to_prefixed_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len() + 1);
        bytes.push(MULTIBASE_IDENTITY);
        bytes.extend(self.to_bytes());
        bytes
    }

    /// Length of [`Cid::to_bytes`]: 4 for the empty CID, otherwise 36.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.digest().len()
    }

    pub fn version(&self) -> u8 {
        VERSION
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn hash_type(&self) -> u8 {
        SHA256
    }

    pub fn digest(&self) -> &[u8] {
        match &self.digest {
            Some(digest) => digest,
            None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.digest.is_none()
    }
}

impl core::fmt::Display for Cid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{MULTIBASE_BASE32}{}",
            base32::encode(BASE32, &self.to_bytes())
        )
    }
}

impl core::str::FromStr for Cid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Cid> for String {
    fn from(value: Cid) -> Self {
        value.to_string()
    }
}

impl TryFrom<&str> for Cid {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
