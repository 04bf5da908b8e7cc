use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("CID text does not start with the 'b' multibase prefix")]
    InvalidPrefix,

    #[error("Invalid CID length {0}")]
    InvalidLength(usize),

    #[error("CID text is not canonical unpadded lower-case base32")]
    InvalidBase32,

    #[error("CID is too short: expected {expected} bytes, found {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("Unsupported CID version {0}")]
    InvalidVersion(u8),

    #[error("Unsupported multicodec {0:#x}")]
    InvalidCodec(u64),

    #[error("Unsupported multihash type {0:#x}")]
    InvalidHashType(u8),

    #[error("Invalid digest size {0}")]
    InvalidDigestSize(u8),

    #[error("CID has {0} trailing bytes after the digest")]
    TrailingBytes(usize),

    #[error("Binary CID has multibase marker {0:#04x}, expected 0x00")]
    InvalidMultibase(u8),
}
