/*!
Timestamp identifiers (TIDs).

A TID is a 13 character string in a sort-order preserving base32 alphabet,
encoding a 64-bit value with the top bit clear: 53 bits of microseconds
since the Unix epoch, followed by a 10-bit clock identifier. Because the
alphabet is sorted, TIDs compare lexically in creation order.
*/

mod clock;

pub use clock::Clock;

use thiserror::Error;

const ALPHABET: &[u8; 32] = b"234567abcdefghijklmnopqrstuvwxyz";

/// Number of characters in a TID.
pub const TID_LEN: usize = 13;

const TIMESTAMP_MASK: u64 = 0x1F_FFFF_FFFF_FFFF;
const CLOCK_ID_MASK: u16 = 0x3FF;
const CLOCK_ID_BITS: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid TID length {0}")]
    InvalidLength(usize),

    #[error("Invalid TID character {0:?} at position {1}")]
    InvalidCharacter(char, usize),
}

fn encode(mut v: u64) -> String {
    let mut s = [0u8; TID_LEN];
    for c in s.iter_mut().rev() {
        *c = ALPHABET[(v & 0x1F) as usize];
        v >>= 5;
    }
    s.iter().map(|&c| c as char).collect()
}

fn digit(c: u8) -> Option<u64> {
    ALPHABET.iter().position(|&a| a == c).map(|p| p as u64)
}

/// Creates a TID from a timestamp in microseconds and a clock identifier.
///
/// The timestamp is truncated to 53 bits and the clock identifier to 10 bits.
pub fn create(timestamp: u64, clock_id: u16) -> String {
    encode(((timestamp & TIMESTAMP_MASK) << CLOCK_ID_BITS) | (clock_id & CLOCK_ID_MASK) as u64)
}

/// Splits a TID into its timestamp (in microseconds) and clock identifier.
pub fn parse(s: &str) -> Result<(u64, u16), Error> {
    validate(s)?;

    let v = s
        .bytes()
        .filter_map(digit)
        .fold(0u64, |v, d| (v << 5) | d);

    Ok((v >> CLOCK_ID_BITS, (v as u16) & CLOCK_ID_MASK))
}

/// Checks that `s` is a well-formed TID.
pub fn validate(s: &str) -> Result<(), Error> {
    if s.len() != TID_LEN {
        return Err(Error::InvalidLength(s.len()));
    }

    for (i, c) in s.bytes().enumerate() {
        match digit(c) {
            // The first character carries the always-zero top bit
            Some(d) if i == 0 && d >= 16 => return Err(Error::InvalidCharacter(c as char, i)),
            Some(_) => {}
            None => {
                let ch = s[i..].chars().next().unwrap_or(c as char);
                return Err(Error::InvalidCharacter(ch, i));
            }
        }
    }
    Ok(())
}
