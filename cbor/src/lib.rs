/*!
A strict canonical subset of CBOR for content-addressed data (DAG-CBOR).

The encoder always produces the one canonical encoding of a value: minimal
length arguments, 64-bit floats only, and map keys sorted shortest first,
then byte-wise. The decoder accepts nothing else, so any successfully
decoded document re-encodes to the identical bytes.
*/

pub use grove_cid as cid;

pub mod decode;
pub mod encode;

mod buffer;
mod path;
mod value;

pub use path::{Path, Segment};
pub use value::{Map, Value, key_order};

#[cfg(test)]
mod decode_tests;
