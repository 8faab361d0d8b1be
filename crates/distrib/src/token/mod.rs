//! Ring tokens.
//!
//! A token is a position on the 32-bit hash ring. Keys and replica labels
//! are both hashed into tokens with the same function so placement and
//! lookup always agree.

pub mod crc32;

pub use crc32::Crc32Token;
