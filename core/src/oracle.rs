//! Deterministic "luck" values derived from a key alone.
//!
//! The key parts are joined with `,` and hashed with MurmurHash3 (x86, 32-bit,
//! seed 0). The hash seeds a Mulberry32 generator whose first output, scaled
//! into `[0, 1)`, is the sample. There is no stored seed: the same key gives
//! the same value in any process.

use std::fmt;

/// One component of an oracle key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyPart<'a> {
    Int(i64),
    Str(&'a str),
}

impl fmt::Display for KeyPart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<i32> for KeyPart<'_> {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for KeyPart<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<'a> From<&'a str> for KeyPart<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

/// Namespace suffix for the initial coin count draw.
pub const INITIAL_VALUE_KEY: &str = "initialValue";

/// Joins `parts` with `,` into the string that gets hashed.
pub fn join_key<'a>(parts: impl IntoIterator<Item = KeyPart<'a>>) -> String {
    let mut key = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        key.push_str(&part.to_string());
    }
    key
}

/// Reproducible value in `[0, 1)` for the given key parts.
pub fn sample<'a>(parts: impl IntoIterator<Item = KeyPart<'a>>) -> f64 {
    luck(&join_key(parts))
}

/// Reproducible value in `[0, 1)` for an already joined key.
pub fn luck(key: &str) -> f64 {
    let state = murmur3_32(key.as_bytes(), 0);
    f64::from(mulberry32(state)) / 4_294_967_296.0
}

fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let scramble = |k: u32| k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);

    let mut hash = seed;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        hash ^= scramble(k);
        hash = hash.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k ^= u32::from(byte) << (8 * i);
        }
        hash ^= scramble(k);
    }

    // the length is mixed in modulo 2^32, as in the reference algorithm
    hash ^= data.len() as u32;
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x85eb_ca6b);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xc2b2_ae35);
    hash ^ (hash >> 16)
}

fn mulberry32(state: u32) -> u32 {
    let mut t = state.wrapping_add(0x6d2b_79f5);
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    t ^ (t >> 14)
}
