//! Utilities for serializing and deserializing `chameleon_crypto` types using Serde.
//!
//! To Serde, [`SerializeElement`] looks like a "module" which can be used with the
//! `#[serde(with = "SerializeElement")]` syntax in order to add serialization and
//! deserialization functionality to big-integer fields. Values are encoded as their
//! big-endian byte strings, which keeps the wire form independent of the backing integer
//! representation.

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialization/deserialization functionality for big-integer group elements and
/// exponents, using their big-endian byte encodings.
pub trait SerializeElement: Sized {
    /// Proxy serialization function telling serde how to serialize the implementing type.
    fn serialize<S>(this: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;

    /// Proxy deserialization function telling serde how to deserialize the implementing type.
    fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>;
}

impl SerializeElement for BigUint {
    fn serialize<S>(this: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        this.to_bytes_be().serialize(serializer)
    }

    fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An empty byte string decodes to zero; every byte string is a valid magnitude.
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Ok(BigUint::from_bytes_be(&bytes))
    }
}
