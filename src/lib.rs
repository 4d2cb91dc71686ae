//! This crate implements the discrete-logarithm chameleon hash of Krawczyk and Rabin over a
//! safe-prime group:
//! - Group parameter generation (safe prime `p = 2q + 1`, subgroup order `q`, generator `g`),
//!   with a fixed RFC 3526 group as a drop-in alternative to on-the-fly generation.
//! - Trapdoor key pairs `(x, y = g^x mod p)`.
//! - The hash itself, `Hash(m, r) = g^m * y^r mod p`, publicly evaluable and verifiable.
//! - Trapdoor collision finding: given `(m1, r1)` and a target `m2`, the holder of `x` computes
//!   `r2` with `Hash(m2, r2) = Hash(m1, r1)`.

#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod chameleon;
pub mod keys;
pub mod parameters;

mod serde;

pub use crate::serde::SerializeElement;

use crate::common::*;
use crate::parameters::GroupParameters;
use ::serde::*;
use sha3::{Digest, Sha3_512};
use thiserror::*;

/// Error types that may arise from cryptographic operations.
#[derive(Debug, Error, Clone, Copy)]
pub enum Error {
    /// Caused by exhausting the retry budget of the safe-prime search, or by an unusable
    /// prime source.
    #[error("safe-prime search gave up after {attempts} attempts")]
    ParameterGeneration {
        /// Number of candidate primes drawn before giving up.
        attempts: usize,
    },
    /// Caused by caller-supplied group parameters that fail primality, the safe-prime
    /// relation `p = 2q + 1`, or a range check.
    #[error("invalid group parameters: {0}")]
    InvalidParameters(&'static str),
    /// Caused by a trapdoor exponent that is not invertible modulo the group order. This is
    /// cryptographically negligible for uniformly sampled keys, but must never be coerced
    /// into a numeric result.
    #[error("trapdoor exponent is not invertible modulo the group order")]
    NoInverse,
    /// Caused by a message or randomizer outside the exponent domain required by the group
    /// parameters in use.
    #[error("{0} is outside the exponent range of the group parameters")]
    OutsideRange(&'static str),
}

/// A message to be hashed: an exponent in `[0, p-2]`.
///
/// Raw byte strings enter this domain through [`Message::from_bytes`] (big-endian
/// interpretation reduced modulo `p - 1`) or [`Message::from_digest`] (Sha3-512 digest of an
/// arbitrary-length document, then reduced).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message(#[serde(with = "SerializeElement")] BigUint);

impl Message {
    /// Sample a message uniformly at random from the exponent domain `[0, p-2]`.
    pub fn random(rng: &mut impl Rng, params: &GroupParameters) -> Self {
        Message(rng.gen_biguint_range(&BigUint::zero(), &params.exponent_modulus()))
    }

    /// Interpret bytes as a big-endian integer and reduce it into the exponent domain.
    pub fn from_bytes(bytes: &[u8], params: &GroupParameters) -> Self {
        Message(BigUint::from_bytes_be(bytes) % params.exponent_modulus())
    }

    /// Digest an arbitrary-length document with Sha3-512 and reduce the result into the
    /// exponent domain.
    pub fn from_digest(bytes: &[u8], params: &GroupParameters) -> Self {
        let digest = Sha3_512::digest(bytes);
        Message(BigUint::from_bytes_be(digest.as_slice()) % params.exponent_modulus())
    }

    /// Construct a message from an integer already in the exponent domain.
    ///
    /// Fails with [`Error::OutsideRange`] rather than silently reducing.
    pub fn from_integer(m: BigUint, params: &GroupParameters) -> Result<Self, Error> {
        if m >= params.exponent_modulus() {
            return Err(Error::OutsideRange("message"));
        }
        Ok(Message(m))
    }

    /// The integer representing this message.
    pub fn as_integer(&self) -> &BigUint {
        &self.0
    }
}

/// Per-hash randomness: an exponent in `[0, p-1]`.
///
/// Honest callers sample a fresh randomizer for every hash and never reuse one across
/// independent computations; randomizer reuse is exactly the mechanism by which the trapdoor
/// forges collisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Randomizer(#[serde(with = "SerializeElement")] BigUint);

impl Randomizer {
    /// Sample a new randomizer uniformly at random from `[1, p-1]`.
    pub fn random(rng: &mut impl Rng, params: &GroupParameters) -> Self {
        Randomizer(rng.gen_biguint_range(&BigUint::one(), params.p()))
    }

    /// Construct a randomizer from the integer representing it.
    ///
    /// **warning:** this should never be used for fresh hashes — sample with
    /// [`Randomizer::random`] instead. It exists for replaying openings and for fixtures.
    pub fn from_integer(r: BigUint, params: &GroupParameters) -> Result<Self, Error> {
        if r >= *params.p() {
            return Err(Error::OutsideRange("randomizer"));
        }
        Ok(Randomizer(r))
    }

    /// The integer representing this randomizer.
    pub fn as_integer(&self) -> &BigUint {
        &self.0
    }

    pub(crate) fn from_reduced(r: BigUint) -> Self {
        Randomizer(r)
    }
}

mod common {
    //! Common types used internally.

    pub use crate::{Error, Message, Randomizer};
    pub use num_bigint::{BigInt, BigUint, RandBigInt};
    pub use num_integer::Integer;
    pub use num_traits::{One, Zero};

    /// A trait synonym for a cryptographically secure random number generator. This trait is
    /// blanket-implemented for all valid types and will never need to be implemented by-hand.
    pub trait Rng: rand::CryptoRng + rand::RngCore {}
    impl<T: rand::CryptoRng + rand::RngCore> Rng for T {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    #[test]
    fn make_keypair() {
        let mut rng = rand::thread_rng();
        let params = GroupParameters::modp_2048();
        let _kp = KeyPair::new(&mut rng, &params);
    }

    #[test]
    fn hashing_is_correct() {
        let mut rng = rand::thread_rng();
        let params = GroupParameters::modp_2048();
        let kp = KeyPair::new(&mut rng, &params);

        let msg = Message::random(&mut rng, &params);
        let r = Randomizer::random(&mut rng, &params);
        let hash = msg.hash(&params, kp.public_key(), &r).unwrap();

        assert!(
            hash.verify_opening(&params, kp.public_key(), &msg, &r),
            "Opening didn't verify!! {:?}, {:?}",
            kp,
            msg
        );
    }

    #[test]
    fn collision_is_correct() {
        let mut rng = rand::thread_rng();
        let params = GroupParameters::modp_2048();
        let kp = KeyPair::new(&mut rng, &params);

        let m1 = Message::random(&mut rng, &params);
        let r1 = Randomizer::random(&mut rng, &params);
        let m2 = Message::random(&mut rng, &params);

        let hash1 = m1.hash(&params, kp.public_key(), &r1).unwrap();
        let r2 = kp.find_collision(&params, &m1, &r1, &m2).unwrap();
        let hash2 = m2.hash(&params, kp.public_key(), &r2).unwrap();

        assert_eq!(hash1, hash2, "Collision didn't collide!!");
    }

    #[test]
    fn message_from_bytes_is_reduced() {
        let params = GroupParameters::modp_2048();
        let bytes = [0xffu8; 512];
        let msg = Message::from_bytes(&bytes, &params);
        assert!(msg.as_integer() < &params.exponent_modulus());
    }

    #[test]
    fn message_from_digest_is_deterministic() {
        let params = GroupParameters::modp_2048();
        let a = Message::from_digest(b"redactable record", &params);
        let b = Message::from_digest(b"redactable record", &params);
        assert_eq!(a, b);
    }
}
