//! Chameleon hash evaluation \[1\] over a safe-prime group.
//!
//! Hashes may be formed with the [`hash`] method on a [`Message`] and checked with the
//! [`verify_opening`] method on a [`HashValue`]. Evaluation needs only public values; the
//! trapdoor enters the picture exclusively through
//! [`KeyPair::find_collision`](crate::keys::KeyPair::find_collision).
//!
//! ```
//! # use chameleon_crypto::{Message, Randomizer, keys::KeyPair, parameters::GroupParameters};
//! # let mut rng = rand::thread_rng();
//! let params = GroupParameters::modp_2048();
//! let kp = KeyPair::new(&mut rng, &params);
//! let msg = Message::from_digest(b"ledger entry", &params);
//! let r = Randomizer::random(&mut rng, &params);
//! let hash = msg.hash(&params, kp.public_key(), &r).unwrap();
//! assert!(hash.verify_opening(&params, kp.public_key(), &msg, &r));
//! ```
//!
//! ## References
//!
//! 1. Hugo Krawczyk and Tal Rabin. "Chameleon Hashing and Signatures". 1997. URL:
//!    <https://eprint.iacr.org/1998/010>
//!
//! [`hash`]: Message::hash
//! [`verify_opening`]: HashValue::verify_opening

use crate::{common::*, keys::PublicKey, parameters::GroupParameters, serde::SerializeElement};
use serde::{Deserialize, Serialize};

/// A chameleon hash value: an element of the multiplicative group mod `p`.
///
/// Carries no identity of its own — it is a pure function of the message, randomizer,
/// parameters, and public key that produced it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HashValue(#[serde(with = "SerializeElement")] pub(crate) BigUint);

impl HashValue {
    /// Evaluate `(g^m * y^r) mod p`. Callers have already checked domains.
    pub(crate) fn new(
        params: &GroupParameters,
        pk: &PublicKey,
        msg: &Message,
        r: &Randomizer,
    ) -> Self {
        let gm = params.g().modpow(msg.as_integer(), params.p());
        let yr = pk.as_integer().modpow(r.as_integer(), params.p());
        HashValue((gm * yr) % params.p())
    }

    /// Verify a provided opening of the hash. Needs no trapdoor.
    pub fn verify_opening(
        &self,
        params: &GroupParameters,
        pk: &PublicKey,
        msg: &Message,
        r: &Randomizer,
    ) -> bool {
        match msg.hash(params, pk, r) {
            Ok(hash) => hash == *self,
            Err(_) => false,
        }
    }

    /// The group element representing this hash.
    pub fn as_integer(&self) -> &BigUint {
        &self.0
    }

    /// Big-endian byte encoding of the hash value.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }
}

impl Message {
    /// Hash this message with the given randomizer: `Hash(m, r) = g^m * y^r mod p`.
    ///
    /// Pure and deterministic. Exponents are only meaningful modulo the order of `g`, so a
    /// message or randomizer built against different (larger) parameters is rejected with
    /// [`Error::OutsideRange`] instead of being silently reduced.
    pub fn hash(
        &self,
        params: &GroupParameters,
        pk: &PublicKey,
        r: &Randomizer,
    ) -> Result<HashValue, Error> {
        if *self.as_integer() >= params.exponent_modulus() {
            return Err(Error::OutsideRange("message"));
        }
        if r.as_integer() >= params.p() {
            return Err(Error::OutsideRange("randomizer"));
        }
        Ok(HashValue::new(params, pk, self, r))
    }
}
