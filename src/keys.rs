//! Trapdoor key pairs for the chameleon hash.
//!
//! The secret exponent `x` is the trapdoor: it is what makes collision finding efficient,
//! and it never leaves this module. Everything else — the group parameters and the public
//! element `y = g^x mod p` — is safe to publish, and suffices for hashing and for verifying
//! openings.

use crate::{common::*, parameters::GroupParameters, serde::SerializeElement};
use serde::{Deserialize, Serialize};

/// The secret half of a chameleon key: the trapdoor exponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SecretKey {
    #[serde(with = "SerializeElement")]
    pub x: BigUint,
}

/// The public half of a chameleon key.
///
/// Holding this (plus the group parameters) is enough to evaluate hashes and verify
/// openings, but not to find collisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// `y = g^x mod p`.
    #[serde(with = "SerializeElement")]
    y: BigUint,
}

/// A keypair formed from a `SecretKey` and a [`PublicKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    /// Trapdoor half of the keypair.
    sk: SecretKey,
    /// Public half of the keypair.
    pk: PublicKey,
}

impl SecretKey {
    /// Sample a new trapdoor exponent uniformly at random from `[1, p-1]`.
    fn new(rng: &mut impl Rng, params: &GroupParameters) -> Self {
        SecretKey {
            x: rng.gen_biguint_range(&BigUint::one(), params.p()),
        }
    }

    /// Compute a randomizer `r2` such that `(m2, r2)` hashes to the same value as
    /// `(m1, r1)`.
    ///
    /// Works modulo the subgroup order `q`: with `y = g^x`, hash equality reduces to
    /// `m1 + x*r1 ≡ m2 + x*r2 (mod q)`, so `r2 = r1 + (m1 - m2) * x^-1 mod q`.
    pub(crate) fn find_collision(
        &self,
        params: &GroupParameters,
        m1: &Message,
        r1: &Randomizer,
        m2: &Message,
    ) -> Result<Randomizer, Error> {
        let q = BigInt::from(params.q().clone());
        let x_inv = BigInt::from(self.x.modinv(params.q()).ok_or(Error::NoInverse)?);

        let m1 = BigInt::from(m1.as_integer().clone());
        let m2 = BigInt::from(m2.as_integer().clone());
        let r1 = BigInt::from(r1.as_integer().clone());

        // `%` on BigInt preserves the sign of the dividend; mod_floor lands in [0, q-1].
        let diff = (m1 - m2).mod_floor(&q);
        let r2 = (r1 + diff * x_inv).mod_floor(&q);

        Ok(Randomizer::from_reduced(
            r2.to_biguint().expect("mod_floor result is non-negative"),
        ))
    }
}

impl PublicKey {
    /// Derive the public element from a [`SecretKey`] and the group parameters.
    fn from_secret_key(sk: &SecretKey, params: &GroupParameters) -> Self {
        PublicKey {
            y: params.g().modpow(&sk.x, params.p()),
        }
    }

    /// The group element `y` representing this public key.
    pub fn as_integer(&self) -> &BigUint {
        &self.y
    }

    /// Big-endian byte encoding of the public element.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.y.to_bytes_be()
    }
}

impl KeyPair {
    /// Generate a new keypair: `x` uniform in `[1, p-1]`, `y = g^x mod p`.
    pub fn new(rng: &mut impl Rng, params: &GroupParameters) -> Self {
        let sk = SecretKey::new(rng, params);
        let pk = PublicKey::from_secret_key(&sk, params);
        KeyPair { sk, pk }
    }

    /// Rebuild a keypair from a known trapdoor exponent.
    ///
    /// Rejects `x` outside `[1, p-1]`. The public half is recomputed, so the consistency
    /// invariant `y = g^x mod p` holds by construction.
    pub fn from_trapdoor(x: BigUint, params: &GroupParameters) -> Result<Self, Error> {
        if x.is_zero() || x >= *params.p() {
            return Err(Error::OutsideRange("trapdoor exponent"));
        }
        let sk = SecretKey { x };
        let pk = PublicKey::from_secret_key(&sk, params);
        Ok(KeyPair { sk, pk })
    }

    /// The public half of this keypair.
    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// Compute a randomizer `r2` in `[0, q-1]` such that `(m2, r2)` hashes to the same
    /// value as `(m1, r1)` under this keypair.
    ///
    /// Fails with [`Error::NoInverse`] if the trapdoor exponent is not invertible modulo
    /// `q` — negligible for sampled keys, but surfaced rather than coerced to a number.
    pub fn find_collision(
        &self,
        params: &GroupParameters,
        m1: &Message,
        r1: &Randomizer,
        m2: &Message,
    ) -> Result<Randomizer, Error> {
        self.sk.find_collision(params, m1, r1, m2)
    }
}
