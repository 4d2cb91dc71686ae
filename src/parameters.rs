//! Safe-prime group parameters for the chameleon hash.
//!
//! Parameters may come from three interchangeable sources: the rejection-sampling search in
//! [`GroupParameters::generate`], the fixed 2048-bit MODP group from RFC 3526 \[1\] via
//! [`GroupParameters::modp_2048`], or caller-supplied values validated by
//! [`GroupParameters::from_parts`]. All three produce the same immutable triple `(p, q, g)`
//! with `p = 2q + 1` and cofactor 2, which may be shared freely across concurrent hash
//! evaluations.
//!
//! ## References
//!
//! 1. T. Kivinen and M. Kojo. "More Modular Exponential (MODP) Diffie-Hellman groups for
//!    Internet Key Exchange (IKE)". RFC 3526, IETF. 2003. URL:
//!    <https://datatracker.ietf.org/doc/html/rfc3526>

use crate::{common::*, serde::SerializeElement};
use glass_pumpkin::prime;
use serde::{Deserialize, Serialize};

/// The 2048-bit MODP group modulus from RFC 3526, section 3. A safe prime with generator 2.
const MODP_2048_HEX: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1\
                             29024E088A67CC74020BBEA63B139B22514A08798E3404DD\
                             EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245\
                             E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
                             EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D\
                             C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F\
                             83655D23DCA3AD961C62F356208552BB9ED529077096966D\
                             670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
                             E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9\
                             DE2BCBF6955817183995497CEA956AE515D2261898FA0510\
                             15728E5A8AACAA68FFFFFFFFFFFFFFFF";

/// Generator candidate used by generated parameters, inherited from the reference
/// construction. See the note on [`GroupParameters::has_order_q_generator`].
const DEFAULT_GENERATOR: u32 = 2;

/// Smallest modulus size the prime source accepts for the `q` search.
const MIN_BIT_LENGTH: usize = 129;

/// Parameters of the multiplicative group in which hashes live.
///
/// Invariants, established at construction and never revisited: `p` and `q` are probable
/// primes with `p = 2q + 1`, and `g` lies in `[2, p-2]`. The generator of generated and
/// fixed parameters is the literal 2 and is *not* proven to generate the order-`q`
/// subgroup; callers relying on that property should check
/// [`has_order_q_generator`](Self::has_order_q_generator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupParameters {
    #[serde(with = "SerializeElement")]
    p: BigUint,
    #[serde(with = "SerializeElement")]
    q: BigUint,
    #[serde(with = "SerializeElement")]
    g: BigUint,
}

impl GroupParameters {
    /// Generate fresh parameters with a `bit_length`-bit safe prime, using a default retry
    /// budget proportional to the bit length (far above the attempt count expected from
    /// prime density).
    ///
    /// This is an open-ended rejection-sampling search and may run for a while at large bit
    /// lengths. Callers that need a tighter bound on latency should use
    /// [`generate_with_budget`](Self::generate_with_budget).
    pub fn generate(bit_length: usize, rng: &mut impl Rng) -> Result<Self, Error> {
        Self::generate_with_budget(bit_length, rng, bit_length.saturating_mul(4).max(256))
    }

    /// Generate fresh parameters, drawing at most `max_attempts` candidate primes.
    ///
    /// Each attempt samples a random `bit_length - 1`-bit prime `q` and accepts iff
    /// `p = 2q + 1` is also a probable prime. On budget exhaustion this fails with
    /// [`Error::ParameterGeneration`] and no partial parameters exist.
    pub fn generate_with_budget(
        bit_length: usize,
        rng: &mut impl Rng,
        max_attempts: usize,
    ) -> Result<Self, Error> {
        if bit_length < MIN_BIT_LENGTH {
            return Err(Error::InvalidParameters(
                "bit length too small for the safe-prime search",
            ));
        }

        for attempts in 1..=max_attempts {
            let q = prime::from_rng(bit_length - 1, &mut *rng)
                .map_err(|_| Error::ParameterGeneration { attempts })?;
            let p = (&q << 1u32) + 1u32;
            if prime::check(&p) {
                return Ok(GroupParameters {
                    p,
                    q,
                    g: BigUint::from(DEFAULT_GENERATOR),
                });
            }
        }
        Err(Error::ParameterGeneration {
            attempts: max_attempts,
        })
    }

    /// The fixed 2048-bit MODP group from RFC 3526, with generator 2.
    ///
    /// Trades the latency of a fresh safe-prime search for loss of session-uniqueness;
    /// interchangeable with generated parameters everywhere in this crate.
    pub fn modp_2048() -> Self {
        let p = BigUint::parse_bytes(MODP_2048_HEX.as_bytes(), 16)
            .expect("RFC 3526 constant is valid hex");
        let q = (&p - 1u32) >> 1u32;
        GroupParameters {
            p,
            q,
            g: BigUint::from(DEFAULT_GENERATOR),
        }
    }

    /// Build parameters from a caller-supplied modulus and generator.
    ///
    /// Computes `q = (p - 1) / 2` and validates the safe-prime relation, the primality of
    /// both `p` and `q`, and the generator range, failing with
    /// [`Error::InvalidParameters`] otherwise.
    pub fn from_parts(p: BigUint, g: BigUint) -> Result<Self, Error> {
        if p < BigUint::from(7u32) || p.is_even() {
            return Err(Error::InvalidParameters("p is not an odd prime above 5"));
        }
        if !prime::check(&p) {
            return Err(Error::InvalidParameters("p is not prime"));
        }
        let q = (&p - 1u32) >> 1u32;
        if !prime::check(&q) {
            return Err(Error::InvalidParameters("(p - 1) / 2 is not prime"));
        }
        if g < BigUint::from(2u32) || g > &p - 2u32 {
            return Err(Error::InvalidParameters("generator outside [2, p-2]"));
        }
        Ok(GroupParameters { p, q, g })
    }

    /// The safe-prime modulus `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The subgroup order `q = (p - 1) / 2`.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// The generator candidate `g`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// The cofactor `k` in `p = k*q + 1`. Fixed at 2 for safe-prime groups.
    pub fn cofactor(&self) -> u32 {
        2
    }

    /// The bit length of the modulus.
    pub fn bit_length(&self) -> u64 {
        self.p.bits()
    }

    /// The modulus `p - 1` of the exponent domain messages are reduced into.
    pub fn exponent_modulus(&self) -> BigUint {
        &self.p - 1u32
    }

    /// Check that `g` generates the subgroup of order exactly `q`, i.e. `g^q ≡ 1 (mod p)`
    /// and `g^2 ≢ 1 (mod p)`.
    ///
    /// The reference construction asserts this for `g = 2` without proof, and the collision
    /// arithmetic is exact only when it holds; sound deployments should check it once per
    /// session.
    pub fn has_order_q_generator(&self) -> bool {
        self.g.modpow(&self.q, &self.p).is_one()
            && !self.g.modpow(&BigUint::from(2u32), &self.p).is_one()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // p = 23 is a safe prime: q = 11, and 2 generates the order-11 subgroup.
    fn toy_params() -> GroupParameters {
        GroupParameters::from_parts(BigUint::from(23u32), BigUint::from(2u32)).unwrap()
    }

    #[test]
    fn toy_parameters_validate() {
        let params = toy_params();
        assert_eq!(params.p(), &BigUint::from(23u32));
        assert_eq!(params.q(), &BigUint::from(11u32));
        assert_eq!(params.g(), &BigUint::from(2u32));
        assert_eq!(params.cofactor(), 2);
    }

    #[test]
    fn toy_generator_has_order_q() {
        assert!(toy_params().has_order_q_generator());
    }

    #[test]
    fn from_parts_rejects_composite_modulus() {
        let err = GroupParameters::from_parts(BigUint::from(25u32), BigUint::from(2u32))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }

    #[test]
    fn from_parts_rejects_non_safe_prime() {
        // 13 is prime but (13 - 1) / 2 = 6 is not.
        let err = GroupParameters::from_parts(BigUint::from(13u32), BigUint::from(2u32))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }

    #[test]
    fn from_parts_rejects_out_of_range_generator() {
        let err = GroupParameters::from_parts(BigUint::from(23u32), BigUint::from(22u32))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }

    #[test]
    fn fixed_parameters_satisfy_safe_prime_relation() {
        let params = GroupParameters::modp_2048();
        assert_eq!(params.p(), &((params.q() << 1u32) + 1u32));
        assert_eq!(params.bit_length(), 2048);
    }

    #[test]
    fn generation_rejects_tiny_bit_lengths() {
        let mut rng = rand::thread_rng();
        let err = GroupParameters::generate(64, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let mut rng = rand::thread_rng();
        // A budget of zero attempts can never commit parameters.
        let err = GroupParameters::generate_with_budget(256, &mut rng, 0).unwrap_err();
        assert!(matches!(err, Error::ParameterGeneration { attempts: 0 }));
    }
}
