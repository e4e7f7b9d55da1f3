// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Per-party seeded randomness.
//!
//! Every virtual party draws all of its randomness for one round from a
//! [`PartyRng`] keyed by its [`RoundSeed`]. The verifier rebuilds the revealed
//! parties' generators from the revealed seeds and replays them call for
//! call, so the output must be a pure function of the seed and the sequence
//! of calls.

use crate::parameters::SEED_LEN;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Domain separator used when stretching a round seed into a ChaCha key.
const RNG_DOMAIN: &[u8] = b"aes-zkboo party rng v1";

/// A 16-byte seed drawn fresh for one party in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct RoundSeed(pub(crate) [u8; SEED_LEN]);

impl RoundSeed {
    /// Samples a fresh seed.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; SEED_LEN];
        rng.fill_bytes(&mut seed);
        Self(seed)
    }

    /// The raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl From<[u8; SEED_LEN]> for RoundSeed {
    fn from(seed: [u8; SEED_LEN]) -> Self {
        Self(seed)
    }
}

/// Deterministic generator owned by a single party for a single round.
#[derive(Debug, Clone)]
pub(crate) struct PartyRng(ChaCha20Rng);

impl PartyRng {
    pub(crate) fn new(seed: &RoundSeed) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(RNG_DOMAIN);
        hasher.update(seed.0);
        let key: [u8; 32] = hasher.finalize().into();
        Self(ChaCha20Rng::from_seed(key))
    }

    pub(crate) fn next_bytes<const L: usize>(&mut self) -> [u8; L] {
        let mut out = [0u8; L];
        self.0.fill_bytes(&mut out);
        out
    }

    pub(crate) fn next_byte(&mut self) -> u8 {
        let [byte] = self.next_bytes::<1>();
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::init_testing;

    #[test]
    fn same_seed_same_stream() {
        let mut rng = init_testing();
        let seed = RoundSeed::random(&mut rng);
        let mut a = PartyRng::new(&seed);
        let mut b = PartyRng::new(&seed);
        for i in 0..100 {
            if i % 10 == 0 {
                assert_eq!(a.next_bytes::<16>(), b.next_bytes::<16>());
            } else {
                assert_eq!(a.next_byte(), b.next_byte());
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut rng = init_testing();
        let mut a = PartyRng::new(&RoundSeed::random(&mut rng));
        let mut b = PartyRng::new(&RoundSeed::random(&mut rng));
        assert_ne!(a.next_bytes::<32>(), b.next_bytes::<32>());
    }

    #[test]
    fn one_bit_of_seed_changes_stream() {
        let seed = RoundSeed::from([7u8; SEED_LEN]);
        let mut flipped = seed;
        flipped.0[15] ^= 1;
        assert_ne!(
            PartyRng::new(&seed).next_bytes::<16>(),
            PartyRng::new(&flipped).next_bytes::<16>()
        );
    }
}
