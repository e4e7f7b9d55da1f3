// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! View commitments and the Fiat-Shamir challenge sampler.

use crate::{
    aes::Block,
    mpc::Party,
    parameters::{BLOCK_LEN, CHALLENGE_THRESHOLD, DIGEST_LEN, NUM_PARTIES, NUM_REVEALED},
    view::View,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 digest of a [`View`].
pub type ViewDigest = [u8; DIGEST_LEN];

/// Hashes the concatenation of a view's entries, in order.
pub fn hash_view(view: &View) -> ViewDigest {
    let mut hasher = Sha256::new();
    for entry in view.entries() {
        hasher.update(entry);
    }
    hasher.finalize().into()
}

/// The prover's first message for one round: a digest of every party's view
/// together with every party's share of the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCommitment {
    pub(crate) digests: [ViewDigest; NUM_PARTIES],
    pub(crate) outputs: [Block; NUM_PARTIES],
}

impl RoundCommitment {
    pub(crate) fn commit(views: &[View; NUM_PARTIES], outputs: [Block; NUM_PARTIES]) -> Self {
        Self {
            digests: [hash_view(&views[0]), hash_view(&views[1]), hash_view(&views[2])],
            outputs,
        }
    }

    pub(crate) fn digest(&self, party: Party) -> &ViewDigest {
        &self.digests[party.index()]
    }

    pub(crate) fn output(&self, party: Party) -> &Block {
        &self.outputs[party.index()]
    }

    /// XOR of the three output shares.
    pub fn reconstruct_output(&self) -> Block {
        let mut out = [0u8; BLOCK_LEN];
        for share in &self.outputs {
            out.iter_mut().zip(share).for_each(|(o, s)| *o ^= s);
        }
        out
    }
}

/// Per-round challenge `e`: parties `e` and `e + 1` are opened and party
/// `e + 2` stays hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge(pub(crate) Party);

impl Challenge {
    /// The challenge as a value in `{0, 1, 2}`.
    pub fn value(&self) -> u8 {
        self.0.index() as u8
    }

    pub(crate) fn revealed(&self) -> [Party; NUM_REVEALED] {
        [self.0, self.0.next()]
    }

    #[cfg(test)]
    pub(crate) fn hidden(&self) -> Party {
        self.0.next().next()
    }
}

/// Derives `rounds` challenges from the full commitment transcript.
///
/// All digests and output shares are absorbed in round order into one
/// running SHA-256 state. Then, for an incrementing counter, the counter is
/// absorbed and the first byte of the current digest is taken; bytes below
/// [`CHALLENGE_THRESHOLD`] are accepted mod 3, the rest are discarded.
pub fn derive_challenges(commitments: &[RoundCommitment], rounds: usize) -> Vec<Challenge> {
    let mut hasher = Sha256::new();
    for commitment in commitments {
        for digest in &commitment.digests {
            hasher.update(digest);
        }
        for output in &commitment.outputs {
            hasher.update(output);
        }
    }

    let mut challenges = Vec::with_capacity(rounds);
    let mut counter = 0u64;
    while challenges.len() < rounds {
        hasher.update(counter.to_le_bytes());
        let byte = hasher.clone().finalize()[0];
        if byte < CHALLENGE_THRESHOLD {
            challenges.push(Challenge(Party::new(byte as usize)));
        }
        counter += 1;
    }
    challenges
}
