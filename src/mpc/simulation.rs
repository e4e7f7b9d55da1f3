// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{
    circuit, gates::product_share, join, split, GateEvaluator, Party, Shared, SharedBlock,
};
use crate::{
    aes::Block,
    errors::Result,
    parameters::{KEY_LEN, NUM_PARTIES},
    rng::{PartyRng, RoundSeed},
    view::View,
};
use zeroize::Zeroize;

/// The prover's simulation of all three parties for one round.
#[derive(Debug)]
pub(crate) struct Simulation {
    rngs: [PartyRng; NUM_PARTIES],
    views: [View; NUM_PARTIES],
}

impl Simulation {
    pub(crate) fn new(seeds: &[RoundSeed; NUM_PARTIES]) -> Self {
        Self {
            rngs: core::array::from_fn(|i| PartyRng::new(&seeds[i])),
            views: core::array::from_fn(|_| View::new()),
        }
    }

    /// Secret-shares `secret`: parties 0 and 1 draw their shares at random
    /// and party 2 receives the difference.
    pub(crate) fn distribute(&mut self, secret: &[u8; KEY_LEN]) -> SharedBlock<NUM_PARTIES> {
        let mut shares = [
            self.rngs[0].next_bytes::<KEY_LEN>(),
            self.rngs[1].next_bytes::<KEY_LEN>(),
            [0u8; KEY_LEN],
        ];
        for (i, byte) in secret.iter().enumerate() {
            shares[2][i] = byte ^ shares[0][i] ^ shares[1][i];
        }
        for (view, share) in self.views.iter_mut().zip(&shares) {
            view.push(share);
        }
        let shared = join(&shares);
        shares.zeroize();
        shared
    }

    pub(crate) fn into_views(self) -> [View; NUM_PARTIES] {
        self.views
    }
}

impl GateEvaluator<NUM_PARTIES> for Simulation {
    fn parties(&self) -> [Party; NUM_PARTIES] {
        Party::ALL
    }

    fn multiply(
        &mut self,
        x: Shared<NUM_PARTIES>,
        y: Shared<NUM_PARTIES>,
    ) -> Result<Shared<NUM_PARTIES>> {
        let r: [u8; NUM_PARTIES] = core::array::from_fn(|i| self.rngs[i].next_byte());
        let z = Shared(core::array::from_fn(|i| {
            let next = Party::ALL[i].next().index();
            product_share((x.0[i], y.0[i]), (x.0[next], y.0[next]), (r[i], r[next]))
        }));
        for (view, share) in self.views.iter_mut().zip(z.0) {
            view.push(&[share]);
        }
        Ok(z)
    }
}

/// Runs one round of the prover's simulation: shares `key` from the seeded
/// randomness and encrypts `plaintext` over the shares.
///
/// Returns each party's share of the ciphertext and each party's view.
pub(crate) fn simulate(
    seeds: &[RoundSeed; NUM_PARTIES],
    plaintext: &Block,
    key: &[u8; KEY_LEN],
) -> Result<([Block; NUM_PARTIES], [View; NUM_PARTIES])> {
    let mut simulation = Simulation::new(seeds);
    let key_shares = simulation.distribute(key);
    let output = circuit::encrypt(&mut simulation, plaintext, &key_shares)?;
    Ok((split(&output), simulation.into_views()))
}
