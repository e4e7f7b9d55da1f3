// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{
    circuit, gates::product_share, join, split, GateEvaluator, Party, Shared, SharedBlock,
};
use crate::{
    aes::Block,
    errors::{InternalError, Result},
    parameters::{KEY_LEN, NUM_REVEALED},
    rng::{PartyRng, RoundSeed},
    view::{View, ViewReader},
};

/// The verifier's re-execution of the two parties revealed in one round.
///
/// Slot 0 holds the challenged party and slot 1 the party after it. Every
/// message slot 0 sends can be recomputed from the two revealed views and
/// seeds; slot 1's messages depend on the hidden party and are taken from
/// its view as given.
#[derive(Debug)]
pub(crate) struct Replay<'a> {
    parties: [Party; NUM_REVEALED],
    rngs: [PartyRng; NUM_REVEALED],
    readers: [ViewReader<'a>; NUM_REVEALED],
}

impl<'a> Replay<'a> {
    pub(crate) fn new(
        first: Party,
        seeds: &[RoundSeed; NUM_REVEALED],
        views: &'a [View; NUM_REVEALED],
    ) -> Self {
        Self {
            parties: [first, first.next()],
            rngs: core::array::from_fn(|i| PartyRng::new(&seeds[i])),
            readers: core::array::from_fn(|i| ViewReader::new(&views[i])),
        }
    }

    /// Reads both revealed key shares, checking each one that was drawn from
    /// the party's own randomness.
    pub(crate) fn distribute(&mut self) -> Result<SharedBlock<NUM_REVEALED>> {
        let mut shares = [[0u8; KEY_LEN]; NUM_REVEALED];
        for (slot, share) in shares.iter_mut().enumerate() {
            *share = self.readers[slot].next_array()?;
            if self.parties[slot].draws_key_share()
                && *share != self.rngs[slot].next_bytes::<KEY_LEN>()
            {
                return Err(InternalError::GateMismatch);
            }
        }
        Ok(join(&shares))
    }

    /// Fails unless both views were consumed exactly.
    pub(crate) fn finish(self) -> Result<()> {
        let [first, second] = self.readers;
        first.finish()?;
        second.finish()
    }
}

impl GateEvaluator<NUM_REVEALED> for Replay<'_> {
    fn parties(&self) -> [Party; NUM_REVEALED] {
        self.parties
    }

    fn multiply(
        &mut self,
        x: Shared<NUM_REVEALED>,
        y: Shared<NUM_REVEALED>,
    ) -> Result<Shared<NUM_REVEALED>> {
        let r: [u8; NUM_REVEALED] = core::array::from_fn(|i| self.rngs[i].next_byte());
        let z0 = product_share((x.0[0], y.0[0]), (x.0[1], y.0[1]), (r[0], r[1]));
        if z0 != self.readers[0].next_byte()? {
            return Err(InternalError::GateMismatch);
        }
        let z1 = self.readers[1].next_byte()?;
        Ok(Shared([z0, z1]))
    }
}

/// Replays the two parties starting at `first` and returns their shares of
/// the ciphertext.
///
/// Fails on the first message that does not match the revealed views, or if
/// either view holds more or fewer entries than the circuit consumes.
pub(crate) fn replay(
    first: Party,
    seeds: &[RoundSeed; NUM_REVEALED],
    views: &[View; NUM_REVEALED],
    plaintext: &Block,
) -> Result<[Block; NUM_REVEALED]> {
    let mut replay = Replay::new(first, seeds, views);
    let key_shares = replay.distribute()?;
    let output = circuit::encrypt(&mut replay, plaintext, &key_shares)?;
    replay.finish()?;
    Ok(split(&output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mpc::simulate, utils::testing::init_testing};
    use rand::Rng;

    struct Fixture {
        seeds: [RoundSeed; 3],
        plaintext: Block,
        outputs: [Block; 3],
        views: [View; 3],
    }

    fn fixture() -> Fixture {
        let mut rng = init_testing();
        let seeds = [
            RoundSeed::random(&mut rng),
            RoundSeed::random(&mut rng),
            RoundSeed::random(&mut rng),
        ];
        let plaintext: Block = rng.gen();
        let key: [u8; KEY_LEN] = rng.gen();
        let (outputs, views) = simulate(&seeds, &plaintext, &key).unwrap();
        Fixture {
            seeds,
            plaintext,
            outputs,
            views,
        }
    }

    fn revealed(fixture: &Fixture, first: Party) -> ([RoundSeed; 2], [View; 2]) {
        let second = first.next();
        (
            [fixture.seeds[first.index()], fixture.seeds[second.index()]],
            [
                fixture.views[first.index()].clone(),
                fixture.views[second.index()].clone(),
            ],
        )
    }

    #[test]
    fn replay_reproduces_simulation_for_every_challenge() -> Result<()> {
        let fixture = fixture();
        for first in Party::ALL {
            let (seeds, views) = revealed(&fixture, first);
            let outputs = replay(first, &seeds, &views, &fixture.plaintext)?;
            assert_eq!(outputs[0], fixture.outputs[first.index()]);
            assert_eq!(outputs[1], fixture.outputs[first.next().index()]);
        }
        Ok(())
    }

    #[test]
    fn replay_rejects_tampered_multiplication() {
        let fixture = fixture();
        for first in Party::ALL {
            let (seeds, mut views) = revealed(&fixture, first);
            views[0].entries_mut()[700][0] ^= 0x01;
            assert_eq!(
                replay(first, &seeds, &views, &fixture.plaintext),
                Err(InternalError::GateMismatch)
            );
        }
    }

    #[test]
    fn replay_rejects_wrong_seed() {
        let fixture = fixture();
        for first in Party::ALL {
            for slot in 0..2 {
                let (mut seeds, views) = revealed(&fixture, first);
                let mut bytes = *seeds[slot].as_bytes();
                bytes[0] ^= 0x80;
                seeds[slot] = RoundSeed::from(bytes);
                assert!(replay(first, &seeds, &views, &fixture.plaintext).is_err());
            }
        }
    }

    #[test]
    fn replay_rejects_tampered_key_share_of_drawing_party() {
        let fixture = fixture();
        let first = Party::new(0);
        let (seeds, mut views) = revealed(&fixture, first);
        views[1].entries_mut()[0][3] ^= 0x01;
        assert_eq!(
            replay(first, &seeds, &views, &fixture.plaintext),
            Err(InternalError::GateMismatch)
        );
    }

    #[test]
    fn replay_rejects_truncated_view() {
        let fixture = fixture();
        let first = Party::new(1);
        let (seeds, mut views) = revealed(&fixture, first);
        views[1].entries_mut().pop();
        assert_eq!(
            replay(first, &seeds, &views, &fixture.plaintext),
            Err(InternalError::ViewExhausted)
        );
    }

    #[test]
    fn replay_rejects_extended_view() {
        let fixture = fixture();
        let first = Party::new(2);
        let (seeds, mut views) = revealed(&fixture, first);
        views[0].entries_mut().push(vec![0]);
        assert_eq!(
            replay(first, &seeds, &views, &fixture.plaintext),
            Err(InternalError::UnconsumedView)
        );
    }

    #[test]
    fn replay_rejects_different_plaintext() {
        let fixture = fixture();
        let first = Party::new(0);
        let (seeds, views) = revealed(&fixture, first);
        let mut plaintext = fixture.plaintext;
        plaintext[0] ^= 1;
        // Party 0 holds the plaintext, so its first S-box message changes.
        assert_eq!(
            replay(first, &seeds, &views, &plaintext),
            Err(InternalError::GateMismatch)
        );
    }
}
