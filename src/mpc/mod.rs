// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Three-party XOR secret sharing and the AES circuit evaluated over it.
//!
//! The circuit in [`circuit`] and the non-linear gates in [`gates`] are
//! written once against the [`GateEvaluator`] trait and instantiated twice:
//! - `Simulation` runs all three parties for the prover, drawing
//!   randomness and recording every party's [`View`](crate::view::View);
//! - `Replay` runs the two parties revealed by a challenge for the
//!   verifier, regenerating their randomness from the revealed seeds and
//!   checking every message they claim to have produced.
//!
//! Public constants (the plaintext, round constants, the affine constant and
//! the one that starts the inversion ladder) are always added to the share of
//! [`Party::CONSTANT_HOLDER`] and nowhere else, so every share tuple keeps
//! XOR-reconstructing to the value it represents.

pub(crate) mod circuit;
pub(crate) mod gates;
mod replay;
mod simulation;

pub(crate) use replay::replay;
pub(crate) use simulation::simulate;
#[cfg(test)]
pub(crate) use simulation::Simulation;

use crate::{
    aes::Block,
    errors::Result,
    parameters::{BLOCK_LEN, NUM_PARTIES},
};
use core::ops::{BitXor, BitXorAssign};

/// One of the three virtual parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Party(u8);

impl Party {
    /// The party that holds every public constant.
    pub(crate) const CONSTANT_HOLDER: Party = Party(0);

    pub(crate) const ALL: [Party; NUM_PARTIES] = [Party(0), Party(1), Party(2)];

    /// Returns the party for `index`, reduced mod 3.
    pub(crate) fn new(index: usize) -> Self {
        Self((index % NUM_PARTIES) as u8)
    }

    /// The party whose shares this party combines with in a multiplication.
    pub(crate) fn next(self) -> Self {
        Self::new(self.index() + 1)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Parties 0 and 1 draw their key share from their own randomness;
    /// party 2's share is derived from the other two.
    pub(crate) fn draws_key_share(self) -> bool {
        self.0 < 2
    }
}

/// Shares of a single byte held by `N` parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Shared<const N: usize>(pub(crate) [u8; N]);

impl<const N: usize> Shared<N> {
    pub(crate) const ZERO: Self = Self([0; N]);

    /// Applies a GF(2)-linear map to every share independently.
    pub(crate) fn map_linear(self, f: impl Fn(u8) -> u8) -> Self {
        Self(self.0.map(f))
    }
}

impl<const N: usize> BitXor for Shared<N> {
    type Output = Self;

    fn bitxor(mut self, rhs: Self) -> Self {
        self ^= rhs;
        self
    }
}

impl<const N: usize> BitXorAssign for Shared<N> {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0.iter_mut().zip(rhs.0).for_each(|(a, b)| *a ^= b);
    }
}

/// A block of shared bytes, in AES state order.
pub(crate) type SharedBlock<const N: usize> = [Shared<N>; BLOCK_LEN];

/// Regroups a shared block into one block per party.
pub(crate) fn split<const N: usize>(block: &SharedBlock<N>) -> [Block; N] {
    core::array::from_fn(|slot| block.map(|byte| byte.0[slot]))
}

/// Regroups per-party blocks into a shared block.
pub(crate) fn join<const N: usize>(blocks: &[Block; N]) -> SharedBlock<N> {
    core::array::from_fn(|i| Shared(blocks.map(|block| block[i])))
}

/// The operations of the circuit that depend on who is being simulated.
///
/// Linear operations on shares need no interaction and are done directly on
/// [`Shared`] values; only multiplication gates and public constants go
/// through the evaluator.
pub(crate) trait GateEvaluator<const N: usize> {
    /// The parties simulated, in slot order. Slot `j + 1` always holds the
    /// party following slot `j`.
    fn parties(&self) -> [Party; N];

    /// Multiplies two shared bytes, consuming one view entry per party.
    fn multiply(&mut self, x: Shared<N>, y: Shared<N>) -> Result<Shared<N>>;

    /// Shares a public constant by handing it to [`Party::CONSTANT_HOLDER`].
    fn constant(&self, c: u8) -> Shared<N> {
        Shared(
            self.parties()
                .map(|party| if party == Party::CONSTANT_HOLDER { c } else { 0 }),
        )
    }
}
