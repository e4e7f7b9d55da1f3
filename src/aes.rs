// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Reference AES-128 (FIPS-197).
//!
//! This is the function whose key the proof system proves knowledge of. It is
//! evaluated in the clear only to check inputs; the prover evaluates the same
//! circuit over secret shares in [`crate::mpc`], reusing the linear layers
//! defined here share by share.
//!
//! The state is a 4x4 byte matrix stored column-major, so byte `4 * c + r`
//! is row `r` of column `c`.

use crate::{
    gf256,
    parameters::{AES_ROUNDS, BLOCK_LEN, KEY_LEN},
};

/// An AES state or round key.
pub type Block = [u8; BLOCK_LEN];

/// The MixColumns matrix over GF(2^8).
const MIX_COLUMNS_MATRIX: [[u8; 4]; 4] = [[2, 3, 1, 1], [1, 2, 3, 1], [1, 1, 2, 3], [3, 1, 1, 2]];

/// Where a byte lands in the key schedule's per-round 16-byte recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScheduleStep {
    /// First byte of a round key: `w[-16] ^ sbox(w[-3]) ^ rcon`.
    SubstituteWithConstant,
    /// Bytes 1 and 2: `w[-16] ^ sbox(w[-3])`.
    Substitute,
    /// Byte 3: `w[-16] ^ sbox(w[-7])`, completing RotWord.
    SubstituteRotated,
    /// Remaining bytes: `w[-16] ^ w[-4]`.
    Copy,
}

impl ScheduleStep {
    /// Classifies the `i`-th derived byte (counting from the first byte after
    /// the master key).
    pub(crate) fn at(i: usize) -> Self {
        match i % KEY_LEN {
            0 => Self::SubstituteWithConstant,
            1 | 2 => Self::Substitute,
            3 => Self::SubstituteRotated,
            _ => Self::Copy,
        }
    }

    /// How far back in the schedule the byte fed to this step sits.
    pub(crate) fn source_offset(self) -> usize {
        match self {
            Self::SubstituteWithConstant | Self::Substitute => 3,
            Self::SubstituteRotated => 7,
            Self::Copy => 4,
        }
    }
}

/// Number of bytes the key schedule derives beyond the master key.
pub(crate) const SCHEDULE_LEN: usize = AES_ROUNDS * KEY_LEN;

/// Expands a 128-bit key into the 11 round keys.
pub fn key_expansion(key: &[u8; KEY_LEN]) -> [Block; AES_ROUNDS + 1] {
    let mut schedule = Vec::with_capacity(KEY_LEN + SCHEDULE_LEN);
    schedule.extend_from_slice(key);
    let mut rcon = 1u8;
    for i in 0..SCHEDULE_LEN {
        let step = ScheduleStep::at(i);
        let back = schedule[schedule.len() - KEY_LEN];
        let source = schedule[schedule.len() - step.source_offset()];
        let byte = match step {
            ScheduleStep::SubstituteWithConstant => {
                let byte = back ^ gf256::sbox(source) ^ rcon;
                rcon = gf256::mul(rcon, 2);
                byte
            }
            ScheduleStep::Substitute | ScheduleStep::SubstituteRotated => {
                back ^ gf256::sbox(source)
            }
            ScheduleStep::Copy => back ^ source,
        };
        schedule.push(byte);
    }

    let mut round_keys = [[0u8; BLOCK_LEN]; AES_ROUNDS + 1];
    for (round_key, chunk) in round_keys.iter_mut().zip(schedule.chunks_exact(BLOCK_LEN)) {
        round_key.copy_from_slice(chunk);
    }
    round_keys
}

/// Cyclically rotates row `r` of the state left by `r` positions.
///
/// Generic so that the circuit can permute whole share tuples.
pub(crate) fn shift_rows<T: Copy>(state: &[T; BLOCK_LEN]) -> [T; BLOCK_LEN] {
    let mut out = *state;
    for column in 0..4 {
        for row in 1..4 {
            out[4 * column + row] = state[4 * ((column + row) % 4) + row];
        }
    }
    out
}

/// Multiplies every column by [`MIX_COLUMNS_MATRIX`].
pub(crate) fn mix_columns(state: &Block) -> Block {
    let mut out = [0u8; BLOCK_LEN];
    for column in 0..4 {
        let input = &state[4 * column..4 * column + 4];
        for (row, coefficients) in MIX_COLUMNS_MATRIX.iter().enumerate() {
            out[4 * column + row] = coefficients
                .iter()
                .zip(input)
                .fold(0, |acc, (&m, &x)| acc ^ gf256::mul(m, x));
        }
    }
    out
}

pub(crate) fn add_round_key(state: &Block, round_key: &Block) -> Block {
    let mut out = *state;
    out.iter_mut().zip(round_key).for_each(|(x, k)| *x ^= k);
    out
}

/// Encrypts a single block under `key`.
pub fn encrypt_block(plaintext: &Block, key: &[u8; KEY_LEN]) -> Block {
    let round_keys = key_expansion(key);
    let mut state = add_round_key(plaintext, &round_keys[0]);
    for (round, round_key) in round_keys.iter().enumerate().skip(1) {
        state = state.map(gf256::sbox);
        state = shift_rows(&state);
        if round < AES_ROUNDS {
            state = mix_columns(&state);
        }
        state = add_round_key(&state, round_key);
    }
    state
}
