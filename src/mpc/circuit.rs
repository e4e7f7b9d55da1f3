// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! AES-128, key schedule included, evaluated over shares.
//!
//! Mirrors [`crate::aes`] step for step. Only S-box evaluations touch the
//! evaluator; ShiftRows, MixColumns and AddRoundKey act on every share
//! independently and record nothing.

use super::{gates, GateEvaluator, Shared, SharedBlock};
use crate::{
    aes::{self, Block, ScheduleStep, SCHEDULE_LEN},
    errors::Result,
    gf256,
    parameters::{AES_ROUNDS, BLOCK_LEN, KEY_LEN},
};

/// Shared round keys, one per AES round plus the initial whitening key.
pub(crate) type SharedRoundKeys<const N: usize> = [SharedBlock<N>; AES_ROUNDS + 1];

/// Expands a shared master key, running each of the 40 schedule S-boxes as a
/// shared S-box and everything else share-wise.
pub(crate) fn key_schedule<const N: usize, E: GateEvaluator<N>>(
    evaluator: &mut E,
    key: &SharedBlock<N>,
) -> Result<SharedRoundKeys<N>> {
    let mut schedule: Vec<Shared<N>> = Vec::with_capacity(KEY_LEN + SCHEDULE_LEN);
    schedule.extend_from_slice(key);
    let mut rcon = 1u8;
    for i in 0..SCHEDULE_LEN {
        let step = ScheduleStep::at(i);
        let mut byte = schedule[schedule.len() - KEY_LEN];
        let source = schedule[schedule.len() - step.source_offset()];
        byte ^= match step {
            ScheduleStep::SubstituteWithConstant => {
                let substituted = gates::sbox(evaluator, source)? ^ evaluator.constant(rcon);
                rcon = gf256::mul(rcon, 2);
                substituted
            }
            ScheduleStep::Substitute | ScheduleStep::SubstituteRotated => {
                gates::sbox(evaluator, source)?
            }
            ScheduleStep::Copy => source,
        };
        schedule.push(byte);
    }

    let mut round_keys = [[Shared::ZERO; BLOCK_LEN]; AES_ROUNDS + 1];
    for (round_key, chunk) in round_keys.iter_mut().zip(schedule.chunks_exact(BLOCK_LEN)) {
        round_key.copy_from_slice(chunk);
    }
    Ok(round_keys)
}

fn add_round_key<const N: usize>(state: &mut SharedBlock<N>, round_key: &SharedBlock<N>) {
    state
        .iter_mut()
        .zip(round_key)
        .for_each(|(byte, key)| *byte ^= *key);
}

fn mix_columns<const N: usize>(state: &SharedBlock<N>) -> SharedBlock<N> {
    let mut out = *state;
    for slot in 0..N {
        let share: Block = state.map(|byte| byte.0[slot]);
        let mixed = aes::mix_columns(&share);
        out.iter_mut()
            .zip(mixed)
            .for_each(|(byte, m)| byte.0[slot] = m);
    }
    out
}

/// Encrypts the public `plaintext` under the shared `key`, returning the
/// shared ciphertext.
pub(crate) fn encrypt<const N: usize, E: GateEvaluator<N>>(
    evaluator: &mut E,
    plaintext: &Block,
    key: &SharedBlock<N>,
) -> Result<SharedBlock<N>> {
    let round_keys = key_schedule(evaluator, key)?;

    let mut state = plaintext.map(|byte| evaluator.constant(byte));
    add_round_key(&mut state, &round_keys[0]);
    for (round, round_key) in round_keys.iter().enumerate().skip(1) {
        for byte in state.iter_mut() {
            *byte = gates::sbox(evaluator, *byte)?;
        }
        state = aes::shift_rows(&state);
        if round < AES_ROUNDS {
            state = mix_columns(&state);
        }
        add_round_key(&mut state, round_key);
    }
    Ok(state)
}
