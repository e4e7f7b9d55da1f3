// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Protocol parameter definitions.
//!
//! These values are part of the proof format: a prover and a verifier must
//! agree on all of them, and changing any one of them produces proofs that
//! older verifiers reject.
//!
//! ## Soundness
//! Each round lets a cheating prover escape detection with probability at
//! most 2/3, since one of the three pairs of adjacent views must contain an
//! inconsistency. With [`NUM_ROUNDS`] independent rounds the soundness error
//! is `(2/3)^137 < 2^-80`.
//!
//! ## References
//! 1. ZKBoo: Faster Zero-Knowledge for Boolean Circuits. Irene Giacomelli,
//!    Jesper Madsen, Claudio Orlandi. USENIX Security 2016.
//!    [PDF](https://eprint.iacr.org/2016/163.pdf)
//! 2. FIPS-197, Advanced Encryption Standard (AES). NIST, 2001.

/// Number of independent repetitions of the three-party simulation.
pub const NUM_ROUNDS: usize = 137;

/// Number of virtual parties simulated by the prover.
pub const NUM_PARTIES: usize = 3;

/// Number of parties revealed to the verifier in every round.
pub(crate) const NUM_REVEALED: usize = NUM_PARTIES - 1;

/// Length in bytes of an AES-128 key.
pub const KEY_LEN: usize = 16;

/// Length in bytes of an AES block.
pub const BLOCK_LEN: usize = 16;

/// Length in bytes of a per-party round seed.
pub const SEED_LEN: usize = 16;

/// Length in bytes of a view commitment (SHA-256).
pub const DIGEST_LEN: usize = 32;

/// Number of AES-128 rounds; the key schedule produces `AES_ROUNDS + 1`
/// round keys.
pub const AES_ROUNDS: usize = 10;

/// Challenge bytes at or above this value are discarded before reducing mod
/// 3, so the accepted bytes are spread evenly over `{0, 1, 2}`.
pub const CHALLENGE_THRESHOLD: u8 = 126;
