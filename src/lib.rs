// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Zero-knowledge proofs of knowledge of an AES-128 key.
//!
//! Given a public plaintext and ciphertext, a prover convinces a verifier
//! that it knows a key `k` with `AES-128(k, plaintext) = ciphertext`, without
//! revealing anything else about `k`.
//!
//! The proof follows the "MPC-in-the-head" paradigm of
//! [ZKBoo](https://eprint.iacr.org/2016/163): AES, key schedule included, is
//! written as a circuit over three-party XOR secret sharing. The prover
//! simulates all three parties on a sharing of its key, commits to each
//! party's view, and opens two of the three views per round according to a
//! Fiat-Shamir challenge. A prover that does not know the key must cheat in
//! some party's messages, which each round exposes with probability at least
//! 1/3; repeating [`parameters::NUM_ROUNDS`] times makes cheating infeasible.
//!
//! ```no_run
//! use aes_zkboo::{encrypt_block, AesKey, AesKeyProof, AesStatement, Proof};
//! use rand::rngs::OsRng;
//!
//! let key = [0u8; 16];
//! let plaintext = [1u8; 16];
//! let statement = AesStatement::new(plaintext, encrypt_block(&plaintext, &key));
//! let proof = AesKeyProof::prove(&statement, &AesKey::from(key), &mut OsRng)?;
//! proof.verify(&statement)?;
//! # Ok::<(), aes_zkboo::errors::InternalError>(())
//! ```
//!
//! Note that this library only covers proving and verifying. Reading inputs
//! and storing proofs is left to the caller; the `aes_zkboo` binary is a
//! minimal example of doing so.

#![warn(missing_docs)]
#![cfg_attr(feature = "flame_it", feature(proc_macro_hygiene))]
#[cfg(feature = "flame_it")]
extern crate flame;
#[cfg(feature = "flame_it")]
#[macro_use]
extern crate flamer;

#[macro_use]
pub mod errors;

mod aes;
mod gf256;
mod mpc;
pub mod parameters;
mod rng;
mod utils;
mod view;
mod zkp;


pub use aes::{encrypt_block, key_expansion, Block};
pub use gf256::{inverse, mul, sbox};
pub use rng::RoundSeed;
pub use utils::block_from_hex;
pub use view::View;
pub use zkp::{
    derive_challenges, hash_view, AesKey, AesKeyProof, AesStatement, Challenge, Proof,
    RoundCommitment, RoundResponse, ViewDigest,
};
