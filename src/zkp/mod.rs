// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Implements a trait for zero-knowledge proofs.
//!
//! In more detail, this module provides a trait [`Proof`] for constructing a
//! (non-interactive) zero knowledge proof. The trait provides two methods,
//! [`Proof::prove`] and [`Proof::verify`]. The former builds a proof and the
//! latter verifies the proof was constructed correctly.
//!
//! The only instance is [`AesKeyProof`], a ZKBoo-style proof of knowledge of
//! an AES-128 key. The commitment and Fiat-Shamir machinery it relies on lives
//! in [`commitment`].

pub(crate) mod aes_proof;
pub(crate) mod commitment;

pub use aes_proof::{AesKey, AesKeyProof, AesStatement, RoundResponse};
pub use commitment::{derive_challenges, hash_view, Challenge, RoundCommitment, ViewDigest};

use crate::errors::Result;
use rand::{CryptoRng, RngCore};
use serde::{de::DeserializeOwned, Serialize};

/// A trait for constructing zero knowledge proofs.
///
/// The associated type [`Proof::CommonInput`] denotes the data known the both
/// the prover and verifier, and the associated type [`Proof::ProverSecret`]
/// denotes the data known only to the prover.
pub trait Proof: Sized + Serialize + DeserializeOwned {
    /// Public statement.
    type CommonInput;
    /// Witness.
    type ProverSecret;
    /// Constructs a zero knowledge proof over [`Proof::ProverSecret`] and
    /// [`Proof::CommonInput`], drawing prover randomness from `rng`.
    fn prove<R: RngCore + CryptoRng>(
        input: &Self::CommonInput,
        secret: &Self::ProverSecret,
        rng: &mut R,
    ) -> Result<Self>;
    /// Verifies a zero knowledge proof using the provided
    /// [`Proof::CommonInput`].
    fn verify(&self, input: &Self::CommonInput) -> Result<()>;
}
