// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! A list of error types which are produced while proving or verifying
use core::fmt::Debug;
use thiserror::Error;

/// The default Result type used in this crate
pub type Result<T> = std::result::Result<T, InternalError>;

/// Represents an error in the manipulation of internal cryptographic data
#[derive(Clone, Eq, PartialEq, Error, Debug)]
#[allow(missing_docs)]
pub enum InternalError {
    #[error("Serialization Error")]
    Serialization,
    #[error("Proof artifact is malformed: `{0}`")]
    MalformedProof(String),
    #[error("Proof rejected")]
    ProofRejected,
    #[error("Could not successfully generate proof")]
    CouldNotGenerateProof,
    #[error("Failed to verify proof: `{0}`")]
    FailedToVerifyProof(String),
    #[error("A view ended before the circuit finished reading from it")]
    ViewExhausted,
    #[error("A view has entries left over after the circuit finished")]
    UnconsumedView,
    #[error("A view entry has length {found}, expected {expected}")]
    InvalidViewEntry { expected: usize, found: usize },
    #[error("A multiplication gate output does not match the recorded view")]
    GateMismatch,
    #[error("A revealed view does not match its commitment")]
    DigestMismatch,
    #[error("Output shares do not reconstruct the claimed ciphertext")]
    OutputMismatch,
    #[error("Function call contained invalid arguments: `{0}`")]
    InvalidArgument(String),
}

macro_rules! serialize {
    ($x:expr) => {{
        bincode::serialize($x).or(Err(crate::errors::InternalError::Serialization))
    }};
}

macro_rules! deserialize {
    ($x:expr) => {{
        bincode::deserialize($x).or(Err(crate::errors::InternalError::Serialization))
    }};
}

macro_rules! verify_err {
    ($x:expr) => {{
        Err(crate::errors::InternalError::FailedToVerifyProof(
            String::from($x),
        ))
    }};
}

macro_rules! arg_err {
    ($x:expr) => {{
        Err(crate::errors::InternalError::InvalidArgument(String::from(
            $x,
        )))
    }};
}
