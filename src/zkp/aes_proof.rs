// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Implements the ZKBoo proof of knowledge of an AES-128 key,
//! following https://eprint.iacr.org/2016/163.pdf with the circuit of
//! [`crate::mpc`].
//!
//! For each of [`NUM_ROUNDS`] rounds the prover secret-shares the key among
//! three virtual parties, simulates AES over the shares and commits to every
//! party's view. The challenges are derived from all commitments at once;
//! each one opens two adjacent parties, whose views the verifier replays.

use super::{
    commitment::{derive_challenges, hash_view, Challenge, RoundCommitment},
    Proof,
};
use crate::{
    aes::{self, Block},
    errors::{InternalError, Result},
    mpc,
    parameters::{KEY_LEN, NUM_PARTIES, NUM_REVEALED, NUM_ROUNDS},
    rng::RoundSeed,
    view::View,
};
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Formatter},
    time::Instant,
};
use tracing::{debug, error, info, instrument, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The public statement: `ciphertext = AES-128(key, plaintext)` for some key
/// the prover knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesStatement {
    plaintext: Block,
    ciphertext: Block,
}

impl AesStatement {
    /// Builds the statement for a plaintext/ciphertext pair.
    pub fn new(plaintext: Block, ciphertext: Block) -> Self {
        Self {
            plaintext,
            ciphertext,
        }
    }

    /// The public plaintext.
    pub fn plaintext(&self) -> &Block {
        &self.plaintext
    }

    /// The public ciphertext.
    pub fn ciphertext(&self) -> &Block {
        &self.ciphertext
    }
}

/// The secret AES-128 key. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AesKey([u8; KEY_LEN]);

impl AesKey {
    /// Encrypts `plaintext` under this key with the reference cipher.
    pub fn encrypt(&self, plaintext: &Block) -> Block {
        aes::encrypt_block(plaintext, &self.0)
    }
}

impl From<[u8; KEY_LEN]> for AesKey {
    fn from(key: [u8; KEY_LEN]) -> Self {
        Self(key)
    }
}

impl Debug for AesKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesKey([REDACTED])")
    }
}

/// The opening of one round: seeds and views of the two revealed parties,
/// challenged party first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResponse {
    pub(crate) seeds: [RoundSeed; NUM_REVEALED],
    pub(crate) views: [View; NUM_REVEALED],
}

/// Everything the prover produces for one round before the challenge is
/// known. Only the commitment and the opened half survive into the proof;
/// the rest is wiped on drop, since all three views together reveal the key.
#[derive(Zeroize, ZeroizeOnDrop)]
struct RoundRecord {
    seeds: [RoundSeed; NUM_PARTIES],
    views: [View; NUM_PARTIES],
    outputs: [Block; NUM_PARTIES],
}

impl RoundRecord {
    fn simulate(
        seeds: [RoundSeed; NUM_PARTIES],
        input: &AesStatement,
        secret: &AesKey,
    ) -> Result<Self> {
        let (outputs, views) = mpc::simulate(&seeds, &input.plaintext, &secret.0)?;
        Ok(Self {
            seeds,
            views,
            outputs,
        })
    }

    fn commitment(&self) -> RoundCommitment {
        RoundCommitment::commit(&self.views, self.outputs)
    }

    fn respond(mut self, challenge: Challenge) -> RoundResponse {
        let [first, second] = challenge.revealed();
        RoundResponse {
            seeds: [self.seeds[first.index()], self.seeds[second.index()]],
            views: [
                std::mem::take(&mut self.views[first.index()]),
                std::mem::take(&mut self.views[second.index()]),
            ],
        }
    }
}

/// A non-interactive proof of knowledge of an AES-128 key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesKeyProof {
    pub(crate) commitments: Vec<RoundCommitment>,
    pub(crate) responses: Vec<RoundResponse>,
}

impl AesKeyProof {
    /// Per-round commitments, in round order.
    pub fn commitments(&self) -> &[RoundCommitment] {
        &self.commitments
    }

    /// Per-round openings, in round order.
    pub fn responses(&self) -> &[RoundResponse] {
        &self.responses
    }

    /// Serializes the proof artifact.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize!(self)
    }

    /// Decodes a proof artifact, checking that it has one commitment and one
    /// response per round.
    pub fn from_slice<B: AsRef<[u8]>>(buf: B) -> Result<Self> {
        let proof: Self = deserialize!(buf.as_ref())?;
        proof.check_shape()?;
        Ok(proof)
    }

    fn check_shape(&self) -> Result<()> {
        if self.commitments.len() != NUM_ROUNDS || self.responses.len() != NUM_ROUNDS {
            error!(
                "Proof has {} commitments and {} responses, expected {}",
                self.commitments.len(),
                self.responses.len(),
                NUM_ROUNDS
            );
            return Err(InternalError::MalformedProof(format!(
                "expected {} rounds",
                NUM_ROUNDS
            )));
        }
        Ok(())
    }

    /// Checks a single round against its commitment and challenge.
    fn verify_round(
        input: &AesStatement,
        commitment: &RoundCommitment,
        response: &RoundResponse,
        challenge: Challenge,
    ) -> Result<()> {
        if commitment.reconstruct_output() != input.ciphertext {
            return Err(InternalError::OutputMismatch);
        }

        let revealed = challenge.revealed();
        for (party, view) in revealed.iter().zip(&response.views) {
            if hash_view(view) != *commitment.digest(*party) {
                return Err(InternalError::DigestMismatch);
            }
        }

        let outputs = mpc::replay(
            revealed[0],
            &response.seeds,
            &response.views,
            &input.plaintext,
        )?;
        for (party, output) in revealed.iter().zip(&outputs) {
            if output != commitment.output(*party) {
                return verify_err!("replayed output share differs from its commitment");
            }
        }
        Ok(())
    }
}

impl Proof for AesKeyProof {
    type CommonInput = AesStatement;
    type ProverSecret = AesKey;

    #[instrument(skip_all)]
    #[cfg_attr(feature = "flame_it", flame("AesKeyProof"))]
    fn prove<R: RngCore + CryptoRng>(
        input: &Self::CommonInput,
        secret: &Self::ProverSecret,
        rng: &mut R,
    ) -> Result<Self> {
        if secret.encrypt(&input.plaintext) != input.ciphertext {
            error!("The key does not encrypt the plaintext to the ciphertext");
            return arg_err!("key does not match the statement");
        }
        info!("Generating proof over {} rounds", NUM_ROUNDS);
        let start = Instant::now();

        // Seeds are drawn up front so the caller's rng alone fixes the proof.
        let seeds: Vec<[RoundSeed; NUM_PARTIES]> = (0..NUM_ROUNDS)
            .map(|_| {
                [
                    RoundSeed::random(rng),
                    RoundSeed::random(rng),
                    RoundSeed::random(rng),
                ]
            })
            .collect();

        let records = seeds
            .into_par_iter()
            .map(|seeds| RoundRecord::simulate(seeds, input, secret))
            .collect::<Result<Vec<_>>>()?;

        let commitments: Vec<RoundCommitment> =
            records.iter().map(RoundRecord::commitment).collect();
        if let Some(round) = commitments
            .iter()
            .position(|c| c.reconstruct_output() != input.ciphertext)
        {
            error!("Round {} output shares do not reconstruct the ciphertext", round);
            return Err(InternalError::CouldNotGenerateProof);
        }
        debug!("Committed to all rounds after {:.3?}", start.elapsed());

        let challenges = derive_challenges(&commitments, NUM_ROUNDS);
        let responses = records
            .into_iter()
            .zip(challenges)
            .enumerate()
            .map(|(round, (record, challenge))| {
                trace!("Round {} opens from party {}", round, challenge.value());
                record.respond(challenge)
            })
            .collect();

        info!("Proof generated in {:.3?}", start.elapsed());
        Ok(Self {
            commitments,
            responses,
        })
    }

    #[instrument(skip_all)]
    #[cfg_attr(feature = "flame_it", flame("AesKeyProof"))]
    fn verify(&self, input: &Self::CommonInput) -> Result<()> {
        self.check_shape()?;
        info!("Verifying proof over {} rounds", NUM_ROUNDS);
        let start = Instant::now();

        let challenges = derive_challenges(&self.commitments, NUM_ROUNDS);
        debug!("Derived {} challenges after {:.3?}", challenges.len(), start.elapsed());

        self.commitments
            .par_iter()
            .zip(self.responses.par_iter())
            .zip(challenges.into_par_iter())
            .enumerate()
            .try_for_each(|(round, ((commitment, response), challenge))| {
                Self::verify_round(input, commitment, response, challenge).map_err(|cause| {
                    debug!("Round {} failed: {}", round, cause);
                    InternalError::ProofRejected
                })
            })
            .map_err(|e| {
                info!("Proof rejected after {:.3?}", start.elapsed());
                e
            })?;

        info!("Proof accepted in {:.3?}", start.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mpc::Party, utils::testing::init_testing};
    use rand::Rng;

    fn honest_round<R: RngCore + CryptoRng>(
        rng: &mut R,
    ) -> (AesStatement, RoundCommitment, RoundRecord) {
        let key = AesKey::from(rng.gen::<[u8; KEY_LEN]>());
        let plaintext: Block = rng.gen();
        let input = AesStatement::new(plaintext, key.encrypt(&plaintext));
        let seeds = [
            RoundSeed::random(rng),
            RoundSeed::random(rng),
            RoundSeed::random(rng),
        ];
        let record = RoundRecord::simulate(seeds, &input, &key).unwrap();
        (input, record.commitment(), record)
    }

    #[test]
    fn honest_round_verifies_for_every_challenge() -> Result<()> {
        let mut rng = init_testing();
        let (input, commitment, record) = honest_round(&mut rng);
        for index in 0..3 {
            let challenge = Challenge(Party::new(index));
            let response = RoundRecord {
                seeds: record.seeds,
                views: record.views.clone(),
                outputs: record.outputs,
            }
            .respond(challenge);
            AesKeyProof::verify_round(&input, &commitment, &response, challenge)?;
        }
        Ok(())
    }

    #[test]
    fn round_rejects_response_for_wrong_challenge() {
        let mut rng = init_testing();
        let (input, commitment, record) = honest_round(&mut rng);
        let response = record.respond(Challenge(Party::new(0)));
        assert_eq!(
            AesKeyProof::verify_round(&input, &commitment, &response, Challenge(Party::new(1))),
            Err(InternalError::DigestMismatch)
        );
    }

    #[test]
    fn round_rejects_wrong_ciphertext() {
        let mut rng = init_testing();
        let (input, commitment, record) = honest_round(&mut rng);
        let challenge = Challenge(Party::new(2));
        let response = record.respond(challenge);
        let mut ciphertext = *input.ciphertext();
        ciphertext[15] ^= 0x01;
        let wrong = AesStatement::new(*input.plaintext(), ciphertext);
        assert_eq!(
            AesKeyProof::verify_round(&wrong, &commitment, &response, challenge),
            Err(InternalError::OutputMismatch)
        );
    }

    #[test]
    fn round_rejects_output_shares_not_bound_to_views() {
        let mut rng = init_testing();
        let (input, mut commitment, record) = honest_round(&mut rng);
        let challenge = Challenge(Party::new(0));
        let response = record.respond(challenge);
        // Shift a difference between two revealed shares: the XOR still
        // matches, but neither share matches its replay.
        commitment.outputs[0][0] ^= 0x5a;
        commitment.outputs[1][0] ^= 0x5a;
        assert!(matches!(
            AesKeyProof::verify_round(&input, &commitment, &response, challenge),
            Err(InternalError::FailedToVerifyProof(_))
        ));
    }

    #[test]
    fn wrong_key_round_passes_only_when_patched_party_is_hidden() {
        let mut rng = init_testing();
        let (input, _, honest) = honest_round(&mut rng);
        let mut wrong_key = [0u8; KEY_LEN];
        rng.fill_bytes(&mut wrong_key);
        let wrong_key = AesKey::from(wrong_key);
        let mut record = RoundRecord::simulate(honest.seeds, &input, &wrong_key).unwrap();
        // Party 2 absorbs the difference so the shares still reach the
        // ciphertext; only its view betrays the patch.
        let produced = RoundCommitment::commit(&record.views, record.outputs).reconstruct_output();
        for (i, byte) in record.outputs[2].iter_mut().enumerate() {
            *byte ^= produced[i] ^ input.ciphertext()[i];
        }
        let commitment = record.commitment();
        assert_eq!(commitment.reconstruct_output(), *input.ciphertext());

        for index in 0..3 {
            let challenge = Challenge(Party::new(index));
            let response = RoundRecord {
                seeds: record.seeds,
                views: record.views.clone(),
                outputs: record.outputs,
            }
            .respond(challenge);
            let verdict = AesKeyProof::verify_round(&input, &commitment, &response, challenge);
            if challenge.hidden() == Party::new(2) {
                assert_eq!(verdict, Ok(()));
            } else {
                assert!(matches!(verdict, Err(InternalError::FailedToVerifyProof(_))));
            }
        }
    }

    #[test]
    fn round_record_is_wiped() {
        let mut rng = init_testing();
        let (_, _, mut record) = honest_round(&mut rng);
        assert!(record.views.iter().all(|view| !view.is_empty()));
        record.zeroize();
        assert!(record.views.iter().all(View::is_empty));
        assert!(record.seeds.iter().all(|seed| seed.as_bytes() == &[0u8; 16]));
        assert_eq!(record.outputs, [[0u8; 16]; NUM_PARTIES]);
    }

    #[test]
    fn prove_refuses_mismatched_key() {
        let mut rng = init_testing();
        let key = AesKey::from([0u8; KEY_LEN]);
        let input = AesStatement::new([0u8; 16], [0u8; 16]);
        assert!(matches!(
            AesKeyProof::prove(&input, &key, &mut rng),
            Err(InternalError::InvalidArgument(_))
        ));
    }

    #[test]
    fn key_debug_is_redacted() {
        let key = AesKey::from([0xab; KEY_LEN]);
        assert!(!format!("{:?}", key).contains("ab"));
    }
}
