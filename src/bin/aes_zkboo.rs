// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Command line wrapper around [`aes_zkboo`].
//!
//! `prove` reads a plaintext and a key, prints the reference ciphertext and
//! writes a proof file. `verify` reads a plaintext, a ciphertext and a proof
//! file and prints `Accepted` or `Rejected`. Values not given as flags are
//! prompted for.

use aes_zkboo::{
    block_from_hex, encrypt_block, errors::InternalError, AesKey, AesKeyProof, AesStatement,
    Block, Proof,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::Input;
use rand::rngs::OsRng;
use std::{fs, path::PathBuf, process::ExitCode, time::Instant};
use tracing::{info, span, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CommandLineArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prove knowledge of a key encrypting the plaintext.
    Prove {
        /// Plaintext block, 32 hex characters.
        #[arg(short, long)]
        plaintext: Option<String>,
        /// AES-128 key, 32 hex characters.
        #[arg(short, long)]
        key: Option<String>,
        /// Where to write the proof.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Verify a proof against a plaintext/ciphertext pair.
    Verify {
        /// Plaintext block, 32 hex characters.
        #[arg(short, long)]
        plaintext: Option<String>,
        /// Ciphertext block, 32 hex characters.
        #[arg(short, long)]
        ciphertext: Option<String>,
        /// Proof file produced by `prove`.
        #[arg(long)]
        proof: Option<PathBuf>,
    },
}

/// Parses `given` if present, otherwise prompts until a valid block is
/// entered. A bad flag value falls back to prompting as well.
fn read_block(given: Option<String>, name: &str) -> anyhow::Result<Block> {
    if let Some(given) = given {
        match block_from_hex(&given) {
            Ok(block) => return Ok(block),
            Err(e) => eprintln!("Invalid {}: {}", name, e),
        }
    }
    let input: String = Input::new()
        .with_prompt(format!("Enter {} in hex (16-byte)", name))
        .validate_with(|input: &String| -> Result<(), String> {
            block_from_hex(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(block_from_hex(&input)?)
}

fn read_path(given: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match given {
        Some(path) => Ok(path),
        None => {
            let input: String = Input::new()
                .with_prompt("Enter filename for proof")
                .interact_text()?;
            Ok(PathBuf::from(input))
        }
    }
}

fn prove(
    plaintext: Option<String>,
    key: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let plaintext = read_block(plaintext, "plaintext")?;
    let key = read_block(key, "key")?;
    let ciphertext = encrypt_block(&plaintext, &key);
    println!(
        "{} {} {}",
        hex::encode(plaintext),
        hex::encode(key),
        hex::encode(ciphertext)
    );

    let statement = AesStatement::new(plaintext, ciphertext);
    let start = Instant::now();
    let proof = AesKeyProof::prove(&statement, &AesKey::from(key), &mut OsRng)?;
    let elapsed = start.elapsed();
    println!("Proof generated in {:.3?}", elapsed);

    let path = read_path(output)?;
    fs::write(&path, proof.to_bytes()?)
        .with_context(|| format!("could not write proof to {}", path.display()))?;
    info!("Proof written to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn verify(
    plaintext: Option<String>,
    ciphertext: Option<String>,
    proof: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let plaintext = read_block(plaintext, "plaintext")?;
    let ciphertext = read_block(ciphertext, "ciphertext")?;
    let path = read_path(proof)?;
    let bytes =
        fs::read(&path).with_context(|| format!("could not read proof from {}", path.display()))?;
    let proof = match AesKeyProof::from_slice(&bytes) {
        Ok(proof) => proof,
        Err(e) => {
            eprintln!("Could not decode proof: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    let statement = AesStatement::new(plaintext, ciphertext);
    let start = Instant::now();
    let verdict = proof.verify(&statement);
    let elapsed = start.elapsed();
    println!("Proof checked in {:.3?}", elapsed);
    match verdict {
        Ok(()) => {
            println!("Accepted");
            Ok(ExitCode::SUCCESS)
        }
        Err(InternalError::ProofRejected) => {
            println!("Rejected");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = CommandLineArgs::parse();
    // Set up logging.
    let filter = EnvFilter::from_default_env().add_directive("aes_zkboo=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .compact()
        .init();
    let span = span!(Level::INFO, "main");
    let _enter = span.entered();

    match cli.command {
        Command::Prove {
            plaintext,
            key,
            output,
        } => prove(plaintext, key, output),
        Command::Verify {
            plaintext,
            ciphertext,
            proof,
        } => verify(plaintext, ciphertext, proof),
    }
}
