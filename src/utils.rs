// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use crate::{aes::Block, errors::Result, parameters::BLOCK_LEN};

/// Parses exactly 32 hex characters into a 16-byte block.
///
/// Surrounding whitespace is ignored.
pub fn block_from_hex(input: &str) -> Result<Block> {
    let input = input.trim();
    if input.len() != 2 * BLOCK_LEN {
        return arg_err!(format!(
            "expected {} hex characters, got {}",
            2 * BLOCK_LEN,
            input.len()
        ));
    }
    let mut block = [0u8; BLOCK_LEN];
    if hex::decode_to_slice(input, &mut block).is_err() {
        return arg_err!("input is not valid hex");
    }
    Ok(block)
}
