// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Per-party execution transcripts.

use crate::errors::{InternalError, Result};
use serde::{Deserialize, Serialize};
use tracing::error;
use zeroize::Zeroize;

/// Everything one virtual party received or sampled during one evaluation of
/// the circuit, in the order it happened.
///
/// Each gate that consumes randomness or produces a message appends exactly
/// one entry: a 16-byte key share for the initial sharing and a single byte
/// for every multiplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct View {
    entries: Vec<Vec<u8>>,
}

impl View {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: &[u8]) {
        self.entries.push(entry.to_vec());
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The recorded entries, in order.
    pub fn entries(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(Vec::as_slice)
    }

    #[cfg(test)]
    pub(crate) fn entries_mut(&mut self) -> &mut Vec<Vec<u8>> {
        &mut self.entries
    }
}

/// Cursor over a revealed [`View`] used while replaying a party.
///
/// Every read must have exactly the length the circuit expects, and
/// [`ViewReader::finish`] fails unless every entry was consumed.
#[derive(Debug)]
pub(crate) struct ViewReader<'a> {
    view: &'a View,
    cursor: usize,
}

impl<'a> ViewReader<'a> {
    pub(crate) fn new(view: &'a View) -> Self {
        Self { view, cursor: 0 }
    }

    pub(crate) fn next_entry(&mut self, expected: usize) -> Result<&'a [u8]> {
        let entry = self
            .view
            .entries
            .get(self.cursor)
            .ok_or(InternalError::ViewExhausted)?;
        if entry.len() != expected {
            return Err(InternalError::InvalidViewEntry {
                expected,
                found: entry.len(),
            });
        }
        self.cursor += 1;
        Ok(entry)
    }

    pub(crate) fn next_array<const L: usize>(&mut self) -> Result<[u8; L]> {
        let entry = self.next_entry(L)?;
        let mut out = [0u8; L];
        out.copy_from_slice(entry);
        Ok(out)
    }

    pub(crate) fn next_byte(&mut self) -> Result<u8> {
        let [byte] = self.next_array::<1>()?;
        Ok(byte)
    }

    pub(crate) fn finish(self) -> Result<()> {
        if self.cursor != self.view.len() {
            error!(
                "View replay stopped at entry {} of {}",
                self.cursor,
                self.view.len()
            );
            return Err(InternalError::UnconsumedView);
        }
        Ok(())
    }
}
