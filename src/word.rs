//! Conversion between a 128-bit key and its eight 16-bit words.

use crate::config::SplitMode;
use crate::error::{Result, SharingError};
use rayon::prelude::*;

/// Length of a secret key in bytes
pub const SECRET_LEN: usize = 16;

/// Number of 16-bit words in a secret key
pub const WORD_COUNT: usize = SECRET_LEN / 2;

/// Splits a 16-byte secret into eight big-endian 16-bit words
///
/// Word `i` is built from bytes `2i` and `2i + 1`.
///
/// # Example
/// ```
/// use keysplit::split_secret;
///
/// let words = split_secret(&[0x12, 0x34, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF]).unwrap();
/// assert_eq!(words[0], 0x1234);
/// assert_eq!(words[7], 0x00FF);
/// ```
pub fn split_secret(secret: &[u8]) -> Result<[u16; WORD_COUNT]> {
    if secret.len() != SECRET_LEN {
        return Err(SharingError::InvalidSecretLength {
            expected: SECRET_LEN,
            got: secret.len(),
        });
    }

    let mut words = [0u16; WORD_COUNT];
    for (word, pair) in words.iter_mut().zip(secret.chunks_exact(2)) {
        *word = u16::from_be_bytes([pair[0], pair[1]]);
    }
    Ok(words)
}

/// Reassembles eight reconstructed words into a 16-byte secret
///
/// Words are given as `u64` because reconstruction happens in wider
/// arithmetic; any value above `u16::MAX` is rejected.
pub fn join_words(words: &[u64]) -> Result<[u8; SECRET_LEN]> {
    if words.len() != WORD_COUNT {
        return Err(SharingError::InvalidSecretLength {
            expected: WORD_COUNT,
            got: words.len(),
        });
    }

    let mut secret = [0u8; SECRET_LEN];
    for (chunk, &word) in secret.chunks_exact_mut(2).zip(words) {
        let word = u16::try_from(word).map_err(|_| SharingError::WordOutOfRange(word))?;
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    Ok(secret)
}

/// Runs `f` once per word index, on the rayon pool in parallel mode
///
/// Words never depend on each other, so both modes yield the same output.
pub(crate) fn map_words<T, F>(mode: SplitMode, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    match mode {
        SplitMode::Sequential => (0..WORD_COUNT).map(f).collect(),
        SplitMode::Parallel => (0..WORD_COUNT).into_par_iter().map(f).collect(),
    }
}
