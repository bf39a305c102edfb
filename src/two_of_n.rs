//! 2-out-of-n sharing by index-selected XOR pairs.
//!
//! `floor(log2(n))` independent pairs `(first_j, second_j)` with
//! `first_j ^ second_j == message` are generated. A party takes `second_j`
//! in column `j` when bit `j` of its position (most significant of the
//! `iterations` low bits first) is set, `first_j` otherwise. Two parties whose
//! positions differ in exactly one of those bits can XOR the differing
//! column to recover the message.

use crate::error::{Result, SharingError};
use crate::random::{CsprngSource, RandomnessSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One party's row: its position (column 0) and one value per iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct TwoOfNRow {
    /// Zero-based party position whose bits select the columns
    pub index: u32,
    /// `columns[j]` is either `first_j` or `second_j`
    pub columns: Vec<Vec<u8>>,
}

impl TwoOfNRow {
    /// XORs the one column in which `self` and `other` differ
    ///
    /// Rows that agree everywhere, or differ in several columns, are
    /// reported as ambiguous instead of guessing which column to use. This
    /// needs no randomness, so it works for rows from any source.
    ///
    /// # Errors
    /// - `InconsistentShares` if the rows have different column counts
    /// - `InvalidShareFormat` if a row has no columns or columns differ in length
    /// - `AmbiguousReconstruction` unless exactly one column differs
    pub fn combine(&self, other: &TwoOfNRow) -> Result<Vec<u8>> {
        if self.columns.len() != other.columns.len() {
            return Err(SharingError::InconsistentShares(format!(
                "rows have {} and {} columns",
                self.columns.len(),
                other.columns.len()
            )));
        }
        let len = match self.columns.first() {
            Some(column) => column.len(),
            None => {
                return Err(SharingError::InvalidShareFormat(
                    "row has no columns".into(),
                ));
            }
        };
        if self
            .columns
            .iter()
            .chain(&other.columns)
            .any(|column| column.len() != len)
        {
            return Err(SharingError::InvalidShareFormat(
                "columns differ in length".into(),
            ));
        }

        let differing: Vec<usize> = self
            .columns
            .iter()
            .zip(&other.columns)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(j, _)| j)
            .collect();

        match differing.as_slice() {
            &[j] => {
                debug!(column = j + 1, "reconstructing message from XOR pair");
                Ok(self.columns[j]
                    .iter()
                    .zip(&other.columns[j])
                    .map(|(a, b)| a ^ b)
                    .collect())
            }
            _ => {
                warn!(
                    first = self.index,
                    second = other.index,
                    differing = differing.len(),
                    "rows are not complementary in exactly one column"
                );
                Err(SharingError::AmbiguousReconstruction {
                    differing: differing.len(),
                })
            }
        }
    }
}

/// 2-out-of-n sharing of an arbitrary-length message
///
/// # Example
/// ```
/// use keysplit::{SharingError, TwoOutOfNScheme};
///
/// let mut scheme = TwoOutOfNScheme::new().unwrap();
/// let rows = scheme.share(b"*Secret Message*", 4).unwrap();
///
/// // positions 0b00 and 0b01 differ in one column
/// let message = TwoOutOfNScheme::reconstruct(&rows[0], &rows[1]).unwrap();
/// assert_eq!(message, b"*Secret Message*");
///
/// // positions 0b00 and 0b11 differ in two
/// assert_eq!(
///     TwoOutOfNScheme::reconstruct(&rows[0], &rows[3]),
///     Err(SharingError::AmbiguousReconstruction { differing: 2 })
/// );
/// ```
#[derive(Debug)]
pub struct TwoOutOfNScheme<S = CsprngSource> {
    source: S,
}

impl TwoOutOfNScheme<CsprngSource> {
    /// Creates a scheme with an OS-seeded source
    pub fn new() -> Result<Self> {
        Ok(Self {
            source: CsprngSource::from_entropy()?,
        })
    }

    /// Recovers the message from two rows that differ in exactly one column
    ///
    /// Same as [`TwoOfNRow::combine`], which also serves schemes built
    /// with a custom source.
    ///
    /// # Errors
    /// - `InconsistentShares` if the rows have different column counts
    /// - `InvalidShareFormat` if a row has no columns or columns differ in length
    /// - `AmbiguousReconstruction` unless exactly one column differs
    pub fn reconstruct(row_a: &TwoOfNRow, row_b: &TwoOfNRow) -> Result<Vec<u8>> {
        row_a.combine(row_b)
    }
}

impl<S: RandomnessSource> TwoOutOfNScheme<S> {
    /// Creates a scheme drawing pads from `source`
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Splits `message` into `n` rows of `floor(log2(n))` columns each
    ///
    /// Positions at or above `2^iterations` (when `n` is not a power of two)
    /// reuse the column selection of their low bits.
    ///
    /// # Errors
    /// - `EmptyMessage` if `message` is empty
    /// - `InvalidPartyCount` if `n < 2` or `n` does not fit in a `u32`
    pub fn share(&mut self, message: &[u8], n: usize) -> Result<Vec<TwoOfNRow>> {
        if message.is_empty() {
            return Err(SharingError::EmptyMessage);
        }
        if n < 2 || u32::try_from(n).is_err() {
            return Err(SharingError::InvalidPartyCount(n));
        }

        let iterations = n.ilog2() as usize;
        debug!(
            parties = n,
            iterations,
            len = message.len(),
            "splitting message into XOR pairs"
        );

        let mut pairs: Vec<(Vec<u8>, Vec<u8>)> = (0..iterations)
            .map(|_| {
                let mut first = vec![0u8; message.len()];
                self.source.fill_bytes(&mut first);
                let second = first.iter().zip(message).map(|(a, m)| a ^ m).collect();
                (first, second)
            })
            .collect();

        let rows = (0..n)
            .map(|position| TwoOfNRow {
                index: position as u32,
                columns: pairs
                    .iter()
                    .enumerate()
                    .map(|(j, (first, second))| {
                        if (position >> (iterations - 1 - j)) & 1 == 1 {
                            second.clone()
                        } else {
                            first.clone()
                        }
                    })
                    .collect(),
            })
            .collect();

        #[cfg(feature = "zeroize")]
        pairs.zeroize();
        #[cfg(not(feature = "zeroize"))]
        pairs.clear();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MESSAGE: &[u8] = b"*Secret Message*";

    type Scheme = TwoOutOfNScheme<CsprngSource>;

    fn seeded(seed: u64) -> Scheme {
        TwoOutOfNScheme::with_source(CsprngSource::seeded(seed))
    }

    /// Pads of 0x00, 0x01, 0x02, ... so every column is predictable
    struct CountingPads(u8);

    impl RandomnessSource for CountingPads {
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest.iter_mut() {
                *byte = self.0;
                self.0 = self.0.wrapping_add(1);
            }
        }

        fn next_u32(&mut self) -> u32 {
            u32::from(self.next_u16())
        }

        fn below(&mut self, _bound: u64) -> u64 {
            0
        }
    }

    #[test]
    fn test_custom_source_rows_combine() {
        let mut scheme = TwoOutOfNScheme::with_source(CountingPads(0));
        let rows = scheme.share(b"abc", 2).unwrap();

        // one iteration: position 0 holds the pad, position 1 pad ^ message
        assert_eq!(rows[0].columns, vec![vec![0, 1, 2]]);
        assert_eq!(rows[1].columns, vec![vec![b'a', b'b' ^ 1, b'c' ^ 2]]);

        assert_eq!(rows[0].combine(&rows[1]).unwrap(), b"abc");
        assert_eq!(rows[1].combine(&rows[0]).unwrap(), b"abc");
        assert_eq!(TwoOutOfNScheme::reconstruct(&rows[0], &rows[1]).unwrap(), b"abc");
    }

    #[test]
    fn test_row_layout() {
        let mut scheme = seeded(1);
        let rows = scheme.share(MESSAGE, 4).unwrap();
        assert_eq!(rows.len(), 4);
        for (position, row) in rows.iter().enumerate() {
            assert_eq!(row.index, position as u32);
            assert_eq!(row.columns.len(), 2);
            assert!(row.columns.iter().all(|c| c.len() == MESSAGE.len()));
        }

        // column 1 follows the high bit, column 2 the low bit
        assert_eq!(rows[0].columns[0], rows[1].columns[0]);
        assert_ne!(rows[0].columns[0], rows[2].columns[0]);
        assert_ne!(rows[0].columns[1], rows[1].columns[1]);
        assert_eq!(rows[0].columns[1], rows[2].columns[1]);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(0, 2)]
    #[case(1, 3)]
    #[case(2, 3)]
    #[case(3, 2)]
    fn test_single_difference_reconstructs(#[case] a: usize, #[case] b: usize) {
        let mut scheme = seeded(2);
        let rows = scheme.share(MESSAGE, 4).unwrap();
        assert_eq!(Scheme::reconstruct(&rows[a], &rows[b]).unwrap(), MESSAGE);
    }

    #[rstest]
    #[case(0, 3, 2)]
    #[case(1, 2, 2)]
    #[case(2, 2, 0)]
    fn test_ambiguous_rows(#[case] a: usize, #[case] b: usize, #[case] differing: usize) {
        let mut scheme = seeded(3);
        let rows = scheme.share(MESSAGE, 4).unwrap();
        assert_eq!(
            Scheme::reconstruct(&rows[a], &rows[b]),
            Err(SharingError::AmbiguousReconstruction { differing })
        );
    }

    #[test]
    fn test_length_agnostic() {
        let mut scheme = seeded(4);
        let message = b"a message that is longer than one AES block";
        let rows = scheme.share(message, 8).unwrap();
        assert_eq!(rows[0].columns.len(), 3);
        assert_eq!(
            Scheme::reconstruct(&rows[5], &rows[4]).unwrap(),
            message.to_vec()
        );
    }

    #[test]
    fn test_non_power_of_two() {
        let mut scheme = seeded(5);
        let rows = scheme.share(MESSAGE, 3).unwrap();
        assert_eq!(rows[0].columns.len(), 1);
        assert_eq!(Scheme::reconstruct(&rows[0], &rows[1]).unwrap(), MESSAGE);
        // position 2 has the same low bit as position 0
        assert_eq!(
            Scheme::reconstruct(&rows[0], &rows[2]),
            Err(SharingError::AmbiguousReconstruction { differing: 0 })
        );
    }

    #[test]
    fn test_invalid_arguments() {
        let mut scheme = seeded(6);
        assert_eq!(scheme.share(b"", 4), Err(SharingError::EmptyMessage));
        assert_eq!(
            scheme.share(MESSAGE, 1),
            Err(SharingError::InvalidPartyCount(1))
        );
    }

    #[test]
    fn test_malformed_rows() {
        let mut scheme = seeded(7);
        let rows = scheme.share(MESSAGE, 4).unwrap();

        let mut short = rows[1].clone();
        short.columns.pop();
        assert!(matches!(
            Scheme::reconstruct(&rows[0], &short),
            Err(SharingError::InconsistentShares(_))
        ));

        let mut truncated = rows[1].clone();
        truncated.columns[1].pop();
        assert!(matches!(
            Scheme::reconstruct(&rows[0], &truncated),
            Err(SharingError::InvalidShareFormat(_))
        ));

        let empty = TwoOfNRow {
            index: 0,
            columns: Vec::new(),
        };
        assert!(matches!(
            Scheme::reconstruct(&empty, &empty),
            Err(SharingError::InvalidShareFormat(_))
        ));
    }
}
