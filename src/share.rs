use crate::error::{Result, SharingError};
use crate::word::WORD_COUNT;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Scheme that produced a [`ShareBundle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemeKind {
    Shamir,
    Additive,
}

/// One party's share of one word
///
/// For Shamir the index is the x-coordinate the polynomial was evaluated at
/// and the value lies in `[0, modulus)`. For the additive scheme the index
/// identifies the party and the value is a 16-bit XOR mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "zeroize", derive(Zeroize))]
pub struct Share {
    pub index: u32,
    pub value: u64,
}

/// Everything one party holds for a 128-bit secret: one [`Share`] per word
///
/// # Example
/// ```
/// use keysplit::{SchemeKind, ShamirScheme};
///
/// let mut shamir = ShamirScheme::new().unwrap();
/// let bundles = shamir.share(&[7u8; 16], 2, 4).unwrap();
///
/// assert_eq!(bundles.len(), 4);
/// assert_eq!(bundles[0].kind, SchemeKind::Shamir);
/// assert_eq!(bundles[0].index(), 1);
/// assert_eq!(bundles[0].required, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct ShareBundle {
    /// Scheme the bundle belongs to
    #[cfg_attr(feature = "zeroize", zeroize(skip))]
    pub kind: SchemeKind,
    /// Number of bundles needed for reconstruction
    pub required: u32,
    /// Shares of words 0 through 7
    pub shares: [Share; WORD_COUNT],
}

impl ShareBundle {
    /// Index of the party holding this bundle
    pub fn index(&self) -> u32 {
        self.shares[0].index
    }
}

/// Checks that `bundles` come from one sharing of `kind` and returns the
/// number of bundles that sharing requires
///
/// Rejects mixed schemes, disagreeing thresholds, bundles whose words carry
/// different indices, index 0 and duplicate indices.
pub(crate) fn check_bundles(bundles: &[ShareBundle], kind: SchemeKind) -> Result<usize> {
    let first = bundles.first().ok_or(SharingError::NoShares)?;
    let required = first.required;
    if required == 0 {
        return Err(SharingError::InvalidShareFormat(
            "bundle requires zero shares".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(bundles.len());
    for bundle in bundles {
        if bundle.kind != kind {
            return Err(SharingError::InconsistentShares(format!(
                "expected {kind:?} bundle, got {:?}",
                bundle.kind
            )));
        }
        if bundle.required != required {
            return Err(SharingError::InconsistentShares(format!(
                "bundles disagree on required count ({} vs {required})",
                bundle.required
            )));
        }

        let index = bundle.index();
        if index == 0 {
            return Err(SharingError::InvalidShareFormat(
                "share index 0 is reserved for the secret".into(),
            ));
        }
        if bundle.shares.iter().any(|share| share.index != index) {
            return Err(SharingError::InconsistentShares(format!(
                "bundle {index} mixes shares of different parties"
            )));
        }
        if !seen.insert(index) {
            return Err(SharingError::DuplicateShareIndex(index));
        }
    }

    Ok(required as usize)
}
