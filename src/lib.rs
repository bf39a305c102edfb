//! Threshold and XOR secret sharing for 128-bit keys
//!
//! This library splits a 16-byte key into shares held by `n` parties so that
//! only qualified subsets can recover it. Four schemes are provided:
//!
//! - [`ShamirScheme`]: polynomial sharing over a prime field, any `t + 1`
//!   of `n` parties reconstruct
//! - [`ReplicatedScheme`]: XOR fragments replicated over party subsets, any
//!   `t` of `n` parties reconstruct
//! - [`AdditiveScheme`]: XOR sharing where all `n` parties are needed
//! - [`TwoOutOfNScheme`]: XOR pairs selected by party position, for
//!   arbitrary-length messages
//!
//! The key is processed as eight independent 16-bit words, so sharing can
//! run on the rayon pool with [`SplitMode::Parallel`].
//!
//! # Quick Start
//!
//! ```
//! use keysplit::{generate_key, CsprngSource, ShamirScheme};
//!
//! let mut source = CsprngSource::from_entropy().unwrap();
//! let key = generate_key(&mut source);
//!
//! // Degree-2 polynomial over 5 parties: any 3 reconstruct
//! let mut scheme = ShamirScheme::new().unwrap();
//! let bundles = scheme.share(&key, 2, 5).unwrap();
//!
//! let recovered = scheme.reconstruct(&bundles[1..4]).unwrap();
//! assert_eq!(recovered, key);
//! ```

mod additive;
mod combinatorics;
mod config;
mod error;
mod field;
mod random;
mod replicated;
mod shamir;
mod share;
mod two_of_n;
mod word;

pub use additive::AdditiveScheme;
pub use combinatorics::{Combinations, binomial};
pub use config::{
    CoefficientRange, Config, DEFAULT_MAX_ATOMIC_SHARES, DEFAULT_MAX_HELD_SHARES, DEFAULT_MODULUS,
    SplitMode,
};
pub use error::{ErrorCategory, Result, SharingError};
pub use field::{PrimeField, mod_inverse, mod_pow, mod_reduce};
pub use random::{CsprngSource, RandomnessSource, generate_key};
pub use replicated::{AtomicShare, ReplicatedScheme, ReplicatedShares, atomic_share_count};
pub use shamir::ShamirScheme;
pub use share::{SchemeKind, Share, ShareBundle};
pub use two_of_n::{TwoOfNRow, TwoOutOfNScheme};
pub use word::{SECRET_LEN, WORD_COUNT, join_words, split_secret};

// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        AdditiveScheme, Config, CsprngSource, ReplicatedScheme, ReplicatedShares, Result,
        ShamirScheme, ShareBundle, SharingError, SplitMode, TwoOfNRow, TwoOutOfNScheme,
        generate_key,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_workflow() -> Result<()> {
        let mut source = CsprngSource::seeded(7);
        let key = generate_key(&mut source);

        // Same key through every 16-byte scheme
        let mut shamir = ShamirScheme::with_source(Config::default(), CsprngSource::seeded(1))?;
        let bundles = shamir.share(&key, 2, 5)?;
        assert_eq!(shamir.reconstruct(&bundles[2..])?, key);

        let mut replicated =
            ReplicatedScheme::with_source(Config::default(), CsprngSource::seeded(2))?;
        let parties = replicated.share(&key, 3, 5)?;
        assert_eq!(replicated.reconstruct(&parties[..3])?, key);

        let mut additive = AdditiveScheme::with_source(Config::default(), CsprngSource::seeded(3))?;
        let bundles = additive.share(&key, 4)?;
        assert_eq!(additive.reconstruct(&bundles)?, key);

        let mut two_of_n = TwoOutOfNScheme::with_source(CsprngSource::seeded(4));
        let rows = two_of_n.share(&key, 4)?;
        assert_eq!(TwoOutOfNScheme::reconstruct(&rows[2], &rows[3])?, key);

        Ok(())
    }

    #[test]
    fn test_with_config() -> Result<()> {
        let config = Config::new()
            .with_mode(SplitMode::Parallel)
            .with_coefficient_bound(10_000)?
            .with_max_atomic_shares(64)?;

        let key = *b"configured key!!";
        let mut shamir = ShamirScheme::with_source(config.clone(), CsprngSource::seeded(5))?;
        let bundles = shamir.share(&key, 1, 3)?;
        assert_eq!(shamir.reconstruct(&bundles[..2])?, key);

        let mut replicated = ReplicatedScheme::with_source(config, CsprngSource::seeded(6))?;
        assert!(matches!(
            replicated.share(&key, 4, 9),
            Err(SharingError::TooManyAtomicShares { needed: 84, limit: 64 })
        ));

        Ok(())
    }

    #[test]
    fn test_error_categories() {
        let mut shamir =
            ShamirScheme::with_source(Config::default(), CsprngSource::seeded(8)).unwrap();
        let key = [0u8; SECRET_LEN];

        let err = shamir.share(&key, 0, 3).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);

        let bundles = shamir.share(&key, 2, 3).unwrap();
        let err = shamir.reconstruct(&bundles[..2]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InsufficientShares);
    }
}
