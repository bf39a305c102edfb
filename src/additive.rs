use crate::config::Config;
use crate::error::{Result, SharingError};
use crate::random::{CsprngSource, RandomnessSource};
use crate::share::{SchemeKind, Share, ShareBundle, check_bundles};
use crate::word::{SECRET_LEN, WORD_COUNT, join_words, map_words, split_secret};
use tracing::{debug, warn};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// n-out-of-n XOR sharing of a 128-bit secret
///
/// Every word is split into `n` 16-bit values whose XOR is the word. All
/// `n` bundles are needed; any `n - 1` of them are uniformly random.
///
/// # Example
/// ```
/// use keysplit::{AdditiveScheme, SharingError};
///
/// let mut scheme = AdditiveScheme::new().unwrap();
/// let secret = *b"sixteen byte key";
/// let bundles = scheme.share(&secret, 3).unwrap();
///
/// assert_eq!(scheme.reconstruct(&bundles).unwrap(), secret);
/// assert!(matches!(
///     scheme.reconstruct(&bundles[..2]),
///     Err(SharingError::InsufficientShares { needed: 3, got: 2 })
/// ));
/// ```
#[derive(Debug)]
pub struct AdditiveScheme<S = CsprngSource> {
    config: Config,
    source: S,
}

impl AdditiveScheme<CsprngSource> {
    /// Creates a scheme with the default configuration and an OS-seeded source
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Creates a scheme with a custom configuration and an OS-seeded source
    pub fn with_config(config: Config) -> Result<Self> {
        let source = CsprngSource::from_entropy()?;
        AdditiveScheme::with_source(config, source)
    }
}

impl<S: RandomnessSource> AdditiveScheme<S> {
    /// Creates a scheme drawing masks from `source`
    pub fn with_source(config: Config, source: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    /// Splits a 16-byte secret into `n` bundles, all of which are needed to reconstruct
    ///
    /// # Errors
    /// - `InvalidPartyCount` if `n < 2` or `n` does not fit in a `u32`
    /// - `InvalidSecretLength` if `secret` is not 16 bytes
    pub fn share(&mut self, secret: &[u8], n: usize) -> Result<Vec<ShareBundle>> {
        if n < 2 || u32::try_from(n).is_err() {
            return Err(SharingError::InvalidPartyCount(n));
        }

        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut words = split_secret(secret)?;
        debug!(parties = n, mode = ?self.config.mode, "splitting secret additively");

        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut masks: Vec<Vec<u16>> = (0..WORD_COUNT)
            .map(|_| (0..n - 1).map(|_| self.source.next_u16()).collect())
            .collect();

        let values: Vec<Vec<u16>> = map_words(self.config.mode, |w| {
            let mut values = masks[w].clone();
            let last = values.iter().fold(words[w], |acc, &mask| acc ^ mask);
            values.push(last);
            values
        });

        #[cfg(feature = "zeroize")]
        {
            masks.zeroize();
            words.zeroize();
        }

        let bundles = (0..n)
            .map(|party| ShareBundle {
                kind: SchemeKind::Additive,
                required: n as u32,
                shares: std::array::from_fn(|w| Share {
                    index: (party + 1) as u32,
                    value: u64::from(values[w][party]),
                }),
            })
            .collect();

        Ok(bundles)
    }
}

impl<S> AdditiveScheme<S> {
    /// The configuration this scheme was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// XORs all `n` bundles back into the secret
    ///
    /// # Errors
    /// - `NoShares` if `bundles` is empty
    /// - `InsufficientShares` if fewer than `n` bundles are given
    /// - `InconsistentShares` if more than `n` bundles are given or they
    ///   come from different sharings
    /// - `DuplicateShareIndex` / `InvalidShareFormat` for malformed bundles
    pub fn reconstruct(&self, bundles: &[ShareBundle]) -> Result<[u8; SECRET_LEN]> {
        let required = check_bundles(bundles, SchemeKind::Additive)?;
        if bundles.len() < required {
            warn!(
                needed = required,
                got = bundles.len(),
                "not enough additive bundles to reconstruct"
            );
            return Err(SharingError::InsufficientShares {
                needed: required,
                got: bundles.len(),
            });
        }
        if bundles.len() > required {
            return Err(SharingError::InconsistentShares(format!(
                "expected exactly {required} bundles, got {}",
                bundles.len()
            )));
        }
        if let Some(share) = bundles
            .iter()
            .flat_map(|bundle| bundle.shares.iter())
            .find(|share| share.value > u64::from(u16::MAX))
        {
            return Err(SharingError::InvalidShareFormat(format!(
                "additive share {} of party {} exceeds 16 bits",
                share.value, share.index
            )));
        }

        debug!(bundles = bundles.len(), "reconstructing additive secret");
        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut words: Vec<u64> = map_words(self.config.mode, |w| {
            bundles
                .iter()
                .fold(0u64, |acc, bundle| acc ^ bundle.shares[w].value)
        });

        let secret = join_words(&words);
        #[cfg(feature = "zeroize")]
        words.zeroize();
        secret
    }
}
