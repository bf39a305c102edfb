use crate::config::Config;
use crate::error::{Result, SharingError};
use crate::field::PrimeField;
use crate::random::{CsprngSource, RandomnessSource};
use crate::share::{SchemeKind, Share, ShareBundle, check_bundles};
use crate::word::{SECRET_LEN, WORD_COUNT, join_words, map_words, split_secret};
use tracing::{debug, warn};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Shamir's threshold scheme over a prime field, applied word by word
///
/// The secret is cut into eight 16-bit words and every word is hidden as the
/// constant term of its own random polynomial. Each party receives the
/// polynomial values at its index for all eight words.
///
/// # Threshold convention
///
/// The `t` passed to [`share`](Self::share) is the **degree** of the
/// polynomial, so reconstruction needs `t + 1` bundles. Each bundle records
/// that requirement in [`ShareBundle::required`].
///
/// # Example
/// ```
/// use keysplit::ShamirScheme;
///
/// let mut scheme = ShamirScheme::new().unwrap();
/// let secret = *b"sixteen byte key";
///
/// // degree 2: any 3 of the 5 bundles recover the key
/// let bundles = scheme.share(&secret, 2, 5).unwrap();
/// let recovered = scheme.reconstruct(&bundles[1..4]).unwrap();
/// assert_eq!(recovered, secret);
/// ```
#[derive(Debug)]
pub struct ShamirScheme<S = CsprngSource> {
    config: Config,
    field: PrimeField,
    source: S,
}

impl ShamirScheme<CsprngSource> {
    /// Creates a scheme with the default configuration and an OS-seeded source
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Creates a scheme with a custom configuration and an OS-seeded source
    pub fn with_config(config: Config) -> Result<Self> {
        let source = CsprngSource::from_entropy()?;
        ShamirScheme::with_source(config, source)
    }
}

impl<S: RandomnessSource> ShamirScheme<S> {
    /// Creates a scheme drawing coefficients from `source`
    ///
    /// # Errors
    /// Returns `SharingError::InvalidConfig` if the configuration does not
    /// validate, e.g. the modulus is not a prime above 65535.
    pub fn with_source(config: Config, source: S) -> Result<Self> {
        config.validate()?;
        let field = PrimeField::new(config.modulus)?;
        Ok(Self {
            config,
            field,
            source,
        })
    }

    /// Splits a 16-byte secret into `n` bundles using polynomials of degree `t`
    ///
    /// # Errors
    /// - `InvalidSecretLength` if `secret` is not 16 bytes
    /// - `InvalidThreshold` if `t` is 0
    /// - `ThresholdTooLarge` if `n <= t` (the shares could never be recombined)
    /// - `InvalidPartyCount` if `n` does not fit below the modulus
    pub fn share(&mut self, secret: &[u8], t: usize, n: usize) -> Result<Vec<ShareBundle>> {
        if t == 0 {
            return Err(SharingError::InvalidThreshold(t));
        }
        if n <= t {
            return Err(SharingError::ThresholdTooLarge {
                threshold: t,
                parties: n,
            });
        }
        if n as u64 >= self.field.modulus() || u32::try_from(n).is_err() {
            return Err(SharingError::InvalidPartyCount(n));
        }

        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut words = split_secret(secret)?;
        debug!(degree = t, parties = n, mode = ?self.config.mode, "splitting secret with Shamir");

        // Draw every coefficient up front so the evaluation can run in parallel
        let bound = self.config.coefficient_bound();
        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut coefficients: Vec<Vec<u64>> = (0..WORD_COUNT)
            .map(|_| (0..t).map(|_| self.source.below(bound)).collect())
            .collect();

        let field = self.field;
        let evaluations: Vec<Vec<u64>> = map_words(self.config.mode, |w| {
            let constant = u64::from(words[w]);
            let coeffs = &coefficients[w];
            (1..=n as u64)
                .map(|x| {
                    // f(x) = constant + c_1 x + ... + c_t x^t, by Horner's method
                    let acc = coeffs
                        .iter()
                        .rev()
                        .fold(0u64, |acc, &c| field.add(field.mul(acc, x), c));
                    field.add(field.mul(acc, x), constant)
                })
                .collect()
        });

        #[cfg(feature = "zeroize")]
        {
            coefficients.zeroize();
            words.zeroize();
        }

        let required = (t + 1) as u32;
        let bundles = (0..n)
            .map(|party| ShareBundle {
                kind: SchemeKind::Shamir,
                required,
                shares: std::array::from_fn(|w| Share {
                    index: (party + 1) as u32,
                    value: evaluations[w][party],
                }),
            })
            .collect();

        Ok(bundles)
    }
}

impl<S> ShamirScheme<S> {
    /// The configuration this scheme was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Recovers the secret from at least `t + 1` bundles by Lagrange interpolation at 0
    ///
    /// Any subset of sufficient size works, in any order. Extra bundles are
    /// used as well; they do not change the result.
    ///
    /// # Errors
    /// - `NoShares` if `bundles` is empty
    /// - `InsufficientShares` if fewer than `t + 1` bundles are given
    /// - `DuplicateShareIndex` if two bundles claim the same index
    /// - `NoInverse` if two indices coincide modulo the prime
    /// - `InvalidShareFormat` / `InconsistentShares` / `WordOutOfRange` for
    ///   corrupted or mismatched bundles
    pub fn reconstruct(&self, bundles: &[ShareBundle]) -> Result<[u8; SECRET_LEN]> {
        let required = check_bundles(bundles, SchemeKind::Shamir)?;
        if bundles.len() < required {
            warn!(
                needed = required,
                got = bundles.len(),
                "not enough Shamir bundles to reconstruct"
            );
            return Err(SharingError::InsufficientShares {
                needed: required,
                got: bundles.len(),
            });
        }

        let modulus = self.field.modulus();
        if let Some(share) = bundles
            .iter()
            .flat_map(|bundle| bundle.shares.iter())
            .find(|share| share.value >= modulus)
        {
            return Err(SharingError::InvalidShareFormat(format!(
                "share value {} of party {} is outside the field",
                share.value, share.index
            )));
        }

        debug!(bundles = bundles.len(), "reconstructing Shamir secret");
        let deltas = self.lagrange_coefficients(bundles)?;

        let field = self.field;
        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut words: Vec<u64> = map_words(self.config.mode, |w| {
            bundles
                .iter()
                .zip(&deltas)
                .fold(0u64, |acc, (bundle, &delta)| {
                    field.add(acc, field.mul(delta, bundle.shares[w].value))
                })
        });

        let secret = join_words(&words);
        #[cfg(feature = "zeroize")]
        words.zeroize();
        secret
    }

    /// Lagrange basis values at 0: `Δ_i = Π_{j≠i} (−x_j) / (x_i − x_j)`
    ///
    /// The x-coordinates are the same for all eight words, so the
    /// coefficients are computed once per reconstruction.
    fn lagrange_coefficients(&self, bundles: &[ShareBundle]) -> Result<Vec<u64>> {
        let field = self.field;
        let xs: Vec<u64> = bundles.iter().map(|b| u64::from(b.index())).collect();

        xs.iter()
            .enumerate()
            .map(|(i, &x_i)| {
                let mut numerator = 1u64;
                let mut denominator = 1u64;
                for (j, &x_j) in xs.iter().enumerate() {
                    if i != j {
                        numerator = field.mul(numerator, field.neg(x_j));
                        denominator = field.mul(denominator, field.sub(x_i, x_j));
                    }
                }
                let inverse = field.inverse(denominator)?;
                Ok(field.mul(numerator, inverse))
            })
            .collect()
    }
}
