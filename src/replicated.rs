//! Replicated (t, n) secret sharing.
//!
//! Every word is XOR-split into one atomic share per size-`(n - t + 1)`
//! subset of parties, and each atomic share is handed to exactly the parties
//! in its subset. Put differently, atomic share `s` is withheld from one
//! particular group of `t - 1` parties. Any `t` parties therefore hold every
//! atomic share between them, while any `t - 1` parties miss the one share
//! that was withheld from exactly them.

use crate::combinatorics::{Combinations, binomial};
use crate::config::Config;
use crate::error::{Result, SharingError};
use crate::random::{CsprngSource, RandomnessSource};
use crate::word::{SECRET_LEN, WORD_COUNT, join_words, map_words, split_secret};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One XOR fragment of a word
///
/// `slot` is the rank of the holder subset in lexicographic order; every
/// copy of the same fragment carries the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "zeroize", derive(Zeroize))]
pub struct AtomicShare {
    pub slot: u32,
    pub value: u32,
}

/// The atomic shares one party holds for all eight words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct ReplicatedShares {
    /// Party index in `1..=parties`
    pub index: u32,
    /// Number of parties needed to reconstruct
    pub threshold: u32,
    /// Total number of parties
    pub parties: u32,
    /// Atomic shares held for each word
    pub words: [Vec<AtomicShare>; WORD_COUNT],
}

impl ReplicatedShares {
    /// Slots of the atomic shares held for `word`
    pub fn slots(&self, word: usize) -> impl Iterator<Item = u32> + '_ {
        self.words
            .get(word)
            .into_iter()
            .flat_map(|shares| shares.iter().map(|share| share.slot))
    }
}

/// Number of atomic shares each word is split into for a `(t, n)` sharing
///
/// This is `C(n, t - 1)`, one per group of `t - 1` parties the share is
/// withheld from. Returns `None` for an invalid pair or on overflow.
///
/// # Example
/// ```
/// use keysplit::atomic_share_count;
///
/// assert_eq!(atomic_share_count(2, 3), Some(3));
/// assert_eq!(atomic_share_count(4, 9), Some(84));
/// assert_eq!(atomic_share_count(4, 3), None);
/// ```
pub fn atomic_share_count(t: usize, n: usize) -> Option<usize> {
    if t == 0 || t > n {
        return None;
    }
    binomial(n, t - 1)
}

/// Replicated t-out-of-n sharing of a 128-bit secret
///
/// # Example
/// ```
/// use keysplit::ReplicatedScheme;
///
/// let mut scheme = ReplicatedScheme::new().unwrap();
/// let secret = *b"sixteen byte key";
///
/// let parties = scheme.share(&secret, 3, 5).unwrap();
/// assert_eq!(scheme.reconstruct(&parties[1..4]).unwrap(), secret);
/// assert!(scheme.reconstruct(&parties[..2]).is_err());
/// ```
#[derive(Debug)]
pub struct ReplicatedScheme<S = CsprngSource> {
    config: Config,
    source: S,
}

impl ReplicatedScheme<CsprngSource> {
    /// Creates a scheme with the default configuration and an OS-seeded source
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Creates a scheme with a custom configuration and an OS-seeded source
    pub fn with_config(config: Config) -> Result<Self> {
        let source = CsprngSource::from_entropy()?;
        ReplicatedScheme::with_source(config, source)
    }
}

impl<S: RandomnessSource> ReplicatedScheme<S> {
    /// Creates a scheme drawing atomic share values from `source`
    pub fn with_source(config: Config, source: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    /// Splits a 16-byte secret so that any `t` of the `n` parties can reconstruct it
    ///
    /// # Errors
    /// - `InvalidThreshold` if `t` is 0
    /// - `ThresholdTooLarge` if `t > n`
    /// - `InvalidPartyCount` if `n` does not fit in a `u32`
    /// - `TooManyAtomicShares` if `C(n, t - 1)` exceeds the configured limit
    /// - `TooManyHeldShares` if the `C(n, t - 1) * (n - t + 1)` copies per
    ///   word exceed the configured limit
    /// - `InvalidSecretLength` if `secret` is not 16 bytes
    pub fn share(&mut self, secret: &[u8], t: usize, n: usize) -> Result<Vec<ReplicatedShares>> {
        let slots = self.check_parameters(t, n)?;
        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut words = split_secret(secret)?;
        debug!(
            threshold = t,
            parties = n,
            atomic_shares = slots,
            "splitting secret with replicated sharing"
        );

        let holders: Vec<Vec<usize>> = Combinations::new(n, n - t + 1).collect();
        debug_assert_eq!(holders.len(), slots);

        // k - 1 random fragments per word, then the fragment that closes the XOR
        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut values: Vec<Vec<u32>> = words
            .iter()
            .map(|&word| {
                let mut fragments: Vec<u32> =
                    (0..slots - 1).map(|_| self.source.next_u32()).collect();
                let last = fragments
                    .iter()
                    .fold(u32::from(word), |acc, &fragment| acc ^ fragment);
                fragments.push(last);
                fragments
            })
            .collect();

        let mut held: Vec<Vec<Vec<AtomicShare>>> = map_words(self.config.mode, |w| {
            let mut per_party = vec![Vec::new(); n];
            for (slot, members) in holders.iter().enumerate() {
                for &party in members {
                    per_party[party].push(AtomicShare {
                        slot: slot as u32,
                        value: values[w][slot],
                    });
                }
            }
            per_party
        });

        #[cfg(feature = "zeroize")]
        {
            values.zeroize();
            words.zeroize();
        }

        let mut parties = Vec::with_capacity(n);
        for party in 0..n {
            parties.push(ReplicatedShares {
                index: (party + 1) as u32,
                threshold: t as u32,
                parties: n as u32,
                words: std::array::from_fn(|w| std::mem::take(&mut held[w][party])),
            });
        }
        Ok(parties)
    }

    /// Number of atomic shares per word for a `(t, n)` sharing, after validation
    fn check_parameters(&self, t: usize, n: usize) -> Result<usize> {
        if t == 0 {
            return Err(SharingError::InvalidThreshold(t));
        }
        if t > n {
            return Err(SharingError::ThresholdTooLarge {
                threshold: t,
                parties: n,
            });
        }
        if u32::try_from(n).is_err() {
            return Err(SharingError::InvalidPartyCount(n));
        }

        let limit = self.config.max_atomic_shares.min(u32::MAX as usize);
        let slots = match binomial(n, t - 1) {
            Some(needed) if needed <= limit => needed,
            needed => {
                return Err(SharingError::TooManyAtomicShares {
                    needed: needed.unwrap_or(usize::MAX),
                    limit,
                });
            }
        };

        // every slot is copied to n - t + 1 parties
        let limit = self.config.max_held_shares;
        match slots.checked_mul(n - t + 1) {
            Some(copies) if copies <= limit => Ok(slots),
            copies => Err(SharingError::TooManyHeldShares {
                needed: copies.unwrap_or(usize::MAX),
                limit,
            }),
        }
    }
}

impl<S> ReplicatedScheme<S> {
    /// The configuration this scheme was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// XORs the distinct atomic shares held by at least `t` parties back into the secret
    ///
    /// Copies of the same atomic share are recognised by their slot, not by
    /// value, so two different fragments that happen to be equal are both
    /// counted.
    ///
    /// # Errors
    /// - `NoShares` if `parties` is empty
    /// - `InsufficientShares` if fewer than `t` distinct parties are given
    /// - `InconsistentShares` if parties disagree on `(t, n)` or on the
    ///   value of an atomic share
    /// - `DuplicateShareIndex` / `InvalidShareFormat` / `WordOutOfRange` for
    ///   malformed input
    pub fn reconstruct(&self, parties: &[ReplicatedShares]) -> Result<[u8; SECRET_LEN]> {
        let first = parties.first().ok_or(SharingError::NoShares)?;
        let (t, n) = (first.threshold as usize, first.parties as usize);
        let slots = atomic_share_count(t, n).ok_or_else(|| {
            SharingError::InvalidShareFormat(format!("invalid access structure ({t}, {n})"))
        })?;

        let mut seen = HashSet::with_capacity(parties.len());
        for party in parties {
            if party.threshold as usize != t || party.parties as usize != n {
                return Err(SharingError::InconsistentShares(format!(
                    "party {} was shared as ({}, {}), expected ({t}, {n})",
                    party.index, party.threshold, party.parties
                )));
            }
            if party.index == 0 || party.index as usize > n {
                return Err(SharingError::InvalidShareFormat(format!(
                    "party index {} outside 1..={n}",
                    party.index
                )));
            }
            if !seen.insert(party.index) {
                return Err(SharingError::DuplicateShareIndex(party.index));
            }
        }

        if parties.len() < t {
            warn!(
                needed = t,
                got = parties.len(),
                "not enough parties to reconstruct replicated secret"
            );
            return Err(SharingError::InsufficientShares {
                needed: t,
                got: parties.len(),
            });
        }

        debug!(parties = parties.len(), "reconstructing replicated secret");
        let words: Vec<Result<u64>> = map_words(self.config.mode, |w| {
            let mut distinct: BTreeMap<u32, u32> = BTreeMap::new();
            for share in parties.iter().flat_map(|party| party.words[w].iter()) {
                if share.slot as usize >= slots {
                    return Err(SharingError::InvalidShareFormat(format!(
                        "atomic share slot {} out of range",
                        share.slot
                    )));
                }
                match distinct.insert(share.slot, share.value) {
                    Some(previous) if previous != share.value => {
                        return Err(SharingError::InconsistentShares(format!(
                            "copies of atomic share {} disagree",
                            share.slot
                        )));
                    }
                    _ => {}
                }
            }
            if distinct.len() != slots {
                return Err(SharingError::InvalidShareFormat(format!(
                    "word {w} is missing {} of {slots} atomic shares",
                    slots - distinct.len()
                )));
            }
            Ok(distinct.values().fold(0u32, |acc, &value| acc ^ value) as u64)
        });

        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut words = words.into_iter().collect::<Result<Vec<u64>>>()?;
        let secret = join_words(&words);
        #[cfg(feature = "zeroize")]
        words.zeroize();
        secret
    }
}
