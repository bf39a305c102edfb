use crate::error::{Result, SharingError};
use crate::field::PrimeField;

/// Prime used for Shamir sharing when none is configured
pub const DEFAULT_MODULUS: u64 = 15_307_073;

/// Default cap on atomic shares generated per word by the replicated scheme
pub const DEFAULT_MAX_ATOMIC_SHARES: usize = 1 << 16;

/// Default cap on atomic share copies handed out per word by the replicated scheme
pub const DEFAULT_MAX_HELD_SHARES: usize = 1 << 20;

/// Processing mode for the per-word work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Process words one after another
    #[default]
    Sequential,
    /// Process words on the rayon thread pool
    Parallel,
}

/// Range Shamir polynomial coefficients are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoefficientRange {
    /// Uniform over the whole field `[0, modulus)`
    #[default]
    Full,
    /// Uniform over `[0, bound)`
    Bounded(u64),
}

/// Configuration shared by all schemes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prime modulus for Shamir arithmetic
    pub modulus: u64,
    /// Processing mode
    pub mode: SplitMode,
    /// Range of Shamir coefficients
    pub coefficients: CoefficientRange,
    /// Upper bound on `C(n, t-1)` for the replicated scheme
    pub max_atomic_shares: usize,
    /// Upper bound on `C(n, t-1) * (n - t + 1)`, the copies materialised per word
    pub max_held_shares: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modulus: DEFAULT_MODULUS,
            mode: SplitMode::default(),
            coefficients: CoefficientRange::default(),
            max_atomic_shares: DEFAULT_MAX_ATOMIC_SHARES,
            max_held_shares: DEFAULT_MAX_HELD_SHARES,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Shamir modulus
    pub fn with_modulus(mut self, modulus: u64) -> Result<Self> {
        PrimeField::new(modulus)?;
        self.modulus = modulus;
        Ok(self)
    }

    /// Sets the processing mode
    pub fn with_mode(mut self, mode: SplitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Draws Shamir coefficients from `[0, bound)` instead of the full field
    pub fn with_coefficient_bound(mut self, bound: u64) -> Result<Self> {
        if bound == 0 {
            return Err(SharingError::InvalidConfig(
                "Coefficient bound cannot be zero".into(),
            ));
        }
        self.coefficients = CoefficientRange::Bounded(bound);
        Ok(self)
    }

    /// Sets the atomic share limit for the replicated scheme
    pub fn with_max_atomic_shares(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(SharingError::InvalidConfig(
                "Atomic share limit cannot be zero".into(),
            ));
        }
        self.max_atomic_shares = limit;
        Ok(self)
    }

    /// Sets the cap on atomic share copies held across all parties per word
    pub fn with_max_held_shares(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(SharingError::InvalidConfig(
                "Held share limit cannot be zero".into(),
            ));
        }
        self.max_held_shares = limit;
        Ok(self)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        PrimeField::new(self.modulus)?;
        match self.coefficients {
            CoefficientRange::Bounded(0) => {
                return Err(SharingError::InvalidConfig(
                    "Coefficient bound cannot be zero".into(),
                ));
            }
            CoefficientRange::Bounded(bound) if bound > self.modulus => {
                return Err(SharingError::InvalidConfig(format!(
                    "Coefficient bound {bound} exceeds modulus {}",
                    self.modulus
                )));
            }
            _ => {}
        }
        if self.max_atomic_shares == 0 {
            return Err(SharingError::InvalidConfig(
                "Atomic share limit cannot be zero".into(),
            ));
        }
        if self.max_held_shares == 0 {
            return Err(SharingError::InvalidConfig(
                "Held share limit cannot be zero".into(),
            ));
        }
        Ok(())
    }

    /// Exclusive upper bound for a sampled coefficient
    pub(crate) fn coefficient_bound(&self) -> u64 {
        match self.coefficients {
            CoefficientRange::Full => self.modulus,
            CoefficientRange::Bounded(bound) => bound,
        }
    }
}
