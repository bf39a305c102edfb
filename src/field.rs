use crate::error::{Result, SharingError};

/// Smallest admissible modulus: every 16-bit word must be a field element
const MIN_MODULUS: u64 = 1 << 16;

/// Exclusive upper bound on the modulus so products of two elements fit in `u64`
const MAX_MODULUS: u64 = 1 << 32;

/// Arithmetic modulo a prime `p` with `2^16 < p < 2^32`
///
/// Elements are plain `u64` values in `[0, p)`. Because both operands of a
/// multiplication are below `2^32`, the product fits in a `u64` before
/// reduction.
///
/// # Example
/// ```
/// use keysplit::PrimeField;
///
/// let field = PrimeField::new(65537).unwrap();
/// let inv = field.inverse(3).unwrap();
/// assert_eq!(field.mul(3, inv), 1);
/// assert_eq!(field.reduce(-1), 65536);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeField {
    modulus: u64,
}

impl PrimeField {
    /// Creates a field, checking that `modulus` is a prime in `(2^16, 2^32)`
    pub fn new(modulus: u64) -> Result<Self> {
        if modulus < MIN_MODULUS || modulus >= MAX_MODULUS {
            return Err(SharingError::InvalidConfig(format!(
                "Modulus {modulus} must lie strictly between 65535 and 2^32"
            )));
        }
        if !is_prime(modulus) {
            return Err(SharingError::InvalidConfig(format!(
                "Modulus {modulus} is not prime"
            )));
        }
        Ok(Self { modulus })
    }

    /// The prime modulus
    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Returns `v mod p` in `[0, p)`, also for negative `v`
    #[inline]
    pub fn reduce(&self, v: i64) -> u64 {
        mod_reduce(v, self.modulus)
    }

    #[inline]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        (a % self.modulus + b % self.modulus) % self.modulus
    }

    #[inline]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        (a % self.modulus + self.modulus - b % self.modulus) % self.modulus
    }

    #[inline]
    pub fn neg(&self, a: u64) -> u64 {
        (self.modulus - a % self.modulus) % self.modulus
    }

    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        (a % self.modulus) * (b % self.modulus) % self.modulus
    }

    /// Computes `base^exp mod p`
    pub fn pow(&self, base: u64, exp: u64) -> u64 {
        mod_pow(base, exp, self.modulus)
    }

    /// Multiplicative inverse of `a`, or `NoInverse` when `gcd(a, p) != 1`
    pub fn inverse(&self, a: u64) -> Result<u64> {
        mod_inverse(a, self.modulus)
    }
}

/// Reduces a signed value into `[0, modulus)`
///
/// A zero modulus has no residues and yields 0.
///
/// # Example
/// ```
/// use keysplit::mod_reduce;
///
/// assert_eq!(mod_reduce(-1, 7), 6);
/// assert_eq!(mod_reduce(15, 7), 1);
/// ```
pub fn mod_reduce(v: i64, modulus: u64) -> u64 {
    if modulus == 0 {
        return 0;
    }
    i128::from(v).rem_euclid(i128::from(modulus)) as u64
}

/// Computes `base^exp mod modulus` using square-and-multiply
///
/// Intermediate products are taken in `u128`, so any `u64` modulus works.
/// A zero modulus yields 0.
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 0 {
        return 0;
    }
    let m = u128::from(modulus);
    let mut result = 1 % m;
    let mut base = u128::from(base) % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exp >>= 1;
    }
    result as u64
}

/// Multiplicative inverse of `a` modulo `modulus` via the extended Euclidean algorithm
///
/// Fails with [`SharingError::NoInverse`] when `gcd(a, modulus) != 1`, which
/// includes `a ≡ 0` and moduli below 2.
pub fn mod_inverse(a: u64, modulus: u64) -> Result<u64> {
    let no_inverse = SharingError::NoInverse { value: a, modulus };
    if modulus < 2 {
        return Err(no_inverse);
    }

    let m = i128::from(modulus);
    let (mut r, mut next_r) = (m, i128::from(a) % m);
    let (mut t, mut next_t) = (0i128, 1i128);
    while next_r != 0 {
        let q = r / next_r;
        (t, next_t) = (next_t, t - q * next_t);
        (r, next_r) = (next_r, r - q * next_r);
    }

    if r != 1 {
        return Err(no_inverse);
    }
    Ok(t.rem_euclid(m) as u64)
}

/// Deterministic trial division, adequate for moduli below `2^32`
fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}
