//! Subset enumeration for the replicated scheme.

/// Binomial coefficient `C(n, k)`, or `None` if it overflows `usize`
///
/// # Example
/// ```
/// use keysplit::binomial;
///
/// assert_eq!(binomial(5, 2), Some(10));
/// assert_eq!(binomial(3, 4), Some(0));
/// ```
pub fn binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is divisible by (i + 1) at every step
        acc = acc.checked_mul((n - i) as u128)? / (i as u128 + 1);
    }
    usize::try_from(acc).ok()
}

/// Iterator over all size-`k` subsets of `0..n` in lexicographic order
///
/// Each subset is produced exactly once, so enumeration costs
/// `O(k · C(n, k))` rather than walking every permutation.
///
/// # Example
/// ```
/// use keysplit::Combinations;
///
/// let all: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
/// assert_eq!(all.len(), 6);
/// assert_eq!(all[0], vec![0, 1]);
/// assert_eq!(all[5], vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        let current = (k <= n).then(|| (0..k).collect());
        Self { n, current }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let k = current.len();

        let mut next = current.clone();
        // rightmost position that can still move right
        if let Some(i) = (0..k).rev().find(|&i| next[i] < self.n - k + i) {
            next[i] += 1;
            for j in i + 1..k {
                next[j] = next[j - 1] + 1;
            }
            self.current = Some(next);
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(0, 0, 1)]
    #[case(5, 0, 1)]
    #[case(5, 5, 1)]
    #[case(5, 2, 10)]
    #[case(9, 3, 84)]
    #[case(11, 5, 462)]
    #[case(2, 3, 0)]
    fn test_binomial(#[case] n: usize, #[case] k: usize, #[case] expected: usize) {
        assert_eq!(binomial(n, k), Some(expected));
    }

    #[test]
    fn test_binomial_overflow() {
        assert_eq!(binomial(200, 100), None);
        assert!(binomial(64, 32).is_some());
    }

    #[rstest]
    #[case(4, 2)]
    #[case(6, 3)]
    #[case(7, 1)]
    #[case(5, 5)]
    #[case(8, 0)]
    fn test_combinations_are_unique_and_complete(#[case] n: usize, #[case] k: usize) {
        let all: Vec<Vec<usize>> = Combinations::new(n, k).collect();
        assert_eq!(all.len(), binomial(n, k).unwrap());

        let unique: HashSet<&Vec<usize>> = all.iter().collect();
        assert_eq!(unique.len(), all.len());

        for subset in &all {
            assert_eq!(subset.len(), k);
            assert!(subset.windows(2).all(|w| w[0] < w[1]));
            assert!(subset.iter().all(|&i| i < n));
        }
    }

    #[test]
    fn test_lexicographic_order() {
        let all: Vec<Vec<usize>> = Combinations::new(4, 3).collect();
        assert_eq!(
            all,
            vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]]
        );
    }

    #[test]
    fn test_k_larger_than_n() {
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }
}
