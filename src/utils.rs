use num_bigint::{BigUint, RandBigInt};
use num_traits::ToPrimitive;
use rand::Rng;

/// Selects `subset_size` distinct indices from `0..set_size` uniformly at random.
///
/// This is Knuth's selection sampling ([TAOCP] Algorithm 3.4.2S): a single pass
/// over the index range, keeping index `t` with probability
/// `(n - selected) / (N - t)`. The result is sorted in increasing order and is
/// produced with constant extra memory.
///
/// ```text
/// random_k_subset(5, 0) -> []
/// random_k_subset(5, 5) -> [0, 1, 2, 3, 4]
/// ```
///
/// # Panics
///
/// Panics if `subset_size > set_size`.
///
/// [TAOCP]: https://en.wikipedia.org/wiki/The_Art_of_Computer_Programming
pub fn random_k_subset<R: Rng + ?Sized>(rng: &mut R, set_size: usize, subset_size: usize) -> Vec<usize> {
    assert!(
        subset_size <= set_size,
        "Cannot select {} items from a set of {}",
        subset_size,
        set_size
    );

    let mut result = Vec::with_capacity(subset_size);
    for index in 0..set_size {
        if result.len() == subset_size {
            break;
        }
        let remaining = (set_size - index) as f64;
        let needed = (subset_size - result.len()) as f64;
        if remaining * rng.gen::<f64>() < needed {
            result.push(index);
        }
    }
    result
}

/// Exact factorial `n!`.
pub fn factorial(n: usize) -> BigUint {
    (1..=n as u64).fold(BigUint::from(1u32), |acc, x| acc * x)
}

/// Decomposes a probability into an exact dyadic fraction `p / 2^b`.
///
/// Every finite `f64` is a dyadic rational, so the decomposition is exact and
/// `b` is minimal. Returns `None` for values outside `[0, 1)` or non-finite input.
pub fn dyadic(x: f64) -> Option<(u64, u32)> {
    if !x.is_finite() || !(0.0..1.0).contains(&x) {
        return None;
    }
    let mut scaled = x;
    let mut bits = 0;
    while scaled.fract() != 0.0 {
        scaled *= 2.0;
        bits += 1;
    }
    Some((scaled as u64, bits))
}

/// Approximates `numerator / denominator` as `f64`.
///
/// Both operands are shifted down together first, so ratios of numbers far
/// beyond the `f64` range still come out finite.
pub fn ratio_to_f64(numerator: &BigUint, denominator: &BigUint) -> f64 {
    let bits = numerator.bits().max(denominator.bits());
    let shift = bits.saturating_sub(1000);
    let n = (numerator >> shift).to_f64().unwrap_or(f64::INFINITY);
    let d = (denominator >> shift).to_f64().unwrap_or(f64::INFINITY);
    n / d
}

/// Draws an index with probability proportional to its weight.
///
/// # Panics
///
/// Panics if all weights are zero.
pub fn draw_weighted<R: Rng + ?Sized>(rng: &mut R, weights: &[BigUint]) -> usize {
    let total: BigUint = weights.iter().sum();
    assert!(total.bits() > 0, "Cannot draw from an all-zero distribution");

    let mut target = rng.gen_biguint_below(&total);
    for (i, w) in weights.iter().enumerate() {
        if &target < w {
            return i;
        }
        target -= w;
    }
    unreachable!("target is below the total weight")
}
