//! Order-independent floating-point accumulation.

use smallvec::SmallVec;

/// Sum `terms` so that the result does not depend on their order.
///
/// Terms are sorted by [`f64::total_cmp`] and then accumulated with
/// Neumaier compensation. Any permutation of the same multiset of terms
/// produces a bit-identical result. A sum that overflows is reported as
/// infinite rather than NaN.
pub fn stable_sum(terms: impl IntoIterator<Item = f64>) -> f64 {
    let mut buf: SmallVec<[f64; 16]> = terms.into_iter().collect();
    buf.sort_unstable_by(f64::total_cmp);

    let mut sum = 0.0f64;
    let mut compensation = 0.0f64;
    for x in buf {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            compensation += (sum - t) + x;
        } else {
            compensation += (x - t) + sum;
        }
        sum = t;
    }
    if sum.is_finite() {
        sum + compensation
    } else {
        sum
    }
}
