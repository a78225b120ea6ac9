use itertools::Itertools;
use num_traits::Float;
use std::cmp::Ordering;

/// Mean of the finite values, `None` if there are none.
pub fn finite_mean<I, N>(iter: I) -> Option<N>
where
    I: IntoIterator<Item = N>,
    N: Float,
{
    let (sum, count) = iter
        .into_iter()
        .filter(|x| x.is_finite())
        .fold((N::zero(), N::zero()), |(sum, count), x| {
            (sum + x, count + N::one())
        });
    if count > N::zero() {
        Some(sum / count)
    } else {
        None
    }
}

/// Median of the finite values, `None` if there are none.
pub fn finite_median<I, N>(iter: I) -> Option<N>
where
    I: IntoIterator<Item = N>,
    N: Float,
{
    let sorted = iter
        .into_iter()
        .filter(|x| x.is_finite())
        .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .collect_vec();
    let len = sorted.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    if len % 2 == 1 {
        Some(sorted[mid])
    } else {
        let two = N::one() + N::one();
        Some((sorted[mid - 1] + sorted[mid]) / two)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_skips_nan() {
        assert_eq!(finite_mean(vec![3.0, f64::NAN, 5.0]), Some(4.0));
        assert_eq!(finite_mean(Vec::<f64>::new()), None);
        assert_eq!(finite_mean(vec![f64::NAN, f64::INFINITY]), None);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(finite_median(vec![9.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(finite_median(vec![4.0, 1.0, f64::NAN, 2.0, 8.0]), Some(3.0));
        assert_eq!(finite_median(vec![f64::NAN]), None);
    }
}
