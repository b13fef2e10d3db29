// Series module - order statistics, central moments and trend counts
//
// Every reducer works on an ordered, already-segmented series. Integer
// series (mode, key, time signature) are widened to f64 for moments and
// the median; min and max keep the series' own element type.
//
// Reducers that are undefined on an empty series return
// `StatsError::EmptySeries`. Float results that overflow to inf return
// `StatsError::NonFinite`; JSON has no inf, so they would otherwise be
// written as null. `trailing_window`, `decrease_count` and `contains_value`
// are total.

use crate::error::StatsError;

/// Arithmetic mean
pub fn mean<T: Copy + Into<f64>>(series: &[T]) -> Result<f64, StatsError> {
    if series.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    let sum: f64 = series.iter().map(|&x| x.into()).sum();
    finite(sum / series.len() as f64)
}

/// Population variance
///
/// Formula: var = (1 / N) × Σ(x_i - mean)²
///
/// Divides by N, not N - 1: the series is the whole population being
/// described, not a sample.
pub fn variance<T: Copy + Into<f64>>(series: &[T]) -> Result<f64, StatsError> {
    let mean = mean(series)?;
    let squared_deviations: f64 = series
        .iter()
        .map(|&x| {
            let deviation = x.into() - mean;
            deviation * deviation
        })
        .sum();
    finite(squared_deviations / series.len() as f64)
}

/// Median; the average of the two middle elements for even lengths
pub fn median<T: Copy + Into<f64>>(series: &[T]) -> Result<f64, StatsError> {
    if series.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    let mut sorted: Vec<f64> = series.iter().map(|&x| x.into()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        finite((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Smallest element
pub fn min<T: Copy + PartialOrd>(series: &[T]) -> Result<T, StatsError> {
    let (&first, rest) = series.split_first().ok_or(StatsError::EmptySeries)?;
    Ok(rest
        .iter()
        .fold(first, |acc, &x| if x < acc { x } else { acc }))
}

/// Largest element
pub fn max<T: Copy + PartialOrd>(series: &[T]) -> Result<T, StatsError> {
    let (&first, rest) = series.split_first().ok_or(StatsError::EmptySeries)?;
    Ok(rest
        .iter()
        .fold(first, |acc, &x| if x > acc { x } else { acc }))
}

/// Sum of squares, Σ x_i²
pub fn sum_of_squares<T: Copy + Into<f64>>(series: &[T]) -> Result<f64, StatsError> {
    if series.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    finite(
        series
            .iter()
            .map(|&x| {
                let x: f64 = x.into();
                x * x
            })
            .sum(),
    )
}

fn finite(value: f64) -> Result<f64, StatsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatsError::NonFinite)
    }
}

/// Last `min(k, len)` elements in original order
///
/// Series shorter than `k` come back whole, so "last five" statistics fall
/// back to the full series on short tracks.
pub fn trailing_window<T>(series: &[T], k: usize) -> &[T] {
    &series[series.len().saturating_sub(k)..]
}

/// Number of adjacent pairs where the series strictly decreases
///
/// Equal and increasing pairs are not counted. Series of length 0 or 1
/// have no pairs and yield 0.
pub fn decrease_count<T: PartialOrd>(series: &[T]) -> usize {
    series.windows(2).filter(|pair| pair[0] > pair[1]).count()
}

/// Membership test
pub fn contains_value<T: PartialEq>(series: &[T], value: T) -> bool {
    series.iter().any(|x| *x == value)
}
