// Timbre module - column-major transpose of segment timbre vectors
//
// Each segment carries 12 timbre coefficients. Feature extraction wants one
// series per basis function instead, so the N x 12 segment matrix is turned
// into 12 series of length N, keeping segment order inside every series.

use crate::error::TimbreError;

/// Number of timbre basis functions per segment
pub const TIMBRE_DIMENSIONS: usize = 12;

/// Per-basis series, indexed 0..12 (basis 1 is index 0)
pub type TimbreBases = [Vec<f64>; TIMBRE_DIMENSIONS];

/// Transpose segment timbre vectors into one series per basis
///
/// # Arguments
/// * `timbre` - One vector per segment, in segment order
///
/// # Returns
/// 12 series, each holding one coordinate of every segment
///
/// # Errors
/// `TimbreError::Malformed` for the first vector whose length is not 12
pub fn transpose(timbre: &[Vec<f64>]) -> Result<TimbreBases, TimbreError> {
    let mut bases: TimbreBases =
        std::array::from_fn(|_| Vec::with_capacity(timbre.len()));

    for (segment_index, vector) in timbre.iter().enumerate() {
        if vector.len() != TIMBRE_DIMENSIONS {
            return Err(TimbreError::Malformed {
                segment_index,
                len: vector.len(),
            });
        }
        for (basis, &coefficient) in bases.iter_mut().zip(vector) {
            basis.push(coefficient);
        }
    }

    Ok(bases)
}

/// Zip per-basis series back into one vector per segment
///
/// Inverse of [`transpose`]. Series of unequal length are truncated to the
/// shortest.
pub fn zip(bases: &TimbreBases) -> Vec<Vec<f64>> {
    let segments = bases.iter().map(Vec::len).min().unwrap_or(0);
    (0..segments)
        .map(|segment| bases.iter().map(|basis| basis[segment]).collect())
        .collect()
}
