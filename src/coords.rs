//! Conversions between continuous offsets and integer cell positions.

use crate::error::{Result, UgridError};

/// Largest magnitude at which every integer is exactly representable as `f64`.
pub const MAX_EXACT_COORD: f64 = 9_007_199_254_740_992.0;

/// Quotients within this many ulps of a whole number count as that whole
/// number, so `k * cell_size / cell_size` never rounds up to `k + 1`.
const SNAP_ULPS: f64 = 8.0;

/// Round a continuous offset, measured in units of `cell_size`, to a whole
/// number of cells.
///
/// Every value in `(k - 1, k]` cells maps to `k`, so `ceileyfloor(9.999, 10.0)`
/// and `ceileyfloor(10.0, 10.0)` are both `1` while `ceileyfloor(-0.001, 10.0)`
/// is `0`. The remainder left over by this rounding is always in
/// `(-cell_size, 0]`, which is what the sub-cell translation uses.
///
/// Non-finite input and a non-positive `cell_size` yield `0`.
pub fn ceileyfloor(offset: f64, cell_size: f64) -> i64 {
    if cell_size.is_nan() || cell_size <= 0.0 {
        return 0;
    }
    let cells = offset / cell_size;
    let nearest = cells.round();
    if (cells - nearest).abs() <= SNAP_ULPS * f64::EPSILON * nearest.abs().max(1.0) {
        return cells_to_i64(nearest);
    }
    cells_to_i64(cells.ceil())
}

/// Convert an already whole number of cells to `i64`, saturating at the exact range.
/// The `f64` → `i64` cast is safe: the value is clamped to ±2^53 first.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn cells_to_i64(cells: f64) -> i64 {
    if !cells.is_finite() {
        return 0;
    }
    cells.clamp(-MAX_EXACT_COORD, MAX_EXACT_COORD) as i64
}

/// `true` if `value` names a whole cell: finite, integral and exactly representable.
pub fn is_cell_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_COORD
}

/// Validate a `(row, col)` pair that arrived as floating point numbers.
///
/// # Errors
/// Returns [`UgridError::InvalidCoordinate`] if either value is not a whole cell.
pub fn integral_cell(row: f64, col: f64) -> Result<(i64, i64)> {
    if is_cell_integral(row) && is_cell_integral(col) {
        Ok((cells_to_i64(row), cells_to_i64(col)))
    } else {
        Err(UgridError::InvalidCoordinate { row, col })
    }
}

/// Whole-cell offset expressed in continuous units.
/// The `i64` → `f64` cast is exact within ±2^53, which every offset stays inside.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn cells_to_units(cells: i64, cell_size: f64) -> f64 {
    cells as f64 * cell_size
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, 0 ; "zero")]
    #[test_case(9.999, 1 ; "just below one cell")]
    #[test_case(10.0, 1 ; "exactly one cell")]
    #[test_case(-0.001, 0 ; "just below zero")]
    #[test_case(-10.0, -1 ; "exactly minus one cell")]
    #[test_case(10.001, 2 ; "just above one cell")]
    #[test_case(-10.001, -1 ; "just below minus one cell")]
    #[test_case(-25.0, -2 ; "two and a half cells back")]
    fn test_ceileyfloor_cell_size_ten(offset: f64, expected: i64) {
        assert_eq!(ceileyfloor(offset, 10.0), expected);
    }

    #[test]
    fn test_ceileyfloor_degenerate_input() {
        assert_eq!(ceileyfloor(f64::NAN, 10.0), 0);
        assert_eq!(ceileyfloor(f64::INFINITY, 10.0), 0);
        assert_eq!(ceileyfloor(5.0, 0.0), 0);
        assert_eq!(ceileyfloor(5.0, -1.0), 0);
    }

    #[test]
    fn test_ceileyfloor_buckets_are_one_cell_wide() {
        // (k-1, k] -> k on both sides of the origin.
        for k in -5_i64..=5 {
            let hi = k as f64 * 4.0;
            let lo = hi - 4.0;
            assert_eq!(ceileyfloor(hi, 4.0), k);
            assert_eq!(ceileyfloor(lo + 0.01, 4.0), k);
            assert_eq!(ceileyfloor(lo, 4.0), k - 1);
        }
    }

    #[test]
    fn test_ceileyfloor_whole_multiples_of_inexact_cells() {
        let w = 100.0 / 3.0;
        for k in [-1_000_000_i64, -12, -1, 1, 7, 12, 987_654_321] {
            assert_eq!(ceileyfloor(k as f64 * w, w), k, "k = {k}");
        }
    }

    #[test]
    fn test_integral_cell_accepts_whole_numbers() {
        assert_eq!(integral_cell(3.0, -7.0).unwrap(), (3, -7));
        assert_eq!(integral_cell(-0.0, 0.0).unwrap(), (0, 0));
    }

    #[test]
    fn test_integral_cell_rejects_fractions() {
        for (row, col) in [(1.5, 0.0), (0.0, -2.5), (f64::NAN, 0.0), (0.0, f64::INFINITY)] {
            match integral_cell(row, col) {
                Err(UgridError::InvalidCoordinate { .. }) => {}
                other => panic!("expected InvalidCoordinate for ({row}, {col}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_integral_cell_rejects_inexact_magnitudes() {
        assert!(integral_cell(1e300, 0.0).is_err());
    }
}
