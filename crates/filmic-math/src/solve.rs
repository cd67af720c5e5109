//! Dense linear solve for small square systems.
//!
//! Curve fitting needs exact 4x4 and 5x5 solves once per parameter change,
//! so this favours precision over speed: everything runs in `f64` with
//! partial pivoting.
//!
//! # Example
//!
//! ```rust
//! use filmic_math::gauss_solve;
//!
//! // 2x + y = 3, x + 3y = 5
//! let x = gauss_solve([[2.0, 1.0], [1.0, 3.0]], [3.0, 5.0]).unwrap();
//! assert!((x[0] - 0.8).abs() < 1e-12);
//! assert!((x[1] - 1.4).abs() < 1e-12);
//! ```

/// Pivots smaller than this are treated as zero.
pub const SINGULAR_EPSILON: f64 = 1e-15;

/// Solves `a * x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when the matrix is singular (or too close to it) or the
/// result is not finite.
pub fn gauss_solve<const N: usize>(mut a: [[f64; N]; N], mut b: [f64; N]) -> Option<[f64; N]> {
    for col in 0..N {
        // pick the row with the largest pivot
        let mut pivot = col;
        for row in col + 1..N {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < SINGULAR_EPSILON {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..N {
            let f = a[row][col] / a[col][col];
            if f == 0.0 {
                continue;
            }
            for k in col..N {
                a[row][k] -= f * a[col][k];
            }
            b[row] -= f * b[col];
        }
    }

    let mut x = [0.0; N];
    for row in (0..N).rev() {
        let mut acc = b[row];
        for k in row + 1..N {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let a = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_eq!(gauss_solve(a, [1.0, 2.0, 3.0]), Some([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_needs_pivoting() {
        // zero on the leading diagonal
        let a = [[0.0, 1.0], [1.0, 0.0]];
        assert_eq!(gauss_solve(a, [2.0, 3.0]), Some([3.0, 2.0]));
    }

    #[test]
    fn test_polynomial_fit() {
        // y = 1 + 2t + 3t^2 through t = 0, 1, 2 (descending powers)
        let a = [[0.0, 0.0, 1.0], [1.0, 1.0, 1.0], [4.0, 2.0, 1.0]];
        let x = gauss_solve(a, [1.0, 6.0, 17.0]).unwrap();
        assert!((x[0] - 3.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular() {
        let a = [[1.0, 2.0], [2.0, 4.0]];
        assert_eq!(gauss_solve(a, [1.0, 2.0]), None);
    }
}
