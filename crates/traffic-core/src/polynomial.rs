//! Dense real polynomials and root isolation on an interval.
//!
//! Narrow phase reduces every segment pair to a polynomial in one
//! variable and asks where it first becomes negative. Roots are isolated
//! by splitting the interval at the roots of the derivative, which leaves
//! pieces on which the polynomial is monotonic, and then bisecting the
//! pieces that change sign. Nothing is sampled at a fixed step, so a
//! short dip below zero between two samples cannot be skipped.

use std::ops::{Add, Mul, Sub};

/// Bisection never needs more than this for `f64` inputs.
const MAX_BISECTION_STEPS: usize = 128;

/// A polynomial with coefficients stored in ascending powers.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Build from ascending coefficients; `[c0, c1, c2]` is `c0 + c1 x + c2 x^2`.
    pub fn new(coeffs: Vec<f64>) -> Self {
        let mut poly = Self { coeffs };
        poly.trim();
        poly
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Degree of the polynomial, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, c)| c * power as f64)
            .collect();
        Self::new(coeffs)
    }

    /// Substitute `scale * x + offset` for `x`.
    pub fn compose_affine(&self, scale: f64, offset: f64) -> Self {
        let inner = Self::new(vec![offset, scale]);
        self.coeffs.iter().rev().fold(Self::zero(), |acc, c| {
            &(&acc * &inner) + &Self::constant(*c)
        })
    }

    /// All roots in `[lo, hi]`, ascending, each located to within `tolerance`.
    ///
    /// Roots of even multiplicity, where the polynomial touches zero without
    /// changing sign, are only reported when the touching point evaluates to
    /// exactly zero. The zero polynomial reports no roots.
    pub fn roots_in(&self, lo: f64, hi: f64, tolerance: f64) -> Vec<f64> {
        if lo > hi {
            return Vec::new();
        }
        match self.degree() {
            None | Some(0) => Vec::new(),
            Some(1) => {
                let root = -self.coeffs[0] / self.coeffs[1];
                if (lo..=hi).contains(&root) {
                    vec![root]
                } else {
                    Vec::new()
                }
            }
            Some(_) => {
                let bounds = self.monotonic_bounds(lo, hi, tolerance);
                let mut roots: Vec<f64> = Vec::new();
                for piece in bounds.windows(2) {
                    let (a, b) = (piece[0], piece[1]);
                    let (fa, fb) = (self.eval(a), self.eval(b));
                    if fa == 0.0 {
                        roots.push(a);
                    } else if fb != 0.0 && (fa < 0.0) != (fb < 0.0) {
                        let (left, right) = self.bisect(a, b, tolerance);
                        roots.push(0.5 * (left + right));
                    }
                }
                if self.eval(hi) == 0.0 {
                    roots.push(hi);
                }
                roots.dedup_by(|next, prev| (*next - *prev).abs() <= tolerance);
                roots
            }
        }
    }

    /// Earliest `x` in `[lo, hi]` where the polynomial is strictly negative.
    ///
    /// The returned point is within `tolerance` after the true sign change
    /// and is itself negative, so callers never get a point that is still
    /// outside the violation.
    pub fn first_negative_in(&self, lo: f64, hi: f64, tolerance: f64) -> Option<f64> {
        if lo > hi {
            return None;
        }
        if self.eval(lo) < 0.0 {
            return Some(lo);
        }
        if self.degree().unwrap_or(0) == 0 {
            return None;
        }

        // On each monotonic piece the minimum sits at one of the ends, and
        // the left end was already checked as the previous right end.
        let bounds = self.monotonic_bounds(lo, hi, tolerance);
        bounds.windows(2).find_map(|piece| {
            let (a, b) = (piece[0], piece[1]);
            if self.eval(b) < 0.0 {
                let (_, right) = self.bisect(a, b, tolerance);
                Some(right)
            } else {
                None
            }
        })
    }

    /// `lo`, the derivative roots strictly inside `(lo, hi)`, and `hi`.
    fn monotonic_bounds(&self, lo: f64, hi: f64, tolerance: f64) -> Vec<f64> {
        let mut bounds = vec![lo];
        bounds.extend(
            self.derivative()
                .roots_in(lo, hi, tolerance)
                .into_iter()
                .filter(|x| *x > lo && *x < hi),
        );
        bounds.push(hi);
        bounds
    }

    /// Narrow a sign change in `[a, b]` down to an interval no wider than
    /// `tolerance`. The sign at `a` is kept on the left end.
    fn bisect(&self, mut a: f64, mut b: f64, tolerance: f64) -> (f64, f64) {
        let left_negative = self.eval(a) < 0.0;
        for _ in 0..MAX_BISECTION_STEPS {
            if b - a <= tolerance {
                break;
            }
            let mid = 0.5 * (a + b);
            if (self.eval(mid) < 0.0) == left_negative {
                a = mid;
            } else {
                b = mid;
            }
        }
        (a, b)
    }

    fn trim(&mut self) {
        while self.coeffs.last() == Some(&0.0) {
            self.coeffs.pop();
        }
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, other: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| {
                self.coeffs.get(i).copied().unwrap_or(0.0)
                    + other.coeffs.get(i).copied().unwrap_or(0.0)
            })
            .collect();
        Polynomial::new(coeffs)
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, other: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| {
                self.coeffs.get(i).copied().unwrap_or(0.0)
                    - other.coeffs.get(i).copied().unwrap_or(0.0)
            })
            .collect();
        Polynomial::new(coeffs)
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, other: &Polynomial) -> Polynomial {
        if self.coeffs.is_empty() || other.coeffs.is_empty() {
            return Polynomial::zero();
        }
        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Polynomial::new(coeffs)
    }
}
