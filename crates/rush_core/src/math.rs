//! Fixed-point math utilities for deterministic simulation.
//!
//! All factory simulation uses fixed-point arithmetic so that the same
//! inputs replay to the same state on every platform. Floating-point
//! values only appear at the presentation boundary (snapshots).

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec2Fixed {
    /// X coordinate.
    pub x: Fixed,
    /// Y coordinate.
    pub y: Fixed,
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from integer coordinates.
    #[must_use]
    pub fn from_int(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Unit vector pointing along +x.
    pub const UNIT_X: Self = Self {
        x: Fixed::ONE,
        y: Fixed::ZERO,
    };

    /// Calculate squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fixed {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        fixed_sqrt(self.distance_squared(other))
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> Fixed {
        self.x * other.x + self.y * other.y
    }

    /// Vector length.
    #[must_use]
    pub fn length(self) -> Fixed {
        fixed_sqrt(self.dot(self))
    }

    /// Multiply both components by a scalar.
    #[must_use]
    pub fn scale(self, factor: Fixed) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Check whether both components are zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == Fixed::ZERO && self.y == Fixed::ZERO
    }

    /// Linearly interpolate between two vectors.
    #[must_use]
    pub fn lerp(self, other: Self, t: Fixed) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Clamp each component into `[min, max]`.
    #[must_use]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self::new(self.x.clamp(min.x, max.x), self.y.clamp(min.y, max.y))
    }

    /// Normalize vector using fixed-point math.
    ///
    /// Returns [`Vec2Fixed::ZERO`] for the zero vector.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len_sq = self.dot(self);

        if len_sq == Fixed::ZERO {
            return Self::ZERO;
        }

        let len = fixed_sqrt(len_sq);
        if len == Fixed::ZERO {
            return Self::ZERO;
        }

        Self::new(self.x / len, self.y / len)
    }

    /// Convert to a float pair for presentation layers.
    #[must_use]
    pub fn to_f64(self) -> (f64, f64) {
        (self.x.to_num::<f64>(), self.y.to_num::<f64>())
    }
}

/// Computes the square root of a fixed-point number using binary search.
///
/// Runs enough iterations to converge to the last fractional bit for any
/// value inside the map range.
#[must_use]
pub fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }

    let mut low = Fixed::ZERO;
    let mut high = if value > Fixed::ONE { value } else { Fixed::ONE };

    for _ in 0..64 {
        let mid = low + (high - low) / Fixed::from_num(2);
        if mid == low {
            break;
        }
        let mid_sq = mid.saturating_mul(mid);

        if mid_sq <= value {
            low = mid;
        } else {
            high = mid;
        }
    }

    low
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epsilon() -> Fixed {
        Fixed::ONE / Fixed::from_num(10000)
    }

    #[test]
    fn test_vec2_distance_squared() {
        let a = Vec2Fixed::from_int(3, 0);
        let b = Vec2Fixed::from_int(0, 4);
        // 3² + 4² = 25
        assert_eq!(a.distance_squared(b), Fixed::from_num(25));
        assert!((a.distance(b) - Fixed::from_num(5)).abs() < epsilon());
    }

    #[test]
    fn test_fixed_sqrt_exact_squares() {
        for n in [0, 1, 4, 9, 1600, 6400, 1_000_000] {
            let root = fixed_sqrt(Fixed::from_num(n));
            let expected = Fixed::from_num(f64::from(n).sqrt());
            assert!(
                (root - expected).abs() < epsilon(),
                "sqrt({n}) = {root}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_vec2_lerp() {
        let a = Vec2Fixed::ZERO;
        let b = Vec2Fixed::from_int(10, 20);
        assert_eq!(a.lerp(b, Fixed::ZERO), a);
        assert_eq!(a.lerp(b, Fixed::ONE), b);
        assert_eq!(a.lerp(b, Fixed::from_num(0.5)), Vec2Fixed::from_int(5, 10));
    }

    #[test]
    fn test_vec2_normalize_diagonal() {
        let norm = Vec2Fixed::from_int(1, 1).normalize();
        let len_sq = norm.dot(norm);
        assert!(
            (len_sq - Fixed::ONE).abs() < epsilon(),
            "normalized vector length² should be ~1, got {len_sq:?}"
        );
        assert_eq!(norm.x, norm.y);
    }

    #[test]
    fn test_vec2_normalize_zero() {
        assert_eq!(Vec2Fixed::ZERO.normalize(), Vec2Fixed::ZERO);
    }

    #[test]
    fn test_vec2_clamp() {
        let min = Vec2Fixed::from_int(20, 20);
        let max = Vec2Fixed::from_int(780, 580);
        assert_eq!(Vec2Fixed::from_int(-5, 900).clamp(min, max), Vec2Fixed::from_int(20, 580));
        assert_eq!(Vec2Fixed::from_int(400, 300).clamp(min, max), Vec2Fixed::from_int(400, 300));
    }
}
