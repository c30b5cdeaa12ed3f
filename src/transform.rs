//! The resolved linear map between two sensor scales.

use num_traits::Float;

use crate::seasonal::SeasonalComponents;

/// A linear calibration `destination = slope * source + intercept`.
///
/// Transforms compose: if `t1` maps A onto B and `t2` maps B onto C, then
/// `t2.compose(&t1)` maps A onto C in one step. Affine composition is not
/// commutative, so the operand order matters; composition is the only
/// algebra the chain propagator relies on and is carried out in native
/// floating point with no intermediate rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform<E> {
    pub slope: E,
    pub intercept: E,
}

impl<E: Float> Transform<E> {
    /// The identity map (slope 1, intercept 0).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            slope: E::one(),
            intercept: E::zero(),
        }
    }

    /// Map a single value onto the destination scale.
    #[must_use]
    pub fn apply(&self, value: E) -> E {
        self.slope * value + self.intercept
    }

    /// Map a whole series onto the destination scale. NaN maps to NaN, so
    /// missing samples stay missing.
    #[must_use]
    pub fn apply_slice(&self, values: &[E]) -> Vec<E> {
        values.iter().map(|v| self.apply(*v)).collect()
    }

    /// Map a series with an additive seasonal adjustment: subtract the
    /// source's seasonal component, apply the linear map, add the
    /// destination's component back. Time coordinates absent from either
    /// table contribute zero.
    #[must_use]
    pub fn apply_seasonal(
        &self,
        values: &[E],
        times: &[i64],
        source_seasonal: &SeasonalComponents<E>,
        dest_seasonal: &SeasonalComponents<E>,
    ) -> Vec<E> {
        let deseasoned = source_seasonal.deseasonalize(values, times);
        let mapped = self.apply_slice(&deseasoned);
        dest_seasonal.reseasonalize(&mapped, times)
    }

    /// The single transform equivalent to applying `inner` first and then
    /// `self`: if `inner` maps A onto B and `self` maps B onto C, the result
    /// maps A onto C.
    #[must_use]
    pub fn compose(&self, inner: &Self) -> Self {
        Self {
            slope: self.slope * inner.slope,
            intercept: self.slope * inner.intercept + self.intercept,
        }
    }

    /// The inverse map (destination back onto source), or `None` when the
    /// slope is zero and the map cannot be undone.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        if self.slope == E::zero() {
            return None;
        }
        Some(Self {
            slope: self.slope.recip(),
            intercept: -self.intercept / self.slope,
        })
    }
}
