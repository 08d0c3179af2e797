//! Miscellaneous utility structs and functions.

use cgmath::num_traits::Float;

/// An interval on the real number line.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: Float> Interval<T> {
    /// Clamps a value into the interval.
    /// If the interval is empty, `max` wins.
    pub fn clamp(&self, value: T) -> T {
        T::min(T::max(value, self.min), self.max)
    }

    /// The fraction of the way from `min` to `max` at which `value` lies.
    pub fn inv_lerp(&self, value: T) -> T {
        (value - self.min) / (self.max - self.min)
    }
}
