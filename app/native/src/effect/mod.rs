//! The grayscale effect and its construction.
//!
//! A grayscale effect is a desaturation with a fixed factor of
//! [`GRAYSCALE_FACTOR`]. Effects are plain values: every attachment gets its
//! own freshly created instance, which the host then owns.

pub mod binder;

use serde::{Deserialize, Serialize};

pub use binder::{ActorEffectBinder, WindowTags};
use crate::constants::GRAYSCALE_FACTOR;

/// A "desaturate by factor" visual transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesaturateEffect {
    /// Desaturation factor, from 0.0 (unchanged) to 1.0 (fully gray).
    pub factor: f32,
}

impl DesaturateEffect {
    /// Returns whether this effect renders fully gray.
    #[must_use]
    pub fn is_full(&self) -> bool { (self.factor - 1.0).abs() < f32::EPSILON }
}

/// Factory for grayscale effects.
pub struct GrayscaleEffect;

impl GrayscaleEffect {
    /// Creates a new effect instance with full desaturation.
    #[must_use]
    pub const fn create() -> DesaturateEffect { DesaturateEffect { factor: GRAYSCALE_FACTOR } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_uses_full_desaturation() {
        let effect = GrayscaleEffect::create();
        assert!(effect.is_full());
        assert!((effect.factor - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_effect_is_not_full() {
        let effect = DesaturateEffect { factor: 0.5 };
        assert!(!effect.is_full());
    }
}
