//! Verifier confidence score

use std::fmt;

/// Integer certainty in `[0, 100]` attached to a verdict
///
/// The value can never leave the range: every constructor clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Confidence(u8);

/// Coarse grouping of confidence scores for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// 80 and above
    High,
    /// 50 to 79
    Medium,
    /// Below 50
    Low,
}

impl Confidence {
    /// Lowest possible score
    pub const MIN: Confidence = Confidence(0);

    /// Highest possible score
    pub const MAX: Confidence = Confidence(100);

    /// Create a confidence score, rejecting values above 100
    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    /// Clamp an integer into `[0, 100]`
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Round and clamp a float; NaN maps to zero
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    /// Read a score written as text, such as `"85"`, `"85%"` or `" 72.4 "`
    ///
    /// Anything that is not a number maps to zero; numbers are rounded and
    /// clamped like [`Confidence::from_f64`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ekmyth_domain::Confidence;
    ///
    /// assert_eq!(Confidence::parse_lenient("85%").value(), 85);
    /// assert_eq!(Confidence::parse_lenient("high").value(), 0);
    /// ```
    pub fn parse_lenient(text: &str) -> Self {
        text.trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(Self::from_f64)
            .unwrap_or(Self::MIN)
    }

    /// Raw score
    pub fn value(self) -> u8 {
        self.0
    }

    /// Display band used when colouring the score
    pub fn band(self) -> ConfidenceBand {
        match self.0 {
            80.. => ConfidenceBand::High,
            50..=79 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any float lands inside the range
        #[test]
        fn test_from_f64_in_range(value in proptest::num::f64::ANY) {
            prop_assert!(Confidence::from_f64(value).value() <= 100);
        }

        /// Property: clamping is the identity inside the range
        #[test]
        fn test_clamped_identity(value in 0i64..=100) {
            prop_assert_eq!(Confidence::clamped(value).value() as i64, value);
        }
    }
}
