use serde::{Deserialize, Serialize};

/// An angle that remembers which unit it was authored in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Angle {
    Degrees(f64),
    Radians(f64),
}

impl Angle {
    #[inline]
    pub const fn from_radians(radians: f64) -> Self {
        Self::Radians(radians)
    }

    #[inline]
    pub const fn from_degrees(degrees: f64) -> Self {
        Self::Degrees(degrees)
    }

    pub fn radians(&self) -> f64 {
        match *self {
            Self::Degrees(d) => d.to_radians(),
            Self::Radians(r) => r,
        }
    }

    pub fn degrees(&self) -> f64 {
        match *self {
            Self::Degrees(d) => d,
            Self::Radians(r) => r.to_degrees(),
        }
    }

    /// Returns the same angle rotating the opposite way
    pub fn invert(&self) -> Self {
        match *self {
            Self::Degrees(d) => Self::Degrees(-d),
            Self::Radians(r) => Self::Radians(-r),
        }
    }
}

impl Default for Angle {
    fn default() -> Self {
        Self::Radians(0.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_and_radians_agree() {
        let right_angle = Angle::from_degrees(90.);
        assert!((right_angle.radians() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((Angle::from_radians(std::f64::consts::PI).degrees() - 180.).abs() < 1e-12);
        assert_eq!(right_angle.invert().degrees(), -90.);
    }
}
