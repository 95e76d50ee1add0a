use super::*;
use crate::math::*;
use std::f64::consts::FRAC_PI_2;

// ----- Meridian geometry -----------------------------------------------------
impl Ellipsoid {
    /// The Normalized Meridian Arc Unit, *Qn*, is the mean length of one radian
    /// of the meridian, in units of the semimajor axis, *a*.
    #[must_use]
    pub fn normalized_meridian_arc_unit(&self) -> f64 {
        let n = self.third_flattening();
        taylor::horner(n * n, &constants::MERIDIAN_ARC_COEFFICIENTS) / (1. + n)
    }

    /// The Meridian Quadrant, *Qm*, is the distance from the equator to one of the poles.
    #[must_use]
    pub fn meridian_quadrant(&self) -> f64 {
        self.a * FRAC_PI_2 * self.normalized_meridian_arc_unit()
    }

    /// The distance along the meridian from the equator to `latitude`,
    /// via the rectifying latitude
    #[must_use]
    pub fn meridian_distance(&self, latitude: f64, coefficients: &FourierCoefficients) -> f64 {
        let mu = latitude + fourier::sin(2. * latitude, &coefficients.fwd);
        self.a * self.normalized_meridian_arc_unit() * mu
    }

    /// The latitude reached after moving `distance` metres northward along
    /// the meridian from the equator
    #[must_use]
    pub fn meridian_latitude(&self, distance: f64, coefficients: &FourierCoefficients) -> f64 {
        let mu = distance / (self.a * self.normalized_meridian_arc_unit());
        mu + fourier::sin(2. * mu, &coefficients.inv)
    }
}
