use super::*;

use std::f64::consts::FRAC_PI_2;

impl Ellipsoid {
    // ----- Cartesian <--> Geographic conversion ----------------------------------

    /// Geographic (longitude, latitude, height) to geocentric cartesian (X, Y, Z).
    ///
    /// Follows the the derivation given by
    /// Bowring ([1976](crate::Bibliography::Bow76) and
    /// [1985](crate::Bibliography::Bow85))
    #[must_use]
    #[allow(non_snake_case)] // make it possible to mimic math notation from original paper
    pub fn cartesian(&self, longitude: f64, latitude: f64, height: f64) -> (f64, f64, f64) {
        let N = self.prime_vertical_radius_of_curvature(latitude);
        let (sinphi, cosphi) = latitude.sin_cos();
        let (sinlam, coslam) = longitude.sin_cos();

        let X = (N + height) * cosphi * coslam;
        let Y = (N + height) * cosphi * sinlam;
        let Z = (N * (1.0 - self.eccentricity_squared()) + height) * sinphi;
        (X, Y, Z)
    }

    /// Geocentric cartesian (X, Y, Z) to geographic (longitude, latitude, height).
    ///
    /// The latitude follows [Fukushima (1999)](crate::Bibliography::Fuk99),
    /// appendix B, the height [Bowring (1985)](crate::Bibliography::Bow85).
    #[must_use]
    #[allow(non_snake_case)]
    pub fn geographic(&self, X: f64, Y: f64, Z: f64) -> (f64, f64, f64) {
        let b = self.semiminor_axis();
        let eps = self.second_eccentricity_squared();
        let es = self.eccentricity_squared();

        let lam = Y.atan2(X);

        // The perpendicular distance from the point coordinate to the Z-axis
        let p = X.hypot(Y);

        // For p < 1 picometer we are on the axis: force a pole
        if p < 1.0e-12 {
            let phi = FRAC_PI_2.copysign(Z);
            let h = Z.abs() - b;
            return (lam, phi, h);
        }

        let T = (Z * self.a) / (p * b);
        let c = 1.0 / (1.0 + T * T).sqrt();
        let s = c * T;

        let phi_num = Z + eps * b * s.powi(3);
        let phi_denom = p - es * self.a * c.powi(3);
        let phi = phi_num.atan2(phi_denom);

        let lenphi = phi_num.hypot(phi_denom);
        let sinphi = phi_num / lenphi;
        let cosphi = phi_denom / lenphi;

        let N = self.a / (1.0 - sinphi.powi(2) * es).sqrt();

        // Bowring (1985): more accurate than the common h = p / cosphi - N
        let h = p * cosphi + Z * sinphi - self.a * self.a / N;

        (lam, phi, h)
    }
}

// ----- Tests ---------------------------------------------------------------------
