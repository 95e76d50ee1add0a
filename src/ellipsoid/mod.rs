//! Ellipsoids of revolution: geometry, geodetic/geocentric conversion,
//! auxiliary latitudes, meridian arcs, and the table of named ellipsoids.

mod cartesians;
pub(crate) mod constants;
mod latitudes;
mod meridians;
pub mod table;

pub use table::EllipsoidEntry;
pub use table::EllipsoidTable;

/// An ellipsoid of revolution, given by its semimajor axis and flattening.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    a: f64,
    f: f64,
}

/// WGS84 is the default ellipsoid.
impl Default for Ellipsoid {
    fn default() -> Ellipsoid {
        Ellipsoid::new(6_378_137.0, 1. / 298.257_223_563)
    }
}

impl Ellipsoid {
    #[must_use]
    pub fn new(semimajor_axis: f64, flattening: f64) -> Ellipsoid {
        Ellipsoid {
            a: semimajor_axis,
            f: flattening,
        }
    }

    /// The ellipsoid (a, 1/f), with the EPSG convention that a zero
    /// inverse flattening means a sphere
    #[must_use]
    pub fn from_inverse_flattening(semimajor_axis: f64, inverse_flattening: f64) -> Ellipsoid {
        let f = if inverse_flattening == 0.0 {
            0.0
        } else {
            1.0 / inverse_flattening
        };
        Ellipsoid::new(semimajor_axis, f)
    }

    // ----- Size and shape --------------------------------------------------------

    /// The semimajor axis, *a*
    #[must_use]
    pub fn semimajor_axis(&self) -> f64 {
        self.a
    }

    /// The semiminor axis, *b*
    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// The flattening, *f = (a - b)/a*
    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.f
    }

    /// The inverse flattening, *1/f*, or 0 for a sphere
    #[must_use]
    pub fn inverse_flattening(&self) -> f64 {
        if self.f == 0.0 {
            return 0.0;
        }
        1.0 / self.f
    }

    /// The third flattening, *n = (a - b) / (a + b) = f / (2 - f)*
    #[must_use]
    pub fn third_flattening(&self) -> f64 {
        self.f / (2.0 - self.f)
    }

    /// The squared eccentricity *e² = (a² - b²) / a²*.
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.f * (2_f64 - self.f)
    }

    /// The eccentricity *e*
    #[must_use]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// The squared second eccentricity *e'² = (a² - b²) / b² = e² / (1 - e²)*
    #[must_use]
    pub fn second_eccentricity_squared(&self) -> f64 {
        let es = self.eccentricity_squared();
        es / (1.0 - es)
    }

    /// Radius of the sphere used by the spherical projections
    #[must_use]
    pub fn authalic_radius(&self) -> f64 {
        crate::math::ancillary::authalic_sphere_radius(self.a, self.eccentricity_squared())
    }

    // ----- Curvatures ------------------------------------------------------------

    /// The radius of curvature in the prime vertical, *N*
    #[must_use]
    pub fn prime_vertical_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        self.a / (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).sqrt()
    }

    /// The meridian radius of curvature, *M*
    #[must_use]
    pub fn meridian_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        let num = self.a * (1.0 - self.eccentricity_squared());
        let denom = (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).powf(1.5);
        num / denom
    }
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_and_size() {
        let ellps = Ellipsoid::default();
        assert_eq!(ellps.semimajor_axis(), 6378137.0);
        assert!((ellps.inverse_flattening() - 298.257_223_563).abs() < 1e-9);
        assert!((ellps.eccentricity() - 0.081_819_190_842_6).abs() < 1.0e-10);
        assert!((ellps.eccentricity_squared() - 0.006_694_379_990_14).abs() < 1.0e-12);
        assert!((ellps.semiminor_axis() - 6_356_752.314_245).abs() < 1e-5);

        let sphere = Ellipsoid::from_inverse_flattening(6_371_000., 0.);
        assert_eq!(sphere.flattening(), 0.);
        assert_eq!(sphere.inverse_flattening(), 0.);
        assert_eq!(sphere.prime_vertical_radius_of_curvature(1.), 6_371_000.);
    }

    #[test]
    fn curvatures() {
        let ellps = Ellipsoid::default();
        let pole = 90_f64.to_radians();
        let n = ellps.prime_vertical_radius_of_curvature(pole);
        let m = ellps.meridian_radius_of_curvature(pole);
        assert!((n - m).abs() < 1e-5);
        assert!((n - 6_399_593.6258).abs() < 1e-3);
        assert!((ellps.meridian_radius_of_curvature(0.0) - 6_335_439.327).abs() < 1.0e-3);
        assert!((ellps.prime_vertical_radius_of_curvature(0.0) - ellps.semimajor_axis()).abs() < 1e-9);
    }
}
