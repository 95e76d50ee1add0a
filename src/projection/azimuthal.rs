//! The spherical geometry shared by the azimuthal projections: angular
//! distances and directions as seen from the center of the projection.
//! Snyder (1987) eqs. (5-3), (20-14) and (20-15).

#[derive(Clone, Copy, Debug)]
pub(crate) struct Aspect {
    sin0: f64,
    cos0: f64,
}

impl Aspect {
    pub(crate) fn new(origin_latitude: f64) -> Aspect {
        let (sin0, cos0) = origin_latitude.sin_cos();
        Aspect { sin0, cos0 }
    }

    /// Cosine of the angular distance from the center
    pub(crate) fn cos_c(&self, latitude: f64, dlam: f64) -> f64 {
        let (s, c) = latitude.sin_cos();
        self.sin0 * s + self.cos0 * c * dlam.cos()
    }

    /// The plane coordinates on the unit sphere, before radial scaling
    pub(crate) fn direction(&self, latitude: f64, dlam: f64) -> (f64, f64) {
        let (s, c) = latitude.sin_cos();
        let (sl, cl) = dlam.sin_cos();
        (c * sl, self.cos0 * s - self.sin0 * c * cl)
    }

    /// (latitude, longitude difference) of the point at angular distance
    /// `c` from the center, in the direction of (dx, dy)
    pub(crate) fn invert(&self, dx: f64, dy: f64, c: f64) -> (f64, f64) {
        let rho = dx.hypot(dy);
        if rho == 0. {
            return (self.sin0.atan2(self.cos0), 0.);
        }
        let (sin_c, cos_c) = c.sin_cos();
        let latitude = (cos_c * self.sin0 + dy * sin_c * self.cos0 / rho).clamp(-1., 1.).asin();
        let dlam = (dx * sin_c).atan2(rho * self.cos0 * cos_c - dy * self.sin0 * sin_c);
        (latitude, dlam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn aspect() {
        let aspect = Aspect::new(0.7);
        assert!((aspect.cos_c(0.7, 0.) - 1.).abs() < 1e-15);
        let (lat, dlam) = aspect.invert(0., 0., 0.);
        assert!((lat - 0.7).abs() < 1e-15 && dlam == 0.);

        // A quarter circle north of the center
        let (lat, dlam) = aspect.invert(0., 1., FRAC_PI_2 - 0.7);
        assert!((lat - FRAC_PI_2).abs() < 1e-7);
        assert!(dlam.abs() < 1e-7);
    }
}
