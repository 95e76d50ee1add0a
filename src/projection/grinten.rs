//! Van der Grinten, Snyder (1987) ch. 29.
//! The whole world inside a circle, neither conformal nor equal area.
use super::*;

#[derive(Clone, Debug)]
pub struct VanDerGrinten {
    radius: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl VanDerGrinten {
    pub fn new(p: &MeridianParameters, ellps: &Ellipsoid) -> Result<VanDerGrinten, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        Ok(VanDerGrinten {
            radius: sphere_radius(ellps),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for VanDerGrinten {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let pi_r = PI * self.radius;
        let theta = (2. * latitude / PI).abs().min(1.).asin();

        // The equator and the central meridian are straight lines
        let (dx, dy) = if latitude.abs() < 1e-10 {
            (self.radius * dlam, 0.)
        } else if dlam.abs() < 1e-10 || (latitude.abs() - FRAC_PI_2).abs() < 1e-10 {
            (0., (pi_r * (theta / 2.).tan()).copysign(latitude))
        } else {
            // Eqs. (29-1)...(29-6)
            let (s, c) = theta.sin_cos();
            let a = 0.5 * (PI / dlam - dlam / PI).abs();
            let g = c / (s + c - 1.);
            let p = g * (2. / s - 1.);
            let q = a * a + g;
            let pp = p * p;
            let ppaa = pp + a * a;
            let gpp = g - pp;

            let x = pi_r * (a * gpp + (a * a * gpp * gpp - ppaa * (g * g - pp)).max(0.).sqrt()) / ppaa;
            let y = pi_r * (p * q - a * ((a * a + 1.) * ppaa - q * q).max(0.).sqrt()) / ppaa;
            (x.copysign(dlam), y.copysign(latitude))
        };

        let xy = MapCoordinates::new(dx + self.false_easting, dy + self.false_northing);
        Ok((xy, Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let pi_r = PI * self.radius;
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (pi_r, pi_r)).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        if dx.hypot(dy) > pi_r + 1e-3 {
            return Err(Status::from(Issue::Radius));
        }

        // Eqs. (29-9)...(29-19): the roots of a cubic
        let x = dx / pi_r;
        let y = dy / pi_r;
        let xx = x * x;
        let yy = y * y;
        let xxyy = xx + yy;

        let latitude = if y.abs() < 1e-15 {
            0.
        } else {
            let c1 = -y.abs() * (1. + xxyy);
            let c2 = c1 - 2. * yy + xx;
            let c3 = -2. * c1 + 1. + 2. * yy + xxyy * xxyy;
            let d = yy / c3 + (2. * c2.powi(3) / c3.powi(3) - 9. * c1 * c2 / (c3 * c3)) / 27.;
            let a1 = (c1 - c2 * c2 / (3. * c3)) / c3;
            let m1 = 2. * (-a1 / 3.).sqrt();
            let theta1 = (3. * d / (a1 * m1)).clamp(-1., 1.).acos() / 3.;
            (PI * (-m1 * (theta1 + PI / 3.).cos() - c2 / (3. * c3))).copysign(y)
        };

        let dlam = if x.abs() < 1e-15 {
            0.
        } else {
            let root = (1. + 2. * (xx - yy) + xxyy * xxyy).max(0.).sqrt();
            (PI * (xxyy - 1. + root) / (2. * x)).clamp(-PI, PI)
        };
        let longitude = self.central_meridian + dlam;
        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
