//! Mollweide, spherical form, Snyder (1987) ch. 31
use super::*;
use std::f64::consts::SQRT_2;

const MAX_ITERATIONS: usize = 60;

#[derive(Clone, Debug)]
pub struct Mollweide {
    radius: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Mollweide {
    pub fn new(p: &MeridianParameters, ellps: &Ellipsoid) -> Result<Mollweide, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        Ok(Mollweide {
            radius: sphere_radius(ellps),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

/// Solve 2θ + sin 2θ = π sin φ for θ, by Newton-Raphson (Snyder eq. 31-4)
fn auxiliary_angle(latitude: f64) -> f64 {
    if (latitude.abs() - FRAC_PI_2).abs() < 1e-10 {
        return latitude;
    }
    let target = PI * latitude.sin();
    let mut theta = latitude;
    for _ in 0..MAX_ITERATIONS {
        let delta = -(2. * theta + (2. * theta).sin() - target) / (2. + 2. * (2. * theta).cos());
        theta += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    theta
}

impl Projection for Mollweide {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let theta = auxiliary_angle(latitude);
        let (s, c) = theta.sin_cos();

        let easting = 2. * SQRT_2 / PI * self.radius * dlam * c + self.false_easting;
        let northing = SQRT_2 * self.radius * s + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        let extent = (2. * SQRT_2 * self.radius + 1e-3, SQRT_2 * self.radius + 1e-3);
        check_extent(xy, origin, extent).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let theta = (dy / (SQRT_2 * self.radius)).clamp(-1., 1.).asin();
        let latitude = ((2. * theta + (2. * theta).sin()) / PI).clamp(-1., 1.).asin();

        let cos_theta = theta.cos();
        if cos_theta < 1e-12 {
            return Ok(((latitude, self.central_meridian), Status::NONE));
        }
        let dlam = PI * dx / (2. * SQRT_2 * self.radius * cos_theta);
        let longitude = self.central_meridian + dlam.clamp(-PI, PI);
        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
