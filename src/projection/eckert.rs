//! Eckert IV and Eckert VI, spherical forms, Snyder & Voxland (1989)
//!
//! Both are pseudocylindrical equal area projections with a pole line
//! half as long as the equator. They differ in the shape of the meridians:
//! semiellipses for IV, sinusoids for VI.
use super::*;

const MAX_ITERATIONS: usize = 60;

/// Newton-Raphson for the auxiliary angle θ, solving f(θ) = target
fn solve(mut theta: f64, target: f64, f: impl Fn(f64) -> f64, df: impl Fn(f64) -> f64) -> f64 {
    for _ in 0..MAX_ITERATIONS {
        let delta = -(f(theta) - target) / df(theta);
        theta += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    theta
}

/// The pieces shared by the two variants
#[derive(Clone, Debug)]
struct Common {
    radius: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Common {
    fn new(p: &MeridianParameters, ellps: &Ellipsoid) -> Result<Common, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;
        Ok(Common {
            radius: sphere_radius(ellps),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }

    fn offset(&self, dx: f64, dy: f64) -> MapCoordinates {
        MapCoordinates::new(dx + self.false_easting, dy + self.false_northing)
    }
}

// ----- Eckert IV -----------------------------------------------------------------------

const E4_X: f64 = 0.422_238_200_315_771_5; // 2/√(π(4+π))
const E4_Y: f64 = 1.326_500_428_177_002_6; // 2√(π/(4+π))
const E4_K: f64 = 2. + FRAC_PI_2;

#[derive(Clone, Debug)]
pub struct Eckert4 {
    common: Common,
}

impl Eckert4 {
    pub fn new(p: &MeridianParameters, ellps: &Ellipsoid) -> Result<Eckert4, Status> {
        Ok(Eckert4 { common: Common::new(p, ellps)? })
    }

    fn theta(latitude: f64) -> f64 {
        if (latitude.abs() - FRAC_PI_2).abs() < 1e-10 {
            return latitude;
        }
        solve(
            latitude / 2.,
            E4_K * latitude.sin(),
            |t| t + t.sin() * t.cos() + 2. * t.sin(),
            |t| 2. * t.cos() * (1. + t.cos()),
        )
    }
}

impl Projection for Eckert4 {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let c = &self.common;
        let dlam = delta_longitude(longitude, c.central_meridian);
        let (s, cos) = Eckert4::theta(latitude).sin_cos();
        let dx = E4_X * c.radius * dlam * (1. + cos);
        let dy = E4_Y * c.radius * s;
        Ok((c.offset(dx, dy), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let c = &self.common;
        let extent = (2. * PI * E4_X * c.radius + 1e-3, E4_Y * c.radius + 1e-3);
        check_extent(xy, (c.false_easting, c.false_northing), extent).into_result()?;

        let dx = xy.easting - c.false_easting;
        let dy = xy.northing - c.false_northing;
        let theta = (dy / (E4_Y * c.radius)).clamp(-1., 1.).asin();
        let (s, cos) = theta.sin_cos();
        let latitude = ((theta + s * cos + 2. * s) / E4_K).clamp(-1., 1.).asin();
        let dlam = (dx / (E4_X * c.radius * (1. + cos))).clamp(-PI, PI);
        let longitude = c.central_meridian + dlam;
        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- Eckert VI -----------------------------------------------------------------------

const E6_K: f64 = 1. + FRAC_PI_2;

#[derive(Clone, Debug)]
pub struct Eckert6 {
    common: Common,
    // 1 / √(2+π)
    scale: f64,
}

impl Eckert6 {
    pub fn new(p: &MeridianParameters, ellps: &Ellipsoid) -> Result<Eckert6, Status> {
        Ok(Eckert6 {
            common: Common::new(p, ellps)?,
            scale: 1. / (2. + PI).sqrt(),
        })
    }

    fn theta(latitude: f64) -> f64 {
        if (latitude.abs() - FRAC_PI_2).abs() < 1e-10 {
            return latitude;
        }
        solve(latitude, E6_K * latitude.sin(), |t| t + t.sin(), |t| 1. + t.cos())
    }
}

impl Projection for Eckert6 {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let c = &self.common;
        let dlam = delta_longitude(longitude, c.central_meridian);
        let theta = Eckert6::theta(latitude);
        let dx = c.radius * dlam * (1. + theta.cos()) * self.scale;
        let dy = 2. * c.radius * theta * self.scale;
        Ok((c.offset(dx, dy), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let c = &self.common;
        let extent = (2. * PI * c.radius * self.scale + 1e-3, PI * c.radius * self.scale + 1e-3);
        check_extent(xy, (c.false_easting, c.false_northing), extent).into_result()?;

        let dx = xy.easting - c.false_easting;
        let dy = xy.northing - c.false_northing;
        let theta = (dy / (2. * c.radius * self.scale)).clamp(-FRAC_PI_2, FRAC_PI_2);
        let latitude = ((theta + theta.sin()) / E6_K).clamp(-1., 1.).asin();
        let dlam = (dx / (c.radius * self.scale * (1. + theta.cos()))).clamp(-PI, PI);
        let longitude = c.central_meridian + dlam;
        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
