//! Stereographic, spherical form, Snyder (1987) ch. 21.
//! For the ellipsoidal polar case, see [`PolarStereographic`](super::polarst::PolarStereographic).
use super::azimuthal::Aspect;
use super::*;

const MAX_DELTA: f64 = 40_000_000.0;

#[derive(Clone, Debug)]
pub struct Stereographic {
    radius: f64,
    aspect: Aspect,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Stereographic {
    pub fn new(p: &OriginParameters, ellps: &Ellipsoid) -> Result<Stereographic, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        Ok(Stereographic {
            radius: sphere_radius(ellps),
            aspect: Aspect::new(p.origin_latitude),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for Stereographic {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let cos_c = self.aspect.cos_c(latitude, dlam);
        // The antipode of the center projects to infinity
        if cos_c + 1. < 1e-10 {
            return Err(Status::from(Issue::Longitude));
        }

        let k = 2. * self.radius / (1. + cos_c);
        let (dx, dy) = self.aspect.direction(latitude, dlam);
        let easting = k * dx + self.false_easting;
        let northing = k * dy + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (MAX_DELTA, MAX_DELTA)).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let c = 2. * (dx.hypot(dy) / (2. * self.radius)).atan();

        let (latitude, dlam) = self.aspect.invert(dx, dy, c);
        let longitude = self.central_meridian + dlam;
        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    fn rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    #[test]
    fn stereographic() -> Result<(), Status> {
        let ellps = Ellipsoid::default();
        let stere = Stereographic::new(&OriginParameters::default(), &ellps)?;
        let r = sphere_radius(&ellps);

        // Along the equator, x = 2R tan(dλ/2)
        let (xy, _) = stere.forward(0., FRAC_PI_2)?;
        assert_float_eq!(xy.easting, 2. * r, abs <= 1e-6);
        assert_float_eq!(xy.northing, 0., abs <= 1e-6);

        roundtrip(&stere, &[(0., 0.), (45., 90.), (-70., -150.), (89., 10.)], 1e-10);

        let Err(status) = stere.forward(0., PI) else {
            panic!("Expected the antipode to fail");
        };
        assert!(status.contains(Issue::Longitude));
        Ok(())
    }
}
