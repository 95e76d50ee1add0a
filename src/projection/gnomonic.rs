//! Gnomonic, spherical form, Snyder (1987) ch. 22.
//! Great circles are straight lines. Only the hemisphere centered on the
//! origin can be projected.
use super::azimuthal::Aspect;
use super::*;

const MAX_DELTA: f64 = 40_000_000.0;

#[derive(Clone, Debug)]
pub struct Gnomonic {
    radius: f64,
    aspect: Aspect,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Gnomonic {
    pub fn new(p: &OriginParameters, ellps: &Ellipsoid) -> Result<Gnomonic, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        Ok(Gnomonic {
            radius: sphere_radius(ellps),
            aspect: Aspect::new(p.origin_latitude),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for Gnomonic {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let cos_c = self.aspect.cos_c(latitude, dlam);
        // At or beyond 90° from the center
        if cos_c <= 1e-10 {
            return Err(Status::from(Issue::Longitude));
        }

        let (dx, dy) = self.aspect.direction(latitude, dlam);
        let k = self.radius / cos_c;
        let easting = k * dx + self.false_easting;
        let northing = k * dy + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (MAX_DELTA, MAX_DELTA)).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let c = (dx.hypot(dy) / self.radius).atan();

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
    fn gnomonic() -> Result<(), Status> {
        let ellps = Ellipsoid::default();
        let gnom = Gnomonic::new(&OriginParameters::default(), &ellps)?;
        let r = sphere_radius(&ellps);

        // Along the equator, x = R tan(dλ)
        let (xy, _) = gnom.forward(0., rad(45.))?;
        assert_float_eq!(xy.easting, r, abs <= 1e-6);
        assert_float_eq!(xy.northing, 0., abs <= 1e-6);

        roundtrip(&gnom, &[(0., 0.), (30., 30.), (-60., -20.), (10., 80.)], 1e-10);

        // The horizon, and beyond
        for lon in [90., 120., -180.] {
            let Err(status) = gnom.forward(0., rad(lon)) else {
                panic!("Expected {lon} to fail");
            };
            assert!(status.contains(Issue::Longitude));
        }
        Ok(())
    }

    #[test]
    fn polar() -> Result<(), Status> {
        let p = OriginParameters {
            origin_latitude: FRAC_PI_2,
            ..Default::default()
        };
        let gnom = Gnomonic::new(&p, &Ellipsoid::default())?;
        roundtrip(&gnom, &[(60., 0.), (45., 135.), (80., -90.)], 1e-10);
        let Err(_) = gnom.forward(-rad(1.), 0.) else {
            panic!("Expected the southern hemisphere to fail");
        };
        Ok(())
    }
}
