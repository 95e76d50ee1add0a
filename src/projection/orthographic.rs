//! Orthographic, spherical form, Snyder (1987) ch. 20.
//! The globe as seen from infinitely far away: only the hemisphere facing
//! the viewer is visible.
use super::azimuthal::Aspect;
use super::*;

#[derive(Clone, Debug)]
pub struct Orthographic {
    radius: f64,
    aspect: Aspect,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Orthographic {
    pub fn new(p: &OriginParameters, ellps: &Ellipsoid) -> Result<Orthographic, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        Ok(Orthographic {
            radius: sphere_radius(ellps),
            aspect: Aspect::new(p.origin_latitude),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for Orthographic {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        // On the far side of the globe
        if self.aspect.cos_c(latitude, dlam) < 0. {
            return Err(Status::from(Issue::Longitude));
        }

        let (dx, dy) = self.aspect.direction(latitude, dlam);
        let easting = self.radius * dx + self.false_easting;
        let northing = self.radius * dy + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (self.radius, self.radius)).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let rho = dx.hypot(dy);
        if rho > self.radius {
            return Err(Status::from(Issue::Radius));
        }

        let c = (rho / self.radius).asin();
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
    fn orthographic() -> Result<(), Status> {
        let p = OriginParameters {
            origin_latitude: rad(40.),
            central_meridian: rad(-100.),
            ..Default::default()
        };
        let ellps = Ellipsoid::default();
        let ortho = Orthographic::new(&p, &ellps)?;
        let r = sphere_radius(&ellps);

        // The north pole, seen from 40N
        let (xy, _) = ortho.forward(FRAC_PI_2, 0.)?;
        assert_float_eq!(xy.easting, 0., abs <= 1e-6);
        assert_float_eq!(xy.northing, r * rad(40.).cos(), abs <= 1e-6);

        roundtrip(&ortho, &[(40., -100.), (60., -60.), (0., -120.), (-20., -100.)], 1e-9);

        let Err(status) = ortho.forward(-rad(40.), rad(80.)) else {
            panic!("Expected the far side to fail");
        };
        assert!(status.contains(Issue::Longitude));

        let Err(status) = ortho.inverse(MapCoordinates::new(0.8 * r, 0.8 * r)) else {
            panic!("Expected a radius error");
        };
        assert!(status.contains(Issue::Radius));
        Ok(())
    }
}
