//! Azimuthal Equidistant, spherical form, Snyder (1987) ch. 25.
//!
//! Distances and directions from the center of the projection are true.
//! The point antipodal to the center is a circle on the map, and cannot
//! be projected.
use super::azimuthal::Aspect;
use super::*;

#[derive(Clone, Debug)]
pub struct AzimuthalEquidistant {
    radius: f64,
    aspect: Aspect,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl AzimuthalEquidistant {
    pub fn new(p: &OriginParameters, ellps: &Ellipsoid) -> Result<AzimuthalEquidistant, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        Ok(AzimuthalEquidistant {
            radius: sphere_radius(ellps),
            aspect: Aspect::new(p.origin_latitude),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for AzimuthalEquidistant {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let cos_c = self.aspect.cos_c(latitude, dlam).clamp(-1., 1.);
        if cos_c + 1. < 1e-14 {
            return Err(Status::from(Issue::Projection));
        }

        // k = c / sin c, tending to 1 at the center
        let c = cos_c.acos();
        let k = if c < 1e-10 { 1. } else { c / c.sin() };
        let (dx, dy) = self.aspect.direction(latitude, dlam);

        let easting = self.radius * k * dx + self.false_easting;
        let northing = self.radius * k * dy + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let half_circumference = PI * self.radius;
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (half_circumference, half_circumference)).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let rho = dx.hypot(dy);
        if rho > half_circumference {
            return Err(Status::from(Issue::Radius));
        }

        let (latitude, dlam) = self.aspect.invert(dx, dy, rho / self.radius);
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
    fn distances_are_true() -> Result<(), Status> {
        let p = OriginParameters {
            origin_latitude: rad(40.),
            central_meridian: rad(-100.),
            ..Default::default()
        };
        let ellps = Ellipsoid::default();
        let aeqd = AzimuthalEquidistant::new(&p, &ellps)?;
        let r = sphere_radius(&ellps);

        // Due north along the central meridian
        let (xy, _) = aeqd.forward(rad(50.), rad(-100.))?;
        assert_float_eq!(xy.easting, 0., abs <= 1e-6);
        assert_float_eq!(xy.northing, r * rad(10.), abs <= 1e-6);

        // The north pole is 50 degrees away
        let (xy, _) = aeqd.forward(FRAC_PI_2, 0.)?;
        assert_float_eq!(xy.easting.hypot(xy.northing), r * rad(50.), abs <= 1e-6);

        roundtrip(&aeqd, &[(40., -100.), (0., 0.), (-30., 60.), (85., 170.)], 1e-10);
        Ok(())
    }

    #[test]
    fn antipode() -> Result<(), Status> {
        let aeqd = AzimuthalEquidistant::new(&OriginParameters::default(), &Ellipsoid::default())?;
        let Err(status) = aeqd.forward(0., PI) else {
            panic!("Expected the antipode to fail");
        };
        assert!(status.contains(Issue::Projection));

        let r = sphere_radius(&Ellipsoid::default());
        let Err(status) = aeqd.inverse(MapCoordinates::new(3. * r, 3. * r)) else {
            panic!("Expected a radius error");
        };
        assert!(status.contains(Issue::Radius));
        Ok(())
    }
}
