//! Miller Cylindrical, Snyder (1987) ch. 11
use super::*;

#[derive(Clone, Debug)]
pub struct Miller {
    radius: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
    // The northing of the poles, relative to the false northing
    max_northing: f64,
}

impl Miller {
    pub fn new(p: &MeridianParameters, ellps: &Ellipsoid) -> Result<Miller, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        let radius = sphere_radius(ellps);
        Ok(Miller {
            radius,
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
            max_northing: northing(radius, FRAC_PI_2),
        })
    }
}

fn northing(radius: f64, latitude: f64) -> f64 {
    1.25 * radius * (FRAC_PI_4 + 0.4 * latitude).tan().ln()
}

impl Projection for Miller {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let easting = self.radius * dlam + self.false_easting;
        let northing = northing(self.radius, latitude) + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        let extent = (PI * self.radius + 1e-3, self.max_northing + 1e-3);
        check_extent(xy, origin, extent).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let latitude = 2.5 * (0.8 * dy / self.radius).exp().atan() - 0.625 * PI;
        let longitude = self.central_meridian + (dx / self.radius).clamp(-PI, PI);
        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn miller() -> Result<(), Status> {
        // Snyder (1987), table 13, on the unit sphere: y(50°) = 0.95364
        assert_float_eq!(northing(1., 50_f64.to_radians()), 0.953_64, abs <= 1e-5);

        let ellps = Ellipsoid::default();
        let mill = Miller::new(&MeridianParameters::default(), &ellps)?;
        let (xy, _) = mill.forward(FRAC_PI_2, PI)?;
        assert_float_eq!(xy.northing, mill.max_northing, abs <= 1e-6);
        roundtrip(&mill, &[(0., 0.), (50., -100.), (-89., 179.), (90., 0.)], 1e-12);

        let Err(status) = mill.inverse(MapCoordinates::new(0., 2. * mill.max_northing)) else {
            panic!("Expected a northing error");
        };
        assert!(status.contains(Issue::Northing));
        Ok(())
    }
}
