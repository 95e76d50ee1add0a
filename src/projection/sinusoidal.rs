//! Sinusoidal, ellipsoidal form, Snyder (1987) ch. 30
use super::*;
use crate::math::ancillary::msfn;
use crate::math::FourierCoefficients;

const DELTA_EASTING: f64 = 20_037_509.0;
const DELTA_NORTHING: f64 = 10_001_966.0;

#[derive(Clone, Debug)]
pub struct Sinusoidal {
    ellps: Ellipsoid,
    rectifying: FourierCoefficients,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Sinusoidal {
    pub fn new(p: &MeridianParameters, ellps: &Ellipsoid) -> Result<Sinusoidal, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;
        Ok(Sinusoidal {
            ellps: *ellps,
            rectifying: ellps.coefficients_for_rectifying_latitude_computations(),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for Sinusoidal {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let a = self.ellps.semimajor_axis();
        let es = self.ellps.eccentricity_squared();

        let easting = a * dlam * msfn(latitude.sin_cos(), es) + self.false_easting;
        let northing = self.ellps.meridian_distance(latitude, &self.rectifying) + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (DELTA_EASTING, DELTA_NORTHING)).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let latitude = output_latitude(self.ellps.meridian_latitude(dy, &self.rectifying));

        // Every meridian meets at the poles
        if (latitude.abs() - FRAC_PI_2).abs() < 1e-10 {
            return Ok(((latitude, self.central_meridian), Status::NONE));
        }

        let a = self.ellps.semimajor_axis();
        let es = self.ellps.eccentricity_squared();
        let dlam = (dx / (a * msfn(latitude.sin_cos(), es))).clamp(-PI, PI);
        let longitude = output_longitude(self.central_meridian + dlam);
        Ok(((latitude, longitude), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn sinusoidal() -> Result<(), Status> {
        let ellps = Ellipsoid::default();
        let sinu = Sinusoidal::new(&MeridianParameters::default(), &ellps)?;

        // Along the equator, x is the arc length
        let (xy, _) = sinu.forward(0., 1.)?;
        assert_float_eq!(xy.easting, 6_378_137.0, abs <= 1e-8);
        assert_float_eq!(xy.northing, 0., abs <= 1e-8);

        // Along the central meridian, y is the meridian distance
        let (xy, _) = sinu.forward(FRAC_PI_2, 0.)?;
        assert_float_eq!(xy.northing, ellps.meridian_quadrant(), abs <= 1e-6);

        let p = MeridianParameters {
            central_meridian: -30_f64.to_radians(),
            false_easting: 100.,
            false_northing: -200.,
        };
        let sinu = Sinusoidal::new(&p, &ellps)?;
        roundtrip(&sinu, &[(0., -30.), (45., 60.), (-70., -170.), (89., 10.)], 1e-9);
        Ok(())
    }
}
