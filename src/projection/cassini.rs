//! Cassini, Snyder (1987) ch. 13. A series expansion, accurate only close
//! to the central meridian: conversions more than 4° away raise a warning.
use super::*;
use crate::math::FourierCoefficients;

const DELTA_EASTING: f64 = 20_037_508.4;
const DELTA_NORTHING: f64 = 56_575_846.0;
const WARNING_DELTA_LONG: f64 = (PI * 4.0) / 180.0;

#[derive(Clone, Debug)]
pub struct Cassini {
    ellps: Ellipsoid,
    rectifying: FourierCoefficients,
    // Meridian distance of the origin
    m0: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Cassini {
    pub fn new(p: &OriginParameters, ellps: &Ellipsoid) -> Result<Cassini, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        let rectifying = ellps.coefficients_for_rectifying_latitude_computations();
        Ok(Cassini {
            ellps: *ellps,
            m0: ellps.meridian_distance(p.origin_latitude, &rectifying),
            rectifying,
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }

    fn warnings(dlam: f64) -> Status {
        if dlam.abs() > WARNING_DELTA_LONG {
            return Status::from(Issue::LongitudeWarning);
        }
        Status::NONE
    }
}

impl Projection for Cassini {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let es = self.ellps.eccentricity_squared();
        let (s, c) = latitude.sin_cos();
        let tan = s / c;

        let n = self.ellps.prime_vertical_radius_of_curvature(latitude);
        let t = tan * tan;
        let a1 = dlam * c;
        let a2 = a1 * a1;
        let cc = es * c * c / (1. - es);
        let m = self.ellps.meridian_distance(latitude, &self.rectifying);

        let x = n * a1 * (1. - a2 * t / 6. - (8. - t + 8. * cc) * t * a2 * a2 / 120.);
        let y = m - self.m0 + n * tan * a2 * (0.5 + (5. - t + 6. * cc) * a2 / 24.);

        let xy = MapCoordinates::new(x + self.false_easting, y + self.false_northing);
        Ok((xy, Cassini::warnings(dlam)))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (DELTA_EASTING, DELTA_NORTHING + 0.1)).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;

        // The footpoint latitude
        let phi1 = self.ellps.meridian_latitude(self.m0 + dy, &self.rectifying);
        if (phi1.abs() - FRAC_PI_2).abs() < 1e-5 {
            let latitude = FRAC_PI_2.copysign(phi1);
            return Ok(((latitude, self.central_meridian), Status::NONE));
        }

        let (s, c) = phi1.sin_cos();
        let tan = s / c;
        let t1 = tan * tan;
        let n1 = self.ellps.prime_vertical_radius_of_curvature(phi1);
        let r1 = self.ellps.meridian_radius_of_curvature(phi1);
        let d = dx / n1;
        let d2 = d * d;

        let latitude = phi1 - (n1 * tan / r1) * d2 * (0.5 - (1. + 3. * t1) * d2 / 24.);
        let dlam = d * (1. - t1 * d2 / 3. + (1. + 3. * t1) * t1 * d2 * d2 / 15.) / c;
        let longitude = output_longitude(self.central_meridian + dlam);
        let warnings = Cassini::warnings(delta_longitude(longitude, self.central_meridian));

        Ok(((output_latitude(latitude), longitude), warnings))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    fn rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    #[test]
    fn cassini() -> Result<(), Status> {
        // Snyder (1987), p. 284: Clarke 1866, origin (40N, 75W)
        let clarke = Ellipsoid::from_inverse_flattening(6_378_206.4, 294.978_698_2);
        let p = OriginParameters {
            origin_latitude: rad(40.),
            central_meridian: rad(-75.),
            ..Default::default()
        };
        let cass = Cassini::new(&p, &clarke)?;
        let (xy, warnings) = cass.forward(rad(43.), rad(-73.))?;
        assert!(warnings.is_empty());
        assert_float_eq!(xy.easting, 163_071.1, abs <= 0.5);
        assert_float_eq!(xy.northing, 335_127.6, abs <= 0.5);

        let ((lat, lon), _) = cass.inverse(xy)?;
        assert_float_eq!(lat, rad(43.), abs <= 1e-7);
        assert_float_eq!(lon, rad(-73.), abs <= 1e-7);
        Ok(())
    }

    #[test]
    fn far_from_the_central_meridian() -> Result<(), Status> {
        let cass = Cassini::new(&OriginParameters::default(), &Ellipsoid::default())?;
        let (xy, warnings) = cass.forward(rad(10.), rad(6.))?;
        assert!(warnings.contains(Issue::LongitudeWarning));
        assert!(!warnings.has_error());

        let (_, warnings) = cass.inverse(xy)?;
        assert!(warnings.contains(Issue::LongitudeWarning));
        Ok(())
    }
}
