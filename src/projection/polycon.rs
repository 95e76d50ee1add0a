//! American Polyconic, Snyder (1987) ch. 18
use super::*;
use crate::math::FourierCoefficients;

const DELTA_EASTING: f64 = 20_037_509.0;
// The northing extent is that of the parallels at ±41°, opposite the central meridian
const EXTENT_LATITUDE: f64 = (PI * 41.0) / 180.0;
const MAX_ITER: usize = 30;

#[derive(Clone, Debug)]
pub struct Polyconic {
    ellps: Ellipsoid,
    rectifying: FourierCoefficients,
    m0: f64,
    min_northing: f64,
    max_northing: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Polyconic {
    pub fn new(p: &OriginParameters, ellps: &Ellipsoid) -> Result<Polyconic, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        let rectifying = ellps.coefficients_for_rectifying_latitude_computations();
        let mut poly = Polyconic {
            ellps: *ellps,
            m0: ellps.meridian_distance(p.origin_latitude, &rectifying),
            rectifying,
            min_northing: 0.,
            max_northing: 0.,
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        };
        poly.max_northing = poly.raw(EXTENT_LATITUDE, PI).1;
        poly.min_northing = poly.raw(-EXTENT_LATITUDE, PI).1;
        Ok(poly)
    }

    // Snyder's (18-1)...(18-3), without the false origin
    fn raw(&self, latitude: f64, dlam: f64) -> (f64, f64) {
        if latitude == 0. {
            return (self.ellps.semimajor_axis() * dlam, -self.m0);
        }
        let n_cot = self.ellps.prime_vertical_radius_of_curvature(latitude) / latitude.tan();
        let (s, c) = (dlam * latitude.sin()).sin_cos();
        let m = self.ellps.meridian_distance(latitude, &self.rectifying);
        (n_cot * s, m - self.m0 + n_cot * (1. - c))
    }
}

impl Projection for Polyconic {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let mut warnings = Status::new();
        if dlam.abs() > FRAC_PI_2 {
            warnings |= Issue::LongitudeWarning;
        }
        let (x, y) = self.raw(latitude, dlam);
        let xy = MapCoordinates::new(x + self.false_easting, y + self.false_northing);
        Ok((xy, warnings))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let mut status = Status::new();
        if dx.abs() > DELTA_EASTING {
            status |= Issue::Easting;
        }
        if !(self.min_northing..=self.max_northing).contains(&dy) {
            status |= Issue::Northing;
        }
        status.into_result()?;

        let a = self.ellps.semimajor_axis();
        let es = self.ellps.eccentricity_squared();

        // On the equator
        if (dy + self.m0).abs() <= 1. {
            let longitude = output_longitude(self.central_meridian + dx / a);
            return Ok(((0., longitude), Status::NONE));
        }

        // Snyder's (18-25), Newton iteration for the latitude
        let aa = (self.m0 + dy) / a;
        let bb = (dx / a).powi(2) + aa * aa;
        let mut phi = aa;
        let mut converged = false;
        for _ in 0..MAX_ITER {
            let s = phi.sin();
            let cc = (1. - es * s * s).sqrt() * phi.tan();
            let mn = self.ellps.meridian_distance(phi, &self.rectifying) / a;
            let mn_prime = self.ellps.meridian_radius_of_curvature(phi) / a;
            let sin2phi = (2. * phi).sin();

            let numerator = aa * (cc * mn + 1.) - mn - 0.5 * (mn * mn + bb) * cc;
            let denominator = es * sin2phi * (mn * mn + bb - 2. * aa * mn) / (4. * cc)
                + (aa - mn) * (cc * mn_prime - 2. / sin2phi)
                - mn_prime;
            let dphi = numerator / denominator;
            phi -= dphi;
            if dphi.abs() < 1e-12 {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(Status::from(Issue::Northing));
        }

        let latitude = output_latitude(phi);
        if (latitude.abs() - FRAC_PI_2).abs() < 1e-5 {
            return Ok(((latitude, self.central_meridian), Status::NONE));
        }
        let s = latitude.sin();
        let cc = (1. - es * s * s).sqrt() * latitude.tan();
        let dlam = (dx * cc / a).clamp(-1., 1.).asin() / s;
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

    fn rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    #[test]
    fn polyconic() -> Result<(), Status> {
        // Snyder (1987), p. 296: Clarke 1866, origin (30N, 96W)
        let clarke = Ellipsoid::from_inverse_flattening(6_378_206.4, 294.978_698_2);
        let p = OriginParameters {
            origin_latitude: rad(30.),
            central_meridian: rad(-96.),
            ..Default::default()
        };
        let poly = Polyconic::new(&p, &clarke)?;
        let (xy, warnings) = poly.forward(rad(40.), rad(-75.))?;
        assert!(warnings.is_empty());
        assert_float_eq!(xy.easting, 1_776_774.5, abs <= 0.5);
        assert_float_eq!(xy.northing, 1_319_657.8, abs <= 0.5);

        roundtrip(&poly, &[(40., -75.), (30., -96.), (-20., -120.), (60., -50.)], 1e-9);

        // The equator
        let (xy, _) = poly.forward(0., rad(-90.))?;
        let ((lat, lon), _) = poly.inverse(xy)?;
        assert_eq!(lat, 0.);
        assert_float_eq!(lon, rad(-90.), abs <= 1e-12);
        Ok(())
    }

    #[test]
    fn warnings() -> Result<(), Status> {
        let poly = Polyconic::new(&OriginParameters::default(), &Ellipsoid::default())?;
        let (_, warnings) = poly.forward(rad(10.), rad(100.))?;
        assert!(warnings.contains(Issue::LongitudeWarning));
        assert!(poly.inverse(MapCoordinates::new(3e7, 0.)).is_err());
        Ok(())
    }
}
