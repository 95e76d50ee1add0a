//! Transverse Cylindrical Equal Area, ellipsoidal form, Snyder (1987) ch. 10
use super::*;
use crate::math::ancillary::{latitude_from_qs, qs};
use crate::math::FourierCoefficients;

const DELTA_EASTING: f64 = 6_398_628.0;

#[derive(Clone, Debug)]
pub struct TransverseCylindricalEqualArea {
    ellps: Ellipsoid,
    rectifying: FourierCoefficients,
    qp: f64,
    m0: f64,
    scale_factor: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl TransverseCylindricalEqualArea {
    pub fn new(p: &ScaledParameters, ellps: &Ellipsoid) -> Result<TransverseCylindricalEqualArea, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        if !(0.3..=3.0).contains(&p.scale_factor) {
            status |= Issue::ScaleFactor;
        }
        status.into_result()?;

        let rectifying = ellps.coefficients_for_rectifying_latitude_computations();
        Ok(TransverseCylindricalEqualArea {
            ellps: *ellps,
            qp: qs(1., ellps.eccentricity()),
            m0: ellps.meridian_distance(p.origin_latitude, &rectifying),
            rectifying,
            scale_factor: p.scale_factor,
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }

    fn authalic(&self, latitude: f64) -> f64 {
        (qs(latitude.sin(), self.ellps.eccentricity()) / self.qp).clamp(-1., 1.).asin()
    }

    fn geographic(&self, authalic: f64) -> Result<f64, Status> {
        latitude_from_qs(self.qp * authalic.sin(), self.ellps.eccentricity()).ok_or(Status::from(Issue::Northing))
    }

    fn northing_range(&self) -> (f64, f64) {
        let quadrant = self.ellps.meridian_quadrant();
        let k = self.scale_factor;
        (k * (-quadrant - self.m0), k * (quadrant - self.m0))
    }
}

impl Projection for TransverseCylindricalEqualArea {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let mut warnings = Status::new();
        if dlam.abs() >= FRAC_PI_2 {
            warnings |= Issue::LongitudeWarning;
        }

        let a = self.ellps.semimajor_axis();
        let es = self.ellps.eccentricity_squared();
        let beta = self.authalic(latitude);
        let beta_c = (beta.tan() / dlam.cos()).atan();
        let phi_c = if (beta_c.abs() - FRAC_PI_2).abs() < 1e-12 {
            beta_c
        } else {
            self.geographic(beta_c)?
        };
        let sin_phi_c = phi_c.sin();

        let x = a * beta.cos() * phi_c.cos() * dlam.sin()
            / (self.scale_factor * beta_c.cos() * (1. - es * sin_phi_c * sin_phi_c).sqrt());
        let y = self.scale_factor * (self.ellps.meridian_distance(phi_c, &self.rectifying) - self.m0);

        let xy = MapCoordinates::new(x + self.false_easting, y + self.false_northing);
        Ok((xy, warnings))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let (min_northing, max_northing) = self.northing_range();
        let mut status = Status::new();
        if dx.abs() > DELTA_EASTING {
            status |= Issue::Easting;
        }
        if !(min_northing - 1e-6..=max_northing + 1e-6).contains(&dy) {
            status |= Issue::Northing;
        }
        status.into_result()?;

        let a = self.ellps.semimajor_axis();
        let es = self.ellps.eccentricity_squared();

        let phi_c = self.ellps.meridian_latitude(self.m0 + dy / self.scale_factor, &self.rectifying);
        if (phi_c.abs() - FRAC_PI_2).abs() < 1e-12 {
            return Ok(((output_latitude(phi_c), self.central_meridian), Status::NONE));
        }
        let sin_phi_c = phi_c.sin();
        let beta_c = self.authalic(phi_c);
        let cos_beta_c = beta_c.cos();

        let t = self.scale_factor * dx * cos_beta_c * (1. - es * sin_phi_c * sin_phi_c).sqrt() / (a * phi_c.cos());
        let beta_prime = -t.clamp(-1., 1.).asin();
        let beta = (beta_prime.cos() * beta_c.sin()).asin();

        let latitude = output_latitude(self.geographic(beta)?);
        let longitude = output_longitude(self.central_meridian - (beta_prime.tan() / cos_beta_c).atan());
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
    fn tcea() -> Result<(), Status> {
        let ellps = Ellipsoid::default();
        let tcea = TransverseCylindricalEqualArea::new(&ScaledParameters::default(), &ellps)?;

        // The central meridian is true to scale
        let rect = ellps.coefficients_for_rectifying_latitude_computations();
        let (xy, _) = tcea.forward(0.7, 0.)?;
        assert_float_eq!(xy.easting, 0., abs <= 1e-8);
        assert_float_eq!(xy.northing, ellps.meridian_distance(0.7, &rect), abs <= 1e-4);

        roundtrip(&tcea, &[(10., 10.), (-45., 60.), (80., -30.), (0., 80.)], 1e-9);

        let p = ScaledParameters {
            origin_latitude: 30_f64.to_radians(),
            central_meridian: 100_f64.to_radians(),
            scale_factor: 0.9,
            false_easting: 1e5,
            false_northing: 2e5,
        };
        let tcea = TransverseCylindricalEqualArea::new(&p, &ellps)?;
        roundtrip(&tcea, &[(30., 100.), (-45., 60.), (60., 150.)], 1e-9);

        let (_, warnings) = tcea.forward(0.1, 0.)?;
        assert!(warnings.contains(Issue::LongitudeWarning));
        Ok(())
    }
}
