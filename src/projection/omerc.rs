//! Hotine Oblique Mercator, two point form, Snyder (1987) ch. 9
use super::*;
use crate::math::ancillary::{latitude_from_ts, ts};

const MAX_DELTA: f64 = 40_000_000.0;

#[derive(Clone, Debug)]
pub struct ObliqueMercator {
    e: f64,
    a_big: f64,
    b: f64,
    e_big: f64,
    // (sin, cos) of the angle between the central line and the
    // meridian, on the aposphere, and of the azimuth of the central line
    gamma: (f64, f64),
    azimuth: (f64, f64),
    // The longitude where the central line crosses the equator of the aposphere
    origin_longitude: f64,
    // u of the projection center
    u_center: f64,
    false_easting: f64,
    false_northing: f64,
}

impl ObliqueMercator {
    pub fn new(p: &ObliqueMercatorParameters, ellps: &Ellipsoid) -> Result<ObliqueMercator, Status> {
        let open = |lat: f64| lat <= -FRAC_PI_2 || lat >= FRAC_PI_2;
        let mut status = check_ellipsoid(ellps);
        if open(p.origin_latitude) {
            status |= Issue::OriginLatitude;
        }
        if open(p.latitude_1) || p.latitude_1 == 0. {
            status |= Issue::Latitude1;
        }
        if open(p.latitude_2) {
            status |= Issue::Latitude2;
        }
        if p.latitude_1 == p.latitude_2 {
            status |= Issue::EqualLatitudes;
        }
        if (p.latitude_1 < 0. && p.latitude_2 > 0.) || (p.latitude_1 > 0. && p.latitude_2 < 0.) {
            status |= Issue::Hemisphere;
        }
        status |= check_longitude(p.longitude_1, Issue::Longitude1);
        status |= check_longitude(p.longitude_2, Issue::Longitude2);
        if !(0.3..=3.0).contains(&p.scale_factor) {
            status |= Issue::ScaleFactor;
        }
        status.into_result()?;

        let a = ellps.semimajor_axis();
        let e = ellps.eccentricity();
        let es = ellps.eccentricity_squared();
        let one_es = 1. - es;

        let (sin0, cos0) = p.origin_latitude.sin_cos();
        let b = (1. + es * cos0.powi(4) / one_es).sqrt();
        let a_big = a * b * p.scale_factor * one_es.sqrt() / (1. - es * sin0 * sin0);

        let t0 = ts((sin0, cos0), e);
        let t1 = ts(p.latitude_1.sin_cos(), e);
        let t2 = ts(p.latitude_2.sin_cos(), e);

        let d = b * one_es.sqrt() / (cos0 * (1. - es * sin0 * sin0).sqrt());
        let d2_minus_1 = (d * d).max(1.) - 1.;
        let root = d2_minus_1.sqrt();
        let e_big = if d2_minus_1 > 1e-10 {
            let sign = if p.origin_latitude >= 0. { 1. } else { -1. };
            (d + sign * root) * t0.powf(b)
        } else {
            d * t0.powf(b)
        };

        let h = t1.powf(b);
        let l = t2.powf(b);
        let f = e_big / h;
        let g = (f - 1. / f) / 2.;
        let j = (e_big * e_big - l * h) / (e_big * e_big + l * h);
        let pp = (l - h) / (l + h);

        let lon1 = p.longitude_1;
        let mut lon2 = p.longitude_2;
        if lon1 - lon2 < -PI {
            lon2 -= TAU;
        }
        if lon1 - lon2 > PI {
            lon2 += TAU;
        }
        let mut origin_longitude = (lon1 + lon2) / 2. - (j * (b * (lon1 - lon2) / 2.).tan() / pp).atan() / b;
        if lon1 - origin_longitude < -PI {
            origin_longitude -= TAU;
        }
        if lon1 - origin_longitude > PI {
            origin_longitude += TAU;
        }

        let gamma = ((b * (lon1 - origin_longitude)).sin() / g).atan();
        let azimuth = (d * gamma.sin()).asin();
        let mut u_center = a_big / b * (root / azimuth.cos()).atan();
        if p.origin_latitude < 0. {
            u_center = -u_center;
        }

        Ok(ObliqueMercator {
            e,
            a_big,
            b,
            e_big,
            gamma: gamma.sin_cos(),
            azimuth: azimuth.sin_cos(),
            origin_longitude,
            u_center,
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }

    fn warnings(&self, longitude: f64) -> Status {
        if delta_longitude(longitude, self.origin_longitude).abs() >= FRAC_PI_2 {
            return Status::from(Issue::LongitudeWarning);
        }
        Status::NONE
    }
}

impl Projection for ObliqueMercator {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.origin_longitude);
        let (sin_gamma, cos_gamma) = self.gamma;
        let a_over_b = self.a_big / self.b;

        let (u, v) = if (latitude.abs() - FRAC_PI_2).abs() > 1e-10 {
            let q = self.e_big / ts(latitude.sin_cos(), self.e).powf(self.b);
            let s = (q - 1. / q) / 2.;
            let t = (q + 1. / q) / 2.;
            let b_dlam = self.b * dlam;
            let vv = b_dlam.sin();
            let uu = (-vv * cos_gamma + s * sin_gamma) / t;
            // The poles of the aposphere project to infinity
            if (uu.abs() - 1.).abs() < 1e-10 {
                return Err(Status::from(Issue::Longitude));
            }
            let v = a_over_b * ((1. - uu) / (1. + uu)).ln() / 2.;
            let cos_b_dlam = b_dlam.cos();
            let u = if cos_b_dlam.abs() < 1e-10 {
                self.a_big * b_dlam
            } else {
                a_over_b * ((s * cos_gamma + vv * sin_gamma) / cos_b_dlam).atan()
            };
            (u, v)
        } else {
            let half_gamma = self.gamma.0.atan2(self.gamma.1) / 2.;
            let v = if latitude > 0. {
                a_over_b * (FRAC_PI_4 - half_gamma).tan().ln()
            } else {
                a_over_b * (FRAC_PI_4 + half_gamma).tan().ln()
            };
            (a_over_b * latitude, v)
        };
        let u = u - self.u_center;

        let (sin_az, cos_az) = self.azimuth;
        let easting = self.false_easting + v * cos_az + u * sin_az;
        let northing = self.false_northing + u * cos_az - v * sin_az;
        Ok((MapCoordinates::new(easting, northing), self.warnings(longitude)))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (MAX_DELTA, MAX_DELTA)).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;
        let (sin_az, cos_az) = self.azimuth;
        let (sin_gamma, cos_gamma) = self.gamma;
        let b_over_a = self.b / self.a_big;

        let v = dx * cos_az - dy * sin_az;
        let u = dy * cos_az + dx * sin_az + self.u_center;

        let q = (-v * b_over_a).exp();
        let s = (q - 1. / q) / 2.;
        let t = (q + 1. / q) / 2.;
        let vv = (u * b_over_a).sin();
        let uu = (vv * cos_gamma + s * sin_gamma) / t;

        let (latitude, longitude) = if (uu.abs() - 1.).abs() < 1e-10 {
            (FRAC_PI_2.copysign(uu), self.origin_longitude)
        } else {
            let t = (self.e_big / ((1. + uu) / (1. - uu)).sqrt()).powf(1. / self.b);
            let latitude = latitude_from_ts(t, self.e);
            let dlam = (s * cos_gamma - vv * sin_gamma).atan2((u * b_over_a).cos()) / self.b;
            (latitude, self.origin_longitude - dlam)
        };

        let latitude = output_latitude(latitude);
        let longitude = output_longitude(longitude);
        Ok(((latitude, longitude), self.warnings(longitude)))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn oblique_mercator() -> Result<(), Status> {
        let omerc = ObliqueMercator::new(&ObliqueMercatorParameters::default(), &Ellipsoid::default())?;

        // Both defining points lie on the central line, v = 0
        let (sin_az, cos_az) = omerc.azimuth;
        for (lat, lon) in [(40_f64, -5_f64), (50., 5.)] {
            let (xy, warnings) = omerc.forward(lat.to_radians(), lon.to_radians())?;
            assert!(warnings.is_empty());
            assert_float_eq!(xy.easting * cos_az - xy.northing * sin_az, 0., abs <= 1e-5);
        }

        roundtrip(&omerc, &[(45., 0.), (40., -5.), (50., 5.), (-10., 30.), (70., -60.)], 1e-9);

        let (_, warnings) = omerc.forward(0., 120_f64.to_radians())?;
        assert!(warnings.contains(Issue::LongitudeWarning));
        Ok(())
    }

    #[test]
    fn parameter_checks() {
        let p = ObliqueMercatorParameters {
            latitude_1: 0.,
            latitude_2: 0.,
            longitude_2: 10.,
            scale_factor: 5.,
            ..Default::default()
        };
        let Err(status) = ObliqueMercator::new(&p, &Ellipsoid::default()) else {
            panic!("Expected parameter errors");
        };
        for issue in [Issue::Latitude1, Issue::EqualLatitudes, Issue::Longitude2, Issue::ScaleFactor] {
            assert!(status.contains(issue), "{issue:?}");
        }

        let p = ObliqueMercatorParameters {
            latitude_2: -50_f64.to_radians(),
            ..Default::default()
        };
        let Err(status) = ObliqueMercator::new(&p, &Ellipsoid::default()) else {
            panic!("Expected a hemisphere error");
        };
        assert!(status.contains(Issue::Hemisphere));
    }
}
