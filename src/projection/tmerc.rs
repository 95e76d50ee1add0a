//! Transverse Mercator, following [Engsager & Poder (2007)](crate::Bibliography::Eng07)
use super::*;
use crate::math::{fourier, fourier_coefficients, gudermannian};
use crate::math::{FourierCoefficients, PolynomialCoefficients};

const MAX_LAT: f64 = (PI * 89.99) / 180.0;
const MAX_DELTA_LONG: f64 = FRAC_PI_2;
const WARNING_DELTA_LONG: f64 = (PI * 9.0) / 180.0;
const MAX_DELTA: f64 = 40_000_000.0;

// Beyond this normalized easting the series diverge
const MAX_NORMALIZED_EASTING: f64 = 2.623_395_162_778;

#[rustfmt::skip]
const TRANSVERSE_MERCATOR: PolynomialCoefficients = PolynomialCoefficients {
    // Geodetic to TM. [Engsager & Poder, 2007](crate::Bibliography::Eng07)
    fwd: [
        [1./2.,   -2./3.,   5./16.,   41./180.,   -127./288.0 ,   7891./37800.],
        [0., 13./48.,   -3./5.,   557./1440.,   281./630.,   -1983433./1935360.],
        [0., 0., 61./240.,  -103./140.,   15061./26880.,   167603./181440.],
        [0., 0., 0., 49561./161280.,   -179./168.,   6601661./7257600.],
        [0., 0., 0., 0., 34729./80640.,   -3418889./1995840.],
        [0., 0., 0., 0., 0., 212378941./319334400.]
    ],

    // TM to Geodetic. [Engsager & Poder, 2007](crate::Bibliography::Eng07)
    inv: [
        [-1./2.,   2./3.,   -37./96.,   1./360.,   81./512.,   -96199./604800.],
        [0., -1./48.,   -1./15.,   437./1440.,   -46./105.,   1118711./3870720.],
        [0., 0., -17./480.,   37./840.,   209./4480.,   -5569./90720.],
        [0., 0., 0., -4397./161280.,   11./504.,   830251./7257600.],
        [0., 0., 0., 0., -4583./161280.,   108847./3991680.],
        [0., 0., 0., 0., 0., -20648693./638668800.]
    ]
};

#[derive(Clone, Debug)]
pub struct TransverseMercator {
    ellps: Ellipsoid,
    parameters: ScaledParameters,
    central_meridian: f64,
    // The scaled spherical Earth radius: Qn in Engsager's implementation
    qs: f64,
    // Origin northing minus true northing at the origin latitude
    zb: f64,
    conformal: FourierCoefficients,
    tm: FourierCoefficients,
}

impl TransverseMercator {
    pub fn new(p: &ScaledParameters, ellps: &Ellipsoid) -> Result<TransverseMercator, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        if !(0.3..=3.0).contains(&p.scale_factor) {
            status |= Issue::ScaleFactor;
        }
        status.into_result()?;

        let n = ellps.third_flattening();
        let qs = p.scale_factor * ellps.semimajor_axis() * ellps.normalized_meridian_arc_unit();
        let conformal = ellps.coefficients_for_conformal_latitude_computations();

        // The Fourier series for the transverse mercator coordinates, from
        // [Engsager & Poder, 2007](crate::Bibliography::Eng07), with extensions
        // to 6th order by [Karney, 2011](crate::Bibliography::Kar11).
        let tm = fourier_coefficients(n, &TRANSVERSE_MERCATOR);

        // Conformal latitude value of the latitude-of-origin - Z in Engsager's notation
        let z = ellps.latitude_geographic_to_conformal(p.origin_latitude, &conformal);
        let zb = p.false_northing - qs * (z + fourier::sin(2. * z, &tm.fwd));

        Ok(TransverseMercator {
            ellps: *ellps,
            parameters: *p,
            central_meridian: meridian(p.central_meridian),
            qs,
            zb,
            conformal,
            tm,
        })
    }

    pub fn parameters(&self) -> &ScaledParameters {
        &self.parameters
    }
}

impl Projection for TransverseMercator {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        let mut status = check_geodetic(latitude, longitude);
        if latitude.abs() > MAX_LAT {
            status |= Issue::Latitude;
        }
        let dlam = delta_longitude(longitude, self.central_meridian);
        if dlam.abs() > MAX_DELTA_LONG {
            status |= Issue::Longitude;
        }
        status.into_result()?;

        let mut warnings = Status::new();
        if dlam.abs() > WARNING_DELTA_LONG {
            warnings |= Issue::LongitudeWarning;
        }

        // --- 1. Geographical -> Conformal latitude, rotated longitude
        let lat = self.ellps.latitude_geographic_to_conformal(latitude, &self.conformal);

        // --- 2. Conformal LAT, LNG -> complex spherical LAT
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = dlam.sin_cos();
        let cos_lat_lon = cos_lat * cos_lon;
        let mut lat = sin_lat.atan2(cos_lat_lon);

        // --- 3. Complex spherical N, E -> ellipsoidal normalized N, E
        let tan_lon = sin_lon * cos_lat / sin_lat.hypot(cos_lat_lon);
        let mut lon = tan_lon.asinh();
        let dc = fourier::complex_sin([2. * lat, 2. * lon], &self.tm.fwd);
        lat += dc[0];
        lon += dc[1];

        if lon.abs() > MAX_NORMALIZED_EASTING {
            return Err(Status::from(Issue::Longitude));
        }

        // --- 4. ellipsoidal normalized N, E -> metric N, E
        let easting = self.qs * lon + self.parameters.false_easting;
        let northing = self.qs * lat + self.zb;
        Ok((MapCoordinates::new(easting, northing), warnings))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.parameters.false_easting, self.parameters.false_northing);
        check_extent(xy, origin, (MAX_DELTA, MAX_DELTA)).into_result()?;

        // --- 1. Normalize N, E
        let mut lon = (xy.easting - self.parameters.false_easting) / self.qs;
        let mut lat = (xy.northing - self.zb) / self.qs;
        if lon.abs() > MAX_NORMALIZED_EASTING {
            return Err(Status::from(Issue::Easting));
        }

        // --- 2. Normalized N, E -> complex spherical LAT, LNG
        let dc = fourier::complex_sin([2. * lat, 2. * lon], &self.tm.inv);
        lat += dc[0];
        lon += dc[1];
        lon = gudermannian::fwd(lon);

        // --- 3. Complex spherical LAT -> Gaussian LAT, LNG
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let cos_lat_lon = cos_lat * cos_lon;
        let dlam = sin_lon.atan2(cos_lat_lon);
        let lat = (sin_lat * cos_lon).atan2(sin_lon.hypot(cos_lat_lon));

        // --- 4. Gaussian LAT, LNG -> ellipsoidal LAT, LNG
        let latitude = self.ellps.latitude_conformal_to_geographic(lat, &self.conformal);
        let longitude = output_longitude(dlam + self.central_meridian);

        let mut warnings = Status::new();
        if dlam.abs() > WARNING_DELTA_LONG {
            warnings |= Issue::LongitudeWarning;
        }
        Ok(((output_latitude(latitude), longitude), warnings))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn tmerc() -> Result<(), Status> {
        let p = ScaledParameters {
            scale_factor: 0.9996,
            central_meridian: 9_f64.to_radians(),
            false_easting: 500_000.,
            ..Default::default()
        };
        let tm = TransverseMercator::new(&p, &Ellipsoid::default())?;

        // Validation values from PROJ:
        // echo 12 55 0 0 | cct -d18 +proj=utm +zone=32 | clip
        #[rustfmt::skip]
        let cases = [
            (( 55.,  12.), ( 691_875.632_139_661, 6_098_907.825_005_012)),
            ((-55.,  12.), ( 691_875.632_139_661,-6_098_907.825_005_012)),
            (( 55., -6.), (-455_673.814_189_040, 6_198_246.671_090_279)),
            ((-55., -6.), (-455_673.814_189_040,-6_198_246.671_090_279)),
        ];

        for ((lat, lon), (e, n)) in cases {
            let (xy, warnings) = tm.forward(rad(lat), rad(lon))?;
            assert_float_eq!(xy.easting, e, abs <= 1e-8);
            assert_float_eq!(xy.northing, n, abs <= 1e-8);
            // 15 degrees from the central meridian: usable, but distorted
            assert_eq!(warnings.contains(Issue::LongitudeWarning), lon < 0.);

            let ((lat2, lon2), _) = tm.inverse(xy)?;
            assert_float_eq!(lat2, rad(lat), abs <= 1e-12);
            assert_float_eq!(lon2, rad(lon), abs <= 1e-12);
        }
        Ok(())
    }

    fn rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    #[test]
    fn scale_and_offsets() -> Result<(), Status> {
        // The Ordnance Survey National Grid projection, on the Airy ellipsoid
        let p = ScaledParameters {
            origin_latitude: 49_f64.to_radians(),
            central_meridian: -2_f64.to_radians(),
            scale_factor: 0.999_601_271_7,
            false_easting: 400_000.,
            false_northing: -100_000.,
        };
        let airy = Ellipsoid::from_inverse_flattening(6_377_563.396, 299.324_964_6);
        let tm = TransverseMercator::new(&p, &airy)?;

        // echo 1 52 0 0 | cct -d 15 proj=tmerc lat_0=49 lon_0=-2 k_0=0.9996012717 x_0=400000 y_0=-100000 ellps=airy  --
        let (xy, _) = tm.forward(52_f64.to_radians(), 1_f64.to_radians())?;
        assert_float_eq!(xy.easting, 605_909.130_344_302_4, abs <= 1e-8);
        assert_float_eq!(xy.northing, 237_803.365_171_569_4, abs <= 1e-8);

        roundtrip(&tm, &[(49., -2.), (60., 1.), (50., -8.), (58., -5.)], 1e-11);
        Ok(())
    }

    #[test]
    fn domain() -> Result<(), Status> {
        let tm = TransverseMercator::new(&ScaledParameters::default(), &Ellipsoid::default())?;
        let Err(status) = tm.forward(FRAC_PI_2, 0.) else {
            panic!("Expected a latitude error at the pole");
        };
        assert!(status.contains(Issue::Latitude));
        let Err(status) = tm.forward(0., 2.0) else {
            panic!("Expected a longitude error beyond 90 degrees from the central meridian");
        };
        assert!(status.contains(Issue::Longitude));
        assert!(tm.inverse(MapCoordinates::new(0., 5e7)).is_err());

        let p = ScaledParameters {
            scale_factor: 4.,
            ..Default::default()
        };
        let Err(status) = TransverseMercator::new(&p, &Ellipsoid::default()) else {
            panic!("Expected a scale factor error");
        };
        assert!(status.contains(Issue::ScaleFactor));
        Ok(())
    }
}
