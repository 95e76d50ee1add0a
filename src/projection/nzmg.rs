//! New Zealand Map Grid, a conformal projection by complex polynomials
//! (LINZ, "Conversion between NZMG and geographic coordinates").
//!
//! NZMG is tied to the International 1924 ellipsoid: the constants below
//! are only meaningful for that figure, so the semimajor axis is fixed and
//! the caller verifies the ellipsoid code.
use super::*;

const SEMIMAJOR_AXIS: f64 = 6_378_388.0;
const ORIGIN_LATITUDE: f64 = -41.0; // degrees
const CENTRAL_MERIDIAN: f64 = 173.0; // degrees
const FALSE_EASTING: f64 = 2_510_000.0;
const FALSE_NORTHING: f64 = 6_023_150.0;

const MIN_LATITUDE: f64 = -47.5;
const MAX_LATITUDE: f64 = -33.5;
const MIN_LONGITUDE: f64 = 165.5;
const MAX_LONGITUDE: f64 = 180.0;
const MIN_EASTING: f64 = 1_810_000.0;
const MAX_EASTING: f64 = 3_170_000.0;
const MIN_NORTHING: f64 = 5_290_000.0;
const MAX_NORTHING: f64 = 6_710_000.0;

/// The code of the only ellipsoid NZMG is defined on
pub const ELLIPSOID_CODE: &str = "IN";

// Latitude differences (in units of 10⁵ arc seconds) to isometric latitude differences
#[rustfmt::skip]
const A: [f64; 10] = [
    0.639_917_507_3, -0.135_879_761_3, 0.063_294_409, -0.025_268_53, 0.011_787_9,
    -0.005_516_1, 0.002_690_6, -0.001_333, 0.000_67, -0.000_34,
];

// ... and back
#[rustfmt::skip]
const D: [f64; 9] = [
    1.562_701_424_3, 0.518_540_639_8, -0.033_330_98, -0.105_290_6, -0.036_859_4,
    0.007_317, 0.012_20, 0.003_94, -0.001_3,
];

// The complex polynomial of the forward projection
const B: [[f64; 2]; 6] = [
    [0.755_785_322_8, 0.0],
    [0.249_204_646, 0.003_371_507],
    [-0.001_541_739, 0.041_058_560],
    [-0.101_629_07, 0.017_276_09],
    [-0.266_234_89, -0.362_492_18],
    [-0.687_098_3, -1.165_196_7],
];

// ... and the approximation of its inverse
const C: [[f64; 2]; 6] = [
    [1.323_127_043_9, 0.0],
    [-0.577_245_789, -0.007_809_598],
    [0.508_307_513, -0.112_208_952],
    [-0.150_947_62, 0.182_006_02],
    [1.014_181_79, 1.644_976_96],
    [1.966_054_9, 2.512_764_5],
];

// ----- Complex arithmetic on [re, im] pairs --------------------------------------------

fn mul(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] * b[0] - a[1] * b[1], a[0] * b[1] + a[1] * b[0]]
}

fn div(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    let d = b[0] * b[0] + b[1] * b[1];
    [(a[0] * b[0] + a[1] * b[1]) / d, (a[1] * b[0] - a[0] * b[1]) / d]
}

fn add(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] + b[0], a[1] + b[1]]
}

fn scale(a: [f64; 2], k: f64) -> [f64; 2] {
    [a[0] * k, a[1] * k]
}

/// Σ coefs[n]·zⁿ⁺¹
fn polynomial(coefs: &[[f64; 2]], z: [f64; 2]) -> [f64; 2] {
    let mut power = z;
    let mut sum = [0., 0.];
    for c in coefs {
        sum = add(sum, mul(*c, power));
        power = mul(power, z);
    }
    sum
}

/// Σ coefs[n]·xⁿ⁺¹
fn real_polynomial(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0., |acc, c| (acc + c) * x)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Nzmg;

impl Nzmg {
    pub fn new() -> Nzmg {
        Nzmg
    }

    /// `EllipsoidCode` unless `code` is the International 1924 ellipsoid
    pub fn check_ellipsoid_code(code: &str) -> Status {
        if code.eq_ignore_ascii_case(ELLIPSOID_CODE) {
            return Status::NONE;
        }
        Status::from(Issue::EllipsoidCode)
    }
}

impl Projection for Nzmg {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        let mut status = check_geodetic(latitude, longitude);
        status.into_result()?;

        let lat = latitude.to_degrees();
        let mut lon = longitude.to_degrees();
        if lon < 0. {
            lon += 360.;
        }
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
            status |= Issue::Latitude;
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
            status |= Issue::Longitude;
        }
        status.into_result()?;

        let dphi = (lat - ORIGIN_LATITUDE) * 3600. * 1e-5;
        let dpsi = real_polynomial(&A, dphi);
        let zeta = [dpsi, (lon - CENTRAL_MERIDIAN).to_radians()];
        let z = polynomial(&B, zeta);

        let easting = FALSE_EASTING + SEMIMAJOR_AXIS * z[1];
        let northing = FALSE_NORTHING + SEMIMAJOR_AXIS * z[0];
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let mut status = Status::new();
        if !(MIN_EASTING..=MAX_EASTING).contains(&xy.easting) {
            status |= Issue::Easting;
        }
        if !(MIN_NORTHING..=MAX_NORTHING).contains(&xy.northing) {
            status |= Issue::Northing;
        }
        status.into_result()?;

        let z = [
            (xy.northing - FALSE_NORTHING) / SEMIMAJOR_AXIS,
            (xy.easting - FALSE_EASTING) / SEMIMAJOR_AXIS,
        ];

        // First approximation, then two Newton-Raphson steps
        let mut zeta = polynomial(&C, z);
        for _ in 0..2 {
            let mut numerator = z;
            let mut denominator = B[0];
            let mut power = zeta;
            for (n, b) in B.iter().enumerate().skip(1) {
                // power = ζⁿ
                denominator = add(denominator, scale(mul(*b, power), (n + 1) as f64));
                power = mul(power, zeta);
                numerator = add(numerator, scale(mul(*b, power), n as f64));
            }
            zeta = div(numerator, denominator);
        }

        let dphi = real_polynomial(&D, zeta[0]);
        let latitude = (ORIGIN_LATITUDE + dphi * 1e5 / 3600.).to_radians();
        let longitude = CENTRAL_MERIDIAN.to_radians() + zeta[1];
        Ok(((latitude, output_longitude(longitude)), Status::NONE))
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
    fn complex() {
        assert_eq!(mul([1., 2.], [3., 4.]), [-5., 10.]);
        let q = div([-5., 10.], [3., 4.]);
        assert_float_eq!(q[0], 1., abs <= 1e-15);
        assert_float_eq!(q[1], 2., abs <= 1e-15);
        assert_float_eq!(real_polynomial(&[1., 2.], 3.), 3. + 18., abs <= 1e-15);
    }

    #[test]
    fn nzmg() -> Result<(), Status> {
        let nzmg = Nzmg::new();

        let (xy, _) = nzmg.forward(rad(-41.), rad(173.))?;
        assert_float_eq!(xy.easting, FALSE_EASTING, abs <= 1e-6);
        assert_float_eq!(xy.northing, FALSE_NORTHING, abs <= 1e-6);

        // LINZ worked example, near Cape Reinga
        let (xy, _) = nzmg.forward(rad(-34.444_066), rad(172.739_194))?;
        assert_float_eq!(xy.easting, 2_487_100.638, abs <= 0.1);
        assert_float_eq!(xy.northing, 6_751_049.719, abs <= 0.1);

        roundtrip(&nzmg, &[(-41., 173.), (-34., 172.), (-47., 167.), (-38., 178.), (-45., 170.)], 1e-10);
        Ok(())
    }

    #[test]
    fn domain() {
        let nzmg = Nzmg::new();
        let Err(status) = nzmg.forward(rad(-30.), rad(160.)) else {
            panic!("Expected an error outside New Zealand");
        };
        assert!(status.contains(Issue::Latitude));
        assert!(status.contains(Issue::Longitude));

        let Err(status) = nzmg.inverse(MapCoordinates::new(0., 6e6)) else {
            panic!("Expected an easting error");
        };
        assert!(status.contains(Issue::Easting));
        assert!(!status.contains(Issue::Northing));

        assert!(Nzmg::check_ellipsoid_code("in").is_empty());
        assert!(Nzmg::check_ellipsoid_code("WE").contains(Issue::EllipsoidCode));
    }
}
