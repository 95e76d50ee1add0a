//! Datum shifts. Geodetic coordinates are ordered (latitude, longitude, height),
//! angles in radians, heights in metres above the ellipsoid of the datum.

use super::{table::DatumTable, Datum, DatumKind, SECONDS_PER_RADIAN};
use crate::ellipsoid::table::{WGS72_ELLIPSOID_CODE, WGS84_ELLIPSOID_CODE};
use crate::ellipsoid::{Ellipsoid, EllipsoidTable};
use crate::status::ReturnCode;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Above this latitude, Molodensky's formulas are replaced by the
/// geocentric route
const MOLODENSKY_MAX: f64 = 89.75 * PI / 180.0;

type Geodetic = (f64, f64, f64);
type Geocentric = (f64, f64, f64);

// Shared argument checks of the geodetic shift functions
fn check(table: &DatumTable, index: usize, latitude: f64, longitude: f64) -> Result<&Datum, ReturnCode> {
    let mut status = ReturnCode::NO_ERROR;
    let datum = table.entry(index);
    if datum.is_err() {
        status |= ReturnCode::INVALID_INDEX;
    }
    if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
        status |= ReturnCode::LAT;
    }
    if !(-PI..=TAU).contains(&longitude) {
        status |= ReturnCode::LON;
    }
    status.into_result()?;
    datum
}

fn ellipsoid_of(datum: &Datum, ellipsoids: &EllipsoidTable) -> Result<Ellipsoid, ReturnCode> {
    ellipsoids.ellipsoid(&datum.ellipsoid_code).map_err(|_| ReturnCode::ELLIPSOID_CODE)
}

fn wgs84(ellipsoids: &EllipsoidTable) -> Ellipsoid {
    ellipsoids.ellipsoid(WGS84_ELLIPSOID_CODE).unwrap_or_default()
}

fn wgs72(ellipsoids: &EllipsoidTable) -> Ellipsoid {
    ellipsoids
        .ellipsoid(WGS72_ELLIPSOID_CODE)
        .unwrap_or_else(|_| Ellipsoid::from_inverse_flattening(6_378_135.0, 298.26))
}

// Geodetic (lat, lon, h) to geocentric, and back, keeping our argument order
fn to_geocentric(ellps: &Ellipsoid, (lat, lon, h): Geodetic) -> Geocentric {
    ellps.cartesian(lon, lat, h)
}

fn to_geodetic(ellps: &Ellipsoid, (x, y, z): Geocentric) -> Geodetic {
    let (lon, lat, h) = ellps.geographic(x, y, z);
    (lat, lon, h)
}

/// Molodensky's abridged-free (standard) formulas. `da` and `df` are the
/// target minus the source ellipsoid parameters, `a` and `f` those of
/// the source.
pub(crate) fn molodensky(a: f64, da: f64, f: f64, df: f64, shift: [f64; 3], (lat, lon, h): Geodetic) -> Geodetic {
    let [dx, dy, dz] = shift;
    let lon = if lon > PI { lon - TAU } else { lon };

    let es = 2.0 * f - f * f;
    let eps = es / (1.0 - es);
    let (sinlat, coslat) = lat.sin_cos();
    let (sinlon, coslon) = lon.sin_cos();
    let sin2lat = sinlat * sinlat;
    let w = (1.0 - es * sin2lat).sqrt();
    let m = a * (1.0 - es) / w.powi(3);
    let n = a / w;

    let dlat = (coslat * dz - sinlat * coslon * dx - sinlat * sinlon * dy
        + (es * sinlat * coslat / w) * da
        + sinlat * coslat * (2.0 * n + eps * m * sin2lat) * (1.0 - f) * df)
        / (m + h);
    let dlon = (-sinlon * dx + coslon * dy) / ((n + h) * coslat);
    let dh = coslat * coslon * dx + coslat * sinlon * dy + sinlat * dz - w * da
        + (a * (1.0 - f) / w) * sin2lat * df;

    let mut lon = lon + dlon;
    if lon > TAU {
        lon -= TAU;
    }
    if lon < -PI {
        lon += TAU;
    }
    (lat + dlat, lon, h + dh)
}

// Fold latitude back into [-pi/2, pi/2], and longitude into [-pi, pi]
fn fold((lat, lon, h): Geodetic) -> Geodetic {
    let lat = if lat > FRAC_PI_2 {
        FRAC_PI_2 - (lat - FRAC_PI_2)
    } else if lat < -FRAC_PI_2 {
        -FRAC_PI_2 - (lat + FRAC_PI_2)
    } else {
        lat
    };
    let lon = if lon > PI {
        lon - TAU
    } else if lon < -PI {
        lon + TAU
    } else {
        lon
    };
    (lat, lon, h)
}

const Q: f64 = PI / 648_000.0;

fn wgs72_to_wgs84(wgs72: &Ellipsoid, wgs84: &Ellipsoid, (lat, lon, h): Geodetic) -> Geodetic {
    let a72 = wgs72.semimajor_axis();
    let da = wgs84.semimajor_axis() - a72;
    let df = wgs84.flattening() - wgs72.flattening();
    let sinlat = lat.sin();

    let dlat = (4.5 * lat.cos() / (a72 * Q) + df * (2.0 * lat).sin() / Q) / SECONDS_PER_RADIAN;
    let dlon = 0.554 / SECONDS_PER_RADIAN;
    let dh = 4.5 * sinlat + a72 * df * sinlat * sinlat - da + 1.4;
    fold((lat + dlat, lon + dlon, h + dh))
}

fn wgs84_to_wgs72(wgs72: &Ellipsoid, wgs84: &Ellipsoid, (lat, lon, h): Geodetic) -> Geodetic {
    let a84 = wgs84.semimajor_axis();
    let da = wgs72.semimajor_axis() - a84;
    let df = wgs72.flattening() - wgs84.flattening();
    let sinlat = lat.sin();

    let dlat = (-4.5 * lat.cos() / (a84 * Q) + df * (2.0 * lat).sin() / Q) / SECONDS_PER_RADIAN;
    let dlon = -0.554 / SECONDS_PER_RADIAN;
    let dh = -4.5 * sinlat + a84 * df * sinlat * sinlat - da - 1.4;
    fold((lat + dlat, lon + dlon, h + dh))
}

// Helmert (small angle) or translation only, to WGS84
fn helmert_to_wgs84(datum: &Datum, (x, y, z): Geocentric) -> Geocentric {
    let p = &datum.parameters;
    match datum.kind {
        DatumKind::SevenParameter => (
            x + p[0] + p[5] * y - p[4] * z + p[6] * x,
            y + p[1] - p[5] * x + p[3] * z + p[6] * y,
            z + p[2] + p[4] * x - p[3] * y + p[6] * z,
        ),
        _ => (x + p[0], y + p[1], z + p[2]),
    }
}

fn helmert_from_wgs84(datum: &Datum, (x, y, z): Geocentric) -> Geocentric {
    let p = &datum.parameters;
    match datum.kind {
        DatumKind::SevenParameter => (
            x - p[0] - p[5] * y + p[4] * z - p[6] * x,
            y - p[1] + p[5] * x - p[3] * z - p[6] * y,
            z - p[2] - p[4] * x + p[3] * y - p[6] * z,
        ),
        _ => (x - p[0], y - p[1], z - p[2]),
    }
}

impl DatumTable {
    /// Shift geocentric coordinates given in the datum at `index` to WGS84
    pub fn geocentric_shift_to_wgs84(
        &self,
        index: usize,
        xyz: Geocentric,
        ellipsoids: &EllipsoidTable,
    ) -> Result<Geocentric, ReturnCode> {
        let datum = self.entry(index)?;
        Ok(match datum.kind {
            DatumKind::Wgs84 => xyz,
            DatumKind::Wgs72 => {
                let (wgs72, wgs84) = (wgs72(ellipsoids), wgs84(ellipsoids));
                let geo = wgs72_to_wgs84(&wgs72, &wgs84, to_geodetic(&wgs72, xyz));
                to_geocentric(&wgs84, geo)
            }
            DatumKind::SevenParameter | DatumKind::ThreeParameter => helmert_to_wgs84(datum, xyz),
        })
    }

    /// Shift geocentric WGS84 coordinates to the datum at `index`
    pub fn geocentric_shift_from_wgs84(
        &self,
        index: usize,
        xyz: Geocentric,
        ellipsoids: &EllipsoidTable,
    ) -> Result<Geocentric, ReturnCode> {
        let datum = self.entry(index)?;
        Ok(match datum.kind {
            DatumKind::Wgs84 => xyz,
            DatumKind::Wgs72 => {
                let (wgs72, wgs84) = (wgs72(ellipsoids), wgs84(ellipsoids));
                let geo = wgs84_to_wgs72(&wgs72, &wgs84, to_geodetic(&wgs84, xyz));
                to_geocentric(&wgs72, geo)
            }
            DatumKind::SevenParameter | DatumKind::ThreeParameter => helmert_from_wgs84(datum, xyz),
        })
    }

    /// Shift geodetic coordinates given in the datum at `index` to WGS84
    pub fn geodetic_shift_to_wgs84(
        &self,
        index: usize,
        geo: Geodetic,
        ellipsoids: &EllipsoidTable,
    ) -> Result<Geodetic, ReturnCode> {
        let datum = check(self, index, geo.0, geo.1)?;
        let wgs84 = wgs84(ellipsoids);
        match datum.kind {
            DatumKind::Wgs84 => Ok(geo),
            DatumKind::Wgs72 => Ok(wgs72_to_wgs84(&wgs72(ellipsoids), &wgs84, geo)),
            DatumKind::SevenParameter | DatumKind::ThreeParameter => {
                let local = ellipsoid_of(datum, ellipsoids)?;
                if datum.kind == DatumKind::SevenParameter || geo.0.abs() > MOLODENSKY_MAX {
                    let xyz = helmert_to_wgs84(datum, to_geocentric(&local, geo));
                    return Ok(to_geodetic(&wgs84, xyz));
                }
                let (a, f) = (local.semimajor_axis(), local.flattening());
                let da = wgs84.semimajor_axis() - a;
                let df = wgs84.flattening() - f;
                Ok(molodensky(a, da, f, df, datum.three_parameters(), geo))
            }
        }
    }

    /// Shift geodetic WGS84 coordinates to the datum at `index`
    pub fn geodetic_shift_from_wgs84(
        &self,
        index: usize,
        geo: Geodetic,
        ellipsoids: &EllipsoidTable,
    ) -> Result<Geodetic, ReturnCode> {
        let datum = check(self, index, geo.0, geo.1)?;
        let wgs84 = wgs84(ellipsoids);
        match datum.kind {
            DatumKind::Wgs84 => Ok(geo),
            DatumKind::Wgs72 => Ok(wgs84_to_wgs72(&wgs72(ellipsoids), &wgs84, geo)),
            DatumKind::SevenParameter | DatumKind::ThreeParameter => {
                let local = ellipsoid_of(datum, ellipsoids)?;
                if datum.kind == DatumKind::SevenParameter || geo.0.abs() > MOLODENSKY_MAX {
                    let xyz = helmert_from_wgs84(datum, to_geocentric(&wgs84, geo));
                    return Ok(to_geodetic(&local, xyz));
                }
                let (a, f) = (wgs84.semimajor_axis(), wgs84.flattening());
                let da = local.semimajor_axis() - a;
                let df = local.flattening() - f;
                let [dx, dy, dz] = datum.three_parameters();
                Ok(molodensky(a, da, f, df, [-dx, -dy, -dz], geo))
            }
        }
    }

    /// Shift geodetic coordinates from one datum to another. Pairs involving
    /// a 7-parameter datum take the geocentric route, everything else goes
    /// through WGS84 geodetic coordinates.
    pub fn geodetic_datum_shift(
        &self,
        index_in: usize,
        index_out: usize,
        geo: Geodetic,
        ellipsoids: &EllipsoidTable,
    ) -> Result<Geodetic, ReturnCode> {
        let mut status = ReturnCode::NO_ERROR;
        let input = self.entry(index_in);
        let output = self.entry(index_out);
        if input.is_err() || output.is_err() {
            status |= ReturnCode::INVALID_INDEX;
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&geo.0) {
            status |= ReturnCode::LAT;
        }
        if !(-PI..=TAU).contains(&geo.1) {
            status |= ReturnCode::LON;
        }
        status.into_result()?;
        let (input, output) = (input?, output?);

        if index_in == index_out {
            return Ok(geo);
        }

        let seven_in = input.kind == DatumKind::SevenParameter;
        let seven_out = output.kind == DatumKind::SevenParameter;
        let wgs84 = wgs84(ellipsoids);

        if seven_in {
            let xyz = to_geocentric(&ellipsoid_of(input, ellipsoids)?, geo);
            let xyz = helmert_to_wgs84(input, xyz);
            if seven_out {
                let xyz = helmert_from_wgs84(output, xyz);
                return Ok(to_geodetic(&ellipsoid_of(output, ellipsoids)?, xyz));
            }
            let geo = to_geodetic(&wgs84, xyz);
            return self.geodetic_shift_from_wgs84(index_out, geo, ellipsoids);
        }

        let geo = self.geodetic_shift_to_wgs84(index_in, geo, ellipsoids)?;
        if seven_out {
            let xyz = helmert_from_wgs84(output, to_geocentric(&wgs84, geo));
            return Ok(to_geodetic(&ellipsoid_of(output, ellipsoids)?, xyz));
        }
        self.geodetic_shift_from_wgs84(index_out, geo, ellipsoids)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn deg(lat: f64, lon: f64, h: f64) -> Geodetic {
        (lat.to_radians(), lon.to_radians(), h)
    }

    #[test]
    fn wgs72_shift() -> Result<(), ReturnCode> {
        let ellipsoids = EllipsoidTable::builtin();
        let table = DatumTable::builtin();
        let geo = deg(55., 12., 100.);

        let shifted = table.geodetic_shift_to_wgs84(2, geo, &ellipsoids)?;
        // Half a second of longitude eastwards, and a metre or two upwards
        assert!((shifted.1 - geo.1 - 0.554 / SECONDS_PER_RADIAN).abs() < 1e-15);
        assert!((shifted.2 - geo.2).abs() < 10.);

        let back = table.geodetic_shift_from_wgs84(2, shifted, &ellipsoids)?;
        assert!((back.0 - geo.0).abs() < 1e-9);
        assert!((back.1 - geo.1).abs() < 1e-9);
        assert!((back.2 - geo.2).abs() < 1e-3);

        // The geocentric route agrees with the geodetic one
        let wgs72 = ellipsoids.ellipsoid("WD")?;
        let wgs84 = ellipsoids.ellipsoid("WE")?;
        let xyz = table.geocentric_shift_to_wgs84(2, to_geocentric(&wgs72, geo), &ellipsoids)?;
        let geo84 = to_geodetic(&wgs84, xyz);
        assert!((geo84.0 - shifted.0).abs() < 1e-12);
        assert!((geo84.2 - shifted.2).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn three_parameter() -> Result<(), ReturnCode> {
        let ellipsoids = EllipsoidTable::builtin();
        let table = DatumTable::builtin();
        let nas = table.index("NAS-C")?;
        let geo = deg(40., -100., 0.);

        // Molodensky and the full geocentric route agree to the centimetre level
        let shifted = table.geodetic_shift_to_wgs84(nas, geo, &ellipsoids)?;
        let clarke = ellipsoids.ellipsoid("CC")?;
        let xyz = table.geocentric_shift_to_wgs84(nas, to_geocentric(&clarke, geo), &ellipsoids)?;
        let exact = to_geodetic(&Ellipsoid::default(), xyz);
        let metres = 6_400_000.0;
        assert!((shifted.0 - exact.0).abs() * metres < 0.05);
        assert!((shifted.1 - exact.1).abs() * metres < 0.05);
        assert!((shifted.2 - exact.2).abs() < 0.05);

        let back = table.geodetic_shift_from_wgs84(nas, shifted, &ellipsoids)?;
        assert!((back.0 - geo.0).abs() * metres < 0.05);
        assert!((back.1 - geo.1).abs() * metres < 0.05);

        let Err(code) = table.geodetic_shift_to_wgs84(nas, (2., 7., 0.), &ellipsoids) else {
            panic!("Expected failure");
        };
        assert!(code.contains(ReturnCode::LAT) && code.contains(ReturnCode::LON));
        Ok(())
    }

    #[test]
    fn seven_parameter() -> Result<(), ReturnCode> {
        let ellipsoids = EllipsoidTable::builtin();
        let table = DatumTable::builtin();
        let ogb7 = table.index("OGB-7")?;
        let ogbm = table.index("OGB-M")?;
        let geo = deg(52., -1., 50.);

        let there = table.geodetic_datum_shift(ogb7, 1, geo, &ellipsoids)?;
        let back = table.geodetic_datum_shift(1, ogb7, there, &ellipsoids)?;
        // The small angle approximation leaves centimetre level residuals
        assert!((back.0 - geo.0).abs() < 1e-8);
        assert!((back.1 - geo.1).abs() < 1e-8);
        assert!((back.2 - geo.2).abs() < 0.05);

        // The two realizations of OSGB36 agree to within a hundred metres
        let mean = table.geodetic_datum_shift(ogb7, ogbm, geo, &ellipsoids)?;
        assert!((mean.0 - geo.0).abs() * 6_400_000.0 < 100.);
        assert!((mean.1 - geo.1).abs() * 6_400_000.0 < 100.);

        assert_eq!(table.geodetic_datum_shift(ogb7, ogb7, geo, &ellipsoids)?, geo);
        Ok(())
    }

    #[test]
    fn molodensky_wraps_longitude() {
        let (_, lon, _) = molodensky(6_378_137.0, 0., 1. / 298.257, 0., [0., 1000., 0.], (0., PI, 0.));
        assert!(lon < PI + 1e-3 && lon > -PI);
    }
}
