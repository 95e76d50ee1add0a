//! 90% circular, linear and spherical error estimates of a datum shift

use super::{table::DatumTable, Datum, DatumKind};
use crate::status::ReturnCode;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// CE90, LE90 and SE90 in metres. Negative values mean "unknown".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShiftError {
    pub ce90: f64,
    pub le90: f64,
    pub se90: f64,
}

impl ShiftError {
    pub const UNKNOWN: ShiftError = ShiftError {
        ce90: -1.0,
        le90: -1.0,
        se90: -1.0,
    };

    pub const ZERO: ShiftError = ShiftError {
        ce90: 0.0,
        le90: 0.0,
        se90: 0.0,
    };
}

// The contribution of a single datum at the given WGS84 location
fn contribution(datum: &Datum, latitude: f64, longitude: f64) -> ShiftError {
    if datum.kind != DatumKind::ThreeParameter {
        return ShiftError::ZERO;
    }
    let [sx, sy, sz] = datum.sigma;
    if sx < 0.0 || sy < 0.0 || sz < 0.0 {
        return ShiftError::UNKNOWN;
    }

    let (sinlat, coslat) = latitude.sin_cos();
    let (sinlon, coslon) = longitude.sin_cos();
    let sigma_lat = (sx * sinlat * coslon).hypot(sy * sinlat * sinlon).hypot(sz * coslat);
    let sigma_lon = (sx * sinlon).hypot(sy * coslon);
    let sigma_h = (sx * coslat * coslon).hypot(sy * coslat * sinlon).hypot(sz * sinlat);

    ShiftError {
        ce90: 2.146 * (sigma_lat + sigma_lon) / 2.0,
        le90: 1.6449 * sigma_h,
        se90: 2.5003 * (sx + sy + sz) / 3.0,
    }
}

// Root sum square, floored at one metre. Unknown if any term is unknown.
fn combine(terms: [f64; 3]) -> Option<f64> {
    if terms.iter().any(|t| *t < 0.0) {
        return None;
    }
    Some(terms.iter().map(|t| t * t).sum::<f64>().sqrt().max(1.0))
}

impl DatumTable {
    /// Combine the error estimate `current` with the contributions of the
    /// input and output datums at the WGS84 location (latitude, longitude).
    /// An unknown circular error makes every estimate unknown, and an
    /// unknown linear error makes the spherical estimate unknown.
    pub fn shift_error(
        &self,
        index_in: usize,
        index_out: usize,
        latitude: f64,
        longitude: f64,
        current: ShiftError,
    ) -> Result<ShiftError, ReturnCode> {
        let mut status = ReturnCode::NO_ERROR;
        let input = self.entry(index_in);
        let output = self.entry(index_out);
        if input.is_err() || output.is_err() {
            status |= ReturnCode::INVALID_INDEX;
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            status |= ReturnCode::LAT;
        }
        if !(-PI..=TAU).contains(&longitude) {
            status |= ReturnCode::LON;
        }
        status.into_result()?;

        if index_in == index_out {
            return Ok(current);
        }
        let i = contribution(input?, latitude, longitude);
        let o = contribution(output?, latitude, longitude);

        let mut result = ShiftError::UNKNOWN;
        let Some(ce90) = combine([current.ce90, i.ce90, o.ce90]) else {
            return Ok(result);
        };
        result.ce90 = ce90;
        let Some(le90) = combine([current.le90, i.le90, o.le90]) else {
            return Ok(result);
        };
        result.le90 = le90;
        if let Some(se90) = combine([current.se90, i.se90, o.se90]) {
            result.se90 = se90;
        }
        Ok(result)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_error() -> Result<(), ReturnCode> {
        let table = DatumTable::builtin();
        let (lat, lon) = (40_f64.to_radians(), -100_f64.to_radians());

        // Same datum: nothing added
        let same = table.shift_error(1, 1, lat, lon, ShiftError::ZERO)?;
        assert_eq!(same, ShiftError::ZERO);

        // WGS84 to WGS72 contributes nothing, but the floor is one metre
        let global = table.shift_error(1, 2, lat, lon, ShiftError::ZERO)?;
        assert_eq!(global, ShiftError { ce90: 1.0, le90: 1.0, se90: 1.0 });

        let nas = table.index("NAS-C")?;
        let local = table.shift_error(nas, 1, lat, lon, ShiftError::ZERO)?;
        assert!(local.ce90 > 5.0 && local.ce90 < 20.0);
        assert!(local.le90 > 5.0 && local.le90 < 20.0);
        assert!((local.se90 - 2.5003 * 16.0 / 3.0).abs() < 1e-9);

        // Unknown standard errors make everything unknown
        let hen = table.index("HEN")?;
        let unknown = table.shift_error(hen, nas, lat, lon, ShiftError::ZERO)?;
        assert_eq!(unknown, ShiftError::UNKNOWN);

        // An unknown linear error only poisons the spherical estimate
        let partial = ShiftError { ce90: 0.0, le90: -1.0, se90: 0.0 };
        let result = table.shift_error(nas, 1, lat, lon, partial)?;
        assert!(result.ce90 > 1.0);
        assert_eq!(result.le90, -1.0);
        assert_eq!(result.se90, -1.0);

        assert!(table.shift_error(0, 1, lat, lon, ShiftError::ZERO).is_err());
        Ok(())
    }
}
