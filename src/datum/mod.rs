//! Geodetic datums: the table of known datums, their shifts to and from
//! WGS84, and the accuracy estimates of those shifts.
//!
//! Every datum is related to WGS84 by one of four rules:
//! WGS84 itself (identity), WGS72 (dedicated closed form shift),
//! a 7-parameter Helmert transformation, or a 3-parameter translation
//! with standard errors and a rectangle of validity.

mod accuracy;
mod shift;
pub mod table;

pub use accuracy::ShiftError;
pub use table::{DatumDefinition, DatumTable};

use crate::Error;
use std::f64::consts::{FRAC_PI_2, PI};

/// Arc seconds per radian
pub(crate) const SECONDS_PER_RADIAN: f64 = 206_264.806_247_1;

/// Which rule relates the datum to WGS84
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatumKind {
    ThreeParameter,
    SevenParameter,
    Wgs84,
    Wgs72,
}

/// One row of the datum table. Angles in radians, distances in metres.
#[derive(Clone, Debug, PartialEq)]
pub struct Datum {
    pub code: String,
    pub name: String,
    pub ellipsoid_code: String,
    pub kind: DatumKind,
    /// dx, dy, dz (m), rx, ry, rz (rad), and the scale difference
    pub parameters: [f64; 7],
    /// Standard errors of dx, dy, dz. Negative if unknown.
    pub sigma: [f64; 3],
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
    pub user_defined: bool,
}

impl Datum {
    /// A datum valid everywhere, with all shift parameters zero
    pub(crate) fn global(code: &str, name: &str, ellipsoid_code: &str, kind: DatumKind) -> Datum {
        Datum {
            code: code.to_string(),
            name: name.to_string(),
            ellipsoid_code: ellipsoid_code.to_string(),
            kind,
            parameters: [0.; 7],
            sigma: [0.; 3],
            south: -FRAC_PI_2,
            north: FRAC_PI_2,
            west: -PI,
            east: PI,
            user_defined: false,
        }
    }

    /// Parse a line in the 7-parameter file layout:
    /// `CODE "NAME" ELLIPSOID dx dy dz rx ry rz scale`, rotations in arc seconds
    pub fn parse_seven_parameter(line: &str) -> Result<Option<Datum>, Error> {
        let Some((code, name, values)) = split_datum_line(line)? else {
            return Ok(None);
        };
        let Some((ellipsoid_code, numbers)) = values.split_first() else {
            return Err(Error::Syntax(format!("Missing ellipsoid code: '{line}'")));
        };
        let numbers = parse_numbers::<7>(numbers, line)?;

        let mut datum = Datum::global(&code, &name, ellipsoid_code, DatumKind::SevenParameter);
        datum.parameters = numbers;
        for rotation in &mut datum.parameters[3..6] {
            *rotation /= SECONDS_PER_RADIAN;
        }
        Ok(Some(datum))
    }

    /// Parse a line in the 3-parameter file layout:
    /// `[*]CODE "NAME" ELLIPSOID dx sx dy sy dz sz south north west east`,
    /// rectangle in degrees
    pub fn parse_three_parameter(line: &str) -> Result<Option<Datum>, Error> {
        let Some((code, name, values)) = split_datum_line(line)? else {
            return Ok(None);
        };
        let Some((ellipsoid_code, numbers)) = values.split_first() else {
            return Err(Error::Syntax(format!("Missing ellipsoid code: '{line}'")));
        };
        let [dx, sx, dy, sy, dz, sz, s, n, w, e] = parse_numbers::<10>(numbers, line)?;

        let (code, user_defined) = match code.strip_prefix('*') {
            Some(code) => (code.to_string(), true),
            None => (code, false),
        };

        Ok(Some(Datum {
            code,
            name,
            ellipsoid_code: ellipsoid_code.to_string(),
            kind: DatumKind::ThreeParameter,
            parameters: [dx, dy, dz, 0., 0., 0., 0.],
            sigma: [sx, sy, sz],
            south: s.to_radians(),
            north: n.to_radians(),
            west: w.to_radians(),
            east: e.to_radians(),
            user_defined,
        }))
    }

    /// The line representation used when a 3-parameter table is written back to disk
    pub fn to_three_parameter_line(&self) -> String {
        let code = if self.user_defined {
            format!("*{:<6} ", self.code)
        } else {
            format!("{:<6}  ", self.code)
        };
        let name = format!("\"{}\"", self.name);
        let p = &self.parameters;
        let s = &self.sigma;
        format!(
            "{code}{name:<33}{:<2} {} {} {} {} {} {} {} {} {} {}",
            self.ellipsoid_code,
            p[0],
            s[0],
            p[1],
            s[1],
            p[2],
            s[2],
            self.south.to_degrees(),
            self.north.to_degrees(),
            self.west.to_degrees(),
            self.east.to_degrees()
        )
    }

    /// Is (latitude, longitude) inside the rectangle of validity? Edges included.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }

    /// dx, dy, dz, rx, ry, rz, scale
    pub fn seven_parameters(&self) -> [f64; 7] {
        self.parameters
    }

    /// dx, dy, dz
    pub fn three_parameters(&self) -> [f64; 3] {
        [self.parameters[0], self.parameters[1], self.parameters[2]]
    }

    /// south, north, west, east
    pub fn valid_rectangle(&self) -> [f64; 4] {
        [self.south, self.north, self.west, self.east]
    }
}

// Split a datum file line into code, quoted name, and the remaining items
fn split_datum_line(line: &str) -> Result<Option<(String, String, Vec<&str>)>, Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let Some((code, rest)) = line.split_once(char::is_whitespace) else {
        return Err(Error::Syntax(format!("Incomplete datum line: '{line}'")));
    };

    let rest = rest.trim_start();
    let (name, rest) = match rest.strip_prefix('"') {
        Some(quoted) => {
            let Some((name, rest)) = quoted.split_once('"') else {
                return Err(Error::Syntax(format!("Unterminated datum name: '{line}'")));
            };
            (name.trim().to_string(), rest)
        }
        None => (String::new(), rest),
    };

    Ok(Some((code.to_string(), name, rest.split_whitespace().collect())))
}

fn parse_numbers<const N: usize>(items: &[&str], line: &str) -> Result<[f64; N], Error> {
    if items.len() < N {
        return Err(Error::Syntax(format!("Expected {N} numbers: '{line}'")));
    }
    let mut numbers = [0.; N];
    for (number, item) in numbers.iter_mut().zip(items) {
        *number = item
            .parse::<f64>()
            .map_err(|_| Error::BadParam(item.to_string(), line.to_string()))?;
    }
    Ok(numbers)
}

// ----- T E S T S ---------------------------------------------------------------------
