//! The World Geographic Reference System, GEOREF.
//!
//! A GEOREF string is two letters for the 15° quadrangle, two letters for
//! the 1° square inside it, and then the minutes of longitude and latitude
//! within that square, with an equal number of digits for each.
use super::*;

// The letters in use: I and O are skipped
const LETTERS: &[u8; 24] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const QUAD: f64 = 15.;
const MIN_LENGTH: usize = 4;
const MAX_LENGTH: usize = 14;

#[derive(Clone, Copy, Debug, Default)]
pub struct Georef;

impl Georef {
    pub fn new() -> Georef {
        Georef
    }

    pub fn forward(&self, latitude: f64, longitude: f64, precision: Precision) -> Conversion<String> {
        check_geodetic(latitude, longitude).into_result()?;

        // The date line is the western edge of the grid
        let mut lon = longitude.to_degrees();
        if lon >= 180. {
            lon -= 360.;
        }
        // The north pole belongs to the topmost row of squares
        let lat = latitude.to_degrees().min(90. - 1e-9);

        // Shift to the positive quadrant
        let lon = lon + 180.;
        let lat = lat + 90.;

        let lon_quad = (lon / QUAD) as usize;
        let lat_quad = (lat / QUAD) as usize;
        let lon_rest = lon - lon_quad as f64 * QUAD;
        let lat_rest = lat - lat_quad as f64 * QUAD;
        let lon_deg = lon_rest as usize;
        let lat_deg = lat_rest as usize;

        let mut georef = String::with_capacity(MAX_LENGTH);
        for index in [lon_quad, lat_quad, lon_deg, lat_deg] {
            georef.push(LETTERS[index.min(LETTERS.len() - 1)] as char);
        }

        let digits = precision.string_digits();
        if digits > 0 {
            georef += &minutes_to_string((lon_rest - lon_deg as f64) * 60., digits);
            georef += &minutes_to_string((lat_rest - lat_deg as f64) * 60., digits);
        }
        Ok((georef, Status::NONE))
    }

    /// Returns the (latitude, longitude) of the southwest corner of the
    /// area referenced
    pub fn inverse(&self, georef: &str) -> Conversion<(f64, f64)> {
        let invalid = || Status::from(Issue::String);
        let text = georef.trim().as_bytes();
        if !georef.is_ascii() || !(MIN_LENGTH..=MAX_LENGTH).contains(&text.len()) || text.len() % 2 != 0 {
            return Err(invalid());
        }

        let index = |c: u8, last: u8| -> Result<f64, Status> {
            let c = c.to_ascii_uppercase();
            if !c.is_ascii_uppercase() || c > last {
                return Err(invalid());
            }
            let position = LETTERS.iter().position(|&l| l == c).ok_or_else(invalid)?;
            Ok(position as f64)
        };

        // 24 quadrangles of longitude, 12 of latitude, 15 squares in each
        let lon_quad = index(text[0], b'Z')?;
        let lat_quad = index(text[1], b'M')?;
        let lon_deg = index(text[2], b'Q')?;
        let lat_deg = index(text[3], b'Q')?;

        let mut longitude = lon_quad * QUAD + lon_deg - 180.;
        let mut latitude = lat_quad * QUAD + lat_deg - 90.;

        let mut status = Status::new();
        if text.len() > MIN_LENGTH {
            let n = (text.len() - MIN_LENGTH) / 2;
            let (lon_digits, lat_digits) = text[MIN_LENGTH..].split_at(n);
            match extract_minutes(lon_digits) {
                Some(minutes) => longitude += minutes / 60.,
                None => status |= Issue::StringLongitudeMinutes,
            }
            match extract_minutes(lat_digits) {
                Some(minutes) => latitude += minutes / 60.,
                None => status |= Issue::StringLatitudeMinutes,
            }
        }
        status.into_result()?;

        Ok(((latitude.to_radians(), longitude.to_radians()), Status::NONE))
    }
}

/// The digits of a minute value: the first two are whole minutes, the rest
/// decimals. A single digit is tens of minutes, and gets a trailing zero.
fn minutes_to_string(minutes: f64, digits: usize) -> String {
    let minutes = minutes.min(59.999);
    let divisor = 10_f64.powi(5 - digits as i32);
    let value = ((minutes * 1000. + 5e-7) / divisor) as u64;
    let mut text = format!("{value:0digits$}");
    if digits == 1 {
        text.push('0');
    }
    text
}

fn extract_minutes(digits: &[u8]) -> Option<f64> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value: f64 = std::str::from_utf8(digits).ok()?.parse().ok()?;
    let minutes = value * 10_f64.powi(2 - digits.len() as i32);
    (minutes <= 60.).then_some(minutes)
}

// ----- T E S T S ---------------------------------------------------------------------
