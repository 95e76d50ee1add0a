//! British National Grid, [Ordnance Survey (2018)](crate::Bibliography::Ord18).
//!
//! A BNG reference is a transverse Mercator coordinate on the Airy 1830
//! ellipsoid, with the leading digits replaced by two letters: one for
//! the 500 km square, one for the 100 km square inside it.
use super::tmerc::TransverseMercator;
use super::*;

// The 500 km squares, in (row, column) order from the false origin
const GRID_500: &[u8; 6] = b"STNOHJ";
// The 100 km squares, 5 x 5, rows from the south. Also used for the
// 500 km squares when encoding, on a grid shifted 2 squares west and 1 south.
const GRID_100: &[u8; 25] = b"VWXYZQRSTULMNOPFGHJKABCDE";

const AIRY_A: f64 = 6_377_563.396;
const AIRY_INV_F: f64 = 299.324_964_6;

const ORIGIN_LATITUDE: f64 = (PI * 49.0) / 180.0;
const CENTRAL_MERIDIAN: f64 = (PI * -2.0) / 180.0;
const FALSE_EASTING: f64 = 400_000.;
const FALSE_NORTHING: f64 = -100_000.;
const SCALE_FACTOR: f64 = 0.999_601_271_7;

const MIN_LATITUDE: f64 = (PI * 49.5) / 180.0;
const MAX_LATITUDE: f64 = (PI * 61.5) / 180.0;
const MIN_LONGITUDE: f64 = (PI * -10.0) / 180.0;
const MAX_LONGITUDE: f64 = (PI * 3.5) / 180.0;

const MIN_EASTING: f64 = -133_134.;
const MAX_EASTING: f64 = 759_961.;
const MIN_NORTHING: f64 = -14_829.;
const MAX_NORTHING: f64 = 1_257_875.;

#[derive(Clone, Debug)]
pub struct Bng {
    tm: TransverseMercator,
}

impl Bng {
    /// The grid is only defined on the Airy ellipsoid, and `ellipsoid_code`
    /// must say so ("AA")
    pub fn new(ellipsoid_code: &str) -> Result<Bng, Status> {
        if !ellipsoid_code.eq_ignore_ascii_case("AA") {
            return Err(Status::from(Issue::EllipsoidCode));
        }
        let airy = Ellipsoid::from_inverse_flattening(AIRY_A, AIRY_INV_F);
        Ok(Bng {
            tm: TransverseMercator::new(&Bng::grid_parameters(), &airy)?,
        })
    }

    /// The transverse Mercator parameters of the National Grid
    pub fn grid_parameters() -> ScaledParameters {
        ScaledParameters {
            origin_latitude: ORIGIN_LATITUDE,
            central_meridian: CENTRAL_MERIDIAN,
            scale_factor: SCALE_FACTOR,
            false_easting: FALSE_EASTING,
            false_northing: FALSE_NORTHING,
        }
    }

    pub fn forward(&self, latitude: f64, longitude: f64, precision: Precision) -> Conversion<String> {
        let mut status = Status::new();
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            status |= Issue::Latitude;
        }
        let lon = angular::normalize_longitude(longitude);
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
            status |= Issue::Longitude;
        }
        status.into_result()?;

        let (mut xy, _) = self.tm.forward(latitude, lon)?;
        // Numerical noise at the western and southern edges
        if xy.easting < 0. && xy.easting > -2. {
            xy.easting = 0.;
        }
        if xy.northing < 0. && xy.northing > -2. {
            xy.northing = 0.;
        }
        if !in_grid(xy) {
            return Err(Status::from(Issue::InvalidArea));
        }
        self.from_tm(xy, precision)
    }

    /// Returns the (latitude, longitude) of the southwest corner of the
    /// referenced square
    pub fn inverse(&self, bng: &str) -> Conversion<(f64, f64)> {
        let (xy, _) = self.to_tm(bng)?;
        if !in_grid(xy) {
            return Err(Status::from(Issue::InvalidArea));
        }
        let ((latitude, longitude), _) = self.tm.inverse(xy)?;
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) || !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(Status::from(Issue::InvalidArea));
        }
        Ok(((latitude, longitude), Status::NONE))
    }

    /// The letters-and-digits form of a grid coordinate
    pub fn from_tm(&self, xy: MapCoordinates, precision: Precision) -> Conversion<String> {
        let mut status = Status::new();
        if !(MIN_EASTING..=MAX_EASTING).contains(&xy.easting) {
            status |= Issue::Easting;
        }
        if !(MIN_NORTHING..=MAX_NORTHING).contains(&xy.northing) {
            status |= Issue::Northing;
        }
        status.into_result()?;

        let easting = round_half_even(xy.easting) + 1_000_000;
        let northing = round_half_even(xy.northing) + 500_000;
        let square = |e: i64, n: i64, size: i64| -> Result<u8, Status> {
            let index = (n / size) * 5 + e / size;
            let index = usize::try_from(index).map_err(|_| Status::from(Issue::InvalidArea))?;
            GRID_100.get(index).copied().ok_or_else(|| Status::from(Issue::InvalidArea))
        };
        let first = square(easting, northing, 500_000)?;
        let (easting, northing) = (easting % 500_000, northing % 500_000);
        let second = square(easting, northing, 100_000)?;
        check_area(first, second)?;

        let digits = precision.string_digits();
        let mut bng = format!("{}{} ", first as char, second as char);
        bng += &grid_digits((easting % 100_000) as f64, digits);
        bng += &grid_digits((northing % 100_000) as f64, digits);
        Ok((bng.trim_end().to_string(), Status::NONE))
    }

    /// The grid coordinate of the southwest corner of the referenced square
    pub fn to_tm(&self, bng: &str) -> Conversion<MapCoordinates> {
        let reference = parse(bng)?;
        let (first, second) = (reference.letters[0], reference.letters[1]);
        let invalid = || Status::from(Issue::String);
        let i = GRID_500.iter().position(|&c| c == first).ok_or_else(invalid)?;
        let j = GRID_100.iter().position(|&c| c == second).ok_or_else(invalid)?;

        let easting = reference.easting + (500_000 * (i % 2) + 100_000 * (j % 5)) as f64;
        let northing = reference.northing + (500_000 * (i / 2) + 100_000 * (j / 5)) as f64;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }
}

fn in_grid(xy: MapCoordinates) -> bool {
    (MIN_EASTING..=MAX_EASTING).contains(&xy.easting) && (MIN_NORTHING..=MAX_NORTHING).contains(&xy.northing)
}

/// Round to the nearest integer, halves going to the even neighbour
fn round_half_even(value: f64) -> i64 {
    let whole = value.trunc();
    let fraction = value - whole;
    let mut rounded = whole as i64;
    if fraction > 0.5 || (fraction == 0.5 && rounded % 2 == 1) {
        rounded += 1;
    }
    rounded
}

/// `digits` digits of a distance within a 100 km square. Values rounding
/// up to the next square stay in this one.
fn grid_digits(value: f64, digits: usize) -> String {
    if digits == 0 {
        return String::new();
    }
    let divisor = 10_f64.powi(5 - digits as i32);
    let limit = 10_i64.pow(digits as u32);
    let value = round_half_even(value / divisor).min(limit - 1);
    format!("{value:0digits$}")
}

/// The squares of the lettering grid that lie entirely outside Great Britain
fn check_area(first: u8, second: u8) -> Result<(), Status> {
    let outside = match first {
        b'S' => b"AFL".contains(&second),
        b'N' => second == b'V',
        b'H' => second < b'L',
        b'T' => b"DEJKOPTUXYZ".contains(&second),
        b'O' => b"CDEJKOPTUYZ".contains(&second),
        b'J' => !b"LMQRVW".contains(&second),
        _ => true,
    };
    if outside {
        return Err(Status::from(Issue::InvalidArea));
    }
    Ok(())
}

struct Reference {
    letters: [u8; 2],
    easting: f64,
    northing: f64,
}

/// Two letters, then an even number of digits (at most 10), split equally
/// between easting and northing. Blanks between the groups are ignored.
fn parse(bng: &str) -> Result<Reference, Status> {
    let invalid = || Status::from(Issue::String);
    let text = bng.trim();
    let letters: Vec<u8> = text.bytes().take_while(u8::is_ascii_alphabetic).collect();
    if letters.len() != 2 {
        return Err(invalid());
    }
    let letters = [letters[0].to_ascii_uppercase(), letters[1].to_ascii_uppercase()];
    check_area(letters[0], letters[1])?;

    let digits: Vec<u8> = text[2..].bytes().filter(|c| !c.is_ascii_whitespace()).collect();
    if !digits.iter().all(u8::is_ascii_digit) || digits.len() > 10 || digits.len() % 2 != 0 {
        return Err(invalid());
    }

    let n = digits.len() / 2;
    let mut reference = Reference {
        letters,
        easting: 0.,
        northing: 0.,
    };
    if n > 0 {
        let number = |d: &[u8]| -> Result<f64, Status> {
            let text = std::str::from_utf8(d).map_err(|_| invalid())?;
            text.parse::<f64>().map_err(|_| invalid())
        };
        let multiplier = 10_f64.powi(5 - n as i32);
        reference.easting = number(&digits[..n])? * multiplier;
        reference.northing = number(&digits[n..])? * multiplier;
    }
    Ok(reference)
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
    fn lettering() -> Result<(), Status> {
        let bng = Bng::new("AA")?;

        // The false origin of the grid is the southwest corner of SV
        let (xy, _) = bng.to_tm("SV 0000000000")?;
        assert_eq!((xy.easting, xy.northing), (0., 0.));
        let (xy, _) = bng.to_tm("tq 3000080000")?;
        assert_eq!((xy.easting, xy.northing), (530_000., 180_000.));
        let (xy, _) = bng.to_tm("NN 166 712")?;
        assert_eq!((xy.easting, xy.northing), (216_600., 771_200.));

        let (text, _) = bng.from_tm(MapCoordinates::new(530_000., 180_000.), Precision::TenthOfSecond)?;
        assert_eq!(text, "TQ 3000080000");
        let (text, _) = bng.from_tm(MapCoordinates::new(216_649.9, 771_249.), Precision::TenSeconds)?;
        assert_eq!(text, "NN 166712");
        let (text, _) = bng.from_tm(MapCoordinates::new(216_649.9, 771_249.), Precision::Degree)?;
        assert_eq!(text, "NN");
        Ok(())
    }

    #[test]
    fn geodetic() -> Result<(), Status> {
        let bng = Bng::new("aa")?;

        // Ben Nevis, approximately
        let (lat, lon) = (rad(56.796_9), rad(-5.003_6));
        let (text, _) = bng.forward(lat, lon, Precision::TenthOfSecond)?;
        assert!(text.starts_with("NN 16"), "{text}");

        // A metre grid reference recovers the point to about a metre
        let ((lat2, lon2), _) = bng.inverse(&text)?;
        assert_float_eq!(lat, lat2, abs <= 2e-7);
        assert_float_eq!(lon, lon2, abs <= 4e-7);
        Ok(())
    }

    #[test]
    fn invalid() -> Result<(), Status> {
        let Err(status) = Bng::new("WE") else {
            panic!("Expected an ellipsoid code error");
        };
        assert!(status.contains(Issue::EllipsoidCode));

        let bng = Bng::new("AA")?;
        for bad in ["", "S", "SVX 00", "SV 000", "SV 00a0", "SV 000000000000"] {
            let Err(status) = bng.to_tm(bad) else {
                panic!("Expected {bad} to fail");
            };
            assert!(status.contains(Issue::String), "{bad}");
        }
        // Squares off the coast
        for bad in ["SA 0000", "JA 0000", "XX 0000"] {
            let Err(status) = bng.to_tm(bad) else {
                panic!("Expected {bad} to fail");
            };
            assert!(status.contains(Issue::InvalidArea), "{bad}");
        }

        let Err(status) = bng.forward(rad(45.), rad(20.), Precision::Second) else {
            panic!("Expected a range error");
        };
        assert!(status.contains(Issue::Latitude));
        assert!(status.contains(Issue::Longitude));
        Ok(())
    }

    #[test]
    fn rounding() {
        assert_eq!(round_half_even(2.5), 2);
        assert_eq!(round_half_even(3.5), 4);
        assert_eq!(round_half_even(3.49), 3);
        assert_eq!(grid_digits(99_999.9, 5), "99999");
        assert_eq!(grid_digits(12_345., 2), "12");
    }
}
