//! Military Grid Reference System, [DMA (1989)](crate::Bibliography::Dma89).
//!
//! An MGRS reference is a UTM or UPS coordinate, with the leading digits
//! replaced by a latitude band letter and two letters identifying a 100 km
//! grid square. UTM references start with the zone number, UPS references
//! don't.
use super::ups::Ups;
use super::utm::Utm;
use super::*;

const ONE_HT: f64 = 100_000.;
const TWO_MIL: f64 = 2_000_000.;

const MIN_UTM_LATITUDE: f64 = (PI * -80.0) / 180.0;
const MAX_UTM_LATITUDE: f64 = (PI * 84.0) / 180.0;
const MIN_EASTING: f64 = 100_000.;
const MAX_EASTING: f64 = 900_000.;
const MAX_NORTHING: f64 = 10_000_000.;
const MAX_EAST_NORTH: f64 = 4_000_000.;

// Slack, in degrees, when checking a decoded point against its latitude band
const BAND_TOLERANCE: f64 = 0.5;

// Ellipsoids lettered by the older (AL) row scheme
const AL_ELLIPSOIDS: [&str; 4] = ["CC", "CD", "BR", "BN"];

/// A UTM latitude band: its letter, the lowest northing of any 100 km
/// square inside it, and its latitude limits in degrees.
struct Band {
    letter: u8,
    min_northing: f64,
    north: f64,
    south: f64,
}

#[rustfmt::skip]
const BANDS: [Band; 20] = [
    Band { letter: b'C', min_northing: 1_100_000., north: -72., south: -80.5 },
    Band { letter: b'D', min_northing: 2_000_000., north: -64., south: -72. },
    Band { letter: b'E', min_northing: 2_800_000., north: -56., south: -64. },
    Band { letter: b'F', min_northing: 3_700_000., north: -48., south: -56. },
    Band { letter: b'G', min_northing: 4_600_000., north: -40., south: -48. },
    Band { letter: b'H', min_northing: 5_500_000., north: -32., south: -40. },
    Band { letter: b'J', min_northing: 6_400_000., north: -24., south: -32. },
    Band { letter: b'K', min_northing: 7_300_000., north: -16., south: -24. },
    Band { letter: b'L', min_northing: 8_200_000., north:  -8., south: -16. },
    Band { letter: b'M', min_northing: 9_100_000., north:   0., south:  -8. },
    Band { letter: b'N', min_northing:         0., north:   8., south:   0. },
    Band { letter: b'P', min_northing:   800_000., north:  16., south:   8. },
    Band { letter: b'Q', min_northing: 1_700_000., north:  24., south:  16. },
    Band { letter: b'R', min_northing: 2_600_000., north:  32., south:  24. },
    Band { letter: b'S', min_northing: 3_500_000., north:  40., south:  32. },
    Band { letter: b'T', min_northing: 4_400_000., north:  48., south:  40. },
    Band { letter: b'U', min_northing: 5_300_000., north:  56., south:  48. },
    Band { letter: b'V', min_northing: 6_200_000., north:  64., south:  56. },
    Band { letter: b'W', min_northing: 7_000_000., north:  72., south:  64. },
    Band { letter: b'X', min_northing: 7_900_000., north:  84.5, south: 72. },
];

/// The UPS grid zones A, B (south) and Y, Z (north): the range of valid
/// column letters, the last valid row letter, and the false origin of
/// the lettering.
struct PolarZone {
    letter: u8,
    column_low: u8,
    column_high: u8,
    row_high: u8,
    false_easting: f64,
    false_northing: f64,
}

#[rustfmt::skip]
const POLAR_ZONES: [PolarZone; 4] = [
    PolarZone { letter: b'A', column_low: b'J', column_high: b'Z', row_high: b'Z', false_easting:   800_000., false_northing:   800_000. },
    PolarZone { letter: b'B', column_low: b'A', column_high: b'R', row_high: b'Z', false_easting: 2_000_000., false_northing:   800_000. },
    PolarZone { letter: b'Y', column_low: b'J', column_high: b'Z', row_high: b'P', false_easting:   800_000., false_northing: 1_300_000. },
    PolarZone { letter: b'Z', column_low: b'A', column_high: b'J', row_high: b'P', false_easting: 2_000_000., false_northing: 1_300_000. },
];

/// A parsed MGRS string
#[derive(Clone, Debug, PartialEq)]
struct Reference {
    /// 0 for UPS
    zone: u8,
    letters: [u8; 3],
    easting: f64,
    northing: f64,
    digits: usize,
}

#[derive(Clone, Debug)]
pub struct Mgrs {
    utm: Utm,
    ups: Ups,
    // The AA (current) or AL (older) row lettering scheme
    aa_pattern: bool,
}

impl Mgrs {
    /// `ellipsoid_code` selects the lettering scheme: a handful of old
    /// ellipsoids use the AL scheme, everything else the AA scheme
    pub fn new(ellps: &Ellipsoid, ellipsoid_code: &str) -> Result<Mgrs, Status> {
        check_ellipsoid(ellps).into_result()?;
        Ok(Mgrs {
            utm: Utm::new(&UtmParameters::default(), ellps)?,
            ups: Ups::new(ellps)?,
            aa_pattern: !AL_ELLIPSOIDS.contains(&ellipsoid_code),
        })
    }

    pub fn forward(&self, latitude: f64, longitude: f64, precision: Precision) -> Conversion<String> {
        check_geodetic(latitude, longitude).into_result()?;

        if (MIN_UTM_LATITUDE..=MAX_UTM_LATITUDE).contains(&latitude) {
            let (utm, warnings) = self.utm.forward(latitude, longitude)?;
            let mgrs = self.encode_utm(&utm, latitude, precision)?;
            return Ok((mgrs, warnings));
        }
        let (ups, warnings) = self.ups.forward(latitude, longitude)?;
        Ok((self.encode_ups(&ups, precision), warnings))
    }

    /// Returns the (latitude, longitude) of the southwest corner of the
    /// grid cell referenced
    pub fn inverse(&self, mgrs: &str) -> Conversion<(f64, f64)> {
        let reference = parse(mgrs)?;
        if reference.zone == 0 {
            let (ups, _) = self.decode_ups(&reference)?;
            return self.ups.inverse(&ups);
        }
        let (utm, _) = self.decode_utm(&reference)?;
        self.utm.inverse(&utm)
    }

    pub fn from_utm(&self, utm: &UtmCoordinates, precision: Precision) -> Conversion<String> {
        let mut status = Status::new();
        if !(1..=60).contains(&utm.zone) {
            status |= Issue::Zone;
        }
        if !(MIN_EASTING..=MAX_EASTING).contains(&utm.easting) {
            status |= Issue::Easting;
        }
        if !(0.0..=MAX_NORTHING).contains(&utm.northing) {
            status |= Issue::Northing;
        }
        status.into_result()?;

        let ((latitude, longitude), warnings) = self.utm.inverse(utm)?;

        // The western half of zone 32V is lettered as zone 32, even when
        // given in zone 31
        let (lat, lon) = (latitude.to_degrees(), longitude.to_degrees());
        if utm.zone == 31 && (56.0..64.0).contains(&lat) && lon >= 3. {
            let p = UtmParameters {
                zone: 32,
                override_zone: true,
            };
            let (utm32, _) = Utm::new(&p, self.utm.ellipsoid())?.forward(latitude, longitude)?;
            return Ok((self.encode_utm(&utm32, latitude, precision)?, warnings));
        }
        Ok((self.encode_utm(utm, latitude, precision)?, warnings))
    }

    pub fn to_utm(&self, mgrs: &str) -> Conversion<UtmCoordinates> {
        let reference = parse(mgrs)?;
        if reference.zone == 0 {
            return Err(Status::from(Issue::String));
        }
        self.decode_utm(&reference)
    }

    pub fn from_ups(&self, ups: &UpsCoordinates, precision: Precision) -> Conversion<String> {
        let mut status = Status::new();
        if !(0.0..=MAX_EAST_NORTH).contains(&ups.easting) {
            status |= Issue::Easting;
        }
        if !(0.0..=MAX_EAST_NORTH).contains(&ups.northing) {
            status |= Issue::Northing;
        }
        status.into_result()?;
        Ok((self.encode_ups(ups, precision), Status::NONE))
    }

    pub fn to_ups(&self, mgrs: &str) -> Conversion<UpsCoordinates> {
        let reference = parse(mgrs)?;
        if reference.zone != 0 {
            return Err(Status::from(Issue::String));
        }
        self.decode_ups(&reference)
    }

    // The first and last column letter of a zone, and the row offset
    fn grid_values(&self, zone: u8) -> (u8, u8, f64) {
        let set = match zone % 6 {
            0 => 6,
            n => n,
        };
        let (low, high) = match set {
            1 | 4 => (b'A', b'H'),
            2 | 5 => (b'J', b'R'),
            _ => (b'S', b'Z'),
        };
        let offset = match (self.aa_pattern, set % 2 == 0) {
            (true, false) => 0.,
            (true, true) => 500_000.,
            (false, false) => 1_000_000.,
            (false, true) => 1_500_000.,
        };
        (low, high, offset)
    }

    fn encode_utm(&self, utm: &UtmCoordinates, latitude: f64, precision: Precision) -> Result<String, Status> {
        let digits = precision.string_digits();
        let divisor = 10_f64.powi(5 - digits as i32);
        let easting = truncate(utm.easting, divisor);
        let northing = truncate(utm.northing, divisor);

        let band = band_letter(latitude)?;
        let (column_low, _, offset) = self.grid_values(utm.zone);

        let mut grid_northing = northing;
        if grid_northing == MAX_NORTHING {
            grid_northing -= 1.;
        }
        grid_northing %= TWO_MIL;
        grid_northing += offset;
        if grid_northing >= TWO_MIL {
            grid_northing -= TWO_MIL;
        }
        let mut row = b'A' + (grid_northing / ONE_HT) as u8;
        if row > b'H' {
            row += 1;
        }
        if row > b'N' {
            row += 1;
        }

        let mut grid_easting = easting;
        if band == b'V' && utm.zone == 31 && grid_easting == 500_000. {
            grid_easting -= 1.;
        }
        let mut column = column_low + (grid_easting / ONE_HT) as u8 - 1;
        if column_low == b'J' && column > b'N' {
            column += 1;
        }

        let reference = Reference {
            zone: utm.zone,
            letters: [band, column, row],
            easting,
            northing,
            digits,
        };
        Ok(reference.to_string())
    }

    fn decode_utm(&self, reference: &Reference) -> Conversion<UtmCoordinates> {
        let [band, column, row] = reference.letters;
        let zone = reference.zone;

        // Zones 32, 34 and 36 do not exist in band X
        if band == b'X' && matches!(zone, 32 | 34 | 36) {
            return Err(Status::from(Issue::String));
        }
        let band = BANDS
            .iter()
            .find(|b| b.letter == band)
            .ok_or(Status::from(Issue::String))?;

        let (column_low, column_high, offset) = self.grid_values(zone);
        if column < column_low || column > column_high || row > b'V' {
            return Err(Status::from(Issue::String));
        }

        let mut grid_easting = (column - column_low + 1) as f64 * ONE_HT;
        if column_low == b'J' && column > b'O' {
            grid_easting -= ONE_HT;
        }

        let mut row_northing = (row - b'A') as f64 * ONE_HT;
        if row > b'O' {
            row_northing -= ONE_HT;
        }
        if row > b'I' {
            row_northing -= ONE_HT;
        }

        let mut grid_northing = row_northing - offset;
        if grid_northing < 0. {
            grid_northing += TWO_MIL;
        }
        while grid_northing < band.min_northing {
            grid_northing += TWO_MIL;
        }

        let hemisphere = if band.letter < b'N' {
            Hemisphere::South
        } else {
            Hemisphere::North
        };
        let utm = UtmCoordinates {
            easting: grid_easting + reference.easting,
            northing: grid_northing + reference.northing,
            zone,
            hemisphere,
        };

        // The point must actually fall inside the band it claims
        let ((latitude, _), _) = self.utm.inverse(&utm)?;
        let latitude = latitude.to_degrees();
        if latitude < band.south - BAND_TOLERANCE || latitude > band.north + BAND_TOLERANCE {
            return Err(Status::from(Issue::String));
        }
        Ok((utm, Status::NONE))
    }

    fn encode_ups(&self, ups: &UpsCoordinates, precision: Precision) -> String {
        let digits = precision.string_digits();
        let divisor = 10_f64.powi(5 - digits as i32);
        let easting = truncate(ups.easting, divisor);
        let northing = truncate(ups.northing, divisor);

        let east_half = easting >= TWO_MIL;
        let letter = match (ups.hemisphere, east_half) {
            (Hemisphere::North, true) => b'Z',
            (Hemisphere::North, false) => b'Y',
            (Hemisphere::South, true) => b'B',
            (Hemisphere::South, false) => b'A',
        };
        let zone = polar_zone(letter);

        let mut row = b'A' + ((northing - zone.false_northing) / ONE_HT) as u8;
        if row > b'H' {
            row += 1;
        }
        if row > b'N' {
            row += 1;
        }

        let mut column = zone.column_low + ((easting - zone.false_easting) / ONE_HT) as u8;
        if east_half {
            if column > b'C' {
                column += 2;
            }
            if column > b'H' {
                column += 1;
            }
            if column > b'L' {
                column += 3;
            }
        } else {
            if column > b'L' {
                column += 3;
            }
            if column > b'U' {
                column += 2;
            }
        }

        Reference {
            zone: 0,
            letters: [letter, column, row],
            easting,
            northing,
            digits,
        }
        .to_string()
    }

    fn decode_ups(&self, reference: &Reference) -> Conversion<UpsCoordinates> {
        let [letter, column, row] = reference.letters;
        let zone = POLAR_ZONES
            .iter()
            .find(|z| z.letter == letter)
            .ok_or(Status::from(Issue::String))?;

        if column < zone.column_low
            || column > zone.column_high
            || matches!(column, b'D' | b'E' | b'M' | b'N' | b'V' | b'W')
            || row > zone.row_high
        {
            return Err(Status::from(Issue::String));
        }

        let mut grid_northing = (row - b'A') as f64 * ONE_HT + zone.false_northing;
        if row > b'I' {
            grid_northing -= ONE_HT;
        }
        if row > b'O' {
            grid_northing -= ONE_HT;
        }

        let mut grid_easting = (column - zone.column_low) as f64 * ONE_HT + zone.false_easting;
        if zone.column_low != b'A' {
            if column > b'L' {
                grid_easting -= 300_000.;
            }
            if column > b'U' {
                grid_easting -= 200_000.;
            }
        } else {
            if column > b'C' {
                grid_easting -= 200_000.;
            }
            if column > b'I' {
                grid_easting -= ONE_HT;
            }
            if column > b'L' {
                grid_easting -= 300_000.;
            }
        }

        let hemisphere = if letter >= b'Y' {
            Hemisphere::North
        } else {
            Hemisphere::South
        };
        let ups = UpsCoordinates {
            easting: grid_easting + reference.easting,
            northing: grid_northing + reference.northing,
            hemisphere,
        };
        Ok((ups, Status::NONE))
    }
}

fn polar_zone(letter: u8) -> &'static PolarZone {
    match letter {
        b'A' => &POLAR_ZONES[0],
        b'B' => &POLAR_ZONES[1],
        b'Y' => &POLAR_ZONES[2],
        _ => &POLAR_ZONES[3],
    }
}

fn band_letter(latitude: f64) -> Result<u8, Status> {
    let degrees = latitude.to_degrees();
    if (72.0..84.5).contains(&degrees) {
        return Ok(b'X');
    }
    if degrees > -80.5 && degrees < 72. {
        let index = ((degrees + 80.) / 8. + 1e-12).max(0.) as usize;
        return Ok(BANDS[index].letter);
    }
    Err(Status::from(Issue::Latitude))
}

/// Truncate to a multiple of `divisor`, counting values within a
/// micrometre below a multiple as on it
fn truncate(value: f64, divisor: f64) -> f64 {
    ((value + 1e-6) / divisor).floor() * divisor
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.zone != 0 {
            write!(f, "{:02}", self.zone)?;
        }
        for letter in self.letters {
            write!(f, "{}", letter as char)?;
        }
        if self.digits == 0 {
            return Ok(());
        }
        let divisor = 10_f64.powi(5 - self.digits as i32);
        let east = ((self.easting % ONE_HT).min(99_999.) / divisor) as u64;
        let north = ((self.northing % ONE_HT).min(99_999.) / divisor) as u64;
        let width = self.digits;
        write!(f, "{east:0width$}{north:0width$}")
    }
}

/// Split an MGRS string into zone, letters and the in-square offsets
fn parse(mgrs: &str) -> Result<Reference, Status> {
    let invalid = || Status::from(Issue::String);
    if !mgrs.is_ascii() {
        return Err(invalid());
    }
    let text = mgrs.trim().as_bytes();
    let mut i = 0;

    let start = i;
    while i < text.len() && text[i].is_ascii_digit() {
        i += 1;
    }
    let zone = match i - start {
        0 => 0,
        1 | 2 => {
            let zone = std::str::from_utf8(&text[start..i])
                .ok()
                .and_then(|z| z.parse::<u8>().ok())
                .ok_or_else(invalid)?;
            if !(1..=60).contains(&zone) {
                return Err(invalid());
            }
            zone
        }
        _ => return Err(invalid()),
    };

    let start = i;
    while i < text.len() && text[i].is_ascii_alphabetic() {
        i += 1;
    }
    if i - start != 3 {
        return Err(invalid());
    }
    let mut letters = [0_u8; 3];
    for (letter, &c) in letters.iter_mut().zip(&text[start..i]) {
        let c = c.to_ascii_uppercase();
        if c == b'I' || c == b'O' {
            return Err(invalid());
        }
        *letter = c;
    }

    let start = i;
    while i < text.len() && text[i].is_ascii_digit() {
        i += 1;
    }
    if i != text.len() {
        return Err(invalid());
    }
    let count = i - start;
    if count > 10 || count % 2 != 0 {
        return Err(invalid());
    }
    let digits = count / 2;
    let (mut easting, mut northing) = (0., 0.);
    if digits > 0 {
        let value = |bytes: &[u8]| -> Result<f64, Status> {
            std::str::from_utf8(bytes)
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .map(|v| v as f64)
                .ok_or_else(invalid)
        };
        let multiplier = 10_f64.powi(5 - digits as i32);
        easting = value(&text[start..start + digits])? * multiplier;
        northing = value(&text[start + digits..i])? * multiplier;
    }

    Ok(Reference {
        zone,
        letters,
        easting,
        northing,
        digits,
    })
}

// ----- T E S T S ---------------------------------------------------------------------
