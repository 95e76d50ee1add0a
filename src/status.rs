//! Conversion status and engine return codes.
//!
//! Two separate bit layouts are in play: [`Status`] collects the
//! [`Issue`]s found while converting the coordinates of a single slot,
//! while [`ReturnCode`] reports engine level problems (lifecycle, tables,
//! and the overall outcome of a conversion). Both accumulate: every check
//! that fails contributes its bit, nothing stops at the first problem.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

// ----- I S S U E S -------------------------------------------------------------------

/// A single reason why a coordinate (or a set of parameters) could not be
/// converted cleanly. The discriminants are the bit values of the
/// externally visible status layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Issue {
    OriginLatitude = 0x0000_0001,
    CentralMeridian = 0x0000_0002,
    Easting = 0x0000_0004,
    Northing = 0x0000_0008,
    Radius = 0x0000_0010,
    Hemisphere = 0x0000_0020,
    ScaleFactor = 0x0000_0040,
    LongitudeWarning = 0x0000_0080,
    OriginLongitude = 0x0000_0100,
    DatumWarning = 0x0000_0200,
    FirstStandardParallel = 0x0000_0400,
    SecondStandardParallel = 0x0000_0800,
    EqualStandardParallels = 0x0000_1000,
    Zone = 0x0000_2000,
    ZoneOverride = 0x0000_4000,
    String = 0x0000_8000,
    StringLongitudeMinutes = 0x0001_0000,
    StringLatitudeMinutes = 0x0002_0000,
    StandardParallel = 0x0004_0000,
    Projection = 0x0008_0000,
    Latitude1 = 0x0010_0000,
    Longitude1 = 0x0020_0000,
    Latitude2 = 0x0040_0000,
    Longitude2 = 0x0080_0000,
    EqualLatitudes = 0x0100_0000,
    InvalidArea = 0x0200_0000,
    EllipsoidCode = 0x0400_0000,
    Latitude = 0x1000_0000,
    Longitude = 0x2000_0000,
    SemiMajorAxis = 0x4000_0000,
    InverseFlattening = 0x8000_0000,
}

impl Issue {
    #[rustfmt::skip]
    pub const ALL: [Issue; 31] = [
        Issue::OriginLatitude, Issue::CentralMeridian, Issue::Easting, Issue::Northing,
        Issue::Radius, Issue::Hemisphere, Issue::ScaleFactor, Issue::LongitudeWarning,
        Issue::OriginLongitude, Issue::DatumWarning, Issue::FirstStandardParallel,
        Issue::SecondStandardParallel, Issue::EqualStandardParallels, Issue::Zone,
        Issue::ZoneOverride, Issue::String, Issue::StringLongitudeMinutes,
        Issue::StringLatitudeMinutes, Issue::StandardParallel, Issue::Projection,
        Issue::Latitude1, Issue::Longitude1, Issue::Latitude2, Issue::Longitude2,
        Issue::EqualLatitudes, Issue::InvalidArea, Issue::EllipsoidCode, Issue::Latitude,
        Issue::Longitude, Issue::SemiMajorAxis, Issue::InverseFlattening,
    ];

    pub fn bit(self) -> u32 {
        self as u32
    }

    /// Warnings do not stop a conversion: the result is usable, but the
    /// accuracy estimate is not.
    pub fn is_warning(self) -> bool {
        matches!(self, Issue::LongitudeWarning | Issue::DatumWarning)
    }
}

// ----- S T A T U S -------------------------------------------------------------------

/// The set of [`Issue`]s recorded for one coordinate slot.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Status(u32);

impl Status {
    pub const NONE: Status = Status(0);

    pub fn new() -> Status {
        Status::NONE
    }

    /// Reinterpret a raw status bit mask. Bits not corresponding
    /// to any [`Issue`] are discarded.
    pub fn from_bits(bits: u32) -> Status {
        let valid = Issue::ALL.iter().fold(0, |acc, i| acc | i.bit());
        Status(bits & valid)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn insert(&mut self, issue: Issue) {
        self.0 |= issue.bit();
    }

    pub fn remove(&mut self, issue: Issue) {
        self.0 &= !issue.bit();
    }

    pub fn contains(&self, issue: Issue) -> bool {
        self.0 & issue.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if any issue other than a warning is present
    pub fn has_error(&self) -> bool {
        self.iter().any(|issue| !issue.is_warning())
    }

    pub fn iter(&self) -> impl Iterator<Item = Issue> + '_ {
        Issue::ALL.iter().copied().filter(|issue| self.contains(*issue))
    }

    /// Helper for the validation code of the coordinate system modules:
    /// `Ok(())` if empty, the status itself as an error otherwise.
    pub fn into_result(self) -> Result<(), Status> {
        if self.is_empty() {
            return Ok(());
        }
        Err(self)
    }
}

impl From<Issue> for Status {
    fn from(issue: Issue) -> Status {
        Status(issue.bit())
    }
}

impl FromIterator<Issue> for Status {
    fn from_iter<T: IntoIterator<Item = Issue>>(iter: T) -> Status {
        let mut status = Status::NONE;
        for issue in iter {
            status.insert(issue);
        }
        status
    }
}

impl BitOr for Status {
    type Output = Status;
    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

impl BitOr<Issue> for Status {
    type Output = Status;
    fn bitor(self, rhs: Issue) -> Status {
        Status(self.0 | rhs.bit())
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Status) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<Issue> for Status {
    fn bitor_assign(&mut self, rhs: Issue) {
        self.0 |= rhs.bit();
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ----- R E T U R N   C O D E S -------------------------------------------------------

/// Engine level outcome bits. Callers must mask-test individual bits;
/// the only meaningful equality test is against [`ReturnCode::NO_ERROR`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{}", self.describe(", "))]
pub struct ReturnCode(u32);

#[rustfmt::skip]
impl ReturnCode {
    pub const NO_ERROR:           ReturnCode = ReturnCode(0x0000_0000);
    pub const INPUT_WARNING:      ReturnCode = ReturnCode(0x0000_0001);
    pub const INPUT_ERROR:        ReturnCode = ReturnCode(0x0000_0002);
    pub const OUTPUT_WARNING:     ReturnCode = ReturnCode(0x0000_0004);
    pub const OUTPUT_ERROR:       ReturnCode = ReturnCode(0x0000_0008);
    pub const NOT_INITIALIZED:    ReturnCode = ReturnCode(0x0000_0010);
    pub const ELLIPSOID_ERROR:    ReturnCode = ReturnCode(0x0000_0020);
    pub const DATUM_ERROR:        ReturnCode = ReturnCode(0x0000_0040);
    pub const GEOID_ERROR:        ReturnCode = ReturnCode(0x0000_0080);
    pub const INVALID_TYPE:       ReturnCode = ReturnCode(0x0000_0100);
    pub const INVALID_DIRECTION:  ReturnCode = ReturnCode(0x0000_0200);
    pub const INVALID_STATE:      ReturnCode = ReturnCode(0x0000_0400);
    pub const INVALID_INDEX:      ReturnCode = ReturnCode(0x0000_1000);
    pub const INVALID_CODE:       ReturnCode = ReturnCode(0x0000_2000);
    pub const ELLIPSOID_OVERFLOW: ReturnCode = ReturnCode(0x0000_4000);
    pub const DATUM_OVERFLOW:     ReturnCode = ReturnCode(0x0000_8000);
    pub const DATUM_SIGMA:        ReturnCode = ReturnCode(0x0001_0000);
    pub const DATUM_DOMAIN:       ReturnCode = ReturnCode(0x0002_0000);
    pub const ELLIPSE_IN_USE:     ReturnCode = ReturnCode(0x0004_0000);
    pub const NOT_USERDEF:        ReturnCode = ReturnCode(0x0008_0000);

    // Shared with the status layout, used when defining ellipsoids and datums
    pub const ELLIPSOID_CODE:     ReturnCode = ReturnCode(0x0400_0000);
    pub const LAT:                ReturnCode = ReturnCode(0x1000_0000);
    pub const LON:                ReturnCode = ReturnCode(0x2000_0000);
    pub const A:                  ReturnCode = ReturnCode(0x4000_0000);
    pub const INV_F:              ReturnCode = ReturnCode(0x8000_0000);
}

#[rustfmt::skip]
const RETURN_CODE_DESCRIPTIONS: [(ReturnCode, &str); 24] = [
    (ReturnCode::INPUT_WARNING,      "Warning returned by 1st conversion"),
    (ReturnCode::INPUT_ERROR,        "Error returned by 1st conversion"),
    (ReturnCode::OUTPUT_WARNING,     "Warning returned by 2nd conversion"),
    (ReturnCode::OUTPUT_ERROR,       "Error returned by 2nd conversion"),
    (ReturnCode::NOT_INITIALIZED,    "Engine has not been initialized"),
    (ReturnCode::ELLIPSOID_ERROR,    "Ellipsoid initialization failed"),
    (ReturnCode::DATUM_ERROR,        "Datum initialization failed"),
    (ReturnCode::GEOID_ERROR,        "Geoid initialization failed"),
    (ReturnCode::INVALID_TYPE,       "Invalid coordinate system type"),
    (ReturnCode::INVALID_DIRECTION,  "Invalid direction (input or output)"),
    (ReturnCode::INVALID_STATE,      "Invalid state (interactive or file)"),
    (ReturnCode::INVALID_INDEX,      "Index is an invalid value"),
    (ReturnCode::INVALID_CODE,       "Code was not found in table, or is already in use"),
    (ReturnCode::ELLIPSOID_OVERFLOW, "Ellipsoid table is full"),
    (ReturnCode::DATUM_OVERFLOW,     "3-parameter datum table is full"),
    (ReturnCode::DATUM_SIGMA,        "Standard error values must be positive (or -1 if unknown)"),
    (ReturnCode::DATUM_DOMAIN,       "Invalid local datum domain of validity"),
    (ReturnCode::ELLIPSE_IN_USE,     "Ellipsoid is in use by a datum"),
    (ReturnCode::NOT_USERDEF,        "Not a user defined ellipsoid or datum"),
    (ReturnCode::ELLIPSOID_CODE,     "Invalid ellipsoid code"),
    (ReturnCode::LAT,                "Latitude out of range"),
    (ReturnCode::LON,                "Longitude out of range"),
    (ReturnCode::A,                  "Semi-major axis must be greater than zero"),
    (ReturnCode::INV_F,              "Inverse flattening must be between 250 and 350"),
];

impl ReturnCode {
    pub fn from_bits(bits: u32) -> ReturnCode {
        ReturnCode(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_ok(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: ReturnCode) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ReturnCode) {
        self.0 |= other.0;
    }

    /// True if any bit other than the two conversion warnings is set
    pub fn is_error(&self) -> bool {
        self.0 & !(ReturnCode::INPUT_WARNING.0 | ReturnCode::OUTPUT_WARNING.0) != 0
    }

    /// `Ok(())` if no bit is set, `Err(self)` otherwise
    pub fn into_result(self) -> Result<(), ReturnCode> {
        if self.is_ok() {
            return Ok(());
        }
        Err(self)
    }

    /// One fixed English sentence per bit set, joined by `separator`
    pub fn describe(&self, separator: &str) -> String {
        if self.is_ok() {
            return String::from("No errors");
        }
        RETURN_CODE_DESCRIPTIONS
            .iter()
            .filter(|(code, _)| self.contains(*code))
            .map(|(_, text)| *text)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl BitOr for ReturnCode {
    type Output = ReturnCode;
    fn bitor(self, rhs: ReturnCode) -> ReturnCode {
        ReturnCode(self.0 | rhs.0)
    }
}

impl BitOrAssign for ReturnCode {
    fn bitor_assign(&mut self, rhs: ReturnCode) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReturnCode({:#010x})", self.0)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accumulates() {
        let mut status = Status::new();
        assert!(status.is_empty());
        status |= Issue::Easting;
        status |= Issue::Northing;
        assert!(status.contains(Issue::Easting));
        assert!(status.contains(Issue::Northing));
        assert!(!status.contains(Issue::Zone));
        assert_eq!(status.bits(), 0x0c);
        assert!(status.has_error());

        let warnings = Status::from(Issue::LongitudeWarning) | Issue::DatumWarning;
        assert!(!warnings.has_error());
        assert_eq!(warnings.iter().count(), 2);

        // Unknown bits are discarded
        assert_eq!(Status::from_bits(0x0800_0000 | 0x80).bits(), 0x80);
        assert_eq!(
            Status::from_bits(Issue::InverseFlattening.bit()).iter().next(),
            Some(Issue::InverseFlattening)
        );
    }

    #[test]
    fn return_codes() {
        let code = ReturnCode::NOT_INITIALIZED | ReturnCode::INVALID_TYPE;
        assert!(code.contains(ReturnCode::INVALID_TYPE));
        assert!(!code.contains(ReturnCode::INVALID_STATE));
        assert!(!code.contains(ReturnCode::NO_ERROR));
        assert!(code.is_error());
        assert_eq!(
            code.describe("; "),
            "Engine has not been initialized; Invalid coordinate system type"
        );
        assert_eq!(ReturnCode::NO_ERROR.describe(", "), "No errors");
        assert!(!(ReturnCode::INPUT_WARNING | ReturnCode::OUTPUT_WARNING).is_error());
        assert_eq!(format!("{}", ReturnCode::A), "Semi-major axis must be greater than zero");
    }
}
