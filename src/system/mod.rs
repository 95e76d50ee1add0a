//! The coordinate systems known to the engine, their parameters and coordinates.

mod coordinates;
mod parameters;

pub use coordinates::*;
pub use parameters::*;

use crate::status::ReturnCode;
use std::fmt;

// Generate the CoordinateType enum and its name/code lookup table
macro_rules! coordinate_systems {
    ($($variant:ident => ($code:literal, $name:literal)),+ $(,)?) => {
        /// The 33 coordinate systems. The discriminant is the external index.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum CoordinateType {
            $($variant),+
        }

        impl CoordinateType {
            pub const ALL: [CoordinateType; 33] = [$(CoordinateType::$variant),+];

            /// The stable two letter code
            pub fn code(self) -> &'static str {
                match self {
                    $(CoordinateType::$variant => $code),+
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(CoordinateType::$variant => $name),+
                }
            }
        }
    };
}

coordinate_systems! {
    Geodetic => ("GD", "Geodetic"),
    Georef => ("GE", "GEOREF"),
    Geocentric => ("GC", "Geocentric"),
    LocalCartesian => ("LC", "Local Cartesian"),
    Mgrs => ("MG", "Military Grid Reference System (MGRS)"),
    Utm => ("UT", "Universal Transverse Mercator (UTM)"),
    Ups => ("UP", "Universal Polar Stereographic (UPS)"),
    AlbersEqualAreaConic => ("AC", "Albers Equal Area Conic"),
    AzimuthalEquidistant => ("AL", "Azimuthal Equidistant (S)"),
    Bng => ("BN", "British National Grid (BNG)"),
    Bonne => ("BF", "Bonne"),
    Cassini => ("CS", "Cassini"),
    CylindricalEqualArea => ("LI", "Cylindrical Equal Area"),
    Eckert4 => ("EF", "Eckert IV (S)"),
    Eckert6 => ("ED", "Eckert VI (S)"),
    EquidistantCylindrical => ("CP", "Equidistant Cylindrical (S)"),
    Gnomonic => ("GN", "Gnomonic (S)"),
    LambertConformalConic1 => ("L1", "Lambert Conformal Conic (1 Standard Parallel)"),
    LambertConformalConic2 => ("LE", "Lambert Conformal Conic (2 Standard Parallel)"),
    Mercator => ("MC", "Mercator"),
    MillerCylindrical => ("MH", "Miller Cylindrical (S)"),
    Mollweide => ("MP", "Mollweide (S)"),
    Neys => ("NY", "Ney's (Modified Lambert Conformal Conic)"),
    Nzmg => ("NT", "New Zealand Map Grid (NZMG)"),
    ObliqueMercator => ("OC", "Oblique Mercator"),
    Orthographic => ("OD", "Orthographic (S)"),
    PolarStereographic => ("PG", "Polar Stereographic"),
    Polyconic => ("PH", "Polyconic"),
    Sinusoidal => ("SA", "Sinusoidal"),
    Stereographic => ("SD", "Stereographic (S)"),
    TransverseCylindricalEqualArea => ("TX", "Transverse Cylindrical Equal Area"),
    TransverseMercator => ("TC", "Transverse Mercator"),
    VanDerGrinten => ("VA", "Van der Grinten"),
}

impl CoordinateType {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<CoordinateType, ReturnCode> {
        CoordinateType::ALL.get(index).copied().ok_or(ReturnCode::INVALID_INDEX)
    }

    /// Look up a coordinate system by its two letter code (case insensitive)
    pub fn from_code(code: &str) -> Result<CoordinateType, ReturnCode> {
        let code = code.trim();
        CoordinateType::ALL
            .iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(code))
            .copied()
            .ok_or(ReturnCode::INVALID_CODE)
    }

    /// The grid reference systems, whose coordinates are strings
    pub fn is_string_system(self) -> bool {
        matches!(self, CoordinateType::Mgrs | CoordinateType::Georef | CoordinateType::Bng)
    }

    /// The systems carrying a (possibly nonzero) height
    pub fn has_height(self) -> bool {
        matches!(
            self,
            CoordinateType::Geodetic | CoordinateType::Geocentric | CoordinateType::LocalCartesian
        )
    }
}

impl fmt::Display for CoordinateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The kind of height carried by geodetic coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HeightType {
    NoHeight,
    #[default]
    EllipsoidHeight,
    GeoidHeight,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

impl Hemisphere {
    pub fn letter(self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }

    pub fn from_letter(letter: char) -> Option<Hemisphere> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            _ => None,
        }
    }

    pub fn of(latitude: f64) -> Hemisphere {
        if latitude < 0. {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }
}

/// The resolution of string output (MGRS, GEOREF, BNG), and of
/// angular output in general. Each step is a factor of ten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    Degree,
    TenMinutes,
    Minute,
    TenSeconds,
    Second,
    #[default]
    TenthOfSecond,
    HundredthOfSecond,
    ThousandthOfSecond,
    TenThousandthOfSecond,
}

impl Precision {
    pub const ALL: [Precision; 9] = [
        Precision::Degree,
        Precision::TenMinutes,
        Precision::Minute,
        Precision::TenSeconds,
        Precision::Second,
        Precision::TenthOfSecond,
        Precision::HundredthOfSecond,
        Precision::ThousandthOfSecond,
        Precision::TenThousandthOfSecond,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// The number of digits per axis used by the grid reference strings
    pub fn string_digits(self) -> usize {
        self.value().min(5) as usize
    }
}

/// Out of range values saturate at the finest precision
impl From<u8> for Precision {
    fn from(value: u8) -> Precision {
        Precision::ALL[(value as usize).min(Precision::ALL.len() - 1)]
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_types() -> Result<(), ReturnCode> {
        for (i, kind) in CoordinateType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(CoordinateType::from_index(i)?, *kind);
            assert_eq!(CoordinateType::from_code(kind.code())?, *kind);
        }
        assert_eq!(CoordinateType::from_code("ut")?, CoordinateType::Utm);
        assert_eq!(CoordinateType::Utm.code(), "UT");
        assert_eq!(CoordinateType::Ups.code(), "UP");
        assert_eq!(CoordinateType::Geodetic.index(), 0);
        assert_eq!(CoordinateType::VanDerGrinten.index(), 32);
        assert_eq!(CoordinateType::from_code("XX"), Err(ReturnCode::INVALID_CODE));
        assert_eq!(CoordinateType::from_index(33), Err(ReturnCode::INVALID_INDEX));

        // Codes are unique
        let mut codes = CoordinateType::ALL.map(|k| k.code()).to_vec();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 33);
        Ok(())
    }

    #[test]
    fn precision() {
        assert_eq!(Precision::default(), Precision::TenthOfSecond);
        assert_eq!(Precision::from(9), Precision::TenThousandthOfSecond);
        assert_eq!(Precision::from(200), Precision::TenThousandthOfSecond);
        assert_eq!(Precision::from(2), Precision::Minute);
        assert_eq!(Precision::from(9).string_digits(), 5);
        assert_eq!(Precision::Minute.string_digits(), 2);
    }

    #[test]
    fn hemisphere() {
        assert_eq!(Hemisphere::from_letter('s'), Some(Hemisphere::South));
        assert_eq!(Hemisphere::from_letter('x'), None);
        assert_eq!(Hemisphere::of(-0.1).letter(), 'S');
        assert_eq!(Hemisphere::of(0.0), Hemisphere::North);
    }
}
