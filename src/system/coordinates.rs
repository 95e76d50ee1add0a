//! Coordinate tuples. Angles in radians, distances in metres.

use super::{CoordinateType, Hemisphere};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeodeticCoordinates {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl GeodeticCoordinates {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> GeodeticCoordinates {
        GeodeticCoordinates {
            longitude,
            latitude,
            height,
        }
    }

    /// Construct from angles in degrees
    pub fn degrees(longitude: f64, latitude: f64, height: f64) -> GeodeticCoordinates {
        GeodeticCoordinates::new(longitude.to_radians(), latitude.to_radians(), height)
    }
}

/// Geocentric and local cartesian coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartesianCoordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapCoordinates {
    pub easting: f64,
    pub northing: f64,
}

impl MapCoordinates {
    pub fn new(easting: f64, northing: f64) -> MapCoordinates {
        MapCoordinates { easting, northing }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UtmCoordinates {
    pub easting: f64,
    pub northing: f64,
    /// 1..=60
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

impl Default for UtmCoordinates {
    fn default() -> Self {
        UtmCoordinates {
            easting: 500_000.,
            northing: 0.,
            zone: 31,
            hemisphere: Hemisphere::North,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpsCoordinates {
    pub easting: f64,
    pub northing: f64,
    pub hemisphere: Hemisphere,
}

impl Default for UpsCoordinates {
    fn default() -> Self {
        UpsCoordinates {
            easting: 2_000_000.,
            northing: 2_000_000.,
            hemisphere: Hemisphere::North,
        }
    }
}

/// The coordinates of a point, bound to the coordinate system they belong to
#[derive(Clone, Debug, PartialEq)]
pub enum Coordinates {
    Geodetic(GeodeticCoordinates),
    Georef(String),
    Geocentric(CartesianCoordinates),
    LocalCartesian(CartesianCoordinates),
    Mgrs(String),
    Utm(UtmCoordinates),
    Ups(UpsCoordinates),
    AlbersEqualAreaConic(MapCoordinates),
    AzimuthalEquidistant(MapCoordinates),
    Bng(String),
    Bonne(MapCoordinates),
    Cassini(MapCoordinates),
    CylindricalEqualArea(MapCoordinates),
    Eckert4(MapCoordinates),
    Eckert6(MapCoordinates),
    EquidistantCylindrical(MapCoordinates),
    Gnomonic(MapCoordinates),
    LambertConformalConic1(MapCoordinates),
    LambertConformalConic2(MapCoordinates),
    Mercator(MapCoordinates),
    MillerCylindrical(MapCoordinates),
    Mollweide(MapCoordinates),
    Neys(MapCoordinates),
    Nzmg(MapCoordinates),
    ObliqueMercator(MapCoordinates),
    Orthographic(MapCoordinates),
    PolarStereographic(MapCoordinates),
    Polyconic(MapCoordinates),
    Sinusoidal(MapCoordinates),
    Stereographic(MapCoordinates),
    TransverseCylindricalEqualArea(MapCoordinates),
    TransverseMercator(MapCoordinates),
    VanDerGrinten(MapCoordinates),
}

impl Coordinates {
    pub fn kind(&self) -> CoordinateType {
        use CoordinateType as C;
        match self {
            Coordinates::Geodetic(_) => C::Geodetic,
            Coordinates::Georef(_) => C::Georef,
            Coordinates::Geocentric(_) => C::Geocentric,
            Coordinates::LocalCartesian(_) => C::LocalCartesian,
            Coordinates::Mgrs(_) => C::Mgrs,
            Coordinates::Utm(_) => C::Utm,
            Coordinates::Ups(_) => C::Ups,
            Coordinates::AlbersEqualAreaConic(_) => C::AlbersEqualAreaConic,
            Coordinates::AzimuthalEquidistant(_) => C::AzimuthalEquidistant,
            Coordinates::Bng(_) => C::Bng,
            Coordinates::Bonne(_) => C::Bonne,
            Coordinates::Cassini(_) => C::Cassini,
            Coordinates::CylindricalEqualArea(_) => C::CylindricalEqualArea,
            Coordinates::Eckert4(_) => C::Eckert4,
            Coordinates::Eckert6(_) => C::Eckert6,
            Coordinates::EquidistantCylindrical(_) => C::EquidistantCylindrical,
            Coordinates::Gnomonic(_) => C::Gnomonic,
            Coordinates::LambertConformalConic1(_) => C::LambertConformalConic1,
            Coordinates::LambertConformalConic2(_) => C::LambertConformalConic2,
            Coordinates::Mercator(_) => C::Mercator,
            Coordinates::MillerCylindrical(_) => C::MillerCylindrical,
            Coordinates::Mollweide(_) => C::Mollweide,
            Coordinates::Neys(_) => C::Neys,
            Coordinates::Nzmg(_) => C::Nzmg,
            Coordinates::ObliqueMercator(_) => C::ObliqueMercator,
            Coordinates::Orthographic(_) => C::Orthographic,
            Coordinates::PolarStereographic(_) => C::PolarStereographic,
            Coordinates::Polyconic(_) => C::Polyconic,
            Coordinates::Sinusoidal(_) => C::Sinusoidal,
            Coordinates::Stereographic(_) => C::Stereographic,
            Coordinates::TransverseCylindricalEqualArea(_) => C::TransverseCylindricalEqualArea,
            Coordinates::TransverseMercator(_) => C::TransverseMercator,
            Coordinates::VanDerGrinten(_) => C::VanDerGrinten,
        }
    }

    /// Wrap plain map coordinates in the variant for `kind`. Returns `None`
    /// for the systems whose coordinates are not (easting, northing) pairs.
    pub fn map(kind: CoordinateType, easting: f64, northing: f64) -> Option<Coordinates> {
        use CoordinateType as C;
        let m = MapCoordinates::new(easting, northing);
        Some(match kind {
            C::AlbersEqualAreaConic => Coordinates::AlbersEqualAreaConic(m),
            C::AzimuthalEquidistant => Coordinates::AzimuthalEquidistant(m),
            C::Bonne => Coordinates::Bonne(m),
            C::Cassini => Coordinates::Cassini(m),
            C::CylindricalEqualArea => Coordinates::CylindricalEqualArea(m),
            C::Eckert4 => Coordinates::Eckert4(m),
            C::Eckert6 => Coordinates::Eckert6(m),
            C::EquidistantCylindrical => Coordinates::EquidistantCylindrical(m),
            C::Gnomonic => Coordinates::Gnomonic(m),
            C::LambertConformalConic1 => Coordinates::LambertConformalConic1(m),
            C::LambertConformalConic2 => Coordinates::LambertConformalConic2(m),
            C::Mercator => Coordinates::Mercator(m),
            C::MillerCylindrical => Coordinates::MillerCylindrical(m),
            C::Mollweide => Coordinates::Mollweide(m),
            C::Neys => Coordinates::Neys(m),
            C::Nzmg => Coordinates::Nzmg(m),
            C::ObliqueMercator => Coordinates::ObliqueMercator(m),
            C::Orthographic => Coordinates::Orthographic(m),
            C::PolarStereographic => Coordinates::PolarStereographic(m),
            C::Polyconic => Coordinates::Polyconic(m),
            C::Sinusoidal => Coordinates::Sinusoidal(m),
            C::Stereographic => Coordinates::Stereographic(m),
            C::TransverseCylindricalEqualArea => Coordinates::TransverseCylindricalEqualArea(m),
            C::TransverseMercator => Coordinates::TransverseMercator(m),
            C::VanDerGrinten => Coordinates::VanDerGrinten(m),
            _ => return None,
        })
    }

    /// The (easting, northing) pair of map projection coordinates
    pub fn as_map(&self) -> Option<MapCoordinates> {
        match self {
            Coordinates::AlbersEqualAreaConic(m)
            | Coordinates::AzimuthalEquidistant(m)
            | Coordinates::Bonne(m)
            | Coordinates::Cassini(m)
            | Coordinates::CylindricalEqualArea(m)
            | Coordinates::Eckert4(m)
            | Coordinates::Eckert6(m)
            | Coordinates::EquidistantCylindrical(m)
            | Coordinates::Gnomonic(m)
            | Coordinates::LambertConformalConic1(m)
            | Coordinates::LambertConformalConic2(m)
            | Coordinates::Mercator(m)
            | Coordinates::MillerCylindrical(m)
            | Coordinates::Mollweide(m)
            | Coordinates::Neys(m)
            | Coordinates::Nzmg(m)
            | Coordinates::ObliqueMercator(m)
            | Coordinates::Orthographic(m)
            | Coordinates::PolarStereographic(m)
            | Coordinates::Polyconic(m)
            | Coordinates::Sinusoidal(m)
            | Coordinates::Stereographic(m)
            | Coordinates::TransverseCylindricalEqualArea(m)
            | Coordinates::TransverseMercator(m)
            | Coordinates::VanDerGrinten(m) => Some(*m),
            _ => None,
        }
    }

    /// The default coordinates of a coordinate system
    pub fn default_for(kind: CoordinateType) -> Coordinates {
        use CoordinateType as C;
        match kind {
            C::Geodetic => Coordinates::Geodetic(GeodeticCoordinates::default()),
            C::Georef => Coordinates::Georef("NGAA0000000000".to_string()),
            C::Geocentric => Coordinates::Geocentric(CartesianCoordinates::default()),
            C::LocalCartesian => Coordinates::LocalCartesian(CartesianCoordinates::default()),
            C::Mgrs => Coordinates::Mgrs("31NEA0000000000".to_string()),
            C::Utm => Coordinates::Utm(UtmCoordinates::default()),
            C::Ups => Coordinates::Ups(UpsCoordinates::default()),
            C::Bng => Coordinates::Bng("SV 0000000000".to_string()),
            kind => Coordinates::map(kind, 0., 0.).unwrap_or(Coordinates::Geodetic(GeodeticCoordinates::default())),
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------
