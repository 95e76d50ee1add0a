//! Coordinate system parameters. Angles in radians, distances in metres.

use super::{CoordinateType, HeightType};
use crate::math::angular;
use crate::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeodeticParameters {
    pub height_type: HeightType,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalCartesianParameters {
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub origin_height: f64,
    /// Clockwise from north
    pub orientation: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UtmParameters {
    /// 1..=60, only used when `override_zone` is set
    pub zone: u8,
    pub override_zone: bool,
}

/// Projections defined by an origin and two standard parallels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TwoParallelParameters {
    pub origin_latitude: f64,
    pub central_meridian: f64,
    pub std_parallel_1: f64,
    pub std_parallel_2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// Projections defined by an origin only
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OriginParameters {
    pub origin_latitude: f64,
    pub central_meridian: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// Projections defined by an origin and a scale factor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledParameters {
    pub origin_latitude: f64,
    pub central_meridian: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl Default for ScaledParameters {
    fn default() -> Self {
        ScaledParameters {
            origin_latitude: 0.,
            central_meridian: 0.,
            scale_factor: 1.,
            false_easting: 0.,
            false_northing: 0.,
        }
    }
}

/// Projections defined by a central meridian only
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeridianParameters {
    pub central_meridian: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EquidistantCylindricalParameters {
    pub std_parallel: f64,
    pub central_meridian: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeysParameters {
    pub origin_latitude: f64,
    pub central_meridian: f64,
    /// 71 or 74 degrees, north or south
    pub std_parallel_1: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl Default for NeysParameters {
    fn default() -> Self {
        NeysParameters {
            origin_latitude: 80_f64.to_radians(),
            central_meridian: 0.,
            std_parallel_1: 71_f64.to_radians(),
            false_easting: 0.,
            false_northing: 0.,
        }
    }
}

/// The two point form of the oblique Mercator projection
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObliqueMercatorParameters {
    pub origin_latitude: f64,
    pub latitude_1: f64,
    pub longitude_1: f64,
    pub latitude_2: f64,
    pub longitude_2: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl Default for ObliqueMercatorParameters {
    fn default() -> Self {
        ObliqueMercatorParameters {
            origin_latitude: 45_f64.to_radians(),
            latitude_1: 40_f64.to_radians(),
            longitude_1: -5_f64.to_radians(),
            latitude_2: 50_f64.to_radians(),
            longitude_2: 5_f64.to_radians(),
            scale_factor: 1.,
            false_easting: 0.,
            false_northing: 0.,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarStereographicParameters {
    /// The sign selects the pole
    pub latitude_of_true_scale: f64,
    pub longitude_down_from_pole: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl Default for PolarStereographicParameters {
    fn default() -> Self {
        PolarStereographicParameters {
            latitude_of_true_scale: 90_f64.to_radians(),
            longitude_down_from_pole: 0.,
            false_easting: 0.,
            false_northing: 0.,
        }
    }
}

/// The parameters of a coordinate system, bound to the system they belong to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Parameters {
    Geodetic(GeodeticParameters),
    Georef,
    Geocentric,
    LocalCartesian(LocalCartesianParameters),
    Mgrs,
    Utm(UtmParameters),
    Ups,
    AlbersEqualAreaConic(TwoParallelParameters),
    AzimuthalEquidistant(OriginParameters),
    Bng,
    Bonne(OriginParameters),
    Cassini(OriginParameters),
    CylindricalEqualArea(OriginParameters),
    Eckert4(MeridianParameters),
    Eckert6(MeridianParameters),
    EquidistantCylindrical(EquidistantCylindricalParameters),
    Gnomonic(OriginParameters),
    LambertConformalConic1(ScaledParameters),
    LambertConformalConic2(TwoParallelParameters),
    Mercator(ScaledParameters),
    MillerCylindrical(MeridianParameters),
    Mollweide(MeridianParameters),
    Neys(NeysParameters),
    Nzmg,
    ObliqueMercator(ObliqueMercatorParameters),
    Orthographic(OriginParameters),
    PolarStereographic(PolarStereographicParameters),
    Polyconic(OriginParameters),
    Sinusoidal(MeridianParameters),
    Stereographic(OriginParameters),
    TransverseCylindricalEqualArea(ScaledParameters),
    TransverseMercator(ScaledParameters),
    VanDerGrinten(MeridianParameters),
}

impl Parameters {
    pub fn kind(&self) -> CoordinateType {
        use CoordinateType as C;
        match self {
            Parameters::Geodetic(_) => C::Geodetic,
            Parameters::Georef => C::Georef,
            Parameters::Geocentric => C::Geocentric,
            Parameters::LocalCartesian(_) => C::LocalCartesian,
            Parameters::Mgrs => C::Mgrs,
            Parameters::Utm(_) => C::Utm,
            Parameters::Ups => C::Ups,
            Parameters::AlbersEqualAreaConic(_) => C::AlbersEqualAreaConic,
            Parameters::AzimuthalEquidistant(_) => C::AzimuthalEquidistant,
            Parameters::Bng => C::Bng,
            Parameters::Bonne(_) => C::Bonne,
            Parameters::Cassini(_) => C::Cassini,
            Parameters::CylindricalEqualArea(_) => C::CylindricalEqualArea,
            Parameters::Eckert4(_) => C::Eckert4,
            Parameters::Eckert6(_) => C::Eckert6,
            Parameters::EquidistantCylindrical(_) => C::EquidistantCylindrical,
            Parameters::Gnomonic(_) => C::Gnomonic,
            Parameters::LambertConformalConic1(_) => C::LambertConformalConic1,
            Parameters::LambertConformalConic2(_) => C::LambertConformalConic2,
            Parameters::Mercator(_) => C::Mercator,
            Parameters::MillerCylindrical(_) => C::MillerCylindrical,
            Parameters::Mollweide(_) => C::Mollweide,
            Parameters::Neys(_) => C::Neys,
            Parameters::Nzmg => C::Nzmg,
            Parameters::ObliqueMercator(_) => C::ObliqueMercator,
            Parameters::Orthographic(_) => C::Orthographic,
            Parameters::PolarStereographic(_) => C::PolarStereographic,
            Parameters::Polyconic(_) => C::Polyconic,
            Parameters::Sinusoidal(_) => C::Sinusoidal,
            Parameters::Stereographic(_) => C::Stereographic,
            Parameters::TransverseCylindricalEqualArea(_) => C::TransverseCylindricalEqualArea,
            Parameters::TransverseMercator(_) => C::TransverseMercator,
            Parameters::VanDerGrinten(_) => C::VanDerGrinten,
        }
    }

    /// The default parameters of a coordinate system
    pub fn default_for(kind: CoordinateType) -> Parameters {
        use CoordinateType as C;

        // Conic projections need a nonzero origin, and distinct parallels
        let conic = TwoParallelParameters {
            origin_latitude: 45_f64.to_radians(),
            std_parallel_1: 40_f64.to_radians(),
            std_parallel_2: 50_f64.to_radians(),
            ..Default::default()
        };
        let northern = OriginParameters {
            origin_latitude: 45_f64.to_radians(),
            ..Default::default()
        };
        let origin = OriginParameters::default();
        let scaled = ScaledParameters::default();
        let meridian = MeridianParameters::default();

        match kind {
            C::Geodetic => Parameters::Geodetic(GeodeticParameters::default()),
            C::Georef => Parameters::Georef,
            C::Geocentric => Parameters::Geocentric,
            C::LocalCartesian => Parameters::LocalCartesian(LocalCartesianParameters::default()),
            C::Mgrs => Parameters::Mgrs,
            C::Utm => Parameters::Utm(UtmParameters::default()),
            C::Ups => Parameters::Ups,
            C::AlbersEqualAreaConic => Parameters::AlbersEqualAreaConic(conic),
            C::AzimuthalEquidistant => Parameters::AzimuthalEquidistant(origin),
            C::Bng => Parameters::Bng,
            C::Bonne => Parameters::Bonne(northern),
            C::Cassini => Parameters::Cassini(origin),
            C::CylindricalEqualArea => Parameters::CylindricalEqualArea(origin),
            C::Eckert4 => Parameters::Eckert4(meridian),
            C::Eckert6 => Parameters::Eckert6(meridian),
            C::EquidistantCylindrical => {
                Parameters::EquidistantCylindrical(EquidistantCylindricalParameters::default())
            }
            C::Gnomonic => Parameters::Gnomonic(origin),
            C::LambertConformalConic1 => Parameters::LambertConformalConic1(ScaledParameters {
                origin_latitude: 45_f64.to_radians(),
                ..scaled
            }),
            C::LambertConformalConic2 => Parameters::LambertConformalConic2(conic),
            C::Mercator => Parameters::Mercator(scaled),
            C::MillerCylindrical => Parameters::MillerCylindrical(meridian),
            C::Mollweide => Parameters::Mollweide(meridian),
            C::Neys => Parameters::Neys(NeysParameters::default()),
            C::Nzmg => Parameters::Nzmg,
            C::ObliqueMercator => Parameters::ObliqueMercator(ObliqueMercatorParameters::default()),
            C::Orthographic => Parameters::Orthographic(origin),
            C::PolarStereographic => {
                Parameters::PolarStereographic(PolarStereographicParameters::default())
            }
            C::Polyconic => Parameters::Polyconic(origin),
            C::Sinusoidal => Parameters::Sinusoidal(meridian),
            C::Stereographic => Parameters::Stereographic(origin),
            C::TransverseCylindricalEqualArea => Parameters::TransverseCylindricalEqualArea(scaled),
            C::TransverseMercator => Parameters::TransverseMercator(scaled),
            C::VanDerGrinten => Parameters::VanDerGrinten(meridian),
        }
    }

    /// The height type of geodetic coordinates produced or consumed by
    /// this system: geocentric and local cartesian coordinates carry
    /// ellipsoid heights, map projections carry none.
    pub fn height_type(&self) -> HeightType {
        match self {
            Parameters::Geodetic(p) => p.height_type,
            Parameters::Geocentric | Parameters::LocalCartesian(_) => HeightType::EllipsoidHeight,
            _ => HeightType::NoHeight,
        }
    }

    /// Set the parameter named `key` from its textual `value`. Angles are
    /// given in degrees, decimal or colon separated sexagesimal, false
    /// eastings and northings in metres. For UTM, setting `zone` also
    /// sets `override_zone`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let bad = || Error::BadParam(key.to_string(), value.to_string());
        let kind = self.kind();

        match self {
            Parameters::Geodetic(p) if key == "height_type" => {
                p.height_type = match value.trim().to_ascii_lowercase().as_str() {
                    "none" => HeightType::NoHeight,
                    "ellipsoid" => HeightType::EllipsoidHeight,
                    "geoid" | "msl" => HeightType::GeoidHeight,
                    _ => return Err(bad()),
                };
                return Ok(());
            }
            Parameters::Utm(p) if key == "zone" => {
                let zone = value.trim().parse::<u8>().map_err(|_| bad())?;
                if !(1..=60).contains(&zone) {
                    return Err(bad());
                }
                p.zone = zone;
                p.override_zone = true;
                return Ok(());
            }
            Parameters::Utm(p) if key == "override_zone" => {
                p.override_zone = value.trim().parse::<bool>().map_err(|_| bad())?;
                return Ok(());
            }
            _ => (),
        }

        let field = match self {
            Parameters::LocalCartesian(p) => p.field(key),
            Parameters::AlbersEqualAreaConic(p) | Parameters::LambertConformalConic2(p) => p.field(key),
            Parameters::AzimuthalEquidistant(p)
            | Parameters::Bonne(p)
            | Parameters::Cassini(p)
            | Parameters::CylindricalEqualArea(p)
            | Parameters::Gnomonic(p)
            | Parameters::Orthographic(p)
            | Parameters::Polyconic(p)
            | Parameters::Stereographic(p) => p.field(key),
            Parameters::LambertConformalConic1(p)
            | Parameters::Mercator(p)
            | Parameters::TransverseCylindricalEqualArea(p)
            | Parameters::TransverseMercator(p) => p.field(key),
            Parameters::Eckert4(p)
            | Parameters::Eckert6(p)
            | Parameters::MillerCylindrical(p)
            | Parameters::Mollweide(p)
            | Parameters::Sinusoidal(p)
            | Parameters::VanDerGrinten(p) => p.field(key),
            Parameters::EquidistantCylindrical(p) => p.field(key),
            Parameters::Neys(p) => p.field(key),
            Parameters::ObliqueMercator(p) => p.field(key),
            Parameters::PolarStereographic(p) => p.field(key),
            _ => None,
        };

        match field {
            Some(Field::Angle(target)) => {
                *target = angular::parse_degrees(value).ok_or_else(bad)?.to_radians();
            }
            Some(Field::Number(target)) => {
                *target = value.trim().parse::<f64>().map_err(|_| bad())?;
            }
            None => return Err(Error::NotFound(key.to_string(), kind.name().to_string())),
        }
        Ok(())
    }
}

enum Field<'a> {
    Angle(&'a mut f64),
    Number(&'a mut f64),
}

// Look up the fields of a parameter struct by name
macro_rules! fields {
    ($name:ident, angles: [$($angle:ident),*], numbers: [$($number:ident),*]) => {
        impl $name {
            fn field(&mut self, key: &str) -> Option<Field<'_>> {
                $(if key == stringify!($angle) {
                    return Some(Field::Angle(&mut self.$angle));
                })*
                $(if key == stringify!($number) {
                    return Some(Field::Number(&mut self.$number));
                })*
                None
            }
        }
    };
}

fields!(LocalCartesianParameters,
    angles: [origin_latitude, origin_longitude, orientation],
    numbers: [origin_height]);
fields!(TwoParallelParameters,
    angles: [origin_latitude, central_meridian, std_parallel_1, std_parallel_2],
    numbers: [false_easting, false_northing]);
fields!(OriginParameters,
    angles: [origin_latitude, central_meridian],
    numbers: [false_easting, false_northing]);
fields!(ScaledParameters,
    angles: [origin_latitude, central_meridian],
    numbers: [scale_factor, false_easting, false_northing]);
fields!(MeridianParameters,
    angles: [central_meridian],
    numbers: [false_easting, false_northing]);
fields!(EquidistantCylindricalParameters,
    angles: [std_parallel, central_meridian],
    numbers: [false_easting, false_northing]);
fields!(NeysParameters,
    angles: [origin_latitude, central_meridian, std_parallel_1],
    numbers: [false_easting, false_northing]);
fields!(ObliqueMercatorParameters,
    angles: [origin_latitude, latitude_1, longitude_1, latitude_2, longitude_2],
    numbers: [scale_factor, false_easting, false_northing]);
fields!(PolarStereographicParameters,
    angles: [latitude_of_true_scale, longitude_down_from_pole],
    numbers: [false_easting, false_northing]);

// ----- T E S T S ---------------------------------------------------------------------
