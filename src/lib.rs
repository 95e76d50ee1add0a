//! *A coordinate conversion engine*.
//!
//! Converts coordinates between 33 coordinate systems: geodetic, geocentric
//! and local cartesian coordinates, the grid reference systems MGRS, GEOREF
//! and BNG, UTM and UPS, and 25 map projections. Each conversion runs
//! through a two stage pipeline:
//!
//! ```text
//!   input system -> geodetic -> (input datum -> WGS84 -> output datum) -> output system
//! ```
//!
//! with a small registry of direct conversions (e.g. MGRS to UTM) taking
//! over whenever both sides share a datum and a lossless shortcut exists.
//!
//! Problems are collected rather than reported one at a time: every
//! conversion stage contributes its [`Issue`]s to a per slot [`Status`], and
//! the engine level outcome is a [`ReturnCode`] bit set.
//!
//! ```
//! use geotrans::prelude::*;
//!
//! let mut engine = Engine::initialized()?;
//! let (state, input, output) = (State::Interactive, Direction::Input, Direction::Output);
//! engine.set_coordinate_system(state, input, CoordinateType::Utm)?;
//! engine.set_coordinate_system(state, output, CoordinateType::Geodetic)?;
//! engine.convert(state)?;
//! let Coordinates::Geodetic(geo) = engine.coordinates(state, output)? else {
//!     panic!("Expected geodetic coordinates");
//! };
//! assert!(geo.latitude.abs() < 1e-12);
//! assert!((geo.longitude.to_degrees() - 3.0).abs() < 1e-9);
//! # Ok::<(), geotrans::Error>(())
//! ```

pub mod config;
pub mod datum;
pub mod ellipsoid;
pub mod engine;
pub mod geoid;
pub mod math;
pub mod projection;
pub mod status;
pub mod system;

use std::io;
use thiserror::Error;

pub use crate::engine::Engine;
pub use crate::status::Issue;
pub use crate::status::ReturnCode;
pub use crate::status::Status;

/// The bread-and-butter, shrink-wrapped and ready to use
pub mod prelude {
    pub use crate::config::DataFiles;
    pub use crate::datum::Datum;
    pub use crate::datum::DatumKind;
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::engine::Direction;
    pub use crate::engine::Engine;
    pub use crate::engine::State;
    pub use crate::engine::Validity;
    pub use crate::status::Issue;
    pub use crate::status::ReturnCode;
    pub use crate::status::Status;
    pub use crate::system::*;
    pub use crate::Error;
}

/// Preamble for the coordinate system modules
pub(crate) mod authoring {
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::math::angular;
    pub use crate::status::Issue;
    pub use crate::status::Status;
    pub use crate::system::*;
    pub use log::{debug, trace, warn};
    pub use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};
}

/// The error type for table loading, persistence and parsing.
/// Conversion problems are reported through [`Status`] and [`ReturnCode`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] io::Error),

    #[error("error: {0}")]
    General(&'static str),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("{0} not found in {1}")]
    NotFound(String, String),

    #[error("malformed value for {0}: {1}")]
    BadParam(String, String),

    #[error("engine error: {0}")]
    Engine(#[from] ReturnCode),
}

/// Literature, that has been useful in designing and implementing this library.
pub enum Bibliography {
    /// B.R. Bowring (1976): *Transformation from spatial to geographical coordinates*.
    /// Survey Review 23(181), pp. 323–327.
    Bow76,

    /// B.R. Bowring (1985): *The accuracy of geodetic latitude and height equations*.
    /// Survey Review, 28(218), pp.202-206,
    /// [DOI](https://doi.org/10.1179/sre.1985.28.218.202)
    Bow85,

    /// DMA (1989): *The Universal Grids: Universal Transverse Mercator (UTM) and
    /// Universal Polar Stereographic (UPS)*. DMA Technical Manual 8358.2.
    Dma89,

    /// K. Engsager & K. Poder (2007): *A highly accurate world wide algorithm for the
    /// transverse Mercator mapping (almost)*.
    /// Proc. XXIII Intl. Cartographic Conf. (ICC2007), Moscow, p. 2.1.2.
    Eng07,

    /// Toshio Fukushima (1999): *Fast transform from geocentric to geodetic coordinates*.
    /// Journal of Geodesy, 73(11), pp.603–610
    /// [DOI](https://doi.org/10.1007/s001900050271)
    Fuk99,

    /// Charles F.F. Karney (2011): *Transverse Mercator with an accuracy of a few nanometers*.
    /// J. Geodesy. 85(8): 475–485.
    /// [DOI](https://doi.org/10.1007/s00190-011-0445-3).
    Kar11,

    /// NIMA (2000): *Department of Defense World Geodetic System 1984*.
    /// NIMA Technical Report 8350.2, 3rd ed.
    Nim00,

    /// Ordnance Survey (2018): *A guide to coordinate systems in Great Britain*.
    Ord18,

    /// J.P. Snyder (1987): *Map Projections - A Working Manual*.
    /// USGS Professional Paper 1395.
    /// [DOI](https://doi.org/10.3133/pp1395)
    Sny87,
}
