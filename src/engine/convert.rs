//! The conversion pipeline:
//!
//! ```text
//!   input -> geodetic -> (datum -> WGS84 -> datum) -> output
//! ```
//!
//! or, when both sides share a datum and a direct conversion exists, a
//! single step through the [shortcut registry](super::shortcut).

use super::shortcut::{self, Failure, Leg};
use super::{Engine, Slot, State, WGS84_DATUM_INDEX};
use crate::datum::ShiftError;
use crate::ellipsoid::Ellipsoid;
use crate::math::angular;
use crate::projection::bng::Bng;
use crate::projection::geocentric::Geocentric;
use crate::projection::georef::Georef;
use crate::projection::loccart::LocalCartesian;
use crate::projection::mgrs::Mgrs;
use crate::projection::nzmg::Nzmg;
use crate::projection::ups::Ups;
use crate::projection::utm::Utm;
use crate::projection::{self, check_geodetic, Conversion, Projection};
use crate::status::{Issue, ReturnCode, Status};
use crate::system::*;
use log::{debug, trace};

/// Latitude, longitude, height
type Geodetic = (f64, f64, f64);

/// The ellipsoid of a slot's datum, and its table code
pub(super) struct DatumEllipsoid {
    pub ellps: Ellipsoid,
    pub code: String,
}

impl Engine {
    /// Convert the input coordinates of `state` to the output coordinate
    /// system. `Ok` carries the warning bits raised (if any), `Err` the
    /// full return code whenever an error bit is set. The issues behind
    /// the bits are found in the [conversion status](Engine::conversion_status)
    /// of each slot.
    pub fn convert(&mut self, state: State) -> Result<ReturnCode, ReturnCode> {
        self.ready()?;
        let [mut input, mut output] = self.slots[state as usize].clone();
        input.status = Status::NONE;
        output.status = Status::NONE;
        debug!("Convert {:?}: {} -> {}", state, input.kind(), output.kind());

        let wgs84 = self.pipeline(&mut input, &mut output);

        // The accuracy estimate is only meaningful after a clean conversion
        output.errors = if !input.status.is_empty() || !output.status.is_empty() {
            ShiftError::UNKNOWN
        } else if let Some((latitude, longitude)) = wgs84 {
            self.datums
                .shift_error(input.datum_index, output.datum_index, latitude, longitude, input.errors)
                .unwrap_or(ShiftError::UNKNOWN)
        } else {
            input.errors
        };

        let code = classify(input.status, ReturnCode::INPUT_WARNING, ReturnCode::INPUT_ERROR)
            | classify(output.status, ReturnCode::OUTPUT_WARNING, ReturnCode::OUTPUT_ERROR);
        self.slots[state as usize] = [input, output];

        if code.is_error() {
            debug!("Convert {:?} failed: {code}", state);
            return Err(code);
        }
        Ok(code)
    }

    // Run the conversion, recording the issues found in the slot statuses.
    // Returns the WGS84 location of the point, if a datum shift took place.
    fn pipeline(&self, input: &mut Slot, output: &mut Slot) -> Option<(f64, f64)> {
        let from = self.datum_ellipsoid(input.datum_index);
        let to = self.datum_ellipsoid(output.datum_index);
        if let Err(status) = &from {
            input.status |= *status;
        }
        if let Err(status) = &to {
            output.status |= *status;
        }
        let (Ok(from), Ok(to)) = (from, to) else {
            return None;
        };

        if input.datum_index == output.datum_index {
            if let Some(direct) = shortcut::find(&input.parameters, &output.parameters) {
                debug!("Direct conversion {} -> {}", direct.from, direct.to);
                let source = Leg {
                    parameters: &input.parameters,
                    ellipsoid: &from,
                };
                let target = Leg {
                    parameters: &output.parameters,
                    ellipsoid: &to,
                };
                match (direct.convert)(&input.coordinates, &source, &target, self.precision) {
                    Ok((coordinates, warnings)) => {
                        output.coordinates = coordinates;
                        output.status |= warnings;
                    }
                    Err(Failure::Input(status)) => input.status |= status,
                    Err(Failure::Output(status)) => output.status |= status,
                }
                return None;
            }
        }

        // Stage 1: input to geodetic
        let geodetic = match self.to_geodetic(input, &from) {
            Ok((geodetic, warnings)) => {
                input.status |= warnings;
                geodetic
            }
            Err(status) => {
                input.status |= status;
                return None;
            }
        };
        trace!("Geodetic, input datum: {geodetic:?}");

        // Datum shift, only from a clean input. Otherwise the point goes on
        // to stage 2 unshifted.
        let (geodetic, wgs84) = if input.status.is_empty() {
            self.shift(input, output, geodetic)?
        } else {
            debug!("Datum shift skipped: {:?}", input.status);
            (geodetic, None)
        };
        trace!("Geodetic, output datum: {geodetic:?}");

        // Stage 2: geodetic to output
        match self.from_geodetic(&output.parameters, geodetic, &to) {
            Ok((coordinates, warnings)) => {
                output.coordinates = coordinates;
                output.status |= warnings;
            }
            Err(status) => output.status |= status,
        }
        wgs84
    }

    fn datum_ellipsoid(&self, datum_index: usize) -> Result<DatumEllipsoid, Status> {
        let missing = |_| Status::from(Issue::EllipsoidCode);
        let code = self.datums.ellipsoid_code(datum_index).map_err(missing)?;
        let ellps = self.ellipsoids.ellipsoid(code).map_err(missing)?;
        Ok(DatumEllipsoid {
            ellps,
            code: code.to_string(),
        })
    }

    // From the input datum, through WGS84, to the output datum, converting
    // between ellipsoid and geoid heights on the way if needed. Returns
    // `None` after recording the issues, if the shift fails.
    #[allow(clippy::type_complexity)]
    fn shift(&self, input: &mut Slot, output: &mut Slot, geodetic: Geodetic) -> Option<(Geodetic, Option<(f64, f64)>)> {
        let from_height = input.parameters.height_type();
        let to_height = output.parameters.height_type();
        let heights_agree =
            from_height == to_height || from_height == HeightType::NoHeight || to_height == HeightType::NoHeight;
        if input.datum_index == output.datum_index && heights_agree {
            return Some((geodetic, None));
        }

        let mut wgs84 = geodetic;
        if input.datum_index != WGS84_DATUM_INDEX {
            if !matches!(self.datums.valid(input.datum_index, wgs84.0, wgs84.1), Ok(true)) {
                input.status |= Issue::DatumWarning;
            }
            match self.datums.geodetic_shift_to_wgs84(input.datum_index, wgs84, &self.ellipsoids) {
                Ok((lat, lon, h)) => wgs84 = (lat, angular::normalize_longitude(lon), h),
                Err(code) => {
                    input.status |= issues(code);
                    return None;
                }
            }
        }

        let (lat, lon, h) = wgs84;
        let height = match (from_height, to_height) {
            (HeightType::GeoidHeight, HeightType::EllipsoidHeight) => self.geoid.geoid_to_ellipsoid_height(lat, lon, h),
            (HeightType::EllipsoidHeight, HeightType::GeoidHeight) => self.geoid.ellipsoid_to_geoid_height(lat, lon, h),
            _ => Ok(h),
        };
        match height {
            Ok(h) => wgs84.2 = h,
            Err(code) => {
                output.status |= issues(code);
                return None;
            }
        }

        let mut result = wgs84;
        if output.datum_index != WGS84_DATUM_INDEX {
            if !matches!(self.datums.valid(output.datum_index, lat, lon), Ok(true)) {
                output.status |= Issue::DatumWarning;
            }
            match self.datums.geodetic_shift_from_wgs84(output.datum_index, wgs84, &self.ellipsoids) {
                Ok((lat, lon, h)) => result = (lat, angular::normalize_longitude(lon), h),
                Err(code) => {
                    output.status |= issues(code);
                    return None;
                }
            }
        }
        Some((result, Some((lat, lon))))
    }

    fn to_geodetic(&self, slot: &Slot, e: &DatumEllipsoid) -> Conversion<Geodetic> {
        use Coordinates as C;
        use Parameters as P;
        match (&slot.parameters, &slot.coordinates) {
            (P::Geodetic(p), C::Geodetic(geo)) => {
                check_geodetic(geo.latitude, geo.longitude).into_result()?;
                let height = match p.height_type {
                    HeightType::NoHeight => 0.,
                    _ => geo.height,
                };
                let longitude = angular::normalize_longitude(geo.longitude);
                Ok(((geo.latitude, longitude, height), Status::NONE))
            }
            (P::Georef, C::Georef(text)) => Georef::new().inverse(text).map(planar),
            (P::Geocentric, C::Geocentric(xyz)) => Geocentric::new(&e.ellps)?.inverse(xyz),
            (P::LocalCartesian(p), C::LocalCartesian(xyz)) => LocalCartesian::new(p, &e.ellps)?.inverse(xyz),
            (P::Mgrs, C::Mgrs(text)) => Mgrs::new(&e.ellps, &e.code)?.inverse(text).map(planar),
            (P::Utm(p), C::Utm(utm)) => Utm::new(p, &e.ellps)?.inverse(utm).map(planar),
            (P::Ups, C::Ups(ups)) => Ups::new(&e.ellps)?.inverse(ups).map(planar),
            (P::Bng, C::Bng(text)) => Bng::new(&e.code)?.inverse(text).map(planar),
            (parameters, coordinates) => {
                let xy = coordinates.as_map().ok_or(Status::from(Issue::Projection))?;
                map_projection(parameters, e)?.inverse(xy).map(planar)
            }
        }
    }

    fn from_geodetic(&self, parameters: &Parameters, geodetic: Geodetic, e: &DatumEllipsoid) -> Conversion<Coordinates> {
        use Coordinates as C;
        use Parameters as P;
        let (lat, lon, h) = geodetic;
        let precision = self.precision;

        let converted = match parameters {
            P::Geodetic(p) => {
                let height = match p.height_type {
                    HeightType::NoHeight => 0.,
                    _ => h,
                };
                let geo = GeodeticCoordinates::new(angular::normalize_longitude(lon), lat, height);
                (C::Geodetic(geo), Status::NONE)
            }
            P::Georef => wrap(Georef::new().forward(lat, lon, precision)?, C::Georef),
            P::Geocentric => wrap(Geocentric::new(&e.ellps)?.forward(lat, lon, h)?, C::Geocentric),
            P::LocalCartesian(p) => wrap(LocalCartesian::new(p, &e.ellps)?.forward(lat, lon, h)?, C::LocalCartesian),
            P::Mgrs => wrap(Mgrs::new(&e.ellps, &e.code)?.forward(lat, lon, precision)?, C::Mgrs),
            P::Utm(p) => wrap(Utm::new(p, &e.ellps)?.forward(lat, lon)?, C::Utm),
            P::Ups => wrap(Ups::new(&e.ellps)?.forward(lat, lon)?, C::Ups),
            P::Bng => wrap(Bng::new(&e.code)?.forward(lat, lon, precision)?, C::Bng),
            parameters => {
                let (xy, warnings) = map_projection(parameters, e)?.forward(lat, lon)?;
                let coordinates = Coordinates::map(parameters.kind(), xy.easting, xy.northing)
                    .ok_or(Status::from(Issue::Projection))?;
                (coordinates, warnings)
            }
        };
        Ok(converted)
    }
}

// NZMG is only defined on the International 1924 ellipsoid
fn map_projection(parameters: &Parameters, e: &DatumEllipsoid) -> Result<Box<dyn Projection>, Status> {
    if parameters.kind() == CoordinateType::Nzmg {
        Nzmg::check_ellipsoid_code(&e.code).into_result()?;
    }
    projection::build(parameters, &e.ellps).unwrap_or(Err(Status::from(Issue::Projection)))
}

fn planar(((latitude, longitude), warnings): ((f64, f64), Status)) -> (Geodetic, Status) {
    ((latitude, longitude, 0.), warnings)
}

fn wrap<T>((value, warnings): (T, Status), variant: fn(T) -> Coordinates) -> (Coordinates, Status) {
    (variant(value), warnings)
}

// Datum and geoid failures, as slot issues. Anything but a coordinate
// range problem means the datum or its ellipsoid is missing from the tables.
fn issues(code: ReturnCode) -> Status {
    let mut status = Status::new();
    if code.contains(ReturnCode::LAT) {
        status |= Issue::Latitude;
    }
    if code.contains(ReturnCode::LON) {
        status |= Issue::Longitude;
    }
    if status.is_empty() {
        status |= Issue::EllipsoidCode;
    }
    status
}

fn classify(status: Status, warning: ReturnCode, error: ReturnCode) -> ReturnCode {
    if status.has_error() {
        return error;
    }
    if !status.is_empty() {
        return warning;
    }
    ReturnCode::NO_ERROR
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataFiles;
    use crate::engine::Direction;
    use float_eq::assert_float_eq;

    const STATE: State = State::Interactive;
    const IN: Direction = Direction::Input;
    const OUT: Direction = Direction::Output;

    fn engine() -> Result<Engine, ReturnCode> {
        let mut engine = Engine::new();
        engine.reload(&DataFiles::builtin())?;
        Ok(engine)
    }

    fn geodetic(engine: &Engine) -> Result<GeodeticCoordinates, ReturnCode> {
        let Coordinates::Geodetic(geo) = engine.coordinates(STATE, OUT)? else {
            panic!("Expected geodetic coordinates");
        };
        Ok(geo)
    }

    #[test]
    fn geodetic_identity() -> Result<(), ReturnCode> {
        let mut engine = engine()?;
        let geo = GeodeticCoordinates::degrees(12., 55., 100.);
        engine.set_coordinates(STATE, IN, Coordinates::Geodetic(geo))?;
        assert_eq!(engine.convert(STATE)?, ReturnCode::NO_ERROR);
        assert_eq!(geodetic(&engine)?, geo);
        assert_eq!(engine.conversion_errors(STATE)?, ShiftError::ZERO);
        Ok(())
    }

    #[test]
    fn projection_roundtrip() -> Result<(), ReturnCode> {
        let mut engine = engine()?;
        let geo = GeodeticCoordinates::degrees(2., 45., 0.);

        // UPS, BNG and NZMG do not cover the point
        for kind in CoordinateType::ALL {
            if matches!(kind, CoordinateType::Ups | CoordinateType::Bng | CoordinateType::Nzmg) {
                continue;
            }
            engine.set_coordinate_system(STATE, IN, CoordinateType::Geodetic)?;
            engine.set_coordinates(STATE, IN, Coordinates::Geodetic(geo))?;
            engine.set_coordinate_system(STATE, OUT, kind)?;
            if let Err(code) = engine.convert(STATE) {
                panic!("{kind}: {code} {:?}", engine.conversion_status(STATE, OUT));
            }
            let forward = engine.coordinates(STATE, OUT)?;

            engine.set_coordinate_system(STATE, IN, kind)?;
            engine.set_coordinates(STATE, IN, forward)?;
            engine.set_coordinate_system(STATE, OUT, CoordinateType::Geodetic)?;
            engine.convert(STATE)?;
            let back = geodetic(&engine)?;

            // The string systems reference the southwest corner of a cell
            let tolerance = if kind.is_string_system() { 1e-6 } else { 1e-7 };
            assert_float_eq!(back.latitude, geo.latitude, abs <= tolerance, "{kind}");
            assert_float_eq!(back.longitude, geo.longitude, abs <= tolerance, "{kind}");
        }
        Ok(())
    }

    #[test]
    fn stage_one_failure_skips_stage_two() -> Result<(), ReturnCode> {
        let mut engine = engine()?;
        engine.set_coordinate_system(STATE, IN, CoordinateType::Mgrs)?;
        engine.set_coordinate_system(STATE, OUT, CoordinateType::Mercator)?;
        engine.set_coordinates(STATE, IN, Coordinates::Mgrs("not an MGRS string".to_string()))?;

        let Err(code) = engine.convert(STATE) else {
            panic!("Expected an input error");
        };
        assert!(code.contains(ReturnCode::INPUT_ERROR));
        assert!(!code.contains(ReturnCode::OUTPUT_ERROR));
        assert!(engine.conversion_status(STATE, IN)?.contains(Issue::String));
        assert_eq!(engine.coordinates(STATE, OUT)?, Coordinates::default_for(CoordinateType::Mercator));
        assert_eq!(engine.conversion_errors(STATE)?, ShiftError::UNKNOWN);
        Ok(())
    }

    #[test]
    fn datum_shift() -> Result<(), ReturnCode> {
        let mut engine = engine()?;
        let wgs72 = engine.datum_index("WGC")?;
        let geo = GeodeticCoordinates::degrees(12., 55., 0.);
        engine.set_coordinates(STATE, IN, Coordinates::Geodetic(geo))?;
        engine.set_datum(STATE, OUT, wgs72)?;
        engine.convert(STATE)?;
        let shifted = geodetic(&engine)?;
        assert!((shifted.latitude - geo.latitude).abs() > 1e-8);

        // ... and back
        engine.set_coordinates(STATE, IN, Coordinates::Geodetic(shifted))?;
        engine.set_datum(STATE, IN, wgs72)?;
        engine.set_datum(STATE, OUT, WGS84_DATUM_INDEX)?;
        engine.convert(STATE)?;
        let back = geodetic(&engine)?;
        assert_float_eq!(back.latitude, geo.latitude, abs <= 1e-9);
        assert_float_eq!(back.longitude, geo.longitude, abs <= 1e-9);
        Ok(())
    }

    #[test]
    fn height_types() -> Result<(), ReturnCode> {
        let mut engine = engine()?;
        let no_height = Parameters::Geodetic(GeodeticParameters {
            height_type: HeightType::NoHeight,
        });
        engine.set_parameters(STATE, OUT, no_height)?;
        engine.set_coordinates(STATE, IN, Coordinates::Geodetic(GeodeticCoordinates::degrees(1., 2., 300.)))?;
        engine.convert(STATE)?;
        assert_eq!(geodetic(&engine)?.height, 0.);

        // Without a geoid grid, geoid and ellipsoid heights coincide
        let geoid_height = Parameters::Geodetic(GeodeticParameters {
            height_type: HeightType::GeoidHeight,
        });
        engine.set_parameters(STATE, OUT, geoid_height)?;
        engine.convert(STATE)?;
        assert_float_eq!(geodetic(&engine)?.height, 300., abs <= 1e-9);
        Ok(())
    }
}
