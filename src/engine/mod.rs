//! The conversion engine.
//!
//! An [`Engine`] owns the ellipsoid, datum and geoid tables, and two
//! independent [states](State) (interactive and file), each holding an
//! input and an output slot. A slot is a coordinate system (given by its
//! [`Parameters`]), a datum, a set of [`Coordinates`] and the [`Status`]
//! of the most recent conversion.
//!
//! All accessors validate their arguments by running every check and
//! OR-ing the bits of the failing ones into a [`ReturnCode`], so a single
//! call reports all problems at once.

mod convert;
mod report;
mod shortcut;

pub use report::{issue_description, status_string};

use crate::config::DataFiles;
use crate::datum::{DatumDefinition, DatumKind, DatumTable, ShiftError};
use crate::ellipsoid::EllipsoidTable;
use crate::geoid::Geoid;
use crate::status::{ReturnCode, Status};
use crate::system::*;
use log::{error, info, warn};

/// The index of WGS84 in the datum table
pub const WGS84_DATUM_INDEX: usize = 1;

// ----- S T A T E S   A N D   D I R E C T I O N S -------------------------------------

/// The two independent sets of input/output slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    File = 0,
    Interactive = 1,
}

impl TryFrom<i64> for State {
    type Error = ReturnCode;
    fn try_from(value: i64) -> Result<State, ReturnCode> {
        match value {
            0 => Ok(State::File),
            1 => Ok(State::Interactive),
            _ => Err(ReturnCode::INVALID_STATE),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Input = 0,
    Output = 1,
}

impl TryFrom<i64> for Direction {
    type Error = ReturnCode;
    fn try_from(value: i64) -> Result<Direction, ReturnCode> {
        match value {
            0 => Ok(Direction::Input),
            1 => Ok(Direction::Output),
            _ => Err(ReturnCode::INVALID_DIRECTION),
        }
    }
}

// ----- V A L I D I T Y ---------------------------------------------------------------

/// How meaningful a conversion between two systems is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Validity {
    /// The systems cover disjoint areas: no point converts
    Red,
    /// Converts, but loses height or precision
    Yellow,
    Green,
}

impl Validity {
    pub fn classify(input: &Parameters, output: &Parameters) -> Validity {
        use CoordinateType as C;
        let (from, to) = (input.kind(), output.kind());

        // The regional grids, and the polar caps, do not overlap
        let disjoint = matches!(
            (from, to),
            (C::Ups, C::Bng | C::Nzmg) | (C::Bng, C::Ups | C::Nzmg) | (C::Nzmg, C::Ups | C::Bng)
        );
        if disjoint {
            return Validity::Red;
        }

        let height_lost =
            input.height_type() != HeightType::NoHeight && output.height_type() == HeightType::NoHeight;
        let precision_lost = to.is_string_system() && from != to;
        if height_lost || precision_lost {
            return Validity::Yellow;
        }
        Validity::Green
    }
}

// ----- S L O T S ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
struct Slot {
    datum_index: usize,
    status: Status,
    parameters: Parameters,
    coordinates: Coordinates,
    /// Input slots: the accuracy of the coordinates, as given by the user.
    /// Output slots: the accuracy after the most recent conversion.
    errors: ShiftError,
}

impl Slot {
    fn new(kind: CoordinateType, errors: ShiftError) -> Slot {
        Slot {
            datum_index: WGS84_DATUM_INDEX,
            status: Status::NONE,
            parameters: Parameters::default_for(kind),
            coordinates: Coordinates::default_for(kind),
            errors,
        }
    }

    fn kind(&self) -> CoordinateType {
        self.parameters.kind()
    }
}

fn default_slots() -> [[Slot; 2]; 2] {
    let pair = || {
        [
            Slot::new(CoordinateType::Geodetic, ShiftError::ZERO),
            Slot::new(CoordinateType::Geodetic, ShiftError::UNKNOWN),
        ]
    };
    [pair(), pair()]
}

// ----- T H E   E N G I N E -----------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Engine {
    initialized: bool,
    slots: [[Slot; 2]; 2],
    ellipsoids: EllipsoidTable,
    datums: DatumTable,
    geoid: Geoid,
    precision: Precision,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// An engine with built-in tables, not yet initialized
    pub fn new() -> Engine {
        Engine {
            initialized: false,
            slots: default_slots(),
            ellipsoids: EllipsoidTable::builtin(),
            datums: DatumTable::builtin(),
            geoid: Geoid::default(),
            precision: Precision::TenthOfSecond,
        }
    }

    /// A new engine, initialized from the data files named by the environment
    pub fn initialized() -> Result<Engine, ReturnCode> {
        let mut engine = Engine::new();
        engine.initialize()?;
        Ok(engine)
    }

    /// Load the tables from the directories named by the `ELLIPSOID_DATA`,
    /// `DATUM_DATA` and `GEOID_DATA` environment variables. Does nothing
    /// if the engine is already initialized.
    pub fn initialize(&mut self) -> Result<(), ReturnCode> {
        if self.initialized {
            return Ok(());
        }
        self.reload(&DataFiles::from_env())
    }

    /// (Re)load all tables from `files`, and reset all slots, whether
    /// or not the engine is already initialized
    pub fn reload(&mut self, files: &DataFiles) -> Result<(), ReturnCode> {
        let mut code = ReturnCode::NO_ERROR;

        let ellipsoids = match &files.ellipsoids {
            Some(path) => EllipsoidTable::from_file(path).unwrap_or_else(|e| {
                error!("Cannot read ellipsoids from {}: {e}", path.display());
                code |= ReturnCode::ELLIPSOID_ERROR;
                EllipsoidTable::builtin()
            }),
            None => EllipsoidTable::builtin(),
        };

        let seven = files.seven_parameter_datums.as_deref();
        let three = files.three_parameter_datums.as_deref();
        let datums = DatumTable::from_files(seven, three, &ellipsoids).unwrap_or_else(|e| {
            error!("Cannot read datums: {e}");
            code |= ReturnCode::DATUM_ERROR;
            DatumTable::builtin()
        });

        let geoid = match &files.geoid {
            Some(path) => Geoid::from_file(path).unwrap_or_else(|e| {
                error!("Cannot read geoid grid from {}: {e}", path.display());
                code |= ReturnCode::GEOID_ERROR;
                Geoid::none()
            }),
            None => Geoid::none(),
        };

        self.ellipsoids = ellipsoids;
        self.datums = datums;
        self.geoid = geoid;
        self.initialized = code.is_ok();
        code.into_result()?;

        self.slots = default_slots();
        self.precision = Precision::TenthOfSecond;
        info!(
            "Engine initialized: {} ellipsoids, {} datums",
            self.ellipsoids.len(),
            self.datums.len()
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn ready(&self) -> Result<(), ReturnCode> {
        if self.initialized {
            return Ok(());
        }
        Err(ReturnCode::NOT_INITIALIZED)
    }

    fn slot(&self, state: State, direction: Direction) -> &Slot {
        &self.slots[state as usize][direction as usize]
    }

    fn slot_mut(&mut self, state: State, direction: Direction) -> &mut Slot {
        &mut self.slots[state as usize][direction as usize]
    }

    // The initialization check, and the type gate of the parameter and
    // coordinate setters
    fn check_type(&self, state: State, direction: Direction, kind: CoordinateType) -> Result<(), ReturnCode> {
        let mut code = ReturnCode::NO_ERROR;
        if !self.initialized {
            code |= ReturnCode::NOT_INITIALIZED;
        }
        if self.slot(state, direction).kind() != kind {
            code |= ReturnCode::INVALID_TYPE;
        }
        code.into_result()
    }

    // ----- Slot accessors ------------------------------------------------------------

    /// Select the coordinate system of a slot. Parameters and coordinates
    /// are reset to the defaults of the system, the datum is kept.
    pub fn set_coordinate_system(
        &mut self,
        state: State,
        direction: Direction,
        kind: CoordinateType,
    ) -> Result<(), ReturnCode> {
        self.ready()?;
        let slot = self.slot_mut(state, direction);
        slot.parameters = Parameters::default_for(kind);
        slot.coordinates = Coordinates::default_for(kind);
        slot.status = Status::NONE;
        Ok(())
    }

    pub fn coordinate_system(&self, state: State, direction: Direction) -> Result<CoordinateType, ReturnCode> {
        self.ready()?;
        Ok(self.slot(state, direction).kind())
    }

    /// Select the datum of a slot, by its 1-based index
    pub fn set_datum(&mut self, state: State, direction: Direction, index: usize) -> Result<(), ReturnCode> {
        let mut code = ReturnCode::NO_ERROR;
        if !self.initialized {
            code |= ReturnCode::NOT_INITIALIZED;
        }
        if index == 0 || index > self.datums.len() {
            code |= ReturnCode::INVALID_INDEX;
        }
        code.into_result()?;
        self.slot_mut(state, direction).datum_index = index;
        Ok(())
    }

    pub fn datum(&self, state: State, direction: Direction) -> Result<usize, ReturnCode> {
        self.ready()?;
        Ok(self.slot(state, direction).datum_index)
    }

    /// Parameters are stored as given. They are validated when the
    /// coordinate system is instantiated, i.e. at conversion time.
    pub fn set_parameters(
        &mut self,
        state: State,
        direction: Direction,
        parameters: Parameters,
    ) -> Result<(), ReturnCode> {
        self.check_type(state, direction, parameters.kind())?;
        self.slot_mut(state, direction).parameters = parameters;
        Ok(())
    }

    pub fn parameters(&self, state: State, direction: Direction) -> Result<Parameters, ReturnCode> {
        self.ready()?;
        Ok(self.slot(state, direction).parameters)
    }

    pub fn set_coordinates(
        &mut self,
        state: State,
        direction: Direction,
        coordinates: Coordinates,
    ) -> Result<(), ReturnCode> {
        self.check_type(state, direction, coordinates.kind())?;
        self.slot_mut(state, direction).coordinates = coordinates;
        Ok(())
    }

    pub fn coordinates(&self, state: State, direction: Direction) -> Result<Coordinates, ReturnCode> {
        self.ready()?;
        Ok(self.slot(state, direction).coordinates.clone())
    }

    /// The issues found in the slot by the most recent conversion
    pub fn conversion_status(&self, state: State, direction: Direction) -> Result<Status, ReturnCode> {
        self.ready()?;
        Ok(self.slot(state, direction).status)
    }

    /// The precision of the string systems (MGRS, GEOREF, BNG). Precisions
    /// finer than [`Precision::Meter`] produce 5 digits per axis.
    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// The accuracy of the input coordinates of `state`, in metres
    /// (negative means unknown)
    pub fn set_conversion_errors(&mut self, state: State, ce90: f64, le90: f64, se90: f64) -> Result<(), ReturnCode> {
        self.ready()?;
        self.slot_mut(state, Direction::Input).errors = ShiftError { ce90, le90, se90 };
        Ok(())
    }

    /// The accuracy of the output coordinates of the most recent conversion
    pub fn conversion_errors(&self, state: State) -> Result<ShiftError, ReturnCode> {
        self.ready()?;
        Ok(self.slot(state, Direction::Output).errors)
    }

    /// The validity of converting between the input and output systems of `state`
    pub fn valid_conversion(&self, state: State) -> Result<Validity, ReturnCode> {
        self.ready()?;
        let input = &self.slot(state, Direction::Input).parameters;
        let output = &self.slot(state, Direction::Output).parameters;
        Ok(Validity::classify(input, output))
    }

    // ----- Ellipsoids ----------------------------------------------------------------

    pub fn ellipsoids(&self) -> &EllipsoidTable {
        &self.ellipsoids
    }

    pub fn ellipsoid_count(&self) -> Result<usize, ReturnCode> {
        self.ready()?;
        Ok(self.ellipsoids.len())
    }

    pub fn ellipsoid_index(&self, code: &str) -> Result<usize, ReturnCode> {
        self.ready()?;
        self.ellipsoids.index(code)
    }

    pub fn ellipsoid_name(&self, index: usize) -> Result<&str, ReturnCode> {
        self.ready()?;
        self.ellipsoids.name(index)
    }

    pub fn ellipsoid_code(&self, index: usize) -> Result<&str, ReturnCode> {
        self.ready()?;
        self.ellipsoids.code(index)
    }

    /// Semimajor axis and flattening
    pub fn ellipsoid_parameters(&self, index: usize) -> Result<(f64, f64), ReturnCode> {
        self.ready()?;
        self.ellipsoids.parameters(index)
    }

    pub fn ellipsoid_eccentricity_squared(&self, index: usize) -> Result<f64, ReturnCode> {
        self.ready()?;
        self.ellipsoids.eccentricity_squared(index)
    }

    pub fn ellipsoid_user_defined(&self, index: usize) -> Result<bool, ReturnCode> {
        self.ready()?;
        self.ellipsoids.user_defined(index)
    }

    pub fn define_ellipsoid(&mut self, code: &str, name: &str, a: f64, inverse_flattening: f64) -> Result<(), ReturnCode> {
        self.ready()?;
        self.ellipsoids.define(code, name, a, inverse_flattening)
    }

    /// Remove a user defined ellipsoid that no datum refers to
    pub fn remove_ellipsoid(&mut self, code: &str) -> Result<(), ReturnCode> {
        self.ready()?;
        let in_use = self.datums.uses_ellipsoid(code);
        self.ellipsoids.remove(code, in_use)
    }

    // ----- Datums --------------------------------------------------------------------

    pub fn datums(&self) -> &DatumTable {
        &self.datums
    }

    pub fn datum_count(&self) -> Result<usize, ReturnCode> {
        self.ready()?;
        Ok(self.datums.len())
    }

    pub fn datum_index(&self, code: &str) -> Result<usize, ReturnCode> {
        self.ready()?;
        self.datums.index(code)
    }

    pub fn datum_name(&self, index: usize) -> Result<&str, ReturnCode> {
        self.ready()?;
        self.datums.name(index)
    }

    pub fn datum_code(&self, index: usize) -> Result<&str, ReturnCode> {
        self.ready()?;
        self.datums.code(index)
    }

    pub fn datum_ellipsoid_code(&self, index: usize) -> Result<&str, ReturnCode> {
        self.ready()?;
        self.datums.ellipsoid_code(index)
    }

    pub fn datum_kind(&self, index: usize) -> Result<DatumKind, ReturnCode> {
        self.ready()?;
        self.datums.kind(index)
    }

    /// dx, dy, dz (m), rx, ry, rz (rad), scale difference
    pub fn datum_seven_parameters(&self, index: usize) -> Result<[f64; 7], ReturnCode> {
        self.ready()?;
        self.datums.seven_parameters(index)
    }

    pub fn datum_three_parameters(&self, index: usize) -> Result<[f64; 3], ReturnCode> {
        self.ready()?;
        self.datums.three_parameters(index)
    }

    /// The standard errors of the translations
    pub fn datum_errors(&self, index: usize) -> Result<[f64; 3], ReturnCode> {
        self.ready()?;
        self.datums.errors(index)
    }

    /// South, north, west, east
    pub fn datum_valid_rectangle(&self, index: usize) -> Result<[f64; 4], ReturnCode> {
        self.ready()?;
        self.datums.valid_rectangle(index)
    }

    pub fn datum_user_defined(&self, index: usize) -> Result<bool, ReturnCode> {
        self.ready()?;
        self.datums.user_defined(index)
    }

    /// Is (latitude, longitude) inside the rectangle of validity of the datum?
    pub fn check_valid_datum(&self, index: usize, latitude: f64, longitude: f64) -> Result<bool, ReturnCode> {
        self.ready()?;
        self.datums.valid(index, latitude, longitude)
    }

    pub fn define_datum(&mut self, definition: &DatumDefinition) -> Result<(), ReturnCode> {
        self.ready()?;
        self.datums.define(definition, &self.ellipsoids)
    }

    /// Remove a user defined datum. Slots referring to it revert to WGS84,
    /// slots referring to datums further down the table follow them.
    pub fn remove_datum(&mut self, code: &str) -> Result<(), ReturnCode> {
        self.ready()?;
        let removed = self.datums.index(code)?;
        self.datums.remove(code)?;

        for slot in self.slots.iter_mut().flatten() {
            if slot.datum_index == removed {
                warn!("Datum {code} removed: slot reverts to WGS84");
                slot.datum_index = WGS84_DATUM_INDEX;
            } else if slot.datum_index > removed {
                slot.datum_index -= 1;
            }
        }
        Ok(())
    }
}

// ----- T E S T S ---------------------------------------------------------------------
