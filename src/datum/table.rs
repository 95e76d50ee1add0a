//! The datum table: WGS84 and WGS72 at indices 1 and 2, followed by the
//! 7-parameter datums and then the 3-parameter datums. Indices are 1-based.

use super::{Datum, DatumKind};
use crate::ellipsoid::table::{WGS72_ELLIPSOID_CODE, WGS84_ELLIPSOID_CODE};
use crate::ellipsoid::EllipsoidTable;
use crate::status::ReturnCode;
use crate::Error;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const MAX_SEVEN_PARAMETER_DATUMS: usize = 25;
pub const MAX_THREE_PARAMETER_DATUMS: usize = 250;
const MAX_CODE_LENGTH: usize = 6;
const MAX_NAME_LENGTH: usize = 32;

pub const WGS84_DATUM_CODE: &str = "WGE";
pub const WGS72_DATUM_CODE: &str = "WGC";

#[rustfmt::skip]
const BUILTIN_SEVEN_PARAMETER_DATUMS: &str = r#"
EUR-7 "EUROPEAN 1950, Mean (7 Param)"    IN  -102.0 -102.0 -129.0  0.413 -0.184  0.385  0.0000024664
OGB-7 "ORDNANCE GB 1936, Mean (7 Param)" AA   446.448 -125.157 542.06  0.15  0.247  0.842 -0.0000204894
"#;

#[rustfmt::skip]
const BUILTIN_THREE_PARAMETER_DATUMS: &str = r#"
ADI-M   "ADINDAN, Mean"                  CD  -166   5   -15   5   204   3   -5   31   15   55
ARF-M   "ARC 1950, Mean"                 CD  -143  20   -90  33  -294  20  -45   -2    5   52
AUA     "AUSTRALIAN GEODETIC 1966"       AN  -133   3   -48   3   148   3  -46   -4  109  161
AUG     "AUSTRALIAN GEODETIC 1984"       AN  -134   2   -48   2   149   2  -46   -4  109  161
CAP     "CAPE"                           CD  -136   3  -108   6  -292   6  -43  -15   10   40
EUR-M   "EUROPEAN 1950, Mean"            IN   -87   3   -98   8  -121   5   30   80    5   33
HEN     "HERAT NORTH, Afghanistan"       IN  -333  -1  -222  -1   114  -1   23   44   55   81
NAS-C   "NORTH AMERICAN 1927, CONUS Mean" CC   -8   5   160   5   176   6   15   60 -135  -60
NAR-C   "NORTH AMERICAN 1983, CONUS"     RF     0   2     0   2     0   2   15   60 -135  -60
OGB-M   "ORDNANCE GB 1936, Mean"         AA   375  10  -111  10   431  15   44   66  -14    7
PRP-M   "PROV S AMERICAN 1956, Mean"     IN  -288  17   175  27  -376  27  -64   18  -90  -50
SAN-M   "SOUTH AMERICAN 1969, Mean"      SA   -57  15     1   6   -41   9  -65   25 -100  -25
TOY-M   "TOKYO, Mean"                    BR  -148  20   507   5   685  20   23   53  120  155
"#;

static BUILTIN_SEVEN: Lazy<Vec<Datum>> =
    Lazy::new(|| parse_lines(BUILTIN_SEVEN_PARAMETER_DATUMS, Datum::parse_seven_parameter).unwrap_or_default());

static BUILTIN_THREE: Lazy<Vec<Datum>> =
    Lazy::new(|| parse_lines(BUILTIN_THREE_PARAMETER_DATUMS, Datum::parse_three_parameter).unwrap_or_default());

fn parse_lines(
    text: &str,
    parser: fn(&str) -> Result<Option<Datum>, Error>,
) -> Result<Vec<Datum>, Error> {
    let mut datums = Vec::new();
    for line in text.lines() {
        if let Some(datum) = parser(line)? {
            datums.push(datum);
        }
    }
    Ok(datums)
}

/// The parameters of a new, user defined, 3-parameter datum.
/// Angles in radians, distances in metres.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatumDefinition {
    pub code: String,
    pub name: String,
    pub ellipsoid_code: String,
    /// dx, dy, dz
    pub shift: [f64; 3],
    /// Standard errors of dx, dy, dz: positive, or -1 if unknown
    pub sigma: [f64; 3],
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

#[derive(Clone, Debug)]
pub struct DatumTable {
    datums: Vec<Datum>,
    seven_parameter_count: usize,
    three_parameter_source: Option<PathBuf>,
}

impl Default for DatumTable {
    fn default() -> Self {
        DatumTable::builtin()
    }
}

impl DatumTable {
    /// The table of built-in datums. Changes are kept in memory only.
    pub fn builtin() -> DatumTable {
        DatumTable::assemble(BUILTIN_SEVEN.clone(), BUILTIN_THREE.clone())
    }

    fn assemble(seven: Vec<Datum>, three: Vec<Datum>) -> DatumTable {
        let mut datums = vec![
            Datum::global(WGS84_DATUM_CODE, "World Geodetic System 1984", WGS84_ELLIPSOID_CODE, DatumKind::Wgs84),
            Datum::global(WGS72_DATUM_CODE, "World Geodetic System 1972", WGS72_ELLIPSOID_CODE, DatumKind::Wgs72),
        ];
        let seven_parameter_count = seven.len();
        datums.extend(seven);
        datums.extend(three);
        DatumTable {
            datums,
            seven_parameter_count,
            three_parameter_source: None,
        }
    }

    /// Read the 7- and 3-parameter datum files. A missing file means the
    /// corresponding built-in datums are used. User defined datums are
    /// written back to the 3-parameter file.
    pub fn from_files(
        seven: Option<&Path>,
        three: Option<&Path>,
        ellipsoids: &EllipsoidTable,
    ) -> Result<DatumTable, Error> {
        let seven_datums = match seven {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let datums = parse_lines(&text, Datum::parse_seven_parameter)?;
                info!("Read {} 7-parameter datums from {}", datums.len(), path.display());
                datums
            }
            None => BUILTIN_SEVEN.clone(),
        };
        if seven_datums.len() > MAX_SEVEN_PARAMETER_DATUMS {
            return Err(Error::General("7-parameter datum table overflow"));
        }

        let three_datums = match three {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let datums = parse_lines(&text, Datum::parse_three_parameter)?;
                info!("Read {} 3-parameter datums from {}", datums.len(), path.display());
                datums
            }
            None => BUILTIN_THREE.clone(),
        };
        if three_datums.len() > MAX_THREE_PARAMETER_DATUMS {
            return Err(Error::General("3-parameter datum table overflow"));
        }

        let mut table = DatumTable::assemble(seven_datums, three_datums);
        table.three_parameter_source = three.map(Path::to_path_buf);

        for datum in &table.datums {
            if ellipsoids.index(&datum.ellipsoid_code).is_err() {
                warn!("Datum {} refers to unknown ellipsoid {}", datum.code, datum.ellipsoid_code);
                return Err(Error::NotFound(datum.ellipsoid_code.clone(), "ellipsoid table".to_string()));
            }
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.datums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datums.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Datum> {
        self.datums.iter()
    }

    pub fn three_parameter_source(&self) -> Option<&Path> {
        self.three_parameter_source.as_deref()
    }

    fn three_parameter_datums(&self) -> &[Datum] {
        &self.datums[2 + self.seven_parameter_count..]
    }

    /// The 1-based index of the datum with the given code (case insensitive)
    pub fn index(&self, code: &str) -> Result<usize, ReturnCode> {
        let code = code.trim().to_uppercase();
        self.datums
            .iter()
            .position(|datum| datum.code == code)
            .map(|i| i + 1)
            .ok_or(ReturnCode::INVALID_CODE)
    }

    pub fn entry(&self, index: usize) -> Result<&Datum, ReturnCode> {
        if index == 0 {
            return Err(ReturnCode::INVALID_INDEX);
        }
        self.datums.get(index - 1).ok_or(ReturnCode::INVALID_INDEX)
    }

    pub fn code(&self, index: usize) -> Result<&str, ReturnCode> {
        Ok(&self.entry(index)?.code)
    }

    pub fn name(&self, index: usize) -> Result<&str, ReturnCode> {
        Ok(&self.entry(index)?.name)
    }

    pub fn ellipsoid_code(&self, index: usize) -> Result<&str, ReturnCode> {
        Ok(&self.entry(index)?.ellipsoid_code)
    }

    pub fn kind(&self, index: usize) -> Result<DatumKind, ReturnCode> {
        Ok(self.entry(index)?.kind)
    }

    pub fn seven_parameters(&self, index: usize) -> Result<[f64; 7], ReturnCode> {
        Ok(self.entry(index)?.seven_parameters())
    }

    pub fn three_parameters(&self, index: usize) -> Result<[f64; 3], ReturnCode> {
        Ok(self.entry(index)?.three_parameters())
    }

    /// Standard errors of the translation parameters
    pub fn errors(&self, index: usize) -> Result<[f64; 3], ReturnCode> {
        Ok(self.entry(index)?.sigma)
    }

    /// south, north, west, east
    pub fn valid_rectangle(&self, index: usize) -> Result<[f64; 4], ReturnCode> {
        Ok(self.entry(index)?.valid_rectangle())
    }

    pub fn user_defined(&self, index: usize) -> Result<bool, ReturnCode> {
        Ok(self.entry(index)?.user_defined)
    }

    /// Is any datum defined on the ellipsoid with the given code?
    pub fn uses_ellipsoid(&self, ellipsoid_code: &str) -> bool {
        let code = ellipsoid_code.trim().to_uppercase();
        self.datums.iter().any(|datum| datum.ellipsoid_code == code)
    }

    /// Is (latitude, longitude) within the rectangle of validity of the datum?
    /// Out of range arguments are reported as errors, not as `false`.
    pub fn valid(&self, index: usize, latitude: f64, longitude: f64) -> Result<bool, ReturnCode> {
        let mut status = ReturnCode::NO_ERROR;
        let datum = self.entry(index);
        if datum.is_err() {
            status |= ReturnCode::INVALID_INDEX;
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            status |= ReturnCode::LAT;
        }
        if !(-PI..=TAU).contains(&longitude) {
            status |= ReturnCode::LON;
        }
        status.into_result()?;
        Ok(datum?.contains(latitude, longitude))
    }

    /// Add a user defined 3-parameter datum. All checks are run, and every
    /// failing check contributes its bit to the returned code.
    pub fn define(&mut self, definition: &DatumDefinition, ellipsoids: &EllipsoidTable) -> Result<(), ReturnCode> {
        if self.three_parameter_datums().len() >= MAX_THREE_PARAMETER_DATUMS {
            return Err(ReturnCode::DATUM_OVERFLOW);
        }

        let d = definition;
        let mut status = ReturnCode::NO_ERROR;
        for sigma in d.sigma {
            if !(sigma > 0.0 || sigma == -1.0) {
                status |= ReturnCode::DATUM_SIGMA;
            }
        }
        let latitudes = -FRAC_PI_2..=FRAC_PI_2;
        if !latitudes.contains(&d.south) || !latitudes.contains(&d.north) {
            status |= ReturnCode::LAT;
        }
        let longitudes = -PI..=TAU;
        if !longitudes.contains(&d.west) || !longitudes.contains(&d.east) {
            status |= ReturnCode::LON;
        }
        if d.south >= d.north || d.west >= d.east {
            status |= ReturnCode::DATUM_DOMAIN;
        }
        let code = d.code.trim().to_uppercase();
        if code.is_empty() || code.len() > MAX_CODE_LENGTH || self.index(&code).is_ok() {
            status |= ReturnCode::INVALID_CODE;
        }
        if ellipsoids.index(&d.ellipsoid_code).is_err() {
            status |= ReturnCode::ELLIPSOID_CODE;
        }
        status.into_result()?;

        self.datums.push(Datum {
            code,
            name: d.name.trim().chars().take(MAX_NAME_LENGTH).collect(),
            ellipsoid_code: d.ellipsoid_code.trim().to_uppercase(),
            kind: DatumKind::ThreeParameter,
            parameters: [d.shift[0], d.shift[1], d.shift[2], 0., 0., 0., 0.],
            sigma: d.sigma,
            south: d.south,
            north: d.north,
            west: d.west,
            east: d.east,
            user_defined: true,
        });
        self.persist()
    }

    /// Remove a user defined 3-parameter datum
    pub fn remove(&mut self, code: &str) -> Result<(), ReturnCode> {
        let index = self.index(code)?;
        if !self.datums[index - 1].user_defined {
            return Err(ReturnCode::NOT_USERDEF);
        }
        self.datums.remove(index - 1);
        self.persist()
    }

    /// Write the 3-parameter part of the table in the `3_param.dat` layout
    pub fn write_three_parameter_datums(&self, mut w: impl Write) -> Result<(), Error> {
        for datum in self.three_parameter_datums() {
            writeln!(w, "{}", datum.to_three_parameter_line())?;
        }
        Ok(())
    }

    // Write back to the 3-parameter file the table was read from, if any
    fn persist(&self) -> Result<(), ReturnCode> {
        let Some(path) = &self.three_parameter_source else {
            debug!("Datum table has no backing file: changes kept in memory");
            return Ok(());
        };
        let result = std::fs::File::create(path)
            .map_err(Error::from)
            .and_then(|file| self.write_three_parameter_datums(std::io::BufWriter::new(file)));
        if let Err(e) = result {
            error!("Could not write datum table to {}: {e}", path.display());
            return Err(ReturnCode::DATUM_ERROR);
        }
        info!("Wrote {} 3-parameter datums to {}", self.three_parameter_datums().len(), path.display());
        Ok(())
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> DatumDefinition {
        DatumDefinition {
            code: "usr".to_string(),
            name: "User datum".to_string(),
            ellipsoid_code: "IN".to_string(),
            shift: [-100., -110., -120.],
            sigma: [5., 5., -1.],
            south: 40_f64.to_radians(),
            north: 60_f64.to_radians(),
            west: 0.,
            east: 20_f64.to_radians(),
        }
    }

    #[test]
    fn builtin() -> Result<(), ReturnCode> {
        let table = DatumTable::builtin();
        assert_eq!(table.len(), 2 + 2 + 13);
        assert_eq!(table.code(1)?, "WGE");
        assert_eq!(table.kind(1)?, DatumKind::Wgs84);
        assert_eq!(table.code(2)?, "WGC");
        assert_eq!(table.ellipsoid_code(2)?, "WD");
        assert_eq!(table.kind(3)?, DatumKind::SevenParameter);
        assert_eq!(table.kind(5)?, DatumKind::ThreeParameter);

        let nas = table.index("nas-c")?;
        assert_eq!(table.three_parameters(nas)?, [-8., 160., 176.]);
        assert_eq!(table.errors(nas)?, [5., 5., 6.]);
        assert_eq!(table.user_defined(nas)?, false);
        assert!(table.uses_ellipsoid("CC"));
        assert!(!table.uses_ellipsoid("EA"));

        assert_eq!(table.index("NOPE"), Err(ReturnCode::INVALID_CODE));
        assert_eq!(table.entry(0).err(), Some(ReturnCode::INVALID_INDEX));
        Ok(())
    }

    #[test]
    fn validity() -> Result<(), ReturnCode> {
        let table = DatumTable::builtin();
        let nas = table.index("NAS-C")?;
        assert!(table.valid(nas, 40_f64.to_radians(), -100_f64.to_radians())?);
        assert!(!table.valid(nas, 0., 0.)?);
        assert!(table.valid(1, 0., 0.)?);

        let Err(code) = table.valid(999, 3., 7.) else {
            panic!("Expected failure");
        };
        assert!(code.contains(ReturnCode::INVALID_INDEX));
        assert!(code.contains(ReturnCode::LAT));
        assert!(code.contains(ReturnCode::LON));
        Ok(())
    }

    #[test]
    fn define_and_remove() -> Result<(), ReturnCode> {
        let ellipsoids = EllipsoidTable::builtin();
        let mut table = DatumTable::builtin();
        let n = table.len();

        // Every failing check is reported
        let broken = DatumDefinition {
            code: "NAS-C".to_string(),
            ellipsoid_code: "XX".to_string(),
            sigma: [0., 1., 1.],
            south: 2.,
            north: 1.,
            ..definition()
        };
        let Err(code) = table.define(&broken, &ellipsoids) else {
            panic!("Expected failure");
        };
        for bit in [
            ReturnCode::INVALID_CODE,
            ReturnCode::ELLIPSOID_CODE,
            ReturnCode::DATUM_SIGMA,
            ReturnCode::LAT,
            ReturnCode::DATUM_DOMAIN,
        ] {
            assert!(code.contains(bit));
        }
        assert!(!code.contains(ReturnCode::LON));
        assert_eq!(table.len(), n);

        table.define(&definition(), &ellipsoids)?;
        assert_eq!(table.len(), n + 1);
        let usr = table.index("USR")?;
        assert_eq!(usr, n + 1);
        assert!(table.user_defined(usr)?);
        assert_eq!(table.kind(usr)?, DatumKind::ThreeParameter);

        let mut buffer = Vec::new();
        assert!(table.write_three_parameter_datums(&mut buffer).is_ok());
        let text = String::from_utf8_lossy(&buffer);
        assert!(text.lines().any(|line| line.starts_with("*USR")));

        assert_eq!(table.remove("WGE"), Err(ReturnCode::NOT_USERDEF));
        assert_eq!(table.remove("NONE"), Err(ReturnCode::INVALID_CODE));
        table.remove("usr")?;
        assert_eq!(table.len(), n);
        Ok(())
    }

    #[test]
    fn files() -> Result<(), Error> {
        let dir = std::env::temp_dir().join(format!("geotrans-datum-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let three = dir.join("3_param.dat");
        std::fs::write(&three, BUILTIN_THREE_PARAMETER_DATUMS)?;

        let ellipsoids = EllipsoidTable::builtin();
        let mut table = DatumTable::from_files(None, Some(&three), &ellipsoids)?;
        assert_eq!(table.len(), DatumTable::builtin().len());
        table.define(&definition(), &ellipsoids)?;

        // The user defined datum survives a reload
        let table = DatumTable::from_files(None, Some(&three), &ellipsoids)?;
        let usr = table.index("USR")?;
        assert!(table.user_defined(usr)?);
        assert_eq!(table.errors(usr)?, [5., 5., -1.]);
        assert!((table.valid_rectangle(usr)?[1] - 60_f64.to_radians()).abs() < 1e-12);

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
