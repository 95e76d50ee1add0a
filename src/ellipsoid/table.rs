//! The table of named ellipsoids, in the `ellips.dat` layout:
//!
//! ```text
//! [*]NAME (30 columns)          CODE  a  b  1/f
//! ```
//!
//! A leading `*` marks a user defined entry. Only user defined entries
//! may be removed again.

use super::Ellipsoid;
use crate::status::ReturnCode;
use crate::Error;
use log::{debug, error, info};
use once_cell::sync::Lazy;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const MAX_ELLIPSOIDS: usize = 32;
const MAX_NAME_LENGTH: usize = 29;
const MAX_CODE_LENGTH: usize = 2;

pub const WGS84_ELLIPSOID_CODE: &str = "WE";
pub const WGS72_ELLIPSOID_CODE: &str = "WD";

#[rustfmt::skip]
const BUILTIN_ELLIPSOIDS: &str = "\
Airy 1830                      AA 6377563.396 6356256.9090 299.324964600
Modified Airy                  AM 6377340.189 6356034.4480 299.324964600
Australian National            AN 6378160.000 6356774.7190 298.250000000
Bessel 1841 (Namibia)          BN 6377483.865 6356165.3830 299.152812800
Bessel 1841                    BR 6377397.155 6356078.9630 299.152812800
Clarke 1866                    CC 6378206.400 6356583.8000 294.978698200
Clarke 1880                    CD 6378249.145 6356514.8700 293.465000000
Everest (India 1830)           EA 6377276.345 6356075.4130 300.801700000
Everest (Sabah & Sarawak)      EB 6377298.556 6356097.5500 300.801700000
Everest (India 1956)           EC 6377301.243 6356100.2280 300.801700000
Everest (Malaysia 1969)        ED 6377295.664 6356094.6680 300.801700000
Everest (Malay. & Sing)        EE 6377304.063 6356103.0390 300.801700000
Everest (Pakistan)             EF 6377309.613 6356108.5710 300.801700000
Modified Fischer 1960          FA 6378155.000 6356773.3205 298.300000000
Helmert 1906                   HE 6378200.000 6356818.1700 298.300000000
Hough 1960                     HO 6378270.000 6356794.3430 297.000000000
Indonesian 1974                ID 6378160.000 6356774.5040 298.247000000
International 1924             IN 6378388.000 6356911.9460 297.000000000
Krassovsky 1940                KA 6378245.000 6356863.0190 298.300000000
GRS 80                         RF 6378137.000 6356752.3141 298.257222101
South American 1969            SA 6378160.000 6356774.7190 298.250000000
WGS 72                         WD 6378135.000 6356750.5200 298.260000000
WGS 84                         WE 6378137.000 6356752.3142 298.257223563
";

static BUILTIN: Lazy<Vec<EllipsoidEntry>> = Lazy::new(|| {
    BUILTIN_ELLIPSOIDS
        .lines()
        .filter_map(|line| EllipsoidEntry::parse(line).ok().flatten())
        .collect()
});

/// One row of the ellipsoid table
#[derive(Clone, Debug, PartialEq)]
pub struct EllipsoidEntry {
    pub name: String,
    pub code: String,
    pub a: f64,
    pub b: f64,
    pub inverse_flattening: f64,
    pub user_defined: bool,
}

impl EllipsoidEntry {
    pub fn ellipsoid(&self) -> Ellipsoid {
        Ellipsoid::from_inverse_flattening(self.a, self.inverse_flattening)
    }

    /// Parse a single line of an ellipsoid file. The numeric columns and the
    /// code are read from the right, so the name may contain blanks.
    /// Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<EllipsoidEntry>, Error> {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return Ok(None);
        }

        let items = line.split_whitespace().collect::<Vec<_>>();
        if items.len() < 5 {
            return Err(Error::Syntax(format!("Incomplete ellipsoid line: '{line}'")));
        }
        let (head, tail) = items.split_at(items.len() - 3);

        let mut numbers = [0.0; 3];
        for (number, item) in numbers.iter_mut().zip(tail) {
            *number = item
                .parse::<f64>()
                .map_err(|_| Error::BadParam(item.to_string(), line.to_string()))?;
        }
        let [a, b, inverse_flattening] = numbers;

        // What remains is the name, followed by the code
        let code = head[head.len() - 1];
        let name = head[..head.len() - 1].join(" ");
        let (name, user_defined) = match name.strip_prefix('*') {
            Some(name) => (name.trim(), true),
            None => (name.as_str(), false),
        };

        Ok(Some(EllipsoidEntry {
            name: name.chars().take(MAX_NAME_LENGTH).collect(),
            code: code.to_string(),
            a,
            b,
            inverse_flattening,
            user_defined,
        }))
    }

    /// The line representation used when the table is written back to disk
    pub fn to_line(&self) -> String {
        let marker = if self.user_defined { "*" } else { "" };
        let name = format!("{marker}{}", self.name);
        format!(
            "{name:<30} {:<2} {:11.3} {:12.4} {:13.9}",
            self.code, self.a, self.b, self.inverse_flattening
        )
    }
}

/// The ellipsoid table. Indices are 1-based, as in the external interface.
#[derive(Clone, Debug)]
pub struct EllipsoidTable {
    entries: Vec<EllipsoidEntry>,
    source: Option<PathBuf>,
}

impl Default for EllipsoidTable {
    fn default() -> Self {
        EllipsoidTable::builtin()
    }
}

impl EllipsoidTable {
    /// The table of built-in ellipsoids. Changes are kept in memory only.
    pub fn builtin() -> EllipsoidTable {
        EllipsoidTable {
            entries: BUILTIN.clone(),
            source: None,
        }
    }

    /// Read a table from an ellipsoid file. User defined entries are written
    /// back to the same file.
    pub fn from_file(path: &Path) -> Result<EllipsoidTable, Error> {
        let text = std::fs::read_to_string(path)?;
        let mut table = EllipsoidTable::parse(&text)?;
        table.source = Some(path.to_path_buf());
        info!("Read {} ellipsoids from {}", table.len(), path.display());
        Ok(table)
    }

    /// Build a table from text in the ellipsoid file layout
    pub fn parse(text: &str) -> Result<EllipsoidTable, Error> {
        let mut entries = Vec::new();
        for line in text.lines() {
            if let Some(entry) = EllipsoidEntry::parse(line)? {
                entries.push(entry);
            }
        }

        if entries.len() > MAX_ELLIPSOIDS {
            return Err(Error::General("Ellipsoid table overflow"));
        }

        let table = EllipsoidTable {
            entries,
            source: None,
        };
        for code in [WGS84_ELLIPSOID_CODE, WGS72_ELLIPSOID_CODE] {
            if table.index(code).is_err() {
                return Err(Error::NotFound(code.to_string(), "ellipsoid table".to_string()));
            }
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EllipsoidEntry> {
        self.entries.iter()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The 1-based index of the ellipsoid with the given code (case insensitive)
    pub fn index(&self, code: &str) -> Result<usize, ReturnCode> {
        let code = code.trim().to_uppercase();
        self.entries
            .iter()
            .position(|entry| entry.code == code)
            .map(|i| i + 1)
            .ok_or(ReturnCode::INVALID_CODE)
    }

    pub fn entry(&self, index: usize) -> Result<&EllipsoidEntry, ReturnCode> {
        if index == 0 {
            return Err(ReturnCode::INVALID_INDEX);
        }
        self.entries.get(index - 1).ok_or(ReturnCode::INVALID_INDEX)
    }

    pub fn name(&self, index: usize) -> Result<&str, ReturnCode> {
        Ok(&self.entry(index)?.name)
    }

    pub fn code(&self, index: usize) -> Result<&str, ReturnCode> {
        Ok(&self.entry(index)?.code)
    }

    /// Semimajor axis and flattening of the ellipsoid at `index`
    pub fn parameters(&self, index: usize) -> Result<(f64, f64), ReturnCode> {
        let ellps = self.entry(index)?.ellipsoid();
        Ok((ellps.semimajor_axis(), ellps.flattening()))
    }

    pub fn eccentricity_squared(&self, index: usize) -> Result<f64, ReturnCode> {
        Ok(self.entry(index)?.ellipsoid().eccentricity_squared())
    }

    pub fn user_defined(&self, index: usize) -> Result<bool, ReturnCode> {
        Ok(self.entry(index)?.user_defined)
    }

    /// The ellipsoid with the given code
    pub fn ellipsoid(&self, code: &str) -> Result<Ellipsoid, ReturnCode> {
        let index = self.index(code)?;
        Ok(self.entry(index)?.ellipsoid())
    }

    /// Add a user defined ellipsoid. All checks are run, and every
    /// failing check contributes its bit to the returned code.
    pub fn define(
        &mut self,
        code: &str,
        name: &str,
        a: f64,
        inverse_flattening: f64,
    ) -> Result<(), ReturnCode> {
        if self.entries.len() >= MAX_ELLIPSOIDS {
            return Err(ReturnCode::ELLIPSOID_OVERFLOW);
        }

        let code = code.trim().to_uppercase();
        let mut status = ReturnCode::NO_ERROR;
        if code.is_empty() || code.len() > MAX_CODE_LENGTH || self.index(&code).is_ok() {
            status |= ReturnCode::INVALID_CODE;
        }
        if a <= 0.0 {
            status |= ReturnCode::A;
        }
        if !(250.0..=350.0).contains(&inverse_flattening) {
            status |= ReturnCode::INV_F;
        }
        status.into_result()?;

        self.entries.push(EllipsoidEntry {
            name: name.trim().chars().take(MAX_NAME_LENGTH).collect(),
            code,
            a,
            b: a * (1. - 1. / inverse_flattening),
            inverse_flattening,
            user_defined: true,
        });
        self.persist()
    }

    /// Remove a user defined ellipsoid. `in_use` tells whether any datum
    /// still refers to it.
    pub fn remove(&mut self, code: &str, in_use: bool) -> Result<(), ReturnCode> {
        let index = self.index(code)?;
        if !self.entries[index - 1].user_defined {
            return Err(ReturnCode::NOT_USERDEF);
        }
        if in_use {
            return Err(ReturnCode::ELLIPSE_IN_USE);
        }
        self.entries.remove(index - 1);
        self.persist()
    }

    /// Write the table in the ellipsoid file layout
    pub fn write(&self, mut w: impl Write) -> Result<(), Error> {
        for entry in &self.entries {
            writeln!(w, "{}", entry.to_line())?;
        }
        Ok(())
    }

    // Write back to the file the table was read from, if any
    fn persist(&self) -> Result<(), ReturnCode> {
        let Some(path) = &self.source else {
            debug!("Ellipsoid table has no backing file: changes kept in memory");
            return Ok(());
        };
        let result = std::fs::File::create(path)
            .map_err(Error::from)
            .and_then(|file| self.write(std::io::BufWriter::new(file)));
        if let Err(e) = result {
            error!("Could not write ellipsoid table to {}: {e}", path.display());
            return Err(ReturnCode::ELLIPSOID_ERROR);
        }
        info!("Wrote {} ellipsoids to {}", self.len(), path.display());
        Ok(())
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin() -> Result<(), ReturnCode> {
        let table = EllipsoidTable::builtin();
        assert_eq!(table.len(), 23);
        let we = table.index("we")?;
        assert_eq!(table.code(we)?, "WE");
        assert_eq!(table.name(we)?, "WGS 84");
        let (a, f) = table.parameters(we)?;
        assert_eq!(a, 6378137.0);
        assert!((1. / f - 298.257223563).abs() < 1e-9);

        let bessel = table.entry(table.index("BR")?)?;
        assert_eq!(bessel.name, "Bessel 1841");
        assert!(!bessel.user_defined);

        assert_eq!(table.index("XX"), Err(ReturnCode::INVALID_CODE));
        assert_eq!(table.entry(0), Err(ReturnCode::INVALID_INDEX));
        assert_eq!(table.entry(24), Err(ReturnCode::INVALID_INDEX));
        Ok(())
    }

    #[test]
    fn parse_lines() -> Result<(), Error> {
        let entry = EllipsoidEntry::parse("*My Own Ellipsoid              ZZ 6378000.000 6356000.0000 300.000000000")?;
        let Some(entry) = entry else {
            panic!("Expected an entry");
        };
        assert!(entry.user_defined);
        assert_eq!(entry.name, "My Own Ellipsoid");
        assert_eq!(entry.code, "ZZ");
        assert_eq!(entry.inverse_flattening, 300.0);

        // Written form reads back identically
        let again = EllipsoidEntry::parse(&entry.to_line())?;
        assert_eq!(again, Some(entry));

        assert_eq!(EllipsoidEntry::parse("   ")?, None);
        assert!(EllipsoidEntry::parse("Broken WE 6378137 x 298").is_err());
        assert!(EllipsoidTable::parse("Airy 1830 AA 6377563.396 6356256.909 299.3249646").is_err());
        Ok(())
    }

    #[test]
    fn define_and_remove() {
        let mut table = EllipsoidTable::builtin();

        // Every failing check is reported
        let result = table.define("WE", "Clash", -1., 100.);
        let Err(code) = result else {
            panic!("Expected failure");
        };
        assert!(code.contains(ReturnCode::INVALID_CODE));
        assert!(code.contains(ReturnCode::A));
        assert!(code.contains(ReturnCode::INV_F));
        assert_eq!(table.len(), 23);

        assert!(table.define("xy", "Test ellipsoid", 6378000., 299.).is_ok());
        assert_eq!(table.len(), 24);
        let Ok(index) = table.index("XY") else {
            panic!("Expected XY to be defined");
        };
        assert_eq!(table.user_defined(index), Ok(true));

        assert_eq!(table.remove("XY", true), Err(ReturnCode::ELLIPSE_IN_USE));
        assert_eq!(table.remove("IN", false), Err(ReturnCode::NOT_USERDEF));
        assert_eq!(table.remove("XY", false), Ok(()));
        assert_eq!(table.len(), 23);
    }
}
