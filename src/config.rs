//! Locating the data files: the ellipsoid table, the two datum tables,
//! and the geoid grid. A file that is not found is not an error: the
//! engine falls back to its built-in table (or, for the geoid, to zero
//! undulations).

use log::{debug, info};
use std::path::{Path, PathBuf};

pub const ELLIPSOID_FILE: &str = "ellips.dat";
pub const SEVEN_PARAMETER_FILE: &str = "7_param.dat";
pub const THREE_PARAMETER_FILE: &str = "3_param.dat";
pub const GEOID_FILE: &str = "WW15MGH.GRD";

/// Environment variables, each naming a directory
pub const ELLIPSOID_DATA: &str = "ELLIPSOID_DATA";
pub const DATUM_DATA: &str = "DATUM_DATA";
pub const GEOID_DATA: &str = "GEOID_DATA";

/// Where to find the data files. `None` means "use the built-in fallback".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataFiles {
    pub ellipsoids: Option<PathBuf>,
    pub seven_parameter_datums: Option<PathBuf>,
    pub three_parameter_datums: Option<PathBuf>,
    pub geoid: Option<PathBuf>,
}

impl DataFiles {
    /// Built-in tables only
    pub fn builtin() -> DataFiles {
        DataFiles::default()
    }

    /// Look for the files by their conventional names, all in `dir`
    pub fn from_dir(dir: &Path) -> DataFiles {
        DataFiles {
            ellipsoids: existing(dir, ELLIPSOID_FILE),
            seven_parameter_datums: existing(dir, SEVEN_PARAMETER_FILE),
            three_parameter_datums: existing(dir, THREE_PARAMETER_FILE),
            geoid: existing(dir, GEOID_FILE),
        }
    }

    /// Look for the files in the directories named by the environment
    /// variables `ELLIPSOID_DATA`, `DATUM_DATA` and `GEOID_DATA`
    pub fn from_env() -> DataFiles {
        let dir = |var: &str| std::env::var_os(var).map(PathBuf::from);
        let ellipsoid_dir = dir(ELLIPSOID_DATA);
        let datum_dir = dir(DATUM_DATA);
        let geoid_dir = dir(GEOID_DATA);
        let lookup = |dir: &Option<PathBuf>, name| dir.as_deref().and_then(|d| existing(d, name));

        DataFiles {
            ellipsoids: lookup(&ellipsoid_dir, ELLIPSOID_FILE),
            seven_parameter_datums: lookup(&datum_dir, SEVEN_PARAMETER_FILE),
            three_parameter_datums: lookup(&datum_dir, THREE_PARAMETER_FILE),
            geoid: lookup(&geoid_dir, GEOID_FILE),
        }
    }

    /// The files found in `./geotrans` or, failing that, in the
    /// `geotrans` directory under the user's local data directory.
    /// Files are looked up individually, so the two locations may be mixed.
    #[cfg(feature = "data_dir")]
    pub fn user_default() -> DataFiles {
        let mut dirs: Vec<PathBuf> = vec![[".", "geotrans"].iter().collect()];
        if let Some(mut user_dir) = dirs::data_local_dir() {
            user_dir.push("geotrans");
            dirs.push(user_dir);
        }

        let first = |name| dirs.iter().find_map(|dir| existing(dir, name));
        DataFiles {
            ellipsoids: first(ELLIPSOID_FILE),
            seven_parameter_datums: first(SEVEN_PARAMETER_FILE),
            three_parameter_datums: first(THREE_PARAMETER_FILE),
            geoid: first(GEOID_FILE),
        }
    }

    /// Fill in the files missing from `self` with those of `other`
    pub fn or(self, other: DataFiles) -> DataFiles {
        DataFiles {
            ellipsoids: self.ellipsoids.or(other.ellipsoids),
            seven_parameter_datums: self.seven_parameter_datums.or(other.seven_parameter_datums),
            three_parameter_datums: self.three_parameter_datums.or(other.three_parameter_datums),
            geoid: self.geoid.or(other.geoid),
        }
    }
}

fn existing(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    if path.is_file() {
        info!("Found {}", path.display());
        return Some(path);
    }
    debug!("No {name} in {}", dir.display());
    None
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dir() -> Result<(), crate::Error> {
        let dir = std::env::temp_dir().join(format!("geotrans-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join(ELLIPSOID_FILE), "")?;

        let files = DataFiles::from_dir(&dir);
        assert_eq!(files.ellipsoids, Some(dir.join(ELLIPSOID_FILE)));
        assert_eq!(files.seven_parameter_datums, None);
        assert_eq!(files.geoid, None);

        let geoid = PathBuf::from("elsewhere/WW15MGH.GRD");
        let merged = files.or(DataFiles {
            ellipsoids: Some(PathBuf::from("ignored")),
            geoid: Some(geoid.clone()),
            ..Default::default()
        });
        assert_eq!(merged.ellipsoids, Some(dir.join(ELLIPSOID_FILE)));
        assert_eq!(merged.geoid, Some(geoid));

        std::fs::remove_dir_all(&dir)?;
        assert_eq!(DataFiles::from_dir(&dir), DataFiles::builtin());
        Ok(())
    }
}
