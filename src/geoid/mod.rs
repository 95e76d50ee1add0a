//! Geoid undulations from a gridded geoid model.
//!
//! The grid file layout is shared by the NGA `WW15MGH.GRD` EGM96 grid and
//! the Gravsoft geoid grids: whitespace separated numbers, `#` comments,
//! a six number header
//!
//! ```text
//! lat_s lat_n lon_w lon_e dlat dlon
//! ```
//!
//! in degrees, followed by the grid values in metres, row by row from north
//! to south, each row from west to east.

use crate::status::ReturnCode;
use crate::Error;
use log::{info, trace, warn};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::io::BufRead;
use std::path::Path;

/// Geoid grid characteristics and values. Angles in degrees.
#[derive(Debug, Default, Clone)]
pub struct GeoidGrid {
    pub lat_n: f64, // Latitude of the first (northernmost) row
    pub lat_s: f64, // Latitude of the last (southernmost) row
    pub lon_w: f64, // Longitude of the first (westernmost) column of each row
    pub lon_e: f64, // Longitude of the last (easternmost) column of each row
    pub dlat: f64,
    pub dlon: f64,
    pub rows: usize,
    pub cols: usize,
    values: Vec<f32>,
}

impl GeoidGrid {
    /// Read a grid in the Gravsoft layout. Discard '#'-style comments
    pub fn parse(buf: &[u8]) -> Result<GeoidGrid, Error> {
        let all = std::io::BufReader::new(buf);
        let mut values = Vec::<f32>::new();
        let mut header = Vec::<f64>::new();

        for line in all.lines() {
            let line = line?;
            let line = line.split('#').next().unwrap_or_default();
            for item in line.split_whitespace() {
                let value = item
                    .parse::<f64>()
                    .map_err(|_| Error::BadParam(item.to_string(), "geoid grid".to_string()))?;
                // The header is the first 6 numbers of the file
                if header.len() < 6 {
                    header.push(value);
                } else {
                    values.push(value as f32);
                }
            }
        }

        if header.len() < 6 {
            return Err(Error::General("Incomplete geoid grid header"));
        }

        // The header has lat_s before lat_n
        let (lat_s, lat_n, lon_w, lon_e) = (header[0], header[1], header[2], header[3]);
        let (dlat, dlon) = (header[4].abs(), header[5].abs());
        if dlat == 0. || dlon == 0. || lat_n <= lat_s || lon_e <= lon_w {
            return Err(Error::General("Malformed geoid grid header"));
        }

        let rows = ((lat_n - lat_s) / dlat + 1.5).floor() as usize;
        let cols = ((lon_e - lon_w) / dlon + 1.5).floor() as usize;
        if rows < 2 || cols < 2 || rows * cols > values.len() {
            return Err(Error::General("Incomplete geoid grid"));
        }
        if rows * cols != values.len() {
            return Err(Error::General("Unrecognized material at end of geoid grid"));
        }

        Ok(GeoidGrid {
            lat_n,
            lat_s,
            lon_w,
            lon_e,
            dlat,
            dlon,
            rows,
            cols,
            values,
        })
    }

    /// Bilinear interpolation at (latitude, longitude), in degrees. Points
    /// outside of the grid are extrapolated from the nearest grid cell.
    // Since we store the entire grid in a single vector, this looks strongly
    // like a case of "writing Fortran 77 in Rust", but it is short and fast.
    pub fn at(&self, latitude: f64, longitude: f64) -> f64 {
        // Global grids start at 0 degrees east
        let mut longitude = longitude;
        if self.lon_w >= 0. && longitude < self.lon_w {
            longitude += 360.;
        }

        // The interpolation coordinate relative to the grid origin
        let rlon = longitude - self.lon_w;
        let rlat = self.lat_n - latitude;

        // The (row, column) of the lower left node of the grid cell containing
        // the interpolation coordinate - or, in the case of extrapolation:
        // the nearest cell inside the grid.
        let row = (rlat / self.dlat).ceil() as i64;
        let col = (rlon / self.dlon).floor() as i64;
        let col = col.clamp(0_i64, (self.cols - 2) as i64) as usize;
        let row = row.clamp(1_i64, (self.rows - 1) as i64) as usize;

        #[rustfmt::skip]
        let (ll, lr, ul, ur) = (
            self.cols *  row      + col,
            self.cols *  row      + col + 1,
            self.cols * (row - 1) + col,
            self.cols * (row - 1) + col + 1,
        );

        let ll_lon = self.lon_w + col as f64 * self.dlon;
        let ll_lat = self.lat_n - row as f64 * self.dlat;

        // Cell relative, cell unit coordinates in a right handed CS
        let rlon = (longitude - ll_lon) / self.dlon;
        let rlat = (latitude - ll_lat) / self.dlat;

        let v = |i: usize| self.values[i] as f64;
        let left = (1. - rlat) * v(ll) + rlat * v(ul);
        let right = (1. - rlat) * v(lr) + rlat * v(ur);
        (1. - rlon) * left + rlon * right
    }
}

/// The geoid model of the engine. Without a grid, the geoid coincides with
/// the ellipsoid, and all undulations are zero.
#[derive(Debug, Default, Clone)]
pub struct Geoid {
    grid: Option<GeoidGrid>,
}

impl Geoid {
    pub fn new(grid: GeoidGrid) -> Geoid {
        Geoid { grid: Some(grid) }
    }

    /// A geoid model without a grid
    pub fn none() -> Geoid {
        warn!("No geoid grid available: geoid heights equal ellipsoid heights");
        Geoid { grid: None }
    }

    pub fn from_file(path: &Path) -> Result<Geoid, Error> {
        let buf = std::fs::read(path)?;
        let grid = GeoidGrid::parse(&buf)?;
        info!("Read {}x{} geoid grid from {}", grid.rows, grid.cols, path.display());
        Ok(Geoid::new(grid))
    }

    pub fn has_grid(&self) -> bool {
        self.grid.is_some()
    }

    /// The geoid undulation, N, at (latitude, longitude), in radians
    pub fn undulation(&self, latitude: f64, longitude: f64) -> Result<f64, ReturnCode> {
        let mut status = ReturnCode::NO_ERROR;
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            status |= ReturnCode::LAT;
        }
        if !(-PI..=TAU).contains(&longitude) {
            status |= ReturnCode::LON;
        }
        status.into_result()?;

        let Some(grid) = &self.grid else {
            return Ok(0.);
        };
        let n = grid.at(latitude.to_degrees(), longitude.to_degrees());
        trace!("Geoid undulation {n} at ({latitude}, {longitude})");
        Ok(n)
    }

    /// Height above the ellipsoid to height above the geoid (mean sea level)
    pub fn ellipsoid_to_geoid_height(&self, latitude: f64, longitude: f64, height: f64) -> Result<f64, ReturnCode> {
        Ok(height - self.undulation(latitude, longitude)?)
    }

    /// Height above the geoid (mean sea level) to height above the ellipsoid
    pub fn geoid_to_ellipsoid_height(&self, latitude: f64, longitude: f64, height: f64) -> Result<f64, ReturnCode> {
        Ok(height + self.undulation(latitude, longitude)?)
    }
}

// ----- T E S T S ------------------------------------------------------------------
