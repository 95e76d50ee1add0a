//! Universal Polar Stereographic, [DMA (1989)](crate::Bibliography::Dma89)
use super::polarst::PolarStereographic;
use super::*;

const SCALE_FACTOR: f64 = 0.994;
const FALSE_EASTING: f64 = 2_000_000.;
const FALSE_NORTHING: f64 = 2_000_000.;
const MAX_EAST_NORTH: f64 = 4_000_000.;

// The UPS regions overlap the UTM ones by half a degree
const MIN_NORTH_LATITUDE: f64 = (PI * 83.5) / 180.0;
const MAX_SOUTH_LATITUDE: f64 = (PI * -79.5) / 180.0;

#[derive(Clone, Debug)]
pub struct Ups {
    north: PolarStereographic,
    south: PolarStereographic,
}

impl Ups {
    pub fn new(ellps: &Ellipsoid) -> Result<Ups, Status> {
        check_ellipsoid(ellps).into_result()?;
        let offsets = (0., FALSE_EASTING, FALSE_NORTHING);
        Ok(Ups {
            north: PolarStereographic::with_scale_factor(ellps, Hemisphere::North, SCALE_FACTOR, offsets),
            south: PolarStereographic::with_scale_factor(ellps, Hemisphere::South, SCALE_FACTOR, offsets),
        })
    }

    fn zone(&self, hemisphere: Hemisphere) -> &PolarStereographic {
        match hemisphere {
            Hemisphere::North => &self.north,
            Hemisphere::South => &self.south,
        }
    }

    fn in_range(latitude: f64) -> bool {
        latitude >= MIN_NORTH_LATITUDE || latitude <= MAX_SOUTH_LATITUDE
    }

    pub fn forward(&self, latitude: f64, longitude: f64) -> Conversion<UpsCoordinates> {
        let mut status = check_geodetic(latitude, longitude);
        if !Ups::in_range(latitude) {
            status |= Issue::Latitude;
        }
        status.into_result()?;

        let hemisphere = Hemisphere::of(latitude);
        let (xy, warnings) = self.zone(hemisphere).forward(latitude, longitude)?;
        let ups = UpsCoordinates {
            easting: xy.easting,
            northing: xy.northing,
            hemisphere,
        };
        Ok((ups, warnings))
    }

    /// Returns (latitude, longitude)
    pub fn inverse(&self, ups: &UpsCoordinates) -> Conversion<(f64, f64)> {
        let mut status = Status::new();
        if !(0.0..=MAX_EAST_NORTH).contains(&ups.easting) {
            status |= Issue::Easting;
        }
        if !(0.0..=MAX_EAST_NORTH).contains(&ups.northing) {
            status |= Issue::Northing;
        }
        status.into_result()?;

        let xy = MapCoordinates::new(ups.easting, ups.northing);
        let ((latitude, longitude), warnings) = self.zone(ups.hemisphere).inverse(xy)?;
        if !Ups::in_range(latitude) {
            return Err(Status::from(Issue::Latitude));
        }
        Ok(((latitude, longitude), warnings))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn poles_and_quadrants() -> Result<(), Status> {
        let ups = Ups::new(&Ellipsoid::default())?;

        let (pole, _) = ups.forward(FRAC_PI_2, 0.)?;
        assert_eq!(pole.hemisphere, Hemisphere::North);
        assert_float_eq!(pole.easting, FALSE_EASTING, abs <= 1e-9);
        assert_float_eq!(pole.northing, FALSE_NORTHING, abs <= 1e-9);

        // North: the Greenwich meridian points down, 90°E points right.
        let (n, _) = ups.forward(85_f64.to_radians(), 0.)?;
        assert_float_eq!(n.easting, FALSE_EASTING, abs <= 1e-6);
        assert!(n.northing < FALSE_NORTHING);
        let (e, _) = ups.forward(85_f64.to_radians(), FRAC_PI_2)?;
        assert!(e.easting > FALSE_EASTING);
        assert_float_eq!(e.northing, FALSE_NORTHING, abs <= 1e-6);

        // South: the Greenwich meridian points up
        let (s, _) = ups.forward(-85_f64.to_radians(), 0.)?;
        assert_eq!(s.hemisphere, Hemisphere::South);
        assert!(s.northing > FALSE_NORTHING);
        assert_float_eq!(s.northing - FALSE_NORTHING, FALSE_NORTHING - n.northing, abs <= 1e-6);

        for (lat, lon) in [(84., 30.), (88., -135.), (-80., 170.), (-89., -10.)] {
            let (lat, lon) = (rad(lat), rad(lon));
            let (ups_coord, _) = ups.forward(lat, lon)?;
            let ((lat2, lon2), _) = ups.inverse(&ups_coord)?;
            assert_float_eq!(lat, lat2, abs <= 1e-11);
            assert_float_eq!(lon, lon2, abs <= 1e-11);
        }
        Ok(())
    }

    fn rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    #[test]
    fn domain() -> Result<(), Status> {
        let ups = Ups::new(&Ellipsoid::default())?;
        let Err(status) = ups.forward(60_f64.to_radians(), 0.) else {
            panic!("Expected a latitude error outside the polar regions");
        };
        assert!(status.contains(Issue::Latitude));

        let far = UpsCoordinates {
            easting: -1.,
            northing: 4_000_001.,
            hemisphere: Hemisphere::North,
        };
        let Err(status) = ups.inverse(&far) else {
            panic!("Expected range errors");
        };
        assert!(status.contains(Issue::Easting));
        assert!(status.contains(Issue::Northing));

        // Inside the grid square, but too far from the pole
        let corner = UpsCoordinates {
            easting: 100.,
            northing: 100.,
            hemisphere: Hemisphere::North,
        };
        assert!(ups.inverse(&corner).is_err());
        Ok(())
    }
}
