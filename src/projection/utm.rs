//! Universal Transverse Mercator, [DMA (1989)](crate::Bibliography::Dma89)
use super::tmerc::TransverseMercator;
use super::*;

const MIN_LATITUDE: f64 = (PI * -80.5) / 180.0;
const MAX_LATITUDE: f64 = (PI * 84.5) / 180.0;
const MIN_EASTING: f64 = 100_000.;
const MAX_EASTING: f64 = 900_000.;
const MIN_NORTHING: f64 = 0.;
const MAX_NORTHING: f64 = 10_000_000.;

const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.;
const SOUTHERN_FALSE_NORTHING: f64 = 10_000_000.;

#[derive(Clone, Debug)]
pub struct Utm {
    ellps: Ellipsoid,
    override_zone: Option<u8>,
}

impl Utm {
    pub fn new(p: &UtmParameters, ellps: &Ellipsoid) -> Result<Utm, Status> {
        let mut status = check_ellipsoid(ellps);
        if p.override_zone && !(1..=60).contains(&p.zone) {
            status |= Issue::Zone;
        }
        status.into_result()?;
        Ok(Utm {
            ellps: *ellps,
            override_zone: p.override_zone.then_some(p.zone),
        })
    }

    /// The zone a point naturally belongs to, including the Norwegian and
    /// Svalbard exceptions. Both angles in radians.
    pub fn natural_zone(latitude: f64, longitude: f64) -> u8 {
        // Whole degrees, longitude in [0, 360)
        let lat = latitude.to_degrees().trunc() as i32;
        let lon = angular::normalize_positive(longitude).to_degrees().floor() as i32;

        let mut zone = if lon < 180 { 31 + lon / 6 } else { lon / 6 - 29 };
        if zone > 60 {
            zone = 1;
        }

        if lat > 55 && lat < 64 {
            if lon < 3 {
                zone = 31;
            } else if lon < 12 {
                zone = 32;
            }
        }
        if lat > 71 {
            zone = match lon {
                0..=8 => 31,
                9..=20 => 33,
                21..=32 => 35,
                33..=41 => 37,
                _ => zone,
            };
        }
        zone as u8
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellps
    }

    pub fn central_meridian(zone: u8) -> f64 {
        let zone = zone as f64;
        if zone >= 31. {
            (6. * zone - 183.).to_radians()
        } else {
            (6. * zone + 177.).to_radians()
        }
    }

    fn projection(&self, zone: u8, hemisphere: Hemisphere) -> Result<TransverseMercator, Status> {
        let false_northing = match hemisphere {
            Hemisphere::North => 0.,
            Hemisphere::South => SOUTHERN_FALSE_NORTHING,
        };
        let p = ScaledParameters {
            origin_latitude: 0.,
            central_meridian: Utm::central_meridian(zone),
            scale_factor: SCALE_FACTOR,
            false_easting: FALSE_EASTING,
            false_northing,
        };
        TransverseMercator::new(&p, &self.ellps)
    }

    // An override may move a point at most one zone away from its natural
    // zone (two, in the irregular Svalbard region)
    fn zone_override(&self, natural: u8, latitude: f64, longitude: f64) -> Result<u8, Status> {
        let Some(zone) = self.override_zone else {
            return Ok(natural);
        };
        if (natural == 1 && zone == 60) || (natural == 60 && zone == 1) {
            return Ok(zone);
        }
        let lon = angular::normalize_positive(longitude).to_degrees();
        let reach = if latitude.to_degrees() > 71. && lon < 42. { 2 } else { 1 };
        let (natural, zone) = (natural as i32, zone as i32);
        if (natural - reach..=natural + reach).contains(&zone) {
            return Ok(zone as u8);
        }
        Err(Status::from(Issue::ZoneOverride))
    }

    pub fn forward(&self, latitude: f64, longitude: f64) -> Conversion<UtmCoordinates> {
        let mut status = check_geodetic(latitude, longitude);
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            status |= Issue::Latitude;
        }
        status.into_result()?;

        // Tiny negative latitudes belong to the northern hemisphere
        let latitude = if latitude > -1e-9 && latitude < 0. { 0. } else { latitude };

        let zone = Utm::natural_zone(latitude, longitude);
        let zone = self.zone_override(zone, latitude, longitude)?;
        let hemisphere = Hemisphere::of(latitude);

        let (xy, warnings) = self.projection(zone, hemisphere)?.forward(latitude, longitude)?;

        let mut status = Status::new();
        if !(MIN_EASTING..=MAX_EASTING).contains(&xy.easting) {
            status |= Issue::Easting;
        }
        if !(MIN_NORTHING..=MAX_NORTHING).contains(&xy.northing) {
            status |= Issue::Northing;
        }
        status.into_result()?;

        let utm = UtmCoordinates {
            easting: xy.easting,
            northing: xy.northing,
            zone,
            hemisphere,
        };
        Ok((utm, warnings))
    }

    /// Returns (latitude, longitude)
    pub fn inverse(&self, utm: &UtmCoordinates) -> Conversion<(f64, f64)> {
        let mut status = Status::new();
        if !(1..=60).contains(&utm.zone) {
            status |= Issue::Zone;
        }
        if !(MIN_EASTING..=MAX_EASTING).contains(&utm.easting) {
            status |= Issue::Easting;
        }
        if !(MIN_NORTHING..=MAX_NORTHING).contains(&utm.northing) {
            status |= Issue::Northing;
        }
        status.into_result()?;

        let tm = self.projection(utm.zone, utm.hemisphere)?;
        let xy = MapCoordinates::new(utm.easting, utm.northing);
        let ((latitude, longitude), warnings) = tm.inverse(xy)?;

        // A northing beyond the UTM latitude range
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(Status::from(Issue::Northing));
        }
        Ok(((latitude, longitude), warnings))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    fn rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    #[test]
    fn zones() {
        assert_eq!(Utm::natural_zone(0., rad(3.)), 31);
        assert_eq!(Utm::natural_zone(0., rad(-177.)), 1);
        assert_eq!(Utm::natural_zone(0., rad(179.9)), 60);
        assert_eq!(Utm::natural_zone(rad(40.), rad(12.)), 33);
        assert_eq!(Utm::natural_zone(rad(-30.), rad(20.)), 34);

        // Southwestern Norway
        assert_eq!(Utm::natural_zone(rad(60.), rad(5.)), 32);
        assert_eq!(Utm::natural_zone(rad(60.), rad(2.)), 31);
        assert_eq!(Utm::natural_zone(rad(65.), rad(5.)), 31);

        // Svalbard
        assert_eq!(Utm::natural_zone(rad(78.), rad(10.)), 33);
        assert_eq!(Utm::natural_zone(rad(78.), rad(8.)), 31);
        assert_eq!(Utm::natural_zone(rad(78.), rad(22.)), 35);
        assert_eq!(Utm::natural_zone(rad(78.), rad(40.)), 37);

        assert_float_eq!(Utm::central_meridian(32), rad(9.), abs <= 1e-15);
        assert_float_eq!(Utm::central_meridian(1), rad(-177.), abs <= 1e-15);
    }

    #[test]
    fn zone_override() -> Result<(), Status> {
        let p = UtmParameters {
            zone: 32,
            override_zone: true,
        };
        let utm = Utm::new(&p, &Ellipsoid::default())?;

        // (55N, 12E) naturally falls in zone 33. Compare with PROJ:
        // echo 12 55 0 0 | cct -d18 +proj=utm +zone=32
        let (coord, _) = utm.forward(rad(55.), rad(12.))?;
        assert_eq!(coord.zone, 32);
        assert_eq!(coord.hemisphere, Hemisphere::North);
        assert_float_eq!(coord.easting, 691_875.632_139_661, abs <= 1e-8);
        assert_float_eq!(coord.northing, 6_098_907.825_005_012, abs <= 1e-8);

        // Two zones away is too far
        let Err(status) = utm.forward(rad(55.), rad(20.)) else {
            panic!("Expected a zone override error");
        };
        assert!(status.contains(Issue::ZoneOverride));

        let p = UtmParameters {
            zone: 61,
            override_zone: true,
        };
        let Err(status) = Utm::new(&p, &Ellipsoid::default()) else {
            panic!("Expected a zone error");
        };
        assert!(status.contains(Issue::Zone));
        Ok(())
    }

    #[test]
    fn forward_and_inverse() -> Result<(), Status> {
        let utm = Utm::new(&UtmParameters::default(), &Ellipsoid::default())?;

        // The default UTM coordinates: the equator at the central meridian of zone 31
        let ((lat, lon), _) = utm.inverse(&UtmCoordinates::default())?;
        assert_float_eq!(lat, 0., abs <= 1e-12);
        assert_float_eq!(lon, rad(3.), abs <= 1e-12);

        for (lat, lon) in [(-30., 20.), (60., 5.), (78., 10.), (-80., -179.), (84., 179.)] {
            let (coord, _) = utm.forward(rad(lat), rad(lon))?;
            assert_eq!(coord.hemisphere, Hemisphere::of(rad(lat)));
            let ((lat2, lon2), _) = utm.inverse(&coord)?;
            assert_float_eq!(lat2, rad(lat), abs <= 1e-11);
            assert_float_eq!(lon2, rad(lon), abs <= 1e-11);
        }

        let (south, _) = utm.forward(rad(-30.), rad(20.))?;
        assert_eq!(south.zone, 34);
        assert!(south.northing > 6_000_000.);
        Ok(())
    }

    #[test]
    fn domain() -> Result<(), Status> {
        let utm = Utm::new(&UtmParameters::default(), &Ellipsoid::default())?;
        let Err(status) = utm.forward(rad(85.), 0.) else {
            panic!("Expected a latitude error");
        };
        assert!(status.contains(Issue::Latitude));

        let bad = UtmCoordinates {
            easting: 50_000.,
            northing: -1.,
            zone: 0,
            hemisphere: Hemisphere::North,
        };
        let Err(status) = utm.inverse(&bad) else {
            panic!("Expected errors");
        };
        assert!(status.contains(Issue::Zone));
        assert!(status.contains(Issue::Easting));
        assert!(status.contains(Issue::Northing));
        Ok(())
    }
}
