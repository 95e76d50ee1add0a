//! Mercator, ellipsoidal form, Snyder (1987) ch. 7.
//!
//! The origin latitude is the latitude of true scale: the scale along it
//! is `scale_factor`. The northing is the isometric latitude, scaled.
use super::*;
use crate::math::ancillary::msfn;

/// 89.5°, the largest latitude that can be projected
const MAX_LAT: f64 = (PI * 89.5) / 180.0;

#[derive(Clone, Debug)]
pub struct Mercator {
    ellps: Ellipsoid,
    // a·k0, with k0 the scale factor at the equator
    ak0: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
    delta_northing: f64,
}

impl Mercator {
    pub fn new(p: &ScaledParameters, ellps: &Ellipsoid) -> Result<Mercator, Status> {
        let mut status = check_ellipsoid(ellps);
        if p.origin_latitude.abs() > MAX_LAT {
            status |= Issue::OriginLatitude;
        }
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        if !(0.3..=3.0).contains(&p.scale_factor) {
            status |= Issue::ScaleFactor;
        }
        status.into_result()?;

        let k0 = p.scale_factor * msfn(p.origin_latitude.sin_cos(), ellps.eccentricity_squared());
        let ak0 = ellps.semimajor_axis() * k0;
        Ok(Mercator {
            ellps: *ellps,
            ak0,
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
            delta_northing: ak0 * ellps.isometric_latitude(MAX_LAT),
        })
    }

    /// The scale factor along the equator
    pub fn equatorial_scale(&self) -> f64 {
        self.ak0 / self.ellps.semimajor_axis()
    }
}

impl Projection for Mercator {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        let mut status = check_geodetic(latitude, longitude);
        if latitude.abs() > MAX_LAT {
            status |= Issue::Latitude;
        }
        status.into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let easting = self.ak0 * dlam + self.false_easting;
        let northing = self.ak0 * self.ellps.isometric_latitude(latitude) + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        let extent = (PI * self.ak0 + 1e-3, self.delta_northing + 1e-3);
        check_extent(xy, origin, extent).into_result()?;

        let psi = (xy.northing - self.false_northing) / self.ak0;
        let latitude = self.ellps.latitude_from_isometric(psi);
        let dlam = ((xy.easting - self.false_easting) / self.ak0).clamp(-PI, PI);
        let longitude = self.central_meridian + dlam;
        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    fn rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    #[test]
    fn snyder_example() -> Result<(), Status> {
        // Snyder (1987), p. 267: Clarke 1866, λ0 = 180°W
        let clarke = Ellipsoid::from_inverse_flattening(6_378_206.4, 294.978_698_2);
        let p = ScaledParameters {
            central_meridian: rad(-180.),
            ..Default::default()
        };
        let merc = Mercator::new(&p, &clarke)?;
        let (xy, _) = merc.forward(rad(35.), rad(-75.))?;
        assert_float_eq!(xy.easting, 11_688_673.7, abs <= 0.1);
        assert_float_eq!(xy.northing, 4_139_145.6, abs <= 0.1);
        Ok(())
    }

    #[test]
    fn true_scale_latitude() -> Result<(), Status> {
        let ellps = Ellipsoid::default();
        let p = ScaledParameters {
            origin_latitude: rad(60.),
            ..Default::default()
        };
        let merc = Mercator::new(&p, &ellps)?;
        let es = ellps.eccentricity_squared();
        assert_float_eq!(merc.equatorial_scale(), msfn(rad(60.).sin_cos(), es), abs <= 1e-15);
        roundtrip(&merc, &[(0., 0.), (60., 100.), (-89., -179.), (89.5, 10.)], 1e-11);

        let Err(status) = merc.forward(rad(89.6), 0.) else {
            panic!("Expected a latitude error");
        };
        assert!(status.contains(Issue::Latitude));

        let p = ScaledParameters {
            origin_latitude: rad(89.9),
            scale_factor: 5.,
            ..Default::default()
        };
        let Err(status) = Mercator::new(&p, &ellps) else {
            panic!("Expected parameter errors");
        };
        assert!(status.contains(Issue::OriginLatitude));
        assert!(status.contains(Issue::ScaleFactor));
        Ok(())
    }
}
