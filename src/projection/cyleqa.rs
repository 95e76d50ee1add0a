//! Cylindrical Equal Area (Lambert, Behrmann, Gall-Peters...), ellipsoidal
//! form, Snyder (1987) ch. 10. The origin latitude is the standard parallel.
use super::*;
use crate::math::ancillary::{latitude_from_qs, msfn, qs};

#[derive(Clone, Debug)]
pub struct CylindricalEqualArea {
    a: f64,
    e: f64,
    k0: f64,
    // q at the north pole
    qp: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl CylindricalEqualArea {
    pub fn new(p: &OriginParameters, ellps: &Ellipsoid) -> Result<CylindricalEqualArea, Status> {
        let mut status = check_ellipsoid(ellps);
        // A polar standard parallel would squeeze the map to a line
        if p.origin_latitude.abs() >= FRAC_PI_2 {
            status |= Issue::OriginLatitude;
        }
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        let e = ellps.eccentricity();
        Ok(CylindricalEqualArea {
            a: ellps.semimajor_axis(),
            e,
            k0: msfn(p.origin_latitude.sin_cos(), ellps.eccentricity_squared()),
            qp: qs(1., e),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for CylindricalEqualArea {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let easting = self.a * self.k0 * dlam + self.false_easting;
        let northing = self.a * qs(latitude.sin(), self.e) / (2. * self.k0) + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        let extent = (PI * self.a * self.k0 + 1e-3, self.a * self.qp / (2. * self.k0) + 1e-3);
        check_extent(xy, origin, extent).into_result()?;

        let dx = xy.easting - self.false_easting;
        let dy = xy.northing - self.false_northing;

        // The authalic latitude, then the geographic
        let beta = (2. * dy * self.k0 / (self.a * self.qp)).clamp(-1., 1.).asin();
        let latitude = if (beta.abs() - FRAC_PI_2).abs() < 1e-12 {
            beta
        } else {
            latitude_from_qs(self.qp * beta.sin(), self.e).ok_or(Status::from(Issue::Northing))?
        };
        let dlam = (dx / (self.a * self.k0)).clamp(-PI, PI);
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
        // Snyder (1987), p. 266: Clarke 1866, φs = 5°, λ0 = 75°W
        let clarke = Ellipsoid::from_inverse_flattening(6_378_206.4, 294.978_698_2);
        let p = OriginParameters {
            origin_latitude: rad(5.),
            central_meridian: rad(-75.),
            ..Default::default()
        };
        let cea = CylindricalEqualArea::new(&p, &clarke)?;
        let (xy, _) = cea.forward(rad(5.), rad(-78.))?;
        assert_float_eq!(xy.easting, -332_699.8, abs <= 0.5);
        assert_float_eq!(xy.northing, 554_248.5, abs <= 0.5);

        let ((lat, lon), _) = cea.inverse(xy)?;
        assert_float_eq!(lat, rad(5.), abs <= 1e-10);
        assert_float_eq!(lon, rad(-78.), abs <= 1e-10);
        Ok(())
    }

    #[test]
    fn areas_and_poles() -> Result<(), Status> {
        let ellps = Ellipsoid::default();
        let cea = CylindricalEqualArea::new(&OriginParameters::default(), &ellps)?;
        roundtrip(&cea, &[(0., 0.), (45., 90.), (-80., -170.), (89., 0.)], 1e-9);

        let p = OriginParameters {
            origin_latitude: FRAC_PI_2,
            ..Default::default()
        };
        let Err(status) = CylindricalEqualArea::new(&p, &ellps) else {
            panic!("Expected an origin latitude error");
        };
        assert!(status.contains(Issue::OriginLatitude));
        Ok(())
    }
}
