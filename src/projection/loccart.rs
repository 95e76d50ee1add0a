//! Local cartesian coordinates: a topocentric east-north-up frame at a
//! given origin, optionally rotated about the up axis.
use super::geocentric::Geocentric;
use super::*;

#[derive(Clone, Debug)]
pub struct LocalCartesian {
    geocentric: Geocentric,
    // The origin, geocentric
    origin: (f64, f64, f64),
    // (sin, cos) of the origin latitude, longitude and the orientation
    phi: (f64, f64),
    lam: (f64, f64),
    alpha: (f64, f64),
}

impl LocalCartesian {
    pub fn new(p: &LocalCartesianParameters, ellps: &Ellipsoid) -> Result<LocalCartesian, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.origin_longitude, Issue::OriginLongitude);
        // The orientation is reported through the central meridian bit
        status |= check_longitude(p.orientation, Issue::CentralMeridian);
        status.into_result()?;

        let longitude = meridian(p.origin_longitude);
        let orientation = meridian(p.orientation);
        let origin = ellps.cartesian(longitude, p.origin_latitude, p.origin_height);
        Ok(LocalCartesian {
            geocentric: Geocentric::new(ellps)?,
            origin,
            phi: p.origin_latitude.sin_cos(),
            lam: longitude.sin_cos(),
            alpha: orientation.sin_cos(),
        })
    }

    /// Geocentric to local
    pub fn from_geocentric(&self, xyz: &CartesianCoordinates) -> CartesianCoordinates {
        let (du, dv, dw) = (xyz.x - self.origin.0, xyz.y - self.origin.1, xyz.z - self.origin.2);
        let (sphi, cphi) = self.phi;
        let (slam, clam) = self.lam;
        let (salpha, calpha) = self.alpha;

        let east = -slam * du + clam * dv;
        let north = -sphi * clam * du - sphi * slam * dv + cphi * dw;
        let up = cphi * clam * du + cphi * slam * dv + sphi * dw;

        CartesianCoordinates {
            x: calpha * east - salpha * north,
            y: salpha * east + calpha * north,
            z: up,
        }
    }

    /// Local to geocentric
    pub fn to_geocentric(&self, local: &CartesianCoordinates) -> CartesianCoordinates {
        let (sphi, cphi) = self.phi;
        let (slam, clam) = self.lam;
        let (salpha, calpha) = self.alpha;

        let east = calpha * local.x + salpha * local.y;
        let north = -salpha * local.x + calpha * local.y;
        let up = local.z;

        CartesianCoordinates {
            x: self.origin.0 - slam * east - sphi * clam * north + cphi * clam * up,
            y: self.origin.1 + clam * east - sphi * slam * north + cphi * slam * up,
            z: self.origin.2 + cphi * north + sphi * up,
        }
    }

    pub fn forward(&self, latitude: f64, longitude: f64, height: f64) -> Conversion<CartesianCoordinates> {
        let (xyz, warnings) = self.geocentric.forward(latitude, longitude, height)?;
        Ok((self.from_geocentric(&xyz), warnings))
    }

    /// Returns (latitude, longitude, height)
    pub fn inverse(&self, local: &CartesianCoordinates) -> Conversion<(f64, f64, f64)> {
        let ((latitude, longitude, height), warnings) = self.geocentric.inverse(&self.to_geocentric(local))?;
        Ok(((latitude, output_longitude(longitude), height), warnings))
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
    fn topocentric() -> Result<(), Status> {
        let p = LocalCartesianParameters {
            origin_latitude: rad(55.),
            origin_longitude: rad(12.),
            origin_height: 50.,
            orientation: 0.,
        };
        let local = LocalCartesian::new(&p, &Ellipsoid::default())?;

        // The origin itself
        let (xyz, _) = local.forward(rad(55.), rad(12.), 50.)?;
        assert_float_eq!(xyz.x, 0., abs <= 1e-8);
        assert_float_eq!(xyz.y, 0., abs <= 1e-8);
        assert_float_eq!(xyz.z, 0., abs <= 1e-8);

        // Straight up
        let (xyz, _) = local.forward(rad(55.), rad(12.), 150.)?;
        assert_float_eq!(xyz.z, 100., abs <= 1e-8);

        // North is +y, east is +x
        let (xyz, _) = local.forward(rad(55.001), rad(12.), 50.)?;
        assert!(xyz.y > 100. && xyz.x.abs() < 1e-6);
        let (xyz, _) = local.forward(rad(55.), rad(12.001), 50.)?;
        assert!(xyz.x > 50. && xyz.y.abs() < 1.);

        let ((lat, lon, h), _) = local.inverse(&CartesianCoordinates { x: 1000., y: -2000., z: 30. })?;
        let (xyz, _) = local.forward(lat, lon, h)?;
        assert_float_eq!(xyz.x, 1000., abs <= 1e-6);
        assert_float_eq!(xyz.y, -2000., abs <= 1e-6);
        assert_float_eq!(xyz.z, 30., abs <= 1e-6);
        Ok(())
    }

    #[test]
    fn orientation() -> Result<(), Status> {
        let mut p = LocalCartesianParameters {
            origin_latitude: rad(-33.),
            origin_longitude: rad(200.),
            origin_height: 0.,
            orientation: FRAC_PI_2,
        };
        let rotated = LocalCartesian::new(&p, &Ellipsoid::default())?;
        p.orientation = 0.;
        let plain = LocalCartesian::new(&p, &Ellipsoid::default())?;

        // A quarter turn maps north onto -x and east onto +y
        let (a, _) = plain.forward(rad(-32.99), rad(-160.), 10.)?;
        let (b, _) = rotated.forward(rad(-32.99), rad(-160.), 10.)?;
        assert_float_eq!(b.x, -a.y, abs <= 1e-6);
        assert_float_eq!(b.y, a.x, abs <= 1e-6);
        assert_float_eq!(b.z, a.z, abs <= 1e-6);

        let ((lat, lon, h), _) = rotated.inverse(&b)?;
        assert_float_eq!(lat, rad(-32.99), abs <= 1e-12);
        assert_float_eq!(lon, rad(-160.), abs <= 1e-12);
        assert_float_eq!(h, 10., abs <= 1e-6);

        p.orientation = 10.;
        let Err(status) = LocalCartesian::new(&p, &Ellipsoid::default()) else {
            panic!("Expected an orientation error");
        };
        assert!(status.contains(Issue::CentralMeridian));
        Ok(())
    }
}
