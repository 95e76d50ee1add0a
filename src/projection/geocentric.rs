//! Geodetic <--> geocentric cartesian coordinates
use super::*;

#[derive(Clone, Debug)]
pub struct Geocentric {
    ellps: Ellipsoid,
}

impl Geocentric {
    pub fn new(ellps: &Ellipsoid) -> Result<Geocentric, Status> {
        check_ellipsoid(ellps).into_result()?;
        Ok(Geocentric { ellps: *ellps })
    }

    pub fn forward(&self, latitude: f64, longitude: f64, height: f64) -> Conversion<CartesianCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;
        let (x, y, z) = self.ellps.cartesian(longitude, latitude, height);
        Ok((CartesianCoordinates { x, y, z }, Status::NONE))
    }

    /// Returns (latitude, longitude, height). Never fails: every point in
    /// space has a geodetic position.
    pub fn inverse(&self, xyz: &CartesianCoordinates) -> Conversion<(f64, f64, f64)> {
        let (longitude, latitude, height) = self.ellps.geographic(xyz.x, xyz.y, xyz.z);
        Ok(((latitude, longitude, height), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn geocentric() -> Result<(), Status> {
        let geocentric = Geocentric::new(&Ellipsoid::default())?;

        let (xyz, _) = geocentric.forward(0., 0., 0.)?;
        assert_float_eq!(xyz.x, 6_378_137.0, abs <= 1e-9);
        assert_float_eq!(xyz.y, 0., abs <= 1e-9);
        assert_float_eq!(xyz.z, 0., abs <= 1e-9);

        let (xyz, _) = geocentric.forward(FRAC_PI_2, 0., 100.)?;
        assert_float_eq!(xyz.z, 6_356_752.314_245_179 + 100., abs <= 1e-6);

        let (lat, lon, h) = (55_f64.to_radians(), 12_f64.to_radians(), 123.4);
        let (xyz, _) = geocentric.forward(lat, lon, h)?;
        let ((lat2, lon2, h2), _) = geocentric.inverse(&xyz)?;
        assert_float_eq!(lat, lat2, abs <= 1e-12);
        assert_float_eq!(lon, lon2, abs <= 1e-12);
        assert_float_eq!(h, h2, abs <= 1e-6);

        assert!(geocentric.forward(2., 0., 0.).is_err());
        Ok(())
    }
}
