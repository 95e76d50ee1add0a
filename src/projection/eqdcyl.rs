//! Equidistant Cylindrical (Plate Carrée, when the standard parallel is
//! the equator), spherical form, Snyder (1987) ch. 12
use super::*;

#[derive(Clone, Debug)]
pub struct EquidistantCylindrical {
    radius: f64,
    // R·cos(standard parallel), the east-west scale
    ra_cos: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl EquidistantCylindrical {
    pub fn new(p: &EquidistantCylindricalParameters, ellps: &Ellipsoid) -> Result<EquidistantCylindrical, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.std_parallel, Issue::StandardParallel);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        let radius = sphere_radius(ellps);
        Ok(EquidistantCylindrical {
            radius,
            ra_cos: radius * p.std_parallel.cos(),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for EquidistantCylindrical {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let dlam = delta_longitude(longitude, self.central_meridian);
        let easting = self.ra_cos * dlam + self.false_easting;
        let northing = self.radius * latitude + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        let extent = (PI * self.ra_cos + 1e-3, FRAC_PI_2 * self.radius + 1e-3);
        check_extent(xy, origin, extent).into_result()?;

        let latitude = (xy.northing - self.false_northing) / self.radius;
        // A polar standard parallel collapses every meridian onto one line
        let dlam = if self.ra_cos.abs() < 1e-9 {
            0.
        } else {
            (xy.easting - self.false_easting) / self.ra_cos
        };
        let longitude = self.central_meridian + dlam.clamp(-PI, PI);
        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
