//! Polar Stereographic, Snyder (1987) ch. 21
use super::*;
use crate::math::ancillary::{latitude_from_ts, msfn, ts};

#[derive(Clone, Debug)]
pub struct PolarStereographic {
    e: f64,
    hemisphere: Hemisphere,
    longitude_down: f64,
    false_easting: f64,
    false_northing: f64,
    // rho = scale · ts(𝜙)
    scale: f64,
    // The radius of the equator, beyond which nothing is projected
    max_radius: f64,
}

impl PolarStereographic {
    pub fn new(p: &PolarStereographicParameters, ellps: &Ellipsoid) -> Result<PolarStereographic, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.latitude_of_true_scale, Issue::OriginLatitude);
        status |= check_longitude(p.longitude_down_from_pole, Issue::OriginLongitude);
        status.into_result()?;

        let hemisphere = Hemisphere::of(p.latitude_of_true_scale);
        let phi_c = p.latitude_of_true_scale.abs();
        let offsets = (p.longitude_down_from_pole, p.false_easting, p.false_northing);

        // True scale at the pole is the scale factor form, with unit scale
        if (phi_c - FRAC_PI_2).abs() < 1e-10 {
            return Ok(PolarStereographic::with_scale_factor(ellps, hemisphere, 1.0, offsets));
        }

        let a = ellps.semimajor_axis();
        let e = ellps.eccentricity();
        let sc = phi_c.sin_cos();
        let scale = a * msfn(sc, ellps.eccentricity_squared()) / ts(sc, e);
        Ok(PolarStereographic::from_scale(ellps, hemisphere, scale, offsets))
    }

    /// The form used by UPS: a scale factor at the pole instead of a
    /// latitude of true scale. `offsets` is (longitude down from pole,
    /// false easting, false northing).
    pub(crate) fn with_scale_factor(
        ellps: &Ellipsoid,
        hemisphere: Hemisphere,
        scale_factor: f64,
        offsets: (f64, f64, f64),
    ) -> PolarStereographic {
        let a = ellps.semimajor_axis();
        let e = ellps.eccentricity();
        let k = ((1. + e).powf(1. + e) * (1. - e).powf(1. - e)).sqrt();
        let scale = 2. * a * scale_factor / k;
        PolarStereographic::from_scale(ellps, hemisphere, scale, offsets)
    }

    fn from_scale(
        ellps: &Ellipsoid,
        hemisphere: Hemisphere,
        scale: f64,
        offsets: (f64, f64, f64),
    ) -> PolarStereographic {
        let e = ellps.eccentricity();
        PolarStereographic {
            e,
            hemisphere,
            longitude_down: meridian(offsets.0),
            false_easting: offsets.1,
            false_northing: offsets.2,
            scale,
            // ts(0) = 1
            max_radius: scale,
        }
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }
}

impl Projection for PolarStereographic {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        let mut status = check_geodetic(latitude, longitude);
        let wrong_side = match self.hemisphere {
            Hemisphere::North => latitude < 0.,
            Hemisphere::South => latitude > 0.,
        };
        if wrong_side {
            status |= Issue::Latitude;
        }
        status.into_result()?;

        // The southern case is the northern one, mirrored
        let sign = match self.hemisphere {
            Hemisphere::North => 1.,
            Hemisphere::South => -1.,
        };
        let phi = sign * latitude;
        let dlam = sign * delta_longitude(longitude, self.longitude_down);

        let rho = if (phi - FRAC_PI_2).abs() < 1e-10 {
            0.
        } else {
            self.scale * ts(phi.sin_cos(), self.e)
        };
        let (s, c) = dlam.sin_cos();

        let easting = self.false_easting + sign * rho * s;
        let northing = self.false_northing - sign * rho * c;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        let mut status = check_extent(xy, origin, (self.max_radius, self.max_radius));
        let mut dx = xy.easting - self.false_easting;
        let mut dy = xy.northing - self.false_northing;
        let rho = dx.hypot(dy);
        if status.is_empty() && rho > self.max_radius {
            status |= Issue::Radius;
        }
        status.into_result()?;

        let sign = match self.hemisphere {
            Hemisphere::North => 1.,
            Hemisphere::South => -1.,
        };
        dx *= sign;
        dy *= sign;

        if rho == 0. {
            return Ok(((sign * FRAC_PI_2, self.longitude_down), Status::NONE));
        }

        let t = rho / self.scale;
        let latitude = sign * latitude_from_ts(t, self.e);
        let longitude = self.longitude_down + sign * dx.atan2(-dy);

        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
