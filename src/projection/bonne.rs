//! Bonne, ellipsoidal form, Snyder (1987) ch. 19. With an equatorial
//! origin, Bonne degenerates into the sinusoidal projection.
use super::sinusoidal::Sinusoidal;
use super::*;
use crate::math::ancillary::msfn;
use crate::math::FourierCoefficients;

const DELTA_EASTING: f64 = 20_027_474.0;
const DELTA_NORTHING: f64 = 20_003_932.0;

#[derive(Clone, Debug)]
pub struct Bonne {
    kind: Kind,
}

#[derive(Clone, Debug)]
enum Kind {
    Conic(Conic),
    Sinusoidal(Sinusoidal),
}

#[derive(Clone, Debug)]
struct Conic {
    ellps: Ellipsoid,
    rectifying: FourierCoefficients,
    origin_latitude: f64,
    // a·m1/sin 𝜙1, the radius of the standard parallel
    am1sin: f64,
    // Meridian distance of the standard parallel
    m1: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Bonne {
    pub fn new(p: &OriginParameters, ellps: &Ellipsoid) -> Result<Bonne, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status.into_result()?;

        if p.origin_latitude == 0. {
            let p = MeridianParameters {
                central_meridian: p.central_meridian,
                false_easting: p.false_easting,
                false_northing: p.false_northing,
            };
            return Ok(Bonne {
                kind: Kind::Sinusoidal(Sinusoidal::new(&p, ellps)?),
            });
        }

        let phi1 = p.origin_latitude;
        let sc = phi1.sin_cos();
        let rectifying = ellps.coefficients_for_rectifying_latitude_computations();
        let conic = Conic {
            ellps: *ellps,
            origin_latitude: phi1,
            am1sin: ellps.semimajor_axis() * msfn(sc, ellps.eccentricity_squared()) / sc.0,
            m1: ellps.meridian_distance(phi1, &rectifying),
            rectifying,
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        };
        Ok(Bonne {
            kind: Kind::Conic(conic),
        })
    }
}

impl Projection for Bonne {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        match &self.kind {
            Kind::Sinusoidal(sinu) => sinu.forward(latitude, longitude),
            Kind::Conic(conic) => conic.forward(latitude, longitude),
        }
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        match &self.kind {
            Kind::Sinusoidal(sinu) => sinu.inverse(xy),
            Kind::Conic(conic) => conic.inverse(xy),
        }
    }
}

impl Conic {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let a = self.ellps.semimajor_axis();
        let es = self.ellps.eccentricity_squared();
        let dlam = delta_longitude(longitude, self.central_meridian);

        let m = msfn(latitude.sin_cos(), es);
        let rho = self.am1sin + self.m1 - self.ellps.meridian_distance(latitude, &self.rectifying);
        let e = if rho == 0. { 0. } else { a * m * dlam / rho };
        let (s, c) = e.sin_cos();

        let easting = rho * s + self.false_easting;
        let northing = self.am1sin - rho * c + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (DELTA_EASTING, DELTA_NORTHING)).into_result()?;

        let mut dx = xy.easting - self.false_easting;
        let mut dy = self.am1sin - (xy.northing - self.false_northing);
        let mut rho = dx.hypot(dy);
        if self.origin_latitude < 0. {
            rho = -rho;
            dx = -dx;
            dy = -dy;
        }

        let distance = self.am1sin + self.m1 - rho;
        let latitude = output_latitude(self.ellps.meridian_latitude(distance, &self.rectifying));
        if (latitude.abs() - FRAC_PI_2).abs() < 1e-10 {
            return Ok(((latitude, self.central_meridian), Status::NONE));
        }

        let a = self.ellps.semimajor_axis();
        let m = msfn(latitude.sin_cos(), self.ellps.eccentricity_squared());
        let longitude = self.central_meridian + rho * dx.atan2(dy) / (a * m);
        Ok(((latitude, output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn bonne() -> Result<(), Status> {
        let p = OriginParameters {
            origin_latitude: 45_f64.to_radians(),
            ..Default::default()
        };
        let bonne = Bonne::new(&p, &Ellipsoid::default())?;

        // The origin maps to the false origin, and the central meridian is straight
        let (xy, _) = bonne.forward(45_f64.to_radians(), 0.)?;
        assert_float_eq!(xy.easting, 0., abs <= 1e-8);
        assert_float_eq!(xy.northing, 0., abs <= 1e-8);
        let (xy, _) = bonne.forward(10_f64.to_radians(), 0.)?;
        assert_float_eq!(xy.easting, 0., abs <= 1e-8);

        roundtrip(&bonne, &[(45., 0.), (10., 30.), (-40., -60.), (70., 120.)], 1e-9);

        let p = OriginParameters {
            origin_latitude: -30_f64.to_radians(),
            central_meridian: 20_f64.to_radians(),
            ..Default::default()
        };
        let bonne = Bonne::new(&p, &Ellipsoid::default())?;
        roundtrip(&bonne, &[(-30., 20.), (-10., 50.), (40., -60.), (-70., 120.)], 1e-9);
        Ok(())
    }

    #[test]
    fn equatorial_origin() -> Result<(), Status> {
        let ellps = Ellipsoid::default();
        let bonne = Bonne::new(&OriginParameters::default(), &ellps)?;
        let sinu = Sinusoidal::new(&MeridianParameters::default(), &ellps)?;
        let (a, _) = bonne.forward(0.5, 0.5)?;
        let (b, _) = sinu.forward(0.5, 0.5)?;
        assert_eq!(a, b);
        Ok(())
    }
}
