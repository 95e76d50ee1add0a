//! Albers Equal Area Conic, Snyder (1987) ch. 14
use super::*;
use crate::math::ancillary::{latitude_from_qs, msfn, qs};

const MAX_DELTA: f64 = 40_000_000.0;

#[derive(Clone, Debug)]
pub struct Albers {
    a: f64,
    e: f64,
    n: f64,
    c: f64,
    rho0: f64,
    // q at the poles
    q_pole: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Albers {
    pub fn new(p: &TwoParallelParameters, ellps: &Ellipsoid) -> Result<Albers, Status> {
        let mut status = check_ellipsoid(ellps);
        status |= check_latitude(p.origin_latitude, Issue::OriginLatitude);
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        status |= check_latitude(p.std_parallel_1, Issue::FirstStandardParallel);
        status |= check_latitude(p.std_parallel_2, Issue::SecondStandardParallel);
        if p.std_parallel_1 == 0. && p.std_parallel_2 == 0. {
            status |= Issue::EqualStandardParallels;
        }
        if p.std_parallel_1 == -p.std_parallel_2 {
            status |= Issue::Hemisphere;
        }
        status.into_result()?;

        let a = ellps.semimajor_axis();
        let e = ellps.eccentricity();
        let es = ellps.eccentricity_squared();

        let sc1 = p.std_parallel_1.sin_cos();
        let m1 = msfn(sc1, es);
        let q1 = qs(sc1.0, e);
        let n = if (p.std_parallel_1 - p.std_parallel_2).abs() > 1e-10 {
            let sc2 = p.std_parallel_2.sin_cos();
            let m2 = msfn(sc2, es);
            (m1 * m1 - m2 * m2) / (qs(sc2.0, e) - q1)
        } else {
            sc1.0
        };
        let c = m1 * m1 + n * q1;
        let q0 = qs(p.origin_latitude.sin(), e);
        let rho0 = a / n * (c - n * q0).max(0.).sqrt();

        Ok(Albers {
            a,
            e,
            n,
            c,
            rho0,
            q_pole: qs(1., e),
            central_meridian: meridian(p.central_meridian),
            false_easting: p.false_easting,
            false_northing: p.false_northing,
        })
    }
}

impl Projection for Albers {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        check_geodetic(latitude, longitude).into_result()?;

        let q = qs(latitude.sin(), self.e);
        let rho = self.a / self.n * (self.c - self.n * q).max(0.).sqrt();
        let theta = self.n * delta_longitude(longitude, self.central_meridian);
        let (s, c) = theta.sin_cos();

        let easting = rho * s + self.false_easting;
        let northing = self.rho0 - rho * c + self.false_northing;
        Ok((MapCoordinates::new(easting, northing), Status::NONE))
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        let origin = (self.false_easting, self.false_northing);
        check_extent(xy, origin, (MAX_DELTA, MAX_DELTA)).into_result()?;

        let mut dx = xy.easting - self.false_easting;
        let mut dy = self.rho0 - (xy.northing - self.false_northing);
        let mut rho = dx.hypot(dy);
        if self.n < 0. {
            rho = -rho;
            dx = -dx;
            dy = -dy;
        }
        let theta = if rho != 0. { dx.atan2(dy) } else { 0. };

        let rho_n = rho * self.n / self.a;
        let q = (self.c - rho_n * rho_n) / self.n;

        let latitude = if (self.q_pole.abs() - q.abs()).abs() > 1e-6 {
            latitude_from_qs(q, self.e).ok_or(Status::from(Issue::Northing))?
        } else {
            FRAC_PI_2.copysign(q)
        };
        let longitude = self.central_meridian + theta / self.n;

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
        // Snyder (1987), p. 292: Clarke 1866, conterminous US parameters
        let clarke = Ellipsoid::from_inverse_flattening(6_378_206.4, 294.978_698_2);
        let p = TwoParallelParameters {
            origin_latitude: rad(23.),
            central_meridian: rad(-96.),
            std_parallel_1: rad(29.5),
            std_parallel_2: rad(45.5),
            ..Default::default()
        };
        let aea = Albers::new(&p, &clarke)?;
        let (xy, _) = aea.forward(rad(35.), rad(-75.))?;
        assert_float_eq!(xy.easting, 1_885_472.7, abs <= 0.5);
        assert_float_eq!(xy.northing, 1_535_925.0, abs <= 0.5);

        let ((lat, lon), _) = aea.inverse(xy)?;
        assert_float_eq!(lat, rad(35.), abs <= 1e-10);
        assert_float_eq!(lon, rad(-75.), abs <= 1e-10);

        // The origin maps to the false origin
        let (xy, _) = aea.forward(rad(23.), rad(-96.))?;
        assert_float_eq!(xy.easting, 0., abs <= 1e-8);
        assert_float_eq!(xy.northing, 0., abs <= 1e-8);
        Ok(())
    }

    #[test]
    fn defaults_and_poles() -> Result<(), Status> {
        let aea = Albers::new(&TwoParallelParameters::default(), &Ellipsoid::default());
        // The all-zero parameter set has equatorial standard parallels
        let Err(status) = aea else {
            panic!("Expected an error for equatorial standard parallels");
        };
        assert!(status.contains(Issue::EqualStandardParallels));
        assert!(status.contains(Issue::Hemisphere));

        let p = TwoParallelParameters {
            origin_latitude: rad(45.),
            std_parallel_1: rad(40.),
            std_parallel_2: rad(50.),
            ..Default::default()
        };
        let aea = Albers::new(&p, &Ellipsoid::default())?;
        roundtrip(&aea, &[(45., 0.), (10., 30.), (-60., -100.), (80., 170.)], 1e-9);

        // The north pole is a point
        let (pole, _) = aea.forward(FRAC_PI_2, 0.)?;
        let ((lat, _), _) = aea.inverse(pole)?;
        assert_float_eq!(lat, FRAC_PI_2, abs <= 1e-9);
        Ok(())
    }
}
