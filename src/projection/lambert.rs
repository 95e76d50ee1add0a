//! Lambert Conformal Conic, with one or two standard parallels
use super::*;
use crate::math::ancillary::{latitude_from_ts, msfn, ts};

/// 89°59'59", the largest usable origin or standard parallel
const MAX_LAT: f64 = (PI * 89.999_722_222_222_22) / 180.0;
const MAX_DELTA: f64 = 40_000_000.0;

/// The conic, reduced to the constants of Snyder's (1987) eqs. (15-1)...(15-11)
#[derive(Clone, Debug)]
pub struct Lambert {
    e: f64,
    n: f64,
    // a·k0·F, the scale of the cone
    akf: f64,
    rho0: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Lambert {
    /// The tangent case: the origin latitude is the standard parallel,
    /// where the scale is `scale_factor`
    pub fn one_parallel(p: &ScaledParameters, ellps: &Ellipsoid) -> Result<Lambert, Status> {
        let mut status = check_ellipsoid(ellps);
        if p.origin_latitude == 0. || p.origin_latitude.abs() > MAX_LAT {
            status |= Issue::OriginLatitude;
        }
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        if !(0.3..=3.0).contains(&p.scale_factor) {
            status |= Issue::ScaleFactor;
        }
        status.into_result()?;

        Ok(Lambert::conic(
            ellps,
            p.origin_latitude,
            (p.origin_latitude, p.origin_latitude),
            p.scale_factor,
            (p.central_meridian, p.false_easting, p.false_northing),
        ))
    }

    /// The secant case: unit scale along both standard parallels
    pub fn two_parallels(p: &TwoParallelParameters, ellps: &Ellipsoid) -> Result<Lambert, Status> {
        let mut status = check_ellipsoid(ellps);
        if p.origin_latitude.abs() > MAX_LAT {
            status |= Issue::OriginLatitude;
        }
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        if p.std_parallel_1.abs() > MAX_LAT {
            status |= Issue::FirstStandardParallel;
        }
        if p.std_parallel_2.abs() > MAX_LAT {
            status |= Issue::SecondStandardParallel;
        }
        if p.std_parallel_1 == 0. && p.std_parallel_2 == 0. {
            status |= Issue::EqualStandardParallels;
        } else if p.std_parallel_1 == -p.std_parallel_2 {
            status |= Issue::Hemisphere;
        }
        status.into_result()?;

        Ok(Lambert::conic(
            ellps,
            p.origin_latitude,
            (p.std_parallel_1, p.std_parallel_2),
            1.0,
            (p.central_meridian, p.false_easting, p.false_northing),
        ))
    }

    /// The common constructor, trusting its (already validated) arguments.
    /// `offsets` is (central meridian, false easting, false northing).
    pub(crate) fn conic(
        ellps: &Ellipsoid,
        origin_latitude: f64,
        parallels: (f64, f64),
        scale_factor: f64,
        offsets: (f64, f64, f64),
    ) -> Lambert {
        let a = ellps.semimajor_axis();
        let e = ellps.eccentricity();
        let es = ellps.eccentricity_squared();
        let (phi1, phi2) = parallels;

        let sc1 = phi1.sin_cos();
        let m1 = msfn(sc1, es);
        let t1 = ts(sc1, e);

        // Secant or tangent cone?
        let n = if (phi1 - phi2).abs() > 1e-10 {
            let sc2 = phi2.sin_cos();
            (m1 / msfn(sc2, es)).ln() / (t1 / ts(sc2, e)).ln()
        } else {
            sc1.0
        };

        let akf = a * scale_factor * m1 / (n * t1.powf(n));
        let rho0 = akf * ts(origin_latitude.sin_cos(), e).powf(n);

        Lambert {
            e,
            n,
            akf,
            rho0,
            central_meridian: meridian(offsets.0),
            false_easting: offsets.1,
            false_northing: offsets.2,
        }
    }

    /// The cone constant, n
    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}

impl Projection for Lambert {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        let mut status = check_geodetic(latitude, longitude);
        // The pole opposite the apex of the cone projects to infinity
        if (latitude.abs() - FRAC_PI_2).abs() < 1e-10 && latitude * self.n <= 0. {
            status |= Issue::Latitude;
        }
        status.into_result()?;

        let rho = if (latitude.abs() - FRAC_PI_2).abs() < 1e-10 {
            0.
        } else {
            self.akf * ts(latitude.sin_cos(), self.e).powf(self.n)
        };
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

        // The southern cone opens the other way
        if self.n < 0. {
            rho = -rho;
            dx = -dx;
            dy = -dy;
        }

        if rho == 0. {
            let pole = FRAC_PI_2.copysign(self.n);
            return Ok(((pole, self.central_meridian), Status::NONE));
        }

        let theta = dx.atan2(dy);
        let t = (rho / self.akf).powf(1. / self.n);
        let latitude = latitude_from_ts(t, self.e);
        let longitude = theta / self.n + self.central_meridian;

        Ok(((output_latitude(latitude), output_longitude(longitude)), Status::NONE))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    fn grs80() -> Ellipsoid {
        Ellipsoid::from_inverse_flattening(6_378_137.0, 298.257_222_100_882_7)
    }

    #[test]
    fn two_standard_parallels() -> Result<(), Status> {
        let p = TwoParallelParameters {
            std_parallel_1: 33_f64.to_radians(),
            std_parallel_2: 45_f64.to_radians(),
            central_meridian: 10_f64.to_radians(),
            ..Default::default()
        };
        let lcc = Lambert::two_parallels(&p, &grs80())?;

        // echo 12 40 0 0 | cct -d12 proj=lcc lat_1=33 lat_2=45 lon_0=10 --
        let (xy, _) = lcc.forward(40_f64.to_radians(), 12_f64.to_radians())?;
        assert_float_eq!(xy.easting, 169_863.026_093_938_3, abs <= 1e-5);
        assert_float_eq!(xy.northing, 4_735_925.219_292_451, abs <= 1e-5);

        let ((lat, lon), _) = lcc.inverse(xy)?;
        assert_float_eq!(lat, 40_f64.to_radians(), abs <= 1e-10);
        assert_float_eq!(lon, 12_f64.to_radians(), abs <= 1e-10);

        // With a latitudinal offset
        let p = TwoParallelParameters {
            origin_latitude: 35_f64.to_radians(),
            ..p
        };
        let lcc = Lambert::two_parallels(&p, &grs80())?;
        let (xy, _) = lcc.forward(40_f64.to_radians(), 12_f64.to_radians())?;
        assert_float_eq!(xy.easting, 169_863.026_093_938_36, abs <= 1e-5);
        assert_float_eq!(xy.northing, 554_155.440_793_916_6, abs <= 1e-5);

        roundtrip(&lcc, &[(35., 10.), (60., -20.), (10., 40.), (89., 100.)], 1e-9);
        Ok(())
    }

    #[test]
    fn one_standard_parallel() -> Result<(), Status> {
        let p = ScaledParameters {
            origin_latitude: 39_f64.to_radians(),
            central_meridian: 10_f64.to_radians(),
            ..Default::default()
        };
        let lcc = Lambert::one_parallel(&p, &grs80())?;

        // The origin latitude of the tangent cone is its standard parallel,
        // so the origin itself maps to the false origin
        let (xy, _) = lcc.forward(39_f64.to_radians(), 10_f64.to_radians())?;
        assert_float_eq!(xy.easting, 0., abs <= 1e-9);
        assert_float_eq!(xy.northing, 0., abs <= 1e-9);
        assert_float_eq!(lcc.cone_constant(), 39_f64.to_radians().sin(), abs <= 1e-15);

        // Southern hemisphere cones open the other way
        let p = ScaledParameters {
            origin_latitude: -39_f64.to_radians(),
            scale_factor: 0.9999,
            false_northing: 1e6,
            ..p
        };
        let lcc = Lambert::one_parallel(&p, &grs80())?;
        roundtrip(&lcc, &[(-35., 10.), (-60., -20.), (-10., 40.), (-89., 100.)], 1e-9);
        assert!(lcc.forward(FRAC_PI_2, 0.).is_err());
        let ((lat, _), _) = lcc.inverse(MapCoordinates::new(0., 1e6 + lcc.rho0))?;
        assert_float_eq!(lat, -FRAC_PI_2, abs <= 1e-12);
        Ok(())
    }

    #[test]
    fn parameter_checks() {
        let ellps = grs80();
        let mut p = TwoParallelParameters::default();
        let Err(status) = Lambert::two_parallels(&p, &ellps) else {
            panic!("Expected an error for two equatorial parallels");
        };
        assert!(status.contains(Issue::EqualStandardParallels));

        p.std_parallel_1 = 30_f64.to_radians();
        p.std_parallel_2 = -30_f64.to_radians();
        p.central_meridian = 7.0;
        let Err(status) = Lambert::two_parallels(&p, &ellps) else {
            panic!("Expected an error for parallels in opposite hemispheres");
        };
        assert!(status.contains(Issue::Hemisphere));
        assert!(status.contains(Issue::CentralMeridian));

        let p = ScaledParameters {
            scale_factor: 0.1,
            ..Default::default()
        };
        let Err(status) = Lambert::one_parallel(&p, &ellps) else {
            panic!("Expected an error for a zero origin and a bad scale");
        };
        assert!(status.contains(Issue::OriginLatitude));
        assert!(status.contains(Issue::ScaleFactor));
    }
}
