//! Ney's (Modified Lambert Conformal Conic): a Lambert conic with the
//! second standard parallel fixed at 89°59'58", used for polar charts
use super::lambert::Lambert;
use super::*;

/// 89°59'58"
const MAX_LAT: f64 = (PI * 89.999_444_444_444_44) / 180.0;
const SEVENTY_ONE: f64 = (PI * 71.0) / 180.0;
const SEVENTY_FOUR: f64 = (PI * 74.0) / 180.0;

#[derive(Clone, Debug)]
pub struct Neys {
    conic: Lambert,
}

impl Neys {
    /// The standard parallel must be 71° or 74°. It is taken in the
    /// hemisphere of the origin.
    pub fn new(p: &NeysParameters, ellps: &Ellipsoid) -> Result<Neys, Status> {
        let mut status = check_ellipsoid(ellps);
        if p.origin_latitude.abs() > MAX_LAT {
            status |= Issue::OriginLatitude;
        }
        status |= check_longitude(p.central_meridian, Issue::CentralMeridian);
        let sp = p.std_parallel_1.abs();
        if (sp - SEVENTY_ONE).abs() > 1e-10 && (sp - SEVENTY_FOUR).abs() > 1e-10 {
            status |= Issue::StandardParallel;
        }
        status.into_result()?;

        let sign = if p.origin_latitude < 0. { -1. } else { 1. };
        let conic = Lambert::conic(
            ellps,
            p.origin_latitude,
            (sign * sp, sign * MAX_LAT),
            1.,
            (p.central_meridian, p.false_easting, p.false_northing),
        );
        Ok(Neys { conic })
    }
}

impl Projection for Neys {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates> {
        self.conic.forward(latitude, longitude)
    }

    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)> {
        self.conic.inverse(xy)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn neys() -> Result<(), Status> {
        let ellps = Ellipsoid::default();
        let neys = Neys::new(&NeysParameters::default(), &ellps)?;

        // The origin maps to the false origin
        let (xy, _) = neys.forward(80_f64.to_radians(), 0.)?;
        assert_float_eq!(xy.easting, 0., abs <= 1e-8);
        assert_float_eq!(xy.northing, 0., abs <= 1e-8);

        // Equivalent to the two-parallel Lambert conic
        let p = TwoParallelParameters {
            origin_latitude: 80_f64.to_radians(),
            std_parallel_1: SEVENTY_ONE,
            std_parallel_2: MAX_LAT,
            ..Default::default()
        };
        let lcc = Lambert::two_parallels(&p, &ellps)?;
        let (a, _) = neys.forward(65_f64.to_radians(), 30_f64.to_radians())?;
        let (b, _) = lcc.forward(65_f64.to_radians(), 30_f64.to_radians())?;
        assert_eq!(a, b);

        roundtrip(&neys, &[(80., 0.), (70., 100.), (50., -150.), (89.9, 10.)], 1e-9);

        // Southern origin
        let p = NeysParameters {
            origin_latitude: -75_f64.to_radians(),
            std_parallel_1: SEVENTY_FOUR,
            ..Default::default()
        };
        let neys = Neys::new(&p, &ellps)?;
        roundtrip(&neys, &[(-75., 0.), (-60., 120.), (-88., -45.)], 1e-9);
        Ok(())
    }

    #[test]
    fn standard_parallel() {
        let p = NeysParameters {
            std_parallel_1: 72_f64.to_radians(),
            ..Default::default()
        };
        let Err(status) = Neys::new(&p, &Ellipsoid::default()) else {
            panic!("Expected a standard parallel error");
        };
        assert!(status.contains(Issue::StandardParallel));
        assert!(!status.contains(Issue::OriginLatitude));
    }
}
