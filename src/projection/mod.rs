//! One module per coordinate system.
//!
//! Each system is an immutable value, built once from its parameters and
//! an ellipsoid. Construction validates every parameter and reports all
//! problems found as a [`Status`]; the conversions themselves are pure.
//!
//! The map projections share the [`Projection`] trait. The remaining
//! systems (geocentric, local cartesian, UTM, UPS, MGRS, GEOREF, BNG)
//! have their own coordinate representations, and hence their own
//! conversion signatures.

use crate::authoring::*;

pub mod albers;
mod azimuthal;
pub mod azeq;
pub mod bng;
pub mod bonne;
pub mod cassini;
pub mod cyleqa;
pub mod eckert;
pub mod eqdcyl;
pub mod geocentric;
pub mod georef;
pub mod gnomonic;
pub mod grinten;
pub mod lambert;
pub mod loccart;
pub mod mercator;
pub mod mgrs;
pub mod miller;
pub mod mollweide;
pub mod neys;
pub mod nzmg;
pub mod omerc;
pub mod orthographic;
pub mod polarst;
pub mod polycon;
pub mod sinusoidal;
pub mod stereographic;
pub mod tcea;
pub mod tmerc;
pub mod ups;
pub mod utm;

/// The outcome of a single conversion: `Ok` carries the result and the
/// warnings raised (usually none), `Err` every error found.
pub type Conversion<T> = Result<(T, Status), Status>;

/// Geodetic (latitude, longitude) <--> projected (easting, northing)
pub trait Projection {
    fn forward(&self, latitude: f64, longitude: f64) -> Conversion<MapCoordinates>;
    /// Returns (latitude, longitude)
    fn inverse(&self, xy: MapCoordinates) -> Conversion<(f64, f64)>;
}

/// Instantiate the map projection described by `parameters`, or `None`
/// if `parameters` describe one of the non-projection systems.
pub fn build(parameters: &Parameters, ellps: &Ellipsoid) -> Option<Result<Box<dyn Projection>, Status>> {
    fn boxed<P: Projection + 'static>(p: Result<P, Status>) -> Result<Box<dyn Projection>, Status> {
        p.map(|p| Box::new(p) as Box<dyn Projection>)
    }

    use Parameters as P;
    Some(match parameters {
        P::AlbersEqualAreaConic(p) => boxed(albers::Albers::new(p, ellps)),
        P::AzimuthalEquidistant(p) => boxed(azeq::AzimuthalEquidistant::new(p, ellps)),
        P::Bonne(p) => boxed(bonne::Bonne::new(p, ellps)),
        P::Cassini(p) => boxed(cassini::Cassini::new(p, ellps)),
        P::CylindricalEqualArea(p) => boxed(cyleqa::CylindricalEqualArea::new(p, ellps)),
        P::Eckert4(p) => boxed(eckert::Eckert4::new(p, ellps)),
        P::Eckert6(p) => boxed(eckert::Eckert6::new(p, ellps)),
        P::EquidistantCylindrical(p) => boxed(eqdcyl::EquidistantCylindrical::new(p, ellps)),
        P::Gnomonic(p) => boxed(gnomonic::Gnomonic::new(p, ellps)),
        P::LambertConformalConic1(p) => boxed(lambert::Lambert::one_parallel(p, ellps)),
        P::LambertConformalConic2(p) => boxed(lambert::Lambert::two_parallels(p, ellps)),
        P::Mercator(p) => boxed(mercator::Mercator::new(p, ellps)),
        P::MillerCylindrical(p) => boxed(miller::Miller::new(p, ellps)),
        P::Mollweide(p) => boxed(mollweide::Mollweide::new(p, ellps)),
        P::Neys(p) => boxed(neys::Neys::new(p, ellps)),
        P::Nzmg => boxed(Ok(nzmg::Nzmg::new())),
        P::ObliqueMercator(p) => boxed(omerc::ObliqueMercator::new(p, ellps)),
        P::Orthographic(p) => boxed(orthographic::Orthographic::new(p, ellps)),
        P::PolarStereographic(p) => boxed(polarst::PolarStereographic::new(p, ellps)),
        P::Polyconic(p) => boxed(polycon::Polyconic::new(p, ellps)),
        P::Sinusoidal(p) => boxed(sinusoidal::Sinusoidal::new(p, ellps)),
        P::Stereographic(p) => boxed(stereographic::Stereographic::new(p, ellps)),
        P::TransverseCylindricalEqualArea(p) => boxed(tcea::TransverseCylindricalEqualArea::new(p, ellps)),
        P::TransverseMercator(p) => boxed(tmerc::TransverseMercator::new(p, ellps)),
        P::VanDerGrinten(p) => boxed(grinten::VanDerGrinten::new(p, ellps)),
        _ => return None,
    })
}

// ----- Shared parameter and argument checks ------------------------------------------

/// The ellipsoid checks shared by all systems: a positive semimajor axis,
/// and an inverse flattening between 250 and 350
pub fn check_ellipsoid(ellps: &Ellipsoid) -> Status {
    let mut status = Status::new();
    if ellps.semimajor_axis() <= 0.0 {
        status |= Issue::SemiMajorAxis;
    }
    let inv_f = ellps.inverse_flattening();
    if !(250.0..=350.0).contains(&inv_f) {
        status |= Issue::InverseFlattening;
    }
    status
}

/// `issue` unless `latitude` is in [-π/2, π/2]
pub(crate) fn check_latitude(latitude: f64, issue: Issue) -> Status {
    if (-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
        return Status::NONE;
    }
    Status::from(issue)
}

/// `issue` unless `longitude` is in [-π, 2π]
pub(crate) fn check_longitude(longitude: f64, issue: Issue) -> Status {
    if (-PI..=TAU).contains(&longitude) {
        return Status::NONE;
    }
    Status::from(issue)
}

/// The argument checks of the forward conversions
pub(crate) fn check_geodetic(latitude: f64, longitude: f64) -> Status {
    check_latitude(latitude, Issue::Latitude) | check_longitude(longitude, Issue::Longitude)
}

/// Central meridians are accepted in [-π, 2π], and stored in [-π, π]
pub(crate) fn meridian(central_meridian: f64) -> f64 {
    if central_meridian > PI {
        return central_meridian - TAU;
    }
    central_meridian
}

/// Longitude difference from the central meridian, folded into [-π, π]
pub(crate) fn delta_longitude(longitude: f64, central_meridian: f64) -> f64 {
    let mut dlam = longitude - central_meridian;
    if dlam > PI {
        dlam -= TAU;
    }
    if dlam < -PI {
        dlam += TAU;
    }
    dlam
}

/// The radius of the sphere used by the spherical projections: the
/// authalic sphere of the ellipsoid
pub(crate) fn sphere_radius(ellps: &Ellipsoid) -> f64 {
    crate::math::ancillary::authalic_sphere_radius(ellps.semimajor_axis(), ellps.eccentricity_squared())
}

/// The checks of the inverse conversions: `easting` and `northing` within
/// the given distances of the false origin
pub(crate) fn check_extent(xy: MapCoordinates, false_origin: (f64, f64), extent: (f64, f64)) -> Status {
    let mut status = Status::new();
    if (xy.easting - false_origin.0).abs() > extent.0 {
        status |= Issue::Easting;
    }
    if (xy.northing - false_origin.1).abs() > extent.1 {
        status |= Issue::Northing;
    }
    status
}

/// The longitude of an inverse conversion, normalized to (-π, π]
pub(crate) fn output_longitude(longitude: f64) -> f64 {
    angular::normalize_longitude(longitude)
}

/// Clamp latitudes that numerical noise has pushed just beyond the poles
pub(crate) fn output_latitude(latitude: f64) -> f64 {
    latitude.clamp(-FRAC_PI_2, FRAC_PI_2)
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Forward-then-inverse at a set of points, checking recovery to `tolerance` radians
    pub(crate) fn roundtrip(projection: &dyn Projection, points: &[(f64, f64)], tolerance: f64) {
        for (lat, lon) in points {
            let (lat, lon) = (lat.to_radians(), lon.to_radians());
            let Ok((xy, _)) = projection.forward(lat, lon) else {
                panic!("forward failed at ({lat}, {lon})");
            };
            let Ok(((lat2, lon2), _)) = projection.inverse(xy) else {
                panic!("inverse failed at ({lat}, {lon}): {xy:?}");
            };
            assert!((lat - lat2).abs() < tolerance, "latitude {lat} vs {lat2}");
            assert!((lon - lon2).abs() < tolerance, "longitude {lon} vs {lon2}");
        }
    }

    #[test]
    fn ellipsoid_checks() {
        assert!(check_ellipsoid(&Ellipsoid::default()).is_empty());
        let status = check_ellipsoid(&Ellipsoid::new(-1., 1. / 100.));
        assert!(status.contains(Issue::SemiMajorAxis));
        assert!(status.contains(Issue::InverseFlattening));
    }

    #[test]
    fn build_all_defaults() {
        let ellps = Ellipsoid::default();
        let mut projections = 0;
        for kind in CoordinateType::ALL {
            let parameters = Parameters::default_for(kind);
            let Some(projection) = build(&parameters, &ellps) else {
                continue;
            };
            projections += 1;
            assert!(projection.is_ok(), "{kind:?}: {:?}", projection.err());
        }
        assert_eq!(projections, 25);
    }

    #[test]
    fn helpers() {
        assert_eq!(meridian(1.5 * PI), -0.5 * PI);
        assert!((delta_longitude(-PI + 0.1, PI - 0.1) - 0.2).abs() < 1e-12);
        assert!(check_geodetic(2., 0.).contains(Issue::Latitude));
        assert!(check_geodetic(0., 7.).contains(Issue::Longitude));
        let xy = MapCoordinates::new(10., 10.);
        assert!(check_extent(xy, (0., 0.), (5., 20.)).contains(Issue::Easting));
        assert!(!check_extent(xy, (0., 0.), (5., 20.)).contains(Issue::Northing));
    }
}
