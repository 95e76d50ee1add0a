/// The Gudermannian function (often written as gd), is the work horse for computations involving
/// the isometric latitude (i.e. the vertical coordinate of the Mercator projection)
pub mod gudermannian {
    pub fn fwd(arg: f64) -> f64 {
        arg.sinh().atan()
    }

    pub fn inv(arg: f64) -> f64 {
        arg.tan().asinh()
    }
}

/// The function ts(𝜙) of Snyder (1987), eq. (7-10), i.e. the exponential
/// of the negated isometric latitude, exp(-𝜓), evaluated in a numerically
/// stable way.
///
/// Inputs:
///   (sin 𝜙, cos 𝜙): trigs of geographic latitude
///   e: eccentricity of the ellipsoid
///
/// The sign of sin 𝜙 selects the branch that avoids cancellation:
///   cos 𝜙 / (1 + sin 𝜙) for 𝜙 > 0, (1 - sin 𝜙) / cos 𝜙 otherwise
pub fn ts(sincos: (f64, f64), e: f64) -> f64 {
    let factor = if sincos.0 > 0. {
        sincos.1 / (1. + sincos.0)
    } else {
        (1. - sincos.0) / sincos.1
    };
    (e * (e * sincos.0).atanh()).exp() * factor
}

/// The inverse of [ts]: geographic latitude from exp(-𝜓)
pub fn latitude_from_ts(ts0: f64, e: f64) -> f64 {
    sinhpsi_to_tanphi((1. / ts0 - ts0) / 2., e).atan()
}

/// Snyder (1987) eq. (14-15): the parallel radius, in units of the
/// semimajor axis, i.e. cos 𝜙 / sqrt(1 - e² sin² 𝜙)
pub fn msfn(sincos: (f64, f64), es: f64) -> f64 {
    sincos.1 / (1. - sincos.0 * sincos.0 * es).sqrt()
}

/// Snyder (1987) eq. (3-12): the authalic function q(𝜙), for equal area projections
pub fn qs(sinphi: f64, e: f64) -> f64 {
    let es = e * e;
    let one_es = 1.0 - es;

    if e < 1e-7 {
        return 2.0 * sinphi;
    }

    let con = e * sinphi;
    let div1 = 1.0 - con * con;
    let div2 = 1.0 + con;

    one_es * (sinphi / div1 - (0.5 / e) * ((1. - con) / div2).ln())
}

/// The inverse of [qs], by Snyder's (1987) eq. (3-16) iteration.
/// Returns `None` if the iteration does not converge.
pub fn latitude_from_qs(q: f64, e: f64) -> Option<f64> {
    const MAX_ITER: usize = 30;
    let es = e * e;
    let one_es = 1.0 - es;

    let mut phi = (q / 2.).clamp(-1., 1.).asin();
    if e < 1e-7 {
        return Some(phi);
    }

    for _ in 0..MAX_ITER {
        let (sinphi, cosphi) = phi.sin_cos();
        let con = e * sinphi;
        let com = 1.0 - con * con;
        let dphi = 0.5 * com * com / cosphi
            * (q / one_es - sinphi / com + 0.5 / e * ((1. - con) / (1. + con)).ln());
        phi += dphi;
        if dphi.abs() < 1e-12 {
            return Some(phi);
        }
    }
    None
}

/// Radius of the sphere of equal surface area (Snyder 1987, eq. (3-13)
/// truncated after the third order), used by the spherical projections
/// when working on an ellipsoid.
pub fn authalic_sphere_radius(a: f64, es: f64) -> f64 {
    let es2 = es * es;
    let es3 = es2 * es;
    a * (1.0 - es / 6.0 - 17.0 * es2 / 360.0 - 67.0 * es3 / 3024.0)
}

/// Ancillary function for computing the inverse isometric latitude. Follows
/// [Karney, 2011](crate::Bibliography::Kar11): Newton iteration on
/// tan 𝜙, starting from the spherical approximation.
pub fn sinhpsi_to_tanphi(taup: f64, e: f64) -> f64 {
    // min iterations = 1, max iterations = 2; mean = 1.954
    const MAX_ITER: usize = 5;

    let rooteps: f64 = f64::EPSILON.sqrt();
    let tol: f64 = rooteps / 10.;
    let tmax: f64 = 2. / rooteps;

    let e2m = 1. - e * e;
    let stol = tol * taup.abs().max(1.0);

    // 70 corresponds to chi = 89.18 deg
    let mut tau = if taup.abs() > 70. {
        taup * (e * e.atanh()).exp()
    } else {
        taup / e2m
    };

    // Handle +/-inf, nan, and e = 1
    if (tau.abs() >= tmax) || tau.is_nan() {
        return tau;
    }

    for _ in 0..MAX_ITER {
        let tau1 = (1. + tau * tau).sqrt();
        let sig = (e * (e * tau / tau1).atanh()).sinh();
        let taupa = (1. + sig * sig).sqrt() * tau - sig * tau1;
        let dtau =
            (taup - taupa) * (1. + e2m * (tau * tau)) / (e2m * tau1 * (1. + taupa * taupa).sqrt());
        tau += dtau;

        if (dtau.abs() < stol) || tau.is_nan() {
            return tau;
        }
    }
    f64::NAN
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isometric_roundtrip() {
        let e = (0.006_694_379_990_14_f64).sqrt();
        for lat in [-80_f64, -45., -1., 1., 30., 60., 89.] {
            let phi = lat.to_radians();
            let t = ts(phi.sin_cos(), e);
            assert!((latitude_from_ts(t, e) - phi).abs() < 1e-12);
        }
        assert!((gudermannian::fwd(gudermannian::inv(0.7)) - 0.7).abs() < 1e-15);
    }

    #[test]
    fn authalic() {
        let e = (0.006_694_379_990_14_f64).sqrt();
        let q90 = qs(1.0, e);
        // q at the pole is slightly less than 2 on the oblate ellipsoid
        assert!(q90 < 2.0 && q90 > 1.99);
        for lat in [-70_f64, -20., 0., 35., 55.] {
            let phi = lat.to_radians();
            let q = qs(phi.sin(), e);
            let Some(back) = latitude_from_qs(q, e) else {
                panic!("No convergence at {lat}");
            };
            assert!((back - phi).abs() < 1e-11);
        }

        // The equal area radius of WGS84 is close to 6371007 m
        let r = authalic_sphere_radius(6_378_137.0, 0.006_694_379_990_14);
        assert!((r - 6_371_007.).abs() < 1.0);
    }
}
