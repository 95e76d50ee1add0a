use crate::math::PolynomialCoefficients;

/// Series coefficients for the normalized meridian arc unit, as a polynomium in n²
pub(crate) const MERIDIAN_ARC_COEFFICIENTS: [f64; 5] =
    [1., 1. / 4., 1. / 64., 1. / 256., 25. / 16384.];

/// Geographic to conformal latitude (fwd) and back (inv),
/// as polynomia in the third flattening, n. [Karney, 2011](crate::Bibliography::Kar11)
#[rustfmt::skip]
pub(crate) const CONFORMAL: PolynomialCoefficients = PolynomialCoefficients {
    fwd: [
        [-2., 2./3., 4./3., -82./45., 32./45., 4642./4725.],
        [0., 5./3., -16./15., -13./9., 904./315., -1522./945.],
        [0., 0., -26./15., 34./21., 8./5., -12686./2835.],
        [0., 0., 0., 1237./630., -12./5., -24832./14175.],
        [0., 0., 0., 0., -734./315., 109598./31185.],
        [0., 0., 0., 0., 0., 444337./155925.]
    ],
    inv: [
        [2., -2./3., -2., 116./45., 26./45., -2854./675.],
        [0., 7./3., -8./5., -227./45., 2704./315., 2323./945.],
        [0., 0., 56./15., -136./35., -1262./105., 73814./2835.],
        [0., 0., 0., 4279./630., -332./35., -399572./14175.],
        [0., 0., 0., 0., 4174./315., -144838./6237.],
        [0., 0., 0., 0., 0., 601676./22275.]
    ],
};

/// Geographic to rectifying latitude (fwd) and back (inv),
/// as polynomia in the third flattening, n. [Karney, 2011](crate::Bibliography::Kar11)
#[rustfmt::skip]
pub(crate) const RECTIFYING: PolynomialCoefficients = PolynomialCoefficients {
    fwd: [
        [-3./2., 0., 9./16., 0., -3./32., 0.],
        [0., 15./16., 0., -15./32., 0., 135./2048.],
        [0., 0., -35./48., 0., 105./256., 0.],
        [0., 0., 0., 315./512., 0., -189./512.],
        [0., 0., 0., 0., -693./1280., 0.],
        [0., 0., 0., 0., 0., 1001./2048.]
    ],
    inv: [
        [3./2., 0., -27./32., 0., 269./512., 0.],
        [0., 21./16., 0., -55./32., 0., 6759./4096.],
        [0., 0., 151./96., 0., -417./128., 0.],
        [0., 0., 0., 1097./512., 0., -15543./2560.],
        [0., 0., 0., 0., 8011./2560., 0.],
        [0., 0., 0., 0., 0., 293393./61440.]
    ],
};
