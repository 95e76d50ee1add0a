//! Series expansions in the third flattening, as used by the auxiliary
//! latitudes, the meridian arc, and the Krüger transverse Mercator.

/// Number of terms kept in every series
pub const POLYNOMIAL_ORDER: usize = 6;

/// Row `i` holds the coefficients of the polynomial (in the third flattening)
/// giving the `i+1`th Fourier coefficient, forward and inverse.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolynomialCoefficients {
    pub fwd: [[f64; POLYNOMIAL_ORDER]; POLYNOMIAL_ORDER],
    pub inv: [[f64; POLYNOMIAL_ORDER]; POLYNOMIAL_ORDER],
}

/// The Fourier coefficients of a latitude mapping, evaluated for one ellipsoid
#[derive(Clone, Copy, Debug, Default)]
pub struct FourierCoefficients {
    pub fwd: [f64; POLYNOMIAL_ORDER],
    pub inv: [f64; POLYNOMIAL_ORDER],
}

pub mod taylor {
    use super::{FourierCoefficients, PolynomialCoefficients};

    /// Evaluate the rows of `polynomials` at `n`. Every series starts at the
    /// first power of `n`, hence the extra factor.
    pub fn fourier_coefficients(n: f64, polynomials: &PolynomialCoefficients) -> FourierCoefficients {
        let row = |coefficients: &[f64]| n * horner(n, coefficients);
        FourierCoefficients {
            fwd: polynomials.fwd.map(|r| row(&r[..])),
            inv: polynomials.inv.map(|r| row(&r[..])),
        }
    }

    /// c₀ + c₁x + c₂x² + ...
    pub fn horner(x: f64, coefficients: &[f64]) -> f64 {
        coefficients.iter().rev().fold(0., |sum, c| sum.mul_add(x, *c))
    }
}

/// Clenshaw summation of sine series
pub mod fourier {
    /// Σ cₖ sin(k·x), k = 1..=len
    pub fn sin(x: f64, coefficients: &[f64]) -> f64 {
        let (s, c) = x.sin_cos();
        let two_cos = 2. * c;
        let (mut b1, mut b2) = (0., 0.);
        for ck in coefficients.iter().rev() {
            let b0 = two_cos.mul_add(b1, ck - b2);
            b2 = b1;
            b1 = b0;
        }
        s * b1
    }

    /// Σ cₖ sin(k·z), k = 1..=len, for complex z = `[re, im]` and real cₖ
    pub fn complex_sin(z: [f64; 2], coefficients: &[f64]) -> [f64; 2] {
        let (sin_re, cos_re) = z[0].sin_cos();
        let (sinh_im, cosh_im) = (z[1].sinh(), z[1].cosh());

        // 2 cos z
        let (ar, ai) = (2. * cos_re * cosh_im, -2. * sin_re * sinh_im);

        // b[k] = a b[k+1] - b[k+2] + c[k], in complex arithmetic
        let (mut b1, mut b2) = ([0., 0.], [0., 0.]);
        for ck in coefficients.iter().rev() {
            let b0 = [
                ar * b1[0] - ai * b1[1] - b2[0] + ck,
                ar * b1[1] + ai * b1[0] - b2[1],
            ];
            b2 = b1;
            b1 = b0;
        }

        // sin z
        let (sr, si) = (sin_re * cosh_im, cos_re * sinh_im);
        [sr * b1[0] - si * b1[1], sr * b1[1] + si * b1[0]]
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn horner() {
        // 1 + 2x + 3x²
        let p = [1., 2., 3.];
        assert_eq!(taylor::horner(2., &p), 17.);
        assert_eq!(taylor::horner(-1., &p), 2.);
        assert_eq!(taylor::horner(5., &[]), 0.);
    }

    #[test]
    fn sine_series() {
        let c = [0.5, -0.25, 0.125];
        let x = 0.7_f64;
        let direct: f64 = c.iter().enumerate().map(|(k, ck)| ck * ((k + 1) as f64 * x).sin()).sum();
        assert_float_eq!(fourier::sin(x, &c), direct, abs <= 1e-14);
        assert_eq!(fourier::sin(x, &[]), 0.);

        // On the real axis the complex sum reduces to the real one
        let z = fourier::complex_sin([x, 0.], &c);
        assert_float_eq!(z[0], direct, abs <= 1e-14);
        assert_float_eq!(z[1], 0., abs <= 1e-14);
    }

    #[test]
    fn complex_sine_series() {
        // sin(x + iy) = sin x cosh y + i cos x sinh y, term by term
        let c = [6., 5., 4., 3., 2., 1.];
        let (x, y) = (0.3_f64, 0.2_f64);
        let mut expected = [0., 0.];
        for (k, ck) in c.iter().enumerate() {
            let k = (k + 1) as f64;
            expected[0] += ck * (k * x).sin() * (k * y).cosh();
            expected[1] += ck * (k * x).cos() * (k * y).sinh();
        }
        let sum = fourier::complex_sin([x, y], &c);
        assert_float_eq!(sum[0], expected[0], abs <= 1e-12);
        assert_float_eq!(sum[1], expected[1], abs <= 1e-12);
    }
}
