//! Numerical building blocks shared by the ellipsoid and projection modules

/// Isometric, authalic and conformal helpers used by several projections
pub mod ancillary;
pub use ancillary::gudermannian;

/// Angle normalization, sexagesimal conversion and parsing
pub mod angular;

pub mod series;
pub use series::fourier;
pub use series::taylor;
pub use series::taylor::fourier_coefficients;
pub use series::FourierCoefficients;
pub use series::PolynomialCoefficients;
