use super::*;
use crate::math::*;

// ----- Latitudes -------------------------------------------------------------
impl Ellipsoid {
    /// Geographic latitude to isometric latitude, 𝜓
    #[must_use]
    pub fn isometric_latitude(&self, latitude: f64) -> f64 {
        let e = self.eccentricity();
        gudermannian::inv(latitude) - (e * latitude.sin()).atanh() * e
    }

    /// Isometric latitude, 𝜓, to geographic latitude
    #[must_use]
    pub fn latitude_from_isometric(&self, psi: f64) -> f64 {
        ancillary::sinhpsi_to_tanphi(psi.sinh(), self.eccentricity()).atan()
    }

    // --- Conformal latitude ---

    /// Obtain the coefficients needed for working with conformal latitudes
    pub fn coefficients_for_conformal_latitude_computations(&self) -> FourierCoefficients {
        fourier_coefficients(self.third_flattening(), &constants::CONFORMAL)
    }

    /// Geographic latitude, 𝜙, to conformal, 𝜒
    pub fn latitude_geographic_to_conformal(
        &self,
        geographic_latitude: f64,
        coefficients: &FourierCoefficients,
    ) -> f64 {
        geographic_latitude + fourier::sin(2. * geographic_latitude, &coefficients.fwd)
    }

    /// Conformal latitude, 𝜒, to geographic, 𝜙
    pub fn latitude_conformal_to_geographic(
        &self,
        conformal_latitude: f64,
        coefficients: &FourierCoefficients,
    ) -> f64 {
        conformal_latitude + fourier::sin(2. * conformal_latitude, &coefficients.inv)
    }

    // --- Rectifying latitude ---

    /// Obtain the coefficients needed for working with rectifying latitudes
    pub fn coefficients_for_rectifying_latitude_computations(&self) -> FourierCoefficients {
        fourier_coefficients(self.third_flattening(), &constants::RECTIFYING)
    }
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Conformal latitude, 𝜒. Reference values from the Poder/Engsager implementation (GRS80)
    #[test]
    fn conformal() {
        let ellps = Ellipsoid::new(6_378_137.0, 1. / 298.257_222_100_882_7);
        let latitudes = [35., 45., 55., -55., 0., 90.];
        #[rustfmt::skip]
        let conformal_latitudes = [
            34.819454814955349775,  44.807684055145067248,  54.819109023689023275,
           -54.819109023689023275,  0., 90.,
        ];

        let chi_coefs = ellps.coefficients_for_conformal_latitude_computations();
        for (phi, chi) in latitudes.iter().zip(conformal_latitudes.iter()) {
            let phi = (*phi as f64).to_radians();
            let chi = (*chi as f64).to_radians();
            assert!((chi - ellps.latitude_geographic_to_conformal(phi, &chi_coefs)).abs() < 1e-14);
            assert!((phi - ellps.latitude_conformal_to_geographic(chi, &chi_coefs)).abs() < 1e-14);
        }
    }

    #[test]
    fn isometric() {
        let ellps = Ellipsoid::new(6_378_137.0, 1. / 298.257_222_100_882_7);
        let angle = 45_f64.to_radians();
        let isometric = 50.227465815385806f64.to_radians();
        assert!((ellps.isometric_latitude(angle) - isometric).abs() < 1e-15);
        assert!((ellps.latitude_from_isometric(isometric) - angle).abs() < 1e-15);
    }
}
