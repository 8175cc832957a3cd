const COULOMB_CONSTANT: f64 = 332.06; // In kcal·Å/(mol·e²)

#[inline]
pub fn lennard_jones_12_6(dist: f64, sigma: f64, epsilon: f64) -> f64 {
    if epsilon == 0.0 || sigma == 0.0 {
        return 0.0;
    }
    if dist < 1e-6 {
        return 1e10;
    }
    let sr = sigma / dist;
    let sr6 = sr.powi(6);
    4.0 * epsilon * (sr6 * sr6 - sr6)
}

#[inline]
pub fn coulomb(dist: f64, q1: f64, q2: f64) -> f64 {
    if q1 == 0.0 || q2 == 0.0 {
        return 0.0;
    }
    if dist < 1e-6 {
        return q1.signum() * q2.signum() * 1e10;
    }
    COULOMB_CONSTANT * q1 * q2 / dist
}

/// Geometric-mean combining rule used for both sigma and epsilon.
#[inline]
pub fn geometric_mean(a: f64, b: f64) -> f64 {
    (a * b).sqrt()
}
