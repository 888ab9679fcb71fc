use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Four-momentum with components (E, px, py, pz)
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Deserialize, Serialize)]
pub struct FourMomentum(pub [f64; 4]);

impl FourMomentum {
    /// Build from transverse momentum, pseudorapidity, azimuth, and mass
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = px * px + py * py + pz * pz;
        Self([(p2 + mass * mass).sqrt(), px, py, pz])
    }

    pub fn e(&self) -> f64 {
        self.0[0]
    }

    pub fn px(&self) -> f64 {
        self.0[1]
    }

    pub fn py(&self) -> f64 {
        self.0[2]
    }

    pub fn pz(&self) -> f64 {
        self.0[3]
    }

    pub fn pt(&self) -> f64 {
        pt2(&self.0).sqrt()
    }

    pub fn eta(&self) -> f64 {
        eta(&self.0)
    }

    pub fn phi(&self) -> f64 {
        phi(&self.0)
    }

    pub fn m2(&self) -> f64 {
        let [e, px, py, pz] = self.0;
        e * e - px * px - py * py - pz * pz
    }

    /// Invariant mass. Small negative m² from rounding is clamped to zero.
    pub fn mass(&self) -> f64 {
        self.m2().max(0.).sqrt()
    }

    /// Angular separation ΔR = √(Δη² + Δφ²)
    pub fn delta_r(&self, other: &Self) -> f64 {
        let deta = self.eta() - other.eta();
        let dphi = delta_phi(self.phi(), other.phi());
        (deta * deta + dphi * dphi).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|p| p.is_finite())
    }
}

impl Add for FourMomentum {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: Self) {
        for (p, q) in self.0.iter_mut().zip(rhs.0) {
            *p += q;
        }
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Azimuthal difference wrapped into [-π, π]
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let mut dphi = (phi1 - phi2) % (2. * PI);
    if dphi > PI {
        dphi -= 2. * PI;
    } else if dphi < -PI {
        dphi += 2. * PI;
    }
    dphi
}

fn eta(p: &[f64; 4]) -> f64 {
    (p[3] / pt2(p).sqrt()).asinh()
}

fn phi(p: &[f64; 4]) -> f64 {
    p[2].atan2(p[1])
}

fn pt2(p: &[f64; 4]) -> f64 {
    p[1] * p[1] + p[2] * p[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kinematics_survive_conversion() {
        let p = FourMomentum::from_pt_eta_phi_m(50., -1.3, 2.1, 10.);
        assert_abs_diff_eq!(p.pt(), 50., epsilon = 1e-10);
        assert_abs_diff_eq!(p.eta(), -1.3, epsilon = 1e-10);
        assert_abs_diff_eq!(p.phi(), 2.1, epsilon = 1e-10);
        assert_abs_diff_eq!(p.mass(), 10., epsilon = 1e-8);
    }

    #[test]
    fn delta_phi_wraps() {
        assert_abs_diff_eq!(delta_phi(3.0, -3.0), 6.0 - 2. * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(delta_phi(-3.0, 3.0), 2. * PI - 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(delta_phi(0.5, 0.2), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn delta_r_across_phi_boundary() {
        let a = FourMomentum::from_pt_eta_phi_m(40., 0.5, 3.0, 0.);
        let b = FourMomentum::from_pt_eta_phi_m(40., 0.1, -3.0, 0.);
        let dphi = 2. * PI - 6.0;
        assert_abs_diff_eq!(
            a.delta_r(&b),
            (0.4f64 * 0.4 + dphi * dphi).sqrt(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn massless_pair_mass() {
        // m² = 2 pt² (1 - cos Δφ) for massless partners at equal η
        let a = FourMomentum::from_pt_eta_phi_m(100., 0., 0.5, 0.);
        let b = FourMomentum::from_pt_eta_phi_m(100., 0., -0.5, 0.);
        let expected = 200. * 0.5f64.sin();
        assert_abs_diff_eq!((a + b).mass(), expected, epsilon = 1e-9);
    }

    #[test]
    fn zero_pt_has_undefined_eta() {
        let p = FourMomentum([10., 0., 0., 0.]);
        assert!(!p.eta().is_finite());
    }
}
