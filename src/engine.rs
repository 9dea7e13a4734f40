//! Amplitude-level register simulation.
//!
//! A [`Register`] holds the full complex state vector over `2^n` basis states
//! for `n` declared wires and mutates it in place under gate application.
//! Wire `w` maps to bit `w` of the basis index (little-endian).
//!
//! All measurement is expectation-value readout: the engine reports the
//! infinite-shot average ⟨ψ|P|ψ⟩ of a Pauli observable and never collapses
//! the state. There is no probability sampling anywhere, so identical
//! circuits produce bit-identical amplitude vectors.

use num_complex::Complex64;
use num_traits::Zero;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::SimError;
use crate::pauli::{Pauli, PauliString};

/// Upper bound on register width. 2^24 amplitudes is already 256 MiB; the
/// protocols in this crate never need more than 18 wires.
pub const MAX_WIRES: usize = 24;

/// Branch weight below which `reset` treats a branch as numerically empty.
const RESET_TOL: f64 = 1e-9;

const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// State-vector register over a fixed number of wires.
#[derive(Debug, Clone, PartialEq)]
pub struct Register {
    num_wires: usize,
    amps: Vec<Complex64>,
}

/// Apply a 2x2 unitary to one wire of a raw amplitude vector.
fn apply_single(amps: &mut [Complex64], wire: usize, m: [[Complex64; 2]; 2]) {
    let mask = 1usize << wire;
    for i in 0..amps.len() {
        if i & mask == 0 {
            let j = i | mask;
            let a0 = amps[i];
            let a1 = amps[j];
            amps[i] = m[0][0] * a0 + m[0][1] * a1;
            amps[j] = m[1][0] * a0 + m[1][1] * a1;
        }
    }
}

/// Apply a single-qubit Pauli operator to one wire of a raw amplitude vector.
///
/// Specialized over [`apply_single`]: the Pauli matrices only permute and
/// phase amplitudes, so no complex multiplies are needed for X and Z.
fn apply_pauli(amps: &mut [Complex64], wire: usize, pauli: Pauli) {
    let mask = 1usize << wire;
    match pauli {
        Pauli::X => {
            for i in 0..amps.len() {
                if i & mask == 0 {
                    amps.swap(i, i | mask);
                }
            }
        }
        Pauli::Y => {
            let im = Complex64::new(0.0, 1.0);
            for i in 0..amps.len() {
                if i & mask == 0 {
                    let j = i | mask;
                    let a0 = amps[i];
                    let a1 = amps[j];
                    amps[i] = -im * a1;
                    amps[j] = im * a0;
                }
            }
        }
        Pauli::Z => {
            for i in 0..amps.len() {
                if i & mask != 0 {
                    amps[i] = -amps[i];
                }
            }
        }
    }
}

impl Register {
    /// Create a register of `num_wires` wires in the all-zero basis state.
    pub fn new(num_wires: usize) -> Self {
        assert!(
            num_wires >= 1 && num_wires <= MAX_WIRES,
            "register width must be in 1..={MAX_WIRES}, got {num_wires}"
        );
        let mut amps = vec![Complex64::zero(); 1 << num_wires];
        amps[0] = Complex64::new(1.0, 0.0);
        Self { num_wires, amps }
    }

    pub fn num_wires(&self) -> usize {
        self.num_wires
    }

    /// Raw amplitude vector (read-only).
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    fn check_wire(&self, wire: usize) -> Result<(), SimError> {
        if wire < self.num_wires {
            Ok(())
        } else {
            Err(SimError::InvalidWire {
                wire,
                num_wires: self.num_wires,
            })
        }
    }

    fn check_pair(&self, a: usize, b: usize) -> Result<(), SimError> {
        self.check_wire(a)?;
        self.check_wire(b)?;
        if a == b {
            // Reusing one wire for both ends of a two-qubit gate is the same
            // class of caller bug as an out-of-range index.
            return Err(SimError::InvalidWire {
                wire: b,
                num_wires: self.num_wires,
            });
        }
        Ok(())
    }

    /// Hadamard gate.
    pub fn h(&mut self, wire: usize) -> Result<(), SimError> {
        self.check_wire(wire)?;
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        apply_single(&mut self.amps, wire, [[s, s], [s, -s]]);
        Ok(())
    }

    /// Pauli-X gate.
    pub fn x(&mut self, wire: usize) -> Result<(), SimError> {
        self.check_wire(wire)?;
        apply_pauli(&mut self.amps, wire, Pauli::X);
        Ok(())
    }

    /// Pauli-Y gate.
    pub fn y(&mut self, wire: usize) -> Result<(), SimError> {
        self.check_wire(wire)?;
        apply_pauli(&mut self.amps, wire, Pauli::Y);
        Ok(())
    }

    /// Pauli-Z gate.
    pub fn z(&mut self, wire: usize) -> Result<(), SimError> {
        self.check_wire(wire)?;
        apply_pauli(&mut self.amps, wire, Pauli::Z);
        Ok(())
    }

    /// Apply an arbitrary Pauli gate selected at runtime.
    pub fn pauli(&mut self, pauli: Pauli, wire: usize) -> Result<(), SimError> {
        self.check_wire(wire)?;
        apply_pauli(&mut self.amps, wire, pauli);
        Ok(())
    }

    /// Rotation about the Y axis by `theta`.
    pub fn ry(&mut self, theta: f64, wire: usize) -> Result<(), SimError> {
        self.check_wire(wire)?;
        let (sin, cos) = (theta / 2.0).sin_cos();
        let c = Complex64::new(cos, 0.0);
        let s = Complex64::new(sin, 0.0);
        apply_single(&mut self.amps, wire, [[c, -s], [s, c]]);
        Ok(())
    }

    /// Controlled-NOT gate.
    pub fn cnot(&mut self, control: usize, target: usize) -> Result<(), SimError> {
        self.check_pair(control, target)?;
        let cmask = 1usize << control;
        let tmask = 1usize << target;
        for i in 0..self.amps.len() {
            if i & cmask != 0 && i & tmask == 0 {
                self.amps.swap(i, i | tmask);
            }
        }
        Ok(())
    }

    /// Controlled-Z gate (symmetric in its wires).
    pub fn cz(&mut self, a: usize, b: usize) -> Result<(), SimError> {
        self.check_pair(a, b)?;
        let mask = (1usize << a) | (1usize << b);
        for i in 0..self.amps.len() {
            if i & mask == mask {
                self.amps[i] = -self.amps[i];
            }
        }
        Ok(())
    }

    /// Expectation value ⟨ψ|P|ψ⟩ of a Pauli-string observable.
    ///
    /// Does not mutate the register: this mirrors repeated-measurement
    /// statistics, not a single stochastic shot.
    pub fn expectation(&self, observable: &PauliString) -> Result<f64, SimError> {
        for &(wire, _) in observable.terms() {
            self.check_wire(wire)?;
        }
        let mut transformed = self.amps.clone();
        for &(wire, pauli) in observable.terms() {
            apply_pauli(&mut transformed, wire, pauli);
        }

        #[cfg(feature = "parallel")]
        let inner: Complex64 = self
            .amps
            .par_iter()
            .zip(transformed.par_iter())
            .map(|(a, b)| a.conj() * b)
            .sum();

        #[cfg(not(feature = "parallel"))]
        let inner: Complex64 = self
            .amps
            .iter()
            .zip(transformed.iter())
            .map(|(a, b)| a.conj() * b)
            .sum();

        // Hermitian observable: the imaginary part is numerical dust.
        Ok(inner.re)
    }

    /// Deterministically return a wire to |0⟩.
    ///
    /// Only valid when the wire is unentangled from the rest of the register,
    /// which the protocols guarantee by construction. A wire deterministically
    /// in |1⟩ is flipped back; a wire in an unentangled superposition is
    /// projected onto its zero branch and the state renormalized.
    pub fn reset(&mut self, wire: usize) -> Result<(), SimError> {
        self.check_wire(wire)?;
        let mask = 1usize << wire;
        let one_weight: f64 = self
            .amps
            .iter()
            .enumerate()
            .filter(|&(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();

        if one_weight >= 1.0 - RESET_TOL {
            apply_pauli(&mut self.amps, wire, Pauli::X);
            self.clear_branch(mask);
        } else if one_weight > RESET_TOL {
            let scale = Complex64::new(1.0 / (1.0 - one_weight).sqrt(), 0.0);
            for i in 0..self.amps.len() {
                if i & mask != 0 {
                    self.amps[i] = Complex64::zero();
                } else {
                    self.amps[i] *= scale;
                }
            }
        } else {
            self.clear_branch(mask);
        }
        Ok(())
    }

    /// Zero out residual numerical dust on the one-branch of a wire.
    fn clear_branch(&mut self, mask: usize) {
        for i in 0..self.amps.len() {
            if i & mask != 0 {
                self.amps[i] = Complex64::zero();
            }
        }
    }

    /// Euclidean norm of the state vector. 1.0 up to rounding for any
    /// sequence of gates; resets renormalize explicitly.
    pub fn norm(&self) -> f64 {
        self.amps
            .iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_new_register_is_ground_state() {
        let reg = Register::new(3);
        assert_eq!(reg.num_wires(), 3);
        assert_eq!(reg.amplitudes().len(), 8);
        assert!((reg.amplitudes()[0].re - 1.0).abs() < EPS);
        assert!((reg.norm() - 1.0).abs() < EPS);
        assert!((reg.expectation(&PauliString::z(0)).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_x_flips_z_expectation() {
        let mut reg = Register::new(2);
        reg.x(1).unwrap();
        assert!((reg.expectation(&PauliString::z(1)).unwrap() + 1.0).abs() < EPS);
        assert!((reg.expectation(&PauliString::z(0)).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_h_twice_is_identity() {
        let mut reg = Register::new(1);
        reg.h(0).unwrap();
        assert!(reg.expectation(&PauliString::z(0)).unwrap().abs() < EPS);
        reg.h(0).unwrap();
        assert!((reg.expectation(&PauliString::z(0)).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_plus_state_has_unit_x_expectation() {
        let mut reg = Register::new(1);
        reg.h(0).unwrap();
        let x_obs = PauliString::new().with(0, Pauli::X);
        assert!((reg.expectation(&x_obs).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_bell_pair_correlations() {
        let mut reg = Register::new(2);
        reg.h(0).unwrap();
        reg.cnot(0, 1).unwrap();
        let zz = PauliString::z_string(&[0, 1]);
        assert!((reg.expectation(&zz).unwrap() - 1.0).abs() < EPS);
        assert!(reg.expectation(&PauliString::z(0)).unwrap().abs() < EPS);
        assert!(reg.expectation(&PauliString::z(1)).unwrap().abs() < EPS);
    }

    #[test]
    fn test_cz_between_hadamards_builds_bell_pair() {
        // CZ on |++⟩ gives the cluster state; a trailing H turns it into a Bell pair.
        let mut reg = Register::new(2);
        reg.h(0).unwrap();
        reg.h(1).unwrap();
        reg.cz(0, 1).unwrap();
        reg.h(1).unwrap();
        let zz = PauliString::z_string(&[0, 1]);
        assert!((reg.expectation(&zz).unwrap() - 1.0).abs() < EPS);
        assert!(reg.expectation(&PauliString::z(0)).unwrap().abs() < EPS);
    }

    #[test]
    fn test_ry_pi_acts_as_bit_flip() {
        let mut reg = Register::new(1);
        reg.ry(std::f64::consts::PI, 0).unwrap();
        assert!((reg.expectation(&PauliString::z(0)).unwrap() + 1.0).abs() < EPS);
    }

    #[test]
    fn test_y_flips_and_phases() {
        let mut reg = Register::new(1);
        reg.y(0).unwrap();
        assert!((reg.expectation(&PauliString::z(0)).unwrap() + 1.0).abs() < EPS);
        assert!((reg.norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_reset_deterministic_one() {
        let mut reg = Register::new(2);
        reg.x(0).unwrap();
        reg.reset(0).unwrap();
        assert!((reg.expectation(&PauliString::z(0)).unwrap() - 1.0).abs() < EPS);
        assert!((reg.norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_reset_superposition_projects_to_ground() {
        let mut reg = Register::new(2);
        reg.h(0).unwrap();
        reg.x(1).unwrap();
        reg.reset(0).unwrap();
        assert!((reg.expectation(&PauliString::z(0)).unwrap() - 1.0).abs() < EPS);
        // The untouched wire keeps its state through the renormalization.
        assert!((reg.expectation(&PauliString::z(1)).unwrap() + 1.0).abs() < EPS);
        assert!((reg.norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_out_of_range_wire_is_rejected() {
        let mut reg = Register::new(2);
        assert_eq!(
            reg.h(2),
            Err(SimError::InvalidWire {
                wire: 2,
                num_wires: 2
            })
        );
        assert!(reg.cnot(0, 5).is_err());
        assert!(reg
            .expectation(&PauliString::z(3))
            .is_err());
    }

    #[test]
    fn test_two_qubit_gate_rejects_equal_wires() {
        let mut reg = Register::new(2);
        assert!(reg.cnot(1, 1).is_err());
        assert!(reg.cz(0, 0).is_err());
    }

    #[test]
    fn test_gate_sequences_are_bit_identical() {
        let build = || {
            let mut reg = Register::new(4);
            reg.h(0).unwrap();
            reg.cnot(0, 2).unwrap();
            reg.ry(0.3, 1).unwrap();
            reg.cz(2, 3).unwrap();
            reg.y(3).unwrap();
            reg
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_random_circuits_preserve_norm() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let mut reg = Register::new(5);
            for _ in 0..50 {
                let w = rng.gen_range(0..5);
                match rng.gen_range(0..6) {
                    0 => reg.h(w).unwrap(),
                    1 => reg.x(w).unwrap(),
                    2 => reg.z(w).unwrap(),
                    3 => reg.ry(rng.gen::<f64>() * 6.28, w).unwrap(),
                    4 => reg.cnot(w, (w + 1) % 5).unwrap(),
                    _ => reg.cz(w, (w + 2) % 5).unwrap(),
                }
            }
            assert!(
                (reg.norm() - 1.0).abs() < 1e-9,
                "norm drifted to {}",
                reg.norm()
            );
        }
    }
}
