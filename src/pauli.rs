//! Pauli operators, Pauli-string observables, and injected-error descriptors.

use smallvec::SmallVec;

use crate::error::SimError;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pauli {
    X,
    Y,
    Z,
}

impl Pauli {
    /// Parse a caller-facing label. Anything outside {X, Y, Z} is rejected.
    pub fn parse(label: &str) -> Result<Self, SimError> {
        match label {
            "X" => Ok(Pauli::X),
            "Y" => Ok(Pauli::Y),
            "Z" => Ok(Pauli::Z),
            _ => Err(SimError::UnsupportedErrorType {
                label: label.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }
}

/// Tensor product of single-qubit Pauli operators, used as a measurement
/// observable.
///
/// Terms are (wire, operator) pairs; wires absent from the list act as the
/// identity. The inline capacity covers the weight-≤4 strings the stabilizer
/// tables produce.
#[derive(Debug, Clone, Default)]
pub struct PauliString {
    terms: SmallVec<[(usize, Pauli); 4]>,
}

impl PauliString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one term (builder style).
    pub fn with(mut self, wire: usize, pauli: Pauli) -> Self {
        self.terms.push((wire, pauli));
        self
    }

    /// A single Pauli-Z observable on one wire.
    pub fn z(wire: usize) -> Self {
        Self::new().with(wire, Pauli::Z)
    }

    /// A Z⊗Z⊗… string over the given wires.
    pub fn z_string(wires: &[usize]) -> Self {
        let mut s = Self::new();
        for &w in wires {
            s.terms.push((w, Pauli::Z));
        }
        s
    }

    pub fn terms(&self) -> &[(usize, Pauli)] {
        &self.terms
    }
}

/// A single-qubit Pauli error injected into a protocol run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauliError {
    pub pauli: Pauli,
    pub qubit: usize,
}

impl PauliError {
    pub fn new(pauli: Pauli, qubit: usize) -> Self {
        Self { pauli, qubit }
    }

    /// Parse from a caller-facing label and data-qubit index.
    pub fn parse(label: &str, qubit: usize) -> Result<Self, SimError> {
        Ok(Self::new(Pauli::parse(label)?, qubit))
    }
}
