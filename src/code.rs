//! Stabilizer-code registry: the two fixed small surface codes.
//!
//! **Surface-13** is a [[9,1,3]] layout with 9 data qubits on a 3×3 grid and
//! 4 boundary stabilizers (two X-type columns, two Z-type rows).
//!
//! **Surface-17** is the standard distance-3 surface code layout
//! (arXiv:1404.3747): 9 data qubits, 4 X-type and 4 Z-type stabilizers, one
//! ancilla per stabilizer.
//!
//! Codes are plain immutable values, constructed per use and passed
//! explicitly into the protocols; there is no ambient global table, so
//! multiple codes can be exercised concurrently in tests. Generator order is
//! stable (declaration order), which is what makes syndrome vectors
//! comparable call-to-call.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::pauli::{Pauli, PauliString};

/// Stabilizer generator type: a tensor product of Pauli-X or of Pauli-Z
/// operators over the generator's data support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizerKind {
    X,
    Z,
}

impl StabilizerKind {
    /// Whether a generator of this kind flips under the given single-qubit
    /// Pauli error on a support qubit (i.e. whether they anticommute).
    pub fn detects(&self, pauli: Pauli) -> bool {
        match self {
            StabilizerKind::X => matches!(pauli, Pauli::Z | Pauli::Y),
            StabilizerKind::Z => matches!(pauli, Pauli::X | Pauli::Y),
        }
    }
}

/// One stabilizer generator: type, data-qubit support, and the ancilla wire
/// used for its readout.
#[derive(Debug, Clone)]
pub struct StabilizerGenerator {
    pub name: &'static str,
    pub kind: StabilizerKind,
    pub support: SmallVec<[usize; 4]>,
    pub ancilla: usize,
}

impl StabilizerGenerator {
    fn new(
        name: &'static str,
        kind: StabilizerKind,
        support: &[usize],
        ancilla: usize,
    ) -> Self {
        Self {
            name,
            kind,
            support: SmallVec::from_slice(support),
            ancilla,
        }
    }

    pub fn contains(&self, qubit: usize) -> bool {
        self.support.contains(&qubit)
    }
}

/// Decoder policy attached to a code (see the `decoder` module).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Per flipped generator, correct the first qubit in its support.
    Direct,
    /// Look up the flipped-generator set in the single-error pattern table,
    /// falling back to `Direct` generator-by-generator.
    Pattern,
}

/// Immutable description of one stabilizer code.
///
/// Data qubits are wires `0..num_data`; ancillas follow at
/// `num_data..num_data + num_ancilla`. Qubit 0 is the canonical
/// representative data qubit: both logical operator supports contain it, and
/// it is the transfer point during code conversion.
#[derive(Debug, Clone)]
pub struct StabilizerCode {
    pub name: &'static str,
    pub num_data: usize,
    pub num_ancilla: usize,
    pub generators: Vec<StabilizerGenerator>,
    pub logical_x: Vec<usize>,
    pub logical_z: Vec<usize>,
    pub decode_policy: DecodePolicy,
}

impl StabilizerCode {
    pub fn total_qubits(&self) -> usize {
        self.num_data + self.num_ancilla
    }

    /// Look up a generator by name.
    pub fn generator(&self, name: &str) -> Option<&StabilizerGenerator> {
        self.generators.iter().find(|g| g.name == name)
    }

    /// The logical-Z readout observable (a Z-string over `logical_z`).
    pub fn logical_z_observable(&self) -> PauliString {
        PauliString::z_string(&self.logical_z)
    }

    /// Pair a declaration-ordered syndrome vector with generator names.
    pub fn syndrome_map(&self, values: &[f64]) -> BTreeMap<String, f64> {
        self.generators
            .iter()
            .zip(values)
            .map(|(g, &v)| (g.name.to_string(), v))
            .collect()
    }

    /// Names of the generators reading −1 in a declaration-ordered syndrome.
    pub fn flipped(&self, syndrome: &[f64]) -> Vec<&'static str> {
        self.generators
            .iter()
            .zip(syndrome)
            .filter(|&(_, &v)| v < 0.0)
            .map(|(g, _)| g.name)
            .collect()
    }
}

/// The Surface-13 code: 9 data qubits, 4 stabilizers, 4 ancillas (wires 9–12).
pub fn surface_13() -> StabilizerCode {
    StabilizerCode {
        name: "surface13",
        num_data: 9,
        num_ancilla: 4,
        generators: vec![
            StabilizerGenerator::new("S1", StabilizerKind::X, &[0, 3, 6], 9), // left column
            StabilizerGenerator::new("S2", StabilizerKind::Z, &[0, 1, 2], 10), // top row
            StabilizerGenerator::new("S3", StabilizerKind::Z, &[6, 7, 8], 11), // bottom row
            StabilizerGenerator::new("S4", StabilizerKind::X, &[2, 5, 8], 12), // right column
        ],
        logical_x: vec![0, 1, 2],
        logical_z: vec![0, 3, 6],
        decode_policy: DecodePolicy::Direct,
    }
}

/// The Surface-17 code: 9 data qubits, 8 stabilizers, 8 ancillas (wires 9–16).
///
/// The logical-X representative is {0, 3, 6} (= S1·S2 times the textbook
/// {2, 4, 6}): equivalent modulo the stabilizer group, chosen so that qubit 0
/// sits in both logical supports and can serve as the conversion transfer
/// representative for this code too.
pub fn surface_17() -> StabilizerCode {
    StabilizerCode {
        name: "surface17",
        num_data: 9,
        num_ancilla: 8,
        generators: vec![
            StabilizerGenerator::new("S1", StabilizerKind::X, &[0, 1, 3, 4], 9),
            StabilizerGenerator::new("S2", StabilizerKind::X, &[1, 2], 10),
            StabilizerGenerator::new("S3", StabilizerKind::X, &[4, 5, 7, 8], 11),
            StabilizerGenerator::new("S4", StabilizerKind::X, &[6, 7], 12),
            StabilizerGenerator::new("S5", StabilizerKind::Z, &[0, 3], 13),
            StabilizerGenerator::new("S6", StabilizerKind::Z, &[1, 2, 4, 5], 14),
            StabilizerGenerator::new("S7", StabilizerKind::Z, &[3, 4, 6, 7], 15),
            StabilizerGenerator::new("S8", StabilizerKind::Z, &[5, 8], 16),
        ],
        logical_x: vec![0, 3, 6],
        logical_z: vec![0, 4, 8],
        decode_policy: DecodePolicy::Pattern,
    }
}

/// Look up one of the two fixed codes by its caller-facing name.
pub fn by_name(name: &str) -> Option<StabilizerCode> {
    match name {
        "surface13" => Some(surface_13()),
        "surface17" => Some(surface_17()),
        _ => None,
    }
}
