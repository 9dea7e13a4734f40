//! Syndrome decoding: map flipped generators to a suggested Pauli correction.
//!
//! Two policies, selected by the code table:
//!
//! - **Direct**: each flipped generator implicates the first qubit of its
//!   own support, with the opposite Pauli type (an X-type generator flags a
//!   Z correction and vice versa). Degenerate choices are accepted as-is; no
//!   global minimization is attempted.
//! - **Pattern**: the flipped-generator set is looked up in a table of
//!   every syndrome signature a single X/Y/Z error can produce on the code,
//!   yielding the physically-minimal single-qubit correction. Signatures
//!   shared by several qubits are claimed by the lowest qubit index. Any
//!   set outside the table falls back to Direct, generator-by-generator.
//!
//! Both policies are pure functions of the syndrome: no randomness, same
//! input, same correction.
//!
//! A [`Correction`] never touches a register by itself; applying it is the
//! caller's explicit decision.

use std::collections::BTreeMap;

use crate::code::{DecodePolicy, StabilizerCode, StabilizerGenerator, StabilizerKind};
use crate::error::SimError;
use crate::pauli::Pauli;

/// Physical Pauli corrections proposed by the decoder: qubits to flip (X)
/// and qubits to phase-correct (Z). Sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Correction {
    pub x: Vec<usize>,
    pub z: Vec<usize>,
}

impl Correction {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.z.is_empty()
    }

    fn single(pauli: Pauli, qubit: usize) -> Self {
        match pauli {
            Pauli::X => Self {
                x: vec![qubit],
                z: vec![],
            },
            Pauli::Z => Self {
                x: vec![],
                z: vec![qubit],
            },
            Pauli::Y => Self {
                x: vec![qubit],
                z: vec![qubit],
            },
        }
    }

    fn normalized(mut self) -> Self {
        self.x.sort_unstable();
        self.x.dedup();
        self.z.sort_unstable();
        self.z.dedup();
        self
    }
}

/// Decode a syndrome (generator name → ±1) into a suggested correction.
///
/// Every value must be exactly +1 or −1 and every name must belong to the
/// code; anything else is an [`SimError::InvalidSyndrome`]. Generators
/// absent from the map are treated as unflipped.
pub fn decode(
    code: &StabilizerCode,
    syndrome: &BTreeMap<String, f64>,
) -> Result<Correction, SimError> {
    for (name, &value) in syndrome {
        if value != 1.0 && value != -1.0 {
            return Err(SimError::InvalidSyndrome {
                generator: name.clone(),
                value,
            });
        }
        if code.generator(name).is_none() {
            return Err(SimError::InvalidSyndrome {
                generator: name.clone(),
                value,
            });
        }
    }

    // Flipped generators in declaration order.
    let flipped: Vec<&StabilizerGenerator> = code
        .generators
        .iter()
        .filter(|g| syndrome.get(g.name).copied() == Some(-1.0))
        .collect();

    if flipped.is_empty() {
        return Ok(Correction::default());
    }

    let correction = match code.decode_policy {
        DecodePolicy::Direct => direct_correction(&flipped),
        DecodePolicy::Pattern => {
            let key = pattern_key(&flipped);
            match single_error_patterns(code).remove(&key) {
                Some(c) => c,
                None => direct_correction(&flipped),
            }
        }
    };
    Ok(correction.normalized())
}

/// Direct policy: opposite-type correction on the first support qubit of
/// each flipped generator.
fn direct_correction(flipped: &[&StabilizerGenerator]) -> Correction {
    let mut correction = Correction::default();
    for g in flipped {
        let q = g.support[0];
        match g.kind {
            StabilizerKind::X => correction.z.push(q),
            StabilizerKind::Z => correction.x.push(q),
        }
    }
    correction
}

/// Lookup key: comma-joined flipped generator names, declaration order.
fn pattern_key(flipped: &[&StabilizerGenerator]) -> String {
    flipped
        .iter()
        .map(|g| g.name)
        .collect::<Vec<_>>()
        .join(",")
}

/// Table of every syndrome signature reachable by a single X/Y/Z error.
///
/// The signature of a Pauli error on qubit `q` is the set of opposite-type
/// generators whose support contains `q` (both types for Y). Errors with an
/// empty signature are undetectable and produce no entry.
fn single_error_patterns(code: &StabilizerCode) -> BTreeMap<String, Correction> {
    let mut table = BTreeMap::new();
    for pauli in [Pauli::X, Pauli::Z, Pauli::Y] {
        for q in 0..code.num_data {
            let signature: Vec<&StabilizerGenerator> = code
                .generators
                .iter()
                .filter(|g| g.contains(q) && g.kind.detects(pauli))
                .collect();
            if signature.is_empty() {
                continue;
            }
            table
                .entry(pattern_key(&signature))
                .or_insert_with(|| Correction::single(pauli, q));
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{surface_13, surface_17};

    fn syndrome(code: &StabilizerCode, flipped: &[&str]) -> BTreeMap<String, f64> {
        code.generators
            .iter()
            .map(|g| {
                let v = if flipped.contains(&g.name) { -1.0 } else { 1.0 };
                (g.name.to_string(), v)
            })
            .collect()
    }

    #[test]
    fn test_trivial_syndrome_decodes_to_nothing() {
        for code in [surface_13(), surface_17()] {
            let correction = decode(&code, &syndrome(&code, &[])).unwrap();
            assert!(correction.is_empty());
        }
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let code = surface_13();
        let mut s = syndrome(&code, &[]);
        s.insert("S1".to_string(), 2.0);
        let err = decode(&code, &s).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidSyndrome {
                generator: "S1".to_string(),
                value: 2.0
            }
        );
    }

    #[test]
    fn test_unknown_generator_is_rejected() {
        let code = surface_13();
        let mut s = syndrome(&code, &[]);
        s.insert("S9".to_string(), -1.0);
        assert!(decode(&code, &s).is_err());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let code = surface_17();
        let s = syndrome(&code, &["S5", "S6"]);
        assert_eq!(decode(&code, &s).unwrap(), decode(&code, &s).unwrap());
    }

    #[test]
    fn test_direct_policy_first_support_qubit() {
        let code = surface_13();
        // Flipped X-type S1 {0,3,6} → Z correction on qubit 0.
        let c = decode(&code, &syndrome(&code, &["S1"])).unwrap();
        assert_eq!(c, Correction { x: vec![], z: vec![0] });
        // Flipped Z-type S3 {6,7,8} → X correction on qubit 6.
        let c = decode(&code, &syndrome(&code, &["S3"])).unwrap();
        assert_eq!(c, Correction { x: vec![6], z: vec![] });
        // A Y-like pair corrects both on qubit 0.
        let c = decode(&code, &syndrome(&code, &["S1", "S2"])).unwrap();
        assert_eq!(c, Correction { x: vec![0], z: vec![0] });
    }

    #[test]
    fn test_pattern_policy_single_errors() {
        let code = surface_17();
        // X error on qubit 1 flips S6 alone (qubit 1 claims the degenerate
        // {S6} signature ahead of qubit 2).
        let c = decode(&code, &syndrome(&code, &["S6"])).unwrap();
        assert_eq!(c, Correction { x: vec![1], z: vec![] });
        // X error on qubit 3 flips S5 and S7.
        let c = decode(&code, &syndrome(&code, &["S5", "S7"])).unwrap();
        assert_eq!(c, Correction { x: vec![3], z: vec![] });
        // X error on the boundary qubit 8 flips S8 alone.
        let c = decode(&code, &syndrome(&code, &["S8"])).unwrap();
        assert_eq!(c, Correction { x: vec![8], z: vec![] });
        // Z error on qubit 5 flips S3 alone.
        let c = decode(&code, &syndrome(&code, &["S3"])).unwrap();
        assert_eq!(c, Correction { x: vec![], z: vec![5] });
        // Y error on the center qubit flips S1, S3, S6, S7.
        let c = decode(&code, &syndrome(&code, &["S1", "S3", "S6", "S7"])).unwrap();
        assert_eq!(c, Correction { x: vec![4], z: vec![4] });
    }

    #[test]
    fn test_pattern_policy_falls_back_to_direct() {
        let code = surface_17();
        // {S5, S6} is not a single-error signature; direct policy corrects
        // each flipped Z-type generator on its first support qubit.
        let c = decode(&code, &syndrome(&code, &["S5", "S6"])).unwrap();
        assert_eq!(c, Correction { x: vec![0, 1], z: vec![] });
    }

    #[test]
    fn test_partial_syndrome_map_is_tolerated() {
        // Missing generators count as unflipped, mirroring the original
        // decoder's lenient lookup.
        let code = surface_17();
        let mut s = BTreeMap::new();
        s.insert("S6".to_string(), -1.0);
        let c = decode(&code, &s).unwrap();
        assert_eq!(c, Correction { x: vec![1], z: vec![] });
    }

    #[test]
    fn test_every_single_error_signature_decodes() {
        // Every detectable single error must resolve to some correction
        // under the code's policy, with no gap in the pattern table.
        for code in [surface_13(), surface_17()] {
            for pauli in [Pauli::X, Pauli::Z, Pauli::Y] {
                for q in 0..code.num_data {
                    let names: Vec<&str> = code
                        .generators
                        .iter()
                        .filter(|g| g.contains(q) && g.kind.detects(pauli))
                        .map(|g| g.name)
                        .collect();
                    if names.is_empty() {
                        continue;
                    }
                    let c = decode(&code, &syndrome(&code, &names)).unwrap();
                    assert!(
                        !c.is_empty(),
                        "{:?} on qubit {} of {} produced no correction",
                        pauli,
                        q,
                        code.name
                    );
                }
            }
        }
    }
}
