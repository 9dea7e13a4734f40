//! Encode / error-inject / syndrome-measurement protocol.
//!
//! One run evaluates a single circuit on a fresh register:
//!
//! 1. **Ground-state preparation**: every X-type generator gets the
//!    Hadamard–CNOTs–Hadamard ancilla pattern, projecting the register into
//!    its +1 eigenspace. Z-type generators are already satisfied by |0…0⟩.
//! 2. **Logical excitation**: logical |1⟩ applies the code's logical-X
//!    string.
//! 3. **Error injection**: the optional single-qubit Pauli error, after
//!    preparation and before measurement so it lands in the syndrome.
//! 4. **Measurement round**: every generator's pattern again, X-type before
//!    Z-type (a data-controlled readout CNOT between an X generator's two
//!    pattern applications would wash out its ancilla expectation; the
//!    generators commute, so scheduling is free). Readouts are ⟨Z⟩ on each
//!    ancilla, reported in declaration order, plus the logical-Z string.
//!
//! Ancilla conventions leave code-dependent baseline offsets on raw
//! readouts, so a syndrome is only meaningful **relative to a reference run**
//! of the identical circuit with no injected error: a generator is flipped
//! iff its raw readout differs from the reference. That relative convention
//! is load-bearing; absolute values are not comparable across generator
//! types.

use log::debug;

use crate::code::{StabilizerCode, StabilizerGenerator, StabilizerKind};
use crate::engine::Register;
use crate::error::SimError;
use crate::pauli::{PauliError, PauliString};

/// Logical basis value for state preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalState {
    #[default]
    Zero,
    One,
}

impl LogicalState {
    /// The ⟨Z̄⟩ readout a noiseless register reports for this value.
    pub fn expectation(self) -> f64 {
        match self {
            LogicalState::Zero => 1.0,
            LogicalState::One => -1.0,
        }
    }
}

/// Result of one protocol run: the declaration-ordered relative syndrome and
/// the sign-binarized logical-Z readout.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub syndrome: Vec<f64>,
    pub logical_z: f64,
}

/// Raw (baseline-uncorrected) expectation readouts of one circuit evaluation.
pub(crate) struct RawReadout {
    pub stabilizers: Vec<f64>,
    pub logical_z: f64,
}

/// Tolerance for deciding that a raw readout differs from the reference.
/// Readouts are analytically 0 or ±1, so this is far from any boundary.
pub(crate) const READOUT_TOL: f64 = 1e-6;

/// Apply one generator's ancilla pattern.
///
/// X-type: Hadamard on the ancilla, CNOTs fanned out onto the support,
/// Hadamard again. Z-type: support-controlled CNOTs into the ancilla.
pub(crate) fn apply_generator_pattern(
    reg: &mut Register,
    generator: &StabilizerGenerator,
) -> Result<(), SimError> {
    match generator.kind {
        StabilizerKind::X => {
            reg.h(generator.ancilla)?;
            for &q in &generator.support {
                reg.cnot(generator.ancilla, q)?;
            }
            reg.h(generator.ancilla)?;
        }
        StabilizerKind::Z => {
            for &q in &generator.support {
                reg.cnot(q, generator.ancilla)?;
            }
        }
    }
    Ok(())
}

/// Project the register into the code's stabilizer ground space.
pub(crate) fn prepare_ground_state(
    reg: &mut Register,
    code: &StabilizerCode,
) -> Result<(), SimError> {
    for g in &code.generators {
        if g.kind == StabilizerKind::X {
            apply_generator_pattern(reg, g)?;
        }
    }
    Ok(())
}

/// Apply the code's logical-X string (|0⟩_L → |1⟩_L on a fresh encode).
pub(crate) fn apply_logical_x(
    reg: &mut Register,
    code: &StabilizerCode,
) -> Result<(), SimError> {
    for &q in &code.logical_x {
        reg.x(q)?;
    }
    Ok(())
}

/// Inject a single-qubit Pauli error on a data qubit of the code.
pub(crate) fn apply_error(
    reg: &mut Register,
    code: &StabilizerCode,
    error: &PauliError,
) -> Result<(), SimError> {
    if error.qubit >= code.num_data {
        return Err(SimError::InvalidWire {
            wire: error.qubit,
            num_wires: code.num_data,
        });
    }
    reg.pauli(error.pauli, error.qubit)
}

/// Run the measurement round and collect raw ancilla readouts in generator
/// declaration order.
pub(crate) fn measure_stabilizers(
    reg: &mut Register,
    code: &StabilizerCode,
) -> Result<Vec<f64>, SimError> {
    for g in &code.generators {
        if g.kind == StabilizerKind::X {
            apply_generator_pattern(reg, g)?;
        }
    }
    for g in &code.generators {
        if g.kind == StabilizerKind::Z {
            apply_generator_pattern(reg, g)?;
        }
    }
    code.generators
        .iter()
        .map(|g| reg.expectation(&PauliString::z(g.ancilla)))
        .collect()
}

/// Compare raw readouts against the reference run: −1 where they differ.
pub(crate) fn relative_syndrome(raw: &[f64], reference: &[f64]) -> Vec<f64> {
    raw.iter()
        .zip(reference)
        .map(|(r, b)| if (r - b).abs() > READOUT_TOL { -1.0 } else { 1.0 })
        .collect()
}

/// Collapse a raw logical expectation to ±1.
pub(crate) fn binarize(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Evaluate the full circuit once and read out raw expectations.
fn evaluate(
    code: &StabilizerCode,
    initial: LogicalState,
    error: Option<&PauliError>,
) -> Result<RawReadout, SimError> {
    let mut reg = Register::new(code.total_qubits());
    prepare_ground_state(&mut reg, code)?;
    if initial == LogicalState::One {
        apply_logical_x(&mut reg, code)?;
    }
    if let Some(e) = error {
        apply_error(&mut reg, code, e)?;
    }
    let stabilizers = measure_stabilizers(&mut reg, code)?;
    let logical_z = reg.expectation(&code.logical_z_observable())?;
    Ok(RawReadout {
        stabilizers,
        logical_z,
    })
}

/// Encode, optionally inject one Pauli error, and measure.
///
/// Returns the syndrome relative to an error-free reference evaluation of
/// the identical circuit (same code, same initial value), one ±1 entry per
/// generator in declaration order, together with the ±1 logical-Z readout.
pub fn run(
    code: &StabilizerCode,
    initial: LogicalState,
    error: Option<PauliError>,
) -> Result<RunOutcome, SimError> {
    let raw = evaluate(code, initial, error.as_ref())?;
    let reference = evaluate(code, initial, None)?;
    let syndrome = relative_syndrome(&raw.stabilizers, &reference.stabilizers);
    debug!(
        "{} run (initial {:?}, error {:?}): flipped {:?}, raw logical {:+.3}",
        code.name,
        initial,
        error,
        code.flipped(&syndrome),
        raw.logical_z
    );
    Ok(RunOutcome {
        syndrome,
        logical_z: binarize(raw.logical_z),
    })
}
