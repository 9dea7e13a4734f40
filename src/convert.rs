//! Cross-code conversion: decode a logical qubit out of one code and
//! re-encode it into the other while preserving the logical value.
//!
//! One conversion evaluates a single circuit on a register wide enough for
//! the larger code plus one transfer wire, walking the stage machine
//!
//! ```text
//! SourcePrepared → ErrorInjected → SourceMeasured → LogicalTransferred
//!                → TargetReset → TargetPrepared → TargetMeasured
//! ```
//!
//! The source syndrome round doubles as the disentangling step: after it,
//! every source ancilla sits in a definite basis state and the data register
//! is a computational pattern carrying the logical excitation (plus any
//! injected bit-flip). Logical transfer reads the source logical-Z parity
//! onto the transfer wire coherently, then a CNOT folds it into the shared
//! representative qubit 0. Both codes carry qubit 0 in their logical-X and
//! logical-Z supports, so an error-free transfer returns qubit 0 to the
//! ground state and the target re-encode starts clean.
//!
//! The reported syndrome is relative to an error-free reference conversion
//! (same codes, same initial value), in the target code's generator order.

use log::debug;

use crate::code::StabilizerCode;
use crate::engine::Register;
use crate::error::SimError;
use crate::pauli::PauliError;
use crate::protocol::{
    self, binarize, relative_syndrome, LogicalState, RawReadout, RunOutcome,
};

/// Where in the pipeline the injected error is applied. Errors land in the
/// source code, after its state preparation and before its syndrome round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStage {
    #[default]
    Source,
}

/// One conversion invocation, consumed whole by [`convert`].
#[derive(Debug, Clone, Copy)]
pub struct ConversionRequest<'a> {
    pub source: &'a StabilizerCode,
    pub target: &'a StabilizerCode,
    pub initial: LogicalState,
    pub error: Option<PauliError>,
    pub error_stage: ErrorStage,
}

impl<'a> ConversionRequest<'a> {
    pub fn new(
        source: &'a StabilizerCode,
        target: &'a StabilizerCode,
        initial: LogicalState,
    ) -> Self {
        Self {
            source,
            target,
            initial,
            error: None,
            error_stage: ErrorStage::Source,
        }
    }

    pub fn with_error(mut self, error: PauliError) -> Self {
        self.error = Some(error);
        self
    }

    /// Register width: the larger code plus one transfer wire.
    pub fn register_width(&self) -> usize {
        self.source.total_qubits().max(self.target.total_qubits()) + 1
    }

    /// The transfer wire sits past both codes' qubits.
    pub fn transfer_wire(&self) -> usize {
        self.register_width() - 1
    }
}

/// Evaluate the full conversion circuit once and read out raw target
/// expectations.
fn evaluate(request: &ConversionRequest) -> Result<RawReadout, SimError> {
    let mut reg = Register::new(request.register_width());

    // SourcePrepared
    protocol::prepare_ground_state(&mut reg, request.source)?;
    if request.initial == LogicalState::One {
        protocol::apply_logical_x(&mut reg, request.source)?;
    }

    // ErrorInjected
    if let Some(error) = &request.error {
        match request.error_stage {
            ErrorStage::Source => protocol::apply_error(&mut reg, request.source, error)?,
        }
    }

    // SourceMeasured: not part of the result, but it is what returns the
    // source ancillas to definite states before they are recycled.
    let source_syndrome = protocol::measure_stabilizers(&mut reg, request.source)?;
    debug!(
        "source {} raw syndrome before hand-off: {:?}",
        request.source.name, source_syndrome
    );

    // LogicalTransferred. Must precede every reset: the read-out needs the
    // still-encoded register.
    if request.initial == LogicalState::One {
        let t = request.transfer_wire();
        for &q in &request.source.logical_z {
            reg.cnot(q, t)?;
        }
        reg.cnot(t, 0)?;
    }

    // TargetReset: everything except the representative qubit 0. Ancillas
    // are included: a stale source readout left on a shared ancilla would
    // masquerade as target syndrome.
    for wire in 1..reg.num_wires() {
        reg.reset(wire)?;
    }

    // TargetPrepared
    for q in 1..request.target.num_data {
        reg.cnot(0, q)?;
    }
    protocol::prepare_ground_state(&mut reg, request.target)?;
    if request.initial == LogicalState::One {
        protocol::apply_logical_x(&mut reg, request.target)?;
    }

    // TargetMeasured
    let stabilizers = protocol::measure_stabilizers(&mut reg, request.target)?;
    let logical_z = reg.expectation(&request.target.logical_z_observable())?;
    Ok(RawReadout {
        stabilizers,
        logical_z,
    })
}

/// Convert a logical qubit from `request.source` into `request.target`.
///
/// Returns the target code's syndrome (relative to an error-free reference
/// conversion with the same codes and initial value, in the target's
/// generator order) and the ±1 target logical-Z readout. With no injected
/// error the logical readout equals the encoded initial value exactly.
pub fn convert(request: &ConversionRequest) -> Result<RunOutcome, SimError> {
    let raw = evaluate(request)?;
    let reference = evaluate(&ConversionRequest {
        error: None,
        ..*request
    })?;
    let syndrome = relative_syndrome(&raw.stabilizers, &reference.stabilizers);
    debug!(
        "{} → {} (initial {:?}, error {:?}): flipped {:?}, raw logical {:+.3}",
        request.source.name,
        request.target.name,
        request.initial,
        request.error,
        request.target.flipped(&syndrome),
        raw.logical_z
    );
    Ok(RunOutcome {
        syndrome,
        logical_z: binarize(raw.logical_z),
    })
}
