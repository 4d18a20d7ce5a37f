//! Resolution tracing infrastructure.
//!
//! Provides a trait-based tracing system for the binder with zero-cost
//! abstraction: with [`NoopTracer`] every hook compiles away through
//! monomorphization. Concrete implementations collect different kinds of
//! data:
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (production default) |
//! | [`StderrTracer`] | Human-readable resolution log to stderr |
//! | [`RecordingTracer`] | Full event recording for tests or post-mortem |

use crate::signature::Signature;

/// Trace event emitted during one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A candidate passed or failed the structural admissibility check.
    Candidate { method: String, admitted: bool },
    /// An admissible candidate was scored.
    Distance { method: String, distance: u32 },
    /// The winning candidate was chosen.
    Selected { method: String, distance: u32 },
    /// A bound value was coerced for a parameter.
    Convert { param: String, target: String },
    /// The selected handler is about to run.
    Call { method: String },
    /// The call completed; `outs` output slots were read back.
    Outcome { outs: usize },
}

/// Trait for binder resolution tracing.
///
/// All methods have default no-op implementations, so [`NoopTracer`]
/// requires zero lines of code and compiles to zero instructions. The
/// binder takes the tracer as a type parameter, so the compiler inlines and
/// eliminates no-op calls.
pub trait BindTracer {
    /// Called once per candidate after the admissibility check.
    #[inline(always)]
    fn on_candidate(&mut self, _signature: &Signature, _admitted: bool) {}

    /// Called once per admissible candidate with its computed distance.
    #[inline(always)]
    fn on_distance(&mut self, _signature: &Signature, _distance: u32) {}

    /// Called when a candidate wins the selection.
    #[inline(always)]
    fn on_selected(&mut self, _signature: &Signature, _distance: u32) {}

    /// Called for each argument coercion while materializing the call.
    #[inline(always)]
    fn on_convert(&mut self, _param: &str, _target: &str) {}

    /// Called immediately before the selected handler runs.
    #[inline(always)]
    fn on_call(&mut self, _signature: &Signature) {}

    /// Called after the handler returns, with the output-slot count.
    #[inline(always)]
    fn on_outcome(&mut self, _outs: usize) {}
}

/// Zero-cost tracer: every hook is a no-op that monomorphizes away.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl BindTracer for NoopTracer {}

/// Logs each resolution step to stderr in a human-readable form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrTracer;

impl BindTracer for StderrTracer {
    fn on_candidate(&mut self, signature: &Signature, admitted: bool) {
        let verdict = if admitted { "admitted" } else { "rejected" };
        eprintln!("candidate {}/{}: {verdict}", signature.name, signature.params.len());
    }

    fn on_distance(&mut self, signature: &Signature, distance: u32) {
        eprintln!("distance {}/{}: {distance}", signature.name, signature.params.len());
    }

    fn on_selected(&mut self, signature: &Signature, distance: u32) {
        eprintln!("selected {}/{} at {distance}", signature.name, signature.params.len());
    }

    fn on_convert(&mut self, param: &str, target: &str) {
        eprintln!("convert '{param}' -> {target}");
    }

    fn on_call(&mut self, signature: &Signature) {
        eprintln!("calling {}", signature.name);
    }

    fn on_outcome(&mut self, outs: usize) {
        eprintln!("completed with {outs} output slot(s)");
    }
}

/// Records every event for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}

impl BindTracer for RecordingTracer {
    fn on_candidate(&mut self, signature: &Signature, admitted: bool) {
        self.events.push(TraceEvent::Candidate {
            method: signature.name.clone(),
            admitted,
        });
    }

    fn on_distance(&mut self, signature: &Signature, distance: u32) {
        self.events.push(TraceEvent::Distance {
            method: signature.name.clone(),
            distance,
        });
    }

    fn on_selected(&mut self, signature: &Signature, distance: u32) {
        self.events.push(TraceEvent::Selected {
            method: signature.name.clone(),
            distance,
        });
    }

    fn on_convert(&mut self, param: &str, target: &str) {
        self.events.push(TraceEvent::Convert {
            param: param.to_owned(),
            target: target.to_owned(),
        });
    }

    fn on_call(&mut self, signature: &Signature) {
        self.events.push(TraceEvent::Call {
            method: signature.name.clone(),
        });
    }

    fn on_outcome(&mut self, outs: usize) {
        self.events.push(TraceEvent::Outcome { outs });
    }
}
