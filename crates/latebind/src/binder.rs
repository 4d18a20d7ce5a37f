//! The inbound contract: resolve a member call and run it.
//!
//! A [`Binder`] borrows the type registry and a candidate source for the
//! duration of its life and owns the distance-memoization cache. Resolution
//! is synchronous and re-entrant: `invoke` takes `&self`, performs no
//! blocking I/O, and the only shared mutable state is the interior-locked
//! cache, so many resolutions may run concurrently on independent call
//! sites.

use crate::{
    args::CallArgs,
    distance::DistanceTable,
    error::BindError,
    invoke::invoke_spec,
    registry::CandidateSource,
    select::select_overload,
    tracer::{BindTracer, NoopTracer},
    types::TypeRegistry,
    value::Value,
};

/// The overload-resolution and invocation engine.
pub struct Binder<'a, S: CandidateSource> {
    registry: &'a TypeRegistry,
    members: &'a S,
    distances: DistanceTable,
}

impl<'a, S: CandidateSource> Binder<'a, S> {
    pub fn new(registry: &'a TypeRegistry, members: &'a S) -> Self {
        Self {
            registry,
            members,
            distances: DistanceTable::new(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// Resolves `member` on `target` against the supplied call shape and
    /// invokes the winning overload.
    ///
    /// The pipeline per call: collect candidates, check structural
    /// admissibility, score, select the strict minimum, materialize
    /// arguments, call, assemble outputs. Failures are terminal for the
    /// call and reported as one of the four [`BindError`] kinds.
    pub fn invoke<T: BindTracer>(
        &self,
        target: &Value,
        member: &str,
        args: &CallArgs,
        tracer: &mut T,
    ) -> Result<Value, BindError> {
        let target_type = target.type_of(self.registry);
        let methods = self.members.candidates(self.registry, target_type, member);
        let spec = select_overload(self.registry, &self.distances, &methods, args, member, tracer)?;
        invoke_spec(self.registry, spec, args, target, member, tracer)
    }

    /// [`invoke`](Self::invoke) with no tracing.
    pub fn call(&self, target: &Value, member: &str, args: &CallArgs) -> Result<Value, BindError> {
        self.invoke(target, member, args, &mut NoopTracer)
    }
}
