//! Overload selection: admissibility sweep, scoring, strict-minimum pick.
//!
//! Ties at the minimal distance are a defined failure mode, never an
//! arbitrary pick — including ties that could only be broken by preferring
//! the candidate needing fewer defaults.

use ahash::AHashSet;

use crate::{
    args::CallArgs,
    distance::DistanceTable,
    error::BindError,
    matcher::{BindSpec, try_match},
    registry::Method,
    tracer::BindTracer,
    types::TypeRegistry,
};

/// Runs the matcher over every candidate, scores the admissible ones, and
/// picks the strict minimum.
///
/// A zero-argument call that admits a zero-parameter candidate short-
/// circuits: that overload takes precedence over any all-optional shape
/// that could also be called bare.
pub(crate) fn select_overload<'a, T: BindTracer>(
    registry: &TypeRegistry,
    distances: &DistanceTable,
    methods: &[&'a Method],
    args: &CallArgs,
    member: &str,
    tracer: &mut T,
) -> Result<BindSpec<'a>, BindError> {
    let keywords: AHashSet<&str> = args.keyword_names().collect();
    let given = args.given();

    let mut admitted: Vec<BindSpec<'a>> = Vec::with_capacity(methods.len());
    for method in methods {
        match try_match(method, given, &keywords) {
            Some(mut spec) => {
                tracer.on_candidate(method.signature(), true);
                if given == 0 && spec.slots.is_empty() && !spec.expands {
                    let distance = distances.score(registry, &mut spec, args);
                    tracer.on_distance(spec.method.signature(), distance);
                    tracer.on_selected(spec.method.signature(), distance);
                    return Ok(spec);
                }
                admitted.push(spec);
            }
            None => tracer.on_candidate(method.signature(), false),
        }
    }

    if admitted.is_empty() {
        return Err(BindError::NoMatch {
            member: member.to_owned(),
            given,
            candidates: methods.iter().map(|m| m.signature().render(registry)).collect(),
        });
    }

    if admitted.len() == 1 {
        let mut spec = admitted.remove(0);
        // a sole candidate wins unconditionally; scored for uniformity
        let distance = distances.score(registry, &mut spec, args);
        tracer.on_distance(spec.method.signature(), distance);
        tracer.on_selected(spec.method.signature(), distance);
        return Ok(spec);
    }

    let mut scored: Vec<u32> = Vec::with_capacity(admitted.len());
    for spec in &mut admitted {
        let distance = distances.score(registry, spec, args);
        tracer.on_distance(spec.method.signature(), distance);
        scored.push(distance);
    }

    let closest = scored.iter().copied().min().unwrap_or(u32::MAX);
    if scored.iter().filter(|d| **d == closest).count() > 1 {
        let tied: Vec<String> = admitted
            .iter()
            .zip(&scored)
            .filter(|(_, d)| **d == closest)
            .map(|(spec, _)| spec.method.signature().render(registry))
            .collect();
        return Err(BindError::Ambiguous {
            member: member.to_owned(),
            candidates: tied,
        });
    }

    let winner_index = scored.iter().position(|d| *d == closest).unwrap_or(0);
    let spec = admitted.swap_remove(winner_index);
    tracer.on_selected(spec.method.signature(), closest);
    Ok(spec)
}
