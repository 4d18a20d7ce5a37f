//! Structural admissibility: can a signature possibly accept a call shape?
//!
//! The matcher is a pure function over one signature and the call-site
//! arity/keyword set. It builds the per-parameter binding slots but binds
//! no values; the scorer fills slots later, and only for admissible
//! candidates.

use ahash::AHashSet;
use smallvec::SmallVec;

use crate::{registry::Method, signature::Param, value::Value};

/// Per-parameter binding state for one resolution attempt.
///
/// Created fresh per candidate per resolution — never shared — because the
/// bound value is call-specific. Filled by the scorer, consumed once by the
/// invocation driver, then discarded.
#[derive(Debug)]
pub(crate) struct Slot<'a> {
    pub index: usize,
    pub param: &'a Param,
    pub value: Option<Value>,
}

/// A structurally-admissible candidate plus its slots, prior to invocation.
#[derive(Debug)]
pub(crate) struct BindSpec<'a> {
    pub method: &'a Method,
    pub required: usize,
    pub optional: usize,
    pub expands: bool,
    pub slots: SmallVec<[Slot<'a>; 8]>,
    /// How many positional values the scorer consumed into slots; the
    /// remainder feeds the variadic pack.
    pub positional_used: usize,
}

/// Decides whether `method` can accept a call with `given` total arguments
/// and the supplied keyword names, building the slot array if so.
///
/// Rejection conditions: a keyword targets an output parameter, a keyword
/// matches no parameter in the fixed slot walk, or the arity rule fails.
/// Admissibility requires `given == required`, or
/// `required < given && (expands || given <= required + optional)`.
///
/// Output parameters get slots (their storage is synthesized later) but
/// count toward neither `required` nor `optional`.
pub(crate) fn try_match<'a>(method: &'a Method, given: usize, keywords: &AHashSet<&str>) -> Option<BindSpec<'a>> {
    let signature = method.signature();
    let expands = signature.expands();
    let fixed = signature.fixed_params();

    let mut required = 0usize;
    let mut optional = 0usize;
    let mut keywords_left = keywords.len();
    let mut slots: SmallVec<[Slot<'a>; 8]> = SmallVec::with_capacity(fixed.len());

    for (index, param) in fixed.iter().enumerate() {
        if keywords.contains(param.name.as_str()) {
            if param.is_out {
                return None;
            }
            keywords_left = keywords_left.saturating_sub(1);
        }

        if param.is_out {
            slots.push(Slot {
                index,
                param,
                value: None,
            });
            continue;
        }

        if param.is_optional() {
            optional += 1;
        } else {
            required += 1;
        }
        slots.push(Slot {
            index,
            param,
            value: None,
        });
    }

    // a keyword that no parameter consumed invalidates the candidate
    if keywords_left > 0 {
        return None;
    }

    let admissible = given == required || (required < given && (expands || given <= required + optional));
    if !admissible {
        return None;
    }

    Some(BindSpec {
        method,
        required,
        optional,
        expands,
        slots,
        positional_used: 0,
    })
}
