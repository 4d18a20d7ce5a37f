//! Distance scoring: ranking structurally-admissible candidates.
//!
//! The overall distance range is split into blocks so different candidate
//! kinds never overlap: binding kind (instance vs static) and variadic
//! expansion each occupy a full sector, generic arity takes one argument
//! step per type variable, and only then do per-argument type distances
//! discriminate. Lower is better throughout.
//!
//! Type-to-type closeness comes from a fixed precedence ladder over the
//! primitive kinds, so a 32-bit integer argument scores closer to a 64-bit
//! integer parameter than to a boolean one without any conversion
//! feasibility check at scoring time.

use std::sync::RwLock;

use ahash::AHashMap;

use crate::{
    args::CallArgs,
    matcher::BindSpec,
    signature::ParamType,
    types::{TypeId, TypeKind, TypeRegistry},
    value::Value,
};

/// One quarter of the distance range; static binding and variadic expansion
/// each shift a candidate by a full sector.
const SECTOR_SIZE: u32 = u32::MAX / 4;
pub(crate) const STATIC_DISTANCE: u32 = SECTOR_SIZE;
pub(crate) const EXPANDS_DISTANCE: u32 = SECTOR_SIZE;
/// Per-slot step: the missing-argument penalty and the base cost of every
/// bound slot.
pub(crate) const ARG_DISTANCE: u32 = 32;
/// Extra cost when the parameter type is a generic type variable.
const GENERIC_TYPE_DISTANCE: u32 = 2;
/// Extra cost when a numeric conversion would narrow rather than widen.
const NARROWING_DISTANCE: u32 = 8;
/// Rank for kinds outside the primitive ladder (classes, interfaces,
/// sequences, null, and generic type variables).
const UNRANKED: u32 = 2000;

/// Position of a kind on the precedence ladder. Adjacent ranks convert more
/// cheaply than distant ones.
fn rank(kind: &TypeKind) -> u32 {
    match kind {
        TypeKind::U64 => 12,
        TypeKind::U32 => 13,
        TypeKind::U16 => 14,
        TypeKind::I64 => 15,
        TypeKind::I32 => 16,
        TypeKind::I16 => 17,
        TypeKind::Char => 18,
        TypeKind::I8 => 19,
        TypeKind::U8 => 20,
        TypeKind::Usize => 30,
        TypeKind::Isize => 31,
        TypeKind::F32 => 40,
        TypeKind::F64 => 42,
        TypeKind::Str => 50,
        TypeKind::Bool => 60,
        _ => UNRANKED,
    }
}

/// Whether `from -> to` is a widening numeric conversion (every value of
/// the source kind is representable in the target kind, following the
/// conventional implicit-conversion table).
fn is_widening(from: &TypeKind, to: &TypeKind) -> bool {
    use TypeKind::{F32, F64, I8, I16, I32, I64, Isize, U8, U16, U32, U64, Usize};
    match from {
        I8 => matches!(to, I16 | I32 | I64 | Isize | F32 | F64),
        U8 => matches!(to, U16 | I16 | U32 | I32 | U64 | I64 | Usize | Isize | F32 | F64),
        I16 => matches!(to, I32 | I64 | Isize | F32 | F64),
        U16 => matches!(to, U32 | I32 | U64 | I64 | Usize | Isize | F32 | F64),
        I32 => matches!(to, I64 | Isize | F32 | F64),
        U32 => matches!(to, U64 | I64 | Usize | F32 | F64),
        I64 => matches!(to, F32 | F64),
        U64 => matches!(to, F32 | F64),
        Isize => matches!(to, I64 | F32 | F64),
        Usize => matches!(to, U64 | F32 | F64),
        F32 => matches!(to, F64),
        _ => false,
    }
}

/// Memoized type-pair distances.
///
/// An explicit cache object owned by the binder rather than implicit shared
/// state. Keyed by the unordered type pair; concurrent resolutions may
/// recompute the same entry and the last writer wins, which is safe because
/// the computed value is deterministic per direction queried.
#[derive(Debug, Default)]
pub struct DistanceTable {
    cache: RwLock<AHashMap<(TypeId, TypeId), u32>>,
}

impl DistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closeness of `from` to `to`: identity is 0, assignability 1,
    /// otherwise one plus the rank gap (plus the narrowing step for
    /// non-widening numeric conversions).
    pub fn type_distance(&self, registry: &TypeRegistry, from: TypeId, to: TypeId) -> u32 {
        let key = (from.min(to), from.max(to));
        {
            let cache = match self.cache.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(&distance) = cache.get(&key) {
                return distance;
            }
        }

        let distance = compute_type_distance(registry, from, to);

        let mut cache = match self.cache.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.insert(key, distance);
        distance
    }

    /// Distance of one call-site value against one parameter type.
    pub(crate) fn value_distance(&self, registry: &TypeRegistry, value: &Value, ty: &ParamType) -> u32 {
        let mut distance = ARG_DISTANCE;
        match ty {
            ParamType::Generic(_) => {
                // a type variable is never an exact match; rank it with the
                // unranked kinds so concrete overloads stay preferred
                distance += GENERIC_TYPE_DISTANCE;
                let from = value.type_of(registry);
                distance += 3 + 1 + UNRANKED.abs_diff(rank(registry.kind(from)));
            }
            ParamType::Concrete(target) => {
                let from = value.type_of(registry);
                if from == *target {
                    distance += 1;
                } else {
                    distance += 3 + self.type_distance(registry, from, *target);
                }
            }
        }
        distance
    }

    /// Computes the total distance for one admissible candidate, binding
    /// each slot's value as a side effect.
    ///
    /// Keyword values take priority over positional values; unmatched slots
    /// accrue the missing-argument penalty and stay unbound for the driver
    /// to default. Output slots never consume call-site values.
    pub(crate) fn score(&self, registry: &TypeRegistry, spec: &mut BindSpec<'_>, args: &CallArgs) -> u32 {
        let signature = spec.method.signature();
        let mut total = 0u32;

        if signature.is_static {
            total += STATIC_DISTANCE;
        }
        if spec.expands {
            total += EXPANDS_DISTANCE;
        }
        total += ARG_DISTANCE * u32::from(signature.generic_arity);

        let positional = args.positional_values();
        let mut cursor = 0usize;
        for slot in &mut spec.slots {
            if slot.param.is_out {
                continue;
            }
            if let Some(value) = args.named_value(&slot.param.name) {
                total += self.value_distance(registry, value, &slot.param.ty);
                slot.value = Some(value.clone());
            } else if cursor < positional.len() {
                let value = &positional[cursor];
                total += self.value_distance(registry, value, &slot.param.ty);
                slot.value = Some(value.clone());
                cursor += 1;
            } else {
                total += ARG_DISTANCE;
            }
        }
        spec.positional_used = cursor;
        total
    }
}

fn compute_type_distance(registry: &TypeRegistry, from: TypeId, to: TypeId) -> u32 {
    if from == to {
        return 0;
    }
    if registry.is_assignable(to, from) {
        return 1;
    }
    let from_kind = registry.kind(from);
    let to_kind = registry.kind(to);
    let mut distance = 1 + rank(to_kind).abs_diff(rank(from_kind));
    if from_kind.is_numeric() && to_kind.is_numeric() && !is_widening(from_kind, to_kind) {
        distance += NARROWING_DISTANCE;
    }
    distance
}
