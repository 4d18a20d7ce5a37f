//! Lazy value coercion for the winning candidate.
//!
//! Conversion runs only for the single candidate the selector picked —
//! never speculatively for losing ones — because operator lookup and
//! invocation are comparatively expensive. The pipeline is: pass-through
//! for identity/assignability, then a user-defined conversion operator
//! (source-declared before target-declared), then a checked numeric
//! conversion, then failure.

use crate::{
    error::CallFault,
    types::{TypeId, TypeKind, TypeRegistry},
    value::Value,
};

/// Why a coercion failed; the invocation driver folds this into the
/// structured conversion error naming the candidate and parameter.
#[derive(Debug)]
pub(crate) enum ConvertError {
    /// No conversion path exists between the two types.
    Unsupported,
    /// A numeric conversion exists but this value does not fit the target.
    OutOfRange,
    /// A user-defined conversion operator raised a fault.
    Operator(CallFault),
}

impl ConvertError {
    pub(crate) fn reason(&self) -> Option<String> {
        match self {
            Self::Unsupported => None,
            Self::OutOfRange => Some("value out of range".to_owned()),
            Self::Operator(fault) => Some(format!("conversion operator raised: {fault}")),
        }
    }
}

/// Coerces `value` to `target`, if a conversion exists.
pub(crate) fn convert_value(registry: &TypeRegistry, value: &Value, target: TypeId) -> Result<Value, ConvertError> {
    let from = value.type_of(registry);
    if from == target || registry.is_assignable(target, from) {
        return Ok(value.clone());
    }

    if let Some(op) = registry.find_conversion(from, target) {
        return op.call(value).map_err(ConvertError::Operator);
    }

    numeric_conversion(value, registry.kind(target))
}

/// Checked conversion between primitive kinds: integer conversions succeed
/// only when the value fits the target, floats never silently become
/// integers, and integer-to-float follows the usual widening rules.
fn numeric_conversion(value: &Value, to: &TypeKind) -> Result<Value, ConvertError> {
    if let Some(n) = integer_of(value) {
        return integer_to(n, to);
    }
    match (value, to) {
        (Value::F32(v), TypeKind::F64) => Ok(Value::F64(f64::from(*v))),
        (Value::F64(v), TypeKind::F32) => {
            let narrowed = *v as f32;
            if v.is_finite() && narrowed.is_infinite() {
                Err(ConvertError::OutOfRange)
            } else {
                Ok(Value::F32(narrowed))
            }
        }
        _ => Err(ConvertError::Unsupported),
    }
}

/// Widens any integer-like value to `i128`, which covers the full `u64`
/// and `i64` ranges. Characters convert through their scalar value.
fn integer_of(value: &Value) -> Option<i128> {
    match value {
        Value::U8(v) => Some(i128::from(*v)),
        Value::I8(v) => Some(i128::from(*v)),
        Value::U16(v) => Some(i128::from(*v)),
        Value::I16(v) => Some(i128::from(*v)),
        Value::U32(v) => Some(i128::from(*v)),
        Value::I32(v) => Some(i128::from(*v)),
        Value::U64(v) => Some(i128::from(*v)),
        Value::I64(v) => Some(i128::from(*v)),
        Value::Usize(v) => Some(*v as i128),
        Value::Isize(v) => Some(*v as i128),
        Value::Char(c) => Some(i128::from(u32::from(*c))),
        _ => None,
    }
}

fn integer_to(n: i128, to: &TypeKind) -> Result<Value, ConvertError> {
    match to {
        TypeKind::U8 => u8::try_from(n).map(Value::U8).map_err(|_| ConvertError::OutOfRange),
        TypeKind::I8 => i8::try_from(n).map(Value::I8).map_err(|_| ConvertError::OutOfRange),
        TypeKind::U16 => u16::try_from(n).map(Value::U16).map_err(|_| ConvertError::OutOfRange),
        TypeKind::I16 => i16::try_from(n).map(Value::I16).map_err(|_| ConvertError::OutOfRange),
        TypeKind::U32 => u32::try_from(n).map(Value::U32).map_err(|_| ConvertError::OutOfRange),
        TypeKind::I32 => i32::try_from(n).map(Value::I32).map_err(|_| ConvertError::OutOfRange),
        TypeKind::U64 => u64::try_from(n).map(Value::U64).map_err(|_| ConvertError::OutOfRange),
        TypeKind::I64 => i64::try_from(n).map(Value::I64).map_err(|_| ConvertError::OutOfRange),
        TypeKind::Usize => usize::try_from(n).map(Value::Usize).map_err(|_| ConvertError::OutOfRange),
        TypeKind::Isize => isize::try_from(n).map(Value::Isize).map_err(|_| ConvertError::OutOfRange),
        TypeKind::F32 => Ok(Value::F32(n as f32)),
        TypeKind::F64 => Ok(Value::F64(n as f64)),
        TypeKind::Char => u32::try_from(n)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char)
            .ok_or(ConvertError::OutOfRange),
        _ => Err(ConvertError::Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_passes_through() {
        let registry = TypeRegistry::new();
        let converted = convert_value(&registry, &Value::I32(7), TypeId::I32).unwrap();
        assert_eq!(converted, Value::I32(7));
    }

    #[test]
    fn narrowing_is_checked_against_the_value() {
        let registry = TypeRegistry::new();
        let fits = convert_value(&registry, &Value::I32(100), TypeId::I16).unwrap();
        assert_eq!(fits, Value::I16(100));
        let overflow = convert_value(&registry, &Value::I32(100_000), TypeId::I16);
        assert!(matches!(overflow, Err(ConvertError::OutOfRange)));
    }

    #[test]
    fn floats_never_silently_become_integers() {
        let registry = TypeRegistry::new();
        let result = convert_value(&registry, &Value::F64(1.0), TypeId::I32);
        assert!(matches!(result, Err(ConvertError::Unsupported)));
    }

    #[test]
    fn integers_widen_to_floats() {
        let registry = TypeRegistry::new();
        let converted = convert_value(&registry, &Value::I32(3), TypeId::F64).unwrap();
        assert_eq!(converted, Value::F64(3.0));
    }

    #[test]
    fn char_converts_through_its_scalar_value() {
        let registry = TypeRegistry::new();
        let converted = convert_value(&registry, &Value::Char('A'), TypeId::U32).unwrap();
        assert_eq!(converted, Value::U32(65));
        let back = convert_value(&registry, &Value::U32(66), TypeId::CHAR).unwrap();
        assert_eq!(back, Value::Char('B'));
    }

    #[test]
    fn null_passes_into_reference_targets_only() {
        let mut registry = TypeRegistry::new();
        let class = registry.register_class("Widget", None, &[]);
        assert_eq!(convert_value(&registry, &Value::Null, class).unwrap(), Value::Null);
        assert!(matches!(
            convert_value(&registry, &Value::Null, TypeId::I32),
            Err(ConvertError::Unsupported)
        ));
    }
}
