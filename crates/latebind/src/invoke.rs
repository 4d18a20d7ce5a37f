//! Argument materialization, the call itself, and output assembly.
//!
//! Runs once, for the single candidate the selector picked. Conversion
//! failures abort before the call; a fault raised by the handler is caught,
//! unwrapped one level to its root cause, and reported with the candidate
//! identity. Nothing here is retried.

use smallvec::SmallVec;

use crate::{
    args::CallArgs,
    convert::convert_value,
    error::BindError,
    matcher::BindSpec,
    signature::{Param, ParamMode, ParamType, Signature},
    tracer::BindTracer,
    types::{TypeId, TypeRegistry},
    value::Value,
};

/// Materializes the argument array for the bound candidate, performs the
/// call, and reassembles the primary result with any output values.
pub(crate) fn invoke_spec<T: BindTracer>(
    registry: &TypeRegistry,
    mut spec: BindSpec<'_>,
    args: &CallArgs,
    target: &Value,
    member: &str,
    tracer: &mut T,
) -> Result<Value, BindError> {
    let signature = spec.method.signature();
    let mut call_args: Vec<Value> = Vec::with_capacity(signature.params.len());

    for slot in &mut spec.slots {
        let param = slot.param;
        let materialized = if param.is_out {
            out_storage(registry, param)
        } else if let Some(value) = slot.value.take() {
            coerce(registry, &value, param, signature, member, tracer)?
        } else {
            default_for(registry, param).ok_or_else(|| BindError::Conversion {
                member: member.to_owned(),
                candidate: signature.render(registry),
                param: param.name.clone(),
                value_type: "<absent>".to_owned(),
                target_type: param.ty.render(registry),
                reason: Some("missing required argument".to_owned()),
            })?
        };
        call_args.push(materialized);
    }

    if spec.expands {
        let variadic = pack_variadic(registry, &spec, args, member)?;
        call_args.push(variadic);
    }

    tracer.on_call(signature);
    let result = match spec.method.call(target, &mut call_args) {
        Ok(result) => result,
        Err(fault) => {
            return Err(BindError::Invocation {
                member: member.to_owned(),
                candidate: signature.render(registry),
                fault: fault.unwrap_wrapping(),
            });
        }
    };

    let out_indices: SmallVec<[usize; 4]> = spec
        .slots
        .iter()
        .filter(|slot| slot.param.is_out)
        .map(|slot| slot.index)
        .collect();
    tracer.on_outcome(out_indices.len());

    if out_indices.is_empty() {
        return Ok(match signature.returns {
            Some(_) => result,
            None => Value::Null,
        });
    }

    // the primary result leads only when the signature is non-void,
    // followed by each output slot's final value in declaration order
    let mut items: Vec<Value> = Vec::with_capacity(out_indices.len() + 1);
    if signature.returns.is_some() {
        items.push(result);
    }
    for index in out_indices {
        items.push(call_args[index].clone());
    }
    if items.len() == 1 {
        return Ok(items.remove(0));
    }
    Ok(Value::Seq {
        elem: TypeId::OBJECT,
        items,
    })
}

fn coerce<T: BindTracer>(
    registry: &TypeRegistry,
    value: &Value,
    param: &Param,
    signature: &Signature,
    member: &str,
    tracer: &mut T,
) -> Result<Value, BindError> {
    match &param.ty {
        // a type-variable slot accepts the value as-is; the handler sees
        // the runtime type the caller supplied
        ParamType::Generic(_) => Ok(value.clone()),
        ParamType::Concrete(target) => {
            tracer.on_convert(&param.name, registry.name(*target));
            convert_value(registry, value, *target).map_err(|error| BindError::Conversion {
                member: member.to_owned(),
                candidate: signature.render(registry),
                param: param.name.clone(),
                value_type: registry.name(value.type_of(registry)).to_owned(),
                target_type: param.ty.render(registry),
                reason: error.reason(),
            })
        }
    }
}

/// Zero-initialized storage for an output parameter; never read from the
/// call site, only written by the call and read back afterward.
fn out_storage(registry: &TypeRegistry, param: &Param) -> Value {
    match &param.ty {
        ParamType::Generic(_) => Value::Null,
        ParamType::Concrete(ty) => Value::zero_of(registry.kind(*ty)).unwrap_or(Value::Null),
    }
}

/// The value an unbound optional slot receives: its declared default, or a
/// synthesized one — zero for value kinds, the missing sentinel for
/// untyped parameters, null for references.
fn default_for(registry: &TypeRegistry, param: &Param) -> Option<Value> {
    match &param.mode {
        ParamMode::Required => None,
        ParamMode::OptionalWithDefault(default) => Some(default.clone()),
        ParamMode::OptionalNoDefault => Some(match &param.ty {
            ParamType::Generic(_) => Value::Missing,
            ParamType::Concrete(ty) if *ty == TypeId::OBJECT => Value::Missing,
            ParamType::Concrete(ty) => Value::zero_of(registry.kind(*ty)).unwrap_or(Value::Null),
        }),
    }
}

/// Packs the positional overflow into the variadic parameter.
///
/// A single remaining value that already is a sequence assignable to the
/// declared sequence type passes through unwrapped rather than
/// double-wrapped; otherwise every remaining value is converted to the
/// element type and collected into a fresh sequence.
fn pack_variadic(
    registry: &TypeRegistry,
    spec: &BindSpec<'_>,
    args: &CallArgs,
    member: &str,
) -> Result<Value, BindError> {
    let signature = spec.method.signature();
    let Some(param) = signature.params.last() else {
        return Ok(Value::Seq {
            elem: TypeId::OBJECT,
            items: Vec::new(),
        });
    };

    let (declared, elem) = match &param.ty {
        ParamType::Concrete(ty) => (*ty, registry.element_of(*ty).unwrap_or(TypeId::OBJECT)),
        ParamType::Generic(_) => (TypeId::OBJECT, TypeId::OBJECT),
    };

    let rest = &args.positional_values()[spec.positional_used..];
    if let [single @ Value::Seq { .. }] = rest
        && registry.is_assignable(declared, single.type_of(registry))
    {
        return Ok(single.clone());
    }

    let mut items: Vec<Value> = Vec::with_capacity(rest.len());
    for value in rest {
        let converted = convert_value(registry, value, elem).map_err(|error| BindError::Conversion {
            member: member.to_owned(),
            candidate: signature.render(registry),
            param: param.name.clone(),
            value_type: registry.name(value.type_of(registry)).to_owned(),
            target_type: registry.name(elem).to_owned(),
            reason: error.reason(),
        })?;
        items.push(converted);
    }
    Ok(Value::Seq { elem, items })
}
