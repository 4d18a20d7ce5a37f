//! Method registration and candidate discovery.
//!
//! The engine has no reflection: hosts register each overload as a
//! [`Method`] — an immutable [`Signature`] paired with a handler closure —
//! under a `(type, member name)` key. Lookup walks the target type's base
//! chain, so derived types see inherited members, and returns candidates in
//! a deterministic precedence order independent of registration order.

use std::fmt;

use ahash::AHashMap;

use crate::{
    error::CallFault,
    signature::{ParamType, Signature},
    types::{TypeId, TypeKind, TypeRegistry},
    value::Value,
};

/// The callable behind one overload.
///
/// The handler receives the invocation target (ignored by static methods)
/// and the fully-materialized argument array, one entry per declared
/// parameter. Output parameters are written in place and read back by the
/// engine after the call returns.
pub type Handler = Box<dyn Fn(&Value, &mut [Value]) -> Result<Value, CallFault> + Send + Sync>;

/// One overload: an immutable signature plus its handler.
pub struct Method {
    signature: Signature,
    handler: Handler,
}

impl Method {
    pub fn new(
        signature: Signature,
        handler: impl Fn(&Value, &mut [Value]) -> Result<Value, CallFault> + Send + Sync + 'static,
    ) -> Self {
        Self {
            signature,
            handler: Box::new(handler),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&self, target: &Value, args: &mut [Value]) -> Result<Value, CallFault> {
        (self.handler)(target, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("signature", &self.signature).finish_non_exhaustive()
    }
}

/// Read-only provider of the candidate set for one `(type, member)` pair.
///
/// The set must be stable for the duration of one resolution; registration
/// is an append-only operation performed before or between calls.
pub trait CandidateSource {
    fn candidates<'a>(&'a self, registry: &TypeRegistry, target: TypeId, member: &str) -> Vec<&'a Method>;
}

/// The default candidate source: an explicit registration table built at
/// startup.
#[derive(Debug, Default)]
pub struct MemberTable {
    members: AHashMap<(TypeId, String), Vec<Method>>,
}

impl MemberTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one overload of `method.signature().name` on `ty`.
    ///
    /// The bucket is kept sorted by precedence so lookups are deterministic
    /// regardless of registration order.
    pub fn register(&mut self, registry: &TypeRegistry, ty: TypeId, method: Method) {
        let key = (ty, method.signature().name.clone());
        let bucket = self.members.entry(key).or_default();
        bucket.push(method);
        bucket.sort_by_cached_key(|m| precedence(registry, m.signature()));
    }

    /// Number of overloads registered directly on `ty` for `member`.
    pub fn overload_count(&self, ty: TypeId, member: &str) -> usize {
        self.members.get(&(ty, member.to_owned())).map_or(0, Vec::len)
    }
}

impl CandidateSource for MemberTable {
    fn candidates<'a>(&'a self, registry: &TypeRegistry, target: TypeId, member: &str) -> Vec<&'a Method> {
        let mut found = Vec::new();
        let mut current = Some(target);
        while let Some(ty) = current {
            if let Some(bucket) = self.members.get(&(ty, member.to_owned())) {
                found.extend(bucket.iter());
            }
            current = registry.base(ty);
        }
        found
    }
}

/// Precedence value for candidate ordering: lower sorts first.
///
/// Instance methods sort before static ones, concrete before generic, and
/// otherwise by the summed parameter-type precedence, so more specific
/// overloads are tried first.
fn precedence(registry: &TypeRegistry, signature: &Signature) -> u32 {
    let mut value = if signature.is_static { 3000 } else { 0 };
    if signature.generic_arity > 0 {
        value += 1;
    }
    for param in &signature.params {
        value += param_precedence(registry, &param.ty);
    }
    value
}

fn param_precedence(registry: &TypeRegistry, ty: &ParamType) -> u32 {
    let ParamType::Concrete(ty) = ty else {
        return 2000;
    };
    if *ty == TypeId::OBJECT {
        return 3000;
    }
    match registry.kind(*ty) {
        TypeKind::Sequence(elem) => {
            if *elem == TypeId::OBJECT {
                2500
            } else {
                100 + param_precedence(registry, &ParamType::Concrete(*elem))
            }
        }
        TypeKind::U64 => 10,
        TypeKind::U32 => 11,
        TypeKind::U16 => 12,
        TypeKind::I64 => 13,
        TypeKind::I32 => 14,
        TypeKind::I16 => 15,
        TypeKind::Char => 16,
        TypeKind::I8 => 17,
        TypeKind::U8 => 18,
        TypeKind::F32 => 20,
        TypeKind::F64 => 21,
        TypeKind::Str => 30,
        TypeKind::Bool => 40,
        TypeKind::Object | TypeKind::Interface | TypeKind::Null => 1,
        TypeKind::Usize | TypeKind::Isize => 2000,
    }
}
