//! Host type model: type identities, kinds, assignability, and registered
//! conversion operators.
//!
//! The engine never reflects over Rust types. Instead the host describes its
//! API surface once, at startup, by registering types here and methods in a
//! [`MemberTable`](crate::registry::MemberTable). Primitive kinds are
//! pre-registered and addressable through the associated constants on
//! [`TypeId`]; classes, interfaces, and sequence types are interned on
//! demand.

use std::fmt;

use ahash::AHashMap;

use crate::{error::CallFault, value::Value};

/// Identity of a registered type.
///
/// Stable for the lifetime of the [`TypeRegistry`] that issued it. The
/// primitive kinds always occupy the same identities, exposed as associated
/// constants, so hosts and tests can name them without a registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    /// The root type every value is assignable to.
    pub const OBJECT: Self = Self(0);
    /// The type of [`Value::Null`].
    pub const NULL: Self = Self(1);
    pub const BOOL: Self = Self(2);
    pub const U8: Self = Self(3);
    pub const I8: Self = Self(4);
    pub const U16: Self = Self(5);
    pub const I16: Self = Self(6);
    pub const U32: Self = Self(7);
    pub const I32: Self = Self(8);
    pub const U64: Self = Self(9);
    pub const I64: Self = Self(10);
    pub const USIZE: Self = Self(11);
    pub const ISIZE: Self = Self(12);
    pub const F32: Self = Self(13);
    pub const F64: Self = Self(14);
    pub const CHAR: Self = Self(15);
    pub const STR: Self = Self(16);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Classification of a registered type.
///
/// Primitive kinds carry conversion semantics (ranking, widening); `Object`,
/// `Interface`, and `Sequence` participate in assignability instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr, serde::Serialize, serde::Deserialize)]
pub enum TypeKind {
    /// A host class (or the root `object` type).
    Object,
    /// An interface; classes list the interfaces they implement.
    Interface,
    /// The type of the null value.
    Null,
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    Usize,
    Isize,
    F32,
    F64,
    Char,
    Str,
    /// A homogeneous sequence with the given element type.
    Sequence(TypeId),
}

impl TypeKind {
    /// Integer and floating-point kinds (the kinds that take part in the
    /// widening/narrowing distinction).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::U8
                | Self::I8
                | Self::U16
                | Self::I16
                | Self::U32
                | Self::I32
                | Self::U64
                | Self::I64
                | Self::Usize
                | Self::Isize
                | Self::F32
                | Self::F64
        )
    }

    /// Kinds with a meaningful zero value (used when synthesizing defaults
    /// and output-parameter storage).
    pub fn is_value_kind(&self) -> bool {
        self.is_numeric() || matches!(self, Self::Bool | Self::Char)
    }

    /// Kinds for which null is a valid value.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Str | Self::Sequence(_) | Self::Null)
    }
}

/// A registered type: name, kind, and its place in the assignability graph.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TypeDef {
    name: String,
    kind: TypeKind,
    base: Option<TypeId>,
    interfaces: Vec<TypeId>,
}

/// A user-defined conversion operator: a single-argument static conversion
/// from one type to another, registered on a declaring type (usually the
/// source or the target, mirroring how host languages declare casts).
pub struct ConversionOp {
    from: TypeId,
    to: TypeId,
    handler: Box<dyn Fn(&Value) -> Result<Value, CallFault> + Send + Sync>,
}

impl ConversionOp {
    pub fn from_type(&self) -> TypeId {
        self.from
    }

    pub fn to_type(&self) -> TypeId {
        self.to
    }

    pub(crate) fn call(&self, value: &Value) -> Result<Value, CallFault> {
        (self.handler)(value)
    }
}

impl fmt::Debug for ConversionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOp")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

/// Registry of every type the engine can reason about.
///
/// Append-only: types are registered before or between calls, never while a
/// resolution against them is in flight. The registry answers the three
/// queries the binder needs — runtime kind, assignability, and conversion
/// operator lookup — and interns sequence types so variadic parameters and
/// packed argument sequences share one identity per element type.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDef>,
    sequences: AHashMap<TypeId, TypeId>,
    conversions: AHashMap<TypeId, Vec<ConversionOp>>,
}

impl TypeRegistry {
    /// Creates a registry with the primitive kinds pre-registered at their
    /// [`TypeId`] constants.
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::with_capacity(24),
            sequences: AHashMap::new(),
            conversions: AHashMap::new(),
        };
        registry.add("object", TypeKind::Object, None);
        registry.add("null", TypeKind::Null, None);
        registry.add("bool", TypeKind::Bool, None);
        registry.add("u8", TypeKind::U8, None);
        registry.add("i8", TypeKind::I8, None);
        registry.add("u16", TypeKind::U16, None);
        registry.add("i16", TypeKind::I16, None);
        registry.add("u32", TypeKind::U32, None);
        registry.add("i32", TypeKind::I32, None);
        registry.add("u64", TypeKind::U64, None);
        registry.add("i64", TypeKind::I64, None);
        registry.add("usize", TypeKind::Usize, None);
        registry.add("isize", TypeKind::Isize, None);
        registry.add("f32", TypeKind::F32, None);
        registry.add("f64", TypeKind::F64, None);
        registry.add("char", TypeKind::Char, None);
        registry.add("str", TypeKind::Str, None);
        registry
    }

    fn add(&mut self, name: &str, kind: TypeKind, base: Option<TypeId>) -> TypeId {
        let id = TypeId(u32::try_from(self.types.len()).unwrap_or(u32::MAX));
        self.types.push(TypeDef {
            name: name.to_owned(),
            kind,
            base,
            interfaces: Vec::new(),
        });
        id
    }

    /// Registers a host class. `base` defaults to `object` when omitted.
    pub fn register_class(&mut self, name: &str, base: Option<TypeId>, interfaces: &[TypeId]) -> TypeId {
        let id = self.add(name, TypeKind::Object, base.or(Some(TypeId::OBJECT)));
        self.types[id.index()].interfaces = interfaces.to_vec();
        id
    }

    /// Registers an interface, optionally extending other interfaces.
    pub fn register_interface(&mut self, name: &str, extends: &[TypeId]) -> TypeId {
        let id = self.add(name, TypeKind::Interface, None);
        self.types[id.index()].interfaces = extends.to_vec();
        id
    }

    /// Interns the sequence type with the given element type.
    pub fn sequence_of(&mut self, elem: TypeId) -> TypeId {
        if let Some(&seq) = self.sequences.get(&elem) {
            return seq;
        }
        let name = format!("{}[]", self.name(elem));
        let id = self.add(&name, TypeKind::Sequence(elem), None);
        self.sequences.insert(elem, id);
        id
    }

    /// Returns the interned sequence type for `elem`, if any exists yet.
    pub fn sequence_type(&self, elem: TypeId) -> Option<TypeId> {
        self.sequences.get(&elem).copied()
    }

    /// Returns the element type of a sequence type.
    pub fn element_of(&self, ty: TypeId) -> Option<TypeId> {
        match self.kind(ty) {
            TypeKind::Sequence(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn name(&self, ty: TypeId) -> &str {
        &self.types[ty.index()].name
    }

    pub fn kind(&self, ty: TypeId) -> &TypeKind {
        &self.types[ty.index()].kind
    }

    pub fn base(&self, ty: TypeId) -> Option<TypeId> {
        self.types[ty.index()].base
    }

    /// Whether a value of type `source` can be used where `target` is
    /// expected without conversion: identity, anything-to-object,
    /// null-to-reference, base-chain subtyping, or interface implementation.
    pub fn is_assignable(&self, target: TypeId, source: TypeId) -> bool {
        if target == source || target == TypeId::OBJECT {
            return true;
        }
        if *self.kind(source) == TypeKind::Null {
            return self.kind(target).is_reference();
        }
        let mut current = Some(source);
        while let Some(ty) = current {
            if ty == target {
                return true;
            }
            if self.types[ty.index()]
                .interfaces
                .iter()
                .any(|&iface| iface == target || self.interface_extends(iface, target))
            {
                return true;
            }
            current = self.base(ty);
        }
        false
    }

    fn interface_extends(&self, iface: TypeId, target: TypeId) -> bool {
        self.types[iface.index()]
            .interfaces
            .iter()
            .any(|&parent| parent == target || self.interface_extends(parent, target))
    }

    /// Registers a conversion operator on `declaring` (the type that carries
    /// the operator in the host API, normally `from` or `to`).
    pub fn register_conversion(
        &mut self,
        declaring: TypeId,
        from: TypeId,
        to: TypeId,
        handler: impl Fn(&Value) -> Result<Value, CallFault> + Send + Sync + 'static,
    ) {
        self.conversions.entry(declaring).or_default().push(ConversionOp {
            from,
            to,
            handler: Box::new(handler),
        });
    }

    /// Finds a conversion operator for `from -> to`, searching operators
    /// declared on the source type before those declared on the target type.
    pub(crate) fn find_conversion(&self, from: TypeId, to: TypeId) -> Option<&ConversionOp> {
        [from, to].into_iter().find_map(|declaring| {
            self.conversions
                .get(&declaring)?
                .iter()
                .find(|op| op.from == from && op.to == to)
        })
    }
}
