//! The owned value type that crosses the engine boundary.
//!
//! `Value` is what the marshaling layer hands to the binder and what the
//! binder hands back: it owns all its data, clones freely, and needs no
//! registry for anything except its runtime-type query. One variant exists
//! per primitive kind so the runtime type of a value is always recoverable
//! without host cooperation.

use std::fmt;

use indexmap::IndexMap;

use crate::types::{TypeId, TypeKind, TypeRegistry};

/// A dynamically-typed value at a call site.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// The null reference.
    Null,
    /// The "no value supplied" sentinel, passed for untyped optional
    /// parameters that have no declared default.
    Missing,
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Usize(usize),
    Isize(isize),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    /// A homogeneous sequence. `elem` is the element type; the sequence's
    /// own type is the interned sequence type for that element.
    Seq {
        elem: TypeId,
        items: Vec<Value>,
    },
    /// An instance of a host-registered class, with named attributes.
    Instance {
        ty: TypeId,
        attrs: IndexMap<String, Value>,
    },
}

impl Value {
    /// Creates an instance of a registered class with no attributes.
    pub fn instance(ty: TypeId) -> Self {
        Self::Instance {
            ty,
            attrs: IndexMap::new(),
        }
    }

    /// The value's runtime type.
    ///
    /// Sequences resolve to the interned sequence type for their element
    /// type, falling back to `object` if the host never declared one.
    /// `Missing` is object-typed: it only ever flows into untyped slots.
    pub fn type_of(&self, registry: &TypeRegistry) -> TypeId {
        match self {
            Self::Null => TypeId::NULL,
            Self::Missing => TypeId::OBJECT,
            Self::Bool(_) => TypeId::BOOL,
            Self::U8(_) => TypeId::U8,
            Self::I8(_) => TypeId::I8,
            Self::U16(_) => TypeId::U16,
            Self::I16(_) => TypeId::I16,
            Self::U32(_) => TypeId::U32,
            Self::I32(_) => TypeId::I32,
            Self::U64(_) => TypeId::U64,
            Self::I64(_) => TypeId::I64,
            Self::Usize(_) => TypeId::USIZE,
            Self::Isize(_) => TypeId::ISIZE,
            Self::F32(_) => TypeId::F32,
            Self::F64(_) => TypeId::F64,
            Self::Char(_) => TypeId::CHAR,
            Self::Str(_) => TypeId::STR,
            Self::Seq { elem, .. } => registry.sequence_type(*elem).unwrap_or(TypeId::OBJECT),
            Self::Instance { ty, .. } => *ty,
        }
    }

    /// The zero value for a value kind, used for output-parameter storage
    /// and synthesized defaults. `None` for reference and sequence kinds.
    pub fn zero_of(kind: &TypeKind) -> Option<Self> {
        match kind {
            TypeKind::Bool => Some(Self::Bool(false)),
            TypeKind::U8 => Some(Self::U8(0)),
            TypeKind::I8 => Some(Self::I8(0)),
            TypeKind::U16 => Some(Self::U16(0)),
            TypeKind::I16 => Some(Self::I16(0)),
            TypeKind::U32 => Some(Self::U32(0)),
            TypeKind::I32 => Some(Self::I32(0)),
            TypeKind::U64 => Some(Self::U64(0)),
            TypeKind::I64 => Some(Self::I64(0)),
            TypeKind::Usize => Some(Self::Usize(0)),
            TypeKind::Isize => Some(Self::Isize(0)),
            TypeKind::F32 => Some(Self::F32(0.0)),
            TypeKind::F64 => Some(Self::F64(0.0)),
            TypeKind::Char => Some(Self::Char('\0')),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Missing => f.write_str("<missing>"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Usize(v) => write!(f, "{v}"),
            Self::Isize(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Seq { items, .. } => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Instance { attrs, .. } => {
                f.write_str("{")?;
                for (i, (name, value)) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
