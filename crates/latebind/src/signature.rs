//! Candidate signatures: parameters, modifiers, and rendering.
//!
//! A [`Signature`] is the immutable shape of one overload. The engine never
//! mutates a signature after registration; per-call state lives in the
//! binding slots built by the matcher.

use crate::{
    types::{TypeId, TypeRegistry},
    value::Value,
};

/// How a parameter behaves when the call site supplies no value for it.
///
/// `OptionalNoDefault` models an "optional" marker without a declared
/// default: the engine synthesizes one by kind (zero for value kinds, the
/// missing sentinel for untyped parameters, null for references).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ParamMode {
    Required,
    OptionalWithDefault(Value),
    OptionalNoDefault,
}

/// A parameter's declared type: a concrete registered type, or one of the
/// signature's generic type variables (by index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParamType {
    Concrete(TypeId),
    Generic(u8),
}

impl ParamType {
    pub(crate) fn render(&self, registry: &TypeRegistry) -> String {
        match self {
            Self::Concrete(ty) => registry.name(*ty).to_owned(),
            Self::Generic(index) => format!("T{index}"),
        }
    }
}

/// One declared parameter of a candidate signature.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
    pub mode: ParamMode,
    /// Output parameter: never supplied by the caller, written by the call
    /// and read back afterward.
    pub is_out: bool,
    /// Trailing variadic parameter; `ty` is the declared sequence type.
    pub is_variadic: bool,
}

impl Param {
    pub fn required(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::Concrete(ty),
            mode: ParamMode::Required,
            is_out: false,
            is_variadic: false,
        }
    }

    /// An optional parameter with a declared default value.
    pub fn optional(name: impl Into<String>, ty: TypeId, default: Value) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::Concrete(ty),
            mode: ParamMode::OptionalWithDefault(default),
            is_out: false,
            is_variadic: false,
        }
    }

    /// An optional parameter with no declared default; the engine
    /// synthesizes one by kind when the call site omits it.
    pub fn optional_no_default(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::Concrete(ty),
            mode: ParamMode::OptionalNoDefault,
            is_out: false,
            is_variadic: false,
        }
    }

    /// An output parameter of the given referenced type.
    pub fn out(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::Concrete(ty),
            mode: ParamMode::Required,
            is_out: true,
            is_variadic: false,
        }
    }

    /// A trailing variadic parameter; `sequence` must be a sequence type.
    pub fn variadic(name: impl Into<String>, sequence: TypeId) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::Concrete(sequence),
            mode: ParamMode::Required,
            is_out: false,
            is_variadic: true,
        }
    }

    /// A parameter typed by the signature's generic type variable `index`.
    pub fn generic(name: impl Into<String>, index: u8) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::Generic(index),
            mode: ParamMode::Required,
            is_out: false,
            is_variadic: false,
        }
    }

    /// Marks this parameter optional with no declared default, keeping its
    /// type (used for generic parameters carrying an optional marker).
    pub fn with_optional_marker(mut self) -> Self {
        self.mode = ParamMode::OptionalNoDefault;
        self
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.mode, ParamMode::OptionalWithDefault(_) | ParamMode::OptionalNoDefault)
    }
}

/// One overload's declared parameter list and modifiers.
///
/// Signatures are plain data: the callable itself lives on the
/// [`Method`](crate::registry::Method) that carries the signature.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Param>,
    pub is_static: bool,
    /// Number of generic type variables; zero for ordinary methods.
    pub generic_arity: u8,
    /// Declared return type; `None` is void.
    pub returns: Option<TypeId>,
}

impl Signature {
    pub fn new(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            params,
            is_static: false,
            generic_arity: 0,
            returns: None,
        }
    }

    pub fn returning(mut self, ty: TypeId) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn generic(mut self, arity: u8) -> Self {
        self.generic_arity = arity;
        self
    }

    /// Whether the trailing parameter is variadic.
    pub fn expands(&self) -> bool {
        self.params.last().is_some_and(|p| p.is_variadic)
    }

    /// The parameters that get binding slots: everything except a trailing
    /// variadic parameter.
    pub(crate) fn fixed_params(&self) -> &[Param] {
        if self.expands() {
            &self.params[..self.params.len() - 1]
        } else {
            &self.params
        }
    }

    /// Renders the signature for diagnostics, e.g. `scale(i32, out f64, i32[]...)`.
    pub fn render(&self, registry: &TypeRegistry) -> String {
        let mut out = String::with_capacity(self.name.len() + 16);
        out.push_str(&self.name);
        out.push('(');
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if param.is_out {
                out.push_str("out ");
            }
            out.push_str(&param.ty.render(registry));
            if param.is_variadic {
                out.push_str("...");
            }
        }
        out.push(')');
        out
    }
}
