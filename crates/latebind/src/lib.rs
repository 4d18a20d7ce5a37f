#![doc = include_str!("../../../README.md")]

mod args;
mod binder;
mod convert;
mod distance;
mod error;
mod invoke;
mod matcher;
mod registry;
mod select;
mod signature;
mod tracer;
mod types;
mod value;

pub use crate::{
    args::CallArgs,
    binder::Binder,
    distance::DistanceTable,
    error::{BindError, CallFault},
    registry::{CandidateSource, Handler, MemberTable, Method},
    signature::{Param, ParamMode, ParamType, Signature},
    tracer::{BindTracer, NoopTracer, RecordingTracer, StderrTracer, TraceEvent},
    types::{ConversionOp, TypeDef, TypeId, TypeKind, TypeRegistry},
    value::Value,
};
