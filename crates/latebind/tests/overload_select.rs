//! Tests for overload selection: structural admissibility, distance
//! ranking, and the failure modes of the selector.
//!
//! Each test builds a small member table on a fresh registry; handlers
//! return a tag string so assertions can see which overload ran, or echo
//! their argument array so assertions can see what was bound.

use latebind::{BindError, Binder, CallArgs, CallFault, MemberTable, Method, Param, Signature, TypeId, TypeRegistry, Value};
use pretty_assertions::assert_eq;

fn tag(name: &'static str) -> impl Fn(&Value, &mut [Value]) -> Result<Value, CallFault> {
    move |_, _| Ok(Value::Str(name.to_owned()))
}

fn echo(_: &Value, args: &mut [Value]) -> Result<Value, CallFault> {
    Ok(Value::Seq {
        elem: TypeId::OBJECT,
        items: args.to_vec(),
    })
}

fn target(registry: &mut TypeRegistry) -> (TypeId, Value) {
    let ty = registry.register_class("Target", None, &[]);
    (ty, Value::instance(ty))
}

// =============================================================================
// 1. Arity-driven selection
// =============================================================================

/// An empty call site picks the zero-parameter overload over one that
/// could also be called bare.
#[test]
fn empty_call_selects_nullary_overload() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(Signature::new("foo", vec![]).returning(TypeId::STR), tag("nullary")),
    );
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I32)]).returning(TypeId::STR),
            tag("unary"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder.call(&instance, "foo", &CallArgs::new()).unwrap();
    assert_eq!(result, Value::Str("nullary".to_owned()));
}

/// Arity equal to the required count is admissible even when no optional
/// parameter is supplied; the optionals fall back to defaults.
#[test]
fn required_arity_matches_with_defaults_unsupplied() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new(
                "foo",
                vec![
                    Param::required("a", TypeId::I32),
                    Param::optional("b", TypeId::BOOL, Value::Bool(false)),
                ],
            )
            .returning(TypeId::OBJECT),
            echo,
        ),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I32(5)]))
        .unwrap();
    assert_eq!(
        result,
        Value::Seq {
            elem: TypeId::OBJECT,
            items: vec![Value::I32(5), Value::Bool(false)],
        }
    );
}

/// A single admissible candidate wins unconditionally, however poor its
/// distance score.
#[test]
fn sole_candidate_wins_regardless_of_distance() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::U8)]).returning(TypeId::OBJECT),
            echo,
        ),
    );

    let binder = Binder::new(&registry, &members);
    // i64 -> u8 is a distant narrowing conversion, but there is no rival
    let result = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I64(200)]))
        .unwrap();
    assert_eq!(
        result,
        Value::Seq {
            elem: TypeId::OBJECT,
            items: vec![Value::U8(200)],
        }
    );
}

// =============================================================================
// 2. Distance-driven selection
// =============================================================================

/// Exact primitive matches beat widening conversions.
#[test]
fn exact_int_overload_beats_float_overload() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new(
                "foo",
                vec![Param::required("a", TypeId::I32), Param::required("b", TypeId::I32)],
            )
            .returning(TypeId::STR),
            tag("int,int"),
        ),
    );
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new(
                "foo",
                vec![Param::required("a", TypeId::F32), Param::required("b", TypeId::F32)],
            )
            .returning(TypeId::STR),
            tag("float,float"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I32(0), Value::I32(1)]))
        .unwrap();
    assert_eq!(result, Value::Str("int,int".to_owned()));
}

/// A call site whose arguments all widen into one overload beats an
/// overload that would need a narrowing conversion, even when the latter
/// has one exact argument.
#[test]
fn widening_overload_beats_narrowing_overload() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new(
                "foo",
                vec![Param::required("a", TypeId::I16), Param::required("b", TypeId::I16)],
            )
            .returning(TypeId::STR),
            tag("short,short"),
        ),
    );
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new(
                "foo",
                vec![Param::required("a", TypeId::I64), Param::required("b", TypeId::I64)],
            )
            .returning(TypeId::STR),
            tag("long,long"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I16(0), Value::I32(1)]))
        .unwrap();
    assert_eq!(result, Value::Str("long,long".to_owned()));
}

/// Between two otherwise-identical candidates, the one whose parameter
/// type matches the argument's runtime type exactly is selected.
#[test]
fn exact_runtime_type_wins_between_near_twins() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I16)]).returning(TypeId::STR),
            tag("short"),
        ),
    );
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I64)]).returning(TypeId::STR),
            tag("long"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I16(3)]))
        .unwrap();
    assert_eq!(result, Value::Str("short".to_owned()));
}

/// Instance-bound candidates are preferred when the choice is otherwise
/// ambiguous only by binding kind.
#[test]
fn instance_overload_beats_static_overload() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I32)]).returning(TypeId::STR),
            tag("instance"),
        ),
    );
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I32)])
                .static_method()
                .returning(TypeId::STR),
            tag("static"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I32(1)]))
        .unwrap();
    assert_eq!(result, Value::Str("instance".to_owned()));
}

/// Concrete overloads are preferred over open generic ones.
#[test]
fn concrete_overload_beats_generic_overload() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I32)]).returning(TypeId::STR),
            tag("concrete"),
        ),
    );
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::generic("a", 0)]).generic(1).returning(TypeId::STR),
            tag("generic"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I32(1)]))
        .unwrap();
    assert_eq!(result, Value::Str("concrete".to_owned()));
}

/// A generic overload still binds when nothing concrete is admissible, and
/// the handler sees the caller's runtime type unchanged.
#[test]
fn generic_overload_accepts_any_runtime_type() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::generic("a", 0)]).generic(1).returning(TypeId::OBJECT),
            echo,
        ),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::Str("anything".to_owned())]))
        .unwrap();
    assert_eq!(
        result,
        Value::Seq {
            elem: TypeId::OBJECT,
            items: vec![Value::Str("anything".to_owned())],
        }
    );
}

// =============================================================================
// 3. Keyword binding
// =============================================================================

/// Named values bind to their parameter; remaining parameters draw from
/// the positional sequence.
#[test]
fn keywords_bind_by_name_and_take_priority() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new(
                "foo",
                vec![Param::required("a", TypeId::I32), Param::required("b", TypeId::I32)],
            )
            .returning(TypeId::OBJECT),
            echo,
        ),
    );

    let binder = Binder::new(&registry, &members);
    let args = CallArgs::positional(vec![Value::I32(9)]).named("a", Value::I32(7));
    let result = binder.call(&instance, "foo", &args).unwrap();
    // 'a' comes from the keyword, the positional value flows to 'b'
    assert_eq!(
        result,
        Value::Seq {
            elem: TypeId::OBJECT,
            items: vec![Value::I32(7), Value::I32(9)],
        }
    );
}

/// A keyword that matches no parameter invalidates the candidate.
#[test]
fn unknown_keyword_yields_no_match() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I32)]).returning(TypeId::STR),
            tag("unary"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let args = CallArgs::new().named("nope", Value::I32(1));
    let error = binder.call(&instance, "foo", &args).unwrap_err();
    assert!(matches!(error, BindError::NoMatch { .. }));
}

// =============================================================================
// 4. Failure modes
// =============================================================================

/// No admissible candidate: the error names the member and lists the
/// considered signatures.
#[test]
fn no_match_reports_member_and_candidates() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I32)]).returning(TypeId::STR),
            tag("unary"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let error = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I32(1), Value::I32(2)]))
        .unwrap_err();
    let BindError::NoMatch { member, given, candidates } = &error else {
        panic!("expected NoMatch, got {error:?}");
    };
    assert_eq!(member, "foo");
    assert_eq!(*given, 2);
    assert_eq!(candidates, &vec!["foo(i32)".to_owned()]);
    let rendered = error.to_string();
    assert!(rendered.contains("no overload of 'foo'"), "got: {rendered}");
    assert!(rendered.contains("foo(i32)"), "got: {rendered}");
}

/// Two candidates tying at minimal distance is a defined failure, not an
/// arbitrary pick.
#[test]
fn tied_candidates_are_ambiguous() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("a", TypeId::I32)]).returning(TypeId::STR),
            tag("first"),
        ),
    );
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new("foo", vec![Param::required("b", TypeId::I32)]).returning(TypeId::STR),
            tag("second"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let error = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I32(1)]))
        .unwrap_err();
    let BindError::Ambiguous { member, candidates } = &error else {
        panic!("expected Ambiguous, got {error:?}");
    };
    assert_eq!(member, "foo");
    assert_eq!(candidates.len(), 2);
    assert!(error.to_string().contains("ambiguous"));
}

/// Candidates that tie only because both would fill optionals with
/// defaults stay a hard ambiguity error.
#[test]
fn defaults_only_tie_is_still_ambiguous() {
    let mut registry = TypeRegistry::new();
    let (ty, instance) = target(&mut registry);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new(
                "foo",
                vec![
                    Param::required("a", TypeId::I32),
                    Param::optional("b", TypeId::I32, Value::I32(0)),
                ],
            )
            .returning(TypeId::STR),
            tag("with-int-default"),
        ),
    );
    members.register(
        &registry,
        ty,
        Method::new(
            Signature::new(
                "foo",
                vec![
                    Param::required("a", TypeId::I32),
                    Param::optional("c", TypeId::F64, Value::F64(0.0)),
                ],
            )
            .returning(TypeId::STR),
            tag("with-float-default"),
        ),
    );

    let binder = Binder::new(&registry, &members);
    let error = binder
        .call(&instance, "foo", &CallArgs::positional(vec![Value::I32(1)]))
        .unwrap_err();
    assert!(matches!(error, BindError::Ambiguous { .. }));
}

/// Members are discovered through the base chain, so a derived instance
/// can call an overload registered on its base type.
#[test]
fn inherited_members_resolve_on_derived_instances() {
    let mut registry = TypeRegistry::new();
    let base = registry.register_class("Base", None, &[]);
    let derived = registry.register_class("Derived", Some(base), &[]);
    let mut members = MemberTable::new();
    members.register(
        &registry,
        base,
        Method::new(Signature::new("foo", vec![]).returning(TypeId::STR), tag("base")),
    );

    let binder = Binder::new(&registry, &members);
    let result = binder.call(&Value::instance(derived), "foo", &CallArgs::new()).unwrap();
    assert_eq!(result, Value::Str("base".to_owned()));
}
