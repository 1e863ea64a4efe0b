use girder_emit::tests::{def, unresolvable_registry, view_registry};
use girder_emit::Generator;
use girder_resolve::ResolveError;
use girder_schema::{Field, RegistryBuilder, StructDef, StructKind, TypeDescriptor};

#[test]
fn generation_is_byte_identical_across_runs() {
    let registry = view_registry();
    let first = Generator::new(&registry).generate().unwrap();
    let second = Generator::new(&registry).generate().unwrap();
    assert_eq!(first, second);

    // Same input rebuilt from scratch generates the same module too.
    let rebuilt = view_registry();
    let third = Generator::new(&rebuilt).generate().unwrap();
    assert_eq!(first, third);
}

#[test]
fn output_follows_declaration_order() {
    let registry = view_registry();
    let module = Generator::new(&registry).generate().unwrap();
    let order: Vec<_> = module.structs.iter().map(|s| s.native_name.as_str()).collect();
    assert_eq!(order, vec!["cef_rect_t", "cef_view_t"]);

    let view = &module.structs[1];
    let slots: Vec<_> = view.slots.iter().map(|b| b.field.as_str()).collect();
    assert_eq!(slots, vec!["get_title", "set_parent", "on_query", "move_to"]);
    assert!(view.wiring.is_some());
    assert!(view.conversion.is_none());
    assert!(module.structs[0].conversion.is_some());
    assert!(module.structs[0].wiring.is_none());
}

// The trampoline's parameter list (minus the owning-object slot and the
// trailing function-pointer slot) matches the declared parameter list in
// order and count, and the callback adapter's list matches it exactly.
#[test]
fn trampoline_and_callback_arity_match_declaration() {
    let registry = view_registry();
    let module = Generator::new(&registry).generate().unwrap();
    let view_def = def(&registry, "cef_view_t");
    let view = &module.structs[1];

    for (field, bindings) in view_def.fields.iter().zip(&view.slots) {
        let declared: Vec<_> = field.var.params.iter().map(|p| p.name.as_str()).collect();
        let call = format!("return callback__({});", declared.join(", "));
        assert!(
            bindings.trampoline.contains(&call),
            "trampoline for {} does not forward {:?}",
            bindings.field,
            declared
        );
        // Every declared parameter appears in the adapter signature, self
        // renamed to a legal managed identifier.
        for name in declared.iter().skip(1) {
            assert!(
                bindings.callback.contains(&format!(", {name}:")),
                "callback for {} is missing parameter {name}",
                bindings.field
            );
        }
        assert!(bindings.callback.contains("(self_: *mut cef_view_t"));
    }
}

// A parameter with no matching rule aborts generation with a diagnostic
// naming the exact field and parameter, and no output is produced at all.
#[test]
fn unresolved_parameter_fails_generation_with_location() {
    let registry = unresolvable_registry();
    let errors = Generator::new(&registry).generate().unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ResolveError::UnhandledConversion { owner, field, param, .. } => {
            assert_eq!(owner, "cef_view_t");
            assert_eq!(field, "set_handler");
            assert_eq!(param, "on_done");
        }
        other => panic!("expected UnhandledConversion, got {other:?}"),
    }
}

#[test]
fn diagnostics_accumulate_across_fields() {
    let nested = |name: &str| {
        TypeDescriptor::function(name, "void", &[("self", "struct _cef_view_t *")])
    };
    let slot = |field: &str, param: &str, pos: usize| {
        Field::new(
            TypeDescriptor {
                name: field.to_string(),
                base_type: "void".to_string(),
                pointer_depth: 0,
                c_native_type: "void".to_string(),
                is_function_pointer: true,
                params: vec![TypeDescriptor::parse("self", "struct _cef_view_t *"), nested(param)],
            },
            pos,
        )
    };
    let mut builder = RegistryBuilder::new();
    builder.add_struct(StructDef {
        native_name: "cef_view_t".to_string(),
        managed_name: String::new(),
        kind: StructKind::ClassEquivalent,
        fields: vec![slot("set_handler", "on_done", 0), slot("set_observer", "on_change", 1)],
    });
    let registry = builder.finish().unwrap();
    let errors = Generator::new(&registry).generate().unwrap_err();
    // One diagnostic per offending parameter, reported in a single run.
    assert_eq!(errors.len(), 2);
}
