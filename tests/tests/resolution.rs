//! Scope resolution: session overrides, System values and defaults.

use proptest::prelude::*;
use strata_tests::prelude::*;

mod override_and_teardown {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("override_and_teardown")
            .step("default", |ctx| ctx.get("query_timeout_ms"), |a| a.value(0i64))
            .step(
                "set_system",
                |ctx| ctx.set("query_timeout_ms", 500i64, Scope::System),
                |a| a.ok(),
            )
            .step("system_visible", |ctx| ctx.get("query_timeout_ms"), |a| a.value(500i64))
            .step(
                "set_session",
                |ctx| ctx.set("query_timeout_ms", 20i64, Scope::Session),
                |a| a.ok(),
            )
            .step("session_wins", |ctx| ctx.get("query_timeout_ms"), |a| a.value(20i64))
            .step(
                "other_session_sees_system",
                |ctx| {
                    let first = ctx.session();
                    ctx.use_session(SessionId::new(7));
                    let value = ctx.get("query_timeout_ms");
                    ctx.use_session(first);
                    value
                },
                |a| a.value(500i64),
            )
            .step("teardown", |ctx| ctx.teardown(), |a| a.value(true))
            .step("back_to_system", |ctx| ctx.get("query_timeout_ms"), |a| a.value(500i64))
            .step("teardown_again", |ctx| ctx.teardown(), |a| a.value(false))
    }

    #[test]
    fn test_override_then_teardown() {
        scenario().run().unwrap();
    }
}

mod reset {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("reset")
            .step(
                "set_system",
                |ctx| ctx.set("allow_bare_ddl", false, Scope::System),
                |a| a.ok(),
            )
            .step(
                "reset_unset_session",
                |ctx| ctx.reset("allow_bare_ddl", Scope::Session),
                |a| a.ok(),
            )
            .step("still_system", |ctx| ctx.get("allow_bare_ddl"), |a| a.value(false))
            .step(
                "reset_system",
                |ctx| ctx.reset("allow_bare_ddl", Scope::System),
                |a| a.ok(),
            )
            .step("default_again", |ctx| ctx.get("allow_bare_ddl"), |a| a.value(true))
    }

    #[test]
    fn test_reset_falls_back() {
        let ctx = scenario().run().unwrap();
        // Resetting in a session with no state does not create one
        assert_eq!(ctx.store().session_count(), 0);
    }
}

mod type_checks {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("type_checks")
            .step(
                "string_for_int",
                |ctx| ctx.set("query_timeout_ms", "fast", Scope::Session),
                |a| a.error("TypeMismatch"),
            )
            .step(
                "int_for_bool",
                |ctx| ctx.set("allow_bare_ddl", 1i64, Scope::System),
                |a| a.error("TypeMismatch"),
            )
            .step(
                "unknown_setting",
                |ctx| ctx.set("no_such_setting", 1i64, Scope::System),
                |a| a.error("UnknownProperty"),
            )
            .step(
                "get_link",
                |ctx| ctx.get("sysobj"),
                |a| a.error("UnknownProperty"),
            )
            .step("unchanged", |ctx| ctx.get("query_timeout_ms"), |a| a.value(0i64))
    }

    #[test]
    fn test_values_type_checked() {
        scenario().run().unwrap();
    }
}

mod declared_on_other_types {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("declared_on_other_types")
            .step(
                "create_system_config",
                |ctx| ctx.create("obj", "cfg::SystemConfig", Scope::System, values! { "name" => "x" }),
                |a| a.ok(),
            )
            .step("name", |ctx| ctx.get("name"), |a| a.value(Value::Null))
            .step("sub1", |ctx| ctx.get("sub1"), |a| a.value(Value::Null))
            .step("sub2", |ctx| ctx.get("sub2"), |a| a.value(Value::Null))
            .step("undeclared", |ctx| ctx.get("sub3"), |a| a.error("UnknownProperty"))
    }

    #[test]
    fn test_any_declared_property_resolves() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_declared_default_outside_root() {
        let source = format!(
            "{FAMILY_SCHEMA}\n[[types]]\nname = \"test::Tuned\"\nextends = \"test::Base\"\nproperties = [{{ name = \"weight\", type = \"float64\", default = 2 }}]\n"
        );
        let api = ConfigApi::bootstrap(
            strata_schema::load_str(&source).unwrap(),
            StoreConfig::default().with_root_type("test::Config"),
        )
        .unwrap();

        assert_eq!(api.get("weight", SessionId::new(1)).unwrap(), Value::Float(2.0));
        assert_eq!(api.get("name", SessionId::new(1)).unwrap(), Value::Null);
    }
}

mod float_widening {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("float_widening")
            .schema(FAMILY_SCHEMA)
            .root_type("test::Config")
            .step("unset_float", |ctx| ctx.get("ratio"), |a| a.value(Value::Null))
            .step("declared_default", |ctx| ctx.get("limit"), |a| a.value(10i64))
            .step("set_int", |ctx| ctx.set("ratio", 2i64, Scope::System), |a| a.ok())
            .step("widened", |ctx| ctx.get("ratio"), |a| a.value(2.0f64))
            .step(
                "set_lossy_int",
                |ctx| ctx.set("ratio", (1i64 << 53) + 1, Scope::System),
                |a| a.error("TypeMismatch"),
            )
            .step("unchanged", |ctx| ctx.get("ratio"), |a| a.value(2.0f64))
    }

    #[test]
    fn test_int_widened_to_float() {
        scenario().run().unwrap();
    }
}

#[test]
fn test_list_through_session_handle() {
    let api = test_api(false).unwrap();
    let session = api.open_session();

    let names = session.list(Scope::Session);

    assert!(names.contains("query_timeout_ms"));
    assert!(names.contains("sessobj"));
    assert!(!names.contains("sysobj"));
    assert!(!names.contains("__internal_sess_testvalue"));
}

proptest! {
    #[test]
    fn prop_session_round_trip(
        system in proptest::option::of(any::<i64>()),
        value in any::<i64>(),
        session in 1u64..64,
    ) {
        let api = test_api(false).unwrap();
        let s = SessionId::new(session);
        if let Some(system) = system {
            api.set("query_timeout_ms", Some(Value::Int(system)), Scope::System, s).unwrap();
        }
        let baseline = api.get("query_timeout_ms", s).unwrap();

        api.set("query_timeout_ms", Some(Value::Int(value)), Scope::Session, s).unwrap();
        prop_assert_eq!(api.get("query_timeout_ms", s).unwrap(), Value::Int(value));

        api.teardown_session(s);
        prop_assert_eq!(api.get("query_timeout_ms", s).unwrap(), baseline.clone());
        prop_assert_eq!(baseline, Value::Int(system.unwrap_or(0)));
    }
}
