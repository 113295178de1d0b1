//! Instance removal and link cleanup.

use strata_tests::prelude::*;

mod idempotent_removal {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("idempotent_removal")
            .step(
                "create_target",
                |ctx| {
                    ctx.create(
                        "target",
                        "cfg::Subclass1",
                        Scope::System,
                        values! { "name" => "t", "sub1" => "x" },
                    )
                },
                |a| a.ok(),
            )
            .step(
                "create_owner",
                |ctx| {
                    ctx.create(
                        "owner",
                        "cfg::TestInstanceConfig",
                        Scope::System,
                        values! { "name" => "o" },
                    )
                },
                |a| a.ok(),
            )
            .step(
                "link_obj",
                |ctx| ctx.link("owner", "obj", Scope::System, "target"),
                |a| a.ok(),
            )
            .step(
                "link_owner_to_root",
                |ctx| ctx.link("root", "sysobj", Scope::System, "owner"),
                |a| a.ok(),
            )
            .step("remove_target", |ctx| ctx.remove("target"), |a| a.value(true))
            .step("remove_target_again", |ctx| ctx.remove("target"), |a| a.value(false))
            .step("remove_unknown", |ctx| ctx.remove("never_created"), |a| a.value(false))
    }

    #[test]
    fn test_remove_twice_leaves_no_dangling_links() {
        let ctx = scenario().run().unwrap();

        assert!(ctx.linked("owner", "obj").is_empty());
        assert_eq!(ctx.linked("root", "sysobj"), vec![ctx.id("owner")]);
        assert!(ctx.store().instance(ctx.id("target")).is_none());
    }
}

mod remove_link_owner {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("remove_link_owner")
            .step(
                "create",
                |ctx| ctx.create("cfg", "cfg::SystemConfig", Scope::System, values! { "name" => "c" }),
                |a| a.ok(),
            )
            .step(
                "link",
                |ctx| ctx.link("root", "sysobj", Scope::System, "cfg"),
                |a| a.ok(),
            )
            .step("remove", |ctx| ctx.remove("cfg"), |a| a.value(true))
            .step(
                "relink_removed",
                |ctx| ctx.link("root", "sysobj", Scope::System, "cfg"),
                |a| a.error("UnknownInstance"),
            )
    }

    #[test]
    fn test_removed_target_leaves_root_links() {
        let ctx = scenario().run().unwrap();
        assert!(ctx.linked("root", "sysobj").is_empty());
    }
}

mod session_objects {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("session_objects")
            .step(
                "create",
                |ctx| {
                    ctx.create(
                        "sess",
                        "cfg::TestSessionConfig",
                        Scope::Session,
                        values! { "name" => "s" },
                    )
                },
                |a| a.ok(),
            )
            .step(
                "link",
                |ctx| ctx.link("root", "sessobj", Scope::Session, "sess"),
                |a| a.ok(),
            )
            .step("remove", |ctx| ctx.remove("sess"), |a| a.value(true))
            .step("remove_again", |ctx| ctx.remove("sess"), |a| a.value(false))
            .step(
                "recreate_same_name",
                |ctx| {
                    ctx.create(
                        "again",
                        "cfg::TestSessionConfig",
                        Scope::Session,
                        values! { "name" => "s" },
                    )
                },
                |a| a.ok(),
            )
    }

    #[test]
    fn test_session_object_removal() {
        let ctx = scenario().run().unwrap();
        assert!(ctx.linked("root", "sessobj").is_empty());
    }
}

#[test]
fn test_teardown_removes_session_objects() {
    // GIVEN a session owning a linked object
    let api = test_api(false).unwrap();
    let session = api.open_session();
    let obj = session
        .create("cfg::TestSessionConfig", Scope::Session, values! { "name" => "a" })
        .unwrap();
    session.link_root("sessobj", Scope::Session, obj).unwrap();
    let id = session.id();

    // WHEN the session closes
    assert!(session.close());

    // THEN its objects are gone and removal is a no-op
    assert!(api.store().instance(obj).is_none());
    assert_eq!(api.store().remove_instance(obj).unwrap(), false);
    assert!(api.store().linked(api.store().root(), "sessobj", id).is_empty());
}
