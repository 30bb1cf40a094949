use module_tree::*;
use module_tree::action::Action;
use module_tree::error::ModuleError;
use module_tree::module::{Module, ModuleSpec};
use module_tree::reducer::{combine_reducers, reducer, Reducer, ReducerMap};
use module_tree::routes::route_fn;
use module_tree::store::Store;
use module_tree::tree::{derive_reducers, derive_routes, ModuleDescriptor};
use module_tree::ui::{create_element, Node, Props};
use serde_json::{json, Value};
use std::sync::Arc;

fn constant(v: Value) -> Reducer {
    reducer(move |_, _| v.clone())
}

fn init(reducer: &Reducer) -> Value {
    reducer(&Value::Null, &Action::init())
}

/// Test a module cannot exist without a name
#[test]
fn test_name_requirement() {
    let err = Module::<Store>::new(ModuleSpec::new("")).unwrap_err();
    assert_eq!(err, ModuleError::MissingName);

    let module = Module::<Store>::new(ModuleSpec::new("Application")).unwrap();
    assert_eq!(module.name(), "Application");
}

/// Test action creators are only accepted for declared actions
#[test]
fn test_action_creator_guard() {
    let mut module = Module::<Store>::new(ModuleSpec::new("Blog").with_action("ADD_POST")).unwrap();
    let creator = action::action_creator(|p| Action::with_payload("ADD_POST", p));

    assert!(matches!(
        module.add_action_creator("DELETE_POST", creator.clone()),
        Err(ModuleError::UnknownAction(_))
    ));
    module.add_action_creator("ADD_POST", creator.clone()).unwrap();
    assert!(Arc::ptr_eq(&module.action_creators()["ADD_POST"], &creator));
}

/// Test a childless module aggregates to exactly its local reducers
#[test]
fn test_reducer_aggregation_no_children() {
    let module = Module::<Store>::new(
        ModuleSpec::new("Main")
            .with_reducer("a", constant(json!(1)))
            .with_reducer("b", constant(json!(2))),
    )
    .unwrap();

    let mut expected = ReducerMap::new();
    expected.insert("a".into(), constant(json!(1)));
    expected.insert("b".into(), constant(json!(2)));

    let aggregated = module.reducers().unwrap().unwrap();
    assert_eq!(init(&aggregated), init(&combine_reducers(expected)));
}

/// Test children contribute under their name only when they have state
#[test]
fn test_reducer_aggregation_with_children() {
    let module = Module::<Store>::new(
        ModuleSpec::new("Main")
            .with_submodule(ModuleSpec::new("One").with_reducer("First", constant(json!(1))))
            .with_submodule(ModuleSpec::new("Two")),
    )
    .unwrap();
    let state = init(&module.reducers().unwrap().unwrap());
    assert_eq!(state["One"]["First"], json!(1));
    assert!(state.get("Two").is_none());

    let mut descriptor = ModuleDescriptor::<Store>::new("Main")
        .with_module(ModuleDescriptor::new("One").with_reducer("First", constant(json!(1))))
        .with_module(ModuleDescriptor::new("Two"));
    let state = init(&derive_reducers(&mut descriptor).unwrap().unwrap());
    assert_eq!(state, json!({"One": {"First": 1}}));
}

/// Test a tree with no reducers yields no aggregate at all
#[test]
fn test_empty_reducers_sentinel() {
    let spec = ModuleSpec::new("Main").with_submodule(ModuleSpec::new("Leaf"));
    let module = Module::<Store>::new(spec).unwrap();
    assert!(module.reducers().unwrap().is_none());

    let mut descriptor = ModuleDescriptor::<Store>::new("Main");
    assert!(derive_reducers(&mut descriptor).unwrap().is_none());

    let store = Store::new(None);
    assert_eq!(store.state(), Value::Null);
}

/// Test the route tree nests each child in an index-keyed container
#[test]
fn test_route_nesting_shape() {
    let blog_routes = || route_fn::<Store, _>(|_| Node::text("blogThing"));
    let blog_spec = || ModuleSpec::new("Blog").with_routes(blog_routes());
    let wrap = || {
        route_fn(|args: routes::RouteArgs<'_, Store>| {
            create_element("div", Props::new(), args.into_children())
        })
    };

    let module = Module::new(
        ModuleSpec::new("Main")
            .with_store(Arc::new(Store::default()))
            .with_submodule(blog_spec())
            .with_routes(wrap()),
    )
    .unwrap();

    let descriptor = ModuleDescriptor::new("Main")
        .with_module(ModuleDescriptor::new("Blog").with_routes(blog_routes()))
        .with_routes(wrap());

    let from_module = module.routes().unwrap();
    let from_descriptor = derive_routes(&descriptor, &Arc::new(Store::default())).unwrap();

    for root in [&from_module, &from_descriptor] {
        assert_eq!(root.tag(), Some("div"));
        assert_eq!(root.children().len(), 1);
        let child = &root.children()[0];
        assert_eq!(child.tag(), Some("div"));
        assert_eq!(child.key(), Some("0"));
        assert_eq!(child.children(), &[Node::text("blogThing")]);
    }
    assert_eq!(from_module, from_descriptor);
}

/// Test setting the root store reaches every pre-attached descendant
#[test]
fn test_store_propagation() {
    let mut module = Module::<Store>::new(
        ModuleSpec::new("Root")
            .with_submodule(
                ModuleSpec::new("A")
                    .with_submodule(ModuleSpec::new("A1"))
                    .with_submodule(ModuleSpec::new("A2")),
            )
            .with_submodule(ModuleSpec::new("B").with_submodule(ModuleSpec::new("B1"))),
    )
    .unwrap();

    let store = Arc::new(Store::default());
    module.set_store(store.clone());

    for path in ["", "A", "A/A1", "A/A2", "B", "B/B1"] {
        let node = module.find(path).unwrap();
        assert!(Arc::ptr_eq(node.store().unwrap(), &store), "store missing at {path:?}");
    }
}

/// Test reading the aggregates twice gives the same results
#[test]
fn test_reads_are_idempotent() {
    let manifest = config::Manifest::parse(
        r#"
name = "App"
[reducers.visits]
kind = "counter"
on = "VISIT"
[[modules]]
name = "Blog"
routes = { tag = "section" }
[modules.reducers.posts]
kind = "append"
on = "ADD_POST"
"#,
    )
    .unwrap();

    let module: Module = Module::new(manifest.to_spec()).unwrap();
    let module = module.with_store(Arc::new(Store::default()));
    assert_eq!(module.routes().unwrap(), module.routes().unwrap());
    assert_eq!(
        init(&module.reducers().unwrap().unwrap()),
        init(&module.reducers().unwrap().unwrap())
    );

    let store = Arc::new(Store::default());
    let mut descriptor = manifest.to_descriptor::<Store>();
    assert_eq!(
        derive_routes(&descriptor, &store).unwrap(),
        derive_routes(&descriptor, &store).unwrap()
    );
    let first = init(&derive_reducers(&mut descriptor).unwrap().unwrap());
    let second = init(&derive_reducers(&mut descriptor).unwrap().unwrap());
    assert_eq!(first, second);
}

/// Test manifest → module tree → store → dispatch → routes
#[test]
fn test_application_flow() {
    let manifest = config::Manifest::parse(
        r#"
name = "Application"
actions = ["VISIT"]
routes = { tag = "main" }

[reducers.visits]
kind = "counter"
on = "VISIT"

[[modules]]
name = "Blog"
actions = ["ADD_POST"]
routes = { tag = "section", text = "blog" }

[modules.reducers.posts]
kind = "append"
on = "ADD_POST"
"#,
    )
    .unwrap();

    let module: Module = Module::new(manifest.to_spec()).unwrap();
    let store = Arc::new(Store::new(module.reducers().unwrap()));
    let module = module.with_store(store.clone());

    let add_post = module
        .find("Blog")
        .unwrap()
        .create_action("ADD_POST", json!({"title": "Hello"}))
        .unwrap();
    store.dispatch(&Action::new("VISIT"));
    store.dispatch(&add_post);

    assert_eq!(
        store.state(),
        json!({"visits": 1, "Blog": {"posts": [{"title": "Hello"}]}})
    );

    let routes = module.routes().unwrap();
    assert_eq!(routes.tag(), Some("main"));
    let blog = &routes.children()[0];
    assert_eq!(blog.key(), Some("0"));
    assert_eq!(blog.children()[0].tag(), Some("section"));
}

/// Test a store shared by the tree can be read from route functions
#[test]
fn test_routes_read_store_state() {
    let mut reducers = ReducerMap::new();
    reducers.insert("title".into(), constant(json!("Home")));
    let store = Arc::new(Store::new(Some(combine_reducers(reducers))));

    let module = Module::new(
        ModuleSpec::new("Root")
            .with_submodule(ModuleSpec::new("Header").with_routes(route_fn(
                |args: routes::RouteArgs<'_, Store>| {
                    Node::text(args.store.state()["title"].as_str().unwrap_or_default())
                },
            )))
            .with_routes(route_fn(|args| {
                create_element("body", Props::new(), args.into_children())
            })),
    )
    .unwrap()
    .with_store(store);

    let routes = module.routes().unwrap();
    assert_eq!(routes.children()[0].children(), &[Node::text("Home")]);
}

/// Test structural edits are picked up by the next aggregation
#[test]
fn test_restructure_then_replace_reducer() {
    let mut module = Module::<Store>::new(
        ModuleSpec::new("Root")
            .with_submodule(ModuleSpec::new("Old").with_reducer("v", constant(json!(1)))),
    )
    .unwrap();
    let store = Arc::new(Store::new(module.reducers().unwrap()));
    module.set_store(store.clone());
    assert_eq!(store.state(), json!({"Old": {"v": 1}}));

    module.remove_submodule("Old");
    module
        .add_submodule(ModuleSpec::new("New").with_reducer("w", constant(json!(2))))
        .unwrap();
    store.replace_reducer(module.reducers().unwrap());

    assert_eq!(store.state(), json!({"New": {"w": 2}}));
    assert!(Arc::ptr_eq(module.find("New").unwrap().store().unwrap(), &store));
}
