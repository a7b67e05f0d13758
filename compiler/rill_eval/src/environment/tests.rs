use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn name(s: &str) -> Rc<str> {
    Rc::from(s)
}

fn host(entries: &[(&str, Value)]) -> Bindings {
    entries
        .iter()
        .map(|(k, v)| (name(k), v.clone()))
        .collect()
}

#[test]
fn define_and_resolve() {
    let env = Env::new_root(Bindings::default());
    env.define(name("x"), Value::from(42));
    assert_eq!(env.resolve("x"), Some(Value::from(42)));
}

#[test]
fn unknown_is_distinct_from_undefined() {
    let env = Env::new_root(Bindings::default());
    env.define(name("u"), Value::Undefined);
    assert_eq!(env.resolve("u"), Some(Value::Undefined));
    assert_eq!(env.resolve("missing"), None);
}

#[test]
fn child_sees_parent_bindings() {
    let root = Env::new_root(Bindings::default());
    root.define(name("x"), Value::from(1));
    let child = root.enter();
    assert_eq!(child.resolve("x"), Some(Value::from(1)));
    assert!(!child.same_frame(&root));
}

#[test]
fn shadowing_leaves_parent_untouched() {
    let root = Env::new_root(Bindings::default());
    root.define(name("x"), Value::from(1));
    let child = root.enter();
    child.define(name("x"), Value::from(2));
    assert_eq!(child.resolve("x"), Some(Value::from(2)));
    assert_eq!(root.resolve("x"), Some(Value::from(1)));
}

#[test]
fn exit_returns_parent_or_self_at_root() {
    let root = Env::new_root(Bindings::default());
    let child = root.enter();
    assert!(child.exit().same_frame(&root));
    assert!(root.exit().same_frame(&root));
    assert!(child.enter().root().is_root());
}

#[test]
fn host_layer_is_visible_but_not_copied_back() {
    let root = Env::new_root(host(&[("a", Value::from(1))]));
    assert_eq!(root.enter().resolve("a"), Some(Value::from(1)));
    assert!(root.root_bindings().is_empty());

    root.define(name("a"), Value::from(5));
    root.define(name("b"), Value::from(6));
    assert_eq!(root.resolve("a"), Some(Value::from(5)));
    assert_eq!(
        root.root_bindings(),
        vec![(name("a"), Value::from(5)), (name("b"), Value::from(6))]
    );
}

#[test]
fn owner_of_finds_binding_frame() {
    let root = Env::new_root(host(&[("h", Value::Null)]));
    root.define(name("x"), Value::from(1));
    let child = root.enter();
    let grandchild = child.enter();
    child.define(name("y"), Value::from(2));

    assert!(grandchild.owner_of("x").unwrap().same_frame(&root));
    assert!(grandchild.owner_of("y").unwrap().same_frame(&child));
    assert!(grandchild.owner_of("h").unwrap().is_root());
    assert!(grandchild.owner_of("nope").is_none());
}

#[test]
fn root_bindings_ignore_child_frames() {
    let root = Env::new_root(Bindings::default());
    root.enter().define(name("inner"), Value::from(1));
    assert!(root.root_bindings().is_empty());
}

proptest! {
    #[test]
    fn child_definitions_never_change_ancestors(
        outer in -1000i32..1000,
        inner in -1000i32..1000,
        depth in 1usize..8,
    ) {
        let root = Env::new_root(Bindings::default());
        root.define(name("v"), Value::from(outer));
        let mut env = root.clone();
        for _ in 0..depth {
            env = env.enter();
        }
        env.define(name("v"), Value::from(inner));
        prop_assert_eq!(env.resolve("v"), Some(Value::from(inner)));
        prop_assert_eq!(root.resolve("v"), Some(Value::from(outer)));
        prop_assert_eq!(env.exit().resolve("v"), Some(Value::from(outer)));
    }
}
