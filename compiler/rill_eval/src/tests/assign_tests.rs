//! Assignment targets, compound assignment and update expressions.

use pretty_assertions::assert_eq;
use rill_ir::build::*;

use super::{eval, eval_in};
use crate::value::MAX_ARRAY_GROWTH;
use crate::{Context, EvalError, Value};

#[test]
fn assignment_yields_assigned_value() {
    let value = eval(vec![
        let_("x", num(0.0)),
        expr_stmt(assign("=", ident("y"), assign("=", ident("x"), num(5.0)))),
        expr_stmt(binary("+", ident("x"), ident("y"))),
    ]);
    assert_eq!(value, Ok(Value::from(10)));
}

#[test]
fn assignment_updates_the_owning_frame() {
    // let x = 1; if (true) { x = 2; } x;
    let value = eval(vec![
        let_("x", num(1.0)),
        if_(
            boolean(true),
            block(vec![expr_stmt(assign("=", ident("x"), num(2.0)))]),
            None,
        ),
        expr_stmt(ident("x")),
    ]);
    assert_eq!(value, Ok(Value::from(2)));
}

#[test]
fn assigning_an_unbound_name_defines_it_locally() {
    // if (true) { fresh = 1; } typeof fresh;
    let mut ctx = Context::new();
    let value = eval_in(
        &mut ctx,
        vec![
            if_(
                boolean(true),
                block(vec![expr_stmt(assign("=", ident("fresh"), num(1.0)))]),
                None,
            ),
            expr_stmt(unary("typeof", ident("fresh"))),
        ],
    );
    assert_eq!(value, Ok(Value::from("undefined")));
    assert!(!ctx.contains("fresh"));
}

#[test]
fn top_level_assignment_to_unbound_name_writes_back() {
    let mut ctx = Context::new();
    eval_in(&mut ctx, vec![expr_stmt(assign("=", ident("total"), num(3.0)))]).unwrap();
    assert_eq!(ctx.get("total"), Some(&Value::from(3)));
}

#[test]
fn compound_assignment() {
    let cases = [
        ("+=", 6.0, 2.0, 8.0),
        ("-=", 6.0, 2.0, 4.0),
        ("*=", 6.0, 2.0, 12.0),
        ("/=", 6.0, 2.0, 3.0),
        ("%=", 7.0, 4.0, 3.0),
        ("**=", 3.0, 2.0, 9.0),
        ("<<=", 1.0, 3.0, 8.0),
        (">>=", -16.0, 2.0, -4.0),
        (">>>=", 16.0, 2.0, 4.0),
        ("&=", 6.0, 3.0, 2.0),
        ("|=", 6.0, 3.0, 7.0),
        ("^=", 6.0, 3.0, 5.0),
    ];
    for (operator, start, operand, expected) in cases {
        let value = eval(vec![
            let_("x", num(start)),
            expr_stmt(assign(operator, ident("x"), num(operand))),
        ]);
        assert_eq!(value, Ok(Value::from(expected)), "operator {operator}");
    }
}

#[test]
fn compound_assignment_concatenates_strings() {
    let value = eval(vec![
        let_("s", string("a")),
        expr_stmt(assign("+=", ident("s"), num(1.0))),
    ]);
    assert_eq!(value, Ok(Value::from("a1")));
}

#[test]
fn compound_assignment_to_unbound_name_fails() {
    let result = eval(vec![expr_stmt(assign("+=", ident("nope"), num(1.0)))]);
    assert_eq!(
        result,
        Err(EvalError::UnresolvedIdentifier {
            name: "nope".to_string()
        })
    );
}

#[test]
fn property_assignment() {
    let value = eval(vec![
        let_("o", object(vec![])),
        expr_stmt(assign("=", member(ident("o"), "a"), num(1.0))),
        expr_stmt(assign("+=", index(ident("o"), string("a")), num(2.0))),
        expr_stmt(ident("o")),
    ]);
    assert_eq!(value, Ok(Value::object_from([("a", Value::from(3))])));
}

#[test]
fn objects_are_shared_by_reference() {
    let value = eval(vec![
        let_("a", object(vec![])),
        let_("b", ident("a")),
        expr_stmt(assign("=", member(ident("b"), "x"), num(1.0))),
        expr_stmt(member(ident("a"), "x")),
    ]);
    assert_eq!(value, Ok(Value::from(1)));
}

#[test]
fn array_writes_grow_and_truncate() {
    let value = eval(vec![
        let_("a", array(vec![num(1.0)])),
        expr_stmt(assign("=", index(ident("a"), num(3.0)), num(4.0))),
        expr_stmt(ident("a")),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![
            Value::from(1),
            Value::Undefined,
            Value::Undefined,
            Value::from(4),
        ]))
    );

    let value = eval(vec![
        let_("a", array(vec![num(1.0), num(2.0), num(3.0)])),
        expr_stmt(assign("=", member(ident("a"), "length"), num(1.0))),
        expr_stmt(ident("a")),
    ]);
    assert_eq!(value, Ok(Value::array(vec![Value::from(1)])));
}

#[test]
fn far_array_index_is_a_type_error() {
    // let a = []; a[4294967294] = 1;
    let result = eval(vec![
        let_("a", array(vec![])),
        expr_stmt(assign("=", index(ident("a"), num(4_294_967_294.0)), num(1.0))),
    ]);
    assert_eq!(
        result,
        Err(EvalError::TypeError {
            message: "cannot grow array from length 0 to 4294967295".to_string()
        })
    );

    // a.length = 4294967295;
    let result = eval(vec![
        let_("a", array(vec![num(1.0)])),
        expr_stmt(assign("=", member(ident("a"), "length"), num(4_294_967_295.0))),
    ]);
    assert!(matches!(result, Err(EvalError::TypeError { .. })));
}

#[test]
fn failed_array_growth_leaves_the_array_intact() {
    let mut ctx = Context::new();
    ctx.set("a", Value::array(vec![Value::from(1)]));
    let result = eval_in(
        &mut ctx,
        vec![expr_stmt(assign("=", index(ident("a"), num(1e9)), num(2.0)))],
    );
    assert!(matches!(result, Err(EvalError::TypeError { .. })));
    assert_eq!(ctx.get("a"), Some(&Value::array(vec![Value::from(1)])));
}

#[test]
fn array_growth_up_to_the_limit_succeeds() {
    let limit = MAX_ARRAY_GROWTH as f64;
    let value = eval(vec![
        let_("a", array(vec![])),
        expr_stmt(assign("=", index(ident("a"), num(limit - 1.0)), num(7.0))),
        expr_stmt(assign("=", member(ident("a"), "length"), num(2.0 * limit))),
        expr_stmt(member(ident("a"), "length")),
    ]);
    assert_eq!(value, Ok(Value::Number(2.0 * limit)));
}

#[test]
fn writing_a_property_of_a_primitive_fails() {
    let result = eval(vec![
        let_("n", num(1.0)),
        expr_stmt(assign("=", member(ident("n"), "x"), num(2.0))),
    ]);
    assert_eq!(
        result,
        Err(EvalError::TypeError {
            message: "cannot set property `x` on number".to_string()
        })
    );
}

#[test]
fn prefix_and_postfix_outside_binary_operands() {
    // let i = 1; let a = i++; let b = ++i; [a, b, i]
    let value = eval(vec![
        let_("i", num(1.0)),
        let_("a", update("++", false, ident("i"))),
        let_("b", update("++", true, ident("i"))),
        expr_stmt(array(vec![ident("a"), ident("b"), ident("i")])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::from(1), Value::from(3), Value::from(3)]))
    );
}

#[test]
fn update_converts_to_number() {
    let value = eval(vec![
        let_("s", string("5")),
        let_("old", update("--", false, ident("s"))),
        expr_stmt(array(vec![ident("old"), ident("s")])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::from(5), Value::from(4)]))
    );
}

#[test]
fn postfix_operand_write_waits_for_the_operator() {
    // let i = 0; let r = i++ + i; [r, i]
    let value = eval(vec![
        let_("i", num(0.0)),
        let_("r", binary("+", update("++", false, ident("i")), ident("i"))),
        expr_stmt(array(vec![ident("r"), ident("i")])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::from(0), Value::from(1)]))
    );
}

#[test]
fn deferred_writes_each_apply_to_the_current_value() {
    // let i = 5; let r = i++ * i--; [r, i]
    let value = eval(vec![
        let_("i", num(5.0)),
        let_(
            "r",
            binary(
                "*",
                update("++", false, ident("i")),
                update("--", false, ident("i")),
            ),
        ),
        expr_stmt(array(vec![ident("r"), ident("i")])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::from(25), Value::from(5)]))
    );
}

#[test]
fn postfix_on_a_property_operand() {
    // let o = { n: 1 }; let r = o.n++ + 10; [r, o.n]
    let value = eval(vec![
        let_("o", object(vec![prop("n", num(1.0))])),
        let_(
            "r",
            binary("+", update("++", false, member(ident("o"), "n")), num(10.0)),
        ),
        expr_stmt(array(vec![ident("r"), member(ident("o"), "n")])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::from(11), Value::from(2)]))
    );
}

#[test]
fn for_update_expression_mutates_immediately() {
    // let n = 0; for (let i = 0; i < 3; i++) { n += i; } n;
    let value = eval(vec![
        let_("n", num(0.0)),
        for_(
            Some(let_("i", num(0.0))),
            Some(binary("<", ident("i"), num(3.0))),
            Some(update("++", false, ident("i"))),
            block(vec![expr_stmt(assign("+=", ident("n"), ident("i")))]),
        ),
        expr_stmt(ident("n")),
    ]);
    assert_eq!(value, Ok(Value::from(3)));
}
