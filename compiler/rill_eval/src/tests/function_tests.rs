//! Function values: parameters, closures, receivers and host interplay.

use pretty_assertions::assert_eq;
use rill_ir::build::*;
use rill_ir::Node;

use super::{eval, eval_in};
use crate::errors::host_error;
use crate::{nth_arg, Context, EvalError, Value};

fn call_stmt(name: &str, args: Vec<Node>) -> Node {
    expr_stmt(call(ident(name), args))
}

#[test]
fn default_applies_only_to_absent_arguments() {
    // function f(a, b = 'dflt') { return b }
    let f = || {
        function_decl(
            "f",
            vec![param("a"), param_default("b", string("dflt"))],
            vec![ret(Some(ident("b")))],
        )
    };
    assert_eq!(
        eval(vec![f(), call_stmt("f", vec![num(1.0)])]),
        Ok(Value::from("dflt"))
    );
    assert_eq!(
        eval(vec![f(), call_stmt("f", vec![num(1.0), ident("undefined")])]),
        Ok(Value::Undefined)
    );
    assert_eq!(
        eval(vec![f(), call_stmt("f", vec![num(1.0), num(0.0)])]),
        Ok(Value::from(0))
    );
}

#[test]
fn default_sees_earlier_parameters() {
    // function f(a, b = a * 2) { return b } f(3)
    let value = eval(vec![
        function_decl(
            "f",
            vec![
                param("a"),
                param_default("b", binary("*", ident("a"), num(2.0))),
            ],
            vec![ret(Some(ident("b")))],
        ),
        call_stmt("f", vec![num(3.0)]),
    ]);
    assert_eq!(value, Ok(Value::from(6)));
}

#[test]
fn missing_arguments_are_undefined_and_extras_ignored() {
    let value = eval(vec![
        function_decl(
            "pair",
            vec![param("a"), param("b")],
            vec![ret(Some(array(vec![ident("a"), ident("b")])))],
        ),
        let_("short", call(ident("pair"), vec![num(1.0)])),
        let_(
            "long",
            call(ident("pair"), vec![num(1.0), num(2.0), num(3.0)]),
        ),
        expr_stmt(array(vec![ident("short"), ident("long")])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![
            Value::array(vec![Value::from(1), Value::Undefined]),
            Value::array(vec![Value::from(1), Value::from(2)]),
        ]))
    );
}

#[test]
fn body_without_return_yields_last_statement() {
    let value = eval(vec![
        function_decl(
            "f",
            vec![],
            vec![expr_stmt(num(1.0)), expr_stmt(string("last"))],
        ),
        call_stmt("f", vec![]),
    ]);
    assert_eq!(value, Ok(Value::from("last")));
}

#[test]
fn bare_return_is_undefined() {
    let value = eval(vec![
        function_decl("f", vec![], vec![ret(None), expr_stmt(num(1.0))]),
        call_stmt("f", vec![]),
    ]);
    assert_eq!(value, Ok(Value::Undefined));
}

#[test]
fn arrow_functions() {
    // let sq = x => x * x; let blk = (a, b) => { return a - b }; [sq(4), blk(5, 2)]
    let value = eval(vec![
        let_(
            "sq",
            arrow(vec![param("x")], binary("*", ident("x"), ident("x"))),
        ),
        let_(
            "blk",
            arrow(
                vec![param("a"), param("b")],
                block(vec![ret(Some(binary("-", ident("a"), ident("b"))))]),
            ),
        ),
        expr_stmt(array(vec![
            call(ident("sq"), vec![num(4.0)]),
            call(ident("blk"), vec![num(5.0), num(2.0)]),
        ])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::from(16), Value::from(3)]))
    );
}

#[test]
fn closures_keep_their_defining_frame() {
    // function counter() { let n = 0; return () => { n += 1; return n; } }
    // let c = counter(); c(); c(); let d = counter(); d(); [c(), d()]
    let value = eval(vec![
        function_decl(
            "counter",
            vec![],
            vec![
                let_("n", num(0.0)),
                ret(Some(arrow(
                    vec![],
                    block(vec![
                        expr_stmt(assign("+=", ident("n"), num(1.0))),
                        ret(Some(ident("n"))),
                    ]),
                ))),
            ],
        ),
        let_("c", call(ident("counter"), vec![])),
        call_stmt("c", vec![]),
        call_stmt("c", vec![]),
        let_("d", call(ident("counter"), vec![])),
        call_stmt("d", vec![]),
        expr_stmt(array(vec![
            call(ident("c"), vec![]),
            call(ident("d"), vec![]),
        ])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::from(3), Value::from(2)]))
    );
}

#[test]
fn parameters_shadow_outer_bindings() {
    let value = eval(vec![
        let_("x", num(1.0)),
        function_decl(
            "f",
            vec![param("x")],
            vec![expr_stmt(assign("=", ident("x"), num(99.0)))],
        ),
        call_stmt("f", vec![num(5.0)]),
        expr_stmt(ident("x")),
    ]);
    assert_eq!(value, Ok(Value::from(1)));
}

#[test]
fn named_function_expression_binds_its_name() {
    // let f = function fact(n) { return n <= 1 ? 1 : n * fact(n - 1) }; f(5)
    let value = eval(vec![
        let_(
            "f",
            function_expr(
                Some("fact"),
                vec![param("n")],
                vec![ret(Some(conditional(
                    binary("<=", ident("n"), num(1.0)),
                    num(1.0),
                    binary(
                        "*",
                        ident("n"),
                        call(ident("fact"), vec![binary("-", ident("n"), num(1.0))]),
                    ),
                )))],
            ),
        ),
        call_stmt("f", vec![num(5.0)]),
    ]);
    assert_eq!(value, Ok(Value::from(120)));
}

#[test]
fn function_declaration_statement_yields_the_function() {
    let value = eval(vec![function_decl("f", vec![], vec![])]).unwrap();
    assert!(value.is_callable());
    assert_eq!(value.get_property("name"), Ok(Value::from("f")));
}

#[test]
fn method_calls_bind_the_receiver() {
    // let o = { v: 2, get: function () { return this.v } }; o.get()
    let value = eval(vec![
        let_(
            "o",
            object(vec![
                prop("v", num(2.0)),
                prop(
                    "get",
                    function_expr(None, vec![], vec![ret(Some(member(this(), "v")))]),
                ),
            ]),
        ),
        expr_stmt(call(member(ident("o"), "get"), vec![])),
    ]);
    assert_eq!(value, Ok(Value::from(2)));
}

#[test]
fn plain_calls_have_undefined_receiver() {
    let value = eval(vec![
        function_decl("f", vec![], vec![ret(Some(unary("typeof", this())))]),
        call_stmt("f", vec![]),
    ]);
    assert_eq!(value, Ok(Value::from("undefined")));
}

#[test]
fn arrows_see_the_enclosing_receiver() {
    // let o = { v: 7, m: function () { let a = () => this.v; return a() } }; o.m()
    let value = eval(vec![
        let_(
            "o",
            object(vec![
                prop("v", num(7.0)),
                prop(
                    "m",
                    function_expr(
                        None,
                        vec![],
                        vec![
                            let_("a", arrow(vec![], member(this(), "v"))),
                            ret(Some(call(ident("a"), vec![]))),
                        ],
                    ),
                ),
            ]),
        ),
        expr_stmt(call(member(ident("o"), "m"), vec![])),
    ]);
    assert_eq!(value, Ok(Value::from(7)));
}

#[test]
fn host_methods_receive_the_receiver() {
    let scale = Value::native("scale", |this, args| {
        let factor = this.get_property("factor")?.to_number();
        Ok(Value::from(factor * nth_arg(args, 0).to_number()))
    });
    let mut ctx = Context::new();
    ctx.set(
        "m",
        Value::object_from([("factor", Value::from(3)), ("scale", scale)]),
    );
    let value = eval_in(
        &mut ctx,
        vec![expr_stmt(call(member(ident("m"), "scale"), vec![num(5.0)]))],
    );
    assert_eq!(value, Ok(Value::from(15)));
}

#[test]
fn host_functions_can_call_script_functions() {
    let mut ctx = Context::new();
    ctx.register_fn("map", |_, args| {
        let func = nth_arg(args, 1);
        let Value::Array(items) = nth_arg(args, 0) else {
            return Err(host_error("map expects an array"));
        };
        let items = items.borrow().clone();
        let mapped = items
            .iter()
            .map(|item| func.call(&Value::Undefined, std::slice::from_ref(item)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(mapped))
    });
    let value = eval_in(
        &mut ctx,
        vec![call_stmt(
            "map",
            vec![
                array(vec![num(1.0), num(2.0)]),
                arrow(vec![param("x")], binary("+", ident("x"), num(10.0))),
            ],
        )],
    );
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::from(11), Value::from(12)]))
    );

    let result = eval_in(&mut ctx, vec![call_stmt("map", vec![num(1.0)])]);
    assert_eq!(
        result,
        Err(EvalError::Host {
            message: "map expects an array".to_string()
        })
    );
}

#[test]
fn errors_propagate_out_of_calls() {
    let value = eval(vec![
        function_decl("f", vec![], vec![expr_stmt(ident("missing"))]),
        call_stmt("f", vec![]),
    ]);
    assert_eq!(
        value,
        Err(EvalError::UnresolvedIdentifier {
            name: "missing".to_string()
        })
    );
}

#[test]
fn stray_break_ends_the_call_with_undefined() {
    let value = eval(vec![
        let_("after", boolean(false)),
        function_decl(
            "f",
            vec![],
            vec![
                brk(),
                expr_stmt(assign("=", ident("after"), boolean(true))),
            ],
        ),
        let_("r", call(ident("f"), vec![])),
        expr_stmt(array(vec![ident("r"), ident("after")])),
    ]);
    assert_eq!(
        value,
        Ok(Value::array(vec![Value::Undefined, Value::Bool(false)]))
    );
}

#[test]
fn deep_recursion_grows_the_stack() {
    // function sum(n) { return n == 0 ? 0 : n + sum(n - 1) } sum(20000)
    let value = eval(vec![
        function_decl(
            "sum",
            vec![param("n")],
            vec![ret(Some(conditional(
                binary("==", ident("n"), num(0.0)),
                num(0.0),
                binary(
                    "+",
                    ident("n"),
                    call(ident("sum"), vec![binary("-", ident("n"), num(1.0))]),
                ),
            )))],
        ),
        call_stmt("sum", vec![num(20_000.0)]),
    ]);
    assert_eq!(value, Ok(Value::from(200_010_000)));
}

#[test]
fn calling_a_script_function_from_rust() {
    let mut ctx = Context::new();
    eval_in(
        &mut ctx,
        vec![function_decl(
            "greet",
            vec![param("who")],
            vec![ret(Some(template(&["hi ", ""], vec![ident("who")])))],
        )],
    )
    .unwrap();
    let greet = ctx.get("greet").unwrap();
    assert_eq!(
        greet.call(&Value::Undefined, &[Value::from("bob")]),
        Ok(Value::from("hi bob"))
    );
    assert!(matches!(
        Value::from(1).call(&Value::Undefined, &[]),
        Err(EvalError::TypeError { .. })
    ));
}
