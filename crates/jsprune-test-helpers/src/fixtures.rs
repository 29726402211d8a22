//! Test fixtures: program trees as a parser front end would produce them

use jsprune_core::ast::{Expression, Statement, VariableKind};
use jsprune_core::{AstBuilder, Program};

/// Source text of [`end_to_end_program`]
pub const END_TO_END_SOURCE: &str = "function f(){ return 1; console.log('dead'); }
function unused(){}
const x = 1;
const y = 2;
console.log(x);";

/// `const name = init;` with the name positioned the way a parser reports it
pub fn located_const(
    b: &AstBuilder,
    name: &str,
    init: Expression,
    line: u32,
    column: u32,
) -> Statement {
    b.var_pattern(
        VariableKind::Const,
        b.pat(name).with_loc(line, column + 6),
        Some(init),
    )
    .with_loc(line, column)
}

/// [`END_TO_END_SOURCE`] with positions on every statement and declared name
pub fn end_to_end_program() -> Program {
    let b = AstBuilder::new();
    Program::new(vec![
        b.function_decl(
            "f",
            &[],
            vec![
                b.ret(Some(b.num(1.0))).with_loc(1, 14),
                b.expr_stmt(b.console_log(vec![b.str("dead")]))
                    .with_loc(1, 24),
            ],
        )
        .with_loc(1, 0),
        b.function_decl("unused", &[], vec![]).with_loc(2, 0),
        located_const(&b, "x", b.num(1.0), 3, 0),
        located_const(&b, "y", b.num(2.0), 4, 0),
        b.expr_stmt(b.console_log(vec![b.ident("x")])).with_loc(5, 0),
    ])
}

/// `switch (2) { case 1: x(); case 2: y(); case 3: z(); break; case 4: w(); }`
pub fn switch_fall_through_program() -> Program {
    let b = AstBuilder::new();
    let call = |name: &str| b.expr_stmt(b.call_name(name, vec![]));
    Program::new(vec![b.switch(
        b.num(2.0),
        vec![
            b.case(Some(b.num(1.0)), vec![call("x")]),
            b.case(Some(b.num(2.0)), vec![call("y")]),
            b.case(Some(b.num(3.0)), vec![call("z"), b.brk()]),
            b.case(Some(b.num(4.0)), vec![call("w")]),
        ],
    )])
}

/// A helper only reachable through a variable nobody reads:
/// `function helper() { return 1; } const value = helper();`
pub fn dead_helper_chain_program() -> Program {
    let b = AstBuilder::new();
    Program::new(vec![
        b.function_decl("helper", &[], vec![b.ret(Some(b.num(1.0)))]),
        b.var(
            VariableKind::Const,
            "value",
            Some(b.call_name("helper", vec![])),
        ),
    ])
}

/// `function f() { return helper(); function helper() {} } f();`, where the
/// declaration after `return` is only live if hoisting is honoured
pub fn function_after_return_program() -> Program {
    let b = AstBuilder::new();
    Program::new(vec![
        b.function_decl(
            "f",
            &[],
            vec![
                b.ret(Some(b.call_name("helper", vec![]))),
                b.function_decl("helper", &[], vec![]).with_loc(1, 33),
            ],
        ),
        b.expr_stmt(b.call_name("f", vec![])),
    ])
}

pub fn function_after_return_json() -> String {
    match function_after_return_program().to_json() {
        Ok(json) => json,
        Err(err) => panic!("fixture failed to serialize: {}", err),
    }
}

/// `function g(a) { return 1; a(); }` then `g(2);`, in the JSON shape a parser
/// front end hands over
pub const FUNCTION_JSON: &str = r#"{
  "body": [
    {
      "id": 0,
      "loc": { "line": 1, "column": 0 },
      "type": "FunctionDeclaration",
      "name": { "name": "g" },
      "params": [{ "id": 1, "loc": { "line": 1, "column": 11 }, "type": "Identifier", "name": "a" }],
      "body": {
        "block": {
          "body": [
            {
              "id": 2,
              "type": "ReturnStatement",
              "argument": { "id": 3, "type": "Literal", "value": 1 }
            },
            {
              "id": 4,
              "loc": { "line": 1, "column": 26 },
              "type": "ExpressionStatement",
              "expression": {
                "id": 5,
                "type": "CallExpression",
                "callee": { "id": 6, "type": "Identifier", "name": "a" },
                "arguments": []
              }
            }
          ]
        }
      }
    },
    {
      "id": 7,
      "loc": { "line": 2, "column": 0 },
      "type": "ExpressionStatement",
      "expression": {
        "id": 8,
        "type": "CallExpression",
        "callee": { "id": 9, "type": "Identifier", "name": "g" },
        "arguments": [{ "value": { "id": 10, "type": "Literal", "value": 2 } }]
      }
    }
  ]
}"#;

/// Two statements sharing node id 1
pub const DUPLICATE_ID_JSON: &str = r#"{
  "body": [
    { "id": 1, "type": "EmptyStatement" },
    { "id": 1, "type": "EmptyStatement" }
  ]
}"#;
