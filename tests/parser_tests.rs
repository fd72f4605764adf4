use imp::ast::{AExp, ArithOp, Assign, BExp, BoolOp, Ident, If, ProcCall, ProcDef, RelOp, Stm, While};
use imp::error::ImpError;
use imp::lexer::{Token, scan};
use imp::parser::{FORCED, ParseError, ParseState, parse};
use imp::{Dialect, parse_source};
use pretty_assertions::assert_eq;

fn ident(name: &str) -> Ident {
    Ident::detached(name)
}

fn assign(name: &str, value: AExp) -> Stm {
    Stm::Assign(Assign {
        name: ident(name),
        value,
    })
}

fn var(name: &str) -> AExp {
    AExp::variable(name)
}

fn num(value: i64) -> AExp {
    AExp::numeral(value)
}

fn parse_ok(source: &str) -> Stm {
    parse_source(source, Dialect::Extended).unwrap()
}

fn parse_err(source: &str, dialect: Dialect) -> ParseError {
    match parse_source(source, dialect) {
        Err(ImpError::Parse(err)) => err,
        other => panic!("expected a parse error, got {other:?}"),
    }
}

// ===== Statements =====

#[test]
fn parse_sequence_of_assignments() {
    let program = parse_ok("x := 3; y := (x + 2); print");

    assert_eq!(
        program,
        Stm::Seq(vec![
            assign("x", num(3)),
            assign("y", AExp::binary(var("x"), ArithOp::Add, num(2))),
            Stm::Print,
        ])
    );
}

#[test]
fn parse_single_statement_is_not_wrapped() {
    assert_eq!(parse_ok("skip"), Stm::Skip);
    assert_eq!(parse_ok("x := y"), assign("x", var("y")));
}

#[test]
fn parse_trailing_semicolon() {
    assert_eq!(parse_ok("x := 1;"), assign("x", num(1)));
    assert_eq!(
        parse_ok("x := 1; print;"),
        Stm::Seq(vec![assign("x", num(1)), Stm::Print])
    );
}

#[test]
fn parse_if_without_else_defaults_to_skip() {
    let program = parse_ok("if true then x := 1 end");

    assert_eq!(
        program,
        Stm::If(If {
            condition: BExp::Literal(true),
            taken: Box::new(assign("x", num(1))),
            not_taken: Box::new(Stm::Skip),
        })
    );
}

#[test]
fn parse_if_with_sequence_in_branches() {
    let program = parse_ok("if x = 0 then a := 1; b := 2 else c := 3 end");

    assert_eq!(
        program,
        Stm::If(If {
            condition: BExp::comparison(var("x"), RelOp::Eq, num(0)),
            taken: Box::new(Stm::Seq(vec![assign("a", num(1)), assign("b", num(2))])),
            not_taken: Box::new(assign("c", num(3))),
        })
    );
}

#[test]
fn parse_while_loop() {
    let program = parse_ok("while x < 3 do x := (x + 1) end");

    assert_eq!(
        program,
        Stm::While(While {
            condition: BExp::comparison(var("x"), RelOp::Lt, num(3)),
            body: Box::new(assign("x", AExp::binary(var("x"), ArithOp::Add, num(1)))),
        })
    );
}

#[test]
fn parse_parenthesized_comparison_as_guard() {
    let program = parse_ok("while (x < 3) do skip end");

    assert!(matches!(
        program,
        Stm::While(While {
            condition: BExp::Comparison { op: RelOp::Lt, .. },
            ..
        })
    ));
}

#[test]
fn parse_nested_sequences() {
    let program = parse_ok("(a := 1; b := 2); c := 3");

    assert_eq!(
        program,
        Stm::Seq(vec![
            Stm::Seq(vec![assign("a", num(1)), assign("b", num(2))]),
            assign("c", num(3)),
        ])
    );
}

#[test]
fn parse_nondeterministic_choice() {
    let program = parse_ok("x := 1 | x := 2 | skip");

    assert_eq!(
        program,
        Stm::Nondet(vec![assign("x", num(1)), assign("x", num(2)), Stm::Skip])
    );
}

#[test]
fn parse_choice_inside_sequence() {
    let program = parse_ok("x := 0; x := 1 | x := 2; print");

    assert_eq!(
        program,
        Stm::Seq(vec![
            assign("x", num(0)),
            Stm::Nondet(vec![assign("x", num(1)), assign("x", num(2))]),
            Stm::Print,
        ])
    );
}

#[test]
fn parse_var_block() {
    let program = parse_ok("var x := 5 in print end");

    assert!(matches!(
        &program,
        Stm::Var(block) if block.name.value == "x" && block.init == num(5) && *block.body == Stm::Print
    ));
}

#[test]
fn parse_procedure_definition_and_call() {
    let program = parse_ok("procedure inc(n; r) begin r := (n + 1) end; inc(a; a)");

    assert_eq!(
        program,
        Stm::Seq(vec![
            Stm::ProcDef(ProcDef {
                name: ident("inc"),
                inputs: vec![ident("n")],
                outputs: vec![ident("r")],
                body: Box::new(assign("r", AExp::binary(var("n"), ArithOp::Add, num(1)))),
            }),
            Stm::ProcCall(ProcCall {
                name: ident("inc"),
                inputs: vec![var("a")],
                outputs: vec![ident("a")],
            }),
        ])
    );
}

#[test]
fn parse_procedure_with_empty_lists() {
    let program = parse_ok("procedure p(; ) begin skip end; p(;)");

    assert_eq!(
        program,
        Stm::Seq(vec![
            Stm::ProcDef(ProcDef {
                name: ident("p"),
                inputs: vec![],
                outputs: vec![],
                body: Box::new(Stm::Skip),
            }),
            Stm::ProcCall(ProcCall {
                name: ident("p"),
                inputs: vec![],
                outputs: vec![],
            }),
        ])
    );
}

#[test]
fn parse_call_with_several_arguments() {
    let program = parse_ok("add((x + 1), 2; s, t)");

    assert_eq!(
        program,
        Stm::ProcCall(ProcCall {
            name: ident("add"),
            inputs: vec![AExp::binary(var("x"), ArithOp::Add, num(1)), num(2)],
            outputs: vec![ident("s"), ident("t")],
        })
    );
}

// ===== Bare expressions =====

#[test]
fn parse_bare_arithmetic_expression() {
    assert_eq!(
        parse_ok("((1 + 2) * x)"),
        Stm::Arithmetic(AExp::binary(
            AExp::binary(num(1), ArithOp::Add, num(2)),
            ArithOp::Mul,
            var("x")
        ))
    );
    assert_eq!(parse_ok("42"), Stm::Arithmetic(num(42)));
}

#[test]
fn parse_bare_boolean_expression() {
    assert_eq!(
        parse_ok("(x < 1 or not true)"),
        Stm::Boolean(BExp::binary(
            BExp::comparison(var("x"), RelOp::Lt, num(1)),
            BoolOp::Or,
            BExp::not(BExp::Literal(true)),
        ))
    );
}

#[test]
fn parse_parenthesized_operand_of_comparison() {
    assert_eq!(
        parse_ok("(x + 1) < 3"),
        Stm::Boolean(BExp::comparison(
            AExp::binary(var("x"), ArithOp::Add, num(1)),
            RelOp::Lt,
            num(3)
        ))
    );
}

#[test]
fn parse_deeply_nested_statements() {
    let depth = 30;
    let source = format!("{}skip{}", "if true then ".repeat(depth), " end".repeat(depth));

    let mut expected = Stm::Skip;
    for _ in 0..depth {
        expected = Stm::If(If {
            condition: BExp::Literal(true),
            taken: Box::new(expected),
            not_taken: Box::new(Stm::Skip),
        });
    }

    assert_eq!(parse_ok(&source), expected);
}

#[test]
fn parse_long_negation_chain() {
    let depth = 30;
    let source = format!("{}true", "not ".repeat(depth));

    let mut expected = BExp::Literal(true);
    for _ in 0..depth {
        expected = BExp::not(expected);
    }

    assert_eq!(parse_ok(&source), Stm::Boolean(expected));
}

// ===== Diagnostics =====

#[test]
fn unparenthesized_arithmetic_is_forced() {
    let err = parse_err("x := 1 + 2 + 3", Dialect::Extended);

    assert!(err.is_forced());
    assert_eq!(
        err.message,
        "binary expression must be enclosed by parentheses"
    );
    assert!(matches!(err.token, Some(Token::Plus(_))));
}

#[test]
fn unparenthesized_boolean_is_forced() {
    let err = parse_err("if x < 3 and y < 2 then skip end", Dialect::Extended);

    assert!(err.is_forced());
    assert_eq!(
        err.message,
        "binary boolean expression must be enclosed by parentheses"
    );
    assert!(matches!(err.token, Some(Token::And(_))));
}

#[test]
fn redundant_arithmetic_parentheses_are_forced() {
    let err = parse_err("x := ((1 + 2))", Dialect::Extended);

    assert!(err.is_forced());
    assert_eq!(
        err.message,
        "arithmetic expressions cannot be surrounded by additional parentheses"
    );
    assert!(matches!(err.token, Some(Token::LParen(_))));
}

#[test]
fn redundant_boolean_parentheses_are_forced() {
    let err = parse_err("while (true) do skip end", Dialect::Extended);

    assert!(err.is_forced());
    assert_eq!(
        err.message,
        "boolean expressions cannot be surrounded by additional parentheses"
    );
}

#[test]
fn doubly_parenthesized_comparison_is_forced() {
    let err = parse_err("if ((x < 3)) then skip end", Dialect::Extended);

    assert_eq!(
        err.message,
        "boolean expressions cannot be surrounded by additional parentheses"
    );
}

#[test]
fn forced_diagnostic_survives_trailing_semicolon() {
    let err = parse_err("while true do x := 1; y := 1 + 2 end", Dialect::Extended);

    assert!(err.is_forced());
    assert_eq!(
        err.message,
        "binary expression must be enclosed by parentheses"
    );
}

#[test]
fn leftover_tokens_are_unexpected() {
    let err = parse_err("x := 1 2", Dialect::Extended);

    assert_eq!(err.message, "unexpected token");
    assert_eq!(err.likelihood, 1.0);
    assert!(matches!(&err.token, Some(Token::Number(n)) if n.value == "2"));
}

#[test]
fn missing_end_after_distinctive_prefix() {
    let err = parse_err("while true do skip", Dialect::Extended);

    assert_eq!(err.message, "while loops must be closed with 'end'");
    assert!(err.token.is_none());
    assert_eq!(err.found(), "end of input");
}

#[test]
fn illegal_operator_in_binary_expression() {
    let err = parse_err("while true do x := (1 < 2) end", Dialect::Extended);

    assert_eq!(err.message, "illegal operator for binary arithmetic operation");
    assert!(matches!(err.token, Some(Token::Less(_))));
}

#[test]
fn diagnostic_renders_with_position() {
    let err = parse_err("x := 1 + 2", Dialect::Extended);
    let rendered = err.to_string();

    assert!(rendered.contains("binary expression must be enclosed by parentheses"));
    assert!(rendered.contains("'+'"));
}

// ===== Dialects =====

#[test]
fn core_dialect_rejects_extended_statements() {
    for source in [
        "abort",
        "while true do break end",
        "var x := 1 in skip end",
        "procedure p(; ) begin skip end",
        "x := 1 | x := 2",
    ] {
        assert!(
            parse_source(source, Dialect::Core).is_err(),
            "core dialect accepted {source}"
        );
        assert!(
            parse_source(source, Dialect::Extended).is_ok(),
            "extended dialect rejected {source}"
        );
    }
}

#[test]
fn core_dialect_reports_the_choice_operator() {
    let err = parse_err("x := 1 | x := 2", Dialect::Core);

    assert_eq!(err.message, "unexpected token");
    assert!(matches!(err.token, Some(Token::Pipe(_))));
}

#[test]
fn parse_state_default_dialect_is_extended() {
    let mut state = ParseState::new(scan("abort").unwrap());
    assert_eq!(parse(&mut state).unwrap(), Stm::Abort);
    assert_eq!(FORCED, 2.0);
}
