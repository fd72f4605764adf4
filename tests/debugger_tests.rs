use imp::interpreter::{
    Acknowledgment, ControlOutcome, Debugger, Environment, Guard, Interpreter, Node, Scripted,
    StepObserver,
};
use imp::{Dialect, parse_source};
use pretty_assertions::assert_eq;

const WAIT: &str = "   <press enter for next instruction>";

/// Run `source` under a debugger fed with `input`, returning the outcome,
/// the program output and the debugger transcript
fn debug(source: &str, input: &str) -> (ControlOutcome, String, String, bool) {
    let program = parse_source(source, Dialect::Extended).unwrap();
    let mut interpreter = Interpreter::new(Vec::new()).with_choices(Scripted::new([1]));
    let mut debugger = Debugger::new(input.as_bytes(), Vec::new());

    let outcome = interpreter.run_observed(&program, &mut debugger).unwrap();
    let cancelled = debugger.cancelled();
    let transcript = String::from_utf8(debugger.into_output()).unwrap();
    let output = String::from_utf8(interpreter.into_output()).unwrap();
    (outcome, output, transcript, cancelled)
}

#[test]
fn echoes_statements_and_assigned_values() {
    let (outcome, output, transcript, cancelled) = debug("x := 1; print", "\n\n");

    assert_eq!(outcome, ControlOutcome::Normal);
    assert!(!cancelled);
    assert_eq!(output, "Program State\n  x -> 1\n");
    assert_eq!(
        transcript,
        format!("~> x := 1\n   ==> 1\n{WAIT}~> print\n{WAIT}")
    );
}

#[test]
fn closed_input_cancels_like_abort() {
    let (outcome, output, _, cancelled) = debug("x := 1; print; x := 2", "\n");

    assert_eq!(outcome, ControlOutcome::Abort);
    assert!(cancelled);
    // the print was echoed but never run
    assert_eq!(output, "");
}

#[test]
fn cancelled_run_keeps_earlier_effects() {
    let program = parse_source("x := 1; y := 2", Dialect::Extended).unwrap();
    let mut interpreter = Interpreter::new(Vec::new());
    let mut debugger = Debugger::new(&b""[..], Vec::new());

    let outcome = interpreter.run_observed(&program, &mut debugger).unwrap();

    assert_eq!(outcome, ControlOutcome::Abort);
    assert_eq!(interpreter.environment().get("x"), Some(1));
    assert!(!interpreter.environment().contains("y"));
}

#[test]
fn reports_guards_and_their_values() {
    let (_, _, transcript, _) = debug("if true then skip end", "\n\n");

    assert_eq!(
        transcript,
        format!(
            "~> if true then skip else skip end\n~> true   <if condition evaluates to true>\n~> skip\n{WAIT}"
        )
    );
}

#[test]
fn reports_every_loop_check() {
    let (_, _, transcript, _) = debug("x := 0; while x < 2 do x := (x + 1) end", &"\n".repeat(10));

    assert_eq!(transcript.matches("<loop condition evaluates to true>").count(), 2);
    assert_eq!(transcript.matches("<loop condition evaluates to false>").count(), 1);
    assert_eq!(transcript.matches("~> x < 2").count(), 3);
}

#[test]
fn echoes_the_chosen_branch() {
    let (_, _, transcript, _) = debug("x := 1 | print", "\n\n");

    assert!(transcript.starts_with("~> x := 1 | print\n~> print\n"));
}

/// Counts the nodes the evaluator reports
#[derive(Default)]
struct Counter {
    statements: usize,
    conditions: usize,
    expressions: usize,
    assignments: Vec<(String, i64)>,
    decisions: Vec<(Guard, bool)>,
}

impl StepObserver for Counter {
    fn before(&mut self, node: Node<'_>, _environment: &Environment) -> Acknowledgment {
        match node {
            Node::Statement(_) => self.statements += 1,
            Node::Condition(..) => self.conditions += 1,
            Node::Arithmetic(_) | Node::Boolean(_) => self.expressions += 1,
        }
        Acknowledgment::Continue
    }

    fn assigned(&mut self, name: &imp::ast::Ident, value: i64) -> Acknowledgment {
        self.assignments.push((name.value.clone(), value));
        Acknowledgment::Continue
    }

    fn decided(&mut self, guard: Guard, value: bool) -> Acknowledgment {
        self.decisions.push((guard, value));
        Acknowledgment::Continue
    }
}

#[test]
fn observer_sees_every_step() {
    let program = parse_source("a := 2; if a = 2 then b := (a * 3) end", Dialect::Extended).unwrap();
    let mut interpreter = Interpreter::new(Vec::new());
    let mut counter = Counter::default();

    interpreter.run_observed(&program, &mut counter).unwrap();

    // seq, two assignments, the if
    assert_eq!(counter.statements, 4);
    assert_eq!(counter.conditions, 1);
    // 2; a = 2 with a and 2; (a * 3) with a and 3
    assert_eq!(counter.expressions, 7);
    assert_eq!(
        counter.assignments,
        vec![("a".to_string(), 2), ("b".to_string(), 6)]
    );
    assert_eq!(counter.decisions, vec![(Guard::If, true)]);
}

/// Stops the run at the first assignment
struct StopAtAssignment;

impl StepObserver for StopAtAssignment {
    fn before(&mut self, node: Node<'_>, _environment: &Environment) -> Acknowledgment {
        match node {
            Node::Statement(imp::ast::Stm::Assign(_)) => Acknowledgment::Cancel,
            _ => Acknowledgment::Continue,
        }
    }
}

#[test]
fn cancelling_observer_stops_before_the_step() {
    let program = parse_source("print; x := 1; print", Dialect::Extended).unwrap();
    let mut interpreter = Interpreter::new(Vec::new());

    let outcome = interpreter.run_observed(&program, &mut StopAtAssignment).unwrap();

    assert_eq!(outcome, ControlOutcome::Abort);
    assert!(!interpreter.environment().contains("x"));
    assert_eq!(
        String::from_utf8(interpreter.into_output()).unwrap(),
        "Program State\n"
    );
}
