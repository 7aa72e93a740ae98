use lox_lang_interpreter::error::RuntimeError;
use lox_lang_interpreter::session::{Outcome, Session};

fn run(source: &str) -> (Outcome, String, Vec<String>) {
    let mut session = Session::new(Vec::new());
    let outcome = session.run(source);
    let diagnostics = session
        .take_diagnostics()
        .iter()
        .map(|d| d.to_string())
        .collect();
    let output = String::from_utf8(session.into_output()).unwrap();
    (outcome, output, diagnostics)
}

fn assert_prints(source: &str, expected: &str) {
    let (outcome, output, diagnostics) = run(source);

    assert!(diagnostics.is_empty(), "{}: {:?}", source, diagnostics);
    assert!(
        matches!(outcome, Outcome::Completed),
        "{}: {:?}",
        source,
        outcome
    );
    assert_eq!(output, expected, "{}", source);
}

fn output_of(session: &Session<Vec<u8>>) -> &str {
    std::str::from_utf8(session.output()).unwrap()
}

#[test]
fn programs_print_expected_output() {
    let tests = vec![
        ("print 2 + 3 * 4;", "14\n"),
        ("print (2 + 3) * 4;", "20\n"),
        ("print \"a\" + \"b\";", "ab\n"),
        ("print !0;", "false\n"),
        ("print true ? 1 : (1/0);", "1\n"),
        ("print 10 / 4;", "2.5\n"),
        ("print 1 / 0;", "Infinity\n"),
        (
            "// comment\nvar greeting = \"hello\"; // trailing\nprint greeting;",
            "hello\n",
        ),
    ];

    for (source, expected) in tests {
        assert_prints(source, expected);
    }
}

#[test]
fn block_scoping_and_shadowing() {
    assert_prints(
        "var a = \"global\";
         {
           var a = \"outer\";
           {
             var a = \"inner\";
             print a;
           }
           print a;
         }
         print a;",
        "inner\nouter\nglobal\n",
    );
    assert_prints(
        "var a = 1; { var b = 2; a = a + b; } print a;",
        "3\n",
    );
}

#[test]
fn assignment_never_declares() {
    for source in ["x = 1;", "{ { x = 1; } }", "var y = 1; { y = x = 2; }"] {
        let (outcome, _, _) = run(source);
        match outcome {
            Outcome::RuntimeError(RuntimeError::UndefinedVariable { name }) => {
                assert_eq!(name.lexeme.as_ref(), "x")
            }
            other => panic!("{}: {:?}", source, other),
        }
    }
}

#[test]
fn loops_break_and_continue() {
    let tests = vec![
        (
            "for (var i = 0; i < 3; i = i + 1) { if (i == 1) continue; print i; }",
            "0\n2\n",
        ),
        (
            "var n = 0; while (true) { if (n == 2) break; print n; n = n + 1; }",
            "0\n1\n",
        ),
        (
            "var total = 0;
             for (var i = 1; i <= 5; i = i + 1) {
               switch (i) {
                 case 2: continue;
                 case 4: break;
               }
               total = total + i;
             }
             print total;",
            "4\n",
        ),
    ];

    for (source, expected) in tests {
        assert_prints(source, expected);
    }
}

#[test]
fn switch_takes_first_match() {
    let tests = vec![
        (
            "var x = 1; switch (x) { case 1: print \"first\"; case 1: print \"second\"; default: print \"default\"; }",
            "first\n",
        ),
        (
            "switch (\"z\") { case \"a\": print 1; }",
            "",
        ),
        (
            "switch (nil) { case false: print \"false\"; case nil: print \"nil\"; }",
            "nil\n",
        ),
    ];

    for (source, expected) in tests {
        assert_prints(source, expected);
    }
}

#[test]
fn syntax_errors_are_all_reported() {
    let (outcome, output, diagnostics) = run("print 1;\nvar = 2;\nprint 3\nprint 4;");

    assert!(matches!(outcome, Outcome::StaticErrors));
    assert_eq!(output, "");
    assert_eq!(
        diagnostics,
        vec![
            "[line 2] Error at '=': Expect variable name.",
            "[line 4] Error at 'print': Expect ';' after value.",
        ]
    );
}

#[test]
fn lexical_errors_skip_evaluation() {
    let (outcome, output, diagnostics) = run("print 1;\nprint @;\n\"open");

    assert!(matches!(outcome, Outcome::StaticErrors));
    assert_eq!(output, "");
    assert!(diagnostics.contains(&"[line 2] Error: Unexpected character.".to_owned()));
    assert!(diagnostics.contains(&"[line 3] Error: Unterminated string.".to_owned()));
}

#[test]
fn runtime_error_stops_the_run() {
    let (outcome, output, _) = run("print 1;\nprint \"a\" + 1;\nprint 2;");

    assert_eq!(output, "1\n");
    match outcome {
        Outcome::RuntimeError(error) => assert_eq!(
            error.report(),
            "Operands of '+' must be two numbers or two strings.\n[line 2]"
        ),
        other => panic!("{:?}", other),
    }
}

#[test]
fn continue_without_increment_runs_nothing_extra() {
    let tests = vec![
        (
            "var n = 0; for (; n < 5;) { if (n == 1) { n = 10; continue; } n = n * 2 + 1; } print n;",
            "10\n",
        ),
        (
            "var n = 0; for (var i = 0; i < 3;) { i = i + 1; if (i == 2) continue; n = n + i; } print n;",
            "4\n",
        ),
    ];

    for (source, expected) in tests {
        assert_prints(source, expected);
    }
}

#[test]
fn exit_ends_the_run() {
    let (outcome, output, _) = run("for (;;) { print \"once\"; exit; } print \"never\";");

    assert!(matches!(outcome, Outcome::Exited));
    assert_eq!(output, "once\n");
}

#[test]
fn interactive_lines_share_state() {
    let mut session = Session::new(Vec::new());

    assert!(matches!(session.run_interactive("1 + 2"), Outcome::Completed));
    assert_eq!(output_of(&session), "3\n");

    assert!(matches!(
        session.run_interactive("var x = 1;"),
        Outcome::Completed
    ));
    assert_eq!(output_of(&session), "3\n");

    assert!(matches!(session.run_interactive("x = x + 41"), Outcome::Completed));
    assert!(matches!(session.run_interactive("print x;"), Outcome::Completed));
    assert_eq!(output_of(&session), "3\n42\n42\n");
}

#[test]
fn interactive_errors_do_not_end_the_session() {
    let mut session = Session::new(Vec::new());

    assert!(matches!(
        session.run_interactive("print ;"),
        Outcome::StaticErrors
    ));
    assert_eq!(session.diagnostics().len(), 1);

    assert!(matches!(
        session.run_interactive("missing"),
        Outcome::RuntimeError(RuntimeError::UndefinedVariable { .. })
    ));
    assert!(session.diagnostics().is_empty());

    assert!(matches!(session.run_interactive("\"ok\""), Outcome::Completed));
    assert_eq!(output_of(&session), "ok\n");
}
