#[cfg(test)]
mod interpreter_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use quill_lang as quill;

    use quill::interpreter::Interpreter;
    use quill::parser::Parser;
    use quill::value::Value;

    /// Evaluate `source` with a capturing print sink; returns the program's
    /// final value and everything printed.
    fn run(source: &str) -> (Value, Vec<String>) {
        let captured: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let lines = Rc::clone(&captured);

        let mut interpreter = Interpreter::with_sink(Rc::new(move |line: &str| {
            lines.borrow_mut().push(line.to_string());
        }));

        let program = Parser::new().produce_ast(source).expect("parse failed");
        let value = interpreter.run(&program).expect("evaluation failed");

        let output = captured.borrow().clone();

        (value, output)
    }

    fn run_output(source: &str) -> Vec<String> {
        run(source).1
    }

    fn run_value(source: &str) -> Value {
        run(source).0
    }

    /// Evaluation must fail at runtime (the source itself parses).
    fn run_fails(source: &str) {
        let program = Parser::new().produce_ast(source).expect("parse failed");
        let mut interpreter = Interpreter::with_sink(Rc::new(|_line: &str| {}));

        assert!(
            interpreter.run(&program).is_err(),
            "expected runtime failure for: {source}"
        );
    }

    // ───────────────────── end-to-end scenarios ──────────────────────

    #[test]
    fn test_interp_01_arithmetic_and_print() {
        assert_eq!(run_output("let x = 5; print(x + 2);"), vec!["7"]);
    }

    #[test]
    fn test_interp_01b_typed_declarations_evaluate() {
        assert_eq!(
            run_output("int x = 5; int y = 10; print(x + y);"),
            vec!["15"]
        );
    }

    #[test]
    fn test_interp_02_function_call() {
        let source = "function add(a, b) { return a + b; }; print(add(2, 3));";

        assert_eq!(run_output(source), vec!["5"]);
    }

    #[test]
    fn test_interp_03_while_loop() {
        let source = "let i = 0; while (i < 3) { print(i); i = i + 1; };";

        assert_eq!(run_output(source), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_interp_04_array_push_and_len() {
        let source = "let arr = [1,2,3]; arr.push(4); print(len(arr));";

        assert_eq!(run_output(source), vec!["4"]);
    }

    #[test]
    fn test_interp_05_constant_reassignment_fails_without_output() {
        let source = "const x = 1; x = 2;";
        let program = Parser::new().produce_ast(source).expect("parse failed");

        let captured: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let lines = Rc::clone(&captured);

        let mut interpreter = Interpreter::with_sink(Rc::new(move |line: &str| {
            lines.borrow_mut().push(line.to_string());
        }));

        assert!(interpreter.run(&program).is_err());
        assert!(captured.borrow().is_empty());
    }

    #[test]
    fn test_interp_06_for_loop_with_break() {
        let source = "for (let i=0; i<5; i=i+1) { if (i==2) { break; }; print(i); };";

        assert_eq!(run_output(source), vec!["0", "1"]);
    }

    // ───────────────────── language semantics ────────────────────────

    #[test]
    fn test_interp_07_program_yields_last_value() {
        assert_eq!(run_value("1 + 1;"), Value::Number(2.0));
        assert_eq!(run_value(""), Value::Null);
    }

    #[test]
    fn test_interp_08_exponent_and_floor_division() {
        assert_eq!(run_output("print(2 ^ 3); print(7 // 2); print(-7 // 2);"),
            vec!["8", "3", "-4"]);
    }

    #[test]
    fn test_interp_09_logical_operators_are_eager() {
        // Both sides always evaluate, even when the left already decides.
        let source =
            "function f() { print(\"called\"); return true; }; print(false && f());";

        assert_eq!(run_output(source), vec!["called", "false"]);
    }

    #[test]
    fn test_interp_10_logical_operators_require_booleans() {
        run_fails("let x = true && 1;");
    }

    #[test]
    fn test_interp_11_equality_semantics() {
        // Strings compare by contents, arrays by identity.
        assert_eq!(run_output("print(\"a\" == \"a\");"), vec!["true"]);
        assert_eq!(run_output("print([1] == [1]);"), vec!["false"]);
        assert_eq!(
            run_output("let a = [1]; let b = a; print(a == b);"),
            vec!["true"]
        );
        assert_eq!(run_output("print(1 == true);"), vec!["false"]);
    }

    #[test]
    fn test_interp_12_unary_requires_numbers() {
        assert_eq!(run_output("print(-(2 + 3));"), vec!["-5"]);
        run_fails("let x = -true;");
    }

    #[test]
    fn test_interp_13_if_condition_must_be_boolean() {
        run_fails("if (1) { };");
    }

    #[test]
    fn test_interp_14_non_boolean_loop_condition_ends_loop() {
        assert_eq!(run_output("let i = 0; while (i) { print(i); };"), Vec::<String>::new());
    }

    #[test]
    fn test_interp_15_block_scoping_and_shadowing() {
        let source = "let x = 1; if (true) { let x = 2; print(x); }; print(x);";

        assert_eq!(run_output(source), vec!["2", "1"]);
    }

    #[test]
    fn test_interp_16_closures_capture_declaration_scope() {
        let source = "function make() {
            let n = 0;
            function inc() { n = n + 1; return n; };
            return inc;
        };
        let counter = make();
        counter();
        print(counter());";

        assert_eq!(run_output(source), vec!["2"]);
    }

    #[test]
    fn test_interp_17_missing_arguments_bind_unassigned() {
        let source = "function f(a) { return a; }; print(f());";

        assert_eq!(run_output(source), vec!["unassigned"]);
    }

    #[test]
    fn test_interp_18_function_without_return_yields_last_value() {
        let source = "function f() { 1; 2; 3; }; print(f());";

        assert_eq!(run_output(source), vec!["3"]);
    }

    #[test]
    fn test_interp_19_return_propagates_through_loops() {
        let source = "function f() {
            for (let i = 0; i < 10; i = i + 1) {
                if (i == 3) { return i; };
            };
            return -1;
        };
        print(f());";

        assert_eq!(run_output(source), vec!["3"]);
    }

    #[test]
    fn test_interp_20_continue_runs_for_iteration_clause() {
        let source =
            "for (let i = 0; i < 5; i = i + 1) { if (i % 2 == 0) { continue; }; print(i); };";

        assert_eq!(run_output(source), vec!["1", "3"]);
    }

    #[test]
    fn test_interp_21_continue_rechecks_while_condition() {
        let source =
            "let i = 0; while (i < 3) { i = i + 1; if (i == 2) { continue; }; print(i); };";

        assert_eq!(run_output(source), vec!["1", "3"]);
    }

    #[test]
    fn test_interp_22_compound_assignment() {
        assert_eq!(
            run_output("let x = 10; x += 5; x //= 4; print(x);"),
            vec!["3"]
        );
    }

    #[test]
    fn test_interp_23_typed_declarations_enforce_tags() {
        assert_eq!(run_output("int x = 5; x = 10; print(x);"), vec!["10"]);

        run_fails("int x = 5; x = \"text\";");
        run_fails("str s = 5;");

        // let and any are exempt.
        assert_eq!(
            run_output("let y = 5; y = \"text\"; print(y);"),
            vec!["text"]
        );
        assert_eq!(
            run_output("any z = 5; z = \"text\"; print(z);"),
            vec!["text"]
        );
    }

    #[test]
    fn test_interp_24_duplicate_declaration_fails() {
        run_fails("let x = 1; let x = 2;");
    }

    #[test]
    fn test_interp_25_unresolved_name_fails() {
        run_fails("print(ghost);");
    }

    #[test]
    fn test_interp_26_calling_a_non_function_fails() {
        run_fails("let x = 1; x();");
    }

    #[test]
    fn test_interp_26b_invalid_assignment_target_fails() {
        run_fails("1 = 2;");
    }

    // ───────────────────── objects / arrays / strings ────────────────

    #[test]
    fn test_interp_27_object_mutation_is_visible_through_aliases() {
        let source = "let a = {v: 1}; let b = a; b.v = 2; print(a.v);";

        assert_eq!(run_output(source), vec!["2"]);
    }

    #[test]
    fn test_interp_28_computed_access_missing_key_reads_unassigned() {
        let source = "let o = {}; o[\"k\"] = 5; print(o[\"k\"]); print(o[\"missing\"]);";

        assert_eq!(run_output(source), vec!["5", "unassigned"]);
    }

    #[test]
    fn test_interp_29_dotted_access_missing_key_fails() {
        run_fails("let o = {}; print(o.k);");
    }

    #[test]
    fn test_interp_30_dotted_mutation_creates_the_key() {
        assert_eq!(
            run_output("let o = {}; o.k = 7; print(o.k);"),
            vec!["7"]
        );
    }

    #[test]
    fn test_interp_31_object_shorthand_reads_current_scope() {
        let source = "let name = \"quill\"; let o = {name}; print(o.name);";

        assert_eq!(run_output(source), vec!["quill"]);
    }

    #[test]
    fn test_interp_32_object_function_property() {
        let source = "let o = {f: function g() { return 7; }}; print(o.f());";

        assert_eq!(run_output(source), vec!["7"]);
    }

    #[test]
    fn test_interp_33_array_indexing_and_mutation() {
        let source = "let a = [1, 2, 3]; a[1] = 9; print(a[1]); print(a);";

        assert_eq!(run_output(source), vec!["9", "[1, 9, 3]"]);
    }

    #[test]
    fn test_interp_34_array_index_bounds_checked() {
        run_fails("let a = [1]; print(a[1]);");
        run_fails("let a = [1]; print(a[-1]);");
        run_fails("let a = [1]; print(a[0.5]);");
    }

    #[test]
    fn test_interp_35_array_pop_and_shift() {
        let source = "let a = [1, 2]; print(a.pop()); print(a.shift()); print(len(a));";

        assert_eq!(run_output(source), vec!["2", "1", "0"]);
    }

    #[test]
    fn test_interp_36_empty_pop_yields_unassigned() {
        assert_eq!(run_output("let a = []; print(a.pop());"), vec!["unassigned"]);
    }

    #[test]
    fn test_interp_37_unknown_method_fails() {
        run_fails("let a = []; a.reverse();");
        run_fails("let s = \"x\"; s.upper();");
    }

    #[test]
    fn test_interp_38_string_indexing_and_len() {
        let source = "let s = \"hello\"; print(s[1]); print(len(s));";

        assert_eq!(run_output(source), vec!["e", "5"]);
    }

    #[test]
    fn test_interp_39_concat_mutates_shared_backing() {
        let source = "let s = \"ab\"; let t = s; s.concat(\"c\"); print(t);";

        assert_eq!(run_output(source), vec!["abc"]);
    }

    // ───────────────────── builtins ──────────────────────────────────

    #[test]
    fn test_interp_40_print_joins_arguments_with_spaces() {
        assert_eq!(
            run_output("print(1, \"two\", true, null);"),
            vec!["1 two true null"]
        );
    }

    #[test]
    fn test_interp_41_len_rejects_other_tags() {
        run_fails("len(5);");
        run_fails("len();");
    }

    #[test]
    fn test_interp_42_math_builtins() {
        assert_eq!(
            run_output(
                "print(Math.abs(-3)); print(Math.floor(2.7)); print(Math.ceil(2.1));
                 print(Math.round(2.5)); print(Math.max(1, 5, 3)); print(Math.min(1, 5, 3));"
            ),
            vec!["3", "2", "3", "3", "5", "1"]
        );
    }

    #[test]
    fn test_interp_43_math_random_stays_in_range() {
        for _ in 0..20 {
            let Value::Number(n) = run_value("Math.random(1, 3);") else {
                panic!("expected a number");
            };

            assert!(n.fract() == 0.0 && (1.0..=3.0).contains(&n));
        }
    }

    #[test]
    fn test_interp_44_builtins_are_constant() {
        run_fails("print = 5;");
    }

    #[test]
    fn test_interp_45_registered_natives_are_callable() {
        let captured: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let lines = Rc::clone(&captured);

        let mut interpreter = Interpreter::with_sink(Rc::new(move |line: &str| {
            lines.borrow_mut().push(line.to_string());
        }));

        interpreter
            .register_native(
                "double",
                Rc::new(|args: &[Value]| match args {
                    [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
                    _ => Ok(Value::Unassigned),
                }),
            )
            .expect("registration failed");

        let program = Parser::new()
            .produce_ast("print(double(21));")
            .expect("parse failed");

        interpreter.run(&program).expect("evaluation failed");

        assert_eq!(*captured.borrow(), vec!["42"]);
    }

    #[test]
    fn test_interp_46_number_display() {
        assert_eq!(
            run_output("print(3); print(1.5); print(0 - 2);"),
            vec!["3", "1.5", "-2"]
        );
    }
}
