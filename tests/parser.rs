#[cfg(test)]
mod parser_tests {
    use quill_lang as quill;

    use quill::ast::{Expr, Program, Property, Stmt, TypeAnnotation};
    use quill::parser::Parser;

    fn parse(source: &str) -> Program {
        Parser::new().produce_ast(source).expect("parse failed")
    }

    fn parse_fails(source: &str) {
        assert!(
            Parser::new().produce_ast(source).is_err(),
            "expected parse failure for: {source}"
        );
    }

    fn num(n: f64) -> Expr {
        Expr::NumericLiteral(n)
    }

    fn ident(name: &str) -> Expr {
        Expr::Identifier(name.to_string())
    }

    fn binary(left: Expr, operator: &str, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            operator: operator.to_string(),
            right: Box::new(right),
        }
    }

    /// The single expression statement of a one-statement program.
    fn only_expr(source: &str) -> Expr {
        let program = parse(source);

        assert_eq!(program.body.len(), 1, "expected one statement");

        match program.body.into_iter().next().unwrap() {
            Stmt::Expr(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_parser_01_multiplication_binds_tighter_than_addition() {
        assert_eq!(
            only_expr("1 + 2 * 3;"),
            binary(num(1.0), "+", binary(num(2.0), "*", num(3.0)))
        );
    }

    #[test]
    fn test_parser_02_exponent_binds_tighter_than_multiplication() {
        assert_eq!(
            only_expr("2 * 3 ^ 2;"),
            binary(num(2.0), "*", binary(num(3.0), "^", num(2.0)))
        );
    }

    #[test]
    fn test_parser_03_relational_binds_tighter_than_logical() {
        assert_eq!(
            only_expr("a < b && c > d;"),
            binary(
                binary(ident("a"), "<", ident("b")),
                "&&",
                binary(ident("c"), ">", ident("d"))
            )
        );
    }

    #[test]
    fn test_parser_04_relational_is_non_associative() {
        // A second relational operator never chains.
        parse_fails("1 < 2 < 3;");
    }

    #[test]
    fn test_parser_05_equality_is_non_associative() {
        parse_fails("1 == 2 == 3;");
    }

    #[test]
    fn test_parser_06_missing_semicolon_fails() {
        parse_fails("let x = 1");
        parse_fails("if (true) { 1 };");
    }

    #[test]
    fn test_parser_07_let_without_value_declares_unassigned() {
        let program = parse("let x;");

        assert_eq!(
            program.body[0],
            Stmt::VarDeclaration {
                constant: false,
                annotation: None,
                identifier: "x".to_string(),
                value: None,
            }
        );
    }

    #[test]
    fn test_parser_08_const_requires_value() {
        parse_fails("const x;");
    }

    #[test]
    fn test_parser_09_typed_declaration_carries_annotation() {
        let program = parse("int x = 5;");

        assert_eq!(
            program.body[0],
            Stmt::VarDeclaration {
                constant: false,
                annotation: Some(TypeAnnotation::Int),
                identifier: "x".to_string(),
                value: Some(num(5.0)),
            }
        );
    }

    #[test]
    fn test_parser_10_if_else_chain() {
        let program = parse("if (a) { 1; }; else if (b) { 2; }; else { 3; };");

        let Stmt::If {
            condition,
            body,
            else_body,
        } = &program.body[0]
        else {
            panic!("expected if statement");
        };

        assert_eq!(*condition, ident("a"));
        assert_eq!(body.as_slice(), &[Stmt::Expr(num(1.0))]);

        // The else-if nests as a one-element else body.
        let Stmt::If {
            condition: inner_cond,
            body: inner_body,
            else_body: inner_else,
        } = &else_body[0]
        else {
            panic!("expected nested if in else body");
        };

        assert_eq!(*inner_cond, ident("b"));
        assert_eq!(inner_body.as_slice(), &[Stmt::Expr(num(2.0))]);
        assert_eq!(inner_else.as_slice(), &[Stmt::Expr(num(3.0))]);
    }

    #[test]
    fn test_parser_11_for_requires_all_three_clauses() {
        parse_fails("for (;;) { 1; };");
        parse_fails("for (let i = 0; i < 3;) { 1; };");

        let program = parse("for (let i = 0; i < 3; i = i + 1) { print(i); };");

        assert!(matches!(program.body[0], Stmt::For { .. }));
    }

    #[test]
    fn test_parser_12_break_outside_loop_fails() {
        parse_fails("break;");
        parse_fails("if (true) { break; };");
    }

    #[test]
    fn test_parser_13_return_outside_function_fails() {
        parse_fails("return 1;");
        parse_fails("while (true) { return 1; };");
    }

    #[test]
    fn test_parser_14_break_inside_loop_parses() {
        let program = parse("while (true) { break; };");

        let Stmt::While { body, .. } = &program.body[0] else {
            panic!("expected while statement");
        };

        assert_eq!(body.as_slice(), &[Stmt::Expr(Expr::Break)]);
    }

    #[test]
    fn test_parser_15_flags_reset_inside_argument_lists() {
        // A loop position does not legalize break inside a call's arguments.
        parse_fails("while (true) { f(break); };");
    }

    #[test]
    fn test_parser_16_function_declaration() {
        let program = parse("function add(a, b) { return a + b; };");

        assert_eq!(
            program.body[0],
            Stmt::FunctionDeclaration {
                name: "add".to_string(),
                parameters: vec!["a".to_string(), "b".to_string()],
                body: vec![Stmt::Expr(Expr::Return(Box::new(binary(
                    ident("a"),
                    "+",
                    ident("b")
                ))))],
            }
        );
    }

    #[test]
    fn test_parser_17_function_parameters_must_be_identifiers() {
        parse_fails("function f(1) { };");
    }

    #[test]
    fn test_parser_18_object_literal_with_shorthand() {
        assert_eq!(
            only_expr("{a: 1, b};"),
            Expr::ObjectLiteral(vec![
                Property {
                    key: "a".to_string(),
                    value: Some(Box::new(Stmt::Expr(num(1.0)))),
                },
                Property {
                    key: "b".to_string(),
                    value: None,
                },
            ])
        );
    }

    #[test]
    fn test_parser_19_object_literal_with_string_key() {
        assert_eq!(
            only_expr("{\"first name\": 1};"),
            Expr::ObjectLiteral(vec![Property {
                key: "first name".to_string(),
                value: Some(Box::new(Stmt::Expr(num(1.0)))),
            }])
        );
    }

    #[test]
    fn test_parser_20_member_chain() {
        assert_eq!(
            only_expr("a.b[0];"),
            Expr::Member {
                object: Box::new(Expr::Member {
                    object: Box::new(ident("a")),
                    property: Box::new(ident("b")),
                    computed: false,
                }),
                property: Box::new(num(0.0)),
                computed: true,
            }
        );
    }

    #[test]
    fn test_parser_21_dot_requires_identifier_property() {
        parse_fails("a.1;");
    }

    #[test]
    fn test_parser_22_chained_calls_nest() {
        assert_eq!(
            only_expr("f(1)(2);"),
            Expr::Call {
                caller: Box::new(Expr::Call {
                    caller: Box::new(ident("f")),
                    args: vec![num(1.0)],
                }),
                args: vec![num(2.0)],
            }
        );
    }

    #[test]
    fn test_parser_23_string_and_array_literals() {
        assert_eq!(
            only_expr("\"hi\";"),
            Expr::StringLiteral("hi".to_string())
        );

        assert_eq!(
            only_expr("[1, \"two\", true];"),
            Expr::ArrayLiteral(vec![
                num(1.0),
                Expr::StringLiteral("two".to_string()),
                Expr::BoolLiteral(true),
            ])
        );
    }

    #[test]
    fn test_parser_24_unary_covers_primary_only() {
        assert_eq!(
            only_expr("-a + 1;"),
            binary(
                Expr::Unary {
                    operator: "-".to_string(),
                    right: Box::new(ident("a")),
                },
                "+",
                num(1.0)
            )
        );
    }

    #[test]
    fn test_parser_25_assignment_is_right_associative() {
        assert_eq!(
            only_expr("a = b = 1;"),
            Expr::Assignment {
                assignee: Box::new(ident("a")),
                value: Box::new(Expr::Assignment {
                    assignee: Box::new(ident("b")),
                    value: Box::new(num(1.0)),
                }),
            }
        );
    }

    #[test]
    fn test_parser_26_compound_assignment_desugars_to_plain() {
        assert_eq!(
            only_expr("x += 1;"),
            Expr::Assignment {
                assignee: Box::new(ident("x")),
                value: Box::new(binary(ident("x"), "+", num(1.0))),
            }
        );
    }

    #[test]
    fn test_parser_27_parse_is_deterministic() {
        let source = "let x = 1; function f(a) { return a; }; print(f(x));";

        let first = parse(source);
        let second = parse(source);

        assert_eq!(first, second);

        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();

        assert_eq!(first_json, second_json);
    }
}
