use exparse::ast::{Ast, BinOpKind};
use exparse::parser::{END_OF_STREAM, ParseError, parse};
use exparse::token::Token;

fn num(value: &str) -> Token {
    Token::float(value)
}

fn parse_ok(tokens: Vec<Token>) -> Ast {
    match parse(tokens) {
        Ok(ast) => ast,
        Err(err) => panic!("parsing failed: {err}"),
    }
}

fn parse_err(tokens: Vec<Token>) -> ParseError {
    match parse(tokens) {
        Ok(ast) => panic!("expected a parse error, got {ast}"),
        Err(err) => err,
    }
}

fn expects(err: &ParseError, symbol: &str) -> bool {
    matches!(err, ParseError::Expected(symbols) if symbols.iter().any(|s| s == symbol))
}

fn parenthesized(depth: usize, inner: Token) -> Vec<Token> {
    let mut tokens = vec![Token::left_paren(); depth];
    tokens.push(inner);
    tokens.extend(vec![Token::right_paren(); depth]);
    tokens
}

#[test]
fn parse_empty_input_fails() {
    let err = parse_err(vec![]);
    assert!(expects(&err, "literal.float"));
}

#[test]
fn parse_single_number() {
    let ast = parse_ok(vec![num("42")]);
    assert_eq!(ast, Ast::number("42"));
}

#[test]
fn parse_keeps_literal_text() {
    let ast = parse_ok(vec![num("1.50")]);
    assert!(matches!(&ast, Ast::Number(n) if n.value == "1.50"));
}

#[test]
fn parse_rejects_adjacent_numbers() {
    let err = parse_err(vec![num("42"), num("1337")]);
    assert_eq!(err, ParseError::Expected(vec![END_OF_STREAM.to_string()]));

    let err = parse_err(vec![num("42"), num("1337"), num("666")]);
    assert_eq!(err, ParseError::Expected(vec![END_OF_STREAM.to_string()]));
}

#[test]
fn parse_rejects_trailing_operator() {
    let err = parse_err(vec![num("42"), Token::multiply(), num("666"), Token::minus()]);
    assert_eq!(err, ParseError::Expected(vec![END_OF_STREAM.to_string()]));
}

#[test]
fn parse_rejects_lone_minus() {
    let err = parse_err(vec![Token::minus()]);
    assert!(expects(&err, "literal.float"));
}

#[test]
fn parse_rejects_leading_binary_operator() {
    assert!(parse(vec![Token::plus(), num("42"), Token::plus(), num("1337")]).is_err());
}

#[test]
fn parse_rejects_consecutive_binary_operators() {
    assert!(parse(vec![num("42"), Token::plus(), Token::divide(), num("1337")]).is_err());
}

#[test]
fn parse_rejects_unclosed_parenthesis() {
    let err = parse_err(vec![Token::left_paren(), num("1")]);
    assert_eq!(err, ParseError::expected("parenthesis.right"));

    let err = parse_err(vec![Token::minus(), Token::left_paren(), num("1")]);
    assert_eq!(err, ParseError::expected("parenthesis.right"));

    let err = parse_err(parenthesized(3, num("1")).into_iter().take(5).collect());
    assert_eq!(err, ParseError::expected("parenthesis.right"));
}

#[test]
fn parse_reports_expectations_where_parsing_stopped() {
    let err = parse_err(vec![Token::minus()]);
    assert_eq!(
        err,
        ParseError::Expected(vec![
            "operator.minus".to_string(),
            "literal.float".to_string(),
            "parenthesis.left".to_string(),
        ])
    );

    let err = parse_err(vec![Token::left_paren(), num("1"), Token::multiply()]);
    assert_eq!(err, ParseError::expected("parenthesis.right"));
}

#[test]
fn parse_rejects_unopened_parenthesis() {
    let err = parse_err(vec![num("1"), Token::right_paren()]);
    assert_eq!(err, ParseError::Expected(vec![END_OF_STREAM.to_string()]));
}

#[test]
fn parse_rejects_incomplete_group() {
    let err = parse_err(vec![
        Token::left_paren(),
        num("1"),
        Token::plus(),
        Token::right_paren(),
    ]);
    assert_eq!(err, ParseError::expected("parenthesis.right"));
}

#[test]
fn parse_unwraps_nested_parentheses() {
    for depth in 1..=16 {
        let ast = parse_ok(parenthesized(depth, num("7")));
        assert_eq!(ast, Ast::number("7"), "depth {depth}");
    }
}

#[test]
fn parse_deeply_nested_parentheses_on_large_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(|| parse(parenthesized(1000, num("7"))))
        .expect("failed to spawn parser thread");

    let result = handle.join().expect("parser thread panicked");
    assert_eq!(result, Ok(Ast::number("7")));
}

#[test]
fn parse_chained_negation() {
    for count in 0..10 {
        let mut tokens = vec![Token::minus(); count];
        tokens.push(num("42"));

        let mut expected = Ast::number("42");
        for _ in 0..count {
            expected = Ast::negate(expected);
        }

        assert_eq!(parse_ok(tokens), expected, "{count} negations");
    }
}

#[test]
fn parse_subtraction_is_left_associative() {
    let ast = parse_ok(vec![num("a"), Token::plus(), num("b"), Token::minus(), num("c")]);
    assert_eq!(
        ast,
        Ast::binary(
            BinOpKind::Subtract,
            Ast::binary(BinOpKind::Plus, Ast::number("a"), Ast::number("b")),
            Ast::number("c"),
        )
    );
}

#[test]
fn parse_division_is_left_associative() {
    let ast = parse_ok(vec![
        num("8"),
        Token::divide(),
        num("4"),
        Token::divide(),
        num("2"),
    ]);
    assert_eq!(ast.render(), "((8 / 4) / 2)");
}

#[test]
fn parse_multiplication_binds_tighter() {
    let ast = parse_ok(vec![num("a"), Token::plus(), num("b"), Token::multiply(), num("c")]);
    assert_eq!(
        ast,
        Ast::binary(
            BinOpKind::Plus,
            Ast::number("a"),
            Ast::binary(BinOpKind::Multiplication, Ast::number("b"), Ast::number("c")),
        )
    );
}

#[test]
fn parse_mixed_precedence_chains() {
    let ast = parse_ok(vec![
        num("42"),
        Token::plus(),
        num("1337"),
        Token::divide(),
        num("1337"),
    ]);
    assert_eq!(ast.render(), "(42 + (1337 / 1337))");

    let ast = parse_ok(vec![
        num("42"),
        Token::divide(),
        num("1337"),
        Token::plus(),
        num("1337"),
    ]);
    assert_eq!(ast.render(), "((42 / 1337) + 1337)");

    let ast = parse_ok(vec![
        num("1337"),
        Token::plus(),
        num("42"),
        Token::divide(),
        num("1337"),
        Token::plus(),
        num("1337"),
    ]);
    assert_eq!(ast.render(), "((1337 + (42 / 1337)) + 1337)");

    let ast = parse_ok(vec![
        num("42"),
        Token::divide(),
        num("1337"),
        Token::plus(),
        num("1337"),
        Token::divide(),
        num("1337"),
    ]);
    assert_eq!(ast.render(), "((42 / 1337) + (1337 / 1337))");
}

#[test]
fn parse_negation_binds_tighter_than_binary_operators() {
    let ast = parse_ok(vec![Token::minus(), num("42"), Token::multiply(), num("666")]);
    assert_eq!(ast.render(), "(-42 * 666)");

    let ast = parse_ok(vec![
        Token::minus(),
        Token::minus(),
        num("42"),
        Token::multiply(),
        num("666"),
    ]);
    assert_eq!(ast.render(), "(--42 * 666)");
}

#[test]
fn parse_negated_right_operand() {
    let ast = parse_ok(vec![num("42"), Token::multiply(), Token::minus(), num("666")]);
    assert_eq!(
        ast,
        Ast::binary(
            BinOpKind::Multiplication,
            Ast::number("42"),
            Ast::negate(Ast::number("666")),
        )
    );

    let ast = parse_ok(vec![
        num("42"),
        Token::multiply(),
        Token::minus(),
        Token::minus(),
        num("666"),
    ]);
    assert_eq!(ast.render(), "(42 * --666)");
}

#[test]
fn parse_binary_minus_after_operand() {
    let ast = parse_ok(vec![num("42"), Token::minus(), num("666")]);
    assert_eq!(
        ast,
        Ast::binary(BinOpKind::Subtract, Ast::number("42"), Ast::number("666"))
    );
}

#[test]
fn parse_parentheses_override_precedence() {
    let ast = parse_ok(vec![
        Token::left_paren(),
        num("1"),
        Token::plus(),
        num("2"),
        Token::right_paren(),
        Token::multiply(),
        num("3"),
    ]);
    assert_eq!(ast.render(), "((1 + 2) * 3)");

    let ast = parse_ok(vec![
        Token::minus(),
        Token::left_paren(),
        num("1"),
        Token::minus(),
        num("2"),
        Token::right_paren(),
    ]);
    assert_eq!(
        ast,
        Ast::negate(Ast::binary(
            BinOpKind::Subtract,
            Ast::number("1"),
            Ast::number("2"),
        ))
    );
}

#[test]
fn parse_is_deterministic() {
    let tokens = vec![
        Token::minus(),
        num("1"),
        Token::plus(),
        Token::left_paren(),
        num("2"),
        Token::multiply(),
        num("3"),
        Token::right_paren(),
        Token::divide(),
        num("4"),
    ];

    let first = parse_ok(tokens.clone());
    let second = parse_ok(tokens);
    assert_eq!(first, second);
    assert_eq!(first.render(), second.render());
    assert_eq!(first.compile(), second.compile());
}
