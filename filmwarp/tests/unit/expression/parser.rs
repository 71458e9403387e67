use super::*;

const CONSTS: ParseConsts = ParseConsts {
    width: 640,
    height: 480,
    length: 100,
};

fn parse(src: &str) -> Expr {
    parse_expr(src, CONSTS).unwrap()
}

#[test]
fn sum_of_variable_and_literal() {
    assert_eq!(parse("x+1"), Expr::Sum(vec![Expr::VarX, Expr::ConstInt(1)]));
    assert_eq!(parse("x+1").node_count(), 3);
}

#[test]
fn single_factor_nodes_collapse() {
    assert_eq!(parse("x"), Expr::VarX);
    assert_eq!(parse("((y))"), Expr::VarY);
    assert_eq!(
        parse("x/y"),
        Expr::binary(BinaryOp::Div, Expr::VarX, Expr::VarY)
    );
}

#[test]
fn unary_minus_negates_only_the_next_term() {
    assert_eq!(parse("-x"), Expr::scale_int(-1, Expr::VarX));
    assert_eq!(
        parse("w-1-x"),
        Expr::Sum(vec![
            Expr::ConstInt(640),
            Expr::scale_int(-1, Expr::ConstInt(1)),
            Expr::scale_int(-1, Expr::VarX),
        ])
    );
    assert_eq!(
        parse("-x*y"),
        Expr::Product(vec![Expr::scale_int(-1, Expr::VarX), Expr::VarY])
    );
}

#[test]
fn division_binds_to_the_previous_factor() {
    let a = Expr::ConstInt(2);
    let b = Expr::ConstInt(3);
    let c = Expr::ConstInt(5);
    let d = Expr::ConstInt(7);
    assert_eq!(
        parse("2*3/5*7"),
        Expr::Product(vec![
            a,
            Expr::binary(BinaryOp::Div, b, c),
            d,
        ])
    );
}

#[test]
fn chained_division_is_left_associative() {
    assert_eq!(
        parse("x#4_2"),
        Expr::binary(
            BinaryOp::FloorDiv,
            Expr::binary(BinaryOp::Mod, Expr::VarX, Expr::ConstInt(4)),
            Expr::ConstInt(2),
        )
    );
}

#[test]
fn named_constants_and_time_aliases() {
    assert_eq!(parse("h"), Expr::ConstInt(480));
    assert_eq!(parse("l"), Expr::ConstInt(100));
    assert_eq!(parse("t"), Expr::VarZ);
    assert_eq!(parse("z"), Expr::VarZ);
}

#[test]
fn decimal_point_makes_a_float_literal() {
    assert_eq!(parse("2."), Expr::ConstFloat(2.0));
    assert_eq!(parse("0.5*x"), Expr::Product(vec![Expr::ConstFloat(0.5), Expr::VarX]));
    assert!(!parse("0.5*x").is_exact());
    assert!(parse("x#3").is_exact());
    assert!(!parse("x/1").is_exact());
}

#[test]
fn triplet_splits_on_top_level_semicolons() {
    let [x, y, z] = parse_triplet("[x;y;t]", CONSTS).unwrap();
    assert_eq!((x, y, z), (Expr::VarX, Expr::VarY, Expr::VarZ));

    let [x, _, z] = parse_triplet("[ (x + 1) * 2 ; y ; t-1 ]", CONSTS).unwrap();
    assert_eq!(
        x,
        Expr::Product(vec![
            Expr::Sum(vec![Expr::VarX, Expr::ConstInt(1)]),
            Expr::ConstInt(2),
        ])
    );
    assert_eq!(
        z,
        Expr::Sum(vec![Expr::VarZ, Expr::scale_int(-1, Expr::ConstInt(1))])
    );
}

#[test]
fn malformed_triplets_are_rejected() {
    assert!(parse_triplet("x;y;t", CONSTS).is_err());
    assert!(parse_triplet("[x;y;t", CONSTS).is_err());
    assert!(parse_triplet("[x;y]", CONSTS).is_err());
    assert!(parse_triplet("[x;y;t;t]", CONSTS).is_err());
    assert!(parse_triplet("[x;;t]", CONSTS).is_err());
    assert!(parse_triplet("[]", CONSTS).is_err());
}

#[test]
fn errors_report_the_offending_offset() {
    let err = parse_expr("x+q", CONSTS).unwrap_err();
    assert_eq!(err.offset, 2);
    assert!(err.message.contains("unknown symbol 'q'"));

    let err = parse_expr("x^2", CONSTS).unwrap_err();
    assert_eq!(err.offset, 1);
    assert!(err.message.contains("exponentiation"));

    assert!(parse_expr("(x+1", CONSTS).is_err());
    assert!(parse_expr("x+1)", CONSTS).is_err());
    assert!(parse_expr("x+", CONSTS).is_err());
    assert!(parse_expr("x $ y", CONSTS).is_err());
    assert!(parse_expr("99999999999", CONSTS).is_err());
}

#[test]
fn display_round_trips_through_the_parser() {
    let e = parse("(w-1-x)*2#7_3+y/2.");
    let again = parse(&e.to_string());
    assert_eq!(again, e);
}
