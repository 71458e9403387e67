use super::*;
use crate::expression::parser::{ParseConsts, parse_expr};

const CONSTS: ParseConsts = ParseConsts {
    width: 100,
    height: 50,
    length: 30,
};

fn ranges(z0: f64, z1: f64) -> VarRanges {
    VarRanges {
        x: Interval::new(0.0, 99.0),
        y: Interval::new(0.0, 49.0),
        z: Interval::new(z0, z1),
    }
}

fn bound(src: &str, vars: &VarRanges) -> Interval {
    image_interval(&parse_expr(src, CONSTS).unwrap(), vars)
}

#[test]
fn identity_frame_maps_the_batch_range() {
    assert_eq!(bound("t", &ranges(24.0, 47.0)), Interval::new(24.0, 47.0));
}

#[test]
fn shifts_and_scales_follow_the_variables() {
    assert_eq!(bound("t-2", &ranges(5.0, 9.0)), Interval::new(3.0, 7.0));
    assert_eq!(bound("2*t", &ranges(5.0, 9.0)), Interval::new(10.0, 18.0));
    assert_eq!(bound("-t", &ranges(5.0, 9.0)), Interval::new(-9.0, -5.0));
    assert_eq!(bound("w-1-x", &ranges(0.0, 0.0)), Interval::new(0.0, 99.0));
}

#[test]
fn time_displacement_by_row_widens_the_range() {
    // Slit-scan: each row reads a different past frame.
    assert_eq!(
        bound("t+y-h", &ranges(10.0, 10.0)),
        Interval::new(-40.0, 9.0)
    );
}

#[test]
fn division_by_a_range_with_zero_is_unbounded() {
    assert!(bound("t/x", &ranges(0.0, 3.0)).is_unbounded());
    assert_eq!(bound("t/2", &ranges(4.0, 8.0)), Interval::new(2.0, 4.0));
}

#[test]
fn remainder_bounds() {
    assert_eq!(bound("t#50", &ranges(3.0, 7.0)), Interval::new(3.0, 7.0));
    assert_eq!(bound("t#5", &ranges(3.0, 7.0)), Interval::new(0.0, 5.0));
    assert_eq!(bound("(t-10)#4", &ranges(3.0, 7.0)), Interval::new(-4.0, 4.0));
}

#[test]
fn floor_division_keeps_the_dividend_range() {
    assert_eq!(bound("t_4", &ranges(3.0, 7.0)), Interval::new(3.0, 7.0));
}

#[test]
fn clamp_narrows_each_endpoint() {
    let e = Expr::clamp(0, 29, parse_expr("t+y", CONSTS).unwrap());
    assert_eq!(
        image_interval(&e, &ranges(0.0, 10.0)),
        Interval::new(0.0, 29.0)
    );
}
