use super::*;
use crate::span::SpanKind;

fn linear_i(offsets: Vec<usize>, runs: Vec<(i32, i32)>) -> Span<i32> {
    Span::sparse_linear(
        offsets,
        runs.into_iter()
            .map(|(start, step)| Ramp { start, step })
            .collect(),
    )
    .unwrap()
}

fn naive(a: &Span<i32>, b: &Span<i32>, f: impl Fn(i32, i32) -> i32) -> Vec<i32> {
    a.iter().zip(b.iter()).map(|(x, y)| f(x, y)).collect()
}

#[test]
fn single_run_sparse_sum_stays_single_run() {
    let r = Span::constant(8, 2i32) + Span::constant(8, 5i32);
    assert_eq!(r.kind(), SpanKind::Sparse);
    assert_eq!(r.offsets(), Some(&[0usize, 8][..]));
    assert_eq!(r.into_values(), vec![7; 8]);
}

#[test]
fn sparse_sum_merges_boundaries() {
    let a = Span::sparse(vec![0, 3, 8], vec![1, 2]).unwrap();
    let b = Span::sparse(vec![0, 5, 8], vec![10, 20]).unwrap();
    let expected = naive(&a, &b, |x, y| x + y);
    let r = a + b;
    assert_eq!(r.offsets(), Some(&[0usize, 3, 5, 8][..]));
    assert_eq!(r.into_values(), expected);
}

#[test]
fn linear_plus_linear_reanchors_split_runs() {
    let a = linear_i(vec![0, 6], vec![(0, 1)]);
    let b = linear_i(vec![0, 2, 6], vec![(100, 0), (0, 10)]);
    let expected = naive(&a, &b, |x, y| x + y);
    let r = a + b;
    assert_eq!(r.kind(), SpanKind::SparseLinear);
    assert_eq!(r.offsets(), Some(&[0usize, 2, 6][..]));
    assert_eq!(r.into_values(), expected);
}

#[test]
fn linear_plus_sparse_stays_linear() {
    let a = linear_i(vec![0, 4, 8], vec![(0, 1), (0, 1)]);
    let b = Span::sparse(vec![0, 2, 8], vec![5, -5]).unwrap();
    let expected = naive(&a, &b, |x, y| x + y);
    let r = b + a;
    assert_eq!(r.kind(), SpanKind::SparseLinear);
    assert_eq!(r.into_values(), expected);
}

#[test]
fn linear_times_sparse_scales_start_and_step() {
    let a = linear_i(vec![0, 5], vec![(1, 2)]);
    let b = Span::sparse(vec![0, 3, 5], vec![3, -1]).unwrap();
    let expected = naive(&a, &b, |x, y| x * y);
    let r = a * b;
    assert_eq!(r.kind(), SpanKind::SparseLinear);
    assert_eq!(r.into_values(), expected);
}

#[test]
fn linear_times_linear_falls_back_to_dense() {
    let a = linear_i(vec![0, 4], vec![(0, 1)]);
    let b = linear_i(vec![0, 4], vec![(1, 1)]);
    let r = a * b;
    assert_eq!(r.kind(), SpanKind::Dense);
    assert_eq!(r.into_values(), vec![0, 2, 6, 12]);
}

#[test]
fn dense_operand_forces_dense() {
    let a = Span::Dense(vec![1, 2, 3]);
    let b = linear_i(vec![0, 3], vec![(10, 10)]);
    let r = b + a;
    assert_eq!(r.kind(), SpanKind::Dense);
    assert_eq!(r.into_values(), vec![11, 22, 33]);
}

#[test]
fn generic_op_keeps_operand_order() {
    let a = Span::sparse(vec![0, 2, 4], vec![7, 9]).unwrap();
    let b = Span::constant(4, 4i32);
    let r = a.try_zip_with(b, |x, y| x.modulo(y)).unwrap();
    assert_eq!(r.kind(), SpanKind::Sparse);
    assert_eq!(r.into_values(), vec![3, 3, 1, 1]);

    let lin = linear_i(vec![0, 4], vec![(0, 3)]);
    let r = lin.try_zip_with(Span::constant(4, 2), |x, y| x.divide(y)).unwrap();
    assert_eq!(r.kind(), SpanKind::Dense);
    assert_eq!(r.into_values(), vec![0, 1, 3, 4]);
}

#[test]
fn generic_op_reports_integer_division_by_zero() {
    let a = Span::constant(3, 5i32);
    let b = Span::sparse(vec![0, 1, 3], vec![1, 0]).unwrap();
    assert!(a.try_zip_with(b, |x, y| x.divide(y)).is_none());
}

#[test]
fn float_division_by_zero_follows_ieee() {
    let a = Span::constant(2, 1.0f32);
    let b = Span::constant(2, 0.0f32);
    let r = a.try_zip_with(b, |x, y| x.divide(y)).unwrap();
    assert!(r.iter().all(|v| v.is_infinite()));
}

#[test]
fn scale_preserves_linear_encoding() {
    let r = Span::<i32>::column_ramp(3, 2).scale(-1);
    assert_eq!(r.kind(), SpanKind::SparseLinear);
    assert_eq!(r.into_values(), vec![0, -1, -2, 0, -1, -2]);
}
