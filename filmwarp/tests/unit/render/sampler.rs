use super::*;
use crate::decode::source::InMemorySource;
use crate::foundation::core::{Fps, FrameRange};

/// Two 2x1 frames: frame 0 is [0, 100] in every channel, frame 1 is [50, 200].
fn window() -> FrameWindow {
    let f0 = FrameRgb8::from_raw(2, 1, vec![0, 0, 0, 100, 100, 100]).unwrap();
    let f1 = FrameRgb8::from_raw(2, 1, vec![50, 50, 50, 200, 200, 200]).unwrap();
    let mut w = FrameWindow::new(Box::new(
        InMemorySource::new(vec![f0, f1], Fps::default()).unwrap(),
    ));
    w.ensure_loaded(FrameRange { start: 0, end: 2 }).unwrap();
    w
}

fn red(frame: &FrameRgb8) -> Vec<u8> {
    frame.data.chunks_exact(3).map(|p| p[0]).collect()
}

#[test]
fn integer_coordinates_read_nearest_pixels() {
    let w = window();
    let xs = Span::Dense(vec![1i32, 0]);
    let ys = Span::constant(2, 0i32);
    let zs = Span::constant(2, 1i32);
    let out = sample_frame(&xs, &ys, &zs, &w, 2, 1).unwrap();
    assert_eq!(red(&out), vec![200, 50]);
}

#[test]
fn fractional_x_blends_neighbours() {
    let w = window();
    let xs = Span::Dense(vec![0.25f32, 0.5]);
    let ys = Span::constant(2, 0.0f32);
    let zs = Span::constant(2, 0i32);
    let out = sample_frame(&xs, &ys, &zs, &w, 2, 1).unwrap();
    assert_eq!(red(&out), vec![25, 50]);
}

#[test]
fn fractional_z_blends_bracketing_frames() {
    let w = window();
    let xs = Span::Dense(vec![0i32, 1]);
    let ys = Span::constant(2, 0i32);
    let zs = Span::constant(2, 0.5f32);
    let out = sample_frame(&xs, &ys, &zs, &w, 2, 1).unwrap();
    assert_eq!(red(&out), vec![25, 150]);
}

#[test]
fn results_truncate_toward_zero() {
    let w = window();
    let xs = Span::Dense(vec![0.333f32, 0.0]);
    let ys = Span::constant(2, 0.0f32);
    let zs = Span::constant(2, 0.0f32);
    let out = sample_frame(&xs, &ys, &zs, &w, 2, 1).unwrap();
    // 0.333 * 100 = 33.3 -> 33
    assert_eq!(red(&out), vec![33, 0]);
}

#[test]
fn out_of_range_coordinates_clamp_to_the_edge() {
    let w = window();
    let xs = Span::Dense(vec![-3i32, 9]);
    let ys = Span::constant(2, 4i32);
    let zs = Span::constant(2, 7i32);
    let out = sample_frame(&xs, &ys, &zs, &w, 2, 1).unwrap();
    assert_eq!(red(&out), vec![50, 200]);
}

#[test]
fn missing_frames_are_reported() {
    let mut w = window();
    w.evict_outside(FrameRange { start: 0, end: 1 });
    let xs = Span::constant(2, 0i32);
    let zs = Span::constant(2, 1i32);
    assert!(sample_frame(&xs, &xs, &zs, &w, 2, 1).is_err());
}

#[test]
fn span_length_mismatch_is_an_error() {
    let w = window();
    let xs = Span::constant(3, 0i32);
    let zs = Span::constant(2, 0i32);
    assert!(sample_frame(&xs, &xs, &zs, &w, 2, 1).is_err());
}

#[test]
fn referenced_frames_include_blend_partners() {
    let zs = Span::Dense(vec![0.0f32, 2.5, 2.0, 9.0]);
    assert_eq!(referenced_frames(&zs, 5), vec![0, 2, 3, 4]);
    let zi = Span::constant(4, 1i32);
    assert_eq!(referenced_frames(&zi, 5), vec![1]);
}
