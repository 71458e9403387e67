use super::*;

#[test]
fn frame_range_length_and_membership() {
    let r = FrameRange { start: 3, end: 5 };
    assert_eq!(r.len_frames(), 2);
    assert!(r.contains(3));
    assert!(!r.contains(5));
}

#[test]
fn frame_range_limit_clips_both_ends() {
    let r = FrameRange { start: 8, end: 20 };
    assert_eq!(r.limit(10), FrameRange { start: 8, end: 10 });
    assert_eq!(r.limit(4), FrameRange { start: 4, end: 4 });
    assert!(r.limit(4).is_empty());
}

#[test]
fn fps_parses_ffprobe_ratios() {
    assert_eq!(Fps::parse_ratio("30000/1001").unwrap(), Fps { num: 30000, den: 1001 });
    assert_eq!(Fps::parse_ratio("25").unwrap(), Fps { num: 25, den: 1 });
    assert!(Fps::parse_ratio("0/0").is_err());
    assert!(Fps::parse_ratio("abc").is_err());
}

#[test]
fn frame_pixels_are_row_major() {
    let mut f = FrameRgb8::black(3, 2);
    f.set_pixel(2, 1, [1, 2, 3]);
    assert_eq!(f.pixel(2, 1), [1, 2, 3]);
    assert_eq!(&f.data[15..18], &[1, 2, 3]);
    assert!(FrameRgb8::from_raw(2, 2, vec![0; 11]).is_err());
}
