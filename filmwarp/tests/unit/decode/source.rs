use super::*;
use crate::decode::still::{StillImageSource, is_still_image};

fn solid(width: u32, height: u32, v: u8) -> FrameRgb8 {
    FrameRgb8::from_raw(width, height, vec![v; (width * height * 3) as usize]).unwrap()
}

#[test]
fn in_memory_source_decodes_sequentially_and_rewinds() {
    let mut src =
        InMemorySource::new(vec![solid(2, 2, 1), solid(2, 2, 2)], Fps::default()).unwrap();
    assert_eq!(src.info().frame_count, 2);
    assert_eq!(src.decode_next().unwrap().unwrap().data[0], 1);
    assert_eq!(src.decode_next().unwrap().unwrap().data[0], 2);
    assert!(src.decode_next().unwrap().is_none());

    src.seek_to_start().unwrap();
    assert_eq!(src.rewinds(), 1);
    assert_eq!(src.decode_next().unwrap().unwrap().data[0], 1);
}

#[test]
fn in_memory_source_rejects_mixed_sizes_and_empty_input() {
    assert!(InMemorySource::new(vec![solid(2, 2, 0), solid(3, 2, 0)], Fps::default()).is_err());
    assert!(InMemorySource::new(Vec::new(), Fps::default()).is_err());
}

#[test]
fn reported_frame_count_can_overstate() {
    let src = InMemorySource::new(vec![solid(1, 1, 0)], Fps::default())
        .unwrap()
        .with_reported_frames(10);
    assert_eq!(src.info().frame_count, 10);
}

#[test]
fn open_source_reports_missing_files_as_io_errors() {
    let err = match open_source(Path::new("/definitely/not/here.mp4")) {
        Ok(_) => panic!("missing source opened"),
        Err(e) => e,
    };
    assert!(matches!(err, FilmWarpError::Io(_)));
}

#[test]
fn still_images_are_one_frame_sources() {
    assert!(is_still_image(Path::new("a/b.PNG")));
    assert!(is_still_image(Path::new("c.jpeg")));
    assert!(!is_still_image(Path::new("clip.mp4")));
    assert!(!is_still_image(Path::new("noext")));

    let dir = std::env::temp_dir().join(format!("filmwarp_still_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("in.png");
    let mut img = image::RgbImage::new(3, 2);
    img.put_pixel(2, 1, image::Rgb([9, 8, 7]));
    img.save(&path).unwrap();

    let mut src = open_source(&path).unwrap();
    assert_eq!(src.info().width, 3);
    assert_eq!(src.info().height, 2);
    assert_eq!(src.info().frame_count, 1);
    let frame = src.decode_next().unwrap().unwrap();
    assert_eq!(frame.pixel(2, 1), [9, 8, 7]);
    assert!(src.decode_next().unwrap().is_none());
    src.seek_to_start().unwrap();
    assert!(src.decode_next().unwrap().is_some());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn still_source_rejects_empty_frames() {
    assert!(StillImageSource::from_frame(FrameRgb8::black(0, 4)).is_err());
}
