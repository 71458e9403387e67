use super::*;

fn cfg(width: u32, height: u32, frame_count: u64) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::default(),
        frame_count,
    }
}

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("filmwarp_{tag}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn in_memory_sink_captures_config_and_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 1, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &FrameRgb8::black(2, 1)).unwrap();
    sink.push_frame(FrameIndex(1), &FrameRgb8::black(2, 1)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config().map(|c| c.frame_count), Some(2));
    assert_eq!(sink.frames().len(), 2);
    assert!(sink.is_finished());
}

#[test]
fn image_sink_writes_the_last_frame() {
    let dir = temp_dir("imgsink");
    let path = dir.join("nested").join("out.png");
    let mut sink = ImageSink::new(&path);
    sink.begin(cfg(2, 1, 2)).unwrap();

    let mut first = FrameRgb8::black(2, 1);
    first.set_pixel(0, 0, [1, 1, 1]);
    let mut last = FrameRgb8::black(2, 1);
    last.set_pixel(1, 0, [200, 100, 50]);
    sink.push_frame(FrameIndex(0), &first).unwrap();
    sink.push_frame(FrameIndex(1), &last).unwrap();
    sink.end().unwrap();

    let img = image::open(&path).unwrap().into_rgb8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(img.get_pixel(1, 0).0, [200, 100, 50]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn image_sink_without_frames_fails_on_end() {
    let dir = temp_dir("imgsink_empty");
    let mut sink = ImageSink::new(dir.join("out.png"));
    sink.begin(cfg(1, 1, 1)).unwrap();
    assert!(sink.end().is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn image_sink_rejects_unknown_extensions() {
    let mut sink = ImageSink::new("out.unknownext");
    assert!(matches!(sink.begin(cfg(1, 1, 1)), Err(FilmWarpError::Io(_))));
}

#[test]
fn open_sink_writes_image_destinations_directly() {
    let dir = temp_dir("open_sink");
    let path = dir.join("single.bmp");
    let mut sink = open_sink(&path, 1);
    sink.begin(cfg(1, 1, 1)).unwrap();
    let mut f = FrameRgb8::black(1, 1);
    f.set_pixel(0, 0, [9, 8, 7]);
    sink.push_frame(FrameIndex(0), &f).unwrap();
    sink.end().unwrap();

    let img = image::open(&path).unwrap().into_rgb8();
    assert_eq!(img.get_pixel(0, 0).0, [9, 8, 7]);
    std::fs::remove_dir_all(&dir).unwrap();
}
