use super::*;
use crate::foundation::core::Fps;

#[test]
fn encoder_reads_raw_rgb24_at_the_source_rate() {
    let cfg = SinkConfig {
        width: 5,
        height: 3,
        fps: Fps::new(30000, 1001).unwrap(),
        frame_count: 10,
    };
    let opts = FfmpegSinkOpts {
        out_path: PathBuf::from("clip.mkv"),
        overwrite: false,
    };
    let args: Vec<String> = encoder_args(&cfg, &opts)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args[0], "-n");
    let pos = |s: &str| args.iter().position(|a| a == s).unwrap();
    assert_eq!(args[pos("-s") + 1], "5x3");
    assert_eq!(args[pos("-r") + 1], "30000/1001");
    assert_eq!(args[pos("-pix_fmt") + 1], "rgb24");
    assert!(pos("-r") < pos("-i"));
    assert_eq!(args.last().map(String::as_str), Some("clip.mkv"));
}

#[test]
fn h264_containers_pad_to_even_sizes() {
    let args = output_codec_args(Path::new("out/clip.MP4"));
    assert!(args.contains(&"libx264"));
    assert!(args.contains(&"pad=ceil(iw/2)*2:ceil(ih/2)*2"));
    assert!(output_codec_args(Path::new("anim.gif")).is_empty());
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    assert!(
        sink.push_frame(FrameIndex(0), &FrameRgb8::black(2, 2))
            .is_err()
    );
    assert!(sink.end().is_err());
}

#[test]
fn ffmpeg_sink_encodes_in_order_frames() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let dir = std::env::temp_dir().join(format!("filmwarp_ffsink_{}", std::process::id()));
    let path = dir.join("out.avi");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&path));
    sink.begin(SinkConfig {
        width: 4,
        height: 2,
        fps: Fps::default(),
        frame_count: 3,
    })
    .unwrap();
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &FrameRgb8::black(4, 2)).unwrap();
    }
    assert!(
        sink.push_frame(FrameIndex(1), &FrameRgb8::black(4, 2))
            .is_err()
    );
    sink.end().unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);

    std::fs::remove_dir_all(&dir).unwrap();
}
