use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRgb8};
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

/// Options for [`FfmpegSink`] output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file path; the container follows its extension.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Create options for writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw `rgb24` frames to stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

/// A running `ffmpeg` child fed through stdin, with stderr collected on a side thread.
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    written: u64,
}

impl Encoder {
    fn spawn(args: Vec<OsString>) -> FilmWarpResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FilmWarpError::io(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut bytes = Vec::new();
                pipe.read_to_end(&mut bytes)?;
                Ok(bytes)
            })
        });
        if stdin.is_none() || stderr.is_none() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(FilmWarpError::io("ffmpeg started without piped stdio"));
        }
        Ok(Self {
            child,
            stdin,
            stderr,
            written: 0,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> FilmWarpResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| FilmWarpError::evaluation("ffmpeg sink is already finalized"))?;
        stdin
            .write_all(bytes)
            .map_err(|e| FilmWarpError::io(format!("failed to write frame to ffmpeg: {e}")))?;
        self.written += 1;
        Ok(())
    }

    /// Close stdin and wait for the encoder, surfacing its stderr on failure.
    fn finish(mut self) -> FilmWarpResult<u64> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| FilmWarpError::io(format!("failed to wait for ffmpeg: {e}")))?;
        let log = self.collect_stderr()?;
        if !status.success() {
            return Err(FilmWarpError::io(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        Ok(self.written)
    }

    fn collect_stderr(&mut self) -> FilmWarpResult<Vec<u8>> {
        let Some(handle) = self.stderr.take() else {
            return Ok(Vec::new());
        };
        handle
            .join()
            .map_err(|_| FilmWarpError::evaluation("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| FilmWarpError::io(format!("ffmpeg stderr read failed: {e}")))
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        // Only reached when `finish` was skipped, e.g. a failed run.
        if self.stdin.take().is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
            let _ = self.collect_stderr();
        }
    }
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> FilmWarpResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(FilmWarpError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(FilmWarpError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        let out = &self.opts.out_path;
        ensure_parent_dir(out)?;
        if !self.opts.overwrite && out.exists() {
            return Err(FilmWarpError::io(format!(
                "output file '{}' already exists",
                out.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(FilmWarpError::io(
                "ffmpeg is required for video output, but was not found on PATH",
            ));
        }

        tracing::debug!(
            path = %out.display(),
            width = cfg.width,
            height = cfg.height,
            frames = cfg.frame_count,
            "spawning ffmpeg encoder"
        );
        self.encoder = Some(Encoder::spawn(encoder_args(&cfg, &self.opts))?);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FilmWarpResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg.as_ref(), self.encoder.as_mut()) else {
            return Err(FilmWarpError::evaluation("ffmpeg sink not started"));
        };
        if self.last_idx.is_some_and(|last| idx.0 <= last.0) {
            return Err(FilmWarpError::evaluation(format!(
                "ffmpeg sink received frame {} out of order",
                idx.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(FilmWarpError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        encoder.write(&frame.data)?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> FilmWarpResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| FilmWarpError::evaluation("ffmpeg sink not started"))?;
        let written = encoder.finish()?;
        tracing::debug!(
            frames = written,
            path = %self.opts.out_path.display(),
            "ffmpeg encoder finished"
        );
        self.cfg = None;
        Ok(())
    }
}

/// Full `ffmpeg` command line for raw `rgb24` input on stdin.
fn encoder_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    args.push(if opts.overwrite { "-y" } else { "-n" }.into());
    for a in ["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"] {
        args.push(a.into());
    }
    args.push("-s".into());
    args.push(format!("{}x{}", cfg.width, cfg.height).into());
    // `-r` before `-i` sets the rate of the raw input.
    args.push("-r".into());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den).into());
    for a in ["-i", "pipe:0", "-an"] {
        args.push(a.into());
    }
    args.extend(output_codec_args(&opts.out_path).into_iter().map(OsString::from));
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Encoder arguments for the destination container.
///
/// H.264 containers get yuv420p, which needs even dimensions, so odd sizes are padded by one pixel.
/// Other containers use ffmpeg's default codec for the extension.
fn output_codec_args(path: &Path) -> Vec<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp4" | "m4v" | "mov" | "mkv") => vec![
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-movflags",
            "+faststart",
        ],
        _ => Vec::new(),
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> FilmWarpResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
