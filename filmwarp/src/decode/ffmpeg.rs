use crate::decode::source::{FrameSource, SourceInfo};
use crate::foundation::core::{Fps, FrameRgb8};
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

/// Streaming decoder backed by a child `ffmpeg` writing raw `rgb24` frames to a pipe.
///
/// Rewinding kills the child and spawns a fresh one reading from the start.
pub struct FfmpegSource {
    program: OsString,
    path: PathBuf,
    info: SourceInfo,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frame_len: usize,
}

impl FfmpegSource {
    /// Probe `path` with `ffprobe` and start decoding from frame 0.
    pub fn open(path: &Path) -> FilmWarpResult<Self> {
        let info = probe_source(path)?;
        Self::spawn_with("ffmpeg".into(), path, info)
    }

    /// Start decoding `path` with the given decoder executable and already probed metadata.
    pub(crate) fn spawn_with(
        program: OsString,
        path: &Path,
        info: SourceInfo,
    ) -> FilmWarpResult<Self> {
        let frame_len = info.width as usize * info.height as usize * 3;
        if frame_len == 0 {
            return Err(FilmWarpError::io(format!(
                "'{}' reports a zero-sized video stream",
                path.display()
            )));
        }
        let mut source = Self {
            program,
            path: path.to_path_buf(),
            info,
            child: None,
            stdout: None,
            stderr_drain: None,
            frame_len,
        };
        source.spawn()?;
        Ok(source)
    }

    fn spawn(&mut self) -> FilmWarpResult<()> {
        let mut child = Command::new(&self.program)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(&self.path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                FilmWarpError::io(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FilmWarpError::io("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| FilmWarpError::io("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdout = Some(stdout);
        self.stderr_drain = Some(stderr_drain);
        Ok(())
    }

    /// Reap a decoder whose output ended. Only a clean exit counts as the end of the stream.
    fn finish(&mut self) -> FilmWarpResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| FilmWarpError::io(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr = self.collect_stderr();
        if !status.success() {
            return Err(FilmWarpError::io(format!(
                "ffmpeg failed decoding '{}' ({status}): {}",
                self.path.display(),
                stderr.as_deref().unwrap_or("no diagnostics")
            )));
        }
        if let Some(stderr) = stderr {
            tracing::debug!(%stderr, "ffmpeg decoder finished");
        }
        Ok(())
    }

    /// Kill the decoder mid-stream, for rewinds and drops.
    fn shutdown(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            // The child may already have exited; either way it must be reaped.
            let _ = child.kill();
            let _ = child.wait();
        }
        let _ = self.collect_stderr();
    }

    fn collect_stderr(&mut self) -> Option<String> {
        self.stderr_drain
            .take()
            .and_then(|h| h.join().ok())
            .and_then(Result::ok)
            .map(|b| String::from_utf8_lossy(&b).trim().to_owned())
            .filter(|s| !s.is_empty())
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn decode_next(&mut self) -> FilmWarpResult<Option<FrameRgb8>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.frame_len];
        let got = read_full(stdout, &mut buf).map_err(|e| {
            FilmWarpError::io(format!("failed to read frame from ffmpeg: {e}"))
        })?;
        if got < self.frame_len {
            if got > 0 {
                tracing::warn!(
                    got,
                    expected = self.frame_len,
                    "ffmpeg produced a truncated trailing frame; dropping it"
                );
            }
            self.finish()?;
            return Ok(None);
        }
        Ok(Some(FrameRgb8::from_raw(
            self.info.width,
            self.info.height,
            buf,
        )?))
    }

    fn seek_to_start(&mut self) -> FilmWarpResult<()> {
        self.shutdown();
        self.spawn()
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn read_full(r: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Probe width, height, frame rate and frame count of the first video stream through `ffprobe`.
pub fn probe_source(path: &Path) -> FilmWarpResult<SourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        pix_fmt: Option<String>,
        avg_frame_rate: Option<String>,
        r_frame_rate: Option<String>,
        nb_frames: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| FilmWarpError::io(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(FilmWarpError::io(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| FilmWarpError::io(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| FilmWarpError::io(format!("no video stream in '{}'", path.display())))?;
    let width = stream
        .width
        .ok_or_else(|| FilmWarpError::io("missing video width from ffprobe"))?;
    let height = stream
        .height
        .ok_or_else(|| FilmWarpError::io("missing video height from ffprobe"))?;

    // "0/0" shows up for streams without timing; fall back to the other field, then the default.
    let fps = [&stream.avg_frame_rate, &stream.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|r| Fps::parse_ratio(r).ok())
        .unwrap_or_default();

    let duration = stream
        .duration
        .as_deref()
        .or(parsed.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|d| d.parse::<f64>().ok());
    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .or_else(|| duration.map(|d| (d * fps.as_f64()).round().max(1.0) as u64))
        .unwrap_or(1);

    Ok(SourceInfo {
        width,
        height,
        fps,
        frame_count,
        pixel_format: stream.pix_fmt.clone().unwrap_or_else(|| "unknown".to_owned()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/decode/ffmpeg.rs"]
mod tests;
