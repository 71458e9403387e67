use crate::foundation::core::FrameRgb8;
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use crate::render::window::FrameWindow;
use crate::span::{Scalar, Span};

type Texel = [f32; 3];

/// Source coordinate of one output pixel, split into a base index and a blend weight per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Tap {
    near: u32,
    far: u32,
    w: f32,
}

impl Tap {
    fn new<T: Scalar>(v: T, len: u64) -> Self {
        let last = len.saturating_sub(1) as u32;
        if T::INTEGRAL {
            let i = v.to_f64().clamp(0.0, f64::from(last)) as u32;
            return Self {
                near: i,
                far: i,
                w: 0.0,
            };
        }
        let f = v.to_f64();
        let base = f.floor();
        let near = base.clamp(0.0, f64::from(last)) as u32;
        let w = (f - base) as f32;
        if w > 0.0 && near < last {
            Self {
                near,
                far: near + 1,
                w,
            }
        } else {
            Self {
                near,
                far: near,
                w: 0.0,
            }
        }
    }
}

/// Source frame indices referenced by `zs`, ascending and deduplicated.
pub fn referenced_frames<Z: Scalar>(zs: &Span<Z>, frame_count: u64) -> Vec<u64> {
    let mut needed = vec![false; frame_count as usize];
    for z in zs.iter() {
        let tap = Tap::new(z, frame_count);
        if let Some(slot) = needed.get_mut(tap.near as usize) {
            *slot = true;
        }
        if let Some(slot) = needed.get_mut(tap.far as usize) {
            *slot = true;
        }
    }
    needed
        .iter()
        .enumerate()
        .filter_map(|(i, &n)| n.then_some(i as u64))
        .collect()
}

/// Sample one output frame from resident source frames.
///
/// Integer coordinates read the nearest pixel. Fractional coordinates blend linearly in x, then y,
/// then across the two bracketing frames; each blend is `w * far + (1 - w) * near`.
pub fn sample_frame<C: Scalar, Z: Scalar>(
    xs: &Span<C>,
    ys: &Span<C>,
    zs: &Span<Z>,
    window: &FrameWindow,
    width: u32,
    height: u32,
) -> FilmWarpResult<FrameRgb8> {
    let n = width as usize * height as usize;
    if xs.len() != n || ys.len() != n || zs.len() != n {
        return Err(FilmWarpError::evaluation(format!(
            "coordinate spans cover {}/{}/{} pixels, expected {n}",
            xs.len(),
            ys.len(),
            zs.len()
        )));
    }
    let frame_count = window.frame_count();
    if frame_count == 0 {
        return Err(FilmWarpError::io("source produced no frames"));
    }

    let mut out = FrameRgb8::black(width, height);
    for (i, ((x, y), z)) in xs.iter().zip(ys.iter()).zip(zs.iter()).enumerate() {
        let zt = Tap::new(z, frame_count);
        let near = resident(window, zt.near)?;
        let (tx, ty) = (Tap::new(x, near.width.into()), Tap::new(y, near.height.into()));

        let mut c = bilinear(near, tx, ty);
        if zt.w > 0.0 {
            let far = bilinear(resident(window, zt.far)?, tx, ty);
            c = blend(c, far, zt.w);
        }

        let off = i * 3;
        out.data[off..off + 3].copy_from_slice(&compress(c));
    }
    Ok(out)
}

fn resident(window: &FrameWindow, idx: u32) -> FilmWarpResult<&FrameRgb8> {
    window
        .frame(u64::from(idx))
        .ok_or_else(|| FilmWarpError::evaluation(format!("source frame {idx} is not resident")))
}

fn bilinear(frame: &FrameRgb8, tx: Tap, ty: Tap) -> Texel {
    let row = |y: u32| {
        let near = texel(frame, tx.near, y);
        if tx.w > 0.0 {
            blend(near, texel(frame, tx.far, y), tx.w)
        } else {
            near
        }
    };
    let top = row(ty.near);
    if ty.w > 0.0 {
        blend(top, row(ty.far), ty.w)
    } else {
        top
    }
}

fn texel(frame: &FrameRgb8, x: u32, y: u32) -> Texel {
    frame.pixel(x, y).map(f32::from)
}

fn blend(near: Texel, far: Texel, w: f32) -> Texel {
    [
        w * far[0] + (1.0 - w) * near[0],
        w * far[1] + (1.0 - w) * near[1],
        w * far[2] + (1.0 - w) * near[2],
    ]
}

fn compress(c: Texel) -> [u8; 3] {
    // Truncate toward zero, then saturate.
    c.map(|v| (v as i32).clamp(0, 255) as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/render/sampler.rs"]
mod tests;
