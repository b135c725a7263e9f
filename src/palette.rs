//! Palette construction and the parallel escape-count-to-colour mapping
//! (spec.md §4.4), grounded on the teacher's `storage/visualization/coloring`
//! gradient scheme but replaced with the spec's `log2`-hue formula.

use palette::{FromColor, Hsv, Srgb};

use crate::error::Error;
use crate::plane::CoordinatePlane;
use crate::pool::Pool;

/// Grows a 24-bit-RGB palette indexed by `escaped mod len`.
///
/// Entries `[0, skip_rounds)` are forced to black, visually suppressing the
/// earliest escapers. Remaining entry `i` is `hsv(360*frac(log2(i)/8), 1, 1)`
/// converted to sRGB; `i` is floored at 1 before the logarithm since `i = 0`
/// only ever falls in the forced-black range when `skip_rounds >= 1`, and
/// when `skip_rounds == 0` entry 0 still needs a defined colour.
pub struct Palette {
    entries: Vec<[u8; 3]>,
    skip_rounds: u32,
}

impl Palette {
    pub fn new(skip_rounds: u32) -> Palette {
        Palette {
            entries: Vec::new(),
            skip_rounds,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_color(i: usize) -> [u8; 3] {
        let hue = 360.0 * (((i.max(1) as f64).log2() / 8.0).fract());
        let hue = if hue < 0.0 { hue + 360.0 } else { hue };
        let hsv = Hsv::new(hue as f32, 1.0, 1.0);
        let rgb: Srgb<f32> = Srgb::from_color(hsv);
        let rgb: Srgb<u8> = rgb.into_format();
        [rgb.red, rgb.green, rgb.blue]
    }

    /// Extends the palette to `len` entries, preserving already-computed
    /// ones. A transient allocation failure is logged and leaves the
    /// palette unchanged rather than propagating (spec.md §7 "benign
    /// transient" policy) — growth never aborts an in-progress frame.
    pub fn grow(&mut self, len: usize) {
        if len <= self.entries.len() {
            return;
        }
        if self.entries.try_reserve(len - self.entries.len()).is_err() {
            tracing::warn!(requested = len, "palette grow failed, keeping previous palette");
            return;
        }
        for i in self.entries.len()..len {
            let color = if (i as u32) < self.skip_rounds {
                [0, 0, 0]
            } else {
                Self::entry_color(i)
            };
            self.entries.push(color);
        }
    }

    pub fn color_for(&self, escaped: u64) -> [u8; 3] {
        self.entries[(escaped as usize) % self.entries.len()]
    }
}

fn pack_argb(rgb: [u8; 3]) -> u32 {
    0xFF00_0000 | (rgb[0] as u32) << 16 | (rgb[1] as u32) << 8 | (rgb[2] as u32)
}

#[derive(Clone, Copy)]
struct RawPtr<T>(*mut T);
unsafe impl<T> Send for RawPtr<T> {}
impl<T> RawPtr<T> {
    unsafe fn add(self, count: usize) -> *mut T {
        unsafe { self.0.add(count) }
    }
}

#[derive(Clone, Copy)]
struct ConstRawPtr<T>(*const T);
unsafe impl<T> Send for ConstRawPtr<T> {}
impl<T> ConstRawPtr<T> {
    unsafe fn add(self, count: usize) -> *const T {
        unsafe { self.0.add(count) }
    }
}

/// Maps every pixel's final escape count through `palette` into a 32-bit
/// ARGB pixel buffer. Parallelised by contiguous row ranges (not stripes,
/// unlike the iteration engine): each row is independent and locality on
/// the output buffer matters more than balancing escaped-vs-live work.
pub fn colorize(plane: &CoordinatePlane, palette: &Palette, pool: &Pool, pixels: &mut [u32]) -> Result<(), Error> {
    let width = plane.win_width as usize;
    let height = plane.win_height as usize;
    debug_assert_eq!(pixels.len(), width * height);
    if palette.is_empty() {
        return Ok(());
    }

    let w = pool.size().min(height.max(1));
    let points = ConstRawPtr(plane.all_points.as_ptr());
    let out = RawPtr(pixels.as_mut_ptr());
    let palette_entries = ConstRawPtr(palette.entries.as_ptr());
    let palette_len = palette.entries.len();

    let lines = height / w.max(1) + 1;

    let run_range = move |row_start: usize, row_end: usize| {
        for row in row_start..row_end {
            for col in 0..width {
                let idx = row * width + col;
                let point = unsafe { &*points.add(idx) };
                let palette_idx = (point.escaped as usize) % palette_len;
                let rgb = unsafe { *palette_entries.add(palette_idx) };
                unsafe {
                    *out.add(idx) = pack_argb(rgb);
                }
            }
        }
    };

    if w < 2 {
        run_range(0, height);
        return Ok(());
    }

    for t in 0..w {
        let row_start = (t * lines).min(height);
        let row_end = if t == w - 1 { height } else { (row_start + lines).min(height) };
        pool.add(move || run_range(row_start, row_end))?;
    }
    pool.wait()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::PlaneConfig;
    use crate::xy::XY;

    #[test]
    fn skip_rounds_entries_are_black() {
        let mut palette = Palette::new(5);
        palette.grow(20);
        for i in 0..5 {
            assert_eq!(palette.entries[i], [0, 0, 0]);
        }
    }

    #[test]
    fn grow_preserves_existing_entries() {
        let mut palette = Palette::new(0);
        palette.grow(10);
        let before = palette.entries.clone();
        palette.grow(20);
        assert_eq!(&palette.entries[..10], &before[..]);
    }

    #[test]
    fn color_for_wraps_around_len_and_skip_rounds_are_black() {
        let mut palette = Palette::new(2);
        palette.grow(10);
        assert_eq!(palette.len(), 10);
        assert_eq!(palette.color_for(0), [0, 0, 0]);
        assert_eq!(palette.color_for(1), [0, 0, 0]);
        assert_eq!(palette.color_for(10), palette.color_for(0));
    }

    #[test]
    fn colorize_fills_every_pixel() {
        let config = PlaneConfig {
            width: 10,
            height: 8,
            center: XY::new(-0.5, 0.0),
            resolution_x: 4.0 / 10.0,
            resolution_y: 4.0 / 10.0,
            function_index: 0,
            seed: XY::new(-1.25643, -0.381086),
            skip_rounds: 0,
            halt_after: 0,
            num_threads: 3,
        };
        let plane = CoordinatePlane::new(config).unwrap();
        let mut palette = Palette::new(0);
        palette.grow(256);
        let pool = Pool::new(3).unwrap();
        let mut pixels = vec![0u32; 10 * 8];
        colorize(&plane, &palette, &pool, &mut pixels).unwrap();
        for &p in &pixels {
            assert_eq!(p & 0xFF00_0000, 0xFF00_0000);
        }
    }
}
