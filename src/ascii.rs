//! Headless ASCII rendering backend (spec.md §6, "ASCII output").

use std::io::Write;

use crate::plane::CoordinatePlane;

/// Maps an escape count to the glyph spec.md's ASCII backend prints for it:
/// 0 -> space; 1-9 -> that digit; 10-35 -> uppercase; 36-61 -> lowercase;
/// otherwise `*`.
pub fn glyph_for(escaped: u64) -> char {
    match escaped {
        0 => ' ',
        1..=9 => (b'0' + escaped as u8) as char,
        10..=35 => (b'A' + (escaped - 10) as u8) as char,
        36..=61 => (b'a' + (escaped - 36) as u8) as char,
        _ => '*',
    }
}

/// Clears the screen and redraws the plane as `height` rows of `width`
/// glyphs, followed by a status line.
pub fn render(plane: &CoordinatePlane, function_name: &str, out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "\x1b[H\x1b[2J")?;
    let width = plane.win_width as usize;
    for row in 0..plane.win_height as usize {
        let mut line = String::with_capacity(width);
        for col in 0..width {
            line.push(glyph_for(plane.all_points[row * width + col].escaped));
        }
        writeln!(out, "{line}")?;
    }
    writeln!(
        out,
        "{function_name} iteration {} - escaped: {} not: {}",
        plane.iteration_count,
        plane.escaped,
        plane.trapped + plane.live.len()
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_table_matches_spec_boundaries() {
        assert_eq!(glyph_for(0), ' ');
        assert_eq!(glyph_for(1), '1');
        assert_eq!(glyph_for(9), '9');
        assert_eq!(glyph_for(10), 'A');
        assert_eq!(glyph_for(35), 'Z');
        assert_eq!(glyph_for(36), 'a');
        assert_eq!(glyph_for(61), 'z');
        assert_eq!(glyph_for(62), '*');
        assert_eq!(glyph_for(1_000_000), '*');
    }

    #[test]
    fn render_emits_clear_sequence_and_status_line() {
        use crate::plane::PlaneConfig;
        use crate::xy::XY;
        let config = PlaneConfig {
            width: 5,
            height: 3,
            center: XY::new(-0.5, 0.0),
            resolution_x: 4.0 / 5.0,
            resolution_y: 4.0 / 5.0,
            function_index: 0,
            seed: XY::new(-1.25643, -0.381086),
            skip_rounds: 0,
            halt_after: 0,
            num_threads: 1,
        };
        let plane = CoordinatePlane::new(config).unwrap();
        let mut buf = Vec::new();
        render(&plane, "Mandelbrot", &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("\x1b[H\x1b[2J"));
        assert!(text.contains("escaped:"));
        assert!(text.contains("not:"));
    }

    /// spec.md §8 invariant 1: `escaped + trapped + live.len() ==
    /// width*height`, so a correct status line's `escaped + not` must cover
    /// every pixel even when the viewport contains trapped points (as the
    /// literal scenario-1 viewport, which covers the main cardioid, does).
    #[test]
    fn status_line_not_count_includes_trapped_points() {
        use crate::plane::PlaneConfig;
        use crate::xy::XY;
        let config = PlaneConfig {
            width: 20,
            height: 10,
            center: XY::new(-0.5, 0.0),
            resolution_x: 4.0 / 20.0,
            resolution_y: 4.0 / 20.0,
            function_index: 0,
            seed: XY::new(-1.25643, -0.381086),
            skip_rounds: 0,
            halt_after: 0,
            num_threads: 1,
        };
        let plane = CoordinatePlane::new(config).unwrap();
        assert!(plane.trapped > 0, "viewport should contain cardioid/bulb points");

        let mut buf = Vec::new();
        render(&plane, "Mandelbrot", &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let status = text.lines().next_back().unwrap();

        let not: usize = status
            .rsplit("not: ")
            .next()
            .unwrap()
            .parse()
            .expect("trailing not: count parses");
        assert_eq!(plane.escaped + not, (plane.win_width * plane.win_height) as usize);
        assert_eq!(not, plane.trapped + plane.live.len());
    }
}
