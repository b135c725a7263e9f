//! PNG export (spec.md §11 supplemented feature), adapted from the
//! teacher's `gui/iced/file_save.rs`.

use std::fs::File;
use std::io::BufWriter;

/// Writes `pixels` (ARGB, row-major, `width*height` words) to `path` as PNG.
pub fn write_image_png(path: &str, width: u32, height: u32, pixels: &[u32]) {
    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(path, error = %e, "failed to create PNG output file");
            return;
        }
    };
    let mut writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(&mut writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut rgba = Vec::with_capacity(pixels.len() * 4);
    for argb in pixels {
        let [a, r, g, b] = argb.to_be_bytes();
        rgba.extend_from_slice(&[r, g, b, a]);
    }

    match encoder.write_header() {
        Ok(mut png_writer) => {
            if let Err(e) = png_writer.write_image_data(&rgba) {
                tracing::warn!(path, error = %e, "failed to write PNG image data");
            }
        }
        Err(e) => tracing::warn!(path, error = %e, "failed to write PNG header"),
    }
}

/// Shows a native save-file dialog; `None` if the user cancels.
pub fn show_save_file_dialog() -> Option<String> {
    rfd::FileDialog::new()
        .set_file_name("fractal.png")
        .save_file()
        .and_then(|p| p.into_os_string().into_string().ok())
}
