//! PNG snapshots with embedded view metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use edgezoom_core::{FractalParams, FractalSpec, ViewWindow};

use crate::buffer::RenderBuffer;

/// Significant digits written for plane coordinates.
const COORD_DIGITS: usize = 40;

/// Metadata to embed in an exported PNG as tEXt chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMetadata {
    pub fractal_type: String,
    pub julia_c: Option<String>,
    pub center_re: String,
    pub center_im: String,
    pub scale: String,
    pub precision_bits: u32,
    pub step: u64,
    pub max_iterations: u32,
    pub escape_radius: f64,
}

impl ExportMetadata {
    /// Describe the view a frame was evaluated over.
    pub fn new(spec: &FractalSpec, view: &ViewWindow, params: FractalParams, step: u64) -> Self {
        let center = view.center();
        Self {
            fractal_type: spec.kind().label().to_string(),
            julia_c: spec.julia_constant().map(|c| c.to_string_digits(12)),
            center_re: center.re.to_string_radix(10, Some(COORD_DIGITS)),
            center_im: center.im.to_string_radix(10, Some(COORD_DIGITS)),
            scale: view.scale().to_string_radix(10, Some(6)),
            precision_bits: view.precision(),
            step,
            max_iterations: params.max_iterations,
            escape_radius: params.escape_radius,
        }
    }

    fn description(&self) -> String {
        let mut desc = format!(
            "{} - Center: {} {}i, Scale: {}, Step: {}",
            self.fractal_type, self.center_re, self.center_im, self.scale, self.step,
        );
        if let Some(c) = &self.julia_c {
            desc.push_str(&format!(", Julia C: {c}"));
        }
        desc
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("EdgeZoom.FractalType".into(), self.fractal_type.clone()),
            ("EdgeZoom.CenterRe".into(), self.center_re.clone()),
            ("EdgeZoom.CenterIm".into(), self.center_im.clone()),
            ("EdgeZoom.Scale".into(), self.scale.clone()),
            ("EdgeZoom.PrecisionBits".into(), self.precision_bits.to_string()),
            ("EdgeZoom.Step".into(), self.step.to_string()),
            ("EdgeZoom.MaxIterations".into(), self.max_iterations.to_string()),
            ("EdgeZoom.EscapeRadius".into(), self.escape_radius.to_string()),
        ];
        if let Some(c) = &self.julia_c {
            pairs.push(("EdgeZoom.JuliaC".into(), c.clone()));
        }
        pairs
    }
}

/// Write a render buffer as an RGBA PNG with the metadata as tEXt chunks.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "EdgeZoom".to_string())?;
    encoder.add_text_chunk("Description".to_string(), metadata.description())?;
    for (key, value) in metadata.pairs() {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;

    debug!(
        width = buffer.width,
        height = buffer.height,
        path = %path.display(),
        "Exported PNG"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgezoom_core::PreciseComplex;
    use std::io::Read;

    fn julia_metadata() -> ExportMetadata {
        let spec = FractalSpec::julia(PreciseComplex::parse("-0.8", "0.156", 100).unwrap());
        let view = ViewWindow::default_julia(100).unwrap();
        ExportMetadata::new(&spec, &view, FractalParams::default(), 17)
    }

    #[test]
    fn export_creates_valid_png() {
        let buffer = RenderBuffer::new(4, 4);
        let dir = std::env::temp_dir().join("edgezoom_test_export");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_export.png");
        export_png(&buffer, &path, &julia_metadata()).expect("export should succeed");

        let mut file = std::fs::File::open(&path).expect("file should exist");
        let mut header = [0u8; 8];
        file.read_exact(&mut header).expect("should read header");
        assert_eq!(&header, b"\x89PNG\r\n\x1a\n", "valid PNG signature");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_text_chunks() {
        let buffer = RenderBuffer::new(2, 2);
        let dir = std::env::temp_dir().join("edgezoom_test_export_meta");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_meta.png");
        export_png(&buffer, &path, &julia_metadata()).expect("export should succeed");

        let decoder = png::Decoder::new(std::fs::File::open(&path).expect("file should exist"));
        let reader = decoder.read_info().expect("should read info");
        let texts = &reader.info().uncompressed_latin1_text;
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Software" && t.text == "EdgeZoom"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "EdgeZoom.FractalType" && t.text == "Julia"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "EdgeZoom.Step" && t.text == "17"));
        assert!(texts.iter().any(|t| t.keyword == "EdgeZoom.JuliaC"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let buffer = RenderBuffer::new(2, 2);
        let path = std::env::temp_dir()
            .join("edgezoom_no_such_dir")
            .join("nested")
            .join("x.png");
        let r = export_png(&buffer, &path, &julia_metadata());
        assert!(matches!(r, Err(crate::RenderError::Io(_))));
    }
}
