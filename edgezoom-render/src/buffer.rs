use crate::frame::Frame;

const INSIDE: [u8; 4] = [0, 0, 0, 255];
const OUTSIDE: [u8; 4] = [255, 255, 255, 255];

/// An RGBA pixel buffer representing a rendered frame.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new buffer filled with black (opaque).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: INSIDE.repeat(width as usize * height as usize),
        }
    }

    /// Binary rendering: bounded pixels black, escaped pixels white.
    pub fn from_frame(frame: &Frame) -> Self {
        let mut pixels = Vec::with_capacity(frame.outcomes().len() * 4);
        for outcome in frame.outcomes() {
            pixels.extend_from_slice(if outcome.escaped { &OUTSIDE } else { &INSIDE });
        }
        Self {
            width: frame.width(),
            height: frame.height(),
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgezoom_core::IterationOutcome;

    #[test]
    fn new_buffer_is_black_opaque() {
        let buf = RenderBuffer::new(4, 4);
        assert_eq!(buf.pixels.len(), 4 * 4 * 4);
        for chunk in buf.pixels.chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn escaped_is_white_bounded_is_black() {
        let data = vec![
            IterationOutcome::escaped(3),
            IterationOutcome::bounded(10),
            IterationOutcome::escaped(9),
        ];
        let frame = Frame::from_outcomes(3, 1, 10, data).unwrap();
        let buf = RenderBuffer::from_frame(&frame);
        assert_eq!((buf.width, buf.height), (3, 1));
        assert_eq!(&buf.pixels[0..4], &[255, 255, 255, 255]);
        assert_eq!(&buf.pixels[4..8], &[0, 0, 0, 255]);
        // No shading: the count does not change the color.
        assert_eq!(&buf.pixels[8..12], &[255, 255, 255, 255]);
    }
}
