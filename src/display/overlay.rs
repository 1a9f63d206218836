use crate::fitness::FitnessScore;
use crate::raster::{Canvas, Image};
use font8x8::legacy::BASIC_LEGACY;

const GLYPH_SIZE: i64 = 8;

const TEXT_COLOR: [u8; 3] = [255, 0, 0];
const LINE_ORIGINS: [(i64, i64); 2] = [(10, 8), (10, 38)];
pub const LOCKED_LABEL: &str = "LOCKED";

/// Telemetry shown on the debug line.
#[derive(Debug, Clone)]
pub struct OverlayInfo<'a> {
    pub target_id: &'a str,
    pub brush_name: &'a str,
    pub update_time_micros: u64,
    pub score: FitnessScore,
    pub fps: String,
}

pub fn debug_line(info: &OverlayInfo<'_>) -> String {
    format!(
        "{}-{} {} us, {} score {} fps",
        info.target_id, info.brush_name, info.update_time_micros, info.score, info.fps
    )
}

/// Draws the debug line (and the lock marker when `locked`) onto a private
/// copy of `frame`. The caller's image is left as it was.
pub fn annotate(frame: &Image, info: &OverlayInfo<'_>, locked: bool) -> Image {
    let mut canvas = Canvas::copy_of(frame);
    let scale = if frame.width() >= 480 { 2 } else { 1 };

    let (x, y) = LINE_ORIGINS[0];
    draw_text(&mut canvas, x, y, &debug_line(info), TEXT_COLOR, scale);
    if locked {
        let (x, y) = LINE_ORIGINS[1];
        draw_text(&mut canvas, x, y, LOCKED_LABEL, TEXT_COLOR, scale);
    }
    canvas.into_image()
}

/// Writes `text` with the 8x8 legacy bitmap font, top-left corner at `(x, y)`.
/// Characters outside ASCII are drawn as `?`.
pub fn draw_text(canvas: &mut Canvas, x: i64, y: i64, text: &str, rgb: [u8; 3], scale: u32) {
    let scale = scale.max(1) as i64;
    let advance = GLYPH_SIZE * scale;
    for (i, ch) in text.chars().enumerate() {
        let gx = x + i as i64 * advance;
        for (ry, bits) in glyph_for_char(ch).iter().enumerate() {
            for rx in 0..GLYPH_SIZE {
                // Bit 0 is the leftmost column.
                if (bits >> rx) & 0x01 == 0 {
                    continue;
                }
                canvas.fill_rect(
                    gx + rx * scale,
                    y + ry as i64 * scale,
                    scale as u32,
                    scale as u32,
                    rgb,
                );
            }
        }
    }
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Shape;

    fn info(fps: &str) -> OverlayInfo<'_> {
        OverlayInfo {
            target_id: "cat.png",
            brush_name: "round",
            update_time_micros: 1234,
            score: 0.25,
            fps: fps.to_string(),
        }
    }

    #[test]
    fn debug_line_layout() {
        assert_eq!(
            debug_line(&info("60")),
            "cat.png-round 1234 us, 0.25 score 60 fps"
        );
    }

    #[test]
    fn lock_marker_only_when_locked() {
        let frame = Image::filled(Shape::new(64, 64, 3), 0).unwrap();
        let plain = annotate(&frame, &info("inf"), false);
        let locked = annotate(&frame, &info("inf"), true);

        let second_line = |img: &Image| {
            (38..43).any(|y| (10..40).any(|x| img.pixel(x, y) != [0, 0, 0]))
        };
        assert!(!second_line(&plain));
        assert!(second_line(&locked));
        assert!(frame.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn glyphs_come_from_the_bitmap_font() {
        let frame = Image::filled(Shape::new(16, 16, 3), 0).unwrap();
        let mut canvas = Canvas::copy_of(&frame);
        draw_text(&mut canvas, 0, 0, "L", [255, 255, 255], 1);
        let img = canvas.into_image();

        for (ry, bits) in BASIC_LEGACY[b'L' as usize].iter().enumerate() {
            for rx in 0..8u32 {
                let lit = (bits >> rx) & 1 == 1;
                assert_eq!(img.pixel(rx, ry as u32)[0] == 255, lit, "({}, {})", rx, ry);
            }
        }
    }

    #[test]
    fn non_ascii_falls_back_to_question_mark() {
        assert_eq!(glyph_for_char('é'), BASIC_LEGACY[b'?' as usize]);
        assert_eq!(glyph_for_char('a'), BASIC_LEGACY[b'a' as usize]);
    }
}
