use crate::config::BrushParams;
use crate::error::{FinchError, FinchResult};
use crate::raster::{luma, Image, Shape};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tiny_skia as sk;

/// Footprint painted by a single stroke.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BrushKind {
    Round,
    Square,
    Streak,
}

/// Named descriptor of the stroke primitive a specimen is painted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushSet {
    pub name: String,
    pub kind: BrushKind,
    pub min_size: f32,
    pub max_size: f32,
}

impl BrushSet {
    pub fn new(kind: BrushKind, min_size: f32, max_size: f32) -> Self {
        Self {
            name: kind.to_string(),
            kind,
            min_size,
            max_size,
        }
    }

    pub fn from_params(params: &BrushParams) -> FinchResult<Self> {
        let kind = BrushKind::from_str(&params.brush).map_err(|_| {
            let known: Vec<String> = BrushKind::iter().map(|k| k.to_string()).collect();
            FinchError::Config(format!(
                "unknown brush set '{}' (expected one of: {})",
                params.brush,
                known.join(", ")
            ))
        })?;
        if params.min_size <= 0.0 || params.min_size > params.max_size {
            return Err(FinchError::Config(format!(
                "brush size range {}..{} is empty",
                params.min_size, params.max_size
            )));
        }
        Ok(Self::new(kind, params.min_size, params.max_size))
    }

    pub fn clamp_size(&self, size: f32) -> f32 {
        size.clamp(self.min_size, self.max_size)
    }
}

/// One brush dab. Position is normalized to `[0, 1]` on both axes so genomes
/// survive a change of target resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub angle: f32,
    pub aspect: f32,
    pub value: [u8; 3],
    pub opacity: f32,
}

/// Paints `strokes` in order over a black background with anti-aliased fills.
pub fn render(brush: &BrushSet, strokes: &[Stroke], shape: Shape) -> FinchResult<Image> {
    let mut pix = sk::Pixmap::new(shape.width, shape.height)
        .ok_or_else(|| FinchError::InvalidImage(format!("cannot paint a {} canvas", shape)))?;
    pix.fill(sk::Color::BLACK);

    for stroke in strokes {
        paint(&mut pix, brush, stroke, shape);
    }
    to_session_layout(&pix, shape)
}

fn paint(pix: &mut sk::Pixmap, brush: &BrushSet, stroke: &Stroke, shape: Shape) {
    let size = brush.clamp_size(stroke.size);
    let aspect = match brush.kind {
        BrushKind::Streak => stroke.aspect.max(1.0) * 3.0,
        _ => stroke.aspect.max(1.0),
    };
    let half_len = size * aspect * 0.5;
    let half_wid = size * 0.5;

    let Some(path) = footprint(brush.kind, half_len, half_wid) else {
        return;
    };

    let mut paint = sk::Paint::default();
    paint.anti_alias = true;
    let alpha = (stroke.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    paint.set_color_rgba8(stroke.value[0], stroke.value[1], stroke.value[2], alpha);

    // Footprints are built around the origin, then rotated and moved into place.
    let transform = sk::Transform::from_rotate(stroke.angle.to_degrees()).post_translate(
        stroke.x * shape.width as f32,
        stroke.y * shape.height as f32,
    );
    pix.fill_path(&path, &paint, sk::FillRule::Winding, transform, None);
}

/// Stroke outline centered on the origin, long axis along x.
fn footprint(kind: BrushKind, half_len: f32, half_wid: f32) -> Option<sk::Path> {
    let bounds = sk::Rect::from_xywh(-half_len, -half_wid, 2.0 * half_len, 2.0 * half_wid)?;
    match kind {
        BrushKind::Round => sk::PathBuilder::from_oval(bounds),
        BrushKind::Square => Some(sk::PathBuilder::from_rect(bounds)),
        BrushKind::Streak => {
            // Lens that tapers to a point at both ends.
            let mut pb = sk::PathBuilder::new();
            pb.move_to(-half_len, 0.0);
            pb.quad_to(0.0, -2.0 * half_wid, half_len, 0.0);
            pb.quad_to(0.0, 2.0 * half_wid, -half_len, 0.0);
            pb.close();
            pb.finish()
        }
    }
}

/// The pixmap stays opaque (black base, source-over fills), so its
/// premultiplied samples are the straight color.
fn to_session_layout(pix: &sk::Pixmap, shape: Shape) -> FinchResult<Image> {
    let rgba = pix.data().chunks_exact(4);
    let data: Vec<u8> = match shape.channels {
        1 => rgba.map(|px| luma(px[0], px[1], px[2])).collect(),
        _ => rgba.flat_map(|px| [px[0], px[1], px[2]]).collect(),
    };
    Image::new(shape, data)
}
