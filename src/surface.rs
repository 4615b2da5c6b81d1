use log::{debug, warn};
use rusttype::{Font, PositionedGlyph, Scale, point};
use tiny_skia::{
    Color, FillRule, Mask, Paint, Path, Pixmap, PixmapPaint, PremultipliedColorU8, Stroke,
    Transform,
};

// ---------------------------------------------------------------------------
// DrawSurface — explicit drawing context
// ---------------------------------------------------------------------------

/// The drawing operations the renderer needs. Every operation takes absolute
/// surface coordinates; there is no ambient transform or clip state to save
/// and restore.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn clear(&mut self, color: Color);
    fn fill_path(&mut self, path: &Path, color: Color);
    fn stroke_path(&mut self, path: &Path, color: Color, stroke_width: f32);
    /// Draw `text` centered on `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
    /// Draw `image` scaled into the `(x, y, width, height)` box, clipped to
    /// `clip` when given.
    fn draw_image(
        &mut self,
        image: &Pixmap,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        clip: Option<&Path>,
    );
}

/// Parse `#RRGGBB` / `#RGB` (with or without the hash) into a color.
pub fn parse_color(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    let (r, g, b) = match hex.len() {
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        3 => {
            let c = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
            (c(0).ok()?, c(1).ok()?, c(2).ok()?)
        }
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, 255))
}

// ---------------------------------------------------------------------------
// SkiaSurface — production raster backend
// ---------------------------------------------------------------------------

pub struct SkiaSurface {
    pixmap: Pixmap,
    font: Option<Font<'static>>,
}

impl SkiaSurface {
    /// Square surface of `size` pixels per side.
    pub fn new(size: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(size, size)?,
            font: None,
        })
    }

    /// Attach a TTF/OTF font for text operations. Without one, text draws
    /// become logged no-ops rather than failures.
    pub fn with_font(mut self, bytes: Vec<u8>) -> Self {
        match Font::try_from_vec(bytes) {
            Some(font) => self.font = Some(font),
            None => warn!("could not parse font data; text will be skipped"),
        }
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Swap in a fresh surface of a new size. The caller re-renders
    /// afterwards; all geometry derives from surface dimensions, so the
    /// result is resolution-independent.
    pub fn resize(&mut self, size: u32) -> bool {
        match Pixmap::new(size, size) {
            Some(pixmap) => {
                self.pixmap = pixmap;
                true
            }
            None => false,
        }
    }

    /// Encode the surface contents as PNG bytes.
    pub fn to_png(&self) -> std::io::Result<Vec<u8>> {
        self.pixmap.encode_png().map_err(std::io::Error::other)
    }

    fn clip_mask(&self, path: &Path) -> Option<Mask> {
        let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
        mask.fill_path(path, FillRule::Winding, true, Transform::identity());
        Some(mask)
    }
}

impl DrawSurface for SkiaSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &Path, color: Color, stroke_width: f32) {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: stroke_width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let Some(font) = self.font.clone() else {
            debug!("no font attached; skipping text {text:?}");
            return;
        };
        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> =
            font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();

        let (min_x, max_x, min_y, max_y) = glyphs
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .fold((i32::MAX, i32::MIN, i32::MAX, i32::MIN), |acc, bb| {
                (
                    acc.0.min(bb.min.x),
                    acc.1.max(bb.max.x),
                    acc.2.min(bb.min.y),
                    acc.3.max(bb.max.y),
                )
            });
        if min_x > max_x {
            return;
        }
        let offset_x = x as i32 - (max_x - min_x) / 2;
        let offset_y = y as i32 - (max_y - min_y) / 2;

        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    blend_pixel(&mut self.pixmap, px, py, color, coverage);
                });
            }
        }
    }

    fn draw_image(
        &mut self,
        image: &Pixmap,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        clip: Option<&Path>,
    ) {
        if image.width() == 0 || image.height() == 0 || width <= 0.0 || height <= 0.0 {
            return;
        }
        let mask = clip.and_then(|path| self.clip_mask(path));
        let transform = Transform::from_row(
            width / image.width() as f32,
            0.0,
            0.0,
            height / image.height() as f32,
            x,
            y,
        );
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &PixmapPaint::default(),
            transform,
            mask.as_ref(),
        );
    }
}

/// Source-over blend of one anti-aliased glyph pixel.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Color, coverage: f32) {
    let (w, h) = (pixmap.width() as i32, pixmap.height() as i32);
    if x < 0 || y < 0 || x >= w || y >= h || coverage <= 0.0 {
        return;
    }
    let index = (y * w + x) as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];

    let alpha = (color.alpha() * coverage).clamp(0.0, 1.0);
    let inv = 1.0 - alpha;
    let blend = |src: f32, dst: u8| -> u8 {
        (src * alpha * 255.0 + dst as f32 * inv).round().clamp(0.0, 255.0) as u8
    };
    let a = (alpha * 255.0 + dst.alpha() as f32 * inv).round().clamp(0.0, 255.0) as u8;
    let r = blend(color.red(), dst.red()).min(a);
    let g = blend(color.green(), dst.green()).min(a);
    let b = blend(color.blue(), dst.blue()).min(a);
    if let Some(px) = PremultipliedColorU8::from_rgba(r, g, b, a) {
        pixels[index] = px;
    }
}

// ---------------------------------------------------------------------------
// Recording surface for renderer tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::circle_path;

    #[test]
    fn parse_color_accepts_hex_forms() {
        assert_eq!(parse_color("#000000"), Some(Color::from_rgba8(0, 0, 0, 255)));
        assert_eq!(
            parse_color("#FFCC00"),
            Some(Color::from_rgba8(255, 204, 0, 255))
        );
        assert_eq!(parse_color("#fff"), Some(Color::from_rgba8(255, 255, 255, 255)));
        assert_eq!(parse_color("1a2b3c"), Some(Color::from_rgba8(26, 43, 60, 255)));
        assert_eq!(parse_color("papayawhip"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn fill_path_writes_pixels() {
        let mut surface = SkiaSurface::new(40).unwrap();
        surface.clear(Color::WHITE);
        let disc = circle_path(20.0, 20.0, 10.0).unwrap();
        surface.fill_path(&disc, Color::from_rgba8(255, 0, 0, 255));

        let center = surface.pixmap().pixel(20, 20).unwrap();
        assert_eq!(center.red(), 255);
        assert_eq!(center.green(), 0);
        // Far corner untouched.
        let corner = surface.pixmap().pixel(1, 1).unwrap();
        assert_eq!(corner.green(), 255);
    }

    #[test]
    fn draw_image_respects_clip() {
        let mut surface = SkiaSurface::new(40).unwrap();
        surface.clear(Color::WHITE);

        let mut stamp = Pixmap::new(4, 4).unwrap();
        stamp.fill(Color::from_rgba8(0, 0, 255, 255));

        let clip = circle_path(10.0, 10.0, 8.0).unwrap();
        // Stamp scaled over the whole surface, but clipped to the disc.
        surface.draw_image(&stamp, 0.0, 0.0, 40.0, 40.0, Some(&clip));

        assert_eq!(surface.pixmap().pixel(10, 10).unwrap().blue(), 255);
        // Outside the clip the white background survives.
        assert_eq!(surface.pixmap().pixel(35, 35).unwrap().blue(), 255);
        assert_eq!(surface.pixmap().pixel(35, 35).unwrap().red(), 255);
    }

    #[test]
    fn draw_image_scales_to_box() {
        let mut surface = SkiaSurface::new(40).unwrap();
        surface.clear(Color::WHITE);
        let mut stamp = Pixmap::new(2, 2).unwrap();
        stamp.fill(Color::from_rgba8(0, 128, 0, 255));
        surface.draw_image(&stamp, 10.0, 10.0, 20.0, 20.0, None);

        assert_eq!(surface.pixmap().pixel(20, 20).unwrap().green(), 128);
        assert_eq!(surface.pixmap().pixel(5, 5).unwrap().green(), 255);
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut surface = SkiaSurface::new(40).unwrap();
        surface.clear(Color::WHITE);
        surface.fill_text("2024", 20.0, 20.0, 12.0, Color::BLACK);
        // Nothing drawn, nothing panicked.
        assert_eq!(surface.pixmap().pixel(20, 20).unwrap().red(), 255);
    }
}
