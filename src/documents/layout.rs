//! PDF drawing helpers
//!
//! Thin layer over `printpdf` with top-left coordinates in millimetres,
//! the two Helvetica weights, and approximate text metrics for wrapping.

use image::{DynamicImage, Rgb as RgbPixel, RgbImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
};

use crate::documents::error::{DocumentError, DocumentResult};
use crate::storage::SignatureImage;

/// Millimetres per typographic point
const MM_PER_PT: f32 = 0.3528;

/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_EM: f32 = 0.5;

/// A finished document ready to be written or downloaded
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub const MIME_TYPE: &'static str = "application/pdf";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// An RGB colour in 0-255 components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8(255, 255, 255);
    pub const RED: Rgb8 = Rgb8(200, 0, 0);

    fn color(self) -> Color {
        Color::Rgb(Rgb::new(
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            None,
        ))
    }
}

/// Estimated width of `text` in millimetres
pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_GLYPH_EM * MM_PER_PT
}

/// Line height for a font size, in millimetres
pub fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * MM_PER_PT * 1.25
}

/// Greedy word wrap to `max_width_mm`, at most `max_lines` lines.
///
/// Words wider than a line are broken. When the text does not fit, the last
/// line ends with `...`.
pub fn wrap_text(text: &str, size_pt: f32, max_width_mm: f32, max_lines: usize) -> Vec<String> {
    let fits = |line: &str| text_width_mm(line, size_pt) <= max_width_mm;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for ch in word.chars() {
            current.push(ch);
            if !fits(&current) {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if max_lines == 0 {
        return Vec::new();
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            while !last.is_empty() && !fits(&format!("{}...", last.trim_end())) {
                last.pop();
            }
            *last = format!("{}...", last.trim_end());
        }
    }
    lines
}

/// Filename-safe form of free text: whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_-]` is dropped
pub fn sanitize_filename_part(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// A PDF under construction, with every page the same size
pub struct PdfBuilder {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    width: f32,
    height: f32,
    page: Canvas,
}

impl PdfBuilder {
    pub fn new(title: &str, width_mm: f32, height_mm: f32) -> DocumentResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(width_mm), Mm(height_mm), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        let layer = doc.get_page(page).get_layer(layer);
        let page = Canvas::new(layer, width_mm, height_mm, regular.clone(), bold.clone());

        Ok(Self {
            doc,
            regular,
            bold,
            width: width_mm,
            height: height_mm,
            page,
        })
    }

    /// The current page
    pub fn canvas(&self) -> &Canvas {
        &self.page
    }

    /// Start a new page and make it current
    pub fn add_page(&mut self) -> &Canvas {
        let (page, layer) = self.doc.add_page(Mm(self.width), Mm(self.height), "Layer 1");
        let layer = self.doc.get_page(page).get_layer(layer);
        self.page = Canvas::new(
            layer,
            self.width,
            self.height,
            self.regular.clone(),
            self.bold.clone(),
        );
        &self.page
    }

    pub fn finish(self, filename: String) -> DocumentResult<RenderedDocument> {
        let bytes = self.doc.save_to_bytes()?;
        Ok(RenderedDocument { filename, bytes })
    }
}

/// One page, addressed from the top-left corner in millimetres
pub struct Canvas {
    layer: PdfLayerReference,
    width: f32,
    height: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Canvas {
    fn new(
        layer: PdfLayerReference,
        width: f32,
        height: f32,
        regular: IndirectFontRef,
        bold: IndirectFontRef,
    ) -> Self {
        Self {
            layer,
            width,
            height,
            regular,
            bold,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Colour used by subsequent text and fills
    pub fn set_color(&self, color: Rgb8) {
        self.layer.set_fill_color(color.color());
    }

    /// Text with its baseline at `y`
    pub fn text(&self, text: &str, size_pt: f32, x: f32, y: f32, weight: Weight) {
        let font = match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        };
        self.layer
            .use_text(text, size_pt, Mm(x), Mm(self.height - y), font);
    }

    /// Text centred horizontally on `center_x`
    pub fn centered_text(&self, text: &str, size_pt: f32, center_x: f32, y: f32, weight: Weight) {
        let x = center_x - text_width_mm(text, size_pt) / 2.0;
        self.text(text, size_pt, x.max(0.0), y, weight);
    }

    /// Straight stroke between two points
    pub fn rule(&self, from: (f32, f32), to: (f32, f32), thickness_mm: f32) {
        self.layer.set_outline_color(Rgb8::BLACK.color());
        self.layer.set_outline_thickness(thickness_mm / MM_PER_PT);
        self.layer.add_line(Line {
            points: vec![(self.point(from.0, from.1), false), (self.point(to.0, to.1), false)],
            is_closed: false,
        });
    }

    /// Filled rectangle with top-left corner at (`x`, `y`)
    pub fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: Rgb8) {
        self.set_color(color);
        self.layer.add_polygon(Polygon {
            rings: vec![vec![
                (self.point(x, y), false),
                (self.point(x + width, y), false),
                (self.point(x + width, y + height), false),
                (self.point(x, y + height), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Draw an embedded signature scaled to fit the box at (`x`, `y`),
    /// keeping its aspect ratio
    pub fn signature(
        &self,
        signature: &SignatureImage,
        x: f32,
        y: f32,
        max_width: f32,
        max_height: f32,
    ) -> DocumentResult<()> {
        let bytes = signature
            .decode()
            .map_err(|e| DocumentError::Image(e.to_string()))?;
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| DocumentError::Image(e.to_string()))?;

        let flattened = flatten_on_white(&decoded);
        let (px_width, px_height) = flattened.dimensions();
        if px_width == 0 || px_height == 0 {
            return Err(DocumentError::Image("empty image".to_string()));
        }

        let mm_per_px = (max_width / px_width as f32).min(max_height / px_height as f32);
        let drawn_height = px_height as f32 * mm_per_px;

        Image::from_dynamic_image(&DynamicImage::ImageRgb8(flattened)).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(self.height - y - drawn_height)),
                dpi: Some(25.4 / mm_per_px),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm(x), Mm(self.height - y))
    }
}

/// Composite transparency over white, as the PDF image has no alpha
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, RgbPixel([blend(r), blend(g), blend(b)]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_wrap_fits_within_width() {
        let text = "farina di grano tenero, uova, latte, burro, zucchero, sale, lievito";
        let lines = wrap_text(text, 6.0, 30.0, 10);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 6.0) <= 30.0, "{:?} too wide", line);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_truncates_with_ellipsis() {
        let text = "sedano ".repeat(60);
        let lines = wrap_text(&text, 6.0, 50.0, 3);

        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with("..."));
        assert!(text_width_mm(&lines[2], 6.0) <= 50.0);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let word = "x".repeat(100);
        let lines = wrap_text(&word, 10.0, 20.0, 20);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_sanitize_filename_part() {
        assert_eq!(sanitize_filename_part("Ragù  di  carne"), "Rag_di_carne");
        assert_eq!(sanitize_filename_part("Salsa/BBQ (home-made)"), "SalsaBBQ_home-made");
        assert_eq!(sanitize_filename_part(" àèì "), "");
    }

    #[test]
    fn test_flatten_on_white() {
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 0, 255]));

        let flat = flatten_on_white(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_builder_produces_pdf() {
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 4, Rgba([0, 0, 0, 255])))
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .unwrap();

        let mut builder = PdfBuilder::new("test", 60.0, 40.0).unwrap();
        builder.canvas().text("Prova", 10.0, 5.0, 10.0, Weight::Bold);
        builder.canvas().rule((5.0, 12.0), (55.0, 12.0), 0.3);
        builder.add_page();
        builder.canvas().fill_rect(0.0, 0.0, 10.0, 10.0, Rgb8::RED);
        builder
            .canvas()
            .signature(&SignatureImage::from_png(&png), 5.0, 5.0, 40.0, 20.0)
            .unwrap();

        let doc = builder.finish("test.pdf".to_string()).unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.filename, "test.pdf");
    }

    #[test]
    fn test_undecodable_signature_is_an_error() {
        let builder = PdfBuilder::new("test", 60.0, 40.0).unwrap();
        let bogus = SignatureImage::from_png(b"not an image");
        assert!(matches!(
            builder.canvas().signature(&bogus, 0.0, 0.0, 40.0, 20.0),
            Err(DocumentError::Image(_))
        ));
    }
}
