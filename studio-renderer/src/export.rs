//! Design export to image/document formats.
//!
//! Renders a [`Document`] to PNG, JPEG, SVG, or PDF using an SVG intermediate
//! representation and the resvg/tiny-skia rasterization pipeline.

use std::fmt::Write;

use image::ImageEncoder;

use studio_core::{Background, Document, Element, ElementKind, ExportFormat, FontWeight, TextAlign};

use crate::error::{ExportError, ExportResult};

/// Configuration for design export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// DPI for print export (default: 96.0).
    pub dpi: f32,
    /// Backdrop color as RGB bytes, composited under transparent pixels in
    /// JPEG output.
    pub backdrop: [u8; 3],
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
    /// Scale factor (e.g. 2.0 for retina).
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            backdrop: [255, 255, 255],
            jpeg_quality: 85,
            scale: 1.0,
        }
    }
}

/// Exports a [`Document`] to the supported image and document formats.
#[derive(Debug, Clone)]
pub struct DesignExporter {
    config: ExportConfig,
}

impl DesignExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Export a document to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be rendered or encoded.
    pub fn export(&self, document: &Document, format: ExportFormat) -> ExportResult<Vec<u8>> {
        tracing::debug!(design = %document.id, %format, "exporting design");
        match format {
            ExportFormat::Png => self.render_to_png(document),
            ExportFormat::Jpg => self.render_to_jpeg(document),
            ExportFormat::Svg => {
                let svg = self.render_to_svg(document)?;
                Ok(svg.into_bytes())
            }
            ExportFormat::Pdf => self.render_to_pdf(document),
        }
    }

    /// Export the document to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, document: &Document) -> ExportResult<Vec<u8>> {
        let svg_string = self.render_to_svg(document)?;
        let pixmap = Self::rasterize_svg(&svg_string)?;

        pixmap
            .encode_png()
            .map_err(|e| ExportError::Encode(format!("PNG encoding failed: {e}")))
    }

    /// Export the document to JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_jpeg(&self, document: &Document) -> ExportResult<Vec<u8>> {
        let svg_string = self.render_to_svg(document)?;
        let pixmap = Self::rasterize_svg(&svg_string)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = &self.config.backdrop;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        for pixel in pixmap.data().chunks_exact(4) {
            let alpha = f32::from(pixel[3]) / 255.0;
            let inv = 1.0 - alpha;
            rgb_data.push((f32::from(pixel[0]).mul_add(alpha, f32::from(bg[0]) * inv)) as u8);
            rgb_data.push((f32::from(pixel[1]).mul_add(alpha, f32::from(bg[1]) * inv)) as u8);
            rgb_data.push((f32::from(pixel[2]).mul_add(alpha, f32::from(bg[2]) * inv)) as u8);
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| ExportError::Encode(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the document to an SVG string.
    ///
    /// Elements render in document order, which is their z-order.
    ///
    /// # Errors
    ///
    /// Returns an error if an element cannot be represented as SVG.
    #[allow(clippy::cast_precision_loss)]
    pub fn render_to_svg(&self, document: &Document) -> ExportResult<String> {
        let (out_w, out_h) = self.output_dimensions(document);
        let view_w = document.canvas_width;
        let view_h = document.canvas_height;

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
        );

        match &document.background {
            Background::Color(color) => {
                let fill = escape_xml(color);
                let _ = write!(svg, "<rect width=\"100%\" height=\"100%\" fill=\"{fill}\"/>");
            }
            Background::Image(src) => {
                let href = escape_xml(src);
                let _ = write!(
                    svg,
                    "<image x=\"0\" y=\"0\" width=\"{view_w}\" height=\"{view_h}\" href=\"{href}\" preserveAspectRatio=\"xMidYMid slice\"/>",
                );
            }
        }

        for element in &document.elements {
            render_element_svg(&mut svg, element);
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Export the document to PDF bytes.
    ///
    /// Renders the design as a raster image and embeds it in a single PDF
    /// page sized to the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or PDF generation fails.
    #[allow(clippy::cast_precision_loss)]
    pub fn render_to_pdf(&self, document: &Document) -> ExportResult<Vec<u8>> {
        let png_data = self.render_to_png(document)?;
        let (out_w, out_h) = self.output_dimensions(document);

        // Convert pixel dimensions to mm: pixels / dpi * 25.4
        let page_width_mm = out_w as f32 / self.config.dpi * 25.4;
        let page_height_mm = out_h as f32 / self.config.dpi * 25.4;

        let (doc, page1, layer1) = printpdf::PdfDocument::new(
            "Design Export",
            printpdf::Mm(page_width_mm),
            printpdf::Mm(page_height_mm),
            "Layer 1",
        );

        let current_layer = doc.get_page(page1).get_layer(layer1);

        // Decode PNG using printpdf's bundled image crate for compatibility
        let dynamic_image = printpdf::image_crate::load_from_memory(&png_data)
            .map_err(|e| ExportError::Encode(format!("Failed to decode PNG for PDF: {e}")))?;

        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);

        let scale_x = page_width_mm / out_w as f32;
        let scale_y = page_height_mm / out_h as f32;

        let transform = printpdf::ImageTransform {
            translate_x: Some(printpdf::Mm(0.0)),
            translate_y: Some(printpdf::Mm(0.0)),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            ..Default::default()
        };

        pdf_image.add_to_layer(current_layer, transform);

        doc.save_to_bytes()
            .map_err(|e| ExportError::Encode(format!("PDF save failed: {e}")))
    }

    /// Get output dimensions (width, height) in pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn output_dimensions(&self, document: &Document) -> (u32, u32) {
        #[allow(clippy::cast_precision_loss)]
        let out_w = (document.canvas_width as f32 * self.config.scale) as u32;
        #[allow(clippy::cast_precision_loss)]
        let out_h = (document.canvas_height as f32 * self.config.scale) as u32;
        (out_w.max(1), out_h.max(1))
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(svg_string: &str) -> ExportResult<tiny_skia::Pixmap> {
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| ExportError::Svg(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| ExportError::Svg("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Render a single element to SVG.
fn render_element_svg(svg: &mut String, element: &Element) {
    let p = &element.placement;
    let center_x = p.x + p.width / 2.0;
    let center_y = p.y + p.height / 2.0;

    // Wrap each element in a group carrying rotation and opacity
    let _ = write!(svg, "<g opacity=\"{}\"", p.opacity);
    if p.rotation.abs() > f32::EPSILON {
        let _ = write!(
            svg,
            " transform=\"rotate({} {center_x} {center_y})\"",
            p.rotation,
        );
    }
    svg.push('>');

    match &element.kind {
        ElementKind::Text {
            content,
            font_family,
            font_size,
            font_weight,
            align,
            fill,
        } => {
            let escaped = escape_xml(content);
            let escaped_fill = escape_xml(fill);
            let escaped_family = escape_xml(font_family);
            let weight = match font_weight {
                FontWeight::Normal => "normal",
                FontWeight::Bold => "bold",
            };
            let (anchor, text_x) = match align {
                TextAlign::Left => ("start", p.x),
                TextAlign::Center => ("middle", center_x),
                TextAlign::Right => ("end", p.x + p.width),
            };
            let text_y = p.y + font_size;
            let _ = write!(
                svg,
                "<text x=\"{text_x}\" y=\"{text_y}\" font-size=\"{font_size}\" font-family=\"{escaped_family}\" font-weight=\"{weight}\" text-anchor=\"{anchor}\" fill=\"{escaped_fill}\">{escaped}</text>",
            );
        }

        ElementKind::Rectangle {
            fill,
            corner_radius,
        } => {
            let escaped_fill = escape_xml(fill);
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{corner_radius}\" fill=\"{escaped_fill}\"/>",
                p.x, p.y, p.width, p.height,
            );
        }

        ElementKind::Circle { fill } => {
            let escaped_fill = escape_xml(fill);
            let radius = p.width.min(p.height) / 2.0;
            let _ = write!(
                svg,
                "<circle cx=\"{center_x}\" cy=\"{center_y}\" r=\"{radius}\" fill=\"{escaped_fill}\"/>",
            );
        }

        ElementKind::Image { src, .. } => {
            let href = escape_xml(src);
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"{href}\" preserveAspectRatio=\"xMidYMid slice\"/>",
                p.x, p.y, p.width, p.height,
            );
        }

        // Members render independently from the document's element list
        ElementKind::Group { .. } => {}
    }

    svg.push_str("</g>");
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{Element, ElementKind, Placement};

    fn text_element(content: &str, x: f32, y: f32) -> Element {
        Element::new(ElementKind::text(content)).with_placement(Placement::at(x, y, 200.0, 30.0))
    }

    fn small_doc() -> Document {
        Document::new(100, 100)
    }

    #[test]
    fn test_svg_export_empty_document() {
        let doc = Document::new(800, 600);
        let exporter = DesignExporter::with_defaults();
        let svg = exporter.render_to_svg(&doc).expect("svg export");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_svg_export_with_text() {
        let doc = Document::new(800, 600)
            .add_element(text_element("Hello World", 10.0, 20.0))
            .expect("add");

        let exporter = DesignExporter::with_defaults();
        let svg = exporter.render_to_svg(&doc).expect("svg export");
        assert!(svg.contains("Hello World"));
        assert!(svg.contains("font-size=\"24\""));
        assert!(svg.contains("text-anchor=\"start\""));
    }

    #[test]
    fn test_svg_rotation_and_opacity() {
        let el = Element::new(ElementKind::rectangle("#ff0000")).with_placement(Placement {
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 20.0,
            rotation: 45.0,
            opacity: 0.5,
        });
        let doc = small_doc().add_element(el).expect("add");

        let exporter = DesignExporter::with_defaults();
        let svg = exporter.render_to_svg(&doc).expect("svg");
        assert!(svg.contains("opacity=\"0.5\""));
        assert!(svg.contains("rotate(45 20 20)"));
    }

    #[test]
    fn test_svg_circle_inscribed() {
        let el = Element::new(ElementKind::Circle {
            fill: "#00ff00".to_string(),
        })
        .with_placement(Placement::at(0.0, 0.0, 40.0, 60.0));
        let doc = small_doc().add_element(el).expect("add");

        let exporter = DesignExporter::with_defaults();
        let svg = exporter.render_to_svg(&doc).expect("svg");
        assert!(svg.contains("<circle cx=\"20\" cy=\"30\" r=\"20\""));
    }

    #[test]
    fn test_svg_image_background() {
        let doc = small_doc().set_background(Background::Image("https://cdn/bg.png".to_string()));
        let exporter = DesignExporter::with_defaults();
        let svg = exporter.render_to_svg(&doc).expect("svg");
        assert!(svg.contains("href=\"https://cdn/bg.png\""));
    }

    #[test]
    fn test_png_export_produces_valid_bytes() {
        let doc = small_doc()
            .add_element(text_element("Test", 10.0, 20.0))
            .expect("add");

        let exporter = DesignExporter::with_defaults();
        let png = exporter.render_to_png(&doc).expect("png export");

        // PNG magic bytes: \x89PNG
        assert!(png.len() > 8);
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_jpeg_export_produces_valid_bytes() {
        let doc = small_doc()
            .add_element(text_element("Test", 10.0, 20.0))
            .expect("add");

        let exporter = DesignExporter::with_defaults();
        let jpeg = exporter.render_to_jpeg(&doc).expect("jpeg export");

        // JPEG magic bytes: FFD8
        assert!(jpeg.len() > 2);
        assert_eq!(jpeg[0], 0xFF);
        assert_eq!(jpeg[1], 0xD8);
    }

    #[test]
    fn test_pdf_export_produces_valid_bytes() {
        let doc = Document::new(200, 200)
            .add_element(text_element("PDF Test", 10.0, 20.0))
            .expect("add");

        let exporter = DesignExporter::with_defaults();
        let pdf = exporter.render_to_pdf(&doc).expect("pdf export");

        // PDF header: %PDF-
        assert!(pdf.len() > 5);
        assert_eq!(&pdf[0..5], b"%PDF-");
    }

    #[test]
    fn test_export_dispatch() {
        let doc = small_doc()
            .add_element(text_element("Dispatch", 10.0, 20.0))
            .expect("add");

        let exporter = DesignExporter::with_defaults();

        let png = exporter.export(&doc, ExportFormat::Png).expect("png");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);

        let jpeg = exporter.export(&doc, ExportFormat::Jpg).expect("jpeg");
        assert_eq!(jpeg[0], 0xFF);

        let svg = exporter.export(&doc, ExportFormat::Svg).expect("svg");
        let svg_str = String::from_utf8(svg).expect("utf8");
        assert!(svg_str.starts_with("<svg"));

        let pdf = exporter.export(&doc, ExportFormat::Pdf).expect("pdf");
        assert_eq!(&pdf[0..5], b"%PDF-");
    }

    #[test]
    fn test_scale_factor() {
        let doc = Document::new(100, 100);
        let exporter = DesignExporter::new(ExportConfig {
            scale: 2.0,
            ..Default::default()
        });

        let svg = exporter.render_to_svg(&doc).expect("svg");
        // At 2x scale, output should be 200x200
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("height=\"200\""));
        // But viewBox should still map to 100x100
        assert!(svg.contains("viewBox=\"0 0 100 100\""));
    }

    #[test]
    fn test_xml_escaping() {
        let doc = Document::new(200, 100)
            .add_element(text_element("A < B & C > D", 10.0, 20.0))
            .expect("add");

        let exporter = DesignExporter::with_defaults();
        let svg = exporter.render_to_svg(&doc).expect("svg");
        assert!(svg.contains("A &lt; B &amp; C &gt; D"));
    }

    #[test]
    fn test_elements_render_in_document_order() {
        let bottom = Element::new(ElementKind::rectangle("#111111"));
        let top = Element::new(ElementKind::rectangle("#222222"));
        let doc = small_doc()
            .add_element(bottom)
            .expect("add")
            .add_element(top)
            .expect("add");

        let exporter = DesignExporter::with_defaults();
        let svg = exporter.render_to_svg(&doc).expect("svg");
        let first = svg.find("#111111").expect("bottom present");
        let second = svg.find("#222222").expect("top present");
        assert!(first < second, "later elements must render on top");
    }
}
