use std::path::Path;

use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Rect,
};

use super::layout::{DrawOp, PageLayout, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use super::metrics::Face;
use super::RenderError;

/// DPI printpdf assumes when none is given in the transform.
const IMAGE_DPI: f32 = 300.0;

const GRID_THICKNESS: f32 = 0.3;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }
}

fn pdf_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(e.to_string())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

/// Load the logo image. Any failure is logged and yields `None`.
pub(super) fn load_logo(path: &Path) -> Option<DynamicImage> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "logo not readable, omitting it");
            return None;
        }
    };
    match image_crate::load_from_memory(&bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "logo not decodable, omitting it");
            None
        }
    }
}

/// Draw the laid-out pages and serialize the document.
pub(super) fn render(
    pages: &[PageLayout],
    title: &str,
    logo: Option<&DynamicImage>,
) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
    };

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Page {}, Layer 1", index + 1),
            )
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for op in &page.ops {
            draw(&layer, op, &fonts, logo);
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn draw(layer: &PdfLayerReference, op: &DrawOp, fonts: &Fonts, logo: Option<&DynamicImage>) {
    match op {
        DrawOp::Text {
            x,
            baseline,
            size,
            face,
            color: rgb,
            text,
        } => {
            layer.set_fill_color(color(*rgb));
            layer.use_text(
                text.as_str(),
                *size,
                Mm(*x),
                Mm(PAGE_HEIGHT - baseline),
                fonts.get(*face),
            );
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            layer.set_outline_color(color(*stroke));
            layer.set_outline_thickness(GRID_THICKNESS);
            let mode = match fill {
                Some(rgb) => {
                    layer.set_fill_color(color(*rgb));
                    PaintMode::FillStroke
                }
                None => PaintMode::Stroke,
            };
            let rect = Rect::new(
                Mm(*x),
                Mm(PAGE_HEIGHT - y - height),
                Mm(x + width),
                Mm(PAGE_HEIGHT - y),
            )
            .with_mode(mode);
            layer.add_rect(rect);
        }
        DrawOp::Logo {
            x,
            y,
            width,
            height,
        } => {
            if let Some(image) = logo {
                place_logo(layer, image, *x, *y, *width, *height);
            }
        }
    }
}

/// Scale the image to fit the box, keeping its aspect ratio, top-left aligned.
fn place_logo(layer: &PdfLayerReference, image: &DynamicImage, x: f32, y: f32, width: f32, height: f32) {
    let (px_w, px_h) = image.dimensions();
    if px_w == 0 || px_h == 0 {
        return;
    }
    let natural_w = px_w as f32 / IMAGE_DPI * 25.4;
    let natural_h = px_h as f32 / IMAGE_DPI * 25.4;
    let scale = (width / natural_w).min(height / natural_h);
    let drawn_h = natural_h * scale;

    Image::from_dynamic_image(image).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(PAGE_HEIGHT - y - drawn_h)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
}
