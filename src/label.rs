//! Status label rasterization through a detached 2D canvas.

use crate::constants::{LABEL_FONT_FAMILY, LABEL_PADDING_PX, LABEL_PX_PER_UNIT};
use site_core::STATUS_LETTER_SPACING_EM;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Coverage bitmap of a text run plus its size in world units.
pub struct LabelBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub world_width: f32,
    pub world_height: f32,
}

pub fn rasterize(
    document: &web::Document,
    text: &str,
    font_size: f32,
) -> anyhow::Result<LabelBitmap> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let ctx = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let px = font_size as f64 * LABEL_PX_PER_UNIT;
    let font = format!("{px}px {LABEL_FONT_FAMILY}");
    let spacing = STATUS_LETTER_SPACING_EM as f64 * px;
    ctx.set_font(&font);

    // Letter spacing is applied by hand, one glyph at a time.
    let mut advances = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let s = ch.to_string();
        let m = ctx
            .measure_text(&s)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        advances.push((s, m.width()));
    }
    let glyphs: f64 = advances.iter().map(|(_, w)| *w).sum();
    let gaps = advances.len().saturating_sub(1) as f64;
    let text_w = (glyphs + spacing * gaps).max(1.0);
    let width = (text_w + LABEL_PADDING_PX * 2.0).ceil() as u32;
    let height = (px * 1.25 + LABEL_PADDING_PX * 2.0).ceil() as u32;
    canvas.set_width(width);
    canvas.set_height(height);

    // Resizing resets the context state.
    ctx.set_font(&font);
    ctx.set_fill_style_str("#000");
    ctx.set_text_baseline("middle");
    let mut x = LABEL_PADDING_PX;
    let y = height as f64 * 0.5;
    for (s, w) in &advances {
        ctx.fill_text(s, x, y)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        x += w + spacing;
    }

    let rgba = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .data()
        .0;
    Ok(LabelBitmap {
        width,
        height,
        rgba,
        world_width: (width as f64 / LABEL_PX_PER_UNIT) as f32,
        world_height: (height as f64 / LABEL_PX_PER_UNIT) as f32,
    })
}
