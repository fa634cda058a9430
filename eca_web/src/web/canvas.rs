use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};

use eca::render::{Palette, Raster};

const DEAD_CSS: &str = "#FFFFFF";

fn context_2d(
    canvas: &web_sys::HtmlCanvasElement,
) -> Result<web_sys::CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "canvas: get_context threw".to_string())?
        .ok_or("canvas: missing 2d context".to_string())?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .map_err(|_| "canvas: context is not 2d".to_string())
}

pub(super) fn resize(canvas: &web_sys::HtmlCanvasElement, cols: usize, rows: usize, cell_size: usize) {
    canvas.set_width((cols * cell_size) as u32);
    canvas.set_height((rows * cell_size) as u32);
}

/// Paint one generation row with `fillRect`, one square per cell.
#[allow(deprecated)]
pub(super) fn draw_generation(
    canvas: &web_sys::HtmlCanvasElement,
    y: usize,
    row: &[u8],
    trace: &[u8],
    palette: &Palette,
    cell_size: usize,
) -> Result<(), String> {
    let ctx = context_2d(canvas)?;
    let cs = cell_size as f64;
    for (x, &alive) in row.iter().enumerate() {
        let color = if alive == 0 {
            DEAD_CSS.to_string()
        } else {
            palette.css(trace.get(x).copied().unwrap_or(0))
        };
        ctx.set_fill_style(&JsValue::from_str(&color));
        ctx.fill_rect(x as f64 * cs, y as f64 * cs, cs, cs);
    }
    Ok(())
}

/// Blit a fully rendered history; resizes the canvas to fit.
pub(super) fn draw_raster(canvas: &web_sys::HtmlCanvasElement, raster: &Raster) -> Result<(), String> {
    canvas.set_width(raster.width() as u32);
    canvas.set_height(raster.height() as u32);
    let ctx = context_2d(canvas)?;
    let image = web_sys::ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(raster.pixels()),
        raster.width() as u32,
        raster.height() as u32,
    )
    .map_err(|_| "canvas: ImageData construction failed".to_string())?;
    ctx.put_image_data(&image, 0.0, 0.0)
        .map_err(|_| "canvas: put_image_data failed".to_string())
}
