//! Font loading and rasterisation

use super::{Rgb, Scene, TextDrawer, TextMeasurer};
use crate::config::FontsConfig;
use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Family name the loaded font file is registered under
const FAMILY: &str = "nettool";

/// Which configured font file ended up registered
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub path: PathBuf,
    pub fallback: bool,
}

/// Register the preferred font, or the fallback when it cannot be loaded
pub fn register_face(fonts: &FontsConfig) -> Result<LoadedFont> {
    let preferred = Path::new(&fonts.preferred);
    match load_font_file(preferred) {
        Ok(()) => {
            info!("Using font {:?}", preferred);
            return Ok(LoadedFont {
                path: preferred.to_path_buf(),
                fallback: false,
            });
        }
        Err(err) => warn!("Preferred font unavailable: {:#}", err),
    }

    let fallback = Path::new(&fonts.fallback);
    load_font_file(fallback).context("No usable font file")?;
    info!("Using fallback font {:?}", fallback);

    Ok(LoadedFont {
        path: fallback.to_path_buf(),
        fallback: true,
    })
}

fn load_font_file(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read font file {:?}", path))?;

    // plotters holds registered font data for the rest of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| anyhow::anyhow!("Invalid font file {:?}", path))
}

/// The registered font at one size
#[derive(Debug, Clone, Copy)]
pub struct FontFace {
    size: f64,
}

impl FontFace {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    fn desc(&self) -> FontDesc<'static> {
        FontDesc::new(FontFamily::Name(FAMILY), self.size, FontStyle::Normal)
    }

    /// Paint `scene` onto an RGB canvas and encode it as PNG
    pub fn render_png(&self, scene: &Scene) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; scene.width as usize * scene.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
                .into_drawing_area();
            let mut drawer = CanvasDrawer {
                area: &root,
                face: *self,
            };
            scene.paint(&mut drawer)?;
            root.present()?;
        }

        encode_png(scene.width, scene.height, buffer)
    }
}

impl TextMeasurer for FontFace {
    fn text_width(&self, text: &str) -> u32 {
        match self.desc().box_size(text) {
            Ok((width, _)) => width,
            // Rough advance of a monospace glyph
            Err(_) => (text.chars().count() as f64 * self.size * 0.6) as u32,
        }
    }
}

struct CanvasDrawer<'a, 'b> {
    area: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    face: FontFace,
}

fn rgb_color(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

impl TextDrawer for CanvasDrawer<'_, '_> {
    fn fill(&mut self, color: Rgb) -> Result<()> {
        self.area.fill(&rgb_color(color))?;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, pos: (i32, i32), color: Rgb) -> Result<()> {
        let style = self.face.desc().color(&rgb_color(color));
        self.area.draw_text(text, &style, pos)?;
        Ok(())
    }
}

/// Encode a packed 24-bit RGB buffer as PNG
pub fn encode_png(width: u32, height: u32, rgb: Vec<u8>) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, rgb)
        .context("RGB buffer does not match the canvas size")?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .context("Failed to encode PNG")?;

    Ok(png.into_inner())
}
