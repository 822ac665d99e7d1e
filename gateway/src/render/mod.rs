//! Text-to-image rendering
//!
//! Layout works on a [`Scene`]: positioned, coloured text on a flat
//! background. Building a scene only needs a [`TextMeasurer`]; turning it
//! into PNG bytes is done by [`FontFace`].

pub mod font;
pub mod layout;

pub use font::{register_face, FontFace};
pub use layout::{node_table_scene, report_scene, ReportStyle, TableStyle};

use anyhow::Result;
use protocol::ColorTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// Display colour of a report colour tag
pub fn tag_color(tag: ColorTag) -> Rgb {
    match tag {
        ColorTag::Title => Rgb(0, 0, 255),
        ColorTag::Success => Rgb(0, 200, 0),
        ColorTag::Warning => Rgb(255, 200, 0),
        ColorTag::Error => Rgb(255, 0, 0),
        ColorTag::Info => Rgb(0, 200, 200),
        ColorTag::Default => WHITE,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub texts: Vec<PlacedText>,
}

pub trait TextMeasurer {
    /// Rendered width of `text` in pixels
    fn text_width(&self, text: &str) -> u32;
}

/// Drawing surface a scene is painted onto
pub trait TextDrawer {
    fn fill(&mut self, color: Rgb) -> Result<()>;
    fn draw_text(&mut self, text: &str, pos: (i32, i32), color: Rgb) -> Result<()>;
}

impl Scene {
    pub fn paint<D: TextDrawer>(&self, drawer: &mut D) -> Result<()> {
        drawer.fill(self.background)?;
        for placed in &self.texts {
            drawer.draw_text(&placed.text, (placed.x, placed.y), placed.color)?;
        }
        Ok(())
    }
}
