//! Scene layout for probe reports and the node table

use super::{tag_color, PlacedText, Rgb, Scene, TextMeasurer, BLACK, WHITE};
use protocol::{markup, NodeSummary};
use std::iter;

/// Geometry of probe report images
#[derive(Debug, Clone)]
pub struct ReportStyle {
    pub min_width: u32,
    pub min_height: u32,
    /// Width budget per visible character when sizing the canvas
    pub char_width: u32,
    /// Height budget per line when sizing the canvas
    pub row_height: u32,
    /// Vertical distance between drawn lines
    pub line_advance: i32,
    pub margin: i32,
    pub background: Rgb,
    /// Upper bounds on the canvas; content beyond them is cut off
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            min_width: 900,
            min_height: 200,
            char_width: 14,
            row_height: 40,
            line_advance: 36,
            margin: 10,
            background: BLACK,
            max_width: 4096,
            max_height: 4096,
        }
    }
}

impl ReportStyle {
    /// Canvas size for `lines`, from their visible character counts
    pub fn canvas_size(&self, lines: &[&str]) -> (u32, u32) {
        let longest = lines
            .iter()
            .map(|line| markup::strip(line).chars().count())
            .max()
            .unwrap_or(0) as u32;
        let width = self
            .min_width
            .max(self.char_width.saturating_mul(longest))
            .min(self.max_width.max(self.min_width));
        let height = self
            .min_height
            .max(self.row_height.saturating_mul(lines.len() as u32))
            .min(self.max_height.max(self.min_height));
        (width, height)
    }
}

/// Geometry and colours of the node table image
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub title: String,
    pub padding: i32,
    pub line_height: i32,
    pub min_width: u32,
    /// Gap between a node name and its alias
    pub column_gap: i32,
    pub background: Rgb,
    pub title_color: Rgb,
    pub name_color: Rgb,
    pub alias_color: Rgb,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            title: "Node list".to_string(),
            padding: 20,
            line_height: 50,
            min_width: 800,
            column_gap: 10,
            background: Rgb(20, 20, 20),
            title_color: Rgb(100, 200, 255),
            name_color: Rgb(255, 200, 0),
            alias_color: WHITE,
        }
    }
}

/// Lay out a probe report: `header` on the first line, then every line of
/// `body` with its colour segments placed left to right.
pub fn report_scene<M: TextMeasurer>(
    header: &str,
    body: &str,
    measurer: &M,
    style: &ReportStyle,
) -> Scene {
    let lines: Vec<&str> = iter::once(header)
        .chain(body.split('\n').map(|line| line.trim_end_matches('\r')))
        .collect();
    let (width, height) = style.canvas_size(&lines);

    let mut texts = Vec::new();
    let mut y = style.margin;
    for line in &lines {
        if y >= height as i32 {
            break;
        }
        let mut x = style.margin;
        for segment in markup::parse(line) {
            if x >= width as i32 {
                break;
            }
            let advance = measurer.text_width(&segment.text) as i32;
            texts.push(PlacedText {
                text: segment.text,
                x,
                y,
                color: tag_color(segment.tag),
            });
            x = x.saturating_add(advance);
        }
        y += style.line_advance;
    }

    Scene {
        width,
        height,
        background: style.background,
        texts,
    }
}

/// Lay out the node table: a title row, then one `name - alias` row per node
pub fn node_table_scene<M: TextMeasurer>(
    nodes: &[NodeSummary],
    measurer: &M,
    style: &TableStyle,
) -> Scene {
    let widest = nodes
        .iter()
        .map(|node| measurer.text_width(&format!("{} - {}", node.name, node.alias)))
        .chain(iter::once(measurer.text_width(&style.title)))
        .max()
        .unwrap_or(0);
    let width = style.min_width.max(widest + 2 * style.padding as u32);
    let height = (style.line_height as u32) * (nodes.len() as u32 + 1) + 2 * style.padding as u32;

    let mut texts = vec![PlacedText {
        text: style.title.clone(),
        x: style.padding,
        y: style.padding,
        color: style.title_color,
    }];

    let mut y = style.padding + style.line_height;
    for node in nodes {
        let name_width = measurer.text_width(&node.name) as i32;
        texts.push(PlacedText {
            text: node.name.clone(),
            x: style.padding,
            y,
            color: style.name_color,
        });
        texts.push(PlacedText {
            text: format!("- {}", node.alias),
            x: style.padding + name_width + style.column_gap,
            y,
            color: style.alias_color,
        });
        y += style.line_height;
    }

    Scene {
        width,
        height,
        background: style.background,
        texts,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::FixedWidth;
    use super::*;
    use protocol::markup::paint;
    use protocol::ColorTag;

    fn summary(name: &str, alias: &str) -> NodeSummary {
        NodeSummary {
            name: name.to_string(),
            alias: alias.to_string(),
        }
    }

    #[test]
    fn test_report_header_comes_first() {
        let scene = report_scene("node: local (This host)", "ok", &FixedWidth(10), &ReportStyle::default());
        assert_eq!(scene.texts[0].text, "node: local (This host)");
        assert_eq!((scene.texts[0].x, scene.texts[0].y), (10, 10));
        assert_eq!(scene.texts[0].color, WHITE);
        assert_eq!((scene.texts[1].x, scene.texts[1].y), (10, 46));
        assert_eq!(scene.background, BLACK);
    }

    #[test]
    fn test_report_segments_advance_by_measured_width() {
        let body = format!("{} plain", paint(ColorTag::Success, "ok"));
        let scene = report_scene("h", &body, &FixedWidth(10), &ReportStyle::default());
        let line: Vec<_> = scene.texts.iter().filter(|t| t.y == 46).collect();
        assert_eq!(line.len(), 2);
        assert_eq!(line[0].text, "ok");
        assert_eq!(line[0].color, Rgb(0, 200, 0));
        assert_eq!(line[1].text, " plain");
        assert_eq!(line[1].x, 10 + 20);
        assert_eq!(line[1].color, WHITE);
    }

    #[test]
    fn test_report_minimum_canvas() {
        let scene = report_scene("h", "short", &FixedWidth(10), &ReportStyle::default());
        assert_eq!((scene.width, scene.height), (900, 200));
    }

    #[test]
    fn test_report_canvas_grows_with_content() {
        let body = vec!["x"; 9].join("\n");
        let scene = report_scene("h", &body, &FixedWidth(10), &ReportStyle::default());
        assert_eq!(scene.height, 400);

        let long = paint(ColorTag::Info, &"y".repeat(100));
        let scene = report_scene("h", &long, &FixedWidth(10), &ReportStyle::default());
        // markup does not count towards the width
        assert_eq!(scene.width, 1400);
    }

    #[test]
    fn test_report_width_is_monotonic() {
        let style = ReportStyle::default();
        let mut previous = 0;
        for len in [0, 10, 64, 65, 66, 200] {
            let line = "z".repeat(len);
            let (width, _) = style.canvas_size(&[line.as_str()]);
            assert!(width >= previous);
            assert!(width >= 900);
            previous = width;
        }
    }

    #[test]
    fn test_report_canvas_is_bounded() {
        let line = "w".repeat(10_000);
        let body = vec![line.as_str(); 200].join("\n");
        let style = ReportStyle::default();
        let scene = report_scene("h", &body, &FixedWidth(10), &style);
        assert_eq!((scene.width, scene.height), (4096, 4096));
        assert!(scene.texts.iter().all(|t| t.y < 4096 && t.x < 4096));
    }

    #[test]
    fn test_report_clipped_segments_are_skipped() {
        let style = ReportStyle {
            max_width: 900,
            max_height: 200,
            ..ReportStyle::default()
        };
        let wide = format!("{}{}", "a".repeat(100), paint(ColorTag::Error, "tail"));
        let body = format!("{}\n{}", wide, vec!["x"; 20].join("\n"));
        let scene = report_scene("h", &body, &FixedWidth(10), &style);
        assert_eq!((scene.width, scene.height), (900, 200));
        assert!(!scene.texts.iter().any(|t| t.text == "tail"));
        // lines start at y = 10, 46, 82, 118, 154, 190
        assert_eq!(scene.texts.iter().filter(|t| t.x == 10).count(), 6);
    }

    #[test]
    fn test_report_blank_lines_still_advance() {
        let scene = report_scene("h", "a\n\nb", &FixedWidth(10), &ReportStyle::default());
        let ys: Vec<i32> = scene.texts.iter().map(|t| t.y).collect();
        assert_eq!(ys, vec![10, 46, 118]);
    }

    #[test]
    fn test_node_table_layout() {
        let nodes = vec![summary("local", "This host"), summary("hk", "Hong Kong")];
        let scene = node_table_scene(&nodes, &FixedWidth(10), &TableStyle::default());
        assert_eq!(scene.background, Rgb(20, 20, 20));
        assert_eq!(scene.width, 800);
        assert_eq!(scene.height, 50 * 3 + 40);

        assert_eq!(scene.texts[0].text, "Node list");
        assert_eq!(scene.texts[0].color, Rgb(100, 200, 255));
        assert_eq!((scene.texts[0].x, scene.texts[0].y), (20, 20));

        assert_eq!(scene.texts[1].text, "local");
        assert_eq!(scene.texts[1].color, Rgb(255, 200, 0));
        assert_eq!((scene.texts[1].x, scene.texts[1].y), (20, 70));
        assert_eq!(scene.texts[2].text, "- This host");
        assert_eq!(scene.texts[2].x, 20 + 50 + 10);
        assert_eq!(scene.texts[2].color, WHITE);

        assert_eq!(scene.texts[3].y, 120);
    }

    #[test]
    fn test_node_table_widens_for_long_rows() {
        let nodes = vec![summary("frankfurt-edge", &"a".repeat(90))];
        let scene = node_table_scene(&nodes, &FixedWidth(10), &TableStyle::default());
        let row = "frankfurt-edge - ".len() + 90;
        assert_eq!(scene.width, row as u32 * 10 + 40);
    }

    #[test]
    fn test_empty_node_table() {
        let scene = node_table_scene(&[], &FixedWidth(10), &TableStyle::default());
        assert_eq!(scene.texts.len(), 1);
        assert_eq!(scene.height, 90);
    }
}
