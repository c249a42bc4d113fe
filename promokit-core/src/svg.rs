//! SVG serialisation of the visual tree
//!
//! The same writer backs the on-screen preview and vector export. Callers
//! choose the outer size; the view box is always the node's own frame, so
//! internal coordinates stay at full resolution.

use std::fmt::Write;

use crate::scene::{Frame, Node, NodeKind, TextAnchor};

const FONT_FAMILY: &str = "Montserrat, ui-sans-serif, system-ui, sans-serif";
/// Baseline offset from the top of a text frame, as a share of font size.
const BASELINE: f32 = 0.9;

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialise `node` as a standalone SVG document.
///
/// `outer` is the document's width/height attributes; `resolve_href` maps
/// image URLs to what gets written (e.g. embedded data URIs).
pub fn document(node: &Node, outer: (f64, f64), resolve_href: &dyn Fn(&str) -> String) -> String {
    let f = node.frame;
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        outer.0, outer.1, f.x, f.y, f.width, f.height
    );
    let mut writer = Writer {
        out,
        clip_ids: 0,
        resolve_href,
    };
    writer.node(node);
    writer.out.push_str("</svg>");
    writer.out
}

struct Writer<'a> {
    out: String,
    clip_ids: usize,
    resolve_href: &'a dyn Fn(&str) -> String,
}

impl Writer<'_> {
    fn id_attr(node: &Node) -> String {
        node.id
            .as_deref()
            .map(|id| format!(r#" id="{}""#, escape_xml(id)))
            .unwrap_or_default()
    }

    fn clip(&mut self, frame: Frame, radius: f32) -> String {
        self.clip_ids += 1;
        let id = format!("clip-{}", self.clip_ids);
        let _ = write!(
            self.out,
            r#"<defs><clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}" rx="{}"/></clipPath></defs>"#,
            id, frame.x, frame.y, frame.width, frame.height, radius
        );
        id
    }

    fn node(&mut self, node: &Node) {
        let id = Self::id_attr(node);
        let f = node.frame;
        match &node.kind {
            NodeKind::Group {
                opacity,
                transform,
                clip,
            } => {
                let clip_attr = if *clip {
                    format!(r#" clip-path="url(#{})""#, self.clip(f, 16.0))
                } else {
                    String::new()
                };
                let opacity_attr = if *opacity < 1.0 {
                    format!(r#" opacity="{}""#, opacity)
                } else {
                    String::new()
                };
                let transform_attr = transform
                    .map(|t| format!(r#" transform="{}""#, t.to_svg()))
                    .unwrap_or_default();
                let _ = write!(self.out, "<g{}{}{}{}>", id, clip_attr, opacity_attr, transform_attr);
                for child in &node.children {
                    self.node(child);
                }
                self.out.push_str("</g>");
            }
            NodeKind::Rect {
                fill,
                stroke,
                stroke_width,
                radius,
            } => {
                let _ = write!(
                    self.out,
                    r#"<rect{} x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    id, f.x, f.y, f.width, f.height, radius, fill.to_svg(), stroke.to_svg(), stroke_width
                );
            }
            NodeKind::Circle {
                fill,
                stroke,
                stroke_width,
            } => {
                let _ = write!(
                    self.out,
                    r#"<circle{} cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    id,
                    f.x + f.width / 2.0,
                    f.y + f.height / 2.0,
                    f.width / 2.0,
                    fill.to_svg(),
                    stroke.to_svg(),
                    stroke_width
                );
            }
            NodeKind::Path { d, fill } => {
                let _ = write!(
                    self.out,
                    r#"<path{} d="{}" fill="{}"/>"#,
                    id,
                    escape_xml(d),
                    fill.to_svg()
                );
            }
            NodeKind::Text {
                content,
                size,
                weight,
                fill,
                anchor,
            } => {
                let x = match anchor {
                    TextAnchor::Start => f.x,
                    TextAnchor::Middle => f.x + f.width / 2.0,
                    TextAnchor::End => f.right(),
                };
                let _ = write!(
                    self.out,
                    r#"<text{} x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" fill="{}" text-anchor="{}">{}</text>"#,
                    id,
                    x,
                    f.y + size * BASELINE,
                    FONT_FAMILY,
                    size,
                    weight,
                    fill.to_svg(),
                    anchor.as_svg(),
                    escape_xml(content)
                );
            }
            NodeKind::Image { href, radius } => {
                let clip_attr = if *radius > 0.0 {
                    format!(r#" clip-path="url(#{})""#, self.clip(f, *radius))
                } else {
                    String::new()
                };
                let resolved = (self.resolve_href)(href);
                let _ = write!(
                    self.out,
                    r#"<image{}{} x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" xlink:href="{}"/>"#,
                    id,
                    clip_attr,
                    f.x,
                    f.y,
                    f.width,
                    f.height,
                    escape_xml(&resolved)
                );
            }
        }
    }
}
