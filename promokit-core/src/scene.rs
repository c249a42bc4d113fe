//! Visual tree
//!
//! The composed canvas is a tree of nodes laid out in absolute canvas
//! pixels. Nodes that export or preview needs to address carry a stable id.

use serde::Serialize;

use crate::palette::RootColor;

pub const CANVAS_ID: &str = "canvas";

/// Average glyph advance as a share of the font size, used for wrapping.
const GLYPH_ADVANCE: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Frame shrunk by `inset` on every side.
    pub fn inset(&self, inset: f32) -> Frame {
        Frame::new(
            self.x + inset,
            self.y + inset,
            (self.width - 2.0 * inset).max(0.0),
            (self.height - 2.0 * inset).max(0.0),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Paint {
    None,
    Brand(RootColor),
    Hex(String),
}

impl Paint {
    pub fn hex(value: &str) -> Self {
        Paint::Hex(value.to_string())
    }

    pub fn to_svg(&self) -> String {
        match self {
            Paint::None => "none".to_string(),
            Paint::Brand(c) => c.hex().to_string(),
            Paint::Hex(h) => h.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// `translate(tx ty) scale(s)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Transform {
    /// Uniform scale that keeps `(ox, oy)` fixed.
    pub fn scale_about(scale: f32, ox: f32, oy: f32) -> Self {
        Self {
            translate_x: ox - ox * scale,
            translate_y: oy - oy * scale,
            scale,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0 && self.scale == 1.0
    }

    pub fn to_svg(&self) -> String {
        format!(
            "translate({} {}) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Group {
        opacity: f32,
        transform: Option<Transform>,
        clip: bool,
    },
    Rect {
        fill: Paint,
        stroke: Paint,
        stroke_width: f32,
        radius: f32,
    },
    /// Circle inscribed in the frame.
    Circle {
        fill: Paint,
        stroke: Paint,
        stroke_width: f32,
    },
    /// Path data in the frame's coordinate space.
    Path { d: String, fill: Paint },
    /// Single line of text, vertically placed from the frame's top.
    Text {
        content: String,
        size: f32,
        weight: u16,
        fill: Paint,
        anchor: TextAnchor,
    },
    Image { href: String, radius: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: Option<String>,
    pub frame: Frame,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn group(frame: Frame) -> Self {
        Self {
            id: None,
            frame,
            kind: NodeKind::Group {
                opacity: 1.0,
                transform: None,
                clip: false,
            },
            children: vec![],
        }
    }

    pub fn rect(frame: Frame, fill: Paint, radius: f32) -> Self {
        Self::leaf(
            frame,
            NodeKind::Rect {
                fill,
                stroke: Paint::None,
                stroke_width: 0.0,
                radius,
            },
        )
    }

    pub fn circle(cx: f32, cy: f32, r: f32, fill: Paint) -> Self {
        Self::leaf(
            Frame::new(cx - r, cy - r, 2.0 * r, 2.0 * r),
            NodeKind::Circle {
                fill,
                stroke: Paint::None,
                stroke_width: 0.0,
            },
        )
    }

    pub fn ring(cx: f32, cy: f32, r: f32, stroke: Paint, stroke_width: f32) -> Self {
        Self::leaf(
            Frame::new(cx - r, cy - r, 2.0 * r, 2.0 * r),
            NodeKind::Circle {
                fill: Paint::None,
                stroke,
                stroke_width,
            },
        )
    }

    pub fn path(d: &str, fill: Paint) -> Self {
        Self::leaf(
            Frame::new(0.0, 0.0, 0.0, 0.0),
            NodeKind::Path {
                d: d.to_string(),
                fill,
            },
        )
    }

    pub fn text(frame: Frame, content: &str, size: f32, weight: u16, fill: Paint, anchor: TextAnchor) -> Self {
        Self::leaf(
            frame,
            NodeKind::Text {
                content: content.to_string(),
                size,
                weight,
                fill,
                anchor,
            },
        )
    }

    pub fn image(frame: Frame, href: &str, radius: f32) -> Self {
        Self::leaf(
            frame,
            NodeKind::Image {
                href: href.to_string(),
                radius,
            },
        )
    }

    fn leaf(frame: Frame, kind: NodeKind) -> Self {
        Self {
            id: None,
            frame,
            kind,
            children: vec![],
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Depth-first search by id, including `self`.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Visit every node, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn image_hrefs(&self) -> Vec<&str> {
        let mut hrefs = vec![];
        self.walk(&mut |n| {
            if let NodeKind::Image { href, .. } = &n.kind {
                hrefs.push(href.as_str());
            }
        });
        hrefs
    }
}

/// Estimated rendered width of a single line.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_ADVANCE
}

/// Greedy word wrap against an estimated glyph advance.
pub fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines: Vec<String> = vec![];
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && text_width(&candidate, size) > max_width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id() {
        let tree = Node::group(Frame::sized(100, 100))
            .with_id(CANVAS_ID)
            .with_child(Node::group(Frame::sized(10, 10)).with_child(
                Node::rect(Frame::sized(5, 5), Paint::None, 0.0).with_id("inner"),
            ));
        assert!(tree.find(CANVAS_ID).is_some());
        assert_eq!(tree.find("inner").unwrap().frame.width, 5.0);
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four", 10.0 * 0.55 * 9.0, 10.0);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert!(wrap_text("   ", 100.0, 10.0).is_empty());
    }

    #[test]
    fn test_scale_about_keeps_origin() {
        let t = Transform::scale_about(0.5, 100.0, 40.0);
        assert_eq!(100.0 * t.scale + t.translate_x, 100.0);
        assert_eq!(40.0 * t.scale + t.translate_y, 40.0);
    }

    #[test]
    fn test_image_hrefs() {
        let tree = Node::group(Frame::sized(10, 10))
            .with_child(Node::image(Frame::sized(1, 1), "a.png", 0.0))
            .with_child(Node::image(Frame::sized(1, 1), "b.png", 0.0));
        assert_eq!(tree.image_hrefs(), vec!["a.png", "b.png"]);
    }
}
