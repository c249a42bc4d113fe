//! Scaled Preview Container
//!
//! Fits a fixed-size canvas into an arbitrary viewport with a uniform scale.
//! The scale is purely visual: the canvas node is only ever read, so export
//! keeps seeing full-resolution geometry.

use serde::Serialize;

use crate::scene::Node;
use crate::svg;

/// `min(viewport_w / content_w, viewport_h / content_h)`; 1.0 for empty content.
pub fn scale_factor(content: (u32, u32), viewport: (f64, f64)) -> f64 {
    if content.0 == 0 || content.1 == 0 {
        return 1.0;
    }
    let sx = viewport.0 / content.0 as f64;
    let sy = viewport.1 / content.1 as f64;
    sx.min(sy).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledPreview {
    content_width: u32,
    content_height: u32,
    viewport_width: f64,
    viewport_height: f64,
    scale: f64,
}

impl ScaledPreview {
    pub fn new(content: (u32, u32), viewport: (f64, f64)) -> Self {
        Self {
            content_width: content.0,
            content_height: content.1,
            viewport_width: viewport.0,
            viewport_height: viewport.1,
            scale: scale_factor(content, viewport),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.recompute();
    }

    pub fn set_content(&mut self, width: u32, height: u32) {
        self.content_width = width;
        self.content_height = height;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.scale = scale_factor(
            (self.content_width, self.content_height),
            (self.viewport_width, self.viewport_height),
        );
    }

    /// On-screen footprint of the scaled canvas.
    pub fn display_size(&self) -> (f64, f64) {
        (
            self.content_width as f64 * self.scale,
            self.content_height as f64 * self.scale,
        )
    }

    /// CSS transform for hosts that scale a DOM wrapper.
    pub fn css_transform(&self) -> String {
        format!("scale({})", self.scale)
    }

    /// Preview document: outer size scaled, view box at full resolution.
    pub fn render(&self, canvas: &Node) -> String {
        svg::document(canvas, self.display_size(), &|href: &str| href.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Frame;

    #[test]
    fn test_half_scale() {
        assert_eq!(scale_factor((1080, 1080), (540.0, 540.0)), 0.5);
    }

    #[test]
    fn test_smaller_axis_wins() {
        let s = scale_factor((1080, 1080), (300.0, 600.0));
        assert!((s - 0.2778).abs() < 1e-4);
    }

    #[test]
    fn test_recomputes_on_change() {
        let mut preview = ScaledPreview::new((1080, 1920), (540.0, 540.0));
        assert_eq!(preview.scale(), 540.0 / 1920.0);
        preview.set_viewport(1080.0, 1920.0);
        assert_eq!(preview.scale(), 1.0);
        preview.set_content(1128, 191);
        assert_eq!(preview.scale(), 1080.0 / 1128.0);
    }

    #[test]
    fn test_render_keeps_full_resolution_view_box() {
        let canvas = Node::group(Frame::sized(1080, 1080)).with_id("canvas");
        let before = canvas.clone();
        let preview = ScaledPreview::new((1080, 1080), (540.0, 540.0));
        let svg = preview.render(&canvas);
        assert!(svg.contains(r#"width="540" height="540" viewBox="0 0 1080 1080""#));
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(scale_factor((0, 100), (10.0, 10.0)), 1.0);
    }
}
