//! Template rendering
//!
//! Turns validated content, a layout plan and resolved colors into the
//! full-resolution canvas tree. Each template is a pure function of its
//! inputs; the canvas root always carries the id `canvas`.

mod event_promo;
mod hacktoberfest;

use crate::colors::ResolvedColors;
use crate::content::{DecorVariant, TemplateContent};
use crate::decor;
use crate::error::EngineError;
use crate::layout::{Alignment, DecorLayout, LayoutPlan, LogoPlacement, Origin};
use crate::palette::{RootColor, GRAY_200};
use crate::scene::{text_width, Frame, Node, NodeKind, Paint, TextAnchor, Transform, CANVAS_ID};
use crate::templates::LogoPart;

const CANVAS_RADIUS: f32 = 16.0;
const LINE_HEIGHT: f32 = 1.2;

/// Render `content` into a canvas tree sized by `plan`.
pub fn render(
    content: &TemplateContent,
    plan: &LayoutPlan,
    colors: &ResolvedColors,
    decor: DecorVariant,
) -> Result<Node, EngineError> {
    if content.template() != plan.template {
        return Err(EngineError::UnknownLayoutKey(format!(
            "{} content with {} layout",
            content.template(),
            plan.template
        )));
    }
    let mut canvas = canvas(plan, colors, decor);
    match content {
        TemplateContent::Hacktoberfest(c) => hacktoberfest::render(&mut canvas, c, plan, colors),
        TemplateContent::EventPromo(c) => event_promo::render(&mut canvas, c, plan, colors),
    }
    Ok(canvas)
}

fn canvas(plan: &LayoutPlan, colors: &ResolvedColors, variant: DecorVariant) -> Node {
    let frame = Frame::sized(plan.width, plan.height);
    let mut root = Node {
        id: Some(CANVAS_ID.to_string()),
        frame,
        kind: NodeKind::Group {
            opacity: 1.0,
            transform: None,
            clip: true,
        },
        children: vec![],
    };
    root.push(Node::rect(frame, Paint::Brand(colors.background), CANVAS_RADIUS));
    match plan.decor {
        DecorLayout::Single => root.push(decor::render(variant, frame)),
        DecorLayout::SplitHalves => {
            let half = frame.height / 2.0;
            root.push(decor::render(variant, Frame::new(0.0, 0.0, frame.width, half)).with_id("decor-top"));
            root.push(decor::render(variant, Frame::new(0.0, half, frame.width, half)).with_id("decor-bottom"));
        }
    }
    root
}

pub(crate) fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT
}

/// One line of text whose frame spans `[x, x + width)`; the anchor picks the edge.
pub(crate) fn text_line(
    x: f32,
    y: f32,
    width: f32,
    content: &str,
    size: f32,
    weight: u16,
    fill: Paint,
    anchor: TextAnchor,
) -> Node {
    Node::text(
        Frame::new(x, y, width, line_height(size)),
        content,
        size,
        weight,
        fill,
        anchor,
    )
}

pub(crate) fn anchor_for(alignment: Alignment) -> TextAnchor {
    match alignment {
        Alignment::Start => TextAnchor::Start,
        Alignment::Center => TextAnchor::Middle,
        Alignment::End => TextAnchor::End,
    }
}

/// x of a box of `width` aligned inside `outer`.
pub(crate) fn align_x(outer: Frame, width: f32, alignment: Alignment) -> f32 {
    match alignment {
        Alignment::Start => outer.x,
        Alignment::Center => outer.x + (outer.width - width) / 2.0,
        Alignment::End => outer.right() - width,
    }
}

/// Base word size of the logo before placement scaling.
pub(crate) fn logo_word_size(plan: &LayoutPlan) -> f32 {
    plan.type_scale.caption as f32 * 1.6
}

/// Unscaled (width, height) of the logo block.
pub(crate) fn logo_extent(plan: &LayoutPlan) -> (f32, f32) {
    let size = logo_word_size(plan);
    let widest = LogoPart::ALL
        .iter()
        .map(|p| text_width(p.word(), size))
        .fold(0.0_f32, f32::max);
    (widest, size * LogoPart::ALL.len() as f32)
}

/// The three-word logo at `(x, y)`, scaled about its placement origin.
pub(crate) fn logo(x: f32, y: f32, plan: &LayoutPlan, colors: &ResolvedColors) -> Node {
    let size = logo_word_size(plan);
    let (width, height) = logo_extent(plan);
    let placement: LogoPlacement = plan.logo;
    let origin_x = match placement.origin {
        Origin::TopLeft => x,
        Origin::TopRight => x + width,
    };
    let transform = Transform::scale_about(placement.scale, origin_x, y);
    let mut group = Node {
        id: Some("logo".to_string()),
        frame: Frame::new(x, y, width, height),
        kind: NodeKind::Group {
            opacity: 1.0,
            transform: (!transform.is_identity()).then_some(transform),
            clip: false,
        },
        children: vec![],
    };
    for (i, part) in LogoPart::ALL.iter().enumerate() {
        group.push(
            Node::text(
                Frame::new(x, y + i as f32 * size, width, size),
                part.word(),
                size,
                800,
                Paint::Brand(colors.logo_part(*part)),
                TextAnchor::Start,
            )
            .with_id(&part.to_string()),
        );
    }
    group
}

/// On-canvas footprint of the logo after placement scaling.
pub(crate) fn scaled_logo_extent(plan: &LayoutPlan) -> (f32, f32) {
    let (w, h) = logo_extent(plan);
    (w * plan.logo.scale, h * plan.logo.scale)
}

/// Rounded pill with a centered label.
pub(crate) fn pill(
    id: &str,
    frame: Frame,
    fill: RootColor,
    label: &str,
    font_size: f32,
    icon: bool,
) -> Node {
    let mut group = Node::group(frame).with_id(id);
    group.push(Node::rect(frame, Paint::Brand(fill), frame.height / 2.0));
    let label_paint = Paint::hex(fill.label_text_on());
    let icon_space = if icon { font_size * 1.5 } else { 0.0 };
    let text_y = frame.y + (frame.height - line_height(font_size)) / 2.0;
    group.push(text_line(
        frame.x,
        text_y,
        frame.width - icon_space,
        label,
        font_size,
        600,
        label_paint.clone(),
        TextAnchor::Middle,
    ));
    if icon {
        let r = font_size * 0.5;
        group.push(Node::ring(
            frame.right() - icon_space,
            frame.y + frame.height / 2.0,
            r,
            label_paint,
            font_size / 10.0,
        ));
    }
    group
}

/// Grey rounded square standing in for a missing photo.
pub(crate) fn placeholder(frame: Frame) -> Node {
    Node::rect(frame, Paint::hex(GRAY_200), 8.0)
}
