//! Background decor
//!
//! Static motifs drawn in a 1000×1000 design space and fitted into the
//! target frame (centered, aspect preserved).

use crate::content::DecorVariant;
use crate::palette::RootColor;
use crate::scene::{Frame, Node, NodeKind, Paint, TextAnchor, Transform};

const DESIGN_SIZE: f32 = 1000.0;
const DECOR_OPACITY: f32 = 0.16;

const EMOJI_SPOTS: [(f32, f32); 8] = [
    (90.0, 110.0),
    (820.0, 90.0),
    (420.0, 230.0),
    (130.0, 540.0),
    (760.0, 470.0),
    (470.0, 700.0),
    (100.0, 880.0),
    (840.0, 860.0),
];

fn emoji_set(variant: DecorVariant) -> &'static [&'static str] {
    match variant {
        DecorVariant::Tech => &["💻", "⌨️", "🖥️", "🤖", "🧑‍💻", "⚙️", "🔌", "📡"],
        DecorVariant::Games => &["🎮", "👾", "🕹️", "🎲", "🏆", "⭐", "🧩", "🎯"],
        DecorVariant::Women => &["👩‍💻", "👩‍🔬", "👩‍🚀", "👩‍🎨", "👩‍🏫", "💜", "👩‍🔧", "🌸"],
        DecorVariant::Playful => &[],
    }
}

fn playful_shapes() -> Vec<Node> {
    let mut shapes = vec![
        Node::circle(120.0, 120.0, 90.0, Paint::Brand(RootColor::Teal)),
        Node::rect(
            Frame::new(780.0, 60.0, 140.0, 90.0),
            Paint::Brand(RootColor::Coral),
            28.0,
        ),
        Node::path("M80 520 L220 460 L180 620 Z", Paint::Brand(RootColor::Navy)),
        Node::path(
            "M500 380c60-40 140-20 160 30s-20 120-90 150-150 10-170-40 40-100 100-140Z",
            Paint::Brand(RootColor::Yellow),
        ),
    ];
    shapes.extend((0..10).map(|i| {
        let i = i as f32;
        Node::circle(300.0 + i * 35.0, 120.0 + i * 22.0, 6.0, Paint::Brand(RootColor::Navy))
    }));
    shapes.extend((0..6).map(|i| {
        Node::rect(
            Frame::new(80.0 + i as f32 * 26.0, 820.0, 18.0, 120.0),
            Paint::Brand(RootColor::Offwhite),
            6.0,
        )
    }));
    shapes.push(Node::ring(880.0, 860.0, 70.0, Paint::Brand(RootColor::Teal), 10.0));
    shapes.push(Node::ring(880.0, 860.0, 40.0, Paint::Brand(RootColor::Coral), 10.0));
    shapes
}

fn emoji_scatter(variant: DecorVariant) -> Vec<Node> {
    emoji_set(variant)
        .iter()
        .zip(EMOJI_SPOTS)
        .map(|(emoji, (x, y))| {
            Node::text(
                Frame::new(x - 50.0, y - 50.0, 100.0, 100.0),
                emoji,
                90.0,
                400,
                Paint::hex("#000000"),
                TextAnchor::Middle,
            )
        })
        .collect()
}

/// Decor for `variant`, fitted into `frame`.
pub fn render(variant: DecorVariant, frame: Frame) -> Node {
    let scale = (frame.width / DESIGN_SIZE).min(frame.height / DESIGN_SIZE);
    let transform = Transform {
        translate_x: frame.x + (frame.width - DESIGN_SIZE * scale) / 2.0,
        translate_y: frame.y + (frame.height - DESIGN_SIZE * scale) / 2.0,
        scale,
    };
    let children = match variant {
        DecorVariant::Playful => playful_shapes(),
        other => emoji_scatter(other),
    };
    Node {
        id: Some("decor".to_string()),
        frame,
        kind: NodeKind::Group {
            opacity: DECOR_OPACITY,
            transform: Some(transform),
            clip: false,
        },
        children,
    }
}
