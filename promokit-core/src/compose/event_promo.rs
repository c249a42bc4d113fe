//! Event promotion: title and logo row, speakers, details, badges, sign-up CTA.

use super::{align_x, line_height, logo, pill, placeholder, scaled_logo_extent, text_line};
use crate::colors::ResolvedColors;
use crate::content::{AudienceType, EventPromoContent, Facility, Speaker};
use crate::layout::{LayoutPlan, SpeakerPresentation};
use crate::palette::{RootColor, GRAY_600, WHITE};
use crate::scene::{text_width, wrap_text, Frame, Node, NodeKind, Paint, TextAnchor};
use crate::templates::ColorSlot;

const PARTNER_LOGO_HEIGHT: f32 = 80.0;
const PARTNER_LOGO_WIDTH: f32 = 160.0;
const DETAILS_SHARE: f32 = 0.4;

struct Badge {
    id: &'static str,
    label: &'static str,
    color: RootColor,
}

fn badges(content: &EventPromoContent, colors: &ResolvedColors) -> Vec<Badge> {
    let mut out = vec![];
    match content.audience_type {
        Some(AudienceType::WomenOnly) => out.push(Badge {
            id: "badge-women-only",
            label: "Women Only 👩‍💻",
            color: colors.badge(ColorSlot::AlliesBadge),
        }),
        Some(AudienceType::AlliesWelcome) => out.push(Badge {
            id: "badge-allies",
            label: "Allies: Bring a 👩 Friend",
            color: colors.badge(ColorSlot::AlliesBadge),
        }),
        None => {}
    }
    if content.has_facility(Facility::NursingRoom) {
        out.push(Badge {
            id: "badge-nursing",
            label: "Nursing Room Available 🍼",
            color: colors.badge(ColorSlot::NursingBadge),
        });
    }
    if content.has_facility(Facility::ParentsAndKids) {
        out.push(Badge {
            id: "badge-parents",
            label: "Parents & Kids Welcome 👨‍👩‍👧‍👦",
            color: colors.badge(ColorSlot::ParentsBadge),
        });
    }
    out
}

pub(super) fn render(
    canvas: &mut Node,
    content: &EventPromoContent,
    plan: &LayoutPlan,
    colors: &ResolvedColors,
) {
    let inner = canvas.frame.inset(plan.padding as f32);
    let headline = plan.title_size as f32;
    let body = plan.type_scale.body as f32;
    let caption = plan.type_scale.caption as f32;
    let body_text = Paint::hex(colors.background.body_text_on());
    let gap = 16.0;

    // Title with the logo at the end of the row
    let (logo_w, logo_h) = scaled_logo_extent(plan);
    let title_w = (inner.width - logo_w - gap).max(0.0);
    let mut y = inner.y;
    canvas.push(
        text_line(inner.x, y, title_w, &content.event_name, headline, 700,
            Paint::Brand(colors.title), TextAnchor::Start)
        .with_id("title"),
    );
    canvas.push(logo(align_x(inner, logo_w, plan.logo.side), y, plan, colors));
    y += line_height(headline).max(logo_h);

    if let Some(subtitle) = content.event_subtitle.as_deref().filter(|s| !s.is_empty()) {
        canvas.push(text_line(inner.x, y, inner.width, subtitle, body, 400, body_text.clone(), TextAnchor::Start));
        y += line_height(body);
    }
    if let Some(description) = content.event_description.as_deref().filter(|s| !s.is_empty()) {
        for line in wrap_text(description, inner.width * 0.7, caption) {
            canvas.push(text_line(inner.x, y, inner.width, &line, caption, 400, body_text.clone(), TextAnchor::Start));
            y += line_height(caption);
        }
    }
    y += gap;

    // Speakers on the left, details and badges on the right
    let details_w = inner.width * DETAILS_SHARE;
    let speakers_frame = Frame::new(inner.x, y, inner.width - details_w - gap, 0.0);
    let (speakers, speakers_h) = speaker_block(content.visible_speakers(), speakers_frame, plan, body, caption);
    canvas.push(speakers);

    let details_x = inner.right() - details_w;
    let mut details = Node::group(Frame::new(details_x, y, details_w, 0.0)).with_id("details");
    let mut dy = y;
    details.push(text_line(details_x, dy, details_w, &format!("📅{}", content.event_date_time), body, 600,
        body_text.clone(), TextAnchor::End));
    dy += line_height(body);
    details.push(text_line(details_x, dy, details_w, &format!("📍{}", content.event_venue), body, 400,
        body_text.clone(), TextAnchor::End));
    dy += line_height(body) + 12.0;
    if plan.visibility.badges {
        for badge in badges(content, colors) {
            let badge_h = line_height(caption) + 12.0;
            let badge_w = (text_width(badge.label, caption) + 24.0).min(details_w);
            let frame = Frame::new(details_x + details_w - badge_w, dy, badge_w, badge_h);
            details.push(badge_node(&badge, frame, caption));
            dy += badge_h + 8.0;
        }
    }
    details.frame.height = dy - y;
    canvas.push(details);
    y += speakers_h.max(dy - y) + 24.0;

    // CTA below the speaker cards; the link line shows even when the CTA is hidden
    let cta = plan.cta;
    if plan.visibility.cta {
        let label = cta.label.unwrap_or(content.cta_text.as_str());
        let font = cta.font_size as f32;
        let pill_w = text_width(label, font) + 2.0 * cta.padding_x as f32;
        let pill_h = line_height(font) + 2.0 * cta.padding_y as f32;
        let frame = Frame::new(align_x(inner, pill_w, cta.alignment), y, pill_w, pill_h);
        canvas.push(pill("cta", frame, colors.cta, label, font, cta.show_icon));
        y += pill_h + 8.0;
    }
    if plan.visibility.link_text {
        canvas.push(
            text_line(inner.x, y, inner.width, &content.link_text, cta.link_font_size as f32, 400,
                body_text, TextAnchor::Middle)
            .with_id("link"),
        );
    }

    if plan.visibility.partner_logos {
        let logos = content.visible_partner_logos();
        if !logos.is_empty() {
            canvas.push(partner_logos(&logos, canvas.frame));
        }
    }
}

fn badge_node(badge: &Badge, frame: Frame, size: f32) -> Node {
    let mut group = Node::group(frame).with_id(badge.id);
    group.push(Node {
        id: None,
        frame,
        kind: NodeKind::Rect {
            fill: Paint::hex(WHITE),
            stroke: Paint::Brand(badge.color),
            stroke_width: 2.0,
            radius: frame.height / 2.0,
        },
        children: vec![],
    });
    group.push(text_line(
        frame.x,
        frame.y + 6.0,
        frame.width,
        badge.label,
        size,
        600,
        Paint::Brand(badge.color),
        TextAnchor::Middle,
    ));
    group
}

fn speaker_block(
    speakers: &[Speaker],
    frame: Frame,
    plan: &LayoutPlan,
    body: f32,
    caption: f32,
) -> (Node, f32) {
    let mut block = Node::group(frame).with_id("speakers");
    let text_h = line_height(body) + line_height(caption);
    let height = match plan.speaker_presentation(speakers.len()) {
        SpeakerPresentation::Single { portrait, placeholder: ph } => {
            let Some(speaker) = speakers.first() else {
                return (block, 0.0);
            };
            let side = (if speaker.image().is_some() { portrait } else { ph }) as f32;
            let text_w = (text_width(&speaker.name, body)).max(
                speaker.title.as_deref().map(|t| text_width(t, caption)).unwrap_or(0.0),
            );
            let total_w = (side + 12.0 + text_w).min(frame.width);
            let x = align_x(frame, total_w, plan.arrange(1).alignment);
            block.push(portrait_node(speaker, Frame::new(x, frame.y + 8.0, side, side)));
            let text_y = frame.y + 8.0 + (side - text_h) / 2.0;
            push_speaker_text(&mut block, speaker, x + side + 12.0, text_y, frame.right() - x - side - 12.0,
                body, caption, TextAnchor::Start);
            side + 16.0
        }
        SpeakerPresentation::Row { columns, thumbnail, placeholder: ph } => {
            let gap = plan.arrange(speakers.len()).gap as f32;
            let columns = columns.max(1) as usize;
            let cell_w = (frame.width - gap * (columns as f32 - 1.0)) / columns as f32;
            let mut y = frame.y;
            let mut row_h = 0.0_f32;
            for row in speakers.chunks(columns) {
                for (col, speaker) in row.iter().enumerate() {
                    let side = (if speaker.image().is_some() { thumbnail } else { ph }) as f32;
                    let side = side.min(cell_w);
                    let x = frame.x + col as f32 * (cell_w + gap);
                    block.push(portrait_node(speaker, Frame::new(x + (cell_w - side) / 2.0, y, side, side)));
                    push_speaker_text(&mut block, speaker, x, y + side + 8.0, cell_w, body, caption,
                        TextAnchor::Middle);
                    row_h = row_h.max(side + 8.0 + text_h);
                }
                y += row_h + gap;
            }
            y - frame.y - gap
        }
    };
    block.frame.height = height;
    (block, height)
}

fn portrait_node(speaker: &Speaker, frame: Frame) -> Node {
    match speaker.image() {
        Some(url) => Node::image(frame, url, 8.0),
        None => placeholder(frame),
    }
}

fn push_speaker_text(
    block: &mut Node,
    speaker: &Speaker,
    x: f32,
    y: f32,
    width: f32,
    body: f32,
    caption: f32,
    anchor: TextAnchor,
) {
    block.push(text_line(x, y, width, &speaker.name, body, 600, Paint::hex("#111827"), anchor));
    if let Some(title) = speaker.title.as_deref().filter(|t| !t.is_empty()) {
        block.push(text_line(x, y + line_height(body), width, title, caption, 400, Paint::hex(GRAY_600), anchor));
    }
}

fn partner_logos(logos: &[&str], canvas: Frame) -> Node {
    let gap = 12.0;
    let count = logos.len() as f32;
    let row_w = count * PARTNER_LOGO_WIDTH + (count - 1.0) * gap;
    let x0 = canvas.right() - row_w;
    let y = canvas.bottom() - 16.0 - PARTNER_LOGO_HEIGHT;
    let mut row = Node::group(Frame::new(x0, y, row_w, PARTNER_LOGO_HEIGHT)).with_id("partners");
    for (i, src) in logos.iter().enumerate() {
        let x = x0 + i as f32 * (PARTNER_LOGO_WIDTH + gap);
        row.push(Node::image(Frame::new(x, y, PARTNER_LOGO_WIDTH, PARTNER_LOGO_HEIGHT), src, 0.0));
    }
    row
}
