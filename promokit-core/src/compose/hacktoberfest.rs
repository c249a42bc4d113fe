//! Hacktoberfest update: header, repo cards, contribution CTA.

use super::{align_x, anchor_for, line_height, logo, pill, scaled_logo_extent, text_line};
use crate::colors::ResolvedColors;
use crate::content::{HacktoberfestContent, RepoCard};
use crate::layout::{Alignment, ArrangementDescriptor, HeaderArrangement, LayoutPlan};
use crate::palette::{GRAY_600, GRAY_800, WHITE};
use crate::scene::{text_width, wrap_text, Frame, Node, Paint, TextAnchor};

const CARD_RADIUS: f32 = 12.0;
const MAX_DESCRIPTION_LINES: usize = 2;

pub(super) fn render(
    canvas: &mut Node,
    content: &HacktoberfestContent,
    plan: &LayoutPlan,
    colors: &ResolvedColors,
) {
    let inner = canvas.frame.inset(plan.padding as f32);
    let section_gap = if plan.padding < 24 { 8.0 } else { 24.0 };
    let body = plan.type_scale.body as f32;
    let caption = plan.type_scale.caption as f32;
    let title_size = plan.title_size as f32;
    let body_text = Paint::hex(colors.background.body_text_on());

    // Header
    let mut header = Node::group(inner).with_id("header");
    let (logo_w, logo_h) = scaled_logo_extent(plan);
    let title_block_h = line_height(title_size) + line_height(body);
    let header_h = match plan.header {
        HeaderArrangement::Stacked => {
            header.push(logo(inner.x, inner.y, plan, colors));
            let title_y = inner.y + logo_h + 16.0;
            header.push(
                text_line(inner.x, title_y, inner.width, &content.title_text, title_size, 600,
                    Paint::Brand(colors.title), TextAnchor::Start)
                .with_id("title"),
            );
            header.push(text_line(
                inner.x,
                title_y + line_height(title_size),
                inner.width,
                &content.subtitle_text,
                body,
                400,
                body_text.clone(),
                TextAnchor::Start,
            ));
            logo_h + 16.0 + title_block_h
        }
        HeaderArrangement::Row => {
            let header_h = logo_h.max(title_block_h);
            header.push(logo(inner.x, inner.y + (header_h - logo_h) / 2.0, plan, colors));
            let title_x = inner.x + logo_w;
            let title_w = (inner.width - logo_w).max(0.0);
            let title_y = inner.y + (header_h - title_block_h) / 2.0;
            header.push(
                text_line(title_x, title_y, title_w, &content.title_text, title_size, 600,
                    Paint::Brand(colors.title), TextAnchor::End)
                .with_id("title"),
            );
            header.push(text_line(
                title_x,
                title_y + line_height(title_size),
                title_w,
                &content.subtitle_text,
                body,
                400,
                body_text.clone(),
                TextAnchor::End,
            ));
            header_h
        }
    };
    canvas.push(header);
    let mut y = inner.y + header_h + section_gap;

    // Repo cards
    let arrangement = plan.arrange(content.repos.len());
    let list_w = inner.width * arrangement.width_fraction;
    let list_frame = Frame::new(align_x(inner, list_w, arrangement.alignment), y, list_w, 0.0);
    let (repos, list_h) = repo_list(&content.repos, list_frame, &arrangement, body, caption);
    canvas.push(repos);
    y += list_h + section_gap;

    // CTA and link
    let cta = plan.cta;
    if cta.is_visible() {
        let label = cta.label.unwrap_or("Start Contributing");
        let font = cta.font_size as f32;
        let icon_space = if cta.show_icon { font * 1.5 } else { 0.0 };
        let pill_w = text_width(label, font) + 2.0 * cta.padding_x as f32 + icon_space;
        let pill_h = line_height(font) + 2.0 * cta.padding_y as f32;
        let pill_frame = Frame::new(align_x(inner, pill_w, cta.alignment), y, pill_w, pill_h);
        canvas.push(pill("cta", pill_frame, colors.cta, label, font, cta.show_icon));
        y += pill_h + 8.0;
    }
    if plan.visibility.link_text {
        let anchor = anchor_for(if cta.is_visible() { cta.alignment } else { Alignment::Center });
        canvas.push(
            text_line(inner.x, y, inner.width, &content.link_text, cta.link_font_size as f32, 400,
                body_text, anchor)
            .with_id("link"),
        );
    }
}

fn repo_list(
    repos: &[RepoCard],
    frame: Frame,
    arrangement: &ArrangementDescriptor,
    body: f32,
    caption: f32,
) -> (Node, f32) {
    let columns = arrangement.columns.max(1) as usize;
    let gap = arrangement.gap as f32;
    let card_w = (frame.width - gap * (columns as f32 - 1.0)) / columns as f32;
    let pad = gap;

    let mut list = Node::group(frame).with_id("repos");
    let mut y = frame.y;
    for row in repos.chunks(columns) {
        let row_h = row
            .iter()
            .map(|r| card_height(r, card_w - 2.0 * pad, body, caption) + 2.0 * pad)
            .fold(0.0_f32, f32::max);
        for (col, repo) in row.iter().enumerate() {
            let x = frame.x + col as f32 * (card_w + gap);
            list.push(repo_card(repo, Frame::new(x, y, card_w, row_h), pad, body, caption));
        }
        y += row_h + gap;
    }
    let height = if repos.is_empty() { 0.0 } else { y - frame.y - gap };
    list.frame.height = height;
    (list, height)
}

fn description_lines(repo: &RepoCard, width: f32, caption: f32) -> Vec<String> {
    let mut lines = repo
        .description
        .as_deref()
        .map(|d| wrap_text(d, width, caption))
        .unwrap_or_default();
    lines.truncate(MAX_DESCRIPTION_LINES);
    lines
}

fn card_height(repo: &RepoCard, text_w: f32, body: f32, caption: f32) -> f32 {
    let stats = if repo.stats_line().is_empty() { 0.0 } else { line_height(caption) };
    line_height(body) + description_lines(repo, text_w, caption).len() as f32 * line_height(caption) + stats
}

fn repo_card(repo: &RepoCard, frame: Frame, pad: f32, body: f32, caption: f32) -> Node {
    let mut card = Node::group(frame);
    card.push(Node::rect(frame, Paint::hex(WHITE), CARD_RADIUS));
    let text_x = frame.x + pad;
    let text_w = frame.width - 2.0 * pad;
    let mut y = frame.y + pad;
    card.push(text_line(text_x, y, text_w, &repo.name, body, 600, Paint::hex(GRAY_800), TextAnchor::Start));
    y += line_height(body);
    for line in description_lines(repo, text_w, caption) {
        card.push(text_line(text_x, y, text_w, &line, caption, 400, Paint::hex(GRAY_600), TextAnchor::Start));
        y += line_height(caption);
    }
    let stats = repo.stats_line();
    if !stats.is_empty() {
        card.push(text_line(text_x, y, text_w, &stats, caption, 500, Paint::hex(GRAY_800), TextAnchor::Start));
    }
    card
}

#[cfg(test)]
mod tests {
    use super::super::render as render_template;
    use crate::colors::ColorResolver;
    use crate::content::{DecorVariant, TemplateContent};
    use crate::layout;
    use crate::platforms::PlatformKey;
    use crate::scene::{Node, NodeKind};
    use crate::templates::TemplateKey;

    fn render_for(platform: PlatformKey) -> Node {
        let plan = layout::select(TemplateKey::Hacktoberfest, platform).unwrap();
        let colors = ColorResolver::new().resolved(TemplateKey::Hacktoberfest).unwrap();
        render_template(
            &TemplateContent::default_for(TemplateKey::Hacktoberfest),
            &plan,
            &colors,
            DecorVariant::Playful,
        )
        .unwrap()
    }

    fn cta_label(canvas: &Node) -> Option<String> {
        let cta = canvas.find("cta")?;
        cta.children.iter().find_map(|n| match &n.kind {
            NodeKind::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
    }

    #[test]
    fn test_featured_cta_on_instagram_only() {
        assert_eq!(
            cta_label(&render_for(PlatformKey::InstagramPost)).as_deref(),
            Some("Start Contributing on GitHub")
        );
        assert_eq!(
            cta_label(&render_for(PlatformKey::LinkedinCover)).as_deref(),
            Some("Start Contributing")
        );
    }

    #[test]
    fn test_three_repo_cards_in_meetup_grid_share_a_row() {
        let canvas = render_for(PlatformKey::MeetupBanner);
        let repos = canvas.find("repos").unwrap();
        assert_eq!(repos.children.len(), 3);
        let ys: Vec<f32> = repos.children.iter().map(|c| c.frame.y).collect();
        assert!(ys.iter().all(|y| *y == ys[0]));
    }

    #[test]
    fn test_linkedin_repos_take_right_half() {
        let canvas = render_for(PlatformKey::LinkedinCover);
        let repos = canvas.find("repos").unwrap();
        assert!(repos.frame.x > canvas.frame.width / 2.0 - 10.0);
    }
}
