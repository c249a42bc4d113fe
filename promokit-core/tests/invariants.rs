//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::collections::BTreeMap;
use std::sync::Arc;

use promokit_core::{
    colors::{repair, replacement_for},
    content::EventPromoContent,
    export::normalize_file_name,
    layout::{self, CtaPlacement, SpeakerPresentation},
    palette::{RootColor, PALETTE},
    platforms, scale_factor,
    scene::NodeKind, typography, ColorResolver, ColorSlot, EngineError, ExportFormat,
    ExportPipeline, LocalImageSource, PlatformKey, RenderJob, Studio, StudioError, TemplateContent,
    TemplateKey,
};

fn offline_pipeline() -> ExportPipeline<LocalImageSource> {
    ExportPipeline::with_font_database(
        LocalImageSource::new(),
        Arc::new(resvg::usvg::fontdb::Database::new()),
    )
}

fn png_size(bytes: &[u8]) -> (u32, u32) {
    let w = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let h = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    (w, h)
}

#[test]
fn invariant_anchor_change_clears_collisions() {
    for scope in TemplateKey::ALL {
        for color in PALETTE {
            let mut resolver = ColorResolver::new();
            resolver.set_anchor(scope, color, scope).unwrap();
            let colors = resolver.scope(scope).unwrap();
            assert!(
                colors.slots.values().all(|c| *c != color),
                "{} on {} left a colliding slot",
                scope,
                color
            );
            let resolved = resolver.resolved(scope).unwrap();
            assert!(resolved.logo.values().all(|c| *c != color));
        }
    }
}

#[test]
fn invariant_repair_is_deterministic() {
    let slots: BTreeMap<&str, RootColor> = [("cta", RootColor::Navy), ("title", RootColor::Coral)]
        .into_iter()
        .collect();
    let first = repair(&slots, RootColor::Navy);
    for _ in 0..10 {
        assert_eq!(repair(&slots, RootColor::Navy), first);
    }
    assert_eq!(first["cta"], replacement_for(RootColor::Navy));
    assert_eq!(first["title"], RootColor::Coral);
}

#[test]
fn invariant_available_options_exclude_anchor() {
    for scope in TemplateKey::ALL {
        for color in PALETTE {
            let mut resolver = ColorResolver::new();
            resolver.set_anchor(scope, color, scope).unwrap();
            let options = resolver.available_options(scope).unwrap();
            assert_eq!(options.len(), PALETTE.len() - 1);
            assert!(!options.contains(&color));
        }
    }
}

#[test]
fn invariant_colliding_assignment_rejected_without_mutation() {
    for scope in TemplateKey::ALL {
        let mut resolver = ColorResolver::new();
        let anchor = resolver.anchor(scope).unwrap();
        let before = resolver.slot(scope, ColorSlot::Cta).unwrap();
        let err = resolver.set_dependent(scope, ColorSlot::Cta, anchor).unwrap_err();
        assert!(matches!(err, EngineError::InvalidColorChoice { .. }));
        assert!(err.is_recoverable());
        assert_eq!(resolver.slot(scope, ColorSlot::Cta).unwrap(), before);
    }
}

#[test]
fn invariant_type_scale_total_and_stable() {
    for key in PlatformKey::ALL {
        let a = typography::resolve(key).unwrap();
        let b = typography::resolve(key).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn invariant_unknown_keys_are_configuration_errors() {
    assert!(matches!(
        platforms::lookup("tiktok"),
        Err(EngineError::UnknownPlatformKey(_))
    ));
    assert!(matches!(
        layout::select_keys("poster", "instagram-post"),
        Err(EngineError::UnknownLayoutKey(_))
    ));
}

#[test]
fn invariant_speaker_arrangement_boundary() {
    let plan = layout::select(TemplateKey::EventPromo, PlatformKey::InstagramPost).unwrap();
    assert!(matches!(plan.speaker_presentation(1), SpeakerPresentation::Single { .. }));
    assert!(matches!(
        plan.speaker_presentation(2),
        SpeakerPresentation::Row { columns: 2, .. }
    ));

    let mut studio = Studio::new();
    studio.select_template(TemplateKey::EventPromo).unwrap();
    for (count, expected) in [(1usize, 1usize), (2, 2), (3, 3)] {
        studio.set_content(TemplateContent::EventPromo(EventPromoContent {
            speaker_count: count,
            ..Default::default()
        }));
        let canvas = studio.render().unwrap();
        let portraits = canvas
            .find("speakers")
            .unwrap()
            .children
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Rect { .. } | NodeKind::Image { .. }))
            .count();
        assert_eq!(portraits, expected);
    }
}

#[test]
fn invariant_preview_scale() {
    assert_eq!(scale_factor((1080, 1080), (540.0, 540.0)), 0.5);
    let s = scale_factor((1080, 1080), (300.0, 600.0));
    assert!((s - 300.0 / 1080.0).abs() < 1e-12);
    assert!((s - 0.2778).abs() < 1e-4);
}

#[test]
fn invariant_export_filename_normalized() {
    assert_eq!(normalize_file_name("myfile", ExportFormat::Png), "myfile.png");
    assert_eq!(normalize_file_name("myfile.png", ExportFormat::Png), "myfile.png");

    let studio = Studio::new();
    let file = studio
        .export(&offline_pipeline(), Some("myfile"), ExportFormat::Svg)
        .unwrap();
    assert_eq!(file.file_name, "myfile.svg");
    let default = studio.export(&offline_pipeline(), None, ExportFormat::Svg).unwrap();
    assert_eq!(default.file_name, "hacktoberfest-instagram-post.svg");
}

#[test]
fn invariant_export_ignores_preview_scale() {
    let mut studio = Studio::new();
    studio.select_platform(PlatformKey::MeetupBanner);
    let preview = studio.preview((300.0, 300.0)).unwrap();
    assert!(preview.preview.scale() < 1.0);

    let file = studio
        .export(&offline_pipeline(), None, ExportFormat::Png)
        .unwrap();
    let spec = platforms::spec(PlatformKey::MeetupBanner).unwrap();
    assert_eq!(png_size(&file.bytes), (spec.width, spec.height));
}

#[test]
fn invariant_linkedin_suppresses_featured_cta() {
    let post = layout::select(TemplateKey::Hacktoberfest, PlatformKey::InstagramPost).unwrap();
    let linkedin = layout::select(TemplateKey::Hacktoberfest, PlatformKey::LinkedinCover).unwrap();
    assert_eq!(post.cta.placement, CtaPlacement::Featured);
    assert_ne!(linkedin.cta.placement, CtaPlacement::Featured);

    let mut studio = Studio::new();
    let svg_for = |studio: &Studio| {
        let file = studio.export(&offline_pipeline(), None, ExportFormat::Svg).unwrap();
        String::from_utf8(file.bytes).unwrap()
    };
    assert!(svg_for(&studio).contains("Start Contributing on GitHub"));
    studio.select_platform(PlatformKey::LinkedinCover);
    assert!(!svg_for(&studio).contains("Start Contributing on GitHub"));
}

#[test]
fn invariant_apply_job_calls_validate() {
    let job = RenderJob::from_json(
        r#"{"template": "event-promo", "platform": "instagram-story",
            "colors": {"background": "navy", "badges": {"allies-badge": "navy"}}}"#,
    )
    .unwrap();
    let mut studio = Studio::new();
    let err = studio.apply_job(&job).unwrap_err();
    assert!(err.to_string().contains("Validation failed"));
    assert!(matches!(err, StudioError::ValidationFailed(_)));
}

#[test]
fn invariant_failed_export_is_a_notice() {
    let mut studio = Studio::new();
    studio.select_template(TemplateKey::EventPromo).unwrap();
    let mut content = EventPromoContent::default();
    content.speakers[0].image_url = Some("https://example.org/speaker.png".to_string());
    studio.set_content(TemplateContent::EventPromo(content));

    let before = studio.render().unwrap();
    let outcome = studio
        .try_export(&offline_pipeline(), None, ExportFormat::Png)
        .unwrap();
    assert!(outcome.is_err());
    assert_eq!(studio.render().unwrap(), before);
}

#[test]
fn invariant_job_colors_checked_against_live_background() {
    let mut studio = Studio::new();
    studio.select_template(TemplateKey::EventPromo).unwrap();
    studio.set_background(RootColor::Coral).unwrap();

    let clash = RenderJob::from_json(
        r#"{"template": "event-promo", "platform": "instagram-post", "colors": {"cta": "coral"}}"#,
    )
    .unwrap();
    let before = studio.colors().clone();
    assert!(matches!(
        studio.apply_job(&clash),
        Err(StudioError::ValidationFailed(_))
    ));
    assert_eq!(studio.colors(), &before);

    // Offwhite is the template default background but not the live one.
    let fine = RenderJob::from_json(
        r#"{"template": "event-promo", "platform": "instagram-post", "colors": {"cta": "offwhite"}}"#,
    )
    .unwrap();
    let report = studio.apply_job(&fine).unwrap();
    assert!(report.repairs.is_empty());
    assert_eq!(
        studio.colors().slot(TemplateKey::EventPromo, ColorSlot::Cta).unwrap(),
        RootColor::Offwhite
    );
}
