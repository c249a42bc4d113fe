//! Studio - the editing session
//!
//! Owns the active template/platform, per-template content and the color
//! resolver, and wires them into rendering, preview and export. Jobs loaded
//! from JSON always go through color validation before anything is applied.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::colors::{self, ColorResolver, SlotRepair};
use crate::compose;
use crate::content::{DecorVariant, TemplateContent};
use crate::error::EngineError;
use crate::export::{ExportError, ExportFormat, ExportPipeline, ExportRequest, ExportedFile, ImageSource};
use crate::hashing::compute_job_hash;
use crate::layout::{self, LayoutPlan};
use crate::palette::RootColor;
use crate::platforms::PlatformKey;
use crate::preview::ScaledPreview;
use crate::scene::{Node, CANVAS_ID};
use crate::templates::{self, ColorSlot, LogoPart, TemplateKey};
use crate::typography::{self, TypeScale};
use crate::validation::{ColorAssignment, FailureMode, ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Job requires engine >= {required}, current is {current}")]
    EngineVersionMismatch { required: String, current: String },

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    InvalidColorChoice,
    ExportFailed,
}

/// A non-fatal failure reported to the user; session state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn from_error(error: &StudioError) -> Option<Self> {
        let kind = match error {
            StudioError::Engine(e) if e.is_recoverable() => NoticeKind::InvalidColorChoice,
            StudioError::Export(ExportError::ExportFailed(_)) => NoticeKind::ExportFailed,
            _ => return None,
        };
        Some(Self {
            kind,
            message: error.to_string(),
        })
    }
}

/// Outcome of a "try_" operation: the value, or a notice for the user.
pub type Attempt<T> = Result<T, Notice>;

fn soften<T>(result: Result<T, StudioError>) -> Result<Attempt<T>, StudioError> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(e) => match Notice::from_error(&e) {
            Some(notice) => {
                warn!("{}", notice.message);
                Ok(Err(notice))
            }
            None => Err(e),
        },
    }
}

/// One render described as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderJob {
    pub template: TemplateKey,
    pub platform: PlatformKey,
    #[serde(default)]
    pub engine_min_version: Option<String>,
    #[serde(default)]
    pub decor: DecorVariant,
    #[serde(default)]
    pub colors: ColorAssignment,
    /// Template fields; missing ones take the template defaults.
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub failure_mode: FailureMode,
}

impl RenderJob {
    pub fn new(template: TemplateKey, platform: PlatformKey) -> Self {
        Self {
            template,
            platform,
            engine_min_version: None,
            decor: DecorVariant::default(),
            colors: ColorAssignment::default(),
            content: None,
            file_name: None,
            format: ExportFormat::default(),
            failure_mode: FailureMode::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StudioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, StudioError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Content payload typed for the job's template.
    pub fn template_content(&self) -> Result<TemplateContent, StudioError> {
        let Some(value) = self.content.clone() else {
            return Ok(TemplateContent::default_for(self.template));
        };
        Ok(match self.template {
            TemplateKey::Hacktoberfest => TemplateContent::Hacktoberfest(serde_json::from_value(value)?),
            TemplateKey::EventPromo => TemplateContent::EventPromo(serde_json::from_value(value)?),
        })
    }

    pub fn file_base(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| templates::file_base(self.template, self.platform))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub id: String,
    pub template: TemplateKey,
    pub platform: PlatformKey,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub job_hash: String,
    pub validation: ValidationResult,
    pub repairs: Vec<SlotRepair>,
    pub file_name: String,
}

/// Preview document plus the scale it was drawn at.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPreview {
    pub preview: ScaledPreview,
    pub svg: String,
}

pub fn check_engine_version(required: &str) -> Result<(), StudioError> {
    let engine = semver::Version::parse(ENGINE_VERSION)
        .map_err(|_| StudioError::InvalidVersion(ENGINE_VERSION.to_string()))?;
    let min = semver::Version::parse(required)
        .map_err(|_| StudioError::InvalidVersion(required.to_string()))?;
    if engine < min {
        return Err(StudioError::EngineVersionMismatch {
            required: required.to_string(),
            current: ENGINE_VERSION.to_string(),
        });
    }
    Ok(())
}

fn diff<K: Ord + ToString>(
    before: &BTreeMap<K, RootColor>,
    after: &BTreeMap<K, RootColor>,
) -> Vec<SlotRepair> {
    before
        .iter()
        .filter_map(|(k, from)| {
            let to = *after.get(k)?;
            (to != *from).then(|| SlotRepair {
                slot: k.to_string(),
                from: *from,
                to,
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Studio {
    template: TemplateKey,
    platform: PlatformKey,
    decor: DecorVariant,
    content: BTreeMap<TemplateKey, TemplateContent>,
    colors: ColorResolver,
}

impl Studio {
    /// Session on the first template and platform with default content.
    pub fn new() -> Self {
        let content = TemplateKey::ALL
            .into_iter()
            .map(|t| (t, TemplateContent::default_for(t)))
            .collect();
        Self {
            template: TemplateKey::Hacktoberfest,
            platform: PlatformKey::InstagramPost,
            decor: DecorVariant::default(),
            content,
            colors: ColorResolver::new(),
        }
    }

    pub fn template(&self) -> TemplateKey {
        self.template
    }

    pub fn platform(&self) -> PlatformKey {
        self.platform
    }

    pub fn decor(&self) -> DecorVariant {
        self.decor
    }

    pub fn colors(&self) -> &ColorResolver {
        &self.colors
    }

    pub fn content(&self) -> TemplateContent {
        self.content
            .get(&self.template)
            .cloned()
            .unwrap_or_else(|| TemplateContent::default_for(self.template))
    }

    /// Switch template; the shared logo is re-validated against its background.
    pub fn select_template(&mut self, template: TemplateKey) -> Result<Vec<SlotRepair>, StudioError> {
        let repairs = self.colors.activate(template)?;
        debug!("template {} -> {}", self.template, template);
        self.template = template;
        Ok(repairs)
    }

    pub fn select_platform(&mut self, platform: PlatformKey) {
        debug!("platform {} -> {}", self.platform, platform);
        self.platform = platform;
    }

    pub fn set_decor(&mut self, decor: DecorVariant) {
        self.decor = decor;
    }

    /// Replace the content of whichever template `content` belongs to.
    pub fn set_content(&mut self, content: TemplateContent) {
        self.content.insert(content.template(), content);
    }

    pub fn set_background(&mut self, color: RootColor) -> Result<Vec<SlotRepair>, StudioError> {
        Ok(self.colors.set_anchor(self.template, color, self.template)?)
    }

    pub fn set_slot(&mut self, slot: ColorSlot, color: RootColor) -> Result<(), StudioError> {
        Ok(self.colors.set_dependent(self.template, slot, color)?)
    }

    pub fn set_logo_part(&mut self, part: LogoPart, color: RootColor) -> Result<(), StudioError> {
        Ok(self.colors.set_logo_part(self.template, part, color)?)
    }

    /// Badge click: advance the slot to its next offerable color.
    pub fn cycle_slot(&mut self, slot: ColorSlot) -> Result<RootColor, StudioError> {
        Ok(self.colors.cycle_next(self.template, slot)?)
    }

    pub fn try_set_slot(&mut self, slot: ColorSlot, color: RootColor) -> Result<Attempt<()>, StudioError> {
        soften(self.set_slot(slot, color))
    }

    pub fn try_set_logo_part(&mut self, part: LogoPart, color: RootColor) -> Result<Attempt<()>, StudioError> {
        soften(self.set_logo_part(part, color))
    }

    pub fn available_options(&self) -> Result<Vec<RootColor>, StudioError> {
        Ok(self.colors.available_options(self.template)?)
    }

    pub fn type_scale(&self) -> Result<TypeScale, StudioError> {
        Ok(typography::resolve(self.platform)?)
    }

    pub fn layout(&self) -> Result<LayoutPlan, StudioError> {
        Ok(layout::select(self.template, self.platform)?)
    }

    /// Full-resolution canvas for the current state.
    pub fn render(&self) -> Result<Node, StudioError> {
        let plan = self.layout()?;
        let colors = self.colors.resolved(self.template)?;
        Ok(compose::render(&self.content(), &plan, &colors, self.decor)?)
    }

    /// Canvas fitted into `viewport`. The canvas itself is never modified.
    pub fn preview(&self, viewport: (f64, f64)) -> Result<RenderedPreview, StudioError> {
        let canvas = self.render()?;
        let plan = self.layout()?;
        let preview = ScaledPreview::new((plan.width, plan.height), viewport);
        let svg = preview.render(&canvas);
        Ok(RenderedPreview { preview, svg })
    }

    pub fn default_file_name(&self) -> String {
        templates::file_base(self.template, self.platform)
    }

    /// Export the whole canvas; `file_name` defaults to `<template>-<platform>`.
    pub fn export<S: ImageSource>(
        &self,
        pipeline: &ExportPipeline<S>,
        file_name: Option<&str>,
        format: ExportFormat,
    ) -> Result<ExportedFile, StudioError> {
        let canvas = self.render()?;
        let request = ExportRequest {
            target_node_id: CANVAS_ID.to_string(),
            file_name: file_name.map(str::to_string).unwrap_or_else(|| self.default_file_name()),
            format,
        };
        Ok(pipeline.export(&canvas, &request)?)
    }

    pub fn try_export<S: ImageSource>(
        &self,
        pipeline: &ExportPipeline<S>,
        file_name: Option<&str>,
        format: ExportFormat,
    ) -> Result<Attempt<ExportedFile>, StudioError> {
        soften(self.export(pipeline, file_name, format))
    }

    /// Validate a job's color request against a template's defaults.
    pub fn validate_colors(
        template: TemplateKey,
        colors: &ColorAssignment,
        mode: FailureMode,
    ) -> Result<ValidationResult, StudioError> {
        let info = templates::info(template)?;
        Ok(Validator::new().validate(colors, info, mode))
    }

    /// Engine gate plus color validation for `job` against this session. A
    /// job that leaves the background unset is checked against the live
    /// background of its template, which is what its colors will land on.
    pub fn validate_job(&self, job: &RenderJob) -> Result<ValidationResult, StudioError> {
        if let Some(required) = &job.engine_min_version {
            check_engine_version(required)?;
        }
        let mut colors = job.colors.clone();
        if colors.background.is_none() {
            colors.background = Some(self.colors.anchor(job.template)?);
        }
        Self::validate_colors(job.template, &colors, job.failure_mode)
    }

    /// Load a job into the session. Validation always runs first and a
    /// failed job leaves the session untouched.
    pub fn apply_job(&mut self, job: &RenderJob) -> Result<JobReport, StudioError> {
        let validation = self.validate_job(job)?;
        if !validation.valid {
            return Err(StudioError::ValidationFailed(validation.summary()));
        }
        let content = job.template_content()?;

        let template = job.template;
        let mut resolver = self.colors.clone();
        let mut repairs = resolver.activate(template)?;
        if let Some(bg) = job.colors.background {
            repairs.extend(resolver.set_anchor(template, bg, template)?);
        }
        let anchor = resolver.anchor(template)?;

        let requested = job.colors.slots();
        let slots = colors::repair(&requested, anchor);
        repairs.extend(diff(&requested, &slots));
        for (slot, color) in slots {
            resolver.set_dependent(template, slot, color)?;
        }

        let logo = colors::repair(&job.colors.logo, anchor);
        repairs.extend(diff(&job.colors.logo, &logo));
        for (part, color) in logo {
            resolver.set_logo_part(template, part, color)?;
        }

        let job_hash = compute_job_hash(template, job.platform, job, ENGINE_VERSION)?;

        self.colors = resolver;
        self.template = template;
        self.platform = job.platform;
        self.decor = job.decor;
        self.set_content(content);

        info!(
            "job {}/{} applied ({} repairs)",
            template,
            job.platform,
            repairs.len()
        );
        Ok(JobReport {
            id: Uuid::new_v4().to_string(),
            template,
            platform: job.platform,
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            job_hash,
            validation,
            repairs,
            file_name: job.file_base(),
        })
    }
}

impl Default for Studio {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::HacktoberfestContent;

    #[test]
    fn test_defaults() {
        let studio = Studio::new();
        assert_eq!(studio.template(), TemplateKey::Hacktoberfest);
        assert_eq!(studio.default_file_name(), "hacktoberfest-instagram-post");
        assert_eq!(studio.available_options().unwrap().len(), 4);
    }

    #[test]
    fn test_try_set_slot_turns_collision_into_notice() {
        let mut studio = Studio::new();
        let before = studio.colors().clone();
        let notice = studio.try_set_slot(ColorSlot::Cta, RootColor::Yellow).unwrap().unwrap_err();
        assert_eq!(notice.kind, NoticeKind::InvalidColorChoice);
        assert_eq!(studio.colors(), &before);
        assert!(studio.try_set_slot(ColorSlot::Cta, RootColor::Navy).unwrap().is_ok());
    }

    #[test]
    fn test_unknown_slot_stays_fatal() {
        let mut studio = Studio::new();
        assert!(studio.try_set_slot(ColorSlot::NursingBadge, RootColor::Teal).is_err());
    }

    #[test]
    fn test_template_switch_revalidates_logo() {
        let mut studio = Studio::new();
        studio.set_logo_part(LogoPart::Women, RootColor::Offwhite).unwrap();
        let repairs = studio.select_template(TemplateKey::EventPromo).unwrap();
        assert_eq!(repairs.len(), 1);
        assert_eq!(studio.colors().logo(LogoPart::Women), RootColor::Teal);
    }

    #[test]
    fn test_job_with_content_and_repair() {
        let job = RenderJob::from_json(
            r#"{
                "template": "hacktoberfest",
                "platform": "meetup-banner",
                "failureMode": "repair",
                "colors": { "background": "coral", "title": "coral", "logo": { "devs": "coral" } },
                "content": { "titleText": "Hack the month" }
            }"#,
        )
        .unwrap();
        let mut studio = Studio::new();
        let report = studio.apply_job(&job).unwrap();
        assert_eq!(report.file_name, "hacktoberfest-meetup-banner");
        assert!(report.validation.valid);
        assert_eq!(studio.colors().slot(TemplateKey::Hacktoberfest, ColorSlot::Title).unwrap(), RootColor::Teal);
        assert_eq!(studio.colors().logo(LogoPart::Devs), RootColor::Teal);
        // Default coral CTA was repaired by the background change.
        assert!(report.repairs.iter().any(|r| r.slot == "cta" && r.to == RootColor::Teal));
        let TemplateContent::Hacktoberfest(HacktoberfestContent { title_text, repos, .. }) = studio.content() else {
            panic!("expected hacktoberfest content");
        };
        assert_eq!(title_text, "Hack the month");
        assert_eq!(repos.len(), 3);
    }

    #[test]
    fn test_blocked_job_leaves_state_untouched() {
        let mut job = RenderJob::new(TemplateKey::EventPromo, PlatformKey::LinkedinCover);
        job.colors.background = Some(RootColor::Navy);
        job.colors.cta = Some(RootColor::Navy);
        let mut studio = Studio::new();
        let before = studio.colors().clone();
        let err = studio.apply_job(&job).unwrap_err();
        assert!(matches!(err, StudioError::ValidationFailed(_)));
        assert_eq!(studio.colors(), &before);
        assert_eq!(studio.template(), TemplateKey::Hacktoberfest);
    }

    #[test]
    fn test_job_validated_against_live_background() {
        let mut studio = Studio::new();
        studio.set_background(RootColor::Teal).unwrap();
        let before = studio.colors().clone();

        let clash = RenderJob::from_json(r#"{"template": "hacktoberfest", "platform": "instagram-post", "colors": {"title": "teal"}}"#).unwrap();
        let err = studio.apply_job(&clash).unwrap_err();
        assert!(matches!(err, StudioError::ValidationFailed(ref m) if m.contains("teal background")));
        assert_eq!(studio.colors(), &before);

        let fine = RenderJob::from_json(r#"{"template": "hacktoberfest", "platform": "instagram-post", "colors": {"title": "yellow"}}"#).unwrap();
        let report = studio.apply_job(&fine).unwrap();
        assert!(report.validation.valid);
        assert!(report.repairs.is_empty());
        assert_eq!(studio.colors().slot(TemplateKey::Hacktoberfest, ColorSlot::Title).unwrap(), RootColor::Yellow);
    }

    #[test]
    fn test_validate_job_runs_engine_gate() {
        let mut job = RenderJob::new(TemplateKey::Hacktoberfest, PlatformKey::InstagramPost);
        job.engine_min_version = Some("99.0.0".to_string());
        assert!(matches!(
            Studio::new().validate_job(&job),
            Err(StudioError::EngineVersionMismatch { .. })
        ));
    }

    #[test]
    fn test_engine_version_gate() {
        assert!(check_engine_version("0.1.0").is_ok());
        assert!(matches!(
            check_engine_version("99.0.0"),
            Err(StudioError::EngineVersionMismatch { .. })
        ));
        assert!(matches!(check_engine_version("soon"), Err(StudioError::InvalidVersion(_))));
    }

    #[test]
    fn test_job_hash_is_stable() {
        let job = RenderJob::new(TemplateKey::EventPromo, PlatformKey::InstagramStory);
        let a = Studio::new().apply_job(&job).unwrap();
        let b = Studio::new().apply_job(&job).unwrap();
        assert_eq!(a.job_hash, b.job_hash);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_preview_does_not_change_export_geometry() {
        let studio = Studio::new();
        let preview = studio.preview((540.0, 540.0)).unwrap();
        assert_eq!(preview.preview.scale(), 0.5);
        assert_eq!(studio.render().unwrap().frame.width, 1080.0);
    }
}
