//! Promokit Core - on-brand promo graphics
//!
//! Platform sizes, type scales and layout plans per template, a color
//! constraint resolver that keeps every foreground off its background, a
//! scaled preview and a 1:1 export pipeline (SVG and PNG).
//!
//! The canvas tree produced by [`compose::render`] is the single source
//! for both preview and export; neither consumer mutates it.

pub mod error;
pub mod platforms;
pub mod typography;
pub mod palette;
pub mod templates;
pub mod colors;
pub mod content;
pub mod layout;
pub mod scene;
pub mod decor;
pub mod compose;
pub mod svg;
pub mod preview;
pub mod export;
pub mod hashing;
pub mod validation;
pub mod pipeline;

pub use error::{ColorRejection, EngineError};
pub use platforms::{PlatformKey, PlatformSpec};
pub use typography::TypeScale;
pub use palette::RootColor;
pub use templates::{ColorSlot, LogoPart, TemplateKey};
pub use colors::{repair, ColorResolver, ResolvedColors, SlotRepair};
pub use content::{DecorVariant, TemplateContent};
pub use layout::{ArrangementDescriptor, LayoutPlan};
pub use scene::Node;
pub use preview::{scale_factor, ScaledPreview};
pub use export::{ExportError, ExportFormat, ExportPipeline, ExportedFile, ImageSource, LocalImageSource};
pub use hashing::{canonical_json, compute_job_hash, sha256_hex};
pub use validation::{ColorAssignment, FailureMode, ValidationResult, Validator};
pub use pipeline::{Attempt, JobReport, Notice, NoticeKind, RenderJob, Studio, StudioError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
