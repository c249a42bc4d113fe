//! Export Pipeline
//!
//! Serialises a node of the full-resolution canvas to SVG or rasterises it
//! to PNG at 1:1 with the node's own frame. Preview scaling never reaches
//! this module: it only ever sees the unscaled tree.
//!
//! Every image reference is embedded as a base64 data URI before
//! serialisation. Remote URLs get a fresh `cacheBust` parameter on every
//! export so an edited image is always refetched.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use chrono::{DateTime, Utc};
use log::{info, warn};
use resvg::tiny_skia;
use resvg::usvg;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hashing::sha256_hex;
use crate::scene::Node;
use crate::svg;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

/// Append the format's extension unless `name` already ends with it.
pub fn normalize_file_name(name: &str, format: ExportFormat) -> String {
    let suffix = format!(".{}", format.extension());
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Add `cacheBust=<token>` to a URL, keeping any existing query and fragment.
pub fn cache_bust(url: &str, token: &str) -> String {
    let (base, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{}{}cacheBust={}{}", base, sep, token, fragment)
}

pub fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// MIME type of an embeddable image. Raster bytes must decode; anything
/// else must parse as SVG.
pub fn image_mime(bytes: &[u8]) -> Result<&'static str, ExportError> {
    if let Ok(format) = image::guess_format(bytes) {
        image::load_from_memory_with_format(bytes, format)
            .map_err(|e| ExportError::ExportFailed(format!("cannot decode {:?} image: {}", format, e)))?;
        return Ok(format.to_mime_type());
    }
    usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map(|_| "image/svg+xml")
        .map_err(|_| ExportError::ExportFailed("unrecognised image data".to_string()))
}

fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Where image bytes come from. Remote URLs arrive already cache-busted.
pub trait ImageSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ExportError>;
}

/// Reads local files (relative to `root`) and refuses anything remote.
#[derive(Debug, Clone, Default)]
pub struct LocalImageSource {
    root: Option<PathBuf>,
}

impl LocalImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl ImageSource for LocalImageSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ExportError> {
        if is_remote(url) {
            return Err(ExportError::ExportFailed(format!(
                "remote image not available offline: {}",
                url
            )));
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        let path = match &self.root {
            Some(root) if Path::new(path).is_relative() => root.join(path),
            _ => PathBuf::from(path),
        };
        fs::read(&path).map_err(|e| {
            ExportError::ExportFailed(format!("cannot read image {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub target_node_id: String,
    pub file_name: String,
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub file_name: String,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write the file into `dir` under its normalised name.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

pub struct ExportPipeline<S: ImageSource> {
    source: S,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl<S: ImageSource> ExportPipeline<S> {
    /// Pipeline using the system fonts, loaded once here.
    pub fn new(source: S) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        info!("export font database loaded: {} faces", db.len());
        Self::with_font_database(source, Arc::new(db))
    }

    pub fn with_font_database(source: S, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { source, fontdb }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Export the node with id `request.target_node_id` found under `root`.
    pub fn export(&self, root: &Node, request: &ExportRequest) -> Result<ExportedFile, ExportError> {
        let node = root.find(&request.target_node_id).ok_or_else(|| {
            ExportError::ExportFailed(format!("no node with id {}", request.target_node_id))
        })?;
        match request.format {
            ExportFormat::Png => self.export_as_raster(node, &request.file_name),
            ExportFormat::Svg => self.export_as_vector(node, &request.file_name),
        }
    }

    pub fn export_as_vector(&self, node: &Node, file_name: &str) -> Result<ExportedFile, ExportError> {
        self.run(node, file_name, ExportFormat::Svg)
    }

    pub fn export_as_raster(&self, node: &Node, file_name: &str) -> Result<ExportedFile, ExportError> {
        self.run(node, file_name, ExportFormat::Png)
    }

    fn run(&self, node: &Node, file_name: &str, format: ExportFormat) -> Result<ExportedFile, ExportError> {
        let file_name = normalize_file_name(file_name, format);
        info!("exporting {} as {}", node.id.as_deref().unwrap_or("<anonymous>"), file_name);
        let result = self.encode(node, format);
        match result {
            Ok((bytes, width, height)) => {
                info!("exported {} ({}x{}, {} bytes)", file_name, width, height, bytes.len());
                Ok(ExportedFile {
                    file_name,
                    format,
                    width,
                    height,
                    byte_len: bytes.len(),
                    sha256: sha256_hex(&bytes),
                    created_at: Utc::now(),
                    bytes,
                })
            }
            Err(e) => {
                warn!("export of {} failed: {}", file_name, e);
                Err(e)
            }
        }
    }

    fn encode(&self, node: &Node, format: ExportFormat) -> Result<(Vec<u8>, u32, u32), ExportError> {
        let width = node.frame.width.ceil() as u32;
        let height = node.frame.height.ceil() as u32;
        if width == 0 || height == 0 {
            return Err(ExportError::ExportFailed(format!(
                "node has an empty frame ({}x{})",
                node.frame.width, node.frame.height
            )));
        }
        let images = self.embed_images(node)?;
        let document = svg::document(node, (width as f64, height as f64), &|href: &str| {
            images.get(href).cloned().unwrap_or_else(|| href.to_string())
        });
        match format {
            ExportFormat::Svg => Ok((document.into_bytes(), width, height)),
            ExportFormat::Png => Ok((self.rasterize(&document, width, height)?, width, height)),
        }
    }

    /// Map every image href under `node` to an embedded data URI.
    fn embed_images(&self, node: &Node) -> Result<HashMap<String, String>, ExportError> {
        let token = Utc::now().timestamp_millis().to_string();
        let mut images = HashMap::new();
        for href in node.image_hrefs() {
            if href.starts_with("data:") || images.contains_key(href) {
                continue;
            }
            let url = if is_remote(href) {
                cache_bust(href, &token)
            } else {
                href.to_string()
            };
            let bytes = self.source.fetch(&url)?;
            let mime = image_mime(&bytes)
                .map_err(|e| ExportError::ExportFailed(format!("{}: {}", href, e)))?;
            images.insert(href.to_string(), data_uri(mime, &bytes));
        }
        Ok(images)
    }

    fn rasterize(&self, document: &str, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
        let mut opt = usvg::Options::default();
        opt.fontdb = self.fontdb.clone();
        let tree = usvg::Tree::from_str(document, &opt)
            .map_err(|e| ExportError::ExportFailed(format!("svg parse: {}", e)))?;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| ExportError::ExportFailed(format!("cannot allocate {}x{} pixmap", width, height)))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        pixmap
            .encode_png()
            .map_err(|e| ExportError::ExportFailed(format!("png encode: {}", e)))
    }
}
