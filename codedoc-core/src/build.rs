//! High-level pipeline: renders every page of a site and writes it out.
//!
//! This module orchestrates a static build for a loaded [`BuildConfig`]:
//!   - Validates the site (every page needs a unique, path-safe slug)
//!   - Removes stale `.html` pages left behind by a previous build
//!   - Renders each page with [`crate::render::render_page`] plus the shared stylesheet
//!   - Writes all outputs through a [`PageWriter`], concurrently and fail-fast
//!   - Returns a [`BuildReport`] describing what was written
//!
//! # Callable From
//! - Used by the CLI crate and integration tests
//! - Expects a concrete (async) [`PageWriter`]; [`FsPageWriter`] writes to disk
//!
//! # Error Handling
//! Each failed step returns immediately with a [`BuildError`]; nothing is
//! retried.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;
use mockall::automock;
use tracing::{debug, error, info};

use crate::config::BuildConfig;
use crate::render::{render_page, stylesheet, LayoutState, RenderError};
use crate::site::Site;

pub const STYLESHEET_FILE: &str = "style.css";

/// Boxed error returned by [`PageWriter`] implementations.
pub type WriteError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum BuildError {
    /// The site description cannot be built as-is.
    InvalidSite(String),
    /// Listing or removing stale output failed.
    Clean(WriteError),
    Render(RenderError),
    Write { file_name: String, source: WriteError },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidSite(reason) => write!(f, "invalid site: {reason}"),
            BuildError::Clean(e) => write!(f, "failed to clean output: {e}"),
            BuildError::Render(e) => write!(f, "{e}"),
            BuildError::Write { file_name, source } => {
                write!(f, "failed to write {file_name}: {source}")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Destination for rendered output, addressed by bare file name.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PageWriter: Send + Sync {
    /// File names currently present in the destination.
    async fn list_pages(&self) -> Result<Vec<String>, WriteError>;

    async fn remove_page(&self, file_name: &str) -> Result<(), WriteError>;

    /// Create or replace `file_name` with `contents`.
    async fn write_page(&self, file_name: &str, contents: &str) -> Result<(), WriteError>;
}

/// Writes pages into a directory, creating it on first write.
#[derive(Debug, Clone)]
pub struct FsPageWriter {
    dir: PathBuf,
}

impl FsPageWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl PageWriter for FsPageWriter {
    async fn list_pages(&self) -> Result<Vec<String>, WriteError> {
        if !tokio::fs::try_exists(&self.dir).await? {
            return Ok(Vec::new());
        }
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn remove_page(&self, file_name: &str) -> Result<(), WriteError> {
        tokio::fs::remove_file(self.dir.join(file_name)).await?;
        debug!(file = %file_name, dir = %self.dir.display(), "Removed page");
        Ok(())
    }

    async fn write_page(&self, file_name: &str, contents: &str) -> Result<(), WriteError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(file_name), contents).await?;
        debug!(file = %file_name, bytes = contents.len(), "Wrote page");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: Vec<PageReport>,
    /// Stale pages removed before writing.
    pub removed: Vec<String>,
    pub stylesheet: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub slug: String,
    pub file_name: String,
    pub code_blocks: usize,
    pub bytes: usize,
}

/// Reject sites whose pages cannot map to distinct output files.
pub fn validate_site(site: &Site) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for page in &site.pages {
        let slug = page.slug.as_str();
        if slug.trim().is_empty() {
            return Err(BuildError::InvalidSite("page with empty slug".to_string()));
        }
        if slug.contains(['/', '\\']) || slug.starts_with('.') {
            return Err(BuildError::InvalidSite(format!(
                "slug {slug:?} must be a plain file stem"
            )));
        }
        if !seen.insert(slug) {
            return Err(BuildError::InvalidSite(format!("duplicate slug {slug:?}")));
        }
    }
    Ok(())
}

/// Render and write every page of `config.site`.
pub async fn build_site<W>(config: &BuildConfig, writer: &W) -> Result<BuildReport, BuildError>
where
    W: PageWriter + ?Sized,
{
    info!(
        output_dir = %config.output_dir.display(),
        pages = config.site.pages.len(),
        "[BUILD] Starting site build"
    );

    if let Err(e) = validate_site(&config.site) {
        error!(error = %e, "[BUILD][ERROR] Site validation failed");
        return Err(e);
    }

    let removed = match clean_output(writer).await {
        Ok(removed) => {
            info!(removed = removed.len(), "[BUILD] Removed stale pages");
            removed
        }
        Err(e) => {
            error!(error = ?e, "[BUILD][ERROR] Failed to clean output before build");
            return Err(BuildError::Clean(e));
        }
    };

    let state = LayoutState::default();
    let mut outputs: Vec<(String, String)> = Vec::with_capacity(config.site.pages.len() + 1);
    let mut pages = Vec::with_capacity(config.site.pages.len());
    for page in &config.site.pages {
        let html = render_page(&config.site, page, state).map_err(|e| {
            error!(slug = %page.slug, error = %e, "[BUILD][ERROR] Rendering page failed");
            BuildError::Render(e)
        })?;
        let report = PageReport {
            slug: page.slug.clone(),
            file_name: page.file_name(),
            code_blocks: page.code_blocks().count(),
            bytes: html.len(),
        };
        debug!(slug = %report.slug, bytes = report.bytes, code_blocks = report.code_blocks, "[BUILD] Rendered page");
        outputs.push((report.file_name.clone(), html));
        pages.push(report);
    }
    outputs.push((STYLESHEET_FILE.to_string(), stylesheet().map_err(BuildError::Render)?));

    let writes = outputs.iter().map(|(file_name, contents)| async move {
        writer
            .write_page(file_name, contents)
            .await
            .map_err(|source| BuildError::Write {
                file_name: file_name.clone(),
                source,
            })
    });
    if let Err(e) = try_join_all(writes).await {
        error!(error = %e, "[BUILD][ERROR] Writing output failed");
        return Err(e);
    }

    info!(pages = pages.len(), "[BUILD] Site build complete");
    Ok(BuildReport {
        pages,
        removed,
        stylesheet: STYLESHEET_FILE.to_string(),
    })
}

/// Remove every `.html` file the writer currently holds. Returns the removed names.
pub async fn clean_output<W>(writer: &W) -> Result<Vec<String>, WriteError>
where
    W: PageWriter + ?Sized,
{
    let stale: Vec<String> = writer
        .list_pages()
        .await?
        .into_iter()
        .filter(|name| name.ends_with(".html"))
        .collect();
    let deletions = stale.iter().map(|name| writer.remove_page(name));
    // Fail fast on the first removal error.
    try_join_all(deletions).await?;
    Ok(stale)
}
