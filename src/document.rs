//! Collaborator seams: locating a file, opening it, reading its pages.
//!
//! The measurement engine only ever talks to these traits. The workspace
//! ships [`SiteResolver`] and the drawing listing reader
//! ([`crate::listing::ListingOpener`]) as concrete implementations.

use std::path::{Path, PathBuf};

use crate::drawing::{Page, PageSize};
use crate::errors::DocumentError;

/// How text should appear in an SVG rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRendering {
    /// Glyphs converted to path outlines, so they have measurable length.
    #[default]
    Outlines,
    /// Text kept as `<text>` elements.
    Glyphs,
}

/// Maps a logical file reference to a readable path.
pub trait FileResolver {
    fn resolve(&self, reference: &str) -> Option<PathBuf>;
}

/// An open vector document. Dropping it releases the underlying resource.
pub trait VectorDocument {
    fn page_count(&self) -> usize;

    /// Drawings of one page, zero-based.
    fn page(&self, index: usize) -> Result<Page, DocumentError>;

    /// Page size in points, when the document records one.
    fn page_size(&self, index: usize) -> Option<PageSize>;

    /// Render one page as an SVG document.
    fn render_svg(&self, index: usize, text: TextRendering) -> Result<String, DocumentError>;
}

/// Opens documents of one format.
pub trait DocumentOpener {
    type Document: VectorDocument;

    fn open(&self, path: &Path) -> Result<Self::Document, DocumentError>;
}

/// Resolves references against a list of site roots.
///
/// A reference is tried relative to each root with its leading `/`
/// stripped, then with a `/files/` prefix normalised to `files/` (public
/// file URLs). Only with [`SiteResolver::with_direct_paths`] is it also
/// tried as a path on its own, which lets it name files outside every root.
#[derive(Debug, Clone)]
pub struct SiteResolver {
    roots: Vec<PathBuf>,
    direct_paths: bool,
}

impl SiteResolver {
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            direct_paths: false,
        }
    }

    /// Also accept a reference that is itself a path to an existing file.
    pub fn with_direct_paths(mut self, enabled: bool) -> Self {
        self.direct_paths = enabled;
        self
    }

    /// Resolve against the current directory only.
    pub fn current_dir() -> Self {
        Self::new(["."])
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        let relative = reference.trim_start_matches('/');
        let mut candidates = Vec::new();
        if self.direct_paths {
            candidates.push(PathBuf::from(reference));
        }
        for root in &self.roots {
            candidates.push(root.join(relative));
        }
        if let Some(rest) = reference.strip_prefix("/files/") {
            for root in &self.roots {
                candidates.push(root.join("files").join(rest));
            }
        } else if let Some(pos) = reference.find("/files/") {
            let rest = &reference[pos + 1..];
            for root in &self.roots {
                candidates.push(root.join(rest));
            }
        }
        candidates
    }
}

impl Default for SiteResolver {
    fn default() -> Self {
        Self::current_dir()
    }
}

impl FileResolver for SiteResolver {
    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        if reference.trim().is_empty() {
            return None;
        }
        let found = self.candidates(reference).into_iter().find(|path| path.is_file());
        crate::log::debug!(reference, found = ?found, "resolved file reference");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolves_relative_to_roots() {
        let public = tempfile::tempdir().unwrap();
        let private = tempfile::tempdir().unwrap();
        fs::create_dir_all(private.path().join("files")).unwrap();
        fs::write(private.path().join("files/sign.listing"), "").unwrap();

        let resolver = SiteResolver::new([public.path(), private.path()]);
        let expected = private.path().join("files/sign.listing");
        assert_eq!(resolver.resolve("/files/sign.listing"), Some(expected.clone()));
        assert_eq!(resolver.resolve("files/sign.listing"), Some(expected));
        assert_eq!(resolver.resolve("/files/missing.listing"), None);
        assert_eq!(resolver.resolve(""), None);
    }

    #[test]
    fn normalises_site_prefixed_file_urls() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("files")).unwrap();
        fs::write(root.path().join("files/a.listing"), "").unwrap();

        let resolver = SiteResolver::new([root.path()]);
        assert_eq!(
            resolver.resolve("/private/files/a.listing"),
            Some(root.path().join("files/a.listing"))
        );
    }

    #[test]
    fn absolute_paths_stay_inside_roots() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::NamedTempFile::new().unwrap();
        let reference = outside.path().display().to_string();
        assert_eq!(SiteResolver::new([root.path()]).resolve(&reference), None);
        assert_eq!(SiteResolver::new(Vec::<PathBuf>::new()).resolve(&reference), None);
    }

    #[test]
    fn existing_paths_resolve_directly_when_enabled() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let resolver = SiteResolver::new(Vec::<PathBuf>::new()).with_direct_paths(true);
        assert_eq!(
            resolver.resolve(&file.path().display().to_string()),
            Some(file.path().to_path_buf())
        );
    }

    #[test]
    fn directories_do_not_resolve() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("drawings")).unwrap();
        let resolver = SiteResolver::new([root.path()]);
        assert_eq!(resolver.resolve("drawings"), None);
    }
}
