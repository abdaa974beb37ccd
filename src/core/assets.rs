//! Bundled template assets.
//!
//! The `templates/` tree is baked into the binary at compile time and
//! snapshotted once into an immutable [`TemplateSet`]. The deployment engine
//! only ever sees a [`TemplateSource`], so tests can hand it a synthetic set.

use crate::core::error::FlowkitError;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(RustEmbed)]
#[folder = "templates/"]
#[exclude = "*.DS_Store"]
struct Bundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One node of the template tree, addressed by its `/`-separated path
/// relative to the bundle root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl TemplateEntry {
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Read-only view of a hierarchical bundle of named byte blobs.
pub trait TemplateSource {
    /// Every entry below the root, depth-first, each directory before its
    /// children. The root itself is never yielded.
    fn walk(&self) -> Box<dyn Iterator<Item = Result<TemplateEntry, FlowkitError>> + '_>;

    /// Content of the file entry at `path`.
    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>, FlowkitError>;
}

#[derive(Debug, Default)]
struct DirNode {
    children: BTreeMap<String, Node>,
}

#[derive(Debug)]
enum Node {
    Dir(DirNode),
    File,
}

impl DirNode {
    fn insert(&mut self, parts: &[&str], full_path: &str) -> Result<(), FlowkitError> {
        let Some((name, rest)) = parts.split_first() else {
            return Ok(());
        };
        if rest.is_empty() {
            if self.children.contains_key(*name) {
                return Err(FlowkitError::BundleEnumeration(format!(
                    "duplicate template path: {}",
                    full_path
                )));
            }
            self.children.insert(name.to_string(), Node::File);
            return Ok(());
        }
        let child = self
            .children
            .entry(name.to_string())
            .or_insert_with(|| Node::Dir(DirNode::default()));
        match child {
            Node::Dir(dir) => dir.insert(rest, full_path),
            Node::File => Err(FlowkitError::BundleEnumeration(format!(
                "template path {} descends through file {}",
                full_path, name
            ))),
        }
    }

    fn flatten(&self, prefix: &str, out: &mut Vec<TemplateEntry>) {
        for (name, node) in &self.children {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            match node {
                Node::Dir(dir) => {
                    out.push(TemplateEntry::directory(path.clone()));
                    dir.flatten(&path, out);
                }
                Node::File => out.push(TemplateEntry::file(path)),
            }
        }
    }
}

fn split_template_path(path: &str) -> Result<Vec<&str>, FlowkitError> {
    let invalid = |why: &str| {
        FlowkitError::BundleEnumeration(format!("invalid template path {:?}: {}", path, why))
    };
    if path.is_empty() {
        return Err(invalid("empty"));
    }
    if path.starts_with('/') || path.contains('\\') {
        return Err(invalid("must be relative and '/'-separated"));
    }
    let parts: Vec<&str> = path.split('/').collect();
    if parts.iter().any(|p| p.is_empty() || *p == "." || *p == "..") {
        return Err(invalid("empty, '.' or '..' component"));
    }
    Ok(parts)
}

/// Immutable, ordered template tree with its file contents.
///
/// A file whose content could not be captured is kept in the tree with no
/// content; reading it yields [`FlowkitError::ContentRead`].
#[derive(Debug, Clone)]
pub struct TemplateSet {
    entries: Vec<TemplateEntry>,
    contents: BTreeMap<String, Option<Cow<'static, [u8]>>>,
}

impl TemplateSet {
    /// Snapshot of the templates compiled into this binary.
    pub fn embedded() -> Result<Self, FlowkitError> {
        Self::build(Bundle::iter().map(|path| {
            let data = Bundle::get(&path).map(|file| file.data);
            (path.into_owned(), data)
        }))
    }

    /// Build a set from `(relative path, content)` pairs. Directories are
    /// derived from the paths.
    pub fn from_files<I, P, C>(files: I) -> Result<Self, FlowkitError>
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<Cow<'static, [u8]>>,
    {
        Self::build(
            files
                .into_iter()
                .map(|(path, content)| (path.into(), Some(content.into()))),
        )
    }

    fn build<I>(files: I) -> Result<Self, FlowkitError>
    where
        I: IntoIterator<Item = (String, Option<Cow<'static, [u8]>>)>,
    {
        let mut root = DirNode::default();
        let mut contents = BTreeMap::new();
        for (path, data) in files {
            let parts = split_template_path(&path)?;
            root.insert(&parts, &path)?;
            contents.insert(path, data);
        }
        let mut entries = Vec::new();
        root.flatten("", &mut entries);
        Ok(Self { entries, contents })
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn file_count(&self) -> usize {
        self.contents.len()
    }
}

impl TemplateSource for TemplateSet {
    fn walk(&self) -> Box<dyn Iterator<Item = Result<TemplateEntry, FlowkitError>> + '_> {
        Box::new(self.entries.iter().cloned().map(Ok))
    }

    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>, FlowkitError> {
        match self.contents.get(path) {
            Some(Some(data)) => Ok(Cow::Borrowed(data.as_ref())),
            Some(None) => Err(FlowkitError::ContentRead {
                path: path.to_string(),
                reason: "bundled content unavailable".to_string(),
            }),
            None => Err(FlowkitError::ContentRead {
                path: path.to_string(),
                reason: "no such file in bundle".to_string(),
            }),
        }
    }
}
