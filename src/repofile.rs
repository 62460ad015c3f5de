//! Repo file store
//!
//! This module owns the structured view of a single `.repo` file: an
//! ordered collection of named sections, each holding option key/value
//! pairs. It provides the full load → mutate → persist cycle used by the
//! reconciliation engine.
//!
//! ## Behavior
//!
//! - Loading an absent file yields an empty document; loading a corrupt
//!   file is an error, never a silent reset.
//! - Applying a definition replaces the whole section rather than merging
//!   key-by-key, so stale options from a previous save never survive a
//!   redefinition.
//! - Serialization sorts sections and keys lexicographically. The output is
//!   deterministic and diffable, and doubles as the change-detection
//!   snapshot: a reconciliation changed something iff the serialized text
//!   before and after differs.
//! - Persisting a document with no sections deletes the backing file
//!   instead of leaving an empty husk behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::definition::{is_allowed_option, RepositoryDefinition};
use crate::error::{Error, Result};

/// A named section of a repo file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    name: String,
    options: BTreeMap<String, String>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// An in-memory repo file: sections in load order, unique by name.
#[derive(Clone, Debug, Default)]
pub struct ConfigDocument {
    sections: Vec<Section>,
}

impl ConfigDocument {
    /// Load a document from `path`.
    ///
    /// A missing file yields an empty document. An unreadable file is an
    /// [`Error::Io`]; a file that is not valid sectioned key/value text is
    /// an [`Error::Syntax`] carrying the offending line number.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(ConfigDocument::default());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        parse(path, &content)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Replace (or create) the section for `definition`, built fresh from
    /// the definition's allow-listed, non-omitted options.
    ///
    /// A create/update that supplies neither `baseurl` nor `mirrorlist` is
    /// rejected. The CLI checks this too; the store re-validates so the
    /// contract holds for library callers as well.
    pub fn apply(&mut self, definition: &RepositoryDefinition) -> Result<()> {
        if !definition.has_url_source() {
            return Err(Error::validation(
                "Parameter 'baseurl' or 'mirrorlist' is required for adding a new repo",
            ));
        }

        self.remove(definition.repo_id());

        let mut section = Section::new(definition.repo_id());
        for (key, value) in definition.options() {
            if !is_allowed_option(key) {
                debug!("dropping option '{}': not in the allow-list", key);
                continue;
            }
            if let Some(text) = value.coerce() {
                section.options.insert(key.to_string(), text);
            }
        }
        self.sections.push(section);
        Ok(())
    }

    /// Remove the named section. Missing sections are a no-op.
    pub fn remove(&mut self, name: &str) {
        self.sections.retain(|section| section.name != name);
    }

    /// Render the document: sections in sorted name order, `key = value`
    /// lines in sorted key order, each section block terminated by a blank
    /// line. This exact text is also the change-detection snapshot.
    pub fn serialize(&self) -> String {
        let mut names: Vec<&Section> = self.sections.iter().collect();
        names.sort_by(|a, b| a.name.cmp(&b.name));

        let mut output = String::new();
        for section in names {
            output.push('[');
            output.push_str(&section.name);
            output.push_str("]\n");

            for (key, value) in &section.options {
                output.push_str(key);
                output.push_str(" = ");
                output.push_str(value);
                output.push('\n');
            }

            output.push('\n');
        }

        output
    }

    /// Write the document to `path`, or delete `path` when the document
    /// has no sections left. Deleting an already-absent file is a no-op.
    ///
    /// The write truncates and rewrites the whole file; there is no
    /// partial-write recovery.
    pub fn persist(&self, path: &Path) -> Result<()> {
        if self.sections.is_empty() {
            debug!("no sections left, removing '{}'", path.display());
            match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(Error::io(path, e)),
            }
        } else {
            debug!("writing {} section(s) to '{}'", self.sections.len(), path.display());
            fs::write(path, self.serialize()).map_err(|e| Error::io(path, e))
        }
    }
}

/// Parse repo file content into a document.
///
/// Accepts `[section]` headers, `key = value` lines (the first `=` splits,
/// so values may contain `=`), blank lines, and `#`/`;` comments. Anything
/// else is a syntax error, as is a key/value line before the first section
/// header or a duplicate section name.
fn parse(path: &Path, content: &str) -> Result<ConfigDocument> {
    let mut document = ConfigDocument::default();
    let mut current: Option<Section> = None;

    for (index, line) in content.lines().enumerate() {
        let lineno = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            let name = trimmed[1..trimmed.len() - 1].trim().to_string();
            if name.is_empty() {
                return Err(Error::Syntax {
                    path: path.to_path_buf(),
                    line: lineno,
                    message: "empty section name".to_string(),
                });
            }
            if let Some(section) = current.take() {
                document.sections.push(section);
            }
            if document.section(&name).is_some() {
                return Err(Error::Syntax {
                    path: path.to_path_buf(),
                    line: lineno,
                    message: format!("duplicate section '{}'", name),
                });
            }
            current = Some(Section::new(name));
        } else if let Some(pos) = trimmed.find('=') {
            let key = trimmed[..pos].trim().to_string();
            let value = trimmed[pos + 1..].trim().to_string();
            match current.as_mut() {
                Some(section) => {
                    section.options.insert(key, value);
                }
                None => {
                    return Err(Error::Syntax {
                        path: path.to_path_buf(),
                        line: lineno,
                        message: "entry before any section header".to_string(),
                    });
                }
            }
        } else {
            return Err(Error::Syntax {
                path: path.to_path_buf(),
                line: lineno,
                message: format!("expected '[section]' or 'key = value', got '{}'", trimmed),
            });
        }
    }

    if let Some(section) = current.take() {
        document.sections.push(section);
    }

    Ok(document)
}
