//! Entry collection
//!
//! Groups raw item declarations by module and kind, producing immutable
//! [`ModuleIndex`] values. Malformed declarations are skipped and reported;
//! a later declaration that duplicates an existing (kind, name) pair is
//! dropped with a warning. Collection never aborts on bad input.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::model::{ItemKind, ModuleIndex, ModulePath, Section, SidebarEntry, SidebarIndex};

/// A raw item declaration as produced by an external extractor.
///
/// Required fields are optional here so that an incomplete record can be
/// represented and reported instead of failing the whole batch at
/// deserialization time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDecl {
    #[serde(default)]
    pub module_path: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Why a declaration was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    MissingModulePath,
    InvalidModulePath(String),
    MissingName,
    MissingKind,
    UnknownKind(String),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingModulePath => write!(f, "missing module path"),
            MalformedReason::InvalidModulePath(path) => {
                write!(f, "invalid module path {path:?}")
            }
            MalformedReason::MissingName => write!(f, "missing name"),
            MalformedReason::MissingKind => write!(f, "missing kind"),
            MalformedReason::UnknownKind(tag) => write!(f, "unknown kind {tag:?}"),
        }
    }
}

/// A recoverable problem found while collecting. The offending declaration
/// is dropped; the rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    MalformedDeclaration {
        /// Whatever identifying fields the record did carry.
        module_path: Option<String>,
        name: Option<String>,
        reason: MalformedReason,
    },
    DuplicateEntry {
        module_path: ModulePath,
        kind: ItemKind,
        name: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MalformedDeclaration {
                module_path,
                name,
                reason,
            } => {
                write!(f, "skipped declaration")?;
                if let Some(name) = name {
                    write!(f, " {name:?}")?;
                }
                if let Some(path) = module_path {
                    write!(f, " in {path}")?;
                }
                write!(f, ": {reason}")
            }
            Warning::DuplicateEntry {
                module_path,
                kind,
                name,
            } => write!(
                f,
                "duplicate {kind} {name:?} in {module_path}: later declaration dropped"
            ),
        }
    }
}

/// Ordering of entries within a kind section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Lexicographic by entry name.
    #[default]
    Lexicographic,
    /// The order declarations arrived in.
    Declaration,
}

/// Result of a collection pass.
#[derive(Debug, Clone, Default)]
pub struct CollectOutcome {
    pub index: SidebarIndex,
    pub warnings: Vec<Warning>,
}

impl CollectOutcome {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Collects raw declarations into a [`SidebarIndex`].
#[derive(Debug, Clone, Default)]
pub struct Collector {
    order: EntryOrder,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// Group declarations by module and kind. Guarantees that the resulting
    /// index has no duplicate (kind, name) pair within any module.
    pub fn collect<I>(&self, decls: I) -> CollectOutcome
    where
        I: IntoIterator<Item = RawDecl>,
    {
        let mut modules: IndexMap<ModulePath, IndexMap<ItemKind, Vec<SidebarEntry>>> =
            IndexMap::new();
        let mut seen: FxHashSet<(ModulePath, ItemKind, String)> = FxHashSet::default();
        let mut warnings = Vec::new();

        for decl in decls {
            let (path, kind, entry) = match validate(decl) {
                Ok(parts) => parts,
                Err(warning) => {
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                    continue;
                }
            };

            if !seen.insert((path.clone(), kind, entry.name.clone())) {
                let warning = Warning::DuplicateEntry {
                    module_path: path,
                    kind,
                    name: entry.name,
                };
                tracing::warn!("{warning}");
                warnings.push(warning);
                continue;
            }

            modules
                .entry(path)
                .or_default()
                .entry(kind)
                .or_default()
                .push(entry);
        }

        let mut result: Vec<ModuleIndex> = modules
            .into_iter()
            .map(|(path, kinds)| self.finish_module(path, kinds))
            .collect();
        result.sort_by(|a, b| a.path().cmp(b.path()));

        CollectOutcome {
            index: SidebarIndex::new(result),
            warnings,
        }
    }

    fn finish_module(
        &self,
        path: ModulePath,
        mut kinds: IndexMap<ItemKind, Vec<SidebarEntry>>,
    ) -> ModuleIndex {
        let mut sections = Vec::new();
        for kind in ItemKind::SECTION_ORDER {
            let Some(mut entries) = kinds.shift_remove(&kind) else {
                continue;
            };
            if self.order == EntryOrder::Lexicographic {
                entries.sort_by(|a, b| a.name.cmp(&b.name));
            }
            sections.push(Section { kind, entries });
        }
        tracing::debug!(module = %path, sections = sections.len(), "collected module index");
        ModuleIndex::new(path, sections)
    }
}

fn validate(decl: RawDecl) -> Result<(ModulePath, ItemKind, SidebarEntry), Warning> {
    let RawDecl {
        module_path,
        kind,
        name,
        summary,
        link,
    } = decl;

    let malformed = |reason| Warning::MalformedDeclaration {
        module_path: module_path.clone(),
        name: name.clone(),
        reason,
    };

    let raw_path = match module_path.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err(malformed(MalformedReason::MissingModulePath)),
    };
    let path = match ModulePath::parse(raw_path) {
        Some(path) => path,
        None => {
            return Err(malformed(MalformedReason::InvalidModulePath(
                raw_path.to_string(),
            )))
        }
    };

    let kind = match kind.as_deref().map(str::trim) {
        Some("") | None => return Err(malformed(MalformedReason::MissingKind)),
        Some(tag) => match ItemKind::from_tag(tag) {
            Some(kind) => kind,
            None => return Err(malformed(MalformedReason::UnknownKind(tag.to_string()))),
        },
    };

    let entry_name = match name.as_deref().map(str::trim) {
        Some("") | None => return Err(malformed(MalformedReason::MissingName)),
        Some(n) => n.to_string(),
    };

    Ok((
        path,
        kind,
        SidebarEntry {
            name: entry_name,
            summary: summary.unwrap_or_default(),
            link,
        },
    ))
}
