//! Sidebar index data model
//!
//! These types represent a module's navigation index in a format suitable for
//! serialization. A [`ModuleIndex`] is built once by the collector and is
//! immutable afterwards; regeneration replaces it wholesale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Path of a documented module, e.g. `ink_env::call::call_builder`.
///
/// Stored as an ordered sequence of segments. The derived `Ord` compares
/// segment-wise, which gives the stable module ordering used in artifacts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    /// Parse a `::`-separated path. Returns `None` for an empty path or a
    /// path with an empty segment (`"a::::b"`).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let segments: Vec<String> = raw.split("::").map(|s| s.trim().to_string()).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(ModulePath { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path with `::` replaced by `/`, used for per-module output
    /// locations (`a::b` -> `a/b/sidebar.json`).
    pub fn as_slash_path(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("::"))
    }
}

impl From<ModulePath> for String {
    fn from(path: ModulePath) -> String {
        path.to_string()
    }
}

impl TryFrom<String> for ModulePath {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        ModulePath::parse(&raw).ok_or_else(|| format!("invalid module path: {raw:?}"))
    }
}

/// The kind of documented item. Closed set; extending it means adding a
/// variant here and a slot in [`ItemKind::SECTION_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Module,
    Function,
    Struct,
    Enum,
    Trait,
    Const,
    TypeAlias,
    Macro,
}

impl ItemKind {
    /// Fixed precedence of kind sections in emitted artifacts, independent
    /// of declaration order: functions before structs before traits.
    pub const SECTION_ORDER: [ItemKind; 8] = [
        ItemKind::Function,
        ItemKind::Module,
        ItemKind::Struct,
        ItemKind::Enum,
        ItemKind::Trait,
        ItemKind::Const,
        ItemKind::TypeAlias,
        ItemKind::Macro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Module => "mod",
            ItemKind::Function => "fn",
            ItemKind::Struct => "struct",
            ItemKind::Enum => "enum",
            ItemKind::Trait => "trait",
            ItemKind::Const => "const",
            ItemKind::TypeAlias => "type",
            ItemKind::Macro => "macro",
        }
    }

    /// Parse a kind tag. Accepts both the short artifact tags and the long
    /// spellings an extractor might emit.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "mod" | "module" => Some(ItemKind::Module),
            "fn" | "function" => Some(ItemKind::Function),
            "struct" => Some(ItemKind::Struct),
            "enum" => Some(ItemKind::Enum),
            "trait" => Some(ItemKind::Trait),
            "const" | "constant" => Some(ItemKind::Const),
            "type" | "type_alias" | "type-alias" => Some(ItemKind::TypeAlias),
            "macro" => Some(ItemKind::Macro),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::Module => "Module",
            ItemKind::Function => "Function",
            ItemKind::Struct => "Struct",
            ItemKind::Enum => "Enum",
            ItemKind::Trait => "Trait",
            ItemKind::Const => "Constant",
            ItemKind::TypeAlias => "Type Alias",
            ItemKind::Macro => "Macro",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented item's entry in a sidebar section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarEntry {
    /// Identifier of the item.
    pub name: String,
    /// One-line summary. May embed lightweight inline markup; see
    /// [`crate::render::markdown::summary_to_html`].
    pub summary: String,
    /// Optional link target for the viewer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A non-empty kind section within a module's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: ItemKind,
    pub entries: Vec<SidebarEntry>,
}

/// One module's navigation index: sections in [`ItemKind::SECTION_ORDER`],
/// entries pre-ordered by the collector's entry-order policy.
///
/// Invariant: no two entries within a section share a name. The collector
/// guarantees this; the serializer re-checks it and fails fatally if it
/// ever does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIndex {
    path: ModulePath,
    sections: Vec<Section>,
}

impl ModuleIndex {
    pub(crate) fn new(path: ModulePath, sections: Vec<Section>) -> Self {
        ModuleIndex { path, sections }
    }

    pub fn path(&self) -> &ModulePath {
        &self.path
    }

    /// Non-empty sections, in precedence order. Kinds with no entries are
    /// simply absent.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Entries of one kind. Empty slice when the module has none; viewers
    /// must tolerate this.
    pub fn entries_of(&self, kind: ItemKind) -> &[SidebarEntry] {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A batch of module indexes, sorted by module path. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct SidebarIndex {
    modules: Vec<ModuleIndex>,
}

impl SidebarIndex {
    pub(crate) fn new(modules: Vec<ModuleIndex>) -> Self {
        debug_assert!(modules.windows(2).all(|w| w[0].path() < w[1].path()));
        SidebarIndex { modules }
    }

    /// Modules in path order.
    pub fn modules(&self) -> &[ModuleIndex] {
        &self.modules
    }

    /// Read-only lookup by module path.
    pub fn get(&self, path: &ModulePath) -> Option<&ModuleIndex> {
        self.modules
            .binary_search_by(|m| m.path().cmp(path))
            .ok()
            .map(|i| &self.modules[i])
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.modules.iter().map(|m| m.entry_count()).sum()
    }
}
