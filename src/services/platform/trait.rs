use std::fmt;
use std::path::Path;

use crate::error::OsStatus;
use crate::filter::RawFilter;
use crate::mappings::PropertyKey;
use crate::source::PropertyValue;

/// Which "current" input source to copy from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentVariant {
    /// TISCopyCurrentKeyboardInputSource
    Any,
    /// TISCopyCurrentKeyboardLayoutInputSource
    Layout,
    /// TISCopyCurrentASCIICapableKeyboardInputSource
    AsciiCapable,
    /// TISCopyCurrentASCIICapableKeyboardLayoutInputSource
    AsciiCapableLayout,
}

impl CurrentVariant {
    pub const ALL: [CurrentVariant; 4] = [
        CurrentVariant::Any,
        CurrentVariant::Layout,
        CurrentVariant::AsciiCapable,
        CurrentVariant::AsciiCapableLayout,
    ];
}

impl fmt::Display for CurrentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurrentVariant::Any => "current",
            CurrentVariant::Layout => "current layout",
            CurrentVariant::AsciiCapable => "current ASCII-capable",
            CurrentVariant::AsciiCapableLayout => "current ASCII-capable layout",
        };
        f.write_str(name)
    }
}

/// Trait for the platform input method service the query engine talks to.
///
/// Every call is synchronous. Handles returned from `enumerate`,
/// `ascii_capable_list`, `copy_*` are owned by the caller; cloning a handle
/// must retain the native object and dropping it must release it.
pub trait Platform {
    /// Native input source reference. Equality is native identity.
    type Source: Clone + Eq + fmt::Debug;

    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// List input sources. `None` means "no filter", not an empty filter.
    fn enumerate(&self, filter: Option<&RawFilter>, include_all_installed: bool) -> Vec<Self::Source>;

    fn copy_current(&self, variant: CurrentVariant) -> Option<Self::Source>;

    fn copy_for_language(&self, language: &str) -> Option<Self::Source>;

    fn ascii_capable_list(&self) -> Vec<Self::Source>;

    /// Read one property. Absent or wrongly typed values yield `None`.
    fn property(&self, source: &Self::Source, key: PropertyKey) -> Option<PropertyValue>;

    fn select(&self, source: &Self::Source) -> OsStatus;

    fn deselect(&self, source: &Self::Source) -> OsStatus;

    fn enable(&self, source: &Self::Source) -> OsStatus;

    fn disable(&self, source: &Self::Source) -> OsStatus;

    /// Register an input method bundle. Persists beyond the process.
    fn register(&self, location: &Path) -> OsStatus;

    /// `None` clears the override
    fn set_keyboard_layout_override(&self, source: Option<&Self::Source>) -> OsStatus;

    fn copy_keyboard_layout_override(&self) -> Option<Self::Source>;
}
