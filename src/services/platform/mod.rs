//! Platform input method service: the only boundary that touches the OS.
//!
//! `CarbonPlatform` talks to HIToolbox on macOS, `DryRunPlatform` is an
//! in-memory model for `--dry-run` and tests on every OS.

#[cfg(target_os = "macos")]
mod carbon;
mod dry_run;
mod r#trait;

#[cfg(target_os = "macos")]
pub use self::carbon::{CarbonPlatform, TISInputSource, TISInputSourceRef};
pub use self::dry_run::{default_fixture, DryRunPlatform, DryRunSource, DryRunSourceSpec};
pub use self::r#trait::{CurrentVariant, Platform};
