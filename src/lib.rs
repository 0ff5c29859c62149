//! Типизированный доступ к службе источников ввода macOS (Text Input Sources).
//!
//! Вход - [`TextInputSources`]: поиск источников по [`FilterMap`], текущие
//! источники, выбор/включение/регистрация. Платформа подключается через
//! [`Platform`]: [`CarbonPlatform`] на macOS, [`DryRunPlatform`] везде.

pub mod mappings;

pub mod config;
pub mod error;
pub mod filter;
pub mod notifications;
pub mod services;
pub mod source;

pub use error::{OsStatus, Result, TisError};
pub use filter::{FilterMap, FilterValue};
pub use mappings::{Category, FilteringPropertyName, Kind, PropertyKey};
#[cfg(target_os = "macos")]
pub use services::platform::CarbonPlatform;
pub use services::platform::{CurrentVariant, DryRunPlatform, Platform};
pub use services::TextInputSources;
pub use source::{InputSource, Locale, SourceDescription, UnicodeKeyLayout};
