use serde::Serialize;
use std::fmt;
use tracing::warn;

use crate::error::{Result, TisError};

/// Локаль, полученная канонизацией языкового тега источника ввода
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Locale {
    pub language: String,
    pub script: Option<String>,
    pub region: Option<String>,
    pub variants: Vec<String>,
}

impl Locale {
    /// Разбор тега BCP-47 через `icu_locale_core`.
    ///
    /// `_` принимается как разделитель. Регистр подтегов нормализуется
    /// парсером, расширения (`-u-...`) отбрасываются.
    pub fn parse(tag: &str) -> Result<Self> {
        let normalized = tag.trim().replace('_', "-");
        let parsed: icu_locale_core::Locale = normalized
            .parse()
            .map_err(|_| TisError::InvalidLanguageTag(tag.to_string()))?;

        let id = &parsed.id;
        Ok(Self {
            language: id.language.as_str().to_string(),
            script: id.script.map(|script| script.as_str().to_string()),
            region: id.region.map(|region| region.as_str().to_string()),
            variants: id
                .variants
                .iter()
                .map(|variant| variant.as_str().to_string())
                .collect(),
        })
    }

    /// Как [`Locale::parse`], но нераспознанный тег даёт `und`.
    ///
    /// Для `locales()`: число локалей всегда равно числу языков.
    pub fn canonicalize(tag: &str) -> Self {
        Self::parse(tag).unwrap_or_else(|err| {
            if !tag.trim().is_empty() {
                warn!("{}, используется und", err);
            }
            Self::undetermined()
        })
    }

    pub fn undetermined() -> Self {
        Self {
            language: "und".to_string(),
            script: None,
            region: None,
            variants: Vec::new(),
        }
    }

    pub fn is_undetermined(&self) -> bool {
        self.language == "und"
    }

    /// Канонический идентификатор (`zh-Hans-CN`)
    pub fn identifier(&self) -> String {
        let mut parts = vec![self.language.as_str()];
        if let Some(script) = &self.script {
            parts.push(script);
        }
        if let Some(region) = &self.region {
            parts.push(region);
        }
        parts.extend(self.variants.iter().map(String::as_str));
        parts.join("-")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}
