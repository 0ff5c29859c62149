use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::mappings::Category;
use crate::services::platform::{default_fixture, DryRunSourceSpec};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub dry_run: DryRunConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Показывать установленные, но не включённые источники
    #[serde(default)]
    pub include_all_installed: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DryRunConfig {
    /// Источники для режима эмуляции; пусто - встроенный набор
    #[serde(default)]
    pub sources: Vec<DryRunSourceSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: "compact".to_string(),
            },
            query: QueryConfig::default(),
            dry_run: DryRunConfig::default(),
        }
    }
}

impl Config {
    /// Умолчания <- TOML-файл (если есть) <- переменные `TIS_*`
    /// (`TIS_LOGGING__LEVEL=debug`)
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("TIS_").split("__"));

        Self::extract(figment)
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))
    }

    pub fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "full" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация источников эмуляции
        let mut ids = HashSet::new();
        let mut selected_keyboards = 0;
        for (i, source) in self.dry_run.sources.iter().enumerate() {
            if source.id.is_empty() {
                anyhow::bail!("Пустой id у источника #{}", i + 1);
            }
            if !ids.insert(source.id.as_str()) {
                anyhow::bail!("Повторяющийся id источника: {}", source.id);
            }
            if source.languages.is_empty() {
                anyhow::bail!("У источника {} нет ни одного языка", source.id);
            }
            if source.selected && source.kind.category() == Category::Keyboard {
                selected_keyboards += 1;
            }
        }

        if selected_keyboards > 1 {
            anyhow::bail!("Выбранным может быть только один клавиатурный источник");
        }

        Ok(())
    }

    pub fn dry_run_sources(&self) -> Vec<DryRunSourceSpec> {
        if self.dry_run.sources.is_empty() {
            default_fixture()
        } else {
            self.dry_run.sources.clone()
        }
    }
}
