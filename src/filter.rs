//! Фильтры перечисления источников ввода.
//!
//! `FilterMap` - типизированный вход запроса, `RawFilter` - его трансляция
//! в представление платформы (ключ - код свойства, перечисления заменены
//! своими кодами, булевы значения и строки передаются как есть).

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, TisError};
use crate::mappings::{Category, FilteringPropertyName, Kind, ValueKind};
use crate::source::PropertyValue;

/// Значение, которому должно равняться фильтруемое свойство
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterValue {
    Category(Category),
    Kind(Kind),
    Bool(bool),
    String(String),
}

impl FilterValue {
    /// Подходит ли вариант значения под тип свойства
    pub fn fits(&self, name: FilteringPropertyName) -> bool {
        match self {
            FilterValue::Category(_) => name == FilteringPropertyName::Category,
            FilterValue::Kind(_) => name == FilteringPropertyName::Kind,
            FilterValue::Bool(_) => name.value_kind() == ValueKind::Bool,
            FilterValue::String(_) => name.value_kind() == ValueKind::String,
        }
    }

    pub fn to_raw(&self) -> RawFilterValue {
        match self {
            FilterValue::Category(category) => RawFilterValue::Code(category.code()),
            FilterValue::Kind(kind) => RawFilterValue::Code(kind.code()),
            FilterValue::Bool(value) => RawFilterValue::Bool(*value),
            FilterValue::String(value) => RawFilterValue::String(value.clone()),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Category(category) => write!(f, "{}", category),
            FilterValue::Kind(kind) => write!(f, "{}", kind),
            FilterValue::Bool(value) => write!(f, "{}", value),
            FilterValue::String(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<Category> for FilterValue {
    fn from(value: Category) -> Self {
        FilterValue::Category(value)
    }
}

impl From<Kind> for FilterValue {
    fn from(value: Kind) -> Self {
        FilterValue::Kind(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

/// Набор ограничений "свойство == значение" для `find`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMap {
    entries: BTreeMap<FilteringPropertyName, FilterValue>,
}

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить ограничение; значение чужого типа отвергается.
    /// Возвращает предыдущее значение свойства, если оно было.
    pub fn insert(
        &mut self,
        name: FilteringPropertyName,
        value: impl Into<FilterValue>,
    ) -> Result<Option<FilterValue>> {
        let value = value.into();
        if !value.fits(name) {
            return Err(TisError::InvalidFilterValue {
                property: name,
                value: value.to_string(),
            });
        }
        Ok(self.entries.insert(name, value))
    }

    pub fn with(mut self, name: FilteringPropertyName, value: impl Into<FilterValue>) -> Result<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.entries.insert(FilteringPropertyName::Category, category.into());
        self
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.entries.insert(FilteringPropertyName::Kind, kind.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.entries.insert(FilteringPropertyName::Id, FilterValue::String(id.into()));
        self
    }

    pub fn with_bundle_id(mut self, bundle_id: impl Into<String>) -> Self {
        self.entries
            .insert(FilteringPropertyName::BundleId, FilterValue::String(bundle_id.into()));
        self
    }

    pub fn with_ascii_capable(mut self, value: bool) -> Self {
        self.entries.insert(FilteringPropertyName::AsciiCapability, value.into());
        self
    }

    pub fn with_select_capable(mut self, value: bool) -> Self {
        self.entries.insert(FilteringPropertyName::SelectCapability, value.into());
        self
    }

    pub fn with_enabled(mut self, value: bool) -> Self {
        self.entries.insert(FilteringPropertyName::Enabled, value.into());
        self
    }

    pub fn with_selected(mut self, value: bool) -> Self {
        self.entries.insert(FilteringPropertyName::Selected, value.into());
        self
    }

    pub fn get(&self, name: FilteringPropertyName) -> Option<&FilterValue> {
        self.entries.get(&name)
    }

    pub fn remove(&mut self, name: FilteringPropertyName) -> Option<FilterValue> {
        self.entries.remove(&name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilteringPropertyName, &FilterValue)> {
        self.entries.iter().map(|(&name, value)| (name, value))
    }

    /// Трансляция в представление платформы.
    ///
    /// Пустой фильтр даёт `None`: платформа должна получить "без фильтра",
    /// а не пустой словарь ограничений.
    pub fn to_raw(&self) -> Option<RawFilter> {
        if self.entries.is_empty() {
            return None;
        }
        Some(RawFilter {
            entries: self
                .entries
                .iter()
                .map(|(&name, value)| (name, value.to_raw()))
                .collect(),
        })
    }
}

impl fmt::Display for FilterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "{{}}");
        }
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Значение фильтра в представлении платформы
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFilterValue {
    /// Код перечисления (CFString)
    Code(&'static str),
    Bool(bool),
    String(String),
}

impl RawFilterValue {
    /// Совпадает ли нормализованное значение свойства с ограничением
    pub fn matches(&self, value: &PropertyValue) -> bool {
        match (self, value) {
            (RawFilterValue::Code(code), PropertyValue::String(actual)) => code == actual,
            (RawFilterValue::String(expected), PropertyValue::String(actual)) => expected == actual,
            (RawFilterValue::Bool(expected), PropertyValue::Bool(actual)) => expected == actual,
            _ => false,
        }
    }
}

/// Непустой фильтр в представлении платформы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFilter {
    entries: Vec<(FilteringPropertyName, RawFilterValue)>,
}

impl RawFilter {
    pub fn entries(&self) -> &[(FilteringPropertyName, RawFilterValue)] {
        &self.entries
    }

    pub fn get(&self, name: FilteringPropertyName) -> Option<&RawFilterValue> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
