//! Дескриптор источника ввода и типизированный доступ к его свойствам.
//!
//! Свойства не кэшируются: флаги enabled/selected меняются асинхронно,
//! поэтому каждое обращение заново спрашивает платформу.

mod key_layout;
mod locale;
mod value;

pub use key_layout::{UnicodeKeyLayout, KEY_LAYOUT_HEADER_FORMAT};
pub use locale::Locale;
pub use value::{IconRef, PropertyValue};

pub(crate) use key_layout::synthetic_header;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::filter::{FilterMap, FilterValue};
use crate::mappings::{Category, FilteringPropertyName, Kind, PropertyKey};
use crate::services::platform::Platform;

/// Неизменяемая обёртка над одним нативным источником ввода.
///
/// Создаётся только реестром [`TextInputSources`](crate::TextInputSources).
/// Равенство - идентичность нативного объекта, а не совпадение атрибутов.
///
/// # Panics
///
/// Аксессоры обязательных свойств паникуют, если платформа не вернула
/// значение нужного типа: для источника, полученного перечислением, это
/// нарушение контракта платформы, а не восстановимая ошибка.
pub struct InputSource<P: Platform> {
    raw: P::Source,
    platform: Arc<P>,
}

impl<P: Platform> InputSource<P> {
    pub(crate) fn wrap(raw: P::Source, platform: Arc<P>) -> Self {
        Self { raw, platform }
    }

    /// Нативный дескриптор, например для передачи в собственные вызовы Carbon
    pub fn raw(&self) -> &P::Source {
        &self.raw
    }

    /// Сырое значение свойства без проверки обязательности
    pub fn property(&self, key: PropertyKey) -> Option<PropertyValue> {
        self.platform.property(&self.raw, key)
    }

    fn required<T>(&self, key: PropertyKey, value: Option<T>) -> T {
        match value {
            Some(value) => value,
            None => panic!(
                "Источник ввода {:?}: обязательное свойство {} отсутствует или имеет неверный тип",
                self.raw,
                key.code()
            ),
        }
    }

    fn bool_property(&self, key: PropertyKey) -> bool {
        let value = self.property(key).and_then(|value| value.as_bool());
        self.required(key, value)
    }

    fn string_property(&self, key: PropertyKey) -> String {
        let value = self.property(key).and_then(PropertyValue::into_string);
        self.required(key, value)
    }

    pub fn filtering_properties(&self) -> FilterMap {
        let mut filter = FilterMap::new();
        for &name in FilteringPropertyName::ALL {
            let value = match name {
                FilteringPropertyName::Category => FilterValue::Category(self.category()),
                FilteringPropertyName::Kind => FilterValue::Kind(self.kind()),
                FilteringPropertyName::AsciiCapability => FilterValue::Bool(self.is_ascii_capable()),
                FilteringPropertyName::EnableCapability => FilterValue::Bool(self.is_enable_capable()),
                FilteringPropertyName::SelectCapability => FilterValue::Bool(self.is_select_capable()),
                FilteringPropertyName::Enabled => FilterValue::Bool(self.is_enabled()),
                FilteringPropertyName::Selected => FilterValue::Bool(self.is_selected()),
                FilteringPropertyName::Id => FilterValue::String(self.id()),
                FilteringPropertyName::BundleId => FilterValue::String(self.bundle_id()),
                FilteringPropertyName::InputModeId => FilterValue::String(self.input_mode_id()),
                FilteringPropertyName::LocalizedName => FilterValue::String(self.localized_name()),
            };
            // Тип значения задаётся самим аксессором и всегда подходит
            if let Err(e) = filter.insert(name, value) {
                unreachable!("{}", e);
            }
        }
        filter
    }

    // Свойства, по которым можно фильтровать

    pub fn category(&self) -> Category {
        let code = self.string_property(PropertyKey::Category);
        self.required(PropertyKey::Category, Category::from_code(&code))
    }

    pub fn kind(&self) -> Kind {
        let code = self.string_property(PropertyKey::Kind);
        self.required(PropertyKey::Kind, Kind::from_code(&code))
    }

    pub fn is_ascii_capable(&self) -> bool {
        self.bool_property(PropertyKey::AsciiCapable)
    }

    pub fn is_enable_capable(&self) -> bool {
        self.bool_property(PropertyKey::EnableCapable)
    }

    pub fn is_select_capable(&self) -> bool {
        self.bool_property(PropertyKey::SelectCapable)
    }

    pub fn is_enabled(&self) -> bool {
        self.bool_property(PropertyKey::Enabled)
    }

    pub fn is_selected(&self) -> bool {
        self.bool_property(PropertyKey::Selected)
    }

    pub fn id(&self) -> String {
        self.string_property(PropertyKey::Id)
    }

    pub fn bundle_id(&self) -> String {
        self.string_property(PropertyKey::BundleId)
    }

    pub fn input_mode_id(&self) -> String {
        self.string_property(PropertyKey::InputModeId)
    }

    pub fn localized_name(&self) -> String {
        self.string_property(PropertyKey::LocalizedName)
    }

    // Прочие свойства

    pub fn languages(&self) -> Vec<String> {
        let value = self
            .property(PropertyKey::Languages)
            .and_then(PropertyValue::into_strings);
        self.required(PropertyKey::Languages, value)
    }

    pub fn locales(&self) -> Vec<Locale> {
        self.languages()
            .iter()
            .map(|tag| Locale::canonicalize(tag))
            .collect()
    }

    /// Таблица `uchr`; есть только у раскладок
    pub fn unicode_key_layout(&self) -> Option<UnicodeKeyLayout> {
        self.property(PropertyKey::UnicodeKeyLayoutData)
            .and_then(PropertyValue::into_data)
            .map(UnicodeKeyLayout::from_bytes)
    }

    pub fn icon_ref(&self) -> Option<IconRef> {
        self.property(PropertyKey::IconRef)
            .and_then(|value| value.as_icon())
    }

    pub fn icon_image_url(&self) -> Option<String> {
        self.property(PropertyKey::IconImageUrl)
            .and_then(PropertyValue::into_url)
    }

    /// Снимок всех свойств на момент вызова
    pub fn describe(&self) -> SourceDescription {
        let languages = self.languages();
        let locales = languages
            .iter()
            .map(|tag| Locale::canonicalize(tag).identifier())
            .collect();

        SourceDescription {
            id: self.id(),
            localized_name: self.localized_name(),
            category: self.category(),
            kind: self.kind(),
            bundle_id: self.bundle_id(),
            input_mode_id: self.input_mode_id(),
            ascii_capable: self.is_ascii_capable(),
            enable_capable: self.is_enable_capable(),
            select_capable: self.is_select_capable(),
            enabled: self.is_enabled(),
            selected: self.is_selected(),
            languages,
            locales,
            has_key_layout: self.unicode_key_layout().is_some(),
            has_icon_ref: self.icon_ref().is_some(),
            icon_image_url: self.icon_image_url(),
        }
    }
}

impl<P: Platform> Clone for InputSource<P> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            platform: Arc::clone(&self.platform),
        }
    }
}

impl<P: Platform> PartialEq for InputSource<P> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<P: Platform> Eq for InputSource<P> {}

impl<P: Platform> fmt::Debug for InputSource<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSource")
            .field("platform", &self.platform.name())
            .field("raw", &self.raw)
            .finish()
    }
}

/// Сериализуемый снимок свойств источника ввода
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescription {
    pub id: String,
    pub localized_name: String,
    pub category: Category,
    pub kind: Kind,
    #[serde(rename = "bundleID")]
    pub bundle_id: String,
    #[serde(rename = "inputModeID")]
    pub input_mode_id: String,
    pub ascii_capable: bool,
    pub enable_capable: bool,
    pub select_capable: bool,
    pub enabled: bool,
    pub selected: bool,
    pub languages: Vec<String>,
    pub locales: Vec<String>,
    pub has_key_layout: bool,
    pub has_icon_ref: bool,
    #[serde(rename = "iconImageURL")]
    pub icon_image_url: Option<String>,
}

impl fmt::Display for SourceDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.selected { flags.push("selected"); }
        if self.enabled { flags.push("enabled"); }
        if self.ascii_capable { flags.push("ascii"); }
        if self.select_capable { flags.push("selectable"); }
        if self.enable_capable { flags.push("enableable"); }

        write!(
            f,
            "{} ({}) [{}/{}] {} <{}>",
            self.id,
            self.localized_name,
            self.category,
            self.kind,
            self.languages.join(","),
            flags.join(" ")
        )
    }
}
