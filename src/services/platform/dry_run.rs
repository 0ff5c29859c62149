use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{OsStatus, NO_ERR, PARAM_ERR};
use crate::filter::RawFilter;
use crate::mappings::{Category, Kind, PropertyKey};
use crate::source::{synthetic_header, Locale, PropertyValue};

use super::r#trait::{CurrentVariant, Platform};

/// Расширения бандлов, которые принимает эмуляция регистрации
const BUNDLE_EXTENSIONS: &[&str] = &["app", "bundle", "component", "plugin"];

/// Описание источника ввода для режима эмуляции (секция `[[dry_run.sources]]`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DryRunSourceSpec {
    pub id: String,
    pub localized_name: String,
    pub kind: Kind,
    #[serde(default)]
    pub bundle_id: String,
    #[serde(default)]
    pub input_mode_id: String,
    pub languages: Vec<String>,
    #[serde(default)]
    pub ascii_capable: bool,
    #[serde(default = "default_true")]
    pub enable_capable: bool,
    #[serde(default = "default_true")]
    pub select_capable: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub icon_image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl DryRunSourceSpec {
    fn new(id: &str, localized_name: &str, kind: Kind, languages: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            localized_name: localized_name.to_string(),
            kind,
            bundle_id: String::new(),
            input_mode_id: String::new(),
            languages: languages.iter().map(|s| s.to_string()).collect(),
            ascii_capable: false,
            enable_capable: true,
            select_capable: true,
            enabled: false,
            selected: false,
            icon_image_url: None,
        }
    }

    fn bundle(mut self, bundle_id: &str) -> Self {
        self.bundle_id = bundle_id.to_string();
        self
    }

    fn mode(mut self, input_mode_id: &str) -> Self {
        self.input_mode_id = input_mode_id.to_string();
        self
    }

    fn ascii(mut self) -> Self {
        self.ascii_capable = true;
        self
    }

    fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    fn fixed(mut self) -> Self {
        self.enable_capable = false;
        self
    }

    fn not_selectable(mut self) -> Self {
        self.select_capable = false;
        self
    }

    fn icon(mut self, url: &str) -> Self {
        self.icon_image_url = Some(url.to_string());
        self
    }
}

/// Встроенный набор источников: типичная система с английской, русской
/// и японской раскладками
pub fn default_fixture() -> Vec<DryRunSourceSpec> {
    vec![
        DryRunSourceSpec::new("com.apple.keylayout.US", "U.S.", Kind::KeyboardLayout, &["en"])
            .bundle("com.apple.keylayout.US")
            .ascii()
            .enabled()
            .selected(),
        DryRunSourceSpec::new("com.apple.keylayout.ABC", "ABC", Kind::KeyboardLayout, &["en", "de", "fr", "it", "nl"])
            .bundle("com.apple.keylayout.ABC")
            .ascii()
            .enabled(),
        DryRunSourceSpec::new("com.apple.keylayout.Russian", "Russian", Kind::KeyboardLayout, &["ru"])
            .bundle("com.apple.keylayout.Russian")
            .enabled(),
        DryRunSourceSpec::new("com.apple.inputmethod.Kotoeri", "Japanese", Kind::KeyboardInputMethodModeEnabled, &["ja"])
            .bundle("com.apple.inputmethod.Kotoeri")
            .enabled()
            .not_selectable()
            .icon("file:///System/Library/Input%20Methods/JapaneseIM.app/Contents/Resources/icon.tiff"),
        DryRunSourceSpec::new("com.apple.inputmethod.Kotoeri.RomajiTyping.Japanese", "Hiragana", Kind::KeyboardInputMode, &["ja"])
            .bundle("com.apple.inputmethod.Kotoeri")
            .mode("com.apple.inputmethod.Japanese")
            .enabled(),
        DryRunSourceSpec::new("com.apple.inputmethod.Kotoeri.RomajiTyping.Japanese.Katakana", "Katakana", Kind::KeyboardInputMode, &["ja"])
            .bundle("com.apple.inputmethod.Kotoeri")
            .mode("com.apple.inputmethod.Japanese.Katakana"),
        DryRunSourceSpec::new("com.apple.keylayout.German", "German", Kind::KeyboardLayout, &["de"])
            .bundle("com.apple.keylayout.German")
            .ascii(),
        DryRunSourceSpec::new("com.apple.CharacterPaletteIM", "Emoji & Symbols", Kind::CharacterPalette, &["en"])
            .bundle("com.apple.CharacterPaletteIM")
            .enabled()
            .fixed(),
        DryRunSourceSpec::new("com.apple.KeyboardViewer", "Keyboard Viewer", Kind::KeyboardViewer, &["en"])
            .bundle("com.apple.KeyboardViewer")
            .enabled()
            .fixed(),
        DryRunSourceSpec::new("com.apple.inputmethod.ink.inkserver", "Ink", Kind::Ink, &["en"])
            .bundle("com.apple.inkserver"),
    ]
}

/// Дескриптор эмулируемого источника: идентичность - номер слота
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DryRunSource {
    slot: usize,
}

#[derive(Debug)]
struct SourceState {
    spec: DryRunSourceSpec,
    enabled: bool,
    selected: bool,
}

impl SourceState {
    fn category(&self) -> Category {
        self.spec.kind.category()
    }

    fn is_keyboard(&self) -> bool {
        self.category() == Category::Keyboard
    }

    fn is_layout(&self) -> bool {
        self.spec.kind == Kind::KeyboardLayout
    }

    fn is_ascii_keyboard(&self) -> bool {
        self.is_keyboard() && self.spec.ascii_capable
    }

    fn is_ascii_layout(&self) -> bool {
        self.is_layout() && self.spec.ascii_capable
    }

    fn value(&self, key: PropertyKey) -> Option<PropertyValue> {
        let spec = &self.spec;
        let value = match key {
            PropertyKey::Category => PropertyValue::String(self.category().code().to_string()),
            PropertyKey::Kind => PropertyValue::String(spec.kind.code().to_string()),
            PropertyKey::AsciiCapable => PropertyValue::Bool(spec.ascii_capable),
            PropertyKey::EnableCapable => PropertyValue::Bool(spec.enable_capable),
            PropertyKey::SelectCapable => PropertyValue::Bool(spec.select_capable),
            PropertyKey::Enabled => PropertyValue::Bool(self.enabled),
            PropertyKey::Selected => PropertyValue::Bool(self.selected),
            PropertyKey::Id => PropertyValue::String(spec.id.clone()),
            PropertyKey::BundleId => PropertyValue::String(spec.bundle_id.clone()),
            PropertyKey::InputModeId => PropertyValue::String(spec.input_mode_id.clone()),
            PropertyKey::LocalizedName => PropertyValue::String(spec.localized_name.clone()),
            PropertyKey::Languages => PropertyValue::Strings(spec.languages.clone()),
            PropertyKey::UnicodeKeyLayoutData if self.is_layout() => PropertyValue::Data(synthetic_header(1)),
            PropertyKey::UnicodeKeyLayoutData => return None,
            PropertyKey::IconRef => return None,
            PropertyKey::IconImageUrl => PropertyValue::Url(spec.icon_image_url.clone()?),
        };
        Some(value)
    }

    fn matches(&self, filter: &RawFilter) -> bool {
        filter.entries().iter().all(|(name, expected)| {
            self.value(name.property_key())
                .map(|actual| expected.matches(&actual))
                .unwrap_or(false)
        })
    }
}

/// In-memory модель службы источников ввода.
///
/// Используется в `--dry-run` и в тестах: повторяет правила платформы
/// (выбор клавиатурного источника снимает выбор с остальных, отключённые
/// источники нельзя выбрать и т.д.), но не трогает состояние системы.
pub struct DryRunPlatform {
    sources: RwLock<Vec<SourceState>>,
    keyboard_override: RwLock<Option<usize>>,
    registered: RwLock<Vec<PathBuf>>,
}

impl Default for DryRunPlatform {
    fn default() -> Self {
        Self::new(default_fixture())
    }
}

impl DryRunPlatform {
    pub fn new(specs: Vec<DryRunSourceSpec>) -> Self {
        info!("Инициализация DryRunPlatform ({} источников)", specs.len());

        let mut keyboard_selected = false;
        let sources = specs
            .into_iter()
            .map(|spec| {
                let mut selected = spec.selected;
                if selected && spec.kind.category() == Category::Keyboard {
                    if keyboard_selected {
                        warn!("Источник {} помечен выбранным повторно, выбор снят", spec.id);
                        selected = false;
                    }
                    keyboard_selected = true;
                }
                SourceState {
                    enabled: spec.enabled || selected,
                    selected,
                    spec,
                }
            })
            .collect();

        Self {
            sources: RwLock::new(sources),
            keyboard_override: RwLock::new(None),
            registered: RwLock::new(Vec::new()),
        }
    }

    /// Бандлы, зарегистрированные за время жизни эмуляции
    pub fn registered_bundles(&self) -> Vec<PathBuf> {
        self.registered.read().clone()
    }

    fn with_slot<T>(&self, source: &DryRunSource, f: impl FnOnce(&mut SourceState) -> T) -> Option<T> {
        self.sources.write().get_mut(source.slot).map(f)
    }

    fn first_enabled(sources: &[SourceState], predicate: fn(&SourceState) -> bool) -> Option<usize> {
        sources.iter().position(|state| state.enabled && predicate(state))
    }
}

impl Platform for DryRunPlatform {
    type Source = DryRunSource;

    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn enumerate(&self, filter: Option<&RawFilter>, include_all_installed: bool) -> Vec<DryRunSource> {
        self.sources
            .read()
            .iter()
            .enumerate()
            .filter(|(_, state)| include_all_installed || state.enabled)
            .filter(|(_, state)| filter.map_or(true, |filter| state.matches(filter)))
            .map(|(slot, _)| DryRunSource { slot })
            .collect()
    }

    fn copy_current(&self, variant: CurrentVariant) -> Option<DryRunSource> {
        let sources = self.sources.read();
        let selected = sources
            .iter()
            .position(|state| state.selected && state.is_keyboard());
        let keyboard_override = *self.keyboard_override.read();

        let slot = match variant {
            CurrentVariant::Any => selected,
            CurrentVariant::Layout => selected
                .filter(|&slot| sources[slot].is_layout())
                .or(keyboard_override)
                .or_else(|| Self::first_enabled(&sources, SourceState::is_layout)),
            CurrentVariant::AsciiCapable => selected
                .filter(|&slot| sources[slot].is_ascii_keyboard())
                .or_else(|| Self::first_enabled(&sources, SourceState::is_ascii_keyboard)),
            CurrentVariant::AsciiCapableLayout => [selected, keyboard_override]
                .into_iter()
                .flatten()
                .find(|&slot| sources[slot].is_ascii_layout())
                .or_else(|| Self::first_enabled(&sources, SourceState::is_ascii_layout)),
        };

        slot.map(|slot| DryRunSource { slot })
    }

    fn copy_for_language(&self, language: &str) -> Option<DryRunSource> {
        let wanted = Locale::canonicalize(language);

        self.sources
            .read()
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_keyboard() && state.spec.select_capable)
            .filter_map(|(slot, state)| {
                let locales: Vec<Locale> = state
                    .spec
                    .languages
                    .iter()
                    .map(|tag| Locale::canonicalize(tag))
                    .collect();
                // Точное совпадение тега важнее совпадения только по языку
                let rank = if locales.iter().any(|locale| *locale == wanted) {
                    0
                } else if locales.iter().any(|locale| locale.language == wanted.language) {
                    1
                } else {
                    return None;
                };
                Some(((rank, !state.enabled, slot), slot))
            })
            .min_by_key(|(key, _)| *key)
            .map(|(_, slot)| DryRunSource { slot })
    }

    fn ascii_capable_list(&self) -> Vec<DryRunSource> {
        self.sources
            .read()
            .iter()
            .enumerate()
            .filter(|(_, state)| state.enabled && state.is_ascii_keyboard())
            .map(|(slot, _)| DryRunSource { slot })
            .collect()
    }

    fn property(&self, source: &DryRunSource, key: PropertyKey) -> Option<PropertyValue> {
        self.sources.read().get(source.slot)?.value(key)
    }

    fn select(&self, source: &DryRunSource) -> OsStatus {
        let mut sources = self.sources.write();
        let Some(state) = sources.get(source.slot) else {
            return PARAM_ERR;
        };
        if !state.spec.select_capable || !state.enabled {
            debug!("Dry-run: {} нельзя выбрать", state.spec.id);
            return PARAM_ERR;
        }

        if state.is_keyboard() {
            for other in sources.iter_mut().filter(|other| other.is_keyboard()) {
                other.selected = false;
            }
        }
        sources[source.slot].selected = true;
        info!("Dry-run: Выбран источник {}", sources[source.slot].spec.id);
        NO_ERR
    }

    fn deselect(&self, source: &DryRunSource) -> OsStatus {
        let status = self.with_slot(source, |state| {
            // Снять выбор можно только с палитр и ink: клавиатурный источник
            // всегда должен оставаться выбранным
            if state.is_keyboard() {
                return PARAM_ERR;
            }
            state.selected = false;
            info!("Dry-run: Снят выбор с источника {}", state.spec.id);
            NO_ERR
        });
        status.unwrap_or(PARAM_ERR)
    }

    fn enable(&self, source: &DryRunSource) -> OsStatus {
        let status = self.with_slot(source, |state| {
            if !state.spec.enable_capable {
                return PARAM_ERR;
            }
            if !state.enabled {
                state.enabled = true;
                info!("Dry-run: Включён источник {}", state.spec.id);
            }
            NO_ERR
        });
        status.unwrap_or(PARAM_ERR)
    }

    fn disable(&self, source: &DryRunSource) -> OsStatus {
        let status = self.with_slot(source, |state| {
            if !state.spec.enable_capable || (state.selected && state.is_keyboard()) {
                return PARAM_ERR;
            }
            state.enabled = false;
            state.selected = false;
            info!("Dry-run: Отключён источник {}", state.spec.id);
            NO_ERR
        });

        // Отключённая раскладка не может оставаться переопределением
        if status == Some(NO_ERR) {
            let mut keyboard_override = self.keyboard_override.write();
            if *keyboard_override == Some(source.slot) {
                *keyboard_override = None;
                info!("Dry-run: Переопределение раскладки сброшено вместе с источником");
            }
        }
        status.unwrap_or(PARAM_ERR)
    }

    fn register(&self, location: &Path) -> OsStatus {
        let is_bundle = location
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| BUNDLE_EXTENSIONS.contains(&ext));
        if !location.is_absolute() || !is_bundle {
            debug!("Dry-run: {} не похож на бандл метода ввода", location.display());
            return PARAM_ERR;
        }

        let mut registered = self.registered.write();
        if !registered.iter().any(|path| path == location) {
            registered.push(location.to_path_buf());
        }
        info!("Dry-run: Зарегистрирован бандл {}", location.display());
        NO_ERR
    }

    fn set_keyboard_layout_override(&self, source: Option<&DryRunSource>) -> OsStatus {
        let Some(source) = source else {
            *self.keyboard_override.write() = None;
            info!("Dry-run: Переопределение раскладки сброшено");
            return NO_ERR;
        };

        let is_layout = self
            .sources
            .read()
            .get(source.slot)
            .map_or(false, SourceState::is_layout);
        if !is_layout {
            return PARAM_ERR;
        }

        *self.keyboard_override.write() = Some(source.slot);
        info!("Dry-run: Раскладка переопределена слотом {}", source.slot);
        NO_ERR
    }

    fn copy_keyboard_layout_override(&self) -> Option<DryRunSource> {
        self.keyboard_override
            .read()
            .map(|slot| DryRunSource { slot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMap;

    fn slot_of(platform: &DryRunPlatform, id: &str) -> DryRunSource {
        let filter = FilterMap::new().with_id(id).to_raw();
        platform.enumerate(filter.as_ref(), true)[0]
    }

    #[test]
    fn test_fixture_has_single_selected_keyboard() {
        let platform = DryRunPlatform::default();
        let selected = platform.enumerate(FilterMap::new().with_selected(true).to_raw().as_ref(), true);
        assert_eq!(selected.len(), 1);
        assert_eq!(
            platform.property(&selected[0], PropertyKey::Id),
            Some(PropertyValue::String("com.apple.keylayout.US".to_string()))
        );
    }

    #[test]
    fn test_duplicate_selection_is_dropped() {
        let specs = vec![
            DryRunSourceSpec::new("a", "A", Kind::KeyboardLayout, &["en"]).selected(),
            DryRunSourceSpec::new("b", "B", Kind::KeyboardLayout, &["en"]).selected(),
        ];
        let platform = DryRunPlatform::new(specs);
        let b = slot_of(&platform, "b");
        assert_eq!(platform.property(&b, PropertyKey::Selected), Some(PropertyValue::Bool(false)));
        // Выбранный источник всегда включён
        let a = slot_of(&platform, "a");
        assert_eq!(platform.property(&a, PropertyKey::Enabled), Some(PropertyValue::Bool(true)));
    }

    #[test]
    fn test_enumerate_hides_disabled_unless_all_installed() {
        let platform = DryRunPlatform::default();
        let enabled = platform.enumerate(None, false);
        let all = platform.enumerate(None, true);
        assert_eq!(all.len(), default_fixture().len());
        assert!(enabled.len() < all.len());
        assert!(enabled.iter().all(|source| all.contains(source)));
    }

    #[test]
    fn test_key_layout_only_for_layouts() {
        let platform = DryRunPlatform::default();
        let us = slot_of(&platform, "com.apple.keylayout.US");
        let ink = slot_of(&platform, "com.apple.inputmethod.ink.inkserver");
        assert!(matches!(
            platform.property(&us, PropertyKey::UnicodeKeyLayoutData),
            Some(PropertyValue::Data(_))
        ));
        assert_eq!(platform.property(&ink, PropertyKey::UnicodeKeyLayoutData), None);
        assert_eq!(platform.property(&us, PropertyKey::IconRef), None);
    }

    #[test]
    fn test_select_keyboard_moves_selection() {
        let platform = DryRunPlatform::default();
        let russian = slot_of(&platform, "com.apple.keylayout.Russian");
        assert_eq!(platform.select(&russian), NO_ERR);

        assert_eq!(platform.copy_current(CurrentVariant::Any), Some(russian));
        let us = slot_of(&platform, "com.apple.keylayout.US");
        assert_eq!(platform.property(&us, PropertyKey::Selected), Some(PropertyValue::Bool(false)));
    }

    #[test]
    fn test_select_rejects_disabled_and_unselectable() {
        let platform = DryRunPlatform::default();
        let german = slot_of(&platform, "com.apple.keylayout.German");
        let kotoeri = slot_of(&platform, "com.apple.inputmethod.Kotoeri");
        assert_eq!(platform.select(&german), PARAM_ERR);
        assert_eq!(platform.select(&kotoeri), PARAM_ERR);
        assert_eq!(platform.select(&DryRunSource { slot: 999 }), PARAM_ERR);
    }

    #[test]
    fn test_ascii_variants_fall_back_when_selection_is_not_ascii() {
        let platform = DryRunPlatform::default();
        let russian = slot_of(&platform, "com.apple.keylayout.Russian");
        let us = slot_of(&platform, "com.apple.keylayout.US");
        assert_eq!(platform.select(&russian), NO_ERR);

        assert_eq!(platform.copy_current(CurrentVariant::Layout), Some(russian));
        assert_eq!(platform.copy_current(CurrentVariant::AsciiCapable), Some(us));
        assert_eq!(platform.copy_current(CurrentVariant::AsciiCapableLayout), Some(us));
    }

    #[test]
    fn test_layout_variant_uses_override_for_input_modes() {
        let platform = DryRunPlatform::default();
        let hiragana = slot_of(&platform, "com.apple.inputmethod.Kotoeri.RomajiTyping.Japanese");
        let abc = slot_of(&platform, "com.apple.keylayout.ABC");
        assert_eq!(platform.select(&hiragana), NO_ERR);
        assert_eq!(platform.set_keyboard_layout_override(Some(&abc)), NO_ERR);

        assert_eq!(platform.copy_current(CurrentVariant::Any), Some(hiragana));
        assert_eq!(platform.copy_current(CurrentVariant::Layout), Some(abc));
        assert_eq!(platform.copy_current(CurrentVariant::AsciiCapableLayout), Some(abc));
    }

    #[test]
    fn test_disabling_override_layout_clears_override() {
        let platform = DryRunPlatform::default();
        let hiragana = slot_of(&platform, "com.apple.inputmethod.Kotoeri.RomajiTyping.Japanese");
        let abc = slot_of(&platform, "com.apple.keylayout.ABC");
        assert_eq!(platform.set_keyboard_layout_override(Some(&abc)), NO_ERR);
        assert_eq!(platform.disable(&abc), NO_ERR);
        assert_eq!(platform.select(&hiragana), NO_ERR);

        assert_eq!(platform.copy_keyboard_layout_override(), None);
        for variant in [CurrentVariant::Layout, CurrentVariant::AsciiCapableLayout] {
            let current = platform.copy_current(variant).unwrap();
            assert_ne!(current, abc);
            assert_eq!(
                platform.property(&current, PropertyKey::Enabled),
                Some(PropertyValue::Bool(true))
            );
        }
    }

    #[test]
    fn test_language_lookup_prefers_exact_and_enabled() {
        let platform = DryRunPlatform::default();
        let hiragana = slot_of(&platform, "com.apple.inputmethod.Kotoeri.RomajiTyping.Japanese");
        let abc = slot_of(&platform, "com.apple.keylayout.ABC");
        let german = slot_of(&platform, "com.apple.keylayout.German");

        assert_eq!(platform.copy_for_language("ja"), Some(hiragana));
        assert_eq!(platform.copy_for_language("ja_JP"), Some(hiragana));
        // ABC включена, German - нет
        assert_eq!(platform.copy_for_language("de"), Some(abc));
        assert_ne!(platform.copy_for_language("de"), Some(german));
        assert_eq!(platform.copy_for_language("tlh"), None);
    }

    #[test]
    fn test_deselect_only_non_keyboard() {
        let platform = DryRunPlatform::default();
        let us = slot_of(&platform, "com.apple.keylayout.US");
        let palette = slot_of(&platform, "com.apple.CharacterPaletteIM");
        assert_eq!(platform.deselect(&us), PARAM_ERR);
        assert_eq!(platform.select(&palette), NO_ERR);
        assert_eq!(platform.deselect(&palette), NO_ERR);
        // Клавиатурный выбор не затронут палитрой
        assert_eq!(platform.copy_current(CurrentVariant::Any), Some(us));
    }

    #[test]
    fn test_enable_disable_rules() {
        let platform = DryRunPlatform::default();
        let german = slot_of(&platform, "com.apple.keylayout.German");
        let us = slot_of(&platform, "com.apple.keylayout.US");
        let viewer = slot_of(&platform, "com.apple.KeyboardViewer");

        assert_eq!(platform.enable(&german), NO_ERR);
        assert_eq!(platform.enable(&german), NO_ERR);
        assert_eq!(platform.disable(&german), NO_ERR);
        assert_eq!(platform.disable(&us), PARAM_ERR);
        assert_eq!(platform.enable(&viewer), PARAM_ERR);
        assert_eq!(platform.disable(&viewer), PARAM_ERR);
    }

    #[test]
    fn test_register_requires_absolute_bundle_path() {
        let platform = DryRunPlatform::default();
        assert_eq!(platform.register(Path::new("relative/My.app")), PARAM_ERR);
        assert_eq!(platform.register(Path::new("/tmp/not-a-bundle.txt")), PARAM_ERR);
        assert_eq!(platform.register(Path::new("/Library/Input Methods/My.app")), NO_ERR);
        assert_eq!(platform.register(Path::new("/Library/Input Methods/My.app")), NO_ERR);
        assert_eq!(platform.registered_bundles().len(), 1);
    }

    #[test]
    fn test_override_accepts_layouts_only() {
        let platform = DryRunPlatform::default();
        let palette = slot_of(&platform, "com.apple.CharacterPaletteIM");
        let abc = slot_of(&platform, "com.apple.keylayout.ABC");

        assert_eq!(platform.set_keyboard_layout_override(Some(&palette)), PARAM_ERR);
        assert_eq!(platform.copy_keyboard_layout_override(), None);
        assert_eq!(platform.set_keyboard_layout_override(Some(&abc)), NO_ERR);
        assert_eq!(platform.copy_keyboard_layout_override(), Some(abc));
        assert_eq!(platform.set_keyboard_layout_override(None), NO_ERR);
        assert_eq!(platform.copy_keyboard_layout_override(), None);
    }

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let spec: DryRunSourceSpec = serde_json::from_str(
            r#"{"id": "x", "localized_name": "X", "kind": "keyboardLayout", "languages": ["en"]}"#,
        )
        .unwrap();
        assert!(spec.enable_capable);
        assert!(spec.select_capable);
        assert!(!spec.enabled);
        assert_eq!(spec.icon_image_url, None);
    }
}
