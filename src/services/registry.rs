use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{OsStatus, Result, TisError};
use crate::filter::FilterMap;
use crate::source::InputSource;

use super::platform::{CurrentVariant, Platform};

/// Реестр источников ввода: поиск по фильтру, текущие источники и
/// мутирующие вызовы.
///
/// Все вызовы синхронные и однократные: ошибка платформы возвращается
/// вызывающему без повторов.
pub struct TextInputSources<P: Platform> {
    platform: Arc<P>,
}

#[cfg(target_os = "macos")]
impl TextInputSources<super::platform::CarbonPlatform> {
    /// Реестр поверх настоящей службы источников ввода macOS
    pub fn system() -> Self {
        Self::new(super::platform::CarbonPlatform::new())
    }
}

impl<P: Platform> Clone for TextInputSources<P> {
    fn clone(&self) -> Self {
        Self {
            platform: Arc::clone(&self.platform),
        }
    }
}

impl<P: Platform> TextInputSources<P> {
    pub fn new(platform: P) -> Self {
        debug!("Инициализация TextInputSources на бэкенде {}", platform.name());
        Self {
            platform: Arc::new(platform),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    fn wrap(&self, raw: P::Source) -> InputSource<P> {
        InputSource::wrap(raw, Arc::clone(&self.platform))
    }

    /// Найти источники, у которых каждое свойство фильтра равно заданному.
    ///
    /// Пустой фильтр совпадает со всеми источниками. Порядок - как у
    /// платформы; отсутствие совпадений - пустой вектор, а не ошибка.
    pub fn find(&self, filter: &FilterMap, include_all_installed: bool) -> Vec<InputSource<P>> {
        let raw_filter = filter.to_raw();
        let found = self
            .platform
            .enumerate(raw_filter.as_ref(), include_all_installed);

        debug!(
            "find {} (all installed: {}): {} источников",
            filter,
            include_all_installed,
            found.len()
        );

        found.into_iter().map(|raw| self.wrap(raw)).collect()
    }

    /// Все включённые источники без ограничений
    pub fn all(&self) -> Vec<InputSource<P>> {
        self.find(&FilterMap::new(), false)
    }

    fn copy_current(&self, variant: CurrentVariant) -> InputSource<P> {
        match self.platform.copy_current(variant) {
            Some(raw) => self.wrap(raw),
            // Без активного контекста ввода продолжать бессмысленно
            None => panic!(
                "Платформа {} не вернула {} input source: нет активной сессии ввода",
                self.platform.name(),
                variant
            ),
        }
    }

    /// # Panics
    ///
    /// Если у сессии нет активного контекста ввода.
    pub fn current(&self) -> InputSource<P> {
        self.copy_current(CurrentVariant::Any)
    }

    pub fn current_layout(&self) -> InputSource<P> {
        self.copy_current(CurrentVariant::Layout)
    }

    pub fn current_ascii_capable(&self) -> InputSource<P> {
        self.copy_current(CurrentVariant::AsciiCapable)
    }

    pub fn current_ascii_capable_layout(&self) -> InputSource<P> {
        self.copy_current(CurrentVariant::AsciiCapableLayout)
    }

    pub fn current_variant(&self, variant: CurrentVariant) -> InputSource<P> {
        self.copy_current(variant)
    }

    /// Лучший источник для языка; `None`, если язык не поддерживается
    pub fn input_source_for_language(&self, language: &str) -> Option<InputSource<P>> {
        let found = self.platform.copy_for_language(language);
        debug!("Источник для языка {}: {}", language, found.is_some());
        found.map(|raw| self.wrap(raw))
    }

    pub fn ascii_capable_input_sources(&self) -> Vec<InputSource<P>> {
        self.platform
            .ascii_capable_list()
            .into_iter()
            .map(|raw| self.wrap(raw))
            .collect()
    }

    pub fn select(&self, source: &InputSource<P>) -> Result<()> {
        let status = self.platform.select(source.raw());
        Self::report("select", status, TisError::CannotSelect)
    }

    pub fn deselect(&self, source: &InputSource<P>) -> Result<()> {
        let status = self.platform.deselect(source.raw());
        Self::report("deselect", status, TisError::CannotDeselect)
    }

    /// Включение уже включённого источника - успех
    pub fn enable(&self, source: &InputSource<P>) -> Result<()> {
        let status = self.platform.enable(source.raw());
        Self::report("enable", status, TisError::CannotEnable)
    }

    pub fn disable(&self, source: &InputSource<P>) -> Result<()> {
        let status = self.platform.disable(source.raw());
        Self::report("disable", status, TisError::CannotDisable)
    }

    /// Зарегистрировать бандл метода ввода. Регистрация переживает процесс.
    pub fn register_input_source(&self, location: &Path) -> Result<()> {
        let status = self.platform.register(location);
        Self::report("register", status, TisError::CannotRegister)
    }

    /// `None` сбрасывает переопределение
    pub fn set_override_keyboard_layout(&self, keyboard_layout: Option<&InputSource<P>>) -> Result<()> {
        let status = self
            .platform
            .set_keyboard_layout_override(keyboard_layout.map(InputSource::raw));
        Self::report("override keyboard layout", status, TisError::CannotOverrideKeyboardLayout)
    }

    pub fn override_keyboard_layout(&self) -> Option<InputSource<P>> {
        self.platform
            .copy_keyboard_layout_override()
            .map(|raw| self.wrap(raw))
    }

    fn report(operation: &str, status: OsStatus, on_param_err: TisError) -> Result<()> {
        let result = TisError::check_status(status, on_param_err);
        match &result {
            Ok(()) => info!("{}: успешно", operation),
            Err(e) => warn!("{}: {} (статус {})", operation, e, status),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NO_ERR;
    use crate::filter::RawFilter;
    use crate::mappings::{Category, FilteringPropertyName, Kind, PropertyKey};
    use crate::services::platform::DryRunPlatform;
    use crate::source::PropertyValue;
    use std::collections::HashSet;

    fn registry() -> TextInputSources<DryRunPlatform> {
        TextInputSources::new(DryRunPlatform::default())
    }

    fn by_id(sources: &TextInputSources<DryRunPlatform>, id: &str) -> InputSource<DryRunPlatform> {
        sources
            .find(&FilterMap::new().with_id(id), true)
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_current_accessors_are_present() {
        let sources = registry();
        assert_eq!(sources.current().id(), "com.apple.keylayout.US");
        assert_eq!(sources.current_layout().kind(), Kind::KeyboardLayout);
        assert!(sources.current_ascii_capable().is_ascii_capable());
        let layout = sources.current_ascii_capable_layout();
        assert!(layout.is_ascii_capable());
        assert_eq!(layout.kind(), Kind::KeyboardLayout);

        for variant in CurrentVariant::ALL {
            let source = sources.current_variant(variant);
            assert_eq!(source.category(), Category::Keyboard, "{}", variant);
        }
    }

    #[test]
    fn test_find_by_own_filtering_properties_returns_itself() {
        let sources = registry();
        let current = sources.current();
        let found = sources.find(&current.filtering_properties(), false);
        assert_eq!(found, vec![current]);
    }

    #[test]
    fn test_roundtrip_for_every_installed_source() {
        let sources = registry();
        for source in sources.find(&FilterMap::new(), true) {
            let found = sources.find(&source.filtering_properties(), true);
            assert_eq!(found.len(), 1, "{}", source.id());
            assert_eq!(found[0], source);
        }
    }

    #[test]
    fn test_empty_filter_matches_unconstrained_enumeration() {
        let sources = registry();
        let filtered = sources.find(&FilterMap::new(), false);
        let unconstrained: Vec<_> = sources
            .platform()
            .enumerate(None, false)
            .into_iter()
            .map(|raw| sources.wrap(raw))
            .collect();
        assert_eq!(filtered, unconstrained);
        assert_eq!(sources.all(), filtered);
    }

    #[test]
    fn test_no_match_is_empty() {
        let sources = registry();
        let found = sources.find(&FilterMap::new().with_id("com.example.none"), true);
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_preserves_platform_order() {
        let sources = registry();
        let ids: Vec<String> = sources
            .find(&FilterMap::new().with_kind(Kind::KeyboardLayout), true)
            .iter()
            .map(|source| source.id())
            .collect();
        assert_eq!(
            ids,
            vec![
                "com.apple.keylayout.US",
                "com.apple.keylayout.ABC",
                "com.apple.keylayout.Russian",
                "com.apple.keylayout.German",
            ]
        );
    }

    #[test]
    fn test_languages_and_partition_hold_for_all_installed() {
        let sources = registry();
        let all = sources.find(&FilterMap::new(), true);
        assert!(!all.is_empty());
        for source in all {
            let languages = source.languages();
            assert!(!languages.is_empty());
            assert_eq!(source.locales().len(), languages.len());

            let kind = source.kind();
            assert_eq!(kind.category(), source.category());
            assert!(source.category().kinds().contains(&kind));
        }
    }

    #[test]
    fn test_category_filter() {
        let sources = registry();
        let palettes = sources.find(&FilterMap::new().with_category(Category::Palette), true);
        let kinds: HashSet<Kind> = palettes.iter().map(|source| source.kind()).collect();
        assert_eq!(palettes.len(), 2);
        assert_eq!(kinds, [Kind::CharacterPalette, Kind::KeyboardViewer].into_iter().collect());
    }

    #[test]
    fn test_enable_already_enabled_succeeds() {
        let sources = registry();
        let us = sources.current();
        assert!(us.is_enabled());
        assert!(sources.enable(&us).is_ok());
        assert!(us.is_enabled());
    }

    #[test]
    fn test_flags_are_requeried_after_mutation() {
        let sources = registry();
        let german = by_id(&sources, "com.apple.keylayout.German");
        assert!(!german.is_enabled());

        sources.enable(&german).unwrap();
        assert!(german.is_enabled());

        sources.select(&german).unwrap();
        assert!(german.is_selected());
        assert_eq!(sources.current(), german);
    }

    #[test]
    fn test_mutation_errors_name_the_operation() {
        let sources = registry();
        let disabled = by_id(&sources, "com.apple.keylayout.German");
        let us = sources.current();
        let viewer = by_id(&sources, "com.apple.KeyboardViewer");

        assert!(matches!(sources.select(&disabled), Err(TisError::CannotSelect)));
        assert!(matches!(sources.deselect(&us), Err(TisError::CannotDeselect)));
        assert!(matches!(sources.enable(&viewer), Err(TisError::CannotEnable)));
        assert!(matches!(sources.disable(&us), Err(TisError::CannotDisable)));
        assert!(matches!(
            sources.register_input_source(Path::new("relative.txt")),
            Err(TisError::CannotRegister)
        ));
        assert!(matches!(
            sources.set_override_keyboard_layout(Some(&viewer)),
            Err(TisError::CannotOverrideKeyboardLayout)
        ));
    }

    #[test]
    fn test_override_roundtrip_and_clear() {
        let sources = registry();
        let abc = by_id(&sources, "com.apple.keylayout.ABC");

        assert_eq!(sources.override_keyboard_layout(), None);
        sources.set_override_keyboard_layout(Some(&abc)).unwrap();
        assert_eq!(sources.override_keyboard_layout(), Some(abc));
        sources.set_override_keyboard_layout(None).unwrap();
        assert_eq!(sources.override_keyboard_layout(), None);
    }

    #[test]
    fn test_language_lookup() {
        let sources = registry();
        let japanese = sources.input_source_for_language("ja").unwrap();
        assert_eq!(japanese.kind(), Kind::KeyboardInputMode);
        assert!(sources.input_source_for_language("xx").is_none());
    }

    #[test]
    fn test_ascii_capable_list() {
        let sources = registry();
        let ascii = sources.ascii_capable_input_sources();
        assert!(!ascii.is_empty());
        assert!(ascii.iter().all(|source| source.is_ascii_capable() && source.is_enabled()));
        assert!(ascii.contains(&sources.current_ascii_capable()));
    }

    #[test]
    fn test_registered_bundle_is_recorded() {
        let sources = registry();
        let bundle = Path::new("/Library/Input Methods/Example.app");
        sources.register_input_source(bundle).unwrap();
        assert_eq!(sources.platform().registered_bundles(), vec![bundle.to_path_buf()]);
    }

    /// Платформа со сломанным контрактом: источники есть, свойств нет
    struct HollowPlatform {
        status: OsStatus,
    }

    impl Platform for HollowPlatform {
        type Source = u8;

        fn name(&self) -> &'static str {
            "hollow"
        }

        fn enumerate(&self, _filter: Option<&RawFilter>, _include_all_installed: bool) -> Vec<u8> {
            vec![1, 2]
        }

        fn copy_current(&self, _variant: CurrentVariant) -> Option<u8> {
            None
        }

        fn copy_for_language(&self, _language: &str) -> Option<u8> {
            None
        }

        fn ascii_capable_list(&self) -> Vec<u8> {
            Vec::new()
        }

        fn property(&self, _source: &u8, key: PropertyKey) -> Option<PropertyValue> {
            match key {
                PropertyKey::Kind => Some(PropertyValue::String("TISTypeUnknown".to_string())),
                PropertyKey::Enabled => Some(PropertyValue::String("yes".to_string())),
                _ => None,
            }
        }

        fn select(&self, _source: &u8) -> OsStatus {
            self.status
        }

        fn deselect(&self, _source: &u8) -> OsStatus {
            self.status
        }

        fn enable(&self, _source: &u8) -> OsStatus {
            self.status
        }

        fn disable(&self, _source: &u8) -> OsStatus {
            self.status
        }

        fn register(&self, _location: &Path) -> OsStatus {
            self.status
        }

        fn set_keyboard_layout_override(&self, _source: Option<&u8>) -> OsStatus {
            self.status
        }

        fn copy_keyboard_layout_override(&self) -> Option<u8> {
            None
        }
    }

    fn hollow(status: OsStatus) -> TextInputSources<HollowPlatform> {
        TextInputSources::new(HollowPlatform { status })
    }

    #[test]
    fn test_unknown_status_is_surfaced() {
        let sources = hollow(-25_341);
        let source = sources.all().remove(0);
        for result in [
            sources.select(&source),
            sources.deselect(&source),
            sources.enable(&source),
            sources.disable(&source),
            sources.register_input_source(Path::new("/x.app")),
            sources.set_override_keyboard_layout(None),
        ] {
            assert!(matches!(result, Err(TisError::Unknown(-25_341))));
        }
    }

    #[test]
    fn test_success_status_for_every_mutation() {
        let sources = hollow(NO_ERR);
        let source = sources.all().remove(0);
        assert!(sources.select(&source).is_ok());
        assert!(sources.set_override_keyboard_layout(Some(&source)).is_ok());
    }

    #[test]
    fn test_optional_properties_are_absent_not_fatal() {
        let sources = hollow(NO_ERR);
        let source = sources.all().remove(0);
        assert_eq!(source.unicode_key_layout(), None);
        assert_eq!(source.icon_ref(), None);
        assert_eq!(source.icon_image_url(), None);
        assert_eq!(source.property(FilteringPropertyName::Id.property_key()), None);
    }

    #[test]
    #[should_panic(expected = "TISPropertyInputSourceID")]
    fn test_missing_required_property_panics() {
        let sources = hollow(NO_ERR);
        let source = sources.all().remove(0);
        let _ = source.id();
    }

    #[test]
    #[should_panic(expected = "TISPropertyInputSourceType")]
    fn test_unknown_kind_code_panics() {
        let sources = hollow(NO_ERR);
        let _ = sources.all().remove(0).kind();
    }

    #[test]
    #[should_panic(expected = "TISPropertyInputSourceIsEnabled")]
    fn test_wrongly_typed_flag_panics() {
        let sources = hollow(NO_ERR);
        let _ = sources.all().remove(0).is_enabled();
    }

    #[test]
    #[should_panic(expected = "нет активной сессии ввода")]
    fn test_missing_current_source_panics() {
        let _ = hollow(NO_ERR).current();
    }

    #[test]
    fn test_identity_equality() {
        let sources = hollow(NO_ERR);
        let all = sources.all();
        assert_ne!(all[0], all[1]);
        assert_eq!(all[0], all[0].clone());
    }
}
