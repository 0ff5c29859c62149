//! Бэкенд Carbon: прямые вызовы Text Input Sources Services (HIToolbox).
//!
//! Дисциплина владения:
//! - `TISCreate*List` отдаёт список во владение вызывающему: каждый элемент
//!   удерживается отдельно, список освобождается один раз;
//! - `TISCopy*` отдаёт один источник во владение: `TISInputSource::adopt`;
//! - `TISGetInputSourceProperty` только одалживает значение: оно
//!   оборачивается по get rule и никогда не освобождается нами.

use core_foundation::array::{CFArray, CFArrayRef};
use core_foundation::base::{Boolean, CFType, CFTypeID, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::data::CFData;
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::string::{CFString, CFStringRef};
use core_foundation::url::{CFURLRef, CFURL};
use core_foundation::{declare_TCFType, impl_CFTypeDescription, impl_TCFType};
use std::ffi::c_void;
use std::path::Path;
use std::ptr;
use tracing::{debug, trace};

use crate::error::{OsStatus, PARAM_ERR};
use crate::filter::{RawFilter, RawFilterValue};
use crate::mappings::{PropertyKey, ValueKind};
use crate::source::{IconRef, PropertyValue};

use super::r#trait::{CurrentVariant, Platform};

#[repr(C)]
pub struct __TISInputSource(c_void);

pub type TISInputSourceRef = *const __TISInputSource;

#[link(name = "Carbon", kind = "framework")]
extern "C" {
    static kTISPropertyInputSourceCategory: CFStringRef;
    static kTISPropertyInputSourceType: CFStringRef;
    static kTISPropertyInputSourceIsASCIICapable: CFStringRef;
    static kTISPropertyInputSourceIsEnableCapable: CFStringRef;
    static kTISPropertyInputSourceIsSelectCapable: CFStringRef;
    static kTISPropertyInputSourceIsEnabled: CFStringRef;
    static kTISPropertyInputSourceIsSelected: CFStringRef;
    static kTISPropertyInputSourceID: CFStringRef;
    static kTISPropertyBundleID: CFStringRef;
    static kTISPropertyInputModeID: CFStringRef;
    static kTISPropertyLocalizedName: CFStringRef;
    static kTISPropertyInputSourceLanguages: CFStringRef;
    static kTISPropertyUnicodeKeyLayoutData: CFStringRef;
    static kTISPropertyIconRef: CFStringRef;
    static kTISPropertyIconImageURL: CFStringRef;

    fn TISInputSourceGetTypeID() -> CFTypeID;

    fn TISCreateInputSourceList(properties: CFDictionaryRef, include_all_installed: Boolean) -> CFArrayRef;
    fn TISCreateASCIICapableInputSourceList() -> CFArrayRef;

    fn TISCopyCurrentKeyboardInputSource() -> TISInputSourceRef;
    fn TISCopyCurrentKeyboardLayoutInputSource() -> TISInputSourceRef;
    fn TISCopyCurrentASCIICapableKeyboardInputSource() -> TISInputSourceRef;
    fn TISCopyCurrentASCIICapableKeyboardLayoutInputSource() -> TISInputSourceRef;
    fn TISCopyInputSourceForLanguage(language: CFStringRef) -> TISInputSourceRef;
    fn TISCopyInputMethodKeyboardLayoutOverride() -> TISInputSourceRef;

    fn TISGetInputSourceProperty(source: TISInputSourceRef, key: CFStringRef) -> *mut c_void;

    fn TISSelectInputSource(source: TISInputSourceRef) -> OsStatus;
    fn TISDeselectInputSource(source: TISInputSourceRef) -> OsStatus;
    fn TISEnableInputSource(source: TISInputSourceRef) -> OsStatus;
    fn TISDisableInputSource(source: TISInputSourceRef) -> OsStatus;
    fn TISRegisterInputSource(location: CFURLRef) -> OsStatus;
    fn TISSetInputMethodKeyboardLayoutOverride(keyboard_layout: TISInputSourceRef) -> OsStatus;
}

declare_TCFType!(TISInputSource, TISInputSourceRef);
impl_TCFType!(TISInputSource, TISInputSourceRef, TISInputSourceGetTypeID);
impl_CFTypeDescription!(TISInputSource);

impl TISInputSource {
    /// Принять ссылку, которой вызывающий уже владеет (`TISCopy*`).
    /// Освобождается при drop.
    ///
    /// # Safety
    ///
    /// `ptr` - null или валидный TISInputSourceRef с +1 к счётчику ссылок.
    pub unsafe fn adopt(ptr: TISInputSourceRef) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self::wrap_under_create_rule(ptr))
        }
    }

    /// Удержать ссылку, одолженную платформой (элемент чужого списка).
    ///
    /// # Safety
    ///
    /// `ptr` - null или валидный TISInputSourceRef, живой на время вызова.
    pub unsafe fn retain_borrowed(ptr: TISInputSourceRef) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self::wrap_under_get_rule(ptr))
        }
    }
}

/// Список из `TISCreate*List`: элементы удерживаются, список освобождается
/// при выходе из функции (drop `CFArray`).
unsafe fn adopt_list(list: CFArrayRef) -> Vec<TISInputSource> {
    if list.is_null() {
        return Vec::new();
    }
    let list: CFArray<*const c_void> = CFArray::wrap_under_create_rule(list);
    list.iter()
        .filter_map(|item| TISInputSource::retain_borrowed(*item as TISInputSourceRef))
        .collect()
}

fn property_key_ref(key: PropertyKey) -> CFStringRef {
    unsafe {
        match key {
            PropertyKey::Category => kTISPropertyInputSourceCategory,
            PropertyKey::Kind => kTISPropertyInputSourceType,
            PropertyKey::AsciiCapable => kTISPropertyInputSourceIsASCIICapable,
            PropertyKey::EnableCapable => kTISPropertyInputSourceIsEnableCapable,
            PropertyKey::SelectCapable => kTISPropertyInputSourceIsSelectCapable,
            PropertyKey::Enabled => kTISPropertyInputSourceIsEnabled,
            PropertyKey::Selected => kTISPropertyInputSourceIsSelected,
            PropertyKey::Id => kTISPropertyInputSourceID,
            PropertyKey::BundleId => kTISPropertyBundleID,
            PropertyKey::InputModeId => kTISPropertyInputModeID,
            PropertyKey::LocalizedName => kTISPropertyLocalizedName,
            PropertyKey::Languages => kTISPropertyInputSourceLanguages,
            PropertyKey::UnicodeKeyLayoutData => kTISPropertyUnicodeKeyLayoutData,
            PropertyKey::IconRef => kTISPropertyIconRef,
            PropertyKey::IconImageUrl => kTISPropertyIconImageURL,
        }
    }
}

fn filter_dictionary(filter: &RawFilter) -> CFDictionary<CFString, CFType> {
    let pairs: Vec<(CFString, CFType)> = filter
        .entries()
        .iter()
        .map(|(name, value)| {
            // Ключи - статические константы фреймворка, их не освобождаем
            let key = unsafe { CFString::wrap_under_get_rule(property_key_ref(name.property_key())) };
            let value = match value {
                RawFilterValue::Code(code) => CFString::new(code).as_CFType(),
                RawFilterValue::Bool(flag) => CFBoolean::from(*flag).as_CFType(),
                RawFilterValue::String(text) => CFString::new(text).as_CFType(),
            };
            (key, value)
        })
        .collect();
    CFDictionary::from_CFType_pairs(&pairs)
}

fn normalize(value: CFType, kind: ValueKind) -> Option<PropertyValue> {
    match kind {
        ValueKind::Bool => value
            .downcast::<CFBoolean>()
            .map(|flag| PropertyValue::Bool(flag.into())),
        ValueKind::Code | ValueKind::String => value
            .downcast::<CFString>()
            .map(|text| PropertyValue::String(text.to_string())),
        ValueKind::Strings => value.downcast::<CFArray>().map(|array| {
            let strings = array
                .iter()
                .filter_map(|item| unsafe { CFType::wrap_under_get_rule(*item as CFTypeRef) }.downcast::<CFString>())
                .map(|text| text.to_string())
                .collect();
            PropertyValue::Strings(strings)
        }),
        ValueKind::Data => value
            .downcast::<CFData>()
            .map(|data| PropertyValue::Data(data.bytes().to_vec())),
        ValueKind::Url => value
            .downcast::<CFURL>()
            .map(|url| PropertyValue::Url(url.get_string().to_string())),
        ValueKind::Icon => None,
    }
}

/// Настоящая служба источников ввода macOS
#[derive(Debug, Default, Clone, Copy)]
pub struct CarbonPlatform;

impl CarbonPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for CarbonPlatform {
    type Source = TISInputSource;

    fn name(&self) -> &'static str {
        "carbon"
    }

    fn enumerate(&self, filter: Option<&RawFilter>, include_all_installed: bool) -> Vec<TISInputSource> {
        let dictionary = filter.map(filter_dictionary);
        let properties = dictionary
            .as_ref()
            .map_or(ptr::null(), |dictionary| dictionary.as_concrete_TypeRef());
        trace!("TISCreateInputSourceList(filter: {}, all: {})", !properties.is_null(), include_all_installed);
        unsafe { adopt_list(TISCreateInputSourceList(properties, include_all_installed as Boolean)) }
    }

    fn copy_current(&self, variant: CurrentVariant) -> Option<TISInputSource> {
        unsafe {
            let raw = match variant {
                CurrentVariant::Any => TISCopyCurrentKeyboardInputSource(),
                CurrentVariant::Layout => TISCopyCurrentKeyboardLayoutInputSource(),
                CurrentVariant::AsciiCapable => TISCopyCurrentASCIICapableKeyboardInputSource(),
                CurrentVariant::AsciiCapableLayout => TISCopyCurrentASCIICapableKeyboardLayoutInputSource(),
            };
            TISInputSource::adopt(raw)
        }
    }

    fn copy_for_language(&self, language: &str) -> Option<TISInputSource> {
        let language = CFString::new(language);
        unsafe { TISInputSource::adopt(TISCopyInputSourceForLanguage(language.as_concrete_TypeRef())) }
    }

    fn ascii_capable_list(&self) -> Vec<TISInputSource> {
        unsafe { adopt_list(TISCreateASCIICapableInputSourceList()) }
    }

    fn property(&self, source: &TISInputSource, key: PropertyKey) -> Option<PropertyValue> {
        let raw = unsafe { TISGetInputSourceProperty(source.as_concrete_TypeRef(), property_key_ref(key)) };
        if raw.is_null() {
            return None;
        }

        // IconRef - не CF-объект, отдаём как непрозрачный указатель
        if key.value_kind() == ValueKind::Icon {
            return IconRef::from_raw(raw as *const c_void).map(PropertyValue::Icon);
        }

        // Get rule: значение одолжено источником
        let value = unsafe { CFType::wrap_under_get_rule(raw as CFTypeRef) };
        let normalized = normalize(value, key.value_kind());
        if normalized.is_none() {
            debug!("Свойство {} имеет неожиданный тип", key.code());
        }
        normalized
    }

    fn select(&self, source: &TISInputSource) -> OsStatus {
        unsafe { TISSelectInputSource(source.as_concrete_TypeRef()) }
    }

    fn deselect(&self, source: &TISInputSource) -> OsStatus {
        unsafe { TISDeselectInputSource(source.as_concrete_TypeRef()) }
    }

    fn enable(&self, source: &TISInputSource) -> OsStatus {
        unsafe { TISEnableInputSource(source.as_concrete_TypeRef()) }
    }

    fn disable(&self, source: &TISInputSource) -> OsStatus {
        unsafe { TISDisableInputSource(source.as_concrete_TypeRef()) }
    }

    fn register(&self, location: &Path) -> OsStatus {
        match CFURL::from_path(location, true) {
            Some(url) => unsafe { TISRegisterInputSource(url.as_concrete_TypeRef()) },
            None => {
                debug!("Путь {} не переводится в CFURL", location.display());
                PARAM_ERR
            }
        }
    }

    fn set_keyboard_layout_override(&self, source: Option<&TISInputSource>) -> OsStatus {
        let raw = source.map_or(ptr::null(), |source| source.as_concrete_TypeRef());
        unsafe { TISSetInputMethodKeyboardLayoutOverride(raw) }
    }

    fn copy_keyboard_layout_override(&self) -> Option<TISInputSource> {
        unsafe { TISInputSource::adopt(TISCopyInputMethodKeyboardLayoutOverride()) }
    }
}
