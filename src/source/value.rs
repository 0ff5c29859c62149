use std::ffi::c_void;

/// Нормализованное значение свойства источника ввода.
///
/// Бэкенд платформы приводит нативное значение (CFBoolean, CFString,
/// CFArray, CFData, CFURL, IconRef) к одному из этих вариантов, сверяясь с
/// [`ValueKind`](crate::mappings::ValueKind) ключа. Значение неожиданного
/// нативного типа бэкенд обязан вернуть как отсутствующее.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    /// Строка или код из таблицы `Category`/`Kind`
    String(String),
    Strings(Vec<String>),
    /// Копия бинарного блоба; буфер платформы не удерживается
    Data(Vec<u8>),
    /// Абсолютная строка URL
    Url(String),
    Icon(IconRef),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_strings(self) -> Option<Vec<String>> {
        match self {
            PropertyValue::Strings(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<Vec<u8>> {
        match self {
            PropertyValue::Data(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            PropertyValue::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn as_icon(&self) -> Option<IconRef> {
        match self {
            PropertyValue::Icon(icon) => Some(*icon),
            _ => None,
        }
    }
}

/// Непрозрачная ссылка на иконку источника (Carbon IconRef).
///
/// Ссылка одолжена платформой: библиотека её не освобождает, и она
/// действительна, пока жив источник ввода, у которого её прочитали.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconRef(usize);

impl IconRef {
    pub fn from_raw(ptr: *const c_void) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self(ptr as usize))
        }
    }

    pub fn as_ptr(self) -> *const c_void {
        self.0 as *const c_void
    }
}
