use thiserror::Error;

use crate::mappings::FilteringPropertyName;

/// Код статуса Carbon (OSStatus)
pub type OsStatus = i32;

/// noErr
pub const NO_ERR: OsStatus = 0;

/// paramErr: платформа отвергла аргумент вызова
pub const PARAM_ERR: OsStatus = -50;

#[derive(Error, Debug)]
pub enum TisError {
    #[error("Не удалось выбрать источник ввода")]
    CannotSelect,

    #[error("Не удалось снять выбор с источника ввода")]
    CannotDeselect,

    #[error("Не удалось включить источник ввода")]
    CannotEnable,

    #[error("Не удалось отключить источник ввода")]
    CannotDisable,

    #[error("Не удалось зарегистрировать источник ввода")]
    CannotRegister,

    #[error("Не удалось переопределить раскладку клавиатуры")]
    CannotOverrideKeyboardLayout,

    #[error("Неизвестный статус платформы: {0}")]
    Unknown(OsStatus),

    #[error("Значение {value} не подходит для свойства {property}")]
    InvalidFilterValue {
        property: FilteringPropertyName,
        value: String,
    },

    #[error("Неизвестное значение {value:?} для {table}")]
    UnknownCode { table: &'static str, value: String },

    #[error("Некорректный языковой тег: {0:?}")]
    InvalidLanguageTag(String),

    #[error("Источник ввода не найден: {0}")]
    SourceNotFound(String),

    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),
}

impl TisError {
    /// Трансляция статуса мутирующего вызова.
    ///
    /// `noErr` - успех, `paramErr` - ошибка конкретной операции
    /// (`on_param_err`), всё остальное - `Unknown` с исходным кодом.
    pub fn check_status(status: OsStatus, on_param_err: TisError) -> Result<()> {
        match status {
            NO_ERR => Ok(()),
            PARAM_ERR => Err(on_param_err),
            other => Err(TisError::Unknown(other)),
        }
    }

    /// Сырой статус платформы, если ошибка пришла из мутирующего вызова
    pub fn status(&self) -> Option<OsStatus> {
        match self {
            TisError::CannotSelect
            | TisError::CannotDeselect
            | TisError::CannotEnable
            | TisError::CannotDisable
            | TisError::CannotRegister
            | TisError::CannotOverrideKeyboardLayout => Some(PARAM_ERR),
            TisError::Unknown(status) => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TisError>;
