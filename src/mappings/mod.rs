//! Закрытые словари TIS и их двусторонние таблицы кодов.
//!
//! Каждый словарь объявляется один раз через `code_table!`: прямое
//! отображение (вариант -> код) - исчерпывающий `match`, обратное
//! (код -> вариант) строится лениво и проверяется на уникальность кодов
//! при первом обращении.

use std::collections::HashMap;

macro_rules! code_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal => $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Все варианты в порядке объявления
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Строковый код платформы (значение соответствующей константы TIS)
            pub const fn code(self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Человекочитаемое имя варианта
            pub const fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            /// Обратная трансляция: неизвестный код даёт `None`
            pub fn from_code(code: &str) -> Option<Self> {
                static CODE_TO_CASE: ::once_cell::sync::Lazy<::std::collections::HashMap<&'static str, $name>> =
                    ::once_cell::sync::Lazy::new(|| {
                        $crate::mappings::build_reverse_table(stringify!($name), $name::ALL, $name::code)
                    });
                CODE_TO_CASE.get(code).copied()
            }

            pub fn from_label(label: &str) -> Option<Self> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|case| case.label().eq_ignore_ascii_case(label))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::TisError;

            /// Принимает как имя варианта, так и код платформы
            fn from_str(value: &str) -> ::std::result::Result<Self, Self::Err> {
                $name::from_label(value)
                    .or_else(|| $name::from_code(value))
                    .ok_or_else(|| $crate::error::TisError::UnknownCode {
                        table: stringify!($name),
                        value: value.to_string(),
                    })
            }
        }
    };
}

mod property_key;
mod source_kind;

pub use property_key::{FilteringPropertyName, PropertyKey, ValueKind};
pub use source_kind::{Category, Kind};

/// Строит обратную таблицу код -> вариант.
///
/// # Panics
///
/// Если два варианта делят один код: такая таблица не биективна и
/// собрана с ошибкой.
pub(crate) fn build_reverse_table<T: Copy>(
    table: &'static str,
    cases: &[T],
    code: fn(T) -> &'static str,
) -> HashMap<&'static str, T> {
    let reverse: HashMap<&'static str, T> = cases.iter().map(|&case| (code(case), case)).collect();
    assert_eq!(
        reverse.len(),
        cases.len(),
        "Таблица {} содержит повторяющиеся коды платформы",
        table
    );
    reverse
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "повторяющиеся коды")]
    fn test_duplicate_codes_are_rejected() {
        fn code(case: u8) -> &'static str {
            if case == 0 { "A" } else { "B" }
        }
        build_reverse_table("Test", &[0u8, 1, 2], code);
    }

    #[test]
    fn test_reverse_table_is_complete() {
        fn code(case: u8) -> &'static str {
            ["A", "B", "C"][case as usize]
        }
        let reverse = build_reverse_table("Test", &[0u8, 1, 2], code);
        assert_eq!(reverse.len(), 3);
        assert_eq!(reverse.get("C"), Some(&2));
    }
}
