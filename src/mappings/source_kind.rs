use serde::{Deserialize, Serialize};

code_table! {
    /// Категория источника ввода (kTISPropertyInputSourceCategory)
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Category {
        Keyboard = "keyboard" => "TISCategoryKeyboardInputSource",
        Palette = "palette" => "TISCategoryPaletteInputSource",
        Ink = "ink" => "TISCategoryInkInputSource",
    }
}

code_table! {
    /// Тип источника ввода внутри категории (kTISPropertyInputSourceType)
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Kind {
        KeyboardLayout = "keyboardLayout" => "TISTypeKeyboardLayout",
        KeyboardInputMethodWithoutModes = "keyboardInputMethodWithoutModes" => "TISTypeKeyboardInputMethodWithoutModes",
        KeyboardInputMethodModeEnabled = "keyboardInputMethodModeEnabled" => "TISTypeKeyboardInputMethodModeEnabled",
        KeyboardInputMode = "keyboardInputMode" => "TISTypeKeyboardInputMode",
        CharacterPalette = "characterPalette" => "TISTypeCharacterPalette",
        KeyboardViewer = "keyboardViewer" => "TISTypeKeyboardViewer",
        Ink = "ink" => "TISTypeInk",
    }
}

impl Category {
    /// Фиксированное разбиение типов по категориям
    pub fn kinds(self) -> &'static [Kind] {
        match self {
            Category::Keyboard => &[
                Kind::KeyboardLayout,
                Kind::KeyboardInputMethodWithoutModes,
                Kind::KeyboardInputMethodModeEnabled,
                Kind::KeyboardInputMode,
            ],
            Category::Palette => &[Kind::CharacterPalette, Kind::KeyboardViewer],
            Category::Ink => &[Kind::Ink],
        }
    }
}

impl Kind {
    pub fn category(self) -> Category {
        match self {
            Kind::KeyboardLayout
            | Kind::KeyboardInputMethodWithoutModes
            | Kind::KeyboardInputMethodModeEnabled
            | Kind::KeyboardInputMode => Category::Keyboard,
            Kind::CharacterPalette | Kind::KeyboardViewer => Category::Palette,
            Kind::Ink => Category::Ink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_category_code_roundtrip() {
        for &category in Category::ALL {
            assert_eq!(Category::from_code(category.code()), Some(category));
        }
        assert_eq!(Category::from_code("TISCategoryUnknown"), None);
    }

    #[test]
    fn test_kind_code_roundtrip() {
        for &kind in Kind::ALL {
            assert_eq!(Kind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(Kind::from_code(""), None);
        assert_eq!(Kind::from_code("tistypeink"), None);
    }

    #[test]
    fn test_partition_covers_every_kind_once() {
        let mut seen = HashSet::new();
        for &category in Category::ALL {
            for &kind in category.kinds() {
                assert_eq!(kind.category(), category);
                assert!(seen.insert(kind), "тип {} встречается дважды", kind);
            }
        }
        assert_eq!(seen.len(), Kind::ALL.len());
    }

    #[test]
    fn test_from_str_accepts_label_and_code() {
        assert_eq!("palette".parse::<Category>().unwrap(), Category::Palette);
        assert_eq!("Keyboard".parse::<Category>().unwrap(), Category::Keyboard);
        assert_eq!(
            "TISTypeKeyboardInputMode".parse::<Kind>().unwrap(),
            Kind::KeyboardInputMode
        );
        assert!("handwriting".parse::<Kind>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Kind::KeyboardInputMethodModeEnabled).unwrap();
        assert_eq!(json, "\"keyboardInputMethodModeEnabled\"");

        let category: Category = serde_json::from_str("\"ink\"").unwrap();
        assert_eq!(category, Category::Ink);
    }
}
