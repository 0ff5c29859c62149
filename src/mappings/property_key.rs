/// Тип значения, которое платформа хранит под ключом свойства
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Код из таблицы `Category`/`Kind` (CFString)
    Code,
    Bool,
    String,
    /// Массив строк (CFArray of CFString)
    Strings,
    /// Бинарный блоб (CFData)
    Data,
    Url,
    /// Непрозрачный IconRef, не CF-объект
    Icon,
}

code_table! {
    /// Все ключи свойств источника ввода, которые читает библиотека
    pub enum PropertyKey {
        Category = "category" => "TISPropertyInputSourceCategory",
        Kind = "kind" => "TISPropertyInputSourceType",
        AsciiCapable = "asciiCapable" => "TISPropertyInputSourceIsASCIICapable",
        EnableCapable = "enableCapable" => "TISPropertyInputSourceIsEnableCapable",
        SelectCapable = "selectCapable" => "TISPropertyInputSourceIsSelectCapable",
        Enabled = "enabled" => "TISPropertyInputSourceIsEnabled",
        Selected = "selected" => "TISPropertyInputSourceIsSelected",
        Id = "id" => "TISPropertyInputSourceID",
        BundleId = "bundleID" => "TISPropertyBundleID",
        InputModeId = "inputModeID" => "TISPropertyInputModeID",
        LocalizedName = "localizedName" => "TISPropertyLocalizedName",
        Languages = "languages" => "TISPropertyInputSourceLanguages",
        UnicodeKeyLayoutData = "unicodeKeyLayoutData" => "TISPropertyUnicodeKeyLayoutData",
        IconRef = "iconRef" => "TISPropertyIconRef",
        IconImageUrl = "iconImageURL" => "TISPropertyIconImageURL",
    }
}

impl PropertyKey {
    pub fn value_kind(self) -> ValueKind {
        match self {
            PropertyKey::Category | PropertyKey::Kind => ValueKind::Code,
            PropertyKey::AsciiCapable
            | PropertyKey::EnableCapable
            | PropertyKey::SelectCapable
            | PropertyKey::Enabled
            | PropertyKey::Selected => ValueKind::Bool,
            PropertyKey::Id
            | PropertyKey::BundleId
            | PropertyKey::InputModeId
            | PropertyKey::LocalizedName => ValueKind::String,
            PropertyKey::Languages => ValueKind::Strings,
            PropertyKey::UnicodeKeyLayoutData => ValueKind::Data,
            PropertyKey::IconRef => ValueKind::Icon,
            PropertyKey::IconImageUrl => ValueKind::Url,
        }
    }
}

code_table! {
    /// Свойства, по которым платформа умеет фильтровать перечисление
    pub enum FilteringPropertyName {
        Category = "category" => "TISPropertyInputSourceCategory",
        Kind = "kind" => "TISPropertyInputSourceType",
        AsciiCapability = "asciiCapability" => "TISPropertyInputSourceIsASCIICapable",
        EnableCapability = "enableCapability" => "TISPropertyInputSourceIsEnableCapable",
        SelectCapability = "selectCapability" => "TISPropertyInputSourceIsSelectCapable",
        Enabled = "enabled" => "TISPropertyInputSourceIsEnabled",
        Selected = "selected" => "TISPropertyInputSourceIsSelected",
        Id = "id" => "TISPropertyInputSourceID",
        BundleId = "bundleID" => "TISPropertyBundleID",
        InputModeId = "inputModeID" => "TISPropertyInputModeID",
        LocalizedName = "localizedName" => "TISPropertyLocalizedName",
    }
}

impl FilteringPropertyName {
    pub fn property_key(self) -> PropertyKey {
        match self {
            FilteringPropertyName::Category => PropertyKey::Category,
            FilteringPropertyName::Kind => PropertyKey::Kind,
            FilteringPropertyName::AsciiCapability => PropertyKey::AsciiCapable,
            FilteringPropertyName::EnableCapability => PropertyKey::EnableCapable,
            FilteringPropertyName::SelectCapability => PropertyKey::SelectCapable,
            FilteringPropertyName::Enabled => PropertyKey::Enabled,
            FilteringPropertyName::Selected => PropertyKey::Selected,
            FilteringPropertyName::Id => PropertyKey::Id,
            FilteringPropertyName::BundleId => PropertyKey::BundleId,
            FilteringPropertyName::InputModeId => PropertyKey::InputModeId,
            FilteringPropertyName::LocalizedName => PropertyKey::LocalizedName,
        }
    }

    pub fn value_kind(self) -> ValueKind {
        self.property_key().value_kind()
    }
}
