/// kUCKeyLayoutHeaderFormat
pub const KEY_LAYOUT_HEADER_FORMAT: u16 = 0x1002;

/// Размер фиксированной части заголовка UCKeyboardLayout
const HEADER_LEN: usize = 12;

/// Копия таблицы раскладки `uchr` (UCKeyboardLayout).
///
/// Данные копируются из CFData платформы при чтении свойства, поэтому
/// время жизни не связано с источником ввода. Поля заголовка лежат в
/// нативном порядке байт.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeKeyLayout {
    bytes: Vec<u8>,
}

impl UnicodeKeyLayout {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn header_format(&self) -> Option<u16> {
        self.read_u16(0)
    }

    pub fn data_version(&self) -> Option<u16> {
        self.read_u16(2)
    }

    pub fn feature_info_offset(&self) -> Option<u32> {
        self.read_u32(4)
    }

    pub fn keyboard_type_count(&self) -> Option<u32> {
        self.read_u32(8)
    }

    pub fn is_well_formed(&self) -> bool {
        self.bytes.len() >= HEADER_LEN && self.header_format() == Some(KEY_LAYOUT_HEADER_FORMAT)
    }

    fn read_u16(&self, offset: usize) -> Option<u16> {
        let raw = self.bytes.get(offset..offset + 2)?;
        Some(u16::from_ne_bytes([raw[0], raw[1]]))
    }

    fn read_u32(&self, offset: usize) -> Option<u32> {
        let raw = self.bytes.get(offset..offset + 4)?;
        Some(u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }
}

/// Минимальный заголовок `uchr` без таблиц клавиш
pub(crate) fn synthetic_header(keyboard_type_count: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN);
    bytes.extend_from_slice(&KEY_LAYOUT_HEADER_FORMAT.to_ne_bytes());
    bytes.extend_from_slice(&0u16.to_ne_bytes());
    bytes.extend_from_slice(&0u32.to_ne_bytes());
    bytes.extend_from_slice(&keyboard_type_count.to_ne_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields() {
        let layout = UnicodeKeyLayout::from_bytes(synthetic_header(3));
        assert!(layout.is_well_formed());
        assert_eq!(layout.len(), HEADER_LEN);
        assert_eq!(layout.header_format(), Some(KEY_LAYOUT_HEADER_FORMAT));
        assert_eq!(layout.data_version(), Some(0));
        assert_eq!(layout.feature_info_offset(), Some(0));
        assert_eq!(layout.keyboard_type_count(), Some(3));
    }

    #[test]
    fn test_truncated_blob() {
        let layout = UnicodeKeyLayout::from_bytes(vec![0x02]);
        assert!(!layout.is_well_formed());
        assert_eq!(layout.header_format(), None);
        assert_eq!(layout.keyboard_type_count(), None);
    }

    #[test]
    fn test_wrong_format_is_not_well_formed() {
        let mut bytes = synthetic_header(1);
        bytes[0] ^= 0xff;
        assert!(!UnicodeKeyLayout::from_bytes(bytes).is_well_formed());
    }
}
