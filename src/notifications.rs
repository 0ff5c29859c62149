//! Имена распределённых уведомлений службы источников ввода.
//!
//! Библиотека только называет их: подписка и доставка идут через
//! `NSDistributedNotificationCenter`/`CFNotificationCenter` самой платформы.

/// kTISNotifySelectedKeyboardInputSourceChanged
pub const SELECTED_KEYBOARD_INPUT_SOURCE_CHANGED: &str = "TISNotifySelectedKeyboardInputSourceChanged";

/// kTISNotifyEnabledKeyboardInputSourcesChanged
pub const ENABLED_KEYBOARD_INPUT_SOURCES_CHANGED: &str = "TISNotifyEnabledKeyboardInputSourcesChanged";

pub const ALL: [&str; 2] = [
    SELECTED_KEYBOARD_INPUT_SOURCE_CHANGED,
    ENABLED_KEYBOARD_INPUT_SOURCES_CHANGED,
];
