//! 端末区分の判定（起動時に一度だけ）

use question_reader_common::DeviceClass;

/// navigator.userAgent から判定。取れなければデスクトップ扱い
pub fn detect_device_class() -> DeviceClass {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .map(|ua| DeviceClass::from_user_agent(&ua))
        .unwrap_or_default()
}
