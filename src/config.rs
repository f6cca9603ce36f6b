//! Application-level configuration constants.

// Slider ranges
pub const RPM_SLIDER_MAX: i32 = 10_000;
pub const CUT_SPEED_SLIDER_MAX: i32 = 1_000;

// UI text
pub const APP_TITLE: &str = "Cutting Speed";
