//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Keys recognized inside loaded JSON documents
pub mod document {
    /// Primary key holding an embedded configuration object
    pub const CONFIG_KEY: &str = "@copyloto";

    /// Alternate configuration key (checked when the primary one is missing)
    pub const CONFIG_KEY_ALT: &str = "copyloto_config";

    /// Array looked up when an embedded configuration names none
    pub const DEFAULT_ARRAY_PATH: &str = "items";

    /// Sentinel array path meaning "the document itself is the array"
    pub const ROOT_SENTINEL: &str = "__root__";

    /// Number of leading fields shown when no display fields are configured
    pub const FALLBACK_DISPLAY_FIELDS: usize = 3;
}

/// Color rule defaults
pub mod rules {
    /// Color used by rules that do not name one
    pub const DEFAULT_COLOR: &str = "#ff6b6b";
}

/// Input event constants (from evdev)
pub mod input {
    /// Key press event value
    pub const KEY_PRESS: i32 = 1;

    /// Key repeat event value
    pub const KEY_REPEAT: i32 = 2;
}

/// Filesystem paths
pub mod paths {
    /// Input device directory scanned for keyboards
    pub const DEV_INPUT: &str = "/dev/input";
}

/// Permission hints printed when keyboard devices are unreadable
pub mod permissions {
    /// Group granting read access to /dev/input
    pub const INPUT_GROUP: &str = "input";

    /// Command that adds the current user to the input group
    pub const ADD_TO_INPUT_GROUP: &str = "sudo usermod -aG input $USER";
}

/// Preferences file location
pub mod config {
    /// Directory under the user config dir
    pub const APP_DIR: &str = "copyloto";

    /// Preferences filename
    pub const FILENAME: &str = "preferences.json";
}

/// Validation ranges for display preferences
pub mod validation {
    pub const MIN_FONT_SIZE: u8 = 8;
    pub const MAX_FONT_SIZE: u8 = 48;
    pub const MIN_OPACITY_PERCENT: u8 = 20;
    pub const MAX_OPACITY_PERCENT: u8 = 100;
}
