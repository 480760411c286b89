//! Theme table
//!
//! Inert data: the core only validates theme ids against this list.
//! Colours are carried for front ends that want to show them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub label: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

pub const THEMES: &[Theme] = &[
    Theme { id: "default", label: "Default", primary: "#5ec00c", secondary: "#FF3376" },
    Theme { id: "1", label: "Special Week", primary: "#EE6DCB", secondary: "#FFDEF9" },
    Theme { id: "2", label: "Silence Suzuka", primary: "#29BD70", secondary: "#FFCE48" },
    Theme { id: "3", label: "Tokai Teio", primary: "#3376D2", secondary: "#FFCD00" },
    Theme { id: "4", label: "Maruzensky", primary: "#EA504A", secondary: "#FFCD00" },
    Theme { id: "5", label: "Fuji Kiseki", primary: "#444745", secondary: "#33B839" },
    Theme { id: "6", label: "Oguri Cap", primary: "#3A7AD2", secondary: "#ECE7E7" },
    Theme { id: "7", label: "Grass Wonder", primary: "#3A34AC", secondary: "#E3493F" },
    Theme { id: "8", label: "Agnes Tachyon", primary: "#35B2B6", secondary: "#E2E868" },
];

/// Theme ids accepted by the `theme` field, in table order
pub const THEME_IDS: &[&str] = &["default", "1", "2", "3", "4", "5", "6", "7", "8"];
