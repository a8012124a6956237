// Viewport Service
// Breakpoint policy shared by the search overlay and navigation chrome.
// A single width threshold partitions desktop (inline search bar, full
// navigation) from compact (togglable panel, togglable navigation).

use serde::Serialize;

/// Widths at or above this render desktop chrome. 1024 matches the
/// stylesheet's `lg` breakpoint; an iPad Pro in portrait lands exactly
/// on it and gets the desktop treatment.
pub const DESKTOP_BREAKPOINT_PX: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayClass {
    Desktop,
    Compact,
}

impl DisplayClass {
    pub fn from_width(width_px: u32) -> DisplayClass {
        if width_px >= DESKTOP_BREAKPOINT_PX {
            DisplayClass::Desktop
        } else {
            DisplayClass::Compact
        }
    }

    pub fn is_desktop(&self) -> bool {
        matches!(self, DisplayClass::Desktop)
    }
}

// How the search panel presents right now. Derived on demand, never
// persisted; navigation resets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelVisibility {
    Hidden,
    OpenInline,
    OpenOverlay,
}

/// Presentation policy as a total function, so it can be unit tested
/// without rendering anything. Desktop shows inline results whenever
/// there is an active query; the explicit toggle only exists on compact
/// viewports, where the panel never opens on its own.
pub fn panel_visibility(
    class: DisplayClass,
    toggled_open: bool,
    has_active_query: bool,
) -> PanelVisibility {
    match class {
        DisplayClass::Desktop => {
            if has_active_query {
                PanelVisibility::OpenInline
            } else {
                PanelVisibility::Hidden
            }
        }
        DisplayClass::Compact => {
            if toggled_open {
                PanelVisibility::OpenOverlay
            } else {
                PanelVisibility::Hidden
            }
        }
    }
}
