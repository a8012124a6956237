// Theme Controller Service
// Owns the appearance mode, applies it to the document root, and keeps
// the persisted slot in sync. Every mutation lands on the root
// synchronously; sibling UI (the switch icon, the floating options
// panel) reads the new state in the same tick.

use std::sync::Arc;

use serde::Serialize;

use crate::models::{ColorScheme, DocumentRoot, ThemeMode};
use crate::services::events::{emit_event, EventSink};
use crate::services::preference_store::{PreferenceStore, THEME_STORAGE_KEY};

/// Attribute carrying the resolved scheme, next to the class token.
/// Dual signaling so stylesheets and tests can select on either.
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThemeChanged<'a> {
    mode: &'a str,
    scheme: &'a str,
}

pub struct ThemeController {
    store: Arc<dyn PreferenceStore>,
    events: Arc<dyn EventSink>,
    system_scheme: ColorScheme,
    mode: ThemeMode,
}

impl ThemeController {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        events: Arc<dyn EventSink>,
        system_scheme: ColorScheme,
    ) -> Self {
        Self {
            store,
            events,
            system_scheme,
            mode: ThemeMode::Auto,
        }
    }

    /// Runs once per page load, before first paint. Reads the persisted
    /// preference, falls back to `auto` when the slot is absent or holds
    /// an unknown token, and applies the resolved scheme to the root.
    pub fn initialize(&mut self, root: &mut DocumentRoot) {
        self.mode = match self.store.get(THEME_STORAGE_KEY) {
            Some(raw) => match ThemeMode::parse(&raw) {
                Some(mode) => mode,
                None => {
                    log::warn!("Ignoring invalid stored theme '{raw}', resetting to auto");
                    self.persist(ThemeMode::Auto);
                    ThemeMode::Auto
                }
            },
            None => ThemeMode::Auto,
        };

        self.apply(root);
        log::debug!(
            "Theme initialized: mode={}, effective={}",
            self.mode.as_str(),
            self.effective_scheme().as_str()
        );
    }

    /// Advances the fixed cycle and returns the new mode. The document
    /// mutates before this returns; persistence failures degrade to
    /// session-only state.
    pub fn toggle(&mut self, root: &mut DocumentRoot) -> ThemeMode {
        let next = self.mode.next();
        self.set_mode(next, root);
        next
    }

    /// Direct selection, used by the floating options panel's
    /// Light / Dark / System buttons.
    pub fn set_mode(&mut self, mode: ThemeMode, root: &mut DocumentRoot) {
        self.mode = mode;
        self.apply(root);
        self.persist(mode);

        let scheme = self.effective_scheme();
        emit_event(
            self.events.as_ref(),
            "theme_changed",
            &ThemeChanged {
                mode: mode.as_str(),
                scheme: scheme.as_str(),
            },
        );
    }

    /// Re-resolves an `auto` preference when the system scheme flips
    /// (the `prefers-color-scheme` listener). Explicit modes are
    /// unaffected beyond remembering the new system value.
    pub fn system_scheme_changed(&mut self, scheme: ColorScheme, root: &mut DocumentRoot) {
        self.system_scheme = scheme;
        if self.mode == ThemeMode::Auto {
            self.apply(root);
        }
    }

    /// Writes the resolved scheme to the root as a class token and the
    /// `data-theme` attribute. Idempotent: re-applying the same mode
    /// leaves the root byte-for-byte identical.
    pub fn apply(&self, root: &mut DocumentRoot) {
        let scheme = self.effective_scheme();
        root.remove_class(scheme.opposite().as_str());
        root.add_class(scheme.as_str());
        root.set_attribute(THEME_ATTRIBUTE, scheme.as_str());
    }

    /// The symbolic preference, `auto` included.
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// The concrete scheme in effect, never `auto`. For consumers that
    /// need a real value, like chart palettes.
    pub fn effective_scheme(&self) -> ColorScheme {
        self.mode.resolve(self.system_scheme)
    }

    fn persist(&self, mode: ThemeMode) {
        if let Err(e) = self.store.set(THEME_STORAGE_KEY, mode.as_str()) {
            log::warn!("Failed to persist theme preference, keeping in-memory only: {e}");
        }
    }
}
