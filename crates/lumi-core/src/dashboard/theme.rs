use crate::error::StorageError;
use crate::storage::{Storage, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than a stored `"light"` means dark
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get(THEME_KEY).as_deref() {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Flip the theme and persist the new value
    pub fn toggle(&mut self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        *self = self.toggled();
        storage.set(THEME_KEY, self.as_str())
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "☀️ Light",
            Theme::Dark => "🌙 Dark",
        }
    }
}
