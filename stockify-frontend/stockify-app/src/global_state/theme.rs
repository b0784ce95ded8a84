use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{AppResult, SystemError};

/// The visual theme mode of the application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(ThemeMode::System),
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            _ => Err(()),
        }
    }
}

/// The brand color palette used throughout the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePalette {
    #[default]
    Violet,
    Teal,
    Emerald,
    Amber,
    Rose,
    Sky,
}

impl ThemePalette {
    pub const ALL: [ThemePalette; 6] = [
        ThemePalette::Violet,
        ThemePalette::Teal,
        ThemePalette::Emerald,
        ThemePalette::Amber,
        ThemePalette::Rose,
        ThemePalette::Sky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePalette::Violet => "violet",
            ThemePalette::Teal => "teal",
            ThemePalette::Emerald => "emerald",
            ThemePalette::Amber => "amber",
            ThemePalette::Rose => "rose",
            ThemePalette::Sky => "sky",
        }
    }
}

impl FromStr for ThemePalette {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        ThemePalette::ALL
            .into_iter()
            .find(|palette| palette.as_str() == s)
            .ok_or(())
    }
}

/// What the OS reports through `prefers-color-scheme`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemPreference {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeChoice {
    pub mode: ThemeMode,
    pub palette: ThemePalette,
}

/// Attribute values for the document root: `data-theme`, `data-palette` and the
/// `theme-color` meta tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeAttributes {
    pub data_theme: &'static str,
    pub data_palette: &'static str,
    pub theme_color: &'static str,
}

/// Where the user's theme choice survives restarts.
pub trait ThemeStorage: Send + Sync {
    fn load(&self) -> Option<ThemeChoice>;
    fn save(&self, choice: ThemeChoice) -> AppResult<()>;
}

/// Stores the choice as a small JSON file.
pub struct FileThemeStorage {
    path: PathBuf,
}

impl FileThemeStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ThemeStorage for FileThemeStorage {
    fn load(&self) -> Option<ThemeChoice> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents)
            .map_err(|e| warn!("ignoring unreadable theme file {:?}: {e}", self.path))
            .ok()
    }

    fn save(&self, choice: ThemeChoice) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&choice)?)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryThemeStorage {
    saved: Mutex<Option<ThemeChoice>>,
}

impl MemoryThemeStorage {
    pub fn with_choice(choice: ThemeChoice) -> Self {
        Self {
            saved: Mutex::new(Some(choice)),
        }
    }
}

impl ThemeStorage for MemoryThemeStorage {
    fn load(&self) -> Option<ThemeChoice> {
        self.saved.lock().ok().and_then(|saved| *saved)
    }

    fn save(&self, choice: ThemeChoice) -> AppResult<()> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| SystemError::Message("theme storage lock poisoned".to_string()))?;
        *saved = Some(choice);
        Ok(())
    }
}

/// Global theme settings state.
/// - Created once at the application root and handed to whoever needs it
/// - Loads the persisted choice on start, persists only actual changes
/// - Broadcasts changes to subscribers
pub struct ThemeSettings {
    storage: Arc<dyn ThemeStorage>,
    prefers_dark: AtomicBool,
    choice: watch::Sender<ThemeChoice>,
}

impl ThemeSettings {
    pub fn new(storage: Arc<dyn ThemeStorage>, system: SystemPreference) -> Self {
        let initial = storage.load().unwrap_or_default();
        let (choice, _) = watch::channel(initial);
        let settings = ThemeSettings {
            storage,
            prefers_dark: AtomicBool::new(system == SystemPreference::Dark),
            choice,
        };
        debug!(
            "theme initialised => mode: {:?}, palette: {}",
            initial.mode,
            initial.palette.as_str()
        );
        settings
    }

    pub fn choice(&self) -> ThemeChoice {
        *self.choice.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeChoice> {
        self.choice.subscribe()
    }

    pub fn set_mode(&self, mode: ThemeMode) {
        self.update(|choice| choice.mode = mode);
    }

    pub fn set_palette(&self, palette: ThemePalette) {
        self.update(|choice| choice.palette = palette);
    }

    /// Records a change of the OS color scheme. Subscribers are only woken when the
    /// resolved theme actually follows the system.
    pub fn set_system_preference(&self, system: SystemPreference) {
        let prefers_dark = system == SystemPreference::Dark;
        let previous = self.prefers_dark.swap(prefers_dark, Ordering::SeqCst);
        if previous != prefers_dark {
            self.choice
                .send_if_modified(|choice| choice.mode == ThemeMode::System);
        }
    }

    /// Resolves `system` to light or dark and returns the document attributes.
    pub fn attributes(&self) -> ThemeAttributes {
        let choice = self.choice();
        let dark = match choice.mode {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::System => self.prefers_dark.load(Ordering::SeqCst),
        };
        ThemeAttributes {
            data_theme: if dark { "dark" } else { "light" },
            data_palette: choice.palette.as_str(),
            theme_color: if dark { "#0f0710" } else { "#f8fafc" },
        }
    }

    fn update(&self, change: impl FnOnce(&mut ThemeChoice)) {
        let mut next = self.choice();
        change(&mut next);
        if self.choice.send_if_modified(|current| {
            let modified = *current != next;
            *current = next;
            modified
        }) {
            self.persist(next);
        }
    }

    fn persist(&self, choice: ThemeChoice) {
        if let Err(e) = self.storage.save(choice) {
            warn!("failed to persist theme: {e}");
        }
    }
}
