//! Configuration loading and resolution.
//!
//! `tabwright.toml` (or an override path supplied by the binary) carries the
//! host-facing editor options: `tab_size`, `insert_spaces`, `ignore_tab_key`,
//! the auto-wrap trigger characters and the platform family that selects the
//! undo/redo chords. Unknown fields are ignored so the file can grow without
//! breaking older builds; a file that fails to parse falls back to defaults.
//!
//! `EditorConfig::resolve` turns the raw file into `EditSettings`, resolving
//! `family = "auto"` once from the build target so the engine never consults
//! global platform state afterwards.

use anyhow::{Context, Result};
use core_text::TabUnit;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "tabwright.toml";
pub const MAX_TAB_SIZE: usize = 16;

/// Platform family used to choose the primary modifier and redo chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    #[default]
    Auto,
    Windows,
    Mac,
    Other,
}

impl PlatformFamily {
    /// Family of the build target.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            PlatformFamily::Windows
        } else if cfg!(any(target_os = "macos", target_os = "ios")) {
            PlatformFamily::Mac
        } else {
            PlatformFamily::Other
        }
    }

    /// `Auto` becomes the detected family; concrete families pass through.
    pub fn resolve(self) -> Self {
        match self {
            PlatformFamily::Auto => Self::detect(),
            other => other,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditorSection {
    #[serde(default = "EditorSection::default_tab_size")]
    pub tab_size: usize,
    #[serde(default = "EditorSection::default_insert_spaces")]
    pub insert_spaces: bool,
    #[serde(default)]
    pub ignore_tab_key: bool,
    #[serde(default = "EditorSection::default_wrap_triggers")]
    pub wrap_triggers: Vec<char>,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            tab_size: Self::default_tab_size(),
            insert_spaces: Self::default_insert_spaces(),
            ignore_tab_key: false,
            wrap_triggers: Self::default_wrap_triggers(),
        }
    }
}

impl EditorSection {
    const fn default_tab_size() -> usize {
        2
    }
    const fn default_insert_spaces() -> bool {
        true
    }
    fn default_wrap_triggers() -> Vec<char> {
        vec!['(', '[', '\'', '`']
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlatformSection {
    #[serde(default)]
    pub family: PlatformFamily,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorSection,
    #[serde(default)]
    pub platform: PlatformSection,
}

#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Options the session consumes, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSettings {
    pub tab_unit: TabUnit,
    pub ignore_tab_key: bool,
    pub wrap_triggers: Vec<char>,
    pub platform: PlatformFamily,
}

impl EditSettings {
    /// Settings from the host-facing option triple with default triggers.
    pub fn new(tab_size: usize, insert_spaces: bool, ignore_tab_key: bool) -> Self {
        Self {
            tab_unit: TabUnit::from_options(tab_size, insert_spaces),
            ignore_tab_key,
            wrap_triggers: EditorSection::default_wrap_triggers(),
            platform: PlatformFamily::detect(),
        }
    }

    pub fn with_platform(mut self, platform: PlatformFamily) -> Self {
        self.platform = platform.resolve();
        self
    }

    pub fn with_wrap_triggers(mut self, triggers: impl IntoIterator<Item = char>) -> Self {
        self.wrap_triggers = triggers.into_iter().collect();
        self
    }

    pub fn is_wrap_trigger(&self, c: char) -> bool {
        self.wrap_triggers.contains(&c)
    }
}

impl Default for EditSettings {
    fn default() -> Self {
        EditorConfig::default().resolve()
    }
}

/// Config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("tabwright").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load configuration from `path` (or the discovered path).
///
/// A missing file yields defaults. A file that cannot be parsed logs a
/// warning and yields defaults. Other read failures are returned.
pub fn load_from(path: Option<PathBuf>) -> Result<EditorConfig> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(EditorConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(EditorConfig {
            raw: Some(content),
            file,
        }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(EditorConfig::default())
        }
    }
}

impl EditorConfig {
    /// Resolve into engine settings, clamping `tab_size` to `1..=MAX_TAB_SIZE`.
    pub fn resolve(&self) -> EditSettings {
        let editor = &self.file.editor;
        let raw = editor.tab_size;
        let tab_size = raw.clamp(1, MAX_TAB_SIZE);
        if tab_size != raw {
            info!(target: "config", raw, clamped = tab_size, max = MAX_TAB_SIZE, "tab_size_clamped");
        }
        let platform = self.file.platform.family.resolve();
        EditSettings {
            tab_unit: TabUnit::from_options(tab_size, editor.insert_spaces),
            ignore_tab_key: editor.ignore_tab_key,
            wrap_triggers: editor.wrap_triggers.clone(),
            platform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        let settings = cfg.resolve();
        assert_eq!(settings.tab_unit.as_str(), "  ");
        assert!(!settings.ignore_tab_key);
        assert_eq!(settings.wrap_triggers, vec!['(', '[', '\'', '`']);
        assert_ne!(settings.platform, PlatformFamily::Auto);
    }

    #[test]
    fn parses_editor_section() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[editor]\ntab_size = 4\ninsert_spaces = false\nignore_tab_key = true\nwrap_triggers = [\"\\\"\", \"*\"]\n[platform]\nfamily = \"windows\"\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.editor.tab_size, 4);
        let settings = cfg.resolve();
        assert_eq!(settings.tab_unit.as_str(), "\t");
        assert!(settings.ignore_tab_key);
        assert!(settings.is_wrap_trigger('"'));
        assert!(settings.is_wrap_trigger('*'));
        assert!(!settings.is_wrap_trigger('('));
        assert_eq!(settings.platform, PlatformFamily::Windows);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor]\ntab_size = 8\nfont = \"mono\"\n[theme]\nname = \"x\"\n")
            .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.resolve().tab_unit.len(), 8);
    }

    #[test]
    fn malformed_file_falls_back_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor\ntab_size = ").unwrap();
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let logs = capture_logs(|| {
            cfg = Some(load_from(Some(path)).unwrap());
        });
        let cfg = cfg.unwrap();
        assert_eq!(cfg.file.editor.tab_size, 2);
        assert!(logs.contains("WARN config:"));
        assert!(logs.contains("config_parse_failed_using_defaults"));
    }

    #[test]
    fn tab_size_clamp_logs_under_config_target() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor]\ntab_size = 0\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let mut settings = None;
        let logs = capture_logs(|| settings = Some(cfg.resolve()));
        assert_eq!(settings.unwrap().tab_unit.as_str(), " ");
        assert!(logs.contains("INFO config:"));
        assert!(logs.contains("tab_size_clamped"));
    }

    #[test]
    fn explicit_platform_survives_resolve() {
        let s = EditSettings::new(2, true, false).with_platform(PlatformFamily::Mac);
        assert_eq!(s.platform, PlatformFamily::Mac);
        let s = s.with_platform(PlatformFamily::Auto);
        assert_eq!(s.platform, PlatformFamily::detect());
    }
}
