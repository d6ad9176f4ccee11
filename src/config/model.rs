// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Project configuration exactly as read from disk.
///
/// The same file also feeds the pattern-library generator, so unknown keys
/// are ignored. A minimal JSON file looks like:
///
/// ```json
/// {
///   "paths": {
///     "source": {
///       "root": "./source/", "patterns": "./source/_patterns/",
///       "data": "./source/_data/", "meta": "./source/_meta/",
///       "annotations": "./source/_annotations/",
///       "styleguide": "./node_modules/styleguidekit-assets-default/dist/",
///       "js": "./source/js", "images": "./source/images",
///       "fonts": "./source/fonts", "css": "./source/css/"
///     },
///     "public": {
///       "root": "./public/", "styleguide": "./public/styleguide/",
///       "js": "./public/js", "images": "./public/images",
///       "fonts": "./public/fonts", "css": "./public/css"
///     }
///   },
///   "cleanPublic": true
/// }
/// ```
///
/// Use [`ConfigFile`] (via `TryFrom`) everywhere outside the loader.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfigFile {
    pub paths: PathsSection,

    /// Passed to the generator's build as its "clean" flag.
    #[serde(default)]
    pub clean_public: bool,

    /// Runner-specific knobs; every key has a default.
    #[serde(default)]
    pub runner: RunnerSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    pub source: SourcePaths,
    pub public: PublicPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcePaths {
    pub root: String,
    pub patterns: String,
    pub data: String,
    pub meta: String,
    pub annotations: String,
    pub styleguide: String,
    pub js: String,
    pub images: String,
    pub fonts: String,
    pub css: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicPaths {
    pub root: String,
    pub styleguide: String,
    pub js: String,
    pub images: String,
    pub fonts: String,
    pub css: String,
}

/// `runner` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunnerSection {
    pub styles: StylesSection,
    pub sprite: SpriteSection,
    pub generator: GeneratorSection,
    pub server: ServerSection,
    pub watch: WatchSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StylesSection {
    /// Compiler command; extra elements are passed as leading arguments.
    pub compiler: Vec<String>,
    /// Entry glob, relative to `paths.source.css`.
    pub entries: String,
    /// Browserslist-style minimum versions, e.g. `"Safari >= 8"`.
    pub browsers: Vec<String>,
}

impl Default for StylesSection {
    fn default() -> Self {
        Self {
            compiler: vec!["sass".to_string()],
            entries: "scss/*.scss".to_string(),
            browsers: [
                "ie >= 9",
                "Firefox >= 40",
                "Chrome >= 43",
                "Opera >= 32",
                "Safari >= 8",
                "ChromeAndroid >= 44",
                "iOS >= 8.4",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpriteSection {
    /// Icon glob, relative to `paths.source.images`.
    pub source: String,
    /// Sprite sheet output, relative to `paths.source.css`.
    pub sprite: String,
    /// Generated SCSS partial, relative to `paths.source.css`.
    pub partial: String,
    pub padding: u32,
    pub class_prefix: String,
}

impl Default for SpriteSection {
    fn default() -> Self {
        Self {
            source: "sprite/*.svg".to_string(),
            sprite: "../images/sprite.svg".to_string(),
            partial: "../css/scss/02-generic/_sprite.scss".to_string(),
            padding: 1,
            class_prefix: "svg-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub command: Vec<String>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            command: vec!["patternlab".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Request targets that never get the live-reload snippet.
    pub snippet_blacklist: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            snippet_blacklist: vec!["/index.html".to_string(), "/".to_string(), "/?*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchSection {
    /// Quiet period after the last write before a reaction starts.
    pub await_write_finish_ms: u64,
    /// Template file extensions watched under `paths.source.patterns`.
    pub template_extensions: Vec<String>,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            await_write_finish_ms: 2000,
            template_extensions: vec![".mustache".to_string()],
        }
    }
}

/// Validated configuration.
///
/// Construct through `ConfigFile::try_from(raw)` (or
/// [`crate::config::load_and_validate`]); fields are read-only afterwards.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    paths: PathsSection,
    clean_public: bool,
    runner: RunnerSection,
    source_path: PathBuf,
}

impl ConfigFile {
    /// Build without validation. Used by `TryFrom` after checks have passed.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            paths: raw.paths,
            clean_public: raw.clean_public,
            runner: raw.runner,
            source_path: PathBuf::from("patternlab-config.json"),
        }
    }

    /// Remember which file this configuration came from; the generator is
    /// pointed at the same file.
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = path.into();
        self
    }

    pub fn paths(&self) -> &PathsSection {
        &self.paths
    }

    pub fn source(&self) -> &SourcePaths {
        &self.paths.source
    }

    pub fn public(&self) -> &PublicPaths {
        &self.paths.public
    }

    pub fn clean_public(&self) -> bool {
        self.clean_public
    }

    pub fn runner(&self) -> &RunnerSection {
        &self.runner
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}
