#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use labrun::config::{
    ConfigFile, PathsSection, PublicPaths, RawConfigFile, RunnerSection, SourcePaths,
};
use labrun::fs::RealFileSystem;
use labrun::tasks::TaskContext;

use crate::fakes::{FakeGenerator, FakeStyleCompiler};

/// Builder for `ConfigFile` with the conventional Pattern Lab layout
/// (`./source/...`, `./public/...`) relative to the working directory.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                paths: PathsSection {
                    source: SourcePaths {
                        root: "./source/".to_string(),
                        patterns: "./source/_patterns/".to_string(),
                        data: "./source/_data/".to_string(),
                        meta: "./source/_meta/".to_string(),
                        annotations: "./source/_annotations/".to_string(),
                        styleguide: "./styleguide/dist/".to_string(),
                        js: "./source/js".to_string(),
                        images: "./source/images".to_string(),
                        fonts: "./source/fonts".to_string(),
                        css: "./source/css/".to_string(),
                    },
                    public: PublicPaths {
                        root: "./public/".to_string(),
                        styleguide: "./public/styleguide/".to_string(),
                        js: "./public/js".to_string(),
                        images: "./public/images".to_string(),
                        fonts: "./public/fonts".to_string(),
                        css: "./public/css".to_string(),
                    },
                },
                clean_public: false,
                runner: RunnerSection::default(),
            },
        }
    }

    pub fn clean_public(mut self, val: bool) -> Self {
        self.config.clean_public = val;
        self
    }

    pub fn settle_ms(mut self, ms: u64) -> Self {
        self.config.runner.watch.await_write_finish_ms = ms;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.runner.server.port = port;
        self
    }

    pub fn browsers(mut self, queries: &[&str]) -> Self {
        self.config.runner.styles.browsers = queries.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn generator_command(mut self, command: &[&str]) -> Self {
        self.config.runner.generator.command = command.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A throwaway project directory on the real filesystem.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Empty project with the source directories the copy tasks expect.
    pub fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        };
        for dir in [
            "source/_patterns",
            "source/_data",
            "source/_meta",
            "source/_annotations",
            "source/js",
            "source/images",
            "source/fonts",
            "source/css/scss",
            "styleguide/dist",
            "public",
        ] {
            fixture.mkdir(dir);
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.path(rel)).expect("create fixture dir");
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parent");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("read fixture file")
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// Context over the real filesystem with fake generator and compiler.
    pub fn context(
        &self,
        config: ConfigFile,
        generator: FakeGenerator,
        compiler: FakeStyleCompiler,
    ) -> TaskContext {
        TaskContext::with_parts(
            config,
            self.root(),
            Arc::new(RealFileSystem),
            Arc::new(generator),
            Arc::new(compiler),
        )
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
