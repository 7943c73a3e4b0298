use crate::error::Result;
use crate::siteconfig::directives::SiteConfig;
use crate::siteconfig::parser::ConfigParser;
use crate::siteconfig::registry::SiteConfigRegistry;
use std::fs;
use std::path::{Path, PathBuf};

/// File holding the fallback configuration.
const GLOBAL_FILE: &str = "global.txt";

/// Loads site config files from disk into a [`SiteConfigRegistry`].
///
/// Each `<hostname>.txt` file in a config directory registers one pattern;
/// `global.txt` replaces the default configuration. Files in the custom
/// directory override files of the same name in the standard directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Custom config directory path
    custom_dir: Option<PathBuf>,
    /// Standard config directory path
    standard_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with no directories
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None }
    }

    /// Builds a registry from the built-in table plus every config file.
    pub fn registry(&self) -> Result<SiteConfigRegistry> {
        let mut registry = SiteConfigRegistry::builtin();
        self.load_into(&mut registry)?;
        Ok(registry)
    }

    /// Registers every config file found into `registry`.
    ///
    /// Files that fail to parse are logged and skipped. Returns the number
    /// of files applied.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::Io`](crate::ReadModeError::Io) if a config directory exists but
    /// cannot be read.
    pub fn load_into(&self, registry: &mut SiteConfigRegistry) -> Result<usize> {
        let mut applied = 0;

        for dir in self.dirs_lowest_priority_first() {
            for path in config_files(dir)? {
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                let mut config = match ConfigParser::parse_file(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping site config");
                        continue;
                    }
                };

                if !config.has_extraction_config() {
                    config.main_selectors = registry.default_config().main_selectors.clone();
                }

                if path.file_name().and_then(|n| n.to_str()) == Some(GLOBAL_FILE) {
                    tracing::debug!(path = %path.display(), "replacing default site config");
                    registry.set_default(config);
                } else {
                    tracing::debug!(pattern = stem, path = %path.display(), "registering site config");
                    registry.register(stem, config);
                }
                applied += 1;
            }
        }

        Ok(applied)
    }

    fn dirs_lowest_priority_first(&self) -> impl Iterator<Item = &PathBuf> {
        self.standard_dir.iter().chain(self.custom_dir.iter())
    }
}

/// Lists `*.txt` files in `dir`, `global.txt` first and the rest sorted by
/// name. A missing directory is empty.
fn config_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort_by_key(|path| (path.file_name().and_then(|n| n.to_str()) != Some(GLOBAL_FILE), path.clone()));
    Ok(files)
}

/// Builder for ConfigLoader
#[derive(Debug)]
pub struct ConfigLoaderBuilder {
    custom_dir: Option<PathBuf>,
    standard_dir: Option<PathBuf>,
}

impl ConfigLoaderBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None }
    }

    /// Set custom config directory
    pub fn custom_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set standard config directory
    pub fn standard_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.standard_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the ConfigLoader
    pub fn build(self) -> ConfigLoader {
        ConfigLoader { custom_dir: self.custom_dir, standard_dir: self.standard_dir }
    }
}

impl Default for ConfigLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        let mut builder = ConfigLoaderBuilder::new();

        if let Some(custom_dir) = Self::default_custom_dir() {
            builder = builder.custom_dir(custom_dir);
        }

        builder.build()
    }
}

impl ConfigLoader {
    /// Get default custom config directory (~/.config/readmode/sites)
    pub fn default_custom_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("readmode").join("sites"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::siteconfig::directives::ContentType;
    use crate::siteconfig::registry::DEFAULT_MAIN_SELECTORS;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_into_registers_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("blog.example.com.txt"), "main: .entry-body\nremove: .author-card\n").unwrap();
        fs::write(temp_dir.path().join("notes.md"), "main: ignored\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        let mut registry = SiteConfigRegistry::builtin();
        let applied = loader.load_into(&mut registry).unwrap();

        assert_eq!(applied, 1);
        let config = registry.resolve("blog.example.com");
        assert_eq!(config.main_selectors, vec![".entry-body".to_string()]);
        assert_eq!(config.remove_selectors, vec![".author-card".to_string()]);
    }

    #[test]
    fn test_load_into_overrides_builtin() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("medium.com.txt"), "main: .custom-body\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        let registry = loader.registry().unwrap();

        assert_eq!(registry.resolve("medium.com").main_selectors, vec![".custom-body".to_string()]);
        assert_eq!(registry.patterns().filter(|p| *p == "medium.com").count(), 1);
    }

    #[test]
    fn test_global_replaces_default() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("global.txt"), "main: #main\npreserve_comments: yes\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        let registry = loader.registry().unwrap();

        let config = registry.resolve("unknown.example");
        assert_eq!(config.main_selectors, vec!["#main".to_string()]);
        assert!(config.preserve_comments);
        assert!(registry.patterns().all(|p| p != "global"));
    }

    #[test]
    fn test_global_without_main_keeps_default_selectors() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("global.txt"), "remove: .byline\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        let registry = loader.registry().unwrap();
        let config = registry.resolve("blog.example.org");

        assert_eq!(config.main_selectors, DEFAULT_MAIN_SELECTORS.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        assert_eq!(config.remove_selectors, vec![".byline".to_string()]);
        assert_eq!(config.content_type, ContentType::Article);
    }

    #[test]
    fn test_file_without_main_inherits_default_selectors() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("forum.example.txt"), "type: discussion\npreserve_comments: yes\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        let registry = loader.registry().unwrap();
        let config = registry.resolve("forum.example");

        assert_eq!(config.content_type, ContentType::Discussion);
        assert_eq!(config.main_selectors[0], "article");
    }

    #[test]
    fn test_host_files_inherit_global_selectors() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("aaa.example.txt"), "remove: .promo-box\n").unwrap();
        fs::write(temp_dir.path().join("global.txt"), "main: #main\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        let registry = loader.registry().unwrap();

        assert_eq!(registry.resolve("aaa.example").main_selectors, vec!["#main".to_string()]);
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.example.txt"), "title: //h1\n").unwrap();
        fs::write(temp_dir.path().join("good.example.txt"), "main: .good\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        let mut registry = SiteConfigRegistry::builtin();

        assert_eq!(loader.load_into(&mut registry).unwrap(), 1);
        assert!(registry.resolve_pattern("broken.example").is_none());
        assert_eq!(registry.resolve_pattern("good.example"), Some("good.example"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path().join("nope")).build();

        let mut registry = SiteConfigRegistry::builtin();
        assert_eq!(loader.load_into(&mut registry).unwrap(), 0);
    }

    #[test]
    fn test_custom_dir_overrides_standard_dir() {
        let temp_dir = TempDir::new().unwrap();

        let custom_path = temp_dir.path().join("custom");
        fs::create_dir_all(&custom_path).unwrap();
        fs::write(custom_path.join("example.com.txt"), "main: .custom\n").unwrap();

        let standard_path = temp_dir.path().join("standard");
        fs::create_dir_all(&standard_path).unwrap();
        fs::write(standard_path.join("example.com.txt"), "main: .standard\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_dir(&custom_path).standard_dir(&standard_path).build();

        let registry = loader.registry().unwrap();
        assert_eq!(registry.resolve("example.com").main_selectors, vec![".custom".to_string()]);
        assert_eq!(registry.patterns().filter(|p| *p == "example.com").count(), 1);
    }

    #[test]
    fn test_default_custom_dir() {
        if let Some(dir) = ConfigLoader::default_custom_dir() {
            assert!(dir.ends_with(".config/readmode/sites"));
        }
    }
}
