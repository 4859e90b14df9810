use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::errors::ConfigError;

/// Options for [`generate()`](crate::generate()).
///
/// Relative paths are resolved against `root`.
///
/// ## Examples
/// Default values:
/// ```rust
/// use citypages::GenerateOptions;
///
/// let options = GenerateOptions::default();
/// assert_eq!(options.output_path(), std::path::Path::new("./category_pages"));
/// ```
/// Custom values:
/// ```rust
/// use citypages::GenerateOptions;
///
/// let options = GenerateOptions {
///     root: "site".into(),
///     output_dir: "generated/categories".into(),
///     ..Default::default()
/// };
/// assert_eq!(options.output_path(), std::path::Path::new("site/generated/categories"));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Root of the site, everything else is relative to it.
    pub root: PathBuf,

    /// YAML list of the categories pages can be generated for.
    pub categories_file: PathBuf,
    pub cities_dir: PathBuf,
    pub activities_dir: PathBuf,

    /// Where the pages are written, as `<output_dir>/<city>/<category>.md`.
    ///
    /// This directory is owned by citypages: Markdown files inside it that don't match a desired page get removed.
    pub output_dir: PathBuf,

    /// Value of the `layout` field of every generated page.
    pub layout: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            categories_file: PathBuf::from("_data/categories.yml"),
            cities_dir: PathBuf::from("_cities"),
            activities_dir: PathBuf::from("_activities"),
            output_dir: PathBuf::from("category_pages"),
            layout: "city_category".to_string(),
        }
    }
}

impl GenerateOptions {
    /// Reads options from a YAML file. Omitted fields keep their default value.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document is a valid, default, options file.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(text)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.resolve(&self.categories_file)
    }

    pub fn cities_path(&self) -> PathBuf {
        self.resolve(&self.cities_dir)
    }

    pub fn activities_path(&self) -> PathBuf {
        self.resolve(&self.activities_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
