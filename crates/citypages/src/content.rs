//! Loading of the site's input data: the category list, city files and activity files.
//!
//! Missing inputs are treated as "no data" rather than errors, and files that can't be read are skipped with a warning.
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob as glob_fs};
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::slug::{slugify, title_case};

pub mod frontmatter;

pub use frontmatter::FrontMatter;

pub const DEFAULT_PREPOSITION: &str = "in";

/// A city page of the site, read from the front matter of a file in the cities directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub slug: String,
    pub title: String,
    pub preposition: String,
    pub file_path: PathBuf,
}

impl City {
    /// Builds a city from its front matter, falling back to the file stem for the slug.
    ///
    /// Returns `None` if no usable slug can be derived.
    pub fn from_front_matter(front_matter: FrontMatter, file_path: &Path) -> Option<Self> {
        let stem = file_path.file_stem()?.to_string_lossy();
        let slug = slugify(front_matter.slug.as_deref().unwrap_or(&stem));
        if slug.is_empty() {
            return None;
        }

        let title = front_matter
            .city_title
            .or(front_matter.title)
            .unwrap_or_else(|| title_case(&slug));

        Some(Self {
            slug,
            title,
            preposition: front_matter
                .preposition
                .unwrap_or_else(|| DEFAULT_PREPOSITION.to_string()),
            file_path: file_path.to_path_buf(),
        })
    }
}

/// Associates a city with the categories of one of its activities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub city: String,
    pub categories: Vec<String>,
    pub file_path: PathBuf,
}

impl Activity {
    pub fn from_front_matter(front_matter: FrontMatter, file_path: &Path) -> Option<Self> {
        let city = slugify(front_matter.city.as_deref()?);
        if city.is_empty() {
            return None;
        }

        let categories = front_matter
            .categories
            .iter()
            .map(|category| slugify(category))
            .filter(|category| !category.is_empty())
            .collect();

        Some(Self {
            city,
            categories,
            file_path: file_path.to_path_buf(),
        })
    }
}

/// Reads the list of declared category slugs.
///
/// The file is expected to be a YAML list of names. Anything that doesn't parse as one is scanned for `- name` lines instead.
pub fn load_categories(path: &Path) -> Vec<String> {
    let Some(text) = read_input(path) else {
        return vec![];
    };

    let names = match serde_yaml::from_str::<Vec<String>>(&text) {
        Ok(names) => names,
        Err(err) => {
            debug!(
                target: "content",
                "{} is not a plain YAML list ({}), scanning lines",
                path.display(),
                err
            );
            scan_list_items(&text)
        }
    };

    let mut seen = FxHashSet::default();
    names
        .iter()
        .map(|name| slugify(name))
        .filter(|slug| !slug.is_empty() && seen.insert(slug.clone()))
        .collect()
}

fn scan_list_items(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.trim_start().strip_prefix('-'))
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn load_cities(dir: &Path) -> Vec<City> {
    let mut cities = vec![];

    for file_path in glob_markdown_files(dir) {
        let Some(text) = read_input(&file_path) else {
            continue;
        };

        match City::from_front_matter(FrontMatter::parse(&text), &file_path) {
            Some(city) => {
                debug!(target: "content", "Loaded city {} from {}", city.slug, file_path.display());
                cities.push(city);
            }
            None => warn!(
                target: "content",
                "Skipping {}, no usable city slug",
                file_path.display()
            ),
        }
    }

    cities
}

pub fn load_activities(dir: &Path) -> Vec<Activity> {
    let mut activities = vec![];

    for file_path in glob_markdown_files(dir) {
        let Some(text) = read_input(&file_path) else {
            continue;
        };

        // Activities without a city don't contribute any page.
        let front_matter = FrontMatter::parse(&text);
        if let Some(activity) = Activity::from_front_matter(front_matter, &file_path) {
            debug!(
                target: "content",
                "Loaded activity in {} from {}",
                activity.city,
                activity.file_path.display()
            );
            activities.push(activity);
        }
    }

    activities
}

/// Sorted list of the Markdown files directly inside `dir`.
fn glob_markdown_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return vec![];
    }

    let pattern = format!("{}/*.md", Pattern::escape(&dir.to_string_lossy()));
    let paths = match glob_fs(&pattern) {
        Ok(paths) => paths,
        Err(err) => {
            warn!(target: "content", "Invalid pattern {}: {}", pattern, err);
            return vec![];
        }
    };

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(target: "content", "Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    files.sort();
    files
}

fn read_input(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            warn!(target: "content", "Skipping {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_categories_yaml_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("categories.yml");
        fs::write(&path, "- Museums\n- \"Parks & Playgrounds\"\n- museums\n").unwrap();

        assert_eq!(load_categories(&path), vec!["museums", "parks-playgrounds"]);
    }

    #[test]
    fn test_load_categories_fallback_scan() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("categories.yml");
        fs::write(
            &path,
            "# categories\n- Museums\n- 2024 Events\nnot: a list\n  - Zoos\n",
        )
        .unwrap();

        assert_eq!(load_categories(&path), vec!["museums", "2024-events", "zoos"]);
    }

    #[test]
    fn test_load_categories_missing_file() {
        let dir = tempdir().unwrap();
        assert!(load_categories(&dir.path().join("nope.yml")).is_empty());
    }

    #[test]
    fn test_city_defaults() {
        let city =
            City::from_front_matter(FrontMatter::default(), Path::new("_cities/new-york.md"))
                .unwrap();

        assert_eq!(city.slug, "new-york");
        assert_eq!(city.title, "New York");
        assert_eq!(city.preposition, "in");
    }

    #[test]
    fn test_city_title_falls_back_to_title() {
        let front_matter = FrontMatter::parse(
            "---\nslug: Den Haag\ntitle: The Hague\npreposition: near\n---\n",
        );
        let city = City::from_front_matter(front_matter, Path::new("_cities/x.md")).unwrap();

        assert_eq!(city.slug, "den-haag");
        assert_eq!(city.title, "The Hague");
        assert_eq!(city.preposition, "near");
    }

    #[test]
    fn test_activity_requires_city() {
        let front_matter = FrontMatter::parse("---\ncategories: [Museums]\n---\n");
        assert_eq!(Activity::from_front_matter(front_matter, Path::new("a.md")), None);
    }

    #[test]
    fn test_activity_slugifies_values() {
        let front_matter = FrontMatter::parse(
            "---\ncity: São Paulo\ncategories: [Museums, '!!', Arts & Crafts]\n---\n",
        );
        let activity = Activity::from_front_matter(front_matter, Path::new("a.md")).unwrap();

        assert_eq!(activity.city, "são-paulo");
        assert_eq!(activity.categories, vec!["museums", "arts-crafts"]);
    }

    #[test]
    fn test_load_cities_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("rome.md"), "---\ncity_title: Rome\n---\n").unwrap();
        fs::write(dir.path().join("berlin.md"), "---\nslug: berlin\n---\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "---\nslug: notes\n---\n").unwrap();
        fs::write(dir.path().join("broken.md"), [0xff, 0xfe, 0xfd]).unwrap();

        let cities = load_cities(dir.path());
        let slugs: Vec<_> = cities.iter().map(|city| city.slug.as_str()).collect();

        assert_eq!(slugs, vec!["berlin", "rome"]);
    }

    #[test]
    fn test_load_from_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(load_cities(&dir.path().join("_cities")).is_empty());
        assert!(load_activities(&dir.path().join("_activities")).is_empty());
    }
}
