use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Instant,
};

use colored::Colorize;
use log::{info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    GenerateOptions, GenerateOutput,
    content::{Activity, City, load_activities, load_categories, load_cities},
    errors::GenerateError,
    logging::{FormatElapsedTimeOptions, format_elapsed_time, print_title},
    page::CityCategoryPage,
};

pub mod metadata;
pub mod options;

use metadata::PageStatus;

/// `(city_slug, category_slug)` pairs that must have a page.
pub type DesiredPages = FxHashSet<(String, String)>;

pub fn execute_generate(options: &GenerateOptions) -> Result<GenerateOutput, GenerateError> {
    let generate_start = Instant::now();
    let mut output = GenerateOutput::new(generate_start);

    print_title("generating pages");

    let categories = load_categories(&options.categories_path());
    let activities = load_activities(&options.activities_path());
    let cities = load_cities(&options.cities_path());

    info!(
        target: "generate",
        "{} categories, {} activities, {} cities",
        categories.len(),
        activities.len(),
        cities.len()
    );

    let pages = plan_pages(&categories, &activities, &cities);
    let output_dir = options.output_path();

    let mut desired = DesiredPages::default();
    for page in &pages {
        let file_path = output_dir.join(page.relative_path());
        let status = write_page_file(&page.render(&options.layout), &file_path)?;

        match status {
            PageStatus::Wrote => info!(target: "generate", "Wrote {}", file_path.display()),
            PageStatus::Unchanged => {
                let message = format!("Unchanged {}", file_path.display());
                info!(target: "generate", "{}", message.dimmed())
            }
        }

        desired.insert((page.city_slug.clone(), page.category.clone()));
        output.add_page(
            page.city_slug.clone(),
            page.category.clone(),
            file_path,
            status,
        );
    }

    prune_output(&output_dir, &desired, &mut output)?;

    info!(target: "SKIP_FORMAT", "{}", "");
    info!(
        target: "generate",
        "{}",
        format!(
            "{} written, {} unchanged, {} removed in {}",
            output.written(),
            output.unchanged(),
            output.removed_files.len() + output.removed_dirs.len(),
            format_elapsed_time(generate_start.elapsed(), &FormatElapsedTimeOptions::default())
        )
        .bold()
    );

    Ok(output)
}

/// Computes the pages to generate: one per city and declared category referenced by one of the city's activities.
///
/// Cities keep the order they were loaded in, categories the order of the category list.
pub fn plan_pages(
    categories: &[String],
    activities: &[Activity],
    cities: &[City],
) -> Vec<CityCategoryPage> {
    let mut referenced: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
    for activity in activities {
        referenced
            .entry(activity.city.as_str())
            .or_default()
            .extend(activity.categories.iter().map(String::as_str));
    }

    let mut seen_cities = FxHashSet::default();
    let mut pages = vec![];

    for city in cities {
        if !seen_cities.insert(city.slug.as_str()) {
            warn!(
                target: "generate",
                "{} uses the slug `{}` of another city, skipping",
                city.file_path.display(),
                city.slug
            );
            continue;
        }

        let Some(city_categories) = referenced.get(city.slug.as_str()) else {
            continue;
        };

        pages.extend(
            categories
                .iter()
                .filter(|category| city_categories.contains(category.as_str()))
                .map(|category| CityCategoryPage::new(city, category)),
        );
    }

    pages
}

/// Writes `content` to `file_path` unless the file already holds exactly that content.
///
/// Parent directories are only created when a write actually happens.
fn write_page_file(content: &str, file_path: &Path) -> Result<PageStatus, GenerateError> {
    match fs::read_to_string(file_path) {
        Ok(existing) if existing == content => return Ok(PageStatus::Unchanged),
        _ => {}
    }

    if let Some(parent_dir) = file_path.parent() {
        fs::create_dir_all(parent_dir).map_err(|source| GenerateError::CreateDir {
            path: parent_dir.to_path_buf(),
            source,
        })?;
    }

    fs::write(file_path, content).map_err(|source| GenerateError::Write {
        path: file_path.to_path_buf(),
        source,
    })?;

    Ok(PageStatus::Wrote)
}

/// Removes generated pages that are no longer desired, then the directories they leave empty.
///
/// Only `<output_dir>/<city>/*.md` files are considered generated, anything else is left alone.
fn prune_output(
    output_dir: &Path,
    desired: &DesiredPages,
    output: &mut GenerateOutput,
) -> Result<(), GenerateError> {
    if !output_dir.is_dir() {
        return Ok(());
    }

    for city_dir in sorted_entries(output_dir)? {
        if !city_dir.is_dir() {
            continue;
        }

        let Some(city_slug) = city_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
        else {
            continue;
        };

        for file_path in sorted_entries(&city_dir)? {
            if !file_path.is_file() || file_path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }

            let Some(category) = file_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
            else {
                continue;
            };

            if desired.contains(&(city_slug.clone(), category)) {
                continue;
            }

            fs::remove_file(&file_path).map_err(|source| GenerateError::Remove {
                path: file_path.clone(),
                source,
            })?;
            info!(target: "prune", "Removed {}", file_path.display());
            output.add_removed_file(file_path);
        }

        remove_dir_if_empty(&city_dir, output)?;
    }

    remove_dir_if_empty(output_dir, output)?;

    Ok(())
}

fn remove_dir_if_empty(dir: &Path, output: &mut GenerateOutput) -> Result<(), GenerateError> {
    let is_empty = fs::read_dir(dir)
        .map_err(|source| GenerateError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .next()
        .is_none();

    if !is_empty {
        return Ok(());
    }

    fs::remove_dir(dir).map_err(|source| GenerateError::Remove {
        path: dir.to_path_buf(),
        source,
    })?;
    info!(target: "prune", "Removed {}", dir.display());
    output.add_removed_dir(dir.to_path_buf());

    Ok(())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let read_dir_error = |source: io::Error| GenerateError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_dir_error)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_dir_error)?;

    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn city(slug: &str) -> City {
        City {
            slug: slug.to_string(),
            title: crate::slug::title_case(slug),
            preposition: "in".to_string(),
            file_path: PathBuf::from(format!("_cities/{}.md", slug)),
        }
    }

    fn activity(city: &str, categories: &[&str]) -> Activity {
        Activity {
            city: city.to_string(),
            categories: categories.iter().map(|category| category.to_string()).collect(),
            file_path: PathBuf::from("_activities/activity.md"),
        }
    }

    fn categories(slugs: &[&str]) -> Vec<String> {
        slugs.iter().map(|slug| slug.to_string()).collect()
    }

    fn keys(pages: &[CityCategoryPage]) -> Vec<(&str, &str)> {
        pages
            .iter()
            .map(|page| (page.city_slug.as_str(), page.category.as_str()))
            .collect()
    }

    #[test]
    fn test_plan_pages_intersects_declared_and_referenced() {
        let pages = plan_pages(
            &categories(&["museums", "parks", "zoos"]),
            &[
                activity("paris", &["zoos", "museums"]),
                activity("paris", &["undeclared"]),
                activity("berlin", &["parks"]),
            ],
            &[city("berlin"), city("paris"), city("rome")],
        );

        assert_eq!(
            keys(&pages),
            vec![("berlin", "parks"), ("paris", "museums"), ("paris", "zoos")]
        );
    }

    #[test]
    fn test_plan_pages_ignores_activities_of_unknown_cities() {
        let pages = plan_pages(
            &categories(&["museums"]),
            &[activity("atlantis", &["museums"])],
            &[city("paris")],
        );

        assert!(pages.is_empty());
    }

    #[test]
    fn test_plan_pages_skips_duplicate_city_slugs() {
        let pages = plan_pages(
            &categories(&["museums"]),
            &[activity("paris", &["museums"])],
            &[city("paris"), city("paris")],
        );

        assert_eq!(keys(&pages), vec![("paris", "museums")]);
    }

    #[test]
    fn test_write_page_file_is_idempotent() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("paris").join("museums.md");

        assert_eq!(write_page_file("a", &file_path).unwrap(), PageStatus::Wrote);
        assert_eq!(write_page_file("a", &file_path).unwrap(), PageStatus::Unchanged);
        assert_eq!(write_page_file("b", &file_path).unwrap(), PageStatus::Wrote);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "b");
    }

    #[test]
    fn test_prune_output() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("category_pages");
        fs::create_dir_all(output_dir.join("paris")).unwrap();
        fs::create_dir_all(output_dir.join("rome")).unwrap();
        fs::create_dir_all(output_dir.join("berlin")).unwrap();
        fs::write(output_dir.join("paris/museums.md"), "").unwrap();
        fs::write(output_dir.join("paris/zoos.md"), "").unwrap();
        fs::write(output_dir.join("rome/parks.md"), "").unwrap();
        fs::write(output_dir.join("berlin/parks.md"), "").unwrap();
        fs::write(output_dir.join("berlin/notes.txt"), "").unwrap();

        let mut desired = DesiredPages::default();
        desired.insert(("paris".to_string(), "museums".to_string()));

        let mut output = GenerateOutput::default();
        prune_output(&output_dir, &desired, &mut output).unwrap();

        assert!(output_dir.join("paris/museums.md").exists());
        assert!(!output_dir.join("paris/zoos.md").exists());
        assert!(!output_dir.join("rome").exists());
        assert!(!output_dir.join("berlin/parks.md").exists());
        assert!(output_dir.join("berlin/notes.txt").exists());
        assert_eq!(output.removed_files.len(), 3);
        assert_eq!(output.removed_dirs, vec![output_dir.join("rome")]);
    }

    #[test]
    fn test_prune_output_removes_empty_root() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("category_pages");
        fs::create_dir_all(output_dir.join("paris")).unwrap();
        fs::write(output_dir.join("paris/museums.md"), "").unwrap();

        let mut output = GenerateOutput::default();
        prune_output(&output_dir, &DesiredPages::default(), &mut output).unwrap();

        assert!(!output_dir.exists());
        assert_eq!(
            output.removed_dirs,
            vec![output_dir.join("paris"), output_dir.clone()]
        );
    }

    #[test]
    fn test_prune_missing_output_dir() {
        let dir = tempdir().unwrap();
        let mut output = GenerateOutput::default();

        prune_output(&dir.path().join("nope"), &DesiredPages::default(), &mut output).unwrap();
        assert!(output.removed_files.is_empty());
    }
}
