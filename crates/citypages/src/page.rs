//! The generated city category pages.
use std::path::PathBuf;

use crate::content::City;
use crate::slug::title_case;

/// A stub page listing the activities of one category in one city.
///
/// Pages only carry front matter, the site's `layout` renders the actual listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityCategoryPage {
    pub city_slug: String,
    pub city_title: String,
    pub preposition: String,
    pub category: String,
}

impl CityCategoryPage {
    pub fn new(city: &City, category: &str) -> Self {
        Self {
            city_slug: city.slug.clone(),
            city_title: city.title.clone(),
            preposition: city.preposition.clone(),
            category: category.to_string(),
        }
    }

    /// e.g. `Museums things to do with kids in Paris`
    pub fn heading(&self) -> String {
        format!(
            "{} things to do with kids {} {}",
            title_case(&self.category),
            self.preposition,
            self.city_title
        )
    }

    pub fn permalink(&self) -> String {
        format!("/{}/{}/", self.city_slug, self.category)
    }

    /// Path of the page relative to the output directory.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.city_slug).join(format!("{}.md", self.category))
    }

    /// Renders the front matter document written to disk.
    pub fn render(&self, layout: &str) -> String {
        let heading = self.heading();

        [
            "---".to_string(),
            format!("layout: {}", layout),
            format!("title: {}", heading),
            format!("permalink: {}", self.permalink()),
            format!("city_slug: {}", self.city_slug),
            format!("city_title: {}", self.city_title),
            format!("preposition: {}", self.preposition),
            format!("category: {}", self.category),
            format!("h1: {}", heading),
            "---".to_string(),
            String::new(),
        ]
        .join("\n")
    }
}
