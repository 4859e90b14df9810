//! Generates the per-city category pages of a kids activities site.
//!
//! Cities (`_cities/*.md`), activities (`_activities/*.md`) and the list of categories (`_data/categories.yml`) are
//! read from the site, and for every city and declared category one of the city's activities is tagged with, a stub
//! page is written to `category_pages/<city>/<category>.md`. The site generator then renders those through the
//! `city_category` layout.
//!
//! Runs are convergent: unchanged pages aren't rewritten, and pages that are no longer wanted get removed along
//! with the directories they leave empty.
//!
//! ## Example
//! ```no_run
//! use citypages::{GenerateOptions, run};
//!
//! fn main() -> Result<citypages::GenerateOutput, citypages::errors::CityPagesError> {
//!     run(GenerateOptions::default(), false)
//! }
//! ```

pub mod content;
pub mod errors;
pub mod page;
pub mod slug;

mod build;
mod logging;

pub use build::metadata::{GenerateOutput, PageOutput, PageStatus};
pub use build::options::GenerateOptions;
pub use build::plan_pages;
pub use logging::init_logging;

use errors::CityPagesError;

/// Generates the pages described by `options`, without setting up logging.
///
/// Useful when embedding citypages into a program that already has a logger.
pub fn generate(options: &GenerateOptions) -> Result<GenerateOutput, CityPagesError> {
    Ok(build::execute_generate(options)?)
}

/// Entrypoint of the `citypages` binary. Sets up console logging, then generates the pages.
pub fn run(options: GenerateOptions, quiet: bool) -> Result<GenerateOutput, CityPagesError> {
    init_logging(quiet);

    generate(&options)
}
