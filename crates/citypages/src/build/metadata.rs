use std::{path::PathBuf, process::Termination, time::Instant};

/// What happened to a desired page during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Wrote,
    Unchanged,
}

/// Metadata returned by [`generate()`](crate::generate) for a single page.
#[derive(Debug)]
pub struct PageOutput {
    pub city_slug: String,
    pub category: String,
    pub file_path: PathBuf,
    pub status: PageStatus,
}

/// Metadata returned by [`generate()`](crate::generate) after a successful run.
#[derive(Debug)]
pub struct GenerateOutput {
    pub start_time: Instant,
    pub pages: Vec<PageOutput>,
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
}

impl GenerateOutput {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            removed_files: Vec::new(),
            removed_dirs: Vec::new(),
        }
    }

    pub(crate) fn add_page(
        &mut self,
        city_slug: String,
        category: String,
        file_path: PathBuf,
        status: PageStatus,
    ) {
        self.pages.push(PageOutput {
            city_slug,
            category,
            file_path,
            status,
        });
    }

    pub(crate) fn add_removed_file(&mut self, file_path: PathBuf) {
        self.removed_files.push(file_path);
    }

    pub(crate) fn add_removed_dir(&mut self, dir_path: PathBuf) {
        self.removed_dirs.push(dir_path);
    }

    pub fn written(&self) -> usize {
        self.count(PageStatus::Wrote)
    }

    pub fn unchanged(&self) -> usize {
        self.count(PageStatus::Unchanged)
    }

    fn count(&self, status: PageStatus) -> usize {
        self.pages.iter().filter(|page| page.status == status).count()
    }
}

impl Default for GenerateOutput {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Termination for GenerateOutput {
    fn report(self) -> std::process::ExitCode {
        0.into()
    }
}
