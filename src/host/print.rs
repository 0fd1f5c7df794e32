use std::path::PathBuf;

use super::{HostError, Printer, open_external};

/// Prints by opening a self-printing page in the default browser.
#[derive(Debug, Clone)]
pub struct BrowserPrinter {
    dir: PathBuf,
}

impl BrowserPrinter {
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    pub const fn in_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Where the page for `title` is written.
    pub fn page_path(&self, title: &str) -> PathBuf {
        let stem: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("inkview-{stem}.html"))
    }

    /// Write the page without opening it.
    ///
    /// # Errors
    /// Returns [`HostError::Print`] if the file cannot be written.
    pub fn write_page(&self, title: &str, page_html: &str) -> Result<PathBuf, HostError> {
        let path = self.page_path(title);
        std::fs::write(&path, page_html)
            .map_err(|err| HostError::Print(format!("{}: {err}", path.display())))?;
        Ok(path)
    }
}

impl Default for BrowserPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer for BrowserPrinter {
    fn print_page(&mut self, title: &str, page_html: &str) -> Result<(), HostError> {
        let path = self.write_page(title, page_html)?;
        tracing::info!(path = %path.display(), "opening print page");
        open_external(&path.to_string_lossy()).map_err(|err| HostError::Print(err.to_string()))
    }
}
