//! Terminal implementations of the workflow collaborators.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use emed_core::routes::Route;
use emed_export::ExportedFile;
use emed_workflow::services::{Downloads, Level, Navigator, Notification, Notifier, Printer};

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match (notification.level, notification.message) {
            (Level::Success, _) => println!("{}", notification.title),
            (Level::Error, Some(message)) => eprintln!("{}: {message}", notification.title),
            (Level::Error, None) => eprintln!("{}", notification.title),
        }
    }
}

/// Remembers where the workflow would have taken the user.
#[derive(Default)]
pub struct ConsoleNavigator {
    visited: Mutex<Vec<Route>>,
}

impl ConsoleNavigator {
    pub fn last(&self) -> Option<Route> {
        self.visited.lock().ok().and_then(|v| v.last().cloned())
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "navigate");
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(route);
        }
    }
}

/// Writes printed documents and downloads into one directory.
pub struct FileOutbox {
    dir: PathBuf,
}

impl FileOutbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, file: &ExportedFile) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&file.file_name);
        std::fs::write(&path, &file.bytes)?;
        info!(path = %path.display(), size = file.bytes.len(), "file written");
        Ok(path)
    }
}

impl Printer for FileOutbox {
    fn print(&self, document: ExportedFile) -> std::io::Result<()> {
        let path = self.write(&document)?;
        println!("prescription ready to print: {}", path.display());
        Ok(())
    }
}

impl Downloads for FileOutbox {
    fn save(&self, file: ExportedFile) -> std::io::Result<()> {
        let path = self.write(&file)?;
        println!("saved {}", path.display());
        Ok(())
    }
}
