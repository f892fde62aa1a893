use super::ICON_SIZE;
use gdk_pixbuf::Pixbuf;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loads item images once and remembers failures so they are reported once.
pub struct IconCache {
    search_dirs: Vec<PathBuf>,
    pixbufs: HashMap<PathBuf, Option<Pixbuf>>,
}

impl IconCache {
    /// `base_dir` is usually the directory of the config file.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self {
            search_dirs: search_directories(base_dir),
            pixbufs: HashMap::new(),
        }
    }

    pub fn get(&mut self, image: &Path) -> Option<&Pixbuf> {
        let search_dirs = &self.search_dirs;
        self.pixbufs
            .entry(image.to_path_buf())
            .or_insert_with(|| {
                let pixbuf = resolve_in(search_dirs, image).and_then(|path| {
                    Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
                        .map_err(|e| log::warn!("Failed to load {}: {}", path.display(), e))
                        .ok()
                });
                if pixbuf.is_none() {
                    log::warn!("Image '{}' unavailable, showing the item name", image.display());
                }
                pixbuf
            })
            .as_ref()
    }
}

fn search_directories(base_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let xdg = xdg::BaseDirectories::new();
    let mut dirs: Vec<PathBuf> = base_dir.into_iter().collect();

    if let Some(home) = xdg.get_data_home() {
        dirs.push(home.join("rosette"));
    }
    dirs.extend(xdg.get_data_dirs().into_iter().map(|p| p.join("rosette")));

    // demo assets of a source checkout; installs get them from --write-default
    if cfg!(debug_assertions) {
        dirs.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    }
    dirs
}

/// Absolute paths are taken as they are; relative ones are tried against each
/// directory in order.
pub fn resolve_in(dirs: &[PathBuf], image: &Path) -> Option<PathBuf> {
    if image.is_absolute() {
        return image.exists().then(|| image.to_path_buf());
    }
    dirs.iter().map(|d| d.join(image)).find(|p| p.exists())
}
