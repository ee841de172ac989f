use anyhow::Context;
use domain::StorySaver;
use shared::types::Result;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Gives up looking for a free " (n)" name after this many attempts.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Writes stories as UTF-8 text files into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl StorySaver for DirectorySaver {
    fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create download directory {:?}", self.dir))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(candidate_name(file_name, attempt));
            // create_new so an existing download is never overwritten
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    fill_or_remove(file, &path, contents)?;
                    return Ok(path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to create {:?}", path));
                }
            }
        }

        Err(anyhow::anyhow!(
            "No free file name for {} in {:?}",
            file_name,
            self.dir
        ))
    }
}

/// Writes `contents` to a freshly created file, deleting it again if the write fails.
fn fill_or_remove(mut out: impl Write, path: &Path, contents: &str) -> Result<()> {
    if let Err(err) = out.write_all(contents.as_bytes()).and_then(|_| out.flush()) {
        drop(out);
        let _ = fs::remove_file(path);
        return Err(err).with_context(|| format!("Failed to write {:?}", path));
    }
    Ok(())
}

/// `story-1.txt`, then `story-1 (1).txt`, `story-1 (2).txt`, ...
fn candidate_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({attempt}).{ext}"),
        _ => format!("{file_name} ({attempt})"),
    }
}
