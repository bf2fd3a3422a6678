// File: ./src/storage.rs
// File-tree plumbing shared by every record operation: template copies,
// directory listings, advisory locks and atomic writes.
use crate::error::{IoContext, PlannerError, PlannerResult};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Lock file guarding read-modify-write edits inside a planning tree.
pub const TREE_LOCK_FILE: &str = ".fieldplan.lock";

pub struct LocalStorage;

impl LocalStorage {
    /// Hidden sidecar next to `file_path`, so lock files do not show up as notes.
    fn sidecar_path(file_path: &Path, suffix: &str) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(file_path.file_name().unwrap_or_default());
        name.push(suffix);
        file_path.with_file_name(name)
    }

    fn get_lock_path(file_path: &Path) -> PathBuf {
        Self::sidecar_path(file_path, ".lock")
    }

    /// Runs `f` while holding an exclusive advisory lock on `file_path`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> PlannerResult<T>
    where
        F: FnOnce() -> PlannerResult<T>,
    {
        Self::locked(&Self::get_lock_path(file_path), f)
    }

    /// Runs `f` while holding the lock shared by a whole planning tree.
    ///
    /// A single `.fieldplan.lock` at `root` covers every document below it.
    pub fn with_tree_lock<F, T>(root: &Path, f: F) -> PlannerResult<T>
    where
        F: FnOnce() -> PlannerResult<T>,
    {
        Self::locked(&root.join(TREE_LOCK_FILE), f)
    }

    // The lock file must outlive the unlock; removing it races with waiters.
    fn locked<F, T>(lock_path: &Path, f: F) -> PlannerResult<T>
    where
        F: FnOnce() -> PlannerResult<T>,
    {
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .at(lock_path)?;

        file.lock_exclusive().at(lock_path)?;
        let result = f();
        file.unlock().at(lock_path)?;
        result
    }

    /// Atomic write: write a hidden temp file next to `path`, then rename.
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
        path: P,
        contents: C,
    ) -> PlannerResult<()> {
        let path = path.as_ref();
        let tmp_path = Self::sidecar_path(path, ".tmp");
        fs::write(&tmp_path, contents).at(&tmp_path)?;
        fs::rename(&tmp_path, path).at(path)?;
        Ok(())
    }
}

// --- Template Instantiator ---

/// Recursively mirrors `src` into `dest`, creating `dest` and any missing
/// parents. Existing files with the same name are overwritten. Nothing is
/// rolled back on failure: whatever was copied before the error stays.
///
/// Returns the number of files copied.
pub fn instantiate_template(src: &Path, dest: &Path) -> PlannerResult<usize> {
    if !src.is_dir() {
        return Err(PlannerError::NotFound(src.to_path_buf()));
    }
    copy_tree(src, dest)
}

fn copy_tree(src: &Path, dest: &Path) -> PlannerResult<usize> {
    fs::create_dir_all(dest).at(dest)?;
    let mut copied = 0;
    for entry in fs::read_dir(src).at(src)? {
        let entry = entry.at(src)?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if src_path.is_dir() {
            copied += copy_tree(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path).at(&src_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Plan-then-apply variant of `instantiate_template`.
///
/// `scan` walks the whole template before anything is written, so a missing
/// or unreadable template never leaves a half-created destination behind.
/// Failures during `apply` still leave a partial copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePlan {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<(PathBuf, PathBuf)>,
}

impl TemplatePlan {
    pub fn scan(src: &Path, dest: &Path) -> PlannerResult<Self> {
        if !src.is_dir() {
            return Err(PlannerError::NotFound(src.to_path_buf()));
        }
        let mut plan = Self {
            dirs: vec![dest.to_path_buf()],
            files: Vec::new(),
        };
        plan.scan_dir(src, dest)?;
        Ok(plan)
    }

    fn scan_dir(&mut self, src: &Path, dest: &Path) -> PlannerResult<()> {
        let mut entries = fs::read_dir(src)
            .at(src)?
            .collect::<Result<Vec<_>, _>>()
            .at(src)?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let src_path = entry.path();
            let dest_path = dest.join(entry.file_name());
            if src_path.is_dir() {
                self.dirs.push(dest_path.clone());
                self.scan_dir(&src_path, &dest_path)?;
            } else {
                // Fail during planning rather than halfway through the copy.
                fs::File::open(&src_path).at(&src_path)?;
                self.files.push((src_path, dest_path));
            }
        }
        Ok(())
    }

    pub fn apply(&self) -> PlannerResult<usize> {
        for dir in &self.dirs {
            fs::create_dir_all(dir).at(dir)?;
        }
        for (src, dest) in &self.files {
            fs::copy(src, dest).at(src)?;
        }
        Ok(self.files.len())
    }
}

// --- Folder Inventory ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dirs,
    Files,
}

/// Names of the immediate children of `base` of the requested kind, sorted.
/// A missing `base` yields an empty list.
pub fn list_entries(base: &Path, kind: EntryKind) -> Vec<String> {
    let Ok(read_dir) = fs::read_dir(base) else {
        return Vec::new();
    };
    let mut names: Vec<String> = read_dir
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let path = entry.path();
            match kind {
                EntryKind::Dirs => path.is_dir(),
                EntryKind::Files => path.is_file(),
            }
        })
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    names
}

pub fn list_dirs(base: &Path) -> Vec<String> {
    list_entries(base, EntryKind::Dirs)
}

pub fn list_files(base: &Path) -> Vec<String> {
    list_entries(base, EntryKind::Files)
}
