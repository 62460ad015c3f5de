//! Managed-file ledger
//!
//! The ledger is a plain-text sentinel file (`.managed`) living next to the
//! repo files. Its existence is the tracking switch: present means tracking
//! is enabled, absent means disabled. While enabled, it holds one line per
//! managed repo file (the file's basename without the `.repo` suffix).
//!
//! [`ManagedLedger::sweep`] is the enforcement half: every repo file in
//! the directory whose id is neither in the ledger nor explicitly exempted
//! gets deleted and unregistered.
//!
//! Every operation returns a `changed` flag. Under dry-run the mutating
//! filesystem calls are skipped, but the flag still reports what a live
//! run would have done.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::defaults::{LEDGER_FILE_NAME, REPO_SUFFIX};
use crate::error::{Error, Result};

/// Ledger of managed repo files within one repository directory.
#[derive(Debug)]
pub struct ManagedLedger {
    path: PathBuf,
    dry_run: bool,
}

impl ManagedLedger {
    pub fn new(reposdir: &Path, dry_run: bool) -> Self {
        ManagedLedger {
            path: reposdir.join(LEDGER_FILE_NAME),
            dry_run,
        }
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether tracking is on, i.e. the ledger file exists.
    pub fn is_enabled(&self) -> bool {
        self.path.is_file()
    }

    /// Turn tracking on.
    ///
    /// Creates the ledger empty if it did not exist, or truncates it if it
    /// held entries (doubling as a "reset tracking" operation). Both count
    /// as a change; an already-empty ledger does not.
    pub fn enable(&self) -> Result<bool> {
        let exists = self.path.is_file();
        let has_content = exists
            && fs::metadata(&self.path)
                .map_err(|e| Error::io(&self.path, e))?
                .len()
                > 0;

        if exists && !has_content {
            return Ok(false);
        }

        if !self.dry_run {
            fs::write(&self.path, "").map_err(|e| Error::io(&self.path, e))?;
        }
        info!(
            "{} ledger '{}'",
            if exists { "truncated" } else { "created" },
            self.path.display()
        );
        Ok(true)
    }

    /// Turn tracking off by deleting the ledger file.
    pub fn disable(&self) -> Result<bool> {
        if !self.path.is_file() {
            return Ok(false);
        }

        if !self.dry_run {
            fs::remove_file(&self.path).map_err(|e| Error::io(&self.path, e))?;
        }
        info!("removed ledger '{}'", self.path.display());
        Ok(true)
    }

    /// Current entries in file order. Empty when tracking is disabled.
    pub fn entries(&self) -> Result<Vec<String>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    /// Record `id` as managed.
    ///
    /// Silent no-op while tracking is disabled (the ledger was never turned
    /// on) or when the entry is already present; otherwise appends a line.
    pub fn add_entry(&self, id: &str) -> Result<bool> {
        if !self.path.is_file() {
            return Ok(false);
        }

        let entries = self.entries()?;
        if entries.iter().any(|entry| entry == id) {
            return Ok(false);
        }

        if !self.dry_run {
            let mut file = fs::OpenOptions::new()
                .append(true)
                .open(&self.path)
                .map_err(|e| Error::io(&self.path, e))?;
            writeln!(file, "{}", id).map_err(|e| Error::io(&self.path, e))?;
        }
        debug!("registered '{}' in '{}'", id, self.path.display());
        Ok(true)
    }

    /// Drop the first occurrence of `id` from the ledger.
    ///
    /// The file is rewritten from the surviving entries in their original
    /// order. No-op when tracking is disabled or the entry is absent.
    pub fn remove_entry(&self, id: &str) -> Result<bool> {
        if !self.path.is_file() {
            return Ok(false);
        }

        let mut entries = self.entries()?;
        let found = match entries.iter().position(|entry| entry == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        };

        if found && !self.dry_run {
            let mut content = entries.join("\n");
            if !content.is_empty() {
                content.push('\n');
            }
            fs::write(&self.path, content).map_err(|e| Error::io(&self.path, e))?;
            debug!("unregistered '{}' from '{}'", id, self.path.display());
        }

        Ok(found)
    }

    /// Delete every repo file in `reposdir` that is neither managed nor in
    /// `exempt`, unregistering each deleted file's id as it goes.
    ///
    /// No-op while tracking is disabled. Returns true when at least one
    /// file was (or, under dry-run, would have been) deleted.
    pub fn sweep(&self, reposdir: &Path, exempt: &[String]) -> Result<bool> {
        if !self.path.is_file() {
            return Ok(false);
        }

        let entries = self.entries()?;
        let pattern = format!("{}/*{}", reposdir.display(), REPO_SUFFIX);
        let paths = glob::glob(&pattern).map_err(|e| Error::Io {
            path: reposdir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()),
        })?;

        let mut changed = false;
        for entry in paths {
            let path = entry.map_err(|e| Error::io(reposdir, e.into_error()))?;
            let id = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };

            if entries.iter().any(|entry| *entry == id) || exempt.iter().any(|e| *e == id) {
                continue;
            }

            if !self.dry_run {
                fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
                self.remove_entry(&id)?;
            }
            info!("deleted unmanaged repo file '{}'", path.display());
            changed = true;
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger(temp: &TempDir) -> ManagedLedger {
        ManagedLedger::new(temp.path(), false)
    }

    fn dry_ledger(temp: &TempDir) -> ManagedLedger {
        ManagedLedger::new(temp.path(), true)
    }

    mod enable_disable_tests {
        use super::*;

        #[test]
        fn test_enable_creates_empty_file() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);

            assert!(!ledger.is_enabled());
            assert!(ledger.enable().unwrap());
            assert!(ledger.is_enabled());
            assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "");
        }

        #[test]
        fn test_enable_twice_second_is_unchanged() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            assert!(ledger.enable().unwrap());
            assert!(!ledger.enable().unwrap());
        }

        #[test]
        fn test_enable_truncates_non_empty_ledger() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            ledger.add_entry("epel").unwrap();

            assert!(ledger.enable().unwrap());
            assert!(ledger.entries().unwrap().is_empty());
        }

        #[test]
        fn test_disable_removes_file() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();

            assert!(ledger.disable().unwrap());
            assert!(!ledger.is_enabled());
            // second disable is a no-op
            assert!(!ledger.disable().unwrap());
        }

        #[test]
        fn test_enable_dry_run_reports_without_creating() {
            let temp = TempDir::new().unwrap();
            let ledger = dry_ledger(&temp);
            assert!(ledger.enable().unwrap());
            assert!(!ledger.is_enabled());
        }

        #[test]
        fn test_disable_dry_run_reports_without_deleting() {
            let temp = TempDir::new().unwrap();
            ledger(&temp).enable().unwrap();

            let dry = dry_ledger(&temp);
            assert!(dry.disable().unwrap());
            assert!(dry.is_enabled());
        }
    }

    mod entry_tests {
        use super::*;

        #[test]
        fn test_add_entry_appends_line() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();

            assert!(ledger.add_entry("epel").unwrap());
            assert!(ledger.add_entry("docker").unwrap());
            assert_eq!(ledger.entries().unwrap(), vec!["epel", "docker"]);
            assert_eq!(
                fs::read_to_string(ledger.path()).unwrap(),
                "epel\ndocker\n"
            );
        }

        #[test]
        fn test_add_entry_duplicate_is_unchanged() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            ledger.add_entry("epel").unwrap();

            assert!(!ledger.add_entry("epel").unwrap());
            assert_eq!(ledger.entries().unwrap(), vec!["epel"]);
        }

        #[test]
        fn test_add_entry_while_disabled_is_silent_noop() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            assert!(!ledger.add_entry("epel").unwrap());
            assert!(!ledger.is_enabled());
        }

        #[test]
        fn test_remove_entry_preserves_order_of_rest() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            for id in ["a", "b", "c"] {
                ledger.add_entry(id).unwrap();
            }

            assert!(ledger.remove_entry("b").unwrap());
            assert_eq!(ledger.entries().unwrap(), vec!["a", "c"]);
        }

        #[test]
        fn test_remove_entry_missing_is_unchanged() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            ledger.add_entry("a").unwrap();

            assert!(!ledger.remove_entry("zzz").unwrap());
            assert_eq!(ledger.entries().unwrap(), vec!["a"]);
        }

        #[test]
        fn test_remove_entry_while_disabled_is_noop() {
            let temp = TempDir::new().unwrap();
            assert!(!ledger(&temp).remove_entry("a").unwrap());
        }

        #[test]
        fn test_remove_last_entry_leaves_empty_file() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            ledger.add_entry("a").unwrap();

            assert!(ledger.remove_entry("a").unwrap());
            assert!(ledger.is_enabled());
            assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "");
        }

        #[test]
        fn test_add_and_remove_dry_run_do_not_touch_file() {
            let temp = TempDir::new().unwrap();
            ledger(&temp).enable().unwrap();
            ledger(&temp).add_entry("a").unwrap();

            let dry = dry_ledger(&temp);
            assert!(dry.add_entry("b").unwrap());
            assert!(dry.remove_entry("a").unwrap());
            assert_eq!(fs::read_to_string(dry.path()).unwrap(), "a\n");
        }
    }

    mod sweep_tests {
        use super::*;

        fn touch_repo(temp: &TempDir, id: &str) {
            fs::write(
                temp.path().join(format!("{}.repo", id)),
                format!("[{}]\nbaseurl = https://example.com\n", id),
            )
            .unwrap();
        }

        #[test]
        fn test_sweep_deletes_only_unmanaged_unexempted() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            ledger.add_entry("a").unwrap();
            touch_repo(&temp, "a");
            touch_repo(&temp, "b");
            touch_repo(&temp, "c");

            let changed = ledger.sweep(temp.path(), &["b".to_string()]).unwrap();

            assert!(changed);
            assert!(temp.path().join("a.repo").exists());
            assert!(temp.path().join("b.repo").exists());
            assert!(!temp.path().join("c.repo").exists());
        }

        #[test]
        fn test_sweep_nothing_to_delete_is_unchanged() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            ledger.add_entry("a").unwrap();
            touch_repo(&temp, "a");

            assert!(!ledger.sweep(temp.path(), &[]).unwrap());
            assert!(temp.path().join("a.repo").exists());
        }

        #[test]
        fn test_sweep_while_disabled_is_noop() {
            let temp = TempDir::new().unwrap();
            touch_repo(&temp, "stray");

            assert!(!ledger(&temp).sweep(temp.path(), &[]).unwrap());
            assert!(temp.path().join("stray.repo").exists());
        }

        #[test]
        fn test_sweep_leaves_ledger_entries_for_kept_files() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            ledger.add_entry("keep").unwrap();
            touch_repo(&temp, "keep");
            touch_repo(&temp, "stray");

            ledger.sweep(temp.path(), &[]).unwrap();
            assert_eq!(ledger.entries().unwrap(), vec!["keep"]);
        }

        #[test]
        fn test_sweep_dry_run_reports_without_deleting() {
            let temp = TempDir::new().unwrap();
            ledger(&temp).enable().unwrap();
            touch_repo(&temp, "stray");

            let dry = dry_ledger(&temp);
            assert!(dry.sweep(temp.path(), &[]).unwrap());
            assert!(temp.path().join("stray.repo").exists());
        }

        #[test]
        fn test_sweep_ignores_non_repo_files() {
            let temp = TempDir::new().unwrap();
            let ledger = ledger(&temp);
            ledger.enable().unwrap();
            fs::write(temp.path().join("notes.txt"), "keep me").unwrap();

            assert!(!ledger.sweep(temp.path(), &[]).unwrap());
            assert!(temp.path().join("notes.txt").exists());
        }
    }
}
