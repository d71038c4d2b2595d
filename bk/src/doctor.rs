//! Path diagnostic for the block definition search paths.
//!
//! One-shot check: for each configured path, report whether it exists,
//! whether it is a directory, and a per-file parse/validate verdict for
//! the YAML definitions inside. The report is pure data; the binary is
//! responsible for rendering it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::blocks::BlockDef;
use crate::config::Config;

/// Verdict for one definition file.
#[derive(Debug, Clone, Serialize)]
pub struct FileCheck {
    pub path: PathBuf,
    pub ok: bool,
    pub error: Option<String>,
}

/// Verdict for one search path.
#[derive(Debug, Clone, Serialize)]
pub struct PathCheck {
    pub path: PathBuf,
    pub exists: bool,
    pub is_dir: bool,
    pub files: Vec<FileCheck>,
    pub error: Option<String>,
}

/// The full diagnostic report.
#[derive(Debug, Clone, Serialize)]
pub struct PathReport {
    pub builtin_enabled: bool,
    pub paths: Vec<PathCheck>,
}

impl PathReport {
    /// True if at least one source of block definitions is usable.
    pub fn usable(&self) -> bool {
        self.builtin_enabled || self.paths.iter().any(|p| p.files.iter().any(|f| f.ok))
    }
}

/// Check every configured block definition path.
pub fn check_paths(config: &Config) -> PathReport {
    PathReport {
        builtin_enabled: config.blocks.use_builtin(),
        paths: config
            .blocks
            .expanded_paths()
            .iter()
            .map(|p| check_path(p))
            .collect(),
    }
}

fn check_path(path: &Path) -> PathCheck {
    let exists = path.exists();
    let is_dir = path.is_dir();
    let mut files = Vec::new();
    let mut error = None;

    if is_dir {
        match fs::read_dir(path) {
            Ok(entries) => {
                for entry in entries.filter_map(|e| e.ok()) {
                    let file_path = entry.path();
                    if file_path
                        .extension()
                        .map(|e| e == "yml" || e == "yaml")
                        .unwrap_or(false)
                    {
                        files.push(check_file(&file_path));
                    }
                }
                files.sort_by(|a, b| a.path.cmp(&b.path));
            }
            Err(e) => error = Some(e.to_string()),
        }
    }

    PathCheck {
        path: path.to_path_buf(),
        exists,
        is_dir,
        files,
        error,
    }
}

fn check_file(path: &Path) -> FileCheck {
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("block");
    let result = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_yaml::from_str::<BlockDef>(&content).map_err(|e| e.to_string()))
        .and_then(|def| def.compile(name).map(|_| ()).map_err(|e| e.to_string()));

    match result {
        Ok(()) => FileCheck {
            path: path.to_path_buf(),
            ok: true,
            error: None,
        },
        Err(e) => FileCheck {
            path: path.to_path_buf(),
            ok: false,
            error: Some(e),
        },
    }
}
