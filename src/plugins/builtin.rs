//! Filters and openers shipped with ticklet

use super::spawn::Invocation;
use super::{Filter, OpenRequest, Opener};
use crate::error::Result;
use git2::Repository;
use std::ffi::OsString;
use std::path::PathBuf;

/// Adds the working tree root of every referenced file's git repository to
/// the directory set
pub struct GitFilter;

impl Filter for GitFilter {
    fn filter(&self, mut request: OpenRequest) -> Result<OpenRequest> {
        let roots: Vec<_> = request
            .files
            .iter()
            .filter_map(|file| file.parent())
            .filter_map(|dir| match Repository::discover(dir) {
                Ok(repo) => repo.workdir().map(|w| w.to_path_buf()),
                Err(e) => {
                    tracing::debug!("No git repository for {}: {}", dir.display(), e.message());
                    None
                },
            })
            .collect();

        for root in roots {
            // workdir() carries a trailing separator
            let root: PathBuf = root.components().collect();
            request.push_directory(root);
        }
        Ok(request)
    }
}

/// Opener that launches a fixed plan of programs
pub struct CommandOpener {
    plan: fn(&OpenRequest) -> Vec<Invocation>,
}

impl CommandOpener {
    pub const fn new(plan: fn(&OpenRequest) -> Vec<Invocation>) -> Self {
        Self { plan }
    }

    #[must_use]
    pub fn plan(&self, request: &OpenRequest) -> Vec<Invocation> {
        (self.plan)(request)
    }
}

impl Opener for CommandOpener {
    fn open(&self, request: &OpenRequest) -> Result<()> {
        for invocation in self.plan(request) {
            invocation.spawn_detached()?;
        }
        Ok(())
    }
}

/// Maximum number of files shown side by side in one vim window
const VIM_FILES_PER_WINDOW: usize = 3;

/// `vim -O` in terminal windows, a few files per window
pub fn vim(request: &OpenRequest) -> Vec<Invocation> {
    request
        .files
        .chunks(VIM_FILES_PER_WINDOW)
        .map(|files| {
            Invocation::new("gnome-terminal")
                .args(["--", "vim", "-O"])
                .args(files.iter().map(|f| f.as_os_str().to_owned()))
        })
        .collect()
}

fn terminal_tabs(request: &OpenRequest) -> Vec<OsString> {
    request
        .directories
        .iter()
        .flat_map(|dir| {
            [
                OsString::from("--tab"),
                OsString::from("--working-directory"),
                dir.as_os_str().to_owned(),
            ]
        })
        .collect()
}

/// One gnome-terminal tab per directory
pub fn gnome_terminal(request: &OpenRequest) -> Vec<Invocation> {
    if request.directories.is_empty() {
        return Vec::new();
    }
    vec![
        Invocation::new("gnome-terminal")
            .args(["--geometry", "80x88+0+0"])
            .args(terminal_tabs(request)),
    ]
}

/// xfce4-terminal with the first directory in the window and the rest as tabs
pub fn xfce4_terminal(request: &OpenRequest) -> Vec<Invocation> {
    if request.directories.is_empty() {
        return Vec::new();
    }
    let tabs = terminal_tabs(request);
    vec![Invocation::new("xfce4-terminal").args(tabs.into_iter().skip(1))]
}

/// Sublime Text with every file and directory
pub fn sublime(request: &OpenRequest) -> Vec<Invocation> {
    let paths = request.files.iter().chain(&request.directories);
    vec![Invocation::new("subl").args(paths.map(|p| p.as_os_str().to_owned()))]
}

/// Nemo file manager on every directory
pub fn nemo(request: &OpenRequest) -> Vec<Invocation> {
    if request.directories.is_empty() {
        return Vec::new();
    }
    vec![Invocation::new("nemo").args(request.directories.iter().map(|d| d.as_os_str().to_owned()))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn request(files: &[&str], directories: &[&str]) -> OpenRequest {
        OpenRequest {
            files: files.iter().map(PathBuf::from).collect(),
            directories: directories.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn test_vim_groups_files() {
        let invocations = vim(&request(&["a", "b", "c", "d"], &[]));
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0].program, "gnome-terminal");
        assert_eq!(invocations[0].args, vec!["--", "vim", "-O", "a", "b", "c"]);
        assert_eq!(invocations[1].args, vec!["--", "vim", "-O", "d"]);

        assert!(vim(&request(&[], &["/t"])).is_empty());
    }

    #[test]
    fn test_gnome_terminal_tabs() {
        let invocations = gnome_terminal(&request(&[], &["/t", "/repo"]));
        assert_eq!(
            invocations[0].args,
            vec![
                "--geometry",
                "80x88+0+0",
                "--tab",
                "--working-directory",
                "/t",
                "--tab",
                "--working-directory",
                "/repo",
            ]
        );
    }

    #[test]
    fn test_xfce4_terminal_first_directory_in_window() {
        let invocations = xfce4_terminal(&request(&[], &["/t", "/repo"]));
        assert_eq!(
            invocations[0].args,
            vec![
                "--working-directory",
                "/t",
                "--tab",
                "--working-directory",
                "/repo",
            ]
        );
        assert!(xfce4_terminal(&request(&["/f"], &[])).is_empty());
    }

    #[test]
    fn test_sublime_and_nemo() {
        let req = request(&["/t/notes.md"], &["/t"]);
        assert_eq!(sublime(&req)[0].args, vec!["/t/notes.md", "/t"]);
        assert_eq!(nemo(&req)[0].program, "nemo");
        assert_eq!(nemo(&req)[0].args, vec!["/t"]);
    }

    #[test]
    fn test_git_filter_adds_repository_root() {
        let dir = TempDir::new().unwrap();
        let repo_root = dir.path().join("project");
        std::fs::create_dir_all(repo_root.join("src")).unwrap();
        Repository::init(&repo_root).unwrap();

        let outside = dir.path().join("loose");
        std::fs::create_dir_all(&outside).unwrap();

        let req = OpenRequest {
            files: vec![repo_root.join("src/main.rs"), outside.join("file.txt")],
            directories: vec![dir.path().to_path_buf()],
        };
        let filtered = GitFilter.filter(req).unwrap();

        let expected_root = repo_root.canonicalize().unwrap();
        assert!(
            filtered
                .directories
                .iter()
                .any(|d| d.canonicalize().ok() == Some(expected_root.clone()))
        );
        assert_eq!(filtered.files.len(), 2);
    }
}
