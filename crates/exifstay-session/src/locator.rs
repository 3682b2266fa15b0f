//! Executable lookup on a search path, independent of any session.

use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Resolves `name` to an executable path.
///
/// A `name` that already contains a path separator is checked as is.
/// Otherwise every entry of `search_path` (or of `PATH` when `None`) is
/// probed in order and the first executable match is returned. Not finding
/// the binary is an ordinary outcome and yields `None`.
///
/// # Examples
///
/// ```no_run
/// use exifstay_session::find_executable;
///
/// assert!(find_executable("sh", None).is_some());
/// assert!(find_executable("exiftool", Some("/".as_ref())).is_none());
/// ```
#[must_use]
pub fn find_executable(name: impl AsRef<OsStr>, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let tool = name.as_ref();
    if tool.is_empty() {
        return None;
    }

    match search_path {
        None => which::which(tool).ok(),
        Some(directories) => {
            let cwd = env::current_dir().unwrap_or_default();
            which::which_in(tool, Some(directories), cwd).ok()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    struct ToolDir {
        dir: TempDir,
    }

    impl ToolDir {
        fn with_file(self, name: &str, mode: u32) -> Self {
            let path = self.dir.path().join(name);
            fs::write(&path, "#!/bin/sh\n").expect("write stand-in tool");
            fs::set_permissions(&path, fs::Permissions::from_mode(mode))
                .expect("set stand-in tool permissions");
            self
        }

        fn search_path(&self) -> &OsStr {
            self.dir.path().as_os_str()
        }
    }

    #[fixture]
    fn tool_dir() -> ToolDir {
        ToolDir {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    #[rstest]
    fn finds_executable_in_explicit_search_path(tool_dir: ToolDir) {
        let tools = tool_dir.with_file("exiftool", 0o755);

        let found = find_executable("exiftool", Some(tools.search_path()));

        assert_eq!(found, Some(tools.dir.path().join("exiftool")));
    }

    #[rstest]
    fn skips_files_without_execute_permission(tool_dir: ToolDir) {
        let tools = tool_dir.with_file("exiftool", 0o644);

        assert_eq!(find_executable("exiftool", Some(tools.search_path())), None);
    }

    #[rstest]
    fn skips_directories_named_like_the_tool(tool_dir: ToolDir) {
        fs::create_dir(tool_dir.dir.path().join("exiftool")).expect("create directory");

        assert_eq!(
            find_executable("exiftool", Some(tool_dir.search_path())),
            None
        );
    }

    #[rstest]
    fn returns_first_match_in_search_order() {
        let first = tool_dir().with_file("exiftool", 0o755);
        let second = tool_dir().with_file("exiftool", 0o755);
        let joined = env::join_paths([first.dir.path(), second.dir.path()])
            .expect("join search path");

        let found = find_executable("exiftool", Some(joined.as_os_str()));

        assert_eq!(found, Some(first.dir.path().join("exiftool")));
    }

    #[rstest]
    fn root_only_search_path_finds_nothing() {
        assert_eq!(find_executable("exiftool", Some(OsStr::new("/"))), None);
    }

    #[rstest]
    fn default_search_path_finds_a_shell() {
        assert!(find_executable("sh", None).is_some());
    }

    #[rstest]
    fn paths_with_separators_are_checked_directly(tool_dir: ToolDir) {
        let tools = tool_dir.with_file("exiftool", 0o755);
        let direct = tools.dir.path().join("exiftool");

        assert_eq!(
            find_executable(&direct, Some(OsStr::new("/"))),
            Some(direct.clone())
        );
        assert_eq!(find_executable(tools.dir.path().join("missing"), None), None);
    }

    #[rstest]
    fn empty_names_are_never_found() {
        assert_eq!(find_executable("", None), None);
    }
}
