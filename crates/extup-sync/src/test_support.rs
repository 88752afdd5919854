//! Fake git backend for tests: a shell script run through `sh`, selected by
//! `Git::with_options`, so no network or real repository is needed.

use std::path::Path;

use crate::git_ops::Git;

#[derive(Debug, Clone, Copy)]
pub enum FakeRemote {
    /// `fetch --dry-run` prints ref updates on stderr.
    HasChanges,
    /// `fetch --dry-run` prints nothing.
    Unchanged,
    /// Every command fails with exit status 128.
    Broken,
}

/// Write a fake git script into `dir` and return a [`Git`] that runs it.
///
/// Every invocation appends its arguments to `calls.log` in the working directory.
pub fn fake_git(dir: &Path, remote: FakeRemote) -> Git {
    let body = match remote {
        FakeRemote::HasChanges => {
            r#"if [ "$*" = "fetch --dry-run" ]; then
  echo "From https://example.com/ext" >&2
  echo "   1a2b3c4..5d6e7f8  main       -> origin/main" >&2
fi
exit 0"#
        }
        FakeRemote::Unchanged => "exit 0",
        FakeRemote::Broken => {
            r#"echo "fatal: 'origin' does not appear to be a git repository" >&2
exit 128"#
        }
    };
    let script = format!("echo \"$*\" >> calls.log\n{body}\n");
    let path = dir.join(format!("fake-git-{remote:?}.sh"));
    std::fs::write(&path, script).unwrap();
    Git::new("sh").with_options(vec![path.to_string_lossy().to_string()])
}

/// Commands the fake git recorded in `dir`, one per invocation.
pub fn recorded_calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
