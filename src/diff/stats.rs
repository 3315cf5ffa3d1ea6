//! Summary statistics over unified diff text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex_lite::Regex;

static HUNK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -\d+(?:,(\d+))? \+\d+(?:,(\d+))? @@").expect("hunk pattern is a valid regex")
});

/// Counts and touched paths derived from a unified diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub files_changed: usize,
    pub additions: usize,
    pub deletions: usize,
    /// Every path named by a file header, old and new sides, without `a/`/`b/`.
    pub paths: BTreeSet<String>,
}

/// Where the parser is within the current file section.
#[derive(Debug, Clone, Copy)]
enum Section {
    /// Between `diff --git` (or the start of input) and the first `@@`.
    Header,
    /// Inside a hunk whose header gave line counts.
    Hunk { old_left: usize, new_left: usize },
    /// Inside a hunk whose header could not be read; every `+`/`-` line
    /// that is not a `+++`/`---` marker counts as content.
    Unsized,
}

impl DiffStats {
    /// Parse `git diff --cached` style output.
    ///
    /// File count is the number of `diff --git` headers. Plain unified diffs
    /// without git headers are counted by their `+++` header lines instead.
    /// `+++`/`---` lines count as headers only outside hunks, so an added line
    /// whose own text starts with `++` is still an addition.
    pub fn from_diff(diff: &str) -> Self {
        let mut stats = DiffStats::default();
        let mut git_headers = 0usize;
        let mut plain_headers = 0usize;
        let mut section = Section::Header;

        for line in diff.lines() {
            if let Some(rest) = line.strip_prefix("diff --git ") {
                git_headers += 1;
                stats.record_git_header_paths(rest);
                section = Section::Header;
                continue;
            }

            if line.starts_with("@@") {
                section = parse_hunk_header(line);
                continue;
            }

            section = match section {
                Section::Header => {
                    if let Some(path) = line.strip_prefix("+++ ") {
                        plain_headers += 1;
                        stats.record_header_path(path);
                    } else if let Some(path) = line.strip_prefix("--- ") {
                        stats.record_header_path(path);
                    }
                    Section::Header
                }
                Section::Hunk { old_left, new_left } => {
                    let (old_left, new_left) = stats.count_sized_line(line, old_left, new_left);
                    if old_left == 0 && new_left == 0 {
                        Section::Header
                    } else {
                        Section::Hunk { old_left, new_left }
                    }
                }
                Section::Unsized => {
                    if line.starts_with('+') && !line.starts_with("+++") {
                        stats.additions += 1;
                    } else if line.starts_with('-') && !line.starts_with("---") {
                        stats.deletions += 1;
                    }
                    Section::Unsized
                }
            };
        }

        stats.files_changed = if git_headers > 0 { git_headers } else { plain_headers };
        stats
    }

    /// A touched path ends in `.md`/`.txt` or contains `README`.
    pub fn touches_docs(&self) -> bool {
        self.paths
            .iter()
            .any(|p| p.ends_with(".md") || p.ends_with(".txt") || p.contains("README"))
    }

    /// A touched path contains `test` or `spec`.
    pub fn touches_tests(&self) -> bool {
        self.paths
            .iter()
            .any(|p| p.contains("test") || p.contains("spec"))
    }

    fn count_sized_line(&mut self, line: &str, old_left: usize, new_left: usize) -> (usize, usize) {
        match line.as_bytes().first() {
            Some(b'+') => {
                self.additions += 1;
                (old_left, new_left.saturating_sub(1))
            }
            Some(b'-') => {
                self.deletions += 1;
                (old_left.saturating_sub(1), new_left)
            }
            // "\ No newline at end of file"
            Some(b'\\') => (old_left, new_left),
            // Context line; some tools strip the leading space of blank ones.
            _ => (old_left.saturating_sub(1), new_left.saturating_sub(1)),
        }
    }

    fn record_git_header_paths(&mut self, rest: &str) {
        let rest = rest.trim();
        let pair = rest
            .strip_prefix("a/")
            .and_then(|r| r.split_once(" b/"))
            .or_else(|| rest.split_once(' '));
        if let Some((old, new)) = pair {
            self.insert_path(old);
            self.insert_path(new);
        }
    }

    fn record_header_path(&mut self, raw: &str) {
        // Drop an optional tab-separated timestamp.
        let raw = raw.split('\t').next().unwrap_or(raw).trim();
        if raw == "/dev/null" {
            return;
        }
        let path = raw
            .strip_prefix("a/")
            .or_else(|| raw.strip_prefix("b/"))
            .unwrap_or(raw);
        self.insert_path(path);
    }

    fn insert_path(&mut self, path: &str) {
        let path = path.trim().trim_matches('"');
        if !path.is_empty() {
            self.paths.insert(path.to_string());
        }
    }
}

fn parse_hunk_header(line: &str) -> Section {
    let Some(caps) = HUNK_RE.captures(line) else {
        return Section::Unsized;
    };
    let count = |idx: usize| -> Option<usize> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };
    match (count(1), count(2)) {
        (Some(0), Some(0)) => Section::Header,
        (Some(old_left), Some(new_left)) => Section::Hunk { old_left, new_left },
        _ => Section::Unsized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FILE_DIFF: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 83db48f..bf269f4 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@
 pub mod a;
-pub mod b;
+pub mod c;
+pub mod d;
 pub mod e;
diff --git a/src/new.rs b/src/new.rs
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/src/new.rs
@@ -0,0 +1,2 @@
+fn one() {}
+fn two() {}
";

    #[test]
    fn test_counts_files_and_lines() {
        let stats = DiffStats::from_diff(TWO_FILE_DIFF);
        assert_eq!(stats.files_changed, 2);
        assert_eq!(stats.additions, 4);
        assert_eq!(stats.deletions, 1);
    }

    #[test]
    fn test_collects_paths_without_prefixes() {
        let stats = DiffStats::from_diff(TWO_FILE_DIFF);
        let paths: Vec<&str> = stats.paths.iter().map(String::as_str).collect();
        assert_eq!(paths, vec!["src/lib.rs", "src/new.rs"]);
    }

    #[test]
    fn test_empty_diff_is_all_zero() {
        assert_eq!(DiffStats::from_diff(""), DiffStats::default());
    }

    #[test]
    fn test_content_lines_that_look_like_markers_are_counted() {
        let diff = "\
diff --git a/notes.rs b/notes.rs
--- a/notes.rs
+++ b/notes.rs
@@ -1,2 +1,2 @@
---- old separator
+++++ new separator
 unchanged
";
        let stats = DiffStats::from_diff(diff);
        assert_eq!(stats.additions, 1);
        assert_eq!(stats.deletions, 1);
    }

    #[test]
    fn test_no_newline_marker_is_ignored() {
        let diff = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -1 +1 @@
-old
\\ No newline at end of file
+new
\\ No newline at end of file
";
        let stats = DiffStats::from_diff(diff);
        assert_eq!((stats.additions, stats.deletions), (1, 1));
    }

    #[test]
    fn test_plain_unified_diff_counts_plus_headers() {
        let diff = "\
--- a/one.rs\t2024-01-01 00:00:00
+++ b/one.rs\t2024-01-01 00:00:01
@@ -1 +1,2 @@
 keep
+add
--- a/two.rs
+++ b/two.rs
@@ -1,2 +1 @@
 keep
-drop
";
        let stats = DiffStats::from_diff(diff);
        assert_eq!(stats.files_changed, 2);
        assert_eq!(stats.additions, 1);
        assert_eq!(stats.deletions, 1);
        assert!(stats.paths.contains("one.rs"));
        assert!(stats.paths.contains("two.rs"));
    }

    #[test]
    fn test_malformed_hunk_header_still_counts_lines() {
        let diff = "\
diff --git a/x.rs b/x.rs
--- a/x.rs
+++ b/x.rs
@@ garbage @@
+one
+two
-three
";
        let stats = DiffStats::from_diff(diff);
        assert_eq!((stats.additions, stats.deletions), (2, 1));
    }

    #[test]
    fn test_binary_file_counts_as_file_without_lines() {
        let diff = "\
diff --git a/logo.png b/logo.png
new file mode 100644
index 0000000..1b2c3d4
Binary files /dev/null and b/logo.png differ
";
        let stats = DiffStats::from_diff(diff);
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.additions, 0);
        assert!(stats.paths.contains("logo.png"));
    }

    #[test]
    fn test_rename_records_both_paths() {
        let diff = "\
diff --git a/docs/old.rs b/src/new.rs
similarity index 100%
rename from docs/old.rs
rename to src/new.rs
";
        let stats = DiffStats::from_diff(diff);
        assert!(stats.paths.contains("docs/old.rs"));
        assert!(stats.paths.contains("src/new.rs"));
    }

    #[test]
    fn test_docs_and_tests_markers() {
        let docs = DiffStats::from_diff("diff --git a/README b/README\n");
        assert!(docs.touches_docs());
        assert!(!docs.touches_tests());

        let notes = DiffStats::from_diff("diff --git a/notes.txt b/notes.txt\n");
        assert!(notes.touches_docs());

        let tests = DiffStats::from_diff("diff --git a/tests/api_test.rs b/tests/api_test.rs\n");
        assert!(tests.touches_tests());
        assert!(!tests.touches_docs());

        let spec = DiffStats::from_diff("diff --git a/app/spec/user.rb b/app/spec/user.rb\n");
        assert!(spec.touches_tests());

        let code = DiffStats::from_diff("diff --git a/src/main.rs b/src/main.rs\n");
        assert!(!code.touches_docs());
        assert!(!code.touches_tests());
    }

    #[test]
    fn test_markers_only_look_at_paths() {
        let diff = "\
diff --git a/src/main.rs b/src/main.rs
--- a/src/main.rs
+++ b/src/main.rs
@@ -1 +1 @@
-// see README.md
+// run the test suite
";
        let stats = DiffStats::from_diff(diff);
        assert!(!stats.touches_docs());
        assert!(!stats.touches_tests());
    }
}
