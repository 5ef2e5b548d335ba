//! Context types for rule execution.

use std::path::{Path, PathBuf};

/// Context provided to per-file rules.
///
/// Carries metadata about the file being analyzed; the source content is
/// needed by suppression handling and offset calculation.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the lint root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
        }
    }

    /// Calculates the byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 0-indexed column offset
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.lines().enumerate() {
            if i + 1 == line {
                return offset + column;
            }
            offset += line_content.len() + 1; // +1 for newline
        }

        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_strips_root() {
        let ctx = FileContext::new(Path::new("/work/src/agent.py"), "", Path::new("/work"));
        assert_eq!(ctx.relative_path, PathBuf::from("src/agent.py"));
    }

    #[test]
    fn relative_path_falls_back_to_full_path() {
        let ctx = FileContext::new(Path::new("/elsewhere/agent.py"), "", Path::new("/work"));
        assert_eq!(ctx.relative_path, PathBuf::from("/elsewhere/agent.py"));
    }

    #[test]
    fn test_offset_calculation() {
        let content = "line1\nline2\nline3";
        let ctx = FileContext::new(Path::new("test.py"), content, Path::new("."));

        assert_eq!(ctx.offset_for(1, 0), 0); // Start of line 1
        assert_eq!(ctx.offset_for(2, 0), 6); // Start of line 2
        assert_eq!(ctx.offset_for(2, 2), 8); // "ne" in line2
        assert_eq!(ctx.offset_for(0, 5), 0); // Out of bounds
    }
}
