//! Minimal line-based editing buffer for the TUI.
//!
//! Holds the text and a cursor; no rendering, highlighting, or undo. Columns
//! are char indices, converted to byte offsets only at mutation sites.

use crate::complete;

const INDENT: &str = "    ";

#[derive(Debug, Clone)]
pub struct EditorBuffer {
    lines: Vec<String>,
    pub row: usize,
    pub col: usize,
}

impl Default for EditorBuffer {
    fn default() -> Self {
        // Same seed snippet the service's own page starts with.
        Self::from_text("print(\"Salom, dunyo!\")")
    }
}

fn byte_idx(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        };
        buf.set_text(text);
        buf
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|l| l.to_string()).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.row = self.lines.len() - 1;
        self.col = self.lines[self.row].chars().count();
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.row = 0;
        self.col = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = byte_idx(&self.lines[self.row], self.col);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    /// Insert a single-line string at the cursor.
    pub fn insert_str(&mut self, s: &str) {
        let at = byte_idx(&self.lines[self.row], self.col);
        self.lines[self.row].insert_str(at, s);
        self.col += s.chars().count();
    }

    pub fn insert_indent(&mut self) {
        self.insert_str(INDENT);
    }

    pub fn insert_newline(&mut self) {
        let at = byte_idx(&self.lines[self.row], self.col);
        let rest = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let at = byte_idx(&self.lines[self.row], self.col - 1);
            self.lines[self.row].remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let rest = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&rest);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_line_start(&mut self) {
        self.col = 0;
    }

    pub fn move_line_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    /// The char just left of the cursor, if any.
    pub fn char_before_cursor(&self) -> Option<char> {
        if self.col == 0 {
            return None;
        }
        self.lines[self.row].chars().nth(self.col - 1)
    }

    /// The partially-typed word ending at the cursor.
    pub fn word_before_cursor(&self) -> String {
        complete::word_before(&self.lines[self.row], self.col)
    }

    /// Replace the partially-typed word with a chosen completion.
    pub fn accept_completion(&mut self, completion: &str) {
        let word = self.word_before_cursor();
        let word_chars = word.chars().count();
        let start = byte_idx(&self.lines[self.row], self.col - word_chars);
        let end = byte_idx(&self.lines[self.row], self.col);
        self.lines[self.row].replace_range(start..end, completion);
        self.col = self.col - word_chars + completion.chars().count();
    }
}
