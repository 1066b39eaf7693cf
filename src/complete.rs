//! Prefix autocomplete over a fixed Python vocabulary.
//!
//! Matching is a case-sensitive prefix scan; suggestion order is vocabulary
//! order (keywords first, then builtins).

/// Python keywords followed by builtin identifiers, in suggestion order.
pub const PYTHON_VOCABULARY: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
    "abs", "all", "any", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod",
    "enumerate", "eval", "exec", "filter", "float", "format", "frozenset",
    "getattr", "globals", "hasattr", "hash", "help", "hex", "id", "input",
    "int", "isinstance", "issubclass", "iter", "len", "list", "locals", "map",
    "max", "memoryview", "min", "next", "object", "oct", "open", "ord", "pow",
    "print", "property", "range", "repr", "reversed", "round", "set", "setattr",
    "slice", "sorted", "staticmethod", "str", "sum", "super", "tuple", "type",
    "vars", "zip", "__import__",
];

/// Characters a partially-typed word extends over.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// All vocabulary entries starting with `word`. An empty word matches the
/// whole vocabulary (the manual-trigger case).
pub fn completions(word: &str) -> Vec<&'static str> {
    PYTHON_VOCABULARY
        .iter()
        .copied()
        .filter(|cand| cand.starts_with(word))
        .collect()
}

/// The partially-typed word ending at `col` (a char index) in `line`, i.e.
/// the longest run of word characters immediately before the cursor.
pub fn word_before(line: &str, col: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let end = col.min(chars.len());
    let mut start = end;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    chars[start..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_match_preserves_vocabulary_order() {
        assert_eq!(completions("pr"), vec!["print", "property"]);
        assert_eq!(completions("wh"), vec!["while"]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(completions("tr"), vec!["try"]);
        assert_eq!(completions("Tr"), vec!["True"]);
        assert!(completions("PRINT").is_empty());
    }

    #[test]
    fn keywords_come_before_builtins() {
        // "in" prefixes both the keyword and builtins; the keyword leads.
        let list = completions("in");
        assert_eq!(list, vec!["in", "input", "int"]);
    }

    #[test]
    fn empty_word_matches_everything() {
        assert_eq!(completions("").len(), PYTHON_VOCABULARY.len());
    }

    #[test]
    fn no_match_for_unknown_prefix() {
        assert!(completions("qz").is_empty());
    }

    #[test]
    fn word_before_scans_back_over_word_and_dot_chars() {
        assert_eq!(word_before("x = os.pa", 9), "os.pa");
        assert_eq!(word_before("print(le", 8), "le");
        assert_eq!(word_before("a + ", 4), "");
        assert_eq!(word_before("__imp", 5), "__imp");
    }

    #[test]
    fn word_before_stops_at_cursor() {
        assert_eq!(word_before("prefix", 3), "pre");
        assert_eq!(word_before("", 0), "");
        // Cursor past end of line clamps.
        assert_eq!(word_before("ab", 10), "ab");
    }
}
