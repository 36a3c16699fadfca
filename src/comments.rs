//! Comment extraction and position-based lookup.
//!
//! `syn` drops plain `//` and `/* */` comments, so the unit index recovers
//! them with a small character scanner that tracks string state (a `//`
//! inside a string literal is not a comment). Doc comments (`///`, `//!`)
//! are excluded here — they reach the index structurally as `#[doc]`
//! attributes on the item they document.

use std::collections::HashSet;

/// Line/column source position, ordered lexicographically.
///
/// Lines are 1-based and columns 0-based, matching proc-macro2 span
/// locations, so scanner positions and expression spans compare directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl From<proc_macro2::LineColumn> for Pos {
    fn from(lc: proc_macro2::LineColumn) -> Pos {
        Pos {
            line: lc.line,
            column: lc.column,
        }
    }
}

/// One comment block: either a run of consecutive full-line `//` comments or
/// a single `/* */` block.
#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub start: Pos,
    pub end: Pos,
}

/// All comment blocks of one compilation unit, sorted by end position.
#[derive(Debug, Default)]
pub struct CommentList {
    comments: Vec<Comment>,
}

/// Comment blocks already attached to a node. Threaded through the walk so
/// a block can never document two unrelated fields.
#[derive(Debug, Default)]
pub struct Claimed {
    indices: HashSet<usize>,
}

impl CommentList {
    pub fn scan(source: &str) -> CommentList {
        let mut comments = Scanner::new(source).scan();
        comments.sort_by_key(|c| c.end);
        CommentList { comments }
    }

    /// Find the unclaimed comment that most tightly precedes `pos`: start and
    /// end both strictly before the position, greatest end wins. The match is
    /// claimed before it is returned.
    pub fn locate(&self, pos: Pos, claimed: &mut Claimed) -> Option<&str> {
        let mut best = None;
        for (idx, c) in self.comments.iter().enumerate() {
            if claimed.indices.contains(&idx) {
                continue;
            }
            // Sorted by end ascending, so the last candidate is the tightest.
            if c.start < pos && c.end < pos {
                best = Some(idx);
            }
        }
        let idx = best?;
        claimed.indices.insert(idx);
        Some(&self.comments[idx].text)
    }
}

// -- Scanner ------------------------------------------------------------------

struct Scanner {
    chars: Vec<char>,
    i: usize,
    line: usize,
    col: usize,
}

impl Scanner {
    fn new(source: &str) -> Scanner {
        Scanner {
            chars: source.chars().collect(),
            i: 0,
            line: 1,
            col: 0,
        }
    }

    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.i + n).copied()
    }

    fn prev(&self) -> Option<char> {
        if self.i == 0 {
            None
        } else {
            Some(self.chars[self.i - 1])
        }
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.col,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.get(self.i).copied()?;
        self.i += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn scan(mut self) -> Vec<Comment> {
        let mut comments: Vec<Comment> = Vec::new();
        // Whether code appeared on the current line before the scan position;
        // a comment with code before it is trailing and never groups.
        let mut line_has_code = false;
        // Whether the most recently pushed comment may absorb the next
        // full-line comment on the following line.
        let mut last_mergeable = false;

        while let Some(ch) = self.peek(0) {
            match ch {
                '/' if self.peek(1) == Some('/') => {
                    let start = self.pos();
                    let full_line = !line_has_code;
                    let is_doc = matches!(self.peek(2), Some('!'))
                        || (self.peek(2) == Some('/') && self.peek(3) != Some('/'));
                    self.bump();
                    self.bump();
                    let mut raw = String::new();
                    while let Some(c) = self.peek(0) {
                        if c == '\n' {
                            break;
                        }
                        raw.push(c);
                        self.bump();
                    }
                    if is_doc {
                        last_mergeable = false;
                        continue;
                    }
                    let trimmed = raw.strip_suffix('\r').unwrap_or(&raw);
                    let text = trimmed.strip_prefix(' ').unwrap_or(trimmed).to_string();
                    let end = self.pos();
                    match comments.last_mut() {
                        Some(prev)
                            if last_mergeable
                                && full_line
                                && prev.end.line + 1 == start.line =>
                        {
                            prev.text.push('\n');
                            prev.text.push_str(&text);
                            prev.end = end;
                        }
                        _ => comments.push(Comment { text, start, end }),
                    }
                    last_mergeable = full_line;
                }
                '/' if self.peek(1) == Some('*') => {
                    let start = self.pos();
                    let is_doc = matches!(self.peek(2), Some('!'))
                        || (self.peek(2) == Some('*') && self.peek(3) != Some('/'));
                    self.bump();
                    self.bump();
                    let mut raw = String::new();
                    let mut depth = 1usize;
                    while let Some(c) = self.peek(0) {
                        if c == '/' && self.peek(1) == Some('*') {
                            depth += 1;
                            raw.push('/');
                            raw.push('*');
                            self.bump();
                            self.bump();
                        } else if c == '*' && self.peek(1) == Some('/') {
                            self.bump();
                            self.bump();
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            raw.push('*');
                            raw.push('/');
                        } else {
                            raw.push(c);
                            self.bump();
                        }
                    }
                    let end = self.pos();
                    if !is_doc {
                        comments.push(Comment {
                            text: block_text(&raw),
                            start,
                            end,
                        });
                    }
                    line_has_code = true;
                    last_mergeable = false;
                }
                '"' => {
                    self.skip_string();
                    line_has_code = true;
                    last_mergeable = false;
                }
                'r' if !self.prev().is_some_and(is_ident_char) => {
                    match self.raw_string_hashes() {
                        Some(hashes) => self.skip_raw_string(hashes),
                        None => {
                            self.bump();
                        }
                    }
                    line_has_code = true;
                    last_mergeable = false;
                }
                '\'' => {
                    self.skip_char_or_lifetime();
                    line_has_code = true;
                    last_mergeable = false;
                }
                '\n' => {
                    self.bump();
                    line_has_code = false;
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                _ => {
                    self.bump();
                    line_has_code = true;
                    last_mergeable = false;
                }
            }
        }
        comments
    }

    /// Number of `#`s if the scanner sits on the `r` of a raw string opener.
    fn raw_string_hashes(&self) -> Option<usize> {
        let mut n = 0;
        while self.peek(1 + n) == Some('#') {
            n += 1;
        }
        if self.peek(1 + n) == Some('"') {
            Some(n)
        } else {
            None
        }
    }

    fn skip_string(&mut self) {
        self.bump(); // opening quote
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '"' => break,
                _ => {}
            }
        }
    }

    fn skip_raw_string(&mut self, hashes: usize) {
        self.bump(); // r
        for _ in 0..=hashes {
            self.bump(); // hashes and opening quote
        }
        while let Some(c) = self.bump() {
            if c == '"' && (0..hashes).all(|n| self.peek(n) == Some('#')) {
                for _ in 0..hashes {
                    self.bump();
                }
                break;
            }
        }
    }

    fn skip_char_or_lifetime(&mut self) {
        if self.peek(1) == Some('\\') {
            // Escaped char literal: consume until the closing quote.
            self.bump();
            while let Some(c) = self.bump() {
                match c {
                    '\\' => {
                        self.bump();
                    }
                    '\'' => break,
                    _ => {}
                }
            }
        } else if self.peek(2) == Some('\'') {
            // Plain char literal like 'a'.
            self.bump();
            self.bump();
            self.bump();
        } else {
            // Lifetime or loop label: the quote alone.
            self.bump();
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Normalize the interior of a `/* */` block: per line, drop indentation and
/// a leading `*` gutter.
fn block_text(raw: &str) -> String {
    raw.lines()
        .map(|l| {
            let l = l.trim();
            l.strip_prefix('*').map(str::trim_start).unwrap_or(l)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        let list = CommentList::scan(source);
        list.comments.iter().map(|c| c.text.clone()).collect()
    }

    #[test]
    fn single_line_comment() {
        assert_eq!(texts("// hello\nlet x = 1;\n"), vec!["hello"]);
    }

    #[test]
    fn consecutive_lines_group() {
        let src = "// first\n// second\nlet x = 1;\n";
        assert_eq!(texts(src), vec!["first\nsecond"]);
    }

    #[test]
    fn blank_line_splits_groups() {
        let src = "// first\n\n// second\n";
        assert_eq!(texts(src), vec!["first", "second"]);
    }

    #[test]
    fn code_between_splits_groups() {
        let src = "// first\nlet x = 1;\n// second\n";
        assert_eq!(texts(src), vec!["first", "second"]);
    }

    #[test]
    fn trailing_comment_does_not_group() {
        let src = "let x = 1; // trailing\n// next\n";
        assert_eq!(texts(src), vec!["trailing", "next"]);
    }

    #[test]
    fn doc_comments_excluded() {
        let src = "/// doc line\n//! inner doc\n// plain\n";
        assert_eq!(texts(src), vec!["plain"]);
    }

    #[test]
    fn comment_marker_inside_string_ignored() {
        let src = "let url = \"https://example.com\";\n// real\n";
        assert_eq!(texts(src), vec!["real"]);
    }

    #[test]
    fn comment_marker_inside_raw_string_ignored() {
        let src = "let s = r#\"// not a comment\"#;\n// real\n";
        assert_eq!(texts(src), vec!["real"]);
    }

    #[test]
    fn lifetime_does_not_open_string() {
        let src = "fn f<'a>(x: &'a str) {}\n// after lifetime\n";
        assert_eq!(texts(src), vec!["after lifetime"]);
    }

    #[test]
    fn char_literal_with_quote_escape() {
        let src = "let c = '\\'';\n// after char\n";
        assert_eq!(texts(src), vec!["after char"]);
    }

    #[test]
    fn block_comment_captured() {
        let src = "/* block\n * body */\nlet x = 1;\n";
        assert_eq!(texts(src), vec!["block\nbody"]);
    }

    #[test]
    fn positions_order_by_line() {
        let list = CommentList::scan("// a\n// b\n\n// c\n");
        assert_eq!(list.comments.len(), 2);
        assert!(list.comments[0].end < list.comments[1].start);
    }

    #[test]
    fn locate_picks_tightest_preceding() {
        let src = "// far\nlet a = 1;\n// near\nlet b = 2;\n";
        let list = CommentList::scan(src);
        let mut claimed = Claimed::default();
        let found = list.locate(Pos { line: 4, column: 4 }, &mut claimed);
        assert_eq!(found, Some("near"));
    }

    #[test]
    fn locate_ignores_later_comments() {
        let src = "let a = 1;\n// after\n";
        let list = CommentList::scan(src);
        let mut claimed = Claimed::default();
        assert_eq!(list.locate(Pos { line: 1, column: 0 }, &mut claimed), None);
    }

    #[test]
    fn locate_claims_once() {
        let src = "// only\nlet a = 1;\nlet b = 2;\n";
        let list = CommentList::scan(src);
        let mut claimed = Claimed::default();
        assert_eq!(
            list.locate(Pos { line: 2, column: 4 }, &mut claimed),
            Some("only")
        );
        // The same block must not attach to a later position as well.
        assert_eq!(list.locate(Pos { line: 3, column: 4 }, &mut claimed), None);
    }

    #[test]
    fn locate_falls_back_to_earlier_unclaimed() {
        let src = "// first\nlet a = 1;\n// second\nlet b = 2;\n";
        let list = CommentList::scan(src);
        let mut claimed = Claimed::default();
        assert_eq!(
            list.locate(Pos { line: 4, column: 0 }, &mut claimed),
            Some("second")
        );
        assert_eq!(
            list.locate(Pos { line: 4, column: 8 }, &mut claimed),
            Some("first")
        );
    }
}
