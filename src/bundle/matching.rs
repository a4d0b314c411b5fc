//! Suffix token matching
//!
//! Finds the suffix token ("slot name") inside an image file name and splits
//! the name into the residual base name used for grouping.

/// Characters trimmed from the end of a residual base name
const SEPARATORS: &[char] = &['_', '-', '.', ' '];

/// A suffix token found inside a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixMatch {
    /// Index of the matching token in the token list
    pub token_index: usize,
    /// Byte offset of the match inside the file name
    pub start: usize,
    /// Byte offset one past the match
    pub end: usize,
}

impl SuffixMatch {
    /// The matched text, as written in the file name
    #[must_use]
    pub fn matched<'a>(&self, filename: &'a str) -> &'a str {
        &filename[self.start..self.end]
    }

    /// Text before the match with trailing separators removed
    #[must_use]
    pub fn head<'a>(&self, filename: &'a str) -> &'a str {
        filename[..self.start].trim_end_matches(SEPARATORS)
    }

    /// Separators between the head and the match
    #[must_use]
    pub fn separator<'a>(&self, filename: &'a str) -> &'a str {
        &filename[self.head(filename).len()..self.start]
    }

    /// Text after the match
    #[must_use]
    pub fn tail<'a>(&self, filename: &'a str) -> &'a str {
        &filename[self.end..]
    }

    /// The residual base name: head followed by tail
    ///
    /// Falls back to the full file name when nothing would remain.
    #[must_use]
    pub fn residual(&self, filename: &str) -> String {
        let residual = format!("{}{}", self.head(filename), self.tail(filename));
        if residual.is_empty() {
            filename.to_string()
        } else {
            residual
        }
    }
}

/// Search `filename` (without extension) for one of the suffix tokens
///
/// Case sensitive matching only accepts tokens the file name ends with.
/// Case insensitive matching accepts a token anywhere in the name. Either
/// way the first token in list order wins, so the order of the token list
/// decides ties.
#[must_use]
pub fn find_suffix_match<S: AsRef<str>>(
    filename: &str,
    tokens: &[S],
    case_sensitive: bool,
) -> Option<SuffixMatch> {
    if case_sensitive {
        tokens.iter().enumerate().find_map(|(token_index, token)| {
            let token = token.as_ref();
            (!token.is_empty() && filename.ends_with(token)).then(|| SuffixMatch {
                token_index,
                start: filename.len() - token.len(),
                end: filename.len(),
            })
        })
    } else {
        tokens.iter().enumerate().find_map(|(token_index, token)| {
            find_case_insensitive(filename, token.as_ref()).map(|(start, end)| SuffixMatch {
                token_index,
                start,
                end,
            })
        })
    }
}

/// Locate `needle` in `haystack` ignoring case, returning the byte range of
/// the occurrence in the original haystack
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    haystack.char_indices().find_map(|(start, _)| {
        let mut folded = Vec::with_capacity(needle.len());
        for (offset, c) in haystack[start..].char_indices() {
            folded.extend(c.to_lowercase());
            if !needle.starts_with(&folded) {
                return None;
            }
            if folded.len() == needle.len() {
                return Some((start, start + offset + c.len_utf8()));
            }
        }
        None
    })
}
