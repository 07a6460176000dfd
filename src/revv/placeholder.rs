//! Placeholder syntax for revved asset references in HTML.
//!
//! Two wire forms denote the same reference:
//! - literal: `{revv: path/to/asset.png}`
//! - percent-encoded: `%7Brevv%3A%20path%2Fto%2Fasset.png%7D`, needed when
//!   the placeholder sits inside an already-encoded proxied image URL.
//!
//! Both forms are variants of one algorithm differing only in how the
//! captured path is decoded and how the replacement is re-encoded, so each
//! dialect is a `(pattern, decode, encode)` tuple.

use super::RevvError;
use regex::Regex;
use std::sync::LazyLock;

static LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{revv:\s*(.*?)\}").unwrap());
static ENCODED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%7Brevv%3A%20(.*?)%7D").unwrap());

/// One placeholder dialect: how to find it, decode its captured path, and
/// re-encode the replacement before substitution.
pub struct PlaceholderSyntax {
    pattern: &'static LazyLock<Regex>,
    decode: fn(&str) -> Result<String, RevvError>,
    encode: fn(&str) -> String,
}

impl PlaceholderSyntax {
    /// The plain `{revv: path}` form.
    pub fn literal() -> Self {
        Self {
            pattern: &LITERAL,
            decode: |raw| Ok(raw.to_string()),
            encode: str::to_string,
        }
    }

    /// The percent-encoded form, with the path itself percent-encoded.
    pub fn encoded() -> Self {
        Self {
            pattern: &ENCODED,
            decode: |raw| {
                Ok(urlencoding::decode(raw)
                    .map_err(|err| RevvError::Decode(raw.to_string(), err))?
                    .into_owned())
            },
            encode: |replacement| urlencoding::encode(replacement).into_owned(),
        }
    }

    /// Rewrite every occurrence of this dialect in `source`.
    ///
    /// All matches are collected up front, before any substitution, so
    /// replacement text of a different length cannot shift the offsets of
    /// later matches.
    pub fn rewrite<F>(&self, source: &str, mut resolve: F) -> Result<String, RevvError>
    where
        F: FnMut(&str) -> Result<String, RevvError>,
    {
        let matches: Vec<(std::ops::Range<usize>, String)> = self
            .pattern
            .captures_iter(source)
            .filter_map(|cap| {
                let whole = cap.get(0)?;
                let path = cap.get(1)?;
                Some((whole.range(), path.as_str().to_string()))
            })
            .collect();

        if matches.is_empty() {
            return Ok(source.to_string());
        }

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for (range, raw) in matches {
            let logical = (self.decode)(&raw)?;
            let replacement = resolve(&logical)?;
            out.push_str(&source[cursor..range.start]);
            out.push_str(&(self.encode)(&replacement));
            cursor = range.end;
        }
        out.push_str(&source[cursor..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(path: &str) -> Result<String, RevvError> {
        Ok(path.to_uppercase())
    }

    #[test]
    fn test_literal_rewrite() {
        let out = PlaceholderSyntax::literal()
            .rewrite("<img src=\"{revv: cover.png}\">", upper)
            .unwrap();
        assert_eq!(out, "<img src=\"COVER.PNG\">");
    }

    #[test]
    fn test_literal_rewrite_multiple_occurrences() {
        let out = PlaceholderSyntax::literal()
            .rewrite("{revv: a.css} and {revv: b.css}", upper)
            .unwrap();
        assert_eq!(out, "A.CSS and B.CSS");
    }

    #[test]
    fn test_literal_rewrite_preserves_surroundings() {
        let out = PlaceholderSyntax::literal()
            .rewrite("before {revv: x.js} after", |_| Ok("longer/replacement.js".into()))
            .unwrap();
        assert_eq!(out, "before longer/replacement.js after");
    }

    #[test]
    fn test_encoded_rewrite_decodes_path() {
        let out = PlaceholderSyntax::encoded()
            .rewrite("%7Brevv%3A%20assets%2Fcover.png%7D", |path| {
                assert_eq!(path, "assets/cover.png");
                Ok("../assets/cover.abcd1234.png".into())
            })
            .unwrap();
        // Slashes in the replacement are themselves percent-encoded
        assert_eq!(out, "..%2Fassets%2Fcover.abcd1234.png");
    }

    #[test]
    fn test_encoded_inside_proxied_url() {
        let source = "https://images.weserv.nl/?url=%7Brevv%3A%20cover.png%7D&w=600";
        let out = PlaceholderSyntax::encoded()
            .rewrite(source, |_| Ok("cover.abcd1234.png".into()))
            .unwrap();
        assert_eq!(
            out,
            "https://images.weserv.nl/?url=cover.abcd1234.png&w=600"
        );
    }

    #[test]
    fn test_no_match_passthrough() {
        let source = "<p>nothing to do</p>";
        let out = PlaceholderSyntax::literal().rewrite(source, upper).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_literal_does_not_cross_braces() {
        // Lazy capture stops at the first closing brace
        let out = PlaceholderSyntax::literal()
            .rewrite("{revv: a.png} {plain} {revv: b.png}", upper)
            .unwrap();
        assert_eq!(out, "A.PNG {plain} B.PNG");
    }
}
