use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSegment {
    pub text: String,
    pub emphasized: bool,
}

impl HighlightSegment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: false,
        }
    }

    fn keyword(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: true,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `\b` next to a word character, `\B` next to punctuation, so `#GNLegacy`
/// and `U.S.` still need a non-word neighbour (or the text edge) outside.
fn keyword_alternative(keyword: &str) -> String {
    let edge = |c: Option<char>| if c.is_some_and(is_word_char) { r"\b" } else { r"\B" };
    format!(
        "{}{}{}",
        edge(keyword.chars().next()),
        regex::escape(keyword),
        edge(keyword.chars().last())
    )
}

/// Comma separated emphasis keywords, matched case-insensitively as whole
/// words.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    pattern: Option<Regex>,
}

impl KeywordSet {
    pub fn parse(input: &str) -> Self {
        let mut keywords: Vec<String> = input
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        keywords.dedup();

        // Longest first so "civic action" wins over a shorter overlapping keyword.
        let mut alternatives: Vec<&str> = keywords.iter().map(String::as_str).collect();
        alternatives.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let pattern = if alternatives.is_empty() {
            None
        } else {
            let body = alternatives
                .iter()
                .map(|k| keyword_alternative(k))
                .collect::<Vec<_>>()
                .join("|");
            match Regex::new(&format!("(?i)(?:{})", body)) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("Keyword pattern rejected, emphasis disabled: {}", e);
                    None
                }
            }
        };

        Self { keywords, pattern }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Split `text` into ordered segments. Concatenating the segments
    /// always reproduces `text`.
    pub fn highlight(&self, text: &str) -> Vec<HighlightSegment> {
        if text.is_empty() {
            return Vec::new();
        }
        let Some(pattern) = &self.pattern else {
            return vec![HighlightSegment::plain(text)];
        };

        let mut segments = Vec::new();
        let mut cursor = 0;
        for m in pattern.find_iter(text) {
            if m.start() > cursor {
                segments.push(HighlightSegment::plain(&text[cursor..m.start()]));
            }
            segments.push(HighlightSegment::keyword(m.as_str()));
            cursor = m.end();
        }
        if cursor < text.len() {
            segments.push(HighlightSegment::plain(&text[cursor..]));
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[HighlightSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn emphasized(segments: &[HighlightSegment]) -> Vec<&str> {
        segments
            .iter()
            .filter(|s| s.emphasized)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn matches_case_insensitively_and_keeps_original_text() {
        let set = KeywordSet::parse("reform, civic action, diaspora justice, transparency");
        let text = "This Civic Action is crucial for public REFORM.";
        let segments = set.highlight(text);

        assert_eq!(joined(&segments), text);
        assert_eq!(emphasized(&segments), vec!["Civic Action", "REFORM"]);
        assert_eq!(segments.last().unwrap().text, ".");
    }

    #[test]
    fn whole_words_only() {
        let set = KeywordSet::parse("reform");
        let segments = set.highlight("Reforms and reformers need reform");
        assert_eq!(emphasized(&segments), vec!["reform"]);
    }

    #[test]
    fn no_match_is_identity() {
        let set = KeywordSet::parse("reform");
        let text = "Welcome to the GN AI Authority broadcast.";
        assert_eq!(set.highlight(text), vec![HighlightSegment::plain(text)]);
    }

    #[test]
    fn empty_keyword_list_disables_emphasis() {
        let set = KeywordSet::parse(" , ,");
        assert!(set.is_empty());
        assert!(set.keywords().is_empty());
        assert_eq!(set.highlight("reform").len(), 1);
        assert!(set.highlight("").is_empty());
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let set = KeywordSet::parse("a.b");
        assert!(emphasized(&set.highlight("axb")).is_empty());
        assert_eq!(emphasized(&set.highlight("see a.b now")), vec!["a.b"]);
    }

    #[test]
    fn punctuation_edged_keywords_match() {
        let set = KeywordSet::parse("#GNLegacy, U.S., c++");
        assert_eq!(emphasized(&set.highlight("share #GNLegacy today")), vec!["#GNLegacy"]);
        assert_eq!(emphasized(&set.highlight("the U.S. reform")), vec!["U.S."]);
        assert_eq!(emphasized(&set.highlight("learn c++ now")), vec!["c++"]);
        assert_eq!(emphasized(&set.highlight("#gnlegacy")), vec!["#gnlegacy"]);

        let text = "share #GNLegacy today";
        assert_eq!(joined(&set.highlight(text)), text);
    }

    #[test]
    fn punctuation_edged_keywords_still_need_a_boundary() {
        let set = KeywordSet::parse("#GNLegacy, U.S.");
        assert!(emphasized(&set.highlight("a#GNLegacy")).is_empty());
        assert!(emphasized(&set.highlight("#GNLegacyX")).is_empty());
        assert!(emphasized(&set.highlight("U.S.A")).is_empty());
    }

    #[test]
    fn longer_keyword_wins() {
        let set = KeywordSet::parse("justice, diaspora justice");
        let segments = set.highlight("Our diaspora justice program");
        assert_eq!(emphasized(&segments), vec!["diaspora justice"]);
    }
}
