//! Parsing of model output into flashcards, and of the `Deck:` directive in notes.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separates one flashcard from the next in model output
pub const CARD_SEPARATOR: &str = "=======";
/// Separates the front of a flashcard from its back
pub const SIDE_SEPARATOR: &str = "||";

const FRONT_LABEL: &str = "Front:";
const BACK_LABEL: &str = "Back:";

// First `Deck: <name>` line, including its line break.
static DECK_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Deck:[ \t]*(\S[^\r\n]*)\r?$\n?").expect("valid deck regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    Front,
    Back,
}

impl fmt::Display for CardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardSide::Front => write!(f, "front"),
            CardSide::Back => write!(f, "back"),
        }
    }
}

/// Why one segment of the model output could not become a flashcard.
/// `index` is 1-based over the non-empty segments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("flashcard {index} has no `||` between front and back")]
    MissingSeparator { index: usize, segment: String },

    #[error("flashcard {index} has {count} `||` separators, expected exactly one")]
    TooManySeparators {
        index: usize,
        count: usize,
        segment: String,
    },

    #[error("flashcard {index} has an empty {side}")]
    EmptySide {
        index: usize,
        side: CardSide,
        segment: String,
    },
}

impl ParseError {
    pub fn index(&self) -> usize {
        match self {
            ParseError::MissingSeparator { index, .. }
            | ParseError::TooManySeparators { index, .. }
            | ParseError::EmptySide { index, .. } => *index,
        }
    }

    /// The raw segment text that failed to parse
    pub fn segment(&self) -> &str {
        match self {
            ParseError::MissingSeparator { segment, .. }
            | ParseError::TooManySeparators { segment, .. }
            | ParseError::EmptySide { segment, .. } => segment,
        }
    }
}

/// Find the first `Deck: <name>` line.
///
/// Returns the deck name (if any) and the text with that line removed.
/// Without a directive the text is returned unchanged.
pub fn extract_deck_directive(text: &str) -> (Option<String>, String) {
    match DECK_DIRECTIVE.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let name = caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            let mut cleaned = String::with_capacity(text.len());
            cleaned.push_str(&text[..whole.start]);
            cleaned.push_str(&text[whole.end..]);
            (Some(name), cleaned)
        }
        None => (None, text.to_string()),
    }
}

/// Split model output into flashcards.
///
/// One entry per non-empty segment, in order. Malformed segments become
/// errors rather than cards with missing sides.
pub fn parse_flashcards(text: &str) -> Vec<Result<Flashcard, ParseError>> {
    text.split(CARD_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(i, segment)| parse_segment(i + 1, segment))
        .collect()
}

fn parse_segment(index: usize, segment: &str) -> Result<Flashcard, ParseError> {
    let parts: Vec<&str> = segment.split(SIDE_SEPARATOR).collect();

    let (front, back) = match parts.as_slice() {
        [front, back] => (*front, *back),
        [_] => {
            return Err(ParseError::MissingSeparator {
                index,
                segment: segment.to_string(),
            })
        }
        _ => {
            return Err(ParseError::TooManySeparators {
                index,
                count: parts.len() - 1,
                segment: segment.to_string(),
            })
        }
    };

    let front = front.replacen(FRONT_LABEL, "", 1).trim().to_string();
    let back = back.replacen(BACK_LABEL, "", 1).trim().to_string();

    for (side, value) in [(CardSide::Front, &front), (CardSide::Back, &back)] {
        if value.is_empty() {
            return Err(ParseError::EmptySide {
                index,
                side,
                segment: segment.to_string(),
            });
        }
    }

    Ok(Flashcard { front, back })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(text: &str) -> Vec<Flashcard> {
        parse_flashcards(text)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_two_cards_without_labels() {
        assert_eq!(
            cards("A||B=======C||D"),
            vec![Flashcard::new("A", "B"), Flashcard::new("C", "D")]
        );
    }

    #[test]
    fn test_labels_are_stripped_and_trimmed() {
        assert_eq!(
            cards("Front: Q1 || Back: A1\n=======\nFront: Q2 || Back: A2"),
            vec![Flashcard::new("Q1", "A1"), Flashcard::new("Q2", "A2")]
        );
    }

    #[test]
    fn test_only_first_label_is_stripped() {
        assert_eq!(
            cards("Front: What does Front: mean? || Back: Back: a label"),
            vec![Flashcard::new("What does Front: mean?", "Back: a label")]
        );
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let parsed = parse_flashcards("\n=======\nQ||A\n=======\n   \n=======\n");
        assert_eq!(parsed, vec![Ok(Flashcard::new("Q", "A"))]);
        assert!(parse_flashcards("").is_empty());
        assert!(parse_flashcards("  \n ").is_empty());
    }

    #[test]
    fn test_segment_without_separator_is_an_error() {
        let parsed = parse_flashcards("Q1||A1\n=======\njust some prose\n=======\nQ3||A3");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], Ok(Flashcard::new("Q1", "A1")));
        assert_eq!(
            parsed[1],
            Err(ParseError::MissingSeparator {
                index: 2,
                segment: "just some prose".to_string(),
            })
        );
        assert_eq!(parsed[2], Ok(Flashcard::new("Q3", "A3")));
    }

    #[test]
    fn test_segment_with_extra_separators_is_an_error() {
        let parsed = parse_flashcards("a || b || c");
        match &parsed[0] {
            Err(ParseError::TooManySeparators { index, count, .. }) => {
                assert_eq!(*index, 1);
                assert_eq!(*count, 2);
            }
            other => panic!("Expected too many separators, got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_side_is_an_error() {
        let parsed = parse_flashcards("Front: || Back: answer");
        let err = parsed[0].clone().unwrap_err();
        assert_eq!(
            err,
            ParseError::EmptySide {
                index: 1,
                side: CardSide::Front,
                segment: "Front: || Back: answer".to_string(),
            }
        );
        assert_eq!(err.to_string(), "flashcard 1 has an empty front");
        assert_eq!(err.segment(), "Front: || Back: answer");
    }

    #[test]
    fn test_deck_directive_is_extracted_and_removed() {
        let (deck, text) = extract_deck_directive("Deck: CS::Py\nQ1||A1\n=======\nQ2||A2");
        assert_eq!(deck.as_deref(), Some("CS::Py"));
        assert_eq!(text, "Q1||A1\n=======\nQ2||A2");
    }

    #[test]
    fn test_deck_directive_in_the_middle() {
        let (deck, text) = extract_deck_directive("# Notes\nDeck:   Biology  \nCells are small.\n");
        assert_eq!(deck.as_deref(), Some("Biology"));
        assert_eq!(text, "# Notes\nCells are small.\n");
        assert!(!text.contains("Deck:"));
    }

    #[test]
    fn test_only_first_directive_is_used() {
        let (deck, text) = extract_deck_directive("Deck: First\nbody\nDeck: Second\n");
        assert_eq!(deck.as_deref(), Some("First"));
        assert_eq!(text, "body\nDeck: Second\n");
    }

    #[test]
    fn test_crlf_directive() {
        let (deck, text) = extract_deck_directive("Deck: Windows\r\nline\r\n");
        assert_eq!(deck.as_deref(), Some("Windows"));
        assert_eq!(text, "line\r\n");
    }

    #[test]
    fn test_no_directive_leaves_text_untouched() {
        let input = "Some notes about decks.\nA deck: not a directive\n Deck: indented";
        let (deck, text) = extract_deck_directive(input);
        assert_eq!(deck, None);
        assert_eq!(text, input);
    }

    #[test]
    fn test_blank_directive_is_ignored() {
        let (deck, text) = extract_deck_directive("Deck:   \nbody");
        assert_eq!(deck, None);
        assert_eq!(text, "Deck:   \nbody");
    }

    #[test]
    fn test_directive_on_last_line_without_newline() {
        let (deck, text) = extract_deck_directive("body\nDeck: Tail");
        assert_eq!(deck.as_deref(), Some("Tail"));
        assert_eq!(text, "body\n");
    }
}
