//! Parser for the speaker-tagged transcript format.
//!
//! Input is line-oriented text where a line either starts a new utterance with
//! a `HOST1:` / `HOST2:` tag (optionally bold-wrapped as `**HOST1:**`, which
//! some models emit despite instructions) or continues the previous speaker's
//! utterance.

use super::models::{DialogueSegment, Speaker};

/// Parse transcript text into ordered (speaker, text) segments.
///
/// Rules:
/// - Tag matching is case-sensitive exact-prefix (`HOST1:`), after stripping
///   a bold-markdown wrapper if present.
/// - Blank lines are skipped and do not end the current utterance.
/// - Continuation lines before any tag has been seen are discarded.
/// - Accumulated continuation lines are joined with single spaces.
///
/// Malformed input is not an error; a transcript without tags parses to an
/// empty sequence, and rejecting that is the caller's concern.
pub fn parse_dialogue(transcript: &str) -> Vec<DialogueSegment> {
    let mut segments = Vec::new();
    let mut current: Option<(Speaker, Vec<String>)> = None;

    for raw_line in transcript.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let cleaned = line
            .replace("**HOST1:**", "HOST1:")
            .replace("**HOST2:**", "HOST2:");

        if let Some(rest) = cleaned.strip_prefix(Speaker::Host1.tag()) {
            flush(&mut segments, current.take());
            current = Some((Speaker::Host1, vec![rest.trim().to_string()]));
        } else if let Some(rest) = cleaned.strip_prefix(Speaker::Host2.tag()) {
            flush(&mut segments, current.take());
            current = Some((Speaker::Host2, vec![rest.trim().to_string()]));
        } else if let Some((_, parts)) = current.as_mut() {
            parts.push(line.to_string());
        }
        // No current speaker: stray leading text, nothing to attach it to.
    }

    flush(&mut segments, current);
    segments
}

fn flush(segments: &mut Vec<DialogueSegment>, current: Option<(Speaker, Vec<String>)>) {
    if let Some((speaker, parts)) = current {
        let text = parts.join(" ").trim().to_string();
        if !text.is_empty() {
            segments.push(DialogueSegment::new(speaker, text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_dialogue() {
        let segments = parse_dialogue("HOST1: Hi\nHOST2: Hello");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], DialogueSegment::new(Speaker::Host1, "Hi"));
        assert_eq!(segments[1], DialogueSegment::new(Speaker::Host2, "Hello"));
    }

    #[test]
    fn test_continuation_lines_joined_with_spaces() {
        let transcript = "HOST1: First part\nsecond part\nthird part\nHOST2: Reply";
        let segments = parse_dialogue(transcript);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "First part second part third part");
        assert_eq!(segments[1].text, "Reply");
    }

    #[test]
    fn test_bold_markdown_tags_stripped() {
        let segments = parse_dialogue("**HOST1:** Welcome\n**HOST2:** Thanks");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].speaker, Speaker::Host1);
        assert_eq!(segments[0].text, "Welcome");
        assert_eq!(segments[1].text, "Thanks");
    }

    #[test]
    fn test_blank_lines_do_not_flush() {
        let transcript = "HOST1: Part one\n\nstill part one\n\nHOST2: Done";
        let segments = parse_dialogue(transcript);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Part one still part one");
    }

    #[test]
    fn test_leading_continuation_discarded() {
        let transcript = "stray intro text\nmore stray text\nHOST1: Actual start";
        let segments = parse_dialogue(transcript);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Actual start");
    }

    #[test]
    fn test_no_tags_yields_empty() {
        assert!(parse_dialogue("just some text\nwith no speakers").is_empty());
        assert!(parse_dialogue("").is_empty());
    }

    #[test]
    fn test_tag_matching_is_case_sensitive() {
        // Lowercase and spaced tags are continuations, not new speakers
        let transcript = "HOST1: Hi\nhost2: not a tag\nHOST 1: also not a tag";
        let segments = parse_dialogue(transcript);
        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0].text,
            "Hi host2: not a tag HOST 1: also not a tag"
        );
    }

    #[test]
    fn test_empty_tag_line_with_continuation() {
        let segments = parse_dialogue("HOST1:\nActual words here");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Actual words here");
    }

    #[test]
    fn test_empty_utterance_not_emitted() {
        let segments = parse_dialogue("HOST1:\nHOST2: Hello");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].speaker, Speaker::Host2);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let transcript = "HOST1: A\ncontinued\nHOST2: B\nHOST1: C";
        assert_eq!(parse_dialogue(transcript), parse_dialogue(transcript));
    }

    #[test]
    fn test_whitespace_around_tags_and_text() {
        let segments = parse_dialogue("  HOST1:   padded text  \nHOST2:\tTabbed");
        assert_eq!(segments[0].text, "padded text");
        assert_eq!(segments[1].text, "Tabbed");
    }
}
