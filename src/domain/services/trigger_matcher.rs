use crate::domain::{ConnectorId, TriggerMatch};

/// Clamp `offset` into `text` and move it back onto a char boundary.
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Find the active connector trigger immediately before `caret`.
///
/// For every prefix, only its last occurrence before the caret is considered.
/// That occurrence counts when it sits at the start of the text or right after
/// whitespace, and when nothing between it and the caret is whitespace. When
/// several prefixes qualify, the one closest to the caret wins (ties go to the
/// longer prefix).
///
/// ```
/// use connector_mentions::domain::{parse_trigger_at_caret, ConnectorId};
///
/// let prefixes = [(ConnectorId::Jira, "@jira_")];
/// let text = "Check @jira_ABC-12";
/// let found = parse_trigger_at_caret(prefixes, text, text.len()).unwrap();
/// assert_eq!(found.query(), "ABC-12");
/// assert_eq!(found.start(), 6);
/// ```
pub fn parse_trigger_at_caret<'p, I>(prefixes: I, text: &str, caret: usize) -> Option<TriggerMatch>
where
    I: IntoIterator<Item = (ConnectorId, &'p str)>,
{
    let head = &text[..floor_char_boundary(text, caret)];

    let mut best: Option<(TriggerMatch, usize)> = None;

    for (connector, prefix) in prefixes {
        if prefix.is_empty() {
            continue;
        }
        let Some(start) = head.rfind(prefix) else {
            continue;
        };

        let at_boundary = head[..start]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if !at_boundary {
            continue;
        }

        let query = &head[start + prefix.len()..];
        if query.chars().any(char::is_whitespace) {
            continue;
        }

        let wins = match &best {
            None => true,
            Some((current, current_len)) => {
                start > current.start() || (start == current.start() && prefix.len() > *current_len)
            }
        };
        if wins {
            best = Some((TriggerMatch::new(connector, query, start), prefix.len()));
        }
    }

    best.map(|(found, _)| found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIXES: [(ConnectorId, &str); 2] = [
        (ConnectorId::Jira, "@jira_"),
        (ConnectorId::Confluence, "@confluence_"),
    ];

    fn parse(text: &str, caret: usize) -> Option<TriggerMatch> {
        parse_trigger_at_caret(PREFIXES, text, caret)
    }

    #[test]
    fn test_finds_jira_query_before_caret() {
        let text = "Please check @jira_ISSUE-123 for details.";
        let caret = text.find(" for").unwrap();

        let found = parse(text, caret).expect("trigger");

        assert_eq!(found.connector(), ConnectorId::Jira);
        assert_eq!(found.query(), "ISSUE-123");
        assert_eq!(&text[found.start()..found.start() + 6], "@jira_");
    }

    #[test]
    fn test_requires_boundary_before_prefix() {
        let text = "email@jira_ABC";
        assert_eq!(parse(text, text.len()), None);
    }

    #[test]
    fn test_prefix_at_start_of_text() {
        let found = parse("@confluence_Project", 19).expect("trigger");
        assert_eq!(found.connector(), ConnectorId::Confluence);
        assert_eq!(found.query(), "Project");
        assert_eq!(found.start(), 0);
    }

    #[test]
    fn test_empty_query_right_after_prefix() {
        let text = "see @jira_";
        let found = parse(text, text.len()).expect("trigger");
        assert_eq!(found.query(), "");
        assert_eq!(found.start(), 4);
    }

    #[test]
    fn test_space_abandons_trigger() {
        let text = "see @jira_ABC more";
        assert_eq!(parse(text, text.len()), None);
        assert_eq!(parse("see @jira_ABC ", 14), None);
    }

    #[test]
    fn test_closest_prefix_wins() {
        let text = "@jira_A and @confluence_Page";
        let found = parse(text, text.len()).expect("trigger");
        assert_eq!(found.connector(), ConnectorId::Confluence);
        assert_eq!(found.start(), 12);

        let text = "@confluence_Page\n@jira_KEY";
        let found = parse(text, text.len()).expect("trigger");
        assert_eq!(found.connector(), ConnectorId::Jira);
        assert_eq!(found.query(), "KEY");
    }

    #[test]
    fn test_caret_inside_earlier_trigger() {
        let text = "@jira_ABC then @jira_XYZ";
        let found = parse(text, 9).expect("trigger");
        assert_eq!(found.query(), "ABC");
        assert_eq!(found.start(), 0);
    }

    #[test]
    fn test_only_text_before_caret_is_considered() {
        let text = "hello @jira_ABC";
        assert_eq!(parse(text, 3), None);
    }

    #[test]
    fn test_newline_counts_as_boundary() {
        let text = "first line\n@jira_Q";
        let found = parse(text, text.len()).expect("trigger");
        assert_eq!(found.start(), 11);
    }

    #[test]
    fn test_caret_out_of_range_is_clamped() {
        let text = "@jira_ABC";
        let found = parse(text, 500).expect("trigger");
        assert_eq!(found.query(), "ABC");
    }

    #[test]
    fn test_caret_inside_multibyte_char_is_floored() {
        let text = "@jira_é";
        // 'é' is two bytes; offset 7 splits it.
        let found = parse(text, 7).expect("trigger");
        assert_eq!(found.query(), "");
    }

    #[test]
    fn test_longer_prefix_wins_on_tie() {
        let prefixes = [(ConnectorId::Jira, "@j"), (ConnectorId::Confluence, "@j_")];
        let found = parse_trigger_at_caret(prefixes, "@j_x", 4).expect("trigger");
        assert_eq!(found.connector(), ConnectorId::Confluence);
        assert_eq!(found.query(), "x");
    }

    #[test]
    fn test_idempotent() {
        let text = "ping @jira_AB";
        assert_eq!(parse(text, text.len()), parse(text, text.len()));
    }
}
