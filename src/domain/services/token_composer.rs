use serde::Serialize;

use crate::domain::{StructuredReference, TriggerMatch};

use super::floor_char_boundary;

/// Buffer contents and caret after inserting a reference token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub text: String,
    pub caret: usize,
}

/// Replace the trigger region `text[trigger.start..caret]` with the
/// reference token followed by a single space, and move the caret after it.
///
/// Text outside that region is copied untouched, so tokens inserted earlier
/// survive later insertions. A trigger that no longer lies before the caret
/// leaves the text unchanged.
pub fn compose_reference(
    text: &str,
    caret: usize,
    trigger: &TriggerMatch,
    reference: &StructuredReference,
) -> Composition {
    let caret = floor_char_boundary(text, caret);
    let start = trigger.start();
    if start > caret || !text.is_char_boundary(start) {
        return Composition {
            text: text.to_string(),
            caret,
        };
    }

    let token = reference.token();
    let mut composed = String::with_capacity(text.len() + token.len() + 1);
    composed.push_str(&text[..start]);
    composed.push_str(&token);
    composed.push(' ');
    let new_caret = composed.len();
    composed.push_str(&text[caret..]);

    Composition {
        text: composed,
        caret: new_caret,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_trigger_at_caret, ConnectorId, SearchItem};

    const PREFIXES: [(ConnectorId, &str); 2] = [
        (ConnectorId::Jira, "@jira_"),
        (ConnectorId::Confluence, "@confluence_"),
    ];

    fn jira(id: &str) -> StructuredReference {
        StructuredReference::from_item(
            ConnectorId::Jira,
            &SearchItem::new(id, format!("Issue {}", id), "u", "issue"),
        )
    }

    fn compose_at_end(text: &str, reference: &StructuredReference) -> Composition {
        let trigger = parse_trigger_at_caret(PREFIXES, text, text.len()).expect("trigger");
        compose_reference(text, text.len(), &trigger, reference)
    }

    #[test]
    fn test_inserts_token_and_trailing_space() {
        let composed = compose_at_end("Please see @jira_TEST", &jira("TEST-1"));

        assert_eq!(composed.text, "Please see [@jira TEST-1] ");
        assert_eq!(composed.caret, composed.text.len());
    }

    #[test]
    fn test_keeps_text_after_caret() {
        let text = "see @jira_AB and more";
        let caret = 12;
        let trigger = parse_trigger_at_caret(PREFIXES, text, caret).unwrap();

        let composed = compose_reference(text, caret, &trigger, &jira("AB-9"));

        assert_eq!(composed.text, "see [@jira AB-9]  and more");
        assert_eq!(&composed.text[..composed.caret], "see [@jira AB-9] ");
    }

    #[test]
    fn test_second_token_preserves_first() {
        let first = compose_at_end("@jira_A", &jira("A-1"));
        let text = format!("{}and @confluence_Hand", first.text);
        let page = StructuredReference::from_item(
            ConnectorId::Confluence,
            &SearchItem::new("77", "Handbook", "u", "page"),
        );

        let second = compose_at_end(&text, &page);

        assert_eq!(second.text, "[@jira A-1] and [@confluence Handbook] ");
    }

    #[test]
    fn test_stale_trigger_leaves_text_unchanged() {
        let trigger = TriggerMatch::new(ConnectorId::Jira, "X", 10);
        let composed = compose_reference("short", 3, &trigger, &jira("X-1"));

        assert_eq!(composed.text, "short");
        assert_eq!(composed.caret, 3);
    }
}
