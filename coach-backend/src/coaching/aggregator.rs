//! Formats agent replies into a single display string

use super::types::AgentReply;

/// Shown when no agent produced a reply
pub const NO_REPLIES_MESSAGE: &str =
    "None of your coaches could respond right now. Please try again in a moment.";

/// One section per reply, in the order given:
///
/// ```text
/// **Career Coach**
/// <reply>
///
/// **Health Coach**
/// <reply>
/// ```
pub fn format_replies(replies: &[AgentReply]) -> String {
    if replies.is_empty() {
        return NO_REPLIES_MESSAGE.to_string();
    }

    replies
        .iter()
        .map(|reply| {
            format!(
                "**{} Coach**\n{}",
                display_name(&reply.agent_name),
                reply.response_text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// "mental_health" → "Mental Health"
fn display_name(domain: &str) -> String {
    domain
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_replies() {
        assert_eq!(format_replies(&[]), NO_REPLIES_MESSAGE);
    }

    #[test]
    fn test_sections_in_order() {
        let text = format_replies(&[
            AgentReply::new("finance", "Build an emergency fund.\n"),
            AgentReply::new("mental_health", "Breathe."),
        ]);
        assert_eq!(
            text,
            "**Finance Coach**\nBuild an emergency fund.\n\n**Mental Health Coach**\nBreathe."
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("career"), "Career");
        assert_eq!(display_name("mental_health"), "Mental Health");
        assert_eq!(display_name("work-life"), "Work Life");
    }
}
