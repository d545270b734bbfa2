//! Prompt templates for the one-shot assistant tasks.
//!
//! Each [`TaskKind`] turns a single user-supplied string into one
//! natural-language prompt. There is no validation: missing input is the
//! empty string and still yields a well-formed (if degenerate) prompt.

use std::fmt;

/// One-shot task the assistant can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Bullet-point summary of a text.
    Summarize,
    /// Prioritized daily plan from a task list.
    Plan,
    /// Formal, casual and concise variants of a text.
    Rephrase,
    /// One short motivational quote for a mood.
    Quote,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Summarize,
        TaskKind::Plan,
        TaskKind::Rephrase,
        TaskKind::Quote,
    ];

    /// Name of the request field holding the task input.
    pub fn input_field(self) -> &'static str {
        match self {
            TaskKind::Summarize | TaskKind::Rephrase => "text",
            TaskKind::Plan => "tasks",
            TaskKind::Quote => "mood",
        }
    }

    /// Name of the response field holding the generated text.
    pub fn output_field(self) -> &'static str {
        match self {
            TaskKind::Summarize => "summary",
            TaskKind::Plan => "plan",
            TaskKind::Rephrase => "rephrased",
            TaskKind::Quote => "quote",
        }
    }

    /// Render the prompt for this task.
    pub fn build_prompt(self, input: &str) -> String {
        match self {
            TaskKind::Summarize => summarize(input),
            TaskKind::Plan => plan(input),
            TaskKind::Rephrase => rephrase(input),
            TaskKind::Quote => quote(input),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Summarize => write!(f, "summarize"),
            TaskKind::Plan => write!(f, "plan"),
            TaskKind::Rephrase => write!(f, "rephrase"),
            TaskKind::Quote => write!(f, "quote"),
        }
    }
}

pub fn summarize(text: &str) -> String {
    format!("Summarize the following text into clear bullet points:\n\n{text}")
}

pub fn plan(tasks: &str) -> String {
    format!("Create a prioritized daily plan for these tasks:\n\n{tasks}")
}

pub fn rephrase(text: &str) -> String {
    format!("Rephrase the following into three styles (formal, casual, concise):\n\n{text}")
}

pub fn quote(mood: &str) -> String {
    format!("Give an original short motivational quote for someone feeling {mood}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_embeds_text() {
        let prompt = summarize("A. B. C.");
        assert!(prompt.starts_with("Summarize the following text into clear bullet points:"));
        assert!(prompt.ends_with("\n\nA. B. C."));
    }

    #[test]
    fn test_plan_embeds_tasks() {
        let prompt = TaskKind::Plan.build_prompt("email Bob\ngym");
        assert!(prompt.contains("prioritized daily plan"));
        assert!(prompt.ends_with("email Bob\ngym"));
    }

    #[test]
    fn test_rephrase_names_three_styles() {
        let prompt = rephrase("see you soon");
        assert!(prompt.contains("formal, casual, concise"));
        assert!(prompt.ends_with("see you soon"));
    }

    #[test]
    fn test_quote_mentions_mood() {
        assert_eq!(
            quote("tired"),
            "Give an original short motivational quote for someone feeling tired."
        );
    }

    #[test]
    fn test_empty_input_still_builds_prompt() {
        for kind in TaskKind::ALL {
            assert!(!kind.build_prompt("").is_empty(), "{kind} prompt was empty");
        }
    }

    #[test]
    fn test_field_names() {
        let fields: Vec<_> = TaskKind::ALL
            .iter()
            .map(|k| (k.input_field(), k.output_field()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("text", "summary"),
                ("tasks", "plan"),
                ("text", "rephrased"),
                ("mood", "quote"),
            ]
        );
    }
}
