//! Prompt construction for blog content generation.
//!
//! [`PromptBuilder`] assembles multi-section Markdown prompts from a
//! preamble plus named sections, replacing manual string concatenation.
//! [`content_prompt`] uses it to build the fixed directive that every
//! generation call sends: the topic is embedded verbatim, surrounded by
//! on-topic constraints, a required output skeleton, and style rules.

/// Builder for multi-section instruction prompts.
///
/// Sections are joined with double newlines and rendered as
/// `## Heading\n\ncontent`. Empty sections are silently skipped.
///
/// # Example
///
/// ```
/// use blogforge::prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new("You are a writing assistant.")
///     .section("Task", "Write a haiku.")
///     .section("Empty", "")
///     .build();
///
/// assert!(prompt.contains("## Task"));
/// assert!(!prompt.contains("Empty"));
/// ```
pub struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    /// Create a new builder with an initial preamble section.
    ///
    /// The preamble is included as-is, without a heading.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            sections: vec![preamble.into()],
        }
    }

    /// Append a named section with a `##` Markdown heading.
    ///
    /// Skipped if `content` is empty.
    pub fn section(mut self, heading: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(format!("## {heading}\n\n{content}"));
        }
        self
    }

    /// Conditionally append a section.
    ///
    /// The `content_fn` is only called when `condition` is true.
    pub fn section_if(
        self,
        condition: bool,
        heading: &str,
        content_fn: impl FnOnce() -> String,
    ) -> Self {
        if condition {
            self.section(heading, content_fn())
        } else {
            self
        }
    }

    /// Append raw text without a heading. Skipped if empty.
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(content);
        }
        self
    }

    /// Build the final prompt by joining all sections with double newlines.
    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}

/// Build the full generation prompt for a topic.
///
/// Pure string interpolation: deterministic, no side effects, no failure
/// modes. The topic is embedded verbatim — no escaping or sanitization.
pub fn content_prompt(topic: &str) -> String {
    PromptBuilder::new(
        "You are a blog content writer who stays strictly on topic and never \
         drifts out of context.",
    )
    .section(
        "Task",
        format!("Write one blog post that is relevant ONLY to the following topic:\n\"{topic}\""),
    )
    .section(
        "Strict Rules",
        "1. Do not discuss other topics that are not directly related to the topic above.\n\
         2. Do not give definitions or general explanations that stray far from the topic.\n\
         3. Every paragraph must have a clear connection to the topic.\n\
         4. Do not over-imagine; stay logical and realistic.\n\
         5. If the topic is too broad, narrow it yourself in a way that stays relevant.\n\
         6. Do not mention that you are an AI model or explain how AI works.",
    )
    .section(
        "Required Format (Markdown)",
        "# A specific, engaging main title (not clickbait)\n\n\
         A short introduction (2-3 sentences) that states what will be covered \
         and names the topic explicitly.\n\n\
         ## Main Point 1\n\
         - Explain with focus on the topic\n\
         - Give a concrete, relevant example\n\n\
         ## Main Point 2\n\
         - Stay connected to the topic\n\
         - Bullet lists are allowed where useful\n\n\
         ## Main Point 3\n\
         - Add insight that is still in context\n\
         - Do not emptily repeat earlier points\n\n\
         Conclusion:\n\
         - Summarize the core of the discussion\n\
         - Do not open a new topic\n\n\
         Call to Action:\n\
         - An invitation directly related to the topic, e.g. trying, applying, \
         or learning more about the same thing.",
    )
    .section(
        "Style",
        "Use natural, easy-to-understand language. Avoid overly long sentences. \
         Avoid unnecessary technical jargon; when a term is unavoidable, explain \
         it briefly.",
    )
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_only() {
        let prompt = PromptBuilder::new("You are a writer.").build();
        assert_eq!(prompt, "You are a writer.");
    }

    #[test]
    fn sections_get_headings() {
        let prompt = PromptBuilder::new("P").section("Task", "Do the thing.").build();
        assert_eq!(prompt, "P\n\n## Task\n\nDo the thing.");
    }

    #[test]
    fn empty_section_skipped() {
        let prompt = PromptBuilder::new("P")
            .section("Empty", "")
            .section("Present", "content")
            .build();
        assert!(!prompt.contains("Empty"));
        assert!(prompt.contains("## Present"));
    }

    #[test]
    fn section_if_false_excluded() {
        let prompt = PromptBuilder::new("P")
            .section_if(false, "Hidden", || "nope".into())
            .section_if(true, "Shown", || "yes".into())
            .build();
        assert!(!prompt.contains("Hidden"));
        assert!(prompt.contains("## Shown\n\nyes"));
    }

    #[test]
    fn raw_appended_without_heading() {
        let prompt = PromptBuilder::new("P").raw("---\nfooter").build();
        assert_eq!(prompt, "P\n\n---\nfooter");
    }

    #[test]
    fn content_prompt_embeds_topic_verbatim() {
        let topics = [
            "renewable energy in rural areas",
            "IoT in education: pros & cons",
            "a topic with \"quotes\" and {braces}",
        ];
        for topic in topics {
            let prompt = content_prompt(topic);
            assert!(prompt.contains(topic), "topic missing from prompt: {topic}");
        }
    }

    #[test]
    fn content_prompt_is_deterministic() {
        assert_eq!(content_prompt("same topic"), content_prompt("same topic"));
    }

    #[test]
    fn content_prompt_carries_all_directive_sections() {
        let prompt = content_prompt("anything");
        assert!(prompt.contains("## Task"));
        assert!(prompt.contains("## Strict Rules"));
        assert!(prompt.contains("## Required Format (Markdown)"));
        assert!(prompt.contains("## Style"));
        assert!(prompt.contains("Call to Action"));
    }

    #[test]
    fn content_prompt_does_not_sanitize() {
        let topic = "</div> <script>alert(1)</script>";
        assert!(content_prompt(topic).contains(topic));
    }
}
