//! System prompt assembly for the orchestration loop.
//!
//! Layers (in order):
//! 1. Configured sections (Role, Instructions, ...)
//! 2. Available tools, from the registry's schema snapshot

use crate::tools::ToolDefinition;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One titled block of the system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSection {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

impl PromptSection {
    pub fn text(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: Some(body.to_string()),
            bullets: Vec::new(),
        }
    }

    pub fn bullets(title: &str, bullets: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            body: None,
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// The support agent's stock Role and Instructions.
pub fn default_sections() -> Vec<PromptSection> {
    vec![
        PromptSection::text(
            "Role",
            "Technical support agent for ExampleSoft. \
Answer questions using the knowledge base. \
If information isn't in the knowledge base, say so.",
        ),
        PromptSection::bullets(
            "Instructions",
            &[
                "Search the knowledge base before answering",
                "Cite sources when providing information",
                "Admit when you don't have information",
                "Offer to escalate complex issues",
                "Create tickets for unresolved problems",
            ],
        ),
    ]
}

/// Build the complete system prompt.
pub fn build_system_prompt(sections: &[PromptSection], tools: &[ToolDefinition]) -> String {
    let mut prompt = String::with_capacity(2048);

    for section in sections {
        prompt.push_str(&format!("# {}\n\n", section.title));
        if let Some(body) = &section.body {
            prompt.push_str(body.trim());
            prompt.push_str("\n\n");
        }
        if !section.bullets.is_empty() {
            for bullet in &section.bullets {
                prompt.push_str(&format!("- {}\n", bullet));
            }
            prompt.push('\n');
        }
    }

    if !tools.is_empty() {
        prompt.push_str("# Tools\n\n");
        for tool in tools {
            prompt.push_str(&format!("- **{}**: {}\n", tool.name, tool.description));
        }
    }

    debug!("System prompt: {} chars", prompt.len());
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_sections_render() {
        let prompt = build_system_prompt(&default_sections(), &[]);
        assert!(prompt.starts_with("# Role\n\nTechnical support agent for ExampleSoft."));
        assert!(prompt.contains("# Instructions\n\n- Search the knowledge base before answering\n"));
        assert!(!prompt.contains("# Tools"));
    }

    #[test]
    fn test_tools_listed_in_order() {
        let tools = vec![
            ToolDefinition {
                name: "create_ticket".into(),
                description: "Create a support ticket".into(),
                parameters: json!({}),
                fillers: Vec::new(),
            },
            ToolDefinition {
                name: "check_license".into(),
                description: "Check license".into(),
                parameters: json!({}),
                fillers: Vec::new(),
            },
        ];
        let prompt = build_system_prompt(&[], &tools);
        let ticket = prompt.find("create_ticket").unwrap();
        let license = prompt.find("check_license").unwrap();
        assert!(ticket < license);
    }
}
