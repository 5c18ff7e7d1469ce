//! Built-in support desk tools: triage, tickets, feedback and escalation.

use super::traits::{CallContext, NativeTool};
use crate::classifier::KeywordClassifier;
use crate::types::{ParamType, ParameterSpec, ToolResult};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde_json::json;
use tracing::info;

/// `TKT-` followed by a 14-digit local timestamp.
pub fn ticket_id(now: DateTime<Local>) -> String {
    format!("TKT-{}", now.format("%Y%m%d%H%M%S"))
}

/// ISO-8601 local timestamp used for `*_time` / `*_created` globals.
pub fn iso_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

// ---------------------------------------------------------------------------
// installation_help
// ---------------------------------------------------------------------------

pub struct InstallationHelp;

impl InstallationHelp {
    pub const NAME: &'static str = "installation_help";
    pub const DESCRIPTION: &'static str = "Get installation help";
}

#[async_trait]
impl NativeTool for InstallationHelp {
    async fn call(&self, _args: &serde_json::Value, _ctx: &CallContext<'_>) -> ToolResult {
        ToolResult::new(
            "For installation: Download from our website and run the installer. \
Windows users should run as Administrator. \
System requirements: Windows 10+, macOS 10.15+, or Ubuntu 20.04+. \
8GB RAM minimum, 500MB disk space. \
Need help with activation or system requirements?",
        )
    }
}

// ---------------------------------------------------------------------------
// troubleshoot
// ---------------------------------------------------------------------------

pub struct Troubleshoot {
    classifier: KeywordClassifier,
}

impl Troubleshoot {
    pub const NAME: &'static str = "troubleshoot";
    pub const DESCRIPTION: &'static str = "Troubleshoot a specific issue";
    pub const FILLERS: &'static [&'static str] = &["Let me search our knowledge base..."];

    pub fn new(classifier: KeywordClassifier) -> Self {
        Self { classifier }
    }

    pub fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::new(
            "issue",
            ParamType::String,
            "Description of the issue",
            true,
        )]
    }
}

#[async_trait]
impl NativeTool for Troubleshoot {
    async fn call(&self, args: &serde_json::Value, _ctx: &CallContext<'_>) -> ToolResult {
        let issue = args["issue"].as_str().unwrap_or_default();
        let classification = self.classifier.classify(issue);
        info!(
            "Troubleshoot matched rule: {}",
            classification.rule.unwrap_or("fallback")
        );
        ToolResult::new(classification.response)
    }
}

// ---------------------------------------------------------------------------
// create_ticket
// ---------------------------------------------------------------------------

pub struct CreateTicket;

impl CreateTicket {
    pub const NAME: &'static str = "create_ticket";
    pub const DESCRIPTION: &'static str = "Create a support ticket";
    pub const DEFAULT_PRIORITY: &'static str = "medium";

    pub fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new(
                "description",
                ParamType::String,
                "Detailed description of the issue",
                true,
            ),
            ParameterSpec::enumeration(
                "priority",
                &["low", "medium", "high"],
                "Ticket priority",
                false,
            ),
        ]
    }
}

#[async_trait]
impl NativeTool for CreateTicket {
    async fn call(&self, args: &serde_json::Value, _ctx: &CallContext<'_>) -> ToolResult {
        let description = args["description"].as_str().unwrap_or_default();
        let priority = args["priority"]
            .as_str()
            .unwrap_or(Self::DEFAULT_PRIORITY);
        let now = Local::now();
        let id = ticket_id(now);

        info!("Created ticket {} ({} priority)", id, priority);

        ToolResult::new(format!(
            "Created ticket {} with {} priority. \
Our team will respond within 24 hours for standard issues, \
or 4 hours for high priority. \
Is there anything else I can help with?",
            id, priority
        ))
        .update_global_data(json!({
            "ticket_id": id,
            "ticket_description": description,
            "ticket_priority": priority,
            "ticket_created": iso_timestamp(now),
        }))
    }
}

// ---------------------------------------------------------------------------
// report_feedback
// ---------------------------------------------------------------------------

pub struct ReportFeedback;

impl ReportFeedback {
    pub const NAME: &'static str = "report_feedback";
    pub const DESCRIPTION: &'static str = "Report incorrect or incomplete answer";

    pub fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("question", ParamType::String, "The original question", true),
            ParameterSpec::new(
                "feedback",
                ParamType::String,
                "What was wrong or missing",
                true,
            ),
        ]
    }
}

#[async_trait]
impl NativeTool for ReportFeedback {
    async fn call(&self, args: &serde_json::Value, _ctx: &CallContext<'_>) -> ToolResult {
        let question = args["question"].as_str().unwrap_or_default();
        let feedback = args["feedback"].as_str().unwrap_or_default();

        ToolResult::new(
            "Thank you for the feedback. I've logged this for our team to review. \
Your input helps us improve. \
Would you like me to create a ticket for further assistance?",
        )
        .update_global_data(json!({
            "feedback_question": question,
            "feedback_content": feedback,
            "feedback_time": iso_timestamp(Local::now()),
        }))
    }
}

// ---------------------------------------------------------------------------
// escalate_to_human
// ---------------------------------------------------------------------------

pub struct EscalateToHuman {
    target: String,
    farewell: String,
}

impl EscalateToHuman {
    pub const NAME: &'static str = "escalate_to_human";
    pub const DESCRIPTION: &'static str = "Escalate to human support";

    pub fn new(target: &str, farewell: &str) -> Self {
        Self {
            target: target.to_string(),
            farewell: farewell.to_string(),
        }
    }
}

#[async_trait]
impl NativeTool for EscalateToHuman {
    async fn call(&self, _args: &serde_json::Value, ctx: &CallContext<'_>) -> ToolResult {
        let context = match ctx
            .global_data
            .get("ticket_id")
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
        {
            Some(id) => format!("Ticket {}", id),
            None => "New inquiry".to_string(),
        };

        info!("Escalating to {} ({})", self.target, context);

        ToolResult::new(
            "I'm connecting you with a human support agent. \
Please hold while I transfer your call.",
        )
        .with_post_process(true)
        .with_context(context)
        .update_global_data(json!({
            "escalated": true,
            "escalation_time": iso_timestamp(Local::now()),
        }))
        .transfer(&self.target, &self.farewell, true)
    }
}
