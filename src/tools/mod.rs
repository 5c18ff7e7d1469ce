pub mod lookups;
pub mod params;
pub mod registry;
pub mod support;
pub mod traits;

pub use registry::{ToolEntry, ToolHandler, ToolRegistry};
pub use traits::{CallContext, FnTool, NativeTool, ToolDefinition};

use crate::classifier::KeywordClassifier;
use crate::config::SupportConfig;
use crate::knowledge::{KnowledgeBase, SearchKnowledge};
use anyhow::{Context, Result};
use std::sync::Arc;
use support::{CreateTicket, EscalateToHuman, InstallationHelp, ReportFeedback, Troubleshoot};
use tracing::info;

// ---------------------------------------------------------------------------
// Registry assembly
// ---------------------------------------------------------------------------

/// Build the registry for a support agent.
///
/// Order: knowledge search (when available), native support tools, built-in
/// lookups, then configured data maps. Any duplicate name aborts startup.
pub fn build_registry(
    config: &SupportConfig,
    knowledge_base: Option<Arc<dyn KnowledgeBase>>,
) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    if let Some(kb) = knowledge_base {
        registry.register(ToolEntry::native(
            SearchKnowledge::NAME,
            "Search the knowledge base for information",
            SearchKnowledge::parameters(),
            SearchKnowledge::new(kb, config.knowledge_base.count, config.knowledge_base.distance),
        ))?;
    }

    let classifier = if config.troubleshoot_rules.is_empty() {
        KeywordClassifier::support_defaults()
    } else {
        KeywordClassifier::new(
            config.troubleshoot_rules.clone(),
            crate::classifier::DEFAULT_FALLBACK,
        )
    };

    registry.register(ToolEntry::native(
        InstallationHelp::NAME,
        InstallationHelp::DESCRIPTION,
        Vec::new(),
        InstallationHelp,
    ))?;
    registry.register(
        ToolEntry::native(
            Troubleshoot::NAME,
            Troubleshoot::DESCRIPTION,
            Troubleshoot::parameters(),
            Troubleshoot::new(classifier),
        )
        .with_fillers(Troubleshoot::FILLERS),
    )?;
    registry.register(ToolEntry::native(
        CreateTicket::NAME,
        CreateTicket::DESCRIPTION,
        CreateTicket::parameters(),
        CreateTicket,
    ))?;
    registry.register(ToolEntry::native(
        ReportFeedback::NAME,
        ReportFeedback::DESCRIPTION,
        ReportFeedback::parameters(),
        ReportFeedback,
    ))?;
    registry.register(ToolEntry::native(
        EscalateToHuman::NAME,
        EscalateToHuman::DESCRIPTION,
        Vec::new(),
        EscalateToHuman::new(&config.transfer_target, &config.transfer_farewell),
    ))?;

    if config.builtin_data_maps {
        for data_map in lookups::builtin_data_maps(&config.lookup_api_url)? {
            registry.register_data_map(data_map)?;
        }
    }

    for data_map in &config.data_maps {
        data_map
            .validate()
            .with_context(|| format!("Invalid data map '{}'", data_map.name))?;
        registry.register_data_map(data_map.clone())?;
    }

    info!("Registered {} tool(s)", registry.len());
    Ok(registry)
}
