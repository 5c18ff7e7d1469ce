//! Declarative webhook-backed tools.
//!
//! A `DataMap` describes a tool as "send this templated request, then
//! template this text from the response". It can be built in code with
//! [`DataMap::builder`] or loaded from the `[[data_maps]]` config table.

pub mod handler;

use crate::http::HttpMethod;
use crate::types::{ParamType, ParameterSpec};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outbound request template. Placeholders see only `${args.*}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTemplate {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// Agent-facing text template. Serialized as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputTemplate {
    pub text: String,
}

impl OutputTemplate {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Immutable descriptor of a webhook-backed tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataMap {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    pub webhook: WebhookTemplate,
    pub output: OutputTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_output: Option<OutputTemplate>,
    /// Response paths whose absence sends the call down the fallback path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_response_fields: Vec<String>,
}

impl DataMap {
    pub fn builder(name: &str) -> DataMapBuilder {
        DataMapBuilder {
            name: name.to_string(),
            description: String::new(),
            parameters: Vec::new(),
            webhook: None,
            output: None,
            fallback_output: None,
            required_response_fields: Vec::new(),
        }
    }

    /// Reject descriptors that could never produce a request.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Data map has an empty name");
        }
        if self.webhook.url.trim().is_empty() {
            bail!("Data map '{}' has an empty webhook url", self.name);
        }
        for spec in &self.parameters {
            if spec.param_type == ParamType::Enum
                && spec.enum_values.as_ref().map_or(true, |v| v.is_empty())
            {
                bail!(
                    "Data map '{}': enum parameter '{}' lists no values",
                    self.name,
                    spec.name
                );
            }
        }
        Ok(())
    }
}

/// Fluent construction for code-defined data maps.
#[derive(Debug, Clone)]
pub struct DataMapBuilder {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    webhook: Option<WebhookTemplate>,
    output: Option<OutputTemplate>,
    fallback_output: Option<OutputTemplate>,
    required_response_fields: Vec<String>,
}

impl DataMapBuilder {
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn parameter(
        mut self,
        name: &str,
        param_type: ParamType,
        description: &str,
        required: bool,
    ) -> Self {
        self.parameters
            .push(ParameterSpec::new(name, param_type, description, required));
        self
    }

    pub fn enum_parameter(
        mut self,
        name: &str,
        values: &[&str],
        description: &str,
        required: bool,
    ) -> Self {
        self.parameters
            .push(ParameterSpec::enumeration(name, values, description, required));
        self
    }

    pub fn webhook(mut self, method: HttpMethod, url: &str) -> Self {
        self.webhook = Some(WebhookTemplate {
            method,
            url: url.to_string(),
            body: None,
            headers: BTreeMap::new(),
        });
        self
    }

    /// Request body template. Must follow `webhook`.
    pub fn body(mut self, body: &str) -> Self {
        if let Some(webhook) = self.webhook.as_mut() {
            webhook.body = Some(body.to_string());
        }
        self
    }

    /// Request header template. Must follow `webhook`.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let Some(webhook) = self.webhook.as_mut() {
            webhook.headers.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn output(mut self, text: &str) -> Self {
        self.output = Some(OutputTemplate::new(text));
        self
    }

    pub fn fallback_output(mut self, text: &str) -> Self {
        self.fallback_output = Some(OutputTemplate::new(text));
        self
    }

    pub fn require_response_field(mut self, path: &str) -> Self {
        self.required_response_fields.push(path.to_string());
        self
    }

    pub fn build(self) -> Result<DataMap> {
        let Some(webhook) = self.webhook else {
            bail!("Data map '{}' has no webhook", self.name);
        };
        let Some(output) = self.output else {
            bail!("Data map '{}' has no output template", self.name);
        };
        let data_map = DataMap {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            webhook,
            output,
            fallback_output: self.fallback_output,
            required_response_fields: self.required_response_fields,
        };
        data_map.validate()?;
        Ok(data_map)
    }
}
