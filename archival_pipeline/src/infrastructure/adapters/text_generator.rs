// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! REST adapter for [`TextGenerator`] (§6.3): a local-LLM-server client
//! speaking the common OpenAI-compatible `/v1/completions` shape. Grounded
//! on the teacher's `reqwest` REST-adapter pattern, same as
//! `ContentExtractorAdapter`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::services::text_generator::{GenerationOptions, TextGenerator};

pub struct HttpTextGenerator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTextGenerator {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|err| PipelineError::invalid_config(err.to_string()))?;
        Ok(Self { client, base_url: base_url.into() })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, model: &str, prompt: &str, options: &GenerationOptions) -> Result<String, PipelineError> {
        let request = CompletionRequest {
            model,
            prompt,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
        };
        let response = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| PipelineError::internal_error(format!("text generator request failed: {err}")))?;
        if !response.status().is_success() {
            return Err(PipelineError::internal_error(format!("text generator HTTP {}", response.status())));
        }
        let body: CompletionResponse = response.json().await.map_err(|err| PipelineError::internal_error(format!("text generator response: {err}")))?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| PipelineError::internal_error("text generator returned no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_generation_options() {
        let request = CompletionRequest { model: "local-llm", prompt: "describe this file", temperature: 0.2, max_tokens: 256, top_p: 0.9 };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "local-llm");
        assert_eq!(json["max_tokens"], 256);
    }
}
