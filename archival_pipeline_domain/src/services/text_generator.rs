// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `TextGenerator` port (§6.3): the LLM server collaborator used only
//! by the AI technical-description enrichment pass.

use async_trait::async_trait;

use crate::error::PipelineError;

/// Generation parameters a caller may tune per request (§6.3).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { temperature: 0.2, max_tokens: 256, top_p: 0.9 }
    }
}

/// Given a model name, a prompt, and generation options, returns a single
/// generated string (§6.3). Retries and throttling are the caller's
/// responsibility, not the port's.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str, options: &GenerationOptions) -> Result<String, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generation_options_are_conservative() {
        let opts = GenerationOptions::default();
        assert!(opts.temperature < 0.5);
        assert!(opts.top_p > 0.0 && opts.top_p <= 1.0);
    }
}
