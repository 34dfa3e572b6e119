//! cli::commands::analyze
//!
//! Analyze command: run the LLM pipeline over cached issues.

use anyhow::{bail, Result};
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::cli::Context;
use crate::llm::OpenAiModel;
use crate::service::{AnalysisMode, AnalyzeService};

/// Run the analyze command.
pub async fn analyze(ctx: &Context, repo: &str, prompt: &str, mode: AnalysisMode) -> Result<()> {
    let repo = super::parse_repo(repo)?;
    if prompt.trim().is_empty() {
        bail!("The analysis prompt must not be empty.");
    }

    let Some(api_key) = ctx.config.openai.api_key.clone() else {
        bail!(
            "No OpenAI API key configured. Set OPENAI_API_KEY or add \
             'api_key' under [openai] in the config file."
        );
    };

    let model_name = ctx.config.openai_model().to_string();
    let model = match ctx.config.openai.api_base {
        Some(ref base) => OpenAiModel::with_api_base(api_key, model_name, base.clone()),
        None => OpenAiModel::new(api_key, model_name),
    };

    let store = super::open_store(ctx).await?;
    let analyzer = Analyzer::with_tuning(Some(Arc::new(model)), ctx.config.tuning());
    let service = AnalyzeService::new(store, analyzer);

    if !ctx.quiet {
        println!("Analyzing {} in {} mode...", repo, mode);
    }

    let analysis = service.analyze(&repo, prompt, mode).await?;
    println!("{}", analysis);
    Ok(())
}
