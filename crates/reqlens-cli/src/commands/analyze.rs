//! Analyze command

use crate::app::{AnalyzeArgs, OutputFormat};
use anyhow::{Context, Result};
use reqlens_core::{Config, DocumentAnalysis, Pipelines};
use std::io::Read;

pub async fn run(args: AnalyzeArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let text = read_input(&args.input)?;
    let pipelines = Pipelines::from_config(config)?;
    let result = pipelines.analysis.analyze(&text).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Cli => print_summary(&result),
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read document from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
}

fn print_summary(result: &DocumentAnalysis) {
    let analysis = &result.analysis;
    let overview = &analysis.project_overview;

    println!("{}", overview.title);
    println!("{}", overview.description);
    println!();
    println!("Scope:       {}", overview.scope);
    println!("Confidence:  {:.2}", analysis.confidence_score);
    println!("Model:       {}", result.model);
    println!(
        "Tokens:      {} in / {} out",
        result.usage.input_tokens, result.usage.output_tokens
    );
    if result.truncated {
        println!(
            "Truncated:   yes ({} characters in the original)",
            result.original_length
        );
    }

    if !overview.objectives.is_empty() {
        println!();
        println!("Objectives:");
        for objective in &overview.objectives {
            println!("  - {}", objective);
        }
    }

    if !analysis.functional_requirements.is_empty() {
        println!();
        println!("Functional requirements:");
        for req in &analysis.functional_requirements {
            println!(
                "  [{}] {} ({}, {} days)",
                req.priority.as_str(),
                req.title,
                req.category,
                req.estimated_effort
            );
            for criterion in &req.acceptance_criteria {
                println!("      - {}", criterion);
            }
        }
    }

    if !analysis.non_functional_requirements.is_empty() {
        println!();
        println!("Non-functional requirements:");
        for req in &analysis.non_functional_requirements {
            println!(
                "  [{}] {}: {} {}",
                req.priority.as_str(),
                req.title,
                req.metric,
                req.target_value
            );
        }
    }

    if !analysis.risk_factors.is_empty() {
        println!();
        println!("Risks:");
        for risk in &analysis.risk_factors {
            println!(
                "  {} (probability {}, impact {})",
                risk.title,
                risk.probability.as_str(),
                risk.impact.as_str()
            );
            println!("      mitigation: {}", risk.mitigation);
        }
    }

    if !analysis.keywords.is_empty() {
        println!();
        println!("Keywords: {}", analysis.keywords.join(", "));
    }
}
