//! Embed command

use crate::app::{EmbedArgs, OutputFormat};
use anyhow::Result;
use reqlens_core::{Config, EmbeddingPipeline};

pub async fn run(args: EmbedArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let pipeline = EmbeddingPipeline::from_config(&config.embedding)?;
    let result = pipeline.embed(&args.texts).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Cli => {
            println!("Model:       {}", result.model);
            println!("Fallback:    {}", result.fallback);
            println!("Tokens:      {}", result.usage.total_tokens);
            println!("Vectors:     {}", result.embeddings.len());
            for (text, vector) in args.texts.iter().zip(&result.embeddings) {
                let preview: Vec<String> =
                    vector.iter().take(4).map(|c| format!("{:.4}", c)).collect();
                println!(
                    "  {:<24} [{}, ...] ({} dims)",
                    truncate(text, 24),
                    preview.join(", "),
                    vector.len()
                );
            }
        }
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("日本語のテキスト", 5), "日本...");
    }
}
