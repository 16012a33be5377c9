// Analyze a document and embed its keywords using reqlens as a library
//
// Credentials come from ANTHROPIC_API_KEY / OPENAI_API_KEY. Without an
// embedding key the keyword vectors are synthetic (fallback: true).

use reqlens_core::{Config, Pipelines};

#[tokio::main]
async fn main() -> reqlens_core::Result<()> {
    println!("Reqlens Document Analysis Example\n");

    let config = Config::load()?;
    let pipelines = Pipelines::from_config(&config)?;

    let document = r#"Project: Field Service App

Technicians need a mobile app to receive work orders, record parts used and
capture customer signatures. Dispatchers assign jobs from a web dashboard.
The app must work offline for up to 8 hours and sync when back online.
Customer data must be encrypted at rest."#;

    println!("Analyzing {} characters...", document.chars().count());
    let result = pipelines.analysis.analyze(document).await?;

    let analysis = &result.analysis;
    println!("Title:      {}", analysis.project_overview.title);
    println!("Confidence: {:.2}", analysis.confidence_score);
    println!("Truncated:  {}", result.truncated);
    println!("\nFunctional requirements:");
    for req in &analysis.functional_requirements {
        println!("  [{:?}] {} ({} days)", req.priority, req.title, req.estimated_effort);
    }
    println!("\nRisks:");
    for risk in &analysis.risk_factors {
        println!(
            "  {} (probability {:?}, impact {:?})",
            risk.title, risk.probability, risk.impact
        );
    }

    if analysis.keywords.is_empty() {
        return Ok(());
    }

    let embeddings = pipelines.embedding.embed(&analysis.keywords).await?;
    println!(
        "\nEmbedded {} keywords with {} (fallback: {})",
        embeddings.embeddings.len(),
        embeddings.model,
        embeddings.fallback
    );

    Ok(())
}
