use colored::Colorize;
use stratus_engine::{deploy, ExportOutcome, OutcomeStatus, SimulatedEngine};

/// Build a program and drive it through the simulated engine
pub async fn handle(program: &str, config: &[String]) -> anyhow::Result<()> {
    let (spec, mut stack) = super::build_stack(program, config)?;
    println!(
        "{}",
        format!("Previewing '{}' (simulated engine)", spec.name).bold()
    );

    let engine = SimulatedEngine::new()
        .with_provider("aws", stratus_aws::synthesize)
        .with_provider("azure", stratus_azure::synthesize);
    let result = deploy(&mut stack, &engine).await?;

    println!();
    for outcome in &result.outcomes {
        let label = format!("{}:{}", outcome.provider, outcome.kind);
        match &outcome.status {
            OutcomeStatus::Created { id } => {
                println!(
                    "  {} {} ({}) -> {}",
                    "+".green().bold(),
                    outcome.resource,
                    label.dimmed(),
                    id.cyan()
                );
            }
            OutcomeStatus::Failed { message } => {
                println!(
                    "  {} {} ({}) {}",
                    "x".red().bold(),
                    outcome.resource,
                    label.dimmed(),
                    message.red()
                );
            }
            OutcomeStatus::Blocked { on } => {
                println!(
                    "  {} {} ({}) blocked on {}",
                    "?".yellow().bold(),
                    outcome.resource,
                    label.dimmed(),
                    on.yellow()
                );
            }
        }
    }

    println!();
    println!("{}", "Exports:".bold());
    for (name, export) in &result.exports {
        match export {
            ExportOutcome::Resolved(value) => {
                let rendered = match value.as_str() {
                    Some(text) => text.to_string(),
                    None => value.to_string(),
                };
                println!("  {} = {}", name.cyan(), rendered);
            }
            ExportOutcome::Failed { source, reason } => {
                println!(
                    "  {} = {}",
                    name.cyan(),
                    format!("failed ('{source}': {reason})").red()
                );
            }
        }
    }

    println!();
    if result.is_success() {
        println!(
            "{}",
            format!(
                "{} resource(s) created in {} ms",
                result.outcomes.len(),
                result.duration_ms
            )
            .green()
        );
        Ok(())
    } else {
        anyhow::bail!("preview finished with failures")
    }
}
