use colored::Colorize;

/// Print the dependency edges of a program's deferred-value graph
pub fn handle(program: &str, config: &[String]) -> anyhow::Result<()> {
    let (spec, stack) = super::build_stack(program, config)?;
    println!(
        "{}",
        format!(
            "Graph of '{}': {} resource(s), {} edge(s)",
            spec.name,
            stack.resources().len(),
            stack.graph().edges().len()
        )
        .bold()
    );
    for (consumer, dependency) in stack.graph().edges() {
        println!("  {} -> {}", consumer.cyan(), dependency);
    }
    Ok(())
}
