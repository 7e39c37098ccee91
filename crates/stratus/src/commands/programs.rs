use colored::Colorize;

/// List the built-in programs and the configuration keys they read
pub fn handle() {
    for program in crate::programs::all() {
        println!("{}", program.name.cyan().bold());
        println!("  {}", program.description);
        for key in program.config_keys {
            match key.default {
                Some(default) => println!(
                    "    -c {}=...  {} (default: {})",
                    key.name,
                    key.description,
                    default.dimmed()
                ),
                None => println!(
                    "    -c {}=...  {} {}",
                    key.name,
                    key.description,
                    "(required)".yellow()
                ),
            }
        }
        println!();
    }
}
