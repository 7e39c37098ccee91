pub mod graph;
pub mod preview;
pub mod programs;

use crate::programs::ProgramSpec;
use stratus_core::{ProgramConfig, Stack};

/// Parse `-c key=value` occurrences into a program configuration
pub fn parse_config(entries: &[String]) -> anyhow::Result<ProgramConfig> {
    let mut config = ProgramConfig::new();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid config entry '{entry}', expected key=value"))?;
        config.set(key, value);
    }
    Ok(config)
}

pub fn build_stack(name: &str, entries: &[String]) -> anyhow::Result<(&'static ProgramSpec, Stack)> {
    let program = crate::programs::find(name).ok_or_else(|| {
        anyhow::anyhow!("unknown program '{name}' (run `stratus programs` for the list)")
    })?;
    let config = parse_config(entries)?;
    let stack = (program.build)(&config)?;
    tracing::debug!(
        "built stack '{}': {} resource(s), {} export(s)",
        stack.name(),
        stack.resources().len(),
        stack.exports().len()
    );
    Ok((program, stack))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config_splits_on_the_first_equals() {
        let config =
            parse_config(&["domain=example.com".to_string(), "note=a=b".to_string()]).unwrap();
        assert_eq!(config.get("domain"), Some("example.com"));
        assert_eq!(config.get("note"), Some("a=b"));
    }

    #[test]
    fn parse_config_rejects_bare_keys() {
        assert!(parse_config(&["domain".to_string()]).is_err());
    }
}
