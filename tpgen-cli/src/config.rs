use anyhow::{Context, Result, bail};
use std::path::Path;
use tpgen_core::GenerationOptions;
use tpgen_model::OpenAiConfig;

pub struct Config {
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self { api_key })
    }

    pub fn openai(&self, model: &str) -> OpenAiConfig {
        OpenAiConfig::new(&self.api_key, model)
    }
}

/// Parse run options from TOML text and validate them once, so bad input
/// fails before any network traffic.
pub fn parse_options(text: &str) -> Result<GenerationOptions> {
    let options: GenerationOptions =
        toml::from_str(text).context("failed to parse options file")?;
    options.validate().context("invalid options")?;
    Ok(options)
}

pub fn load_options(path: &Path) -> Result<GenerationOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    parse_options(&text)
}

/// Load the requirement corpus: a single file verbatim, or every .txt and
/// .md file in a directory joined in name order.
pub fn load_corpus(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read requirements file {}", path.display()));
    }

    let mut entries: Vec<_> = std::fs::read_dir(path)
        .with_context(|| format!("failed to read requirements directory {}", path.display()))?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("txt") | Some("md")
            )
        })
        .collect();
    entries.sort();

    if entries.is_empty() {
        bail!("no .txt or .md files found in {}", path.display());
    }

    let mut parts = Vec::with_capacity(entries.len());
    for file in entries {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        parts.push(text.trim().to_string());
    }
    Ok(parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpgen_core::Domain;

    #[test]
    fn test_parse_minimal_options() {
        let options = parse_options(
            r#"
            application_name = "Storefront"
            created_by = "QA Lead"
            creation_date = "2026-03-01"
            domain = "E-Commerce"
            "#,
        )
        .unwrap();
        assert_eq!(options.application_name, "Storefront");
        assert_eq!(options.domain, Domain::ECommerce);
        assert!(options.approvers.is_empty());
    }

    #[test]
    fn test_parse_options_with_team_and_stack() {
        let options = parse_options(
            r#"
            application_name = "Storefront"
            created_by = "QA Lead"
            creation_date = "2026-03-01"
            domain = "Finances"
            keywords = ["payments", "ledger"]

            [tech_stack]
            frontend = { named = "React" }

            [team]
            functional_testers = 2
            performance = true
            performance_testers = 1
            "#,
        )
        .unwrap();
        assert_eq!(options.keywords, vec!["payments", "ledger"]);
        assert!(options.team.performance);
        assert_eq!(options.team.performance_testers, 1);
        assert!(options.tech_stack.describe().contains("React"));
    }

    #[test]
    fn test_inconsistent_options_rejected() {
        let error = parse_options(
            r#"
            application_name = "Storefront"
            created_by = "QA Lead"
            creation_date = "2026-03-01"
            domain = "E-Commerce"

            [team]
            security_testers = 2
            "#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("invalid options"));
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let error = parse_options(
            r#"
            application_name = "Storefront"
            created_by = "QA Lead"
            creation_date = "2026-03-01"
            domain = "Interplanetary"
            "#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("parse"));
    }
}
