use anyhow::{Context, Result};
use dotenvy::dotenv;
use github_sponsors::{AccountType, Tier};
use std::env;
use std::path::Path;

/// CLI configuration loaded from environment variables and flags
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub login: String,
    pub account_type: AccountType,
}

impl Config {
    /// Load configuration from the environment; flags take precedence
    pub fn load(login: Option<String>, account_type: Option<AccountType>) -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok(), login, account_type)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        login: Option<String>,
        account_type: Option<AccountType>,
    ) -> Result<Self> {
        let token = lookup("SPONSORKIT_GITHUB_TOKEN")
            .or_else(|| lookup("GITHUB_TOKEN"))
            .filter(|token| !token.trim().is_empty())
            .context("SPONSORKIT_GITHUB_TOKEN or GITHUB_TOKEN must be set")?;

        let login = login
            .or_else(|| lookup("SPONSORKIT_GITHUB_LOGIN"))
            .context("--login or SPONSORKIT_GITHUB_LOGIN must be set")?;

        let account_type = match account_type {
            Some(account_type) => account_type,
            None => lookup("SPONSORKIT_GITHUB_TYPE")
                .map(|value| value.parse::<AccountType>())
                .transpose()
                .context("SPONSORKIT_GITHUB_TYPE must be `user` or `organization`")?
                .unwrap_or_default(),
        };

        Ok(Self {
            token,
            login,
            account_type,
        })
    }
}

/// Read a JSON tier catalog, e.g. `[{ "name": "Backer", "monthlyDollars": 5 }]`
pub fn load_tiers(path: &Path) -> Result<Vec<Tier>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tiers from {}", path.display()))?;
    parse_tiers(&contents).with_context(|| format!("Invalid tier catalog in {}", path.display()))
}

fn parse_tiers(contents: &str) -> Result<Vec<Tier>> {
    Ok(serde_json::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_only() {
        let config = Config::from_lookup(
            lookup(&[
                ("SPONSORKIT_GITHUB_TOKEN", "ghp_primary"),
                ("GITHUB_TOKEN", "ghp_fallback"),
                ("SPONSORKIT_GITHUB_LOGIN", "antfu"),
                ("SPONSORKIT_GITHUB_TYPE", "organization"),
            ]),
            None,
            None,
        )
        .unwrap();

        assert_eq!(config.token, "ghp_primary");
        assert_eq!(config.login, "antfu");
        assert_eq!(config.account_type, AccountType::Organization);
    }

    #[test]
    fn test_flags_override_env() {
        let config = Config::from_lookup(
            lookup(&[
                ("GITHUB_TOKEN", "ghp_fallback"),
                ("SPONSORKIT_GITHUB_LOGIN", "antfu"),
                ("SPONSORKIT_GITHUB_TYPE", "organization"),
            ]),
            Some("vitejs".into()),
            Some(AccountType::User),
        )
        .unwrap();

        assert_eq!(config.token, "ghp_fallback");
        assert_eq!(config.login, "vitejs");
        assert_eq!(config.account_type, AccountType::User);
    }

    #[test]
    fn test_type_defaults_to_user() {
        let config = Config::from_lookup(
            lookup(&[("GITHUB_TOKEN", "ghp_x"), ("SPONSORKIT_GITHUB_LOGIN", "antfu")]),
            None,
            None,
        )
        .unwrap();

        assert_eq!(config.account_type, AccountType::User);
    }

    #[test]
    fn test_missing_values() {
        assert!(Config::from_lookup(lookup(&[]), Some("antfu".into()), None).is_err());
        let blank = lookup(&[("GITHUB_TOKEN", "  ")]);
        assert!(Config::from_lookup(blank, Some("antfu".into()), None).is_err());
        assert!(Config::from_lookup(lookup(&[("GITHUB_TOKEN", "ghp_x")]), None, None).is_err());
        assert!(Config::from_lookup(
            lookup(&[("GITHUB_TOKEN", "ghp_x"), ("SPONSORKIT_GITHUB_TYPE", "team")]),
            Some("antfu".into()),
            None,
        )
        .is_err());
    }

    #[test]
    fn test_parse_tiers() {
        let tiers = parse_tiers(
            r#"[
                { "name": "Backer", "monthlyDollars": 5 },
                { "name": "Past Sponsors", "monthlyDollars": -1 },
                { "name": "Gold", "monthlyDollars": 100, "isOneTime": true }
            ]"#,
        )
        .unwrap();

        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0], Tier::new("Backer", 5));
        assert_eq!(tiers[2], Tier::new("Gold", 100).one_time());
        assert!(parse_tiers("{}").is_err());
    }
}
