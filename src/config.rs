use anyhow::{Context, Result};

/// Everything the action needs, resolved once at startup and passed down
/// explicitly. Inputs arrive the way GitHub Actions delivers them:
/// `INPUT_<UPPERCASED NAME>` environment variables, with the empty string
/// meaning "not set". The two tokens come from plain `ado_token` /
/// `github_token` environment variables and must never be logged.
//
// No Debug derive: the struct holds both credentials.
pub struct ActionConfig {
    pub label: Option<String>,
    pub organization: String,
    pub project: String,
    pub work_item_type: String,
    pub tags: Option<String>,
    pub area_path: String,
    pub product: Option<String>,
    pub parent_work_item: Option<String>,
    pub dont_check_if_exist: bool,
    pub ado_token: String,
    pub github_token: String,
}

impl ActionConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup. Production uses
    /// the process environment; tests pass a closure over a map.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let input = |name: &str| {
            get(&format!("INPUT_{}", name.to_uppercase())).filter(|v| !v.is_empty())
        };

        let organization = input("ado_organization")
            .context("Missing required input: ado_organization")?;
        let project = input("ado_project").context("Missing required input: ado_project")?;
        let ado_token = get("ado_token")
            .filter(|v| !v.is_empty())
            .context("The ado_token environment variable is not set")?;
        let github_token = get("github_token")
            .filter(|v| !v.is_empty())
            .context("The github_token environment variable is not set")?;

        Ok(Self {
            label: input("label"),
            organization,
            project,
            work_item_type: input("ado_work_item_type").unwrap_or_else(|| "Bug".to_string()),
            tags: input("ado_tags"),
            // The original action always writes the area path, even when the
            // input is empty, so this stays a plain String.
            area_path: input("ado_area_path").unwrap_or_default(),
            product: input("ado_product"),
            parent_work_item: input("parent_work_item"),
            dont_check_if_exist: input("ado_dont_check_if_exist").is_some(),
            ado_token,
            github_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn minimal() -> HashMap<String, String> {
        vars(&[
            ("INPUT_ADO_ORGANIZATION", "acme"),
            ("INPUT_ADO_PROJECT", "Widgets"),
            ("ado_token", "pat-secret"),
            ("github_token", "gh-secret"),
        ])
    }

    #[test]
    fn minimal_config_applies_defaults() {
        let env = minimal();
        let config = ActionConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.organization, "acme");
        assert_eq!(config.project, "Widgets");
        assert_eq!(config.work_item_type, "Bug");
        assert_eq!(config.label, None);
        assert_eq!(config.tags, None);
        assert_eq!(config.area_path, "");
        assert_eq!(config.product, None);
        assert_eq!(config.parent_work_item, None);
        assert!(!config.dont_check_if_exist);
    }

    #[test]
    fn all_inputs_are_read() {
        let mut env = minimal();
        env.extend(vars(&[
            ("INPUT_LABEL", "bug"),
            ("INPUT_ADO_WORK_ITEM_TYPE", "User Story"),
            ("INPUT_ADO_TAGS", "team-a;mirrored"),
            ("INPUT_ADO_AREA_PATH", "Widgets\\Platform"),
            ("INPUT_ADO_PRODUCT", "Widgets"),
            ("INPUT_PARENT_WORK_ITEM", "1234"),
            ("INPUT_ADO_DONT_CHECK_IF_EXIST", "1"),
        ]));
        let config = ActionConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.label.as_deref(), Some("bug"));
        assert_eq!(config.work_item_type, "User Story");
        assert_eq!(config.tags.as_deref(), Some("team-a;mirrored"));
        assert_eq!(config.area_path, "Widgets\\Platform");
        assert_eq!(config.product.as_deref(), Some("Widgets"));
        assert_eq!(config.parent_work_item.as_deref(), Some("1234"));
        assert!(config.dont_check_if_exist);
    }

    #[test]
    fn empty_input_counts_as_unset() {
        let mut env = minimal();
        env.insert("INPUT_LABEL".to_string(), String::new());
        let config = ActionConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.label, None);
    }

    #[test]
    fn missing_organization_is_an_error() {
        let mut env = minimal();
        env.remove("INPUT_ADO_ORGANIZATION");
        let err = ActionConfig::from_lookup(|k| env.get(k).cloned()).err().unwrap();
        assert!(err.to_string().contains("ado_organization"));
    }

    #[test]
    fn missing_tokens_are_errors() {
        let mut env = minimal();
        env.remove("ado_token");
        let err = ActionConfig::from_lookup(|k| env.get(k).cloned()).err().unwrap();
        assert!(err.to_string().contains("ado_token"));

        let mut env = minimal();
        env.insert("github_token".to_string(), String::new());
        let err = ActionConfig::from_lookup(|k| env.get(k).cloned()).err().unwrap();
        assert!(err.to_string().contains("github_token"));
    }
}
