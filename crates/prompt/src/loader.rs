//! Prompt loader for YAML prompt definitions.

use crate::defaults::{builtin_yaml, ASK_PROMPT_ID, PRIME_PROMPT_ID};
use crate::types::PromptDefinition;
use chatbox_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Load a prompt definition by ID.
///
/// A file named `<id>.yml` in the workspace's `.chatbox/prompts/` directory
/// takes precedence over the built-in definition of the same id.
///
/// # Example
/// ```no_run
/// use chatbox_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "article.ask")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompt_path(workspace_path, prompt_id);

    let definition = if prompt_file.exists() {
        tracing::debug!("Loading prompt override from: {:?}", prompt_file);

        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;

        serde_yaml::from_str::<PromptDefinition>(&contents).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to parse prompt YAML {:?}: {}",
                prompt_file, e
            ))
        })?
    } else {
        builtin_prompt(prompt_id)?
    };

    validate_prompt(&definition)?;

    tracing::debug!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Parse the built-in definition for an id.
pub fn builtin_prompt(prompt_id: &str) -> AppResult<PromptDefinition> {
    let yaml = builtin_yaml(prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))?;

    let definition: PromptDefinition = serde_yaml::from_str(yaml).map_err(|e| {
        AppError::Prompt(format!("Invalid built-in prompt {}: {}", prompt_id, e))
    })?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Location of a workspace prompt override.
pub fn prompt_path(workspace_path: &Path, prompt_id: &str) -> PathBuf {
    workspace_path
        .join(".chatbox/prompts")
        .join(format!("{}.yml", prompt_id))
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

/// The two prompts an article session needs.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// System priming instruction
    pub prime: PromptDefinition,

    /// Per-question prompt
    pub ask: PromptDefinition,
}

impl PromptSet {
    /// Built-in prompts, ignoring any workspace overrides.
    pub fn builtin() -> AppResult<Self> {
        Ok(Self {
            prime: builtin_prompt(PRIME_PROMPT_ID)?,
            ask: builtin_prompt(ASK_PROMPT_ID)?,
        })
    }

    /// Prompts for a workspace, honoring overrides.
    pub fn load(workspace_path: &Path) -> AppResult<Self> {
        Ok(Self {
            prime: load_prompt(workspace_path, PRIME_PROMPT_ID)?,
            ask: load_prompt(workspace_path, ASK_PROMPT_ID)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_override(dir: &Path, id: &str, content: &str) {
        let prompts_dir = dir.join(".chatbox/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();
        fs::write(prompts_dir.join(format!("{}.yml", id)), content).unwrap();
    }

    #[test]
    fn test_builtin_prompts_load() {
        let set = PromptSet::builtin().unwrap();
        assert_eq!(set.prime.id, PRIME_PROMPT_ID);
        assert_eq!(set.ask.id, ASK_PROMPT_ID);
        assert!(set.prime.template.contains("{{context}}"));
        assert!(set.ask.template.contains("{{question}}"));
        assert!(set.ask.template.ends_with("Your response:"));
    }

    #[test]
    fn test_override_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        write_override(
            temp_dir.path(),
            ASK_PROMPT_ID,
            r#"
id: article.ask
title: "Terse"
apiVersion: "1.1"
template: "Q: {{question}}"
"#,
        );

        let set = PromptSet::load(temp_dir.path()).unwrap();
        assert_eq!(set.ask.template, "Q: {{question}}");
        assert_eq!(set.prime.title, "Article session priming");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_override(temp_dir.path(), PRIME_PROMPT_ID, "invalid: yaml: content:");
        assert!(load_prompt(temp_dir.path(), PRIME_PROMPT_ID).is_err());

        write_override(
            temp_dir.path(),
            PRIME_PROMPT_ID,
            "id: article.prime\ntitle: x\napiVersion: \"1\"\ntemplate: \"{{context}}\"\n",
        );
        assert!(load_prompt(temp_dir.path(), PRIME_PROMPT_ID).is_err());
    }

    #[test]
    fn test_unknown_prompt() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_prompt(temp_dir.path(), "nonexistent").is_err());
    }
}
