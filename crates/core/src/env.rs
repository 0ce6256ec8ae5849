//! Environment variable names and the explicit-then-environment resolution chain.

/// Main ContextForce API key.
pub const CONTEXTFORCE_API_KEY: &str = "CONTEXTFORCE_API_KEY";

/// Overrides the User-Agent sent with every request.
pub const CONTEXTFORCE_USER_AGENT: &str = "CONTEXTFORCE_USER_AGENT";

/// Fallback for the OpenAI key forwarded to LLM-backed PDF extraction.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Fallback for the Anthropic key forwarded to LLM-backed PDF extraction.
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Fallback for the Gemini key forwarded to LLM-backed PDF extraction.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Path to an optional TOML config file.
pub const CONFIG_FILE: &str = "CONTEXTFORCE_CONFIG_FILE";

/// Prefix for environment overrides of [`crate::ClientConfig`] fields.
pub const CONFIG_PREFIX: &str = "CONTEXTFORCE_";

/// Resolve a setting from an explicit value, falling back to the process environment.
///
/// Empty strings count as absent at both steps.
pub fn resolve(explicit: Option<&str>, env_var: &str) -> Option<String> {
    resolve_with(explicit, env_var, |name| std::env::var(name).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with<F>(explicit: Option<&str>, env_var: &str, lookup: F) -> Option<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    match explicit {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => lookup(env_var).filter(|value| !value.is_empty()),
    }
}
