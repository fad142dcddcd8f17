use crate::error::DataTaleError;

/// Environment variable holding the API proxy bearer token.
pub const TOKEN_ENV_VAR: &str = "AIPROXY_TOKEN";

/// Chat-completions endpoint all requests are sent to.
pub const DEFAULT_ENDPOINT: &str = "https://aiproxy.sanand.workers.dev/openai/v1/chat/completions";

/// Model used when none is given on the command line.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Reads the API token from the environment.
///
/// Absence (or an empty value) is a startup failure: the caller is expected
/// to terminate the process before any dataset work begins.
pub fn resolve_api_token() -> Result<String, DataTaleError> {
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(DataTaleError::MissingCredential(TOKEN_ENV_VAR)),
    }
}
