use std::collections::HashMap;

use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use super::request::{AuthorizationResponse, PromptOutcome};

/// The interactive half of a login: show the provider's page to a human and
/// wait for the redirect it eventually produces.
#[async_trait::async_trait]
pub trait Prompt: Send + Sync {
    /// Returns the redirect URL the provider sent the user to, or `None` if the
    /// user gave up.
    async fn prompt(&self, authorize_url: &Url, redirect_uri: &str)
        -> Result<Option<String>, String>;
}

/// Prints the authorize URL and reads the redirect URL back from stdin.
/// An empty line or EOF cancels.
#[derive(Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        ConsolePrompt
    }
}

#[async_trait::async_trait]
impl Prompt for ConsolePrompt {
    async fn prompt(
        &self,
        authorize_url: &Url,
        redirect_uri: &str,
    ) -> Result<Option<String>, String> {
        eprintln!("Open this URL in a browser to sign in:\n\n  {}\n", authorize_url);
        eprintln!(
            "Then paste the address you were redirected to (it starts with '{}'),\nor press Enter to cancel:",
            redirect_uri
        );

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| format!("Failed to read redirect URL: {}", e))?;

        let line = line.trim();
        if read == 0 || line.is_empty() {
            return Ok(None);
        }
        Ok(Some(line.to_string()))
    }
}

/// Turns a redirect URL into a prompt outcome. Parameters are read from the
/// query and the fragment (implicit flow puts them in the fragment, which wins).
pub fn parse_redirect(raw: &str) -> Result<PromptOutcome, String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("Invalid redirect URL: {}", e))?;

    let mut params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    if let Some(fragment) = url.fragment() {
        params.extend(url::form_urlencoded::parse(fragment.as_bytes()).into_owned());
    }

    if let Some(code) = params.remove("error") {
        return Ok(PromptOutcome::Error {
            code,
            description: params.remove("error_description"),
        });
    }

    Ok(PromptOutcome::Success(AuthorizationResponse::new(params)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_redirect() {
        let outcome = parse_redirect(
            "pantrychef://callback#access_token=abc123&token_type=Bearer&expires_in=7200&state=s1",
        )
        .unwrap();

        match outcome {
            PromptOutcome::Success(response) => {
                assert_eq!(response.access_token(), Some("abc123"));
                assert_eq!(response.state(), Some("s1"));
                assert_eq!(response.params["token_type"], "Bearer");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_redirect() {
        let outcome = parse_redirect(
            "https://app.example/callback?error=access_denied&error_description=User%20did%20not%20authorize",
        )
        .unwrap();
        assert_eq!(
            outcome,
            PromptOutcome::Error {
                code: "access_denied".into(),
                description: Some("User did not authorize".into()),
            }
        );
    }

    #[test]
    fn test_parse_redirect_without_token_is_still_success() {
        let outcome = parse_redirect("pantrychef://callback#state=s1").unwrap();
        match outcome {
            PromptOutcome::Success(response) => assert_eq!(response.access_token(), None),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(parse_redirect("definitely not a url").is_err());
    }
}
