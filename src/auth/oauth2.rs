//! Google sign-in support.
//!
//! The SPA sends us the ID token it obtained from Google Identity Services;
//! we verify it server-side against the tokeninfo endpoint and check the
//! audience matches our configured client id. The authorization-code flow
//! pieces (consent URL generation) are also provided for clients that prefer
//! a server-driven redirect.

use super::AuthError;
use chrono::Utc;
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope, TokenUrl};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Google provider configuration
#[derive(Clone, Debug)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_url: Option<String>,
}

impl GoogleOAuthConfig {
    pub fn from_app_config(cfg: &crate::config::AppConfig) -> Option<Self> {
        if !cfg.oauth2_enabled {
            return None;
        }
        cfg.oauth2_google_client_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| Self {
                client_id: id.clone(),
                client_secret: cfg.oauth2_google_client_secret.clone(),
                redirect_url: cfg.oauth2_google_redirect_url.clone(),
            })
    }

    /// Build the oauth2 client for the authorization-code flow
    pub fn build_client(&self) -> Result<BasicClient, AuthError> {
        let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string())
            .map_err(|e| AuthError::InternalError(format!("Invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
            .map_err(|e| AuthError::InternalError(format!("Invalid token URL: {}", e)))?;

        let mut client = BasicClient::new(
            ClientId::new(self.client_id.clone()),
            self.client_secret.clone().map(ClientSecret::new),
            auth_url,
            Some(token_url),
        );

        if let Some(redirect) = &self.redirect_url {
            let redirect = RedirectUrl::new(redirect.clone())
                .map_err(|e| AuthError::InternalError(format!("Invalid redirect URL: {}", e)))?;
            client = client.set_redirect_uri(redirect);
        }

        Ok(client)
    }

    /// Generate the consent-screen URL for the redirect flow
    pub fn authorize_url(&self) -> Result<(Url, CsrfToken), AuthError> {
        let client = self.build_client()?;
        let (url, csrf) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url();
        Ok((url, csrf))
    }
}

/// Claims Google reports for a verified ID token
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenInfo {
    pub aud: String,
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: String,
}

/// Verified profile extracted from a Google ID token
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

/// Verifies Google ID tokens against the tokeninfo endpoint
#[derive(Clone, Debug)]
pub struct GoogleTokenVerifier {
    expected_client_id: String,
    tokeninfo_endpoint: String,
    http: reqwest::Client,
}

impl GoogleTokenVerifier {
    pub fn new(expected_client_id: String) -> Self {
        Self {
            expected_client_id,
            tokeninfo_endpoint: GOOGLE_TOKENINFO_URL.to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Point verification at a different endpoint (tests)
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.tokeninfo_endpoint = endpoint;
        self
    }

    /// Verify an ID token and extract the holder's profile
    pub async fn verify_id_token(&self, id_token: &str) -> Result<GoogleProfile, AuthError> {
        if id_token.trim().is_empty() {
            return Err(AuthError::OAuthVerification("Empty ID token".into()));
        }

        let response = self
            .http
            .get(&self.tokeninfo_endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AuthError::OAuthVerification(format!("tokeninfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::OAuthVerification(format!(
                "Google rejected the token (status {})",
                response.status()
            )));
        }

        let info: GoogleTokenInfo = response
            .json()
            .await
            .map_err(|e| AuthError::OAuthVerification(format!("Malformed tokeninfo body: {}", e)))?;

        validate_token_info(&info, &self.expected_client_id)
    }
}

/// Check audience, verification status, and expiry of reported claims
fn validate_token_info(
    info: &GoogleTokenInfo,
    expected_client_id: &str,
) -> Result<GoogleProfile, AuthError> {
    if info.aud != expected_client_id {
        return Err(AuthError::OAuthVerification(
            "ID token audience does not match the configured client id".into(),
        ));
    }

    if info.email_verified.as_deref() != Some("true") {
        return Err(AuthError::OAuthVerification(
            "Google account email is not verified".into(),
        ));
    }

    let exp: i64 = info
        .exp
        .parse()
        .map_err(|_| AuthError::OAuthVerification("Malformed exp claim".into()))?;
    if exp <= Utc::now().timestamp() {
        return Err(AuthError::OAuthVerification("ID token has expired".into()));
    }

    Ok(GoogleProfile {
        subject: info.sub.clone(),
        email: info.email.clone(),
        name: info.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_info(aud: &str, verified: &str, exp_offset: i64) -> GoogleTokenInfo {
        GoogleTokenInfo {
            aud: aud.to_string(),
            sub: "10769150350006150715113082367".to_string(),
            email: "jane@example.com".to_string(),
            email_verified: Some(verified.to_string()),
            name: Some("Jane Doe".to_string()),
            exp: (Utc::now().timestamp() + exp_offset).to_string(),
        }
    }

    const CLIENT_ID: &str = "my-client.apps.googleusercontent.com";

    #[test]
    fn accepts_valid_token_info() {
        let info = token_info(CLIENT_ID, "true", 3600);
        let profile = validate_token_info(&info, CLIENT_ID).unwrap();
        assert_eq!(profile.email, "jane@example.com");
        assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn rejects_wrong_audience() {
        let info = token_info("other-client.apps.googleusercontent.com", "true", 3600);
        assert!(validate_token_info(&info, CLIENT_ID).is_err());
    }

    #[test]
    fn rejects_unverified_email() {
        let info = token_info(CLIENT_ID, "false", 3600);
        assert!(validate_token_info(&info, CLIENT_ID).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let info = token_info(CLIENT_ID, "true", -60);
        assert!(validate_token_info(&info, CLIENT_ID).is_err());
    }

    #[test]
    fn authorize_url_includes_scopes_and_state() {
        let cfg = GoogleOAuthConfig {
            client_id: CLIENT_ID.to_string(),
            client_secret: Some("secret".to_string()),
            redirect_url: Some("https://app.example.com/auth/callback".to_string()),
        };
        let (url, _csrf) = cfg.authorize_url().unwrap();
        let query: String = url.query().unwrap_or_default().to_string();
        assert!(query.contains("scope="));
        assert!(query.contains("state="));
        assert!(query.contains("client_id="));
    }
}
