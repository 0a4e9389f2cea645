use std::fmt;

use crate::args::Args;

/// Where to reach the panel API and how to authenticate against it.
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(args.api_url.clone(), args.api_key.clone())
    }

    /// Full URL for an endpoint path such as `/nodes`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Extra query parameters sent with every page request.
pub fn page_params(per_page: Option<u32>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(n) = per_page {
        params.push(("per_page".to_string(), n.to_string()));
    }
    params
}
