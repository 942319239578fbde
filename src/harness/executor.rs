use crate::harness::error::HarnessResult;
use crate::harness::types::{LoadTestConfig, Outcome};
use crate::tls::{client_config, TlsPolicy};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, StatusCode, Url};

/// Performs one GET against the target and classifies the result.
///
/// Every call resolves to exactly one [`Outcome`]; transport errors are
/// folded into [`Outcome::OtherFailure`] and never returned.
pub struct RequestExecutor {
    client: Client,
    url: Url,
    header_name: HeaderName,
    header_value: HeaderValue,
    expected_body: String,
}

impl RequestExecutor {
    /// Validate `config` and build the HTTP client for it.
    pub fn new(config: &LoadTestConfig) -> HarnessResult<Self> {
        let url = config.validate()?;
        let (header_name, header_value) = config.header()?;
        let policy = TlsPolicy::from_allow_self_signed(config.allow_self_signed_tls);

        Ok(Self {
            client: build_client(config, policy)?,
            url,
            header_name,
            header_value,
            expected_body: config.expected_body.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn execute(&self) -> Outcome {
        let response = match self
            .client
            .get(self.url.clone())
            .header(self.header_name.clone(), self.header_value.clone())
            .send()
            .await
        {
            Ok(response) => response,
            Err(_) => return Outcome::OtherFailure,
        };

        let status = response.status();
        if status != StatusCode::OK {
            // Drain so the connection goes back to the pool instead of lingering
            let _ = response.bytes().await;
            return classify(status, None, &self.expected_body);
        }

        match response.text().await {
            Ok(body) => classify(status, Some(&body), &self.expected_body),
            Err(_) => Outcome::OtherFailure,
        }
    }
}

/// Map a status code and (for 200 responses) the body to an outcome.
///
/// Line terminators (`\n`, `\r\n` and a lone `\r`) are dropped from the body
/// before comparing, so a trailing newline after the expected text still
/// counts as success.
pub fn classify(status: StatusCode, body: Option<&str>, expected_body: &str) -> Outcome {
    match status {
        StatusCode::OK => match body {
            Some(body) if body.split(['\r', '\n']).collect::<String>() == expected_body => {
                Outcome::Success
            }
            _ => Outcome::OtherFailure,
        },
        StatusCode::NOT_FOUND => Outcome::NotFound,
        _ => Outcome::OtherFailure,
    }
}

fn build_client(config: &LoadTestConfig, policy: TlsPolicy) -> HarnessResult<Client> {
    let mut builder = Client::builder();

    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }

    if let Some(tls) = client_config(policy)? {
        tracing::warn!(
            target_url = %config.target_url,
            "SECURITY WARNING: TLS certificate and hostname verification are DISABLED for this run. \
             Only use this against test targets with self-signed certificates."
        );
        builder = builder.use_preconfigured_tls(tls);
    }

    tracing::debug!(?policy, "built HTTP client");
    Ok(builder.build()?)
}
