//! Motivational quote lookup and canned productivity tips.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const TIPS: [&str; 5] = [
    "Start with the hardest task. Everything after it will feel easier.",
    "Remember to take a short break. Your brain will thank you.",
    "Prioritize your tasks by importance, not by urgency.",
    "Check whether today's tasks lead toward your long-term goals.",
    "One finished small task beats ten unfinished big ones.",
];

pub const FALLBACK_QUOTE: &str = "Even the longest journey begins with a single step.";
pub const FALLBACK_AUTHOR: &str = "Confucius";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_QUOTE.to_string(),
            author: FALLBACK_AUTHOR.to_string(),
        }
    }
}

/// Pick one of [`TIPS`] at random.
pub fn random_tip() -> &'static str {
    TIPS.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(TIPS[0])
}

/// ZenQuotes entry: `[{"q": "...", "a": "..."}]`.
#[derive(Debug, Deserialize)]
struct ZenQuote {
    q: String,
    a: String,
}

#[derive(Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    url: String,
}

impl QuoteClient {
    pub fn new(url: String, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            http: super::http_client(timeout)?,
            url,
        })
    }

    /// Fetch a random quote, or [`Quote::fallback`] on any failure.
    pub async fn random_quote(&self) -> Quote {
        match self.fetch().await {
            Ok(Some(quote)) => quote,
            Ok(None) => {
                tracing::warn!("Quote service returned an empty list");
                Quote::fallback()
            }
            Err(e) => {
                tracing::warn!("Quote lookup failed: {}", e);
                Quote::fallback()
            }
        }
    }

    async fn fetch(&self) -> reqwest::Result<Option<Quote>> {
        let quotes: Vec<ZenQuote> = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(quotes.into_iter().next().map(|q| Quote {
            text: q.q,
            author: q.a,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(template: ResponseTemplate) -> (MockServer, QuoteClient) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/random"))
            .respond_with(template)
            .mount(&server)
            .await;
        let client =
            QuoteClient::new(format!("{}/api/random", server.uri()), Duration::from_secs(2))
                .unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn test_quote_is_taken_from_first_entry() {
        let (_server, client) = client_for(ResponseTemplate::new(200).set_body_json(json!([
            { "q": "Well begun is half done.", "a": "Aristotle", "h": "<blockquote/>" }
        ])))
        .await;

        assert_eq!(
            client.random_quote().await,
            Quote {
                text: "Well begun is half done.".to_string(),
                author: "Aristotle".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let (_server, client) = client_for(ResponseTemplate::new(503)).await;
        assert_eq!(client.random_quote().await, Quote::fallback());
    }

    #[tokio::test]
    async fn test_empty_or_malformed_payload_falls_back() {
        let (_server, client) = client_for(ResponseTemplate::new(200).set_body_json(json!([]))).await;
        assert_eq!(client.random_quote().await, Quote::fallback());

        let (_server, client) =
            client_for(ResponseTemplate::new(200).set_body_json(json!({ "q": "not a list" }))).await;
        assert_eq!(client.random_quote().await, Quote::fallback());
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let client =
            QuoteClient::new("http://127.0.0.1:9/api/random".to_string(), Duration::from_millis(500))
                .unwrap();
        assert_eq!(client.random_quote().await, Quote::fallback());
    }

    #[test]
    fn test_random_tip_is_one_of_the_tips() {
        for _ in 0..20 {
            assert!(TIPS.contains(&random_tip()));
        }
    }
}
