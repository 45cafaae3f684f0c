use std::time::Duration;

use breevs_server_domain::textgen::{TextGenError, TextGenerator};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The upstream gives no latency guarantee; cap every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Text-generation adapter for the Gemini `generateContent` API.
pub struct GeminiTextGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(serde::Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(serde::Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Part {
    text: String,
}

#[derive(serde::Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: Content,
}

fn text_from_response(response: GenerateContentResponse) -> Result<String, TextGenError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| TextGenError::MalformedResponse("no candidates returned".to_string()))?
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();
    if text.is_empty() {
        return Err(TextGenError::MalformedResponse(
            "candidate contained no text".to_string(),
        ));
    }
    Ok(text)
}

impl GeminiTextGenerator {
    pub fn new() -> Self {
        let api_key =
            std::env::var("BREEVS_GEMINI_API_KEY").expect("BREEVS_GEMINI_API_KEY must be set");
        let base_url = std::env::var("BREEVS_GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("BREEVS_GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }

    async fn generate_content(
        &self,
        prompt: &str,
        generation_config: Option<GenerationConfig>,
    ) -> Result<String, TextGenError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TextGenError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Text generation request failed with {}: {}", status, body);
            return Err(TextGenError::Request(format!(
                "upstream returned {}",
                status
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TextGenError::MalformedResponse(e.to_string()))?;
        text_from_response(parsed)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenError> {
        self.generate_content(prompt, None).await
    }

    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, TextGenError> {
        let text = self
            .generate_content(
                prompt,
                Some(GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                }),
            )
            .await?;
        serde_json::from_str(&text).map_err(|e| TextGenError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extraction() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Content {
                    parts: vec![
                        Part {
                            text: "part one ".to_string(),
                        },
                        Part {
                            text: "part two".to_string(),
                        },
                    ],
                },
            }],
        };
        assert_eq!(text_from_response(response).unwrap(), "part one part two");
    }

    #[test]
    fn test_missing_candidates_is_malformed() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert!(matches!(
            text_from_response(response),
            Err(TextGenError::MalformedResponse(..))
        ));
    }

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "The wheel spins." } ] } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(text_from_response(parsed).unwrap(), "The wheel spins.");
    }
}
