//! Price predictors (constant baseline, Ollama, OpenAI-compatible, Anthropic).
//!
//! A predictor maps a fully formed prompt to a price estimate. The evaluator
//! does not care how the estimate was produced, so local models, hosted chat
//! APIs and plain baselines all sit behind the same trait.

use crate::error::{Error, Result};
use crate::extract::{self, PRICE_MARKER};
use std::time::Duration;

/// System prompt given to chat models.
pub const SYSTEM_PROMPT: &str =
    "You estimate prices of items. Reply only with the price, no explanation";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Predictor trait
// ---------------------------------------------------------------------------

/// Anything that can turn a prompt into a price estimate.
pub trait Predictor {
    /// Estimate the price for `prompt`. Extraction failures should return
    /// `Ok(0.0)`; errors are reserved for a broken setup (network, auth).
    fn predict(&mut self, prompt: &str) -> Result<f64>;
}

impl<F> Predictor for F
where
    F: FnMut(&str) -> Result<f64>,
{
    fn predict(&mut self, prompt: &str) -> Result<f64> {
        self(prompt)
    }
}

/// A predictor together with the name used for titles and error messages.
pub struct NamedPredictor {
    name: String,
    invoke: Box<dyn Predictor>,
}

impl NamedPredictor {
    pub fn new(name: impl Into<String>, predictor: impl Predictor + 'static) -> Self {
        Self {
            name: name.into(),
            invoke: Box::new(predictor),
        }
    }

    /// Wrap a closure. The bound lets closures infer their signature.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&str) -> Result<f64> + 'static,
    {
        Self::new(name, f)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable title derived from the name, e.g.
    /// `gpt_4o_frontier` becomes `Gpt 4O Frontier`.
    pub fn display_title(&self) -> String {
        title_case(&self.name.replace(['_', '-'], " "))
    }

    pub fn predict(&mut self, prompt: &str) -> Result<f64> {
        self.invoke.predict(prompt)
    }
}

impl std::fmt::Debug for NamedPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedPredictor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Prompt shaping
// ---------------------------------------------------------------------------

/// Turn a completion-style prompt (ending in the price marker) into a
/// question for a chat model.
pub fn chat_prompt(prompt: &str) -> String {
    let mut text = prompt.replace(" to the nearest dollar", "");
    let suffix = format!("\n\n{PRICE_MARKER}");
    if let Some(stripped) = text.strip_suffix(&suffix) {
        text = stripped.to_string();
    }
    text.trim_end().to_string()
}

fn http_error(name: &str, e: ureq::Error) -> Error {
    match e {
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            Error::predictor(name, format!("HTTP {code}: {}", body.trim()))
        }
        other => Error::predictor(name, other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Constant baseline
// ---------------------------------------------------------------------------

/// Always guesses the same price. With the dataset mean this is the
/// baseline every real model has to beat.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPredictor {
    pub value: f64,
}

impl ConstantPredictor {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// Mean of the given truths, or zero for an empty slice.
    pub fn mean_of(truths: impl IntoIterator<Item = f64>) -> Self {
        let (sum, n) = truths
            .into_iter()
            .fold((0.0, 0usize), |(s, n), t| (s + t, n + 1));
        Self::new(if n == 0 { 0.0 } else { sum / n as f64 })
    }
}

impl Predictor for ConstantPredictor {
    fn predict(&mut self, _prompt: &str) -> Result<f64> {
        Ok(self.value)
    }
}

// ---------------------------------------------------------------------------
// Ollama (local model)
// ---------------------------------------------------------------------------

/// Local model served by Ollama, decoded greedily from the raw prompt.
pub struct OllamaPredictor {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaPredictor {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Predictor for OllamaPredictor {
    fn predict(&mut self, prompt: &str) -> Result<f64> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "raw": true,
            "stream": false,
            "options": { "temperature": 0, "num_predict": 8, "seed": 42 },
        });
        let resp = ureq::post(&self.api_url("generate"))
            .timeout(self.timeout)
            .send_json(&body)
            .map_err(|e| http_error(&self.model, e))?;
        let parsed: GenerateResponse = resp
            .into_json()
            .map_err(|e| Error::predictor(&self.model, format!("bad response: {e}")))?;

        // The prompt ends with the marker; some models echo it, some don't.
        let reply = if parsed.response.contains(PRICE_MARKER) {
            parsed.response
        } else {
            format!("{PRICE_MARKER}{}", parsed.response)
        };
        Ok(extract::extract_price(&reply))
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible chat completions
// ---------------------------------------------------------------------------

/// How the reply of a chat model is turned into a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// Parse the first number in the completion text.
    Greedy,
    /// Probability-weighted average over the top-k first tokens.
    WeightedTopK(u8),
}

/// Any OpenAI-compatible chat completion endpoint, including locally hosted
/// fine-tuned models behind a compatible server.
pub struct OpenAiPredictor {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub decode: Decode,
    pub timeout: Duration,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    logprobs: Option<ChoiceLogprobs>,
}

#[derive(serde::Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(serde::Deserialize)]
struct ChoiceLogprobs {
    #[serde(default)]
    content: Vec<TokenLogprob>,
}

#[derive(serde::Deserialize)]
struct TokenLogprob {
    #[serde(default)]
    top_logprobs: Vec<TopLogprob>,
}

#[derive(serde::Deserialize)]
struct TopLogprob {
    token: String,
    logprob: f64,
}

impl OpenAiPredictor {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: model.into(),
            decode: Decode::Greedy,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_decode(mut self, decode: Decode) -> Self {
        self.decode = decode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": chat_prompt(prompt) },
                { "role": "assistant", "content": PRICE_MARKER },
            ],
            "seed": 42,
            "max_tokens": 5,
        });
        if let Decode::WeightedTopK(k) = self.decode {
            body["logprobs"] = serde_json::json!(true);
            body["top_logprobs"] = serde_json::json!(k);
            body["max_tokens"] = serde_json::json!(1);
        }
        body
    }
}

fn price_from_chat(decode: Decode, resp: ChatResponse) -> f64 {
    let Some(choice) = resp.choices.into_iter().next() else {
        return 0.0;
    };
    match decode {
        Decode::Greedy => extract::extract_price_loose(&choice.message.content.unwrap_or_default()),
        Decode::WeightedTopK(_) => {
            let candidates: Vec<(String, f64)> = choice
                .logprobs
                .and_then(|lp| lp.content.into_iter().next())
                .map(|first| {
                    first
                        .top_logprobs
                        .into_iter()
                        .map(|t| (t.token, t.logprob.exp()))
                        .collect()
                })
                .unwrap_or_default();
            extract::weighted_price(&candidates)
        }
    }
}

impl Predictor for OpenAiPredictor {
    fn predict(&mut self, prompt: &str) -> Result<f64> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::config("OPENAI_API_KEY is not set"))?;
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .set("Authorization", &format!("Bearer {key}"))
            .send_json(self.request_body(prompt))
            .map_err(|e| http_error(&self.model, e))?;
        let parsed: ChatResponse = resp
            .into_json()
            .map_err(|e| Error::predictor(&self.model, format!("bad response: {e}")))?;
        Ok(price_from_chat(self.decode, parsed))
    }
}

// ---------------------------------------------------------------------------
// Anthropic messages API
// ---------------------------------------------------------------------------

pub struct AnthropicPredictor {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

#[derive(serde::Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(serde::Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicPredictor {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: std::env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Predictor for AnthropicPredictor {
    fn predict(&mut self, prompt: &str) -> Result<f64> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::config("ANTHROPIC_API_KEY is not set"))?;
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 5,
            "system": SYSTEM_PROMPT,
            "messages": [
                { "role": "user", "content": chat_prompt(prompt) },
                { "role": "assistant", "content": PRICE_MARKER },
            ],
        });
        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .set("x-api-key", key)
            .set("anthropic-version", "2023-06-01")
            .send_json(&body)
            .map_err(|e| http_error(&self.model, e))?;
        let parsed: MessagesResponse = resp
            .into_json()
            .map_err(|e| Error::predictor(&self.model, format!("bad response: {e}")))?;
        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|b| b.text)
            .collect();
        Ok(extract::extract_price_loose(&text))
    }
}
