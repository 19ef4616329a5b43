use std::{thread, time::Duration};

use log::trace;
use rand::{thread_rng, Rng};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::json;

use crate::error::{Result, VocabError};
use crate::model::config::TranslationConfig;

/// Word-level translation backend. Any `Err` is a per-word failure.
pub trait Translator {
    fn translate(&self, word: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// Delay plus random jitter between live calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pacer {
    pub delay_ms: u64,
    pub jitter_ms: u64,
}

impl Pacer {
    pub fn new(delay_ms: u64, jitter_ms: u64) -> Self {
        Pacer {
            delay_ms,
            jitter_ms,
        }
    }

    pub fn pause(&self) -> Duration {
        let jitter = if self.jitter_ms > 0 {
            thread_rng().gen_range(0..self.jitter_ms)
        } else {
            0
        };
        Duration::from_millis(self.delay_ms + jitter)
    }

    pub fn wait(&self) {
        let d = self.pause();
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}

impl From<&TranslationConfig> for Pacer {
    fn from(cfg: &TranslationConfig) -> Self {
        Pacer::new(cfg.delay_ms, cfg.jitter_ms)
    }
}

pub fn endpoint_for(provider: &str) -> Result<&'static str> {
    match provider {
        "openai" => Ok("https://api.openai.com/v1/chat/completions"),
        "deepseek" => Ok("https://api.deepseek.com/v1/chat/completions"),
        other => Err(VocabError::config(format!(
            "unsupported translation provider '{other}'"
        ))),
    }
}

/// Translates single words through an OpenAI-compatible chat completions
/// endpoint. One request per word, no retries.
pub struct ChatTranslator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatTranslator {
    pub fn new(cfg: &TranslationConfig) -> Result<Self> {
        let endpoint = match cfg.endpoint.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => endpoint_for(&cfg.provider)?.to_string(),
        };

        if cfg.api_key.trim().is_empty() {
            return Err(VocabError::config("translation.api_key is required"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(ChatTranslator {
            client,
            endpoint,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

impl Translator for ChatTranslator {
    fn translate(&self, word: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": "You are a dictionary. Answer with the translation only." },
                { "role": "user", "content": build_prompt(word, source_lang, target_lang) }
            ],
            "temperature": 0.0
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        let text = resp.text()?;
        trace!("'{word}' -> HTTP {}: {text}", status.as_u16());

        if !status.is_success() {
            return Err(VocabError::translation(extract_error_message(status, &text)));
        }

        parse_content(&text)
    }
}

/// Pulls `choices[0].message.content` out of a completions response.
/// Blank content is an unusable answer.
pub fn parse_content(body: &str) -> Result<String> {
    let v: serde_json::Value = serde_json::from_str(body)
        .map_err(|_| VocabError::translation("invalid JSON from translation backend"))?;

    let content = v
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| {
            VocabError::translation("invalid response: missing choices[0].message.content")
        })?;

    let content = content.trim().trim_matches('"').trim();
    if content.is_empty() {
        return Err(VocabError::translation("empty translation"));
    }

    Ok(content.to_string())
}

fn extract_error_message(status: StatusCode, body_text: &str) -> String {
    // { "error": { "message": "..." } } or { "message": "..." }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
    }

    let trimmed = body_text.trim();
    let snippet = match trimmed.char_indices().nth(400) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    };

    format!("HTTP {}: {}", status.as_u16(), snippet)
}

fn build_prompt(word: &str, source_lang: &str, target_lang: &str) -> String {
    format!(
        "Translate the {source_lang} dictionary word \"{}\" into {target_lang}. \
         Give the most common meaning in a few words, without explanations.",
        word.trim()
    )
}
