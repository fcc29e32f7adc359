//! AI 内容生成
//!
//! 封装一次外部文本生成调用；`start` 返回可取消的句柄。

use std::future::Future;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::Category;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// 模型未返回任何文本时使用的占位内容
pub const FALLBACK_TEXT: &str = "Failed to generate content.";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key is missing. Set API_KEY or add `api_key` to the config file.")]
    MissingApiKey,
    #[error("a title is required to generate content")]
    EmptyTitle,
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Provider { status: StatusCode, body: String },
    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("generation was cancelled")]
    Cancelled,
}

/// 文本生成模型
pub trait TextModel: Send + Sync + 'static {
    /// 发送一次提示词；`Ok(None)` 表示模型应答中没有文本
    fn generate_text(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<Option<String>, GenerateError>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// 拼接第一个候选的全部文本片段
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Gemini `generateContent` 接口
#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: Client,
    endpoint: String,
    model: String,
}

impl GeminiModel {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl Default for GeminiModel {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

impl TextModel for GeminiModel {
    async fn generate_text(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<Option<String>, GenerateError> {
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GenerateError::Provider { status, body: text });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        Ok(parsed.text())
    }
}

/// 构造生成提示词
pub fn build_prompt(title: &str, category: Category) -> String {
    format!(
        "Write a comprehensive, engaging blog post about \"{title}\" suitable for the \"{category}\" category.\n\
         The tone should be professional yet accessible.\n\
         Include an introduction, a few body paragraphs with subheadings (plain text, no markdown #), and a conclusion.\n\
         Do not use markdown formatting like bold or italics, just plain text with line breaks."
    )
}

/// 内容生成器
pub struct ContentGenerator<M = GeminiModel> {
    api_key: Option<String>,
    model: Arc<M>,
}

impl<M: TextModel> ContentGenerator<M> {
    pub fn new(api_key: Option<String>, model: M) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: Arc::new(model),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// 校验前置条件（先标题后 API key），返回 (api key, prompt)
    fn prepare(&self, title: &str, category: Category) -> Result<(String, String), GenerateError> {
        if title.trim().is_empty() {
            return Err(GenerateError::EmptyTitle);
        }
        let api_key = self.api_key.clone().ok_or(GenerateError::MissingApiKey)?;
        Ok((api_key, build_prompt(title.trim(), category)))
    }

    /// 生成文章正文并等待结果
    #[allow(dead_code)]
    pub async fn generate(&self, title: &str, category: Category) -> Result<String, GenerateError> {
        let (api_key, prompt) = self.prepare(title, category)?;
        run(self.model.as_ref(), &api_key, &prompt).await
    }

    /// 在当前 tokio 运行时上启动生成任务。前置条件在发出请求之前同步检查。
    pub fn start(&self, title: &str, category: Category) -> Result<GenerationHandle, GenerateError> {
        let (api_key, prompt) = self.prepare(title, category)?;
        let model = Arc::clone(&self.model);
        let (tx, rx) = oneshot::channel();

        info!(%category, "starting content generation");
        let task = tokio::spawn(async move {
            let result = run(model.as_ref(), &api_key, &prompt).await;
            let _ = tx.send(result);
        });

        Ok(GenerationHandle { task, rx })
    }
}

async fn run<M: TextModel>(model: &M, api_key: &str, prompt: &str) -> Result<String, GenerateError> {
    match model.generate_text(api_key, prompt).await {
        Ok(Some(text)) => {
            info!(chars = text.len(), "content generated");
            Ok(text)
        }
        Ok(None) => {
            warn!("provider returned no text");
            Ok(FALLBACK_TEXT.to_string())
        }
        Err(err) => {
            warn!(error = %err, "content generation failed");
            Err(err)
        }
    }
}

/// 进行中的生成请求；丢弃句柄会中止请求。
#[derive(Debug)]
pub struct GenerationHandle {
    task: JoinHandle<()>,
    rx: oneshot::Receiver<Result<String, GenerateError>>,
}

impl GenerationHandle {
    /// 非阻塞地检查结果；尚未完成时返回 `None`
    pub fn try_result(&mut self) -> Option<Result<String, GenerateError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(GenerateError::Cancelled)),
        }
    }

    #[allow(dead_code)]
    pub async fn wait(mut self) -> Result<String, GenerateError> {
        (&mut self.rx).await.unwrap_or(Err(GenerateError::Cancelled))
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    #[allow(dead_code)]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for GenerationHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
