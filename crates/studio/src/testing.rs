//! Scripted transport for unit tests: replies are chosen per API key.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use common::Secret;
use key_pool::CredentialPool;
use provider::{
    Candidate, Content, Failure, GenerateContentRequest, GenerateContentResponse, InlineData,
    Part, Transport,
};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(&'static str),
    Image {
        mime_type: &'static str,
        data: &'static str,
    },
    /// 429 quota failure
    Quota,
    /// 403 permission failure
    Permission,
    /// Success with zero candidates
    Empty,
    /// Success with a text-only candidate
    NoInline,
    Fail(Failure),
}

impl Reply {
    fn into_result(self) -> Result<GenerateContentResponse, Failure> {
        let candidate = |part: Part| GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".into()),
                    parts: vec![part],
                }),
            }],
        };
        match self {
            Reply::Text(text) => Ok(candidate(Part::text(text))),
            Reply::Image { mime_type, data } => Ok(candidate(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime_type.into(),
                    data: data.into(),
                }),
            })),
            Reply::Quota => Err(Failure::http(
                429,
                "Resource has been exhausted (e.g. check quota).",
            )),
            Reply::Permission => Err(Failure::http(403, "The caller does not have permission")),
            Reply::Empty => Ok(GenerateContentResponse::default()),
            Reply::NoInline => Ok(candidate(Part::text("I cannot draw that."))),
            Reply::Fail(failure) => Err(failure),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub key: String,
    pub model: String,
    pub request: GenerateContentRequest,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: HashMap<String, Reply>,
    default: Option<Reply>,
    /// Overrides by zero-based call number, across all keys.
    by_call: HashMap<usize, Reply>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, key: &str, reply: Reply) -> Self {
        self.replies.insert(key.to_string(), reply);
        self
    }

    pub fn default_reply(mut self, reply: Reply) -> Self {
        self.default = Some(reply);
        self
    }

    pub fn on_call(mut self, call_number: usize, reply: Reply) -> Self {
        self.by_call.insert(call_number, reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn keys_called(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.key.clone())
            .collect()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn reply_for(&self, key: &str, call_number: usize) -> Reply {
        self.by_call
            .get(&call_number)
            .or_else(|| self.replies.get(key))
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or_else(|| Reply::Fail(Failure::network(format!("no scripted reply for {key}"))))
    }
}

impl Transport for ScriptedTransport {
    fn id(&self) -> &str {
        "scripted"
    }

    fn generate_content<'a>(
        &'a self,
        api_key: &'a Secret<String>,
        model: &'a str,
        request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateContentResponse, Failure>> + Send + 'a>> {
        let key = api_key.expose().clone();
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                key: key.clone(),
                model: model.to_string(),
                request: request.clone(),
            });
            calls.len() - 1
        };
        let result = self.reply_for(&key, call_number).into_result();
        Box::pin(async move {
            tokio::task::yield_now().await;
            result
        })
    }
}

pub(crate) fn pool_of(keys: &[&str]) -> CredentialPool {
    CredentialPool::new(keys.iter().map(|k| Secret::from(*k)).collect())
}
