use async_trait::async_trait;
use faqgen::errors::FaqError;
use faqgen::providers::ai::AiProvider;
use faqgen::providers::storage::{ObjectStore, StorageError};
use faqgen::types::FaqRow;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Mock AI Provider ---

/// A chat provider that replays pre-programmed completions in order.
///
/// Once the script is exhausted the last completion is repeated, which makes
/// it easy to simulate a model that keeps returning the same FAQs.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    model: String,
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    last: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    /// Creates a mock reporting `gpt-4o-mini` as its model.
    pub fn new(responses: Vec<String>) -> Self {
        Self::with_model("gpt-4o-mini", responses)
    }

    pub fn with_model(model: &str, responses: Vec<String>) -> Self {
        Self {
            model: model.to_string(),
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a call that fails with `FaqError::AiApi(message)`.
    pub fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// The prompts received so far.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, FaqError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => {
                *self.last.lock().unwrap() = Some(response.clone());
                Ok(response)
            }
            Some(Err(message)) => Err(FaqError::AiApi(message)),
            None => self.last.lock().unwrap().clone().ok_or_else(|| {
                FaqError::AiApi("MockAiProvider: no response programmed".to_string())
            }),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// --- In-Memory Object Store ---

/// A stored object as recorded by [`InMemoryObjectStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// An object store that keeps uploads in memory and hands out fake signed URLs.
#[derive(Clone, Debug, Default)]
pub struct InMemoryObjectStore {
    bucket: String,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    fail_uploads: bool,
    fail_signing: bool,
}

impl InMemoryObjectStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            ..Default::default()
        }
    }

    /// Makes every upload fail.
    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    /// Makes every signing request fail.
    pub fn failing_signing(mut self) -> Self {
        self.fail_signing = true;
        self
    }

    pub fn get(&self, name: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(name).cloned()
    }

    pub fn object_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if self.fail_uploads {
            return Err(StorageError::Upload {
                object: name.to_string(),
                message: "bucket is read-only".to_string(),
            });
        }
        self.objects.lock().unwrap().insert(
            name.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn signed_url(&self, name: &str, expires_in: Duration) -> Result<String, StorageError> {
        if self.fail_signing {
            return Err(StorageError::Sign {
                object: name.to_string(),
                message: "no signing key".to_string(),
            });
        }
        if !self.objects.lock().unwrap().contains_key(name) {
            return Err(StorageError::Sign {
                object: name.to_string(),
                message: "object does not exist".to_string(),
            });
        }
        Ok(format!(
            "https://storage.example.test/{}/{}?X-Goog-Expires={}",
            self.bucket,
            name,
            expires_in.as_secs()
        ))
    }
}

// --- Fixture Helpers ---

/// Renders rows as the markdown table a chat model typically returns,
/// including the bold header and separator lines.
pub fn markdown_table(rows: &[FaqRow]) -> String {
    let mut out = String::from("Here are the FAQs:\n\n");
    out.push_str("| **FAQ** | **Answer** | **Source** | **Keyword** |\n");
    out.push_str("|---|---|---|---|\n");
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            row.question, row.answer, row.source, row.keyword
        ));
    }
    out
}

/// Builds `count` distinct rows for `disease`, numbered from `start`.
pub fn numbered_rows(disease: &str, start: usize, count: usize) -> Vec<FaqRow> {
    (start..start + count)
        .map(|i| {
            FaqRow::new(
                format!("Question {i} about {disease}?"),
                format!("Answer {i}."),
                "CDC",
                format!("topic{i}"),
            )
        })
        .collect()
}
