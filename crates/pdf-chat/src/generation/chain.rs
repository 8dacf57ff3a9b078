//! Retrieve-then-generate conversation chain

use std::sync::Arc;
use std::time::Instant;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::providers::{ChatModel, Retriever};
use crate::session::ConversationMemory;
use crate::types::{ChatAnswer, ChatMessage, SourceRef};

use super::prompt::PromptBuilder;

/// Per-chain retrieval settings
#[derive(Debug, Clone, Copy)]
pub struct ChainOptions {
    /// Chunks retrieved per question
    pub top_k: usize,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

impl From<&RetrievalConfig> for ChainOptions {
    fn from(config: &RetrievalConfig) -> Self {
        Self { top_k: config.top_k }
    }
}

/// Answers questions from retrieved chunks and the session's history
pub struct ConversationChain {
    retriever: Arc<dyn Retriever>,
    model: Arc<dyn ChatModel>,
    options: ChainOptions,
}

impl ConversationChain {
    pub fn new(retriever: Arc<dyn Retriever>, model: Arc<dyn ChatModel>, options: ChainOptions) -> Self {
        Self {
            retriever,
            model,
            options,
        }
    }

    /// Answer `question`.
    ///
    /// Retrieval completes before the model is called. The exchange is
    /// recorded in `memory` only when generation succeeds.
    pub async fn ask(&self, memory: &mut ConversationMemory, question: &str) -> Result<ChatAnswer> {
        let start = Instant::now();
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidRequest("Question must not be empty".to_string()));
        }

        let results = self.retriever.retrieve(question, self.options.top_k).await?;
        tracing::info!("Retrieved {} chunks for question", results.len());

        let messages = PromptBuilder::build_messages(&results, memory.messages(), question);
        let answer = self.model.chat(&messages).await?;

        memory.push_turn(ChatMessage::user(question), ChatMessage::assistant(answer.clone()));

        let sources = results
            .into_iter()
            .map(|r| SourceRef::new(r.chunk.index, r.sources, r.similarity, &r.chunk.content))
            .collect();

        let processing_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Answered with {} ({}ms, history {} messages)",
            self.model.model(),
            processing_time_ms,
            memory.len()
        );

        Ok(ChatAnswer {
            answer,
            sources,
            history_len: memory.len(),
            processing_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::SearchResult;
    use crate::types::{Role, TextChunk};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct FakeRetriever {
        log: Log,
    }

    #[async_trait]
    impl Retriever for FakeRetriever {
        async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
            self.log.lock().push(format!("retrieve:{}:{}", query, top_k));
            Ok(vec![SearchResult {
                chunk: TextChunk {
                    index: 3,
                    content: "The answer is forty-two.".to_string(),
                    char_start: 0,
                    char_end: 24,
                },
                sources: Vec::new(),
                similarity: 0.8,
            }])
        }
    }

    struct FakeModel {
        log: Log,
        fail: bool,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl ChatModel for FakeModel {
        async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
            self.log.lock().push("chat".to_string());
            self.seen.lock().push(messages.to_vec());
            if self.fail {
                Err(Error::llm("model unavailable"))
            } else {
                Ok(format!("reply {}", messages.len()))
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fake"
        }

        fn model(&self) -> &str {
            "fake-1"
        }
    }

    fn chain(fail: bool) -> (ConversationChain, Log, Arc<FakeModel>) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let model = Arc::new(FakeModel {
            log: Arc::clone(&log),
            fail,
            seen: Mutex::new(Vec::new()),
        });
        let chain = ConversationChain::new(
            Arc::new(FakeRetriever { log: Arc::clone(&log) }),
            model.clone(),
            ChainOptions { top_k: 2 },
        );
        (chain, log, model)
    }

    #[tokio::test]
    async fn test_retrieval_runs_before_generation() {
        let (chain, log, _) = chain(false);
        let mut memory = ConversationMemory::new(10);

        chain.ask(&mut memory, "What is the answer?").await.unwrap();

        assert_eq!(*log.lock(), vec!["retrieve:What is the answer?:2".to_string(), "chat".to_string()]);
    }

    #[tokio::test]
    async fn test_successful_turn_is_recorded() {
        let (chain, _, model) = chain(false);
        let mut memory = ConversationMemory::new(10);

        let answer = chain.ask(&mut memory, "first?").await.unwrap();
        assert_eq!(answer.answer, "reply 2");
        assert_eq!(answer.history_len, 2);
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].chunk_index, 3);

        let answer = chain.ask(&mut memory, "second?").await.unwrap();
        assert_eq!(answer.history_len, 4);

        // Second call sees system, prior exchange, new question.
        let seen = model.seen.lock();
        let roles: Vec<Role> = seen[1].iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
        assert!(seen[1][0].content.contains("forty-two"));
        assert_eq!(memory.messages()[0].content, "first?");
        assert_eq!(memory.messages()[1].content, "reply 2");
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_memory_unchanged() {
        let (chain, _, _) = chain(true);
        let mut memory = ConversationMemory::new(10);
        memory.push_turn(ChatMessage::user("old"), ChatMessage::assistant("old reply"));

        let err = chain.ask(&mut memory, "new?").await.unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.messages()[0].content, "old");
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let (chain, log, _) = chain(false);
        let mut memory = ConversationMemory::new(10);

        let err = chain.ask(&mut memory, "   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_history_window_enforced() {
        let (chain, _, _) = chain(false);
        let mut memory = ConversationMemory::new(4);

        for i in 0..5 {
            chain.ask(&mut memory, &format!("q{}", i)).await.unwrap();
        }
        assert_eq!(memory.len(), 4);
        assert_eq!(memory.messages()[0].content, "q3");
    }
}
