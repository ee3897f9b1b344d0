//! The bot behind `POST /chat`: one shared conversation, LLM with tools,
//! first tool call turned into the widget's response envelope.

pub mod tools;

use crate::sec::FilingSource;
use crate::shared::llm::{ChatMessage, LlmProvider};
use contracts::chat::{ChatReply, ResponseEnvelope};
use std::sync::Arc;
use tokio::sync::Mutex;
use tools::{execute_tool_call, sec_tool_definitions};

pub const EMPTY_REPLY_MESSAGE: &str = "I'm processing your request.";

struct Conversation {
    messages: Vec<ChatMessage>,
    total_tokens: u64,
}

pub struct Assistant {
    provider: Arc<dyn LlmProvider>,
    source: Arc<dyn FilingSource>,
    max_tables: usize,
    conversation: Mutex<Conversation>,
}

impl Assistant {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        source: Arc<dyn FilingSource>,
        system_prompt: &str,
        max_tables: usize,
    ) -> Self {
        Self {
            provider,
            source,
            max_tables,
            conversation: Mutex::new(Conversation {
                messages: vec![ChatMessage::system(system_prompt)],
                total_tokens: 0,
            }),
        }
    }

    pub async fn total_tokens(&self) -> u64 {
        self.conversation.lock().await.total_tokens
    }

    /// Requests are answered one at a time so the history stays ordered
    pub async fn process_message(&self, user_input: &str) -> ChatReply {
        let mut conversation = self.conversation.lock().await;
        conversation.messages.push(ChatMessage::user(user_input));

        tracing::info!(
            "Sending {} messages to {}",
            conversation.messages.len(),
            self.provider.provider_name()
        );
        let response = match self
            .provider
            .chat_completion_with_tools(conversation.messages.clone(), sec_tool_definitions())
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("LLM request failed: {}", e);
                return ChatReply {
                    response: ResponseEnvelope::text(format!("An error occurred: {}", e)),
                    total_tokens: Some(conversation.total_tokens),
                };
            }
        };

        conversation.total_tokens += response.tokens_used.unwrap_or(0);
        let content = if response.content.trim().is_empty() {
            EMPTY_REPLY_MESSAGE.to_string()
        } else {
            response.content
        };

        let Some(call) = response.tool_calls.first().cloned() else {
            conversation.messages.push(ChatMessage::assistant(content.clone()));
            return ChatReply {
                response: ResponseEnvelope::text(content),
                total_tokens: Some(conversation.total_tokens),
            };
        };

        conversation.messages.push(ChatMessage::assistant_with_tools(
            Some(content),
            response.tool_calls.clone(),
        ));

        tracing::info!("Tool call: {} {}", call.name, call.arguments);
        let (envelope, summary) =
            match execute_tool_call(&call, self.source.as_ref(), self.max_tables).await {
                Ok(output) => (output.envelope, output.summary),
                Err(e) => {
                    tracing::error!("Tool '{}' failed: {}", call.name, e);
                    let message = format!("An error occurred: {}", e);
                    (ResponseEnvelope::text(message.clone()), message)
                }
            };

        // Every requested call needs an answer before the next completion
        conversation.messages.push(ChatMessage::tool(call.id.clone(), summary));
        for skipped in response.tool_calls.iter().skip(1) {
            conversation
                .messages
                .push(ChatMessage::tool(skipped.id.clone(), "Not executed"));
        }

        ChatReply {
            response: envelope,
            total_tokens: Some(conversation.total_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sec::types::{CompanyFacts, Submissions, TickerIndex};
    use crate::sec::{Cik, SecError};
    use crate::shared::llm::{ChatRole, LlmError, LlmResponse, ToolCall, ToolDefinition};
    use async_trait::async_trait;
    use contracts::chat::TableArtifact;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;

    /// Replays scripted responses and records what it was sent
    struct ScriptedProvider {
        replies: StdMutex<Vec<Result<LlmResponse, LlmError>>>,
        seen: StdMutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<LlmResponse, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: StdMutex::new(replies),
                seen: StdMutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn chat_completion_with_tools(
            &self,
            messages: Vec<ChatMessage>,
            _tools: Vec<ToolDefinition>,
        ) -> Result<LlmResponse, LlmError> {
            self.seen.lock().unwrap().push(messages);
            self.replies.lock().unwrap().remove(0)
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }
    }

    struct FakeEdgar;

    #[async_trait]
    impl FilingSource for FakeEdgar {
        async fn ticker_index(&self) -> Result<TickerIndex, SecError> {
            Ok(serde_json::from_value(json!({
                "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}
            }))
            .unwrap())
        }

        async fn submissions(&self, _cik: Cik) -> Result<Submissions, SecError> {
            Ok(serde_json::from_value(json!({
                "name": "Apple Inc.",
                "filings": {"recent": {
                    "accessionNumber": ["0000320193-24-000123", "0000320193-24-000110"],
                    "filingDate": ["2024-11-01", "2024-08-02"],
                    "form": ["10-K", "10-Q"],
                    "primaryDocument": ["aapl-20240928.htm", "aapl-20240629.htm"]
                }}
            }))
            .unwrap())
        }

        async fn company_facts(&self, _cik: Cik) -> Result<CompanyFacts, SecError> {
            Ok(serde_json::from_value(json!({
                "cik": 320193,
                "entityName": "Apple Inc.",
                "facts": {"us-gaap": {
                    "Revenues": {
                        "label": "Revenues",
                        "description": "Revenue.",
                        "units": {"USD": [{"end": "2024-09-28", "val": 391035000000u64}]}
                    }
                }}
            }))
            .unwrap())
        }

        async fn document(&self, url: &str) -> Result<String, SecError> {
            Ok(format!("<html><body><p>{}</p></body></html>", url))
        }
    }

    fn text_reply(content: &str, tokens: u64) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse {
            content: content.to_string(),
            tool_calls: vec![],
            tokens_used: Some(tokens),
            model: "test".to_string(),
            finish_reason: None,
        })
    }

    fn tool_reply(name: &str, arguments: serde_json::Value) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
            tokens_used: Some(10),
            model: "test".to_string(),
            finish_reason: None,
        })
    }

    fn assistant(provider: Arc<ScriptedProvider>) -> Assistant {
        Assistant::new(provider, Arc::new(FakeEdgar), "system", 20)
    }

    #[tokio::test]
    async fn test_plain_answer_and_token_total() {
        let provider = ScriptedProvider::new(vec![text_reply("Hello", 7), text_reply("Again", 5)]);
        let bot = assistant(provider.clone());

        let first = bot.process_message("hi").await;
        assert_eq!(first.response, ResponseEnvelope::text("Hello"));
        assert_eq!(first.total_tokens, Some(7));

        let second = bot.process_message("more").await;
        assert_eq!(second.total_tokens, Some(12));
        assert_eq!(bot.total_tokens().await, 12);

        let seen = provider.seen.lock().unwrap();
        let roles: Vec<ChatRole> = seen[1].iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
    }

    #[tokio::test]
    async fn test_empty_reply_placeholder() {
        let bot = assistant(ScriptedProvider::new(vec![text_reply("  ", 1)]));
        let reply = bot.process_message("hi").await;
        assert_eq!(reply.response, ResponseEnvelope::text(EMPTY_REPLY_MESSAGE));
    }

    #[tokio::test]
    async fn test_llm_error_becomes_text() {
        let bot = assistant(ScriptedProvider::new(vec![Err(LlmError::RateLimitExceeded)]));
        let reply = bot.process_message("hi").await;
        assert_eq!(
            reply.response,
            ResponseEnvelope::text("An error occurred: Rate limit exceeded")
        );
    }

    #[tokio::test]
    async fn test_identifier_to_cik() {
        let provider = ScriptedProvider::new(vec![
            tool_reply("identifier_to_cik", json!({"ticker": "aapl"})),
            text_reply("done", 1),
        ]);
        let bot = assistant(provider.clone());
        let reply = bot.process_message("CIK for Apple?").await;
        assert_eq!(reply.response, ResponseEnvelope::text("0000320193"));

        // The tool result is answered in history before the next completion
        bot.process_message("thanks").await;
        let seen = provider.seen.lock().unwrap();
        let tool_msg = seen[1]
            .iter()
            .find(|m| m.role == ChatRole::Tool)
            .unwrap();
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn test_company_concept_returns_tables() {
        let bot = assistant(ScriptedProvider::new(vec![tool_reply(
            "get_company_concept",
            json!({"ticker": "AAPL", "search_term": "revenue"}),
        )]));
        let reply = bot.process_message("Apple revenue").await;
        let ResponseEnvelope::Artifact {
            artifact_type,
            content,
            ..
        } = reply.response
        else {
            panic!("expected an artifact");
        };
        assert_eq!(artifact_type, "artifact-table");
        let tables: Vec<TableArtifact> = serde_json::from_value(content).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].fact, "Revenues");
        assert_eq!(tables[0].unit.as_deref(), Some("USD"));
    }

    #[tokio::test]
    async fn test_company_concept_summary_names_the_company() {
        let provider = ScriptedProvider::new(vec![
            tool_reply(
                "get_company_concept",
                json!({"ticker": "AAPL", "search_term": "revenue"}),
            ),
            text_reply("done", 1),
        ]);
        let bot = assistant(provider.clone());
        bot.process_message("Apple revenue").await;
        bot.process_message("thanks").await;

        let seen = provider.seen.lock().unwrap();
        let tool_msg = seen[1]
            .iter()
            .find(|m| m.role == ChatRole::Tool)
            .unwrap();
        assert_eq!(
            tool_msg.content_str(),
            "Prepared 1 tables for Apple Inc.: Revenues"
        );
    }

    #[tokio::test]
    async fn test_recent_filings_returns_urls() {
        let bot = assistant(ScriptedProvider::new(vec![tool_reply(
            "get_recent_filings",
            json!({"ticker": "AAPL", "form": "10-K"}),
        )]));
        let reply = bot.process_message("Apple 10-K").await;
        assert_eq!(
            reply.response,
            ResponseEnvelope::urls(vec![
                "https://www.sec.gov/Archives/edgar/data/320193/000032019324000123/aapl-20240928.htm"
            ])
        );
    }

    #[tokio::test]
    async fn test_get_filing_with_section() {
        let bot = assistant(ScriptedProvider::new(vec![tool_reply(
            "get_filing",
            json!({"url": "https://www.sec.gov/doc.htm", "section": "Risk Factors"}),
        )]));
        let reply = bot.process_message("open it").await;
        let ResponseEnvelope::Artifact {
            artifact_type,
            section_id,
            data,
            ..
        } = reply.response
        else {
            panic!("expected an artifact");
        };
        assert_eq!(artifact_type, "artifact-filing");
        assert_eq!(section_id.as_deref(), Some("risk-factors"));
        assert_eq!(data.unwrap()["url"], "https://www.sec.gov/doc.htm");
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_reported() {
        let bot = assistant(ScriptedProvider::new(vec![tool_reply(
            "identifier_to_cik",
            json!({"ticker": "ZZZZ"}),
        )]));
        let reply = bot.process_message("?").await;
        assert_eq!(
            reply.response,
            ResponseEnvelope::text("An error occurred: Unknown ticker: ZZZZ")
        );
    }
}
