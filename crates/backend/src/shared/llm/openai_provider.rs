use super::types::{
    ChatMessage, ChatRole, LlmError, LlmProvider, LlmResponse, ToolCall, ToolDefinition,
};
use crate::shared::config::LlmConfig;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatChoice, ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionTools,
        CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
    },
    Client,
};
use async_trait::async_trait;

/// OpenAI-compatible chat completion provider
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(api_key: String, settings: &LlmConfig) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
            config = config.with_api_base(api_base);
        }

        Self {
            client: Client::with_config(config),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    fn convert_messages(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        messages
            .into_iter()
            .map(|msg| -> Result<ChatCompletionRequestMessage, LlmError> {
                let converted = match msg.role {
                    ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                        .content(msg.content_str())
                        .build()
                        .map_err(invalid_request)?
                        .into(),
                    ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                        .content(msg.content_str())
                        .build()
                        .map_err(invalid_request)?
                        .into(),
                    ChatRole::Assistant => {
                        let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                        if let Some(content) = &msg.content {
                            builder.content(content.as_str());
                        }
                        if let Some(tool_calls) = &msg.tool_calls {
                            builder.tool_calls(
                                tool_calls
                                    .iter()
                                    .map(|tc| {
                                        ChatCompletionMessageToolCalls::Function(
                                            ChatCompletionMessageToolCall {
                                                id: tc.id.clone(),
                                                function: FunctionCall {
                                                    name: tc.name.clone(),
                                                    arguments: tc.arguments.clone(),
                                                },
                                            },
                                        )
                                    })
                                    .collect::<Vec<_>>(),
                            );
                        }
                        builder.build().map_err(invalid_request)?.into()
                    }
                    ChatRole::Tool => ChatCompletionRequestToolMessageArgs::default()
                        .content(msg.content_str())
                        .tool_call_id(msg.tool_call_id.clone().unwrap_or_default())
                        .build()
                        .map_err(invalid_request)?
                        .into(),
                };
                Ok(converted)
            })
            .collect()
    }

    fn convert_tools(&self, tools: Vec<ToolDefinition>) -> Vec<ChatCompletionTools> {
        tools
            .into_iter()
            .map(|t| {
                ChatCompletionTools::Function(ChatCompletionTool {
                    function: FunctionObject {
                        name: t.name,
                        description: Some(t.description),
                        parameters: Some(t.parameters),
                        strict: None,
                    },
                })
            })
            .collect()
    }

    fn extract_tool_calls(&self, choice: &ChatChoice) -> Vec<ToolCall> {
        let Some(tool_calls) = &choice.message.tool_calls else {
            return vec![];
        };
        tool_calls
            .iter()
            .filter_map(|tc| match tc {
                ChatCompletionMessageToolCalls::Function(f) => Some(ToolCall {
                    id: f.id.clone(),
                    name: f.function.name.clone(),
                    arguments: f.function.arguments.clone(),
                }),
                ChatCompletionMessageToolCalls::Custom(_) => None,
            })
            .collect()
    }

    /// gpt-5 and the o-series reject custom temperature and token limits
    fn supports_advanced_params(model_id: &str) -> bool {
        !(model_id.starts_with("gpt-5") || model_id.starts_with("o1-") || model_id.starts_with("o3-"))
    }
}

fn invalid_request(e: impl std::fmt::Display) -> LlmError {
    LlmError::InvalidRequest(e.to_string())
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat_completion_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<LlmResponse, LlmError> {
        let openai_messages = self.convert_messages(messages)?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder.model(&self.model).messages(openai_messages);

        if !tools.is_empty() {
            request_builder.tools(self.convert_tools(tools));
        }

        if Self::supports_advanced_params(&self.model) {
            request_builder
                .temperature(self.temperature)
                .max_completion_tokens(self.max_tokens);
        }

        let request = request_builder.build().map_err(invalid_request)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("401") || err_str.contains("authentication") {
                LlmError::AuthError(err_str)
            } else if err_str.contains("429") || err_str.contains("rate limit") {
                LlmError::RateLimitExceeded
            } else {
                LlmError::ApiError(err_str)
            }
        })?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LlmError::ApiError("No response from API".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.clone().unwrap_or_default(),
            tool_calls: self.extract_tool_calls(choice),
            tokens_used: response.usage.as_ref().map(|u| u64::from(u.total_tokens)),
            model: response.model.clone(),
            finish_reason: choice.finish_reason.as_ref().map(|r| format!("{:?}", r)),
        })
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
