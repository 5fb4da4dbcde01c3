use std::sync::Arc;

use crate::core::config::GenerationConfig;
use crate::llm::{ChatMessage, ChatProvider, ChatRequest};

/// Returned instead of an answer when the generation provider fails.
pub const GENERATION_FALLBACK_MESSAGE: &str =
    "Sorry, I ran into a problem while writing an answer. Please try again in a moment.";

/// Sends the assembled prompt to the chat model with bounded output and a
/// low temperature.
pub struct AnswerGenerator {
    provider: Arc<dyn ChatProvider>,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn ChatProvider>, config: &GenerationConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Always yields text; provider failures become the fixed apology.
    pub async fn generate(&self, prompt: &str) -> String {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        match self.provider.chat(request, &self.model).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(
                    "Generation via {} failed, using fallback message: {}",
                    self.provider.name(),
                    err
                );
                GENERATION_FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::error::GenerationError;

    #[derive(Default)]
    struct RecordingProvider {
        fail: bool,
        last: Mutex<Option<(ChatRequest, String)>>,
    }

    #[async_trait]
    impl ChatProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn chat(
            &self,
            request: ChatRequest,
            model_id: &str,
        ) -> Result<String, GenerationError> {
            *self.last.lock().unwrap() = Some((request, model_id.to_string()));
            if self.fail {
                return Err(GenerationError::EmptyResponse);
            }
            Ok("Grounded answer.".to_string())
        }
    }

    #[tokio::test]
    async fn sends_single_user_message_with_bounds() {
        let provider = Arc::new(RecordingProvider::default());
        let generator = AnswerGenerator::new(provider.clone(), &GenerationConfig::default());

        let answer = generator.generate("the prompt").await;

        assert_eq!(answer, "Grounded answer.");
        let (request, model) = provider.last.lock().unwrap().clone().expect("called");
        assert_eq!(model, "gpt-3.5-turbo");
        assert_eq!(request.messages, vec![ChatMessage::user("the prompt")]);
        assert_eq!(request.max_tokens, Some(1000));
        assert_eq!(request.temperature, Some(0.2));
    }

    #[tokio::test]
    async fn provider_failure_yields_fallback_text() {
        let provider = Arc::new(RecordingProvider {
            fail: true,
            ..Default::default()
        });
        let generator = AnswerGenerator::new(provider, &GenerationConfig::default());

        assert_eq!(generator.generate("p").await, GENERATION_FALLBACK_MESSAGE);
    }
}
