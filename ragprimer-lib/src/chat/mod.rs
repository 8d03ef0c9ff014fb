//! Chat completion and prompt assembly for retrieval-augmented answers

use serde::{Deserialize, Serialize};

use crate::store::SearchResult;
use crate::Result;

/// Who a message is from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for chat completion models
pub trait ChatModel: Send + Sync {
    /// Produce the assistant's reply to a conversation
    fn complete(&mut self, messages: &[Message]) -> Result<String>;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

const SYSTEM_PROMPT: &str = "You are a helpful assistant for question-answering tasks. \
Use the provided context to answer the question. \
If the context does not contain the answer, say that you don't know. \
Keep the answer concise.";

/// Build the conversation sent to the chat model for a retrieval-augmented answer.
///
/// Context chunks are numbered in ranking order and tagged with their chunk id.
pub fn rag_messages(question: &str, context: &[SearchResult]) -> Vec<Message> {
    let context_block = if context.is_empty() {
        "(no relevant context found)".to_string()
    } else {
        context
            .iter()
            .enumerate()
            .map(|(i, result)| {
                format!("[{}] ({})\n{}", i + 1, result.chunk.id, result.chunk.text.trim())
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!("Context:\n{context_block}\n\nQuestion: {question}")),
    ]
}

mod openai;

pub use openai::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;

    fn result(id: &str, text: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: id.to_string(),
                text: text.to_string(),
                sequence_index: 1,
                source_document_id: "doc".to_string(),
            },
            score: 0.9,
        }
    }

    #[test]
    fn test_rag_messages_layout() {
        let context = vec![
            result("a.txt_chunk2", "Microsoft raised $10B.\n"),
            result("b.txt_chunk1", "Unrelated."),
        ];
        let messages = rag_messages("how much did microsoft raise?", &context);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            messages[1].content,
            "Context:\n[1] (a.txt_chunk2)\nMicrosoft raised $10B.\n\n[2] (b.txt_chunk1)\nUnrelated.\n\n\
             Question: how much did microsoft raise?"
        );
    }

    #[test]
    fn test_rag_messages_without_context() {
        let messages = rag_messages("anything?", &[]);
        assert!(messages[1].content.contains("(no relevant context found)"));
        assert!(messages[1].content.ends_with("Question: anything?"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
