//! Windowed conversation memory

use crate::types::ChatMessage;

/// Ordered user/assistant messages of one session, capped at `max_messages`.
///
/// When a turn pushes the count over the cap, the oldest messages are
/// dropped two at a time so the window always starts on a user message.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    messages: Vec<ChatMessage>,
    max_messages: usize,
}

impl ConversationMemory {
    /// Create an empty memory; the cap is raised to hold at least one exchange
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages: max_messages.max(2),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Record a completed exchange
    pub fn push_turn(&mut self, question: ChatMessage, answer: ChatMessage) {
        self.messages.push(question);
        self.messages.push(answer);

        let excess = self.messages.len().saturating_sub(self.max_messages);
        if excess > 0 {
            let drop = excess + excess % 2;
            self.messages.drain(..drop.min(self.messages.len()));
            tracing::debug!("Conversation window full, dropped {} oldest messages", drop);
        }
    }

    /// Forget the conversation
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn test_push_turn_appends_in_order() {
        let mut memory = ConversationMemory::new(10);
        memory.push_turn(ChatMessage::user("q1"), ChatMessage::assistant("a1"));

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.messages()[0].role, Role::User);
        assert_eq!(memory.messages()[1].content, "a1");
    }

    #[test]
    fn test_window_drops_oldest_pairs() {
        let mut memory = ConversationMemory::new(4);
        for i in 0..5 {
            memory.push_turn(
                ChatMessage::user(format!("q{}", i)),
                ChatMessage::assistant(format!("a{}", i)),
            );
            assert!(memory.len() <= 4);
        }

        let contents: Vec<&str> = memory.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q3", "a3", "q4", "a4"]);
    }

    #[test]
    fn test_odd_window_still_starts_with_user() {
        let mut memory = ConversationMemory::new(5);
        for i in 0..4 {
            memory.push_turn(
                ChatMessage::user(format!("q{}", i)),
                ChatMessage::assistant(format!("a{}", i)),
            );
        }

        assert_eq!(memory.len(), 4);
        assert_eq!(memory.messages()[0].role, Role::User);
        assert_eq!(memory.messages()[0].content, "q2");
    }

    #[test]
    fn test_clear() {
        let mut memory = ConversationMemory::default();
        memory.push_turn(ChatMessage::user("q"), ChatMessage::assistant("a"));
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.max_messages(), 20);
    }
}
