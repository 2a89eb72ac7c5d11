//! The session transcript: an append-only log of user/assistant exchanges.
//!
//! Entries are immutable once appended and their order is the display
//! order — nothing is ever removed, reordered, or deduplicated. A user
//! entry logically precedes its assistant entry, but the pairing is
//! positional; there is no link field. The whole transcript lives in
//! memory for one session and is discarded when the session ends.

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One immutable entry in the transcript.
///
/// User entries carry the submitted `topic`; assistant entries carry the
/// generated Markdown `content`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TranscriptEntry {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl TranscriptEntry {
    /// A user entry holding the submitted topic.
    pub fn user(topic: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            topic: Some(topic.into()),
            content: None,
        }
    }

    /// An assistant entry holding generated Markdown content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            topic: None,
            content: Some(content.into()),
        }
    }
}

/// Append-only ordered sequence of transcript entries.
///
/// The inner storage is private so append-only semantics are enforced by
/// the interface, not by convention. There is no size bound — growth is
/// limited only by the length of one interactive session.
#[derive(Default, Debug, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// An empty transcript for a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the end of the sequence.
    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// The full sequence in insertion order.
    pub fn all(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_transcript_is_empty() {
        let t = Transcript::new();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        assert!(t.all().is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut t = Transcript::new();
        t.append(TranscriptEntry::user("first topic"));
        t.append(TranscriptEntry::assistant("# First"));
        t.append(TranscriptEntry::user("second topic"));

        let all = t.all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].role, Role::User);
        assert_eq!(all[0].topic.as_deref(), Some("first topic"));
        assert_eq!(all[1].role, Role::Assistant);
        assert_eq!(all[1].content.as_deref(), Some("# First"));
        assert_eq!(all[2].topic.as_deref(), Some("second topic"));
    }

    #[test]
    fn rereading_without_append_is_stable() {
        let mut t = Transcript::new();
        t.append(TranscriptEntry::user("topic"));
        t.append(TranscriptEntry::assistant("content"));

        let first: Vec<TranscriptEntry> = t.all().to_vec();
        let second: Vec<TranscriptEntry> = t.all().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn entry_constructors_fill_the_right_field() {
        let user = TranscriptEntry::user("t");
        assert_eq!(user.role, Role::User);
        assert!(user.content.is_none());

        let assistant = TranscriptEntry::assistant("c");
        assert_eq!(assistant.role, Role::Assistant);
        assert!(assistant.topic.is_none());
    }

    #[test]
    fn serde_roundtrip_omits_absent_fields() {
        let json = serde_json::to_value(TranscriptEntry::user("solar power")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["topic"], "solar power");
        assert!(json.get("content").is_none());

        let back: TranscriptEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, TranscriptEntry::user("solar power"));
    }
}
