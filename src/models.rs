//! Core data models for the family journal service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ================= Enums =================

/// Which side of the family wrote a journal entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Parent,
    Teen,
}

impl EntryType {
    /// Lenient wire parsing: anything that is not "parent" counts as the
    /// teen side, mirroring the original binary rendering.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "parent" => EntryType::Parent,
            _ => EntryType::Teen,
        }
    }

    /// Author label used in the insight prompt
    pub fn author_label(&self) -> &'static str {
        match self {
            EntryType::Parent => "Parent",
            EntryType::Teen => "Teenager",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryType::Parent => "parent",
            EntryType::Teen => "teen",
        };
        write!(f, "{}", s)
    }
}

// ================= Family =================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMember {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    pub parent: FamilyMember,
    pub teen: FamilyMember,
    pub created_at: DateTime<Utc>,
}

impl Family {
    pub fn new(
        name: impl Into<String>,
        parent_name: impl Into<String>,
        teen_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent: FamilyMember {
                name: parent_name.into(),
                role: "parent".to_string(),
            },
            teen: FamilyMember {
                name: teen_name.into(),
                role: "teen".to_string(),
            },
            created_at: Utc::now(),
        }
    }
}

// ================= Journal =================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub family_id: Uuid,
    pub author: String,
    pub content: String,
    pub mood: String,
    pub entry_type: EntryType,
    pub timestamp: DateTime<Utc>,
    /// AI-generated comment; `null` on the wire until (or unless) one lands
    pub ai_insight: Option<String>,
}

impl JournalEntry {
    pub fn new(
        family_id: Uuid,
        author: impl Into<String>,
        content: impl Into<String>,
        mood: impl Into<String>,
        entry_type: EntryType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            family_id,
            author: author.into(),
            content: content.into(),
            mood: mood.into(),
            entry_type,
            timestamp: Utc::now(),
            ai_insight: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_parses_leniently() {
        assert_eq!(EntryType::parse("parent"), EntryType::Parent);
        assert_eq!(EntryType::parse("Parent"), EntryType::Parent);
        assert_eq!(EntryType::parse("teen"), EntryType::Teen);
        assert_eq!(EntryType::parse("grandparent"), EntryType::Teen);
    }

    #[test]
    fn test_family_wire_shape() {
        let family = Family::new("The Does", "Jane", "Sam");
        let json = serde_json::to_value(&family).unwrap();

        assert_eq!(json["name"], "The Does");
        assert_eq!(json["parent"]["role"], "parent");
        assert_eq!(json["teen"]["name"], "Sam");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_journal_entry_wire_shape() {
        let family = Family::new("The Does", "Jane", "Sam");
        let entry = JournalEntry::new(family.id, "Sam", "Long day", "tired", EntryType::Teen);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["familyId"], serde_json::json!(family.id));
        assert_eq!(json["entryType"], "teen");
        assert_eq!(json["aiInsight"], serde_json::Value::Null);
    }
}
