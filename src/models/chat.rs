use serde::{ Deserialize, Serialize };

/// The shared clipboard record. One instance, overwritten in place:
/// the most recent write wins, no history is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardRecord {
    #[serde(default)]
    pub laptop: String,
    #[serde(default)]
    pub phone: String,
}

impl ClipboardRecord {
    /// Empty one field, preserving the other.
    pub fn clear_field(&mut self, field: ClipboardField) {
        match field {
            ClipboardField::Laptop => self.laptop.clear(),
            ClipboardField::Phone => self.phone.clear(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardField {
    Laptop,
    Phone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub created_at: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One persisted chat message. Append-only; `placeholder` marks the
/// transient "typing" entry a client may push while waiting for the
/// relay, which persisted reads must not return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub timestamp: i64,
    #[serde(default)]
    pub placeholder: bool,
}
