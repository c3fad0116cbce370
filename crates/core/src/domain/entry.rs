// Queue Entry Domain Model

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Entry identifier (server-assigned, never reused)
pub type EntryId = i64;

/// 1-based rank inside a class; 0 marks a served entry
pub type Position = i64;

/// Maximum display name length (characters)
pub const MAX_NAME_LEN: usize = 20;

/// Priority class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityClass {
    #[serde(rename = "P")]
    Preferential,
    #[serde(rename = "N")]
    Normal,
}

impl PriorityClass {
    /// Parse a boundary class code (`P`, `p`, `N` or `n`)
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "P" | "p" => Ok(PriorityClass::Preferential),
            "N" | "n" => Ok(PriorityClass::Normal),
            other => Err(DomainError::InvalidClass(other.to_string())),
        }
    }

    /// Canonical storage code
    pub fn code(&self) -> &'static str {
        match self {
            PriorityClass::Preferential => "P",
            PriorityClass::Normal => "N",
        }
    }
}

impl std::fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for PriorityClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

/// One person's slot in the waiting line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub name: String,
    #[serde(rename = "class_code")]
    pub class: PriorityClass,
    pub served: bool,
    pub joined_at: String,
    pub position: Position,
}

impl QueueEntry {
    /// Create a new active entry
    ///
    /// `id`, `position` and `joined_at` are injected by the engine.
    pub fn new(
        id: EntryId,
        name: impl Into<String>,
        class: PriorityClass,
        position: Position,
        joined_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            served: false,
            joined_at: joined_at.into(),
            position,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.served
    }

    /// Move one step towards the front.
    ///
    /// Reaching position 0 retires the entry. Served entries never move.
    pub fn step_forward(&mut self) -> Result<()> {
        if self.served {
            return Err(DomainError::AlreadyServed(self.id));
        }
        self.position -= 1;
        if self.position <= 0 {
            self.position = 0;
            self.served = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_codes_are_case_insensitive() {
        assert_eq!(
            PriorityClass::from_code("P").unwrap(),
            PriorityClass::Preferential
        );
        assert_eq!(
            PriorityClass::from_code("p").unwrap(),
            PriorityClass::Preferential
        );
        assert_eq!(PriorityClass::from_code("N").unwrap(), PriorityClass::Normal);
        assert_eq!(PriorityClass::from_code("n").unwrap(), PriorityClass::Normal);
    }

    #[test]
    fn test_unknown_class_code_rejected() {
        for code in ["X", "", "PN", " P", "pref"] {
            let err = PriorityClass::from_code(code).unwrap_err();
            assert!(matches!(err, DomainError::InvalidClass(_)), "code {:?}", code);
        }
    }

    #[test]
    fn test_step_forward_from_front_marks_served() {
        let mut entry = QueueEntry::new(1, "Alice", PriorityClass::Preferential, 1, "t");
        entry.step_forward().unwrap();
        assert!(entry.served);
        assert_eq!(entry.position, 0);
    }

    #[test]
    fn test_step_forward_behind_front_stays_active() {
        let mut entry = QueueEntry::new(2, "Bob", PriorityClass::Normal, 3, "t");
        entry.step_forward().unwrap();
        assert!(entry.is_active());
        assert_eq!(entry.position, 2);
    }

    #[test]
    fn test_served_entry_is_frozen() {
        let mut entry = QueueEntry::new(1, "Alice", PriorityClass::Normal, 1, "t");
        entry.step_forward().unwrap();
        assert!(matches!(
            entry.step_forward(),
            Err(DomainError::AlreadyServed(1))
        ));
        assert_eq!(entry.position, 0);
    }
}
