use serde::{Deserialize, Serialize};

/// Verb a capability grants within a module.
///
/// The declaration order is the canonical order used for granted action
/// sets: create, read, update, delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Action;

    #[test]
    fn action_string_roundtrip() {
        for action in Action::ALL {
            let as_str = action.as_str();
            assert_eq!(as_str.parse::<Action>().ok(), Some(action));
            assert_eq!(action.to_string(), as_str);
        }
    }

    #[test]
    fn action_from_str_rejects_unknown_and_mixed_case() {
        assert!("bogus".parse::<Action>().is_err());
        assert!("Read".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn actions_order_create_read_update_delete() {
        let mut shuffled = vec![Action::Delete, Action::Read, Action::Create, Action::Update];
        shuffled.sort();
        assert_eq!(shuffled, Action::ALL.to_vec());
    }

    #[test]
    fn action_serializes_lower_case() {
        let json = serde_json::to_string(&Action::Update).expect("serialize");
        assert_eq!(json, "\"update\"");
    }
}
