//! Outcome of validating one candidate value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Accept, suggest a correction, or reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The value appears in a correct column.
    Accept,
    /// The value appears in a suggestion column; `options` are the correct
    /// column values of the matching rows.
    Suggest { subject: String, options: Vec<String> },
    /// The value is unknown; `columns` are the correct columns.
    Reject { subject: String, columns: Vec<String> },
}

impl Verdict {
    /// Whether the value was accepted.
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    /// Human-readable rejection message, `None` when accepted.
    pub fn message(&self) -> Option<String> {
        match self {
            Verdict::Accept => None,
            Verdict::Suggest { subject, options } => Some(format!(
                "Entered: {}. Expected: any one of {}",
                subject,
                bracketed(options)
            )),
            Verdict::Reject { subject, columns } => Some(format!(
                "Entered: {}. Expected: an entry from the columns {}",
                subject,
                bracketed(columns)
            )),
        }
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Accept => "accept",
            Verdict::Suggest { .. } => "suggest",
            Verdict::Reject { .. } => "reject",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(&message),
            None => f.write_str("ok"),
        }
    }
}

fn bracketed(values: &[String]) -> String {
    format!("[{}]", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Verdict::Accept.message(), None);

        let suggest = Verdict::Suggest {
            subject: "cat".to_string(),
            options: vec!["Felis catus".to_string(), "Felis domesticus".to_string()],
        };
        assert_eq!(
            suggest.message().unwrap(),
            "Entered: cat. Expected: any one of [Felis catus, Felis domesticus]"
        );

        let reject = Verdict::Reject {
            subject: "zzz".to_string(),
            columns: vec!["Scientific_Name".to_string()],
        };
        assert_eq!(
            reject.to_string(),
            "Entered: zzz. Expected: an entry from the columns [Scientific_Name]"
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(Verdict::Accept).unwrap();
        assert_eq!(json["verdict"], "accept");
    }
}
