//! The normalized loss record and its status vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a piece of equipment, as printed in the source caption.
///
/// Declaration order matters: status detection scans [`Status::ALL`] front
/// to back and takes the first literal found in the caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Destroyed,
    Captured,
    Damaged,
    Abandoned,
    Sunk,
    Scuttled,
}

impl Status {
    /// Ordered scan table of (literal, variant) pairs.
    pub const ALL: [(&'static str, Status); 6] = [
        ("destroyed", Status::Destroyed),
        ("captured", Status::Captured),
        ("damaged", Status::Damaged),
        ("abandoned", Status::Abandoned),
        ("sunk", Status::Sunk),
        ("scuttled", Status::Scuttled),
    ];

    /// Lowercase literal as it appears in captions and in the baseline file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Destroyed => "destroyed",
            Status::Captured => "captured",
            Status::Damaged => "damaged",
            Status::Abandoned => "abandoned",
            Status::Sunk => "sunk",
            Status::Scuttled => "scuttled",
        }
    }

    /// First status (in declaration order) whose literal occurs in `caption`.
    ///
    /// Matching is a case-sensitive substring test.
    pub fn detect(caption: &str) -> Option<Status> {
        Self::ALL
            .iter()
            .find(|(literal, _)| caption.contains(literal))
            .map(|(_, status)| *status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported equipment loss.
///
/// Value semantics: two losses are equal iff all four fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loss {
    /// Equipment category label, e.g. `T-64BV`.
    #[serde(rename = "type")]
    pub kind: String,

    pub status: Status,

    /// Ordinal within the status group, as printed by the source.
    pub number: u32,

    /// Absolute URL of the photographic evidence.
    pub link: String,
}

impl Loss {
    pub fn new(kind: impl Into<String>, status: Status, number: u32, link: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            status,
            number,
            link: link.into(),
        }
    }
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.status, self.link)
    }
}

/// A loss tagged with the country (or category) label of the page it came from.
///
/// Serializes as a two-element array `[country, loss]`, which is the delta
/// file layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryLoss(pub String, pub Loss);

impl CountryLoss {
    pub fn new(country: impl Into<String>, loss: Loss) -> Self {
        Self(country.into(), loss)
    }

    pub fn country(&self) -> &str {
        &self.0
    }

    pub fn loss(&self) -> &Loss {
        &self.1
    }
}

impl fmt::Display for CountryLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tank() -> Loss {
        Loss::new(
            "T-64BV",
            Status::Damaged,
            4,
            "https://i.postimg.cc/L52GF2Ln/1001-unkn-tank-dam-23-02-23.jpg",
        )
    }

    #[test]
    fn test_status_detect_uses_declaration_order() {
        assert_eq!(Status::detect("(1, destroyed)"), Some(Status::Destroyed));
        // Both literals present: the earlier declared one wins.
        assert_eq!(
            Status::detect("(1, damaged and captured)"),
            Some(Status::Captured)
        );
        assert_eq!(Status::detect("(1, scuttled)"), Some(Status::Scuttled));
        assert_eq!(Status::detect("(1, Destroyed)"), None);
        assert_eq!(Status::detect("(1)"), None);
    }

    #[test]
    fn test_loss_value_equality() {
        let a = tank();
        let b = tank();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));

        let other = Loss { number: 5, ..a };
        assert!(!set.contains(&other));
    }

    #[test]
    fn test_loss_json_field_names() {
        let json = serde_json::to_value(tank()).unwrap();
        assert_eq!(json["type"], "T-64BV");
        assert_eq!(json["status"], "damaged");
        assert_eq!(json["number"], 4);
        assert!(json["link"].as_str().unwrap().starts_with("https://"));
    }

    #[test]
    fn test_loss_reads_persisted_record() {
        let raw = r#"{"type": "BMP-2", "status": "captured", "number": 17, "link": "https://a/b.jpg"}"#;
        let loss: Loss = serde_json::from_str(raw).unwrap();
        assert_eq!(loss, Loss::new("BMP-2", Status::Captured, 17, "https://a/b.jpg"));
    }

    #[test]
    fn test_country_loss_serializes_as_pair() {
        let entry = CountryLoss::new("russian", tank());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json[0], "russian");
        assert_eq!(json[1]["number"], 4);
        assert_eq!(entry.to_string(), format!("russian {}", tank()));
    }
}
