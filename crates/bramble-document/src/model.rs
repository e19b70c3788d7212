use bramble_types::ExternalId;

use crate::CONTENT_TYPE_TEXT;
use crate::error::DocumentError;
use crate::parse;

/// A normalized, validated book document.
///
/// Construct through [`BookDocument::from_json_value`] or
/// [`BookDocument::from_slice`]; both reject documents that fail shape or
/// cross-reference validation, so a `BookDocument` obtained from them is safe
/// to materialize. Waypoint order is the author's declaration order and is
/// preserved through loading.
#[derive(Clone, Debug, PartialEq)]
pub struct BookDocument {
    pub name: String,
    pub description: String,
    pub waypoints: Vec<WaypointRecord>,
}

/// One declared waypoint: a narrative node and its outgoing options.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointRecord {
    /// Document-scoped id other waypoints use to reference this one.
    pub id: ExternalId,
    /// Entry-point flag. Exactly one waypoint per document carries it.
    pub start: bool,
    pub content: ContentRecord,
    /// Outgoing edges in declaration order. Empty means an ending.
    pub options: Vec<OptionRecord>,
}

/// The content block of a waypoint.
///
/// `kind` is an open string; only [`CONTENT_TYPE_TEXT`] makes `data`
/// meaningful as narrative text. Unrecognized kinds are carried through
/// without error so new content types can ship without a schema change.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentRecord {
    pub kind: String,
    pub data: Option<String>,
}

impl ContentRecord {
    /// Narrative text, present only for `"text"` content.
    pub fn narrative_text(&self) -> Option<&str> {
        if self.kind == CONTENT_TYPE_TEXT {
            self.data.as_deref()
        } else {
            None
        }
    }
}

/// One declared option: a labeled edge to another waypoint in the same
/// document. The label may be empty.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionRecord {
    pub destination: ExternalId,
    pub link_text: String,
}

impl BookDocument {
    /// Normalize and validate an untyped JSON document.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, DocumentError> {
        let document = parse::normalize(value)?;
        document.validate()?;
        Ok(document)
    }

    /// Parse raw upload bytes, then normalize and validate.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| DocumentError::Json(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Cross-reference validation: duplicate ids, dangling option
    /// destinations, and start-waypoint cardinality.
    ///
    /// Runs automatically in the constructors; exposed for documents built
    /// by hand.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut declared = std::collections::HashSet::with_capacity(self.waypoints.len());
        for wp in &self.waypoints {
            if !declared.insert(&wp.id) {
                return Err(DocumentError::DuplicateWaypointId(wp.id.clone()));
            }
        }

        for wp in &self.waypoints {
            for opt in &wp.options {
                if !declared.contains(&opt.destination) {
                    return Err(DocumentError::DanglingReference {
                        source_waypoint: wp.id.clone(),
                        destination: opt.destination.clone(),
                    });
                }
            }
        }

        match self.waypoints.iter().filter(|wp| wp.start).count() {
            1 => Ok(()),
            0 => Err(DocumentError::MissingStartWaypoint),
            n => Err(DocumentError::MultipleStartWaypoints(n)),
        }
    }

    /// Number of declared waypoints.
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Total number of declared options across all waypoints.
    pub fn option_count(&self) -> usize {
        self.waypoints.iter().map(|wp| wp.options.len()).sum()
    }

    /// The declared start waypoint. Always present on a validated document.
    pub fn start_waypoint(&self) -> Option<&WaypointRecord> {
        self.waypoints.iter().find(|wp| wp.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waypoint(id: i64, start: bool, destinations: &[i64]) -> WaypointRecord {
        WaypointRecord {
            id: ExternalId::from(id),
            start,
            content: ContentRecord {
                kind: "text".into(),
                data: Some(format!("waypoint {id}")),
            },
            options: destinations
                .iter()
                .map(|d| OptionRecord {
                    destination: ExternalId::from(*d),
                    link_text: format!("go to {d}"),
                })
                .collect(),
        }
    }

    fn document(waypoints: Vec<WaypointRecord>) -> BookDocument {
        BookDocument {
            name: "A Book".into(),
            description: "About things".into(),
            waypoints,
        }
    }

    #[test]
    fn narrative_text_for_text_content() {
        let content = ContentRecord {
            kind: "text".into(),
            data: Some("hello".into()),
        };
        assert_eq!(content.narrative_text(), Some("hello"));
    }

    #[test]
    fn narrative_text_absent_for_other_kinds() {
        let content = ContentRecord {
            kind: "audio".into(),
            data: Some("narration.mp3".into()),
        };
        assert_eq!(content.narrative_text(), None);
    }

    #[test]
    fn validate_accepts_a_cycle() {
        let doc = document(vec![waypoint(1, true, &[2]), waypoint(2, false, &[1])]);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn validate_accepts_self_loop() {
        let doc = document(vec![waypoint(1, true, &[1])]);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let doc = document(vec![waypoint(1, true, &[]), waypoint(1, false, &[])]);
        assert_eq!(
            doc.validate(),
            Err(DocumentError::DuplicateWaypointId(ExternalId::from(1)))
        );
    }

    #[test]
    fn validate_rejects_dangling_reference() {
        let doc = document(vec![waypoint(1, true, &[99])]);
        assert_eq!(
            doc.validate(),
            Err(DocumentError::DanglingReference {
                source_waypoint: ExternalId::from(1),
                destination: ExternalId::from(99),
            })
        );
    }

    #[test]
    fn validate_rejects_zero_starts() {
        let doc = document(vec![waypoint(1, false, &[])]);
        assert_eq!(doc.validate(), Err(DocumentError::MissingStartWaypoint));
    }

    #[test]
    fn validate_rejects_multiple_starts() {
        let doc = document(vec![waypoint(1, true, &[]), waypoint(2, true, &[])]);
        assert_eq!(doc.validate(), Err(DocumentError::MultipleStartWaypoints(2)));
    }

    #[test]
    fn counts() {
        let doc = document(vec![waypoint(1, true, &[2, 2]), waypoint(2, false, &[])]);
        assert_eq!(doc.waypoint_count(), 2);
        assert_eq!(doc.option_count(), 2);
        assert_eq!(doc.start_waypoint().map(|wp| &wp.id), Some(&1.into()));
    }

    #[test]
    fn integer_and_string_ids_do_not_collide() {
        let mut second = waypoint(1, false, &[]);
        second.id = ExternalId::from("1");
        let doc = document(vec![waypoint(1, true, &[]), second]);
        assert!(doc.validate().is_ok());
    }
}
