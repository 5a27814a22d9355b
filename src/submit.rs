//! Pit-scouting form submission.

use std::collections::BTreeMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::SubmitError;
use crate::records::{FieldValue, PitRecord, ScoutRecord, TEAM_NUMBER_FIELD};
use crate::services::record_store::RecordStore;

/// Record field that echoes the document id the record was stored under.
pub const DOC_REF_FIELD: &str = "docRefId";

/// Values entered on the pit form, not yet validated.
#[derive(Debug, Clone, Default)]
pub struct PitSubmission {
    fields: BTreeMap<String, FieldValue>,
}

impl PitSubmission {
    pub fn new(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    /// Parses `key=value` pairs as typed on the command line. Every value is
    /// kept as text, the way the form inputs store them.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Self, String> {
        let mut fields = BTreeMap::new();
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got '{pair}'"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("empty field name in '{pair}'"));
            }
            fields.insert(key.to_string(), FieldValue::from(value));
        }
        Ok(Self { fields })
    }

    /// Validates the submission and builds the record to store under `id`.
    ///
    /// The team number is required. Empty text fields are dropped so a
    /// partially filled form never blanks out values already stored.
    pub fn prepare(&self, id: &str) -> Result<PitRecord, SubmitError> {
        let has_team = self
            .fields
            .get(TEAM_NUMBER_FIELD)
            .is_some_and(|v| !v.to_string().trim().is_empty());
        if !has_team {
            return Err(SubmitError::MissingTeamNumber);
        }

        let fields = self
            .fields
            .iter()
            .filter(|(_, v)| !matches!(v, FieldValue::Text(s) if s.is_empty()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(ScoutRecord {
            id: Some(id.to_string()),
            fields,
        }
        .with(DOC_REF_FIELD, id))
    }

    /// Stores the submission under a freshly generated document id and
    /// returns that id.
    #[tracing::instrument(skip_all)]
    pub async fn submit<S: RecordStore + ?Sized>(&self, store: &S) -> Result<String, SubmitError> {
        let id = Uuid::new_v4().to_string();
        let record = self.prepare(&id)?;

        if let Err(e) = store.save_pit_record(&id, &record).await {
            error!(doc_id = %id, error = %e, "Pit record write failed");
            return Err(SubmitError::Store(e));
        }

        info!(doc_id = %id, fields = record.fields.len(), "Pit record saved");
        Ok(id)
    }
}
