use async_trait::async_trait;

use crate::error::ApiResult;
use crate::model::{FinancialRecord, FinancialsUpdate};

/// Identifier of one editable record row. Assigned from a monotonically
/// increasing counter and never reused within a session, so removal and
/// re-render can never collide with a stale id.
pub type HandleId = u64;

/// The three editable fields of a row, kept as raw text so that "blank"
/// stays distinct from zero until serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub year: String,
    pub revenue: String,
    pub profit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: HandleId,
    pub draft: EntryDraft,
}

/// Non-fatal drops during the normalization pass, one category each. A
/// category is reported at most once per pass regardless of how many rows
/// it swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeWarning {
    MissingYear,
    DuplicateYear,
}

impl NormalizeWarning {
    pub fn user_message(&self) -> &'static str {
        match self {
            NormalizeWarning::MissingYear => {
                "Records without a usable year were skipped."
            }
            NormalizeWarning::DuplicateYear => {
                "Duplicate years were ignored; the first occurrence wins."
            }
        }
    }
}

/// Output of [`FinancialHistoryEditor::serialize`]: the deduplicated,
/// ascending-by-year records plus the warning categories hit along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHistory {
    pub records: Vec<FinancialRecord>,
    pub warnings: Vec<NormalizeWarning>,
}

/// Persistence seam for the editor. The production implementation is
/// [`crate::client::ApiClient`]; tests substitute mocks.
#[async_trait]
pub trait FinancialsGateway: Send + Sync {
    async fn put_financials(&self, records: &[FinancialRecord]) -> ApiResult<FinancialsUpdate>;
}

/// In-memory editing surface for a startup's yearly financial history.
///
/// Rows live in an arena ordered the way the user added them; identity is a
/// session-scoped [`HandleId`], not anything owned by a rendering layer. The
/// editor owns this state for one editing session and is discarded
/// afterwards; nothing is cached across sessions.
///
/// The derived years-operating counter equals the number of rows currently
/// present, not the post-dedup distinct-year count. The original behaved
/// that way, so the drift between the two is preserved on purpose (and
/// pinned by a test below).
#[derive(Debug, Default)]
pub struct FinancialHistoryEditor {
    entries: Vec<Entry>,
    next_id: HandleId,
    saved: Vec<FinancialRecord>,
}

impl FinancialHistoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the editing surface from a persisted history. Existing rows
    /// are discarded and the id counter restarts. An empty history still
    /// yields one blank row so there is always something to fill in.
    pub fn initialize(&mut self, records: &[FinancialRecord]) {
        self.entries.clear();
        self.next_id = 0;
        self.saved = records.to_vec();

        for record in records {
            let draft = EntryDraft {
                year: record.year.to_string(),
                revenue: record.revenue.map(|v| v.to_string()).unwrap_or_default(),
                profit: record.profit.map(|v| v.to_string()).unwrap_or_default(),
            };
            self.push_entry(draft);
        }

        if self.entries.is_empty() {
            self.push_entry(EntryDraft::default());
        }
    }

    /// Appends a blank row at the end of the visible list. Row count is
    /// unbounded; this is an editing surface, not a resource pool.
    pub fn add_record(&mut self) -> HandleId {
        self.push_entry(EntryDraft::default())
    }

    /// Removes the row with the given id. Removing an unknown or stale id is
    /// a no-op, not an error.
    pub fn remove_record(&mut self, id: HandleId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn set_year(&mut self, id: HandleId, value: &str) -> bool {
        self.with_draft(id, |draft| draft.year = value.to_string())
    }

    pub fn set_revenue(&mut self, id: HandleId, value: &str) -> bool {
        self.with_draft(id, |draft| draft.revenue = value.to_string())
    }

    pub fn set_profit(&mut self, id: HandleId, value: &str) -> bool {
        self.with_draft(id, |draft| draft.profit = value.to_string())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Derived years-operating proposal: the raw row count. Recomputed on
    /// demand, so it can never drift from the arena itself.
    pub fn years_operating(&self) -> usize {
        self.entries.len()
    }

    /// Last authoritative snapshot: the fetched history, replaced by the
    /// server-confirmed list after each successful submit.
    pub fn saved(&self) -> &[FinancialRecord] {
        &self.saved
    }

    /// The normalization pass: rows in visual order are parsed, rows without
    /// a usable year are dropped, later duplicates of an already-seen year
    /// are dropped, and the survivors come back sorted ascending by year
    /// (unique after dedup, so no tie-break is needed).
    ///
    /// This is a pure transform with side-channel warnings; malformed rows
    /// are policy-dropped, never an error. An unparsable revenue or profit
    /// becomes "not provided", matching what the original form produced for
    /// non-numeric input.
    pub fn serialize(&self) -> NormalizedHistory {
        // The warning-category set starts empty on every pass.
        fn note(warnings: &mut Vec<NormalizeWarning>, warning: NormalizeWarning) {
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }

        let mut records: Vec<FinancialRecord> = Vec::new();
        let mut seen_years: Vec<i32> = Vec::new();
        let mut warnings: Vec<NormalizeWarning> = Vec::new();

        for entry in &self.entries {
            let year = match entry.draft.year.trim().parse::<i32>() {
                Ok(year) => year,
                Err(_) => {
                    note(&mut warnings, NormalizeWarning::MissingYear);
                    continue;
                }
            };

            if seen_years.contains(&year) {
                note(&mut warnings, NormalizeWarning::DuplicateYear);
                continue;
            }
            seen_years.push(year);

            records.push(FinancialRecord {
                year,
                revenue: parse_amount(&entry.draft.revenue),
                profit: parse_amount(&entry.draft.profit),
            });
        }

        records.sort_by_key(|record| record.year);

        NormalizedHistory { records, warnings }
    }

    /// Sends an already-normalized list to the backend. On success the saved
    /// snapshot becomes the server-echoed list (or the submitted one when
    /// the server does not echo); rows are left untouched either way. On
    /// failure nothing changes, since there is no speculative mutation to
    /// roll back.
    pub async fn submit(
        &mut self,
        gateway: &dyn FinancialsGateway,
        records: Vec<FinancialRecord>,
    ) -> ApiResult<String> {
        let update = gateway.put_financials(&records).await?;
        self.saved = update.updated_financials.unwrap_or(records);
        Ok(update.message)
    }

    fn push_entry(&mut self, draft: EntryDraft) -> HandleId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry { id, draft });
        id
    }

    fn with_draft(&mut self, id: HandleId, apply: impl FnOnce(&mut EntryDraft)) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                apply(&mut entry.draft);
                true
            }
            None => false,
        }
    }
}

/// Blank and non-numeric amounts both map to "not provided".
fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
