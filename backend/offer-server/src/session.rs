//! One live offer: the engine's [`FormStore`] plus the side effects around
//! it (draft restore at startup, autosave feed, draft clearing).

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use offer_form::{
    build_submission, calculate_progress, restore_draft, section_statuses, validate, Applied,
    Branding, FormCommand, FormFeatures, FormState, FormStore, ProgressSnapshot,
    SectionProgress, SubmissionPayload, ValidationErrors,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::autosave::DraftFeed;
use crate::config::Config;
use crate::errors::Result;
use crate::persistence::DraftStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    #[serde(flatten)]
    pub progress: ProgressSnapshot,
    pub sections: Vec<SectionProgress>,
}

pub struct FormSession {
    store: FormStore,
    features: FormFeatures,
    branding: Branding,
    feed: DraftFeed,
}

impl FormSession {
    /// Build the starting form: prefilled when the config carries a prefill,
    /// otherwise restored from a fresh enough draft, otherwise blank.
    pub async fn open(config: &Config, drafts: Arc<dyn DraftStore>, feed: DraftFeed) -> Self {
        let today = today();
        let mut state = FormState::new(today);
        let mut branding = Branding::default();

        match &config.prefill {
            Some(prefill) => {
                state.apply_prefill(prefill, None);
                branding = prefill.branding();
                info!("Form prefilled for agent {:?}", prefill.agent_name);
            }
            None => {
                if let Some(restored) =
                    load_draft(drafts.as_ref(), &config.draft_key, &state, config.draft_max_age_ms())
                        .await
                {
                    info!("Restored draft {:?}", config.draft_key);
                    state = restored;
                }
            }
        }

        Self {
            store: FormStore::from_state(state, config.canvas),
            features: config.features,
            branding,
            feed,
        }
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn features(&self) -> &FormFeatures {
        &self.features
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    /// Apply one command. Effective changes are queued for autosave; clearing
    /// the form also clears the stored draft.
    pub async fn apply(&mut self, command: FormCommand) -> Result<Applied> {
        let clearing = matches!(command, FormCommand::ClearForm);
        let applied = self.store.apply(command, today())?;
        if clearing {
            self.clear_draft().await;
        } else if applied.changed {
            self.feed.queue(self.store.state().clone());
        }
        Ok(applied)
    }

    pub fn validation(&self) -> ValidationErrors {
        validate(self.store.state(), &self.features)
    }

    pub fn progress(&self) -> ProgressView {
        ProgressView {
            progress: calculate_progress(self.store.state()),
            sections: section_statuses(self.store.state(), &self.features),
        }
    }

    /// Validate and build the payload. Failures are remembered as the shown
    /// errors; success clears the stored draft.
    pub async fn submit(
        &mut self,
        now: DateTime<Utc>,
    ) -> std::result::Result<SubmissionPayload, ValidationErrors> {
        match build_submission(self.store.state(), &self.features, now) {
            Ok(payload) => {
                info!("Offer submitted: {}", payload.pdf_filename);
                self.store.record_errors(ValidationErrors::new());
                self.clear_draft().await;
                Ok(payload)
            }
            Err(errors) => {
                info!("Submit rejected with {} errors", errors.len());
                self.store.record_errors(errors.clone());
                Err(errors)
            }
        }
    }

    /// Drop the pending autosave and the stored draft. Best effort.
    async fn clear_draft(&self) {
        if let Err(e) = self.feed.clear().await {
            error!("Failed to clear draft {:?}: {e}", self.feed.key());
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn load_draft(
    drafts: &dyn DraftStore,
    key: &str,
    base: &FormState,
    max_age_ms: i64,
) -> Option<FormState> {
    let raw = match drafts.load(key).await {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("Could not read draft {key:?}: {e}");
            return None;
        }
    };
    restore_draft(&raw, base, Utc::now().timestamp_millis(), max_age_ms)
}
