// src/pipeline.rs

use reqwest::Client;
use tracing::{info, warn};

use crate::config::{Config, SettingsFailurePolicy};
use crate::error::SyncError;
use crate::fetch;
use crate::publish::{IndexPublisher, IndexStatus};

/// Result of a step whose failure may be tolerated.
#[derive(Debug)]
pub enum StepOutcome {
    Applied,
    /// The step failed and the policy chose to log and carry on.
    Logged(SyncError),
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// What a finished run did.
#[derive(Debug)]
pub struct SyncReport {
    pub records: usize,
    pub index: IndexStatus,
    pub task_uid: Option<u64>,
    pub settings: StepOutcome,
}

/// Apply `policy` to the settings step: `Fatal` propagates, `Warn` downgrades.
pub fn settle_settings(
    result: Result<(), SyncError>,
    policy: SettingsFailurePolicy,
) -> Result<StepOutcome, SyncError> {
    match (result, policy) {
        (Ok(()), _) => Ok(StepOutcome::Applied),
        (Err(e), SettingsFailurePolicy::Fatal) => Err(e),
        (Err(e), SettingsFailurePolicy::Warn) => {
            warn!(error = %e, "continuing without index settings");
            Ok(StepOutcome::Logged(e))
        }
    }
}

/// fetch → parse → ensure index → upload → settings, stopping at the first fatal error.
pub async fn run(config: &Config) -> Result<SyncReport, SyncError> {
    let client = Client::new();
    run_with_client(&client, config).await
}

pub async fn run_with_client(client: &Client, config: &Config) -> Result<SyncReport, SyncError> {
    let dataset = fetch::fetch_dataset(client, &config.sheet_url).await?;

    let publisher = IndexPublisher::new(client.clone(), &config.host, config.master_key.as_str())?;
    let index = publisher.ensure_index().await?;
    let receipt = publisher.upload_documents(&dataset).await?;
    let settings = settle_settings(publisher.update_settings().await, config.settings_policy)?;

    info!(
        records = dataset.len(),
        uploaded = receipt.documents,
        ?index,
        task_uid = ?receipt.task_uid,
        settings_applied = settings.is_applied(),
        "sync finished"
    );

    Ok(SyncReport {
        records: dataset.len(),
        index,
        task_uid: receipt.task_uid,
        settings,
    })
}
