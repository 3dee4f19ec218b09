//! One request's calculation lifecycle.
//!
//! A task waits out the simulated delay, scores every group in input order, then hands the
//! batch to the delivery client. It owns its request outright and shares nothing with other
//! tasks. Delivery failure ends the task after logging it.

use crate::config::CalculatorConfig;
use crate::delivery::ResultDeliveryClient;
use crate::formula::compute_index;
use crate::request::{CalculationRequest, GroupResult};
use crate::CaviResult;
use std::sync::Arc;
use tracing::Instrument;

pub struct CalculationTask {
    cfg: Arc<CalculatorConfig>,
    delivery: ResultDeliveryClient,
    request: CalculationRequest,
}

impl CalculationTask {
    pub fn new(
        cfg: Arc<CalculatorConfig>,
        delivery: ResultDeliveryClient,
        request: CalculationRequest,
    ) -> Self {
        Self {
            cfg,
            delivery,
            request,
        }
    }

    /// Run the task to completion. Never fails: the delivery outcome is logged.
    pub async fn run(self) {
        let span = tracing::info_span!(
            "cavi_calculation",
            calculation_id = %self.request.calculation_id,
            groups_count = self.request.groups.len()
        );
        async move {
            match self.execute().await {
                Ok(delivered) => {
                    tracing::info!(delivered, "successfully sent results");
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to send results");
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self) -> CaviResult<usize> {
        let delay = self.cfg.delay().sample();
        tracing::info!(delay_secs = delay.as_secs(), "starting CAVI calculation");
        tokio::time::sleep(delay).await;

        let results = score_groups(&self.request);
        self.delivery
            .deliver(&self.request.calculation_id, &results)
            .await?;
        Ok(results.len())
    }
}

/// Score every group of `request`, one result per group in input order.
pub fn score_groups(request: &CalculationRequest) -> Vec<GroupResult> {
    request
        .groups
        .iter()
        .map(|group| {
            let cavi_index = compute_index(
                group.age_group,
                group.disease_type,
                request.systolic_pressure,
                request.diastolic_pressure,
                request.pulse_wave_velocity,
            );
            tracing::info!(group_id = %group.group_id, cavi_index, "calculated CAVI");
            GroupResult {
                group_id: group.group_id.clone(),
                cavi_index,
            }
        })
        .collect()
}
