//! Bounded, non-blocking dispatch of calculation tasks.
//!
//! Every accepted request runs as its own tokio task. Admission is limited by a semaphore sized
//! from [`CalculatorConfig::max_in_flight`]; `submit` never waits for a permit, so a full
//! dispatcher refuses work immediately instead of queueing it.

use crate::config::CalculatorConfig;
use crate::delivery::ResultDeliveryClient;
use crate::request::CalculationRequest;
use crate::task::CalculationTask;
use crate::{CaviError, CaviResult};
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Clone)]
pub struct CalculationDispatcher {
    cfg: Arc<CalculatorConfig>,
    delivery: ResultDeliveryClient,
    permits: Arc<Semaphore>,
}

impl CalculationDispatcher {
    pub fn new(cfg: Arc<CalculatorConfig>) -> CaviResult<Self> {
        let delivery = ResultDeliveryClient::new(&cfg)?;
        let permits = Arc::new(Semaphore::new(cfg.max_in_flight()));
        Ok(Self {
            cfg,
            delivery,
            permits,
        })
    }

    /// Spawn a calculation for `request` without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CaviError::AtCapacity`] if `max_in_flight` calculations are already running.
    pub fn submit(&self, request: CalculationRequest) -> CaviResult<()> {
        let permit = self
            .permits
            .clone()
            .try_acquire_owned()
            .map_err(|_| CaviError::AtCapacity {
                limit: self.cfg.max_in_flight(),
            })?;

        let task = CalculationTask::new(self.cfg.clone(), self.delivery.clone(), request);
        tokio::spawn(async move {
            task.run().await;
            drop(permit);
        });
        Ok(())
    }

    /// Number of calculations currently running.
    pub fn in_flight(&self) -> usize {
        self.cfg.max_in_flight() - self.permits.available_permits()
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DelayRange;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn dispatcher(base_url: &str, delay: DelayRange, limit: usize) -> CalculationDispatcher {
        let cfg = CalculatorConfig::new(base_url, "test-token".into(), delay, limit)
            .expect("CalculatorConfig::new should succeed");
        CalculationDispatcher::new(Arc::new(cfg)).expect("dispatcher should build")
    }

    fn request(id: i64) -> CalculationRequest {
        CalculationRequest::from_json(json!({
            "calculation_id": id,
            "systolic_pressure": 120,
            "diastolic_pressure": 80,
            "pulse_wave_velocity": 8.5,
            "groups": [{"group_id": 1, "age_group": "young"}]
        }))
        .expect("valid request")
    }

    async fn wait_until_idle(dispatcher: &CalculationDispatcher) {
        for _ in 0..250 {
            if dispatcher.in_flight() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("dispatcher still has {} in flight", dispatcher.in_flight());
    }

    #[tokio::test]
    async fn test_submit_refuses_work_beyond_limit() {
        let dispatcher = dispatcher("http://127.0.0.1:9", DelayRange::new(60, 60).unwrap(), 2);

        dispatcher.submit(request(1)).expect("first admitted");
        dispatcher.submit(request(2)).expect("second admitted");
        assert_eq!(dispatcher.in_flight(), 2);

        let err = dispatcher.submit(request(3)).expect_err("third refused");
        assert!(matches!(err, CaviError::AtCapacity { limit: 2 }));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_submit_returns_before_delay_and_delivers_later() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/cavi-calculations/11/async-result");
                then.status(200);
            })
            .await;

        let dispatcher = dispatcher(&server.base_url(), DelayRange::new(1, 1).unwrap(), 4);
        dispatcher.submit(request(11)).expect("admitted");
        assert_eq!(dispatcher.in_flight(), 1);
        assert_eq!(mock.hits_async().await, 0);

        wait_until_idle(&dispatcher).await;
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_permit_is_released_after_failed_delivery() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT);
                then.status(500);
            })
            .await;

        let dispatcher = dispatcher(&server.base_url(), DelayRange::new(0, 0).unwrap(), 1);
        dispatcher.submit(request(1)).expect("admitted");
        wait_until_idle(&dispatcher).await;

        dispatcher.submit(request(2)).expect("slot freed after failure");
        wait_until_idle(&dispatcher).await;
        mock.assert_hits_async(2).await;
    }
}
