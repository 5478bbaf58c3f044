//! Mock payment gateway for testing.
//!
//! Supports:
//! - Call tracking (every request is recorded)
//! - Error injection for the next call
//! - Deterministic intent ids (`pi_mock_1`, `pi_mock_2`, ...)

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{CreatePaymentIntentRequest, PaymentError, PaymentGateway, PaymentIntent};

/// Recorded gateway call for assertions.
#[derive(Debug, Clone)]
pub struct GatewayCall {
    pub request: CreatePaymentIntentRequest,
}

#[derive(Default)]
struct MockState {
    next_error: Option<PaymentError>,
    call_log: Vec<GatewayCall>,
    issued: u32,
}

/// Mock `PaymentGateway`. Clones share state.
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose next call fails with `error`.
    pub fn failing_with(error: PaymentError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration
    // ════════════════════════════════════════════════════════════════════════════

    /// Set an error to return on the next call.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    pub fn clear_errors(&self) {
        self.state().next_error = None;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().call_log.len()
    }

    pub fn last_request(&self) -> Option<CreatePaymentIntentRequest> {
        self.state().call_log.last().map(|c| c.request.clone())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut state = self.state();
        state.call_log.push(GatewayCall {
            request: request.clone(),
        });

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state.issued += 1;
        let id = format!("pi_mock_{}", state.issued);
        Ok(PaymentIntent {
            client_secret: format!("{}_secret_mock", id),
            id,
            amount: request.amount.amount_minor(),
            status: "requires_payment_method".to_string(),
        })
    }
}
