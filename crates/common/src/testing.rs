//! Test doubles for the auth flow
//!
//! [`MockTokenExchanger`] replays scripted exchange results and records
//! every call, so session behaviour can be tested without a token endpoint.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use forcelink_domain::Credential;

use crate::auth::{AuthError, TokenExchanger};

/// One recorded `exchange` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeCall {
    pub signing_input: String,
    pub signature_b64url: String,
    pub endpoint: String,
}

/// Scripted token exchanger
///
/// Clones share the script and the call log. When the script runs out, calls
/// fail with a transport error.
#[derive(Debug, Clone, Default)]
pub struct MockTokenExchanger {
    responses: Arc<Mutex<VecDeque<Result<Credential, AuthError>>>>,
    calls: Arc<Mutex<Vec<ExchangeCall>>>,
}

impl MockTokenExchanger {
    /// Create a mock with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next unanswered call.
    pub fn push_response(&self, response: Result<Credential, AuthError>) {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ExchangeCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Forget recorded calls and queued responses.
    pub fn reset(&self) {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[async_trait]
impl TokenExchanger for MockTokenExchanger {
    async fn exchange(
        &self,
        signing_input: &str,
        signature_b64url: &str,
        endpoint: &str,
    ) -> Result<Credential, AuthError> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(ExchangeCall {
            signing_input: signing_input.to_string(),
            signature_b64url: signature_b64url.to_string(),
            endpoint: endpoint.to_string(),
        });

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::Transport("no scripted response".to_string())))
    }
}
