//! In-memory `AuthApi` used by the controller tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::oneshot;

use crate::api::{
    AddUserRequest, ApiError, AuthApi, FederatedLoginRequest, JobListing, LoginRequest,
    TokenResponse,
};

/// Canned answer for one endpoint
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Token(String),
    Status(u16, String),
}

impl Reply {
    fn into_result(self) -> Result<TokenResponse, ApiError> {
        match self {
            Reply::Token(token) => Ok(TokenResponse { token }),
            Reply::Status(code, body) => Err(ApiError::from_status(
                StatusCode::from_u16(code).expect("valid status code"),
                &body,
            )),
        }
    }
}

pub(crate) struct FakeApi {
    pub login_calls: AtomicUsize,
    pub add_user_calls: AtomicUsize,
    pub validate_calls: AtomicUsize,
    pub federated_calls: AtomicUsize,
    pub last_add_user: Mutex<Option<AddUserRequest>>,
    pub last_validated: Mutex<Option<String>>,
    login: Mutex<Reply>,
    add_user: Mutex<Reply>,
    validate: Mutex<Reply>,
    federated: Mutex<Reply>,
    /// When set, `validate_token` waits for this before answering
    validate_gate: Mutex<Option<oneshot::Receiver<()>>>,
    jobs: Vec<JobListing>,
    jobs_failure: Option<u16>,
}

impl FakeApi {
    pub fn new() -> Self {
        let unset = || Mutex::new(Reply::Status(500, "no reply configured".to_string()));
        Self {
            login_calls: AtomicUsize::new(0),
            add_user_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
            federated_calls: AtomicUsize::new(0),
            last_add_user: Mutex::new(None),
            last_validated: Mutex::new(None),
            login: unset(),
            add_user: unset(),
            validate: unset(),
            federated: unset(),
            validate_gate: Mutex::new(None),
            jobs: Vec::new(),
            jobs_failure: None,
        }
    }

    pub fn with_login(self, reply: Reply) -> Self {
        *self.login.lock().unwrap() = reply;
        self
    }

    pub fn with_add_user(self, reply: Reply) -> Self {
        *self.add_user.lock().unwrap() = reply;
        self
    }

    pub fn with_validate(self, reply: Reply) -> Self {
        *self.validate.lock().unwrap() = reply;
        self
    }

    pub fn with_federated(self, reply: Reply) -> Self {
        *self.federated.lock().unwrap() = reply;
        self
    }

    pub fn with_jobs(mut self, jobs: Vec<JobListing>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_job_failure(mut self, status: u16) -> Self {
        self.jobs_failure = Some(status);
        self
    }

    /// Hold the next `validate_token` answer until the returned sender fires
    pub fn gate_validate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.validate_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn reply(slot: &Mutex<Reply>) -> Result<TokenResponse, ApiError> {
        slot.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .into_result()
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn login(&self, _request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        Self::reply(&self.login)
    }

    async fn add_user(&self, request: &AddUserRequest) -> Result<TokenResponse, ApiError> {
        self.add_user_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_add_user.lock().unwrap() = Some(request.clone());
        Self::reply(&self.add_user)
    }

    async fn validate_token(&self, token: &str) -> Result<TokenResponse, ApiError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_validated.lock().unwrap() = Some(token.to_string());
        let gate = self.validate_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Self::reply(&self.validate)
    }

    async fn federated_login(
        &self,
        _request: &FederatedLoginRequest,
    ) -> Result<TokenResponse, ApiError> {
        self.federated_calls.fetch_add(1, Ordering::SeqCst);
        Self::reply(&self.federated)
    }

    async fn job_titles(&self) -> Result<Vec<JobListing>, ApiError> {
        match self.jobs_failure {
            Some(code) => Err(ApiError::from_status(
                StatusCode::from_u16(code).expect("valid status code"),
                "",
            )),
            None => Ok(self.jobs.clone()),
        }
    }
}
