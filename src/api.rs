// REST client for the vehicle marketplace backend
// Plain JSON over HTTP; the backend is the final arbiter of reservation conflicts

use crate::interval_set::IntervalSet;
use crate::wire::{
    interval_set_from_records, CreateReservationRequest, ErrorBody, ReservationRecord,
    VehicleSummary,
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub type VehicleId = i64;
pub type ReservationId = i64;

// Error types for API calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Rejected by server: {status_code} - {message}")]
    Rejected { status_code: u16, message: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Not authenticated")]
    Unauthenticated,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

// What to do when the reserved-interval fetch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    #[default]
    FailClosed,
    FailOpen,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout_ms: u64,
    pub fetch_policy: FetchPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            auth_token: None,
            timeout_ms: 10_000,
            fetch_policy: FetchPolicy::FailClosed,
        }
    }
}

impl ClientConfig {
    pub const BASE_URL_VAR: &'static str = "VEHICLE_API_BASE_URL";
    pub const TOKEN_VAR: &'static str = "VEHICLE_API_TOKEN";
    pub const TIMEOUT_VAR: &'static str = "VEHICLE_API_TIMEOUT_MS";
    pub const FAIL_OPEN_VAR: &'static str = "VEHICLE_API_FAIL_OPEN";

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(Self::BASE_URL_VAR) {
            let base_url = base_url.trim().trim_end_matches('/').to_string();
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(ClientError::ConfigError(format!(
                    "{} must be an http(s) URL, got '{}'",
                    Self::BASE_URL_VAR,
                    base_url
                )));
            }
            config.base_url = base_url;
        }

        config.auth_token = lookup(Self::TOKEN_VAR)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        if let Some(raw) = lookup(Self::TIMEOUT_VAR) {
            config.timeout_ms = match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    return Err(ClientError::ConfigError(format!(
                        "{} must be a positive integer, got '{}'",
                        Self::TIMEOUT_VAR,
                        raw
                    )))
                }
            };
        }

        if let Some(raw) = lookup(Self::FAIL_OPEN_VAR) {
            config.fetch_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => FetchPolicy::FailOpen,
                "0" | "false" | "no" | "" => FetchPolicy::FailClosed,
                _ => {
                    return Err(ClientError::ConfigError(format!(
                        "{} must be a boolean, got '{}'",
                        Self::FAIL_OPEN_VAR,
                        raw
                    )))
                }
            };
        }

        Ok(config)
    }
}

// Backend operations used by the booking flow and reservation screens
#[async_trait]
pub trait ReservationApi: Send + Sync + 'static {
    // Existing reservations and availability blocks for one vehicle
    async fn fetch_reserved_intervals(&self, vehicle_id: VehicleId)
        -> Result<IntervalSet, ApiError>;

    async fn fetch_vehicle(&self, vehicle_id: VehicleId) -> Result<VehicleSummary, ApiError>;

    // A conflict detected by the server surfaces as `ApiError::Rejected`
    async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> Result<ReservationRecord, ApiError>;

    async fn list_user_reservations(&self) -> Result<Vec<ReservationRecord>, ApiError>;

    // Reservations made on vehicles the caller owns
    async fn list_owner_reservations(&self) -> Result<Vec<ReservationRecord>, ApiError>;

    async fn confirm_reservation(
        &self,
        reservation_id: ReservationId,
        confirm: bool,
    ) -> Result<ReservationRecord, ApiError>;

    async fn cancel_reservation(&self, reservation_id: ReservationId) -> Result<(), ApiError>;
}

pub struct HttpReservationApi {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpReservationApi {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match &self.config.auth_token {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Err(ApiError::Unauthenticated),
        }
    }

    // `rejectable` marks calls where a 400/409 is a business refusal rather than a fault
    async fn execute(&self, builder: RequestBuilder, rejectable: bool) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or(raw);
        warn!(status = status.as_u16(), %message, "request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthenticated,
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT if rejectable => ApiError::Rejected {
                status_code: status.as_u16(),
                message,
            },
            _ => ApiError::ApiResponseError {
                status_code: status.as_u16(),
                message,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else {
            ApiError::NetworkError(error.to_string())
        }
    }
}

#[async_trait]
impl ReservationApi for HttpReservationApi {
    async fn fetch_reserved_intervals(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<IntervalSet, ApiError> {
        let url = self.endpoint(&format!("disponibilidades/{}", vehicle_id));
        debug!(%url, "fetching reserved intervals");
        let response = self.execute(self.http.get(&url), false).await?;
        let records: Vec<ReservationRecord> = Self::decode(response).await?;
        let set = interval_set_from_records(&records)
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
        info!(vehicle_id, intervals = set.len(), "reserved intervals loaded");
        Ok(set)
    }

    async fn fetch_vehicle(&self, vehicle_id: VehicleId) -> Result<VehicleSummary, ApiError> {
        let url = self.endpoint(&format!("vehiculos/{}", vehicle_id));
        let response = self.execute(self.http.get(&url), false).await?;
        Self::decode(response).await
    }

    async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> Result<ReservationRecord, ApiError> {
        let builder = self.authorized(self.http.post(self.endpoint("reservas")))?;
        info!(
            vehicle_id = request.vehiculo.id,
            start = %request.fecha_inicio,
            end = %request.fecha_fin,
            "creating reservation"
        );
        let response = self.execute(builder.json(&request), true).await?;
        Self::decode(response).await
    }

    async fn list_user_reservations(&self) -> Result<Vec<ReservationRecord>, ApiError> {
        let builder = self.authorized(self.http.get(self.endpoint("reservas/usuario")))?;
        let response = self.execute(builder, false).await?;
        Self::decode(response).await
    }

    async fn list_owner_reservations(&self) -> Result<Vec<ReservationRecord>, ApiError> {
        let builder = self.authorized(self.http.get(self.endpoint("reservas/dueño")))?;
        let response = self.execute(builder, false).await?;
        Self::decode(response).await
    }

    async fn confirm_reservation(
        &self,
        reservation_id: ReservationId,
        confirm: bool,
    ) -> Result<ReservationRecord, ApiError> {
        let url = self.endpoint(&format!("reservas/confirmar/{}", reservation_id));
        let builder = self.authorized(self.http.put(url).query(&[("confirmar", confirm)]))?;
        let response = self.execute(builder, false).await?;
        Self::decode(response).await
    }

    async fn cancel_reservation(&self, reservation_id: ReservationId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("reservas/{}", reservation_id));
        let builder = self.authorized(self.http.delete(url))?;
        self.execute(builder, true).await?;
        info!(reservation_id, "reservation cancelled");
        Ok(())
    }
}
