use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use pricecast_ml::PricingError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportPolicy {
    Ignore,
    Report,
}

/// Attached to the response extensions of reported errors.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub id: String,
    pub status_code: u16,
    pub public_code: String,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: String,
    public_message: Option<String>,
    report_policy: ReportPolicy,
    report_summary: Option<String>,
}

impl ApiError {
    fn new(
        status: StatusCode,
        public_code: impl Into<String>,
        public_message: Option<String>,
        report_policy: ReportPolicy,
    ) -> Self {
        Self {
            status,
            public_code: public_code.into(),
            public_message,
            report_policy,
            report_summary: None,
        }
    }

    fn with_report(mut self, summary: impl Into<String>) -> Self {
        self.report_summary = Some(summary.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.public_code
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            None,
            ReportPolicy::Report,
        )
        .with_report(msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            success: bool,
            error: &'a str,
            code: &'a str,
        }

        let public_message = self
            .public_message
            .as_deref()
            .unwrap_or_else(|| self.status.canonical_reason().unwrap_or("Error"));

        let error_id = (self.report_policy == ReportPolicy::Report).then(pricecast_types::create_id);

        let mut response = (
            self.status,
            Json(ErrorBody {
                success: false,
                error: public_message,
                code: &self.public_code,
            }),
        )
            .into_response();

        if let Some(id) = error_id {
            if let Ok(v) = HeaderValue::from_str(&id) {
                response.headers_mut().insert("x-error-id", v);
            }

            let report = ErrorReport {
                id,
                status_code: self.status.as_u16(),
                public_code: self.public_code.clone(),
                summary: self
                    .report_summary
                    .clone()
                    .unwrap_or_else(|| public_message.to_string()),
            };
            response.extensions_mut().insert(report);
        }

        response
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        match &err {
            PricingError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    Some(err.to_string()),
                    ReportPolicy::Ignore,
                )
            }
            PricingError::SchemaMismatch { feature } => {
                tracing::warn!("Schema mismatch on feature {}", feature);
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "SCHEMA_MISMATCH",
                    Some(err.to_string()),
                    ReportPolicy::Ignore,
                )
            }
            PricingError::ModelUnavailable(kind) => {
                tracing::warn!("Model unavailable: {}", kind);
                Self::new(
                    StatusCode::NOT_FOUND,
                    "MODEL_UNAVAILABLE",
                    Some(err.to_string()),
                    ReportPolicy::Ignore,
                )
            }
            PricingError::MissingSchema(_) => Self::internal(err.to_string()),
            PricingError::Prediction(inner) => {
                tracing::error!("Prediction error: {:?}", inner);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PREDICTION_ERROR",
                    Some(err.to_string()),
                    ReportPolicy::Report,
                )
                .with_report(format!("{:?}", inner))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::bad_request(err.body_text())
    }
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.public_code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_ml::{ModelKind, PredictError};

    #[test]
    fn pricing_errors_map_to_their_codes() {
        let cases = [
            (
                PricingError::validation("bad"),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                PricingError::SchemaMismatch {
                    feature: "bath".into(),
                },
                StatusCode::BAD_REQUEST,
                "SCHEMA_MISMATCH",
            ),
            (
                PricingError::ModelUnavailable(ModelKind::Laptop),
                StatusCode::NOT_FOUND,
                "MODEL_UNAVAILABLE",
            ),
            (
                PricingError::Prediction(PredictError::NonFinite),
                StatusCode::INTERNAL_SERVER_ERROR,
                "PREDICTION_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn missing_schema_is_a_reported_internal_error() {
        let api: ApiError = PricingError::MissingSchema(ModelKind::House).into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code(), "INTERNAL_ERROR");

        let response = api.into_response();
        let id = response.headers().get("x-error-id").unwrap();
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(id.to_str().unwrap(), report.id);
        assert_eq!(report.summary, "house model has no column schema");
    }

    #[test]
    fn client_errors_are_not_reported() {
        let response = ApiError::bad_request("nope").into_response();
        assert!(response.headers().get("x-error-id").is_none());
        assert!(response.extensions().get::<ErrorReport>().is_none());
    }
}
