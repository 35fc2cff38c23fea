//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose details carry the
//! offending camelCase `field` and a stable snake_case `code`.

use actix_web::web;
use serde_json::json;

use crate::domain::{
    Email, Error, PurchaseAmount, PurchaseAmountError, Question, UserName, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    MalformedBody,
    InvalidQuestion,
    InvalidName,
    InvalidEmail,
    InvalidAmount,
    AmbiguousAmount,
    ConsentRequired,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::InvalidQuestion => "invalid_question",
            ErrorCode::InvalidName => "invalid_name",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidAmount => "invalid_amount",
            ErrorCode::AmbiguousAmount => "ambiguous_amount",
            ErrorCode::ConsentRequired => "consent_required",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const QUESTION: FieldName = FieldName::new("question");
pub(crate) const USER_NAME: FieldName = FieldName::new("userName");
pub(crate) const USER_EMAIL: FieldName = FieldName::new("userEmail");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const GRAMS: FieldName = FieldName::new("grams");
pub(crate) const AMOUNT_INR: FieldName = FieldName::new("amountInr");
pub(crate) const NUDGE_TO_INVEST: FieldName = FieldName::new("nudgeToInvest");

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

fn required(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_question(value: Option<String>) -> Result<Question, Error> {
    let raw = required(value, QUESTION)?;
    Question::new(raw).map_err(|err| {
        ValidationError::new(QUESTION.as_str(), err.to_string())
            .with_code(ErrorCode::InvalidQuestion)
    })
}

pub(crate) fn parse_user_name(value: Option<String>) -> Result<UserName, Error> {
    let raw = required(value, USER_NAME)?;
    UserName::new(raw).map_err(|err| {
        ValidationError::new(USER_NAME.as_str(), err.to_string()).with_code(ErrorCode::InvalidName)
    })
}

pub(crate) fn parse_email(value: Option<String>, field: FieldName) -> Result<Email, Error> {
    let raw = required(value, field)?;
    Email::new(raw).map_err(|err| email_error(field, &err))
}

fn email_error(field: FieldName, err: &UserValidationError) -> Error {
    ValidationError::new(field.as_str(), err.to_string()).with_code(ErrorCode::InvalidEmail)
}

pub(crate) fn parse_purchase_amount(
    grams: Option<f64>,
    amount_inr: Option<f64>,
) -> Result<PurchaseAmount, Error> {
    PurchaseAmount::try_from_parts(grams, amount_inr).map_err(|err| {
        let (field, code) = match err {
            PurchaseAmountError::Missing => (GRAMS, ErrorCode::MissingField),
            PurchaseAmountError::Ambiguous => (AMOUNT_INR, ErrorCode::AmbiguousAmount),
            PurchaseAmountError::InvalidGrams(_) => (GRAMS, ErrorCode::InvalidAmount),
            PurchaseAmountError::BelowMinimum(_) => (AMOUNT_INR, ErrorCode::InvalidAmount),
        };
        ValidationError::new(field.as_str(), err.to_string()).with_code(code)
    })
}

/// Refuse purchases the user explicitly declined; an absent flag is consent.
pub(crate) fn require_consent(nudge_to_invest: Option<bool>) -> Result<(), Error> {
    match nudge_to_invest {
        Some(false) => Err(ValidationError::new(
            NUDGE_TO_INVEST.as_str(),
            "purchase not allowed without investment consent",
        )
        .with_code(ErrorCode::ConsentRequired)),
        _ => Ok(()),
    }
}

/// JSON extractor configuration rendering malformed bodies as the shared
/// error envelope instead of Actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ValidationError::new("body", format!("malformed JSON body: {err}"))
            .with_code(ErrorCode::MalformedBody)
            .into()
    })
}
