use std::fmt::Debug;
use std::error::Error;

use reqwest::{Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{configuration::StripeSettings, domain::payment_amount::PaymentAmount, utils::error_fmt_chain};

pub const FALLBACK_DECLINE_MESSAGE: &str = "Your card was declined.";

// Map a processor error code to the message shown to the card holder
pub fn card_error_message(code: Option<&str>) -> &'static str {
    match code {
        Some("card_declined") => "Your card was declined",
        Some("expired_card") => "Your card has expired",
        Some("incorrect_cvc") => "Your card's security code is incorrect",
        Some("incorrect_zip") => "Incorrect zip/postal code",
        Some("amount_too_large") => "The amount is too large to charge to your card",
        Some("amount_too_small") => "The amount is too small to charge to your card",
        Some("balance_insufficient") => "Insufficient balance",
        Some("postal_code_invalid") => "Your postal code was invalid",
        _ => FALLBACK_DECLINE_MESSAGE
    }
}

// Client for the payment processor's payment intent API. Makes exactly one
// request per call, there are no retries.
#[derive(Clone)]
pub struct PaymentGateway {
    http_client: Client,
    base_url: String,
    secret_key: SecretString,
}

impl PaymentGateway {
    pub fn new(base_url: String, secret_key: SecretString) -> PaymentGateway {
        Self {
            http_client: Client::new(),
            base_url,
            secret_key,
        }
    }

    pub fn from_settings(settings: &StripeSettings) -> PaymentGateway {
        Self::new(settings.base_url.clone(), settings.secret_key.clone())
    }

    #[tracing::instrument(
        "Charging card",
        skip(self)
    )]
    pub async fn charge(
        &self,
        currency: &str,
        amount: PaymentAmount
    ) -> Result<PaymentIntent, ChargeError> {
        self.create_payment_intent(currency, amount).await
    }

    #[tracing::instrument(
        "Creating payment intent",
        skip(self)
    )]
    pub async fn create_payment_intent(
        &self,
        currency: &str,
        amount: PaymentAmount
    ) -> Result<PaymentIntent, ChargeError> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        let request_body = CreatePaymentIntentRequest {
            amount: i64::from(amount.inner()),
            currency,
        };

        let response = self.http_client
            .post(url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&request_body)
            .send()
            .await?;

        parse_response(response).await
    }

    #[tracing::instrument(
        "Retrieving payment method",
        skip(self)
    )]
    pub async fn retrieve_payment_method(
        &self,
        payment_method_id: &str
    ) -> Result<PaymentMethod, ChargeError> {
        if payment_method_id.trim().is_empty() {
            return Err(ChargeError::InvalidRequest("payment method id is empty".to_string()));
        }

        // The id is pushed as a single encoded segment so it cannot leave /v1/payment_methods
        let mut url = Url::parse(&self.base_url)
                        .map_err(|e| ChargeError::InvalidRequest(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ChargeError::InvalidRequest("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v1", "payment_methods", payment_method_id]);

        let response = self.http_client
            .get(url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?;

        parse_response(response).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ChargeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await?;
    match serde_json::from_str::<ProcessorErrorBody>(&body) {
        Ok(parsed) => Err(ChargeError::Rejected(parsed.error)),
        Err(_) => Err(ChargeError::UnexpectedResponse { status, body })
    }
}

#[derive(Serialize, Debug)]
pub struct CreatePaymentIntentRequest<'a> {
    pub amount: i64,
    pub currency: &'a str,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub latest_charge: Option<String>,
}

impl PaymentIntent {
    // Processor reference kept on the transaction row
    pub fn bank_return_code(&self) -> &str {
        self.latest_charge.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentMethod {
    pub id: String,
    pub card: Option<CardDetails>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CardDetails {
    pub last4: String,
    pub exp_month: i32,
    pub exp_year: i32,
}

#[derive(Deserialize, Debug)]
struct ProcessorErrorBody {
    error: ProcessorError,
}

// Structured error object returned by the processor
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProcessorError {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<String>,
    pub decline_code: Option<String>,
    pub message: Option<String>,
}

impl std::fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.kind.as_deref().unwrap_or("unknown_error"),
            self.code.as_deref().unwrap_or("no code"),
            self.message.as_deref().unwrap_or("")
        )
    }
}

impl Error for ProcessorError {}

#[derive(Error)]
pub enum ChargeError {
    #[error("Payment processor rejected the request")]
    Rejected(#[source] ProcessorError),
    #[error("Unexpected {status} response from payment processor")]
    UnexpectedResponse { status: StatusCode, body: String },
    #[error("Failed to communicate with payment processor")]
    TransportError(#[from] reqwest::Error),
    #[error("Refused to build payment processor request: {0}")]
    InvalidRequest(String),
}

impl ChargeError {
    pub fn code(&self) -> Option<&str> {
        match self {
            ChargeError::Rejected(e) => e.code.as_deref(),
            _ => None
        }
    }

    // Message safe to show the card holder
    pub fn user_message(&self) -> &'static str {
        card_error_message(self.code())
    }
}

impl Debug for ChargeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}
