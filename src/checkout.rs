use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_interaction::{Store, StoreError},
    domain::{customer_name::CustomerName, payment_amount::PaymentAmount},
    models::{NewCustomer, NewOrder, NewTransaction, NewUser, OrderStatus, TransactionStatus},
    password::hash_password,
    payment_gateway::{ChargeError, PaymentGateway},
    utils::error_fmt_chain
};

// Fields posted by the payment page once the card has been collected
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct CheckoutForm{
    pub cardholder_name: String,
    pub cardholder_email: String,
    pub payment_intent: String,
    pub payment_method: String,
    pub payment_amount: String,
    pub payment_currency: String,
    pub widget_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    // When present an account is created alongside the customer
    pub account_password: Option<SecretString>
}

// Display values for the confirmation page, echoed exactly as submitted
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Receipt{
    pub cardholder: String,
    pub email: String,
    pub payment_intent: String,
    pub payment_method: String,
    pub payment_amount: String,
    pub payment_currency: String
}

impl From<&CheckoutForm> for Receipt {
    fn from(form: &CheckoutForm) -> Self {
        Self{
            cardholder: form.cardholder_name.clone(),
            email: form.cardholder_email.clone(),
            payment_intent: form.payment_intent.clone(),
            payment_method: form.payment_method.clone(),
            payment_amount: form.payment_amount.clone(),
            payment_currency: form.payment_currency.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedCheckout{
    pub receipt: Receipt,
    pub transaction_id: i32,
    pub customer_id: i32,
    pub order_id: i32,
    pub user_id: Option<i32>
}

#[derive(Error)]
pub enum CheckoutError{
    #[error("{0}")]
    InvalidInput(String),
    #[error("{}", .0.user_message())]
    Declined(#[source] ChargeError),
    #[error("Payment processor is unavailable, your card was not charged")]
    ProcessorUnavailable(#[source] ChargeError),
    #[error("Failed to look up card details")]
    CardDetails(#[source] ChargeError),
    #[error("Failed to record the payment")]
    PersistenceError(#[from] StoreError),
    #[error("Unexpected error occured")]
    UnexpectedError(#[source] anyhow::Error)
}

impl Debug for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for CheckoutError {
    fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CheckoutError::Declined(_) => StatusCode::PAYMENT_REQUIRED,
            CheckoutError::ProcessorUnavailable(_) | CheckoutError::CardDetails(_) => StatusCode::BAD_GATEWAY,
            CheckoutError::PersistenceError(_) | CheckoutError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).body(format!("{}", self))
    }
}

// Charge, then record transaction, customer, order and optionally user.
// Every insert commits on its own and nothing is compensated when a later
// step fails, so a successful charge can end up without an order.
#[derive(Clone)]
pub struct CheckoutWorkflow{
    store: Store,
    gateway: PaymentGateway,
    default_currency: String
}

impl CheckoutWorkflow {
    pub fn new(store: Store, gateway: PaymentGateway, default_currency: String) -> Self {
        Self{ store, gateway, default_currency }
    }

    #[tracing::instrument(
        "Running checkout",
        skip(self, form),
        fields(
            payment_intent = %form.payment_intent,
            widget_id = form.widget_id
        )
    )]
    pub async fn execute(&self, form: CheckoutForm) -> Result<CompletedCheckout, CheckoutError> {
        let amount = PaymentAmount::parse(&form.payment_amount)
                        .map_err(|e| {
                            tracing::warn!("Rejected checkout input: {}", e);
                            CheckoutError::InvalidInput(e)
                        })?;

        let currency = match form.payment_currency.trim() {
            "" => self.default_currency.clone(),
            c => c.to_string()
        };

        let intent = self.gateway.charge(&currency, amount)
                        .await
                        .map_err(|e| match e {
                            ChargeError::Rejected(_) => {
                                tracing::warn!("Charge declined: {:?}", e);
                                CheckoutError::Declined(e)
                            },
                            _ => {
                                tracing::error!("Charge did not reach a decision: {:?}", e);
                                CheckoutError::ProcessorUnavailable(e)
                            }
                        })?;

        let payment_method = self.gateway.retrieve_payment_method(&form.payment_method)
                        .await
                        .map_err(|e| {
                            tracing::error!("Card lookup failed after charge {}: {:?}", intent.id, e);
                            CheckoutError::CardDetails(e)
                        })?;

        let (last_four, expiry_month, expiry_year) = match payment_method.card {
            Some(card) => (card.last4, card.exp_month, card.exp_year),
            None => (String::new(), 0, 0)
        };

        let transaction_id = self.store.insert_transaction(NewTransaction{
            amount: amount.inner(),
            currency: currency.clone(),
            last_four,
            bank_return_code: intent.bank_return_code().to_string(),
            status: TransactionStatus::Cleared,
            expiry_month,
            expiry_year
        })
        .await?;

        let name = CustomerName::resolve(
            form.first_name.as_deref(),
            form.last_name.as_deref(),
            &form.cardholder_name
        );

        let customer_id = self.store.insert_customer(NewCustomer{
            first_name: name.first_name.clone(),
            last_name: name.last_name.clone(),
            email: form.cardholder_email.clone()
        })
        .await?;

        let order_id = self.store.insert_order(NewOrder{
            widget_id: form.widget_id,
            transaction_id,
            customer_id,
            status: OrderStatus::Cleared,
            quantity: 1,
            amount: amount.inner()
        })
        .await?;

        let receipt = Receipt::from(&form);

        let user_id = match form.account_password {
            Some(password) => {
                let password_hash = hash_password(password)
                                        .await
                                        .map_err(CheckoutError::UnexpectedError)?;

                // The order is already recorded, an existing account is kept as is
                match self.store.insert_user(NewUser{
                    first_name: name.first_name,
                    last_name: name.last_name,
                    email: form.cardholder_email,
                    password_hash
                })
                .await {
                    Ok(user_id) => Some(user_id),
                    Err(e) if e.is_unique_violation() => {
                        tracing::warn!("Account for this email already exists, not creating another");
                        None
                    },
                    Err(e) => return Err(e.into())
                }
            },
            None => None
        };

        tracing::info!(transaction_id, customer_id, order_id, "Checkout recorded");

        Ok(CompletedCheckout{
            receipt,
            transaction_id,
            customer_id,
            order_id,
            user_id
        })
    }
}
