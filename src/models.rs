use chrono::NaiveDateTime;
use diesel::prelude::{Queryable, Selectable};
use secrecy::SecretString;
use serde::Serialize;

use crate::schema::{customers, orders, transactions, widgets};

// A purchasable widget, read-only during checkout
#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = widgets)]
pub struct Widget{
    pub id: i32,
    pub name: String,
    pub description: String,
    pub inventory_level: i32,
    pub price: i32,
    pub image: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing)]
    pub updated_at: NaiveDateTime
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = transactions)]
pub struct Transaction{
    pub id: i32,
    pub amount: i32,
    pub currency: String,
    pub last_four: String,
    pub bank_return_code: String,
    pub transaction_status_id: i32,
    pub expiry_month: i32,
    pub expiry_year: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = orders)]
pub struct Order{
    pub id: i32,
    pub widget_id: i32,
    pub transaction_id: i32,
    pub customer_id: i32,
    pub status_id: i32,
    pub quantity: i32,
    pub amount: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = customers)]
pub struct Customer{
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction{
    pub amount: i32,
    pub currency: String,
    pub last_four: String,
    pub bank_return_code: String,
    pub status: TransactionStatus,
    pub expiry_month: i32,
    pub expiry_year: i32
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder{
    pub widget_id: i32,
    pub transaction_id: i32,
    pub customer_id: i32,
    pub status: OrderStatus,
    pub quantity: i32,
    pub amount: i32
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer{
    pub first_name: String,
    pub last_name: String,
    pub email: String
}

// password_hash must already be hashed, see password::hash_password
#[derive(Debug, Clone)]
pub struct NewUser{
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: SecretString
}

// Rows seeded into transaction_statuses by the initial migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus{
    Pending,
    Cleared,
    Declined,
    Refunded,
    PartiallyRefunded
}

impl TransactionStatus {
    pub fn id(&self) -> i32 {
        match self {
            TransactionStatus::Pending => 1,
            TransactionStatus::Cleared => 2,
            TransactionStatus::Declined => 3,
            TransactionStatus::Refunded => 4,
            TransactionStatus::PartiallyRefunded => 5
        }
    }
}

// Rows seeded into statuses by the initial migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus{
    Cleared,
    Refunded,
    Cancelled
}

impl OrderStatus {
    pub fn id(&self) -> i32 {
        match self {
            OrderStatus::Cleared => 1,
            OrderStatus::Refunded => 2,
            OrderStatus::Cancelled => 3
        }
    }
}
