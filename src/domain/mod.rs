pub mod payment_amount;
pub mod customer_name;
