use diesel::{dsl::now, ExpressionMethods, RunQueryDsl};

use crate::{models::NewTransaction, schema::transactions};

use super::{Store, StoreError};

impl Store {
    #[tracing::instrument(
        "Inserting transaction into the database",
        skip(self)
    )]
    pub async fn insert_transaction(&self, txn: NewTransaction) -> Result<i32, StoreError> {
        self.run(move |conn| {
            diesel::insert_into(transactions::table)
                .values((
                    transactions::amount.eq(txn.amount),
                    transactions::currency.eq(txn.currency),
                    transactions::last_four.eq(txn.last_four),
                    transactions::bank_return_code.eq(txn.bank_return_code),
                    transactions::transaction_status_id.eq(txn.status.id()),
                    transactions::expiry_month.eq(txn.expiry_month),
                    transactions::expiry_year.eq(txn.expiry_year),
                    transactions::created_at.eq(now),
                    transactions::updated_at.eq(now)
                ))
                .returning(transactions::id)
                .get_result::<i32>(conn)
        })
        .await
    }
}
