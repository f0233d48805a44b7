use diesel::{dsl::now, ExpressionMethods, RunQueryDsl};

use crate::{models::NewCustomer, schema::customers};

use super::{Store, StoreError};

impl Store {
    #[tracing::instrument(
        "Inserting customer into the database",
        skip(self)
    )]
    pub async fn insert_customer(&self, customer: NewCustomer) -> Result<i32, StoreError> {
        self.run(move |conn| {
            diesel::insert_into(customers::table)
                .values((
                    customers::first_name.eq(customer.first_name),
                    customers::last_name.eq(customer.last_name),
                    customers::email.eq(customer.email),
                    customers::created_at.eq(now),
                    customers::updated_at.eq(now)
                ))
                .returning(customers::id)
                .get_result::<i32>(conn)
        })
        .await
    }
}
