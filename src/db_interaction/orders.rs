use diesel::{dsl::now, ExpressionMethods, RunQueryDsl};

use crate::{models::NewOrder, schema::orders};

use super::{Store, StoreError};

impl Store {
    // transaction_id, customer_id and widget_id must already exist, the
    // foreign keys reject anything else
    #[tracing::instrument(
        "Inserting order into the database",
        skip(self)
    )]
    pub async fn insert_order(&self, order: NewOrder) -> Result<i32, StoreError> {
        self.run(move |conn| {
            diesel::insert_into(orders::table)
                .values((
                    orders::widget_id.eq(order.widget_id),
                    orders::transaction_id.eq(order.transaction_id),
                    orders::status_id.eq(order.status.id()),
                    orders::quantity.eq(order.quantity),
                    orders::amount.eq(order.amount),
                    orders::customer_id.eq(order.customer_id),
                    orders::created_at.eq(now),
                    orders::updated_at.eq(now)
                ))
                .returning(orders::id)
                .get_result::<i32>(conn)
        })
        .await
    }
}
