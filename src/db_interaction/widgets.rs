use diesel::{QueryDsl, RunQueryDsl, SelectableHelper};

use crate::{models::Widget, schema::widgets};

use super::{Store, StoreError};

impl Store {
    // Fails with StoreError::QueryError(NotFound) when no widget has this id
    #[tracing::instrument(
        "Getting widget from db",
        skip(self)
    )]
    pub async fn get_widget(&self, id: i32) -> Result<Widget, StoreError> {
        self.run(move |conn| {
            widgets::table
                .find(id)
                .select(Widget::as_select())
                .first::<Widget>(conn)
        })
        .await
    }
}
