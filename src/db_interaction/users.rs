use diesel::{dsl::now, ExpressionMethods, RunQueryDsl};
use secrecy::ExposeSecret;

use crate::{models::NewUser, schema::users};

use super::{Store, StoreError};

impl Store {
    // Stores user.password_hash as given, it is never hashed here
    #[tracing::instrument(
        "Inserting user into the database",
        skip(self)
    )]
    pub async fn insert_user(&self, user: NewUser) -> Result<i32, StoreError> {
        self.run(move |conn| {
            diesel::insert_into(users::table)
                .values((
                    users::first_name.eq(user.first_name),
                    users::last_name.eq(user.last_name),
                    users::email.eq(user.email),
                    users::password_hash.eq(user.password_hash.expose_secret().to_string()),
                    users::created_at.eq(now),
                    users::updated_at.eq(now)
                ))
                .returning(users::id)
                .get_result::<i32>(conn)
        })
        .await
    }
}
