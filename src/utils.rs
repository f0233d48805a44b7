use std::{error::Error, time::Duration};

use diesel::{r2d2::ConnectionManager, PgConnection, RunQueryDsl};
use r2d2::{CustomizeConnection, Pool, PooledConnection};

use crate::configuration::DatabaseSettings;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub fn error_fmt_chain(f: &mut std::fmt::Formatter<'_>, source: &Option<impl Error>) -> std::fmt::Result{
    if let Some(error) = source{
        write!(f, "\n\tCaused By:\n\t")?;
        write!(f, "{:?}", &error)?;
        error_fmt_chain(f, &error.source())
    } else {
        Ok(())
    }
}

// Sets statement_timeout on every new connection so that a query abandoned by
// the caller's deadline is also cancelled server side
#[derive(Debug, Clone, Copy)]
pub struct StatementTimeout(pub Duration);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query(format!("SET statement_timeout = {}", self.0.as_millis()))
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

// Connections are opened lazily, the first checkout establishes them
pub fn get_connection_pool(settings: &DatabaseSettings) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(settings.get_database_table_url());

    Pool::builder()
        .connection_timeout(settings.timeout())
        .connection_customizer(Box::new(StatementTimeout(settings.timeout())))
        .build_unchecked(manager)
}
