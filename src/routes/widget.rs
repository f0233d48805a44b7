use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{db_interaction::{Store, StoreError}, utils::error_fmt_chain};

#[derive(Error)]
pub enum GetWidgetError{
    #[error("widget {0} doesn't exist")]
    NotFound(i32),
    #[error("Failed due to internal error")]
    UnexpectedError(#[source] StoreError)
}

impl Debug for GetWidgetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for GetWidgetError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            GetWidgetError::NotFound(_) => HttpResponse::NotFound().body(format!("{}", self)),
            GetWidgetError::UnexpectedError(_) => HttpResponse::InternalServerError().body(format!("{}", self))
        }
    }
}

// Data for the "buy once" page
#[tracing::instrument(
    "Getting widget",
    skip(store)
)]
pub async fn get_widget(
    store: web::Data<Store>,
    path: web::Path<i32>
) -> Result<HttpResponse, GetWidgetError>{
    let widget_id = path.into_inner();

    let widget = store.get_widget(widget_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                GetWidgetError::NotFound(widget_id)
            } else {
                GetWidgetError::UnexpectedError(e)
            }
        })?;

    Ok(HttpResponse::Ok().json(widget))
}
