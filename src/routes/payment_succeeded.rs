use actix_web::{web, HttpResponse};

use crate::checkout::{CheckoutError, CheckoutForm, CheckoutWorkflow};

#[tracing::instrument(
    "Payment succeeded",
    skip_all
)]
pub async fn payment_succeeded(
    workflow: web::Data<CheckoutWorkflow>,
    form: web::Form<CheckoutForm>
) -> Result<HttpResponse, CheckoutError>{
    let completed = workflow.execute(form.into_inner()).await?;

    Ok(HttpResponse::Ok().json(completed.receipt))
}
