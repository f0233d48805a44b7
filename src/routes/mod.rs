mod health_check;
mod payment_succeeded;
mod widget;

pub use health_check::health_check;
pub use payment_succeeded::payment_succeeded;
pub use widget::get_widget;
