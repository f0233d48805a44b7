use diesel::{QueryDsl, RunQueryDsl, SelectableHelper};
use widget_checkout::{checkout::Receipt, models::{Customer, Order, Transaction}, schema::{customers, orders, transactions, users}};
use wiremock::{matchers::any, Mock, ResponseTemplate};

use crate::helpers::{checkout_body, TestApp};

fn count_rows(app: &TestApp) -> (i64, i64, i64, i64) {
    let mut conn = app.pool.get().unwrap();

    (
        transactions::table.count().get_result(&mut conn).unwrap(),
        orders::table.count().get_result(&mut conn).unwrap(),
        customers::table.count().get_result(&mut conn).unwrap(),
        users::table.count().get_result(&mut conn).unwrap()
    )
}

#[actix_web::test]
async fn successful_charge_records_transaction_then_order(){
    let app = TestApp::spawn_app().await;
    app.mock_successful_charge().await;

    let response = app.post_payment_succeeded(&checkout_body()).await;
    assert_eq!(response.status().as_u16(), 200);

    let receipt: Receipt = response.json().await.unwrap();
    assert_eq!(receipt, Receipt{
        cardholder: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        payment_intent: "pi_test".to_string(),
        payment_method: "pm_test".to_string(),
        payment_amount: "1000".to_string(),
        payment_currency: "usd".to_string()
    });

    let mut conn = app.pool.get().unwrap();

    let transaction: Transaction = transactions::table
        .select(Transaction::as_select())
        .first(&mut conn)
        .unwrap();
    assert_eq!(transaction.amount, 1000);
    assert_eq!(transaction.currency, "usd");
    assert_eq!(transaction.last_four, "4242");
    assert_eq!(transaction.expiry_month, 12);
    assert_eq!(transaction.expiry_year, 2030);
    assert_eq!(transaction.bank_return_code, "ch_test");

    let order: Order = orders::table
        .select(Order::as_select())
        .first(&mut conn)
        .unwrap();
    assert_eq!(order.transaction_id, transaction.id);
    assert_eq!(order.widget_id, 1);
    assert_eq!(order.quantity, 1);
    assert_eq!(order.amount, 1000);

    let customer: Customer = customers::table
        .select(Customer::as_select())
        .first(&mut conn)
        .unwrap();
    assert_eq!(order.customer_id, customer.id);
    assert_eq!(customer.first_name, "Jane");
    assert_eq!(customer.last_name, "Doe");
    assert_eq!(customer.email, "jane@example.com");

    drop(conn);
    assert_eq!(count_rows(&app), (1, 1, 1, 0));
}

#[actix_web::test]
async fn declined_card_returns_message_and_writes_nothing(){
    let app = TestApp::spawn_app().await;
    app.mock_declined_charge("card_declined").await;

    let response = app.post_payment_succeeded(&checkout_body()).await;

    assert_eq!(response.status().as_u16(), 402);
    assert_eq!(response.text().await.unwrap(), "Your card was declined");
    assert_eq!(count_rows(&app), (0, 0, 0, 0));
}

#[actix_web::test]
async fn unknown_decline_code_returns_fallback_message(){
    let app = TestApp::spawn_app().await;
    app.mock_declined_charge("processing_error").await;

    let response = app.post_payment_succeeded(&checkout_body()).await;

    assert_eq!(response.status().as_u16(), 402);
    assert_eq!(response.text().await.unwrap(), "Your card was declined.");
    assert_eq!(count_rows(&app), (0, 0, 0, 0));
}

#[actix_web::test]
async fn non_positive_amount_is_rejected_before_charging(){
    let app = TestApp::spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.stripe_api)
        .await;

    let mut body = checkout_body();
    body["payment-amount"] = "0".into();

    let response = app.post_payment_succeeded(&body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(count_rows(&app), (0, 0, 0, 0));
}

#[actix_web::test]
async fn malformed_form_is_rejected_before_charging(){
    let app = TestApp::spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.stripe_api)
        .await;

    let test_cases = vec![
        (serde_json::json!({ "cardholder-name": "Jane Doe" }), "missing fields"),
        ({
            let mut body = checkout_body();
            body["widget-id"] = "one".into();
            body
        }, "non numeric widget id")
    ];

    for (body, description) in test_cases {
        let response = app.post_payment_succeeded(&body).await;
        assert_eq!(response.status().as_u16(), 400, "{}", description);
    }

    assert_eq!(count_rows(&app), (0, 0, 0, 0));
}

#[actix_web::test]
async fn account_password_creates_user_with_hashed_password(){
    let app = TestApp::spawn_app().await;
    app.mock_successful_charge().await;

    let mut body = checkout_body();
    body["first-name"] = "Janet".into();
    body["account-password"] = "correct horse battery".into();

    let response = app.post_payment_succeeded(&body).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(count_rows(&app), (1, 1, 1, 1));

    let mut conn = app.pool.get().unwrap();
    let (first_name, password_hash): (String, String) = users::table
        .select((users::first_name, users::password_hash))
        .first(&mut conn)
        .unwrap();

    assert_eq!(first_name, "Janet");
    assert_ne!(password_hash, "correct horse battery");
    assert!(password_hash.starts_with("$argon2"));
}

#[actix_web::test]
async fn repeat_buyer_with_account_password_keeps_first_account(){
    let app = TestApp::spawn_app().await;
    app.mock_successful_charges(2).await;

    let mut body = checkout_body();
    body["account-password"] = "correct horse battery".into();

    let first = app.post_payment_succeeded(&body).await;
    assert_eq!(first.status().as_u16(), 200);

    let second = app.post_payment_succeeded(&body).await;
    assert_eq!(second.status().as_u16(), 200);

    assert_eq!(count_rows(&app), (2, 2, 2, 1));
}

#[actix_web::test]
async fn order_for_missing_widget_fails_but_keeps_transaction(){
    let app = TestApp::spawn_app().await;
    app.mock_successful_charge().await;

    let mut body = checkout_body();
    body["widget-id"] = "999".into();

    let response = app.post_payment_succeeded(&body).await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(count_rows(&app), (1, 0, 1, 0));
}
