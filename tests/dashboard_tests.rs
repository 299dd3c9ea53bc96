// SPDX-License-Identifier: MIT

//! Dashboard aggregation integration tests.

use axum::http::StatusCode;

mod common;

async fn add(app: &axum::Router, cookie: &str, name: &str, amount: &str) {
    let body = common::form_body(&[("expense_name", name), ("expense_amount", amount)]);
    common::post_form(app, "/add_expense", body, Some(cookie)).await;
}

#[tokio::test]
async fn test_same_name_expenses_are_grouped() {
    let (app, _) = common::create_test_app().await;
    let cookie = common::signup(&app, "alice", "a@b.com", "s3cret!pw").await;

    add(&app, &cookie, "Coffee", "3").await;
    add(&app, &cookie, "Coffee", "2").await;

    let response = common::get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = common::body_string(response).await;
    assert!(page.contains("Coffee"));
    assert!(page.contains("5.00"), "grouped total should be 5.00");
}

#[tokio::test]
async fn test_breakdown_is_per_user() {
    let (app, _) = common::create_test_app().await;
    let alice = common::signup(&app, "alice", "a@b.com", "s3cret!pw").await;
    let bob = common::signup(&app, "bob", "b@b.com", "s3cret!pw").await;

    add(&app, &alice, "Coffee", "3").await;
    add(&app, &bob, "Cinema", "15").await;

    let page = common::body_string(common::get(&app, "/dashboard", Some(&alice)).await).await;
    assert!(page.contains("Coffee"));
    assert!(!page.contains("Cinema"));
}

#[tokio::test]
async fn test_savings_figures_from_income_and_month_spend() {
    let (app, _) = common::create_test_app().await;
    let cookie = common::signup(&app, "alice", "a@b.com", "s3cret!pw").await;

    // income=1000, this month's spend=400 -> saved 600.00, 60.00%
    let body = common::form_body(&[("income", "1000")]);
    common::post_form(&app, "/userdetails", body, Some(&cookie)).await;
    add(&app, &cookie, "Rent", "400").await;

    let page = common::body_string(common::get(&app, "/dashboard", Some(&cookie)).await).await;
    assert!(page.contains("600.00"), "monthly savings amount");
    assert!(page.contains("60.00%"), "savings percentage");
}

#[tokio::test]
async fn test_savings_withheld_without_income() {
    let (app, _) = common::create_test_app().await;
    let cookie = common::signup(&app, "alice", "a@b.com", "s3cret!pw").await;

    add(&app, &cookie, "Rent", "400").await;

    let page = common::body_string(common::get(&app, "/dashboard", Some(&cookie)).await).await;
    assert!(page.contains("Set a monthly income"));
    assert!(!page.contains("% of income"));
}

#[tokio::test]
async fn test_overspending_shows_zero_savings() {
    let (app, _) = common::create_test_app().await;
    let cookie = common::signup(&app, "alice", "a@b.com", "s3cret!pw").await;

    let body = common::form_body(&[("income", "1000")]);
    common::post_form(&app, "/userdetails", body, Some(&cookie)).await;
    add(&app, &cookie, "Splurge", "1500").await;

    let page = common::body_string(common::get(&app, "/dashboard", Some(&cookie)).await).await;
    assert!(page.contains("0.00 (0.00% of income)"));
}

#[tokio::test]
async fn test_month_total_excludes_other_months() {
    let (app, state) = common::create_test_app().await;
    let cookie = common::signup(&app, "alice", "a@b.com", "s3cret!pw").await;

    let user = state
        .db
        .find_user_by_identifier("alice")
        .await
        .unwrap()
        .unwrap();

    // One row this month via the form, one in another month seeded directly.
    add(&app, &cookie, "Groceries", "100").await;
    state
        .db
        .add_expense(user.id, "Old", 999.0, "1999-01-15")
        .await
        .unwrap();

    let month = chrono::Local::now().date_naive().format("%Y-%m").to_string();
    assert_eq!(state.db.total_for_month(user.id, &month).await.unwrap(), 100.0);

    let page = common::body_string(common::get(&app, "/dashboard", Some(&cookie)).await).await;
    assert!(page.contains("Spent this month: 100.00"));
}
