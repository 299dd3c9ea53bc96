// SPDX-License-Identifier: MIT

//! View-models and minimal HTML assembly.
//!
//! Handlers compute a view-model; this module turns it into a page.
//! There is deliberately no templating engine: pages are small and the
//! shell is shared. All interpolated text goes through [`escape`].

use axum::response::Html;
use serde::Serialize;

use crate::flash::Flash;
use crate::models::{Expense, User};

/// Escape text for inclusion in HTML.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared page shell: title, optional flash notice, body.
fn page(title: &str, flash: Option<&Flash>, body: &str) -> Html<String> {
    let notice = flash
        .map(|f| {
            format!(
                r#"<div class="notice notice-{}">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} - Spendbook</title></head>
<body>
<nav><a href="/index">Home</a> <a href="/dashboard">Dashboard</a> <a href="/settings">Settings</a> <a href="/logout">Log out</a></nav>
{notice}
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    ))
}

// ─── Auth pages ──────────────────────────────────────────────

pub fn login_page(flash: Option<&Flash>, next: Option<&str>) -> Html<String> {
    let action = match next {
        Some(next) => format!("/login?next={}", urlencoding::encode(next)),
        None => "/login".to_string(),
    };
    let body = format!(
        r#"<h1>Log in</h1>
<form method="post" action="{action}">
  <label>Username or email <input name="username_or_email" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup">Sign up</a></p>"#,
        action = escape(&action),
    );
    page("Log in", flash, &body)
}

pub fn signup_page(flash: Option<&Flash>) -> Html<String> {
    let body = r#"<h1>Sign up</h1>
<form method="post" action="/signup">
  <label>Username <input name="username" required></label>
  <label>Email <input name="email" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Create account</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#;
    page("Sign up", flash, body)
}

// ─── Index ───────────────────────────────────────────────────

/// Landing page data: today's ledger slice plus running totals.
#[derive(Debug, Serialize)]
pub struct IndexView {
    pub authenticated: bool,
    /// Human-readable date heading, e.g. "Thursday, August 27, 2026"
    pub today_display: String,
    pub expenses: Vec<Expense>,
    pub total_amount: f64,
    pub total_today: f64,
    pub savings_goal: Option<String>,
}

impl IndexView {
    /// The empty view shown to anonymous visitors.
    pub fn anonymous(today_display: String) -> Self {
        Self {
            authenticated: false,
            today_display,
            expenses: Vec::new(),
            total_amount: 0.0,
            total_today: 0.0,
            savings_goal: None,
        }
    }
}

pub fn index_page(view: &IndexView, flash: Option<&Flash>) -> Html<String> {
    if !view.authenticated {
        let body = format!(
            r#"<h1>Spendbook</h1>
<p>{}</p>
<p><a href="/login">Log in</a> or <a href="/signup">sign up</a> to start tracking expenses.</p>"#,
            escape(&view.today_display),
        );
        return page("Welcome", flash, &body);
    }

    let mut rows = String::new();
    for expense in &view.expenses {
        rows.push_str(&format!(
            r#"<tr><td>{}</td><td>{:.2}</td><td><a href="/delete_expense/{}">delete</a></td></tr>"#,
            escape(&expense.name),
            expense.amount,
            expense.id,
        ));
    }
    if rows.is_empty() {
        rows.push_str(r#"<tr><td colspan="3">No expenses recorded today.</td></tr>"#);
    }

    let goal = view
        .savings_goal
        .as_deref()
        .map(|g| format!("<p>Savings goal: {}</p>", escape(g)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>{today}</h1>
<form method="post" action="/add_expense">
  <label>Name <input name="expense_name" required></label>
  <label>Amount <input name="expense_amount" required></label>
  <button type="submit">Add expense</button>
</form>
<table>
<tr><th>Name</th><th>Amount</th><th></th></tr>
{rows}
</table>
<p>Spent today: {today_total:.2}</p>
<p>All-time total: {total:.2}</p>
{goal}"#,
        today = escape(&view.today_display),
        today_total = view.total_today,
        total = view.total_amount,
    );
    page("Home", flash, &body)
}

// ─── Dashboard ───────────────────────────────────────────────

/// Aggregate spending figures for the dashboard.
///
/// The savings figures are absent (not zero) unless the user's income is
/// set and positive.
#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardView {
    pub labels: Vec<String>,
    pub amounts: Vec<f64>,
    pub month_spent: f64,
    pub income: Option<f64>,
    pub monthly_savings_amount: Option<f64>,
    pub savings_pct: Option<f64>,
}

impl DashboardView {
    /// Assemble the dashboard from per-name totals, the current-month
    /// total, and the user's raw income field.
    pub fn build(grouped: Vec<(String, f64)>, month_spent: f64, income: Option<f64>) -> Self {
        let (labels, amounts) = grouped.into_iter().unzip();

        let income = income.filter(|v| *v > 0.0);
        let monthly_savings_amount = income.map(|inc| (inc - month_spent).max(0.0));
        let savings_pct = income
            .zip(monthly_savings_amount)
            .map(|(inc, saved)| round2(saved / inc * 100.0));

        Self {
            labels,
            amounts,
            month_spent,
            income,
            monthly_savings_amount,
            savings_pct,
        }
    }
}

/// Round to 2 decimal places.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn dashboard_page(view: &DashboardView, flash: Option<&Flash>) -> Html<String> {
    let mut rows = String::new();
    for (label, amount) in view.labels.iter().zip(&view.amounts) {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td></tr>",
            escape(label),
            amount
        ));
    }
    if rows.is_empty() {
        rows.push_str(r#"<tr><td colspan="2">Nothing recorded yet.</td></tr>"#);
    }

    let savings = match (view.monthly_savings_amount, view.savings_pct) {
        (Some(saved), Some(pct)) => format!(
            "<p>Saved this month: {saved:.2} ({pct:.2}% of income)</p>"
        ),
        _ => "<p>Set a monthly income to see savings figures.</p>".to_string(),
    };

    let body = format!(
        r#"<h1>Dashboard</h1>
<table>
<tr><th>Expense</th><th>Total</th></tr>
{rows}
</table>
<p>Spent this month: {month:.2}</p>
{savings}"#,
        month = view.month_spent,
    );
    page("Dashboard", flash, &body)
}

// ─── Profile pages ───────────────────────────────────────────

pub fn settings_page(user: &User, flash: Option<&Flash>) -> Html<String> {
    let field = |label: &str, value: &Option<String>| {
        format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(label),
            escape(value.as_deref().unwrap_or("-")),
        )
    };

    let body = format!(
        r#"<h1>Settings</h1>
<table>
<tr><td>Username</td><td>{username}</td></tr>
<tr><td>Email</td><td>{email}</td></tr>
{full_name}{dob}{phone}{occupation}{income}{monthly_expenses}{savings_goal}{currency}{financial_goal}
</table>
<p><a href="/edit_details">Edit details</a></p>"#,
        username = escape(&user.username),
        email = escape(&user.email),
        full_name = field("Full name", &user.full_name),
        dob = field("Date of birth", &user.dob),
        phone = field("Phone", &user.phone),
        occupation = field("Occupation", &user.occupation),
        income = field("Monthly income", &user.income),
        monthly_expenses = field("Monthly expenses", &user.monthly_expenses),
        savings_goal = field("Savings goal", &user.savings_goal),
        currency = field("Currency", &user.currency),
        financial_goal = field("Financial goal", &user.financial_goal),
    );
    page("Settings", flash, &body)
}

/// Shared profile form, pre-populated from the stored user.
///
/// `action` is `/userdetails` for first-time collection and
/// `/edit_details` afterwards.
pub fn profile_form_page(
    user: &User,
    action: &str,
    title: &str,
    flash: Option<&Flash>,
) -> Html<String> {
    let value = |v: &Option<String>| escape(v.as_deref().unwrap_or(""));

    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}">
  <label>Full name <input name="full_name" value="{full_name}"></label>
  <label>Date of birth <input name="dob" type="date" value="{dob}"></label>
  <label>Phone <input name="phone" value="{phone}"></label>
  <label>Occupation <input name="occupation" value="{occupation}"></label>
  <label>Monthly income <input name="income" value="{income}"></label>
  <label>Monthly expenses <input name="monthly_expenses" value="{monthly_expenses}"></label>
  <label>Savings goal <input name="savings_goal" value="{savings_goal}"></label>
  <label>Currency <input name="currency" value="{currency}"></label>
  <label>Financial goal <input name="financial_goal" value="{financial_goal}"></label>
  <button type="submit">Save</button>
</form>"#,
        title = escape(title),
        action = escape(action),
        full_name = value(&user.full_name),
        dob = value(&user.dob),
        phone = value(&user.phone),
        occupation = value(&user.occupation),
        income = value(&user.income),
        monthly_expenses = value(&user.monthly_expenses),
        savings_goal = value(&user.savings_goal),
        currency = value(&user.currency),
        financial_goal = value(&user.financial_goal),
    );
    page(title, flash, &body)
}
