// SPDX-License-Identifier: MIT

//! Flash messages: severity-tagged transient notices.
//!
//! A message is set as a short-lived cookie on redirect and consumed
//! (removed) by the next page render, so it is shown exactly once.

use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "spendbook_flash";

/// Message severity, rendered as the notice style on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Danger => "danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Level::Success),
            "info" => Some(Level::Info),
            "warning" => Some(Level::Warning),
            "danger" => Some(Level::Danger),
            _ => None,
        }
    }
}

/// A transient user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

/// Queue a flash message for the next rendered page.
pub fn set_flash(jar: CookieJar, level: Level, message: &str) -> CookieJar {
    let value = format!("{}:{}", level.as_str(), urlencoding::encode(message));
    jar.add(Cookie::build((FLASH_COOKIE, value)).path("/").http_only(true))
}

/// Consume the pending flash message, if any, removing its cookie.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let flash = cookie.value().split_once(':').and_then(|(level, msg)| {
        Some(Flash {
            level: Level::parse(level)?,
            message: urlencoding::decode(msg).ok()?.into_owned(),
        })
    });

    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    let jar = jar.remove(removal);
    (jar, flash)
}

/// Redirect with a queued flash message: the shape every mutating
/// handler resolves to, success or failure.
pub fn flash_redirect(
    jar: CookieJar,
    level: Level,
    message: &str,
    to: &str,
) -> (CookieJar, Redirect) {
    (set_flash(jar, level, message), Redirect::to(to))
}
