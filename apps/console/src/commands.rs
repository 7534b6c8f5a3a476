//! Shell commands.
//!
//! Each command returns the text for stdout; notices and logs go elsewhere.

use crate::cli::Command;
use crate::error::ConsoleAppError;
use crate::state::AppState;

use common::RedactedToken;

use console_core::console_client::LoginRequest;
use console_core::guard::{NavigationGuard, NavigationOutcome, Notifier};
use console_core::routes::ROUTE_TABLE;
use console_core::session::{AuthSource, AuthStatus};

use log::{debug, warn};

pub async fn run<N: Notifier>(
    state: &AppState,
    command: Command,
    notifier: N,
) -> Result<String, ConsoleAppError> {
    match command {
        Command::Navigate { path } => navigate(state, &path, notifier),
        Command::Login { username, password } => login(state, &username, &password, false).await,
        Command::AdminLogin { username, password } => {
            login(state, &username, &password, true).await
        }
        Command::Logout => logout(state).await,
        Command::CheckLogin => check_login(state).await,
        Command::WhoAmI => whoami(state),
        Command::Routes => Ok(routes()),
    }
}

/// Run the navigation guard for `path`.
///
/// A redirect is a normal outcome; only an unknown path is an error.
pub fn navigate<N: Notifier>(
    state: &AppState,
    path: &str,
    notifier: N,
) -> Result<String, ConsoleAppError> {
    let guard = NavigationGuard::new(&ROUTE_TABLE, state.flows().store().clone(), notifier);

    match guard.navigate(path, None) {
        NavigationOutcome::Proceed(route) => Ok(format!(
            "{} ({})",
            route.path,
            route.label.unwrap_or(route.name)
        )),
        NavigationOutcome::Redirected { requested, to, .. } => {
            Ok(format!("{} -> {} (redirected)", requested.path, to.path))
        }
        NavigationOutcome::NotFound(missing) => {
            Err(ConsoleAppError::console(format!("No route for {missing}")))
        }
    }
}

pub async fn login(
    state: &AppState,
    username: &str,
    password: &RedactedToken,
    admin: bool,
) -> Result<String, ConsoleAppError> {
    let request = LoginRequest::new(username, password.expose());
    let flows = state.flows();

    let mut auth = state.auth_lock().write().await;
    let profile = if admin {
        flows.admin_login(&mut *auth, &request).await
    } else {
        flows.login(&mut *auth, &request).await
    }
    .map_err(ConsoleAppError::core)?;

    let suffix = if profile.is_admin() { " (admin)" } else { "" };
    Ok(format!("Logged in as {}{suffix}", profile.username))
}

pub async fn logout(state: &AppState) -> Result<String, ConsoleAppError> {
    let mut auth = state.auth_lock().write().await;

    match state.flows().logout(&mut *auth).await {
        Ok(_) => Ok("Logged out".to_string()),
        Err(e) => {
            warn!("Logout finished with an error: {e}");
            Err(ConsoleAppError::core(format!(
                "Logout request failed, local credentials were cleared: {e}"
            )))
        }
    }
}

pub async fn check_login(state: &AppState) -> Result<String, ConsoleAppError> {
    let auth = state.auth().await;
    let envelope = state
        .flows()
        .client()
        .check_login(&auth)
        .await
        .map_err(ConsoleAppError::core)?;

    match envelope.data {
        Some(data) if !data.is_null() => {
            debug!("check-login payload: {data}");
            Ok("Token accepted by backend".to_string())
        }
        _ => Ok("Token not recognised by backend".to_string()),
    }
}

/// Describe how the session resolves, including disagreement between the
/// durable credentials and the in-memory session.
pub fn whoami(state: &AppState) -> Result<String, ConsoleAppError> {
    let resolved = state.flows().resolve().map_err(ConsoleAppError::core)?;
    let username = resolved.username.as_deref().unwrap_or("<unknown>");

    let mut out = match resolved.status {
        AuthStatus::Authenticated(AuthSource::CookieCredentials) => {
            format!("authenticated as {username} (cookie credentials)")
        }
        AuthStatus::Authenticated(AuthSource::DurableFlag) => {
            "authenticated by flag only (no token, requests go out anonymous)".to_string()
        }
        AuthStatus::Anonymous => "anonymous".to_string(),
    };

    out.push_str(&format!(
        "\nsession: authenticated={} admin={}",
        resolved.in_memory_authenticated, resolved.is_admin
    ));
    if resolved.is_divergent() {
        out.push_str("\nnote: stored credentials and in-memory session disagree");
    }

    Ok(out)
}

pub fn routes() -> String {
    ROUTE_TABLE
        .iter()
        .map(|route| {
            let access = match route.redirect {
                Some(target) => format!("-> {target}"),
                None if route.requires_auth => "login required".to_string(),
                None => "public".to_string(),
            };
            format!("{:<20} {:<18} {access}", route.path, route.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
