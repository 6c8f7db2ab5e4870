//! Login redirect targets

/// Login entry point the gate sends unauthenticated visitors to
pub const LOGIN_PATH: &str = "/auth/login";

/// Where a successful login lands when no usable return target was given
pub const DEFAULT_AFTER_LOGIN: &str = "/protected";

/// `Location` for a denied request: the login page with the original path
/// as `redirect`
pub fn login_redirect(original_path: &str) -> String {
    format!(
        "{}?redirect={}",
        LOGIN_PATH,
        urlencoding::encode(original_path)
    )
}

/// Whether a user-supplied return target stays on this site.
///
/// Only absolute local paths are accepted: `//host` and `/\host` are
/// protocol-relative in browsers and would leave the site.
pub fn is_safe_return_target(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(char::is_control)
}

/// The return target to use after login
pub fn return_target(requested: Option<&str>) -> &str {
    match requested {
        Some(target) if is_safe_return_target(target) => target,
        _ => DEFAULT_AFTER_LOGIN,
    }
}
