//! Resource identifier construction
//!
//! A resource identifier is the string key the remote permission service
//! checks against: `<METHOD>: <path>` by default, or an explicit per-route
//! override. Overrides may carry a placeholder that is filled with the
//! session's affiliate scope at request time.

/// Placeholder substituted with the session's affiliate scope
pub const AFFILIATE_PLACEHOLDER: &str = "{affiliate}";

/// Default resource identifier for a request: `<METHOD>: <path>`
pub fn default_identifier(method: &str, path: &str) -> String {
    format!("{}: {}", method.to_uppercase(), path)
}

/// Substitute the affiliate placeholder, if present
pub fn render(template: &str, affiliate: Option<&str>) -> String {
    if !template.contains(AFFILIATE_PLACEHOLDER) {
        return template.to_string();
    }

    template.replace(AFFILIATE_PLACEHOLDER, affiliate.unwrap_or_default())
}

/// Resolve the resource identifier for a request
pub fn resolve(
    override_template: Option<&str>,
    method: &str,
    path: &str,
    affiliate: Option<&str>,
) -> String {
    match override_template {
        Some(template) => render(template, affiliate),
        None => default_identifier(method, path),
    }
}
