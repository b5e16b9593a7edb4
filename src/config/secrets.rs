//! Credential references
//!
//! Passwords in a request may be written as `$env.NAME` instead of a literal,
//! so request files can be committed without secrets. References are resolved
//! at the I/O boundary, before the request reaches the compiler:
//! - SSH passwords of cluster nodes
//! - SSH passwords of load-balancer instances
//! - The load-balancer admin password

use regex::Regex;
use thiserror::Error;

use super::request::CompileRequest;

/// Errors during credential resolution
#[derive(Error, Debug, PartialEq)]
pub enum CredentialError {
    #[error("Environment variable not found: {0}")]
    Unresolved(String),
}

/// Parsed credential reference
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRef {
    pub variable: String,
}

// ============================================================================
// SBIO: Pure functions (no I/O)
// ============================================================================

/// Parse a reference like "$env.LB_ADMIN_PASSWORD". Returns None for
/// literals.
pub fn parse_credential_reference(s: &str) -> Option<CredentialRef> {
    let pattern = Regex::new(r"^\$env\.([A-Za-z_][A-Za-z0-9_]*)$").ok()?;
    let caps = pattern.captures(s)?;

    Some(CredentialRef {
        variable: caps.get(1)?.as_str().to_string(),
    })
}

/// Resolve a single value. Literals pass through unchanged.
pub fn resolve_value<F>(value: &str, lookup: &F) -> Result<String, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_credential_reference(value) {
        Some(reference) => {
            lookup(&reference.variable).ok_or(CredentialError::Unresolved(reference.variable))
        }
        None => Ok(value.to_string()),
    }
}

/// Return a copy of `request` with every credential reference replaced.
/// The input is left untouched.
pub fn resolve_credentials<F>(
    request: &CompileRequest,
    lookup: F,
) -> Result<CompileRequest, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut resolved = request.clone();

    for node in &mut resolved.nodes {
        node.ssh_password = resolve_value(&node.ssh_password, &lookup)?;
    }

    let lb = &mut resolved.load_balancer;
    lb.common.password = resolve_value(&lb.common.password, &lookup)?;
    for instance in &mut lb.instances {
        instance.ssh_password = resolve_value(&instance.ssh_password, &lookup)?;
    }

    Ok(resolved)
}

/// Names of all variables referenced by a request
pub fn referenced_variables(request: &CompileRequest) -> Vec<String> {
    let lb = &request.load_balancer;
    request
        .nodes
        .iter()
        .map(|n| n.ssh_password.as_str())
        .chain(std::iter::once(lb.common.password.as_str()))
        .chain(lb.instances.iter().map(|i| i.ssh_password.as_str()))
        .filter_map(parse_credential_reference)
        .map(|r| r.variable)
        .collect()
}

// ============================================================================
// I/O boundary
// ============================================================================

/// Resolve references against the process environment
pub fn resolve_from_environment(
    request: &CompileRequest,
) -> Result<CompileRequest, CredentialError> {
    resolve_credentials(request, |name| std::env::var(name).ok())
}
