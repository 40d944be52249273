use crate::core::errors::ModemError;
use crate::core::kernel::transport::HttpRequest;
use crate::core::types::{RequestDescriptor, HEADER_COOKIE, HEADER_VERIFICATION_TOKEN};
use roxmltree::Document;

/// Body slot replaced with the XML-escaped username
pub const USERNAME_SLOT: &str = "{username}";
/// Body slot replaced with the hashed login payload
pub const PASSWORD_SLOT: &str = "{password}";

/// Credentials filled into a login body
#[derive(Debug, Clone, Copy)]
pub struct LoginPayload<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Per-request values filled into a descriptor's templates
#[derive(Debug, Clone, Copy, Default)]
pub struct Substitutions<'a> {
    pub session_id: Option<&'a str>,
    pub token_id: Option<&'a str>,
    pub login: Option<LoginPayload<'a>>,
}

/// Build a request from a catalog descriptor
///
/// The header list is a fresh copy of the descriptor's template with the
/// `Cookie` slot set to the session and, for long headers, the
/// `__RequestVerificationToken` slot set to the token. Slots without a
/// substitution keep the template's empty value.
pub fn encode(
    descriptor: &RequestDescriptor,
    substitutions: &Substitutions<'_>,
) -> Result<HttpRequest, ModemError> {
    let headers = descriptor
        .header
        .entries()
        .iter()
        .map(|&(name, default)| {
            let value = match name {
                HEADER_COOKIE => substitutions.session_id.unwrap_or(default),
                HEADER_VERIFICATION_TOKEN => substitutions.token_id.unwrap_or(default),
                _ => default,
            };
            (name.to_string(), value.to_string())
        })
        .collect();

    let body = fill_body(descriptor.body, substitutions.login.as_ref())?;

    Ok(HttpRequest {
        method: descriptor.method,
        path: descriptor.path.to_string(),
        headers,
        body,
    })
}

fn fill_body(template: &str, login: Option<&LoginPayload<'_>>) -> Result<String, ModemError> {
    if !template.contains(PASSWORD_SLOT) && !template.contains(USERNAME_SLOT) {
        return Ok(template.to_string());
    }

    let login = login.ok_or_else(|| {
        ModemError::InvalidRequest("request body requires login credentials".to_string())
    })?;

    // password first, an escaped username may still contain a literal slot
    Ok(template
        .replace(PASSWORD_SLOT, login.password_hash)
        .replace(USERNAME_SLOT, &escape_xml(login.username)))
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Parse a response body into an XML document
pub fn decode(body: &[u8]) -> Result<Document<'_>, ModemError> {
    let text = std::str::from_utf8(body).map_err(|e| {
        ModemError::MalformedResponse(format!("Response body is not valid UTF-8: {}", e))
    })?;

    Document::parse(text.trim_start_matches(['\u{feff}', ' ', '\t', '\r', '\n'])).map_err(|e| {
        ModemError::MalformedResponse(format!("Failed to parse XML response: {}", e))
    })
}

/// Text of the first element named `tag`, or `None` if there is no such
/// element or it has no text
pub fn extract_field(doc: &Document<'_>, tag: &str) -> Option<String> {
    doc.descendants()
        .find(|node| node.has_tag_name(tag))
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Code reported in the first `<error>` element
///
/// `None` means the device reported no error. An `<error>` without a `<code>`
/// yields an empty code.
pub fn extract_error_code(doc: &Document<'_>) -> Option<String> {
    let error = doc.descendants().find(|node| node.has_tag_name("error"))?;

    let code = error
        .descendants()
        .find(|node| node.has_tag_name("code"))
        .and_then(|node| node.text())
        .map(str::trim)
        .unwrap_or_default();

    Some(code.to_string())
}
