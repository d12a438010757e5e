/// Attack class attached to operator-supplied parameter names.
pub const CUSTOM_ATTACK: &str = "custom";

/// Query parameter names that commonly carry attacker-controlled input,
/// with the vulnerability classes they are usually tested for.
const JUICY_PARAMETERS: &[(&str, &[&str])] = &[
    ("id", &["SQLi", "IDOR"]),
    ("uid", &["SQLi", "IDOR"]),
    ("user", &["SQLi", "IDOR"]),
    ("user_id", &["SQLi", "IDOR"]),
    ("account", &["IDOR"]),
    ("order", &["SQLi", "IDOR"]),
    ("sort", &["SQLi"]),
    ("column", &["SQLi"]),
    ("where", &["SQLi"]),
    ("search", &["XSS", "SQLi"]),
    ("q", &["XSS", "SQLi"]),
    ("query", &["XSS", "SQLi"]),
    ("keyword", &["XSS"]),
    ("name", &["XSS"]),
    ("message", &["XSS"]),
    ("comment", &["XSS"]),
    ("callback", &["XSS", "JSONP"]),
    ("jsonp", &["XSS", "JSONP"]),
    ("redirect", &["Open Redirect", "SSRF"]),
    ("redirect_uri", &["Open Redirect", "SSRF"]),
    ("redirect_url", &["Open Redirect", "SSRF"]),
    ("return", &["Open Redirect"]),
    ("return_to", &["Open Redirect"]),
    ("returnurl", &["Open Redirect"]),
    ("next", &["Open Redirect"]),
    ("goto", &["Open Redirect"]),
    ("continue", &["Open Redirect"]),
    ("dest", &["Open Redirect", "SSRF"]),
    ("destination", &["Open Redirect", "SSRF"]),
    ("url", &["SSRF", "Open Redirect"]),
    ("uri", &["SSRF", "Open Redirect"]),
    ("site", &["SSRF"]),
    ("host", &["SSRF"]),
    ("domain", &["SSRF"]),
    ("proxy", &["SSRF"]),
    ("feed", &["SSRF"]),
    ("callback_url", &["SSRF"]),
    ("webhook", &["SSRF"]),
    ("file", &["LFI", "Path Traversal"]),
    ("filename", &["LFI", "Path Traversal"]),
    ("path", &["LFI", "Path Traversal"]),
    ("dir", &["LFI", "Path Traversal"]),
    ("folder", &["LFI", "Path Traversal"]),
    ("page", &["LFI"]),
    ("include", &["LFI", "RFI"]),
    ("template", &["LFI", "SSTI"]),
    ("doc", &["LFI"]),
    ("download", &["LFI", "Path Traversal"]),
    ("cmd", &["RCE"]),
    ("exec", &["RCE"]),
    ("command", &["RCE"]),
    ("run", &["RCE"]),
    ("ping", &["RCE"]),
    ("ip", &["RCE", "SSRF"]),
    ("code", &["RCE"]),
    ("eval", &["RCE"]),
    ("debug", &["Debug"]),
    ("test", &["Debug"]),
    ("admin", &["Privilege Escalation"]),
    ("role", &["Privilege Escalation"]),
    ("token", &["Sensitive Data"]),
    ("access_token", &["Sensitive Data"]),
    ("api_key", &["Sensitive Data"]),
    ("apikey", &["Sensitive Data"]),
    ("key", &["Sensitive Data"]),
    ("secret", &["Sensitive Data"]),
    ("password", &["Sensitive Data"]),
    ("session", &["Sensitive Data"]),
    ("xml", &["XXE"]),
    ("data", &["Deserialization", "XXE"]),
];

/// Attack classes for a parameter name. Matching is case-insensitive.
pub fn attacks_for(name: &str) -> &'static [&'static str] {
    let name = name.to_ascii_lowercase();
    JUICY_PARAMETERS
        .iter()
        .find(|(param, _)| *param == name)
        .map(|(_, attacks)| *attacks)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_parameter() {
        assert_eq!(attacks_for("redirect"), &["Open Redirect", "SSRF"]);
        assert_eq!(attacks_for("ID"), &["SQLi", "IDOR"]);
    }

    #[test]
    fn test_unknown_parameter() {
        assert!(attacks_for("utm_source").is_empty());
    }
}
