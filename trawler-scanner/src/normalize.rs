//! Turning raw href/src/attribute values into canonical absolute URLs.

use crate::error::{Result, ScanError};
use url::{Host, Url};

/// Resolve a raw link against the page it was found on.
///
/// Empty values, inline images (`data:image...`) and in-page anchors are
/// not navigable and come back as `Ok(None)`. The returned URL never has
/// a fragment, so normalizing an already normalized URL is a no-op.
pub fn normalize(raw: &str, base: &Url) -> Result<Option<Url>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("data:image") || raw.starts_with('#') {
        return Ok(None);
    }

    let mut resolved = base
        .join(raw)
        .map_err(|e| ScanError::MalformedUrl(format!("{} (base {}): {}", raw, base, e)))?;
    resolved.set_fragment(None);

    Ok(Some(resolved))
}

/// Whether `input` starts with `scheme://`. A `://` that only shows up
/// after the first `/`, `?` or `#` belongs to the path or query.
pub fn has_scheme(input: &str) -> bool {
    let head = input.find(['/', '?', '#']).unwrap_or(input.len());
    input.find("://").is_some_and(|idx| idx > 0 && idx <= head)
}

/// Host plus explicit port, the part of a URL that decides same-host scope.
/// Ports 80 and 443 count as the default for either scheme.
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(80 | 443) | None => host.to_string(),
        Some(port) => format!("{}:{}", host, port),
    })
}

/// The registrable root domain of a URL's host, e.g. `api.example.co.uk`
/// becomes `example.co.uk`. IP literals are their own root.
pub fn root_host(url: &Url) -> Result<String> {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.');
            psl::domain_str(domain)
                .map(str::to_string)
                .ok_or_else(|| ScanError::MalformedUrl(format!("no registrable domain in {}", domain)))
        }
        Some(Host::Ipv4(ip)) => Ok(ip.to_string()),
        Some(Host::Ipv6(ip)) => Ok(ip.to_string()),
        None => Err(ScanError::MalformedUrl(format!("{} has no host", url))),
    }
}

/// Lowercased file extension of the last path segment, without the dot.
pub fn url_extension(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let (_, extension) = segment.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// First token of each comma separated `srcset` entry.
pub fn srcset_candidates(srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// The `url=` part of a `meta refresh` content value such as
/// `0; url=/next.html`.
pub fn meta_refresh_candidate(content: &str) -> Option<String> {
    content.split(';').map(str::trim).find_map(|part| {
        let prefix = part.get(..4)?;
        if !prefix.eq_ignore_ascii_case("url=") {
            return None;
        }
        let target = part[4..].trim().trim_matches(|c| c == '\'' || c == '"');
        (!target.is_empty()).then(|| target.to_string())
    })
}
