//! Pulling candidate links out of HTML and XML documents.

use crate::normalize::{meta_refresh_candidate, normalize, srcset_candidates, url_extension};
use crate::scope::ScopePolicy;
use quick_xml::Reader;
use quick_xml::events::Event;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Which extraction rules apply to a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Html,
    Xml,
    Other,
}

impl DocumentKind {
    /// Decide from the content type. A `.xml` path is XML whatever the
    /// server claims, and the extension also decides when there is no
    /// content type at all.
    pub fn detect(content_type: Option<&str>, url: &Url) -> Self {
        let extension = url_extension(url);
        match content_type.map(str::to_ascii_lowercase) {
            Some(ct) if ct.contains("html") => DocumentKind::Html,
            Some(ct) if ct.contains("xml") => DocumentKind::Xml,
            _ if extension.as_deref() == Some("xml") => DocumentKind::Xml,
            Some(_) => DocumentKind::Other,
            None => match extension.as_deref() {
                Some("html" | "htm") => DocumentKind::Html,
                _ => DocumentKind::Other,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ValueForm {
    Plain,
    SrcSet,
    MetaRefresh,
}

impl ValueForm {
    fn candidates(self, value: &str) -> Vec<String> {
        match self {
            ValueForm::Plain => vec![value.to_string()],
            ValueForm::SrcSet => srcset_candidates(value),
            ValueForm::MetaRefresh => meta_refresh_candidate(value).into_iter().collect(),
        }
    }
}

struct AttributeRule {
    selector: Selector,
    attribute: &'static str,
    form: ValueForm,
}

static HTML_RULES: LazyLock<Vec<AttributeRule>> = LazyLock::new(|| {
    [
        ("a[href], link[href]", "href", ValueForm::Plain),
        (
            "script[src], iframe[src], svg[src], img[src], video[src], embed[src]",
            "src",
            ValueForm::Plain,
        ),
        ("form[action]", "action", ValueForm::Plain),
        ("[data-src]", "data-src", ValueForm::Plain),
        ("[data-href]", "data-href", ValueForm::Plain),
        ("[data-url]", "data-url", ValueForm::Plain),
        ("img[srcset], source[srcset]", "srcset", ValueForm::SrcSet),
        ("meta[http-equiv='refresh']", "content", ValueForm::MetaRefresh),
        ("object[data]", "data", ValueForm::Plain),
        ("applet[code]", "code", ValueForm::Plain),
    ]
    .into_iter()
    .map(|(css, attribute, form)| AttributeRule {
        selector: Selector::parse(css).expect("static selector must parse"),
        attribute,
        form,
    })
    .collect()
});

/// Element names whose text content is a link in sitemaps and feeds.
const XML_LINK_NODES: &[&[u8]] = &[b"url", b"link", b"href", b"loc", b"fileurl"];

fn rule_candidates(rule: &'static AttributeRule, element: ElementRef<'_>) -> Vec<String> {
    element
        .value()
        .attr(rule.attribute)
        .map(|value| rule.form.candidates(value))
        .unwrap_or_default()
}

/// Raw candidate links of an HTML document, rule by rule. Lazy and
/// consumed once.
pub fn html_candidates(document: &Html) -> impl Iterator<Item = String> + '_ {
    HTML_RULES.iter().flat_map(move |rule| {
        document
            .select(&rule.selector)
            .flat_map(move |element| rule_candidates(rule, element))
    })
}

/// Raw candidate links of an XML document: trimmed text directly inside
/// `url`, `link`, `href`, `loc` or `fileurl` elements.
pub fn xml_candidates(body: &str) -> XmlCandidates<'_> {
    let mut reader = Reader::from_str(body);
    let config = reader.config_mut();
    config.trim_text(true);
    config.check_end_names = false;

    XmlCandidates {
        reader,
        stack: Vec::new(),
        done: false,
    }
}

pub struct XmlCandidates<'a> {
    reader: Reader<&'a [u8]>,
    stack: Vec<Vec<u8>>,
    done: bool,
}

impl XmlCandidates<'_> {
    fn inside_link_node(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|name| XML_LINK_NODES.contains(&name.as_slice()))
    }
}

impl Iterator for XmlCandidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while !self.done {
            let text = match self.reader.read_event() {
                Ok(Event::Start(start)) => {
                    self.stack.push(start.local_name().as_ref().to_ascii_lowercase());
                    continue;
                }
                Ok(Event::End(_)) => {
                    self.stack.pop();
                    continue;
                }
                Ok(Event::Text(text)) if self.inside_link_node() => match text.unescape() {
                    Ok(text) => text.trim().to_string(),
                    Err(e) => {
                        debug!("Skipping undecodable XML text: {}", e);
                        continue;
                    }
                },
                Ok(Event::CData(data)) if self.inside_link_node() => {
                    String::from_utf8_lossy(&data.into_inner()).trim().to_string()
                }
                Ok(Event::Eof) => {
                    self.done = true;
                    continue;
                }
                Err(e) => {
                    debug!("Stopping XML extraction at position {}: {}", self.reader.buffer_position(), e);
                    self.done = true;
                    continue;
                }
                Ok(_) => continue,
            };

            if !text.is_empty() {
                return Some(text);
            }
        }
        None
    }
}

/// Normalize every candidate against the page URL and keep the ones in
/// scope. Malformed candidates are dropped.
pub fn resolve_in_scope<'a, I>(
    candidates: I,
    page_url: &'a Url,
    policy: &'a ScopePolicy,
) -> impl Iterator<Item = Url> + 'a
where
    I: Iterator<Item = String> + 'a,
{
    candidates
        .filter_map(move |raw| match normalize(&raw, page_url) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!("Dropping candidate link: {}", e);
                None
            }
        })
        .filter(move |url| policy.in_scope(url))
}

/// Every in-scope absolute URL linked from `body`, first occurrence order,
/// without duplicates.
pub fn discover_links(
    body: &str,
    kind: DocumentKind,
    page_url: &Url,
    policy: &ScopePolicy,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keep = |url: Url| {
        let url = String::from(url);
        seen.insert(url.clone()).then_some(url)
    };

    match kind {
        DocumentKind::Html => {
            let document = Html::parse_document(body);
            resolve_in_scope(html_candidates(&document), page_url, policy)
                .filter_map(&mut keep)
                .collect()
        }
        DocumentKind::Xml => resolve_in_scope(xml_candidates(body), page_url, policy)
            .filter_map(&mut keep)
            .collect(),
        DocumentKind::Other => Vec::new(),
    }
}
