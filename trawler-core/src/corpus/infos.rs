use super::Detector;
use std::sync::LazyLock;

pub static INFOS: LazyLock<Vec<Detector>> =
    LazyLock::new(|| Detector::compile(INFO_TABLE, "CWE-200"));

// (name, description, pattern)
const INFO_TABLE: &[(&str, &str, &str)] = &[
    (
        "Email address",
        "Email address",
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,24}\b",
    ),
    (
        "Internal IP address",
        "RFC 1918 private address",
        r"\b(?:10\.\d{1,3}\.\d{1,3}\.\d{1,3}|172\.(?:1[6-9]|2\d|3[01])\.\d{1,3}\.\d{1,3}|192\.168\.\d{1,3}\.\d{1,3})\b",
    ),
    (
        "Server version banner",
        "Web server name and version",
        r"\b(?:Apache|nginx|Microsoft-IIS|LiteSpeed|lighttpd|openresty|Jetty|Apache-Coyote)/\d+(?:\.\d+)+",
    ),
    (
        "PHP version",
        "PHP version string",
        r"\bPHP/\d+\.\d+(?:\.\d+)?",
    ),
    (
        "phpinfo page",
        "Output of phpinfo()",
        r#"(<title>phpinfo\(\)</title>|<h1 class="p">PHP Version \d+\.\d+)"#,
    ),
    (
        "Directory listing",
        "Auto generated directory index",
        r"<title>Index of /[^<]*</title>",
    ),
    (
        "Generator meta tag",
        "CMS or framework version advertised in a generator meta tag",
        r#"<meta\s+name=["']generator["']\s+content=["'][^"']+["']"#,
    ),
    (
        "Source map reference",
        "Reference to a JavaScript source map",
        r"//[#@] sourceMappingURL=\S+",
    ),
    (
        "Debug marker",
        "Debug switch left enabled",
        r"(?i)\b(?:debug\s*[=:]\s*true|display_errors\s*=\s*on|x-debug-token)",
    ),
    (
        "AWS S3 bucket",
        "Amazon S3 bucket hostname",
        r"\b[a-z0-9.-]+\.s3(?:[.-][a-z0-9-]+)?\.amazonaws\.com",
    ),
    (
        "Sensitive HTML comment",
        "HTML comment mentioning credentials or unfinished work",
        r"<!--[^>]{0,200}?(?i:password|passwd|secret|api[_-]?key|todo|fixme)[^>]{0,200}?-->",
    ),
];
