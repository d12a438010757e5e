use super::Detector;
use std::sync::LazyLock;

pub static SECRETS: LazyLock<Vec<Detector>> =
    LazyLock::new(|| Detector::compile(SECRET_TABLE, "CWE-798"));

// (name, description, pattern)
const SECRET_TABLE: &[(&str, &str, &str)] = &[
    (
        "AWS Access Key",
        "AWS Access Key",
        r"(A3T[A-Z0-9]|AKIA|AGPA|AIDA|AROA|AIPA|ANPA|ANVA|ASIA)[A-Z0-9]{16}",
    ),
    (
        "AWS Secret Key",
        "AWS Secret Key",
        r#"(?i)aws(.{0,20})?(?-i)['"][0-9a-zA-Z/+]{40}['"]"#,
    ),
    (
        "AWS MWS Key",
        "AWS MWS Key",
        r"amzn\.mws\.[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
    ),
    (
        "Facebook Secret Key",
        "Facebook Secret Key",
        r#"(?i)(facebook|fb)(.{0,20})?(?-i)['"][0-9a-f]{32}['"]"#,
    ),
    (
        "Facebook Client ID",
        "Facebook Client ID",
        r#"(?i)(facebook|fb)(.{0,20})?['"][0-9]{13,17}['"]"#,
    ),
    (
        "Twitter Secret Key",
        "Twitter Secret Key",
        r"(?i)twitter(.{0,20})?[0-9a-z]{35,44}",
    ),
    (
        "Twitter Client ID",
        "Twitter Client ID",
        r"(?i)twitter(.{0,20})?[0-9a-z]{18,25}",
    ),
    (
        "Github Personal Access Token",
        "Github Personal Access Token",
        r"ghp_[0-9a-zA-Z]{36}",
    ),
    (
        "Github OAuth Access Token",
        "Github OAuth Access Token",
        r"gho_[0-9a-zA-Z]{36}",
    ),
    ("Github App Token", "Github App Token", r"(ghu|ghs)_[0-9a-zA-Z]{36}"),
    ("Github Refresh Token", "Github Refresh Token", r"ghr_[0-9a-zA-Z]{76}"),
    (
        "LinkedIn Client ID",
        "LinkedIn Client ID",
        r"(?i)linkedin(.{0,20})?(?-i)[0-9a-z]{12}",
    ),
    (
        "LinkedIn Secret Key",
        "LinkedIn Secret Key",
        r"(?i)linkedin(.{0,20})?[0-9a-z]{16}",
    ),
    ("Slack", "Slack token", r"xox[baprs]-([0-9a-zA-Z]{10,48})?"),
    (
        "Asymmetric Private Key",
        "Asymmetric Private Key",
        r"-----BEGIN ((EC|PGP|DSA|RSA|OPENSSH) )?PRIVATE KEY( BLOCK)?-----",
    ),
    ("Google API key", "Google API key", r"AIza[0-9A-Za-z_-]{35}"),
    (
        "Google (GCP) Service Account",
        "Google (GCP) Service Account",
        r#""type": "service_account""#,
    ),
    (
        "Heroku API key",
        "Heroku API key",
        r"(?i)heroku(.{0,20})?[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
    ),
    (
        "MailChimp API key",
        "MailChimp API key",
        r"(?i)(mailchimp|mc)(.{0,20})?[0-9a-f]{32}-us[0-9]{1,2}",
    ),
    (
        "Mailgun API key",
        "Mailgun API key",
        r"((?i)(mailgun|mg)(.{0,20})?)?key-[0-9a-z]{32}",
    ),
    (
        "PayPal Braintree access token",
        "PayPal Braintree access token",
        r"access_token\$production\$[0-9a-z]{16}\$[0-9a-f]{32}",
    ),
    ("Picatic API key", "Picatic API key", r"sk_live_[0-9a-z]{32}"),
    (
        "SendGrid API Key",
        "SendGrid API Key",
        r"SG\.[\w_]{16,32}\.[\w_]{16,64}",
    ),
    (
        "Slack Webhook",
        "Slack Webhook",
        r"https://hooks\.slack\.com/services/T[a-zA-Z0-9_]{8}/B[a-zA-Z0-9_]{8,12}/[a-zA-Z0-9_]{24}",
    ),
    (
        "Stripe API key",
        "Stripe API key",
        r"(?i)stripe(.{0,20})?[sr]k_live_[0-9a-zA-Z]{24}",
    ),
    (
        "Square access token",
        "Square access token",
        r"sq0atp-[0-9A-Za-z_-]{22}",
    ),
    (
        "Square OAuth secret",
        "Square OAuth secret",
        r"sq0csp-[0-9A-Za-z_-]{43}",
    ),
    (
        "Twilio API key",
        "Twilio API key",
        r"(?i)twilio(.{0,20})?SK[0-9a-f]{32}",
    ),
    (
        "Dynatrace token",
        "Dynatrace token",
        r"dt0[a-zA-Z]{1}[0-9]{2}\.[A-Z0-9]{24}\.[A-Z0-9]{64}",
    ),
    (
        "Shopify shared secret",
        "Shopify shared secret",
        r"shpss_[a-fA-F0-9]{32}",
    ),
    (
        "Shopify access token",
        "Shopify access token",
        r"shpat_[a-fA-F0-9]{32}",
    ),
    (
        "Shopify custom app access token",
        "Shopify custom app access token",
        r"shpca_[a-fA-F0-9]{32}",
    ),
    (
        "Shopify private app access token",
        "Shopify private app access token",
        r"shppa_[a-fA-F0-9]{32}",
    ),
    (
        "PyPI upload token",
        "PyPI upload token",
        r"pypi-AgEIcHlwaS5vcmc[A-Za-z0-9_-]{50,1000}",
    ),
];
