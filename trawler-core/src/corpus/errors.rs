use super::Detector;
use std::sync::LazyLock;

pub static ERRORS: LazyLock<Vec<Detector>> =
    LazyLock::new(|| Detector::compile(ERROR_TABLE, "CWE-209"));

// (name, description, pattern)
const ERROR_TABLE: &[(&str, &str, &str)] = &[
    (
        "PHP error",
        "PHP runtime error or warning rendered into the page",
        r"(<b>(?:Warning|Fatal error|Parse error|Notice|Deprecated)</b>:|PHP (?:Warning|Fatal error|Parse error|Notice|Deprecated):)",
    ),
    (
        "Java stack trace",
        "Java exception or stack frame",
        r"(java\.(?:lang|io|sql|util)\.[A-Za-z]+(?:Exception|Error)|at [A-Za-z_$][\w$]*(?:\.[\w$<>]+)+\([\w$]+\.java:\d+\))",
    ),
    (
        "Python traceback",
        "Python traceback",
        r"Traceback \(most recent call last\):",
    ),
    (
        "Django debug page",
        "Django technical 500 page with DEBUG enabled",
        r"You're seeing this error because you have <code>DEBUG = True</code>",
    ),
    (
        "Ruby on Rails error",
        "Rails exception page",
        r"(ActionController::(?:RoutingError|UnknownFormat)|ActiveRecord::(?:RecordNotFound|StatementInvalid)|NoMethodError in [A-Z]\w*Controller)",
    ),
    (
        "ASP.NET error",
        "ASP.NET yellow screen of death",
        r"(Server Error in '[^']*' Application|System\.Web\.HttpException|\[HttpException \(0x[0-9A-Fa-f]+\))",
    ),
    (
        "Spring Boot error",
        "Spring Boot Whitelabel error page",
        r"Whitelabel Error Page",
    ),
    (
        "Apache Tomcat error",
        "Apache Tomcat error report",
        r"Apache Tomcat/\d+(?:\.\d+)+ - Error report",
    ),
    (
        "Node.js stack trace",
        "Node.js stack frame with a server side path",
        r"at [\w.<>]+ \((?:/|[A-Za-z]:\\)[^)\s]+\.(?:js|mjs|cjs|ts):\d+:\d+\)",
    ),
    (
        "Go panic",
        "Go runtime panic dump",
        r"goroutine \d+ \[running\]:",
    ),
    (
        "Laravel error",
        "Laravel or Whoops exception page",
        r"(Whoops, looks like something went wrong\.|Illuminate\\[A-Za-z\\]+Exception)",
    ),
    (
        "MySQL error",
        "MySQL error message",
        r"(?i)(You have an error in your SQL syntax|Warning: mysqli?_[a-z_]+\(|MySQLSyntaxErrorException|supplied argument is not a valid MySQL)",
    ),
    (
        "PostgreSQL error",
        "PostgreSQL error message",
        r"(PostgreSQL query failed|pg_query\(\): Query failed|org\.postgresql\.util\.PSQLException|ERROR:\s+syntax error at or near)",
    ),
    (
        "Microsoft SQL Server error",
        "Microsoft SQL Server error message",
        r"(Unclosed quotation mark after the character string|Microsoft OLE DB Provider for SQL Server|\[Microsoft\]\[ODBC SQL Server Driver\]|System\.Data\.SqlClient\.SqlException)",
    ),
    (
        "Oracle error",
        "Oracle database error code",
        r"\bORA-\d{5}\b",
    ),
    (
        "SQLite error",
        "SQLite error message",
        r"(SQLite3::(?:query|SQLException)|SQLITE_ERROR|sqlite3\.OperationalError)",
    ),
    (
        "ColdFusion error",
        "ColdFusion error page",
        r"(Error Occurred While Processing Request|coldfusion\.runtime\.[A-Za-z]+Exception)",
    ),
];
