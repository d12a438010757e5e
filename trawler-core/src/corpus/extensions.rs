use serde::{Deserialize, Serialize};

/// Semantic category of a file, keyed by URL extension.
///
/// Each category has a fixed level. A configured level `N` activates every
/// category whose level is `<= N`, so level 1 reports only key material and
/// level 7 reports everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    KeyMaterial,
    DatabaseDump,
    Config,
    Backup,
    Log,
    SourceCode,
    Document,
}

impl FileCategory {
    pub const ALL: [FileCategory; 7] = [
        FileCategory::KeyMaterial,
        FileCategory::DatabaseDump,
        FileCategory::Config,
        FileCategory::Backup,
        FileCategory::Log,
        FileCategory::SourceCode,
        FileCategory::Document,
    ];

    pub fn level(&self) -> u8 {
        match self {
            FileCategory::KeyMaterial => 1,
            FileCategory::DatabaseDump => 2,
            FileCategory::Config => 3,
            FileCategory::Backup => 4,
            FileCategory::Log => 5,
            FileCategory::SourceCode => 6,
            FileCategory::Document => 7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileCategory::KeyMaterial => "Key material",
            FileCategory::DatabaseDump => "Database dump",
            FileCategory::Config => "Configuration",
            FileCategory::Backup => "Backup / archive",
            FileCategory::Log => "Log",
            FileCategory::SourceCode => "Source code",
            FileCategory::Document => "Document / data",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileCategory::KeyMaterial => &[
                "pem", "key", "crt", "cer", "der", "p12", "pfx", "jks", "keystore", "ppk", "asc",
                "gpg", "pgp", "kdbx", "ovpn",
            ],
            FileCategory::DatabaseDump => &[
                "sql", "db", "sqlite", "sqlite3", "mdb", "accdb", "dump", "dmp", "bson", "rdb",
                "frm", "ibd", "dbf",
            ],
            FileCategory::Config => &[
                "env", "conf", "config", "cfg", "ini", "yml", "yaml", "toml", "properties",
                "htaccess", "htpasswd", "npmrc", "plist", "xsd", "wsdl",
            ],
            FileCategory::Backup => &[
                "bak", "backup", "old", "orig", "save", "swp", "tmp", "zip", "tar", "gz", "tgz",
                "bz2", "7z", "rar", "war", "jar",
            ],
            FileCategory::Log => &["log", "logs", "out", "err", "trace", "debug"],
            FileCategory::SourceCode => &[
                "php", "asp", "aspx", "jsp", "py", "rb", "java", "go", "rs", "c", "cpp", "cs",
                "sh", "bash", "ps1", "bat", "pl", "cgi", "ts", "vue",
            ],
            FileCategory::Document => &[
                "js", "map", "json", "xml", "csv", "txt", "pdf", "doc", "docx", "xls", "xlsx",
                "ppt", "pptx", "odt", "rtf", "md",
            ],
        }
    }

    /// Map a lowercase extension (without the dot) to its category.
    pub fn classify(extension: &str) -> Option<FileCategory> {
        FileCategory::ALL
            .into_iter()
            .find(|category| category.extensions().contains(&extension))
    }

    pub fn is_active(&self, level: u8) -> bool {
        self.level() <= level
    }
}
