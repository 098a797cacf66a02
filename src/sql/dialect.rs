use serde::{Deserialize, Deserializer, Serialize, de};
use strum::{EnumString, IntoStaticStr};

use crate::plan::Value;


/// SQL flavour used when rendering delete statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Dialect {
    #[default]
    #[strum(to_string = "postgres", serialize = "postgresql", serialize = "pg")]
    Postgres,
    #[strum(to_string = "mysql", serialize = "mariadb")]
    MySql,
    #[strum(to_string = "sqlite", serialize = "sqlite3")]
    Sqlite,
}

impl Dialect {
    pub fn quote_ident(self, ident: &str) -> String {
        match self {
            Self::MySql => format!("`{}`", ident.replace('`', "``")),
            Self::Postgres | Self::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    /// Placeholder for the `index`-th bound parameter (1-based).
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${}", index),
            Self::MySql | Self::Sqlite => "?".to_string(),
        }
    }

    /// Inline literal form, used only for explain output.
    pub fn literal(self, value: &Value) -> String {
        match value {
            Value::Int(n) => n.to_string(),
            Value::Text(s) => match self {
                Self::MySql => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''")),
                Self::Postgres | Self::Sqlite => format!("'{}'", s.replace('\'', "''")),
            },
        }
    }
}

/// Accepts the same aliases as `FromStr`, case-insensitively.
impl<'de> Deserialize<'de> for Dialect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| de::Error::custom(format!("unknown SQL dialect: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_aliases() {
        assert_eq!("pg".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_dialect_deserialize_aliases() {
        let dialect: Dialect = serde_json::from_str(r#""PG""#).unwrap();
        assert_eq!(dialect, Dialect::Postgres);
        let dialect: Dialect = serde_json::from_str(r#""sqlite3""#).unwrap();
        assert_eq!(dialect, Dialect::Sqlite);
        assert_eq!(serde_json::to_string(&Dialect::MySql).unwrap(), r#""mysql""#);
        assert!(serde_json::from_str::<Dialect>(r#""oracle""#).is_err());
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(Dialect::Postgres.quote_ident("authorId"), "\"authorId\"");
        assert_eq!(Dialect::Postgres.quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(Dialect::MySql.quote_ident("authorId"), "`authorId`");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Postgres.placeholder(3), "$3");
        assert_eq!(Dialect::MySql.placeholder(3), "?");
        assert_eq!(Dialect::Sqlite.placeholder(1), "?");
    }

    #[test]
    fn test_literals() {
        assert_eq!(Dialect::Postgres.literal(&Value::Int(42)), "42");
        assert_eq!(Dialect::Postgres.literal(&Value::from("o'brien")), "'o''brien'");
        assert_eq!(Dialect::MySql.literal(&Value::from("a\\b")), "'a\\\\b'");
    }
}
