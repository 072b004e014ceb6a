use lambda_http::Error;

const TABLE_NAME_VAR: &str = "TABLE_NAME";

/// Process-wide settings, read once before the runtime starts serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) table_name: String,
}

impl Config {
    pub(crate) fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }

    pub(crate) fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        match lookup(TABLE_NAME_VAR) {
            Some(name) if !name.trim().is_empty() => Ok(Self::new(name)),
            _ => Err(Error::from(format!("{TABLE_NAME_VAR} not set"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_table_name() {
        let config = Config::from_lookup(|key| {
            (key == "TABLE_NAME").then(|| "demo_table".to_string())
        })
        .unwrap();
        assert_eq!(config, Config::new("demo_table"));
    }

    #[test]
    fn missing_table_name_is_an_error() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert_eq!(err.to_string(), "TABLE_NAME not set");
    }

    #[test]
    fn blank_table_name_is_an_error() {
        assert!(Config::from_lookup(|_| Some("  ".to_string())).is_err());
    }
}
