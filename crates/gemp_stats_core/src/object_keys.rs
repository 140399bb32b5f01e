pub const DEFAULT_OBJECT_NAME: &str = "deck_archetype.json";
pub const DEFAULT_OBJECT_PREFIX: &str = "gemp-stats-";

/// How the destination object key is chosen for an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectNaming {
    Fixed { name: String },
    SinceDate { prefix: String },
}

impl Default for ObjectNaming {
    fn default() -> Self {
        Self::Fixed {
            name: DEFAULT_OBJECT_NAME.to_string(),
        }
    }
}

impl ObjectNaming {
    /// Resolves the object key. The date-derived variant uses the date part
    /// of `since` so the key always matches the query's lower bound.
    pub fn object_key(&self, since: &str) -> String {
        match self {
            Self::Fixed { name } => name.clone(),
            Self::SinceDate { prefix } => format!("{prefix}{}.json", since_date(since)),
        }
    }
}

/// Date component of a `since` value such as `2021-06-01 00:19` or
/// `2021-06-01T00:19:00`.
pub fn since_date(since: &str) -> &str {
    since
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or_default()
}

/// File name used for the local copy of an object key.
pub fn scratch_file_name(object_key: &str) -> String {
    object_key
        .trim_matches('/')
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            other => other,
        })
        .collect::<String>()
        .replace("..", "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_naming_ignores_since() {
        let naming = ObjectNaming::default();
        assert_eq!(naming.object_key("2024-02-10 08:00"), "deck_archetype.json");
    }

    #[test]
    fn since_date_naming_uses_query_bound_date() {
        let naming = ObjectNaming::SinceDate {
            prefix: DEFAULT_OBJECT_PREFIX.to_string(),
        };
        assert_eq!(
            naming.object_key("2021-06-01 00:19"),
            "gemp-stats-2021-06-01.json"
        );
        assert_eq!(
            naming.object_key("2022-11-30T23:59:59"),
            "gemp-stats-2022-11-30.json"
        );
    }

    #[test]
    fn scratch_file_name_stays_inside_scratch_dir() {
        assert_eq!(scratch_file_name("deck_archetype.json"), "deck_archetype.json");
        assert_eq!(
            scratch_file_name("gemp-stats-../../etc/passwd.json"),
            "gemp-stats-____etc_passwd.json"
        );
        assert_eq!(scratch_file_name("stats/2021.json"), "stats_2021.json");
    }
}
