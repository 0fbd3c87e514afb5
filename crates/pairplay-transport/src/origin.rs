//! Cross-origin policy for incoming connections.
//!
//! Browsers attach an `Origin` header to every WebSocket handshake. The
//! policy decides which origins may open a connection. The default,
//! [`OriginPolicy::Any`], accepts everything, including handshakes that
//! carry no `Origin` at all (non-browser clients).

/// Which `Origin` header values may open a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Accept every handshake.
    #[default]
    Any,

    /// Accept only handshakes whose `Origin` matches one of these values
    /// (ASCII case-insensitive). A missing `Origin` is rejected.
    AllowList(Vec<String>),
}

impl OriginPolicy {
    /// Builds a policy from a list of origins. An empty list (after
    /// dropping blank entries) means [`OriginPolicy::Any`].
    pub fn from_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list: Vec<String> = origins
            .into_iter()
            .map(|o| o.as_ref().trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if list.is_empty() {
            Self::Any
        } else {
            Self::AllowList(list)
        }
    }

    /// Returns `true` if a handshake with this `Origin` may proceed.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::AllowList(list) => match origin {
                Some(origin) => {
                    let origin = origin.trim_end_matches('/');
                    list.iter().any(|allowed| allowed.eq_ignore_ascii_case(origin))
                }
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_allows_missing_origin() {
        assert!(OriginPolicy::Any.allows(None));
        assert!(OriginPolicy::Any.allows(Some("https://evil.example")));
    }

    #[test]
    fn test_from_origins_empty_is_any() {
        assert_eq!(OriginPolicy::from_origins(Vec::<String>::new()), OriginPolicy::Any);
        // envy turns `PAIRPLAY_ALLOWED_ORIGINS=` into a single blank entry.
        assert_eq!(OriginPolicy::from_origins([""]), OriginPolicy::Any);
    }

    #[test]
    fn test_allow_list_matches_case_insensitively() {
        let policy = OriginPolicy::from_origins(["https://chess.example"]);
        assert!(policy.allows(Some("https://CHESS.example")));
        assert!(policy.allows(Some("https://chess.example/")));
        assert!(!policy.allows(Some("https://other.example")));
    }

    #[test]
    fn test_allow_list_rejects_missing_origin() {
        let policy = OriginPolicy::from_origins(["http://localhost:5173"]);
        assert!(!policy.allows(None));
    }
}
