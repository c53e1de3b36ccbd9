//! Text replies of the `pantry.cook_recipe` database function.
//!
//! ```text
//! SUCCESS: Recipe cooked
//! ERROR: NOT_FOUND
//! ERROR: ALREADY_USED
//! ERROR: INSUFFICIENT: [{"name":"Flour","required":"200","available":"100"}]
//! ```
//!
//! Anything else is a protocol failure.

use super::{CookReply, Shortfall};

pub const SUCCESS: &str = "SUCCESS: Recipe cooked";
pub const NOT_FOUND: &str = "ERROR: NOT_FOUND";
pub const ALREADY_USED: &str = "ERROR: ALREADY_USED";
pub const INSUFFICIENT_PREFIX: &str = "ERROR: INSUFFICIENT: ";

/// A reply that does not follow the protocol.
#[derive(thiserror::Error, Debug)]
pub enum WireError {
    #[error("unrecognized cook reply: {0}")]
    Unrecognized(String),

    #[error("malformed shortfall list: {0}")]
    MalformedShortfalls(#[from] serde_json::Error),

    #[error("insufficient reply without shortfalls")]
    EmptyShortfalls,
}

/// Parse a reply string.
///
/// # Errors
///
/// Returns a [`WireError`] for replies outside the protocol.
pub fn parse(reply: &str) -> Result<CookReply, WireError> {
    let reply = reply.trim();
    match reply {
        SUCCESS => Ok(CookReply::Cooked),
        NOT_FOUND => Ok(CookReply::NotFound),
        ALREADY_USED => Ok(CookReply::AlreadyUsed),
        _ => {
            let Some(json) = reply.strip_prefix(INSUFFICIENT_PREFIX) else {
                return Err(WireError::Unrecognized(truncate(reply)));
            };
            let shortfalls: Vec<Shortfall> = serde_json::from_str(json)?;
            if shortfalls.is_empty() {
                return Err(WireError::EmptyShortfalls);
            }
            Ok(CookReply::Insufficient(shortfalls))
        }
    }
}

/// Render a reply in wire form.
///
/// # Errors
///
/// Returns [`WireError::MalformedShortfalls`] if the shortfall list cannot be
/// serialized.
pub fn render(reply: &CookReply) -> Result<String, WireError> {
    Ok(match reply {
        CookReply::Cooked => SUCCESS.to_owned(),
        CookReply::NotFound => NOT_FOUND.to_owned(),
        CookReply::AlreadyUsed => ALREADY_USED.to_owned(),
        CookReply::Insufficient(shortfalls) => {
            format!("{INSUFFICIENT_PREFIX}{}", serde_json::to_string(shortfalls)?)
        }
    })
}

fn truncate(reply: &str) -> String {
    reply.chars().take(120).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_replies() {
        assert_eq!(parse("SUCCESS: Recipe cooked").unwrap(), CookReply::Cooked);
        assert_eq!(parse("ERROR: NOT_FOUND\n").unwrap(), CookReply::NotFound);
        assert_eq!(parse("ERROR: ALREADY_USED").unwrap(), CookReply::AlreadyUsed);
    }

    #[test]
    fn test_parse_insufficient_with_missing_ingredient() {
        let reply = r#"ERROR: INSUFFICIENT: [{"name":"Flour","required":"200","available":"100"},{"name":"Butter","required":"50","available":null}]"#;
        let CookReply::Insufficient(shortfalls) = parse(reply).unwrap() else {
            panic!("expected shortfalls");
        };
        assert_eq!(shortfalls.len(), 2);
        assert_eq!(shortfalls[0].available.unwrap().to_string(), "100");
        assert!(shortfalls[1].available.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_and_malformed() {
        assert!(matches!(parse("OK"), Err(WireError::Unrecognized(_))));
        assert!(matches!(
            parse("ERROR: INSUFFICIENT: not json"),
            Err(WireError::MalformedShortfalls(_))
        ));
        assert!(matches!(
            parse("ERROR: INSUFFICIENT: []"),
            Err(WireError::EmptyShortfalls)
        ));
    }

    #[test]
    fn test_rendered_insufficient_reply_parses_back() {
        let reply = CookReply::Insufficient(vec![Shortfall {
            name: "Flour".to_owned(),
            required: "200".parse().unwrap(),
            available: None,
        }]);
        let text = render(&reply).unwrap();
        assert!(text.starts_with(INSUFFICIENT_PREFIX));
        assert_eq!(parse(&text).unwrap(), reply);
    }
}
