/// Replace `${ENV_VAR}` placeholders in a raw config string.
///
/// Unresolvable or malformed placeholders are left as-is.
#[must_use]
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Implementation with injectable lookup, testable without touching the
/// process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push_str("${");
                        result.push_str(name);
                        result.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            _ => {
                // No closing brace (or empty name): emit literally and stop
                // scanning past this point.
                result.push_str("${");
                rest = after;
            },
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        (name == "LAPAK_TEST_VAR").then(|| "resolved".to_string())
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with("owner = \"${LAPAK_TEST_VAR}\"", lookup),
            "owner = \"resolved\""
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env_with("${LAPAK_MISSING_XYZ}", lookup),
            "${LAPAK_MISSING_XYZ}"
        );
    }

    #[test]
    fn handles_multiple_and_adjacent_placeholders() {
        assert_eq!(
            substitute_env_with("${LAPAK_TEST_VAR}${LAPAK_TEST_VAR}", lookup),
            "resolvedresolved"
        );
    }

    #[test]
    fn malformed_placeholder_is_literal() {
        assert_eq!(substitute_env_with("tail ${UNCLOSED", lookup), "tail ${UNCLOSED");
        assert_eq!(substitute_env_with("empty ${}", lookup), "empty ${}");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_env_with("plain text", lookup), "plain text");
    }
}
