//! Coordinate arguments.

use super::{ArgumentType, ArgumentValue, invalid};
use crate::Token;
use async_trait::async_trait;
use emmy_core::Vector3;
use emmy_error::ArgumentResolutionError;
use regex::Regex;
use std::sync::LazyLock;

static COMPONENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").expect("Valid coordinate regex"));

/// Three coordinate components written as separate tokens (`x y z`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vector3Argument;

/// Three tokens forming an `x y z` coordinate.
pub fn vector3() -> Vector3Argument {
    Vector3Argument
}

fn parse(tokens: &[Token]) -> Option<Vector3> {
    let [x, y, z] = tokens else {
        return None;
    };
    let component = |token: &Token| {
        if COMPONENT_PATTERN.is_match(token.text()) {
            token.text().parse::<f64>().ok()
        } else {
            None
        }
    };
    Some(Vector3::at(component(x)?, component(y)?, component(z)?))
}

#[async_trait]
impl ArgumentType for Vector3Argument {
    fn type_name(&self) -> &'static str {
        "vector3"
    }

    fn token_count(&self) -> usize {
        3
    }

    fn validate(&self, tokens: &[Token]) -> bool {
        parse(tokens).is_some()
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        parse(tokens)
            .map(ArgumentValue::Vector3)
            .ok_or_else(|| invalid(argument, tokens, "three coordinates"))
    }

    fn examples(&self) -> Vec<String> {
        vec!["0 0 0".to_string(), "1.5 64 -20".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::tokens;

    #[tokio::test]
    async fn test_three_components() {
        let value = vector3()
            .resolve("position", &tokens("1.5 64 -20"))
            .await
            .unwrap();
        assert_eq!(value.as_vector3(), Some(Vector3::at(1.5, 64.0, -20.0)));
    }

    #[test]
    fn test_rejects_malformed_components() {
        assert!(!vector3().validate(&tokens("1 2")));
        assert!(!vector3().validate(&tokens("1 2 three")));
        assert!(!vector3().validate(&tokens("1e3 2 3")));
        assert!(!vector3().validate(&tokens("1 2 3 4")));
    }
}
