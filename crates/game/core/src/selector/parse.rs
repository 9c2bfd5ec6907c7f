use super::{Constraints, Op, SelectorError};

const OPERATOR_CHARS: [char; 4] = ['!', '<', '>', '='];

fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

/// Splits `Type[...][...]` into the type name and its merged constraints.
pub(super) fn parse(input: &str) -> Result<(String, Option<Constraints>), SelectorError> {
    let trimmed = input.trim();
    let (name, mut rest) = trimmed.split_at(trimmed.find('[').unwrap_or(trimmed.len()));

    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(SelectorError::MissingType {
            input: input.to_string(),
        });
    }

    if rest.is_empty() {
        return Ok((name.to_string(), None));
    }

    let mut constraints = Constraints::new();
    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix('[') else {
            return Err(SelectorError::Trailing {
                input: input.to_string(),
                found: rest.to_string(),
            });
        };
        let close = body.find(']').ok_or_else(|| SelectorError::Unclosed {
            input: input.to_string(),
        })?;

        for part in body[..close].split(',').map(str::trim) {
            if part.is_empty() {
                continue;
            }
            let (path, op, value) = constraint(part)?;
            constraints.insert(path, (op, value));
        }

        rest = body[close + 1..].trim_start();
    }

    Ok((name.to_string(), Some(constraints)))
}

/// Parses `field.path op value`, allowing spaces around the operator.
fn constraint(part: &str) -> Result<(String, Op, String), SelectorError> {
    let start = part
        .find(is_operator_char)
        .ok_or_else(|| SelectorError::MissingOperator {
            constraint: part.to_string(),
        })?;
    let len = part[start..]
        .find(|c: char| !is_operator_char(c))
        .unwrap_or(part.len() - start);

    let op_text = &part[start..start + len];
    let op = op_text
        .parse::<Op>()
        .map_err(|_| SelectorError::UnknownOperator {
            op: op_text.to_string(),
        })?;

    let field = part[..start].trim();
    if field.is_empty() {
        return Err(SelectorError::MissingField {
            constraint: part.to_string(),
        });
    }

    Ok((
        field.to_string(),
        op,
        part[start + len..].trim().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::Selector;
    use super::*;

    #[test]
    fn bare_type_has_no_constraints() {
        assert_eq!(parse("Property").unwrap(), ("Property".to_string(), None));
    }

    #[test]
    fn parses_every_operator() {
        for (text, op) in [
            ("=", Op::Eq),
            ("==", Op::EqEq),
            ("!=", Op::Ne),
            (">", Op::Gt),
            (">=", Op::Ge),
            ("<", Op::Lt),
            ("<=", Op::Le),
        ] {
            let (_, constraints) = parse(&format!("Player[balance{text}1500]")).unwrap();
            assert_eq!(
                constraints.unwrap()["balance"],
                (op, "1500".to_string()),
                "operator {text}"
            );
        }
    }

    #[test]
    fn merges_lists_and_repeated_brackets() {
        let (name, constraints) =
            parse("Player[balance >= 10, data.jailed=false][position<5]").unwrap();
        let constraints = constraints.unwrap();

        assert_eq!(name, "Player");
        assert_eq!(constraints.len(), 3);
        assert_eq!(constraints["data.jailed"], (Op::Eq, "false".to_string()));
        assert_eq!(constraints["position"], (Op::Lt, "5".to_string()));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            parse("[a=1]"),
            Err(SelectorError::MissingType { .. })
        ));
        assert!(matches!(
            parse("Player[balance>1"),
            Err(SelectorError::Unclosed { .. })
        ));
        assert!(matches!(
            parse("Player[balance]"),
            Err(SelectorError::MissingOperator { .. })
        ));
        assert!(matches!(
            parse("Player[balance=>1]"),
            Err(SelectorError::UnknownOperator { .. })
        ));
        assert!(matches!(
            parse("Player[=1]"),
            Err(SelectorError::MissingField { .. })
        ));
        assert!(matches!(
            parse("Player[a=1]x"),
            Err(SelectorError::Trailing { .. })
        ));
    }

    #[test]
    fn union_of_selectors() {
        let selector = Selector::parse_all(["Property[group=France]", "Company"]).unwrap();
        let names: Vec<_> = selector.type_names().collect();
        assert_eq!(names, ["Company", "Property"]);
        assert_eq!(selector.to_string(), "Company Property[group=France]");
    }
}
