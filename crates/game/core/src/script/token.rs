use crate::ecs::{EntityStore, access};
use crate::selector::stringify;

use super::{ScriptContext, ScriptError, ScriptValue};

/// Splits a line on whitespace, keeping `[...]` and `(...)` spans whole.
///
/// A span that is never closed runs to the end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in line.chars() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Substitutes `$name` and `$name[field.path]` references in place.
///
/// A bare reference is replaced by the bound value. With an accessor the
/// bound value must name an entity: `field` is read through the entity's
/// type and the remaining path walks into the field's data. Characters after
/// the reference (punctuation in card text) are kept. Unbound names are left
/// untouched.
pub fn bind(
    tokens: &mut [String],
    ctx: &ScriptContext,
    store: &EntityStore,
) -> Result<(), ScriptError> {
    for token in tokens.iter_mut() {
        let Some(reference) = token.strip_prefix('$') else {
            continue;
        };

        let name_len = reference
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(reference.len());
        let (name, rest) = reference.split_at(name_len);

        let Some(value) = ctx.get(name) else {
            continue;
        };

        let (accessor, suffix) = match rest.strip_prefix('[') {
            Some(inner) => match inner.find(']') {
                Some(close) => (Some(&inner[..close]), &inner[close + 1..]),
                None => (None, rest),
            },
            None => (None, rest),
        };

        // `none` has no fields to read and binds as itself
        let bound = match (accessor, value) {
            (None, _) | (Some(_), ScriptValue::None) => value.to_string(),
            (Some(accessor), _) => {
                let id = value.entity().ok_or_else(|| ScriptError::Binding {
                    token: token.clone(),
                    reason: format!("{value} is not an entity"),
                })?;

                let mut segments = accessor.split('.');
                let field = segments.next().unwrap_or_default();
                let path: Vec<&str> = segments.collect();

                let slot = store.field(id, field).map_err(|e| ScriptError::Binding {
                    token: token.clone(),
                    reason: e.to_string(),
                })?;
                let data = slot
                    .value()
                    .and_then(|value| access(value, &path))
                    .ok_or_else(|| ScriptError::Binding {
                        token: token.clone(),
                        reason: format!("entity {id} has no {accessor}"),
                    })?;

                stringify(data)
            }
        };

        *token = format!("{bound}{suffix}");
    }

    Ok(())
}
