//! Name syntax rules for parameters and groups.

/// Checks a parameter name.
///
/// A name starts with a letter and continues with letters, digits, `-` or
/// `_`.
///
/// # Errors
///
/// Returns a description of the first problem found.
///
/// # Examples
///
/// ```
/// use paramset::param::validate_param_name;
///
/// assert!(validate_param_name("dry-run").is_ok());
/// assert!(validate_param_name("-dry-run").is_err());
/// assert!(validate_param_name("2fast").is_err());
/// ```
pub fn validate_param_name(name: &str) -> Result<(), String> {
    validate(name, "parameter", |c| c == '-' || c == '_')
}

/// Checks a group name.
///
/// Group names follow the parameter rules and may also contain `.`.
///
/// # Errors
///
/// Returns a description of the first problem found.
pub fn validate_group_name(name: &str) -> Result<(), String> {
    validate(name, "group", |c| c == '-' || c == '_' || c == '.')
}

fn validate(name: &str, what: &str, extra: impl Fn(char) -> bool) -> Result<(), String> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(format!("the {what} name is empty"));
    };
    if first == '-' {
        return Err(format!("the {what} name '{name}' starts with '-'"));
    }
    if !first.is_ascii_alphabetic() {
        return Err(format!("the {what} name '{name}' does not start with a letter"));
    }
    if let Some(bad) = chars.find(|&c| !(c.is_ascii_alphanumeric() || extra(c))) {
        return Err(format!(
            "the {what} name '{name}' contains an invalid character '{bad}'"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_param_names() {
        for name in ["a", "verbose", "dry-run", "max_len", "x2"] {
            assert!(validate_param_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_param_names() {
        assert!(validate_param_name("").unwrap_err().contains("empty"));
        assert!(validate_param_name("--a").unwrap_err().contains("starts with '-'"));
        assert!(validate_param_name("_a").unwrap_err().contains("letter"));
        assert!(validate_param_name("a=b").unwrap_err().contains("'='"));
        assert!(validate_param_name("a.b").is_err());
        assert!(validate_param_name("a b").is_err());
    }

    #[test]
    fn test_group_names_allow_dots() {
        assert!(validate_group_name("pkg.net").is_ok());
        assert!(validate_group_name(".net").is_err());
    }
}
