//! Raw argument scanning done before the full option set is known.
//!
//! The options of `use` depend on the chosen providers, so the provider
//! positional and `--idp-protocol` are read from the raw arguments first.

/// First positional argument, skipping options and the values of
/// `value_flags` given as separate tokens. Everything after `--` is
/// positional.
pub fn find_positional<'a>(args: &'a [String], value_flags: &[&str]) -> Option<&'a str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--" {
            return iter.next().map(String::as_str);
        }
        match arg.strip_prefix("--") {
            Some(flag) => {
                if !flag.contains('=') && value_flags.contains(&flag) {
                    iter.next();
                }
            }
            None if arg.starts_with('-') && arg.len() > 1 => {}
            None => return Some(arg),
        }
    }
    None
}

/// Value of `--<name>`, given either as `--name=value` or `--name value`.
pub fn find_flag_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{}", name);
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }
        if *arg == long {
            return iter.next().cloned();
        }
        if let Some(value) = arg
            .strip_prefix(long.as_str())
            .and_then(|rest| rest.strip_prefix('='))
        {
            return Some(value.to_string());
        }
    }
    None
}

/// Whether `-h` or `--help` appears before any `--`.
pub fn wants_help(args: &[String]) -> bool {
    args.iter()
        .take_while(|a| *a != "--")
        .any(|a| a == "-h" || a == "--help")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_first() {
        let args = args(&["eks", "--idp-protocol", "saml"]);
        assert_eq!(find_positional(&args, &["idp-protocol"]), Some("eks"));
    }

    #[test]
    fn test_positional_after_value_flag() {
        let args = args(&["--idp-protocol", "saml", "--set-current=false", "aks"]);
        assert_eq!(find_positional(&args, &["idp-protocol"]), Some("aks"));
    }

    #[test]
    fn test_positional_after_equals_flag() {
        let args = args(&["--idp-protocol=saml", "eks"]);
        assert_eq!(find_positional(&args, &["idp-protocol"]), Some("eks"));
    }

    #[test]
    fn test_positional_missing() {
        assert_eq!(find_positional(&args(&["--alias", "dev"]), &["alias"]), None);
        assert_eq!(find_positional(&args(&[]), &[]), None);
    }

    #[test]
    fn test_positional_after_double_dash() {
        let args = args(&["--", "-odd"]);
        assert_eq!(find_positional(&args, &[]), Some("-odd"));
    }

    #[test]
    fn test_flag_value_forms() {
        assert_eq!(
            find_flag_value(&args(&["eks", "--idp-protocol=saml"]), "idp-protocol"),
            Some("saml".to_string())
        );
        assert_eq!(
            find_flag_value(&args(&["eks", "--idp-protocol", "empty"]), "idp-protocol"),
            Some("empty".to_string())
        );
        assert_eq!(
            find_flag_value(&args(&["eks", "--idp-protocol"]), "idp-protocol"),
            None
        );
        assert_eq!(
            find_flag_value(&args(&["eks", "--idp-protocolx=saml"]), "idp-protocol"),
            None
        );
    }

    #[test]
    fn test_wants_help() {
        assert!(wants_help(&args(&["eks", "--help"])));
        assert!(wants_help(&args(&["-h"])));
        assert!(!wants_help(&args(&["eks", "--", "--help"])));
    }
}
