//! Property-based tests for resolution order and attributes.

use proptest::prelude::*;

use crate::attributes::Attributes;
use crate::binding::Binding;
use crate::param::NamedOpts;
use crate::param_set::ParameterSet;
use crate::resolve::IgnoreErrors;
use crate::setter::IntSetter;
use crate::source::MapEnv;

fn set_with_env(vars: Vec<(String, String)>) -> ParameterSet {
    ParameterSet::builder()
        .program_name("prop")
        .error_handler(IgnoreErrors)
        .env_source(MapEnv::new(vars))
        .build()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // The argument list always beats the environment.
    #[test]
    fn arguments_override_environment(env_val in any::<i64>(), arg_val in any::<i64>()) {
        let n = Binding::new(0_i64);
        let mut ps = set_with_env(vec![("P_n".to_string(), env_val.to_string())]);
        ps.add_env_prefix("P_");
        ps.add_named("n", IntSetter::new(&n), "", NamedOpts::new());

        let arg = format!("-n={arg_val}");
        prop_assert!(ps.parse([arg]).is_empty());
        prop_assert_eq!(n.get(), arg_val);
        prop_assert_eq!(ps.named_param("n").unwrap().where_set().len(), 2);
    }

    // With SetOnlyOnce the first source read wins.
    #[test]
    fn set_only_once_first_wins(env_val in any::<i64>(), arg_val in any::<i64>()) {
        let n = Binding::new(0_i64);
        let mut ps = set_with_env(vec![("P_n".to_string(), env_val.to_string())]);
        ps.add_env_prefix("P_");
        ps.add_named(
            "n",
            IntSetter::new(&n),
            "",
            NamedOpts::new().attrs(Attributes::new().set_only_once()),
        );

        let arg = format!("-n={arg_val}");
        prop_assert!(ps.parse([arg]).is_empty());
        prop_assert_eq!(n.get(), env_val);
        prop_assert_eq!(ps.named_param("n").unwrap().where_set().len(), 1);
    }

    // Every unset MustBeSet parameter yields exactly one error.
    #[test]
    fn must_be_set_counts(required in prop::collection::vec(any::<bool>(), 1..12)) {
        let mut ps = set_with_env(Vec::new());
        let mut bindings = Vec::new();
        for (i, is_required) in required.iter().enumerate() {
            let b = Binding::new(0_i64);
            let attrs = if *is_required {
                Attributes::new().must_be_set()
            } else {
                Attributes::new()
            };
            ps.add_named(&format!("p{i}"), IntSetter::new(&b), "", NamedOpts::new().attrs(attrs));
            bindings.push(b);
        }

        let expected = required.iter().filter(|r| **r).count();
        prop_assert_eq!(ps.parse(Vec::<String>::new()).len(), expected);
    }
}
