//! Property-based tests for setters.
//!
//! The main property: a value rendered by `current_value` parses back to
//! the same state.

use std::time::Duration;

use proptest::prelude::*;

use super::{BoolSetter, DurationSetter, IntSetter, ListSetter, Setter, StringSetter};
use crate::binding::Binding;

fn round_trips<T, S>(setter_for: impl Fn(&Binding<T>) -> S, initial: T, value: &str) -> bool
where
    T: Clone + PartialEq,
    S: Setter,
{
    let first = Binding::new(initial.clone());
    let mut setter = setter_for(&first);
    if setter.set_with_val("p", value).is_err() {
        return true;
    }
    let Some(rendered) = setter.current_value() else {
        return true;
    };

    let second = Binding::new(initial);
    let mut again = setter_for(&second);
    again.set_with_val("p", &rendered).is_ok() && first.get() == second.get()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn int_round_trip(n in any::<i64>()) {
        prop_assert!(round_trips(IntSetter::new, 0, &n.to_string()));
    }

    #[test]
    fn int_rejects_leave_target(s in "[a-z]{1,8}") {
        let n = Binding::new(7_i64);
        let mut setter = IntSetter::new(&n);
        prop_assert!(setter.set_with_val("p", &s).is_err());
        prop_assert_eq!(n.get(), 7);
    }

    #[test]
    fn bool_round_trip(b in any::<bool>(), invert in any::<bool>()) {
        let make = |v: &Binding<bool>| if invert { BoolSetter::inverted(v) } else { BoolSetter::new(v) };
        prop_assert!(round_trips(make, false, &b.to_string()));
    }

    #[test]
    fn string_round_trip(s in ".{0,40}") {
        prop_assert!(round_trips(StringSetter::new, String::new(), &s));
    }

    #[test]
    fn duration_round_trip(secs in 0u64..1_000_000, nanos in 0u32..1_000_000_000) {
        let value = format!("{}ns", Duration::new(secs, nanos).as_nanos());
        prop_assert!(round_trips(DurationSetter::new, Duration::ZERO, &value));
    }

    #[test]
    fn int_list_round_trip(items in prop::collection::vec(any::<i32>(), 0..10)) {
        let value = items.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        prop_assert!(round_trips(ListSetter::<i32>::new, Vec::new(), &value));
    }
}
