//! Value checks that setters run after parsing.
//!
//! A check sees the parsed value and returns `Err(reason)` to reject it.
//!
//! ```
//! use paramset::setter::checks;
//!
//! let check = checks::between(1, 10);
//! assert!(check(&5).is_ok());
//! assert!(check(&11).is_err());
//! ```

use std::fmt::Display;
use std::time::Duration;

/// A check on a parsed value.
pub type Check<T> = Box<dyn Fn(&T) -> Result<(), String>>;

/// The value must be greater than `limit`.
pub fn gt<T: PartialOrd + Display + 'static>(limit: T) -> Check<T> {
    Box::new(move |v| {
        if *v > limit {
            Ok(())
        } else {
            Err(format!("the value ({v}) must be greater than {limit}"))
        }
    })
}

/// The value must be greater than or equal to `limit`.
pub fn ge<T: PartialOrd + Display + 'static>(limit: T) -> Check<T> {
    Box::new(move |v| {
        if *v >= limit {
            Ok(())
        } else {
            Err(format!("the value ({v}) must be at least {limit}"))
        }
    })
}

/// The value must be less than `limit`.
pub fn lt<T: PartialOrd + Display + 'static>(limit: T) -> Check<T> {
    Box::new(move |v| {
        if *v < limit {
            Ok(())
        } else {
            Err(format!("the value ({v}) must be less than {limit}"))
        }
    })
}

/// The value must be less than or equal to `limit`.
pub fn le<T: PartialOrd + Display + 'static>(limit: T) -> Check<T> {
    Box::new(move |v| {
        if *v <= limit {
            Ok(())
        } else {
            Err(format!("the value ({v}) must be at most {limit}"))
        }
    })
}

/// The value must lie in `lo..=hi`.
///
/// # Panics
///
/// Panics if `lo > hi`, which no value could satisfy.
pub fn between<T: PartialOrd + Display + 'static>(lo: T, hi: T) -> Check<T> {
    assert!(lo <= hi, "impossible check: lower bound {lo} exceeds upper bound {hi}");
    Box::new(move |v| {
        if *v >= lo && *v <= hi {
            Ok(())
        } else {
            Err(format!("the value ({v}) must be between {lo} and {hi}"))
        }
    })
}

/// The duration must lie in `lo..=hi`.
///
/// # Panics
///
/// Panics if `lo > hi`.
pub fn duration_between(lo: Duration, hi: Duration) -> Check<Duration> {
    assert!(lo <= hi, "impossible check: lower bound {lo:?} exceeds upper bound {hi:?}");
    Box::new(move |v| {
        if *v >= lo && *v <= hi {
            Ok(())
        } else {
            Err(format!("the duration ({v:?}) must be between {lo:?} and {hi:?}"))
        }
    })
}

/// The string must not be empty.
pub fn not_empty() -> Check<String> {
    Box::new(|v| {
        if v.is_empty() {
            Err("the value must not be empty".to_string())
        } else {
            Ok(())
        }
    })
}

/// The string's length in characters must lie in `lo..=hi`.
///
/// # Panics
///
/// Panics if `lo > hi`.
pub fn length_between(lo: usize, hi: usize) -> Check<String> {
    assert!(lo <= hi, "impossible check: minimum length {lo} exceeds maximum {hi}");
    Box::new(move |v| {
        let len = v.chars().count();
        if (lo..=hi).contains(&len) {
            Ok(())
        } else {
            Err(format!(
                "the length of the value ({len}) must be between {lo} and {hi}"
            ))
        }
    })
}

/// The list must have between `lo` and `hi` entries.
///
/// # Panics
///
/// Panics if `lo > hi`.
pub fn list_length_between<T: 'static>(lo: usize, hi: usize) -> Check<Vec<T>> {
    assert!(lo <= hi, "impossible check: minimum length {lo} exceeds maximum {hi}");
    Box::new(move |v| {
        if (lo..=hi).contains(&v.len()) {
            Ok(())
        } else {
            Err(format!(
                "the list has {} entries, it must have between {lo} and {hi}",
                v.len()
            ))
        }
    })
}

/// No entry may appear twice.
pub fn no_duplicates<T: PartialEq + Display + 'static>() -> Check<Vec<T>> {
    Box::new(|v| {
        for (i, item) in v.iter().enumerate() {
            if let Some(j) = v[..i].iter().position(|prior| prior == item) {
                return Err(format!(
                    "list entries {} and {} are both '{item}'",
                    j + 1,
                    i + 1
                ));
            }
        }
        Ok(())
    })
}
