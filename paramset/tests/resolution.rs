//! Integration tests for resolving parameters from every source.
//!
//! Config files live in temporary directories; the environment is supplied
//! through `MapEnv` except in the tests marked `#[serial]`, which touch the
//! real process environment.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use paramset::resolve::AcceptRemainder;
use paramset::setter::{BoolSetter, IntSetter, NilSetter, StringSetter};
use paramset::source::ProcessEnv;
use paramset::{
    Attributes, Binding, ErrMap, Error, Existence, Location, NamedOpts, PositionalOpts, Source,
    Strictness,
};
use serial_test::serial;
use tempfile::TempDir;

use common::{builder, new_set, set_with_env, write_config, EnvGuard, PROG};

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_named_values_from_arguments() {
    let a = Binding::new(0_i64);
    let b = Binding::new(String::new());
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&a), "an int", NamedOpts::new());
    ps.add_named("b", StringSetter::new(&b), "a string", NamedOpts::new());

    let errors = ps.parse(["-a", "5", "-b=hi"]);

    assert!(errors.is_empty(), "{errors}");
    assert_eq!(a.get(), 5);
    assert_eq!(b.get(), "hi");
}

#[test]
fn test_mandatory_value_missing_at_end() {
    let a = Binding::new(0_i64);
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&a), "an int", NamedOpts::new());

    let errors = ps.parse(["-a"]);

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors.get("a")[0], Error::MissingValue { .. }));
    assert_eq!(a.get(), 0);
}

#[test]
fn test_lenient_config_file_records_unused() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "shared.cfg", "unknown-param = 1\na = 5\n");

    let a = Binding::new(0_i64);
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&a), "an int", NamedOpts::new());
    ps.add_config_file(&path, Existence::MustExist, Strictness::ParamNeedNotExist);

    let errors = ps.parse(Vec::<String>::new());

    assert!(errors.is_empty(), "{errors}");
    assert_eq!(a.get(), 5);
    let unused = &ps.unused()["unknown-param"];
    assert_eq!(unused, &[Location::ConfigFile { path, line: 1 }]);
}

#[test]
fn test_group_config_file_rejects_non_members() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "net.cfg", "port = 80\nname = x\n");

    let port = Binding::new(0_i64);
    let name = Binding::new(String::new());
    let mut ps = new_set();
    ps.add_group("net", "network settings");
    ps.add_named("port", IntSetter::new(&port), "", NamedOpts::new().group("net"));
    ps.add_named("name", StringSetter::new(&name), "", NamedOpts::new());
    ps.add_group_config_file("net", &path, Existence::MustExist);

    let errors = ps.parse(Vec::<String>::new());

    assert_eq!(errors.len(), 1);
    let err = &errors.get("name")[0];
    assert!(err.to_string().contains("not a member of group net"));
    assert_eq!(port.get(), 80);
    assert_eq!(name.get(), "");
}

#[test]
fn test_environment_prefix_maps_underscores() {
    let ab = Binding::new(0_i64);
    let mut ps = set_with_env(&[("XX_a_b", "7")]);
    ps.add_env_prefix("XX_");
    ps.add_named("a-b", IntSetter::new(&ab), "", NamedOpts::new());

    assert!(ps.parse(Vec::<String>::new()).is_empty());
    assert_eq!(ab.get(), 7);
    assert_eq!(
        ps.named_param("a-b").unwrap().where_set(),
        &[Location::Environment {
            variable: "XX_a_b".to_string()
        }]
    );
}

#[test]
fn test_unknown_prefixed_variable_is_unused_not_an_error() {
    let a = Binding::new(0_i64);
    let mut ps = set_with_env(&[("XX_nope", "1"), ("XX_a", "2")]);
    ps.add_env_prefix("XX_");
    ps.add_named("a", IntSetter::new(&a), "", NamedOpts::new());

    let errors = ps.parse(Vec::<String>::new());

    assert!(errors.is_empty(), "{errors}");
    assert_eq!(a.get(), 2);
    assert_eq!(
        ps.unused()["nope"],
        vec![Location::Environment {
            variable: "XX_nope".to_string()
        }]
    );
}

// ============================================================================
// Precedence and attributes
// ============================================================================

#[test]
fn test_later_sources_override_earlier() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "a.cfg", "a = 1\n");

    let a = Binding::new(0_i64);
    let mut ps = set_with_env(&[("T_a", "2")]);
    ps.add_env_prefix("T_");
    ps.add_named("a", IntSetter::new(&a), "", NamedOpts::new());
    ps.add_config_file(&path, Existence::MustExist, Strictness::ParamMustExist);

    assert!(ps.parse(["-a=3"]).is_empty());
    assert_eq!(a.get(), 3);

    let sources: Vec<Source> = ps
        .named_param("a")
        .unwrap()
        .where_set()
        .iter()
        .map(Location::source)
        .collect();
    assert_eq!(
        sources,
        vec![Source::ConfigFile, Source::Environment, Source::CommandLine]
    );
}

#[test]
fn test_group_config_files_read_before_global_ones() {
    let dir = TempDir::new().unwrap();
    let global = write_config(dir.path(), "global.cfg", "a = 2\n");
    let group = write_config(dir.path(), "group.cfg", "a = 1\n");

    let a = Binding::new(0_i64);
    let mut ps = new_set();
    ps.add_group("g", "a group");
    ps.add_named("a", IntSetter::new(&a), "", NamedOpts::new().group("g"));
    ps.add_config_file(&global, Existence::MustExist, Strictness::ParamMustExist);
    ps.add_group_config_file("g", &group, Existence::MustExist);

    assert!(ps.parse(Vec::<String>::new()).is_empty());
    assert_eq!(a.get(), 2);
    assert_eq!(
        ps.named_param("a").unwrap().where_set(),
        &[
            Location::ConfigFile {
                path: group,
                line: 1
            },
            Location::ConfigFile {
                path: global,
                line: 1
            },
        ]
    );
}

#[test]
fn test_set_only_once_keeps_first_value() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "a.cfg", "a = 1\n");

    let a = Binding::new(0_i64);
    let mut ps = new_set();
    ps.add_named(
        "a",
        IntSetter::new(&a),
        "",
        NamedOpts::new()
            .alt_names(["alpha"])
            .attrs(Attributes::new().set_only_once()),
    );
    ps.add_config_file(&path, Existence::MustExist, Strictness::ParamMustExist);

    assert!(ps.parse(["-alpha", "3"]).is_empty());
    assert_eq!(a.get(), 1);
    assert_eq!(ps.named_param("a").unwrap().where_set().len(), 1);
}

#[test]
fn test_must_be_set_one_error_each() {
    let a = Binding::new(0_i64);
    let b = Binding::new(String::new());
    let c = Binding::new(false);
    let mut ps = new_set();
    let required = || NamedOpts::new().attrs(Attributes::new().must_be_set());
    ps.add_named("a", IntSetter::new(&a), "", required());
    ps.add_named("b", StringSetter::new(&b), "", required());
    ps.add_named("c", BoolSetter::new(&c), "", NamedOpts::new());

    let errors = ps.parse(Vec::<String>::new());

    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.get("a"),
        &[Error::MustBeSet {
            name: "a".to_string()
        }]
    );
    assert_eq!(errors.get("b").len(), 1);
}

#[test]
fn test_command_line_only_rejected_from_environment() {
    let a = Binding::new(0_i64);
    let mut ps = set_with_env(&[("T_a", "9")]);
    ps.add_env_prefix("T_");
    ps.add_named(
        "a",
        IntSetter::new(&a),
        "",
        NamedOpts::new().attrs(Attributes::new().command_line_only()),
    );

    let errors = ps.parse(Vec::<String>::new());

    assert!(matches!(errors.get("a")[0], Error::CommandLineOnly { .. }));
    assert_eq!(a.get(), 0);
}

// ============================================================================
// Argument errors
// ============================================================================

#[test]
fn test_unknown_argument_suggests_close_names() {
    let v = Binding::new(false);
    let mut ps = new_set();
    ps.add_named("verbose", BoolSetter::new(&v), "", NamedOpts::new());

    let errors = ps.parse(["--verbos"]);

    match &errors.get("verbos")[0] {
        Error::UnknownParameter { suggestions, .. } => {
            assert_eq!(suggestions, &vec!["verbose".to_string()]);
        }
        other => panic!("expected unknown parameter, got {other:?}"),
    }
}

#[test]
fn test_bad_value_leaves_target_untouched() {
    let a = Binding::new(4_i64);
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&a), "", NamedOpts::new());

    let errors = ps.parse(["-a=four"]);

    assert!(matches!(errors.get("a")[0], Error::BadValue { .. }));
    assert_eq!(a.get(), 4);
    assert!(!ps.named_param("a").unwrap().has_been_set());
}

#[test]
fn test_value_given_to_valueless_parameter() {
    let mut ps = new_set();
    ps.add_named("n", NilSetter, "", NamedOpts::new());

    let errors = ps.parse(["-n=1"]);

    assert!(matches!(
        &errors.get("n")[0],
        Error::UnexpectedValue { value, .. } if value == "1"
    ));
}

#[test]
fn test_argument_without_dash() {
    let mut ps = new_set();
    ps.add_named("n", NilSetter, "", NamedOpts::new());

    let errors = ps.parse(["stray", "-n"]);

    assert!(matches!(errors.get("")[0], Error::MissingDash { .. }));
    assert!(ps.named_param("n").unwrap().has_been_set());
}

#[test]
fn test_second_parse_is_an_error() {
    let mut ps = new_set();
    assert!(ps.parse(Vec::<String>::new()).is_empty());

    let errors = ps.parse(["-x"]);

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors.get("")[0], Error::AlreadyParsed { .. }));
    assert!(ps.has_been_parsed());
}

// ============================================================================
// Positional parameters and the remainder
// ============================================================================

#[test]
fn test_positional_then_named() {
    let src = Binding::new(String::new());
    let dst = Binding::new(String::new());
    let v = Binding::new(false);
    let mut ps = new_set();
    ps.add_positional("src", StringSetter::new(&src), "", PositionalOpts::new());
    ps.add_positional("dst", StringSetter::new(&dst), "", PositionalOpts::new());
    ps.add_named("v", BoolSetter::new(&v), "", NamedOpts::new());

    assert!(ps.parse(["in.txt", "-out.txt", "-v"]).is_empty());
    assert_eq!(src.get(), "in.txt");
    assert_eq!(dst.get(), "-out.txt");
    assert!(v.get());
}

#[test]
fn test_missing_positional_keyed_by_first_missing() {
    let src = Binding::new(String::new());
    let dst = Binding::new(String::new());
    let mut ps = new_set();
    ps.add_positional("src", StringSetter::new(&src), "", PositionalOpts::new());
    ps.add_positional("dst", StringSetter::new(&dst), "", PositionalOpts::new());

    let errors = ps.parse(["in.txt"]);

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors.get("dst")[0],
        Error::MissingPositional { count: 1, names, .. } if names == &vec!["dst".to_string()]
    ));
    assert_eq!(src.get(), "");
}

#[test]
fn test_terminal_positional_leaves_remainder() {
    let cmd = Binding::new(String::new());
    let mut ps = builder().remainder_handler(AcceptRemainder).build();
    ps.add_positional("cmd", StringSetter::new(&cmd), "", PositionalOpts::new().terminal());

    assert!(ps.parse(["run", "-x", "--", "y"]).is_empty());
    assert_eq!(cmd.get(), "run");
    assert_eq!(ps.remainder(), &["-x", "--", "y"]);
}

#[test]
fn test_unexpected_remainder_rejected_by_default() {
    let mut ps = new_set();
    ps.add_named("n", NilSetter, "", NamedOpts::new());

    let errors = ps.parse(["-n", "--", "extra"]);

    assert!(matches!(
        &errors.get("")[0],
        Error::UnexpectedRemainder { args, .. } if args == &vec!["extra".to_string()]
    ));
}

#[test]
fn test_remainder_handler_closure() {
    let seen = Rc::new(Cell::new(0));
    let seen_in_handler = Rc::clone(&seen);
    let mut ps = builder()
        .terminal_param("---")
        .remainder_handler(
            move |rest: &[String], _: Option<&Location>, errors: &mut ErrMap| {
                seen_in_handler.set(rest.len());
                if rest.len() > 1 {
                    errors.add(
                        "",
                        Error::FinalCheck {
                            message: "one subcommand at most".to_string(),
                        },
                    );
                }
            },
        )
        .build();

    let errors = ps.parse(["---", "a", "b"]);

    assert_eq!(seen.get(), 2);
    assert_eq!(errors.len(), 1);
}

// ============================================================================
// Config files
// ============================================================================

#[test]
fn test_missing_optional_config_file_is_fine() {
    let dir = TempDir::new().unwrap();
    let mut ps = new_set();
    ps.add_config_file(
        dir.path().join("absent.cfg"),
        Existence::Optional,
        Strictness::ParamMustExist,
    );
    assert!(ps.parse(Vec::<String>::new()).is_empty());
}

#[test]
fn test_missing_required_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let mut ps = new_set();
    ps.add_config_file(
        dir.path().join("absent.cfg"),
        Existence::MustExist,
        Strictness::ParamMustExist,
    );

    let errors = ps.parse(Vec::<String>::new());

    assert!(matches!(errors.get("")[0], Error::ConfigFileIo { .. }));
}

#[test]
fn test_program_specific_lines() {
    let dir = TempDir::new().unwrap();
    let content = format!("{PROG}/a = 5\nother/b = 1\n{PROG}, other / zz = 2\n");
    let path = write_config(dir.path(), "shared.cfg", &content);

    let a = Binding::new(0_i64);
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&a), "", NamedOpts::new());
    ps.add_config_file(&path, Existence::MustExist, Strictness::ParamNeedNotExist);

    let errors = ps.parse(Vec::<String>::new()).clone();

    assert_eq!(a.get(), 5);
    assert!(ps.unused().contains_key("b"));
    // a line naming this program is strict even in a shared file
    assert!(matches!(errors.get("zz")[0], Error::UnknownParameter { .. }));
}

#[test]
fn test_strict_config_file_rejects_unknown_names() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "a.cfg", "// settings\nnope = 1\n");

    let mut ps = new_set();
    ps.add_config_file(&path, Existence::MustExist, Strictness::ParamMustExist);

    let errors = ps.parse(Vec::<String>::new());

    let err = &errors.get("nope")[0];
    assert_eq!(err.location(), Some(&Location::ConfigFile { path, line: 2 }));
}

#[test]
fn test_include_directive() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "common.cfg", "b = from-include\n");
    let path = write_config(dir.path(), "main.cfg", "a = 1\n#include common.cfg\n");

    let a = Binding::new(0_i64);
    let b = Binding::new(String::new());
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&a), "", NamedOpts::new());
    ps.add_named("b", StringSetter::new(&b), "", NamedOpts::new());
    ps.add_config_file(&path, Existence::MustExist, Strictness::ParamMustExist);

    assert!(ps.parse(Vec::<String>::new()).is_empty());
    assert_eq!(a.get(), 1);
    assert_eq!(b.get(), "from-include");
}

#[test]
fn test_config_file_param_read_in_place() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "p.cfg", "a = 2\n");
    let path_str = path.to_str().unwrap();

    let a = Binding::new(0_i64);
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&a), "", NamedOpts::new());
    ps.add_config_file_param("params", "read more parameters from a file");
    assert!(ps.parse(["-params", path_str, "-a", "3"]).is_empty());
    assert_eq!(a.get(), 3);

    let b = Binding::new(0_i64);
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&b), "", NamedOpts::new());
    ps.add_config_file_param("params", "read more parameters from a file");
    assert!(ps.parse(["-a", "3", "-params", path_str]).is_empty());
    assert_eq!(b.get(), 2);
}

#[test]
fn test_config_file_param_given_twice() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "p.cfg", "a = 2\n");
    let path_str = path.to_str().unwrap();

    let a = Binding::new(0_i64);
    let mut ps = new_set();
    ps.add_named("a", IntSetter::new(&a), "", NamedOpts::new());
    ps.add_config_file_param("params", "");

    let errors = ps.parse(["-params", path_str, "-params", path_str]);

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors.get("")[0],
        Error::DuplicateConfigFile { location: Some(_), .. }
    ));
}

// ============================================================================
// Checks and actions
// ============================================================================

#[test]
fn test_final_check_sees_resolved_values() {
    let lo = Binding::new(0_i64);
    let hi = Binding::new(10_i64);
    let mut ps = new_set();
    ps.add_named("lo", IntSetter::new(&lo), "", NamedOpts::new());
    ps.add_named("hi", IntSetter::new(&hi), "", NamedOpts::new());
    let (lo_c, hi_c) = (lo.clone(), hi.clone());
    ps.add_final_check(move || {
        if lo_c.get() > hi_c.get() {
            Err(format!("lo ({}) is above hi ({})", lo_c.get(), hi_c.get()))
        } else {
            Ok(())
        }
    });

    let errors = ps.parse(["-lo=20"]);

    assert_eq!(
        errors.get(""),
        &[Error::FinalCheck {
            message: "lo (20) is above hi (10)".to_string()
        }]
    );
}

#[test]
fn test_post_actions_run_after_each_assignment() {
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let mut ps = new_set();
    ps.add_named(
        "tick",
        NilSetter,
        "",
        NamedOpts::new().post_action(move |_, _| {
            counter.set(counter.get() + 1);
            if counter.get() > 2 {
                Err("too many ticks".to_string())
            } else {
                Ok(())
            }
        }),
    );

    let errors = ps.parse(["-tick", "-tick", "-tick"]);

    assert_eq!(count.get(), 3);
    assert_eq!(errors.get("tick").len(), 1);
    assert_eq!(ps.named_param("tick").unwrap().where_set().len(), 3);
}

#[test]
#[should_panic(expected = "unknown parameter 'nothere'")]
fn test_unknown_see_also_panics_at_parse() {
    let mut ps = new_set();
    ps.add_named("a", NilSetter, "", NamedOpts::new().see_also("nothere"));
    let _ = ps.parse(Vec::<String>::new());
}

// ============================================================================
// Process environment
// ============================================================================

#[test]
#[serial]
fn test_process_environment() {
    let _guard = EnvGuard::new("PSTEST_level", "4");
    let _flag = EnvGuard::new("PSTEST_quiet", "");

    let level = Binding::new(0_i64);
    let quiet = Binding::new(false);
    let mut ps = builder().env_source(ProcessEnv).build();
    ps.add_env_prefix("PSTEST_");
    ps.add_named("level", IntSetter::new(&level), "", NamedOpts::new());
    ps.add_named("quiet", BoolSetter::new(&quiet), "", NamedOpts::new());

    assert!(ps.parse(Vec::<String>::new()).is_empty());
    assert_eq!(level.get(), 4);
    assert!(quiet.get());
}
