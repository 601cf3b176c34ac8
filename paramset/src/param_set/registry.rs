//! Registration. Every mistake here is a programmer error and panics.

use std::path::Path;

use super::{ParameterSet, ParseState};
use crate::attributes::Attributes;
use crate::error::Error;
use crate::filecheck::{self, Existence};
use crate::param::{
    validate_group_name, validate_param_name, Group, NamedOpts, NamedParameter, PositionalOpts,
    PositionalParameter, DEFAULT_GROUP,
};
use crate::setter::{ConfigFileSetter, Setter, ValueReq};
use crate::source::{ConfigFileSpec, Strictness};

impl ParameterSet {
    fn assert_registering(&self, what: &str) {
        if let ParseState::Parsed { first_call } = &self.state {
            panic!("cannot add {what}: parameters were already parsed at {first_call}");
        }
    }

    fn has_terminal_positional(&self) -> bool {
        self.positional.iter().any(|p| p.terminal)
    }

    fn assert_name_free(&self, name: &str) {
        if let Some(&idx) = self.by_name.get(name) {
            panic!(
                "the name '{name}' is already used by parameter '{}'",
                self.named[idx].name()
            );
        }
        assert!(
            !self.positional.iter().any(|p| p.name == name),
            "the name '{name}' is already used by a positional parameter"
        );
    }

    /// Registers a named parameter.
    ///
    /// The parameter joins the group given in `opts`, or [`DEFAULT_GROUP`];
    /// the group is created if needed. The setter's value at this point is
    /// kept as the parameter's initial value.
    ///
    /// # Panics
    ///
    /// Panics if a name is malformed or already taken, if the setter is
    /// invalid, if a terminal positional parameter exists, or if the set
    /// has already been parsed.
    pub fn add_named(
        &mut self,
        name: &str,
        setter: impl Setter + 'static,
        description: &str,
        opts: NamedOpts,
    ) -> &NamedParameter {
        self.assert_registering(&format!("parameter '{name}'"));
        assert!(
            !self.has_terminal_positional(),
            "cannot add parameter '{name}': a terminal positional parameter takes every argument"
        );

        let mut names = Vec::with_capacity(1 + opts.alt_names.len());
        names.push(name.to_string());
        names.extend(opts.alt_names);
        for (i, n) in names.iter().enumerate() {
            if let Err(reason) = validate_param_name(n) {
                panic!("parameter '{name}': {reason}");
            }
            assert!(
                !names[..i].contains(n),
                "parameter '{name}': the name '{n}' is given twice"
            );
            self.assert_name_free(n);
        }

        let group = opts.group.unwrap_or_else(|| DEFAULT_GROUP.to_string());
        if let Err(reason) = validate_group_name(&group) {
            panic!("parameter '{name}': {reason}");
        }

        setter.check_setter(name);

        let idx = self.named.len();
        self.groups
            .entry(group.clone())
            .or_insert_with(|| Group::new(&group, "", false))
            .members
            .push(name.to_string());
        for n in &names {
            self.by_name.insert(n.clone(), idx);
        }

        self.named.push(NamedParameter {
            initial_value: setter.current_value(),
            names,
            setter: Box::new(setter),
            attributes: opts.attributes,
            group,
            description: description.to_string(),
            where_set: Vec::new(),
            post_actions: opts.post_actions,
            see_also: opts.see_also,
        });
        &self.named[idx]
    }

    /// Registers the next positional parameter.
    ///
    /// # Panics
    ///
    /// Panics if the name is malformed or taken, if the setter takes no
    /// value, if a terminal positional parameter already exists, if this
    /// one is terminal while named parameters exist, or if the set has
    /// already been parsed.
    pub fn add_positional(
        &mut self,
        name: &str,
        setter: impl Setter + 'static,
        description: &str,
        opts: PositionalOpts,
    ) -> &PositionalParameter {
        self.assert_registering(&format!("positional parameter '{name}'"));
        if let Err(reason) = validate_param_name(name) {
            panic!("positional parameter '{name}': {reason}");
        }
        self.assert_name_free(name);
        assert!(
            setter.value_req() != ValueReq::None,
            "positional parameter '{name}' must take a value"
        );
        assert!(
            !self.has_terminal_positional(),
            "cannot add positional parameter '{name}' after the terminal positional parameter"
        );
        assert!(
            !opts.terminal || self.named.is_empty(),
            "positional parameter '{name}' cannot be terminal: named parameters exist"
        );

        setter.check_setter(name);

        let index = self.positional.len();
        self.positional.push(PositionalParameter {
            name: name.to_string(),
            setter: Box::new(setter),
            description: description.to_string(),
            terminal: opts.terminal,
            index,
        });
        &self.positional[index]
    }

    /// Describes a group.
    ///
    /// Groups are also created, undescribed, by the first parameter that
    /// joins them; describing such a group later is allowed.
    ///
    /// # Panics
    ///
    /// Panics if the name is malformed, if the group was already described,
    /// or if the set has already been parsed.
    pub fn add_group(&mut self, name: &str, description: &str) -> &Group {
        self.assert_registering(&format!("group '{name}'"));
        if let Err(reason) = validate_group_name(name) {
            panic!("{reason}");
        }

        let group = self
            .groups
            .entry(name.to_string())
            .or_insert_with(|| Group::new(name, "", false));
        assert!(!group.described, "group '{name}' has already been described");
        group.description = description.to_string();
        group.described = true;
        group
    }

    /// Replaces the global config files with `path`.
    ///
    /// # Panics
    ///
    /// As for [`add_config_file`](Self::add_config_file).
    pub fn set_config_file(
        &mut self,
        path: impl AsRef<Path>,
        existence: Existence,
        strictness: Strictness,
    ) {
        self.assert_registering("a config file");
        self.config_files.clear();
        self.add_config_file(path, existence, strictness);
    }

    /// Appends a global config file; files are read in the order added.
    ///
    /// A leading `~` is expanded. Adding the same file twice records a
    /// [`Error::DuplicateConfigFile`] under the empty name.
    ///
    /// # Panics
    ///
    /// Panics if `existence` is [`Existence::MustNotExist`] or if the set
    /// has already been parsed.
    pub fn add_config_file(
        &mut self,
        path: impl AsRef<Path>,
        existence: Existence,
        strictness: Strictness,
    ) {
        self.assert_registering("a config file");
        let spec = ConfigFileSpec::new(
            filecheck::expand_path(path.as_ref()),
            existence,
            strictness,
        );
        if self.config_files.iter().any(|s| s.path == spec.path) {
            self.errors.add(
                "",
                Error::DuplicateConfigFile {
                    path: spec.path,
                    location: None,
                },
            );
            return;
        }
        self.config_files.push(spec);
    }

    /// Replaces the config files of `group` with `path`.
    ///
    /// # Panics
    ///
    /// As for [`add_group_config_file`](Self::add_group_config_file).
    pub fn set_group_config_file(
        &mut self,
        group: &str,
        path: impl AsRef<Path>,
        existence: Existence,
    ) {
        self.assert_registering("a group config file");
        match self.groups.get_mut(group) {
            Some(g) => g.config_files.clear(),
            None => panic!("cannot add a config file to unknown group '{group}'"),
        }
        self.add_group_config_file(group, path, existence);
    }

    /// Appends a config file that may only set members of `group`.
    ///
    /// Group config files are always strict and are read before the
    /// global ones.
    ///
    /// # Panics
    ///
    /// Panics if the group does not exist, if `existence` is
    /// [`Existence::MustNotExist`], or if the set has already been parsed.
    pub fn add_group_config_file(
        &mut self,
        group: &str,
        path: impl AsRef<Path>,
        existence: Existence,
    ) {
        self.assert_registering("a group config file");
        let spec = ConfigFileSpec::new(
            filecheck::expand_path(path.as_ref()),
            existence,
            Strictness::ParamMustExist,
        );
        let Some(g) = self.groups.get_mut(group) else {
            panic!("cannot add a config file to unknown group '{group}'");
        };
        if g.config_files.iter().any(|s| s.path == spec.path) {
            self.errors.add(
                "",
                Error::DuplicateConfigFile {
                    path: spec.path,
                    location: None,
                },
            );
            return;
        }
        g.config_files.push(spec);
    }

    /// Adds an environment-variable prefix.
    ///
    /// # Panics
    ///
    /// Panics if the prefix is empty, if it is a prefix of (or prefixed by)
    /// one already added, or if the set has already been parsed.
    pub fn add_env_prefix(&mut self, prefix: &str) {
        self.assert_registering(&format!("environment prefix '{prefix}'"));
        assert!(!prefix.is_empty(), "an environment prefix cannot be empty");
        if let Some(other) = self
            .env_prefixes
            .iter()
            .find(|p| p.starts_with(prefix) || prefix.starts_with(p.as_str()))
        {
            panic!("environment prefix '{prefix}' overlaps with '{other}'");
        }
        self.env_prefixes.push(prefix.to_string());
    }

    /// Adds a check to run once every source has been read.
    ///
    /// # Panics
    ///
    /// Panics if the set has already been parsed.
    pub fn add_final_check(&mut self, check: impl FnMut() -> Result<(), String> + 'static) {
        self.assert_registering("a final check");
        self.final_checks.push(Box::new(check));
    }

    /// Registers a command-line-only parameter naming a config file to read
    /// at that point in the arguments.
    ///
    /// Names in the file must all be parameters of this program. Naming a
    /// file that has already been read records
    /// [`Error::DuplicateConfigFile`].
    ///
    /// # Panics
    ///
    /// As for [`add_named`](Self::add_named).
    pub fn add_config_file_param(&mut self, name: &str, description: &str) -> &NamedParameter {
        let setter = ConfigFileSetter::new(&self.pending_files);
        self.add_named(
            name,
            setter,
            description,
            NamedOpts::new().attrs(Attributes::new().command_line_only()),
        )
    }
}
