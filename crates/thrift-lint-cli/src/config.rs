//! TOML configuration loading and check assembly.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use thrift_lint_core::{parse_matchers, Check, Checks};

/// Config file consulted when `--config` is not given.
pub const DEFAULT_CONFIG: &str = ".thrift-lint.toml";

/// Reserved check name for diagnostics about the configuration itself.
pub const CONFIG_CHECK: &str = "config";

/// Top-level configuration file contents.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Directories searched for included files, in addition to `-I` flags.
    #[serde(default)]
    pub includes: Vec<PathBuf>,
    /// Per-check settings.
    #[serde(default)]
    pub checks: ChecksConfig,
}

/// The `[checks]` table.
#[derive(Debug, Deserialize)]
pub struct ChecksConfig {
    /// Name or prefix allow-list. Empty means every check is eligible.
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Name or prefix deny-list, applied after `enabled`.
    #[serde(default = "default_disabled")]
    pub disabled: Vec<String>,
    /// `[checks.enum]` settings.
    #[serde(default, rename = "enum")]
    pub enums: EnumConfig,
    /// `[checks.include]` settings.
    #[serde(default)]
    pub include: IncludeConfig,
    /// `[checks.names]` settings.
    #[serde(default)]
    pub names: NamesConfig,
    /// `[checks.namespace]` settings.
    #[serde(default)]
    pub namespace: NamespaceConfig,
    /// `[checks.map]` settings.
    #[serde(default)]
    pub map: MapConfig,
    /// `[checks.types]` settings.
    #[serde(default)]
    pub types: TypesConfig,
    /// `[checks.depth]` settings.
    #[serde(default)]
    pub depth: DepthConfig,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            enabled: Vec::new(),
            disabled: default_disabled(),
            enums: EnumConfig::default(),
            include: IncludeConfig::default(),
            names: NamesConfig::default(),
            namespace: NamespaceConfig::default(),
            map: MapConfig::default(),
            types: TypesConfig::default(),
            depth: DepthConfig::default(),
        }
    }
}

// `union` rejects a whole language feature, so it is opt-in.
fn default_disabled() -> Vec<String> {
    vec!["union".to_string()]
}

/// `[checks.enum]`.
#[derive(Debug, Default, Deserialize)]
pub struct EnumConfig {
    /// `[checks.enum.size]`.
    #[serde(default)]
    pub size: EnumSizeConfig,
}

/// Item-count limits for `enum.size`.
#[derive(Debug, Default, Deserialize)]
pub struct EnumSizeConfig {
    /// Item count above which a warning is reported.
    pub warning: Option<usize>,
    /// Item count above which an error is reported.
    pub error: Option<usize>,
}

/// `[checks.include]`.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeConfig {
    /// Map of file glob to a regex matched against include paths.
    #[serde(default)]
    pub restricted: BTreeMap<String, String>,
}

/// `[checks.names]`.
#[derive(Debug, Default, Deserialize)]
pub struct NamesConfig {
    /// Identifiers that may not be used as definition names.
    #[serde(default)]
    pub reserved: Vec<String>,
}

/// `[checks.namespace]`.
#[derive(Debug, Default, Deserialize)]
pub struct NamespaceConfig {
    /// Map of namespace scope to a regex its value must match.
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
}

/// `[checks.map]`.
#[derive(Debug, Default, Deserialize)]
pub struct MapConfig {
    /// Type matcher names rejected as map value types.
    #[serde(default, rename = "restricted-values")]
    pub restricted_values: Vec<String>,
}

/// `[checks.types]`.
#[derive(Debug, Default, Deserialize)]
pub struct TypesConfig {
    /// Type matcher names rejected anywhere a type appears.
    #[serde(default)]
    pub disallowed: Vec<String>,
}

/// `[checks.depth]`.
#[derive(Debug, Default, Deserialize)]
pub struct DepthConfig {
    /// Maximum transitive struct nesting depth. Zero means unlimited.
    #[serde(default)]
    pub max: usize,
    /// When true, recursive struct definitions are not reported.
    #[serde(default, rename = "allow-cycles")]
    pub allow_cycles: bool,
}

impl Config {
    /// Loads the configuration file.
    ///
    /// A missing `explicit` path is an error. When no path is given the
    /// default file is read if present, and built-in defaults are used
    /// otherwise. Returns the configuration and the path it came from.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Config, PathBuf)> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG), false),
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok((Config::default(), path));
            }
            Err(err) => {
                return Err(err).context(format!("unable to read config file {:?}", path.display()))
            }
        };
        let config = toml::from_str(&text)
            .with_context(|| format!("unable to parse config file {:?}", path.display()))?;
        Ok((config, path))
    }
}

/// Builds every known check from the configuration.
///
/// Checks whose settings fail to parse are skipped, and one problem string
/// per failure is returned for reporting under [`CONFIG_CHECK`]. The
/// `enabled`/`disabled` lists are not applied here.
pub fn build_checks(config: &Config) -> (Checks, Vec<String>) {
    let mut all = Checks::new();
    let mut problems = Vec::new();
    let mut add = |built: Result<Check, String>, problems: &mut Vec<String>| match built {
        Ok(check) => all.add(check),
        Err(problem) => problems.push(problem),
    };

    add(Ok(thrift_lint_checks::constant_ref()), &mut problems);
    add(
        Ok(thrift_lint_checks::depth(
            depth_limit(config.checks.depth.max),
            config.checks.depth.allow_cycles,
        )),
        &mut problems,
    );
    add(
        Ok(thrift_lint_checks::enum_size(
            config.checks.enums.size.warning,
            config.checks.enums.size.error,
        )),
        &mut problems,
    );
    add(Ok(thrift_lint_checks::field_doc_missing()), &mut problems);
    add(Ok(thrift_lint_checks::field_id_missing()), &mut problems);
    add(Ok(thrift_lint_checks::field_id_negative()), &mut problems);
    add(Ok(thrift_lint_checks::field_id_zero()), &mut problems);
    add(Ok(thrift_lint_checks::field_optional()), &mut problems);
    add(Ok(thrift_lint_checks::field_requiredness()), &mut problems);
    add(Ok(thrift_lint_checks::include_cycle()), &mut problems);
    add(Ok(thrift_lint_checks::include_path()), &mut problems);
    add(
        restricted_includes(&config.checks.include.restricted)
            .map(thrift_lint_checks::include_restricted),
        &mut problems,
    );
    add(Ok(thrift_lint_checks::int_64bit()), &mut problems);
    add(Ok(thrift_lint_checks::map_key_type()), &mut problems);
    add(
        parse_matchers(&config.checks.map.restricted_values)
            .map(thrift_lint_checks::map_value_type)
            .map_err(|err| format!("[checks.map] restricted-values: {err}")),
        &mut problems,
    );
    add(
        Ok(thrift_lint_checks::names_reserved(
            config.checks.names.reserved.clone(),
        )),
        &mut problems,
    );
    add(
        namespace_patterns(&config.checks.namespace.patterns)
            .map(thrift_lint_checks::namespace_pattern),
        &mut problems,
    );
    add(Ok(thrift_lint_checks::set_value_type()), &mut problems);
    add(
        parse_matchers(&config.checks.types.disallowed)
            .map(thrift_lint_checks::types_disallowed)
            .map_err(|err| format!("[checks.types] disallowed: {err}")),
        &mut problems,
    );
    add(Ok(thrift_lint_checks::union()), &mut problems);

    (all, problems)
}

fn depth_limit(max: usize) -> Option<usize> {
    if max == 0 {
        None
    } else {
        Some(max)
    }
}

fn restricted_includes(
    restricted: &BTreeMap<String, String>,
) -> Result<Vec<(Pattern, Regex)>, String> {
    restricted
        .iter()
        .map(|(file_glob, include_pattern)| {
            let file_glob = Pattern::new(file_glob)
                .map_err(|err| format!("[checks.include] restricted {file_glob:?}: {err}"))?;
            let include_pattern = Regex::new(include_pattern)
                .map_err(|err| format!("[checks.include] restricted {include_pattern:?}: {err}"))?;
            Ok((file_glob, include_pattern))
        })
        .collect()
}

fn namespace_patterns(
    patterns: &BTreeMap<String, String>,
) -> Result<HashMap<String, Regex>, String> {
    patterns
        .iter()
        .map(|(scope, pattern)| {
            let pattern = Regex::new(pattern)
                .map_err(|err| format!("[checks.namespace] patterns {scope:?}: {err}"))?;
            Ok((scope.clone(), pattern))
        })
        .collect()
}
