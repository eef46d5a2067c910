//! Command-line options shared by every command.

use std::io::IsTerminal;

/// Environment variable supplying a default `--max-steps`.
pub const MAX_STEPS_ENV: &str = "BANANA_MAX_STEPS";

/// Whether diagnostics are colored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }

    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stderr().is_terminal(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Per-thread step budget.
    pub max_steps: Option<u64>,
    pub color: ColorMode,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid step limit '{0}': expected a positive integer")]
    InvalidMaxSteps(String),
    #[error("invalid color mode '{0}': expected auto, always or never")]
    InvalidColor(String),
    #[error("unknown option '{0}'")]
    UnknownFlag(String),
}

impl Options {
    /// Split `args` into options and positional arguments.
    ///
    /// `env_max_steps` is the value of `BANANA_MAX_STEPS`, if set; an
    /// explicit `--max-steps` wins over it.
    pub fn parse(
        args: &[String],
        env_max_steps: Option<&str>,
    ) -> Result<(Options, Vec<String>), OptionsError> {
        let mut options = Options {
            max_steps: env_max_steps.map(parse_max_steps).transpose()?,
            color: ColorMode::Auto,
        };
        let mut positional = Vec::new();

        for arg in args {
            if let Some(value) = arg.strip_prefix("--max-steps=") {
                options.max_steps = Some(parse_max_steps(value)?);
            } else if let Some(value) = arg.strip_prefix("--color=") {
                options.color = ColorMode::parse(value)
                    .ok_or_else(|| OptionsError::InvalidColor(value.to_string()))?;
            } else if arg.starts_with("--") {
                return Err(OptionsError::UnknownFlag(arg.clone()));
            } else {
                positional.push(arg.clone());
            }
        }
        Ok((options, positional))
    }
}

fn parse_max_steps(value: &str) -> Result<u64, OptionsError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(OptionsError::InvalidMaxSteps(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn positional_and_flags_mix() {
        let parsed = Options::parse(&args(&["a.bn", "--max-steps=100", "b.bn"]), None);
        assert_eq!(
            parsed,
            Ok((
                Options {
                    max_steps: Some(100),
                    color: ColorMode::Auto,
                },
                args(&["a.bn", "b.bn"])
            ))
        );
    }

    #[test]
    fn env_supplies_default_and_flag_overrides() {
        let (options, _) = Options::parse(&args(&[]), Some("50")).unwrap_or_default();
        assert_eq!(options.max_steps, Some(50));

        let (options, _) =
            Options::parse(&args(&["--max-steps=7"]), Some("50")).unwrap_or_default();
        assert_eq!(options.max_steps, Some(7));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            Options::parse(&args(&["--max-steps=0"]), None),
            Err(OptionsError::InvalidMaxSteps("0".to_string()))
        );
        assert_eq!(
            Options::parse(&args(&[]), Some("lots")),
            Err(OptionsError::InvalidMaxSteps("lots".to_string()))
        );
        assert_eq!(
            Options::parse(&args(&["--color=sometimes"]), None),
            Err(OptionsError::InvalidColor("sometimes".to_string()))
        );
        assert_eq!(
            Options::parse(&args(&["--verbose"]), None),
            Err(OptionsError::UnknownFlag("--verbose".to_string()))
        );
    }

    #[test]
    fn color_modes() {
        assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
        assert!(ColorMode::Always.enabled());
        assert!(!ColorMode::Never.enabled());
    }
}
