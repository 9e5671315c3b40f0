use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StyleError {
    #[error("Style variable {0} is not set")]
    Missing(String),

    #[error("Style variable {name} must be numeric, got {value:?}")]
    NotNumeric { name: String, value: String },
}

/// Custom style properties of the root element, such as `--padding: 8px`
#[derive(Debug, Default, Clone)]
pub struct RootStyle {
    variables: HashMap<String, String>,
}

impl RootStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns trimmed value of a variable
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(|value| value.trim())
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Adds `delta` to the numeric part of a variable, keeping its unit
    ///
    /// Leaves the variable untouched when its value does not start with a number.
    ///
    /// # Examples
    ///
    /// ```
    /// use pacekit::host::style::RootStyle;
    ///
    /// let mut style = RootStyle::new();
    /// style.set_variable("--padding", "8px");
    ///
    /// assert_eq!(style.adjust_variable("--padding", 4.0).unwrap(), "12px");
    /// assert_eq!(style.adjust_variable("--padding", -0.5).unwrap(), "11.5px");
    /// ```
    pub fn adjust_variable(&mut self, name: &str, delta: f64) -> Result<&str, StyleError> {
        let current = self
            .variable(name)
            .ok_or_else(|| StyleError::Missing(name.to_owned()))?;

        let Some((number, unit)) = split_number(current) else {
            warn!(name, value = current, "style variable must be numeric");
            return Err(StyleError::NotNumeric {
                name: name.to_owned(),
                value: current.to_owned(),
            });
        };

        let adjusted = format!("{}{}", number + delta, unit);
        self.set_variable(name, adjusted);

        Ok(self.variable(name).unwrap_or_default())
    }
}

/// Splits leading `-?digits(.digits)?` number and trailing alphabetic or `%` unit
fn split_number(value: &str) -> Option<(f64, &str)> {
    let sign = usize::from(value.starts_with('-'));
    let integer = count_digits(&value[sign..]);

    if integer == 0 {
        return None;
    }

    let mut end = sign + integer;
    if value[end..].starts_with('.') {
        let fraction = count_digits(&value[end + 1..]);
        if fraction > 0 {
            end += 1 + fraction;
        }
    }

    let number = value[..end].parse().ok()?;
    let unit_start = value
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .len();

    Some((number, &value[unit_start..]))
}

fn count_digits(value: &str) -> usize {
    value.bytes().take_while(u8::is_ascii_digit).count()
}
