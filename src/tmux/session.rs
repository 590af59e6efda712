use std::fmt;

use serde::{Deserialize, de};
use serde_yaml::{Mapping, Value};

/// Contents of a `<session>.yml` file. Every field is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Shown by `list` and used as the terminal title.
    pub description: Option<String>,
    /// Exported as `SESSION_DIR` and used as the default path.
    pub session_dir: Option<String>,
    /// Exported as `SESSION_URL`, prefixed with `http://`.
    pub session_url: Option<String>,
    /// Raw tmux commands replayed before the windows are built.
    pub commands_before: Option<CommandMap>,
    /// Raw tmux commands replayed after the windows are built.
    pub commands_after: Option<CommandMap>,
    /// Window name to the command(s) typed into it, in declared order.
    pub windows: Option<CommandMap>,
    /// Window focused once the session is built.
    pub select_window: Option<WindowTarget>,
}

/// A single command/argument or an ordered list of them. Null list items
/// are dropped.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Value")]
pub enum CommandValue {
    Scalar(String),
    Sequence(Vec<String>),
}

/// YAML mapping that keeps the order its entries were written in.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(try_from = "Mapping")]
pub struct CommandMap(Vec<(String, CommandValue)>);

/// `select_window` accepts either a window index or a window name.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum WindowTarget {
    Index(u64),
    Name(String),
}

impl CommandValue {
    /// Iterates the value as a list; a scalar yields itself once.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            CommandValue::Scalar(s) => std::slice::from_ref(s),
            CommandValue::Sequence(v) => v,
        };
        items.iter().map(String::as_str)
    }

    /// Argument text as appended to a command: sequences are space-joined.
    pub fn joined(&self) -> String {
        match self {
            CommandValue::Scalar(s) => s.clone(),
            CommandValue::Sequence(v) => v.join(" "),
        }
    }
}

impl TryFrom<Value> for CommandValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Sequence(items) => items
                .into_iter()
                .filter(|item| !item.is_null())
                .map(scalar_text)
                .collect::<Result<Vec<_>, _>>()
                .map(CommandValue::Sequence),
            other => scalar_text(other).map(CommandValue::Scalar),
        }
    }
}

impl TryFrom<Mapping> for CommandMap {
    type Error = String;

    fn try_from(mapping: Mapping) -> Result<Self, Self::Error> {
        mapping
            .into_iter()
            .map(|(key, value)| -> Result<_, String> {
                Ok((scalar_text(key)?, CommandValue::try_from(value)?))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(CommandMap)
    }
}

impl CommandMap {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CommandValue)> for CommandMap {
    fn from_iter<I: IntoIterator<Item = (K, CommandValue)>>(iter: I) -> Self {
        CommandMap(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for WindowTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WindowTarget::Index(i) => write!(f, "{i}"),
            WindowTarget::Name(n) => write!(f, "{n}"),
        }
    }
}

impl SessionConfig {
    /// Parses config text. An empty document is an empty config; more than
    /// one document is an error.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        let mut documents = serde_yaml::Deserializer::from_str(text);
        let Some(document) = documents.next() else {
            return Ok(SessionConfig::default());
        };

        let value = Value::deserialize(document)?;
        if documents.next().is_some() {
            return Err(de::Error::custom("expected a single YAML document"));
        }

        if value.is_null() {
            return Ok(SessionConfig::default());
        }
        serde_yaml::from_value(value)
    }
}

fn scalar_text(value: Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            Err("expected a string or a list of strings".into())
        }
    }
}
