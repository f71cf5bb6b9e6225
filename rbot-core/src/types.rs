//! Core types: user, chat, message, update, and the routine argument model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RoutineError;

/// User identity (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Placeholder sender for messages that carry no `from` (e.g. channel posts).
    pub fn anonymous() -> Self {
        Self {
            id: 0,
            username: None,
            first_name: None,
            last_name: None,
        }
    }
}

/// Chat (channel or private) identity. `id` is the reply destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// An inbound message. Non-text messages carry an empty `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: User,
    pub chat: Chat,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl Message {
    /// Chat id the reply goes to.
    pub fn destination(&self) -> i64 {
        self.chat.id
    }
}

/// One unit of incoming activity. `sequence_id` increases monotonically per gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub sequence_id: i64,
    pub message: Option<Message>,
}

impl Update {
    /// Offset that acknowledges this update.
    pub fn next_offset(&self) -> i64 {
        self.sequence_id + 1
    }
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Converts a transport-specific update type to core [`Update`].
pub trait ToCoreUpdate: Send + Sync {
    fn to_core(&self) -> Update;
}

/// Closed set of parameter kinds a routine may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    String,
    Int,
    Float32,
    Float64,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Int => "int",
            ParamKind::Float32 => "float32",
            ParamKind::Float64 => "float64",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = RoutineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(ParamKind::String),
            "int" | "integer" | "i64" => Ok(ParamKind::Int),
            "float32" | "f32" => Ok(ParamKind::Float32),
            "float64" | "f64" | "float" => Ok(ParamKind::Float64),
            _ => Err(RoutineError::UnsupportedParamKind(s.to_string())),
        }
    }
}

/// A typed routine argument produced by the caster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float32(f32),
    Float64(f64),
}

impl ArgValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ArgValue::Str(_) => ParamKind::String,
            ArgValue::Int(_) => ParamKind::Int,
            ArgValue::Float32(_) => ParamKind::Float32,
            ArgValue::Float64(_) => ParamKind::Float64,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ArgValue::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Int(v) => write!(f, "{}", v),
            ArgValue::Float32(v) => write!(f, "{}", v),
            ArgValue::Float64(v) => write!(f, "{}", v),
        }
    }
}
