//! The `usbnet` scripting module.
//!
//! Scripts see three functions:
//!
//! | Function | Arguments                            | Returns | Raises                          |
//! |----------|--------------------------------------|---------|---------------------------------|
//! | `start`  | `hostname, ip, netmask, gateway: str`| `None`  | `RuntimeError` with error code  |
//! | `stop`   |                                      | `None`  | `RuntimeError` with error code  |
//! | `is_up`  |                                      | `bool`  | never                           |

use crate::{NetifDriver, Transport, UsbNet};
use delegate::delegate;
use log::debug;
use std::fmt::{Display, Formatter};
use thiserror::Error as ThisError;

pub const MODULE_NAME: &str = "usbnet";

/// Script-side value crossing the binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    None,
    Bool(bool),
    Str(String),
    Function(&'static str),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Function(_) => "function",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Str(s) => write!(f, "'{s}'"),
            Value::Function(name) => write!(f, "<function {name}>"),
        }
    }
}

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum Exception {
    #[error("TypeError: {0}")]
    TypeError(String),
    #[error("RuntimeError: {0}")]
    RuntimeError(String),
    #[error("AttributeError: {0}")]
    AttributeError(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: &'static str,
    pub arity: usize,
}

pub const FUNCTIONS: &[Function] = &[
    Function {
        name: "start",
        arity: 4,
    },
    Function {
        name: "stop",
        arity: 0,
    },
    Function {
        name: "is_up",
        arity: 0,
    },
];

/// Module object holding the interface context that its functions operate on.
pub struct Module<D: NetifDriver, T: Transport<D::Netif>> {
    ctx: UsbNet<D, T>,
}

impl<D: NetifDriver, T: Transport<D::Netif>> Module<D, T> {
    pub fn new(ctx: UsbNet<D, T>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &UsbNet<D, T> {
        &self.ctx
    }

    pub fn into_inner(self) -> UsbNet<D, T> {
        self.ctx
    }

    delegate! {
        to self.ctx {
            pub fn is_up(&self) -> bool;
            pub fn netif(&self) -> Option<&D::Netif>;
        }
    }

    /// Looks up a module global.
    pub fn attr(&self, name: &str) -> Result<Value, Exception> {
        if name == "__name__" {
            return Ok(Value::Str(MODULE_NAME.to_string()));
        }
        lookup(name).map(|f| Value::Function(f.name))
    }

    /// Calls a module function the way the interpreter does: arity is checked before the
    /// function body runs.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, Exception> {
        let function = lookup(name)?;
        if args.len() != function.arity {
            return Err(Exception::TypeError(format!(
                "function takes {} positional arguments but {} were given",
                function.arity,
                args.len()
            )));
        }
        debug!("{MODULE_NAME}.{}()", function.name);

        match function.name {
            "start" => start(&mut self.ctx, args),
            "stop" => stop(&mut self.ctx),
            "is_up" => Ok(Value::Bool(self.ctx.is_up())),
            other => Err(unknown_attribute(other)),
        }
    }
}

fn lookup(name: &str) -> Result<Function, Exception> {
    FUNCTIONS
        .iter()
        .find(|f| f.name == name)
        .copied()
        .ok_or_else(|| unknown_attribute(name))
}

fn unknown_attribute(name: &str) -> Exception {
    Exception::AttributeError(format!("module '{MODULE_NAME}' has no attribute '{name}'"))
}

fn str_arg(value: &Value) -> Result<&str, Exception> {
    match value {
        Value::Str(s) => Ok(s.as_str()),
        other => Err(Exception::TypeError(format!(
            "can't convert '{}' object to str implicitly",
            other.type_name()
        ))),
    }
}

fn start<D: NetifDriver, T: Transport<D::Netif>>(
    ctx: &mut UsbNet<D, T>,
    args: &[Value],
) -> Result<Value, Exception> {
    let hostname = str_arg(&args[0])?;
    let ip = str_arg(&args[1])?;
    let netmask = str_arg(&args[2])?;
    let gateway = str_arg(&args[3])?;

    ctx.start(hostname, ip, netmask, gateway).map_err(|e| {
        Exception::RuntimeError(format!("{MODULE_NAME} start failed: {}", e.code()))
    })?;
    Ok(Value::None)
}

fn stop<D: NetifDriver, T: Transport<D::Netif>>(
    ctx: &mut UsbNet<D, T>,
) -> Result<Value, Exception> {
    ctx.stop().map_err(|e| {
        Exception::RuntimeError(format!("{MODULE_NAME} stop failed: {}", e.code()))
    })?;
    Ok(Value::None)
}
