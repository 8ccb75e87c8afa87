use std::fmt::{Debug, Display, Formatter};
use thiserror::Error as ThisError;

/// Raw status code reported by the network stack or the transport, in `esp_err_t` numbering.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SysError(i32);

impl SysError {
    pub const FAIL: Self = Self(-1);
    pub const NO_MEM: Self = Self(0x101);
    pub const INVALID_ARG: Self = Self(0x102);
    pub const INVALID_STATE: Self = Self(0x103);

    pub const NETIF_INVALID_PARAMS: Self = Self(0x5001);
    pub const NETIF_IF_NOT_READY: Self = Self(0x5002);
    pub const NETIF_DHCP_ALREADY_STOPPED: Self = Self(0x5005);
    pub const NETIF_NO_MEM: Self = Self(0x5006);
    pub const NETIF_DHCP_NOT_STOPPED: Self = Self(0x5007);

    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    pub const fn code(&self) -> i32 {
        self.0
    }

    fn name(&self) -> Option<&'static str> {
        Some(match *self {
            Self::FAIL => "ESP_FAIL",
            Self::NO_MEM => "ESP_ERR_NO_MEM",
            Self::INVALID_ARG => "ESP_ERR_INVALID_ARG",
            Self::INVALID_STATE => "ESP_ERR_INVALID_STATE",
            Self::NETIF_INVALID_PARAMS => "ESP_ERR_ESP_NETIF_INVALID_PARAMS",
            Self::NETIF_IF_NOT_READY => "ESP_ERR_ESP_NETIF_IF_NOT_READY",
            Self::NETIF_DHCP_ALREADY_STOPPED => "ESP_ERR_ESP_NETIF_DHCP_ALREADY_STOPPED",
            Self::NETIF_NO_MEM => "ESP_ERR_ESP_NETIF_NO_MEM",
            Self::NETIF_DHCP_NOT_STOPPED => "ESP_ERR_ESP_NETIF_DHCP_NOT_STOPPED",
            _ => return None,
        })
    }
}

impl Display for SysError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) if self.0 < 0 => write!(f, "{name} ({})", self.0),
            Some(name) => write!(f, "{name} ({:#x})", self.0),
            None => write!(f, "error code {}", self.0),
        }
    }
}

impl std::error::Error for SysError {}

impl Debug for SysError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SysError({self})")
    }
}

#[non_exhaustive]
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("network interface could not be allocated")]
    AllocationFailure,
    #[error("interface configuration failed: {0}")]
    ConfigurationFailure(#[source] SysError),
    #[error("transport attachment failed: {0}")]
    TransportAttachmentFailure(#[source] SysError),
    #[error("transport detach failed: {0}")]
    DetachFailure(#[source] SysError),
}

impl Error {
    /// Numeric code surfaced to scripts.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidArgument => SysError::INVALID_ARG.code(),
            Error::AllocationFailure => SysError::FAIL.code(),
            Error::ConfigurationFailure(e)
            | Error::TransportAttachmentFailure(e)
            | Error::DetachFailure(e) => e.code(),
        }
    }
}
