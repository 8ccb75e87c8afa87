use crate::config::{IpInfo, NetifConfig};
use crate::SysError;

/// Creates interfaces on a network stack.
pub trait NetifDriver {
    type Netif: Netif;

    fn create(&mut self, config: &NetifConfig) -> Result<Self::Netif, SysError>;
}

/// A live interface. Dropping it destroys the interface on the stack.
pub trait Netif {
    fn hostname(&self) -> Result<String, SysError>;
    fn set_hostname(&mut self, hostname: &str) -> Result<(), SysError>;

    /// Returns [`SysError::NETIF_DHCP_ALREADY_STOPPED`] if the client is not running.
    fn dhcpc_stop(&mut self) -> Result<(), SysError>;

    fn ip_info(&self) -> Result<IpInfo, SysError>;
    fn set_ip_info(&mut self, ip_info: &IpInfo) -> Result<(), SysError>;
}

/// Binds a USB class driver to the packet path of an interface.
///
/// Both hooks are idempotent: starting a running attachment or stopping a stopped one succeeds
/// without side effects.
pub trait Transport<N: Netif> {
    fn start(&mut self, netif: &mut N) -> Result<(), SysError>;
    fn stop(&mut self) -> Result<(), SysError>;
    fn is_running(&self) -> bool;
}
