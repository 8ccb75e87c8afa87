use crate::Error;
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

/// Parameters used to allocate a network interface.
///
/// [`NetifConfig::eth_default`] matches the stack's stock Ethernet client settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetifConfig {
    pub key: String,
    pub description: String,
    pub route_priority: u32,
    pub dhcp_client: bool,
    pub mac: Option<[u8; 6]>,
}

impl NetifConfig {
    pub fn eth_default() -> Self {
        Self {
            key: "ETH_DEF".into(),
            description: "eth".into(),
            route_priority: 50,
            dhcp_client: true,
            mac: None,
        }
    }
}

impl Default for NetifConfig {
    fn default() -> Self {
        Self::eth_default()
    }
}

/// Static IPv4 settings of an interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IpInfo {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

impl IpInfo {
    /// Parses the three dotted-decimal literals. Fails if any of them is malformed.
    pub fn parse(ip: &str, netmask: &str, gateway: &str) -> Result<Self, Error> {
        Ok(Self {
            ip: parse_addr(ip)?,
            netmask: parse_addr(netmask)?,
            gateway: parse_addr(gateway)?,
        })
    }

    /// Interface address with its prefix, or `None` if the netmask is not contiguous.
    pub fn network(&self) -> Option<Ipv4Net> {
        let prefix = ipnet::ipv4_mask_to_prefix(self.netmask).ok()?;
        Ipv4Net::new(self.ip, prefix).ok()
    }
}

fn parse_addr(s: &str) -> Result<Ipv4Addr, Error> {
    s.parse().map_err(|_| Error::InvalidArgument)
}

/// Validated arguments of a `start` call. Built with [`IfaceConfig::parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfaceConfig {
    hostname: String,
    ip_info: IpInfo,
}

impl IfaceConfig {
    pub fn parse(hostname: &str, ip: &str, netmask: &str, gateway: &str) -> Result<Self, Error> {
        if [hostname, ip, netmask, gateway].iter().any(|s| s.is_empty()) {
            return Err(Error::InvalidArgument);
        }

        let config = Self {
            hostname: hostname.to_string(),
            ip_info: IpInfo::parse(ip, netmask, gateway)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants `parse` establishes.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.hostname.is_empty() {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn ip_info(&self) -> &IpInfo {
        &self.ip_info
    }

    /// Address as shown in logs: `ip/prefix` when the netmask allows it.
    pub fn display_address(&self) -> String {
        match self.ip_info.network() {
            Some(net) => net.to_string(),
            None => self.ip_info.ip.to_string(),
        }
    }
}

impl Default for IfaceConfig {
    /// Stock configuration of the gateway device.
    fn default() -> Self {
        Self {
            hostname: "mesh-gateway".into(),
            ip_info: IpInfo {
                ip: Ipv4Addr::new(192, 168, 137, 2),
                netmask: Ipv4Addr::new(255, 255, 255, 0),
                gateway: Ipv4Addr::new(192, 168, 137, 1),
            },
        }
    }
}
