//! Lifecycle of the USB network adapter's interface: allocation, static IPv4 configuration,
//! transport attachment and teardown, plus the `usbnet` scripting module on top of it.

mod config;
mod error;
mod traits;

pub mod binding;
pub mod glue;
pub mod sys;

pub use config::{IfaceConfig, IpInfo, NetifConfig};
pub use error::{Error, SysError};
pub use ipnet;
pub use traits::{Netif, NetifDriver, Transport};

use log::{debug, info, warn};
use scopeguard::ScopeGuard;

#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum InterfaceState {
    #[default]
    Down,
    Up,
}

/// Owns the adapter's single network interface.
///
/// The interface exists only while the state is [`InterfaceState::Up`]; a failed [`start`](Self::start)
/// destroys whatever it allocated before returning.
pub struct UsbNet<D: NetifDriver, T: Transport<D::Netif>> {
    driver: D,
    transport: T,
    netif_config: NetifConfig,
    netif: Option<D::Netif>,
    state: InterfaceState,
}

impl<D: NetifDriver, T: Transport<D::Netif>> UsbNet<D, T> {
    pub fn new(driver: D, transport: T) -> Self {
        Self::with_netif_config(driver, transport, NetifConfig::eth_default())
    }

    pub fn with_netif_config(driver: D, transport: T, netif_config: NetifConfig) -> Self {
        Self {
            driver,
            transport,
            netif_config,
            netif: None,
            state: InterfaceState::Down,
        }
    }

    /// Brings the interface up with a static address. Does nothing if it is already up.
    pub fn start(
        &mut self,
        hostname: &str,
        ip: &str,
        netmask: &str,
        gateway: &str,
    ) -> Result<(), Error> {
        if self.state == InterfaceState::Up {
            return Ok(());
        }

        let config = IfaceConfig::parse(hostname, ip, netmask, gateway)?;
        self.start_with(&config)
    }

    pub fn start_with(&mut self, config: &IfaceConfig) -> Result<(), Error> {
        if self.state == InterfaceState::Up {
            return Ok(());
        }
        config.validate()?;

        let netif = self
            .driver
            .create(&self.netif_config)
            .map_err(|e| {
                warn!("usbnet: interface allocation failed: {e}");
                Error::AllocationFailure
            })?;

        let mut netif = scopeguard::guard(netif, |netif| {
            warn!("usbnet: start failed, destroying interface");
            drop(netif);
        });

        debug!("usbnet: setting hostname {}", config.hostname());
        netif
            .set_hostname(config.hostname())
            .map_err(Error::ConfigurationFailure)?;

        set_static_ipv4(&mut *netif, config.ip_info()).map_err(Error::ConfigurationFailure)?;

        self.transport
            .start(&mut netif)
            .map_err(Error::TransportAttachmentFailure)?;

        self.netif = Some(ScopeGuard::into_inner(netif));
        self.state = InterfaceState::Up;
        info!(
            "usbnet: USB netif started hostname={} ip={}",
            config.hostname(),
            config.display_address()
        );
        Ok(())
    }

    /// Detaches the transport and destroys the interface. Does nothing if it is already down.
    ///
    /// If the transport refuses to detach, the interface stays up and the call can be retried.
    pub fn stop(&mut self) -> Result<(), Error> {
        if self.state == InterfaceState::Down {
            return Ok(());
        }

        if let Err(e) = self.transport.stop() {
            warn!("usbnet: transport detach failed: {e}");
            return Err(Error::DetachFailure(e));
        }

        if let Some(netif) = self.netif.take() {
            drop(netif);
        }

        self.state = InterfaceState::Down;
        info!("usbnet: USB netif stopped");
        Ok(())
    }

    pub fn is_up(&self) -> bool {
        self.state == InterfaceState::Up
    }

    pub fn state(&self) -> InterfaceState {
        self.state
    }

    pub fn netif(&self) -> Option<&D::Netif> {
        self.netif.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

fn set_static_ipv4<N: Netif>(netif: &mut N, ip_info: &IpInfo) -> Result<(), SysError> {
    match netif.dhcpc_stop() {
        Ok(()) | Err(SysError::NETIF_DHCP_ALREADY_STOPPED) => {}
        Err(e) => return Err(e),
    }
    debug!(
        "usbnet: setting ip={} netmask={} gw={}",
        ip_info.ip, ip_info.netmask, ip_info.gateway
    );
    netif.set_ip_info(ip_info)
}


#[cfg(test)]
mod test {
    use crate::glue::UsbNetifGlue;
    use crate::sys::host::{FaultPlan, HostStack};
    use crate::testing::ScriptedTransport;
    use crate::{Error, InterfaceState, Netif, SysError, Transport, UsbNet};
    use std::net::Ipv4Addr;

    const ARGS: [&str; 4] = ["dev1", "192.168.7.1", "255.255.255.0", "192.168.7.1"];

    fn start<D: crate::NetifDriver, T: Transport<D::Netif>>(
        usbnet: &mut UsbNet<D, T>,
    ) -> Result<(), Error> {
        usbnet.start(ARGS[0], ARGS[1], ARGS[2], ARGS[3])
    }

    #[test]
    fn test_start_configures_interface() {
        let stack = HostStack::new();
        let mut usbnet = UsbNet::new(stack.clone(), UsbNetifGlue::new());

        start(&mut usbnet).unwrap();
        assert!(usbnet.is_up());
        assert!(usbnet.transport().is_running());

        let netif = usbnet.netif().unwrap();
        assert_eq!(netif.hostname().unwrap(), "dev1");
        assert!(!netif.dhcpc_running());
        let info = netif.ip_info().unwrap();
        assert_eq!(info.ip, Ipv4Addr::new(192, 168, 7, 1));
        assert_eq!(info.netmask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(info.gateway, Ipv4Addr::new(192, 168, 7, 1));
        assert_eq!(stack.live_interfaces().len(), 1);
    }

    #[test]
    fn test_transport_sees_configured_interface() {
        let stack = HostStack::new();
        let transport = ScriptedTransport::default();
        let mut usbnet = UsbNet::new(stack, transport.clone());

        start(&mut usbnet).unwrap();

        let log = transport.0.borrow();
        assert_eq!(log.attached_hostname.as_deref(), Some("dev1"));
        let info = log.attached_ip_info.unwrap();
        assert_eq!(info.ip, Ipv4Addr::new(192, 168, 7, 1));
        assert_eq!(info.netmask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(info.gateway, Ipv4Addr::new(192, 168, 7, 1));
    }

    #[test]
    fn test_start_idempotent() {
        let stack = HostStack::new();
        let transport = ScriptedTransport::default();
        let mut usbnet = UsbNet::new(stack.clone(), transport.clone());

        start(&mut usbnet).unwrap();
        start(&mut usbnet).unwrap();
        assert_eq!(stack.created(), 1);
        assert_eq!(transport.0.borrow().starts, 1);
        assert!(usbnet.is_up());
    }

    #[test]
    fn test_start_while_up_ignores_arguments() {
        let stack = HostStack::new();
        let mut usbnet = UsbNet::new(stack.clone(), UsbNetifGlue::new());

        start(&mut usbnet).unwrap();
        assert_eq!(usbnet.start("", "bogus", "", ""), Ok(()));
        assert_eq!(stack.created(), 1);
    }

    #[test]
    fn test_stop_idempotent() {
        let stack = HostStack::new();
        let transport = ScriptedTransport::default();
        let mut usbnet = UsbNet::new(stack.clone(), transport.clone());

        usbnet.stop().unwrap();
        usbnet.stop().unwrap();
        assert_eq!(stack.created(), 0);
        assert_eq!(stack.destroyed(), 0);
        assert_eq!(transport.0.borrow().stops, 0);

        start(&mut usbnet).unwrap();
        usbnet.stop().unwrap();
        usbnet.stop().unwrap();
        assert_eq!(stack.destroyed(), 1);
        assert_eq!(transport.0.borrow().stops, 1);
        assert_eq!(usbnet.state(), InterfaceState::Down);
        assert!(usbnet.netif().is_none());
    }

    #[test]
    fn test_invalid_arguments_touch_nothing() {
        let stack = HostStack::new();
        let transport = ScriptedTransport::default();
        let mut usbnet = UsbNet::new(stack.clone(), transport.clone());

        let cases = [
            ["", "192.168.7.1", "255.255.255.0", "192.168.7.1"],
            ["dev1", "", "255.255.255.0", "192.168.7.1"],
            ["dev1", "192.168.7.1", "", "192.168.7.1"],
            ["dev1", "192.168.7.1", "255.255.255.0", ""],
            ["dev1", "not-an-ip", "255.255.255.0", "192.168.7.1"],
            ["dev1", "192.168.7.1", "255.255.255.300", "192.168.7.1"],
            ["dev1", "192.168.7.1", "255.255.255.0", "gw"],
        ];
        for [hostname, ip, netmask, gateway] in cases {
            assert_eq!(
                usbnet.start(hostname, ip, netmask, gateway),
                Err(Error::InvalidArgument)
            );
            assert!(!usbnet.is_up());
        }
        assert_eq!(stack.created(), 0);
        assert_eq!(transport.0.borrow().starts, 0);
    }

    #[test]
    fn test_allocation_failure() {
        let stack = HostStack::with_faults(FaultPlan {
            create: true,
            ..FaultPlan::default()
        });
        let mut usbnet = UsbNet::new(stack.clone(), UsbNetifGlue::new());

        let err = start(&mut usbnet).unwrap_err();
        assert_eq!(err, Error::AllocationFailure);
        assert_eq!(err.code(), -1);
        assert!(!usbnet.is_up());
        assert!(stack.live_interfaces().is_empty());
    }

    #[test]
    fn test_rollback_on_configuration_failure() {
        let faults = [
            FaultPlan {
                set_hostname: Some(SysError::FAIL),
                ..FaultPlan::default()
            },
            FaultPlan {
                dhcpc_stop: Some(SysError::INVALID_STATE),
                ..FaultPlan::default()
            },
            FaultPlan {
                set_ip_info: Some(SysError::NETIF_INVALID_PARAMS),
                ..FaultPlan::default()
            },
        ];

        for plan in faults {
            let stack = HostStack::with_faults(plan);
            let transport = ScriptedTransport::default();
            let mut usbnet = UsbNet::new(stack.clone(), transport.clone());

            let err = start(&mut usbnet).unwrap_err();
            assert!(matches!(err, Error::ConfigurationFailure(_)), "{err:?}");
            assert!(!usbnet.is_up());
            assert!(usbnet.netif().is_none());
            assert!(stack.live_interfaces().is_empty());
            assert_eq!(stack.created(), 1);
            assert_eq!(stack.destroyed(), 1);
            assert_eq!(transport.0.borrow().starts, 0);
        }
    }

    #[test]
    fn test_hostname_rejected_by_stack() {
        let stack = HostStack::new();
        let mut usbnet = UsbNet::new(stack.clone(), UsbNetifGlue::new());

        let long = "h".repeat(40);
        let err = usbnet
            .start(&long, "192.168.7.1", "255.255.255.0", "192.168.7.1")
            .unwrap_err();
        assert_eq!(err, Error::ConfigurationFailure(SysError::NETIF_INVALID_PARAMS));
        assert_eq!(err.code(), 0x5001);
        assert!(stack.live_interfaces().is_empty());
    }

    #[test]
    fn test_dhcp_already_stopped_is_success() {
        let stack = HostStack::new();
        let mut netif_config = crate::NetifConfig::eth_default();
        netif_config.dhcp_client = false;
        let mut usbnet = UsbNet::with_netif_config(stack, UsbNetifGlue::new(), netif_config);

        start(&mut usbnet).unwrap();
        assert!(usbnet.is_up());
    }

    #[test]
    fn test_rollback_on_transport_failure() {
        let stack = HostStack::new();
        let transport = ScriptedTransport::default();
        transport.0.borrow_mut().fail_start = Some(SysError::INVALID_STATE);
        let mut usbnet = UsbNet::new(stack.clone(), transport.clone());

        let err = start(&mut usbnet).unwrap_err();
        assert_eq!(err, Error::TransportAttachmentFailure(SysError::INVALID_STATE));
        assert_eq!(err.code(), 0x103);
        assert!(!usbnet.is_up());
        assert!(usbnet.netif().is_none());
        assert!(stack.live_interfaces().is_empty());

        transport.0.borrow_mut().fail_start = None;
        start(&mut usbnet).unwrap();
        assert!(usbnet.is_up());
        assert_eq!(stack.created(), 2);
    }

    #[test]
    fn test_detach_failure_keeps_interface() {
        let stack = HostStack::new();
        let transport = ScriptedTransport::default();
        let mut usbnet = UsbNet::new(stack.clone(), transport.clone());

        start(&mut usbnet).unwrap();
        transport.0.borrow_mut().fail_stop = Some(SysError::FAIL);

        assert_eq!(usbnet.stop(), Err(Error::DetachFailure(SysError::FAIL)));
        assert!(usbnet.is_up());
        assert!(usbnet.netif().is_some());
        assert_eq!(stack.live_interfaces().len(), 1);

        transport.0.borrow_mut().fail_stop = None;
        usbnet.stop().unwrap();
        assert!(!usbnet.is_up());
        assert!(stack.live_interfaces().is_empty());
    }

    #[test]
    fn test_restart_allocates_anew() {
        let stack = HostStack::new();
        let mut usbnet = UsbNet::new(stack.clone(), UsbNetifGlue::new());

        start(&mut usbnet).unwrap();
        let first = usbnet.netif().unwrap().index();
        usbnet.stop().unwrap();
        start(&mut usbnet).unwrap();
        let second = usbnet.netif().unwrap().index();

        assert_ne!(first, second);
        assert_eq!(stack.live_interfaces(), vec![second]);
    }

    #[test]
    fn test_status_is_pure() {
        let stack = HostStack::new();
        let mut usbnet = UsbNet::new(stack.clone(), UsbNetifGlue::new());

        assert!(!usbnet.is_up());
        assert!(!usbnet.is_up());
        start(&mut usbnet).unwrap();
        assert!(usbnet.is_up());
        assert!(usbnet.is_up());
        assert_eq!(stack.created(), 1);
    }
}
