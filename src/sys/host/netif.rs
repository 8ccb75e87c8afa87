use super::{FaultPlan, StackState, HOSTNAME_MAX_LEN};
use crate::config::IpInfo;
use crate::{Netif, SysError};
use log::debug;
use std::cell::RefCell;
use std::net::Ipv4Addr;
use std::rc::Rc;

#[derive(Debug)]
pub struct HostNetif {
    stack: Rc<RefCell<StackState>>,
    index: u32,
    hostname: Option<String>,
    ip_info: IpInfo,
    dhcpc_running: bool,
}

impl HostNetif {
    pub(super) fn new(stack: Rc<RefCell<StackState>>, index: u32, dhcpc_running: bool) -> Self {
        Self {
            stack,
            index,
            hostname: None,
            ip_info: IpInfo {
                ip: Ipv4Addr::UNSPECIFIED,
                netmask: Ipv4Addr::UNSPECIFIED,
                gateway: Ipv4Addr::UNSPECIFIED,
            },
            dhcpc_running,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn dhcpc_running(&self) -> bool {
        self.dhcpc_running
    }

    fn fault(&self, pick: impl FnOnce(&FaultPlan) -> Option<SysError>) -> Result<(), SysError> {
        match pick(&self.stack.borrow().faults) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Netif for HostNetif {
    fn hostname(&self) -> Result<String, SysError> {
        self.hostname.clone().ok_or(SysError::NETIF_IF_NOT_READY)
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), SysError> {
        self.fault(|f| f.set_hostname)?;
        if hostname.len() > HOSTNAME_MAX_LEN || hostname.contains('\0') {
            return Err(SysError::NETIF_INVALID_PARAMS);
        }
        self.hostname = Some(hostname.to_string());
        Ok(())
    }

    fn dhcpc_stop(&mut self) -> Result<(), SysError> {
        self.fault(|f| f.dhcpc_stop)?;
        if !self.dhcpc_running {
            return Err(SysError::NETIF_DHCP_ALREADY_STOPPED);
        }
        self.dhcpc_running = false;
        Ok(())
    }

    fn ip_info(&self) -> Result<IpInfo, SysError> {
        Ok(self.ip_info)
    }

    fn set_ip_info(&mut self, ip_info: &IpInfo) -> Result<(), SysError> {
        self.fault(|f| f.set_ip_info)?;
        if self.dhcpc_running {
            return Err(SysError::NETIF_DHCP_NOT_STOPPED);
        }
        self.ip_info = *ip_info;
        Ok(())
    }
}

impl Drop for HostNetif {
    fn drop(&mut self) {
        let mut stack = self.stack.borrow_mut();
        if stack.live.remove(&self.index) {
            stack.destroyed += 1;
        }
        debug!("host stack: destroyed interface {}", self.index);
    }
}
