use crate::config::IpInfo;
use crate::{Netif, SysError};
use esp_idf_svc::sys::{
    esp, esp_ip4_addr_t, esp_netif_destroy, esp_netif_dhcpc_stop, esp_netif_get_hostname,
    esp_netif_get_ip_info, esp_netif_ip_info_t, esp_netif_set_hostname, esp_netif_set_ip_info,
    esp_netif_t,
};
use std::ffi::{CStr, CString};
use std::net::Ipv4Addr;

#[derive(Debug)]
pub struct EspNetif(*mut esp_netif_t);

impl EspNetif {
    pub(super) fn from_raw(raw: *mut esp_netif_t) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> *mut esp_netif_t {
        self.0
    }
}

// lwIP stores addresses in network byte order
fn to_raw(addr: Ipv4Addr) -> esp_ip4_addr_t {
    esp_ip4_addr_t {
        addr: u32::from_ne_bytes(addr.octets()),
    }
}

fn from_raw(addr: esp_ip4_addr_t) -> Ipv4Addr {
    Ipv4Addr::from(addr.addr.to_ne_bytes())
}

impl Netif for EspNetif {
    fn hostname(&self) -> Result<String, SysError> {
        let mut ptr: *const core::ffi::c_char = core::ptr::null();
        esp!(unsafe { esp_netif_get_hostname(self.0, &mut ptr) })?;
        if ptr.is_null() {
            return Err(SysError::NETIF_IF_NOT_READY);
        }
        Ok(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), SysError> {
        let hostname = CString::new(hostname).map_err(|_| SysError::INVALID_ARG)?;
        esp!(unsafe { esp_netif_set_hostname(self.0, hostname.as_ptr()) })?;
        Ok(())
    }

    fn dhcpc_stop(&mut self) -> Result<(), SysError> {
        esp!(unsafe { esp_netif_dhcpc_stop(self.0) })?;
        Ok(())
    }

    fn ip_info(&self) -> Result<IpInfo, SysError> {
        let mut info = esp_netif_ip_info_t::default();
        esp!(unsafe { esp_netif_get_ip_info(self.0, &mut info) })?;
        Ok(IpInfo {
            ip: from_raw(info.ip),
            netmask: from_raw(info.netmask),
            gateway: from_raw(info.gw),
        })
    }

    fn set_ip_info(&mut self, ip_info: &IpInfo) -> Result<(), SysError> {
        let info = esp_netif_ip_info_t {
            ip: to_raw(ip_info.ip),
            netmask: to_raw(ip_info.netmask),
            gw: to_raw(ip_info.gateway),
        };
        esp!(unsafe { esp_netif_set_ip_info(self.0, &info) })?;
        Ok(())
    }
}

impl Drop for EspNetif {
    fn drop(&mut self) {
        unsafe { esp_netif_destroy(self.0) };
    }
}

unsafe impl Send for EspNetif {}
