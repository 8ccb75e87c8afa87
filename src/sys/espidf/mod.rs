use super::init::InitOnce;
use crate::config::NetifConfig;
use crate::{NetifDriver, SysError};
use esp_idf_svc::sys::{
    _g_esp_netif_inherent_eth_config, _g_esp_netif_netstack_default_eth, esp, esp_netif_config_t,
    esp_netif_flags_ESP_NETIF_DHCP_CLIENT, esp_netif_inherent_config_t, esp_netif_init,
    esp_netif_new, EspError,
};
use log::debug;
use std::ffi::CString;
use std::ptr;

pub use handle::EspNetif;

mod handle;

static NETIF_STACK: InitOnce = InitOnce::new();

fn initialize_netif_stack() -> Result<(), SysError> {
    NETIF_STACK.call_once(|| {
        esp!(unsafe { esp_netif_init() })?;
        debug!("esp_netif: stack initialized");
        Ok(())
    })
}

impl From<EspError> for SysError {
    fn from(e: EspError) -> Self {
        SysError::from_code(e.code())
    }
}

/// The device's esp_netif/lwIP stack.
#[derive(Debug, Default)]
pub struct EspStack;

impl EspStack {
    pub fn new() -> Self {
        Self
    }
}

impl NetifDriver for EspStack {
    type Netif = EspNetif;

    fn create(&mut self, config: &NetifConfig) -> Result<EspNetif, SysError> {
        initialize_netif_stack()?;

        let if_key = CString::new(config.key.as_str()).map_err(|_| SysError::INVALID_ARG)?;
        let if_desc = CString::new(config.description.as_str()).map_err(|_| SysError::INVALID_ARG)?;

        let mut inherent: esp_netif_inherent_config_t = unsafe { _g_esp_netif_inherent_eth_config };
        inherent.if_key = if_key.as_ptr() as _;
        inherent.if_desc = if_desc.as_ptr() as _;
        inherent.route_prio = config.route_priority as _;
        if !config.dhcp_client {
            inherent.flags &= !esp_netif_flags_ESP_NETIF_DHCP_CLIENT;
        }
        if let Some(mac) = config.mac {
            inherent.mac = mac;
        }

        let cfg = esp_netif_config_t {
            base: &inherent,
            driver: ptr::null(),
            stack: unsafe { _g_esp_netif_netstack_default_eth },
        };

        // esp_netif_new copies the key and description, so the CStrings may go out of scope
        let raw = unsafe { esp_netif_new(&cfg) };
        if raw.is_null() {
            return Err(SysError::NO_MEM);
        }
        debug!("esp_netif: created {} ({})", config.description, config.key);
        Ok(EspNetif::from_raw(raw))
    }
}
