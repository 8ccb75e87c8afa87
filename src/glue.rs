use crate::{Netif, SysError, Transport};
use log::info;

/// Attachment point for the ECM/RNDIS class driver.
///
/// Tracks whether the bridge is registered; the packet path itself belongs to the class driver
/// that is installed on top of it.
#[derive(Debug, Default)]
pub struct UsbNetifGlue {
    running: bool,
}

impl UsbNetifGlue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl<N: Netif> Transport<N> for UsbNetifGlue {
    fn start(&mut self, _netif: &mut N) -> Result<(), SysError> {
        if self.running {
            return Ok(());
        }

        info!("usb netif glue start");
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SysError> {
        if !self.running {
            return Ok(());
        }

        info!("usb netif glue stop");
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        UsbNetifGlue::is_running(self)
    }
}
