//! In-memory network stack with esp_netif semantics.
//!
//! Used where no device stack is available: the control binary and the tests. Failures can be
//! scheduled per step with a [`FaultPlan`].

use crate::config::NetifConfig;
use crate::{NetifDriver, SysError};
use log::debug;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

pub use netif::HostNetif;

mod netif;

pub(crate) const HOSTNAME_MAX_LEN: usize = 32;

/// Failures injected into the next matching calls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FaultPlan {
    pub create: bool,
    pub set_hostname: Option<SysError>,
    pub dhcpc_stop: Option<SysError>,
    pub set_ip_info: Option<SysError>,
}

#[derive(Debug, Default)]
pub(crate) struct StackState {
    pub(crate) faults: FaultPlan,
    pub(crate) live: BTreeSet<u32>,
    pub(crate) next_index: u32,
    pub(crate) created: usize,
    pub(crate) destroyed: usize,
}

/// Handle to the emulated stack. Clones observe the same stack.
#[derive(Clone, Debug, Default)]
pub struct HostStack(Rc<RefCell<StackState>>);

impl HostStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: FaultPlan) -> Self {
        let stack = Self::new();
        stack.set_faults(faults);
        stack
    }

    pub fn set_faults(&self, faults: FaultPlan) {
        self.0.borrow_mut().faults = faults;
    }

    /// Indices of the interfaces currently present on the stack.
    pub fn live_interfaces(&self) -> Vec<u32> {
        self.0.borrow().live.iter().copied().collect()
    }

    pub fn created(&self) -> usize {
        self.0.borrow().created
    }

    pub fn destroyed(&self) -> usize {
        self.0.borrow().destroyed
    }
}

impl NetifDriver for HostStack {
    type Netif = HostNetif;

    fn create(&mut self, config: &NetifConfig) -> Result<HostNetif, SysError> {
        let mut state = self.0.borrow_mut();
        if state.faults.create {
            return Err(SysError::NETIF_NO_MEM);
        }

        state.next_index += 1;
        let index = state.next_index;
        state.live.insert(index);
        state.created += 1;
        debug!("host stack: created {}{} (key {})", config.description, index, config.key);

        Ok(HostNetif::new(self.0.clone(), index, config.dhcp_client))
    }
}
