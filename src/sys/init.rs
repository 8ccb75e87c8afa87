use crate::SysError;
use std::sync::Mutex;

/// Runs a stack initializer once. A failed attempt is retried on the next call.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
pub(crate) struct InitOnce(Mutex<bool>);

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
impl InitOnce {
    pub(crate) const fn new() -> Self {
        Self(Mutex::new(false))
    }

    pub(crate) fn call_once(
        &self,
        init: impl FnOnce() -> Result<(), SysError>,
    ) -> Result<(), SysError> {
        let mut done = self.0.lock().map_err(|_| SysError::INVALID_STATE)?;
        if !*done {
            init()?;
            *done = true;
        }
        Ok(())
    }
}
