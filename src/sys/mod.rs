pub mod host;

mod init;

cfg_if::cfg_if! {
    if #[cfg(target_os = "espidf")] {
        mod espidf;
        pub use espidf::{EspNetif, EspStack};
        pub type DefaultDriver = EspStack;
    } else {
        pub type DefaultDriver = host::HostStack;
    }
}
