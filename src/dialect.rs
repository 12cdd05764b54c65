//! Process-wide flag selecting the default wire dialect for
//! [`crate::types::Message::to_dict`]/`from_dict`.
//!
//! `to_google_a2a`/`from_google_a2a` always convert explicitly and ignore
//! this flag; it only governs the dialect-agnostic `to_dict`/`from_dict`
//! pair. [`crate::config::RuntimeConfig::apply_dialect_default`] applies a
//! config's `google_a2a_compat_default` to this flag at startup.

use std::sync::atomic::{AtomicBool, Ordering};

static GOOGLE_A2A_COMPAT: AtomicBool = AtomicBool::new(false);

/// Enable or disable Google-A2A compatibility mode process-wide.
pub fn set_google_a2a_compat(enabled: bool) {
    GOOGLE_A2A_COMPAT.store(enabled, Ordering::SeqCst);
}

/// Whether Google-A2A compatibility mode is currently enabled.
pub fn google_a2a_compat() -> bool {
    GOOGLE_A2A_COMPAT.load(Ordering::SeqCst)
}
