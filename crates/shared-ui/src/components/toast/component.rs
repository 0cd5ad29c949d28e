use std::fmt::Display;

use dioxus::prelude::*;
use dioxus_primitives::toast as prim;

pub use dioxus_primitives::toast::{use_toast, ToastOptions, Toasts};

#[component]
pub fn ToastProvider(props: prim::ToastProviderProps) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        prim::ToastProvider { ..props }
    }
}

/// Success toast for `Ok`, error toast carrying the error text for `Err`.
///
/// Returns whether the result was `Ok` so callers can chain a refresh.
pub fn toast_result<T, E: Display>(toasts: Toasts, result: &Result<T, E>, success: &str) -> bool {
    match result {
        Ok(_) => {
            toasts.success(success.to_string(), ToastOptions::new());
            true
        }
        Err(e) => {
            toasts.error(e.to_string(), ToastOptions::new());
            false
        }
    }
}
