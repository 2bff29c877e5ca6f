// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;

/// Turns a panic payload into an error message naming the FFI function that
/// panicked.
pub(crate) fn handle_panic_error(
    error: Box<dyn Any + Send + 'static>,
    function_name: &str,
) -> String {
    // This pattern of String vs &str comes from
    // https://doc.rust-lang.org/std/panic/struct.PanicHookInfo.html#method.payload
    if let Some(s) = error.downcast_ref::<String>() {
        format!("{function_name} failed: (panic) {s}")
    } else if let Some(s) = error.downcast_ref::<&str>() {
        format!("{function_name} failed: (panic) {s}")
    } else {
        format!("{function_name} failed: (panic) Unable to retrieve panic context")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use function_name::named;
    use std::panic::catch_unwind;

    #[test]
    #[named]
    fn panic_payloads_become_messages() {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let static_payload = catch_unwind(|| panic!("static message")).unwrap_err();
        let formatted_payload = catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        let opaque_payload = catch_unwind(|| std::panic::panic_any(7u8)).unwrap_err();

        std::panic::set_hook(original_hook);

        assert_eq!(
            handle_panic_error(static_payload, function_name!()),
            "panic_payloads_become_messages failed: (panic) static message"
        );
        assert_eq!(
            handle_panic_error(formatted_payload, "ParseProfile"),
            "ParseProfile failed: (panic) formatted 42"
        );
        assert_eq!(
            handle_panic_error(opaque_payload, "ParseProfile"),
            "ParseProfile failed: (panic) Unable to retrieve panic context"
        );
    }
}
