use std::time::{Duration, SystemTime};

use rand::Rng;

use crate::ClientOptions;

/// Computes the pause before retry number `attempt` (1-based).
///
/// A server hint wins over the computed schedule. Without one the delay
/// doubles per attempt from `base_backoff`, plus up to one second of
/// uniform jitter. Either way the result never exceeds `max_backoff`.
pub(crate) fn delay_before_retry(
    attempt: u32,
    hint: Option<Duration>,
    options: &ClientOptions,
) -> Duration {
    if let Some(hint) = hint {
        return hint.min(options.max_backoff);
    }

    // Cap the exponent so the shift cannot overflow.
    let exp = attempt.saturating_sub(1).min(16);
    let multiplier = 1u32 << exp;
    let backoff = options.base_backoff.saturating_mul(multiplier);
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1_000));
    backoff.saturating_add(jitter).min(options.max_backoff)
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Browser sleep through `setTimeout`; resolves immediately if the runtime
/// exposes no timer API.
#[cfg(target_arch = "wasm32")]
pub(crate) async fn sleep(duration: Duration) {
    use wasm_bindgen::{JsCast, JsValue};

    let millis = duration.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let global = js_sys::global();
        let set_timeout = js_sys::Reflect::get(&global, &JsValue::from_str("setTimeout"))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok());
        match set_timeout {
            Some(set_timeout) => {
                let _ = set_timeout.call2(&global, &resolve, &JsValue::from(millis));
            }
            None => {
                let _ = resolve.call0(&JsValue::NULL);
            }
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn wall_clock_now() -> SystemTime {
    SystemTime::now()
}

// SystemTime::now is unimplemented on wasm32-unknown-unknown; go through the
// JS clock instead.
#[cfg(target_arch = "wasm32")]
pub(crate) fn wall_clock_now() -> SystemTime {
    let millis = js_sys::Date::now().max(0.0) as u64;
    SystemTime::UNIX_EPOCH + Duration::from_millis(millis)
}
