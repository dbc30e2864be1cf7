// src/utils/app_time.rs
// Monotonic host clock. `std::time::Instant` panics on wasm32, so the browser
// build goes through web-time instead.

#[cfg(not(target_arch = "wasm32"))]
pub type AppInstant = std::time::Instant;

#[cfg(target_arch = "wasm32")]
pub type AppInstant = web_time::Instant;

#[cfg(not(target_arch = "wasm32"))]
pub fn now() -> AppInstant {
    std::time::Instant::now()
}

#[cfg(target_arch = "wasm32")]
pub fn now() -> AppInstant {
    web_time::Instant::now()
}

/// Milliseconds elapsed since `origin`, as the float the frame loop works in.
pub fn elapsed_ms(origin: AppInstant) -> f64 {
    origin.elapsed().as_secs_f64() * 1000.0
}
