pub mod runner;

pub use runner::{ExperienceRunner, Scenario};
pub use helios_engine::PROTOCOL_VERSION;

#[doc(hidden)]
pub use js_sys;

/// Generate all `#[wasm_bindgen]` exports for a scene.
///
/// This macro generates:
/// - `thread_local!` storage for the ExperienceRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, tick, input, textures, navigation, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use helios_engine::*;
///
/// mod scene;
/// use scene::MySystem;
///
/// helios_web::export_experience!(MySystem, "my-system");
/// ```
///
/// # Arguments
///
/// - `$scenario`: A type implementing `helios_web::Scenario` and `Default`
/// - `$name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_experience {
    ($scenario:ty, $name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::ExperienceRunner<$scenario>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::ExperienceRunner<$scenario>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        #[wasm_bindgen]
        pub fn experience_init(width: u32, height: u32, device_pixel_ratio: f32) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let mut runner = $crate::ExperienceRunner::new(<$scenario>::default());
            runner.init(width, height, device_pixel_ratio).map_err(|err| {
                log::error!("{}: {}", $name, err);
                JsValue::from($crate::js_sys::Error::new(&err.to_string()))
            })?;

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized", $name);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn experience_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn experience_resize(width: u32, height: u32, device_pixel_ratio: f32) {
            with_runner(|r| r.resize(width, height, device_pixel_ratio));
        }

        #[wasm_bindgen]
        pub fn experience_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn experience_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn experience_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn experience_wheel(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
        }

        // ---- Navigation ----

        #[wasm_bindgen]
        pub fn navigate_to(name: &str) -> bool {
            with_runner(|r| r.navigate_to(name)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn get_navigable_json() -> String {
            with_runner(|r| r.navigable_json()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn get_markers_json() -> String {
            with_runner(|r| r.markers_json()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn get_navigation_state_json() -> String {
            with_runner(|r| r.navigation_state_json()).unwrap_or_else(|| "null".to_string())
        }

        // ---- Textures ----

        #[wasm_bindgen]
        pub fn get_texture_requests_json() -> String {
            with_runner(|r| r.texture_requests_json()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn texture_loaded(path: &str) {
            with_runner(|r| r.texture_loaded(path));
        }

        #[wasm_bindgen]
        pub fn texture_failed(path: &str, reason: &str) {
            with_runner(|r| r.texture_failed(path, reason));
        }

        #[wasm_bindgen]
        pub fn get_loading_progress() -> f32 {
            with_runner(|r| r.loading_progress()).unwrap_or(0.0)
        }

        // ---- Bloom ----

        #[wasm_bindgen]
        pub fn set_bloom(threshold: f32, strength: f32, radius: f32) {
            with_runner(|r| r.set_bloom(threshold, strength, radius));
        }

        #[wasm_bindgen]
        pub fn set_bloom_enabled(enabled: bool) {
            with_runner(|r| r.set_bloom_enabled(enabled));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_commands_ptr() -> *const f32 {
            with_runner(|r| r.commands_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_commands_len() -> u32 {
            with_runner(|r| r.commands_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_events_ptr() -> *const f32 {
            with_runner(|r| r.events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_events_len() -> u32 {
            with_runner(|r| r.events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_materials_json() -> String {
            with_runner(|r| r.materials_json()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn get_material_revision() -> f64 {
            with_runner(|r| r.material_revision()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_protocol_version() -> f32 {
            $crate::PROTOCOL_VERSION
        }
    };
}
