//! Error types for engine start-up and world configuration.
//!
//! Runtime frame work never fails: only construction paths return these.

/// Invalid world or asset configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse a JSON configuration document.
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// Two bodies share a name.
    #[error("duplicate body name `{0}`")]
    DuplicateBody(String),

    /// A body radius is zero, negative or not finite.
    #[error("body `{name}` has invalid radius {radius}")]
    InvalidRadius { name: String, radius: f32 },

    /// Orbit parameters are missing or out of range.
    #[error("body `{name}` has an invalid orbit: {reason}")]
    InvalidOrbit { name: String, reason: &'static str },

    /// An orbital body names a parent that does not exist.
    #[error("body `{name}` orbits unknown parent `{parent}`")]
    UnknownParent { name: String, parent: String },

    /// Parent links loop back on themselves.
    #[error("orbit hierarchy contains a cycle through `{0}`")]
    OrbitCycle(String),

    /// A system-wide orbit parameter is negative or not finite.
    #[error("system setting `{field}` must be finite and non-negative, got {value}")]
    InvalidSystem { field: &'static str, value: f64 },

    /// A texture key is not listed in the asset manifest.
    #[error("body `{name}` uses unknown texture key `{key}`")]
    UnknownTexture { name: String, key: String },

    /// A color string is not `#rrggbb`.
    #[error("invalid color `{0}`")]
    InvalidColor(String),
}

/// Top-level engine error.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No usable render surface was supplied at start-up.
    #[error("rendering context is missing or has a zero-sized viewport ({width}x{height})")]
    MissingRenderContext { width: u32, height: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
